//! 直方体と4面プレートのジオメトリ定義
//!
//! 直方体本体は CUBOID ピボット、各面プレートは自分のピボット中心で回転する。
//! 面プレートは本体表面の少し外側（±0.51）に置かれ、辺長をやや小さくして
//! 本体のエッジと区別できるようにしている。

use crate::rotation::{target_center, TargetId};

/// 直方体の中心（面ピボットのY座標と同じ高さ）
pub const BOX_CENTER: [f32; 3] = [0.0, -3.18961, 0.0];
/// 直方体の半辺長
pub const BOX_HALF: f32 = 0.5;
/// 面プレートの半辺長
pub const FACE_HALF: f32 = 0.45;

/// 描画色 (0xRRGGBB)
pub const BOX_EDGE_COLOR: u32 = 0xC0C0C0;
pub const FRONT_COLOR: u32 = 0xFF5050;
pub const LEFT_COLOR: u32 = 0x50FF50;
pub const RIGHT_COLOR: u32 = 0x5080FF;
pub const BACK_COLOR: u32 = 0xFFD050;

pub fn face_color(id: TargetId) -> u32 {
    match id {
        TargetId::Cuboid => BOX_EDGE_COLOR,
        TargetId::Front => FRONT_COLOR,
        TargetId::Left => LEFT_COLOR,
        TargetId::Right => RIGHT_COLOR,
        TargetId::Back => BACK_COLOR,
    }
}

/// 直方体の8頂点
pub fn box_corners() -> [[f32; 3]; 8] {
    let [cx, cy, cz] = BOX_CENTER;
    let h = BOX_HALF;
    [
        [cx - h, cy - h, cz - h],
        [cx + h, cy - h, cz - h],
        [cx + h, cy + h, cz - h],
        [cx - h, cy + h, cz - h],
        [cx - h, cy - h, cz + h],
        [cx + h, cy - h, cz + h],
        [cx + h, cy + h, cz + h],
        [cx - h, cy + h, cz + h],
    ]
}

/// 直方体の12辺（box_corners のインデックスペア）
pub const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0), // 前面
    (4, 5), (5, 6), (6, 7), (7, 4), // 背面
    (0, 4), (1, 5), (2, 6), (3, 7), // 奥行き方向
];

/// 面プレートの4頂点（Cuboid は面を持たないので None）
pub fn face_quad(id: TargetId) -> Option<[[f32; 3]; 4]> {
    let [cx, cy, cz] = target_center(id);
    let h = FACE_HALF;
    match id {
        TargetId::Cuboid => None,
        // 前後面: XY平面のプレート
        TargetId::Front | TargetId::Back => Some([
            [cx - h, cy - h, cz],
            [cx + h, cy - h, cz],
            [cx + h, cy + h, cz],
            [cx - h, cy + h, cz],
        ]),
        // 左右面: YZ平面のプレート
        TargetId::Left | TargetId::Right => Some([
            [cx, cy - h, cz - h],
            [cx, cy - h, cz + h],
            [cx, cy + h, cz + h],
            [cx, cy + h, cz - h],
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_has_no_face_quad() {
        assert!(face_quad(TargetId::Cuboid).is_none());
    }

    #[test]
    fn test_face_quads_centered_on_pivot() {
        for id in [TargetId::Front, TargetId::Left, TargetId::Right, TargetId::Back] {
            let quad = face_quad(id).unwrap();
            let center = target_center(id);
            for axis in 0..3 {
                let mean: f32 = quad.iter().map(|p| p[axis]).sum::<f32>() / 4.0;
                assert!(
                    (mean - center[axis]).abs() < 1e-5,
                    "{:?} axis {} mean {} != {}",
                    id,
                    axis,
                    mean,
                    center[axis]
                );
            }
        }
    }

    #[test]
    fn test_box_edges_reference_valid_corners() {
        for (a, b) in BOX_EDGES {
            assert!(a < 8 && b < 8);
            assert_ne!(a, b);
        }
    }
}
