use crate::body::Quaternion;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// 回転ターゲット（可視化の5つの面ピボット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum TargetId {
    Cuboid = 0,
    Front = 1,
    Left = 2,
    Right = 3,
    Back = 4,
}

impl TargetId {
    pub const COUNT: usize = 5;
    pub const ALL: [TargetId; Self::COUNT] = [
        TargetId::Cuboid,
        TargetId::Front,
        TargetId::Left,
        TargetId::Right,
        TargetId::Back,
    ];
}

/// ターゲットごとの固定回転中心
pub const CUBOID_CENTER: [f32; 3] = [0.0, -2.5, 0.0];
pub const FRONT_CENTER: [f32; 3] = [0.0, -3.18961, -0.5];
pub const LEFT_CENTER: [f32; 3] = [-0.51, -3.18961, 0.0];
pub const RIGHT_CENTER: [f32; 3] = [0.51, -3.18961, 0.0];
pub const BACK_CENTER: [f32; 3] = [0.0, -3.18961, 0.51];

pub fn target_center(id: TargetId) -> [f32; 3] {
    match id {
        TargetId::Cuboid => CUBOID_CENTER,
        TargetId::Front => FRONT_CENTER,
        TargetId::Left => LEFT_CENTER,
        TargetId::Right => RIGHT_CENTER,
        TargetId::Back => BACK_CENTER,
    }
}

/// センサー座標系 → 可視化座標系の符号補正
///
/// x, y, z を反転し w は変更しない。w も含めて反転しないため数学的な共役
/// （単位クォータニオンの逆元）ではない。センサーと表示側の座標系の
/// 利き手違いを吸収するための補正で、ノルムは保存される。
pub fn correct_orientation(q: Quaternion) -> Quaternion {
    Quaternion::new(q.w, -q.x, -q.y, -q.z)
}

/// 1つの回転ピボット: 固定中心 + 現在の回転
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPivot {
    pub center: [f32; 3],
    pub rotation: Quaternion,
}

/// 描画層へ渡す回転状態のスナップショット
///
/// 中心は構築時に一度だけ設定し、回転はフレームごとに上書きする。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pivots: [RotationPivot; TargetId::COUNT],
}

impl RenderState {
    /// 全ピボット回転なし
    pub fn identity() -> Self {
        let pivots = TargetId::ALL.map(|id| RotationPivot {
            center: target_center(id),
            rotation: Quaternion::identity(),
        });
        Self { pivots }
    }

    pub fn pivot(&self, id: TargetId) -> &RotationPivot {
        &self.pivots[id as usize]
    }

    /// orientation サンプルを補正して全ピボットへ反映する
    ///
    /// 5つのピボットが同じ補正済みクォータニオンを受け取る（中心は不変）。
    pub fn apply_sample(&mut self, sample: Quaternion) {
        let corrected = correct_orientation(sample);
        for pivot in self.pivots.iter_mut() {
            pivot.rotation = corrected;
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::identity()
    }
}

/// 最新 RenderState の単一書き込み・単一読み出しハンドオフ
///
/// 処理ループが publish し、描画側が snapshot を取る。バージョン番号で
/// 更新の有無を検出できる。
#[derive(Clone)]
pub struct SharedRenderState {
    latest: Arc<Mutex<RenderState>>,
    version: Arc<AtomicU64>,
}

impl SharedRenderState {
    pub fn new() -> Self {
        Self {
            latest: Arc::new(Mutex::new(RenderState::identity())),
            version: Arc::new(AtomicU64::new(0)),
        }
    }

    /// 新しい状態を公開する。publish ごとにバージョンが進む。
    pub fn publish(&self, state: RenderState) {
        *self.latest.lock().unwrap() = state;
        self.version.fetch_add(1, Ordering::Release);
    }

    /// 最新状態のコピーを取得
    pub fn snapshot(&self) -> RenderState {
        *self.latest.lock().unwrap()
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl Default for SharedRenderState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_correct_orientation_negates_xyz() {
        let q = Quaternion::new(0.5, 0.5, -0.5, 0.5);
        let c = correct_orientation(q);
        assert_eq!(c, Quaternion::new(0.5, -0.5, 0.5, -0.5));
    }

    #[test]
    fn test_correct_orientation_preserves_norm() {
        let q = Quaternion::new(0.1, 0.7, -0.3, 0.64).normalized();
        let c = correct_orientation(q);
        assert!(approx_eq_f32(c.norm(), 1.0, 1e-6));
    }

    #[test]
    fn test_correct_orientation_is_not_conjugate_for_w() {
        // w は反転しない
        let q = Quaternion::new(-0.5, 0.5, 0.5, 0.5);
        assert_eq!(correct_orientation(q).w, -0.5);
    }

    #[test]
    fn test_identity_centers_are_constants() {
        let state = RenderState::identity();
        assert_eq!(state.pivot(TargetId::Cuboid).center, [0.0, -2.5, 0.0]);
        assert_eq!(state.pivot(TargetId::Front).center, [0.0, -3.18961, -0.5]);
        assert_eq!(state.pivot(TargetId::Left).center, [-0.51, -3.18961, 0.0]);
        assert_eq!(state.pivot(TargetId::Right).center, [0.51, -3.18961, 0.0]);
        assert_eq!(state.pivot(TargetId::Back).center, [0.0, -3.18961, 0.51]);
    }

    #[test]
    fn test_apply_sample_updates_all_targets() {
        let mut state = RenderState::identity();
        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        state.apply_sample(Quaternion::new(half_sqrt2, half_sqrt2, 0.0, 0.0));

        let expected = Quaternion::new(half_sqrt2, -half_sqrt2, 0.0, 0.0);
        for id in TargetId::ALL {
            assert_eq!(state.pivot(id).rotation, expected);
            // 中心は変化しない
            assert_eq!(state.pivot(id).center, target_center(id));
        }
    }

    #[test]
    fn test_apply_sample_identity_passthrough() {
        let mut state = RenderState::identity();
        state.apply_sample(Quaternion::new(1.0, 0.0, 0.0, 0.0));
        for id in TargetId::ALL {
            assert_eq!(state.pivot(id).rotation, Quaternion::new(1.0, 0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn test_shared_state_publish_snapshot() {
        let shared = SharedRenderState::new();
        assert_eq!(shared.version(), 0);

        let mut state = RenderState::identity();
        state.apply_sample(Quaternion::new(0.0, 1.0, 0.0, 0.0));
        shared.publish(state);

        assert_eq!(shared.version(), 1);
        let snap = shared.snapshot();
        assert_eq!(
            snap.pivot(TargetId::Cuboid).rotation,
            Quaternion::new(0.0, -1.0, 0.0, 0.0)
        );
    }
}
