use anyhow::Result;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::render::cuboid::{box_corners, face_color, face_quad, BOX_CENTER, BOX_EDGES, BOX_EDGE_COLOR};
use crate::rotation::{RenderState, RotationPivot, TargetId};

/// 斜投影の奥行き係数（Z成分をX/Yへ流す）
const OBLIQUE_X: f32 = 0.35;
const OBLIQUE_Y: f32 = 0.18;

/// minifbを使用した直方体レンダラー
pub struct CuboidRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    scale: f32,
}

impl CuboidRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize, scale: f32) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        let buffer = vec![0u32; width * height];

        Ok(Self {
            window,
            buffer,
            width,
            height,
            scale,
        })
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// 今回のループで新たに押されたキー
    pub fn pressed_keys(&self) -> Vec<Key> {
        self.window.get_keys_pressed(KeyRepeat::No)
    }

    /// バッファを黒でクリア
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// RenderState を描画
    ///
    /// 直方体の辺は Cuboid ピボットで、各面プレートは自分のピボット中心で
    /// 回転させてから投影する。
    pub fn draw_state(&mut self, state: &RenderState) {
        let cuboid = state.pivot(TargetId::Cuboid);
        let corners = box_corners().map(|p| rotate_about(cuboid, p));
        for (a, b) in BOX_EDGES {
            let (x1, y1) = self.project(corners[a]);
            let (x2, y2) = self.project(corners[b]);
            self.draw_line(x1, y1, x2, y2, BOX_EDGE_COLOR);
        }

        for id in TargetId::ALL {
            let quad = match face_quad(id) {
                Some(quad) => quad,
                None => continue,
            };
            let pivot = state.pivot(id);
            let rotated = quad.map(|p| rotate_about(pivot, p));
            let color = face_color(id);
            for i in 0..4 {
                let (x1, y1) = self.project(rotated[i]);
                let (x2, y2) = self.project(rotated[(i + 1) % 4]);
                self.draw_line(x1, y1, x2, y2, color);
            }
        }
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// 斜投影でスクリーン座標へ変換
    ///
    /// 直方体中心がウィンドウ中央に来るようにオフセットする。
    fn project(&self, p: [f32; 3]) -> (i32, i32) {
        let x = p[0] - BOX_CENTER[0] + p[2] * OBLIQUE_X;
        let y = p[1] - BOX_CENTER[1] - p[2] * OBLIQUE_Y;
        let px = self.width as f32 / 2.0 + x * self.scale;
        let py = self.height as f32 / 2.0 - y * self.scale;
        (px as i32, py as i32)
    }

    /// Bresenhamのアルゴリズムで線を描画
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

/// ピボット中心まわりの回転: p' = center + q * (p - center) * q⁻¹
fn rotate_about(pivot: &RotationPivot, p: [f32; 3]) -> [f32; 3] {
    let c = pivot.center;
    let local = [p[0] - c[0], p[1] - c[1], p[2] - c[2]];
    let rotated = pivot.rotation.rotate(local);
    [c[0] + rotated[0], c[1] + rotated[1], c[2] + rotated[2]]
}
