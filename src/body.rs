use crate::joint::JointType;

/// 回転クォータニオン (w, x, y, z)
///
/// センサーが関節ごとに報告する orientation。回転表現として単位ノルムが前提。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// 回転なし
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let len = self.norm();
        if len < 1e-9 {
            return Self::identity();
        }
        Self::new(self.w / len, self.x / len, self.y / len, self.z / len)
    }

    /// ベクトルを回転: v' = v + 2w(u×v) + 2(u×(u×v))  (u = (x,y,z))
    pub fn rotate(&self, v: [f32; 3]) -> [f32; 3] {
        let u = [self.x, self.y, self.z];
        let uv = cross(u, v);
        let uuv = cross(u, uv);
        [
            v[0] + 2.0 * (self.w * uv[0] + uuv[0]),
            v[1] + 2.0 * (self.w * uv[1] + uuv[1]),
            v[2] + 2.0 * (self.w * uv[2] + uuv[2]),
        ]
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 1フレーム内の1人分のボディデータ
///
/// トラッキング中フラグと関節ごとの orientation を保持する。
/// 「検出されているがトラッキングされていない」ボディは tracked = false。
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub tracked: bool,
    pub orientations: [Quaternion; JointType::COUNT],
}

impl Body {
    pub fn new(tracked: bool, orientations: [Quaternion; JointType::COUNT]) -> Self {
        Self {
            tracked,
            orientations,
        }
    }

    /// 全関節 identity のトラッキングなしボディ
    pub fn untracked() -> Self {
        Self::new(false, [Quaternion::identity(); JointType::COUNT])
    }

    /// 指定関節の orientation を取得
    pub fn orientation(&self, joint: JointType) -> Quaternion {
        self.orientations[joint as usize]
    }
}

/// 1フレーム分のボディ集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyFrame {
    pub bodies: Vec<Body>,
}

impl BodyFrame {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies }
    }

    /// トラッキング中のボディのみを元の順序で返す
    pub fn tracked_bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.tracked)
    }
}
