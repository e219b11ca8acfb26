/// Kinect V2 の関節インデックス（本アプリで扱う19関節）
///
/// Head は選択トグルを持たないデフォルト関節（Head の orientation は常にゼロ ⇔ 初期状態）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointType {
    Head = 0,
    Neck = 1,
    SpineShoulder = 2,
    SpineMid = 3,
    SpineBase = 4,
    ShoulderLeft = 5,
    ElbowLeft = 6,
    WristLeft = 7,
    HandLeft = 8,
    ShoulderRight = 9,
    ElbowRight = 10,
    WristRight = 11,
    HandRight = 12,
    HipLeft = 13,
    KneeLeft = 14,
    AnkleLeft = 15,
    HipRight = 16,
    KneeRight = 17,
    AnkleRight = 18,
}

impl JointType {
    pub const COUNT: usize = 19;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Head),
            1 => Some(Self::Neck),
            2 => Some(Self::SpineShoulder),
            3 => Some(Self::SpineMid),
            4 => Some(Self::SpineBase),
            5 => Some(Self::ShoulderLeft),
            6 => Some(Self::ElbowLeft),
            7 => Some(Self::WristLeft),
            8 => Some(Self::HandLeft),
            9 => Some(Self::ShoulderRight),
            10 => Some(Self::ElbowRight),
            11 => Some(Self::WristRight),
            12 => Some(Self::HandRight),
            13 => Some(Self::HipLeft),
            14 => Some(Self::KneeLeft),
            15 => Some(Self::AnkleLeft),
            16 => Some(Self::HipRight),
            17 => Some(Self::KneeRight),
            18 => Some(Self::AnkleRight),
            _ => None,
        }
    }

    /// 表示用の名前
    pub fn name(&self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Neck => "Neck",
            Self::SpineShoulder => "SpineShoulder",
            Self::SpineMid => "SpineMid",
            Self::SpineBase => "SpineBase",
            Self::ShoulderLeft => "ShoulderLeft",
            Self::ElbowLeft => "ElbowLeft",
            Self::WristLeft => "WristLeft",
            Self::HandLeft => "HandLeft",
            Self::ShoulderRight => "ShoulderRight",
            Self::ElbowRight => "ElbowRight",
            Self::WristRight => "WristRight",
            Self::HandRight => "HandRight",
            Self::HipLeft => "HipLeft",
            Self::KneeLeft => "KneeLeft",
            Self::AnkleLeft => "AnkleLeft",
            Self::HipRight => "HipRight",
            Self::KneeRight => "KneeRight",
            Self::AnkleRight => "AnkleRight",
        }
    }
}
