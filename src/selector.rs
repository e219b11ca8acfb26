use crate::joint::JointType;

/// 注目関節の選択優先順位
///
/// 複数フラグが同時に立っていた場合は先頭が勝つ（通常はUIが排他制御するため
/// 同時に立つことはない）。Head はトグルを持たず、全フラグ false のときの
/// デフォルトとしてのみ到達する。
pub const SELECTION_PRIORITY: [JointType; 18] = [
    JointType::Neck,
    JointType::SpineShoulder,
    JointType::SpineMid,
    JointType::SpineBase,
    JointType::ShoulderRight,
    JointType::ShoulderLeft,
    JointType::HipRight,
    JointType::HipLeft,
    JointType::ElbowRight,
    JointType::WristRight,
    JointType::HandRight,
    JointType::ElbowLeft,
    JointType::WristLeft,
    JointType::HandLeft,
    JointType::KneeRight,
    JointType::AnkleRight,
    JointType::KneeLeft,
    JointType::AnkleLeft,
];

/// 関節選択トグルのスナップショット
///
/// 排他制御（同時に1つまで）はUI側の責務。本体は複数フラグが立っていても
/// SELECTION_PRIORITY で決定的に解決する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    flags: [bool; JointType::COUNT],
}

impl SelectionState {
    /// 全フラグ false（デフォルト = Head のまま）
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定関節のみを選択（他は全てクリア）
    pub fn select(&mut self, joint: JointType) {
        self.flags = [false; JointType::COUNT];
        self.flags[joint as usize] = true;
    }

    /// フラグを直接セット（排他制御なし）
    pub fn set(&mut self, joint: JointType, selected: bool) {
        self.flags[joint as usize] = selected;
    }

    /// 全フラグをクリア
    pub fn clear(&mut self) {
        self.flags = [false; JointType::COUNT];
    }

    pub fn is_selected(&self, joint: JointType) -> bool {
        self.flags[joint as usize]
    }
}

/// 現在の注目関節を解決する
///
/// SELECTION_PRIORITY 順に最初の true フラグの関節を返す。
/// どのフラグも立っていなければ previous をそのまま返す（エラーではない）。
pub fn resolve_joint(selection: &SelectionState, previous: JointType) -> JointType {
    for &joint in SELECTION_PRIORITY.iter() {
        if selection.is_selected(joint) {
            return joint;
        }
    }
    previous
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_covers_all_selectable_joints() {
        // Head 以外の18関節が一度ずつ現れること
        assert_eq!(SELECTION_PRIORITY.len(), 18);
        assert!(!SELECTION_PRIORITY.contains(&JointType::Head));
        for i in 0..SELECTION_PRIORITY.len() {
            for j in (i + 1)..SELECTION_PRIORITY.len() {
                assert_ne!(SELECTION_PRIORITY[i], SELECTION_PRIORITY[j]);
            }
        }
    }

    #[test]
    fn test_resolve_single_flag() {
        // フラグが1つだけ立っていればその関節が返る
        for &joint in SELECTION_PRIORITY.iter() {
            let mut selection = SelectionState::new();
            selection.select(joint);
            assert_eq!(resolve_joint(&selection, JointType::Head), joint);
        }
    }

    #[test]
    fn test_resolve_no_flag_keeps_previous() {
        let selection = SelectionState::new();
        assert_eq!(resolve_joint(&selection, JointType::Head), JointType::Head);
        assert_eq!(
            resolve_joint(&selection, JointType::WristLeft),
            JointType::WristLeft
        );
    }

    #[test]
    fn test_resolve_multiple_flags_priority_wins() {
        // Neck は SpineMid より優先
        let mut selection = SelectionState::new();
        selection.set(JointType::SpineMid, true);
        selection.set(JointType::Neck, true);
        assert_eq!(resolve_joint(&selection, JointType::Head), JointType::Neck);

        // AnkleLeft（最下位）と KneeRight → KneeRight
        let mut selection = SelectionState::new();
        selection.set(JointType::AnkleLeft, true);
        selection.set(JointType::KneeRight, true);
        assert_eq!(
            resolve_joint(&selection, JointType::Head),
            JointType::KneeRight
        );
    }

    #[test]
    fn test_select_is_exclusive() {
        let mut selection = SelectionState::new();
        selection.select(JointType::HandRight);
        selection.select(JointType::HipLeft);
        assert!(!selection.is_selected(JointType::HandRight));
        assert!(selection.is_selected(JointType::HipLeft));
    }

    #[test]
    fn test_clear_returns_to_default() {
        let mut selection = SelectionState::new();
        selection.select(JointType::Neck);
        selection.clear();
        // クリア後は previous が維持される
        assert_eq!(
            resolve_joint(&selection, JointType::Neck),
            JointType::Neck
        );
    }
}
