//! フレーム処理パイプライン
//!
//! ボディフレーム → 関節選択の解決 → orientation 補正 → RenderState 反映。
//! トラッキング中のボディを元の順序で走査し、各ボディのサンプルで
//! RenderState を上書きする。複数ボディが同時にトラッキングされている場合、
//! 最後のボディの orientation が勝つ。

use crate::body::BodyFrame;
use crate::joint::JointType;
use crate::rotation::RenderState;
use crate::selector::{resolve_joint, SelectionState};

/// 1フレーム分の処理
///
/// トラッキング中のボディがなければ state は変更されず previous を返す。
/// あれば各ボディについて選択関節を解決し、そのサンプルを state へ反映して
/// 最終的に解決された関節を返す。
pub fn process_frame(
    frame: &BodyFrame,
    selection: &SelectionState,
    previous: JointType,
    state: &mut RenderState,
) -> JointType {
    let mut looking = previous;
    for body in frame.tracked_bodies() {
        looking = resolve_joint(selection, looking);
        state.apply_sample(body.orientation(looking));
    }
    looking
}
