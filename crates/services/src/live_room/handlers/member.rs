use liveroom_db::models::{LessonMemberState, MemberStateType, StateValue};

use crate::live_room::command::StateModifyCommand;
use crate::live_room::error::{LiveRoomResult, StoreContext};
use crate::store::StoreTx;

pub(crate) async fn update_hands_up(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    user_id: &str,
    value: bool,
) -> LiveRoomResult<()> {
    let state = LessonMemberState::new(
        command.lesson_id.as_str(),
        user_id,
        MemberStateType::HandsUp,
        StateValue::flag(value),
    );
    tx.upsert_member_state(&state)
        .await
        .store_context_user("LessonMemberState.upsert", &command.lesson_id, user_id)
}

pub(crate) async fn fold_hand_all(tx: &mut dyn StoreTx, command: &StateModifyCommand) -> LiveRoomResult<()> {
    reset_all(tx, command, MemberStateType::HandsUp, false).await
}

pub(crate) async fn update_annotation(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    user_ids: &[String],
    value: bool,
) -> LiveRoomResult<()> {
    update_many(tx, command, MemberStateType::Annotation, user_ids, value).await
}

pub(crate) async fn disable_all_annotation(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
) -> LiveRoomResult<()> {
    reset_all(tx, command, MemberStateType::Annotation, false).await
}

pub(crate) async fn update_chat(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    user_ids: &[String],
    value: bool,
) -> LiveRoomResult<()> {
    update_many(tx, command, MemberStateType::Chat, user_ids, value).await
}

/// Chat is enabled by default, so resetting turns it back on.
pub(crate) async fn reset_all_chat(tx: &mut dyn StoreTx, command: &StateModifyCommand) -> LiveRoomResult<()> {
    reset_all(tx, command, MemberStateType::Chat, true).await
}

async fn update_many(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    state_type: MemberStateType,
    user_ids: &[String],
    value: bool,
) -> LiveRoomResult<()> {
    tx.upsert_multi_member_states(&command.lesson_id, state_type, user_ids, &StateValue::flag(value))
        .await
        .store_context("LessonMemberState.upsert_multi", &command.lesson_id)
}

async fn reset_all(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    state_type: MemberStateType,
    value: bool,
) -> LiveRoomResult<()> {
    tx.upsert_all_member_states_by_type(&command.lesson_id, state_type, &StateValue::flag(value))
        .await
        .store_context("LessonMemberState.upsert_all_by_type", &command.lesson_id)
}
