use bson::DateTime;
use liveroom_db::models::{
    LessonMemberState, MemberStateType, MemberStatesFilter, PollingOption, StateValue,
};
use tracing::{debug, info};

use super::load_room_state;
use crate::live_room::command::StateModifyCommand;
use crate::live_room::dispatcher::CommandDispatcher;
use crate::live_room::error::{LiveRoomError, LiveRoomResult, StoreContext};
use crate::live_room::polling;
use crate::store::StoreTx;

pub(crate) async fn start_polling(
    dispatcher: &CommandDispatcher,
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    question: &str,
    options: &[PollingOption],
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    let state = load_room_state(tx, lesson_id).await?;
    let existing = state.as_ref().and_then(|s| s.current_polling.as_ref());

    let poll = polling::start(existing, question, options, &dispatcher.settings, DateTime::now())?;
    tx.upsert_current_polling(lesson_id, Some(&poll))
        .await
        .store_context("LessonRoomState.upsert_current_polling", lesson_id)?;

    info!(lesson_id, options = poll.options.len(), "Polling started");
    Ok(())
}

pub(crate) async fn stop_polling(tx: &mut dyn StoreTx, command: &StateModifyCommand) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    let mut poll = polling::require(current_polling(tx, lesson_id).await?)?;

    polling::stop(&mut poll, DateTime::now())?;
    tx.upsert_current_polling(lesson_id, Some(&poll))
        .await
        .store_context("LessonRoomState.upsert_current_polling", lesson_id)?;

    info!(lesson_id, "Polling stopped");
    Ok(())
}

pub(crate) async fn share_polling(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    is_shared: bool,
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    let mut poll = polling::require(current_polling(tx, lesson_id).await?)?;

    polling::set_shared(&mut poll, is_shared)?;
    tx.upsert_current_polling(lesson_id, Some(&poll))
        .await
        .store_context("LessonRoomState.upsert_current_polling", lesson_id)?;

    debug!(lesson_id, is_shared, "Polling share toggled");
    Ok(())
}

/// Archives the stopped poll with every submitted answer, then clears the
/// poll and the per-learner answers so the next poll starts clean.
pub(crate) async fn end_polling(tx: &mut dyn StoreTx, command: &StateModifyCommand) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    let poll = polling::require(current_polling(tx, lesson_id).await?)?;
    polling::ensure_can_end(&poll)?;

    let answers = tx
        .get_member_states(&answers_filter(lesson_id, None))
        .await
        .store_context("LessonMemberState.get", lesson_id)?;
    let record = polling::archive(lesson_id, &poll, &answers, DateTime::now());

    tx.create_polling(&record)
        .await
        .store_context("LessonPolling.create", lesson_id)?;
    tx.upsert_current_polling(lesson_id, None)
        .await
        .store_context("LessonRoomState.upsert_current_polling", lesson_id)?;
    tx.upsert_all_member_states_by_type(lesson_id, MemberStateType::PollingAnswer, &StateValue::default())
        .await
        .store_context("LessonMemberState.upsert_all_by_type", lesson_id)?;

    info!(
        lesson_id,
        poll_id = %record.poll_id,
        answered = record.students_answers.len(),
        "Polling ended"
    );
    Ok(())
}

pub(crate) async fn submit_polling_answer(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    user_id: &str,
    answers: &[String],
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    let poll = polling::require(current_polling(tx, lesson_id).await?)?;
    polling::validate_answers(&poll, answers)?;

    let previous = tx
        .get_member_states(&answers_filter(lesson_id, Some(user_id)))
        .await
        .store_context_user("LessonMemberState.get", lesson_id, user_id)?;
    if previous.iter().any(polling::has_answered) {
        return Err(LiveRoomError::permission_denied("only submit 1 time"));
    }

    let state = LessonMemberState::new(
        lesson_id,
        user_id,
        MemberStateType::PollingAnswer,
        StateValue::answers(answers.to_vec()),
    );
    tx.upsert_member_state(&state)
        .await
        .store_context_user("LessonMemberState.upsert", lesson_id, user_id)?;

    debug!(lesson_id, user_id, "Polling answer submitted");
    Ok(())
}

/// Discards the current poll without archiving. A lesson without a poll
/// is left untouched.
pub(crate) async fn reset_polling(tx: &mut dyn StoreTx, command: &StateModifyCommand) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    if current_polling(tx, lesson_id).await?.is_none() {
        return Ok(());
    }

    tx.upsert_current_polling(lesson_id, None)
        .await
        .store_context("LessonRoomState.upsert_current_polling", lesson_id)?;
    tx.upsert_all_member_states_by_type(lesson_id, MemberStateType::PollingAnswer, &StateValue::default())
        .await
        .store_context("LessonMemberState.upsert_all_by_type", lesson_id)?;

    info!(lesson_id, "Polling reset");
    Ok(())
}

async fn current_polling(
    tx: &mut dyn StoreTx,
    lesson_id: &str,
) -> LiveRoomResult<Option<liveroom_db::models::CurrentPolling>> {
    Ok(load_room_state(tx, lesson_id)
        .await?
        .and_then(|state| state.current_polling))
}

fn answers_filter(lesson_id: &str, user_id: Option<&str>) -> MemberStatesFilter {
    MemberStatesFilter {
        lesson_id: Some(lesson_id.to_string()),
        user_id: user_id.map(str::to_string),
        state_type: Some(MemberStateType::PollingAnswer),
    }
}
