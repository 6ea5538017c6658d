use bson::DateTime;
use liveroom_db::models::{CompositeRecordingState, WhiteboardZoomState};
use tracing::{debug, info};

use super::load_room_state;
use crate::live_room::command::StateModifyCommand;
use crate::live_room::error::{LiveRoomError, LiveRoomResult, StoreContext};
use crate::store::StoreTx;

pub(crate) async fn spotlight(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    user_id: Option<&str>,
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    tx.set_spotlight(lesson_id, user_id)
        .await
        .store_context("LessonRoomState.set_spotlight", lesson_id)?;
    debug!(lesson_id, spotlighted_user = ?user_id, "Spotlight updated");
    Ok(())
}

pub(crate) async fn whiteboard_zoom_state(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    zoom: &WhiteboardZoomState,
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    tx.upsert_whiteboard_zoom_state(lesson_id, zoom)
        .await
        .store_context("LessonRoomState.upsert_whiteboard_zoom_state", lesson_id)
}

pub(crate) async fn upsert_session_time(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    tx.upsert_session_time(lesson_id, DateTime::now())
        .await
        .store_context("LessonRoomState.upsert_session_time", lesson_id)
}

pub(crate) async fn request_recording(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    let current = load_room_state(tx, lesson_id).await?.and_then(|s| s.recording);

    if let Some(recording) = current.as_ref().filter(|r| r.is_recording) {
        if recording.creator.as_deref() != Some(command.commander_id.as_str()) {
            return Err(LiveRoomError::state(format!(
                "lesson {lesson_id} is already being recorded by {}",
                recording.creator.as_deref().unwrap_or("another user")
            )));
        }
        return Ok(());
    }

    let recording = CompositeRecordingState {
        is_recording: true,
        creator: Some(command.commander_id.clone()),
        started_at: Some(DateTime::now()),
    };
    tx.upsert_recording_state(lesson_id, Some(&recording))
        .await
        .store_context("LessonRoomState.upsert_recording_state", lesson_id)?;

    info!(lesson_id, creator = %command.commander_id, "Recording started");
    Ok(())
}

/// Only whoever started the recording may stop it.
pub(crate) async fn stop_recording(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    let current = load_room_state(tx, lesson_id).await?.and_then(|s| s.recording);

    let Some(recording) = current.filter(|r| r.is_recording) else {
        return Err(LiveRoomError::state(format!(
            "lesson {lesson_id} is not being recorded"
        )));
    };
    if recording.creator.as_deref() != Some(command.commander_id.as_str()) {
        return Err(LiveRoomError::permission_denied(format!(
            "user {} did not start the recording",
            command.commander_id
        )));
    }

    tx.upsert_recording_state(lesson_id, None)
        .await
        .store_context("LessonRoomState.upsert_recording_state", lesson_id)?;

    info!(lesson_id, creator = %command.commander_id, "Recording stopped");
    Ok(())
}

pub(crate) async fn clear_recording(
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();
    tx.upsert_recording_state(lesson_id, None)
        .await
        .store_context("LessonRoomState.upsert_recording_state", lesson_id)
}
