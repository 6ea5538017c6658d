use liveroom_db::models::WhiteboardZoomState;
use liveroom_services::live_room::CommandKind;

use crate::fixtures::test_room::{LEARNER_A, TEACHER, TestRoom};

const ADMIN: &str = "school-admin-1";

#[tokio::test]
async fn spotlight_is_set_and_cleared() {
    let room = TestRoom::spawn();

    room.teacher(CommandKind::Spotlight {
        user_id: Some(LEARNER_A.into()),
    })
    .await
    .unwrap();
    assert_eq!(room.room_state().unwrap().spotlighted_user.as_deref(), Some(LEARNER_A));

    room.teacher(CommandKind::Spotlight { user_id: None }).await.unwrap();
    assert!(room.room_state().unwrap().spotlighted_user.is_none());
}

#[tokio::test]
async fn whiteboard_zoom_is_stored_verbatim() {
    let room = TestRoom::spawn();
    let zoom = WhiteboardZoomState {
        pdf_scale_ratio: 150.0,
        center_x: 0.25,
        center_y: -0.5,
        pdf_width: 800.0,
        pdf_height: 600.0,
    };

    room.teacher(CommandKind::WhiteboardZoomState(zoom.clone()))
        .await
        .unwrap();

    assert_eq!(room.room_state().unwrap().whiteboard_zoom_state, zoom);
}

#[tokio::test]
async fn session_time_moves_forward() {
    let room = TestRoom::spawn();

    room.teacher(CommandKind::UpsertSessionTime).await.unwrap();
    let first = room.room_state().unwrap().session_time.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    room.teacher(CommandKind::UpsertSessionTime).await.unwrap();
    let second = room.room_state().unwrap().session_time.unwrap();

    assert!(second > first);
}

#[tokio::test]
async fn only_the_creator_stops_a_recording() {
    let room = TestRoom::spawn();

    room.teacher(CommandKind::RequestRecording).await.unwrap();
    let state = room.room_state().unwrap();
    assert!(state.is_recording());
    assert_eq!(state.recording.unwrap().creator.as_deref(), Some(TEACHER));

    let err = room.run(ADMIN, CommandKind::RequestRecording).await.unwrap_err();
    assert!(err.is_state_violation());

    let err = room.run(ADMIN, CommandKind::StopRecording).await.unwrap_err();
    assert!(err.is_permission_denied());
    assert!(room.room_state().unwrap().is_recording());

    room.teacher(CommandKind::StopRecording).await.unwrap();
    assert!(!room.room_state().unwrap().is_recording());

    let err = room.teacher(CommandKind::StopRecording).await.unwrap_err();
    assert!(err.is_state_violation());
}

#[tokio::test]
async fn clear_recording_ignores_the_creator() {
    let room = TestRoom::spawn();
    room.teacher(CommandKind::RequestRecording).await.unwrap();

    room.run(ADMIN, CommandKind::ClearRecording).await.unwrap();

    assert!(room.room_state().unwrap().recording.is_none());
}
