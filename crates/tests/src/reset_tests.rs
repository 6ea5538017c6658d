use liveroom_db::models::{MemberStateType, WhiteboardZoomState};
use liveroom_services::StoreOp;
use liveroom_services::live_room::{
    CommandKind, LiveRoomError, MaterialToShare, reset_all_states_sequence,
};

use crate::fixtures::test_room::{LEARNER_A, LEARNER_B, TestRoom, answer};

fn custom_zoom() -> WhiteboardZoomState {
    WhiteboardZoomState {
        pdf_scale_ratio: 200.0,
        center_x: 10.0,
        center_y: 20.0,
        pdf_width: 1024.0,
        pdf_height: 768.0,
    }
}

/// Puts every piece of room and member state into a non-default value.
async fn busy_room() -> TestRoom {
    let room = TestRoom::spawn();
    room.teacher(CommandKind::ShareMaterial(Some(MaterialToShare::new("media-1"))))
        .await
        .unwrap();
    room.run(
        LEARNER_A,
        CommandKind::UpdateHandsUp {
            user_id: LEARNER_A.into(),
            value: true,
        },
    )
    .await
    .unwrap();
    room.teacher(CommandKind::UpdateAnnotation {
        user_ids: vec![LEARNER_A.into(), LEARNER_B.into()],
        value: true,
    })
    .await
    .unwrap();
    room.teacher(CommandKind::UpdateChat {
        user_ids: vec![LEARNER_B.into()],
        value: false,
    })
    .await
    .unwrap();
    room.start_poll().await.unwrap();
    room.run(LEARNER_A, answer(LEARNER_A, &["A"])).await.unwrap();
    room.teacher(CommandKind::WhiteboardZoomState(custom_zoom()))
        .await
        .unwrap();
    room.teacher(CommandKind::Spotlight {
        user_id: Some(LEARNER_B.into()),
    })
    .await
    .unwrap();
    room.teacher(CommandKind::RequestRecording).await.unwrap();
    room
}

fn flag(room: &TestRoom, user_id: &str, state_type: MemberStateType) -> bool {
    room.member_state(user_id, state_type).unwrap().bool_value
}

#[test]
fn sequence_order_is_fixed() {
    let names: Vec<_> = reset_all_states_sequence().iter().map(CommandKind::name).collect();
    assert_eq!(
        names,
        vec![
            "StopSharingMaterial",
            "DisableAllAnnotation",
            "FoldHandAll",
            "ResetPolling",
            "WhiteboardZoomState",
            "Spotlight",
            "ResetAllChat",
            "ClearRecording",
        ]
    );
}

#[tokio::test]
async fn reset_all_states_restores_defaults() {
    let room = busy_room().await;

    room.teacher(CommandKind::ResetAllStates).await.unwrap();

    let state = room.room_state().unwrap();
    assert!(state.current_material.is_none());
    assert!(state.current_polling.is_none());
    assert_eq!(state.whiteboard_zoom_state, WhiteboardZoomState::default());
    assert!(state.spotlighted_user.is_none());
    assert!(state.recording.is_none());

    assert!(!flag(&room, LEARNER_A, MemberStateType::HandsUp));
    assert!(!flag(&room, LEARNER_A, MemberStateType::Annotation));
    assert!(!flag(&room, LEARNER_B, MemberStateType::Annotation));
    assert!(flag(&room, LEARNER_B, MemberStateType::Chat));
    let answers = room.member_state(LEARNER_A, MemberStateType::PollingAnswer).unwrap();
    assert!(answers.string_array_value.is_empty());
    assert!(room.pollings().is_empty());
}

#[tokio::test]
async fn failing_sub_command_rolls_back_the_whole_reset() {
    let room = busy_room().await;
    let before = room.room_state().unwrap();

    room.store.fail_on(StoreOp::UpsertCurrentPolling);
    let err = room.teacher(CommandKind::ResetAllStates).await.unwrap_err();
    assert!(matches!(err, LiveRoomError::Store { .. }));

    // Sub-commands that ran before the failure left nothing behind.
    assert_eq!(room.room_state().unwrap(), before);
    assert!(flag(&room, LEARNER_A, MemberStateType::HandsUp));
    assert!(flag(&room, LEARNER_A, MemberStateType::Annotation));
    assert!(!flag(&room, LEARNER_B, MemberStateType::Chat));

    room.store.clear_failures();
    room.teacher(CommandKind::ResetAllStates).await.unwrap();
    assert!(room.room_state().unwrap().current_material.is_none());
}

#[tokio::test]
async fn failed_commit_leaves_state_untouched() {
    let room = busy_room().await;

    room.store.fail_on(StoreOp::Commit);
    let err = room.teacher(CommandKind::ResetAllStates).await.unwrap_err();
    assert!(err.to_string().contains("StoreTx.commit"));

    assert_eq!(
        room.room_state().unwrap().current_material.unwrap().media_id,
        "media-1"
    );
}

#[tokio::test]
async fn reset_on_an_empty_room_succeeds() {
    let room = TestRoom::spawn();

    room.teacher(CommandKind::ResetAllStates).await.unwrap();

    let state = room.room_state().unwrap();
    assert_eq!(state.whiteboard_zoom_state, WhiteboardZoomState::default());
    assert!(room.member_state(LEARNER_A, MemberStateType::Chat).is_none());
}
