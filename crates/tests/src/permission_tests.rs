use liveroom_db::models::MemberStateType;
use liveroom_services::live_room::{CommandKind, LiveRoomError, StateModifyCommand};

use crate::fixtures::test_room::{LEARNER_A, OUTSIDER, TEACHER, TestRoom};

#[tokio::test]
async fn learner_teacher_command_is_rejected_without_mutation() {
    let room = TestRoom::spawn();

    for kind in [
        CommandKind::FoldHandAll,
        CommandKind::ResetAllStates,
        CommandKind::Spotlight {
            user_id: Some(LEARNER_A.into()),
        },
        CommandKind::UpdateChat {
            user_ids: vec![LEARNER_A.into()],
            value: false,
        },
    ] {
        let err = room.run(LEARNER_A, kind).await.unwrap_err();
        assert!(err.is_permission_denied(), "{err}");
    }

    assert!(room.room_state().is_none());
    assert!(room.member_state(LEARNER_A, MemberStateType::Chat).is_none());
}

#[tokio::test]
async fn student_outside_the_lesson_is_rejected() {
    let room = TestRoom::spawn();
    let err = room
        .run(OUTSIDER, CommandKind::UpsertSessionTime)
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn outsider_cannot_use_self_service_commands() {
    let room = TestRoom::spawn();
    let err = room
        .run(
            OUTSIDER,
            CommandKind::UpdateHandsUp {
                user_id: OUTSIDER.into(),
                value: true,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
    assert!(room.member_state(OUTSIDER, MemberStateType::HandsUp).is_none());
}

#[tokio::test]
async fn non_student_staff_may_act() {
    let room = TestRoom::spawn();
    tokio_test::assert_ok!(room.run("system-admin", CommandKind::UpsertSessionTime).await);
    assert!(room.room_state().unwrap().session_time.is_some());
}

#[tokio::test]
async fn unknown_lesson_is_reported() {
    let room = TestRoom::spawn();
    let command = StateModifyCommand::new(TEACHER, "no-such-lesson", CommandKind::FoldHandAll);

    let err = room
        .dispatcher
        .check_permission_and_dispatch(&command)
        .await
        .unwrap_err();
    assert!(matches!(err, LiveRoomError::LessonNotFound(ref id) if id == "no-such-lesson"));
}

#[tokio::test]
async fn checker_exposes_the_lesson() {
    let room = TestRoom::spawn();
    let checker = room.dispatcher.permission_checker(&room.lesson_id).await.unwrap();
    assert!(checker.lesson().is_teacher(TEACHER));
    assert!(checker.lesson().is_learner(LEARNER_A));
}
