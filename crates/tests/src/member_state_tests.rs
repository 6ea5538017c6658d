use futures::future::join_all;
use liveroom_db::models::MemberStateType;
use liveroom_services::StoreOp;
use liveroom_services::live_room::{CommandKind, LiveRoomError};

use crate::fixtures::test_room::{LEARNER_A, LEARNER_B, OUTSIDER, TEACHER, TestRoom};

fn hands_up(user_id: &str, value: bool) -> CommandKind {
    CommandKind::UpdateHandsUp {
        user_id: user_id.to_string(),
        value,
    }
}

fn flag(room: &TestRoom, user_id: &str, state_type: MemberStateType) -> Option<bool> {
    room.member_state(user_id, state_type).map(|s| s.bool_value)
}

#[tokio::test]
async fn learner_raises_and_lowers_own_hand() {
    let room = TestRoom::spawn();

    room.run(LEARNER_A, hands_up(LEARNER_A, true)).await.unwrap();
    assert_eq!(flag(&room, LEARNER_A, MemberStateType::HandsUp), Some(true));

    room.run(LEARNER_A, hands_up(LEARNER_A, false)).await.unwrap();
    assert_eq!(flag(&room, LEARNER_A, MemberStateType::HandsUp), Some(false));
}

#[tokio::test]
async fn failed_hand_write_names_the_member() {
    let room = TestRoom::spawn();
    room.store.fail_on(StoreOp::UpsertMemberState);

    let err = room.run(LEARNER_A, hands_up(LEARNER_A, true)).await.unwrap_err();
    match &err {
        LiveRoomError::Store { lesson_id, user_id, .. } => {
            assert_eq!(lesson_id, &room.lesson_id);
            assert_eq!(user_id.as_deref(), Some(LEARNER_A));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains(LEARNER_A));
    assert!(room.member_state(LEARNER_A, MemberStateType::HandsUp).is_none());
}

#[tokio::test]
async fn learner_cannot_touch_another_hand() {
    let room = TestRoom::spawn();

    let err = room.run(LEARNER_A, hands_up(LEARNER_B, true)).await.unwrap_err();
    assert!(err.is_permission_denied());
    assert!(room.member_state(LEARNER_B, MemberStateType::HandsUp).is_none());
}

#[tokio::test]
async fn fold_hand_all_lowers_every_existing_hand() {
    let room = TestRoom::spawn();
    room.run(LEARNER_A, hands_up(LEARNER_A, true)).await.unwrap();
    room.run(LEARNER_B, hands_up(LEARNER_B, true)).await.unwrap();

    room.teacher(CommandKind::FoldHandAll).await.unwrap();

    assert_eq!(flag(&room, LEARNER_A, MemberStateType::HandsUp), Some(false));
    assert_eq!(flag(&room, LEARNER_B, MemberStateType::HandsUp), Some(false));
    assert!(room.member_state(OUTSIDER, MemberStateType::HandsUp).is_none());
}

#[tokio::test]
async fn teacher_folds_a_single_hand() {
    let room = TestRoom::spawn();
    room.run(LEARNER_A, hands_up(LEARNER_A, true)).await.unwrap();
    room.run(LEARNER_B, hands_up(LEARNER_B, true)).await.unwrap();

    room.run(TEACHER, hands_up(LEARNER_B, false)).await.unwrap();

    assert_eq!(flag(&room, LEARNER_A, MemberStateType::HandsUp), Some(true));
    assert_eq!(flag(&room, LEARNER_B, MemberStateType::HandsUp), Some(false));
}

#[tokio::test]
async fn annotation_updates_only_listed_users() {
    let room = TestRoom::spawn();

    room.teacher(CommandKind::UpdateAnnotation {
        user_ids: vec![LEARNER_A.into()],
        value: true,
    })
    .await
    .unwrap();

    assert_eq!(flag(&room, LEARNER_A, MemberStateType::Annotation), Some(true));
    assert!(room.member_state(LEARNER_B, MemberStateType::Annotation).is_none());

    room.teacher(CommandKind::UpdateAnnotation {
        user_ids: vec![LEARNER_A.into(), LEARNER_B.into()],
        value: true,
    })
    .await
    .unwrap();
    room.teacher(CommandKind::DisableAllAnnotation).await.unwrap();

    assert_eq!(flag(&room, LEARNER_A, MemberStateType::Annotation), Some(false));
    assert_eq!(flag(&room, LEARNER_B, MemberStateType::Annotation), Some(false));
}

#[tokio::test]
async fn empty_user_list_is_a_no_op() {
    let room = TestRoom::spawn();

    room.teacher(CommandKind::UpdateChat {
        user_ids: Vec::new(),
        value: false,
    })
    .await
    .unwrap();

    assert!(room.member_state(LEARNER_A, MemberStateType::Chat).is_none());
}

#[tokio::test]
async fn reset_all_chat_enables_chat_again() {
    let room = TestRoom::spawn();
    room.teacher(CommandKind::UpdateChat {
        user_ids: vec![LEARNER_A.into(), LEARNER_B.into()],
        value: false,
    })
    .await
    .unwrap();
    assert_eq!(flag(&room, LEARNER_B, MemberStateType::Chat), Some(false));

    room.teacher(CommandKind::ResetAllChat).await.unwrap();

    assert_eq!(flag(&room, LEARNER_A, MemberStateType::Chat), Some(true));
    assert_eq!(flag(&room, LEARNER_B, MemberStateType::Chat), Some(true));
}

#[tokio::test]
async fn concurrent_commands_on_different_rows_all_land() {
    let room = TestRoom::spawn();

    let results = join_all([
        room.run(LEARNER_A, hands_up(LEARNER_A, true)),
        room.run(LEARNER_B, hands_up(LEARNER_B, true)),
    ])
    .await;
    assert!(results.iter().all(Result::is_ok));

    assert_eq!(flag(&room, LEARNER_A, MemberStateType::HandsUp), Some(true));
    assert_eq!(flag(&room, LEARNER_B, MemberStateType::HandsUp), Some(true));
}
