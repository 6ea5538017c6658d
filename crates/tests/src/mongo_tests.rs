//! End-to-end runs against a real MongoDB replica set.
//!
//! Run with `cargo test -p liveroom-tests -- --ignored`.

use std::sync::Arc;

use liveroom_db::models::{
    ConversationType, LessonGroup, MemberStateType, PollingOption, User, UserGroup, VirtualLesson,
};
use liveroom_services::live_room::{CommandKind, MaterialToShare, StateModifyCommand};
use liveroom_services::{
    CommandDispatcher, ConversationDao, ConversationService, ConversationStore, LessonDao,
    MongoRoomStateStore, RoomStateStore, StoreTx, UserDao,
};

use crate::fixtures::FakeConversationProvider;
use crate::fixtures::test_db::TestDb;

async fn seed(test_db: &TestDb) -> anyhow::Result<CommandDispatcher> {
    let lessons = LessonDao::new(&test_db.db);
    let users = UserDao::new(&test_db.db);

    let mut lesson = VirtualLesson::new("lesson-1");
    lesson.teacher_ids = vec!["teacher-1".into()];
    lesson.learner_ids = vec!["learner-1".into()];
    lesson.lesson_group_id = Some("group-1".into());
    lessons.lessons.insert_one(&lesson).await?;
    lessons
        .groups
        .insert_one(&LessonGroup {
            id: "group-1".into(),
            media_ids: vec!["media-1".into()],
        })
        .await?;
    for (id, user_group) in [("teacher-1", UserGroup::Teacher), ("learner-1", UserGroup::Student)] {
        users
            .base
            .insert_one(&User {
                id: id.into(),
                name: id.into(),
                user_group,
            })
            .await?;
    }

    let lessons = Arc::new(lessons);
    Ok(CommandDispatcher::new(
        Arc::new(MongoRoomStateStore::new(&test_db.db)),
        lessons.clone(),
        Arc::new(users),
        lessons,
        test_db.settings.live_room.clone(),
    ))
}

fn cmd(commander: &str, kind: CommandKind) -> StateModifyCommand {
    StateModifyCommand::new(commander, "lesson-1", kind)
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn poll_and_reset_round_trip_through_mongo() {
    let test_db = TestDb::spawn().await.unwrap();
    let dispatcher = seed(&test_db).await.unwrap();
    let store = MongoRoomStateStore::new(&test_db.db);

    dispatcher
        .check_permission_and_dispatch(&cmd(
            "teacher-1",
            CommandKind::ShareMaterial(Some(MaterialToShare::new("media-1"))),
        ))
        .await
        .unwrap();
    dispatcher
        .check_permission_and_dispatch(&cmd(
            "teacher-1",
            CommandKind::StartPolling {
                question: "Q".into(),
                options: vec![PollingOption::new("A", true), PollingOption::new("B", false)],
            },
        ))
        .await
        .unwrap();
    dispatcher
        .check_permission_and_dispatch(&cmd(
            "learner-1",
            CommandKind::SubmitPollingAnswer {
                user_id: "learner-1".into(),
                answers: vec!["A".into()],
            },
        ))
        .await
        .unwrap();

    let err = dispatcher
        .check_permission_and_dispatch(&cmd("learner-1", CommandKind::FoldHandAll))
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());

    dispatcher
        .check_permission_and_dispatch(&cmd("teacher-1", CommandKind::ResetAllStates))
        .await
        .unwrap();

    let mut tx = store.begin().await.unwrap();
    let state = tx.get_room_state("lesson-1").await.unwrap().unwrap();
    assert!(state.current_material.is_none());
    assert!(state.current_polling.is_none());
    let answers = tx
        .get_member_states(&liveroom_db::models::MemberStatesFilter {
            lesson_id: Some("lesson-1".into()),
            user_id: Some("learner-1".into()),
            state_type: Some(MemberStateType::PollingAnswer),
        })
        .await
        .unwrap();
    assert!(answers[0].string_array_value.is_empty());
    tx.rollback().await.unwrap();

    test_db.teardown().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB replica set"]
async fn conversations_persist_in_mongo() {
    let test_db = TestDb::spawn().await.unwrap();
    let dao = Arc::new(ConversationDao::new(&test_db.db));
    let service = ConversationService::new(
        dao.clone(),
        Arc::new(FakeConversationProvider::new()),
        test_db.settings.conversation.clone(),
    );

    let result = service
        .get_private_conversation_ids("lesson-1", "teacher-1", &["learner-1".to_string(), "learner-2".to_string()])
        .await
        .unwrap();
    assert_eq!(result.conversation_ids.len(), 2);

    let pair = vec!["learner-1".to_string(), "teacher-1".to_string()];
    let stored = dao
        .find("lesson-1", ConversationType::Private, Some(pair.as_slice()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.conversation_id, result.conversation_ids["learner-1"]);

    test_db.teardown().await.unwrap();
}
