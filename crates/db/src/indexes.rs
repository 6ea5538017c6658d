use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{LessonMemberState, LessonPolling, LessonRoomState, LiveLessonConversation};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // One room state per lesson
    create_indexes(
        db,
        LessonRoomState::COLLECTION,
        vec![index_unique(bson::doc! { "lesson_id": 1 })],
    )
    .await?;

    // Member states
    create_indexes(
        db,
        LessonMemberState::COLLECTION,
        vec![
            index_unique(bson::doc! { "lesson_id": 1, "user_id": 1, "state_type": 1 }),
            index(bson::doc! { "lesson_id": 1, "state_type": 1 }),
        ],
    )
    .await?;

    // Archived pollings
    create_indexes(
        db,
        LessonPolling::COLLECTION,
        vec![index(bson::doc! { "lesson_id": 1, "ended_at": -1 })],
    )
    .await?;

    // Live lesson conversations
    create_indexes(
        db,
        LiveLessonConversation::COLLECTION,
        vec![
            index(bson::doc! { "lesson_id": 1, "conversation_type": 1 }),
            index(bson::doc! { "lesson_id": 1, "conversation_type": 1, "participant_ids": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
