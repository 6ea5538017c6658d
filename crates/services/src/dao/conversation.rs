use async_trait::async_trait;
use bson::doc;
use liveroom_db::models::{ConversationType, LiveLessonConversation};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};
use crate::conversation::ConversationStore;

pub struct ConversationDao {
    pub base: BaseDao<LiveLessonConversation>,
}

impl ConversationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, LiveLessonConversation::COLLECTION),
        }
    }
}

#[async_trait]
impl ConversationStore for ConversationDao {
    async fn find(
        &self,
        lesson_id: &str,
        conversation_type: ConversationType,
        participant_ids: Option<&[String]>,
    ) -> DaoResult<Option<LiveLessonConversation>> {
        let mut filter = doc! {
            "lesson_id": lesson_id,
            "conversation_type": conversation_type.as_str(),
        };
        // Stored lists are normalized, so an exact array match finds the pair.
        if let Some(ids) = participant_ids {
            filter.insert("participant_ids", ids);
        }
        self.base.find_one(filter).await
    }

    async fn insert(&self, conversation: &LiveLessonConversation) -> DaoResult<()> {
        self.base.insert_one(conversation).await?;
        Ok(())
    }

    async fn update_participants(
        &self,
        conversation_id: &str,
        participant_ids: &[String],
    ) -> DaoResult<()> {
        let updated = self
            .base
            .update_one(
                doc! { "conversation_id": conversation_id },
                doc! { "$set": { "participant_ids": participant_ids } },
            )
            .await?;
        if !updated {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
