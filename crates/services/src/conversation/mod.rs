//! One-to-one and lesson-wide chat conversations for live lessons.

mod provider;
mod service;

use async_trait::async_trait;
use liveroom_db::models::{ConversationType, LiveLessonConversation};

use crate::dao::base::DaoResult;

pub use provider::HttpConversationProvider;
pub use service::{ConversationService, PrivateConversations};

/// Persisted mapping from a lesson's participant set to an external
/// conversation id.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// `participant_ids`, when given, must match the stored (normalized)
    /// list exactly. `None` matches on lesson and type only.
    async fn find(
        &self,
        lesson_id: &str,
        conversation_type: ConversationType,
        participant_ids: Option<&[String]>,
    ) -> DaoResult<Option<LiveLessonConversation>>;

    async fn insert(&self, conversation: &LiveLessonConversation) -> DaoResult<()>;

    async fn update_participants(
        &self,
        conversation_id: &str,
        participant_ids: &[String],
    ) -> DaoResult<()>;
}

/// External chat service that issues conversation ids.
#[async_trait]
pub trait ConversationProvider: Send + Sync {
    async fn create_conversation(&self, name: &str, member_ids: &[String]) -> anyhow::Result<String>;

    /// Adds members to an existing conversation.
    async fn add_members(&self, conversation_id: &str, member_ids: &[String]) -> anyhow::Result<()>;
}
