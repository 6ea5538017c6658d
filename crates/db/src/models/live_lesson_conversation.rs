use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiveLessonConversation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub lesson_id: String,
    pub conversation_id: String,
    pub conversation_type: ConversationType,
    /// Sorted and deduplicated.
    pub participant_ids: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConversationType {
    Public,
    Private,
}

impl ConversationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::Public => "public",
            ConversationType::Private => "private",
        }
    }
}

impl LiveLessonConversation {
    pub const COLLECTION: &'static str = "live_lesson_conversations";

    /// Sorts and deduplicates a participant list so the same set always maps
    /// to the same record.
    pub fn normalize_participants<I, S>(participants: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = participants.into_iter().map(Into::into).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
