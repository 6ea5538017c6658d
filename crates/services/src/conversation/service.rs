use std::collections::HashMap;
use std::sync::Arc;

use bson::DateTime;
use liveroom_config::ConversationSettings;
use liveroom_db::models::{ConversationType, LiveLessonConversation};
use tracing::{debug, info, warn};

use super::{ConversationProvider, ConversationStore};
use crate::concurrency::bounded_map;
use crate::live_room::{LiveRoomError, LiveRoomResult, StoreContext};

/// Result of a private-conversation fan-out. Partial success is normal:
/// `error` summarizes every failed participant and is `None` only when all
/// of them resolved.
#[derive(Debug, Default)]
pub struct PrivateConversations {
    /// Participant id to conversation id.
    pub conversation_ids: HashMap<String, String>,
    pub failed_participants: Vec<String>,
    pub error: Option<LiveRoomError>,
}

#[derive(Clone)]
pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
    provider: Arc<dyn ConversationProvider>,
    settings: ConversationSettings,
}

impl ConversationService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        provider: Arc<dyn ConversationProvider>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
        }
    }

    /// Resolves one private conversation between the caller and each other
    /// participant, creating the missing ones.
    pub async fn get_private_conversation_ids(
        &self,
        lesson_id: &str,
        caller_id: &str,
        participant_ids: &[String],
    ) -> LiveRoomResult<PrivateConversations> {
        let mut targets: Vec<String> = participant_ids
            .iter()
            .filter(|id| id.as_str() != caller_id)
            .cloned()
            .collect();
        targets.sort();
        targets.dedup();
        if targets.is_empty() {
            return Err(LiveRoomError::validation(
                "at least one participant other than the caller is required",
            ));
        }

        let total = targets.len();
        let limit = self.settings.max_concurrency.min(total);
        debug!(lesson_id, caller_id, total, limit, "Resolving private conversations");

        let outcome = bounded_map(targets, limit, |participant: String| {
            let service = self.clone();
            let lesson_id = lesson_id.to_string();
            let pair = vec![caller_id.to_string(), participant];
            async move { service.get_or_create_private_conversation(&lesson_id, &pair).await }
        })
        .await;

        let mut result = PrivateConversations {
            conversation_ids: outcome.succeeded.into_iter().collect(),
            ..Default::default()
        };

        let mut failures = outcome.failed;
        failures.sort_by(|a, b| a.0.cmp(&b.0));
        if !failures.is_empty() {
            let details = failures
                .iter()
                .map(|(participant, error)| format!("{participant}: {error}"))
                .collect::<Vec<_>>()
                .join("; ");
            for (participant, error) in &failures {
                warn!(lesson_id, user_id = %participant, %error, "Private conversation failed");
            }
            result.failed_participants = failures.into_iter().map(|(p, _)| p).collect();
            result.error = Some(LiveRoomError::Aggregate {
                failed: result.failed_participants.len(),
                total,
                details,
            });
        }

        info!(
            lesson_id,
            caller_id,
            resolved = result.conversation_ids.len(),
            failed = result.failed_participants.len(),
            "Private conversations resolved"
        );
        Ok(result)
    }

    /// Looks up the private conversation of exactly `participant_ids` in the
    /// lesson, creating it on a miss.
    pub async fn get_or_create_private_conversation(
        &self,
        lesson_id: &str,
        participant_ids: &[String],
    ) -> LiveRoomResult<String> {
        let participants = LiveLessonConversation::normalize_participants(participant_ids.iter().cloned());

        let existing = self
            .store
            .find(lesson_id, ConversationType::Private, Some(participants.as_slice()))
            .await
            .store_context("LiveLessonConversation.find", lesson_id)?;
        if let Some(conversation) = existing {
            return Ok(conversation.conversation_id);
        }

        self.create(lesson_id, ConversationType::Private, participants).await
    }

    /// Looks up the lesson's shared conversation. An existing one grows to
    /// the union of its members and `participant_ids`; it never shrinks.
    pub async fn get_or_create_public_conversation(
        &self,
        lesson_id: &str,
        caller_id: &str,
        participant_ids: &[String],
    ) -> LiveRoomResult<String> {
        let requested = LiveLessonConversation::normalize_participants(
            participant_ids.iter().cloned().chain([caller_id.to_string()]),
        );

        let existing = self
            .store
            .find(lesson_id, ConversationType::Public, None)
            .await
            .store_context("LiveLessonConversation.find", lesson_id)?;
        let Some(conversation) = existing else {
            return self.create(lesson_id, ConversationType::Public, requested).await;
        };

        let added: Vec<String> = requested
            .into_iter()
            .filter(|id| !conversation.participant_ids.contains(id))
            .collect();
        if added.is_empty() {
            return Ok(conversation.conversation_id);
        }

        self.provider
            .add_members(&conversation.conversation_id, &added)
            .await
            .map_err(|source| LiveRoomError::Provider {
                op: "ConversationProvider.add_members",
                source,
            })?;

        let union = LiveLessonConversation::normalize_participants(
            conversation.participant_ids.iter().chain(added.iter()).cloned(),
        );
        self.store
            .update_participants(&conversation.conversation_id, &union)
            .await
            .store_context("LiveLessonConversation.update_participants", lesson_id)?;

        debug!(
            lesson_id,
            conversation_id = %conversation.conversation_id,
            added = added.len(),
            "Public conversation grown"
        );
        Ok(conversation.conversation_id)
    }

    async fn create(
        &self,
        lesson_id: &str,
        conversation_type: ConversationType,
        participant_ids: Vec<String>,
    ) -> LiveRoomResult<String> {
        let name = format!("{lesson_id}-{}", conversation_type.as_str());
        let conversation_id = self
            .provider
            .create_conversation(&name, &participant_ids)
            .await
            .map_err(|source| LiveRoomError::Provider {
                op: "ConversationProvider.create_conversation",
                source,
            })?;

        let now = DateTime::now();
        let record = LiveLessonConversation {
            id: None,
            lesson_id: lesson_id.to_string(),
            conversation_id: conversation_id.clone(),
            conversation_type,
            participant_ids,
            created_at: now,
            updated_at: now,
        };
        self.store
            .insert(&record)
            .await
            .store_context("LiveLessonConversation.insert", lesson_id)?;

        debug!(lesson_id, conversation_id = %conversation_id, "Conversation created");
        Ok(conversation_id)
    }
}
