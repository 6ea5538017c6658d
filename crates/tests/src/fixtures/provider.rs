use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use liveroom_services::ConversationProvider;

/// Conversation provider that records calls and can be told to fail for
/// specific members.
#[derive(Default)]
pub struct FakeConversationProvider {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    failing: DashSet<String>,
    conversations: DashMap<String, Vec<String>>,
    latency: Option<Duration>,
}

impl FakeConversationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each create call sleeps for `latency`, so overlapping calls show up
    /// in [`Self::peak_in_flight`].
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn fail_for(&self, member_id: &str) {
        self.failing.insert(member_id.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn members(&self, conversation_id: &str) -> Option<Vec<String>> {
        self.conversations.get(conversation_id).map(|m| m.value().clone())
    }
}

#[async_trait]
impl ConversationProvider for FakeConversationProvider {
    async fn create_conversation(&self, name: &str, member_ids: &[String]) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(member) = member_ids.iter().find(|m| self.failing.contains(*m)) {
            anyhow::bail!("chat service unavailable for {member}");
        }

        let conversation_id = format!("conv-{}", uuid::Uuid::new_v4().simple());
        tracing::debug!(name, %conversation_id, "Fake conversation created");
        self.conversations
            .insert(conversation_id.clone(), member_ids.to_vec());
        Ok(conversation_id)
    }

    async fn add_members(&self, conversation_id: &str, member_ids: &[String]) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(mut members) = self.conversations.get_mut(conversation_id) else {
            anyhow::bail!("unknown conversation {conversation_id}");
        };
        members.extend(member_ids.iter().cloned());
        Ok(())
    }
}
