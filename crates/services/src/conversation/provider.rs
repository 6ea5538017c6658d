use async_trait::async_trait;
use liveroom_config::ConversationSettings;
use serde::{Deserialize, Serialize};

use super::ConversationProvider;

#[derive(Debug, Serialize)]
struct CreateConversationRequest<'a> {
    name: &'a str,
    member_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CreateConversationResponse {
    conversation_id: String,
}

#[derive(Debug, Serialize)]
struct AddMembersRequest<'a> {
    member_ids: &'a [String],
}

/// Talks to the chat service over its JSON HTTP API.
pub struct HttpConversationProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpConversationProvider {
    pub fn new(settings: &ConversationSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.provider_url.trim_end_matches('/').to_string(),
            api_key: settings.provider_api_key.clone(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl ConversationProvider for HttpConversationProvider {
    async fn create_conversation(&self, name: &str, member_ids: &[String]) -> anyhow::Result<String> {
        let resp = self
            .authorize(self.client.post(format!("{}/conversations", self.base_url)))
            .json(&CreateConversationRequest { name, member_ids })
            .send()
            .await?
            .error_for_status()?
            .json::<CreateConversationResponse>()
            .await?;
        Ok(resp.conversation_id)
    }

    async fn add_members(&self, conversation_id: &str, member_ids: &[String]) -> anyhow::Result<()> {
        self.authorize(self.client.post(format!(
            "{}/conversations/{}/members",
            self.base_url, conversation_id
        )))
        .json(&AddMembersRequest { member_ids })
        .send()
        .await?
        .error_for_status()?;
        Ok(())
    }
}
