use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub live_room: LiveRoomSettings,
    pub conversation: ConversationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Limits applied by the live-room command handlers.
#[derive(Debug, Deserialize, Clone)]
pub struct LiveRoomSettings {
    pub min_polling_options: usize,
    pub max_polling_options: usize,
}

impl Default for LiveRoomSettings {
    fn default() -> Self {
        Self {
            min_polling_options: 2,
            max_polling_options: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConversationSettings {
    /// Upper bound of concurrent lookups/creations during a fan-out.
    pub max_concurrency: usize,
    pub provider_url: String,
    pub provider_api_key: Option<String>,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 50,
            provider_url: "http://localhost:5050".to_string(),
            provider_api_key: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("LIVEROOM"),
            )
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "liveroom")?
            .set_default("live_room.min_polling_options", 2)?
            .set_default("live_room.max_polling_options", 10)?
            .set_default("conversation.max_concurrency", 50)?
            .set_default("conversation.provider_url", "http://localhost:5050")?
            .build()?;

        config.try_deserialize()
    }
}
