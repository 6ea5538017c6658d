use liveroom_config::Settings;
use liveroom_db::indexes::ensure_indexes;
use mongodb::Database;

/// A throwaway MongoDB database with indexes in place.
///
/// Requires a running MongoDB replica set (transactions need one).
/// Set LIVEROOM__DATABASE__URL to override the connection string.
pub struct TestDb {
    pub db: Database,
    pub settings: Settings,
}

impl TestDb {
    pub async fn spawn() -> anyhow::Result<Self> {
        let mut settings = Settings::load()?;
        if let Ok(url) = std::env::var("LIVEROOM__DATABASE__URL") {
            settings.database.url = url;
        }
        settings.database.name = format!("liveroom_test_{}", uuid::Uuid::new_v4().simple());

        let db = liveroom_db::connect(&settings).await?;
        ensure_indexes(&db).await?;
        Ok(Self { db, settings })
    }

    pub async fn teardown(self) -> anyhow::Result<()> {
        self.db.drop().await?;
        Ok(())
    }
}
