use bson::Document;
use liveroom_config::Settings;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::{info, warn};

pub async fn connect(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&settings.database.url).await?;
    client_options.app_name = Some("liveroom".to_string());

    if let Some(max_pool) = settings.database.max_pool_size {
        client_options.max_pool_size = Some(max_pool);
    }
    if let Some(min_pool) = settings.database.min_pool_size {
        client_options.min_pool_size = Some(min_pool);
    }

    let client = Client::with_options(client_options)?;

    // Room-state commands run in multi-document transactions, which a
    // standalone server rejects.
    let hello = client
        .database("admin")
        .run_command(bson::doc! { "hello": 1 })
        .await?;
    let replica_set = hello.get_str("setName").ok();
    if !supports_transactions(&hello) {
        warn!(
            db = %settings.database.name,
            "MongoDB is a standalone server; room-state commands will fail to open transactions"
        );
    }

    info!(db = %settings.database.name, replica_set, "Connected to MongoDB");

    Ok(client.database(&settings.database.name))
}

/// Whether a `hello` reply comes from a replica-set member or a mongos router.
fn supports_transactions(hello: &Document) -> bool {
    hello.get_str("setName").is_ok() || hello.get_str("msg").is_ok_and(|msg| msg == "isdbgrid")
}
