use anyhow::Result;
use bson::doc;
use mongodb::{options::ClientOptions, Client, Database};
use tracing::info;

/// Connects to MongoDB and returns a handle to the application database.
/// Called once at startup; every request reuses the same handle read-only
/// via `AppState`.
pub async fn connect(uri: &str, database: &str) -> Result<Database> {
    info!("Connecting to MongoDB...");

    let options = ClientOptions::parse(uri).await?;
    let client = Client::with_options(options)?;
    let db = client.database(database);

    // Ping up front so a dead server aborts startup, not the first request.
    db.run_command(doc! { "ping": 1 }, None).await?;

    info!("MongoDB connection established");
    Ok(db)
}
