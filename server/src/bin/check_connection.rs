//! One-shot connectivity check against `MONGODB_URI`.

use anyhow::{Result, anyhow};
use mflix_server::{
    connection::{ConnectFailure, ConnectionConfig, ConnectionManager, ConnectionState},
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("warn");

    let connections = ConnectionManager::mongo();
    let outcome = match connections.connect(&ConnectionConfig::from_env()).await {
        ConnectionState::Connected(db) => {
            println!(
                "Pinged your deployment. You successfully connected to MongoDB! Database: {}",
                db.name()
            );
            Ok(())
        }
        ConnectionState::Failed(ConnectFailure::ConfigurationMissing) => {
            Err(anyhow!("MONGODB_URI not found in environment variables"))
        }
        ConnectionState::Failed(ConnectFailure::Connectivity(reason)) => Err(anyhow!(
            "An error occurred while connecting to MongoDB: {}",
            reason
        )),
        ConnectionState::Disconnected => Err(anyhow!("Connection was not attempted")),
    };

    connections.disconnect().await;
    outcome
}
