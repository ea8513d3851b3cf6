pub mod models;
pub mod queries;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{Client, Database, bson::doc, options::ConnectionString};

use crate::error::StoreError;
use models::CommentSummary;

/// Database used when the connection string carries no path segment.
pub const DEFAULT_DATABASE: &str = "sample_mflix";

/// Shared, read-only handle to one selected database.
pub type DatabaseHandle = Arc<dyn DocumentStore>;

/// Opens connections to a document store.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a client for `uri` and select `database`. Does not ping.
    async fn open(&self, uri: &str, database: &str) -> Result<DatabaseHandle, StoreError>;
}

/// Operations the service performs against a selected database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &str;

    /// No-op administrative round trip.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_summaries(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<CommentSummary>, StoreError>;

    async fn close(&self);
}

/// Resolve the target database from the path segment of a connection string.
///
/// `mongodb://host/foo` resolves to `foo`, percent-decoded the same way the
/// driver decodes it. A missing, empty or unparseable path falls back to
/// [`DEFAULT_DATABASE`]. Parsing is syntactic only; SRV records are not looked up.
pub fn resolve_database_name(uri: &str) -> String {
    ConnectionString::parse(uri)
        .ok()
        .and_then(|parsed| parsed.default_database)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
}

/// [`Connector`] backed by the official MongoDB driver.
#[derive(Debug, Clone, Default)]
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    async fn open(&self, uri: &str, database: &str) -> Result<DatabaseHandle, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        Ok(Arc::new(MongoStore { client, db }))
    }
}

#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn name(&self) -> &str {
        self.db.name()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_summaries(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<CommentSummary>, StoreError> {
        queries::find_comment_summaries(&self.db, collection, limit).await
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
