#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use mflix_server::{
    AppState,
    config::CommentsSettings,
    connection::{ConnectionConfig, ConnectionManager},
    db_mongo::{
        Connector, DatabaseHandle, DocumentStore, models::CommentSummary,
        queries::summary_find_options,
    },
    error::StoreError,
};
use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};

pub const TEST_URI: &str = "mongodb://fake-host:27017/sample_mflix";

/// In-memory stand-in for a MongoDB deployment. Counts every transport call.
#[derive(Default)]
pub struct FakeBackend {
    opens: AtomicUsize,
    pings: AtomicUsize,
    finds: AtomicUsize,
    closes: AtomicUsize,
    open_error: Mutex<Option<String>>,
    ping_error: Mutex<Option<String>>,
    documents: Mutex<Vec<Document>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_documents(documents: Vec<Document>) -> Arc<Self> {
        let backend = Self::new();
        *backend.documents.lock().unwrap() = documents;
        backend
    }

    pub fn fail_open(&self, message: &str) {
        *self.open_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_ping(&self, message: &str) {
        *self.ping_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn pings(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn transport_calls(&self) -> usize {
        self.opens() + self.pings() + self.finds() + self.closes()
    }
}

pub struct FakeConnector {
    backend: Arc<FakeBackend>,
}

impl FakeConnector {
    pub fn new(backend: &Arc<FakeBackend>) -> Arc<Self> {
        Arc::new(Self {
            backend: Arc::clone(backend),
        })
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn open(&self, _uri: &str, database: &str) -> Result<DatabaseHandle, StoreError> {
        self.backend.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.backend.open_error.lock().unwrap().clone() {
            return Err(StoreError::Connection(message));
        }
        Ok(Arc::new(FakeStore {
            name: database.to_string(),
            backend: Arc::clone(&self.backend),
        }))
    }
}

pub struct FakeStore {
    name: String,
    backend: Arc<FakeBackend>,
}

#[async_trait]
impl DocumentStore for FakeStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.backend.pings.fetch_add(1, Ordering::SeqCst);
        match self.backend.ping_error.lock().unwrap().clone() {
            Some(message) => Err(StoreError::Connection(message)),
            None => Ok(()),
        }
    }

    async fn find_summaries(
        &self,
        _collection: &str,
        limit: u32,
    ) -> Result<Vec<CommentSummary>, StoreError> {
        self.backend.finds.fetch_add(1, Ordering::SeqCst);
        // Apply the production find options the way the server would.
        let Some(options) = summary_find_options(limit) else {
            return Ok(Vec::new());
        };
        let bound = options.limit.map_or(usize::MAX, |n| n as usize);
        let projection = options.projection.unwrap_or_default();

        let documents = self.backend.documents.lock().unwrap().clone();
        documents
            .into_iter()
            .take(bound)
            .map(|document| CommentSummary::from_document(project(&document, &projection)))
            .collect()
    }

    async fn close(&self) {
        self.backend.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Inclusion projection: keep the keys set to 1, drop everything else.
fn project(document: &Document, projection: &Document) -> Document {
    if projection.is_empty() {
        return document.clone();
    }
    document
        .iter()
        .filter(|(key, _)| projection.get_i32(key.as_str()).ok() == Some(1))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Documents shaped like `sample_mflix.comments`.
pub fn comment_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            doc! {
                "_id": ObjectId::new(),
                "name": format!("Viewer {}", i),
                "email": format!("viewer{}@example.com", i),
                "movie_id": ObjectId::new(),
                "text": format!("Comment number {}", i),
                "date": DateTime::now(),
            }
        })
        .collect()
}

pub fn manager(backend: &Arc<FakeBackend>) -> Arc<ConnectionManager> {
    Arc::new(ConnectionManager::new(FakeConnector::new(backend)))
}

pub async fn connected_manager(backend: &Arc<FakeBackend>) -> Arc<ConnectionManager> {
    let manager = manager(backend);
    let state = manager
        .connect(&ConnectionConfig::new(Some(TEST_URI.to_string())))
        .await;
    assert!(state.is_connected(), "fake connect failed: {:?}", state);
    manager
}

pub fn test_state(connections: Arc<ConnectionManager>) -> AppState {
    AppState {
        connections,
        comments: CommentsSettings::default(),
    }
}

pub fn test_app(connections: Arc<ConnectionManager>) -> Router {
    mflix_server::app(test_state(connections))
}
