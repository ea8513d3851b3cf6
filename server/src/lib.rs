pub mod comments;
pub mod config;
pub mod connection;
pub mod db_mongo;
pub mod error;
pub mod health;
pub mod startup;
pub mod telemetry;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{config::CommentsSettings, connection::ConnectionManager};

#[derive(Clone)]
pub struct AppState {
    pub connections: Arc<ConnectionManager>,
    pub comments: CommentsSettings,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/test_db", get(health::test_db))
        .route("/mflix_comments", get(comments::mflix_comments))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
