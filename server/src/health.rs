use axum::{Json, extract::State};
use serde::Serialize;

use crate::{AppState, connection::ConnectionManager, error::ServiceError};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World".to_string(),
    })
}

/// Ping the live handle. Every call goes to the network so a connection lost
/// after startup is reported.
pub async fn ping_database(connections: &ConnectionManager) -> Result<MessageResponse, ServiceError> {
    let db = connections.current_handle().await.ok_or_else(|| {
        ServiceError::Unavailable("MongoDB connection not established".to_string())
    })?;

    db.ping()
        .await
        .map_err(|e| ServiceError::Unavailable(format!("Failed to connect to MongoDB: {}", e)))?;

    Ok(MessageResponse {
        message: format!("Successfully connected to MongoDB! Database: {}", db.name()),
    })
}

pub async fn test_db(State(state): State<AppState>) -> Result<Json<MessageResponse>, ServiceError> {
    ping_database(&state.connections).await.map(Json)
}
