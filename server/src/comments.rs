use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    AppState, connection::ConnectionManager, db_mongo::models::CommentSummary,
    error::ServiceError,
};

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentSummary>,
}

/// Fetch at most `limit` summaries from `collection`, in whatever order the
/// store returns them.
pub async fn list_summaries(
    connections: &ConnectionManager,
    collection: &str,
    limit: u32,
) -> Result<Vec<CommentSummary>, ServiceError> {
    let db = connections.current_handle().await.ok_or_else(|| {
        ServiceError::Unavailable("MongoDB connection not established".to_string())
    })?;

    let summaries = db
        .find_summaries(collection, limit)
        .await
        .map_err(|e| ServiceError::Internal(format!("Error fetching comments: {}", e)))?;

    tracing::debug!(collection, count = summaries.len(), "Fetched comment summaries");
    Ok(summaries)
}

pub async fn mflix_comments(
    State(state): State<AppState>,
) -> Result<Json<CommentsResponse>, ServiceError> {
    let comments = list_summaries(
        &state.connections,
        &state.comments.collection,
        state.comments.limit,
    )
    .await?;

    Ok(Json(CommentsResponse { comments }))
}
