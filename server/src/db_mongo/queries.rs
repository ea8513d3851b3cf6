use mongodb::{Database, bson::{Document, doc}, options::FindOptions};

use super::models::CommentSummary;
use crate::error::StoreError;

/// Options for the bounded summary listing, or `None` when `limit` is zero.
///
/// The server reads `limit(0)` as "no limit", so zero never reaches it.
pub fn summary_find_options(limit: u32) -> Option<FindOptions> {
    if limit == 0 {
        return None;
    }

    Some(
        FindOptions::builder()
            .projection(CommentSummary::projection())
            .limit(i64::from(limit))
            .build(),
    )
}

pub async fn find_comment_summaries(
    db: &Database,
    collection: &str,
    limit: u32,
) -> Result<Vec<CommentSummary>, StoreError> {
    let Some(options) = summary_find_options(limit) else {
        return Ok(Vec::new());
    };

    let collection = db.collection::<Document>(collection);

    let mut cursor = collection
        .find(doc! {})
        .with_options(options)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

    let mut summaries = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
    {
        let document = cursor
            .deserialize_current()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        summaries.push(CommentSummary::from_document(document)?);
    }

    Ok(summaries)
}
