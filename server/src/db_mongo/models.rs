use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A stored comment reduced to the two fields the API exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSummary {
    pub name: String,
    pub text: String,
}

impl CommentSummary {
    pub const FIELDS: [&'static str; 2] = ["name", "text"];

    /// Projection that keeps `name` and `text` and suppresses `_id`.
    pub fn projection() -> Document {
        doc! { "name": 1, "text": 1, "_id": 0 }
    }

    /// Decode an already-projected document. A field that is missing or is not
    /// a string is a serialization failure.
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        Ok(mongodb::bson::from_document(document)?)
    }
}
