//! The vector index trait consumed by the thought service.

use std::sync::Arc;

use crate::error::Result;

/// A document as sent to the index: a flat JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Trait for external vector indexes.
///
/// Indexes embed the tensor fields of a document for semantic search and keep
/// the `non_tensor_fields` as exact-match metadata. Both operations are
/// blocking and are expected to be issued inline after a record-store write.
pub trait VectorIndex: Send + Sync {
    /// Store (or replace) the document `id` in `index`.
    fn store(
        &self,
        index: &str,
        id: &str,
        doc: &Document,
        non_tensor_fields: &[&str],
    ) -> Result<()>;

    /// Remove the document `id` from `index`.
    fn delete(&self, index: &str, id: &str) -> Result<()>;

    /// Short name of the implementation, for logs.
    fn name(&self) -> &str;
}

/// An index client shared across threads.
pub type SharedIndex = Arc<dyn VectorIndex>;
