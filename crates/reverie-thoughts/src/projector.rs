//! Projection of a thought into the document shape the vector index expects.
//!
//! The document is the thought's `content` with a fixed set of record
//! attributes laid over it. Of those attributes, everything listed in
//! [`NON_TENSOR_FIELDS`] is exact-match metadata; the brief and all of the
//! content are embedded for semantic search.

use serde_json::Value;

use reverie_index::Document;

use crate::types::Thought;

/// Fields the index keeps as filterable metadata instead of embedding.
pub const NON_TENSOR_FIELDS: [&str; 5] =
    ["type", "bot_id", "subject_id", "subject_type", "importance"];

/// Build the index document for a thought.
///
/// Record attributes are written after `content`, so they win when a content
/// key collides with one of them. Absent type and subject project as `null`.
pub fn project(thought: &Thought) -> Document {
    let mut doc = thought.content.clone();

    let type_name = thought
        .kind
        .type_name()
        .map_or(Value::Null, |name| Value::String(name.to_string()));
    let (subject_type, subject_id) = match &thought.subject {
        Some(subject) => (
            Value::String(subject.kind().as_str().to_string()),
            Value::String(subject.id().to_string()),
        ),
        None => (Value::Null, Value::Null),
    };

    doc.insert("type".to_string(), type_name);
    doc.insert("brief".to_string(), Value::String(thought.brief.clone()));
    doc.insert(
        "bot_id".to_string(),
        Value::String(thought.bot_id.to_string()),
    );
    doc.insert("subject_id".to_string(), subject_id);
    doc.insert("subject_type".to_string(), subject_type);
    doc.insert("importance".to_string(), Value::from(thought.importance));

    doc
}
