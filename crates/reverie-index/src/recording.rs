//! In-memory index that records every call.
//!
//! Test double for anything that talks to a [`VectorIndex`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::backend::{Document, VectorIndex};
use crate::error::{IndexError, Result};

/// A single call observed by a [`RecordingIndex`].
#[derive(Debug, Clone, PartialEq)]
pub enum IndexCall {
    /// A `store` call with its full arguments.
    Store {
        index: String,
        id: String,
        doc: Document,
        non_tensor_fields: Vec<String>,
    },
    /// A `delete` call.
    Delete { index: String, id: String },
}

/// Recording vector index with optional failure injection.
///
/// Calls are recorded even when they are made to fail, so tests can assert
/// that an attempt happened exactly once.
#[derive(Debug, Default)]
pub struct RecordingIndex {
    calls: Mutex<Vec<IndexCall>>,
    documents: Mutex<HashMap<(String, String), Document>>,
    fail_store: AtomicBool,
    fail_delete: AtomicBool,
}

impl RecordingIndex {
    /// Create an empty index that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index whose `store` calls fail.
    pub fn failing_store() -> Self {
        let index = Self::new();
        index.set_fail_store(true);
        index
    }

    /// Create an index whose `delete` calls fail.
    pub fn failing_delete() -> Self {
        let index = Self::new();
        index.set_fail_delete(true);
        index
    }

    /// Toggle failure of `store` calls.
    pub fn set_fail_store(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `delete` calls.
    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// All calls in the order they were made.
    pub fn calls(&self) -> Vec<IndexCall> {
        self.calls.lock().clone()
    }

    /// Only the `store` calls.
    pub fn store_calls(&self) -> Vec<IndexCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, IndexCall::Store { .. }))
            .collect()
    }

    /// Only the `delete` calls.
    pub fn delete_calls(&self) -> Vec<IndexCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, IndexCall::Delete { .. }))
            .collect()
    }

    /// The document currently held for `id` in `index`.
    pub fn document(&self, index: &str, id: &str) -> Option<Document> {
        self.documents
            .lock()
            .get(&(index.to_string(), id.to_string()))
            .cloned()
    }

    /// Number of documents currently held.
    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    /// Whether no documents are held.
    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }
}

impl VectorIndex for RecordingIndex {
    fn store(
        &self,
        index: &str,
        id: &str,
        doc: &Document,
        non_tensor_fields: &[&str],
    ) -> Result<()> {
        self.calls.lock().push(IndexCall::Store {
            index: index.to_string(),
            id: id.to_string(),
            doc: doc.clone(),
            non_tensor_fields: non_tensor_fields.iter().map(|f| f.to_string()).collect(),
        });

        if self.fail_store.load(Ordering::SeqCst) {
            return Err(IndexError::Unavailable("store rejected".to_string()));
        }

        self.documents
            .lock()
            .insert((index.to_string(), id.to_string()), doc.clone());
        Ok(())
    }

    fn delete(&self, index: &str, id: &str) -> Result<()> {
        self.calls.lock().push(IndexCall::Delete {
            index: index.to_string(),
            id: id.to_string(),
        });

        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(IndexError::Unavailable("delete rejected".to_string()));
        }

        self.documents
            .lock()
            .remove(&(index.to_string(), id.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
