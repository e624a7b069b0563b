//! Thought lifecycle with vector index synchronization.
//!
//! Every write goes to the record store first. Only after it has succeeded is
//! the vector index called, exactly once:
//!
//! ```text
//! create/update:  validate → resolve subject → write record → project → index.store
//! destroy:        delete record → index.delete
//! ```
//!
//! Index failures are logged and reported in [`IndexSync`], never returned as
//! errors. A failed sync leaves the index stale or missing an entry until it
//! is repaired by other means; there is no retry.

use std::sync::Arc;

use tracing::{debug, error, info};

use reverie_index::SharedIndex;

use crate::error::{Result, ThoughtError};
use crate::projector::{self, NON_TENSOR_FIELDS};
use crate::store::{THOUGHTS_TABLE, ThoughtStore};
use crate::subject::SubjectResolver;
use crate::types::{
    BotId, DEFAULT_IMPORTANCE, NewThought, Subject, Thought, ThoughtId, ThoughtKind, ThoughtUpdate,
};
use crate::validation::{ValidationError, validate_new_thought, validate_update};

/// What happened to the index side of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSync {
    /// The index call succeeded.
    Synced,
    /// The index call failed and was logged.
    Failed,
    /// No index is configured.
    Skipped,
}

/// A completed record-store write together with its index outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    pub value: T,
    pub index: IndexSync,
}

impl<T> Synced<T> {
    /// Discard the index outcome.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Service owning the thought lifecycle.
#[derive(Clone)]
pub struct ThoughtService {
    store: Arc<ThoughtStore>,
    index: Option<SharedIndex>,
}

impl std::fmt::Debug for ThoughtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThoughtService")
            .field("store", &self.store)
            .field("index", &self.index.as_ref().map(|i| i.name().to_string()))
            .finish()
    }
}

impl ThoughtService {
    /// Create a service over a store and an optional index.
    pub fn new(store: Arc<ThoughtStore>, index: Option<SharedIndex>) -> Self {
        match &index {
            Some(index) => info!("Thought service using {} index", index.name()),
            None => info!("Thought service running without a vector index"),
        }
        Self { store, index }
    }

    /// The underlying record store.
    pub fn store(&self) -> &Arc<ThoughtStore> {
        &self.store
    }

    /// Whether writes are mirrored to an index.
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a new thought and mirror it into the index.
    ///
    /// Validation and subject resolution errors abort the creation. If the
    /// subject was created by name and the insert then fails, the subject is
    /// kept.
    pub fn create(&self, params: NewThought) -> Result<Synced<Thought>> {
        validate_new_thought(&params)?;

        let subject = SubjectResolver::new(&self.store).resolve((&params).into())?;
        let thought = Self::build_thought(params, subject)?;

        self.store.insert_thought(&thought)?;
        info!("Created thought {} for bot {}", thought.id, thought.bot_id);

        let index = self.store_vector(&thought);
        Ok(Synced {
            value: thought,
            index,
        })
    }

    /// Apply an update and re-sync the index document.
    pub fn update(&self, id: ThoughtId, update: ThoughtUpdate) -> Result<Synced<Thought>> {
        validate_update(&update)?;

        let mut thought = self
            .store
            .get_thought(id)?
            .ok_or_else(|| ThoughtError::NotFound(format!("Thought {}", id)))?;

        update.apply(&mut thought);
        self.store.update_thought(&mut thought)?;
        debug!("Updated thought {}", thought.id);

        let index = self.store_vector(&thought);
        Ok(Synced {
            value: thought,
            index,
        })
    }

    /// Remove a thought and its index document.
    ///
    /// Returns the removed thought.
    pub fn destroy(&self, id: ThoughtId) -> Result<Synced<Thought>> {
        let thought = self
            .store
            .get_thought(id)?
            .ok_or_else(|| ThoughtError::NotFound(format!("Thought {}", id)))?;

        if !self.store.delete_thought(id)? {
            return Err(ThoughtError::NotFound(format!("Thought {}", id)));
        }
        info!("Destroyed thought {}", id);

        let index = self.delete_vector(id);
        Ok(Synced {
            value: thought,
            index,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get(&self, id: ThoughtId) -> Result<Option<Thought>> {
        self.store.get_thought(id)
    }

    pub fn list(&self, bot_id: Option<BotId>, limit: usize, offset: usize) -> Result<Vec<Thought>> {
        self.store.list_thoughts(bot_id, limit, offset)
    }

    pub fn list_about(&self, subject: &Subject, limit: usize) -> Result<Vec<Thought>> {
        self.store.list_thoughts_about(subject, limit)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Index synchronization
    // ─────────────────────────────────────────────────────────────────────────

    /// Push the thought's document to the index. Failures are logged only.
    fn store_vector(&self, thought: &Thought) -> IndexSync {
        let Some(index) = &self.index else {
            debug!("No index configured, skipping store for thought {}", thought.id);
            return IndexSync::Skipped;
        };

        let doc = projector::project(thought);
        match index.store(
            THOUGHTS_TABLE,
            &thought.id.to_string(),
            &doc,
            &NON_TENSOR_FIELDS,
        ) {
            Ok(()) => {
                debug!("Stored vector for thought {}", thought.id);
                IndexSync::Synced
            }
            Err(e) => {
                error!(error = %e, "Failed to store vector for thought {}", thought.id);
                IndexSync::Failed
            }
        }
    }

    /// Remove the thought's document from the index. Failures are logged only.
    fn delete_vector(&self, id: ThoughtId) -> IndexSync {
        let Some(index) = &self.index else {
            debug!("No index configured, skipping delete for thought {}", id);
            return IndexSync::Skipped;
        };

        match index.delete(THOUGHTS_TABLE, &id.to_string()) {
            Ok(()) => {
                debug!("Deleted vector for thought {}", id);
                IndexSync::Synced
            }
            Err(e) => {
                error!(error = %e, "Failed to delete vector for thought {}", id);
                IndexSync::Failed
            }
        }
    }

    fn build_thought(params: NewThought, subject: Option<Subject>) -> Result<Thought> {
        let bot_id = params.bot_id.ok_or(ValidationError::MissingBotId)?;
        let kind = ThoughtKind::from_type_name(params.kind.as_deref())?;

        let mut thought = Thought::new(bot_id, params.brief)
            .with_kind(kind)
            .with_content(params.content)
            .with_importance(params.importance.unwrap_or(DEFAULT_IMPORTANCE));
        thought.subject = subject;
        Ok(thought)
    }
}
