//! Thought records for Reverie.
//!
//! A thought is a short brief plus structured content, recorded by a bot and
//! optionally about a subject (a project or a person). Thoughts live in SQLite
//! and every write is mirrored into an external vector index for semantic
//! recall.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ThoughtService                                                         │
//! │  - validates, resolves the subject, writes the record                   │
//! │  - projects the record and syncs the vector index (log-and-continue)    │
//! ├────────────────────────────────┬────────────────────────────────────────┤
//! │  ThoughtStore (SQLite, WAL)    │  VectorIndex (reverie-index)           │
//! │  - thoughts                    │  - one document per thought            │
//! │  - projects, people            │  - keyed by thought id                 │
//! └────────────────────────────────┴────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use reverie_thoughts::{BotId, NewThought, ThoughtService, ThoughtStore};
//!
//! let store = Arc::new(ThoughtStore::open("reverie.db")?);
//! let service = ThoughtService::new(store, None);
//!
//! let thought = service
//!     .create(
//!         NewThought::new(BotId::new(), "Vision models struggle with hands")
//!             .subject_name("Project", "Hands Down"),
//!     )?
//!     .into_inner();
//!
//! println!("{}", thought.brief_with_timestamp());
//! # Ok::<(), reverie_thoughts::ThoughtError>(())
//! ```

pub mod error;
pub mod presentation;
pub mod projector;
pub mod service;
pub mod store;
pub mod subject;
pub mod types;
pub mod validation;

pub use error::{Result, ThoughtError};

pub use presentation::{TIMESTAMP_FORMAT, brief_with_timestamp};
pub use projector::{NON_TENSOR_FIELDS, project};
pub use service::{IndexSync, Synced, ThoughtService};
pub use store::{THOUGHTS_TABLE, ThoughtStore};
pub use subject::{SubjectParams, SubjectResolver};

pub use types::{
    BotId, Content, DEFAULT_IMPORTANCE, NewThought, Subject, SubjectId, SubjectKind,
    SubjectRecord, Thought, ThoughtId, ThoughtKind, ThoughtUpdate,
};

pub use validation::{ValidationError, validate_new_thought, validate_update};
