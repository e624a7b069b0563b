//! Vector index clients for Reverie.
//!
//! Every persisted thought is mirrored into an external vector index so it can
//! be recalled by semantic similarity. This crate defines the [`VectorIndex`]
//! trait the thought service talks to, plus two implementations:
//!
//! - [`MarqoClient`]: blocking HTTP client for a Marqo server
//! - [`RecordingIndex`]: in-memory index that records calls, with failure injection
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use reverie_index::{MarqoClient, SharedIndex};
//!
//! let index: SharedIndex = Arc::new(
//!     MarqoClient::builder()
//!         .base_url("http://localhost:8882")
//!         .build()?,
//! );
//! # Ok::<(), reverie_index::IndexError>(())
//! ```

pub mod backend;
pub mod error;
pub mod marqo;
pub mod recording;

pub use backend::{Document, SharedIndex, VectorIndex};
pub use error::{IndexError, Result};
pub use marqo::{MarqoClient, MarqoClientBuilder};
pub use recording::{IndexCall, RecordingIndex};
