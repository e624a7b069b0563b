//! Thought store implementation using SQLite.
//!
//! Holds the relational side of a thought: the `thoughts` table plus one
//! table per subject kind. The vector side is not touched here; see
//! [`crate::service::ThoughtService`] for the orchestration of both.

mod subject_ops;
mod thought_ops;

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::{Result, ThoughtError};

// ─────────────────────────────────────────────────────────────────────────────
// Schema
// ─────────────────────────────────────────────────────────────────────────────

/// Current schema version for migrations.
const SCHEMA_VERSION: i32 = 1;

/// Table holding thoughts. Also the name of the vector index they mirror to.
pub const THOUGHTS_TABLE: &str = "thoughts";

// ─────────────────────────────────────────────────────────────────────────────
// Thought Store
// ─────────────────────────────────────────────────────────────────────────────

/// Thought store backed by SQLite.
///
/// Uses WAL mode for better concurrent read performance. Identifiers and
/// timestamps are assigned here; callers never choose them.
pub struct ThoughtStore {
    /// The SQLite connection (wrapped in Mutex for thread safety).
    pub(crate) conn: Mutex<Connection>,
}

impl std::fmt::Debug for ThoughtStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThoughtStore").finish_non_exhaustive()
    }
}

impl ThoughtStore {
    /// Open or create a thought store at the given path.
    ///
    /// Creates the database file and initializes the schema if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|_| {
                ThoughtError::Database(rusqlite::Error::InvalidPath(path.to_path_buf()))
            })?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("Thought store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("In-memory thought store created");
        Ok(store)
    }

    /// Initialize the database with schema and pragmas.
    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Self::create_schema(&conn)
    }

    /// Create the database schema.
    fn create_schema(conn: &Connection) -> Result<()> {
        let current_version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if current_version >= SCHEMA_VERSION {
            debug!("Schema up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating schema from version {} to {}",
            current_version, SCHEMA_VERSION
        );

        conn.execute_batch(
            r#"
            -- Thoughts: one row per thought, subtype in `type`
            CREATE TABLE IF NOT EXISTS thoughts (
                id TEXT PRIMARY KEY,
                type TEXT,
                brief TEXT NOT NULL,
                content TEXT NOT NULL DEFAULT '{}',
                importance INTEGER NOT NULL DEFAULT 50,
                subject_type TEXT,
                subject_id TEXT,
                bot_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_thoughts_bot_id
                ON thoughts(bot_id);

            CREATE INDEX IF NOT EXISTS idx_thoughts_brief
                ON thoughts(brief);

            CREATE INDEX IF NOT EXISTS idx_thoughts_subject
                ON thoughts(subject_type, subject_id);

            -- Subject kinds, one table each
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS people (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        info!("Schema created (version {})", SCHEMA_VERSION);
        Ok(())
    }
}

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(value: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    Ok(chrono::DateTime::parse_from_rfc3339(value)
        .map_err(|e| ThoughtError::InvalidData(e.to_string()))?
        .with_timezone(&chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BotId, Thought};
    use tempfile::TempDir;

    #[test]
    fn test_open_in_memory() {
        let store = ThoughtStore::open_in_memory().unwrap();
        assert_eq!(store.count_thoughts(None).unwrap(), 0);
    }

    #[test]
    fn test_schema_version_set() {
        let store = ThoughtStore::open_in_memory().unwrap();
        let conn = store.conn.lock();
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_open_creates_parent_dirs_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("reverie.db");

        let thought = Thought::new(BotId::new(), "persisted");
        {
            let store = ThoughtStore::open(&path).unwrap();
            store.insert_thought(&thought).unwrap();
        }

        let reopened = ThoughtStore::open(&path).unwrap();
        let fetched = reopened.get_thought(thought.id).unwrap().unwrap();
        assert_eq!(fetched.brief, "persisted");
    }
}
