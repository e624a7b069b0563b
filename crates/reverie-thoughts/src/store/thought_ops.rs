//! Thought CRUD operations.

use chrono::Utc;
use rusqlite::{Row, params};
use tracing::debug;

use crate::error::{Result, ThoughtError};
use crate::types::{BotId, Content, Subject, SubjectId, SubjectKind, Thought, ThoughtId, ThoughtKind};

use super::{ThoughtStore, parse_timestamp};

const SELECT_COLUMNS: &str = "SELECT id, type, brief, content, importance, subject_type, subject_id, \
     bot_id, created_at, updated_at FROM thoughts";

impl ThoughtStore {
    /// Insert a new thought.
    pub fn insert_thought(&self, thought: &Thought) -> Result<()> {
        let conn = self.conn.lock();

        let content_json = serde_json::to_string(&thought.content)?;
        let (subject_type, subject_id) = subject_columns(thought.subject.as_ref());

        conn.execute(
            r#"
            INSERT INTO thoughts (id, type, brief, content, importance, subject_type, subject_id,
                                  bot_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                thought.id.to_string(),
                thought.kind.type_name(),
                thought.brief,
                content_json,
                thought.importance,
                subject_type,
                subject_id,
                thought.bot_id.to_string(),
                thought.created_at.to_rfc3339(),
                thought.updated_at.to_rfc3339(),
            ],
        )?;

        debug!("Inserted thought {}", thought.id);
        Ok(())
    }

    /// Get a thought by ID.
    pub fn get_thought(&self, id: ThoughtId) -> Result<Option<Thought>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
        let mut rows = stmt.query(params![id.to_string()])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_thought(row)?))
        } else {
            Ok(None)
        }
    }

    /// Update an existing thought, stamping `updated_at`.
    pub fn update_thought(&self, thought: &mut Thought) -> Result<()> {
        let conn = self.conn.lock();

        let content_json = serde_json::to_string(&thought.content)?;
        let (subject_type, subject_id) = subject_columns(thought.subject.as_ref());
        let updated_at = Utc::now();

        let rows_affected = conn.execute(
            r#"
            UPDATE thoughts
            SET type = ?2, brief = ?3, content = ?4, importance = ?5,
                subject_type = ?6, subject_id = ?7, updated_at = ?8
            WHERE id = ?1
            "#,
            params![
                thought.id.to_string(),
                thought.kind.type_name(),
                thought.brief,
                content_json,
                thought.importance,
                subject_type,
                subject_id,
                updated_at.to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(ThoughtError::NotFound(format!("Thought {}", thought.id)));
        }

        thought.updated_at = updated_at;
        debug!("Updated thought {}", thought.id);
        Ok(())
    }

    /// Delete a thought by ID.
    ///
    /// Returns `true` if the thought existed.
    pub fn delete_thought(&self, id: ThoughtId) -> Result<bool> {
        let conn = self.conn.lock();

        let rows_affected =
            conn.execute("DELETE FROM thoughts WHERE id = ?1", params![id.to_string()])?;

        if rows_affected > 0 {
            debug!("Deleted thought {}", id);
        }

        Ok(rows_affected > 0)
    }

    /// List thoughts, newest first, optionally for a single bot.
    pub fn list_thoughts(
        &self,
        bot_id: Option<BotId>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Thought>> {
        let conn = self.conn.lock();

        let mut thoughts = Vec::new();
        if let Some(bot_id) = bot_id {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE bot_id = ?1 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
                SELECT_COLUMNS
            ))?;
            let mut rows = stmt.query(params![bot_id.to_string(), limit as i64, offset as i64])?;
            while let Some(row) = rows.next()? {
                thoughts.push(Self::row_to_thought(row)?);
            }
        } else {
            let mut stmt = conn.prepare(&format!(
                "{} ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
                SELECT_COLUMNS
            ))?;
            let mut rows = stmt.query(params![limit as i64, offset as i64])?;
            while let Some(row) = rows.next()? {
                thoughts.push(Self::row_to_thought(row)?);
            }
        }

        Ok(thoughts)
    }

    /// List thoughts about a subject, newest first.
    pub fn list_thoughts_about(&self, subject: &Subject, limit: usize) -> Result<Vec<Thought>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(&format!(
            "{} WHERE subject_type = ?1 AND subject_id = ?2 ORDER BY created_at DESC LIMIT ?3",
            SELECT_COLUMNS
        ))?;
        let mut rows = stmt.query(params![
            subject.kind().as_str(),
            subject.id().to_string(),
            limit as i64
        ])?;

        let mut thoughts = Vec::new();
        while let Some(row) = rows.next()? {
            thoughts.push(Self::row_to_thought(row)?);
        }
        Ok(thoughts)
    }

    /// Count thoughts, optionally for a single bot.
    pub fn count_thoughts(&self, bot_id: Option<BotId>) -> Result<usize> {
        let conn = self.conn.lock();

        let count: i64 = if let Some(bot_id) = bot_id {
            conn.query_row(
                "SELECT COUNT(*) FROM thoughts WHERE bot_id = ?1",
                params![bot_id.to_string()],
                |row| row.get(0),
            )?
        } else {
            conn.query_row("SELECT COUNT(*) FROM thoughts", [], |row| row.get(0))?
        };

        Ok(count as usize)
    }

    /// Convert a database row to a Thought.
    ///
    /// Expected column order: id, type, brief, content, importance, subject_type,
    /// subject_id, bot_id, created_at, updated_at
    fn row_to_thought(row: &Row) -> Result<Thought> {
        let id_str: String = row.get(0)?;
        let type_name: Option<String> = row.get(1)?;
        let brief: String = row.get(2)?;
        let content_json: String = row.get(3)?;
        let importance: i32 = row.get(4)?;
        let subject_type: Option<String> = row.get(5)?;
        let subject_id: Option<String> = row.get(6)?;
        let bot_id_str: String = row.get(7)?;
        let created_at_str: String = row.get(8)?;
        let updated_at_str: String = row.get(9)?;

        let kind = ThoughtKind::from_type_name(type_name.as_deref())
            .map_err(|e| ThoughtError::InvalidData(e.to_string()))?;
        let content: Content = serde_json::from_str(&content_json)?;

        let subject = match (subject_type, subject_id) {
            (Some(kind), Some(id)) => Some(Subject::new(
                kind.parse::<SubjectKind>()?,
                SubjectId::parse(&id)?,
            )),
            (None, None) => None,
            _ => {
                return Err(ThoughtError::InvalidData(format!(
                    "Thought {} has a partial subject reference",
                    id_str
                )));
            }
        };

        Ok(Thought {
            id: ThoughtId::parse(&id_str)?,
            kind,
            brief,
            content,
            importance,
            subject,
            bot_id: BotId::parse(&bot_id_str)?,
            created_at: parse_timestamp(&created_at_str)?,
            updated_at: parse_timestamp(&updated_at_str)?,
        })
    }
}

/// Split a subject into its `(subject_type, subject_id)` columns.
fn subject_columns(subject: Option<&Subject>) -> (Option<&'static str>, Option<String>) {
    match subject {
        Some(subject) => (Some(subject.kind().as_str()), Some(subject.id().to_string())),
        None => (None, None),
    }
}
