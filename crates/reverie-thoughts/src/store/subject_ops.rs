//! Subject lookup and find-or-create, one table per subject kind.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::error::Result;
use crate::types::{SubjectId, SubjectKind, SubjectRecord};

use super::{ThoughtStore, parse_timestamp};

impl ThoughtStore {
    /// Insert a new subject.
    pub fn insert_subject(&self, subject: &SubjectRecord) -> Result<()> {
        let conn = self.conn.lock();
        Self::insert_subject_with(&conn, subject)
    }

    /// Get a subject by kind and ID.
    pub fn get_subject(&self, kind: SubjectKind, id: SubjectId) -> Result<Option<SubjectRecord>> {
        let conn = self.conn.lock();

        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} WHERE id = ?1",
            kind.table_name()
        );
        let row = conn
            .query_row(&sql, params![id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()?;

        row.map(|columns| Self::columns_to_subject(kind, columns))
            .transpose()
    }

    /// Find a subject by exact name.
    pub fn find_subject_by_name(
        &self,
        kind: SubjectKind,
        name: &str,
    ) -> Result<Option<SubjectRecord>> {
        let conn = self.conn.lock();
        Self::find_subject_with(&conn, kind, name)
    }

    /// Find the subject with this name, creating it if it doesn't exist.
    ///
    /// Lookup and insert happen under the same connection lock.
    pub fn find_or_create_subject(&self, kind: SubjectKind, name: &str) -> Result<SubjectRecord> {
        let conn = self.conn.lock();

        if let Some(existing) = Self::find_subject_with(&conn, kind, name)? {
            return Ok(existing);
        }

        let subject = SubjectRecord::new(kind, name);
        Self::insert_subject_with(&conn, &subject)?;
        Ok(subject)
    }

    /// Count subjects of a kind.
    pub fn count_subjects(&self, kind: SubjectKind) -> Result<usize> {
        let conn = self.conn.lock();

        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table_name()),
            [],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }

    fn insert_subject_with(conn: &Connection, subject: &SubjectRecord) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO {} (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                subject.kind.table_name()
            ),
            params![
                subject.id.to_string(),
                subject.name,
                subject.created_at.to_rfc3339(),
                subject.updated_at.to_rfc3339(),
            ],
        )?;

        debug!("Inserted {} {} ({})", subject.kind, subject.id, subject.name);
        Ok(())
    }

    fn find_subject_with(
        conn: &Connection,
        kind: SubjectKind,
        name: &str,
    ) -> Result<Option<SubjectRecord>> {
        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} WHERE name = ?1",
            kind.table_name()
        );
        let row = conn
            .query_row(&sql, params![name], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()?;

        row.map(|columns| Self::columns_to_subject(kind, columns))
            .transpose()
    }

    fn columns_to_subject(
        kind: SubjectKind,
        (id, name, created_at, updated_at): (String, String, String, String),
    ) -> Result<SubjectRecord> {
        Ok(SubjectRecord {
            id: SubjectId::parse(&id)?,
            kind,
            name,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
