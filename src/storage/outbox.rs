use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result as SqlResult, Row, params};

use super::models::{OutboxEntry, OutboxStatus};

/// Local record of every submitted direct message and how it ended.
pub struct OutboxDatabase {
    conn: Connection,
}

impl OutboxDatabase {
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn in_memory() -> SqlResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> SqlResult<Self> {
        let outbox = Self { conn };
        outbox.init_schema()?;
        Ok(outbox)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS outbox (
                local_id TEXT PRIMARY KEY,
                target TEXT NOT NULL,
                resource TEXT NOT NULL,
                text TEXT NOT NULL,
                status TEXT NOT NULL,
                error TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_outbox_created_at ON outbox(created_at)",
            [],
        )?;

        Ok(())
    }

    pub fn insert_pending(
        &self,
        local_id: &str,
        target: &str,
        resource: &str,
        text: &str,
    ) -> SqlResult<()> {
        let now = Utc::now().timestamp();
        self.conn.execute(
            "INSERT OR IGNORE INTO outbox
                (local_id, target, resource, text, status, error, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?6)",
            params![
                local_id,
                target,
                resource,
                text,
                OutboxStatus::Pending.as_str(),
                now
            ],
        )?;
        Ok(())
    }

    pub fn mark_delivered(&self, local_id: &str) -> SqlResult<usize> {
        self.set_status(local_id, OutboxStatus::Delivered, None)
    }

    pub fn mark_failed(&self, local_id: &str, error: &str) -> SqlResult<usize> {
        self.set_status(local_id, OutboxStatus::Failed, Some(error))
    }

    fn set_status(
        &self,
        local_id: &str,
        status: OutboxStatus,
        error: Option<&str>,
    ) -> SqlResult<usize> {
        self.conn.execute(
            "UPDATE outbox SET status = ?1, error = ?2, updated_at = ?3 WHERE local_id = ?4",
            params![status.as_str(), error, Utc::now().timestamp(), local_id],
        )
    }

    #[cfg(test)]
    pub fn get(&self, local_id: &str) -> SqlResult<Option<OutboxEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT local_id, target, resource, text, status, error, created_at, updated_at
             FROM outbox WHERE local_id = ?1",
        )?;
        let entry = stmt
            .query_row(params![local_id], entry_from_row)
            .optional()?;

        Ok(entry)
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> SqlResult<Vec<OutboxEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT local_id, target, resource, text, status, error, created_at, updated_at
             FROM outbox
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![limit], entry_from_row)?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(entries)
    }

    pub fn count_by_status(&self, status: OutboxStatus) -> SqlResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM outbox WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn entry_from_row(row: &Row<'_>) -> SqlResult<OutboxEntry> {
    let status: String = row.get(4)?;
    let status = status.parse::<OutboxStatus>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            err.into(),
        )
    })?;

    Ok(OutboxEntry {
        local_id: row.get(0)?,
        target: row.get(1)?,
        resource: row.get(2)?,
        text: row.get(3)?,
        status,
        error: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_then_delivered() {
        let outbox = OutboxDatabase::in_memory().unwrap();
        outbox
            .insert_pending("a", "42", "conversations", "hello")
            .unwrap();
        assert_eq!(outbox.count_by_status(OutboxStatus::Pending).unwrap(), 1);

        assert_eq!(outbox.mark_delivered("a").unwrap(), 1);
        let entry = outbox.get("a").unwrap().unwrap();
        assert_eq!(entry.status, OutboxStatus::Delivered);
        assert_eq!(entry.target, "42");
        assert_eq!(entry.text, "hello");
        assert!(entry.error.is_none());
        assert_eq!(outbox.count_by_status(OutboxStatus::Pending).unwrap(), 0);
    }

    #[test]
    fn failure_keeps_reason() {
        let outbox = OutboxDatabase::in_memory().unwrap();
        outbox.insert_pending("b", "NaN", "threads", "hi").unwrap();
        outbox.mark_failed("b", "connection refused").unwrap();

        let entry = outbox.get("b").unwrap().unwrap();
        assert_eq!(entry.status, OutboxStatus::Failed);
        assert_eq!(entry.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn unknown_id_updates_nothing() {
        let outbox = OutboxDatabase::in_memory().unwrap();
        assert_eq!(outbox.mark_delivered("missing").unwrap(), 0);
        assert!(outbox.get("missing").unwrap().is_none());
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let outbox = OutboxDatabase::in_memory().unwrap();
        for (id, text) in [("1", "first"), ("2", "second"), ("3", "third")] {
            outbox.insert_pending(id, "5", "conversations", text).unwrap();
        }

        let recent = outbox.recent(2).unwrap();
        let texts: Vec<_> = recent.iter().map(|entry| entry.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second"]);
    }

    #[test]
    fn file_backed_outbox_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outbox.db");
        {
            let outbox = OutboxDatabase::with_path(&path).unwrap();
            outbox.insert_pending("x", "1", "conversations", "kept").unwrap();
        }
        let reopened = OutboxDatabase::with_path(&path).unwrap();
        assert_eq!(reopened.get("x").unwrap().unwrap().text, "kept");
    }
}
