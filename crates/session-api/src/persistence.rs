use std::fmt;
use std::path::Path;

use contracts::{DiscussionEntry, FinalReport, SessionConfig, SessionStatus};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSessionSummary {
    pub session_id: String,
    pub phase: String,
    pub budget_used: u32,
    pub budget_remaining: u32,
    pub log_entries: usize,
    pub updated_at: String,
}

#[derive(Debug)]
pub enum PersistenceError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
    NotAttached,
    SessionAlreadyExists(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::Serde(err) => write!(f, "serde error: {err}"),
            Self::NotAttached => write!(f, "sqlite store is not attached"),
            Self::SessionAlreadyExists(session_id) => {
                write!(f, "session already persisted: {session_id}")
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Transcript archive. Sessions live in memory; this store is an opt-in,
/// append-mostly record of configs, log entries, and final reports.
#[derive(Debug)]
pub struct SqliteSessionStore {
    conn: Connection,
}

impl SqliteSessionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.configure()?;
        store.migrate()?;
        Ok(store)
    }

    fn configure(&self) -> Result<(), PersistenceError> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    }

    fn migrate(&self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                phase TEXT NOT NULL,
                config_json TEXT NOT NULL,
                status_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS entries (
                session_id TEXT NOT NULL,
                sequence INTEGER NOT NULL,
                phase TEXT NOT NULL,
                topic TEXT,
                speaker TEXT,
                payload_json TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                PRIMARY KEY (session_id, sequence)
             );
             CREATE TABLE IF NOT EXISTS reports (
                session_id TEXT PRIMARY KEY,
                payload_json TEXT NOT NULL,
                created_at TEXT NOT NULL
             );",
        )?;
        Ok(())
    }

    /// Upserts the session row, appends the new log entries idempotently,
    /// and stores the final report when one is supplied. One transaction;
    /// a replayed delta is a no-op.
    pub fn persist_delta(
        &mut self,
        config: &SessionConfig,
        status: &SessionStatus,
        new_entries: &[DiscussionEntry],
        report: Option<&FinalReport>,
    ) -> Result<(), PersistenceError> {
        let tx = self.conn.transaction()?;

        upsert_session(&tx, config, status)?;

        for entry in new_entries {
            let payload_json = serde_json::to_string(entry)?;
            tx.execute(
                "INSERT OR IGNORE INTO entries (
                    session_id,
                    sequence,
                    phase,
                    topic,
                    speaker,
                    payload_json,
                    recorded_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.session_id.as_str(),
                    i64::try_from(entry.sequence).unwrap_or(i64::MAX),
                    entry.phase.as_str(),
                    entry.topic.map(|topic| topic.as_str()),
                    entry.speaker.as_deref(),
                    payload_json,
                    entry.recorded_at.as_str(),
                ],
            )?;
        }

        if let Some(report_payload) = report {
            let payload_json = serde_json::to_string(report_payload)?;
            tx.execute(
                "INSERT OR REPLACE INTO reports (session_id, payload_json, created_at)
                 VALUES (?1, ?2, ?3)",
                params![
                    report_payload.session_id.as_str(),
                    payload_json,
                    sequence_stamp(status.log_entries as u64),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn session_exists(&self, session_id: &str) -> Result<bool, PersistenceError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sessions WHERE session_id = ?1",
                params![session_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn delete_session(&mut self, session_id: &str) -> Result<(), PersistenceError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM reports WHERE session_id = ?1", params![session_id])?;
        tx.execute("DELETE FROM entries WHERE session_id = ?1", params![session_id])?;
        tx.execute("DELETE FROM sessions WHERE session_id = ?1", params![session_id])?;
        tx.commit()?;
        Ok(())
    }

    pub fn list_sessions(&self, limit: usize) -> Result<Vec<PersistedSessionSummary>, PersistenceError> {
        let mut statement = self.conn.prepare(
            "SELECT session_id, status_json, updated_at
             FROM sessions
             ORDER BY session_id
             LIMIT ?1",
        )?;
        let rows = statement.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (session_id, status_json, updated_at) = row?;
            let status: SessionStatus = serde_json::from_str(&status_json)?;
            summaries.push(PersistedSessionSummary {
                session_id,
                phase: status.phase.as_str().to_string(),
                budget_used: status.budget_used,
                budget_remaining: status.budget_remaining,
                log_entries: status.log_entries,
                updated_at,
            });
        }
        Ok(summaries)
    }

    pub fn load_transcript(&self, session_id: &str) -> Result<Vec<DiscussionEntry>, PersistenceError> {
        let mut statement = self.conn.prepare(
            "SELECT payload_json FROM entries WHERE session_id = ?1 ORDER BY sequence",
        )?;
        let rows = statement.query_map(params![session_id], |row| row.get::<_, String>(0))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(serde_json::from_str(&row?)?);
        }
        Ok(entries)
    }

    pub fn load_report(&self, session_id: &str) -> Result<Option<FinalReport>, PersistenceError> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload_json FROM reports WHERE session_id = ?1",
                params![session_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match payload {
            Some(payload_json) => Ok(Some(serde_json::from_str(&payload_json)?)),
            None => Ok(None),
        }
    }
}

fn upsert_session(
    tx: &rusqlite::Transaction<'_>,
    config: &SessionConfig,
    status: &SessionStatus,
) -> Result<(), PersistenceError> {
    let config_json = serde_json::to_string(config)?;
    let status_json = serde_json::to_string(status)?;
    tx.execute(
        "INSERT INTO sessions (session_id, phase, config_json, status_json, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(session_id) DO UPDATE SET
            phase = excluded.phase,
            status_json = excluded.status_json,
            updated_at = excluded.updated_at",
        params![
            config.session_id.as_str(),
            status.phase.as_str(),
            config_json,
            status_json,
            sequence_stamp(status.log_entries as u64),
        ],
    )?;
    Ok(())
}

/// Row stamps mirror the log's synthetic clock so archives replay
/// byte-identically for a given session.
fn sequence_stamp(sequence: u64) -> String {
    format!(
        "1970-01-01T{:02}:{:02}:{:02}Z",
        (sequence / 3600) % 24,
        (sequence / 60) % 60,
        sequence % 60
    )
}
