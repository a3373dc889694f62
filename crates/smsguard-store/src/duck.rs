//! DuckDB message store: user-submitted messages labelled `scam` or `ham`.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::{Connection, params};
use smsguard_core::{LabeledRecord, MessageLabel, MessageStats, StoredMessage};
use tracing::{debug, info};

use crate::{DatasetSource, StoreError};

/// Listing size used when the caller does not ask for one.
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// Largest listing returned by [`DuckStore::recent_messages`].
pub const MAX_RECENT_LIMIT: usize = 1000;

const SCHEMA: &str = "
    CREATE SEQUENCE IF NOT EXISTS sms_messages_id_seq START 1;
    CREATE TABLE IF NOT EXISTS sms_messages (
        id BIGINT PRIMARY KEY DEFAULT nextval('sms_messages_id_seq'),
        label VARCHAR NOT NULL,
        message VARCHAR NOT NULL,
        created_at VARCHAR NOT NULL
    );
";

/// DuckDB store for the `sms_messages` table.
///
/// `created_at` is kept as a fixed-width RFC 3339 string (microseconds, `Z`)
/// so that text order is time order.
///
/// Supports both in-memory (ephemeral) and persistent (file-backed) modes.
/// The schema is created on open if missing.
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let store = Self::init(Connection::open(path)?)?;
        info!(path = %path.display(), "opened message store");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ── Writes ──

    /// Validate and insert one message.
    ///
    /// Both fields are required; the label must be `scam` or `ham`.
    pub fn create_message(
        &self,
        label: &str,
        message: &str,
    ) -> Result<StoredMessage, StoreError> {
        if message.trim().is_empty() {
            return Err(StoreError::MissingField { field: "message" });
        }
        if label.trim().is_empty() {
            return Err(StoreError::MissingField { field: "label" });
        }
        let label: MessageLabel = label.parse()?;
        let created_at = Utc::now();

        let id: i64 = self.conn.query_row(
            "INSERT INTO sms_messages (label, message, created_at) VALUES (?, ?, ?) RETURNING id",
            params![label.as_str(), message, format_timestamp(&created_at)],
            |row| row.get(0),
        )?;
        debug!(id, label = %label, "stored message");

        Ok(StoredMessage {
            id,
            label,
            message: message.to_string(),
            created_at,
        })
    }

    // ── Reads ──

    /// Newest messages first, at most `limit` of them. `limit` is capped at
    /// [`MAX_RECENT_LIMIT`].
    pub fn recent_messages(&self, limit: usize) -> Result<Vec<StoredMessage>, StoreError> {
        let limit = limit.min(MAX_RECENT_LIMIT) as i64;
        let mut stmt = self.conn.prepare(
            "SELECT id, label, message, created_at FROM sms_messages
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, label, message, created_at)| -> Result<_, StoreError> {
                Ok(StoredMessage {
                    id,
                    label: label.parse()?,
                    message,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    /// Fetch a single message by id.
    pub fn get_message(&self, id: i64) -> Result<StoredMessage, StoreError> {
        let (label, message, created_at) = self
            .conn
            .query_row(
                "SELECT label, message, created_at FROM sms_messages WHERE id = ?",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .map_err(|e| match e {
                duckdb::Error::QueryReturnedNoRows => StoreError::NoResults,
                other => StoreError::DuckDb(other),
            })?;

        Ok(StoredMessage {
            id,
            label: label.parse()?,
            message,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    /// Counts by label.
    pub fn stats(&self) -> Result<MessageStats, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT lower(label), count(*)::BIGINT FROM sms_messages GROUP BY 1")?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stats = MessageStats::default();
        for (label, count) in counts {
            let count = count as u64;
            stats.total_messages += count;
            match label.as_str() {
                "scam" => stats.scam_messages += count,
                "ham" => stats.ham_messages += count,
                _ => {}
            }
        }
        Ok(stats)
    }

    /// Number of rows in `sms_messages`.
    pub fn message_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*)::BIGINT FROM sms_messages",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl DatasetSource for DuckStore {
    fn describe(&self) -> String {
        "duckdb:sms_messages".to_string()
    }

    /// Every stored message in insertion order.
    fn fetch_all(&self) -> Result<Vec<LabeledRecord>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT label, message FROM sms_messages ORDER BY id")?;
        let records = stmt
            .query_map([], |row| {
                Ok(LabeledRecord::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = records.len(), "read stored messages");
        Ok(records)
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Other(format!("bad created_at {s:?}: {e}")))
}
