//! Tender Storage
//! Mission: Keep tender documents in a single SQLite-backed collection
//!
//! Each row holds one JSON document. Rows are returned in insertion order.

use crate::tenders::{
    models::{Tender, TenderFields},
    search::NameMatcher,
};
use anyhow::{Context, Result};
use chrono::{SubsecRound, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS tenders (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    document TEXT NOT NULL
);
"#;

/// Tender collection
pub struct TenderStore {
    conn: Arc<Mutex<Connection>>,
}

impl TenderStore {
    /// Open (or create) the collection at `db_path`
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")?;

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap_or_default();
        if journal_mode.to_lowercase() != "wal" {
            warn!("WAL mode not active, journal_mode = {}", journal_mode);
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tenders", [], |row| row.get(0))
            .context("Failed to count tenders")?;

        info!("📊 Tender store opened at {} ({} records)", db_path, count);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a new tender with a fresh identifier and timestamps
    pub fn create(&self, fields: TenderFields) -> Result<Tender> {
        let now = Utc::now().trunc_subsecs(3);
        let tender = Tender {
            id: Uuid::new_v4(),
            fields,
            created_at: now,
            updated_at: now,
        };
        let document = serde_json::to_string(&tender)?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tenders (id, document) VALUES (?1, ?2)",
            params![tender.id.to_string(), document],
        )
        .context("Failed to insert tender")?;

        debug!("Created tender {}", tender.id);
        Ok(tender)
    }

    /// Every tender, in insertion order
    pub fn list_all(&self) -> Result<Vec<Tender>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT document FROM tenders ORDER BY seq")?;

        let documents = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let tenders = documents
            .iter()
            .map(|doc| serde_json::from_str(doc).context("Corrupt tender document"))
            .collect::<Result<Vec<Tender>>>()?;

        Ok(tenders)
    }

    /// Tenders whose name contains `query`, ignoring case
    pub fn search_by_name(&self, query: Option<&str>) -> Result<Vec<Tender>> {
        let matcher = NameMatcher::new(query);
        let tenders = self.list_all()?;

        Ok(tenders
            .into_iter()
            .filter(|t| matcher.matches(t.fields.name.as_deref()))
            .collect())
    }

    /// Replace the fields of tender `id`.
    ///
    /// Returns `Ok(None)` when no such tender exists.
    pub fn update(&self, id: &str, fields: TenderFields) -> Result<Option<Tender>> {
        let id = parse_id(id)?;

        let conn = self.conn.lock();
        let existing: Option<String> = conn
            .query_row(
                "SELECT document FROM tenders WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(existing) = existing else {
            debug!("Update of missing tender {}", id);
            return Ok(None);
        };

        let existing: Tender =
            serde_json::from_str(&existing).context("Corrupt tender document")?;
        let updated = Tender {
            id,
            fields,
            created_at: existing.created_at,
            updated_at: Utc::now().trunc_subsecs(3),
        };

        conn.execute(
            "UPDATE tenders SET document = ?1 WHERE id = ?2",
            params![serde_json::to_string(&updated)?, id.to_string()],
        )
        .context("Failed to update tender")?;

        debug!("Updated tender {}", id);
        Ok(Some(updated))
    }

    /// Remove tender `id`; removing a missing tender is not an error
    pub fn delete(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;

        let conn = self.conn.lock();
        let removed = conn
            .execute("DELETE FROM tenders WHERE id = ?1", params![id.to_string()])
            .context("Failed to delete tender")?;

        debug!("Deleted tender {} ({} rows)", id, removed);
        Ok(())
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).with_context(|| format!("Cast to identifier failed for value \"{}\"", id))
}
