//! Core ClaimStore implementation

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Unique identifier for a claim record
pub type ClaimId = String;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Claim not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary row returned by [`ClaimStore::list`]
#[derive(Debug, Clone)]
pub struct ClaimSummary {
    pub id: ClaimId,
    pub title: String,
    pub status: String,
    pub updated_at: String,
}

/// SQLite-backed JSON document store for claim records
///
/// Each claim is stored as one row holding the full serialized record.
/// Writes replace or merge the whole document in a single statement, so a
/// record update is atomic at the storage layer.
pub struct ClaimStore {
    conn: Mutex<Connection>,
}

impl ClaimStore {
    /// Open or create a claim store at the given database path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(?path, "ClaimStore::open: called");
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        info!(path = %path.display(), "Opened claim store");
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory store (tests and ephemeral runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        debug!("ClaimStore::open_in_memory: called");
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS claims (
                id          TEXT PRIMARY KEY,
                body        TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Insert or replace a claim document
    pub fn put(&self, id: &str, body: &Value) -> Result<(), StoreError> {
        debug!(%id, "ClaimStore::put: called");
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().expect("claim store mutex poisoned");
        conn.execute(
            "INSERT INTO claims (id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(id) DO UPDATE SET body = ?2, updated_at = ?3",
            params![id, serde_json::to_string(body)?, now],
        )?;
        Ok(())
    }

    /// Fetch a claim document by id
    pub fn get(&self, id: &str) -> Result<Option<Value>, StoreError> {
        debug!(%id, "ClaimStore::get: called");
        let conn = self.conn.lock().expect("claim store mutex poisoned");
        let body: Option<String> = conn
            .query_row("SELECT body FROM claims WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        match body {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Shallow-merge fields into an existing claim document
    ///
    /// The merged document is written back in one UPDATE, so concurrent
    /// writers follow last-write-wins semantics. Fails with
    /// [`StoreError::NotFound`] if the claim does not exist.
    pub fn merge(&self, id: &str, patch: &Value) -> Result<(), StoreError> {
        debug!(%id, "ClaimStore::merge: called");
        let conn = self.conn.lock().expect("claim store mutex poisoned");
        let body: Option<String> = conn
            .query_row("SELECT body FROM claims WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        let text = body.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut doc: Value = serde_json::from_str(&text)?;

        if let (Value::Object(target), Value::Object(fields)) = (&mut doc, patch) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE claims SET body = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, serde_json::to_string(&doc)?, now],
        )?;
        info!(%id, "Merged claim update");
        Ok(())
    }

    /// List stored claims, most recently updated first
    pub fn list(&self) -> Result<Vec<ClaimSummary>, StoreError> {
        debug!("ClaimStore::list: called");
        let conn = self.conn.lock().expect("claim store mutex poisoned");
        let mut stmt = conn.prepare("SELECT id, body, updated_at FROM claims ORDER BY updated_at DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, body, updated_at) = row?;
            let doc: Value = serde_json::from_str(&body)?;
            summaries.push(ClaimSummary {
                id,
                title: doc["title"].as_str().unwrap_or("(untitled)").to_string(),
                status: doc["status"].as_str().unwrap_or("unknown").to_string(),
                updated_at,
            });
        }
        Ok(summaries)
    }

    /// Delete a claim document
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!(%id, "ClaimStore::delete: called");
        let conn = self.conn.lock().expect("claim store mutex poisoned");
        let affected = conn.execute("DELETE FROM claims WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        info!(%id, "Deleted claim");
        Ok(())
    }
}
