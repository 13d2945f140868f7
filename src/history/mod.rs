use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs_err as fs;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use uuid::Uuid;

use crate::wire::HistoryEntry;

/// Page size of the history listing endpoint.
pub const HISTORY_PAGE: usize = 20;

/// Append-only store of generated documents, read most-recent-first.
pub trait History: Send + Sync {
    fn list_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
    fn append(&self, prompt: &str, response: &str, language: &str) -> Result<HistoryEntry>;
}

fn new_entry(prompt: &str, response: &str, language: &str) -> HistoryEntry {
    HistoryEntry {
        id: Uuid::new_v4().to_string(),
        prompt: prompt.to_string(),
        response: response.to_string(),
        language: language.to_string(),
        created_at: Utc::now(),
    }
}

pub struct SqliteHistory {
    conn: Mutex<Connection>,
}

impl SqliteHistory {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening history database {}", path.display()))?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS prompt_history (
                seq        INTEGER PRIMARY KEY AUTOINCREMENT,
                id         TEXT NOT NULL UNIQUE,
                prompt     TEXT NOT NULL,
                response   TEXT NOT NULL,
                language   TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS prompt_history_created_at
                ON prompt_history (created_at DESC);",
        )
        .context("creating prompt_history table")?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl History for SqliteHistory {
    fn list_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, prompt, response, language, created_at
               FROM prompt_history
              ORDER BY created_at DESC, seq DESC
              LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, prompt, response, language, created_at) = row?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .with_context(|| format!("bad created_at for history entry {id}"))?
                .with_timezone(&Utc);
            out.push(HistoryEntry { id, prompt, response, language, created_at });
        }
        Ok(out)
    }

    fn append(&self, prompt: &str, response: &str, language: &str) -> Result<HistoryEntry> {
        let entry = new_entry(prompt, response, language);
        self.conn
            .lock()
            .execute(
                "INSERT INTO prompt_history (id, prompt, response, language, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.id,
                    entry.prompt,
                    entry.response,
                    entry.language,
                    // fixed-width so lexical order is chronological
                    entry.created_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
                ],
            )
            .context("inserting history entry")?;
        Ok(entry)
    }
}

/// In-process store without persistence, used by tests and embedders.
#[derive(Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl History for MemoryHistory {
    fn list_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        Ok(self.entries.lock().iter().rev().take(limit).cloned().collect())
    }

    fn append(&self, prompt: &str, response: &str, language: &str) -> Result<HistoryEntry> {
        let entry = new_entry(prompt, response, language);
        self.entries.lock().push(entry.clone());
        Ok(entry)
    }
}
