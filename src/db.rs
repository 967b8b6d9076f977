use std::path::Path;

use rusqlite::{params, params_from_iter, Connection};
use thiserror::Error;
use tracing::debug;

use crate::record::{CanonicalRecord, COLUMNS};

const TABLE: &str = "applications";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("could not create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("header mismatch: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Destination for finished rows.
pub trait RowSink {
    fn append(&mut self, record: &CanonicalRecord) -> Result<(), SinkError>;
}

/// Application log stored as one SQLite table whose columns are the row
/// header names.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| SinkError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        debug!("Opened sink {}", path.display());
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, SinkError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, SinkError> {
        init_schema(&conn)?;
        check_header(&conn)?;
        Ok(Self { conn })
    }

    /// Most recent rows first.
    pub fn recent(&self, limit: usize) -> Result<Vec<CanonicalRecord>, SinkError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id DESC LIMIT ?1",
            quoted_columns(),
            TABLE
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let mut values: [String; 15] = Default::default();
                for (i, v) in values.iter_mut().enumerate() {
                    *v = row.get(i)?;
                }
                Ok(CanonicalRecord::from_row(values))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> Result<usize, SinkError> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", TABLE), [], |r| r.get(0))?;
        Ok(n as usize)
    }
}

impl RowSink for SqliteSink {
    fn append(&mut self, record: &CanonicalRecord) -> Result<(), SinkError> {
        let placeholders = (1..=COLUMNS.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            TABLE,
            quoted_columns(),
            placeholders
        );
        self.conn.execute(&sql, params_from_iter(record.to_row()))?;
        Ok(())
    }
}

fn quoted_columns() -> String {
    COLUMNS
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn init_schema(conn: &Connection) -> Result<(), SinkError> {
    let columns = COLUMNS
        .iter()
        .map(|c| format!("    \"{}\" TEXT NOT NULL DEFAULT ''", c))
        .collect::<Vec<_>>()
        .join(",\n");
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    id INTEGER PRIMARY KEY,\n{}\n);",
        TABLE, columns
    ))?;
    Ok(())
}

fn check_header(conn: &Connection) -> Result<(), SinkError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", TABLE))?;
    let found = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|name| name != "id")
        .collect::<Vec<_>>();
    if found.iter().map(String::as_str).ne(COLUMNS.iter().copied()) {
        return Err(SinkError::HeaderMismatch {
            expected: COLUMNS.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }
    Ok(())
}
