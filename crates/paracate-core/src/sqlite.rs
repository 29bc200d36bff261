//! SQLite-backed category storage.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};

use crate::backend::CategoryBackend;
use crate::error::StoreError;

/// SQLite-backed implementation of the [`CategoryBackend`] trait.
///
/// The `UNIQUE` column on `name` is the authoritative de-duplication
/// mechanism; a constraint violation on insert or rename is the normal
/// "already exists" outcome, not a failure.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        Self::with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let backend = Self {
            conn: Mutex::new(conn),
        };
        backend.initialize()?;
        Ok(backend)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl CategoryBackend for SqliteBackend {
    fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS paracate_categories (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE
            );
            ",
        )
        .map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))
    }

    fn insert(&self, name: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        match conn.execute(
            "INSERT INTO paracate_categories (name) VALUES (?1)",
            params![name],
        ) {
            Ok(_) => Ok(true),
            Err(e) if is_constraint_violation(&e) => Ok(false),
            Err(e) => Err(StoreError::Storage(format!("insert: {}", e))),
        }
    }

    fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let rows = conn
            .execute(
                "DELETE FROM paracate_categories WHERE name = ?1",
                params![name],
            )
            .map_err(|e| StoreError::Storage(format!("delete: {}", e)))?;
        Ok(rows > 0)
    }

    fn rename(&self, old: &str, new: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        // The UNIQUE constraint aborts the statement on collision, leaving
        // the table unchanged.
        match conn.execute(
            "UPDATE paracate_categories SET name = ?1 WHERE name = ?2",
            params![new, old],
        ) {
            Ok(rows) => Ok(rows > 0),
            Err(e) if is_constraint_violation(&e) => Ok(false),
            Err(e) => Err(StoreError::Storage(format!("rename: {}", e))),
        }
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT name FROM paracate_categories ORDER BY name")
            .map_err(|e| StoreError::Storage(format!("prepare list: {}", e)))?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| StoreError::Storage(format!("query list: {}", e)))?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| StoreError::Storage(format!("collect list: {}", e)))?;
        Ok(names)
    }

    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM paracate_categories WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::Storage(format!("contains: {}", e)))?;
        Ok(count > 0)
    }
}
