//! SQLite storage backend.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;
use vocab_core::storage::{StorageAdapter, StorageError, StorageResult};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for StorageError {
    fn from(e: DbError) -> Self {
        StorageError::Backend(e.to_string())
    }
}

/// Key-value table in a single SQLite file.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> DbResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

impl StorageAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.get(key)?)
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        Ok(self.put(key, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::models::Theme;
    use vocab_core::storage::{SECTIONS_KEY, THEME_KEY};
    use vocab_core::Store;

    #[test]
    fn test_kv_upsert() {
        let mut db = SqliteStorage::in_memory().unwrap();
        assert_eq!(db.load("k").unwrap(), None);
        db.save("k", "one").unwrap();
        db.save("k", "two").unwrap();
        assert_eq!(db.load("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_store_on_sqlite_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data").join("vocab.db");
        {
            let mut store = Store::open(Box::new(SqliteStorage::open(&path).unwrap()));
            let id = store.add_section("Kitchen").unwrap();
            store.add_word(id, "spoon", "Löffel").unwrap();
            store.toggle_theme();
        }

        let db = SqliteStorage::open(&path).unwrap();
        let sections = db.load(SECTIONS_KEY).unwrap().unwrap();
        assert!(sections.contains("Löffel"));
        assert_eq!(db.load(THEME_KEY).unwrap().as_deref(), Some("\"dark\""));

        let store = Store::open(Box::new(db));
        assert_eq!(store.sections()[0].name, "Kitchen");
        assert_eq!(store.theme(), Theme::Dark);
    }
}
