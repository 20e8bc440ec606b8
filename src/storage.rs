use std::path::Path;

use rusqlite::Connection;
use tracing::warn;

use crate::error::AppError;
use crate::models::TodoItem;

/// The whole list lives under this one key.
const STORE_KEY: &str = "todos";

/// Key-value persistence for the todo list: a single row holding the
/// full list as one serialized JSON array, unconditionally overwritten
/// on every save.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self { conn })
    }

    /// Reads the stored list. An absent row yields an empty list; so does
    /// a value that no longer deserializes, with a warning, after which
    /// the next save overwrites it.
    pub fn load(&self) -> Result<Vec<TodoItem>, AppError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM storage WHERE key = ?1")?;
        let mut rows = stmt.query([STORE_KEY])?;

        let Some(row) = rows.next()? else {
            return Ok(Vec::new());
        };
        let value: String = row.get(0)?;

        match serde_json::from_str(&value) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(%err, "Stored todo list is unreadable, starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Serializes the full list and writes it back under the fixed key.
    pub fn save(&self, items: &[TodoItem]) -> Result<(), AppError> {
        let value = serde_json::to_string(items)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO storage (key, value) VALUES (?1, ?2)",
            (STORE_KEY, &value),
        )?;
        Ok(())
    }
}
