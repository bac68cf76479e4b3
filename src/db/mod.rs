// src/db/mod.rs

//! Database connection lifecycle and transaction helper.
//!
//! All persistent state lives in a single SQLite database: recipes,
//! shopping lists, and the ordered ingredient entries of each list.
//! Callers open one connection and pass it to the model methods in
//! [`models`].

pub mod models;
pub mod schema;

use crate::error::Result;
use rusqlite::Connection;
use tracing::{debug, info};

/// Create (or migrate) the database at `path`.
pub fn init(path: &str) -> Result<()> {
    info!("Initializing database at {}", path);
    let conn = Connection::open(path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    schema::migrate(&conn)?;
    Ok(())
}

/// Open an existing database.
pub fn open(path: &str) -> Result<Connection> {
    debug!("Opening database at {}", path);
    let conn = Connection::open(path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    Ok(conn)
}

/// Open a fresh in-memory database with the full schema applied.
///
/// Each call returns an isolated store; used by tests and by callers
/// that do not want on-disk state.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    schema::migrate(&conn)?;
    Ok(conn)
}

/// Run `f` inside a SQLite write transaction.
///
/// The transaction commits when `f` returns `Ok` and rolls back on
/// `Err`. This is also the single-writer boundary for id assignment:
/// shopping list ids are computed as max-existing+1, which is only
/// safe when the read and the insert share one write transaction.
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T>,
{
    let tx = conn.transaction()?;
    let result = f(&tx)?;
    tx.commit()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_init_and_reopen() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();
        drop(temp_file);

        init(&path).unwrap();
        let conn = open(&path).unwrap();
        assert_eq!(schema::get_schema_version(&conn).unwrap(), schema::SCHEMA_VERSION);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut conn = open_in_memory().unwrap();

        let result: Result<()> = transaction(&mut conn, |tx| {
            tx.execute(
                "INSERT INTO recipes (title, description, categories, ingredients, instructions)
                 VALUES ('x', '', '[]', '[]', '[]')",
                [],
            )?;
            Err(crate::error::Error::InvalidInput("boom".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
