use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;
use thiserror::Error;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".contact-book";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "contacts.sqlite";
/// Version stamped into `PRAGMA user_version`. There is a single table and no
/// migration path yet.
pub const SCHEMA_VERSION: i64 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("database schema version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: i64, expected: i64 },
}

/// Open (creating if needed) the database file at `path` and make sure the
/// contacts table exists.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    tracing::debug!(path = %path.display(), "contacts database ready");
    Ok(conn)
}

/// Create the contacts table and stamp the schema version on a fresh
/// database. A database written by a different schema version is refused.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .context("failed to read schema version")?;

    match version {
        0 => {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS contacts (
                    name TEXT PRIMARY KEY NOT NULL,
                    phone TEXT NOT NULL
                )",
                [],
            )
            .context("failed to create contacts table")?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)
                .context("failed to stamp schema version")?;
            tracing::info!(version = SCHEMA_VERSION, "initialized contacts schema");
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        found => Err(SchemaError::UnsupportedVersion {
            found,
            expected: SCHEMA_VERSION,
        }
        .into()),
    }
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Resolve the absolute path to the SQLite database inside the data directory.
pub fn db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_gets_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        // Running again is harmless.
        ensure_schema(&conn).unwrap();
    }

    #[test]
    fn newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 7).unwrap();
        let err = ensure_schema(&conn).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::UnsupportedVersion {
                found: 7,
                expected: 1
            })
        );
    }

    #[test]
    fn open_database_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("contacts.sqlite");
        open_database(&path).unwrap();
        assert!(path.exists());
    }
}
