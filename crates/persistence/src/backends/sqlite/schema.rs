//! SQLite schema definitions and migrations.

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

fn migration_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::MigrationError { message })
}

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(migration_error(format!(
            "database schema version {} is newer than supported version {}",
            current_version, SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| migration_error(format!("Failed to create schema_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| migration_error(format!("Failed to clear schema_version: {}", e)))?;

    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| migration_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

/// Create the version 1 schema.
///
/// `seq` gives insertion order; `(collection, id)` is the record key.
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS records (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            id INTEGER NOT NULL,
            data BLOB NOT NULL,
            UNIQUE (collection, id)
        );

        CREATE TABLE IF NOT EXISTS collection_sequences (
            collection TEXT PRIMARY KEY,
            high_water INTEGER NOT NULL DEFAULT 0
        );",
    )
    .map_err(|e| migration_error(format!("Failed to create tables: {}", e)))?;

    Ok(())
}

/// Registers a collection, lifting its high-water mark to the largest id it
/// already holds.
pub fn register_collection(conn: &Connection, collection: &str) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO collection_sequences (collection, high_water)
         VALUES (?1, COALESCE((SELECT MAX(id) FROM records WHERE collection = ?1), 0))
         ON CONFLICT (collection) DO UPDATE SET high_water = MAX(
             high_water,
             COALESCE((SELECT MAX(id) FROM records WHERE collection = ?1), 0)
         )",
        params![collection],
    )?;
    Ok(())
}
