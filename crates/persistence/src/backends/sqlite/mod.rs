//! SQLite backend implementation.
//!
//! Supports both in-memory databases (handy for tests) and file-based
//! databases that survive restarts.
//!
//! # Example
//!
//! ```no_run
//! use placeholder_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Schema is initialized on open
//! let backend = SqliteBackend::open("./data/records.db")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! -- Every collection shares one table, keyed by (collection, id)
//! CREATE TABLE records (
//!     seq INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order
//!     collection TEXT NOT NULL,
//!     id INTEGER NOT NULL,
//!     data BLOB NOT NULL,                     -- JSON record
//!     UNIQUE (collection, id)
//! );
//!
//! -- Largest id each collection has ever held
//! CREATE TABLE collection_sequences (
//!     collection TEXT PRIMARY KEY,
//!     high_water INTEGER NOT NULL DEFAULT 0
//! );
//! ```
//!
//! Writes that check-then-insert run in an `IMMEDIATE` transaction, which takes
//! the database write lock up front.

mod backend;
mod schema;
mod store;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use store::SqliteStore;
