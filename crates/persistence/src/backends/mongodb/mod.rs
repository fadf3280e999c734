//! MongoDB backend implementation.
//!
//! Each resource is a Mongo collection with the same name, holding records as
//! plain documents. A unique index on `id` enforces key uniqueness; Mongo's own
//! `_id` is never returned to callers.
//!
//! High-water marks live in the `_sequences` collection, one document per
//! resource:
//!
//! ```text
//! { "_id": "albums", "high_water": 100 }
//! ```
//!
//! Allocation is a single `findOneAndUpdate` with `$inc`; explicit ids raise
//! the mark with `$max`.
//!
//! # Example
//!
//! ```no_run
//! use placeholder_persistence::backends::mongodb::{MongoBackend, MongoConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MongoBackend::connect(MongoConfig::new(
//!     "mongodb://localhost:27017",
//!     "webAPINoSQL",
//! ))
//! .await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod store;

pub use backend::{MongoBackend, MongoConfig};
pub use store::MongoStore;
