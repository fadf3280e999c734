//! Snapshot seeding.
//!
//! - [`Snapshot`] - The fixed initial dataset, read from a JSON file
//! - [`SeedLoader`] - Writes a snapshot into a [`ResourceRegistry`](crate::registry::ResourceRegistry)
//!
//! [`SeedMode::Bulk`] writes records straight in through `bulk_insert`.
//! [`SeedMode::IfEmpty`] does the same but only for stores that hold nothing
//! yet; the server boots with it so reopening a database keeps its state.
//! [`SeedMode::SkipExisting`] is for topping up a database that may already
//! hold some of the records.

mod loader;
mod snapshot;

pub use loader::{ResourceReport, SeedLoader, SeedMode, SeedReport};
pub use snapshot::Snapshot;
