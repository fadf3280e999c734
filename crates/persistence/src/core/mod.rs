//! Core storage traits and abstractions.
//!
//! - [`Backend`] - Storage engine lifecycle (open stores, health, close)
//! - [`RecordStore`] - CRUD over one collection
//!
//! ```text
//! Backend ──open_store(schema)──▶ Arc<dyn RecordStore>   (one per collection)
//! ```

pub mod backend;
pub mod store;

pub use backend::{Backend, BackendKind};
pub use store::RecordStore;
