//! In-memory backend.
//!
//! Each collection is a `Vec` of records in insertion order with an id to
//! position index beside it, guarded by one `parking_lot::RwLock`. Nothing is
//! persisted; the usual way to populate it is the seed loader.
//!
//! # Example
//!
//! ```
//! use placeholder_persistence::backends::memory::MemoryBackend;
//! use placeholder_persistence::core::Backend;
//! use placeholder_persistence::types::ResourceSchema;
//!
//! # tokio_test_block(async {
//! let backend = MemoryBackend::new();
//! let albums = backend.open_store(&ResourceSchema::new("albums")).await.unwrap();
//! assert_eq!(albums.count().await.unwrap(), 0);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod backend;
mod store;

pub use backend::MemoryBackend;
pub use store::MemoryStore;
