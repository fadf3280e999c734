//! Axum extractors for request bodies.
//!
//! - [`RecordBody`] - A JSON object body, rejected with 400 otherwise

mod record_body;

pub use record_body::RecordBody;
