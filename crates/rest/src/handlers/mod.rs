//! HTTP request handlers.
//!
//! Each record handler turns the request into an
//! [`Operation`](crate::operation::Operation) and runs it through
//! [`execute`](crate::operation::execute):
//!
//! - [`create`] - Insert a record
//! - [`list`] - List a collection
//! - [`read`] - Read a record by id
//! - [`update`] - Merge fields into a record (PUT and PATCH)
//! - [`delete`] - Delete a record
//! - [`catalog`] - List the configured resources
//! - [`health`] - Health and readiness probes

pub mod catalog;
pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod read;
pub mod update;

pub use catalog::catalog_handler;
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use read::read_handler;
pub use update::update_handler;
