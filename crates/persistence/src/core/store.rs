//! Core record storage trait.
//!
//! This module defines the [`RecordStore`] trait, the CRUD surface of a single
//! collection. Callers only ever see `Arc<dyn RecordStore>`; which backend sits
//! behind it is decided once at startup.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{Record, RecordId, ResourceSchema, requested_id};

/// Applies create-time defaults and reads the caller's `id`, if any.
///
/// Shared by every backend so that payload handling is identical regardless of
/// where the record ends up.
pub(crate) fn prepare_create(
    schema: &ResourceSchema,
    mut payload: Record,
) -> StorageResult<(Record, Option<RecordId>)> {
    let requested = requested_id(&schema.name, &payload)?;
    schema.apply_defaults(&mut payload);
    Ok((payload, requested))
}

/// CRUD operations over one collection of records.
///
/// # Identifiers
///
/// Every record carries a positive integer `id`, unique within the collection.
/// Methods that look a record up take the raw id as it arrived from the caller;
/// an id that does not parse as a [`RecordId`](crate::types::RecordId) is
/// reported as [`StorageError::NotFound`](crate::error::StorageError::NotFound).
///
/// # Id allocation
///
/// A create without an `id` receives `high_water + 1`, where the high-water
/// mark is the largest id the store has ever held. Ids are therefore strictly
/// increasing and never reuse the id of a deleted record.
///
/// # Atomicity
///
/// The duplicate check and the insert of a create are one atomic step, as is
/// id allocation. Two concurrent creates can never both succeed with the same
/// id.
///
/// # Example
///
/// ```ignore
/// use placeholder_persistence::core::RecordStore;
///
/// async fn example(store: &dyn RecordStore) -> StorageResult<()> {
///     let payload = serde_json::json!({"userId": 1, "title": "New Album"});
///     let created = store.create(payload.as_object().cloned().unwrap()).await?;
///
///     let id = created["id"].to_string();
///     let read = store.get(&id).await?;
///     assert_eq!(read, created);
///
///     store.delete(&id).await?;
///     assert!(store.get(&id).await.is_err());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the shape of the collection this store holds.
    fn schema(&self) -> &ResourceSchema;

    /// Returns the collection name.
    fn resource(&self) -> &str {
        &self.schema().name
    }

    /// Creates a record.
    ///
    /// # Errors
    ///
    /// * `StorageError::DuplicateKey` - The payload's `id` already exists
    /// * `StorageError::InvalidRecord` - The payload's `id` is not a positive integer
    async fn create(&self, payload: Record) -> StorageResult<Record>;

    /// Reads a record by id.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - No such record, or the id is malformed
    async fn get(&self, id: &str) -> StorageResult<Record>;

    /// Merges `payload` into an existing record and returns the result.
    ///
    /// Fields absent from the payload are preserved and the stored `id` never
    /// changes.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - No such record, or the id is malformed
    async fn update(&self, id: &str, payload: Record) -> StorageResult<Record>;

    /// Removes a record.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - No such record, or the id is malformed
    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Returns every record in insertion order.
    async fn list(&self) -> StorageResult<Vec<Record>>;

    /// Returns the number of records.
    async fn count(&self) -> StorageResult<u64>;

    /// Appends trusted records without duplicate checking.
    ///
    /// Used by the seed loader. Records without an `id` are allocated one.
    /// Returns the number of records written.
    async fn bulk_insert(&self, records: Vec<Record>) -> StorageResult<usize>;

    /// Inserts `record` only if no record with its id exists.
    ///
    /// Returns `false` when the record was skipped.
    async fn insert_if_absent(&self, record: Record) -> StorageResult<bool>;
}
