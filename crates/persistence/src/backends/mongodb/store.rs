//! RecordStore implementation for MongoDB.

use async_trait::async_trait;
use mongodb::Collection;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;

use crate::core::RecordStore;
use crate::core::store::prepare_create;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{
    ID_FIELD, Record, RecordId, ResourceSchema, assign_id, requested_id,
};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Attempts at allocating an id before giving up. An allocated id only
/// collides when a caller-supplied id raced ahead of the high-water mark.
const MAX_ALLOCATION_ATTEMPTS: usize = 16;

fn serialization_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::SerializationError { message })
}

fn to_document(record: &Record) -> StorageResult<Document> {
    bson::to_document(record)
        .map_err(|e| serialization_error(format!("Failed to encode record: {}", e)))
}

/// Decodes a stored document, dropping Mongo's own `_id`.
fn from_document(mut document: Document) -> StorageResult<Record> {
    document.remove("_id");
    bson::from_document(document)
        .map_err(|e| serialization_error(format!("Failed to decode record: {}", e)))
}

fn as_i64(value: Option<&Bson>) -> Option<i64> {
    match value? {
        Bson::Int64(v) => Some(*v),
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

/// Returns the position of the first document rejected by the unique index.
fn duplicate_key_position(err: &mongodb::error::Error) -> Option<usize> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE => Some(0),
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()?
            .iter()
            .find(|w| w.code == DUPLICATE_KEY_CODE)
            .map(|w| w.index),
        _ => None,
    }
}

/// Builds the `$set` document for a merge.
///
/// Mongo reads a dotted key as a nested path and a `$` prefix as an operator,
/// so neither can be merged as a literal top-level field.
fn set_document(resource: &str, payload: &Record) -> StorageResult<Document> {
    if let Some(key) = payload
        .keys()
        .find(|k| k.contains('.') || k.starts_with('$'))
    {
        return Err(StorageError::InvalidRecord {
            resource: resource.to_string(),
            message: format!("field name `{}` cannot contain '.' or start with '$'", key),
        });
    }
    to_document(payload)
}

/// One resource stored as a Mongo collection of the same name.
pub struct MongoStore {
    collection: Collection<Document>,
    sequences: Collection<Document>,
    schema: ResourceSchema,
}

impl MongoStore {
    pub(crate) fn new(
        collection: Collection<Document>,
        sequences: Collection<Document>,
        schema: ResourceSchema,
    ) -> Self {
        Self {
            collection,
            sequences,
            schema,
        }
    }

    fn name(&self) -> &str {
        &self.schema.name
    }

    fn key(&self, id: &str) -> StorageResult<RecordId> {
        RecordId::parse_key(self.name(), id)
    }

    /// Lifts the high-water mark to the largest id already in the collection.
    pub(crate) async fn sync_high_water(&self) -> StorageResult<()> {
        let top = self
            .collection
            .find_one(doc! {})
            .sort(doc! { "id": -1 })
            .projection(doc! { "id": 1, "_id": 0 })
            .await?;

        let max = top
            .and_then(|d| as_i64(d.get(ID_FIELD)))
            .and_then(RecordId::new);
        if let Some(max) = max {
            self.raise_high_water(max).await?;
        }
        Ok(())
    }

    async fn raise_high_water(&self, id: RecordId) -> StorageResult<()> {
        self.sequences
            .update_one(
                doc! { "_id": self.name() },
                doc! { "$max": { "high_water": id.get() } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Atomically hands out `high_water + 1`.
    ///
    /// The mark only grows, so once it reads `i64::MAX` the collection has no
    /// ids left.
    async fn allocate(&self) -> StorageResult<RecordId> {
        let current = self
            .sequences
            .find_one(doc! { "_id": self.name() })
            .await?
            .and_then(|d| as_i64(d.get("high_water")));
        if current == Some(i64::MAX) {
            return Err(StorageError::ids_exhausted("mongodb", self.name()));
        }

        let sequence = self
            .sequences
            .find_one_and_update(
                doc! { "_id": self.name() },
                doc! { "$inc": { "high_water": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        sequence
            .and_then(|d| as_i64(d.get("high_water")))
            .and_then(RecordId::new)
            .ok_or_else(|| {
                StorageError::Backend(BackendError::Internal {
                    backend_name: "mongodb".to_string(),
                    message: format!("Sequence for {} returned no high-water mark", self.name()),
                    source: None,
                })
            })
    }

    async fn exists(&self, id: RecordId) -> StorageResult<bool> {
        let found = self
            .collection
            .find_one(doc! { "id": id.get() })
            .projection(doc! { "_id": 1 })
            .await?;
        Ok(found.is_some())
    }

    /// Inserts one record; `Ok(false)` means the id was already taken.
    async fn try_insert(&self, id: RecordId, record: &Record) -> StorageResult<bool> {
        match self.collection.insert_one(to_document(record)?).await {
            Ok(_) => {
                self.raise_high_water(id).await?;
                Ok(true)
            }
            Err(e) if duplicate_key_position(&e).is_some() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_allocated(&self, mut record: Record) -> StorageResult<Record> {
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let id = self.allocate().await?;
            assign_id(&mut record, id);
            if self.try_insert(id, &record).await? {
                return Ok(record);
            }
            tracing::debug!(collection = %self.name(), %id, "Allocated id already taken, retrying");
        }
        Err(StorageError::Backend(BackendError::Internal {
            backend_name: "mongodb".to_string(),
            message: format!(
                "Could not allocate a free id for {} after {} attempts",
                self.name(),
                MAX_ALLOCATION_ATTEMPTS
            ),
            source: None,
        }))
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    async fn create(&self, payload: Record) -> StorageResult<Record> {
        let (mut record, requested) = prepare_create(&self.schema, payload)?;

        match requested {
            Some(id) => {
                assign_id(&mut record, id);
                if self.try_insert(id, &record).await? {
                    Ok(record)
                } else {
                    Err(StorageError::duplicate_key(self.name(), id))
                }
            }
            None => self.insert_allocated(record).await,
        }
    }

    async fn get(&self, id: &str) -> StorageResult<Record> {
        let key = self.key(id)?;
        let found = self
            .collection
            .find_one(doc! { "id": key.get() })
            .projection(doc! { "_id": 0 })
            .await?;
        match found {
            Some(document) => from_document(document),
            None => Err(StorageError::not_found(self.name(), id)),
        }
    }

    async fn update(&self, id: &str, mut payload: Record) -> StorageResult<Record> {
        let key = self.key(id)?;
        payload.shift_remove(ID_FIELD);
        if payload.is_empty() {
            return self.get(id).await;
        }
        let set = set_document(self.name(), &payload)?;

        let updated = self
            .collection
            .find_one_and_update(
                doc! { "id": key.get() },
                doc! { "$set": set },
            )
            .projection(doc! { "_id": 0 })
            .return_document(ReturnDocument::After)
            .await?;
        match updated {
            Some(document) => from_document(document),
            None => Err(StorageError::not_found(self.name(), id)),
        }
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let key = self.key(id)?;
        let result = self.collection.delete_one(doc! { "id": key.get() }).await?;
        if result.deleted_count == 0 {
            return Err(StorageError::not_found(self.name(), id));
        }
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Record>> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .projection(doc! { "_id": 0 })
            .await?;
        let mut records = Vec::new();
        while cursor.advance().await? {
            records.push(from_document(cursor.deserialize_current()?)?);
        }
        Ok(records)
    }

    async fn count(&self) -> StorageResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn bulk_insert(&self, records: Vec<Record>) -> StorageResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut ids = Vec::with_capacity(records.len());
        let mut documents = Vec::with_capacity(records.len());
        for mut record in records {
            let id = match requested_id(self.name(), &record)? {
                Some(id) => id,
                None => self.allocate().await?,
            };
            assign_id(&mut record, id);
            documents.push(to_document(&record)?);
            ids.push(id);
        }

        let written = documents.len();
        if let Err(e) = self.collection.insert_many(documents).ordered(false).await {
            return Err(match duplicate_key_position(&e) {
                Some(pos) => StorageError::duplicate_key(
                    self.name(),
                    ids.get(pos).map_or_else(|| "?".to_string(), ToString::to_string),
                ),
                None => e.into(),
            });
        }

        if let Some(max) = ids.into_iter().max() {
            self.raise_high_water(max).await?;
        }
        Ok(written)
    }

    async fn insert_if_absent(&self, mut record: Record) -> StorageResult<bool> {
        match requested_id(self.name(), &record)? {
            Some(id) => {
                if self.exists(id).await? {
                    return Ok(false);
                }
                assign_id(&mut record, id);
                self.try_insert(id, &record).await
            }
            None => self.insert_allocated(record).await.map(|_| true),
        }
    }
}
