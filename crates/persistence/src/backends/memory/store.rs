//! RecordStore implementation over process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::RecordStore;
use crate::core::store::prepare_create;
use crate::error::{StorageError, StorageResult};
use crate::types::{
    Record, RecordId, ResourceSchema, assign_id, merge_into, requested_id,
};

/// Records of one collection plus the bookkeeping needed to allocate ids.
#[derive(Debug, Default)]
struct CollectionState {
    /// Records in insertion order.
    records: Vec<Record>,
    /// Id to position in `records`.
    index: HashMap<RecordId, usize>,
    /// Largest id ever held.
    high_water: Option<RecordId>,
}

impl CollectionState {
    fn raise_high_water(&mut self, id: RecordId) {
        if self.high_water.is_none_or(|hw| id > hw) {
            self.high_water = Some(id);
        }
    }

    /// Hands out `high_water + 1`, or `None` once the id space is used up.
    fn allocate(&mut self) -> Option<RecordId> {
        let id = RecordId::after(self.high_water)?;
        self.high_water = Some(id);
        Some(id)
    }

    fn push(&mut self, id: RecordId, record: Record) {
        self.index.insert(id, self.records.len());
        self.records.push(record);
        self.raise_high_water(id);
    }

    /// Inserts or, for an id already present, replaces in place.
    fn put(&mut self, id: RecordId, record: Record) {
        match self.index.get(&id) {
            Some(&pos) => self.records[pos] = record,
            None => self.push(id, record),
        }
    }

    fn remove(&mut self, id: RecordId) -> Option<Record> {
        let pos = self.index.remove(&id)?;
        let removed = self.records.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }
}

/// One collection held in memory.
///
/// All state sits behind a single `parking_lot::RwLock`; every operation takes
/// the lock once and releases it before returning, so no lock is ever held
/// across an `.await`.
#[derive(Debug)]
pub struct MemoryStore {
    schema: ResourceSchema,
    state: RwLock<CollectionState>,
}

impl MemoryStore {
    /// Creates an empty store for `schema`.
    pub fn new(schema: ResourceSchema) -> Self {
        Self {
            schema,
            state: RwLock::new(CollectionState::default()),
        }
    }

    fn key(&self, id: &str) -> StorageResult<RecordId> {
        RecordId::parse_key(&self.schema.name, id)
    }

    fn allocate(&self, state: &mut CollectionState) -> StorageResult<RecordId> {
        state
            .allocate()
            .ok_or_else(|| StorageError::ids_exhausted("memory", &self.schema.name))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    async fn create(&self, payload: Record) -> StorageResult<Record> {
        let (mut record, requested) = prepare_create(&self.schema, payload)?;

        let mut state = self.state.write();
        let id = match requested {
            Some(id) if state.index.contains_key(&id) => {
                return Err(StorageError::duplicate_key(&self.schema.name, id));
            }
            Some(id) => id,
            None => self.allocate(&mut state)?,
        };
        assign_id(&mut record, id);
        state.push(id, record.clone());

        Ok(record)
    }

    async fn get(&self, id: &str) -> StorageResult<Record> {
        let key = self.key(id)?;
        let state = self.state.read();
        state
            .index
            .get(&key)
            .map(|&pos| state.records[pos].clone())
            .ok_or_else(|| StorageError::not_found(&self.schema.name, id))
    }

    async fn update(&self, id: &str, payload: Record) -> StorageResult<Record> {
        let key = self.key(id)?;
        let mut state = self.state.write();
        let pos = *state
            .index
            .get(&key)
            .ok_or_else(|| StorageError::not_found(&self.schema.name, id))?;

        let record = &mut state.records[pos];
        merge_into(record, payload);
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let key = self.key(id)?;
        self.state
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(&self.schema.name, id))
    }

    async fn list(&self) -> StorageResult<Vec<Record>> {
        Ok(self.state.read().records.clone())
    }

    async fn count(&self) -> StorageResult<u64> {
        Ok(self.state.read().records.len() as u64)
    }

    async fn bulk_insert(&self, records: Vec<Record>) -> StorageResult<usize> {
        let requested = records
            .iter()
            .map(|record| requested_id(&self.schema.name, record))
            .collect::<StorageResult<Vec<_>>>()?;

        let mut state = self.state.write();

        // Resolve every id against a scratch mark so a failure leaves the
        // collection untouched.
        let mut high_water = state.high_water;
        let mut staged = Vec::with_capacity(records.len());
        for (mut record, requested) in records.into_iter().zip(requested) {
            let id = match requested {
                Some(id) => id,
                None => RecordId::after(high_water)
                    .ok_or_else(|| StorageError::ids_exhausted("memory", &self.schema.name))?,
            };
            if high_water.is_none_or(|hw| id > hw) {
                high_water = Some(id);
            }
            assign_id(&mut record, id);
            staged.push((id, record));
        }

        let written = staged.len();
        for (id, record) in staged {
            state.put(id, record);
        }
        Ok(written)
    }

    async fn insert_if_absent(&self, mut record: Record) -> StorageResult<bool> {
        let mut state = self.state.write();
        let id = match requested_id(&self.schema.name, &record)? {
            Some(id) if state.index.contains_key(&id) => return Ok(false),
            Some(id) => id,
            None => self.allocate(&mut state)?,
        };
        assign_id(&mut record, id);
        state.push(id, record);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn albums() -> MemoryStore {
        MemoryStore::new(ResourceSchema::new("albums"))
    }

    #[tokio::test]
    async fn test_remove_keeps_index_consistent() {
        let store = albums();
        store
            .bulk_insert(vec![
                record(json!({"id": 1, "title": "a"})),
                record(json!({"id": 2, "title": "b"})),
                record(json!({"id": 3, "title": "c"})),
            ])
            .await
            .unwrap();

        store.delete("1").await.unwrap();
        assert_eq!(store.get("3").await.unwrap()["title"], json!("c"));
        assert_eq!(store.get("2").await.unwrap()["title"], json!("b"));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_bulk_insert_replaces_repeated_id_in_place() {
        let store = albums();
        let written = store
            .bulk_insert(vec![
                record(json!({"id": 1, "title": "first"})),
                record(json!({"id": 2, "title": "second"})),
                record(json!({"id": 1, "title": "again"})),
            ])
            .await
            .unwrap();

        assert_eq!(written, 3);
        let titles: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r["title"].clone())
            .collect();
        assert_eq!(titles, vec![json!("again"), json!("second")]);
    }

    #[tokio::test]
    async fn test_high_water_survives_delete_of_max() {
        let store = albums();
        let a = store.create(record(json!({"title": "a"}))).await.unwrap();
        let b = store.create(record(json!({"title": "b"}))).await.unwrap();
        assert_eq!(b["id"], json!(2));

        store.delete("2").await.unwrap();
        let c = store.create(record(json!({"title": "c"}))).await.unwrap();
        assert_eq!(a["id"], json!(1));
        assert_eq!(c["id"], json!(3));
    }
}
