//! RecordStore implementation for SQLite.

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use crate::core::RecordStore;
use crate::core::store::prepare_create;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{
    Record, RecordId, ResourceSchema, assign_id, merge_into, requested_id,
};

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

fn serialization_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::SerializationError { message })
}

fn encode(record: &Record) -> StorageResult<Vec<u8>> {
    serde_json::to_vec(record)
        .map_err(|e| serialization_error(format!("Failed to serialize record: {}", e)))
}

fn decode(data: &[u8]) -> StorageResult<Record> {
    serde_json::from_slice(data)
        .map_err(|e| serialization_error(format!("Failed to deserialize record: {}", e)))
}

/// One collection stored as rows of the shared `records` table.
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
    schema: ResourceSchema,
}

impl SqliteStore {
    pub(crate) fn new(pool: Pool<SqliteConnectionManager>, schema: ResourceSchema) -> Self {
        Self { pool, schema }
    }

    fn collection(&self) -> &str {
        &self.schema.name
    }

    fn get_connection(&self) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn key(&self, id: &str) -> StorageResult<RecordId> {
        RecordId::parse_key(self.collection(), id)
    }

    fn exists(&self, conn: &Connection, id: RecordId) -> StorageResult<bool> {
        Ok(conn
            .query_row(
                "SELECT 1 FROM records WHERE collection = ?1 AND id = ?2",
                params![self.collection(), id.get()],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }

    fn read_row(&self, conn: &Connection, id: RecordId) -> StorageResult<Option<Record>> {
        let data: Option<Vec<u8>> = conn
            .query_row(
                "SELECT data FROM records WHERE collection = ?1 AND id = ?2",
                params![self.collection(), id.get()],
                |row| row.get(0),
            )
            .optional()?;
        data.as_deref().map(decode).transpose()
    }

    /// Hands out `high_water + 1` and records it as the new high-water mark.
    ///
    /// Must run inside an IMMEDIATE transaction so the read and the write see
    /// the same mark.
    fn allocate(&self, conn: &Connection) -> StorageResult<RecordId> {
        let high_water: Option<i64> = conn
            .query_row(
                "SELECT high_water FROM collection_sequences WHERE collection = ?1",
                params![self.collection()],
                |row| row.get(0),
            )
            .optional()?;

        let id = RecordId::after(high_water.and_then(RecordId::new))
            .ok_or_else(|| StorageError::ids_exhausted("sqlite", self.collection()))?;
        self.raise_high_water(conn, id)?;
        Ok(id)
    }

    fn raise_high_water(&self, conn: &Connection, id: RecordId) -> StorageResult<()> {
        conn.execute(
            "INSERT INTO collection_sequences (collection, high_water) VALUES (?1, ?2)
             ON CONFLICT (collection) DO UPDATE SET
                 high_water = MAX(high_water, excluded.high_water)",
            params![self.collection(), id.get()],
        )?;
        Ok(())
    }

    fn insert_row(&self, conn: &Connection, id: RecordId, record: &Record) -> StorageResult<()> {
        conn.execute(
            "INSERT INTO records (collection, id, data) VALUES (?1, ?2, ?3)",
            params![self.collection(), id.get(), encode(record)?],
        )
        .map_err(|e| internal_error(format!("Failed to insert record: {}", e)))?;
        self.raise_high_water(conn, id)
    }

    /// Resolves the id of a trusted record, allocating one when it carries none.
    fn trusted_id(&self, conn: &Connection, record: &mut Record) -> StorageResult<RecordId> {
        let id = match requested_id(self.collection(), record)? {
            Some(id) => id,
            None => self.allocate(conn)?,
        };
        assign_id(record, id);
        Ok(id)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    async fn create(&self, payload: Record) -> StorageResult<Record> {
        let (mut record, requested) = prepare_create(&self.schema, payload)?;

        let mut conn = self.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = match requested {
            Some(id) if self.exists(&tx, id)? => {
                return Err(StorageError::duplicate_key(self.collection(), id));
            }
            Some(id) => id,
            None => self.allocate(&tx)?,
        };
        assign_id(&mut record, id);
        self.insert_row(&tx, id, &record)?;
        tx.commit()?;

        Ok(record)
    }

    async fn get(&self, id: &str) -> StorageResult<Record> {
        let key = self.key(id)?;
        let conn = self.get_connection()?;
        self.read_row(&conn, key)?
            .ok_or_else(|| StorageError::not_found(self.collection(), id))
    }

    async fn update(&self, id: &str, payload: Record) -> StorageResult<Record> {
        let key = self.key(id)?;
        let mut conn = self.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut record = self
            .read_row(&tx, key)?
            .ok_or_else(|| StorageError::not_found(self.collection(), id))?;
        merge_into(&mut record, payload);

        tx.execute(
            "UPDATE records SET data = ?3 WHERE collection = ?1 AND id = ?2",
            params![self.collection(), key.get(), encode(&record)?],
        )
        .map_err(|e| internal_error(format!("Failed to update record: {}", e)))?;
        tx.commit()?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let key = self.key(id)?;
        let conn = self.get_connection()?;
        let removed = conn
            .execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2",
                params![self.collection(), key.get()],
            )
            .map_err(|e| internal_error(format!("Failed to delete record: {}", e)))?;

        if removed == 0 {
            return Err(StorageError::not_found(self.collection(), id));
        }
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Record>> {
        let conn = self.get_connection()?;
        let mut stmt =
            conn.prepare("SELECT data FROM records WHERE collection = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![self.collection()], |row| row.get::<_, Vec<u8>>(0))?;

        let mut records = Vec::new();
        for data in rows {
            records.push(decode(&data?)?);
        }
        Ok(records)
    }

    async fn count(&self) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1",
            params![self.collection()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    async fn bulk_insert(&self, records: Vec<Record>) -> StorageResult<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let written = records.len();
        for mut record in records {
            let id = self.trusted_id(&tx, &mut record)?;
            tx.execute(
                "INSERT INTO records (collection, id, data) VALUES (?1, ?2, ?3)
                 ON CONFLICT (collection, id) DO UPDATE SET data = excluded.data",
                params![self.collection(), id.get(), encode(&record)?],
            )
            .map_err(|e| internal_error(format!("Failed to load record: {}", e)))?;
            self.raise_high_water(&tx, id)?;
        }
        tx.commit()?;

        Ok(written)
    }

    async fn insert_if_absent(&self, mut record: Record) -> StorageResult<bool> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(id) = requested_id(self.collection(), &record)? {
            if self.exists(&tx, id)? {
                return Ok(false);
            }
        }
        let id = self.trusted_id(&tx, &mut record)?;
        self.insert_row(&tx, id, &record)?;
        tx.commit()?;

        Ok(true)
    }
}
