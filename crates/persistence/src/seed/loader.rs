//! Loading a snapshot into the registry's stores.

use serde::Serialize;

use crate::error::{SeedError, SeedResult};
use crate::registry::ResourceRegistry;
use crate::types::record_id;

use super::Snapshot;

/// How records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// Write every record through `bulk_insert`, whatever the store holds.
    #[default]
    Bulk,
    /// Insert a record only if its id is free; existing records are left
    /// untouched and counted as skipped.
    SkipExisting,
    /// Bulk-load a resource only when its store holds no records. A store
    /// that already has data is left alone and all its snapshot records are
    /// counted as skipped. Used at boot against a persistent database, so a
    /// restart never brings deleted or edited records back.
    IfEmpty,
}

/// Outcome for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceReport {
    /// Resource name.
    pub resource: String,
    /// Records written.
    pub inserted: usize,
    /// Records left out because their id was taken.
    pub skipped: usize,
}

/// Outcome of a whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Per-resource counts, in snapshot order.
    pub resources: Vec<ResourceReport>,
    /// Snapshot entries that name no configured resource.
    pub unknown: Vec<String>,
}

impl SeedReport {
    /// Records written across all resources.
    pub fn total_inserted(&self) -> usize {
        self.resources.iter().map(|r| r.inserted).sum()
    }

    /// Records skipped across all resources.
    pub fn total_skipped(&self) -> usize {
        self.resources.iter().map(|r| r.skipped).sum()
    }

    /// Counts for one resource.
    pub fn get(&self, resource: &str) -> Option<&ResourceReport> {
        self.resources.iter().find(|r| r.resource == resource)
    }
}

/// Writes snapshots into a [`ResourceRegistry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedLoader;

impl SeedLoader {
    /// Loads `snapshot` into `registry`.
    ///
    /// Unknown resources are skipped with a warning. Any store failure aborts
    /// the load; records already written stay written.
    pub async fn load(
        registry: &ResourceRegistry,
        snapshot: &Snapshot,
        mode: SeedMode,
    ) -> SeedResult<SeedReport> {
        let mut report = SeedReport::default();

        for (resource, records) in snapshot.iter() {
            let store = match registry.store_for(resource) {
                Ok(store) => store,
                Err(_) => {
                    tracing::warn!(resource, "Snapshot names an unknown resource, skipping");
                    report.unknown.push(resource.to_string());
                    continue;
                }
            };

            let storage_error = |source| SeedError::Storage {
                resource: resource.to_string(),
                source,
            };

            let mut entry = ResourceReport {
                resource: resource.to_string(),
                ..Default::default()
            };

            match mode {
                SeedMode::Bulk => {
                    entry.inserted = store
                        .bulk_insert(records.to_vec())
                        .await
                        .map_err(storage_error)?;
                }
                SeedMode::IfEmpty => {
                    let existing = store.count().await.map_err(storage_error)?;
                    if existing == 0 {
                        entry.inserted = store
                            .bulk_insert(records.to_vec())
                            .await
                            .map_err(storage_error)?;
                    } else {
                        entry.skipped = records.len();
                        tracing::info!(
                            resource,
                            existing,
                            "Store already holds records, leaving it untouched"
                        );
                    }
                }
                SeedMode::SkipExisting => {
                    for record in records {
                        if store
                            .insert_if_absent(record.clone())
                            .await
                            .map_err(storage_error)?
                        {
                            entry.inserted += 1;
                        } else {
                            entry.skipped += 1;
                            tracing::warn!(
                                resource,
                                id = ?record_id(record),
                                "Record already exists, skipping"
                            );
                        }
                    }
                }
            }

            tracing::info!(
                resource,
                inserted = entry.inserted,
                skipped = entry.skipped,
                "Seeded resource"
            );
            report.resources.push(entry);
        }

        Ok(report)
    }
}
