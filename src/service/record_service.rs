//! Record service: turns "set these fields, delete those" into appends.
//!
//! `RecordService<S>` wraps a `VersionStore` and a per-id lock table. Every
//! write takes the record's lock, reads the latest version, merges and
//! appends, so concurrent updates to one record are applied one after the
//! other and none of them is lost.
//!
//! ## Example
//!
//! ```ignore
//! use timetravel::{InMemoryVersionStore, RecordId, RecordService, Update};
//!
//! let service = RecordService::new(InMemoryVersionStore::new());
//! let id = RecordId::new(7)?;
//! service.apply_update(id, &Update::new().set("a", "1").set("b", "2"))?;
//! service.apply_update(id, &Update::new().delete("b"))?;
//!
//! assert_eq!(service.get_all_records(id)?.len(), 2);
//! ```

use crate::error::RecordError;
use crate::lock::{InMemoryLockManager, LockGuard, LockManager};
use crate::record::{Record, RecordId, Update, Version, VersionedRecord};
use crate::store::{StoreError, VersionStore};

/// Versioned record operations on top of a `VersionStore`.
///
/// Generic over the store `S` and the lock table `L`.
pub struct RecordService<S, L = InMemoryLockManager> {
    store: S,
    locks: L,
}

impl<S: VersionStore> RecordService<S> {
    /// Create a service with an in-memory lock table.
    pub fn new(store: S) -> Self {
        Self::with_lock_manager(store, InMemoryLockManager::new())
    }
}

impl<S: VersionStore, L: LockManager> RecordService<S, L> {
    pub fn with_lock_manager(store: S, locks: L) -> Self {
        Self { store, locks }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Latest version of `id`.
    pub fn get_record(&self, id: RecordId) -> Result<VersionedRecord, RecordError> {
        self.store
            .read_latest(id)?
            .ok_or(RecordError::NotFound(id))
    }

    /// Every version of `id`, oldest first. Empty if the record is absent.
    pub fn get_all_records(&self, id: RecordId) -> Result<Vec<VersionedRecord>, RecordError> {
        Ok(self.store.read_all(id)?)
    }

    /// The requested versions in request order, with placeholders for
    /// versions that do not exist.
    pub fn get_records_with_versions(
        &self,
        id: RecordId,
        versions: &[Version],
    ) -> Result<Vec<VersionedRecord>, RecordError> {
        Ok(self.store.read_versions(id, versions)?)
    }

    /// Create the record if absent, otherwise merge onto its latest version.
    /// Always appends exactly one new version.
    pub fn apply_update(
        &self,
        id: RecordId,
        update: &Update,
    ) -> Result<VersionedRecord, RecordError> {
        self.locked(id, || {
            let record = self.store.apply_update(id, update)?;
            tracing::info!(id = %id, version = record.version, "applied update");
            Ok(record)
        })
    }

    /// Legacy create: append the first version of an absent record.
    pub fn create_record(&self, record: Record) -> Result<VersionedRecord, RecordError> {
        let id = record.id;
        self.locked(id, || {
            if self.store.read_latest(id)?.is_some() {
                return Err(RecordError::AlreadyExists(id));
            }
            let created = self.store.append_version(id, record.data)?;
            tracing::info!(id = %id, version = created.version, "created record");
            Ok(created)
        })
    }

    /// Legacy update: merge onto the latest version of a present record.
    pub fn update_record(
        &self,
        id: RecordId,
        update: &Update,
    ) -> Result<VersionedRecord, RecordError> {
        self.locked(id, || {
            let latest = self
                .store
                .read_latest(id)?
                .ok_or(RecordError::NotFound(id))?;
            let updated = self.store.append_version(id, update.merge(&latest.data))?;
            tracing::info!(
                id = %id,
                from = latest.version,
                version = updated.version,
                "updated record"
            );
            Ok(updated)
        })
    }

    fn locked<T>(
        &self,
        id: RecordId,
        f: impl FnOnce() -> Result<T, RecordError>,
    ) -> Result<T, RecordError> {
        let lock = self.locks.get_lock(id).map_err(StoreError::from)?;
        let _guard = LockGuard::acquire(lock).map_err(StoreError::from)?;
        f()
    }
}
