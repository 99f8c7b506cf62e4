use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::record::{FieldMap, RecordId, Version, VersionedRecord};

use super::{StoreError, VersionStore, VersionStrategy};

type History = BTreeMap<Version, FieldMap>;

/// In-memory version store backed by `Arc<RwLock<HashMap>>`.
///
/// Clone-friendly (cloning shares the same underlying storage). Appends
/// take the write lock, reads share the read lock.
#[derive(Clone)]
pub struct InMemoryVersionStore {
    storage: Arc<RwLock<HashMap<RecordId, History>>>,
    strategy: VersionStrategy,
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self::with_strategy(VersionStrategy::default())
    }

    pub fn with_strategy(strategy: VersionStrategy) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            strategy,
        }
    }

    pub fn strategy(&self) -> VersionStrategy {
        self.strategy
    }
}

impl VersionStore for InMemoryVersionStore {
    fn append_version(
        &self,
        id: RecordId,
        fields: FieldMap,
    ) -> Result<VersionedRecord, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("append"))?;
        let history = storage.entry(id).or_default();
        let latest = history.keys().next_back().copied();
        let version = self
            .strategy
            .next(latest)
            .ok_or(StoreError::VersionsExhausted(id))?;

        history.insert(version, fields.clone());
        tracing::debug!(id = %id, version, "appended version");

        Ok(VersionedRecord::new(id, version, fields))
    }

    fn read_latest(&self, id: RecordId) -> Result<Option<VersionedRecord>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read latest"))?;
        Ok(storage
            .get(&id)
            .and_then(|history| history.iter().next_back())
            .map(|(version, fields)| VersionedRecord::new(id, *version, fields.clone())))
    }

    fn read_version(
        &self,
        id: RecordId,
        version: Version,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read version"))?;
        Ok(storage
            .get(&id)
            .and_then(|history| history.get(&version))
            .map(|fields| VersionedRecord::new(id, version, fields.clone())))
    }

    fn read_all(&self, id: RecordId) -> Result<Vec<VersionedRecord>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read all"))?;
        Ok(storage
            .get(&id)
            .map(|history| {
                history
                    .iter()
                    .map(|(version, fields)| VersionedRecord::new(id, *version, fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn read_versions(
        &self,
        id: RecordId,
        versions: &[Version],
    ) -> Result<Vec<VersionedRecord>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read versions"))?;
        let history = storage.get(&id);
        Ok(versions
            .iter()
            .map(|version| {
                history
                    .and_then(|history| history.get(version))
                    .map(|fields| VersionedRecord::new(id, *version, fields.clone()))
                    .unwrap_or_else(VersionedRecord::placeholder)
            })
            .collect())
    }
}
