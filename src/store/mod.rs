//! Version store: append-only storage of `(id, version) -> fields`.
//!
//! Every write appends a new immutable version; nothing is ever updated in
//! place or deleted. Backends pick the next version inside their own write
//! critical section, so versions for one id are unique and strictly
//! increasing no matter how many threads append.
//!
//! ## Example
//!
//! ```ignore
//! use timetravel::{InMemoryVersionStore, RecordId, Update, VersionStore};
//!
//! let store = InMemoryVersionStore::new();
//! let id = RecordId::new(7)?;
//! let v1 = store.apply_update(id, &Update::new().set("a", "1"))?;
//! let v2 = store.apply_update(id, &Update::new().delete("a"))?;
//! assert!(v1.version < v2.version);
//! assert_eq!(store.read_version(id, v1.version)?.unwrap().data["a"], "1");
//! ```

mod error;
mod in_memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod version;

pub use error::StoreError;
pub use in_memory::InMemoryVersionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteVersionStore;
pub use version::VersionStrategy;

use crate::record::{FieldMap, RecordId, Update, Version, VersionedRecord};

/// Append-only versioned storage of record fields.
///
/// All operations are synchronous and may block on I/O. Every record
/// returned is an owned copy; mutating it never affects stored state.
pub trait VersionStore: Send + Sync {
    /// Append `fields` as the next version of `id` and return it.
    fn append_version(&self, id: RecordId, fields: FieldMap)
        -> Result<VersionedRecord, StoreError>;

    /// The highest version of `id`, or `None` if it was never appended.
    fn read_latest(&self, id: RecordId) -> Result<Option<VersionedRecord>, StoreError>;

    /// A specific version of `id`.
    fn read_version(
        &self,
        id: RecordId,
        version: Version,
    ) -> Result<Option<VersionedRecord>, StoreError>;

    /// Every version of `id` in ascending version order. Empty if absent.
    fn read_all(&self, id: RecordId) -> Result<Vec<VersionedRecord>, StoreError>;

    /// The requested versions, aligned with `versions`.
    ///
    /// Missing versions are returned as [`VersionedRecord::placeholder`]
    /// so the output always has the same length and order as the input.
    fn read_versions(
        &self,
        id: RecordId,
        versions: &[Version],
    ) -> Result<Vec<VersionedRecord>, StoreError> {
        let mut records = Vec::with_capacity(versions.len());
        for version in versions {
            let record = self
                .read_version(id, *version)?
                .unwrap_or_else(VersionedRecord::placeholder);
            records.push(record);
        }
        Ok(records)
    }

    /// Merge `update` onto the latest version and append the result.
    ///
    /// For an absent id only the `Set` entries are kept. The read and the
    /// append are separate steps: callers that can race on the same id
    /// must serialize around this call (see `RecordService`).
    fn apply_update(&self, id: RecordId, update: &Update) -> Result<VersionedRecord, StoreError> {
        let fields = match self.read_latest(id)? {
            Some(latest) => update.merge(&latest.data),
            None => update.upserts(),
        };
        self.append_version(id, fields)
    }
}

impl<S: VersionStore + ?Sized> VersionStore for std::sync::Arc<S> {
    fn append_version(
        &self,
        id: RecordId,
        fields: FieldMap,
    ) -> Result<VersionedRecord, StoreError> {
        (**self).append_version(id, fields)
    }

    fn read_latest(&self, id: RecordId) -> Result<Option<VersionedRecord>, StoreError> {
        (**self).read_latest(id)
    }

    fn read_version(
        &self,
        id: RecordId,
        version: Version,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        (**self).read_version(id, version)
    }

    fn read_all(&self, id: RecordId) -> Result<Vec<VersionedRecord>, StoreError> {
        (**self).read_all(id)
    }

    fn read_versions(
        &self,
        id: RecordId,
        versions: &[Version],
    ) -> Result<Vec<VersionedRecord>, StoreError> {
        (**self).read_versions(id, versions)
    }
}
