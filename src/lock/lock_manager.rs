use std::sync::Arc;

use super::{Lock, LockError};
use crate::record::RecordId;

/// Factory for per-record locks.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or create) the lock for `id`.
    ///
    /// Repeated calls with the same `id` must return the same logical lock.
    fn get_lock(&self, id: RecordId) -> Result<Arc<Self::Lock>, LockError>;
}
