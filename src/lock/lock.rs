use std::sync::Arc;

use super::LockError;

/// A single exclusive lock.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}

/// Holds a lock until dropped.
pub struct LockGuard<L: Lock> {
    lock: Arc<L>,
}

impl<L: Lock> LockGuard<L> {
    /// Block until `lock` is acquired.
    pub fn acquire(lock: Arc<L>) -> Result<Self, LockError> {
        lock.lock()?;
        Ok(LockGuard { lock })
    }
}

impl<L: Lock> Drop for LockGuard<L> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            tracing::warn!(error = %e, "failed to release record lock");
        }
    }
}
