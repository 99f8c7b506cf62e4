use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use super::{Lock, LockError, LockManager};
use crate::record::RecordId;

/// Per-record lock: a `held` flag guarded by a mutex, with a condvar to
/// park writers queued behind the holder.
pub struct InMemoryLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, bool>, LockError> {
        self.held
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))
    }
}

impl Default for InMemoryLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let held = self.state()?;
        let mut held = self
            .released
            .wait_while(held, |held| *held)
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        *held = true;
        Ok(())
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut held = self.state()?;
        if std::mem::replace(&mut *held, false) {
            self.released.notify_one();
        }
        Ok(())
    }
}

/// Lock table keyed by record id.
///
/// Lazily creates one `InMemoryLock` per id and returns the same `Arc`
/// for repeated lookups. Entries live as long as the manager.
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<RecordId, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, id: RecordId) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock table poisoned".into()))?;
        Ok(locks
            .entry(id)
            .or_insert_with(|| Arc::new(InMemoryLock::new()))
            .clone())
    }
}
