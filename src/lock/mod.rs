//! Per-record locks.
//!
//! `RecordService` takes the lock for a record id around every
//! read-merge-append so two concurrent updates to the same record never
//! merge onto the same base version. Different ids never contend.

mod error;
mod in_memory;
mod lock;
mod lock_manager;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::{Lock, LockGuard};
pub use lock_manager::LockManager;
