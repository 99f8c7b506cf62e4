use std::error::Error;
use std::fmt;

use crate::lock::LockError;
use crate::record::RecordId;

/// Error type for version store operations.
#[derive(Debug)]
pub enum StoreError {
    /// An in-process lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
    /// A stored field map could not be encoded or decoded.
    Codec(serde_json::Error),
    /// Filesystem error while opening the backing file.
    Io(std::io::Error),
    /// SQLite backend error.
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    /// Per-id lock acquisition failed.
    Lock(LockError),
    /// The id already holds the largest representable version.
    VersionsExhausted(RecordId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Codec(e) => write!(f, "field map codec error: {}", e),
            StoreError::Io(e) => write!(f, "store I/O error: {}", e),
            #[cfg(feature = "sqlite")]
            StoreError::Sqlite(e) => write!(f, "sqlite error: {}", e),
            StoreError::Lock(e) => write!(f, "{}", e),
            StoreError::VersionsExhausted(id) => {
                write!(f, "no versions left for record {}", id)
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Codec(e) => Some(e),
            StoreError::Io(e) => Some(e),
            #[cfg(feature = "sqlite")]
            StoreError::Sqlite(e) => Some(e),
            StoreError::Lock(e) => Some(e),
            StoreError::LockPoisoned(_) | StoreError::VersionsExhausted(_) => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Sqlite(err)
    }
}

impl From<LockError> for StoreError {
    fn from(err: LockError) -> Self {
        StoreError::Lock(err)
    }
}
