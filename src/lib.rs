//! timetravel: a versioned record store.
//!
//! Records are flat string maps addressed by a positive integer id. Every
//! write appends a new immutable version, so any earlier state of a record
//! can be read back later.
//!
//! - [`record`]: value types and partial updates
//! - [`store`]: the append-only [`VersionStore`] and its backends
//! - [`service`]: [`RecordService`], create/merge/read on top of a store
//! - [`http`]: axum routes for the v1 and v2 APIs (feature `http`)

pub mod config;
mod error;
pub mod lock;
pub mod record;
pub mod service;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

pub use error::RecordError;
pub use record::{FieldMap, FieldUpdate, Record, RecordId, Update, Version, VersionedRecord};
pub use service::RecordService;
pub use store::{InMemoryVersionStore, StoreError, VersionStore, VersionStrategy};
#[cfg(feature = "sqlite")]
pub use store::SqliteVersionStore;
