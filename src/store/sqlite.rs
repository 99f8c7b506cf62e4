//! SQLite-backed version store.
//!
//! One table keyed by `(id, version)`; the field map is stored as its
//! canonical JSON text. Each append runs in an immediate transaction that
//! reads the current latest version and inserts the next one, so a crash
//! never leaves a half-written version behind.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::record::{decode_fields, encode_fields, FieldMap, RecordId, Version, VersionedRecord};

use super::{StoreError, VersionStore, VersionStrategy};

const BUSY_TIMEOUT_MS: u64 = 5_000;

const CREATE_TABLE_SQL: &str = r#"CREATE TABLE IF NOT EXISTS records (
    "id" INTEGER NOT NULL,
    "version" INTEGER NOT NULL,
    "data" TEXT NOT NULL,
    PRIMARY KEY ("id", "version")
)"#;

/// Version store persisted in a single SQLite file.
///
/// The connection sits behind a `Mutex`; SQLite serializes writers anyway
/// and the mutex keeps the version read and the insert in one critical
/// section.
pub struct SqliteVersionStore {
    conn: Mutex<Connection>,
    strategy: VersionStrategy,
    path: Option<PathBuf>,
}

impl SqliteVersionStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>, strategy: VersionStrategy) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let existed = path.exists();
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        init_schema(&conn)?;

        tracing::info!(
            path = %path.display(),
            created = !existed,
            strategy = %strategy,
            "opened sqlite version store"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            strategy,
            path: Some(path.to_path_buf()),
        })
    }

    /// A private, non-persistent database. Useful for tests.
    pub fn open_in_memory(strategy: VersionStrategy) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            strategy,
            path: None,
        })
    }

    /// Database file path, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn strategy(&self) -> VersionStrategy {
        self.strategy
    }

    fn with_conn<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))?;
        f(&mut conn)
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(CREATE_TABLE_SQL, [])?;
    Ok(())
}

fn decode_row(id: RecordId, version: Version, raw: &str) -> Result<VersionedRecord, StoreError> {
    Ok(VersionedRecord::new(id, version, decode_fields(raw)?))
}

impl VersionStore for SqliteVersionStore {
    fn append_version(
        &self,
        id: RecordId,
        fields: FieldMap,
    ) -> Result<VersionedRecord, StoreError> {
        let raw = encode_fields(&fields)?;
        let strategy = self.strategy;

        let version = self.with_conn("append", |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let latest: Option<Version> = tx.query_row(
                "SELECT MAX(version) FROM records WHERE id = ?1",
                params![id.get()],
                |row| row.get(0),
            )?;
            let version = strategy
                .next(latest)
                .ok_or(StoreError::VersionsExhausted(id))?;
            tx.execute(
                "INSERT INTO records (id, version, data) VALUES (?1, ?2, ?3)",
                params![id.get(), version, raw],
            )?;
            tx.commit()?;
            Ok(version)
        })?;

        tracing::debug!(id = %id, version, "appended version");
        Ok(VersionedRecord::new(id, version, fields))
    }

    fn read_latest(&self, id: RecordId) -> Result<Option<VersionedRecord>, StoreError> {
        let row: Option<(Version, String)> = self.with_conn("read latest", |conn| {
            Ok(conn
                .query_row(
                    "SELECT version, data FROM records WHERE id = ?1 \
                     ORDER BY version DESC LIMIT 1",
                    params![id.get()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?)
        })?;

        row.map(|(version, raw)| decode_row(id, version, &raw))
            .transpose()
    }

    fn read_version(
        &self,
        id: RecordId,
        version: Version,
    ) -> Result<Option<VersionedRecord>, StoreError> {
        let raw: Option<String> = self.with_conn("read version", |conn| {
            Ok(conn
                .query_row(
                    "SELECT data FROM records WHERE id = ?1 AND version = ?2",
                    params![id.get(), version],
                    |row| row.get(0),
                )
                .optional()?)
        })?;

        raw.map(|raw| decode_row(id, version, &raw)).transpose()
    }

    fn read_all(&self, id: RecordId) -> Result<Vec<VersionedRecord>, StoreError> {
        let rows: Vec<(Version, String)> = self.with_conn("read all", |conn| {
            let mut statement = conn.prepare_cached(
                "SELECT version, data FROM records WHERE id = ?1 ORDER BY version ASC",
            )?;
            let rows = statement
                .query_map(params![id.get()], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        rows.iter()
            .map(|(version, raw)| decode_row(id, *version, raw))
            .collect()
    }
}
