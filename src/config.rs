//! Server configuration parsed from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::store::VersionStrategy;

/// Default database file when `TIMETRAVEL_DB` is not set.
pub const DEFAULT_DB_PATH: &str = "timetravel.db";

/// Default socket address when `TIMETRAVEL_LISTEN` is not set.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

/// `TIMETRAVEL_DB` value selecting the non-persistent store.
pub const IN_MEMORY: &str = ":memory:";

/// Where records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

/// Server configuration.
///
/// # Environment Variables
///
/// | Variable                | Default          | Description                              |
/// |-------------------------|------------------|------------------------------------------|
/// | `TIMETRAVEL_DB`         | `timetravel.db`  | SQLite file path, or `:memory:`          |
/// | `TIMETRAVEL_LISTEN`     | `127.0.0.1:8000` | Socket address to listen on              |
/// | `TIMETRAVEL_VERSIONING` | `counter`        | `counter` or `unix-seconds`              |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreLocation,
    pub listen_addr: SocketAddr,
    pub versioning: VersionStrategy,
}

impl Config {
    /// Parse configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` naming the offending variable if
    /// `TIMETRAVEL_LISTEN` is not a socket address or
    /// `TIMETRAVEL_VERSIONING` is not a known strategy.
    pub fn from_env() -> Result<Config, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, String> {
        let store = match lookup("TIMETRAVEL_DB") {
            Some(val) if val.trim().is_empty() => {
                return Err("TIMETRAVEL_DB must not be empty".to_string())
            }
            Some(val) if val == IN_MEMORY => StoreLocation::InMemory,
            Some(val) => StoreLocation::File(PathBuf::from(val)),
            None => StoreLocation::File(PathBuf::from(DEFAULT_DB_PATH)),
        };

        let listen_raw = lookup("TIMETRAVEL_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
        let listen_addr = listen_raw
            .parse::<SocketAddr>()
            .map_err(|e| format!("TIMETRAVEL_LISTEN is not a valid socket address: {e}"))?;

        let versioning = match lookup("TIMETRAVEL_VERSIONING") {
            Some(val) => val
                .parse::<VersionStrategy>()
                .map_err(|e| format!("TIMETRAVEL_VERSIONING: {e}"))?,
            None => VersionStrategy::default(),
        };

        Ok(Config {
            store,
            listen_addr,
            versioning,
        })
    }
}
