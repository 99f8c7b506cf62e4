use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::record::Version;

/// How a backend picks the version of a new append.
///
/// Either way the result is strictly greater than the current latest
/// version of the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionStrategy {
    /// `latest + 1`, starting at `1`.
    #[default]
    Counter,
    /// Current Unix time in seconds, advanced past `latest` on collision.
    UnixSeconds,
}

impl VersionStrategy {
    /// Next version after `latest`, or `None` once `latest` is `Version::MAX`.
    pub fn next(self, latest: Option<Version>) -> Option<Version> {
        let floor = match latest {
            Some(latest) => latest.checked_add(1)?,
            None => 1,
        };
        Some(match self {
            VersionStrategy::Counter => floor,
            VersionStrategy::UnixSeconds => unix_seconds().max(floor),
        })
    }
}

fn unix_seconds() -> Version {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as Version)
        .unwrap_or(0)
}

impl FromStr for VersionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "counter" => Ok(VersionStrategy::Counter),
            "unix-seconds" | "unix_seconds" | "timestamp" => Ok(VersionStrategy::UnixSeconds),
            other => Err(format!(
                "unknown version strategy '{}' (expected counter or unix-seconds)",
                other
            )),
        }
    }
}

impl fmt::Display for VersionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionStrategy::Counter => write!(f, "counter"),
            VersionStrategy::UnixSeconds => write!(f, "unix-seconds"),
        }
    }
}
