//! Shared helpers: backends under test and field builders.

use timetravel::{FieldMap, InMemoryVersionStore, RecordId, VersionStore, VersionStrategy};

pub fn id(raw: i64) -> RecordId {
    RecordId::new(raw).unwrap()
}

pub fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Every backend, each with both version strategies.
pub fn backends() -> Vec<(&'static str, Box<dyn VersionStore>)> {
    let mut backends: Vec<(&'static str, Box<dyn VersionStore>)> = vec![
        (
            "memory/counter",
            Box::new(InMemoryVersionStore::with_strategy(VersionStrategy::Counter)),
        ),
        (
            "memory/unix-seconds",
            Box::new(InMemoryVersionStore::with_strategy(
                VersionStrategy::UnixSeconds,
            )),
        ),
    ];

    #[cfg(feature = "sqlite")]
    {
        use timetravel::SqliteVersionStore;

        backends.push((
            "sqlite/counter",
            Box::new(SqliteVersionStore::open_in_memory(VersionStrategy::Counter).unwrap()),
        ));
        backends.push((
            "sqlite/unix-seconds",
            Box::new(SqliteVersionStore::open_in_memory(VersionStrategy::UnixSeconds).unwrap()),
        ));
    }

    backends
}
