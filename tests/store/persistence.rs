//! SQLite persistence across reopen.

use tempfile::TempDir;
use timetravel::{SqliteVersionStore, Update, VersionStore, VersionStrategy};

use crate::support::{fields, id};

#[test]
fn history_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timetravel.db");

    let (v1, v2) = {
        let store = SqliteVersionStore::open(&path, VersionStrategy::Counter).unwrap();
        let v1 = store
            .apply_update(id(7), &Update::new().set("a", "1").set("b", "2"))
            .unwrap();
        let v2 = store
            .apply_update(id(7), &Update::new().delete("b").set("c", "3"))
            .unwrap();
        (v1, v2)
    };

    let store = SqliteVersionStore::open(&path, VersionStrategy::Counter).unwrap();
    assert_eq!(store.path(), Some(path.as_path()));
    assert_eq!(store.read_all(id(7)).unwrap(), vec![v1, v2.clone()]);
    assert_eq!(store.read_latest(id(7)).unwrap().unwrap(), v2);

    let v3 = store
        .apply_update(id(7), &Update::new().set("d", "4"))
        .unwrap();
    assert!(v3.version > v2.version);
    assert_eq!(
        v3.data,
        fields(&[("a", "1"), ("c", "3"), ("d", "4")])
    );
}

#[test]
fn switching_strategy_keeps_monotonic_versions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timetravel.db");

    let last = {
        let store = SqliteVersionStore::open(&path, VersionStrategy::UnixSeconds).unwrap();
        store
            .apply_update(id(1), &Update::new().set("a", "1"))
            .unwrap()
            .version
    };

    // counter continues from the timestamp-sized version
    let store = SqliteVersionStore::open(&path, VersionStrategy::Counter).unwrap();
    let next = store
        .apply_update(id(1), &Update::new().set("a", "2"))
        .unwrap();
    assert_eq!(next.version, last + 1);
}
