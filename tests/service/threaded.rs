//! Concurrent updates through the service.

use std::sync::Arc;
use std::thread;

use timetravel::{InMemoryVersionStore, RecordService, Update, VersionStrategy};

use crate::support::id;

const THREADS: usize = 8;
const UPDATES: usize = 25;

fn hammer<S: timetravel::VersionStore + 'static>(service: Arc<RecordService<S>>, raw_id: i64) {
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let service = service.clone();
            thread::spawn(move || {
                for n in 0..UPDATES {
                    service
                        .apply_update(id(raw_id), &Update::new().set(format!("t{t}-{n}"), "x"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn concurrent_updates_lose_no_fields() {
    let service = Arc::new(RecordService::new(InMemoryVersionStore::new()));
    hammer(service.clone(), 7);

    let all = service.get_all_records(id(7)).unwrap();
    assert_eq!(all.len(), THREADS * UPDATES);
    assert!(all.windows(2).all(|w| w[0].version < w[1].version));

    // each version carries every field written before it
    for (n, record) in all.iter().enumerate() {
        assert_eq!(record.data.len(), n + 1);
    }
    assert_eq!(
        service.get_record(id(7)).unwrap().data.len(),
        THREADS * UPDATES
    );
}

#[test]
fn concurrent_updates_with_timestamp_versions() {
    let store = InMemoryVersionStore::with_strategy(VersionStrategy::UnixSeconds);
    let service = Arc::new(RecordService::new(store));
    hammer(service.clone(), 1);

    let all = service.get_all_records(id(1)).unwrap();
    assert_eq!(all.len(), THREADS * UPDATES);
    assert!(all.windows(2).all(|w| w[0].version < w[1].version));
}

#[cfg(feature = "sqlite")]
#[test]
fn concurrent_updates_on_sqlite() {
    let dir = tempfile::TempDir::new().unwrap();
    let store =
        timetravel::SqliteVersionStore::open(dir.path().join("t.db"), VersionStrategy::Counter)
            .unwrap();
    let service = Arc::new(RecordService::new(store));
    hammer(service.clone(), 3);

    let latest = service.get_record(id(3)).unwrap();
    assert_eq!(latest.version, (THREADS * UPDATES) as i64);
    assert_eq!(latest.data.len(), THREADS * UPDATES);
}

#[test]
fn different_ids_proceed_independently() {
    let service = Arc::new(RecordService::new(InMemoryVersionStore::new()));
    let handles: Vec<_> = (1..=4)
        .map(|raw| {
            let service = service.clone();
            thread::spawn(move || hammer(service, raw))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for raw in 1..=4 {
        let all = service.get_all_records(id(raw)).unwrap();
        assert_eq!(all.len(), THREADS * UPDATES);
        assert_eq!(all.last().unwrap().version, (THREADS * UPDATES) as i64);
    }
}
