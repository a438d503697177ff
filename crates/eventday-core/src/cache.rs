// ABOUTME: TTL-bounded snapshot cache over the reconciler, keyed by owner identity.
// ABOUTME: Injected clock and store keep it testable; writers invalidate explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::reconcile::{ReconcileError, reconcile};
use crate::record::Registration;
use crate::store::{EventLogStore, StoreError};

/// Time source for cache freshness checks and record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

struct CacheEntry {
    registrations: Arc<Vec<Registration>>,
    fetched_at: DateTime<Utc>,
}

/// One reconciled snapshot per owner, valid for a fixed TTL or until the
/// owner writes. Entries are whole: invalidation drops the owner's full
/// snapshot, never a single student.
pub struct SnapshotCache {
    store: Arc<dyn EventLogStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn EventLogStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Serve the owner's snapshot from cache while fresh; otherwise scan the
    /// log, reconcile, and store the result.
    ///
    /// The read lock is released before the scan, so a slow log never blocks
    /// other owners. Two concurrent misses for the same owner may both
    /// reconcile; whichever write lands last is the entry kept, and readers
    /// converge within one TTL window.
    pub async fn get(&self, owner: &str) -> Result<Arc<Vec<Registration>>, CacheError> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(owner)
                && now - entry.fetched_at < self.ttl
            {
                return Ok(Arc::clone(&entry.registrations));
            }
        }

        tracing::debug!(owner, "snapshot cache miss, reconciling from log");
        let records = self.store.scan().await?;
        let registrations = Arc::new(reconcile(&records, owner)?);

        let mut entries = self.entries.write().await;
        entries.insert(
            owner.to_string(),
            CacheEntry {
                registrations: Arc::clone(&registrations),
                fetched_at: self.clock.now(),
            },
        );

        Ok(registrations)
    }

    /// Drop the owner's snapshot unconditionally. The next `get` reconciles
    /// fresh, which is what gives writers read-your-write coherence.
    pub async fn invalidate(&self, owner: &str) {
        self.entries.write().await.remove(owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Action, Record, SlotChoices};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const OWNER: &str = "fellow@school.org";

    /// In-memory log that counts scans.
    struct FakeStore {
        records: Mutex<Vec<Record>>,
        scans: AtomicUsize,
    }

    impl FakeStore {
        fn new(records: Vec<Record>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
                scans: AtomicUsize::new(0),
            })
        }

        fn scan_count(&self) -> usize {
            self.scans.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventLogStore for FakeStore {
        async fn append(&self, record: &Record) -> Result<(), StoreError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn scan(&self) -> Result<Vec<Record>, StoreError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.lock().unwrap().clone())
        }
    }

    /// Manually advanced clock for TTL tests.
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new("2026-03-05T09:00:00Z".parse().unwrap()),
            })
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn created(student: &str) -> Record {
        Record {
            timestamp: "05-03-2026 09:00".to_string(),
            school: "Riverside".to_string(),
            grade: "6".to_string(),
            section: "B".to_string(),
            student: student.to_string(),
            choices: SlotChoices {
                event_10_11: "Chess".to_string(),
                event_11_12: "Not participating".to_string(),
                event_1_2: "Not participating".to_string(),
                event_2_3: "Not participating".to_string(),
            },
            created_by: OWNER.to_string(),
            action: Action::Created,
        }
    }

    #[tokio::test]
    async fn second_get_within_ttl_is_served_from_cache() {
        let store = FakeStore::new(vec![created("Asha")]);
        let clock = ManualClock::new();
        let cache = SnapshotCache::new(
            Arc::clone(&store) as Arc<dyn EventLogStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::seconds(60),
        );

        let first = cache.get(OWNER).await.unwrap();
        clock.advance(Duration::seconds(30));
        let second = cache.get(OWNER).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(store.scan_count(), 1);
    }

    #[tokio::test]
    async fn expired_entry_forces_a_fresh_reconcile() {
        let store = FakeStore::new(vec![created("Asha")]);
        let clock = ManualClock::new();
        let cache = SnapshotCache::new(
            Arc::clone(&store) as Arc<dyn EventLogStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::seconds(60),
        );

        cache.get(OWNER).await.unwrap();
        clock.advance(Duration::seconds(61));
        cache.get(OWNER).await.unwrap();

        assert_eq!(store.scan_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_makes_the_next_get_see_new_records() {
        let store = FakeStore::new(vec![created("Asha")]);
        let clock = ManualClock::new();
        let cache = SnapshotCache::new(
            Arc::clone(&store) as Arc<dyn EventLogStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::seconds(60),
        );

        assert_eq!(cache.get(OWNER).await.unwrap().len(), 1);

        store.append(&created("Ravi")).await.unwrap();
        cache.invalidate(OWNER).await;

        assert_eq!(cache.get(OWNER).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn entries_are_isolated_per_owner() {
        let mut foreign = created("Jane Doe");
        foreign.created_by = "other@school.org".to_string();
        let store = FakeStore::new(vec![created("Asha"), foreign]);
        let clock = ManualClock::new();
        let cache = SnapshotCache::new(
            Arc::clone(&store) as Arc<dyn EventLogStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::seconds(60),
        );

        let mine = cache.get(OWNER).await.unwrap();
        let theirs = cache.get("other@school.org").await.unwrap();

        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].student, "Asha");
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].student, "Jane Doe");

        // Invalidating one owner leaves the other cached.
        cache.invalidate(OWNER).await;
        cache.get("other@school.org").await.unwrap();
        assert_eq!(store.scan_count(), 2);
    }
}
