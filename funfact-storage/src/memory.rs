//! In-memory store and lock.
//!
//! Both types are safe to share across tasks in one process. They give no
//! coordination between processes; use the Redis backends for that.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use funfact_core::{
    DailyLock, Day, DayOrdinal, Fact, FactStore, FunFactResult, StorageError,
};
use tokio::time::Instant;

/// Facts keyed by day ordinal, one text per day.
#[derive(Debug, Default)]
pub struct InMemoryFactStore {
    facts: RwLock<BTreeMap<DayOrdinal, String>>,
}

impl InMemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-built facts, replacing any text already held for the same day.
    pub fn with_facts(facts: impl IntoIterator<Item = Fact>) -> Self {
        let map = facts
            .into_iter()
            .map(|fact| (fact.ordinal(), fact.into_text()))
            .collect();
        Self {
            facts: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.facts.read().map(|facts| facts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FactStore for InMemoryFactStore {
    async fn put(&self, fact: &Fact) -> FunFactResult<()> {
        let mut facts = self.facts.write().map_err(|_| StorageError::LockPoisoned)?;
        facts.insert(fact.ordinal(), fact.text().to_string());
        Ok(())
    }

    async fn get(&self, day: Day) -> FunFactResult<Option<Fact>> {
        let facts = self.facts.read().map_err(|_| StorageError::LockPoisoned)?;
        let ordinal = funfact_core::day_to_ordinal(day);
        Ok(facts.get(&ordinal).map(|text| Fact::new(day, text.clone())))
    }

    async fn get_recent(&self, n: usize) -> FunFactResult<Vec<Fact>> {
        let facts = self.facts.read().map_err(|_| StorageError::LockPoisoned)?;
        facts
            .iter()
            .rev()
            .take(n)
            .map(|(ordinal, text)| {
                Fact::from_ordinal(*ordinal, text.clone()).ok_or_else(|| {
                    StorageError::Corrupt {
                        collection: "memory".to_string(),
                        reason: format!("ordinal {ordinal} out of range"),
                    }
                    .into()
                })
            })
            .collect()
    }
}

/// Per-day locks that expire after their TTL.
///
/// Expiry is measured with `tokio::time::Instant` so paused-clock tests can
/// advance past it.
#[derive(Debug, Default)]
pub struct InMemoryDailyLock {
    held: Mutex<HashMap<Day, Instant>>,
}

impl InMemoryDailyLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an unexpired lock exists for `day`.
    pub fn is_held(&self, day: Day) -> bool {
        self.held
            .lock()
            .map(|held| held.get(&day).is_some_and(|expires| *expires > Instant::now()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl DailyLock for InMemoryDailyLock {
    async fn acquire(&self, day: Day, ttl: Duration) -> FunFactResult<bool> {
        let mut held = self.held.lock().map_err(|_| StorageError::LockPoisoned)?;
        let now = Instant::now();
        held.retain(|_, expires| *expires > now);

        if held.contains_key(&day) {
            return Ok(false);
        }
        held.insert(day, now + ttl);
        Ok(true)
    }

    async fn release(&self, day: Day) -> FunFactResult<()> {
        let mut held = self.held.lock().map_err(|_| StorageError::LockPoisoned)?;
        held.remove(&day);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> Day {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryFactStore::new();
        let fact = Fact::new(day(2024, 1, 15), "Honey never spoils.");
        store.put(&fact).await.unwrap();

        assert_eq!(store.get(day(2024, 1, 15)).await.unwrap(), Some(fact));
        assert_eq!(store.get(day(2024, 1, 16)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites_same_day() {
        let store = InMemoryFactStore::new();
        store.put(&Fact::new(day(2024, 1, 15), "first")).await.unwrap();
        store.put(&Fact::new(day(2024, 1, 15), "second")).await.unwrap();

        let fact = store.get(day(2024, 1, 15)).await.unwrap().unwrap();
        assert_eq!(fact.text(), "second");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_recent_orders_newest_first() {
        let store = InMemoryFactStore::with_facts([
            Fact::new(day(2024, 1, 1), "a"),
            Fact::new(day(2024, 1, 3), "c"),
            Fact::new(day(2024, 1, 2), "b"),
        ]);

        let texts: Vec<_> = store
            .get_recent(2)
            .await
            .unwrap()
            .into_iter()
            .map(Fact::into_text)
            .collect();
        assert_eq!(texts, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_get_recent_zero_and_empty() {
        let store = InMemoryFactStore::new();
        assert!(store.get_recent(10).await.unwrap().is_empty());

        store.put(&Fact::new(day(2024, 1, 1), "a")).await.unwrap();
        assert!(store.get_recent(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lock_is_exclusive_until_released() {
        let lock = InMemoryDailyLock::new();
        let today = day(2024, 1, 15);
        let ttl = Duration::from_secs(10);

        assert!(lock.acquire(today, ttl).await.unwrap());
        assert!(!lock.acquire(today, ttl).await.unwrap());
        assert!(lock.acquire(day(2024, 1, 16), ttl).await.unwrap());

        lock.release(today).await.unwrap();
        assert!(!lock.is_held(today));
        assert!(lock.acquire(today, ttl).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_without_acquire_is_noop() {
        let lock = InMemoryDailyLock::new();
        lock.release(day(2024, 1, 15)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_expires_after_ttl() {
        let lock = InMemoryDailyLock::new();
        let today = day(2024, 1, 15);
        let ttl = Duration::from_secs(10);

        assert!(lock.acquire(today, ttl).await.unwrap());

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(!lock.acquire(today, ttl).await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!lock.is_held(today));
        assert!(lock.acquire(today, ttl).await.unwrap());
    }

    proptest! {
        #[test]
        fn prop_recent_is_sorted_and_bounded(
            offsets in prop::collection::btree_set(0i64..3_650, 0..40),
            n in 0usize..50,
        ) {
            let base = day(2015, 1, 1);
            let store = InMemoryFactStore::with_facts(offsets.iter().map(|offset| {
                Fact::new(base + chrono::Duration::days(*offset), format!("fact {offset}"))
            }));

            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .expect("runtime");
            let recent = rt.block_on(store.get_recent(n)).expect("get_recent");

            prop_assert_eq!(recent.len(), n.min(offsets.len()));
            for pair in recent.windows(2) {
                prop_assert!(pair[0].day() > pair[1].day());
            }
            if let Some(first) = recent.first() {
                let newest = offsets.iter().max().copied().unwrap_or_default();
                prop_assert_eq!(first.day(), base + chrono::Duration::days(newest));
            }
        }
    }
}
