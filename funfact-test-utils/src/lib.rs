//! Daily Fun Fact Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Recording doubles for the store, lock and generator
//! - Proptest generators for days and facts
//! - Fixtures for common scenarios

pub use funfact_storage::{InMemoryDailyLock, InMemoryFactStore};

pub use funfact_core::{
    DailyLock, Day, Fact, FactStore, FunFactError, FunFactResult, GenerationOptions, LlmError,
    StorageError, TextGenerator,
};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

// ============================================================================
// RECORDING DOUBLES
// ============================================================================

/// Store wrapper that counts calls and can be told to fail.
///
/// Reads and writes go to an [`InMemoryFactStore`] unless a failure is
/// armed for that operation.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: InMemoryFactStore,
    put_calls: AtomicUsize,
    get_calls: AtomicUsize,
    get_recent_calls: AtomicUsize,
    put_history: Mutex<Vec<Fact>>,
    fail_put: Mutex<Option<StorageError>>,
    fail_get: Mutex<Option<StorageError>>,
    fail_recent: Mutex<Option<StorageError>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facts(facts: impl IntoIterator<Item = Fact>) -> Self {
        Self {
            inner: InMemoryFactStore::with_facts(facts),
            ..Self::default()
        }
    }

    /// Make every subsequent `put` fail with `err`.
    pub fn fail_puts_with(&self, err: StorageError) {
        *self.fail_put.lock().unwrap() = Some(err);
    }

    /// Make every subsequent `get` fail with `err`.
    pub fn fail_gets_with(&self, err: StorageError) {
        *self.fail_get.lock().unwrap() = Some(err);
    }

    /// Make every subsequent `get_recent` fail with `err`.
    pub fn fail_recent_with(&self, err: StorageError) {
        *self.fail_recent.lock().unwrap() = Some(err);
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn get_recent_calls(&self) -> usize {
        self.get_recent_calls.load(Ordering::SeqCst)
    }

    /// Facts passed to `put`, in call order.
    pub fn puts(&self) -> Vec<Fact> {
        self.put_history.lock().unwrap().clone()
    }

    pub fn inner(&self) -> &InMemoryFactStore {
        &self.inner
    }
}

#[async_trait]
impl FactStore for RecordingStore {
    async fn put(&self, fact: &Fact) -> FunFactResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.put_history.lock().unwrap().push(fact.clone());
        let armed = self.fail_put.lock().unwrap().clone();
        if let Some(err) = armed {
            return Err(err.into());
        }
        self.inner.put(fact).await
    }

    async fn get(&self, day: Day) -> FunFactResult<Option<Fact>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let armed = self.fail_get.lock().unwrap().clone();
        if let Some(err) = armed {
            return Err(err.into());
        }
        self.inner.get(day).await
    }

    async fn get_recent(&self, n: usize) -> FunFactResult<Vec<Fact>> {
        self.get_recent_calls.fetch_add(1, Ordering::SeqCst);
        let armed = self.fail_recent.lock().unwrap().clone();
        if let Some(err) = armed {
            return Err(err.into());
        }
        self.inner.get_recent(n).await
    }
}

/// Lock wrapper that counts calls and can be forced to deny.
#[derive(Debug, Default)]
pub struct RecordingLock {
    inner: InMemoryDailyLock,
    deny_all: Mutex<bool>,
    fail_release: Mutex<Option<StorageError>>,
    acquire_calls: AtomicUsize,
    release_calls: AtomicUsize,
    last_ttl: Mutex<Option<Duration>>,
}

impl RecordingLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lock whose `acquire` always answers `false`, as if another
    /// process held it.
    pub fn held_elsewhere() -> Self {
        let lock = Self::default();
        *lock.deny_all.lock().unwrap() = true;
        lock
    }

    pub fn fail_releases_with(&self, err: StorageError) {
        *self.fail_release.lock().unwrap() = Some(err);
    }

    pub fn acquire_calls(&self) -> usize {
        self.acquire_calls.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    /// TTL passed to the most recent `acquire`.
    pub fn last_ttl(&self) -> Option<Duration> {
        *self.last_ttl.lock().unwrap()
    }

    pub fn is_held(&self, day: Day) -> bool {
        self.inner.is_held(day)
    }
}

#[async_trait]
impl DailyLock for RecordingLock {
    async fn acquire(&self, day: Day, ttl: Duration) -> FunFactResult<bool> {
        self.acquire_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_ttl.lock().unwrap() = Some(ttl);
        let deny = *self.deny_all.lock().unwrap();
        if deny {
            return Ok(false);
        }
        self.inner.acquire(day, ttl).await
    }

    async fn release(&self, day: Day) -> FunFactResult<()> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.release(day).await?;
        let armed = self.fail_release.lock().unwrap().clone();
        if let Some(err) = armed {
            return Err(err.into());
        }
        Ok(())
    }
}

/// Generator that replays scripted replies and records prompts.
///
/// Once the script runs out it keeps answering with the fallback text.
#[derive(Debug)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<FunFactResult<String>>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    /// Always answers `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: text.into(),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Fails once with `err`, then answers with a default text.
    pub fn failing(err: LlmError) -> Self {
        Self::replying("unused").then(Err(err.into()))
    }

    /// Queue another scripted result.
    pub fn then(self, result: FunFactResult<String>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    /// Sleep for `delay` before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_with(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> FunFactResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn default_options(&self) -> GenerationOptions {
        GenerationOptions::default()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Days between 2000-01-01 and roughly 2054.
    pub fn arb_day() -> impl Strategy<Value = Day> {
        (0i64..20_000).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + chrono::Duration::days(offset)
        })
    }

    /// Non-empty single-line fact text.
    pub fn arb_fact_text() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ,.'-]{0,79}"
    }

    pub fn arb_fact() -> impl Strategy<Value = Fact> {
        (arb_day(), arb_fact_text()).prop_map(|(day, text)| Fact::new(day, text))
    }

    /// Facts on distinct days with distinct texts.
    pub fn arb_fact_history(max_len: usize) -> impl Strategy<Value = Vec<Fact>> {
        prop::collection::btree_map(arb_day(), arb_fact_text(), 0..=max_len).prop_map(|days| {
            days.into_iter()
                .enumerate()
                .map(|(i, (day, text))| Fact::new(day, format!("{text} #{i}")))
                .collect()
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    /// 2024-01-15, the day used throughout the scenario tests.
    pub fn test_day() -> Day {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    pub fn sample_fact() -> Fact {
        Fact::new(test_day(), "Octopuses have three hearts.")
    }

    /// `count` facts on the days before [`test_day`], newest first.
    pub fn sample_facts(count: usize) -> Vec<Fact> {
        (1..=count)
            .map(|i| {
                Fact::new(
                    test_day() - chrono::Duration::days(i as i64),
                    format!("Fact number {i}"),
                )
            })
            .collect()
    }

    pub fn upstream_failure() -> LlmError {
        LlmError::RequestFailed {
            provider: "mistral".to_string(),
            status: 500,
            message: "upstream exploded".to_string(),
        }
    }

    pub fn store_down() -> StorageError {
        StorageError::unavailable("get", "connection refused")
    }
}
