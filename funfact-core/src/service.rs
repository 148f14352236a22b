//! Fact Service
//!
//! Serves today's fact, generating it at most once per day across every
//! process that shares the same store and lock.
//!
//! ```text
//! get(today) ── hit ──────────────────────────────────────────→ Cached
//!     │ miss
//! acquire(today) ── false ────────────────────────────────────→ LockDenied (absent)
//!     │ true
//! get(today) ── hit ──────────────────────────── release ─────→ FilledByPeer
//!     │ miss
//! prompt → generate → put ───────────────────── release ─────→ Generated
//! ```
//!
//! A caller that loses the lock race gets an immediate answer and never
//! waits for the winner. The lock is released on every path where it was
//! acquired, including errors, and the original error is returned after
//! the release. A failed release surfaces as the result only when
//! generation itself succeeded.

use std::sync::Arc;

use crate::{
    build_prompt, Clock, DailyLock, Day, Fact, FactStore, FunFactResult, PromptCache,
    ServiceConfig, TextGenerator,
};

/// Which branch of the state machine produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupOutcome {
    /// The store already had the day's fact.
    Cached,
    /// This caller held the lock and generated the fact.
    Generated,
    /// Another holder owns the lock; nothing was generated here.
    LockDenied,
    /// The lock was won but a fact appeared before generation started.
    FilledByPeer,
}

impl LookupOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupOutcome::Cached => "cached",
            LookupOutcome::Generated => "generated",
            LookupOutcome::LockDenied => "lock_denied",
            LookupOutcome::FilledByPeer => "filled_by_peer",
        }
    }
}

impl std::fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving a day's fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// `None` only when the lock was denied and nothing was stored yet.
    pub fact: Option<Fact>,
    pub outcome: LookupOutcome,
}

impl Resolution {
    fn new(fact: Option<Fact>, outcome: LookupOutcome) -> Self {
        Self { fact, outcome }
    }
}

/// Coordinates the store, lock and generator.
pub struct FactService {
    store: Arc<dyn FactStore>,
    lock: Arc<dyn DailyLock>,
    generator: Arc<dyn TextGenerator>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
    prompt_cache: PromptCache,
}

impl FactService {
    pub fn new(
        store: Arc<dyn FactStore>,
        lock: Arc<dyn DailyLock>,
        generator: Arc<dyn TextGenerator>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            lock,
            generator,
            clock,
            config,
            prompt_cache: PromptCache::new(),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Today's fact, or `None` if another caller is still generating it.
    pub async fn get_todays_fun_fact(&self) -> FunFactResult<Option<Fact>> {
        Ok(self.resolve_today().await?.fact)
    }

    /// Today's fact together with the branch that produced it.
    pub async fn resolve_today(&self) -> FunFactResult<Resolution> {
        self.resolve(self.clock.today()).await
    }

    /// Run the single-flight protocol for `day`.
    #[tracing::instrument(skip_all, fields(day = %day))]
    pub async fn resolve(&self, day: Day) -> FunFactResult<Resolution> {
        if let Some(fact) = self.store.get(day).await? {
            return Ok(Resolution::new(Some(fact), LookupOutcome::Cached));
        }

        if !self.lock.acquire(day, self.config.lock_ttl).await? {
            tracing::debug!("Generation lock held elsewhere, not waiting");
            return Ok(Resolution::new(None, LookupOutcome::LockDenied));
        }

        let mut result = self.fill_while_locked(day).await;

        if let Err(release_err) = self.lock.release(day).await {
            tracing::warn!(error = %release_err, "Failed to release generation lock");
            // A generation error outranks the release error.
            if result.is_ok() {
                result = Err(release_err);
            }
        }

        match &result {
            Ok(resolution) => tracing::info!(outcome = %resolution.outcome, "Resolved fact"),
            Err(err) => tracing::error!(error = %err, "Fact generation failed"),
        }

        result
    }

    async fn fill_while_locked(&self, day: Day) -> FunFactResult<Resolution> {
        if let Some(fact) = self.store.get(day).await? {
            return Ok(Resolution::new(Some(fact), LookupOutcome::FilledByPeer));
        }

        let prompt = self.prompt_for(day).await?;
        let text = self.generator.generate(&prompt).await?;
        let fact = Fact::new(day, text);
        self.store.put(&fact).await?;

        Ok(Resolution::new(Some(fact), LookupOutcome::Generated))
    }

    /// Up to `n` stored facts, newest first.
    pub async fn get_recent_fun_facts(&self, n: usize) -> FunFactResult<Vec<Fact>> {
        self.store.get_recent(n).await
    }

    /// Prompt for `day`, rebuilt from the store when the memo belongs to a
    /// different day.
    pub async fn prompt_for(&self, day: Day) -> FunFactResult<String> {
        if let Some(prompt) = self.prompt_cache.get(day) {
            return Ok(prompt);
        }

        let recent = self.get_recent_fun_facts(self.config.recent_limit).await?;
        let prompt = build_prompt(&recent);
        tracing::debug!(prompt = %prompt, history = recent.len(), "Built generation prompt");

        self.prompt_cache.set(day, prompt.clone());
        Ok(prompt)
    }
}

impl std::fmt::Debug for FactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactService")
            .field("config", &self.config)
            .field("prompt_day", &self.prompt_cache.cached_day())
            .finish()
    }
}
