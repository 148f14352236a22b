//! Fact store capability.

use async_trait::async_trait;

use crate::{Day, Fact, FunFactResult};

/// Durable storage for generated facts, keyed by calendar day.
///
/// Implementations must keep at most one fact per day: `put` for a day
/// that already has a fact replaces it.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Insert or overwrite the fact for `fact.day()`.
    async fn put(&self, fact: &Fact) -> FunFactResult<()>;

    /// Point lookup. `Ok(None)` is the ordinary miss path.
    async fn get(&self, day: Day) -> FunFactResult<Option<Fact>>;

    /// Up to `n` facts ordered newest day first. Empty when nothing is stored.
    async fn get_recent(&self, n: usize) -> FunFactResult<Vec<Fact>>;
}
