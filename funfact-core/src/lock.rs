//! Per-day distributed lock capability.
//!
//! ```text
//! (free) ─── acquire(day, ttl) = true ──→ held ─── release(day) ──→ (free)
//!                                           │
//!                                      ttl elapses ──→ (free)
//! ```
//!
//! `acquire` is a single non-blocking probe. A `false` return means another
//! holder owns the day; callers never queue behind it.

use std::time::Duration;

use async_trait::async_trait;

use crate::{Day, FunFactResult};

/// Lock lifetime used when nothing else is configured.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(10);

/// Named, time-bounded mutual exclusion keyed by calendar day.
#[async_trait]
pub trait DailyLock: Send + Sync {
    /// Create the lock record for `day` only if absent.
    ///
    /// Returns `true` iff this call created the record. The record expires
    /// on its own after `ttl` so a crashed holder cannot block the day.
    async fn acquire(&self, day: Day, ttl: Duration) -> FunFactResult<bool>;

    /// Delete the lock record for `day`. Releasing an absent or expired
    /// lock succeeds.
    async fn release(&self, day: Day) -> FunFactResult<()>;
}
