//! Daily Fun Fact Storage - Store and Lock Backends
//!
//! Implementations of [`funfact_core::FactStore`] and
//! [`funfact_core::DailyLock`]:
//!
//! - [`RedisFactStore`] / [`RedisDailyLock`]: production backends. Facts
//!   live in one sorted set scored by day ordinal; locks are `SET NX PX`
//!   keys under a separate prefix.
//! - [`InMemoryFactStore`] / [`InMemoryDailyLock`]: single-process
//!   backends for development and tests.

pub mod memory;
pub mod redis_backend;

pub use memory::{InMemoryDailyLock, InMemoryFactStore};
pub use redis_backend::{connect, lock_key, RedisDailyLock, RedisFactStore, FACTS_KEY, LOCK_KEY_PREFIX};
