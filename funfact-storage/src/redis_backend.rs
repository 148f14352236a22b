//! Redis store and lock.
//!
//! Layout:
//! - `funfacts`: sorted set, member = fact text, score = day ordinal.
//! - `funfacts:lock:<YYYY-MM-DD>`: plain key set with `NX PX`, removed on release.
//!
//! Members are the fact text, so the same text stored for two different
//! days collapses into one entry scored by the later write.

use std::time::Duration;

use async_trait::async_trait;
use funfact_core::{
    day_to_ordinal, DailyLock, Day, DayOrdinal, Fact, FactStore, FunFactError, FunFactResult,
    StorageError,
};
use redis::aio::ConnectionManager;
use redis::RedisError;

/// Sorted set holding every stored fact.
pub const FACTS_KEY: &str = "funfacts";

/// Prefix of the per-day generation lock keys.
pub const LOCK_KEY_PREFIX: &str = "funfacts:lock:";

/// Lock key for `day`, e.g. `funfacts:lock:2024-01-15`.
pub fn lock_key(day: Day) -> String {
    format!("{}{}", LOCK_KEY_PREFIX, day.format("%Y-%m-%d"))
}

/// Open a reconnecting connection to `url`.
///
/// The returned manager is cheap to clone and can back both a
/// [`RedisFactStore`] and a [`RedisDailyLock`].
pub async fn connect(url: &str) -> FunFactResult<ConnectionManager> {
    let client = redis::Client::open(url).map_err(|e| redis_error("connect", e))?;
    let manager = client
        .get_connection_manager()
        .await
        .map_err(|e| redis_error("connect", e))?;
    tracing::info!(url = %redact_url(url), "Connected to Redis");
    Ok(manager)
}

fn redis_error(operation: &str, err: RedisError) -> FunFactError {
    StorageError::unavailable(operation, err).into()
}

/// Strip credentials from a connection URL before logging it.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

fn score_to_ordinal(member: &str, score: f64) -> FunFactResult<DayOrdinal> {
    if !score.is_finite()
        || score.fract() != 0.0
        || score < f64::from(DayOrdinal::MIN)
        || score > f64::from(DayOrdinal::MAX)
    {
        return Err(corrupt(format!("score {score} of {member:?} is not a day ordinal")));
    }
    Ok(score as DayOrdinal)
}

fn corrupt(reason: String) -> FunFactError {
    StorageError::Corrupt {
        collection: FACTS_KEY.to_string(),
        reason,
    }
    .into()
}

/// [`FactStore`] over the `funfacts` sorted set.
#[derive(Clone)]
pub struct RedisFactStore {
    conn: ConnectionManager,
}

impl RedisFactStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn connect(url: &str) -> FunFactResult<Self> {
        Ok(Self::new(connect(url).await?))
    }
}

#[async_trait]
impl FactStore for RedisFactStore {
    async fn put(&self, fact: &Fact) -> FunFactResult<()> {
        let ordinal = fact.ordinal();
        let mut conn = self.conn.clone();

        // Clear whatever the day held before adding, in one transaction.
        let _: () = redis::pipe()
            .atomic()
            .cmd("ZREMRANGEBYSCORE")
            .arg(FACTS_KEY)
            .arg(ordinal)
            .arg(ordinal)
            .ignore()
            .cmd("ZADD")
            .arg(FACTS_KEY)
            .arg(ordinal)
            .arg(fact.text())
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("put", e))?;

        tracing::debug!(day = %fact.day(), ordinal, "Stored fact");
        Ok(())
    }

    async fn get(&self, day: Day) -> FunFactResult<Option<Fact>> {
        let ordinal = day_to_ordinal(day);
        let mut conn = self.conn.clone();

        let members: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(FACTS_KEY)
            .arg(ordinal)
            .arg(ordinal)
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("get", e))?;

        Ok(members.into_iter().next().map(|text| Fact::new(day, text)))
    }

    async fn get_recent(&self, n: usize) -> FunFactResult<Vec<Fact>> {
        // ZREVRANGE 0 -1 would mean "everything".
        if n == 0 {
            return Ok(Vec::new());
        }
        let stop = i64::try_from(n - 1).unwrap_or(i64::MAX);
        let mut conn = self.conn.clone();

        let entries: Vec<(String, f64)> = redis::cmd("ZREVRANGE")
            .arg(FACTS_KEY)
            .arg(0)
            .arg(stop)
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("get_recent", e))?;

        entries
            .into_iter()
            .map(|(text, score)| {
                let ordinal = score_to_ordinal(&text, score)?;
                Fact::from_ordinal(ordinal, text)
                    .ok_or_else(|| corrupt(format!("ordinal {ordinal} out of range")))
            })
            .collect()
    }
}

impl std::fmt::Debug for RedisFactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisFactStore")
            .field("key", &FACTS_KEY)
            .finish_non_exhaustive()
    }
}

/// [`DailyLock`] using `SET NX PX` on a per-day key.
#[derive(Clone)]
pub struct RedisDailyLock {
    conn: ConnectionManager,
}

impl RedisDailyLock {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl DailyLock for RedisDailyLock {
    async fn acquire(&self, day: Day, ttl: Duration) -> FunFactResult<bool> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let mut conn = self.conn.clone();

        let reply: Option<String> = redis::cmd("SET")
            .arg(lock_key(day))
            .arg("1")
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("acquire_lock", e))?;

        Ok(reply.is_some())
    }

    async fn release(&self, day: Day) -> FunFactResult<()> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("DEL")
            .arg(lock_key(day))
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("release_lock", e))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisDailyLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisDailyLock")
            .field("prefix", &LOCK_KEY_PREFIX)
            .finish_non_exhaustive()
    }
}
