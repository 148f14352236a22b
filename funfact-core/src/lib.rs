//! Daily Fun Fact Core
//!
//! Domain types, capability traits and the coordination service that
//! produces at most one generated fact per calendar day.
//!
//! The crate has no knowledge of Redis, HTTP or any particular model
//! provider. Those live behind [`FactStore`], [`DailyLock`] and
//! [`TextGenerator`] and are supplied by the other workspace crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod fact;
pub mod llm;
pub mod lock;
pub mod prompt;
pub mod service;
pub mod store;

pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};
pub use config::{env_parse, ServiceConfig};
pub use error::{ConfigError, FunFactError, FunFactResult, LlmError, StorageError};
pub use fact::{day_from_ordinal, day_to_ordinal, Day, DayOrdinal, Fact};
pub use llm::{GenerationOptions, TextGenerator};
pub use lock::{DailyLock, DEFAULT_LOCK_TTL};
pub use prompt::{build_prompt, PromptCache, BASE_PROMPT};
pub use service::{FactService, LookupOutcome, Resolution};
pub use store::FactStore;

/// Number of recent facts fed into the prompt and served by `/recent`.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
