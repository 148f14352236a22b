//! Generation prompt construction and per-day memoization.

use std::sync::RwLock;

use crate::{Day, Fact};

/// Instruction sent ahead of the exclusion list.
pub const BASE_PROMPT: &str =
    "Tell me a random fun fact. Your response MUST be only the fun fact. It must be different from these: ";

/// Build the prompt from recent facts, newest first.
///
/// Each fact is backtick-quoted and the list is comma-joined inside
/// brackets. No history gives `[]`.
pub fn build_prompt(recent: &[Fact]) -> String {
    let excluded = recent
        .iter()
        .map(|fact| format!("`{}`", fact.text()))
        .collect::<Vec<_>>()
        .join(",");
    format!("{} + [{}]", BASE_PROMPT, excluded)
}

#[derive(Debug, Clone)]
struct CachedPrompt {
    day: Day,
    text: String,
}

/// Memoized prompt for a single day.
///
/// Latency optimization only. It does not stop duplicate generation and is
/// never held across an await.
#[derive(Debug, Default)]
pub struct PromptCache {
    entry: RwLock<Option<CachedPrompt>>,
}

impl PromptCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached prompt for exactly `day`, if any.
    pub fn get(&self, day: Day) -> Option<String> {
        let guard = self.entry.read().ok()?;
        guard
            .as_ref()
            .filter(|cached| cached.day == day)
            .map(|cached| cached.text.clone())
    }

    /// Replace the cached prompt. A poisoned cache is left alone.
    pub fn set(&self, day: Day, text: String) {
        if let Ok(mut guard) = self.entry.write() {
            *guard = Some(CachedPrompt { day, text });
        }
    }

    /// Day the cached prompt belongs to.
    pub fn cached_day(&self) -> Option<Day> {
        self.entry.read().ok()?.as_ref().map(|cached| cached.day)
    }
}
