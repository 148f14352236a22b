//! Source of "today".

use std::str::FromStr;
use std::sync::RwLock;

use chrono::{Local, Utc};

use crate::{ConfigError, Day};

/// Supplies the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> Day;
}

/// Which timezone decides where one day ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    /// Host local time
    #[default]
    Local,
    /// UTC
    Utc,
}

impl FromStr for DayBoundary {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(ConfigError::InvalidValue {
                field: "FUNFACT_DAY_BOUNDARY".to_string(),
                value: other.to_string(),
                reason: "expected 'local' or 'utc'".to_string(),
            }),
        }
    }
}

/// Wall-clock based [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    boundary: DayBoundary,
}

impl SystemClock {
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Day {
        match self.boundary {
            DayBoundary::Local => Local::now().date_naive(),
            DayBoundary::Utc => Utc::now().date_naive(),
        }
    }
}

/// A clock pinned to a settable day, for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    day: RwLock<Day>,
}

impl FixedClock {
    pub fn new(day: Day) -> Self {
        Self {
            day: RwLock::new(day),
        }
    }

    /// Move the clock to another day.
    pub fn set(&self, day: Day) {
        let mut guard = self
            .day
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = day;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Day {
        *self
            .day
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
