//! The daily fact value and calendar-day ordinals.
//!
//! Days are stored by their ordinal in the proleptic Gregorian calendar
//! (0001-01-01 is day 1). Ordinals grow monotonically with the date, so a
//! store can answer "most recent N" with a rank query on the ordinal.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar day with no time component.
pub type Day = NaiveDate;

/// Day number where 0001-01-01 is 1.
pub type DayOrdinal = i32;

/// Convert a day to its ordinal.
pub fn day_to_ordinal(day: Day) -> DayOrdinal {
    day.num_days_from_ce()
}

/// Convert an ordinal back to a day.
///
/// Returns `None` when the ordinal is outside chrono's supported range.
pub fn day_from_ordinal(ordinal: DayOrdinal) -> Option<Day> {
    NaiveDate::from_num_days_from_ce_opt(ordinal)
}

/// A generated fact for one calendar day.
///
/// Facts are immutable once built: the fields are private and only
/// exposed by reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    day: Day,
    text: String,
}

impl Fact {
    pub fn new(day: Day, text: impl Into<String>) -> Self {
        Self {
            day,
            text: text.into(),
        }
    }

    /// Rebuild a fact from a stored ordinal.
    pub fn from_ordinal(ordinal: DayOrdinal, text: impl Into<String>) -> Option<Self> {
        day_from_ordinal(ordinal).map(|day| Self::new(day, text))
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ordinal(&self) -> DayOrdinal {
        day_to_ordinal(self.day)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
