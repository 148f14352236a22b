//! Request and response types

use chrono::NaiveDate;
use funfact_core::Fact;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A day's fun fact as served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FunFactDto {
    /// Calendar day, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// The fact text
    pub fact: String,
}

impl From<Fact> for FunFactDto {
    fn from(fact: Fact) -> Self {
        Self {
            date: fact.day(),
            fact: fact.into_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_serializes_iso_date() -> Result<(), String> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?;
        let dto = FunFactDto::from(Fact::new(day, "Sloths can hold their breath longer than dolphins."));
        let json = serde_json::to_value(&dto).map_err(|e| e.to_string())?;
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2024-01-15",
                "fact": "Sloths can hold their breath longer than dolphins."
            })
        );
        Ok(())
    }
}
