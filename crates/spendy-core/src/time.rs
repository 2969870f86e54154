//! Inclusive date ranges for filtering transactions by day

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Optional inclusive bounds on `transaction_date`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Both bounds set
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self::new(Some(from), Some(to))
    }

    pub fn since(from: NaiveDate) -> Self {
        Self::new(Some(from), None)
    }

    pub fn until(to: NaiveDate) -> Self {
        Self::new(None, Some(to))
    }

    /// Monday to Sunday week containing `date`
    pub fn week_of(date: NaiveDate) -> Self {
        let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Self::between(start, start + Duration::days(6))
    }

    /// Calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let next_month = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt()).unwrap_or(date);
        Self::between(start, end)
    }

    /// Calendar year containing `date`
    pub fn year_of(date: NaiveDate) -> Self {
        Self::new(
            NaiveDate::from_ymd_opt(date.year(), 1, 1),
            NaiveDate::from_ymd_opt(date.year(), 12, 31),
        )
    }

    /// No bound set; the date stage is skipped
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Reject ranges whose start is after their end
    pub fn validate(&self) -> CoreResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(CoreError::InvalidDateRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check if a date is within the range, bounds included
    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.from, self.to) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Get a human-readable description of the range
    pub fn description(&self) -> String {
        match (self.from, self.to) {
            (None, None) => "All Time".to_string(),
            (Some(s), None) => format!("From {}", s.format("%b %d, %Y")),
            (None, Some(e)) => format!("Until {}", e.format("%b %d, %Y")),
            (Some(s), Some(e)) => format!("{} - {}", s.format("%b %d, %Y"), e.format("%b %d, %Y")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::between(date(2024, 1, 1), date(2024, 12, 31));
        assert!(range.contains(&date(2024, 1, 1)));
        assert!(range.contains(&date(2024, 6, 15)));
        assert!(range.contains(&date(2024, 12, 31)));
        assert!(!range.contains(&date(2023, 12, 31)));
        assert!(!range.contains(&date(2025, 1, 1)));
    }

    #[test]
    fn test_open_ended_bounds() {
        assert!(DateRange::since(date(2024, 3, 1)).contains(&date(2024, 3, 1)));
        assert!(!DateRange::since(date(2024, 3, 1)).contains(&date(2024, 2, 29)));
        assert!(DateRange::until(date(2024, 3, 1)).contains(&date(2024, 3, 1)));
        assert!(!DateRange::until(date(2024, 3, 1)).contains(&date(2024, 3, 2)));
        assert!(DateRange::default().contains(&date(1999, 1, 1)));
        assert!(DateRange::default().is_unbounded());
    }

    #[test]
    fn test_week_starts_monday() {
        // 2024-06-15 is a Saturday
        let week = DateRange::week_of(date(2024, 6, 15));
        assert_eq!(week.from, Some(date(2024, 6, 10)));
        assert_eq!(week.to, Some(date(2024, 6, 16)));
    }

    #[test]
    fn test_month_and_year() {
        let feb = DateRange::month_of(date(2024, 2, 10));
        assert_eq!(feb.from, Some(date(2024, 2, 1)));
        assert_eq!(feb.to, Some(date(2024, 2, 29)));

        let dec = DateRange::month_of(date(2024, 12, 5));
        assert_eq!(dec.to, Some(date(2024, 12, 31)));

        let year = DateRange::year_of(date(2024, 7, 4));
        assert_eq!(year.from, Some(date(2024, 1, 1)));
        assert_eq!(year.to, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_validate_rejects_reversed_range() {
        let range = DateRange::between(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(range.validate(), Err(CoreError::InvalidDateRange { .. })));
        assert!(DateRange::between(date(2024, 1, 1), date(2024, 1, 1)).validate().is_ok());
    }

    #[test]
    fn test_description() {
        assert_eq!(DateRange::default().description(), "All Time");
        let range = DateRange::between(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(range.description(), "Jan 01, 2024 - Jan 31, 2024");
    }
}
