//! Calendar stepping over (year, month) pairs
//!
//! Forecasts walk the calendar one month at a time so that every
//! intervening month is visited; seasonal models key their behaviour on
//! the month-of-year of each step.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advance `(year, month)` by `steps` months, carrying into the year.
///
/// The month is normalised into `1..=12`, so an out-of-range month is
/// carried as well.
pub fn advance(year: i32, month: u32, steps: u32) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(steps);
    (total.div_euclid(12) as i32, total.rem_euclid(12) as u32 + 1)
}

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawYearMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = ForecastError;

    fn try_from(raw: RawYearMonth) -> Result<Self> {
        YearMonth::new(raw.year, raw.month)
    }
}

impl YearMonth {
    /// Create a month, rejecting months outside `1..=12`
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Create a month, carrying an out-of-range month into the year
    pub fn normalized(year: i32, month: u32) -> Self {
        let (year, month) = advance(year, month, 0);
        Self { year, month }
    }

    /// The month containing `date`
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-based month of year (January = 0)
    pub fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// The following month
    pub fn next(self) -> Self {
        self.advance(1)
    }

    /// The month `steps` months later
    pub fn advance(self, steps: u32) -> Self {
        let (year, month) = advance(self.year, self.month, steps);
        Self { year, month }
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(&self, other: &YearMonth) -> i64 {
        (i64::from(other.year) - i64::from(self.year)) * 12
            + (i64::from(other.month) - i64::from(self.month))
    }

    /// Every month after `self` up to and including `target`, one step at a time.
    ///
    /// Empty when `target` is not after `self`.
    pub fn walk_to(self, target: YearMonth) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut current = self;
        while current < target {
            current = current.next();
            months.push(current);
        }
        months
    }

    /// First day of the month, if chrono can represent it
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Short display label such as `Jan 2024`
    pub fn label(&self) -> String {
        self.first_day()
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_with_rollover() {
        assert_eq!(advance(2023, 11, 1), (2023, 12));
        assert_eq!(advance(2023, 12, 1), (2024, 1));
        assert_eq!(advance(2023, 6, 18), (2024, 12));
        assert_eq!(advance(2023, 3, 0), (2023, 3));
        assert_eq!(advance(2023, 13, 0), (2024, 1));
    }

    #[test]
    fn test_new_rejects_bad_month() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
        assert!(YearMonth::new(2024, 12).is_ok());
    }

    #[test]
    fn test_normalized() {
        assert_eq!(YearMonth::normalized(2024, 0), YearMonth::new(2023, 12).unwrap());
        assert_eq!(YearMonth::normalized(2024, 14), YearMonth::new(2025, 2).unwrap());
        assert_eq!(YearMonth::normalized(2024, 5), YearMonth::new(2024, 5).unwrap());
    }

    #[test]
    fn test_walk_to_visits_every_month() {
        let start = YearMonth::new(2023, 11).unwrap();
        let walk = start.walk_to(YearMonth::new(2024, 2).unwrap());
        let labels: Vec<String> = walk.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);

        assert!(start.walk_to(start).is_empty());
        assert!(start.walk_to(YearMonth::new(2023, 1).unwrap()).is_empty());
    }

    #[test]
    fn test_months_until_and_order() {
        let a = YearMonth::new(2023, 10).unwrap();
        let b = YearMonth::new(2025, 1).unwrap();
        assert_eq!(a.months_until(&b), 15);
        assert_eq!(b.months_until(&a), -15);
        assert!(a < b);
    }

    #[test]
    fn test_dates_and_labels() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let ym = YearMonth::from_date(&date);
        assert_eq!(ym, YearMonth::new(2024, 3).unwrap());
        assert_eq!(ym.first_day(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(ym.label(), "Mar 2024");
        assert_eq!(ym.month_index(), 2);
    }

    #[test]
    fn test_deserialize_validates_month() {
        let ok: YearMonth = serde_json::from_str(r#"{"year":2024,"month":7}"#).unwrap();
        assert_eq!(ok, YearMonth::new(2024, 7).unwrap());

        let bad = serde_json::from_str::<YearMonth>(r#"{"year":2024,"month":13}"#);
        assert!(bad.is_err());
    }
}
