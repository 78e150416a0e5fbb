//! Recurrence rules and next-billing-date calculation
//!
//! A contract repeats its invoice at a fixed interval of days, weeks,
//! months, or years. Advancing a date is trivial for every unit except
//! months: the billing day a customer signed up with must survive passing
//! through shorter months. A contract billed on the 31st of January bills
//! on the 28th (or 29th) of February and comes back to the 31st of March.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when building or applying a recurrence rule
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    /// An unknown recurrence unit token was supplied
    #[error("Invalid recurrence unit: {0}")]
    InvalidRecurrenceUnit(String),

    /// The interval must be at least one unit
    #[error("Invalid recurrence interval: {0} (must be at least 1)")]
    InvalidInterval(u32),

    /// The preferred billing day must be a calendar day of month
    #[error("Invalid billing day: {0} (must be between 1 and 31)")]
    InvalidBillingDay(u32),

    /// The advanced date fell outside the representable calendar range
    #[error("Date overflow advancing from {0}")]
    DateOverflow(NaiveDate),
}

/// Unit of the recurrence interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            RecurrenceUnit::Daily => "daily",
            RecurrenceUnit::Weekly => "weekly",
            RecurrenceUnit::Monthly => "monthly",
            RecurrenceUnit::Yearly => "yearly",
        };
        write!(f, "{}", token)
    }
}

impl FromStr for RecurrenceUnit {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RecurrenceUnit::Daily),
            "weekly" => Ok(RecurrenceUnit::Weekly),
            "monthly" => Ok(RecurrenceUnit::Monthly),
            "yearly" => Ok(RecurrenceUnit::Yearly),
            other => Err(RecurrenceError::InvalidRecurrenceUnit(other.to_string())),
        }
    }
}

/// A recurrence rule: repeat every `interval` units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    unit: RecurrenceUnit,
    interval: u32,
}

impl RecurrenceRule {
    /// Creates a rule, rejecting a zero interval
    pub fn new(unit: RecurrenceUnit, interval: u32) -> Result<Self, RecurrenceError> {
        if interval == 0 {
            return Err(RecurrenceError::InvalidInterval(interval));
        }
        Ok(Self { unit, interval })
    }

    /// The default rule for new contracts: monthly, every month
    pub fn monthly() -> Self {
        Self {
            unit: RecurrenceUnit::Monthly,
            interval: 1,
        }
    }

    pub fn unit(&self) -> RecurrenceUnit {
        self.unit
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Computes the next billing date from `anchor`
    ///
    /// `billing_day` is the day of month the contract was originally set to
    /// bill on. It only matters for monthly rules:
    ///
    /// - if the target month has at least `billing_day` days, the result
    ///   lands on that day;
    /// - otherwise the result is the last day of the target month.
    ///
    /// Daily and weekly rules add whole days; yearly rules add whole years
    /// with calendar clamping (Feb 29 anchors land on Feb 28 outside leap
    /// years).
    pub fn advance(&self, anchor: NaiveDate, billing_day: u32) -> Result<NaiveDate, RecurrenceError> {
        if !(1..=31).contains(&billing_day) {
            return Err(RecurrenceError::InvalidBillingDay(billing_day));
        }

        match self.unit {
            RecurrenceUnit::Daily => anchor
                .checked_add_signed(Duration::days(self.interval as i64))
                .ok_or(RecurrenceError::DateOverflow(anchor)),
            RecurrenceUnit::Weekly => anchor
                .checked_add_signed(Duration::weeks(self.interval as i64))
                .ok_or(RecurrenceError::DateOverflow(anchor)),
            RecurrenceUnit::Yearly => anchor
                .checked_add_months(Months::new(12 * self.interval))
                .ok_or(RecurrenceError::DateOverflow(anchor)),
            RecurrenceUnit::Monthly => {
                let candidate = anchor
                    .checked_add_months(Months::new(self.interval))
                    .ok_or(RecurrenceError::DateOverflow(anchor))?;
                let last = last_day_of_month(candidate);
                if last.day() >= billing_day {
                    // The target month is long enough to honor the intended day.
                    Ok(candidate
                        .with_day(billing_day)
                        .ok_or(RecurrenceError::DateOverflow(anchor))?)
                } else {
                    // Shorter target month: stick to its last day so a
                    // month-end contract keeps billing at month end.
                    Ok(last)
                }
            }
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interval == 1 {
            write!(f, "{}", self.unit)
        } else {
            let plural = match self.unit {
                RecurrenceUnit::Daily => "days",
                RecurrenceUnit::Weekly => "weeks",
                RecurrenceUnit::Monthly => "months",
                RecurrenceUnit::Yearly => "years",
            };
            write!(f, "every {} {}", self.interval, plural)
        }
    }
}

/// Returns the last calendar day of the month `date` falls in
fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // The first of the following month always exists.
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first day of month is always valid")
        .pred_opt()
        .expect("month start has a predecessor")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("monthly".parse::<RecurrenceUnit>().unwrap(), RecurrenceUnit::Monthly);
        assert!(matches!(
            "fortnightly".parse::<RecurrenceUnit>(),
            Err(RecurrenceError::InvalidRecurrenceUnit(_))
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(matches!(
            RecurrenceRule::new(RecurrenceUnit::Daily, 0),
            Err(RecurrenceError::InvalidInterval(0))
        ));
    }

    #[test]
    fn test_daily_and_weekly_add_whole_days() {
        let rule = RecurrenceRule::new(RecurrenceUnit::Daily, 10).unwrap();
        assert_eq!(rule.advance(date(2024, 1, 25), 25).unwrap(), date(2024, 2, 4));

        let rule = RecurrenceRule::new(RecurrenceUnit::Weekly, 2).unwrap();
        assert_eq!(rule.advance(date(2024, 1, 1), 1).unwrap(), date(2024, 1, 15));
    }

    #[test]
    fn test_monthly_keeps_billing_day() {
        let rule = RecurrenceRule::monthly();
        assert_eq!(rule.advance(date(2024, 1, 15), 15).unwrap(), date(2024, 2, 15));
    }

    #[test]
    fn test_monthly_clamps_to_short_month() {
        let rule = RecurrenceRule::monthly();
        assert_eq!(rule.advance(date(2024, 1, 31), 31).unwrap(), date(2024, 2, 29));
        assert_eq!(rule.advance(date(2023, 1, 31), 31).unwrap(), date(2023, 2, 28));
    }

    #[test]
    fn test_monthly_returns_to_billing_day_after_short_month() {
        let rule = RecurrenceRule::monthly();
        // Feb 29 anchor, but the contract's billing day is the 31st.
        assert_eq!(rule.advance(date(2024, 2, 29), 31).unwrap(), date(2024, 3, 31));
    }

    #[test]
    fn test_yearly_clamps_leap_day() {
        let rule = RecurrenceRule::new(RecurrenceUnit::Yearly, 1).unwrap();
        assert_eq!(rule.advance(date(2024, 2, 29), 29).unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn test_invalid_billing_day_rejected() {
        let rule = RecurrenceRule::monthly();
        assert!(matches!(
            rule.advance(date(2024, 1, 31), 0),
            Err(RecurrenceError::InvalidBillingDay(0))
        ));
        assert!(matches!(
            rule.advance(date(2024, 1, 31), 32),
            Err(RecurrenceError::InvalidBillingDay(32))
        ));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(last_day_of_month(date(2023, 2, 10)), date(2023, 2, 28));
        assert_eq!(last_day_of_month(date(2024, 12, 1)), date(2024, 12, 31));
    }
}
