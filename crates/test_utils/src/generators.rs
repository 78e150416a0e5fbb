//! Property-based test data generators

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money};
use domain_contract::{RecurrenceRule, RecurrenceUnit};

/// Any calendar date between 2000 and 2099, day capped at 28 so every
/// month is valid
pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Any day-of-month preference a contract can carry
pub fn arb_billing_day() -> impl Strategy<Value = u32> {
    1u32..=31
}

/// Any valid recurrence rule with an interval up to two years of months
pub fn arb_recurrence_rule() -> impl Strategy<Value = RecurrenceRule> {
    (
        prop_oneof![
            Just(RecurrenceUnit::Daily),
            Just(RecurrenceUnit::Weekly),
            Just(RecurrenceUnit::Monthly),
            Just(RecurrenceUnit::Yearly),
        ],
        1u32..=24,
    )
        .prop_map(|(unit, interval)| RecurrenceRule::new(unit, interval).unwrap())
}

/// A USD amount within typical invoice bounds
pub fn arb_usd_amount() -> impl Strategy<Value = Money> {
    (1i64..10_000_000).prop_map(|minor| Money::from_minor(minor, Currency::USD))
}

/// A discount percent between 0 and 100
pub fn arb_discount() -> impl Strategy<Value = Decimal> {
    (0u32..=100).prop_map(Decimal::from)
}
