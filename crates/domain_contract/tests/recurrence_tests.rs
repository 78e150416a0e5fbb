//! Scenario tests for recurrence rules and next-date calculation

use chrono::NaiveDate;
use domain_contract::{RecurrenceError, RecurrenceRule, RecurrenceUnit};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn monthly_advance_through_leap_february() {
    let rule = RecurrenceRule::monthly();
    assert_eq!(rule.advance(date(2024, 1, 31), 31).unwrap(), date(2024, 2, 29));
}

#[test]
fn monthly_advance_through_plain_february() {
    let rule = RecurrenceRule::monthly();
    assert_eq!(rule.advance(date(2023, 1, 31), 31).unwrap(), date(2023, 2, 28));
}

#[test]
fn monthly_advance_mid_month_is_stable() {
    let rule = RecurrenceRule::monthly();
    assert_eq!(rule.advance(date(2024, 1, 15), 15).unwrap(), date(2024, 2, 15));
}

#[test]
fn month_end_contract_sticks_to_month_end() {
    // A contract created on the last day of a month keeps billing at
    // month end when the billing day exceeds every shorter month.
    let rule = RecurrenceRule::monthly();
    let mut current = date(2024, 1, 31);
    let expected = [
        date(2024, 2, 29),
        date(2024, 3, 31),
        date(2024, 4, 30),
        date(2024, 5, 31),
    ];
    for want in expected {
        current = rule.advance(current, 31).unwrap();
        assert_eq!(current, want);
    }
}

#[test]
fn quarterly_rule_advances_three_months() {
    let rule = RecurrenceRule::new(RecurrenceUnit::Monthly, 3).unwrap();
    assert_eq!(rule.advance(date(2024, 11, 30), 30).unwrap(), date(2025, 2, 28));
}

#[test]
fn weekly_rule_ignores_billing_day() {
    let rule = RecurrenceRule::new(RecurrenceUnit::Weekly, 1).unwrap();
    assert_eq!(rule.advance(date(2024, 2, 26), 31).unwrap(), date(2024, 3, 4));
}

#[test]
fn yearly_rule_keeps_anniversary() {
    let rule = RecurrenceRule::new(RecurrenceUnit::Yearly, 2).unwrap();
    assert_eq!(rule.advance(date(2023, 6, 15), 15).unwrap(), date(2025, 6, 15));
}

#[test]
fn unknown_unit_token_is_rejected() {
    let err = "biweekly".parse::<RecurrenceUnit>().unwrap_err();
    assert_eq!(
        err,
        RecurrenceError::InvalidRecurrenceUnit("biweekly".to_string())
    );
}

#[test]
fn unit_tokens_roundtrip_through_display() {
    for unit in [
        RecurrenceUnit::Daily,
        RecurrenceUnit::Weekly,
        RecurrenceUnit::Monthly,
        RecurrenceUnit::Yearly,
    ] {
        let parsed: RecurrenceUnit = unit.to_string().parse().unwrap();
        assert_eq!(parsed, unit);
    }
}
