//! Custom assertion helpers for domain types

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_billing::InvoiceDraft;

/// Asserts a money amount equals the expected decimal
///
/// # Panics
///
/// Panics with a readable message when the amounts differ.
pub fn assert_money_eq(actual: Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "expected {} {}, got {}",
        expected,
        actual.currency(),
        actual
    );
}

/// Asserts an invoice draft is internally consistent
///
/// Checks that every line's subtotal + tax equals its total, and that the
/// draft totals equal the sums over the lines.
pub fn assert_draft_consistent(draft: &InvoiceDraft) {
    for line in &draft.lines {
        assert_eq!(
            line.subtotal + line.tax,
            line.total,
            "line '{}' figures do not add up",
            line.description
        );
    }

    let currency = draft.header.currency;
    let subtotal_sum = draft
        .lines
        .iter()
        .fold(Money::zero(currency), |acc, l| acc + l.subtotal);
    let tax_sum = draft
        .lines
        .iter()
        .fold(Money::zero(currency), |acc, l| acc + l.tax);
    let total_sum = draft
        .lines
        .iter()
        .fold(Money::zero(currency), |acc, l| acc + l.total);

    assert_eq!(draft.untaxed_total(), subtotal_sum);
    assert_eq!(draft.tax_total(), tax_sum);
    assert_eq!(draft.total(), total_sum);
}
