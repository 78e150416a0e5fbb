//! Invoice drafts
//!
//! Invoices are owned by the host accounting system; billing only supplies
//! the values. An [`InvoiceDraft`] carries everything the accounting
//! collaborator needs to create the real record: header fields and fully
//! computed lines.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    ContractId, Currency, DateRange, JournalId, Money, PartnerId, ProductId, UserId,
};
use domain_contract::{TaxSet, UnitOfMeasure};

/// Header values of an invoice to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Invoice date: the billing date the period starts on
    pub invoice_date: NaiveDate,
    /// The billed period, endpoints inclusive
    pub period: DateRange,
    /// Customer being invoiced
    pub partner: PartnerId,
    /// Contract the invoice traces back to
    pub contract: ContractId,
    /// Invoice currency (from the contract pricelist)
    pub currency: Currency,
    /// Sale journal the invoice posts to
    pub journal: JournalId,
    /// Origin reference shown on the invoice (the contract number)
    pub origin: String,
    /// Payment term granted to the customer, in days
    pub payment_term_days: Option<u32>,
    /// Customer-facing narration text
    pub narration: String,
    /// Salesperson carried over from the contract
    pub salesperson: Option<UserId>,
}

impl InvoiceHeader {
    /// Payment due date: the invoice date plus the customer's payment term
    pub fn due_date(&self) -> NaiveDate {
        match self.payment_term_days {
            Some(days) => self.invoice_date + Duration::days(days as i64),
            None => self.invoice_date,
        }
    }
}

/// Line values of an invoice to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub product: ProductId,
    pub description: String,
    pub quantity: Decimal,
    pub uom: UnitOfMeasure,
    /// Unit price actually billed (after any rental pricing override)
    pub price_unit: Decimal,
    /// Discount percent carried from the contract line
    pub discount: Decimal,
    /// Taxes after fiscal-position mapping
    pub taxes: TaxSet,
    /// Net amount, taxes excluded
    pub subtotal: Money,
    /// Total tax over the line
    pub tax: Money,
    /// Gross amount, taxes included
    pub total: Money,
}

/// A complete invoice projection for one billing period of one contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub header: InvoiceHeader,
    pub lines: Vec<InvoiceLine>,
}

impl InvoiceDraft {
    /// Sum of line subtotals
    pub fn untaxed_total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(self.header.currency), |acc, line| acc + line.subtotal)
    }

    /// Sum of line tax amounts
    pub fn tax_total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(self.header.currency), |acc, line| acc + line.tax)
    }

    /// Sum of line totals
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(self.header.currency), |acc, line| acc + line.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn header(payment_term_days: Option<u32>) -> InvoiceHeader {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        InvoiceHeader {
            invoice_date: start,
            period: DateRange::new(start, end).unwrap(),
            partner: PartnerId::new(),
            contract: ContractId::new(),
            currency: Currency::USD,
            journal: JournalId::new(),
            origin: "2024/0001".to_string(),
            payment_term_days,
            narration: String::new(),
            salesperson: None,
        }
    }

    fn line(subtotal: Decimal, tax: Decimal) -> InvoiceLine {
        InvoiceLine {
            product: ProductId::new(),
            description: "Plan".to_string(),
            quantity: dec!(1),
            uom: UnitOfMeasure::unit(),
            price_unit: subtotal,
            discount: Decimal::ZERO,
            taxes: Vec::new(),
            subtotal: Money::new(subtotal, Currency::USD),
            tax: Money::new(tax, Currency::USD),
            total: Money::new(subtotal + tax, Currency::USD),
        }
    }

    #[test]
    fn test_due_date_defaults_to_invoice_date() {
        assert_eq!(header(None).due_date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_due_date_applies_payment_term() {
        assert_eq!(
            header(Some(15)).due_date(),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
    }

    #[test]
    fn test_draft_totals_fold_over_lines() {
        let draft = InvoiceDraft {
            header: header(None),
            lines: vec![line(dec!(100), dec!(12)), line(dec!(50), dec!(6))],
        };

        assert_eq!(draft.untaxed_total().amount(), dec!(150));
        assert_eq!(draft.tax_total().amount(), dec!(18));
        assert_eq!(draft.total().amount(), dec!(168));
    }
}
