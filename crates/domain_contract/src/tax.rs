//! Tax rates and the tax-engine collaborator
//!
//! Contract lines and invoice lines carry an ordered set of [`TaxRate`]s.
//! Turning a priced quantity into subtotal/tax/total figures is delegated
//! to a [`TaxEngine`]; the host accounting system usually provides one, and
//! [`SaleTaxEngine`] is the built-in percentage implementation used when it
//! does not.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, Rate};

use crate::catalog::Product;
use crate::partner::Partner;

/// A single tax applied to a line
///
/// `price_included` marks taxes already contained in the unit price (the
/// usual VAT convention in retail pricelists); the engine carves those out
/// of the gross amount instead of adding them on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate {
    pub name: String,
    pub rate: Rate,
    pub price_included: bool,
}

impl TaxRate {
    /// A percentage tax added on top of the price
    pub fn excluded(name: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            name: name.into(),
            rate: Rate::from_percentage(percentage),
            price_included: false,
        }
    }

    /// A percentage tax already contained in the price
    pub fn included(name: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            name: name.into(),
            rate: Rate::from_percentage(percentage),
            price_included: true,
        }
    }
}

/// The ordered set of taxes applied to a line
pub type TaxSet = Vec<TaxRate>;

/// One computed tax amount in a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    pub name: String,
    pub amount: Money,
}

/// The result of computing all taxes over a priced quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    /// Net amount, taxes excluded
    pub total_excluded: Money,
    /// Gross amount, taxes included
    pub total_included: Money,
    /// Sum of all tax amounts
    pub tax_amount: Money,
    /// Per-tax breakdown
    pub taxes: Vec<TaxLine>,
}

impl TaxComputation {
    /// A computation with no taxes: net and gross are the same figure
    pub fn untaxed(base: Money) -> Self {
        Self {
            total_excluded: base,
            total_included: base,
            tax_amount: Money::zero(base.currency()),
            taxes: Vec::new(),
        }
    }
}

/// Computes tax figures for a priced quantity
///
/// `price` is the effective unit price (discount already applied) in the
/// contract currency. Implementations receive the product and customer so
/// that jurisdiction- or partner-specific engines can vary the result; the
/// built-in engine ignores both.
pub trait TaxEngine: Send + Sync {
    fn compute_all(
        &self,
        price: Money,
        quantity: Decimal,
        taxes: &[TaxRate],
        product: &Product,
        partner: Option<&Partner>,
    ) -> TaxComputation;
}

/// Built-in percentage tax engine
///
/// Price-included rates are carved out of the gross base (`net = gross /
/// (1 + sum of included rates)`, distributed per rate); price-excluded
/// rates are then added on the net. Each tax line is rounded to the
/// currency's decimal places, and the totals are reconciled against the
/// rounded lines so that included taxes never change the gross figure and
/// excluded taxes never change the net figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleTaxEngine;

impl TaxEngine for SaleTaxEngine {
    fn compute_all(
        &self,
        price: Money,
        quantity: Decimal,
        taxes: &[TaxRate],
        _product: &Product,
        _partner: Option<&Partner>,
    ) -> TaxComputation {
        let currency = price.currency();
        let base = price.multiply(quantity);

        if taxes.is_empty() {
            return TaxComputation::untaxed(base);
        }

        let included_sum: Decimal = taxes
            .iter()
            .filter(|t| t.price_included)
            .map(|t| t.rate.as_decimal())
            .sum();
        let included_divisor = dec!(1) + included_sum;

        let mut tax_lines = Vec::with_capacity(taxes.len());
        let mut included_total = Money::zero(currency);
        let mut excluded_total = Money::zero(currency);

        for tax in taxes.iter().filter(|t| t.price_included) {
            let amount = base
                .multiply(tax.rate.as_decimal() / included_divisor)
                .round_to_currency();
            included_total = included_total + amount;
            tax_lines.push(TaxLine {
                name: tax.name.clone(),
                amount,
            });
        }

        let net = base - included_total;

        for tax in taxes.iter().filter(|t| !t.price_included) {
            let amount = tax.rate.apply(&net).round_to_currency();
            excluded_total = excluded_total + amount;
            tax_lines.push(TaxLine {
                name: tax.name.clone(),
                amount,
            });
        }

        TaxComputation {
            total_excluded: net,
            total_included: base + excluded_total,
            tax_amount: included_total + excluded_total,
            taxes: tax_lines,
        }
    }
}

/// A tax substitution table
///
/// Some customers are invoiced under a different tax regime than the
/// product's default (exports, special statuses). A fiscal position maps
/// default taxes, by name, to their replacements; unmapped taxes pass
/// through unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FiscalPosition {
    pub name: String,
    substitutions: Vec<(String, TaxRate)>,
}

impl FiscalPosition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            substitutions: Vec::new(),
        }
    }

    /// Adds a mapping from a default tax (by name) to its replacement
    pub fn substitute(mut self, from: impl Into<String>, to: TaxRate) -> Self {
        self.substitutions.push((from.into(), to));
        self
    }

    /// Applies the substitution table to a tax set
    pub fn map_taxes(&self, taxes: &[TaxRate]) -> TaxSet {
        taxes
            .iter()
            .map(|tax| {
                self.substitutions
                    .iter()
                    .find(|(from, _)| *from == tax.name)
                    .map(|(_, to)| to.clone())
                    .unwrap_or_else(|| tax.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, UnitOfMeasure};
    use core_kernel::{Currency, ProductId};

    fn test_product() -> Product {
        Product::new(ProductId::new(), "Subscription plan", UnitOfMeasure::unit())
    }

    fn compute(price: Money, quantity: Decimal, taxes: &[TaxRate]) -> TaxComputation {
        SaleTaxEngine.compute_all(price, quantity, taxes, &test_product(), None)
    }

    #[test]
    fn test_no_taxes() {
        let result = compute(Money::new(dec!(100), Currency::USD), dec!(2), &[]);
        assert_eq!(result.total_excluded.amount(), dec!(200));
        assert_eq!(result.total_included.amount(), dec!(200));
        assert!(result.tax_amount.is_zero());
        assert!(result.taxes.is_empty());
    }

    #[test]
    fn test_excluded_tax_added_on_top() {
        let taxes = vec![TaxRate::excluded("VAT 12%", dec!(12))];
        let result = compute(Money::new(dec!(100), Currency::UZS), dec!(1), &taxes);

        assert_eq!(result.total_excluded.amount(), dec!(100));
        assert_eq!(result.tax_amount.amount(), dec!(12));
        assert_eq!(result.total_included.amount(), dec!(112));
    }

    #[test]
    fn test_included_tax_carved_out() {
        let taxes = vec![TaxRate::included("VAT 20%", dec!(20))];
        let result = compute(Money::new(dec!(120), Currency::USD), dec!(1), &taxes);

        assert_eq!(result.total_included.amount(), dec!(120));
        assert_eq!(result.tax_amount.amount(), dec!(20));
        assert_eq!(result.total_excluded.amount(), dec!(100));
    }

    #[test]
    fn test_mixed_taxes() {
        let taxes = vec![
            TaxRate::included("VAT 20%", dec!(20)),
            TaxRate::excluded("Levy 5%", dec!(5)),
        ];
        let result = compute(Money::new(dec!(120), Currency::USD), dec!(1), &taxes);

        // Net carved from gross, levy added on net.
        assert_eq!(result.total_excluded.amount(), dec!(100));
        assert_eq!(result.total_included.amount(), dec!(125));
        assert_eq!(result.tax_amount.amount(), dec!(25));
        assert_eq!(result.taxes.len(), 2);
    }

    #[test]
    fn test_breakdown_sums_to_tax_amount() {
        let taxes = vec![
            TaxRate::excluded("VAT 12%", dec!(12)),
            TaxRate::excluded("Excise 3%", dec!(3)),
        ];
        let result = compute(Money::new(dec!(77.77), Currency::USD), dec!(3), &taxes);

        let breakdown_sum = result
            .taxes
            .iter()
            .fold(Money::zero(Currency::USD), |acc, line| acc + line.amount);
        assert_eq!(breakdown_sum, result.tax_amount);
    }

    #[test]
    fn test_fiscal_position_substitutes_by_name() {
        let position = FiscalPosition::new("Export")
            .substitute("VAT 12%", TaxRate::excluded("VAT 0%", dec!(0)));

        let mapped = position.map_taxes(&[
            TaxRate::excluded("VAT 12%", dec!(12)),
            TaxRate::excluded("Levy 5%", dec!(5)),
        ]);

        assert_eq!(mapped[0].name, "VAT 0%");
        assert_eq!(mapped[1].name, "Levy 5%");
    }
}
