//! Contract lines
//!
//! A contract line is one billable item: a product, a quantity, a unit
//! price, an optional discount, and a set of taxes. Its monetary triple
//! (subtotal, tax, total) is derived and recomputed whenever one of those
//! inputs changes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{ContractLineId, Currency, Money, ProductId, TimeWindow};

use crate::catalog::{Product, UnitOfMeasure};
use crate::partner::Partner;
use crate::tax::{TaxEngine, TaxSet};

/// What kind of line this is
///
/// Rental lines carry the pickup/return window used by period-based rental
/// pricing; standard lines carry nothing extra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Standard,
    Rental {
        window: Option<TimeWindow>,
    },
}

impl LineKind {
    pub fn is_rental(&self) -> bool {
        matches!(self, LineKind::Rental { .. })
    }

    /// The pickup/return window, when this is a rental line that has one
    pub fn rental_window(&self) -> Option<&TimeWindow> {
        match self {
            LineKind::Rental { window } => window.as_ref(),
            LineKind::Standard => None,
        }
    }
}

/// The derived monetary figures of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    /// Net amount, taxes excluded
    pub subtotal: Money,
    /// Total tax over the line
    pub tax: Money,
    /// Gross amount, taxes included
    pub total: Money,
}

/// One billable item within a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractLine {
    pub id: ContractLineId,
    pub product: ProductId,
    pub description: String,
    pub quantity: Decimal,
    pub uom: UnitOfMeasure,
    /// Unit price in the contract currency
    pub price_unit: Decimal,
    /// Discount percent (0-100)
    pub discount: Decimal,
    pub taxes: TaxSet,
    pub kind: LineKind,
    /// Derived figures; None until the first recompute after a change
    amounts: Option<LineAmounts>,
}

impl ContractLine {
    pub fn new(
        product: &Product,
        description: impl Into<String>,
        quantity: Decimal,
        price_unit: Decimal,
    ) -> Self {
        Self {
            id: ContractLineId::new_v7(),
            product: product.id,
            description: description.into(),
            quantity,
            uom: product.uom.clone(),
            price_unit,
            discount: Decimal::ZERO,
            taxes: product.default_taxes.clone(),
            kind: LineKind::Standard,
            amounts: None,
        }
    }

    /// Builds a line from already-resolved values
    ///
    /// Used when the values come from another document (a confirmed sale
    /// order) rather than from a product's defaults.
    pub fn from_parts(
        product: ProductId,
        description: impl Into<String>,
        quantity: Decimal,
        uom: UnitOfMeasure,
        price_unit: Decimal,
    ) -> Self {
        Self {
            id: ContractLineId::new_v7(),
            product,
            description: description.into(),
            quantity,
            uom,
            price_unit,
            discount: Decimal::ZERO,
            taxes: Vec::new(),
            kind: LineKind::Standard,
            amounts: None,
        }
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_taxes(mut self, taxes: TaxSet) -> Self {
        self.taxes = taxes;
        self
    }

    pub fn with_kind(mut self, kind: LineKind) -> Self {
        self.kind = kind;
        self
    }

    /// The derived figures, when up to date
    pub fn amounts(&self) -> Option<&LineAmounts> {
        self.amounts.as_ref()
    }

    /// Unit price after discount
    pub fn effective_price(&self) -> Decimal {
        self.price_unit * (dec!(1) - self.discount / dec!(100))
    }

    /// Mutators invalidate the derived figures until the next recompute.
    pub fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity;
        self.amounts = None;
    }

    pub fn set_price_unit(&mut self, price_unit: Decimal) {
        self.price_unit = price_unit;
        self.amounts = None;
    }

    pub fn set_discount(&mut self, discount: Decimal) {
        self.discount = discount;
        self.amounts = None;
    }

    pub fn set_taxes(&mut self, taxes: TaxSet) {
        self.taxes = taxes;
        self.amounts = None;
    }

    /// Recomputes subtotal/tax/total by delegating to the tax engine
    ///
    /// The engine receives the discounted unit price in the contract
    /// currency; its three outputs are stored verbatim. Calling this twice
    /// with unchanged inputs yields identical figures.
    pub fn recompute_amounts(
        &mut self,
        engine: &dyn TaxEngine,
        currency: Currency,
        product: &Product,
        partner: Option<&Partner>,
    ) -> LineAmounts {
        let price = Money::new(self.effective_price(), currency);
        let computed = engine.compute_all(price, self.quantity, &self.taxes, product, partner);
        let amounts = LineAmounts {
            subtotal: computed.total_excluded,
            tax: computed.tax_amount,
            total: computed.total_included,
        };
        self.amounts = Some(amounts);
        amounts
    }
}
