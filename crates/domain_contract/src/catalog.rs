//! Product and pricelist projections
//!
//! Billing reads products for their name, default tax set, and unit of
//! measure; pricelists pin the currency a contract is denominated in.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, PricelistId, ProductId};

use crate::tax::TaxSet;

/// Unit a product quantity is expressed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    pub name: String,
}

impl UnitOfMeasure {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The default unit for countable goods and services
    pub fn unit() -> Self {
        Self::new("Unit")
    }

    pub fn day() -> Self {
        Self::new("Day")
    }
}

/// A sellable product, as seen by billing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub uom: UnitOfMeasure,
    /// Taxes applied by default when this product is invoiced
    pub default_taxes: TaxSet,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, uom: UnitOfMeasure) -> Self {
        Self {
            id,
            name: name.into(),
            uom,
            default_taxes: Vec::new(),
        }
    }

    pub fn with_default_taxes(mut self, taxes: TaxSet) -> Self {
        self.default_taxes = taxes;
        self
    }
}

/// A pricelist pins the currency contracts are denominated in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricelist {
    pub id: PricelistId,
    pub name: String,
    pub currency: Currency,
}

impl Pricelist {
    pub fn new(id: PricelistId, name: impl Into<String>, currency: Currency) -> Self {
        Self {
            id,
            name: name.into(),
            currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::TaxRate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_with_default_taxes() {
        let product = Product::new(ProductId::new(), "Equipment rental", UnitOfMeasure::day())
            .with_default_taxes(vec![TaxRate::excluded("VAT 12%", dec!(12))]);

        assert_eq!(product.default_taxes.len(), 1);
        assert_eq!(product.uom.name, "Day");
    }

    #[test]
    fn test_pricelist_carries_currency() {
        let pricelist = Pricelist::new(PricelistId::new(), "UZS retail", Currency::UZS);
        assert_eq!(pricelist.currency, Currency::UZS);
    }
}
