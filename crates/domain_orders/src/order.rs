//! Sale orders, as seen by contract synchronization

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, ContractId, OrderId, OrderLineId, PartnerId, ProductId, SubcontractTypeId};
use domain_contract::{LineKind, TaxSet, UnitOfMeasure};

use crate::error::OrderError;

/// Order lifecycle states relevant to synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    #[default]
    Draft,
    Confirmed,
}

/// One line of a sale order
///
/// Rental orders mark their lines with [`LineKind::Rental`] so the
/// pickup/return window survives the projection into contract lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub product: ProductId,
    pub description: String,
    pub quantity: Decimal,
    pub uom: UnitOfMeasure,
    pub price_unit: Decimal,
    pub discount: Decimal,
    pub taxes: TaxSet,
    pub kind: LineKind,
}

impl OrderLine {
    pub fn new(
        product: ProductId,
        description: impl Into<String>,
        quantity: Decimal,
        uom: UnitOfMeasure,
        price_unit: Decimal,
    ) -> Self {
        Self {
            id: OrderLineId::new_v7(),
            product,
            description: description.into(),
            quantity,
            uom,
            price_unit,
            discount: Decimal::ZERO,
            taxes: Vec::new(),
            kind: LineKind::Standard,
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
}

/// A sale order linked to a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: OrderId,
    pub name: String,
    pub partner: PartnerId,
    pub company: CompanyId,
    /// The contract this order bills under; required for confirmation
    pub contract: Option<ContractId>,
    /// Whether a subcontract record tracks this order under its contract
    pub is_subcontract: bool,
    pub subcontract_type: Option<SubcontractTypeId>,
    pub state: OrderState,
    pub lines: Vec<OrderLine>,
}

impl SalesOrder {
    pub fn new(name: impl Into<String>, partner: PartnerId, company: CompanyId) -> Self {
        Self {
            id: OrderId::new_v7(),
            name: name.into(),
            partner,
            company,
            contract: None,
            is_subcontract: false,
            subcontract_type: None,
            state: OrderState::Draft,
            lines: Vec::new(),
        }
    }

    pub fn for_contract(mut self, contract: ContractId) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn as_subcontract(mut self, subcontract_type: Option<SubcontractTypeId>) -> Self {
        self.is_subcontract = true;
        self.subcontract_type = subcontract_type;
        self
    }

    pub fn add_line(mut self, line: OrderLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Confirms the order
    ///
    /// # Errors
    ///
    /// Fails with `MissingContract` when the order has no contract to bill
    /// under.
    pub fn confirm(&mut self) -> Result<(), OrderError> {
        if self.contract.is_none() {
            return Err(OrderError::MissingContract);
        }
        self.state = OrderState::Confirmed;
        Ok(())
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == OrderState::Confirmed
    }
}
