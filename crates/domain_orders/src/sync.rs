//! Sale-order to contract-line synchronization
//!
//! When an order linked to a contract is confirmed, and the contract has
//! line updates enabled, the contract's line collection is replaced
//! wholesale with a projection of the order's lines. Orders flagged as
//! subcontracts additionally get a subcontract record the first time they
//! sync. Persistence of the mutated contract and the new subcontract is
//! the caller's responsibility.

use tracing::debug;

use domain_contract::{Contract, ContractLine};

use crate::error::OrderError;
use crate::order::{OrderLine, SalesOrder};
use crate::subcontract::Subcontract;

/// What one order's synchronization changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Whether the contract's lines were replaced
    pub lines_replaced: bool,
    /// A subcontract created for this (contract, order) pair, if any
    pub subcontract: Option<Subcontract>,
}

/// Projects one order line into a contract line
///
/// Carries product, description, quantity, unit of measure, price, taxes,
/// and discount; rental lines keep their kind so the pickup/return window
/// survives into period-priced invoicing.
pub fn contract_line_from_order_line(line: &OrderLine) -> ContractLine {
    ContractLine::from_parts(
        line.product,
        line.description.clone(),
        line.quantity,
        line.uom.clone(),
        line.price_unit,
    )
    .with_discount(line.discount)
    .with_taxes(line.taxes.clone())
    .with_kind(line.kind.clone())
}

/// Synchronizes a confirmed order into its contract
///
/// `existing_subcontracts` is the contract's current subcontract set; it
/// decides both the dedup check for the (contract, order) pair and the
/// next sequence name.
///
/// # Errors
///
/// - `NotConfirmed` when the order has not been confirmed
/// - `MissingContract` when the order carries no contract reference
/// - `ContractMismatch` when the order references a different contract
pub fn sync_confirmed_order(
    order: &SalesOrder,
    contract: &mut Contract,
    existing_subcontracts: &[Subcontract],
) -> Result<SyncOutcome, OrderError> {
    if !order.is_confirmed() {
        return Err(OrderError::NotConfirmed {
            order: order.name.clone(),
        });
    }
    let linked = order.contract.ok_or(OrderError::MissingContract)?;
    if linked != contract.id() {
        return Err(OrderError::ContractMismatch {
            order: order.name.clone(),
            contract: contract.name().to_string(),
        });
    }

    if !contract.updates_lines_from_orders() {
        return Ok(SyncOutcome {
            lines_replaced: false,
            subcontract: None,
        });
    }

    let lines: Vec<ContractLine> = order.lines.iter().map(contract_line_from_order_line).collect();
    debug!(
        order = %order.name,
        contract = %contract.name(),
        count = lines.len(),
        "replacing contract lines from confirmed order"
    );
    contract.replace_lines(lines);
    contract.link_order(order.id);

    let already_tracked = existing_subcontracts
        .iter()
        .any(|s| s.contract == contract.id() && s.order == order.id);
    let subcontract = if order.is_subcontract && !already_tracked {
        let scoped_count = existing_subcontracts
            .iter()
            .filter(|s| s.contract == contract.id())
            .count();
        let subcontract = Subcontract::sequential(
            contract.id(),
            order.id,
            order.subcontract_type,
            scoped_count,
        );
        contract.link_subcontract(subcontract.id);
        Some(subcontract)
    } else {
        None
    };

    Ok(SyncOutcome {
        lines_replaced: true,
        subcontract,
    })
}
