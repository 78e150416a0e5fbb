//! Subcontracts: per-order tracking under a contract
//!
//! A rental contract may serve many individual orders; each gets a
//! subcontract record named by a contract-scoped sequence ("1", "2", ...)
//! so the customer-facing paperwork can reference them stably.

use serde::{Deserialize, Serialize};

use core_kernel::{ContractId, OrderId, SubcontractId, SubcontractTypeId};

/// Catalog record classifying subcontracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcontractType {
    pub id: SubcontractTypeId,
    pub name: String,
}

impl SubcontractType {
    pub fn new(id: SubcontractTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Links one sale order to the contract it is billed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcontract {
    pub id: SubcontractId,
    pub contract: ContractId,
    pub order: OrderId,
    pub subcontract_type: Option<SubcontractTypeId>,
    /// Sequential name scoped to the contract
    pub name: String,
}

impl Subcontract {
    /// Creates the next subcontract in the contract's sequence
    ///
    /// `existing_count` is the number of subcontracts the contract already
    /// has; the new record is named `existing_count + 1`.
    pub fn sequential(
        contract: ContractId,
        order: OrderId,
        subcontract_type: Option<SubcontractTypeId>,
        existing_count: usize,
    ) -> Self {
        Self {
            id: SubcontractId::new_v7(),
            contract,
            order,
            subcontract_type,
            name: (existing_count + 1).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_naming() {
        let contract = ContractId::new();
        let first = Subcontract::sequential(contract, OrderId::new(), None, 0);
        let second = Subcontract::sequential(contract, OrderId::new(), None, 1);

        assert_eq!(first.name, "1");
        assert_eq!(second.name, "2");
    }
}
