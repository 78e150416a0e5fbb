//! Billing domain errors

use thiserror::Error;

use core_kernel::{PortError, TemporalError};
use domain_contract::{ContractError, RecurrenceError};

/// Errors that can occur while preparing or generating invoices
#[derive(Debug, Error)]
pub enum BillingError {
    /// The contract has no customer to invoice
    #[error("You must first select a customer for contract {contract}")]
    MissingPartner {
        contract: String,
    },

    /// The company has no sale journal configured
    #[error("Please define a sale journal for the company \"{company}\"")]
    MissingJournal {
        company: String,
    },

    /// The contract has no date of next invoice
    #[error("Please define the date of next invoice for contract {contract}")]
    MissingNextDate {
        contract: String,
    },

    /// A referenced product is not resolvable
    #[error("Unknown product {product} on contract {contract}")]
    UnknownProduct {
        product: String,
        contract: String,
    },

    /// Contract domain error
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Recurrence rule error
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    /// Temporal error building the billing period
    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    /// Collaborator failure
    #[error(transparent)]
    Port(#[from] PortError),
}
