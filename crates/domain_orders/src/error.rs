//! Order domain errors

use thiserror::Error;

/// Errors that can occur in the order domain
#[derive(Debug, Error)]
pub enum OrderError {
    /// An order cannot be confirmed without a contract to bill under
    #[error("Cannot confirm order without contract")]
    MissingContract,

    /// The order is linked to a different contract than the one given
    #[error("Order {order} is not linked to contract {contract}")]
    ContractMismatch {
        order: String,
        contract: String,
    },

    /// The order is not in a state that allows the operation
    #[error("Order {order} is not confirmed")]
    NotConfirmed {
        order: String,
    },
}
