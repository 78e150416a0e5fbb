//! Contract domain errors

use thiserror::Error;

use core_kernel::MoneyError;

use crate::recurrence::RecurrenceError;

/// Errors that can occur in the contract domain
#[derive(Debug, Error)]
pub enum ContractError {
    /// A lifecycle action was attempted from a state that forbids it
    #[error("It is not allowed to {action} a contract in the following states: {states}")]
    ForbiddenStateTransition {
        action: String,
        states: String,
    },

    /// Required field is missing
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Currency mismatch between contract and a monetary input
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: String,
        actual: String,
    },

    /// Recurrence rule error
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    /// Monetary computation error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ContractError {
    /// Creates a forbidden-transition error naming the offending states
    pub fn forbidden_transition(action: &str, states: &[&str]) -> Self {
        ContractError::ForbiddenStateTransition {
            action: action.to_string(),
            states: states.join(", "),
        }
    }

    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ContractError::Validation(message.into())
    }
}
