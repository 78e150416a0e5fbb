//! Contract Domain - Recurring Customer Agreements
//!
//! This crate implements the contract aggregate at the heart of recurring
//! billing: a customer agreement with a lifecycle state machine, a set of
//! billable lines, and a recurrence rule that determines when the next
//! invoice is due.
//!
//! # Lifecycle
//!
//! Contracts move along `Draft -> Confirmed -> Done`, with `Cancelled`
//! reachable from `Draft` and `Confirmed`, and `Draft` re-enterable from
//! `Cancelled` and `Confirmed`. Guarded actions reject anything else.
//!
//! # Recurrence
//!
//! The [`recurrence::RecurrenceRule`] advances the next billing date by the
//! configured interval. Monthly advancement keeps the originally intended
//! billing day across months of varying length (a contract billed on the
//! 31st bills on Feb 28/29 and returns to the 31st in March).

pub mod contract;
pub mod line;
pub mod recurrence;
pub mod tax;
pub mod partner;
pub mod catalog;
pub mod events;
pub mod error;

pub use contract::{Contract, ContractBuilder, ContractState, InvoiceAmountType};
pub use line::{ContractLine, LineKind, LineAmounts};
pub use recurrence::{RecurrenceRule, RecurrenceUnit, RecurrenceError};
pub use tax::{TaxRate, TaxSet, TaxLine, TaxComputation, TaxEngine, SaleTaxEngine, FiscalPosition};
pub use partner::{Partner, CompanyProfile, Locale};
pub use catalog::{Product, Pricelist, UnitOfMeasure};
pub use events::ContractEvent;
pub use error::ContractError;
