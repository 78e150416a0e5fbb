//! Order Domain - Sale Orders Feeding Contracts
//!
//! Sale orders are owned by the host sales module; this crate models the
//! slice billing cares about: on confirmation, an order linked to a
//! contract replaces that contract's lines with a fresh projection of its
//! own, and subcontract records track individual orders under a contract
//! with a contract-scoped sequence.

pub mod order;
pub mod subcontract;
pub mod sync;
pub mod error;

pub use order::{OrderLine, OrderState, SalesOrder};
pub use subcontract::{Subcontract, SubcontractType};
pub use sync::{contract_line_from_order_line, sync_confirmed_order, SyncOutcome};
pub use error::OrderError;
