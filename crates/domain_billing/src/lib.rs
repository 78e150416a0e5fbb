//! Billing Domain - Recurring Invoice Generation
//!
//! This crate turns confirmed contracts into invoices on schedule:
//!
//! - the [`materializer::InvoiceMaterializer`] projects a contract into an
//!   invoice draft (header and lines) for one billing period;
//! - the [`driver::BillingDriver`] selects contracts due for billing,
//!   groups them by company, and processes each contract as an isolated
//!   unit of work;
//! - [`locale`] renders the customer-facing narration with an injected
//!   currency vocabulary instead of process-wide state.
//!
//! Persistence stays behind the [`ports`] traits: the driver never touches
//! a database, it hands drafts to an [`ports::InvoiceStore`] whose adapter
//! owns the commit/rollback boundary of each contract's unit.

pub mod invoice;
pub mod materializer;
pub mod locale;
pub mod driver;
pub mod ports;
pub mod error;

pub use invoice::{InvoiceDraft, InvoiceHeader, InvoiceLine};
pub use materializer::InvoiceMaterializer;
pub use locale::{CurrencyForms, LocaleTable};
pub use driver::{BillingDriver, BillingOutcome};
pub use ports::{ContractStore, InvoiceStore, NoRentalPricing, RentalPricing};
pub use error::BillingError;
