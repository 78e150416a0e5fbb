//! Billing domain ports
//!
//! The driver and materializer consume three collaborators through these
//! traits: the contract store (persistence of contracts and the directory
//! records they reference), the invoice store (the accounting system that
//! owns invoice records), and the rental pricing service.
//!
//! # Unit of work
//!
//! [`InvoiceStore::persist_billing_unit`] is the atomic boundary of one
//! contract's billing: the adapter must persist the invoice, the advanced
//! next billing date, and the invoice back-link together, or none of them.
//! The driver relies on that to isolate failures between contracts.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{
    CompanyId, ContractId, DomainPort, InvoiceId, PartnerId, PortError, PricelistId, ProductId,
    TimeWindow,
};
use domain_contract::{CompanyProfile, Contract, FiscalPosition, Partner, Product};

use crate::invoice::InvoiceDraft;

/// Persistence of contracts and the directory records they reference
#[async_trait]
pub trait ContractStore: DomainPort {
    /// All contracts whose next billing date is on or before `date`
    async fn due_on(&self, date: NaiveDate) -> Result<Vec<Contract>, PortError>;

    /// Fetches one contract by id
    async fn get(&self, id: ContractId) -> Result<Contract, PortError>;

    /// Persists a contract
    async fn save(&self, contract: &Contract) -> Result<(), PortError>;

    /// Billing profile of a company
    async fn company(&self, id: CompanyId) -> Result<CompanyProfile, PortError>;

    /// A customer record
    async fn partner(&self, id: PartnerId) -> Result<Partner, PortError>;

    /// A product record
    async fn product(&self, id: ProductId) -> Result<Product, PortError>;

    /// The tax regime applicable to a customer, when one is configured
    async fn fiscal_position(&self, partner: PartnerId)
        -> Result<Option<FiscalPosition>, PortError>;
}

/// The accounting collaborator that owns invoice records
#[async_trait]
pub trait InvoiceStore: DomainPort {
    /// Persists one contract's billing unit atomically
    ///
    /// Creates the invoice from the draft, writes `next_billing_date` back
    /// to the contract (preserving its stored billing day), and links the
    /// new invoice to the contract. Either all of it persists or none.
    async fn persist_billing_unit(
        &self,
        draft: &InvoiceDraft,
        contract_id: ContractId,
        next_billing_date: NaiveDate,
    ) -> Result<InvoiceId, PortError>;
}

/// Rental pricing rules keyed on the pickup/return window
#[async_trait]
pub trait RentalPricing: DomainPort {
    /// The unit price of the best matching pricing rule, when one exists
    async fn best_pricing_rule(
        &self,
        product: ProductId,
        window: &TimeWindow,
        pricelist: PricelistId,
        company: CompanyId,
    ) -> Result<Option<Decimal>, PortError>;
}

/// A rental pricing adapter for deployments without a rental module:
/// never overrides a price.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRentalPricing;

impl DomainPort for NoRentalPricing {}

#[async_trait]
impl RentalPricing for NoRentalPricing {
    async fn best_pricing_rule(
        &self,
        _product: ProductId,
        _window: &TimeWindow,
        _pricelist: PricelistId,
        _company: CompanyId,
    ) -> Result<Option<Decimal>, PortError> {
        Ok(None)
    }
}
