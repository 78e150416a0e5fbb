//! In-memory port adapters
//!
//! Driver tests run against these instead of a real persistence layer.
//! [`InMemoryInvoiceStore`] honors the unit-of-work contract: the invoice,
//! the advanced next date, and the back-link apply together under one
//! lock, and an injected failure leaves the stored contract untouched.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{
    CompanyId, ContractId, DomainPort, InvoiceId, PartnerId, PortError, PricelistId, ProductId,
    TimeWindow,
};
use domain_billing::{ContractStore, InvoiceDraft, InvoiceStore, RentalPricing};
use domain_contract::{CompanyProfile, Contract, FiscalPosition, Partner, Product};

/// An invoice as recorded by the in-memory accounting collaborator
#[derive(Debug, Clone)]
pub struct PersistedInvoice {
    pub id: InvoiceId,
    pub draft: InvoiceDraft,
}

/// In-memory contract and directory storage
#[derive(Default)]
pub struct InMemoryContractStore {
    contracts: Mutex<Vec<Contract>>,
    companies: Mutex<Vec<CompanyProfile>>,
    partners: Mutex<Vec<Partner>>,
    products: Mutex<Vec<Product>>,
    fiscal_positions: Mutex<Vec<(PartnerId, FiscalPosition)>>,
}

impl InMemoryContractStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_contract(&self, contract: Contract) {
        self.contracts.lock().unwrap().push(contract);
    }

    pub fn insert_company(&self, company: CompanyProfile) {
        self.companies.lock().unwrap().push(company);
    }

    pub fn insert_partner(&self, partner: Partner) {
        self.partners.lock().unwrap().push(partner);
    }

    pub fn insert_product(&self, product: Product) {
        self.products.lock().unwrap().push(product);
    }

    pub fn set_fiscal_position(&self, partner: PartnerId, position: FiscalPosition) {
        self.fiscal_positions.lock().unwrap().push((partner, position));
    }

    /// A snapshot of the stored contract, for assertions
    pub fn stored_contract(&self, id: ContractId) -> Option<Contract> {
        self.contracts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id() == id)
            .cloned()
    }

    /// Applies one billing unit to the stored contract
    ///
    /// Called by the invoice store under its own lock so the date
    /// write-back and the invoice link land together.
    fn apply_billing_unit(
        &self,
        contract_id: ContractId,
        invoice_id: InvoiceId,
        next_billing_date: NaiveDate,
    ) -> Result<(), PortError> {
        let mut contracts = self.contracts.lock().unwrap();
        let contract = contracts
            .iter_mut()
            .find(|c| c.id() == contract_id)
            .ok_or_else(|| PortError::not_found("Contract", contract_id))?;
        contract.set_next_billing_date(next_billing_date, true);
        contract.link_invoice(invoice_id);
        Ok(())
    }
}

impl DomainPort for InMemoryContractStore {}

#[async_trait]
impl ContractStore for InMemoryContractStore {
    async fn due_on(&self, date: NaiveDate) -> Result<Vec<Contract>, PortError> {
        Ok(self
            .contracts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.next_billing_date().is_some_and(|next| next <= date))
            .cloned()
            .collect())
    }

    async fn get(&self, id: ContractId) -> Result<Contract, PortError> {
        self.stored_contract(id)
            .ok_or_else(|| PortError::not_found("Contract", id))
    }

    async fn save(&self, contract: &Contract) -> Result<(), PortError> {
        let mut contracts = self.contracts.lock().unwrap();
        match contracts.iter_mut().find(|c| c.id() == contract.id()) {
            Some(stored) => *stored = contract.clone(),
            None => contracts.push(contract.clone()),
        }
        Ok(())
    }

    async fn company(&self, id: CompanyId) -> Result<CompanyProfile, PortError> {
        self.companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Company", id))
    }

    async fn partner(&self, id: PartnerId) -> Result<Partner, PortError> {
        self.partners
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Partner", id))
    }

    async fn product(&self, id: ProductId) -> Result<Product, PortError> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Product", id))
    }

    async fn fiscal_position(
        &self,
        partner: PartnerId,
    ) -> Result<Option<FiscalPosition>, PortError> {
        Ok(self
            .fiscal_positions
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| *id == partner)
            .map(|(_, position)| position.clone()))
    }
}

/// In-memory accounting collaborator
pub struct InMemoryInvoiceStore {
    contracts: Arc<InMemoryContractStore>,
    invoices: Mutex<Vec<PersistedInvoice>>,
    failing_contracts: Mutex<HashSet<ContractId>>,
}

impl InMemoryInvoiceStore {
    pub fn new(contracts: Arc<InMemoryContractStore>) -> Arc<Self> {
        Arc::new(Self {
            contracts,
            invoices: Mutex::new(Vec::new()),
            failing_contracts: Mutex::new(HashSet::new()),
        })
    }

    /// Makes every billing unit for this contract fail, for isolation tests
    pub fn fail_contract(&self, contract: ContractId) {
        self.failing_contracts.lock().unwrap().insert(contract);
    }

    /// All invoices recorded so far
    pub fn invoices(&self) -> Vec<PersistedInvoice> {
        self.invoices.lock().unwrap().clone()
    }

    pub fn invoice_count(&self) -> usize {
        self.invoices.lock().unwrap().len()
    }
}

impl DomainPort for InMemoryInvoiceStore {}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn persist_billing_unit(
        &self,
        draft: &InvoiceDraft,
        contract_id: ContractId,
        next_billing_date: NaiveDate,
    ) -> Result<InvoiceId, PortError> {
        if self.failing_contracts.lock().unwrap().contains(&contract_id) {
            return Err(PortError::internal("injected billing failure"));
        }

        // Hold the invoice lock across the contract write-back so the unit
        // lands atomically.
        let mut invoices = self.invoices.lock().unwrap();
        let invoice_id = InvoiceId::new_v7();
        self.contracts
            .apply_billing_unit(contract_id, invoice_id, next_billing_date)?;
        invoices.push(PersistedInvoice {
            id: invoice_id,
            draft: draft.clone(),
        });
        Ok(invoice_id)
    }
}

/// Rental pricing adapter with a fixed rule table
#[derive(Default)]
pub struct InMemoryRentalPricing {
    rules: Mutex<Vec<(ProductId, Decimal)>>,
}

impl InMemoryRentalPricing {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a flat per-unit price for the product
    pub fn set_price(&self, product: ProductId, price: Decimal) {
        self.rules.lock().unwrap().push((product, price));
    }
}

impl DomainPort for InMemoryRentalPricing {}

#[async_trait]
impl RentalPricing for InMemoryRentalPricing {
    async fn best_pricing_rule(
        &self,
        product: ProductId,
        _window: &TimeWindow,
        _pricelist: PricelistId,
        _company: CompanyId,
    ) -> Result<Option<Decimal>, PortError> {
        Ok(self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| *id == product)
            .map(|(_, price)| *price))
    }
}
