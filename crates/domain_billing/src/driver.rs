//! The recurring billing driver
//!
//! An external scheduler calls [`BillingDriver::cron_create_invoices`] once
//! per period. The driver selects the contracts due for billing, groups
//! them by company, and bills each contract as an isolated unit of work:
//! the invoice and the advanced next billing date persist together or not
//! at all, and one contract's failure never disturbs its siblings in
//! automatic mode.
//!
//! Interactive runs (a user pressing "Generate invoice") are the opposite:
//! the first failure propagates immediately so the user sees it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info};

use core_kernel::{CompanyId, ContractId, InvoiceId, ProductId};
use domain_contract::{CompanyProfile, Contract, Product};

use crate::error::BillingError;
use crate::materializer::InvoiceMaterializer;
use crate::ports::{ContractStore, InvoiceStore};

/// Outcome of billing a single contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingOutcome {
    /// An invoice was created and the next date advanced
    Invoiced(InvoiceId),
    /// The contract's next billing date has reached its end date; the
    /// whole cycle stops here
    EndReached,
}

/// Drives recurring invoice generation over the contract store
pub struct BillingDriver {
    contracts: Arc<dyn ContractStore>,
    invoices: Arc<dyn InvoiceStore>,
    materializer: InvoiceMaterializer,
}

impl BillingDriver {
    pub fn new(
        contracts: Arc<dyn ContractStore>,
        invoices: Arc<dyn InvoiceStore>,
        materializer: InvoiceMaterializer,
    ) -> Self {
        Self {
            contracts,
            invoices,
            materializer,
        }
    }

    /// The scheduler hook: bills everything due today, in automatic mode
    pub async fn cron_create_invoices(&self) -> Result<Vec<InvoiceId>, BillingError> {
        self.run_billing_cycle(&[], true, Utc::now().date_naive())
            .await
    }

    /// Bills an explicit set of contracts interactively; failures propagate
    pub async fn create_invoices(
        &self,
        contracts: &[ContractId],
        today: NaiveDate,
    ) -> Result<Vec<InvoiceId>, BillingError> {
        self.run_billing_cycle(contracts, false, today).await
    }

    /// Runs one billing cycle
    ///
    /// When `contract_ids` is non-empty it is billed as given; otherwise
    /// every contract whose next billing date is on or before `today` is
    /// selected. Contracts are grouped by company so each group bills
    /// under the right journal and currency context.
    ///
    /// Per contract, in `automatic` mode:
    /// - a contract whose end date has passed is skipped silently;
    /// - a contract whose next billing date has reached its end date stops
    ///   the entire cycle (the invoices created so far are returned);
    /// - any other failure is logged and rolled back for that contract
    ///   only, and the cycle continues.
    ///
    /// In interactive mode the first failure propagates to the caller.
    pub async fn run_billing_cycle(
        &self,
        contract_ids: &[ContractId],
        automatic: bool,
        today: NaiveDate,
    ) -> Result<Vec<InvoiceId>, BillingError> {
        let selected = if contract_ids.is_empty() {
            self.contracts.due_on(today).await?
        } else {
            let mut selected = Vec::with_capacity(contract_ids.len());
            for id in contract_ids {
                selected.push(self.contracts.get(*id).await?);
            }
            selected
        };

        debug!(count = selected.len(), %today, automatic, "starting billing cycle");

        let mut created = Vec::new();
        for (company_id, group) in group_by_company(selected) {
            let company = self.contracts.company(company_id).await?;

            for mut contract in group {
                if automatic && contract.date_end().is_some_and(|end| end <= today) {
                    debug!(contract = %contract.name(), "end date passed, skipping");
                    continue;
                }

                match self.bill_one(&mut contract, &company).await {
                    Ok(BillingOutcome::Invoiced(invoice_id)) => {
                        info!(contract = %contract.name(), invoice = %invoice_id, "recurring invoice created");
                        created.push(invoice_id);
                    }
                    Ok(BillingOutcome::EndReached) => {
                        return Ok(created);
                    }
                    Err(err) if automatic => {
                        error!(
                            contract = %contract.name(),
                            error = %err,
                            "failed to create recurring invoice"
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        Ok(created)
    }

    /// Bills one contract as a unit of work
    ///
    /// The contract is a working copy: nothing persists until the invoice
    /// store accepts the whole unit, so a failure leaves the stored
    /// contract untouched.
    async fn bill_one(
        &self,
        contract: &mut Contract,
        company: &CompanyProfile,
    ) -> Result<BillingOutcome, BillingError> {
        if let (Some(end), Some(next)) = (contract.date_end(), contract.next_billing_date()) {
            if next >= end {
                return Ok(BillingOutcome::EndReached);
            }
        }

        let partner_id = contract
            .partner()
            .ok_or_else(|| BillingError::MissingPartner {
                contract: contract.display_name(),
            })?;
        let partner = self.contracts.partner(partner_id).await?;
        let fiscal_position = self.contracts.fiscal_position(partner_id).await?;
        let products = self.resolve_products(contract).await?;

        let draft = self
            .materializer
            .prepare_invoice(contract, company, &partner, &products, fiscal_position.as_ref())
            .await?;

        let next_date = contract.advance_next_billing_date()?;
        let invoice_id = self
            .invoices
            .persist_billing_unit(&draft, contract.id(), next_date)
            .await?;
        contract.link_invoice(invoice_id);

        Ok(BillingOutcome::Invoiced(invoice_id))
    }

    async fn resolve_products(
        &self,
        contract: &Contract,
    ) -> Result<HashMap<ProductId, Product>, BillingError> {
        let mut products = HashMap::new();
        for line in contract.lines() {
            if !products.contains_key(&line.product) {
                let product = self.contracts.product(line.product).await?;
                products.insert(line.product, product);
            }
        }
        Ok(products)
    }
}

/// Partitions contracts by company, preserving selection order within and
/// between groups
fn group_by_company(contracts: Vec<Contract>) -> Vec<(CompanyId, Vec<Contract>)> {
    let mut groups: Vec<(CompanyId, Vec<Contract>)> = Vec::new();
    for contract in contracts {
        match groups.iter_mut().find(|(id, _)| *id == contract.company()) {
            Some((_, group)) => group.push(contract),
            None => groups.push((contract.company(), vec![contract])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, PricelistId};
    use domain_contract::{ContractBuilder, Pricelist, RecurrenceRule};

    fn contract_for(company: CompanyId, name: &str) -> Contract {
        let pricelist = Pricelist::new(PricelistId::new(), "USD retail", Currency::USD);
        ContractBuilder::new()
            .name(name)
            .company(company)
            .pricelist(&pricelist)
            .recurrence(RecurrenceRule::monthly())
            .build()
            .unwrap()
    }

    #[test]
    fn test_group_by_company_preserves_order() {
        let a = CompanyId::new();
        let b = CompanyId::new();
        let contracts = vec![
            contract_for(a, "A/1"),
            contract_for(b, "B/1"),
            contract_for(a, "A/2"),
        ];

        let groups = group_by_company(contracts);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, a);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, b);
        assert_eq!(groups[1].1[0].name(), "B/1");
    }
}
