//! Invoice materialization
//!
//! The materializer projects a contract into an [`InvoiceDraft`] for its
//! current billing period. It has no side effects: validation failures
//! surface as errors, and the caller decides what to do with the draft.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{DateRange, Money, ProductId};
use domain_contract::{
    CompanyProfile, Contract, ContractLine, FiscalPosition, InvoiceAmountType, Partner, Product,
    RecurrenceError, TaxEngine,
};

use crate::error::BillingError;
use crate::invoice::{InvoiceDraft, InvoiceHeader, InvoiceLine};
use crate::locale::LocaleTable;
use crate::ports::RentalPricing;

/// Projects contracts into invoice drafts
pub struct InvoiceMaterializer {
    tax_engine: Arc<dyn TaxEngine>,
    rental_pricing: Arc<dyn RentalPricing>,
    locales: LocaleTable,
}

impl InvoiceMaterializer {
    pub fn new(tax_engine: Arc<dyn TaxEngine>, rental_pricing: Arc<dyn RentalPricing>) -> Self {
        Self {
            tax_engine,
            rental_pricing,
            locales: LocaleTable::standard(),
        }
    }

    /// Replaces the narration vocabulary
    pub fn with_locales(mut self, locales: LocaleTable) -> Self {
        self.locales = locales;
        self
    }

    /// Builds the header values for the contract's current billing period
    ///
    /// The invoice date is the contract's next billing date; the period
    /// runs to the day before the following billing date, because the
    /// narration speaks in inclusive ranges.
    ///
    /// # Errors
    ///
    /// - `MissingPartner` when the contract has no customer
    /// - `MissingJournal` when the company has no sale journal
    /// - `MissingNextDate` when the contract has no next billing date
    pub fn prepare_header(
        &self,
        contract: &Contract,
        company: &CompanyProfile,
        partner: &Partner,
    ) -> Result<InvoiceHeader, BillingError> {
        let partner_id = contract.partner().ok_or_else(|| BillingError::MissingPartner {
            contract: contract.display_name(),
        })?;
        let journal = company
            .sale_journal
            .ok_or_else(|| BillingError::MissingJournal {
                company: company.name.clone(),
            })?;
        let invoice_date =
            contract
                .next_billing_date()
                .ok_or_else(|| BillingError::MissingNextDate {
                    contract: contract.display_name(),
                })?;

        let following = contract.rule().advance(invoice_date, invoice_date.day())?;
        let period_end = following
            .pred_opt()
            .ok_or(RecurrenceError::DateOverflow(following))?;
        let period = DateRange::new(invoice_date, period_end)?;

        let mut narration = self.locales.period_narration(partner.locale, &period);
        if let Some(terms) = &company.invoice_terms {
            narration.push('\n');
            narration.push_str(terms);
        }

        Ok(InvoiceHeader {
            invoice_date,
            period,
            partner: partner_id,
            contract: contract.id(),
            currency: contract.currency(),
            journal,
            origin: contract.name().to_string(),
            payment_term_days: partner.payment_term_days,
            narration,
            salesperson: contract.salesperson(),
        })
    }

    /// Builds one invoice line from a contract line
    ///
    /// The unit price is taken verbatim, except for rental lines on
    /// period-priced contracts: there the best matching rental pricing
    /// rule overrides it when one exists. Taxes come from the product's
    /// defaults, remapped through the fiscal position.
    pub async fn prepare_line(
        &self,
        contract: &Contract,
        line: &ContractLine,
        product: &Product,
        partner: &Partner,
        fiscal_position: Option<&FiscalPosition>,
    ) -> Result<InvoiceLine, BillingError> {
        let mut price_unit = line.price_unit;

        if line.kind.is_rental() && contract.invoice_amount_type() == InvoiceAmountType::Period {
            if let Some(window) = line.kind.rental_window() {
                let rule_price = self
                    .rental_pricing
                    .best_pricing_rule(line.product, window, contract.pricelist(), contract.company())
                    .await?;
                if let Some(price) = rule_price {
                    price_unit = price;
                }
            }
        }

        let taxes = match fiscal_position {
            Some(position) => position.map_taxes(&product.default_taxes),
            None => product.default_taxes.clone(),
        };

        let effective = price_unit * (Decimal::ONE - line.discount / dec!(100));
        let computed = self.tax_engine.compute_all(
            Money::new(effective, contract.currency()),
            line.quantity,
            &taxes,
            product,
            Some(partner),
        );

        Ok(InvoiceLine {
            product: product.id,
            description: product.name.clone(),
            quantity: line.quantity,
            uom: line.uom.clone(),
            price_unit,
            discount: line.discount,
            taxes,
            subtotal: computed.total_excluded,
            tax: computed.tax_amount,
            total: computed.total_included,
        })
    }

    /// Builds all invoice lines for the contract
    pub async fn prepare_lines(
        &self,
        contract: &Contract,
        products: &HashMap<ProductId, Product>,
        partner: &Partner,
        fiscal_position: Option<&FiscalPosition>,
    ) -> Result<Vec<InvoiceLine>, BillingError> {
        let mut lines = Vec::with_capacity(contract.lines().len());
        for line in contract.lines() {
            let product =
                products
                    .get(&line.product)
                    .ok_or_else(|| BillingError::UnknownProduct {
                        product: line.product.to_string(),
                        contract: contract.display_name(),
                    })?;
            lines.push(
                self.prepare_line(contract, line, product, partner, fiscal_position)
                    .await?,
            );
        }
        Ok(lines)
    }

    /// Builds the complete invoice draft for one billing period
    pub async fn prepare_invoice(
        &self,
        contract: &Contract,
        company: &CompanyProfile,
        partner: &Partner,
        products: &HashMap<ProductId, Product>,
        fiscal_position: Option<&FiscalPosition>,
    ) -> Result<InvoiceDraft, BillingError> {
        let header = self.prepare_header(contract, company, partner)?;
        let lines = self
            .prepare_lines(contract, products, partner, fiscal_position)
            .await?;
        Ok(InvoiceDraft { header, lines })
    }
}
