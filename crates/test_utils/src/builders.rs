//! Scenario builders
//!
//! A billing test needs a contract plus the directory records it
//! references: a company with a journal, a partner, a product, and a
//! pricelist. [`ContractScenario`] builds a consistent set of all of them
//! and can seed an in-memory store in one call.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_contract::{
    CompanyProfile, Contract, ContractBuilder, ContractLine, InvoiceAmountType, LineKind, Partner,
    Pricelist, Product, RecurrenceRule, TaxSet,
};

use crate::fixtures::{CatalogFixtures, DateFixtures, DirectoryFixtures};
use crate::stores::InMemoryContractStore;

/// A contract together with every record it references
#[derive(Debug, Clone)]
pub struct ContractScenario {
    pub contract: Contract,
    pub company: CompanyProfile,
    pub partner: Partner,
    pub product: Product,
    pub pricelist: Pricelist,
}

impl ContractScenario {
    /// Starts a builder with billing-ready defaults
    pub fn builder() -> ContractScenarioBuilder {
        ContractScenarioBuilder::new()
    }

    /// Seeds every record into the store and returns the contract
    pub fn seed(&self, store: &InMemoryContractStore) -> Contract {
        store.insert_company(self.company.clone());
        store.insert_partner(self.partner.clone());
        store.insert_product(self.product.clone());
        store.insert_contract(self.contract.clone());
        self.contract.clone()
    }
}

/// Builder for [`ContractScenario`]
pub struct ContractScenarioBuilder {
    name: String,
    company: CompanyProfile,
    partner: Partner,
    product: Product,
    pricelist: Pricelist,
    rule: RecurrenceRule,
    date_start: NaiveDate,
    date_end: Option<NaiveDate>,
    quantity: Decimal,
    price_unit: Decimal,
    discount: Decimal,
    line_taxes: Option<TaxSet>,
    line_kind: LineKind,
    invoice_amount_type: InvoiceAmountType,
    without_partner: bool,
}

impl ContractScenarioBuilder {
    pub fn new() -> Self {
        Self {
            name: "2024/0001".to_string(),
            company: DirectoryFixtures::company(),
            partner: DirectoryFixtures::partner(),
            product: CatalogFixtures::hosting_product(),
            pricelist: CatalogFixtures::usd_pricelist(),
            rule: RecurrenceRule::monthly(),
            date_start: DateFixtures::jan_15_2024(),
            date_end: None,
            quantity: dec!(1),
            price_unit: dec!(100),
            discount: Decimal::ZERO,
            line_taxes: None,
            line_kind: LineKind::Standard,
            invoice_amount_type: InvoiceAmountType::default(),
            without_partner: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn company(mut self, company: CompanyProfile) -> Self {
        self.company = company;
        self
    }

    pub fn partner(mut self, partner: Partner) -> Self {
        self.partner = partner;
        self
    }

    /// Builds the contract with no customer, for validation tests
    pub fn without_partner(mut self) -> Self {
        self.without_partner = true;
        self
    }

    pub fn product(mut self, product: Product) -> Self {
        self.product = product;
        self
    }

    pub fn pricelist(mut self, pricelist: Pricelist) -> Self {
        self.pricelist = pricelist;
        self
    }

    pub fn rule(mut self, rule: RecurrenceRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.date_start = date;
        self
    }

    pub fn ending(mut self, date: NaiveDate) -> Self {
        self.date_end = Some(date);
        self
    }

    pub fn line(mut self, quantity: Decimal, price_unit: Decimal) -> Self {
        self.quantity = quantity;
        self.price_unit = price_unit;
        self
    }

    pub fn discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    pub fn line_taxes(mut self, taxes: TaxSet) -> Self {
        self.line_taxes = Some(taxes);
        self
    }

    pub fn line_kind(mut self, kind: LineKind) -> Self {
        self.line_kind = kind;
        self
    }

    pub fn invoice_amount_type(mut self, amount_type: InvoiceAmountType) -> Self {
        self.invoice_amount_type = amount_type;
        self
    }

    pub fn build(self) -> ContractScenario {
        let mut line = ContractLine::new(
            &self.product,
            &self.product.name,
            self.quantity,
            self.price_unit,
        )
        .with_discount(self.discount)
        .with_kind(self.line_kind);
        if let Some(taxes) = self.line_taxes {
            line = line.with_taxes(taxes);
        }

        let mut builder = ContractBuilder::new()
            .name(self.name)
            .company(self.company.id)
            .pricelist(&self.pricelist)
            .recurrence(self.rule)
            .starting(self.date_start)
            .invoice_amount_type(self.invoice_amount_type)
            .add_line(line);
        if !self.without_partner {
            builder = builder.partner(self.partner.id);
        }
        if let Some(end) = self.date_end {
            builder = builder.ending(end);
        }

        let contract = builder.build().expect("scenario contract is valid");

        ContractScenario {
            contract,
            company: self.company,
            partner: self.partner,
            product: self.product,
            pricelist: self.pricelist,
        }
    }
}

impl Default for ContractScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}
