//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the billing
//! system. These fixtures are designed to be consistent and predictable
//! for unit tests.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{CompanyId, Currency, JournalId, Money, PartnerId, PricelistId, ProductId, TimeWindow};
use domain_contract::{
    CompanyProfile, Locale, Partner, Pricelist, Product, TaxRate, UnitOfMeasure,
};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard USD amount
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// A typical monthly plan price
    pub fn usd_plan_price() -> Money {
        Money::new(dec!(49.99), Currency::USD)
    }

    /// A UZS amount for localization tests
    pub fn uzs_million() -> Money {
        Money::new(dec!(1000000.00), Currency::UZS)
    }

    /// A zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }
}

/// Fixture for calendar test data
pub struct DateFixtures;

impl DateFixtures {
    /// A month-end anchor in a leap year
    pub fn jan_31_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    /// A mid-month billing date
    pub fn jan_15_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    /// The standard "today" used by driver tests
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// A rental pickup/return window in early June 2024
    pub fn rental_window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
        )
        .unwrap()
    }
}

/// Fixture for directory records (companies, partners)
pub struct DirectoryFixtures;

impl DirectoryFixtures {
    /// A company with a sale journal configured
    pub fn company() -> CompanyProfile {
        CompanyProfile::new(CompanyId::new(), "Main Company", Currency::USD)
            .with_sale_journal(JournalId::new())
    }

    /// A company without a sale journal, for validation tests
    pub fn company_without_journal() -> CompanyProfile {
        CompanyProfile::new(CompanyId::new(), "Unconfigured Company", Currency::USD)
    }

    /// An English-speaking customer with a 15-day payment term
    pub fn partner() -> Partner {
        Partner::new(PartnerId::new(), "Acme LLC")
            .with_locale(Locale::En)
            .with_payment_term_days(15)
    }

    /// A Russian-speaking customer for narration tests
    pub fn russian_partner() -> Partner {
        Partner::new(PartnerId::new(), "ООО Ромашка").with_locale(Locale::Ru)
    }
}

/// Fixture for catalog records (products, pricelists)
pub struct CatalogFixtures;

impl CatalogFixtures {
    /// A service product taxed with 12% VAT on top
    pub fn hosting_product() -> Product {
        Product::new(ProductId::new(), "Hosting plan", UnitOfMeasure::unit())
            .with_default_taxes(vec![TaxRate::excluded("VAT 12%", dec!(12))])
    }

    /// A rental product billed per day
    pub fn rental_product() -> Product {
        Product::new(ProductId::new(), "Excavator rental", UnitOfMeasure::day())
            .with_default_taxes(vec![TaxRate::excluded("VAT 12%", dec!(12))])
    }

    /// An untaxed product
    pub fn untaxed_product() -> Product {
        Product::new(ProductId::new(), "Deposit", UnitOfMeasure::unit())
    }

    /// The default USD pricelist
    pub fn usd_pricelist() -> Pricelist {
        Pricelist::new(PricelistId::new(), "USD retail", Currency::USD)
    }

    /// A UZS pricelist for localization tests
    pub fn uzs_pricelist() -> Pricelist {
        Pricelist::new(PricelistId::new(), "UZS retail", Currency::UZS)
    }
}
