//! End-to-end tests for the recurring billing driver
//!
//! These run the full cycle against in-memory adapters: selection,
//! company grouping, materialization, the atomic billing unit, and the
//! per-contract failure isolation of automatic mode.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use domain_billing::{BillingDriver, BillingError, InvoiceMaterializer, NoRentalPricing};
use domain_contract::{InvoiceAmountType, LineKind, RecurrenceRule, SaleTaxEngine};
use test_utils::{
    assert_draft_consistent, assert_money_eq, CatalogFixtures, ContractScenario, DateFixtures,
    DirectoryFixtures, InMemoryContractStore, InMemoryInvoiceStore, InMemoryRentalPricing,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn driver(
    contracts: Arc<InMemoryContractStore>,
    invoices: Arc<InMemoryInvoiceStore>,
) -> BillingDriver {
    BillingDriver::new(
        contracts,
        invoices,
        InvoiceMaterializer::new(Arc::new(SaleTaxEngine), Arc::new(NoRentalPricing)),
    )
}

#[tokio::test]
async fn automatic_cycle_bills_every_due_contract() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());

    let first = ContractScenario::builder()
        .name("2024/0001")
        .line(dec!(2), dec!(50))
        .build();
    let second = ContractScenario::builder()
        .name("2024/0002")
        .line(dec!(1), dec!(100))
        .build();
    first.seed(&store);
    second.seed(&store);

    let created = driver(store.clone(), invoices.clone())
        .run_billing_cycle(&[], true, DateFixtures::today())
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(invoices.invoice_count(), 2);
    for persisted in invoices.invoices() {
        assert_draft_consistent(&persisted.draft);
        assert_eq!(persisted.draft.header.invoice_date, DateFixtures::jan_15_2024());
        assert_eq!(persisted.draft.header.period.end, date(2024, 2, 14));
        // Both contracts bill 100 net at 12% VAT.
        assert_money_eq(persisted.draft.untaxed_total(), dec!(100));
        assert_money_eq(persisted.draft.total(), dec!(112));
    }

    // Both contracts advanced one period and link their invoice.
    for scenario in [&first, &second] {
        let stored = store.stored_contract(scenario.contract.id()).unwrap();
        assert_eq!(stored.next_billing_date(), Some(date(2024, 2, 15)));
        assert_eq!(stored.invoice_count(), 1);
    }
}

#[tokio::test]
async fn contracts_not_yet_due_are_not_selected() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());

    let future = ContractScenario::builder()
        .name("2024/0003")
        .starting(date(2024, 7, 1))
        .build();
    future.seed(&store);

    let created = driver(store.clone(), invoices.clone())
        .run_billing_cycle(&[], true, DateFixtures::today())
        .await
        .unwrap();

    assert!(created.is_empty());
    assert_eq!(invoices.invoice_count(), 0);
}

#[tokio::test]
async fn one_failing_contract_does_not_abort_its_siblings() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());
    let company = DirectoryFixtures::company();

    let scenarios: Vec<ContractScenario> = (1..=3)
        .map(|i| {
            ContractScenario::builder()
                .name(format!("2024/01{:02}", i))
                .company(company.clone())
                .build()
        })
        .collect();
    for scenario in &scenarios {
        scenario.seed(&store);
    }
    let failing = scenarios[1].contract.id();
    invoices.fail_contract(failing);

    let created = driver(store.clone(), invoices.clone())
        .run_billing_cycle(&[], true, DateFixtures::today())
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(invoices.invoice_count(), 2);

    // The failed contract is untouched: no invoice, date not advanced.
    let stored = store.stored_contract(failing).unwrap();
    assert_eq!(stored.next_billing_date(), Some(DateFixtures::jan_15_2024()));
    assert_eq!(stored.invoice_count(), 0);

    for scenario in [&scenarios[0], &scenarios[2]] {
        let stored = store.stored_contract(scenario.contract.id()).unwrap();
        assert_eq!(stored.invoice_count(), 1);
    }
}

#[tokio::test]
async fn passed_end_date_skips_contract_in_automatic_mode() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());

    let expired = ContractScenario::builder()
        .name("2024/0200")
        .ending(date(2024, 5, 1))
        .build();
    let active = ContractScenario::builder().name("2024/0201").build();
    expired.seed(&store);
    active.seed(&store);

    let created = driver(store.clone(), invoices.clone())
        .run_billing_cycle(&[], true, DateFixtures::today())
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let stored = store.stored_contract(expired.contract.id()).unwrap();
    assert_eq!(stored.invoice_count(), 0);
    assert_eq!(stored.next_billing_date(), Some(DateFixtures::jan_15_2024()));
}

#[tokio::test]
async fn next_date_reaching_end_date_halts_the_whole_cycle() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());
    let company = DirectoryFixtures::company();

    // Next billing date already at/past the end date, end date still ahead
    // of today.
    let closing = ContractScenario::builder()
        .name("2024/0300")
        .company(company.clone())
        .starting(date(2024, 6, 25))
        .ending(date(2024, 6, 20))
        .build();
    let sibling = ContractScenario::builder()
        .name("2024/0301")
        .company(company.clone())
        .build();
    closing.seed(&store);
    sibling.seed(&store);

    let created = driver(store.clone(), invoices.clone())
        .run_billing_cycle(
            &[closing.contract.id(), sibling.contract.id()],
            true,
            DateFixtures::today(),
        )
        .await
        .unwrap();

    // The cycle stops at the closing contract; the sibling is never billed.
    assert!(created.is_empty());
    assert_eq!(invoices.invoice_count(), 0);
    let stored = store.stored_contract(sibling.contract.id()).unwrap();
    assert_eq!(stored.invoice_count(), 0);
}

#[tokio::test]
async fn interactive_mode_propagates_the_first_failure() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());

    let no_customer = ContractScenario::builder()
        .name("2024/0400")
        .without_partner()
        .build();
    no_customer.seed(&store);

    let result = driver(store.clone(), invoices.clone())
        .create_invoices(&[no_customer.contract.id()], DateFixtures::today())
        .await;

    assert!(matches!(result, Err(BillingError::MissingPartner { .. })));
    assert_eq!(invoices.invoice_count(), 0);
}

#[tokio::test]
async fn automatic_mode_logs_and_continues_past_missing_journal() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());

    let unconfigured = ContractScenario::builder()
        .name("2024/0500")
        .company(DirectoryFixtures::company_without_journal())
        .build();
    let healthy = ContractScenario::builder().name("2024/0501").build();
    unconfigured.seed(&store);
    healthy.seed(&store);

    let created = driver(store.clone(), invoices.clone())
        .run_billing_cycle(&[], true, DateFixtures::today())
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let stored = store.stored_contract(unconfigured.contract.id()).unwrap();
    assert_eq!(stored.invoice_count(), 0);
}

#[tokio::test]
async fn rental_lines_bill_at_the_period_pricing_rule() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());
    let pricing = InMemoryRentalPricing::new();

    let product = CatalogFixtures::rental_product();
    pricing.set_price(product.id, dec!(350));

    let rental = ContractScenario::builder()
        .name("2024/0600")
        .product(product)
        .line(dec!(1), dec!(500))
        .line_kind(LineKind::Rental {
            window: Some(DateFixtures::rental_window()),
        })
        .invoice_amount_type(InvoiceAmountType::Period)
        .build();
    rental.seed(&store);

    let driver = BillingDriver::new(
        store.clone(),
        invoices.clone(),
        InvoiceMaterializer::new(Arc::new(SaleTaxEngine), pricing),
    );
    let created = driver
        .run_billing_cycle(&[], true, DateFixtures::today())
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let persisted = &invoices.invoices()[0];
    assert_eq!(persisted.draft.lines[0].price_unit, dec!(350));
}

#[tokio::test]
async fn narration_follows_the_partner_locale() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());

    let localized = ContractScenario::builder()
        .name("2024/0700")
        .partner(DirectoryFixtures::russian_partner())
        .build();
    localized.seed(&store);

    driver(store.clone(), invoices.clone())
        .run_billing_cycle(&[], true, DateFixtures::today())
        .await
        .unwrap();

    let persisted = &invoices.invoices()[0];
    assert!(persisted.draft.header.narration.contains("период"));
}

#[tokio::test]
async fn month_end_billing_day_survives_the_write_back() {
    let store = InMemoryContractStore::new();
    let invoices = InMemoryInvoiceStore::new(store.clone());

    let month_end = ContractScenario::builder()
        .name("2024/0800")
        .starting(DateFixtures::jan_31_2024())
        .rule(RecurrenceRule::monthly())
        .build();
    month_end.seed(&store);

    driver(store.clone(), invoices.clone())
        .run_billing_cycle(&[], true, DateFixtures::today())
        .await
        .unwrap();

    let stored = store.stored_contract(month_end.contract.id()).unwrap();
    assert_eq!(stored.next_billing_date(), Some(date(2024, 2, 29)));
    // The driver's advancement keeps the originally intended billing day.
    assert_eq!(stored.billing_day(), 31);
}
