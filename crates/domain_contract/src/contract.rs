//! Contract Aggregate Root
//!
//! The Contract aggregate is the consistency boundary for a recurring
//! customer agreement. It owns the contract lines, the recurrence rule,
//! and the next-billing-date pointer, and guards its lifecycle state
//! machine.
//!
//! # Invariants
//!
//! - Lifecycle actions only move along the allowed transitions
//! - The billing day is preserved when the billing driver advances the
//!   next date, and reset when a user edits the date directly
//! - Contract totals always equal the sum of the line totals

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{
    CompanyId, ContractId, Currency, InvoiceId, Money, OrderId, PartnerId, PricelistId,
    SubcontractId, UserId,
};

use crate::error::ContractError;
use crate::events::ContractEvent;
use crate::line::ContractLine;
use crate::recurrence::RecurrenceRule;

/// Contract lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContractState {
    #[default]
    Draft,
    Confirmed,
    Done,
    Cancelled,
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ContractState::Draft => "draft",
            ContractState::Confirmed => "confirmed",
            ContractState::Done => "done",
            ContractState::Cancelled => "cancelled",
        };
        write!(f, "{}", token)
    }
}

/// How rental lines are priced on generated invoices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceAmountType {
    /// Price the rental period via the best matching pricing rule
    #[default]
    Period,
    /// Invoice the full line amount as written on the contract
    Full,
}

/// A recurring customer agreement
///
/// # State Machine
///
/// Valid transitions:
/// - Draft -> Confirmed (via `action_confirm`)
/// - Confirmed -> Done (via `action_done`)
/// - Draft/Confirmed -> Cancelled (via `action_cancel`)
/// - Cancelled/Confirmed -> Draft (via `action_draft`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    /// Unique contract identifier
    id: ContractId,
    /// Human-readable contract number
    name: String,
    /// Current lifecycle state
    state: ContractState,
    /// When the contract was confirmed
    date_confirmed: Option<DateTime<Utc>>,
    /// Company the contract is billed under
    company: CompanyId,
    /// Customer being billed; required before any invoice can be generated
    partner: Option<PartnerId>,
    /// Start of the agreement
    date_start: NaiveDate,
    /// End of the agreement; open-ended when None
    date_end: Option<NaiveDate>,
    /// Whether confirmed sale orders replace the contract lines
    update_lines_from_orders: bool,
    /// Whether the contract bills on a schedule
    is_recurring: bool,
    /// Billing frequency
    rule: RecurrenceRule,
    /// Date the next invoice will be generated on
    next_billing_date: Option<NaiveDate>,
    /// Day of month the contract was originally set to bill on
    billing_day: u32,
    /// How rental lines are priced on invoices
    invoice_amount_type: InvoiceAmountType,
    /// Pricelist the contract prices come from
    pricelist: PricelistId,
    /// Currency derived from the pricelist
    currency: Currency,
    /// Salesperson responsible for the contract
    salesperson: Option<UserId>,
    /// Free-text description
    description: Option<String>,
    /// Owned billable lines
    lines: Vec<ContractLine>,
    /// Generated invoices, by reference
    invoices: Vec<InvoiceId>,
    /// Linked sale orders, by reference
    orders: Vec<OrderId>,
    /// Linked subcontracts, by reference
    subcontracts: Vec<SubcontractId>,
    /// Domain events to be published
    #[serde(skip)]
    events: Vec<ContractEvent>,
    /// Version for optimistic concurrency
    version: u32,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Contract {
    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display form used in lists and error messages
    pub fn display_name(&self) -> String {
        format!("№{} of {}", self.name, self.date_start)
    }

    pub fn state(&self) -> ContractState {
        self.state
    }

    pub fn date_confirmed(&self) -> Option<DateTime<Utc>> {
        self.date_confirmed
    }

    pub fn company(&self) -> CompanyId {
        self.company
    }

    pub fn partner(&self) -> Option<PartnerId> {
        self.partner
    }

    pub fn date_start(&self) -> NaiveDate {
        self.date_start
    }

    pub fn date_end(&self) -> Option<NaiveDate> {
        self.date_end
    }

    pub fn set_date_end(&mut self, date_end: Option<NaiveDate>) {
        self.date_end = date_end;
        self.touch();
    }

    pub fn updates_lines_from_orders(&self) -> bool {
        self.update_lines_from_orders
    }

    pub fn is_recurring(&self) -> bool {
        self.is_recurring
    }

    pub fn rule(&self) -> RecurrenceRule {
        self.rule
    }

    pub fn next_billing_date(&self) -> Option<NaiveDate> {
        self.next_billing_date
    }

    pub fn billing_day(&self) -> u32 {
        self.billing_day
    }

    pub fn invoice_amount_type(&self) -> InvoiceAmountType {
        self.invoice_amount_type
    }

    pub fn pricelist(&self) -> PricelistId {
        self.pricelist
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn salesperson(&self) -> Option<UserId> {
        self.salesperson
    }

    pub fn lines(&self) -> &[ContractLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [ContractLine] {
        &mut self.lines
    }

    pub fn invoices(&self) -> &[InvoiceId] {
        &self.invoices
    }

    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    pub fn subcontracts(&self) -> &[SubcontractId] {
        &self.subcontracts
    }

    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sum of all line totals, taxes included
    ///
    /// Lines whose derived figures are stale contribute nothing; callers
    /// recompute line amounts before reading contract totals.
    pub fn contract_total(&self) -> Money {
        self.lines
            .iter()
            .filter_map(|line| line.amounts())
            .fold(Money::zero(self.currency), |acc, amounts| acc + amounts.total)
    }

    /// Sum of all line tax amounts
    pub fn contract_tax_total(&self) -> Money {
        self.lines
            .iter()
            .filter_map(|line| line.amounts())
            .fold(Money::zero(self.currency), |acc, amounts| acc + amounts.tax)
    }

    /// Confirms the contract and stamps the confirmation time
    ///
    /// # Errors
    ///
    /// Fails when the contract is done or cancelled.
    pub fn action_confirm(&mut self) -> Result<(), ContractError> {
        match self.state {
            ContractState::Done | ContractState::Cancelled => {
                Err(ContractError::forbidden_transition("confirm", &["done", "cancelled"]))
            }
            _ => {
                let now = Utc::now();
                self.state = ContractState::Confirmed;
                self.date_confirmed = Some(now);
                self.touch();
                self.events.push(ContractEvent::Confirmed {
                    contract_id: self.id,
                    timestamp: now,
                });
                Ok(())
            }
        }
    }

    /// Marks the contract done
    ///
    /// # Errors
    ///
    /// Fails when the contract is draft or cancelled.
    pub fn action_done(&mut self) -> Result<(), ContractError> {
        match self.state {
            ContractState::Draft | ContractState::Cancelled => {
                Err(ContractError::forbidden_transition("done", &["draft", "cancelled"]))
            }
            _ => {
                self.state = ContractState::Done;
                self.touch();
                self.events.push(ContractEvent::MarkedDone {
                    contract_id: self.id,
                    timestamp: Utc::now(),
                });
                Ok(())
            }
        }
    }

    /// Cancels the contract; allowed from any state
    pub fn action_cancel(&mut self) {
        self.state = ContractState::Cancelled;
        self.touch();
        self.events.push(ContractEvent::Cancelled {
            contract_id: self.id,
            timestamp: Utc::now(),
        });
    }

    /// Returns the contract to draft
    ///
    /// Applies only from the cancelled and confirmed states; anywhere else
    /// it is a no-op. Returns whether the transition was applied.
    pub fn action_draft(&mut self) -> bool {
        match self.state {
            ContractState::Cancelled | ContractState::Confirmed => {
                self.state = ContractState::Draft;
                self.date_confirmed = None;
                self.touch();
                self.events.push(ContractEvent::ReturnedToDraft {
                    contract_id: self.id,
                    timestamp: Utc::now(),
                });
                true
            }
            _ => false,
        }
    }

    /// Appends a line
    pub fn add_line(&mut self, line: ContractLine) {
        self.lines.push(line);
        self.touch();
    }

    /// Replaces the whole line collection (order synchronization)
    pub fn replace_lines(&mut self, lines: Vec<ContractLine>) {
        self.lines = lines;
        self.touch();
    }

    /// Records a generated invoice by reference
    pub fn link_invoice(&mut self, invoice_id: InvoiceId) {
        self.invoices.push(invoice_id);
        self.touch();
        self.events.push(ContractEvent::InvoiceGenerated {
            contract_id: self.id,
            invoice_id,
            timestamp: Utc::now(),
        });
    }

    /// Records a linked sale order by reference
    pub fn link_order(&mut self, order_id: OrderId) {
        if !self.orders.contains(&order_id) {
            self.orders.push(order_id);
            self.touch();
        }
    }

    /// Records a linked subcontract by reference
    pub fn link_subcontract(&mut self, subcontract_id: SubcontractId) {
        self.subcontracts.push(subcontract_id);
        self.touch();
    }

    /// Writes the next billing date
    ///
    /// A direct edit resets the stored billing day to the new date's day of
    /// month; the billing driver passes `preserve_billing_day = true` so
    /// that its advancement does not disturb the day the customer signed up
    /// with.
    pub fn set_next_billing_date(&mut self, date: NaiveDate, preserve_billing_day: bool) {
        let from = self.next_billing_date;
        if !preserve_billing_day {
            self.billing_day = date.day();
        }
        self.next_billing_date = Some(date);
        self.touch();
        self.events.push(ContractEvent::NextDateAdvanced {
            contract_id: self.id,
            from,
            to: date,
            timestamp: Utc::now(),
        });
    }

    /// Advances the next billing date by one recurrence period
    ///
    /// The current next date is the anchor, and its own day of month is the
    /// preferred billing day for the advancement. The stored billing day is
    /// preserved.
    ///
    /// # Errors
    ///
    /// Fails when no next billing date is set, or the rule rejects the
    /// advancement.
    pub fn advance_next_billing_date(&mut self) -> Result<NaiveDate, ContractError> {
        let anchor = self
            .next_billing_date
            .ok_or_else(|| ContractError::MissingRequiredField("next_billing_date".to_string()))?;
        let next = self.rule.advance(anchor, anchor.day())?;
        self.set_next_billing_date(next, true);
        Ok(next)
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

/// Builder for creating new contracts
///
/// # Example
///
/// ```rust,ignore
/// let contract = ContractBuilder::new()
///     .name("2024/0042")
///     .company(company_id)
///     .partner(partner_id)
///     .pricelist(&pricelist)
///     .recurrence(RecurrenceRule::monthly())
///     .starting(date)
///     .build()?;
/// ```
pub struct ContractBuilder {
    name: Option<String>,
    company: Option<CompanyId>,
    partner: Option<PartnerId>,
    pricelist: Option<(PricelistId, Currency)>,
    rule: RecurrenceRule,
    is_recurring: bool,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
    next_billing_date: Option<NaiveDate>,
    update_lines_from_orders: bool,
    invoice_amount_type: InvoiceAmountType,
    salesperson: Option<UserId>,
    description: Option<String>,
    lines: Vec<ContractLine>,
}

impl ContractBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            company: None,
            partner: None,
            pricelist: None,
            rule: RecurrenceRule::monthly(),
            is_recurring: false,
            date_start: None,
            date_end: None,
            next_billing_date: None,
            update_lines_from_orders: true,
            invoice_amount_type: InvoiceAmountType::default(),
            salesperson: None,
            description: None,
            lines: Vec::new(),
        }
    }

    /// Sets the contract number
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn company(mut self, company: CompanyId) -> Self {
        self.company = Some(company);
        self
    }

    pub fn partner(mut self, partner: PartnerId) -> Self {
        self.partner = Some(partner);
        self
    }

    /// Sets the pricelist; the contract currency derives from it
    pub fn pricelist(mut self, pricelist: &crate::catalog::Pricelist) -> Self {
        self.pricelist = Some((pricelist.id, pricelist.currency));
        self
    }

    /// Enables recurring billing with the given rule
    pub fn recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.rule = rule;
        self.is_recurring = true;
        self
    }

    pub fn starting(mut self, date_start: NaiveDate) -> Self {
        self.date_start = Some(date_start);
        self
    }

    pub fn ending(mut self, date_end: NaiveDate) -> Self {
        self.date_end = Some(date_end);
        self
    }

    /// Overrides the first billing date (defaults to the start date)
    pub fn first_billing_date(mut self, date: NaiveDate) -> Self {
        self.next_billing_date = Some(date);
        self
    }

    pub fn update_lines_from_orders(mut self, enabled: bool) -> Self {
        self.update_lines_from_orders = enabled;
        self
    }

    pub fn invoice_amount_type(mut self, amount_type: InvoiceAmountType) -> Self {
        self.invoice_amount_type = amount_type;
        self
    }

    pub fn salesperson(mut self, user: UserId) -> Self {
        self.salesperson = Some(user);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_line(mut self, line: ContractLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Builds the contract
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing
    pub fn build(self) -> Result<Contract, ContractError> {
        let name = self
            .name
            .ok_or(ContractError::MissingRequiredField("name".to_string()))?;
        let company = self
            .company
            .ok_or(ContractError::MissingRequiredField("company".to_string()))?;
        let (pricelist, currency) = self
            .pricelist
            .ok_or(ContractError::MissingRequiredField("pricelist".to_string()))?;

        let now = Utc::now();
        let date_start = self.date_start.unwrap_or_else(|| now.date_naive());
        let next_billing_date = self.next_billing_date.unwrap_or(date_start);

        Ok(Contract {
            id: ContractId::new_v7(),
            name,
            state: ContractState::Draft,
            date_confirmed: None,
            company,
            partner: self.partner,
            date_start,
            date_end: self.date_end,
            update_lines_from_orders: self.update_lines_from_orders,
            is_recurring: self.is_recurring,
            rule: self.rule,
            next_billing_date: Some(next_billing_date),
            billing_day: next_billing_date.day(),
            invoice_amount_type: self.invoice_amount_type,
            pricelist,
            currency,
            salesperson: self.salesperson,
            description: self.description,
            lines: self.lines,
            invoices: Vec::new(),
            orders: Vec::new(),
            subcontracts: Vec::new(),
            events: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Default for ContractBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Pricelist;
    use core_kernel::PricelistId;

    fn test_contract() -> Contract {
        let pricelist = Pricelist::new(PricelistId::new(), "Default", Currency::USD);
        ContractBuilder::new()
            .name("2024/0001")
            .company(CompanyId::new())
            .partner(PartnerId::new())
            .pricelist(&pricelist)
            .recurrence(RecurrenceRule::monthly())
            .starting(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let contract = test_contract();
        assert_eq!(contract.state(), ContractState::Draft);
        assert_eq!(contract.billing_day(), 31);
        assert_eq!(
            contract.next_billing_date(),
            Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
        assert!(contract.updates_lines_from_orders());
    }

    #[test]
    fn test_confirm_from_draft() {
        let mut contract = test_contract();
        contract.action_confirm().unwrap();
        assert_eq!(contract.state(), ContractState::Confirmed);
        assert!(contract.date_confirmed().is_some());
    }

    #[test]
    fn test_confirm_forbidden_after_done() {
        let mut contract = test_contract();
        contract.action_confirm().unwrap();
        contract.action_done().unwrap();

        let result = contract.action_confirm();
        assert!(matches!(
            result,
            Err(ContractError::ForbiddenStateTransition { .. })
        ));
    }

    #[test]
    fn test_done_forbidden_from_draft() {
        let mut contract = test_contract();
        assert!(matches!(
            contract.action_done(),
            Err(ContractError::ForbiddenStateTransition { .. })
        ));
    }

    #[test]
    fn test_draft_reenterable_from_cancel() {
        let mut contract = test_contract();
        contract.action_cancel();
        assert!(contract.action_draft());
        assert_eq!(contract.state(), ContractState::Draft);
    }

    #[test]
    fn test_draft_noop_from_done() {
        let mut contract = test_contract();
        contract.action_confirm().unwrap();
        contract.action_done().unwrap();
        assert!(!contract.action_draft());
        assert_eq!(contract.state(), ContractState::Done);
    }

    #[test]
    fn test_manual_next_date_resets_billing_day() {
        let mut contract = test_contract();
        contract.set_next_billing_date(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(), false);
        assert_eq!(contract.billing_day(), 15);
    }

    #[test]
    fn test_driver_advancement_preserves_billing_day() {
        let mut contract = test_contract();
        let next = contract.advance_next_billing_date().unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(contract.billing_day(), 31);
    }

    #[test]
    fn test_events_accumulate_and_drain() {
        let mut contract = test_contract();
        contract.action_confirm().unwrap();
        contract.advance_next_billing_date().unwrap();

        let events = contract.take_events();
        assert_eq!(events.len(), 2);
        assert!(contract.take_events().is_empty());
    }
}
