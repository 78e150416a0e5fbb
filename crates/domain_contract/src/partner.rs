//! Customer and company projections
//!
//! The billing core does not own customers or companies; the host system
//! does. These types carry the handful of fields billing actually reads:
//! who to invoice, which language to narrate in, which journal and currency
//! a company bills under.

use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, Currency, JournalId, PartnerId, UserId};

/// Language a partner is invoiced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
    Uz,
}

/// A customer, as seen by billing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub locale: Locale,
    /// Payment term granted to this customer, in days from the invoice date
    pub payment_term_days: Option<u32>,
    /// Salesperson responsible for this customer
    pub salesperson: Option<UserId>,
}

impl Partner {
    pub fn new(id: PartnerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            locale: Locale::default(),
            payment_term_days: None,
            salesperson: None,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_payment_term_days(mut self, days: u32) -> Self {
        self.payment_term_days = Some(days);
        self
    }

    pub fn with_salesperson(mut self, user: UserId) -> Self {
        self.salesperson = Some(user);
        self
    }
}

/// A company's billing profile
///
/// The sale journal is required before any invoice can be generated for
/// the company; invoice terms, when configured, are appended to every
/// invoice narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub id: CompanyId,
    pub name: String,
    pub currency: Currency,
    pub sale_journal: Option<JournalId>,
    pub invoice_terms: Option<String>,
}

impl CompanyProfile {
    pub fn new(id: CompanyId, name: impl Into<String>, currency: Currency) -> Self {
        Self {
            id,
            name: name.into(),
            currency,
            sale_journal: None,
            invoice_terms: None,
        }
    }

    pub fn with_sale_journal(mut self, journal: JournalId) -> Self {
        self.sale_journal = Some(journal);
        self
    }

    pub fn with_invoice_terms(mut self, terms: impl Into<String>) -> Self {
        self.invoice_terms = Some(terms.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_defaults() {
        let partner = Partner::new(PartnerId::new(), "Acme LLC");
        assert_eq!(partner.locale, Locale::En);
        assert!(partner.payment_term_days.is_none());
    }

    #[test]
    fn test_company_profile_builders() {
        let journal = JournalId::new();
        let company = CompanyProfile::new(CompanyId::new(), "Main Company", Currency::UZS)
            .with_sale_journal(journal)
            .with_invoice_terms("Payment within 15 days.");

        assert_eq!(company.sale_journal, Some(journal));
        assert!(company.invoice_terms.is_some());
    }
}
