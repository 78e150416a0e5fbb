//! Localized narration and currency vocabulary
//!
//! Invoice narrations are customer-facing text rendered in the partner's
//! language. The vocabulary lives in an explicit [`LocaleTable`] injected
//! into the materializer; nothing here mutates shared state, so two
//! companies with different vocabularies can bill from the same process.

use std::collections::HashMap;

use core_kernel::{Currency, DateRange, Money};
use domain_contract::Locale;

/// Grammatical forms of a currency unit name
///
/// Slavic languages inflect the unit by count ("1 доллар, 2 доллара,
/// 5 долларов"); languages without that distinction register the same
/// form three times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyForms {
    /// Form used with counts ending in 1 (except 11)
    pub singular: String,
    /// Form used with counts ending in 2-4 (except 12-14)
    pub paucal: String,
    /// Form used with every other count
    pub plural: String,
}

impl CurrencyForms {
    pub fn new(
        singular: impl Into<String>,
        paucal: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            singular: singular.into(),
            paucal: paucal.into(),
            plural: plural.into(),
        }
    }

    /// The same form for every count
    pub fn uniform(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            singular: name.clone(),
            paucal: name.clone(),
            plural: name,
        }
    }

    /// Picks the form for a count
    pub fn pick(&self, count: i64) -> &str {
        let n = count.unsigned_abs();
        if (11..=14).contains(&(n % 100)) {
            return &self.plural;
        }
        match n % 10 {
            1 => &self.singular,
            2..=4 => &self.paucal,
            _ => &self.plural,
        }
    }
}

/// Injected localization table for narration text and currency vocabulary
///
/// Phrases use `{start}` and `{end}` placeholders for the period bounds.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    period_phrases: HashMap<Locale, String>,
    currency_forms: HashMap<(Locale, Currency), CurrencyForms>,
}

impl LocaleTable {
    /// An empty table; narration falls back to the English phrase
    pub fn empty() -> Self {
        Self {
            period_phrases: HashMap::new(),
            currency_forms: HashMap::new(),
        }
    }

    /// The standard deployment vocabulary
    pub fn standard() -> Self {
        Self::empty()
            .with_period_phrase(
                Locale::En,
                "This invoice covers the following period: {start} - {end}",
            )
            .with_period_phrase(
                Locale::Ru,
                "Этот счёт охватывает следующий период: {start} - {end}",
            )
            .with_period_phrase(
                Locale::Uz,
                "Ushbu hisob-faktura quyidagi davrni o'z ichiga oladi: {start} - {end}",
            )
            .with_currency_forms(
                Locale::Ru,
                Currency::USD,
                CurrencyForms::new("доллар", "доллара", "долларов"),
            )
            .with_currency_forms(
                Locale::Ru,
                Currency::UZS,
                CurrencyForms::new("сум", "сума", "сумов"),
            )
            .with_currency_forms(Locale::En, Currency::UZS, CurrencyForms::uniform("sum"))
    }

    pub fn with_period_phrase(mut self, locale: Locale, phrase: impl Into<String>) -> Self {
        self.period_phrases.insert(locale, phrase.into());
        self
    }

    pub fn with_currency_forms(
        mut self,
        locale: Locale,
        currency: Currency,
        forms: CurrencyForms,
    ) -> Self {
        self.currency_forms.insert((locale, currency), forms);
        self
    }

    /// Renders the invoice period narration in the given locale
    pub fn period_narration(&self, locale: Locale, period: &DateRange) -> String {
        const FALLBACK: &str = "This invoice covers the following period: {start} - {end}";
        let phrase = self
            .period_phrases
            .get(&locale)
            .or_else(|| self.period_phrases.get(&Locale::En))
            .map(String::as_str)
            .unwrap_or(FALLBACK);
        phrase
            .replace("{start}", &period.start.to_string())
            .replace("{end}", &period.end.to_string())
    }

    /// Renders an amount with the localized currency unit name
    ///
    /// Falls back to the ISO code when no vocabulary is registered for the
    /// locale/currency pair.
    pub fn amount_in_currency(&self, locale: Locale, money: Money) -> String {
        let rounded = money.round_to_currency();
        let whole = rounded.amount().trunc().to_string().parse::<i64>().unwrap_or(0);
        let unit = self
            .currency_forms
            .get(&(locale, money.currency()))
            .map(|forms| forms.pick(whole).to_string())
            .unwrap_or_else(|| money.currency().code().to_string());
        let dp = money.currency().decimal_places() as usize;
        format!("{:.dp$} {}", rounded.amount(), unit, dp = dp)
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::standard()
    }
}
