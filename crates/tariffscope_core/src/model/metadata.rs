//! Flat key/value metadata attached to tariff and allowance tables

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::numeric::parse_number;

/// Well-known metadata keys
pub mod keys {
    pub const VALID_FROM: &str = "valid_from";
    pub const SOURCE_URL: &str = "source_url";
    pub const VERSION: &str = "version";
    pub const DERIVED: &str = "derived";
    pub const NOTES: &str = "notes";
    pub const COMMIT_HASH: &str = "commit_hash";
    pub const YEAR_END_BONUS_PERCENT: &str = "jsz_percent";
    pub const FLAT_ALLOWANCE_MONTHLY: &str = "allowance_flat_monthly";
    pub const SAVINGS_PLAN_MONTHLY: &str = "vwl_amount_monthly";
    pub const ALLOWANCES: &str = "allowances";
    pub const LABEL_DE: &str = "label_de";
    pub const LABEL_EN: &str = "label_en";
    pub const ADDING_TYPE: &str = "adding_type";
    pub const FUNC_TYPE: &str = "func_type";
    pub const OPTIONS: &str = "options";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: FxHashMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value of `key` when present and not blank
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(parse_number)
    }

    /// Number at `key`, counting a missing or unparseable value as zero
    pub fn number_or_zero(&self, key: &str) -> f64 {
        self.number(key).unwrap_or(0.0)
    }

    /// Semicolon-separated list at `key`, trimmed, blanks dropped
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn valid_from(&self) -> Option<&str> {
        self.text(keys::VALID_FROM)
    }

    /// `valid_from` as a calendar date, accepting ISO and German notation
    pub fn valid_from_date(&self) -> Option<Date> {
        let raw = self.valid_from()?;
        raw.parse::<Date>().ok().or_else(|| {
            jiff::fmt::strtime::parse("%d.%m.%Y", raw)
                .and_then(|tm| tm.to_date())
                .ok()
        })
    }

    /// `valid_from` in German notation when it is a date, otherwise as written
    pub fn valid_from_label(&self) -> Option<String> {
        let raw = self.valid_from()?;
        Some(match self.valid_from_date() {
            Some(date) => date.strftime("%d.%m.%Y").to_string(),
            None => raw.to_string(),
        })
    }

    pub fn source_url(&self) -> Option<&str> {
        self.text(keys::SOURCE_URL)
    }

    pub fn version(&self) -> Option<&str> {
        self.text(keys::VERSION)
    }

    pub fn is_derived(&self) -> bool {
        self.get(keys::DERIVED) == Some("true")
    }

    pub fn notes(&self) -> Option<&str> {
        self.text(keys::NOTES)
    }

    pub fn commit_hash(&self) -> Option<&str> {
        self.text(keys::COMMIT_HASH)
    }

    /// Allowance names referenced by a tariff
    pub fn allowance_names(&self) -> Vec<String> {
        self.list(keys::ALLOWANCES)
    }

    /// Display label of an allowance table
    pub fn label(&self) -> &str {
        self.text(keys::LABEL_DE)
            .or_else(|| self.text(keys::LABEL_EN))
            .unwrap_or("(unbenannt)")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Metadata::new();
        for (k, v) in iter {
            meta.insert(k, v);
        }
        meta
    }
}
