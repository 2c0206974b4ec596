use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// One bank account under synchronization
///
/// Loaded once per run from the account metadata store (or derived from the
/// statement source) and immutable for the duration of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Account number at the bank
    pub number: String,
    /// German bank routing number (Bankleitzahl)
    pub blz: String,
    pub iban: Option<String>,
    pub bic: Option<String>,
    /// Identifier of the user this account belongs to
    pub owner: String,
    /// When the last persisted transaction for this account was withdrawn,
    /// if any; recomputed externally between runs and read-only here
    pub last_withdrawn_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Composite identity of the account (number alone is not unique
    /// across banks)
    pub fn key(&self) -> (String, String) {
        (self.number.clone(), self.blz.clone())
    }
}

/// Balance as reported by the upstream source, kept for reporting only
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub amount: Decimal,
    pub currency: Option<String>,
    pub date: Option<NaiveDate>,
}
