use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Fixed-schema projection of one statement record for the relational store
///
/// The tuple (account number, BLZ, amount, title, posting date) is the
/// table's composite primary key; an insert violating it is the canonical
/// duplicate signal.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountTransaction {
    pub account_number: String,
    pub account_blz: String,
    /// Fixed-point, two decimal places
    pub amount: Decimal,
    pub currency: Option<String>,
    /// Posting text from the statement, empty when absent
    pub transaction_type: String,
    /// `sanitize(id) + "/" + sanitize(purpose)`
    pub title: String,
    pub applicant_name: Option<String>,
    /// Posting date
    pub date: NaiveDate,
    pub entry_date: NaiveDate,
    pub withdraw_date: DateTime<Utc>,
    pub owner: String,
}

impl AccountTransaction {
    /// The values behind the composite primary key
    pub fn natural_key(&self) -> (String, String, Decimal, String, NaiveDate) {
        (
            self.account_number.clone(),
            self.account_blz.clone(),
            self.amount,
            self.title.clone(),
            self.date,
        )
    }
}
