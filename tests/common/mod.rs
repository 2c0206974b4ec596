use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use kontosync::error::FetchError;
use kontosync::models::{Account, Balance, StatementRecord};
use kontosync::source::StatementSource;
use kontosync::window::FetchWindow;

type AccountKey = (String, String);

/// Helper to create an account that has never been synced
pub fn make_account(number: &str, blz: &str, owner: &str) -> Account {
    Account {
        number: number.to_string(),
        blz: blz.to_string(),
        iban: None,
        bic: None,
        owner: owner.to_string(),
        last_withdrawn_at: None,
    }
}

/// Helper to create an account with a stored incremental cursor
pub fn make_synced_account(
    number: &str,
    blz: &str,
    owner: &str,
    last_withdrawn_at: DateTime<Utc>,
) -> Account {
    Account {
        last_withdrawn_at: Some(last_withdrawn_at),
        ..make_account(number, blz, owner)
    }
}

/// Helper to create a statement record with the given dates and amount
pub fn make_statement(date: NaiveDate, entry_date: NaiveDate, amount: Decimal) -> StatementRecord {
    StatementRecord {
        date,
        entry_date,
        amount,
        ..StatementRecord::default()
    }
}

/// Statement posted and entered `days_ago` days before now
pub fn statement_days_ago(days_ago: i64, amount: Decimal) -> StatementRecord {
    let date = (Utc::now() - Duration::days(days_ago)).date_naive();
    make_statement(date, date, amount)
}

/// Statement whose posting and entry dates lie `days_ahead` days in the future
pub fn statement_days_ahead(days_ahead: i64, amount: Decimal) -> StatementRecord {
    let date = (Utc::now() + Duration::days(days_ahead)).date_naive();
    make_statement(date, date, amount)
}

/// Statement with id and purpose set, posted `days_ago` days before now
///
/// id and purpose feed the composite title, so two calls with the same
/// arguments produce records with identical natural keys.
pub fn statement_with_refs(
    days_ago: i64,
    amount: Decimal,
    id: &str,
    purpose: &str,
) -> StatementRecord {
    StatementRecord {
        id: Some(id.to_string()),
        purpose: Some(purpose.to_string()),
        ..statement_days_ago(days_ago, amount)
    }
}

/// Statement source driven by scripted per-account responses
///
/// Stands in for the banking protocol client: accounts, balances, statement
/// batches and failures are scripted per account, and every fetch window the
/// engine requests is recorded for inspection.
#[derive(Default)]
pub struct ScriptedSource {
    accounts: Vec<Account>,
    balances: HashMap<AccountKey, Balance>,
    statements: HashMap<AccountKey, Vec<StatementRecord>>,
    balance_failures: HashSet<AccountKey>,
    statement_failures: HashSet<AccountKey>,
    windows: Mutex<Vec<FetchWindow>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the account show up in `list_accounts`
    pub fn with_account(mut self, account: &Account) -> Self {
        self.accounts.push(account.clone());
        self
    }

    /// Script the statement batch returned for the account
    pub fn with_statements(mut self, account: &Account, records: Vec<StatementRecord>) -> Self {
        self.statements.insert(account.key(), records);
        self
    }

    /// Script the balance reported for the account
    pub fn with_balance(mut self, account: &Account, balance: Balance) -> Self {
        self.balances.insert(account.key(), balance);
        self
    }

    /// Make statement retrieval fail for the account
    pub fn failing_statements(mut self, account: &Account) -> Self {
        self.statement_failures.insert(account.key());
        self
    }

    /// Make the balance request fail for the account
    pub fn failing_balance(mut self, account: &Account) -> Self {
        self.balance_failures.insert(account.key());
        self
    }

    /// Every window passed to `statements`, in request order
    pub fn requested_windows(&self) -> Vec<FetchWindow> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatementSource for ScriptedSource {
    async fn list_accounts(&self) -> Result<Vec<Account>, FetchError> {
        Ok(self.accounts.clone())
    }

    async fn balance(&self, account: &Account) -> Result<Option<Balance>, FetchError> {
        if self.balance_failures.contains(&account.key()) {
            return Err(FetchError::Upstream(format!(
                "balance request failed for account {}",
                account.number
            )));
        }

        Ok(self.balances.get(&account.key()).cloned())
    }

    async fn statements(
        &self,
        account: &Account,
        window: &FetchWindow,
    ) -> Result<Vec<StatementRecord>, FetchError> {
        self.windows.lock().unwrap().push(*window);

        if self.statement_failures.contains(&account.key()) {
            return Err(FetchError::Upstream(format!(
                "statement retrieval failed for account {}",
                account.number
            )));
        }

        Ok(self.statements.get(&account.key()).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_make_statement_defaults_optionals() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let record = make_statement(date, date, dec!(12.34));

        assert_eq!(record.date, date);
        assert_eq!(record.entry_date, date);
        assert_eq!(record.amount, dec!(12.34));
        assert_eq!(record.id, None);
        assert_eq!(record.purpose, None);
        assert_eq!(record.currency, None);
    }

    #[test]
    fn test_statement_with_refs_shares_natural_key() {
        let a = statement_with_refs(3, dec!(10.00), "REF-1", "Invoice");
        let b = statement_with_refs(3, dec!(10.00), "REF-1", "Invoice");

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_scripted_source_serves_scripted_records() {
        let account = make_account("1", "10010010", "user1");
        let source = ScriptedSource::new()
            .with_account(&account)
            .with_statements(&account, vec![statement_days_ago(2, dec!(5.00))]);

        let window = kontosync::window::fetch_window(None, Utc::now());
        let records = source.statements(&account, &window).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(source.list_accounts().await.unwrap().len(), 1);
        assert_eq!(source.requested_windows().len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_source_fails_on_request() {
        let account = make_account("1", "10010010", "user1");
        let source = ScriptedSource::new().failing_statements(&account);

        let window = kontosync::window::fetch_window(None, Utc::now());
        let result = source.statements(&account, &window).await;

        assert!(matches!(result, Err(FetchError::Upstream(_))));
    }
}
