use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::FetchError;
use crate::models::{Account, Balance, StatementRecord};
use crate::window::FetchWindow;

use super::StatementSource;

/// Account coordinates carried on every row of a statement export
///
/// Deserialized from the same row as the record itself; columns the record
/// does not know are ignored by the header-driven deserialization, and vice
/// versa.
#[derive(Debug, Deserialize)]
struct AccountColumns {
    account_number: String,
    account_blz: String,
    #[serde(default)]
    iban: Option<String>,
    #[serde(default)]
    bic: Option<String>,
    #[serde(default)]
    owner: Option<String>,
}

struct ExportRow {
    coords: AccountColumns,
    record: StatementRecord,
}

/// Statement source backed by a CSV export
///
/// The offline counterpart of a live protocol client: rows carry the account
/// coordinates next to the record fields, accounts are derived from the rows
/// and statements are served filtered by account and fetch window. A file
/// knows no balances, so `balance` reports none.
pub struct CsvStatementSource {
    rows: Vec<ExportRow>,
}

impl CsvStatementSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FetchError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a whole export up front; a malformed row fails the source
    /// rather than silently shrinking an account's statement set
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FetchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            let coords: AccountColumns = row.deserialize(Some(&headers))?;
            let record: StatementRecord = row.deserialize(Some(&headers))?;
            rows.push(ExportRow { coords, record });
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl StatementSource for CsvStatementSource {
    async fn list_accounts(&self) -> Result<Vec<Account>, FetchError> {
        let mut seen = HashSet::new();
        let mut accounts = Vec::new();

        for row in &self.rows {
            let key = (row.coords.account_number.clone(), row.coords.account_blz.clone());
            if !seen.insert(key) {
                continue;
            }

            accounts.push(Account {
                number: row.coords.account_number.clone(),
                blz: row.coords.account_blz.clone(),
                iban: row.coords.iban.clone(),
                bic: row.coords.bic.clone(),
                owner: row.coords.owner.clone().unwrap_or_default(),
                last_withdrawn_at: None,
            });
        }

        Ok(accounts)
    }

    async fn balance(&self, _account: &Account) -> Result<Option<Balance>, FetchError> {
        Ok(None)
    }

    async fn statements(
        &self,
        account: &Account,
        window: &FetchWindow,
    ) -> Result<Vec<StatementRecord>, FetchError> {
        let records = self
            .rows
            .iter()
            .filter(|row| {
                row.coords.account_number == account.number
                    && row.coords.account_blz == account.blz
                    && window.contains_date(row.record.date)
            })
            .map(|row| row.record.clone())
            .collect();

        Ok(records)
    }
}
