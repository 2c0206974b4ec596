use std::collections::HashMap;

use crate::models::{Account, AccountTransaction, Balance};

type AccountKey = (String, String);

/// Mutable per-run context: counters, balances and the error collection
///
/// One instance per synchronization run, threaded through the pipeline and
/// handed back when the run completes. Nothing in here is shared between
/// runs, so runs over disjoint account sets cannot interfere.
#[derive(Debug, Default)]
pub struct RunReport {
    fetched: HashMap<AccountKey, usize>,
    relational_stored: HashMap<AccountKey, usize>,
    document_stored: HashMap<AccountKey, usize>,
    balances: HashMap<AccountKey, Balance>,
    errors: Vec<AccountTransaction>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record how many statements the source returned for an account;
    /// set once per account per run
    pub fn record_fetched(&mut self, account: &Account, count: usize) {
        self.fetched.insert(account.key(), count);
    }

    pub fn record_balance(&mut self, account: &Account, balance: Balance) {
        self.balances.insert(account.key(), balance);
    }

    /// Count one successful relational insert
    pub fn record_relational_stored(&mut self, account: &Account) {
        *self.relational_stored.entry(account.key()).or_default() += 1;
    }

    /// Count one successful document insert
    pub fn record_document_stored(&mut self, account: &Account) {
        *self.document_stored.entry(account.key()).or_default() += 1;
    }

    /// Keep a relational record that failed with a non-duplicate error,
    /// for later inspection or retry
    pub fn record_failure(&mut self, record: AccountTransaction) {
        self.errors.push(record);
    }

    /// Statements fetched for the account in this run, 0 when none recorded
    pub fn fetched(&self, account: &Account) -> usize {
        self.fetched.get(&account.key()).copied().unwrap_or(0)
    }

    /// Successful relational inserts for the account
    ///
    /// Counts the relational sink only; document-store inserts are reported
    /// separately via [`RunReport::document_stored`].
    pub fn succeeded(&self, account: &Account) -> usize {
        self.relational_stored
            .get(&account.key())
            .copied()
            .unwrap_or(0)
    }

    pub fn document_stored(&self, account: &Account) -> usize {
        self.document_stored
            .get(&account.key())
            .copied()
            .unwrap_or(0)
    }

    pub fn balance(&self, account: &Account) -> Option<&Balance> {
        self.balances.get(&account.key())
    }

    /// Relational records that failed with a non-duplicate error, in the
    /// order they failed
    pub fn failures(&self) -> &[AccountTransaction] {
        &self.errors
    }
}
