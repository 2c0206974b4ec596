use chrono::Utc;
use log::{error, info, warn};

use crate::error::FetchError;
use crate::filter;
use crate::mapper;
use crate::models::Account;
use crate::report::RunReport;
use crate::sinks::{DocumentSink, RelationalSink};
use crate::source::StatementSource;
use crate::window;
use crate::writer::DualSinkWriter;

/// Incremental synchronization engine
///
/// Pulls the statements an account gained since its last recorded withdraw
/// date (minus one day of overlap) from the source and writes each record to
/// both stores. The stores' unique keys make the overlap safe: a record seen
/// in two consecutive runs is rejected as a duplicate on the second.
pub struct SyncEngine<S, R, D> {
    /// Where accounts, balances and statement records come from
    source: S,
    /// Fixed-schema store, authoritative for the incremental cursor
    relational: R,
    /// Document store keeping the full statement records
    documents: D,
}

impl<S, R, D> SyncEngine<S, R, D>
where
    S: StatementSource,
    R: RelationalSink,
    D: DocumentSink,
{
    /// Create an engine over a source and the two sinks
    pub fn new(source: S, relational: R, documents: D) -> Self {
        Self {
            source,
            relational,
            documents,
        }
    }

    /// Accounts the source knows about, for runs without a preselected set
    pub async fn list_accounts(&self) -> Result<Vec<Account>, FetchError> {
        self.source.list_accounts().await
    }

    /// Get a reference to the statement source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a reference to the relational sink, for post-run inspection
    pub fn relational(&self) -> &R {
        &self.relational
    }

    /// Get a reference to the document sink, for post-run inspection
    pub fn documents(&self) -> &D {
        &self.documents
    }

    /// Synchronize every account in order and return the run's report
    ///
    /// A fetch failure aborts the failing account only; the remaining
    /// accounts are still processed. Closes the document sink when all
    /// accounts are done.
    pub async fn run(&self, accounts: &[Account]) -> RunReport {
        let mut report = RunReport::new();

        for account in accounts {
            if let Err(e) = self.sync_account(account, &mut report).await {
                error!(
                    "the account {} could not be synchronized: {}",
                    account.number, e
                );
            }
        }

        if let Err(e) = self.documents.close().await {
            warn!("the document store connection did not close cleanly: {}", e);
        }

        info!("processing complete");
        for account in accounts {
            info!(
                "there were {} transactions fetched for the account {}, {} added to the database",
                report.fetched(account),
                account.number,
                report.succeeded(account)
            );
        }

        report
    }

    /// Fetch and persist one account's statements
    async fn sync_account(
        &self,
        account: &Account,
        report: &mut RunReport,
    ) -> Result<(), FetchError> {
        // One clock reading per account; the window end, the future filter
        // and the withdraw date stamped on stored records must agree.
        let now = Utc::now();

        if let Some(balance) = self.source.balance(account).await? {
            report.record_balance(account, balance);
        }

        let window = window::fetch_window(account.last_withdrawn_at, now);
        let statements = self.source.statements(account, &window).await?;
        report.record_fetched(account, statements.len());

        let writer = DualSinkWriter::new(&self.relational, &self.documents);

        for mut record in statements {
            record.correct_entry_date();

            if !filter::is_eligible(&record, now) {
                // Pre-booked entries land inside the overlap of a later run
                info!(
                    "transaction on {} for the account {} is expected in the future",
                    record.entry_date, account.number
                );
                continue;
            }

            let (document, relational) = mapper::map_statement(account, &record, now);
            writer.write(account, &document, &relational, report).await;
        }

        info!(
            "for the account {}, {} transactions were retrieved, {} (documents) and {} (relational) stored",
            account.number,
            report.fetched(account),
            report.document_stored(account),
            report.succeeded(account)
        );

        Ok(())
    }
}
