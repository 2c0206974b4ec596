use log::{error, warn};

use crate::models::{Account, AccountTransaction, TransactionDocument};
use crate::report::RunReport;
use crate::sinks::{DocumentSink, RelationalSink};

/// Which sinks accepted one mapped pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteOutcome {
    pub document_stored: bool,
    pub relational_stored: bool,
}

/// Writes one mapped pair into two independently-failing sinks
///
/// The relational attempt and the document attempt are isolated from each
/// other: a record may land in one sink and not the other. Two independent
/// stores with no cross-sink transaction is the accepted consistency model;
/// the overlapping fetch window and the sinks' uniqueness keys converge the
/// stores over subsequent runs.
pub struct DualSinkWriter<'a, R, D> {
    relational: &'a R,
    documents: &'a D,
}

impl<'a, R: RelationalSink, D: DocumentSink> DualSinkWriter<'a, R, D> {
    pub fn new(relational: &'a R, documents: &'a D) -> Self {
        Self {
            relational,
            documents,
        }
    }

    /// Persist one mapped pair, reporting which sinks accepted it
    ///
    /// Duplicates are benign: logged at warning level, never in the error
    /// collection. Any other relational failure puts the record into the
    /// run's error collection; document failures are warnings only. Neither
    /// attempt is skipped because of the other's outcome.
    pub async fn write(
        &self,
        account: &Account,
        document: &TransactionDocument,
        record: &AccountTransaction,
        report: &mut RunReport,
    ) -> WriteOutcome {
        let relational_stored = self.write_relational(account, record, report).await;
        let document_stored = self.write_document(account, document, report).await;

        WriteOutcome {
            document_stored,
            relational_stored,
        }
    }

    async fn write_relational(
        &self,
        account: &Account,
        record: &AccountTransaction,
        report: &mut RunReport,
    ) -> bool {
        match self.relational.insert(record).await {
            Ok(()) => {
                report.record_relational_stored(account);
                true
            }
            Err(e) if e.is_duplicate() => {
                warn!(
                    "transaction already in the relational store: {} ({})",
                    record.title, record.date
                );
                false
            }
            Err(e) => {
                error!(
                    "transaction could not be stored: {} ({}): {}",
                    record.title, record.date, e
                );
                report.record_failure(record.clone());
                false
            }
        }
    }

    async fn write_document(
        &self,
        account: &Account,
        document: &TransactionDocument,
        report: &mut RunReport,
    ) -> bool {
        match self.documents.insert(document).await {
            Ok(()) => {
                report.record_document_stored(account);
                true
            }
            Err(e) if e.is_duplicate() => {
                warn!(
                    "transaction already in the document store: {} {} '{}'",
                    document.date, document.amount, document.purpose
                );
                false
            }
            Err(e) => {
                warn!(
                    "transaction could not be stored in the document store: {} {}: {}",
                    document.date, document.amount, e
                );
                false
            }
        }
    }
}
