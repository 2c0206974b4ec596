use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::SinkError;
use crate::models::{AccountTransaction, TransactionDocument};

use super::{DocumentSink, RelationalSink};

/// In-memory relational sink
///
/// Mirrors the production sink's contract: the composite natural key is
/// unique and violating it yields [`SinkError::Duplicate`]. A poison flag
/// lets tests exercise the non-duplicate failure path without a database.
///
/// # Example
///
/// ```
/// use kontosync::sinks::MemoryRelationalSink;
///
/// let sink = MemoryRelationalSink::new();
/// assert!(sink.rows().is_empty());
/// ```
#[derive(Default)]
pub struct MemoryRelationalSink {
    rows: Mutex<Vec<AccountTransaction>>,
    fail_inserts: AtomicBool,
}

impl MemoryRelationalSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail with a non-duplicate error
    pub fn poison(&self) {
        self.fail_inserts.store(true, Ordering::Relaxed);
    }

    /// Snapshot of the stored rows, in insertion order
    pub fn rows(&self) -> Vec<AccountTransaction> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<AccountTransaction>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RelationalSink for MemoryRelationalSink {
    async fn insert(&self, record: &AccountTransaction) -> Result<(), SinkError> {
        if self.fail_inserts.load(Ordering::Relaxed) {
            return Err(SinkError::Unavailable("relational sink poisoned".into()));
        }

        let mut rows = self.guard();
        if rows.iter().any(|r| r.natural_key() == record.natural_key()) {
            return Err(SinkError::Duplicate);
        }

        rows.push(record.clone());
        Ok(())
    }
}

/// In-memory document sink
///
/// Uniqueness follows the production sink's key policy (account coordinates,
/// amount, posting date, id, purpose). Tracks whether it has been closed so
/// tests can assert the run released the connection; closing is purely
/// observational, the stored documents model the database rather than the
/// client and stay reachable for later runs.
#[derive(Default)]
pub struct MemoryDocumentSink {
    documents: Mutex<Vec<TransactionDocument>>,
    fail_inserts: AtomicBool,
    closed: AtomicBool,
}

impl MemoryDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail with a non-duplicate error
    pub fn poison(&self) {
        self.fail_inserts.store(true, Ordering::Relaxed);
    }

    /// Snapshot of the stored documents, in insertion order
    pub fn documents(&self) -> Vec<TransactionDocument> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    fn guard(&self) -> MutexGuard<'_, Vec<TransactionDocument>> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn key_of(document: &TransactionDocument) -> (String, String, String, String, Option<String>, String) {
        (
            document.account_number.clone(),
            document.account_blz.clone(),
            document.amount.clone(),
            document.date.clone(),
            document.id.clone(),
            document.purpose.clone(),
        )
    }
}

#[async_trait]
impl DocumentSink for MemoryDocumentSink {
    async fn insert(&self, document: &TransactionDocument) -> Result<(), SinkError> {
        if self.fail_inserts.load(Ordering::Relaxed) {
            return Err(SinkError::Unavailable("document sink poisoned".into()));
        }

        let mut documents = self.guard();
        if documents
            .iter()
            .any(|d| Self::key_of(d) == Self::key_of(document))
        {
            return Err(SinkError::Duplicate);
        }

        documents.push(document.clone());
        Ok(())
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
