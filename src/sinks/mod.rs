pub mod memory;
pub mod mongo;
pub mod mysql;

pub use memory::{MemoryDocumentSink, MemoryRelationalSink};
pub use mongo::MongoDocumentSink;
pub use mysql::MySqlRelationalSink;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::models::{AccountTransaction, TransactionDocument};

/// Relational persistence sink
///
/// Implementations:
/// - [`MySqlRelationalSink`]: MySQL, the production sink
/// - [`MemoryRelationalSink`]: in-memory, for tests
///
/// # Classification contract
///
/// The sink, not its callers, decides what a duplicate is: implementations
/// must map their driver's uniqueness-constraint violation onto
/// [`SinkError::Duplicate`] and surface every other failure as-is. Callers
/// then treat duplicates as benign without ever touching driver error codes
/// or messages.
#[async_trait]
pub trait RelationalSink: Send + Sync {
    /// Insert one transaction row inside its own short transaction
    ///
    /// A failed insert must not leave a partial row behind; commit happens
    /// only after the row is accepted.
    async fn insert(&self, record: &AccountTransaction) -> Result<(), SinkError>;
}

/// Document persistence sink
///
/// Implementations:
/// - [`MongoDocumentSink`]: MongoDB, the production sink
/// - [`MemoryDocumentSink`]: in-memory, for tests
///
/// Duplicate-key violations map onto [`SinkError::Duplicate`] under the same
/// classification contract as [`RelationalSink`], whatever fields the sink's
/// key policy happens to cover.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Insert one transaction document
    async fn insert(&self, document: &TransactionDocument) -> Result<(), SinkError>;

    /// Release the underlying connection at the end of a run
    async fn close(&self) -> Result<(), SinkError>;
}
