pub mod csv;

pub use self::csv::CsvStatementSource;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{Account, Balance, StatementRecord};
use crate::window::FetchWindow;

/// Upstream statement source
///
/// The boundary to the banking protocol client. Calls are awaited one at a
/// time with no retry; a failure aborts the account being fetched and the
/// orchestrator moves on to the next account.
///
/// Implementations:
/// - [`CsvStatementSource`]: statement records from a CSV export
/// - a live protocol client, in deployments that fetch from the bank directly
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Accounts this source can serve statements for
    async fn list_accounts(&self) -> Result<Vec<Account>, FetchError>;

    /// Current balance, when the source knows one (kept for reporting)
    async fn balance(&self, account: &Account) -> Result<Option<Balance>, FetchError>;

    /// Statement records for the account within the window, in source order
    /// (not necessarily chronological)
    async fn statements(
        &self,
        account: &Account,
        window: &FetchWindow,
    ) -> Result<Vec<StatementRecord>, FetchError>;
}
