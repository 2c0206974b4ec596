use thiserror::Error;

/// Errors raised while talking to the upstream statement source.
/// A fetch failure aborts the account being processed, never the whole run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("upstream client error: {0}")]
    Upstream(String),
}

/// Errors raised by the persistence sinks.
///
/// `Duplicate` is the classified uniqueness-violation signal. Sinks map their
/// driver's constraint-violation error onto it at the boundary, so callers
/// never inspect driver error messages or codes themselves.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("record already present in sink")]
    Duplicate,

    #[error("relational store error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("document store error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

impl SinkError {
    /// True for uniqueness-constraint violations, which are expected under the
    /// one-day overlap window and handled as benign.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, SinkError::Duplicate)
    }
}
