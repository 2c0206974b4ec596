pub mod account;
pub mod document;
pub mod relational;
pub mod statement;

pub use account::{Account, Balance};
pub use document::TransactionDocument;
pub use relational::AccountTransaction;
pub use statement::StatementRecord;
