pub mod accounts;
pub mod engine;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod models;
pub mod report;
pub mod sinks;
pub mod source;
pub mod window;
pub mod writer;

pub use engine::SyncEngine;
pub use report::RunReport;
