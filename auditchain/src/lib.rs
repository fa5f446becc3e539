// auditchain library
// Local integrity checks for server-issued compliance hash chains, plus the
// HTTP client that fetches them.

pub mod client;
pub mod config;
pub mod error;
pub mod record;
pub mod seal;
pub mod summary;
pub mod verifier;

pub use client::{ApiClient, Auth, RetryPolicy, Session};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ChainError, ChainResult};
pub use record::{records_from_value, AuditRecord, ChainLink};
pub use seal::ChainSealer;
pub use summary::{summarize, ComplianceSummary};
pub use verifier::{first_break, report, verify, verify_value, ChainReport, ChainStatus};
