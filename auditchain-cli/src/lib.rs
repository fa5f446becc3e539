//! auditchain CLI
//!
//! # Commands
//!
//! - `verify` - Check a local hash chain
//! - `summary` - Compliance totals for a local history
//! - `seal` - Build a chain from unsealed payloads
//! - `fetch` - Download a project's history and verify it
//! - `stats` - Dashboard statistics
//! - `login` - Obtain a JWT session
//! - `config` - Configuration (show, validate, init)

pub mod commands;
pub mod context;
pub mod input;
pub mod output;

pub use context::CliContext;
pub use output::{OutputFormat, OutputFormatter};

use auditchain::ChainStatus;

/// Process exit status of a successful command run.
///
/// Errors map to 1 in `main`; the codes here let scripts tell a tampered
/// chain apart from one that could not be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    ChainBroken,
    Unavailable,
}

impl Exit {
    pub fn code(self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::ChainBroken => 2,
            Exit::Unavailable => 3,
        }
    }
}

impl From<ChainStatus> for Exit {
    fn from(status: ChainStatus) -> Self {
        match status {
            ChainStatus::Verified => Exit::Success,
            ChainStatus::Broken { .. } => Exit::ChainBroken,
            ChainStatus::Unavailable => Exit::Unavailable,
        }
    }
}
