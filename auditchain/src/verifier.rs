//! Client-side re-validation of a server-asserted hash chain.
//!
//! The chain is valid when, for every `i > 0`, `records[i]`'s back-link equals
//! `records[i - 1]`'s commitment. Order is taken as given. Nothing here
//! performs I/O or mutates its input.

use crate::error::{ChainError, ChainResult};
use crate::record::{json_kind, ChainLink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn links_to<L: ChainLink>(prev: &L, curr: &L) -> bool {
    match (prev.commitment(), curr.back_link()) {
        (Some(commitment), Some(back_link)) => commitment == back_link,
        _ => false,
    }
}

/// Index of the first record whose back-link does not match its predecessor.
///
/// Never returns `Some(0)`: the first record has no predecessor to match.
pub fn first_break<L: ChainLink>(records: &[L]) -> Option<usize> {
    records
        .windows(2)
        .position(|pair| !links_to(&pair[0], &pair[1]))
        .map(|i| i + 1)
}

/// `true` if the sequence is empty, has one element, or every adjacent pair
/// links up.
pub fn verify<L: ChainLink>(records: &[L]) -> bool {
    first_break(records).is_none()
}

/// Verify a raw JSON document.
///
/// The document must be an array of objects; anything else is rejected before
/// the scan starts. Missing or non-string hash fields are data-level problems
/// and only affect the boolean result.
pub fn verify_value(value: &Value) -> ChainResult<bool> {
    let items = value.as_array().ok_or_else(|| {
        ChainError::InvalidArgument(format!(
            "expected an array of records, got {}",
            json_kind(value)
        ))
    })?;

    if let Some(pos) = items.iter().position(|item| !item.is_object()) {
        return Err(ChainError::InvalidArgument(format!(
            "record {} is {}, not an object",
            pos,
            json_kind(&items[pos])
        )));
    }

    Ok(verify(items))
}

/// Outcome of verifying a batch of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainReport {
    pub total_entries: usize,
    pub valid: bool,
    pub first_invalid_entry: Option<usize>,
    pub message: String,
    pub checked_at: DateTime<Utc>,
}

pub fn report<L: ChainLink>(records: &[L]) -> ChainReport {
    let first_invalid_entry = first_break(records);
    let message = match first_invalid_entry {
        None if records.len() < 2 => format!(
            "chain of {} record(s) is trivially valid",
            records.len()
        ),
        None => format!("all {} records link to their predecessor", records.len()),
        Some(i) => format!(
            "record {} does not link to record {} ({} records checked)",
            i,
            i - 1,
            records.len()
        ),
    };

    ChainReport {
        total_entries: records.len(),
        valid: first_invalid_entry.is_none(),
        first_invalid_entry,
        message,
        checked_at: Utc::now(),
    }
}

/// Caller-side presentation of a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainStatus {
    Verified,
    Broken { index: usize },
    /// No records were fetched, so nothing could be checked.
    Unavailable,
}

impl ChainStatus {
    pub fn from_records<L: ChainLink>(records: Option<&[L]>) -> Self {
        match records {
            None => ChainStatus::Unavailable,
            Some(records) => match first_break(records) {
                None => ChainStatus::Verified,
                Some(index) => ChainStatus::Broken { index },
            },
        }
    }

    pub fn from_report(report: Option<&ChainReport>) -> Self {
        match report {
            None => ChainStatus::Unavailable,
            Some(r) => match r.first_invalid_entry {
                None => ChainStatus::Verified,
                Some(index) => ChainStatus::Broken { index },
            },
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, ChainStatus::Verified)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChainStatus::Verified => "chain verified",
            ChainStatus::Broken { .. } => "chain INVALID",
            ChainStatus::Unavailable => "verification unavailable",
        }
    }
}
