//! Reading chain documents from files or stdin.

use anyhow::Context;
use auditchain::{records_from_value, AuditRecord};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// `-` means stdin.
pub const STDIN: &str = "-";

pub fn read_json(source: &str) -> anyhow::Result<Value> {
    let text = if source == STDIN {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("failed to read {}", source))?
    };
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", display_name(source)))
}

/// Records from a bare array or a `{ "data": [...] }` envelope.
pub fn read_records(source: &str) -> anyhow::Result<Vec<AuditRecord>> {
    let value = read_json(source)?;
    records_from_value(&value).with_context(|| format!("in {}", display_name(source)))
}

fn display_name(source: &str) -> &str {
    if source == STDIN {
        "stdin"
    } else {
        source
    }
}
