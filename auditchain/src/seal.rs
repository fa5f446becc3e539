//! Local chain construction.
//!
//! Commitments are `sha256(len(prev) || prev || canonical_json(payload))`, hex
//! encoded, with `len(prev)` as a big-endian u64. The genesis record has no
//! back-link and hashes its payload alone. Canonical JSON is the compact
//! rendering with object keys sorted at every depth.

use crate::record::AuditRecord;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

pub fn compute_commitment(prev: Option<&str>, payload: &Map<String, Value>) -> String {
    let mut hasher = Sha256::new();
    if let Some(prev_hash) = prev {
        hasher.update((prev_hash.len() as u64).to_be_bytes());
        hasher.update(prev_hash.as_bytes());
    }
    hasher.update(canonical_json(payload).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compact JSON with sorted keys, independent of serde_json's map ordering.
pub fn canonical_json(payload: &Map<String, Value>) -> String {
    sorted(&Value::Object(payload.clone())).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Appends payloads to a chain, assigning commitments and back-links.
#[derive(Debug, Clone, Default)]
pub struct ChainSealer {
    last_commitment: Option<String>,
}

impl ChainSealer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue an existing chain whose tail commitment is known.
    pub fn resume(last_commitment: impl Into<String>) -> Self {
        Self {
            last_commitment: Some(last_commitment.into()),
        }
    }

    pub fn last_commitment(&self) -> Option<&str> {
        self.last_commitment.as_deref()
    }

    pub fn seal(&mut self, payload: Map<String, Value>) -> AuditRecord {
        let commitment = compute_commitment(self.last_commitment.as_deref(), &payload);
        let record = AuditRecord {
            commitment: Some(commitment.clone()),
            back_link: self.last_commitment.take(),
            payload,
        };
        self.last_commitment = Some(commitment);
        record
    }

    pub fn seal_all<I>(&mut self, payloads: I) -> Vec<AuditRecord>
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        payloads.into_iter().map(|p| self.seal(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::verify;
    use serde_json::json;

    fn payload(n: i64) -> Map<String, Value> {
        match json!({"request_id": format!("req-{}", n), "compliance_score": n}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_sealed_chain_verifies() {
        let mut sealer = ChainSealer::new();
        let records = sealer.seal_all((0..5).map(payload));

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].back_link, None);
        assert_eq!(records[1].back_link, records[0].commitment);
        assert_eq!(sealer.last_commitment(), records[4].commitment.as_deref());
        assert!(verify(&records));
    }

    #[test]
    fn test_commitment_is_deterministic_and_hex() {
        let a = compute_commitment(Some("abc"), &payload(1));
        let b = compute_commitment(Some("abc"), &payload(1));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, compute_commitment(None, &payload(1)));
    }

    #[test]
    fn test_known_commitments() {
        assert_eq!(
            compute_commitment(None, &payload(1)),
            "a3c951a27533622df1a99f039543cb86db1d6a033210c914047a38e5ad0bfb67"
        );
        assert_eq!(
            compute_commitment(Some("abc"), &payload(1)),
            "ea2b40c9173b0b58f977f828facf3584b9ceb6e2ce7f4a1cc4dfbca239f253b7"
        );
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let nested = match json!({"b": {"z": 1, "a": [{"y": 2, "x": 3}]}, "a": true}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(
            canonical_json(&nested),
            r#"{"a":true,"b":{"a":[{"x":3,"y":2}],"z":1}}"#
        );
        assert_eq!(
            compute_commitment(None, &nested),
            "810b3d708fe879155196b4f83abda6e97a7290aeda32916f8a36a1b6b73ac8ac"
        );
    }

    #[test]
    fn test_empty_back_link_differs_from_genesis() {
        assert_ne!(
            compute_commitment(Some(""), &payload(1)),
            compute_commitment(None, &payload(1))
        );
    }

    #[test]
    fn test_resume_links_to_previous_tail() {
        let mut first = ChainSealer::new();
        let mut records = first.seal_all((0..2).map(payload));

        let tail = first.last_commitment().unwrap().to_string();
        let mut resumed = ChainSealer::resume(tail);
        records.extend(resumed.seal_all((2..4).map(payload)));

        assert!(verify(&records));
    }
}
