//! Audit records and the link accessors the verifier works through.

use crate::error::{ChainError, ChainResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire name of a record's own commitment.
pub const COMMITMENT_FIELD: &str = "hash_lock";
/// Wire name of a record's claimed predecessor commitment.
pub const BACK_LINK_FIELD: &str = "previous_hash";

/// Anything that exposes a forward commitment and a back-link.
///
/// Both are optional: an absent value never matches anything.
pub trait ChainLink {
    fn commitment(&self) -> Option<&str>;
    fn back_link(&self) -> Option<&str>;
}

/// One entry of a server-issued compliance chain.
///
/// Only the two hash fields take part in verification; everything else the
/// server sends is kept as opaque payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "hash_lock", default, skip_serializing_if = "Option::is_none")]
    pub commitment: Option<String>,
    #[serde(rename = "previous_hash", default, skip_serializing_if = "Option::is_none")]
    pub back_link: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl AuditRecord {
    pub fn new(commitment: impl Into<String>) -> Self {
        Self {
            commitment: Some(commitment.into()),
            ..Self::default()
        }
    }

    pub fn with_back_link(mut self, back_link: impl Into<String>) -> Self {
        self.back_link = Some(back_link.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Build a record from a JSON object.
    ///
    /// Hash fields that are null or not strings are read as absent; a value
    /// that is not an object at all is rejected.
    pub fn from_value(value: &Value) -> ChainResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            ChainError::InvalidArgument(format!(
                "expected a record object, got {}",
                json_kind(value)
            ))
        })?;

        let mut payload = object.clone();
        let commitment = payload
            .remove(COMMITMENT_FIELD)
            .and_then(|v| v.as_str().map(str::to_string));
        let back_link = payload
            .remove(BACK_LINK_FIELD)
            .and_then(|v| v.as_str().map(str::to_string));

        Ok(Self {
            commitment,
            back_link,
            payload,
        })
    }

    pub fn request_id(&self) -> Option<&str> {
        self.payload
            .get("request_id")
            .or_else(|| self.payload.get("id"))
            .or_else(|| self.payload.get("_id"))
            .and_then(Value::as_str)
    }

    pub fn compliance_score(&self) -> Option<f64> {
        self.payload.get("compliance_score").and_then(Value::as_f64)
    }

    pub fn is_compliant(&self) -> bool {
        self.payload
            .get("is_compliant")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl ChainLink for AuditRecord {
    fn commitment(&self) -> Option<&str> {
        self.commitment.as_deref()
    }

    fn back_link(&self) -> Option<&str> {
        self.back_link.as_deref()
    }
}

impl ChainLink for Value {
    fn commitment(&self) -> Option<&str> {
        self.get(COMMITMENT_FIELD).and_then(Value::as_str)
    }

    fn back_link(&self) -> Option<&str> {
        self.get(BACK_LINK_FIELD).and_then(Value::as_str)
    }
}

impl<L: ChainLink + ?Sized> ChainLink for &L {
    fn commitment(&self) -> Option<&str> {
        (**self).commitment()
    }

    fn back_link(&self) -> Option<&str> {
        (**self).back_link()
    }
}

/// Extract records from a JSON document.
///
/// Accepts either a bare array of record objects or a response envelope whose
/// `data` field is such an array.
pub fn records_from_value(value: &Value) -> ChainResult<Vec<AuditRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ChainError::InvalidArgument(
                    "expected an array of records or an object with a `data` array".to_string(),
                ))
            }
        },
        other => {
            return Err(ChainError::InvalidArgument(format!(
                "expected an array of records, got {}",
                json_kind(other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            AuditRecord::from_value(item).map_err(|e| match e {
                ChainError::InvalidArgument(msg) => {
                    ChainError::InvalidArgument(format!("record {}: {}", i, msg))
                }
                other => other,
            })
        })
        .collect()
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names_round_trip() {
        let record: AuditRecord = serde_json::from_value(json!({
            "hash_lock": "h2",
            "previous_hash": "h1",
            "compliance_score": 0.92,
            "is_compliant": true,
            "request_id": "req-7"
        }))
        .unwrap();

        assert_eq!(record.commitment.as_deref(), Some("h2"));
        assert_eq!(record.back_link.as_deref(), Some("h1"));
        assert_eq!(record.request_id(), Some("req-7"));
        assert_eq!(record.compliance_score(), Some(0.92));
        assert!(record.is_compliant());

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["hash_lock"], "h2");
        assert_eq!(back["previous_hash"], "h1");
        assert_eq!(back["compliance_score"], 0.92);
    }

    #[test]
    fn test_from_value_is_lenient_on_hash_fields() {
        let record = AuditRecord::from_value(&json!({
            "hash_lock": 42,
            "previous_hash": null,
            "text": "hello"
        }))
        .unwrap();

        assert_eq!(record.commitment, None);
        assert_eq!(record.back_link, None);
        assert_eq!(record.payload.get("text"), Some(&json!("hello")));
        assert!(!record.payload.contains_key(COMMITMENT_FIELD));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        let err = AuditRecord::from_value(&json!("h1")).unwrap_err();
        assert!(matches!(err, ChainError::InvalidArgument(_)));
    }

    #[test]
    fn test_records_from_envelope() {
        let records = records_from_value(&json!({
            "success": true,
            "data": [{"hash_lock": "h1"}, {"hash_lock": "h2", "previous_hash": "h1"}]
        }))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].back_link.as_deref(), Some("h1"));
    }

    #[test]
    fn test_records_from_value_reports_offending_index() {
        let err = records_from_value(&json!([{"hash_lock": "h1"}, 7])).unwrap_err();
        match err {
            ChainError::InvalidArgument(msg) => assert!(msg.starts_with("record 1:"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_records_from_value_rejects_scalars() {
        assert!(records_from_value(&json!("nope")).is_err());
        assert!(records_from_value(&json!({"data": "nope"})).is_err());
        assert!(records_from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_value_link_accessors() {
        let v = json!({"hash_lock": "h3", "previous_hash": "h2"});
        assert_eq!(ChainLink::commitment(&v), Some("h3"));
        assert_eq!(ChainLink::back_link(&v), Some("h2"));
        assert_eq!(ChainLink::back_link(&json!({"previous_hash": 1})), None);
    }
}
