//! Request and response shapes of the compliance API.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Standard `{ success, message, data, count }` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default, alias = "total_count")]
    pub total: Option<u64>,
}

impl<T> Envelope<T> {
    pub fn into_data(self, what: &str) -> ApiResult<T> {
        self.data
            .ok_or_else(|| ApiError::Decode(format!("response has no `data` for {}", what)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub request_text: String,
    pub response_text: String,
    pub project_id: String,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_threshold: Option<f64>,
}

impl AnalyzeRequest {
    pub fn validate(&self) -> ApiResult<()> {
        for (name, value) in [
            ("request_text", &self.request_text),
            ("response_text", &self.response_text),
            ("project_id", &self.project_id),
            ("api_key", &self.api_key),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::InvalidArgument(format!("{} is required", name)));
            }
        }
        if let Some(t) = self.validation_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(ApiError::InvalidArgument(
                    "validation_threshold must be between 0 and 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub compliance_score: Option<f64>,
    #[serde(default)]
    pub is_compliant: Option<bool>,
    #[serde(default)]
    pub compliance_issues: Vec<Value>,
    #[serde(default)]
    pub recommendations: Vec<Value>,
    #[serde(default)]
    pub frameworks_analyzed: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Project-level dashboard statistics. The server has used several names for
/// the same figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(default, alias = "total_compliance_requests")]
    pub total_requests: Option<u64>,
    #[serde(default, alias = "average_compliance_score", alias = "avg_compliance_score")]
    pub avg_score: Option<f64>,
    #[serde(default, alias = "compliant_requests_percentage")]
    pub compliant_pct: Option<f64>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Server-side chain verification result.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteVerdict {
    /// `None` when the response carried no recognisable verdict field.
    pub valid: Option<bool>,
    pub raw: Value,
}

impl RemoteVerdict {
    pub fn from_value(raw: Value) -> Self {
        let pick = |v: &Value| {
            ["valid", "chain_valid", "chain_verified"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_bool))
        };
        let valid = pick(&raw).or_else(|| raw.get("data").and_then(pick));
        Self { valid, raw }
    }
}

/// Tokens obtained from the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_verdict_field_variants() {
        assert_eq!(RemoteVerdict::from_value(json!({"valid": true})).valid, Some(true));
        assert_eq!(
            RemoteVerdict::from_value(json!({"chain_valid": false})).valid,
            Some(false)
        );
        assert_eq!(
            RemoteVerdict::from_value(json!({"chain_verified": true})).valid,
            Some(true)
        );
        assert_eq!(
            RemoteVerdict::from_value(json!({"success": true, "data": {"valid": true}})).valid,
            Some(true)
        );
        assert_eq!(RemoteVerdict::from_value(json!({"success": true})).valid, None);
    }

    #[test]
    fn test_project_stats_aliases() {
        let stats: ProjectStats = serde_json::from_value(json!({
            "total_compliance_requests": 12,
            "average_compliance_score": 0.75,
            "compliant_requests_percentage": 66.7,
            "risk_score": 0.1,
            "top_issues": []
        }))
        .unwrap();

        assert_eq!(stats.total_requests, Some(12));
        assert_eq!(stats.avg_score, Some(0.75));
        assert_eq!(stats.compliant_pct, Some(66.7));
        assert!(stats.extra.contains_key("top_issues"));
    }

    #[test]
    fn test_analyze_request_validation() {
        let mut req = AnalyzeRequest {
            request_text: "q".into(),
            response_text: "a".into(),
            project_id: "p1".into(),
            api_key: "k".into(),
            validation_threshold: Some(0.8),
        };
        assert!(req.validate().is_ok());

        req.validation_threshold = Some(1.5);
        assert!(req.validate().is_err());

        req.validation_threshold = None;
        req.project_id = " ".into();
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: project_id is required");
    }

    #[test]
    fn test_session_wire_names() {
        let session: Session =
            serde_json::from_value(json!({"accessToken": "a", "refreshToken": "r"})).unwrap();
        assert_eq!(session.access_token, "a");
        assert_eq!(session.refresh_token.as_deref(), Some("r"));
    }
}
