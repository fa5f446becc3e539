//! Aggregate compliance figures over a batch of records.

use crate::record::AuditRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub avg_score: f64,
}

/// Records without a numeric score still count towards the average's
/// denominator.
pub fn summarize(records: &[AuditRecord]) -> ComplianceSummary {
    if records.is_empty() {
        return ComplianceSummary::default();
    }

    let total = records.len();
    let compliant = records.iter().filter(|r| r.is_compliant()).count();
    let score_sum: f64 = records.iter().filter_map(|r| r.compliance_score()).sum();

    ComplianceSummary {
        total,
        compliant,
        non_compliant: total - compliant,
        avg_score: score_sum / total.max(1) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_summary() {
        assert_eq!(summarize(&[]), ComplianceSummary::default());
    }

    #[test]
    fn test_summary_counts_and_average() {
        let records = vec![
            AuditRecord::new("h1")
                .with_field("is_compliant", json!(true))
                .with_field("compliance_score", json!(0.9)),
            AuditRecord::new("h2")
                .with_field("is_compliant", json!(false))
                .with_field("compliance_score", json!(0.3)),
            AuditRecord::new("h3").with_field("compliance_score", json!("n/a")),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.compliant, 1);
        assert_eq!(summary.non_compliant, 2);
        assert!((summary.avg_score - 0.4).abs() < 1e-9);
    }
}
