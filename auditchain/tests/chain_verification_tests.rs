use auditchain::{first_break, verify, verify_value, AuditRecord, ChainError, ChainSealer};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn payload(n: usize) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("request_id".to_string(), json!(format!("req-{}", n)));
    map.insert("compliance_score".to_string(), json!(n as f64 / 100.0));
    map
}

fn sealed_chain(len: usize) -> Vec<AuditRecord> {
    ChainSealer::new().seal_all((0..len).map(payload))
}

#[test]
fn test_three_record_scenario() {
    let mut records = vec![
        AuditRecord::new("h1"),
        AuditRecord::new("h2").with_back_link("h1"),
        AuditRecord::new("h3").with_back_link("h2"),
    ];
    assert!(verify(&records));

    records[2].back_link = Some("hX".to_string());
    assert!(!verify(&records));
    assert_eq!(first_break(&records), Some(2));
}

#[test]
fn test_scenario_from_raw_json() {
    let doc = json!([
        {"hash_lock": "h1", "compliance_score": 0.9},
        {"hash_lock": "h2", "previous_hash": "h1"},
        {"hash_lock": "h3", "previous_hash": "h2"}
    ]);
    assert!(verify_value(&doc).unwrap());
}

#[test]
fn test_non_sequence_input_is_an_error_not_a_verdict() {
    let err = verify_value(&json!({"data": []})).unwrap_err();
    assert!(matches!(err, ChainError::InvalidArgument(_)));
}

#[test]
fn test_reversed_chain_fails() {
    let mut records = sealed_chain(5);
    records.reverse();
    assert!(!verify(&records));
}

#[test]
fn test_first_record_back_link_is_ignored() {
    let mut records = sealed_chain(3);
    records[0].back_link = Some("anything".to_string());
    assert!(verify(&records));
}

proptest! {
    #[test]
    fn prop_sealed_chains_verify(len in 0usize..40) {
        prop_assert!(verify(&sealed_chain(len)));
    }

    #[test]
    fn prop_single_mutation_breaks(len in 2usize..40, pick in any::<prop::sample::Index>(), junk in "[a-z]{1,12}") {
        let mut records = sealed_chain(len);
        let i = 1 + pick.index(len - 1);
        records[i].back_link = Some(format!("tampered-{}", junk));

        prop_assert!(!verify(&records));
        prop_assert_eq!(first_break(&records), Some(i));
    }

    #[test]
    fn prop_single_record_always_valid(back_link in proptest::option::of("[a-f0-9]{0,64}")) {
        let mut record = AuditRecord::new("only");
        record.back_link = back_link;
        prop_assert!(verify(&[record]));
    }

    #[test]
    fn prop_any_reordering_breaks(
        order in Just((0usize..8).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let records = sealed_chain(order.len());
        let identity: Vec<usize> = (0..order.len()).collect();
        prop_assume!(order != identity);

        let shuffled: Vec<AuditRecord> = order.iter().map(|&i| records[i].clone()).collect();
        prop_assert!(!verify(&shuffled));
    }
}
