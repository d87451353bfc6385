use strata_core::codes;
use strata_graph::summary::percentile;
use strata_graph::{
    summarize_attribute, AttributeSummary, AttributeType, AttributeValue, NodeId, Nodeset, Payload,
};

fn node(raw: u32) -> NodeId {
    NodeId::from_raw(raw)
}

#[test]
fn percentiles_interpolate_linearly() {
    let sorted = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(percentile(&sorted, 0.0), Some(1.0));
    assert_eq!(percentile(&sorted, 50.0), Some(2.5));
    assert_eq!(percentile(&sorted, 25.0), Some(1.75));
    assert_eq!(percentile(&sorted, 100.0), Some(4.0));
    assert_eq!(percentile(&[], 50.0), None);
}

#[test]
fn numeric_summary_uses_population_deviation_and_skips_missing() {
    let mut nodes = Nodeset::with_nodes("n", 5).unwrap();
    nodes.define_attribute("x", AttributeType::Float).unwrap();
    for (raw, value) in [(0, 2.0), (1, 4.0), (2, 4.0), (3, 6.0)] {
        nodes
            .set_attribute(node(raw), "x", AttributeValue::Float(value))
            .unwrap();
    }

    let AttributeSummary::Numeric(summary) = summarize_attribute(&nodes, "x").unwrap() else {
        panic!("expected numeric summary");
    };
    assert_eq!(summary.count, 4);
    assert_eq!(summary.missing, 1);
    let stats = summary.stats.unwrap();
    assert_eq!(stats.mean, 4.0);
    assert!((stats.std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
    assert_eq!((stats.min, stats.max), (2.0, 6.0));
    assert_eq!(stats.median, 4.0);
    assert_eq!(stats.p25, 3.5);
    assert_eq!(stats.p75, 4.5);
}

#[test]
fn empty_numeric_summary_has_no_stats() {
    let mut nodes = Nodeset::with_nodes("n", 2).unwrap();
    nodes.define_attribute("x", AttributeType::Integer).unwrap();
    let summary = summarize_attribute(&nodes, "x").unwrap();
    let AttributeSummary::Numeric(numeric) = &summary else {
        panic!("expected numeric summary");
    };
    assert!(numeric.stats.is_none());
    assert_eq!(summary.to_payload().get("missing").and_then(Payload::as_i64), Some(2));
}

#[test]
fn boolean_summary_reports_share_of_true() {
    let mut nodes = Nodeset::with_nodes("n", 4).unwrap();
    nodes.define_attribute("member", AttributeType::Boolean).unwrap();
    for (raw, value) in [(0, true), (1, false), (2, true), (3, true)] {
        nodes
            .set_attribute(node(raw), "member", AttributeValue::Boolean(value))
            .unwrap();
    }
    let AttributeSummary::Boolean(summary) = summarize_attribute(&nodes, "member").unwrap() else {
        panic!("expected boolean summary");
    };
    assert_eq!((summary.true_count, summary.false_count), (3, 1));
    assert_eq!(summary.percent_true, Some(75.0));
}

#[test]
fn character_mode_ties_go_to_first_encountered() {
    let mut nodes = Nodeset::with_nodes("n", 5).unwrap();
    nodes.define_attribute("grade", AttributeType::Character).unwrap();
    for (raw, grade) in [(0, 'b'), (1, 'a'), (2, 'a'), (3, 'b'), (4, 'c')] {
        nodes
            .set_attribute(node(raw), "grade", AttributeValue::Character(grade))
            .unwrap();
    }
    let summary = summarize_attribute(&nodes, "grade").unwrap();
    let AttributeSummary::Character(chars) = &summary else {
        panic!("expected character summary");
    };
    assert_eq!(chars.frequencies, vec![('b', 2), ('a', 2), ('c', 1)]);
    assert_eq!(chars.mode, Some('b'));

    let json = serde_json::to_value(summary.to_payload()).unwrap();
    assert_eq!(json["mode"], "b");
    assert_eq!(json["frequencies"]["a"], 2);
}

#[test]
fn unknown_attribute_cannot_be_summarised() {
    let nodes = Nodeset::with_nodes("n", 1).unwrap();
    let err = summarize_attribute(&nodes, "nope").unwrap_err();
    assert_eq!(err.code(), codes::ATTRIBUTE_NOT_FOUND);
}
