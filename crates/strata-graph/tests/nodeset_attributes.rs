use strata_core::codes;
use strata_graph::{
    nodeset_hash, AttributeType, AttributeValue, Condition, IdPolicy, NodeId, Nodeset,
    StrataError, MAX_ATTRIBUTES,
};

fn node(raw: u32) -> NodeId {
    NodeId::from_raw(raw)
}

#[test]
fn integer_attribute_round_trips_and_undefine_reports_missing() {
    let mut nodes = Nodeset::with_nodes("people", 3).unwrap();
    nodes.define_attribute("x", AttributeType::Integer).unwrap();
    nodes
        .set_attribute(node(1), "x", AttributeValue::Integer(42))
        .unwrap();

    let value = nodes.get_attribute(node(1), "x").unwrap();
    assert_eq!(value, Some(AttributeValue::Integer(42)));
    assert_eq!(value.unwrap().kind(), AttributeType::Integer);
    assert_eq!(nodes.get_attribute(node(0), "x").unwrap(), None);

    nodes.undefine_attribute("x").unwrap();
    let err = nodes.get_attribute(node(1), "x").unwrap_err();
    assert_eq!(err.code(), codes::ATTRIBUTE_NOT_FOUND);

    nodes.define_attribute("x", AttributeType::Integer).unwrap();
    assert_eq!(nodes.get_attribute(node(1), "x").unwrap(), None);
}

#[test]
fn redefinition_is_idempotent_but_type_change_conflicts() {
    let mut nodes = Nodeset::with_nodes("n", 1).unwrap();
    let first = nodes.define_attribute("age", AttributeType::Integer).unwrap();
    let again = nodes.define_attribute("age", AttributeType::Integer).unwrap();
    assert_eq!(first, again);

    let err = nodes
        .define_attribute("age", AttributeType::Float)
        .unwrap_err();
    assert!(matches!(err, StrataError::Shape(_)));
    assert_eq!(err.code(), codes::ATTRIBUTE_TYPE_CONFLICT);
    assert_eq!(err.info().context.get("attribute"), Some(&"age".to_string()));
}

#[test]
fn attribute_names_are_case_sensitive() {
    let mut nodes = Nodeset::with_nodes("n", 1).unwrap();
    nodes.define_attribute("Age", AttributeType::Integer).unwrap();
    nodes.define_attribute("age", AttributeType::Boolean).unwrap();
    assert_eq!(nodes.attributes().len(), 2);
}

#[test]
fn freed_index_is_recycled_without_stale_values() {
    let mut nodes = Nodeset::with_nodes("n", 2).unwrap();
    let a = nodes.define_attribute("a", AttributeType::Integer).unwrap();
    let b = nodes.define_attribute("b", AttributeType::Float).unwrap();
    assert_eq!((a.as_raw(), b.as_raw()), (0, 1));
    nodes
        .set_attribute(node(0), "a", AttributeValue::Integer(7))
        .unwrap();

    nodes.undefine_attribute("a").unwrap();
    let c = nodes.define_attribute("c", AttributeType::Integer).unwrap();
    assert_eq!(c, a);
    assert_eq!(nodes.get_attribute(node(0), "c").unwrap(), None);
}

#[test]
fn attribute_limit_is_enforced() {
    let mut nodes = Nodeset::new("wide");
    for i in 0..MAX_ATTRIBUTES {
        nodes
            .define_attribute(&format!("a{i}"), AttributeType::Boolean)
            .unwrap();
    }
    let err = nodes
        .define_attribute("overflow", AttributeType::Boolean)
        .unwrap_err();
    assert_eq!(err.code(), codes::CONSTRAINT_ATTRIBUTE_LIMIT);
}

#[test]
fn value_type_must_match_definition() {
    let mut nodes = Nodeset::with_nodes("n", 1).unwrap();
    nodes.define_attribute("flag", AttributeType::Boolean).unwrap();
    let err = nodes
        .set_attribute(node(0), "flag", AttributeValue::Integer(1))
        .unwrap_err();
    assert_eq!(err.code(), codes::ATTRIBUTE_TYPE_MISMATCH);
    assert_eq!(nodes.get_attribute(node(0), "flag").unwrap(), None);
}

#[test]
fn unknown_node_and_attribute_are_lookup_errors() {
    let mut nodes = Nodeset::with_nodes("n", 1).unwrap();
    nodes.define_attribute("x", AttributeType::Integer).unwrap();
    let err = nodes
        .set_attribute(node(9), "x", AttributeValue::Integer(1))
        .unwrap_err();
    assert!(matches!(err, StrataError::Lookup(_)));
    assert_eq!(err.code(), codes::NODE_NOT_FOUND);

    let err = nodes.get_attribute(node(0), "y").unwrap_err();
    assert_eq!(err.code(), codes::ATTRIBUTE_NOT_FOUND);
}

#[test]
fn removed_ids_leave_a_gap_and_are_not_reused() {
    let mut nodes = Nodeset::with_nodes("n", 3).unwrap();
    nodes.remove_node(node(1)).unwrap();
    let fresh = nodes.add_node().unwrap();
    assert_eq!(fresh, node(3));
    assert_eq!(nodes.node_ids(), vec![node(0), node(2), node(3)]);
    assert_eq!(
        nodes.remove_node(node(1)).unwrap_err().code(),
        codes::NODE_NOT_FOUND
    );
}

#[test]
fn explicit_ids_continue_the_sequence() {
    let mut nodes = Nodeset::new("imported");
    nodes.add_node_with_id(node(10)).unwrap();
    assert_eq!(nodes.add_node().unwrap(), node(11));
    let err = nodes.add_node_with_id(node(10)).unwrap_err();
    assert_eq!(err.code(), codes::NODE_ALREADY_EXISTS);
}

#[test]
fn clone_preserves_or_renumbers_ids() {
    let mut nodes = Nodeset::with_nodes("n", 4).unwrap();
    nodes.define_attribute("w", AttributeType::Float).unwrap();
    nodes
        .set_attribute(node(3), "w", AttributeValue::Float(2.5))
        .unwrap();
    nodes.remove_node(node(0)).unwrap();

    let kept = nodes.clone_as("kept", IdPolicy::Preserve);
    assert_eq!(kept.node_ids(), vec![node(1), node(2), node(3)]);
    assert_eq!(
        kept.get_attribute(node(3), "w").unwrap(),
        Some(AttributeValue::Float(2.5))
    );

    let renumbered = nodes.clone_as("renumbered", IdPolicy::Renumber);
    assert_eq!(renumbered.node_ids(), vec![node(0), node(1), node(2)]);
    assert_eq!(
        renumbered.get_attribute(node(2), "w").unwrap(),
        Some(AttributeValue::Float(2.5))
    );
    assert_eq!(renumbered.name(), "renumbered");
}

#[test]
fn clear_attribute_makes_value_missing() {
    let mut nodes = Nodeset::with_nodes("n", 1).unwrap();
    nodes.define_attribute("c", AttributeType::Character).unwrap();
    nodes
        .set_attribute(node(0), "c", AttributeValue::Character('q'))
        .unwrap();
    assert!(nodes.clear_attribute(node(0), "c").unwrap());
    assert!(!nodes.clear_attribute(node(0), "c").unwrap());
    assert_eq!(nodes.get_attribute(node(0), "c").unwrap(), None);
}

#[test]
fn filter_selects_by_condition_and_presence() {
    let mut nodes = Nodeset::with_nodes("n", 4).unwrap();
    nodes.define_attribute("score", AttributeType::Integer).unwrap();
    for (raw, score) in [(0, 5), (1, 10), (2, 15)] {
        nodes
            .set_attribute(node(raw), "score", AttributeValue::Integer(score))
            .unwrap();
    }

    let high = nodes
        .filter(
            "high",
            "score",
            Condition::GreaterOrEqual,
            Some(AttributeValue::Integer(10)),
        )
        .unwrap();
    assert_eq!(high.node_ids(), vec![node(1), node(2)]);
    assert_eq!(
        high.get_attribute(node(2), "score").unwrap(),
        Some(AttributeValue::Integer(15))
    );

    let missing = nodes.filter("missing", "score", Condition::IsNull, None).unwrap();
    assert_eq!(missing.node_ids(), vec![node(3)]);

    let err = nodes
        .filter(
            "bad",
            "score",
            Condition::Equal,
            Some(AttributeValue::Boolean(true)),
        )
        .unwrap_err();
    assert_eq!(err.code(), codes::ATTRIBUTE_TYPE_MISMATCH);
}

#[test]
fn textual_values_parse_by_declared_type() {
    let kind: AttributeType = "int".parse().unwrap();
    assert_eq!(kind.parse_value(" 12 ").unwrap(), AttributeValue::Integer(12));
    let kind: AttributeType = "bool".parse().unwrap();
    assert_eq!(kind.parse_value("true").unwrap(), AttributeValue::Boolean(true));
    assert_eq!(
        AttributeType::Character.parse_value("z").unwrap(),
        AttributeValue::Character('z')
    );
    assert_eq!(
        AttributeType::Integer.parse_value("1.5").unwrap_err().code(),
        codes::INVALID_ARGUMENT
    );
}

#[test]
fn nodeset_hash_follows_observable_state() {
    let mut nodes = Nodeset::with_nodes("people", 4).unwrap();
    nodes.define_attribute("age", AttributeType::Integer).unwrap();
    let copy = nodes.clone_as("people", IdPolicy::Preserve);
    assert_eq!(nodeset_hash(&nodes), nodeset_hash(&copy));

    nodes
        .set_attribute(node(2), "age", AttributeValue::Integer(30))
        .unwrap();
    assert_ne!(nodeset_hash(&nodes), nodeset_hash(&copy));
    assert_ne!(
        nodeset_hash(&copy),
        nodeset_hash(&copy.clone_as("others", IdPolicy::Preserve))
    );
}
