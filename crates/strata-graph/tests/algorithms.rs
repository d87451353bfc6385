use std::collections::BTreeMap;

use strata_core::codes;
use strata_graph::algorithms::degree_attribute_name;
use strata_graph::{
    canonical_hash, connected_components, degree_centrality, density, dichotomize,
    project_two_mode, random_alter, random_node, shortest_path, symmetrize, AlterSampling,
    AttributeType, AttributeValue, Condition, DichotomizeOptions, Directionality, EdgeTraversal,
    EdgeType, Network, NodeId, Nodeset, Payload, RngHandle, SymmetrizeMethod,
};

fn node(raw: u32) -> NodeId {
    NodeId::from_raw(raw)
}

fn path_network() -> Network {
    let mut net = Network::new("path", Nodeset::with_nodes("nodes", 5).unwrap());
    net.add_layer_one_mode("line", Directionality::Undirected, EdgeType::Binary, false)
        .unwrap();
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
        net.add_edge("line", node(a), node(b), 1.0).unwrap();
    }
    net
}

fn valued_network() -> Network {
    let mut net = Network::new("trade", Nodeset::with_nodes("nodes", 4).unwrap());
    net.add_layer_one_mode("flows", Directionality::Directed, EdgeType::Valued, false)
        .unwrap();
    for (a, b, value) in [(0, 1, 5.0), (1, 0, 2.0), (1, 2, 1.0), (2, 3, 8.0)] {
        net.add_edge("flows", node(a), node(b), value).unwrap();
    }
    net
}

#[test]
fn five_node_path_is_one_component_with_density_point_four() {
    let mut net = path_network();
    let summary = connected_components(&mut net, Some("line"), "component").unwrap();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.sizes, vec![5]);
    assert!((density(&net, "line").unwrap() - 0.4).abs() < 1e-12);
    for raw in 0..5 {
        assert_eq!(
            net.get_attribute(node(raw), "component").unwrap(),
            Some(AttributeValue::Integer(0))
        );
    }
}

#[test]
fn components_are_numbered_by_first_visit_and_sized_descending() {
    let mut net = Network::new("islands", Nodeset::with_nodes("nodes", 6).unwrap());
    net.add_layer_one_mode("d", Directionality::Directed, EdgeType::Binary, false)
        .unwrap();
    net.add_edge("d", node(4), node(1), 1.0).unwrap();
    net.add_edge("d", node(2), node(3), 1.0).unwrap();
    net.add_edge("d", node(5), node(3), 1.0).unwrap();

    let summary = connected_components(&mut net, Some("d"), "cc").unwrap();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.sizes, vec![3, 2, 1]);
    assert_eq!(summary.component(node(0)), Some(0));
    assert_eq!(summary.component(node(1)), Some(1));
    assert_eq!(summary.component(node(4)), Some(1));
    assert_eq!(summary.component(node(2)), Some(2));
    assert!(summary.same_component(node(5), node(2)));

    let payload = summary.to_payload();
    assert_eq!(payload.get("count").and_then(Payload::as_i64), Some(3));
}

#[test]
fn connected_components_is_idempotent() {
    let mut net = Network::new("n", Nodeset::with_nodes("nodes", 7).unwrap());
    net.add_layer_one_mode("u", Directionality::Undirected, EdgeType::Binary, false)
        .unwrap();
    for (a, b) in [(0, 3), (3, 6), (1, 5)] {
        net.add_edge("u", node(a), node(b), 1.0).unwrap();
    }
    let first = connected_components(&mut net, Some("u"), "cc").unwrap();
    let second = connected_components(&mut net, Some("u"), "cc").unwrap();
    assert_eq!(first.partition(), second.partition());
}

#[test]
fn component_attribute_type_conflict_writes_nothing() {
    let mut net = path_network();
    net.define_attribute("component", AttributeType::Boolean)
        .unwrap();
    let before = canonical_hash(&net);
    let err = connected_components(&mut net, Some("line"), "component").unwrap_err();
    assert_eq!(err.code(), codes::ATTRIBUTE_TYPE_CONFLICT);
    assert_eq!(canonical_hash(&net), before);
}

#[test]
fn shortest_path_reports_hops_zero_and_unreachable() {
    let mut net = path_network();
    net.add_node().unwrap();
    let isolated = node(5);

    assert_eq!(
        shortest_path(&net, Some("line"), node(0), node(4), EdgeTraversal::Both).unwrap(),
        4
    );
    assert_eq!(
        shortest_path(&net, Some("line"), node(2), node(2), EdgeTraversal::Both).unwrap(),
        0
    );
    assert_eq!(
        shortest_path(&net, None, node(0), isolated, EdgeTraversal::Both).unwrap(),
        -1
    );
    let err = shortest_path(&net, Some("line"), node(0), node(42), EdgeTraversal::Both)
        .unwrap_err();
    assert_eq!(err.code(), codes::NODE_NOT_FOUND);
}

#[test]
fn shortest_path_respects_direction_and_pools_layers() {
    let mut net = Network::new("n", Nodeset::with_nodes("nodes", 4).unwrap());
    net.add_layer_one_mode("d", Directionality::Directed, EdgeType::Binary, false)
        .unwrap();
    net.add_layer_two_mode("clubs").unwrap();
    net.add_edge("d", node(0), node(1), 1.0).unwrap();
    net.add_edge("d", node(1), node(2), 1.0).unwrap();
    net.add_hyperedge("clubs", "x", &[node(2), node(3)]).unwrap();

    assert_eq!(
        shortest_path(&net, Some("d"), node(0), node(2), EdgeTraversal::Out).unwrap(),
        2
    );
    assert_eq!(
        shortest_path(&net, Some("d"), node(2), node(0), EdgeTraversal::Out).unwrap(),
        -1
    );
    assert_eq!(
        shortest_path(&net, Some("d"), node(2), node(0), EdgeTraversal::In).unwrap(),
        2
    );
    assert_eq!(
        shortest_path(&net, None, node(0), node(3), EdgeTraversal::Out).unwrap(),
        3
    );
}

#[test]
fn degree_centrality_writes_float_attribute() {
    let mut net = valued_network();
    let report = degree_centrality(&mut net, "flows", EdgeTraversal::Both, None).unwrap();
    let attribute = degree_attribute_name("flows", EdgeTraversal::Both);
    assert_eq!(report.attribute, attribute);
    assert_eq!(report.degree(node(1)), Some(3.0));
    assert_eq!(
        net.get_attribute(node(3), &attribute).unwrap(),
        Some(AttributeValue::Float(1.0))
    );
    assert_eq!(report.max(), Some((node(1), 3.0)));
    assert!((report.mean() - 2.0).abs() < 1e-12);

    let indegree = degree_centrality(&mut net, "flows", EdgeTraversal::In, Some("indeg")).unwrap();
    let expected: BTreeMap<NodeId, f64> =
        [(node(0), 1.0), (node(1), 1.0), (node(2), 1.0), (node(3), 1.0)].into();
    assert_eq!(indegree.degrees, expected);
}

#[test]
fn degree_centrality_counts_two_mode_co_members() {
    let mut net = Network::new("n", Nodeset::with_nodes("nodes", 3).unwrap());
    net.add_layer_two_mode("aff").unwrap();
    net.add_hyperedge("aff", "a", &[node(0), node(1)]).unwrap();
    net.add_hyperedge("aff", "b", &[node(0), node(1), node(2)]).unwrap();
    let report = degree_centrality(&mut net, "aff", EdgeTraversal::Out, Some("deg")).unwrap();
    assert_eq!(report.degree(node(0)), Some(2.0));
    assert_eq!(report.degree(node(2)), Some(2.0));
}

#[test]
fn dichotomize_thresholds_and_defaults_to_original_values() {
    let mut net = valued_network();
    let created = dichotomize(
        &mut net,
        "flows",
        "strong",
        DichotomizeOptions::binary(Condition::GreaterOrEqual, 2.0),
    )
    .unwrap();
    assert_eq!(created, 3);
    let strong = net.layer("strong").unwrap().as_one_mode().unwrap();
    assert_eq!(strong.edge_type(), EdgeType::Binary);
    assert!(strong.directionality().is_directed());
    assert!(!strong.has_edge(node(1), node(2)));
    assert_eq!(strong.edge_value(node(2), node(3)), 1.0);

    let created = dichotomize(
        &mut net,
        "flows",
        "capped",
        DichotomizeOptions::new(Condition::Greater, 4.0).with_true_value(4.0),
    )
    .unwrap();
    assert_eq!(created, 4);
    let capped = net.layer("capped").unwrap().as_one_mode().unwrap();
    assert_eq!(capped.edge_type(), EdgeType::Valued);
    assert_eq!(capped.edge_value(node(2), node(3)), 4.0);
    assert_eq!(capped.edge_value(node(1), node(2)), 1.0);
}

#[test]
fn dichotomize_keeps_zero_values_on_the_true_branch() {
    let mut net = Network::new("zeros", Nodeset::with_nodes("nodes", 3).unwrap());
    net.add_layer_one_mode("flows", Directionality::Directed, EdgeType::Valued, false)
        .unwrap();
    net.add_edge("flows", node(0), node(1), 0.0).unwrap();
    net.add_edge("flows", node(1), node(2), 3.0).unwrap();

    let written = dichotomize(
        &mut net,
        "flows",
        "weak",
        DichotomizeOptions::new(Condition::Less, 1.0),
    )
    .unwrap();
    assert_eq!(written, 2);
    assert!(net.has_edge("weak", node(0), node(1)).unwrap());
    assert_eq!(net.edge_value("weak", node(0), node(1)).unwrap(), 0.0);

    let written = dichotomize(
        &mut net,
        "flows",
        "muted",
        DichotomizeOptions::new(Condition::Greater, 1.0)
            .with_true_value(0.0)
            .with_false_value(0.0),
    )
    .unwrap();
    assert_eq!(written, 1);
    assert!(net.has_edge("muted", node(1), node(2)).unwrap());
    assert!(!net.has_edge("muted", node(0), node(1)).unwrap());
}

#[test]
fn dichotomize_rejects_invalid_requests_without_mutation() {
    let mut net = valued_network();
    net.add_layer_one_mode("bin", Directionality::Directed, EdgeType::Binary, false)
        .unwrap();
    net.add_layer_two_mode("aff").unwrap();
    let before = canonical_hash(&net);

    let options = DichotomizeOptions::binary(Condition::Greater, 1.0);
    let err = dichotomize(&mut net, "flows", "bin", options).unwrap_err();
    assert_eq!(err.code(), codes::LAYER_ALREADY_EXISTS);
    let err = dichotomize(&mut net, "bin", "out", options).unwrap_err();
    assert_eq!(err.code(), codes::INVALID_LAYER_VALUE_TYPE);
    let err = dichotomize(&mut net, "aff", "out", options).unwrap_err();
    assert_eq!(err.code(), codes::INVALID_LAYER_MODE);
    let err = dichotomize(
        &mut net,
        "flows",
        "out",
        DichotomizeOptions::binary(Condition::IsNull, 0.0),
    )
    .unwrap_err();
    assert_eq!(err.code(), codes::INVALID_ARGUMENT);

    assert_eq!(canonical_hash(&net), before);
}

#[test]
fn symmetrize_combines_reciprocal_ties() {
    let mut net = valued_network();
    symmetrize(&mut net, "flows", SymmetrizeMethod::Max, "max").unwrap();
    symmetrize(&mut net, "flows", SymmetrizeMethod::Min, "min").unwrap();
    symmetrize(&mut net, "flows", SymmetrizeMethod::Sum, "sum").unwrap();
    symmetrize(&mut net, "flows", SymmetrizeMethod::Mutual, "mutual").unwrap();

    assert_eq!(net.edge_value("max", node(1), node(0)).unwrap(), 5.0);
    assert_eq!(net.edge_value("max", node(3), node(2)).unwrap(), 8.0);
    assert_eq!(net.edge_value("min", node(0), node(1)).unwrap(), 2.0);
    assert!(!net.has_edge("min", node(2), node(3)).unwrap());
    assert_eq!(net.edge_value("sum", node(0), node(1)).unwrap(), 7.0);
    assert_eq!(net.edge_count("mutual").unwrap(), 1);

    let err = symmetrize(&mut net, "max", SymmetrizeMethod::Max, "again").unwrap_err();
    assert_eq!(err.code(), codes::INVALID_LAYER_EDGE_DIRECTION);
}

#[test]
fn projection_counts_shared_hyperedges() {
    let mut net = Network::new("n", Nodeset::with_nodes("nodes", 3).unwrap());
    net.add_layer_two_mode("aff").unwrap();
    net.add_hyperedge("aff", "a", &[node(0), node(1), node(2)]).unwrap();
    net.add_hyperedge("aff", "b", &[node(0), node(1)]).unwrap();

    let created = project_two_mode(&mut net, "aff", "co").unwrap();
    assert_eq!(created, 3);
    assert_eq!(net.edge_value("co", node(1), node(0)).unwrap(), 2.0);
    assert_eq!(net.edge_value("co", node(2), node(1)).unwrap(), 1.0);
}

#[test]
fn random_node_is_uniform_and_reproducible() {
    let nodes = Nodeset::with_nodes("n", 4).unwrap();
    let mut rng = RngHandle::from_seed(11);
    let mut counts = [0usize; 4];
    for _ in 0..4_000 {
        counts[random_node(&nodes, &mut rng).unwrap().as_raw() as usize] += 1;
    }
    assert!(counts.iter().all(|count| (800..1_200).contains(count)));

    let mut a = RngHandle::from_seed(3);
    let mut b = RngHandle::from_seed(3);
    assert_eq!(
        random_node(&nodes, &mut a).unwrap(),
        random_node(&nodes, &mut b).unwrap()
    );

    let empty = Nodeset::new("empty");
    let err = random_node(&empty, &mut rng).unwrap_err();
    assert_eq!(err.code(), codes::CONSTRAINT_NO_NODES);
}

#[test]
fn balanced_and_pooled_alter_sampling_differ() {
    // Node 0 has alters {1, 2, 3} in "wide" and {4} in "narrow".
    let mut net = Network::new("n", Nodeset::with_nodes("nodes", 6).unwrap());
    net.add_layer_one_mode("wide", Directionality::Undirected, EdgeType::Binary, false)
        .unwrap();
    net.add_layer_one_mode("narrow", Directionality::Undirected, EdgeType::Binary, false)
        .unwrap();
    for target in 1..=3 {
        net.add_edge("wide", node(0), node(target), 1.0).unwrap();
    }
    net.add_edge("narrow", node(0), node(4), 1.0).unwrap();

    let mut rng = RngHandle::from_seed(99);
    let draws = 8_000;
    let mut pooled_hits = 0;
    let mut balanced_hits = 0;
    for _ in 0..draws {
        let pooled = random_alter(
            &net,
            node(0),
            None,
            EdgeTraversal::Both,
            AlterSampling::Pooled,
            &mut rng,
        )
        .unwrap();
        let balanced = random_alter(
            &net,
            node(0),
            None,
            EdgeTraversal::Both,
            AlterSampling::BalancedAcrossLayers,
            &mut rng,
        )
        .unwrap();
        pooled_hits += usize::from(pooled == node(4));
        balanced_hits += usize::from(balanced == node(4));
    }
    let pooled_share = pooled_hits as f64 / draws as f64;
    let balanced_share = balanced_hits as f64 / draws as f64;
    assert!((pooled_share - 0.25).abs() < 0.03);
    assert!((balanced_share - 0.5).abs() < 0.03);

    let err = random_alter(
        &net,
        node(5),
        Some("wide"),
        EdgeTraversal::Both,
        AlterSampling::Pooled,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err.code(), codes::CONSTRAINT_NO_ALTERS);
}
