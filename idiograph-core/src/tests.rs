//! Crate-level scenario and property tests for the decomposition pipeline.
//!
//! Scenario tests pin the three observed extraction flavours end to end;
//! proptest runners cover the structural invariants (partition completeness,
//! threshold monotonicity, view self-containment) on randomly generated
//! graphs.

use std::collections::HashSet;

use proptest::prelude::*;
use rstest::rstest;

use crate::{
    DecomposerBuilder, Edge, IdiomGraph, Node, OutputMode, Partition, SizePolicy, SubgraphView,
};

/// Appends a chain component of `size` nodes named `prefix0..prefixN`, with
/// every link carrying `weight`.
fn push_chain(graph: &mut IdiomGraph, prefix: &str, size: usize, weight: u64) {
    let ids: Vec<String> = (0..size).map(|i| format!("{prefix}{i}")).collect();
    for id in &ids {
        graph.nodes.push(Node::new(id.clone()));
    }
    for pair in ids.windows(2) {
        graph.edges.push(Edge::new(pair[0].clone(), pair[1].clone(), weight));
    }
}

fn node_ids(view: &SubgraphView) -> HashSet<&str> {
    view.nodes.iter().map(|node| node.id.as_str()).collect()
}

fn assert_self_contained(view: &SubgraphView) {
    let ids = node_ids(view);
    for edge in &view.edges {
        assert!(ids.contains(edge.source.as_str()), "dangling source {}", edge.source);
        assert!(ids.contains(edge.target.as_str()), "dangling target {}", edge.target);
    }
}

#[test]
fn exact_size_extraction_keeps_only_the_trio() {
    let graph = IdiomGraph {
        nodes: vec![Node::new("A"), Node::new("B"), Node::new("C"), Node::new("D")],
        edges: vec![
            Edge::new("A", "B", 4),
            Edge::new("B", "C", 4),
            Edge::new("C", "D", 1),
        ],
    };

    let result = DecomposerBuilder::new()
        .with_min_weight(3)
        .with_policy(SizePolicy::Exact { size: 3 })
        .with_output_mode(OutputMode::Merged)
        .build()
        .expect("policy is valid")
        .run(&graph)
        .expect("graph is well formed");

    assert_eq!(result.selected_components(), 1);
    let view = &result.views()[0];
    assert_eq!(node_ids(view), HashSet::from(["A", "B", "C"]));
    let pairs: Vec<_> = view.edges.iter().map(Edge::canonical_pair).collect();
    assert_eq!(pairs, vec![("A", "B"), ("B", "C")]);
}

#[test]
fn range_extraction_merges_qualifying_components() {
    let mut graph = IdiomGraph::default();
    push_chain(&mut graph, "p", 7, 4);
    push_chain(&mut graph, "q", 9, 4);
    push_chain(&mut graph, "r", 20, 4);

    let result = DecomposerBuilder::new()
        .with_policy(SizePolicy::Range { lower: 5, upper: 11 })
        .with_output_mode(OutputMode::Merged)
        .build()
        .expect("policy is valid")
        .run(&graph)
        .expect("graph is well formed");

    assert_eq!(result.selected_components(), 2);
    assert_eq!(result.views().len(), 1);
    let view = &result.views()[0];
    assert_eq!(view.nodes.len(), 16);
    assert_eq!(view.edges.len(), 6 + 8);
    assert_self_contained(view);

    // No edge may straddle the two merged chains.
    for edge in &view.edges {
        assert_eq!(&edge.source[..1], &edge.target[..1]);
    }
}

#[test]
fn minimum_size_policy_emits_separate_views() {
    let mut graph = IdiomGraph::default();
    push_chain(&mut graph, "big", 12, 4);
    push_chain(&mut graph, "huge", 15, 4);
    push_chain(&mut graph, "tiny", 3, 4);

    let result = DecomposerBuilder::new()
        .with_policy(SizePolicy::Minimum { min: 10 })
        .build()
        .expect("policy is valid")
        .run(&graph)
        .expect("graph is well formed");

    assert_eq!(result.selected_components(), 2);
    assert_eq!(result.views().len(), 2);
    assert_eq!(result.views()[0].nodes.len(), 12);
    assert_eq!(result.views()[1].nodes.len(), 15);
    for view in result.views() {
        assert_self_contained(view);
    }
}

#[test]
fn empty_selection_is_a_valid_outcome() {
    let graph = IdiomGraph {
        nodes: vec![Node::new("A"), Node::new("B")],
        edges: vec![Edge::new("A", "B", 4)],
    };

    let result = DecomposerBuilder::new()
        .with_policy(SizePolicy::Minimum { min: 10 })
        .build()
        .expect("policy is valid")
        .run(&graph)
        .expect("graph is well formed");

    assert!(result.is_empty());
    assert!(result.views().is_empty());
}

#[test]
fn node_metadata_is_copied_through_unchanged() {
    let mut node = Node::new("唇亡齿寒");
    node.explanation = "interdependence of neighbours".to_owned();
    node.similar = vec!["互相依存".to_owned()];
    node.opposite = vec!["各自为政".to_owned()];
    let mut partner = Node::new("同舟共济");
    partner.explanation = "pull together in hard times".to_owned();

    let mut edge = Edge::new("唇亡齿寒", "同舟共济", 6);
    edge.questions = vec!["2019-47".to_owned(), "2021-12".to_owned()];

    let graph = IdiomGraph {
        nodes: vec![node.clone(), partner.clone()],
        edges: vec![edge.clone()],
    };

    let result = DecomposerBuilder::new()
        .with_policy(SizePolicy::Exact { size: 2 })
        .with_output_mode(OutputMode::Merged)
        .build()
        .expect("policy is valid")
        .run(&graph)
        .expect("graph is well formed");

    let view = &result.views()[0];
    assert_eq!(view.nodes, vec![node, partner]);
    assert_eq!(view.edges, vec![edge]);
}

#[test]
fn views_serialize_to_the_interchange_shape() {
    let graph = IdiomGraph {
        nodes: vec![Node::new("A"), Node::new("B")],
        edges: vec![Edge::new("A", "B", 4)],
    };
    let result = DecomposerBuilder::new()
        .with_policy(SizePolicy::Exact { size: 2 })
        .with_output_mode(OutputMode::Merged)
        .build()
        .expect("policy is valid")
        .run(&graph)
        .expect("graph is well formed");

    let json = serde_json::to_value(&result.views()[0]).expect("view must serialize");
    assert!(json.get("nodes").is_some());
    assert!(json.get("edges").is_some());
    let round_trip: SubgraphView = serde_json::from_value(json).expect("view must deserialize");
    assert_eq!(&round_trip, &result.views()[0]);
}

#[rstest]
#[case(SizePolicy::Range { lower: 5, upper: 5 })]
#[case(SizePolicy::Range { lower: 5, upper: 6 })]
#[case(SizePolicy::Exact { size: 0 })]
fn builder_rejects_impossible_policies(#[case] policy: SizePolicy) {
    let err = DecomposerBuilder::new()
        .with_policy(policy)
        .build()
        .expect_err("policy admits no component size");
    assert_eq!(err.code().as_str(), "DECOMPOSE_INVALID_POLICY");
}

// ── Property tests ──────────────────────────────────────────────────────

/// Random graph: node count, then edge triples as (endpoint pick, endpoint
/// pick, weight). Endpoint picks are reduced modulo the node count so every
/// generated edge resolves, and self-loops stay possible on purpose.
fn graph_strategy() -> impl Strategy<Value = IdiomGraph> {
    (1usize..24, prop::collection::vec((0usize..64, 0usize..64, 0u64..6), 0..48)).prop_map(
        |(node_count, raw_edges)| IdiomGraph {
            nodes: (0..node_count).map(|i| Node::new(format!("n{i}"))).collect(),
            edges: raw_edges
                .into_iter()
                .map(|(a, b, weight)| {
                    Edge::new(format!("n{}", a % node_count), format!("n{}", b % node_count), weight)
                })
                .collect(),
        },
    )
}

fn component_sets(graph: &IdiomGraph, min_weight: u64) -> Vec<HashSet<usize>> {
    let partition = Partition::from_graph(graph, min_weight).expect("generated graph is valid");
    partition
        .components()
        .iter()
        .map(|members| members.iter().copied().collect())
        .collect()
}

proptest! {
    #[test]
    fn partition_covers_every_node_exactly_once(graph in graph_strategy(), min_weight in 0u64..6) {
        let components = component_sets(&graph, min_weight);
        let mut covered: Vec<usize> = components.iter().flatten().copied().collect();
        covered.sort_unstable();
        let expected: Vec<usize> = (0..graph.nodes.len()).collect();
        prop_assert_eq!(covered, expected);
    }

    #[test]
    fn raising_the_threshold_only_splits_components(graph in graph_strategy(), low in 0u64..5) {
        let coarse = component_sets(&graph, low);
        let fine = component_sets(&graph, low + 1);
        for component in &fine {
            prop_assert!(
                coarse.iter().any(|outer| component.is_subset(outer)),
                "component under the higher threshold must be contained in one under the lower"
            );
        }
    }

    #[test]
    fn views_are_self_contained_and_deduplicated(graph in graph_strategy(), min_weight in 0u64..6) {
        let result = DecomposerBuilder::new()
            .with_min_weight(min_weight)
            .with_policy(SizePolicy::Minimum { min: 1 })
            .build()
            .expect("policy is valid")
            .run(&graph)
            .expect("generated graph is valid");

        for view in result.views() {
            let ids = node_ids(view);
            let mut pairs = HashSet::new();
            for edge in &view.edges {
                prop_assert!(ids.contains(edge.source.as_str()));
                prop_assert!(ids.contains(edge.target.as_str()));
                prop_assert!(edge.source != edge.target, "self-loop leaked into a view");
                prop_assert!(edge.weight >= min_weight);
                prop_assert!(pairs.insert(edge.canonical_pair()), "duplicate pair in a view");
            }
        }
    }
}
