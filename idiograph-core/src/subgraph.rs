//! Subgraph view assembly with canonical-pair edge deduplication.
//!
//! The final pipeline stage copies the selected components out of the input
//! graph into free-standing views. Edge rows are deduplicated on the
//! canonical unordered endpoint pair: the partition already guarantees
//! components are disjoint, so the dedup set only guards against duplicate
//! rows in the source data (the same pair recorded twice, possibly with the
//! endpoints swapped). The first-seen row wins verbatim; weights and question
//! lists are never aggregated across duplicates.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::{Edge, IdiomGraph, Node, NodeTable};
use crate::partition::Partition;
use crate::policy::OutputMode;

/// A read-only derived view over a subset of the graph.
///
/// Serializes to the `{nodes: [...], edges: [...]}` object consumed by the
/// visualization generator. Views are independent copies; mutating or
/// discarding one never affects the source graph or later decompositions.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SubgraphView {
    /// Member nodes with their study-aid metadata.
    pub nodes: Vec<Node>,
    /// Surviving edges whose endpoints both lie among `nodes`.
    pub edges: Vec<Edge>,
}

impl SubgraphView {
    /// Returns whether the view contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Copies the selected components into output views.
///
/// `OutputMode::Separate` yields one view per selected component, in
/// selection order; `OutputMode::Merged` always yields exactly one view,
/// empty when nothing was selected.
pub(crate) fn assemble(
    graph: &IdiomGraph,
    table: &NodeTable<'_>,
    partition: &Partition,
    selected: &[usize],
    filtered: &[&Edge],
    mode: OutputMode,
) -> Vec<SubgraphView> {
    match mode {
        OutputMode::Separate => assemble_separate(graph, table, partition, selected, filtered),
        OutputMode::Merged => {
            vec![assemble_merged(graph, table, partition, selected, filtered)]
        }
    }
}

fn member_nodes(graph: &IdiomGraph, partition: &Partition, component: usize) -> Vec<Node> {
    partition.components()[component]
        .iter()
        .map(|&node| graph.nodes[node].clone())
        .collect()
}

/// Resolves an edge to the component holding both endpoints, or `None` when
/// the endpoints straddle components (tolerated, never produced by a correct
/// partition).
fn edge_component(table: &NodeTable<'_>, partition: &Partition, edge: &Edge) -> Option<usize> {
    let source = partition.component_of(table.get(&edge.source)?)?;
    let target = partition.component_of(table.get(&edge.target)?)?;
    (source == target).then_some(source)
}

fn assemble_separate(
    graph: &IdiomGraph,
    table: &NodeTable<'_>,
    partition: &Partition,
    selected: &[usize],
    filtered: &[&Edge],
) -> Vec<SubgraphView> {
    let slots: HashMap<usize, usize> = selected
        .iter()
        .enumerate()
        .map(|(slot, &component)| (component, slot))
        .collect();

    let mut views: Vec<SubgraphView> = selected
        .iter()
        .map(|&component| SubgraphView {
            nodes: member_nodes(graph, partition, component),
            edges: Vec::new(),
        })
        .collect();

    let mut seen: Vec<HashSet<(&str, &str)>> = vec![HashSet::new(); views.len()];
    for edge in filtered {
        let Some(component) = edge_component(table, partition, edge) else {
            continue;
        };
        let Some(&slot) = slots.get(&component) else {
            continue;
        };
        if seen[slot].insert(edge.canonical_pair()) {
            views[slot].edges.push((*edge).clone());
        }
    }

    views
}

fn assemble_merged(
    graph: &IdiomGraph,
    table: &NodeTable<'_>,
    partition: &Partition,
    selected: &[usize],
    filtered: &[&Edge],
) -> SubgraphView {
    let chosen: HashSet<usize> = selected.iter().copied().collect();

    let mut nodes = Vec::new();
    for &component in selected {
        nodes.extend(member_nodes(graph, partition, component));
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();
    for edge in filtered {
        let Some(component) = edge_component(table, partition, edge) else {
            continue;
        };
        if chosen.contains(&component) && seen.insert(edge.canonical_pair()) {
            edges.push((*edge).clone());
        }
    }

    SubgraphView { nodes, edges }
}
