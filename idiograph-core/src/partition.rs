//! Edge filtering and connected-component discovery.
//!
//! The first two stages of the decomposition pipeline: drop edges that are
//! too weak to count as a relationship (or that relate a node to itself),
//! then partition the node set into the connected components induced by the
//! survivors.

use tracing::debug;

use crate::error::GraphError;
use crate::graph::{Edge, IdiomGraph, NodeTable};
use crate::union_find::DisjointSet;

/// Keeps an edge iff its weight reaches `min_weight` and it is not a
/// self-loop. Pure and order-preserving; self-loops are dropped even when
/// `min_weight` is zero because they carry no connectivity information.
///
/// # Examples
/// ```
/// use idiograph_core::{Edge, filter_edges};
///
/// let edges = vec![Edge::new("a", "b", 4), Edge::new("b", "c", 1), Edge::new("c", "c", 9)];
/// let surviving = filter_edges(&edges, 3);
/// assert_eq!(surviving.len(), 1);
/// assert_eq!(surviving[0].source, "a");
/// ```
#[must_use]
pub fn filter_edges(edges: &[Edge], min_weight: u64) -> Vec<&Edge> {
    edges
        .iter()
        .filter(|edge| edge.weight >= min_weight && !edge.is_self_loop())
        .collect()
}

/// The connected components induced by the surviving edges.
///
/// Every input node belongs to exactly one component, including size-1
/// singletons for isolated or filtered-out nodes. Components are listed in
/// order of first appearance when scanning nodes in input order, and members
/// keep input order, so a stably-ordered input graph yields a stable
/// partition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    components: Vec<Vec<usize>>,
    membership: Vec<usize>,
}

impl Partition {
    /// Filters `graph`'s edges at `min_weight` and partitions its nodes.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateNode`] when two nodes share an id and
    /// [`GraphError::UnknownEndpoint`] when any edge references an id absent
    /// from the node list.
    ///
    /// # Examples
    /// ```
    /// use idiograph_core::{Edge, IdiomGraph, Node, Partition};
    ///
    /// let graph = IdiomGraph {
    ///     nodes: vec![Node::new("a"), Node::new("b"), Node::new("c")],
    ///     edges: vec![Edge::new("a", "b", 4)],
    /// };
    /// let partition = Partition::from_graph(&graph, 3)?;
    /// assert_eq!(partition.len(), 2);
    /// assert_eq!(partition.components()[0], vec![0, 1]);
    /// assert_eq!(partition.components()[1], vec![2]);
    /// # Ok::<(), idiograph_core::GraphError>(())
    /// ```
    pub fn from_graph(graph: &IdiomGraph, min_weight: u64) -> Result<Self, GraphError> {
        let table = NodeTable::from_nodes(&graph.nodes)?;
        let filtered = filter_edges(&graph.edges, min_weight);
        Self::build(graph, &table, &filtered)
    }

    /// Builds the partition from pre-filtered edges.
    ///
    /// Validates every raw edge against the node table before any union runs,
    /// including edges the weight filter already dropped, so malformed input
    /// fails fast instead of surfacing only at a lower threshold.
    pub(crate) fn build(
        graph: &IdiomGraph,
        table: &NodeTable<'_>,
        filtered: &[&Edge],
    ) -> Result<Self, GraphError> {
        for (index, edge) in graph.edges.iter().enumerate() {
            for endpoint in [&edge.source, &edge.target] {
                if table.get(endpoint).is_none() {
                    return Err(GraphError::UnknownEndpoint {
                        index,
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        let mut dsu = DisjointSet::new(graph.nodes.len());
        for edge in filtered {
            // Endpoints were validated above, so both lookups succeed.
            if let (Some(source), Some(target)) =
                (table.get(&edge.source), table.get(&edge.target))
            {
                dsu.union(source, target);
            }
        }

        let mut slots: Vec<Option<usize>> = vec![None; graph.nodes.len()];
        let mut components: Vec<Vec<usize>> = Vec::new();
        let mut membership = vec![0usize; graph.nodes.len()];
        for node in 0..graph.nodes.len() {
            let root = dsu.find(node);
            let slot = match slots[root] {
                Some(slot) => slot,
                None => {
                    let slot = components.len();
                    slots[root] = Some(slot);
                    components.push(Vec::new());
                    slot
                }
            };
            components[slot].push(node);
            membership[node] = slot;
        }

        debug!(
            nodes = graph.nodes.len(),
            surviving_edges = filtered.len(),
            components = components.len(),
            "partition built"
        );
        Ok(Self {
            components,
            membership,
        })
    }

    /// Member node indices of every component, in discovery order.
    #[must_use]
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns whether the partition contains no components (empty graph).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Index of the component containing `node`, or `None` when the node
    /// index is outside the partitioned universe.
    #[must_use]
    pub fn component_of(&self, node: usize) -> Option<usize> {
        self.membership.get(node).copied()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::graph::Node;

    fn graph(nodes: &[&str], edges: &[(&str, &str, u64)]) -> IdiomGraph {
        IdiomGraph {
            nodes: nodes.iter().map(|&id| Node::new(id)).collect(),
            edges: edges
                .iter()
                .map(|&(source, target, weight)| Edge::new(source, target, weight))
                .collect(),
        }
    }

    #[rstest]
    #[case(0, 2)]
    #[case(3, 1)]
    #[case(5, 0)]
    fn filter_drops_light_edges(#[case] min_weight: u64, #[case] expected: usize) {
        let edges = vec![Edge::new("a", "b", 4), Edge::new("b", "c", 2)];
        assert_eq!(filter_edges(&edges, min_weight).len(), expected);
    }

    #[test]
    fn filter_drops_self_loops_even_at_zero_threshold() {
        let edges = vec![Edge::new("a", "a", 9)];
        assert!(filter_edges(&edges, 0).is_empty());
    }

    #[test]
    fn components_partition_the_node_set() {
        let graph = graph(
            &["a", "b", "c", "d", "e"],
            &[("a", "b", 4), ("b", "c", 4), ("d", "e", 3)],
        );
        let partition = Partition::from_graph(&graph, 3).expect("graph is well formed");

        assert_eq!(partition.len(), 2);
        assert_eq!(partition.components()[0], vec![0, 1, 2]);
        assert_eq!(partition.components()[1], vec![3, 4]);

        let mut covered: Vec<usize> = partition.components().iter().flatten().copied().collect();
        covered.sort_unstable();
        assert_eq!(covered, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn isolated_nodes_form_singletons() {
        let graph = graph(&["a", "b", "c"], &[("a", "b", 1)]);
        let partition = Partition::from_graph(&graph, 3).expect("graph is well formed");
        assert_eq!(partition.len(), 3);
        assert!(partition.components().iter().all(|members| members.len() == 1));
    }

    #[test]
    fn self_loop_never_joins_components() {
        let graph = graph(&["a", "b"], &[("a", "a", 99)]);
        let partition = Partition::from_graph(&graph, 0).expect("graph is well formed");
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn membership_matches_component_listing() {
        let graph = graph(&["a", "b", "c"], &[("b", "c", 5)]);
        let partition = Partition::from_graph(&graph, 3).expect("graph is well formed");
        assert_eq!(partition.component_of(0), Some(0));
        assert_eq!(partition.component_of(1), Some(1));
        assert_eq!(partition.component_of(2), Some(1));
        assert_eq!(partition.component_of(9), None);
    }

    #[test]
    fn unknown_endpoint_fails_fast_even_when_filtered_out() {
        let graph = graph(&["a", "b"], &[("a", "ghost", 1)]);
        let err = Partition::from_graph(&graph, 3).expect_err("unknown endpoint must fail");
        assert_eq!(
            err,
            GraphError::UnknownEndpoint {
                index: 0,
                source: "a".to_owned(),
                target: "ghost".to_owned(),
                missing: "ghost".to_owned(),
            }
        );
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let graph = graph(&["a", "a"], &[]);
        let err = Partition::from_graph(&graph, 3).expect_err("duplicate node must fail");
        assert_eq!(err, GraphError::DuplicateNode { id: "a".to_owned() });
    }
}
