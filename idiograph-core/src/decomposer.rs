//! Decomposition engine orchestration.
//!
//! Ties the pipeline stages together: filter edges by weight, partition the
//! nodes into connected components, select components by size policy, and
//! assemble the output views. Configuration is validated up front by the
//! builder; a built [`Decomposer`] is immutable and freely shareable across
//! callers because no state outlives a single [`Decomposer::run`] call.

use tracing::{info, instrument};

use crate::Result;
use crate::graph::{IdiomGraph, NodeTable};
use crate::partition::{Partition, filter_edges};
use crate::policy::{OutputMode, SizePolicy};
use crate::subgraph::{SubgraphView, assemble};

/// Edge-weight threshold applied when the caller does not override it.
pub const DEFAULT_MIN_WEIGHT: u64 = 3;

/// Configures and constructs [`Decomposer`] instances.
///
/// # Examples
/// ```
/// use idiograph_core::{DecomposerBuilder, OutputMode, SizePolicy};
///
/// let decomposer = DecomposerBuilder::new()
///     .with_min_weight(2)
///     .with_policy(SizePolicy::Exact { size: 3 })
///     .with_output_mode(OutputMode::Merged)
///     .build()?;
/// assert_eq!(decomposer.min_weight(), 2);
/// # Ok::<(), idiograph_core::DecomposeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecomposerBuilder {
    min_weight: u64,
    policy: SizePolicy,
    mode: OutputMode,
}

impl Default for DecomposerBuilder {
    fn default() -> Self {
        Self {
            min_weight: DEFAULT_MIN_WEIGHT,
            policy: SizePolicy::Minimum { min: 10 },
            mode: OutputMode::Separate,
        }
    }
}

impl DecomposerBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the minimum edge weight an edge needs to survive filtering.
    #[must_use]
    pub const fn with_min_weight(mut self, min_weight: u64) -> Self {
        self.min_weight = min_weight;
        self
    }

    /// Returns the configured minimum edge weight.
    #[must_use]
    pub const fn min_weight(&self) -> u64 {
        self.min_weight
    }

    /// Sets the component size policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: SizePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configured size policy.
    #[must_use]
    pub const fn policy(&self) -> SizePolicy {
        self.policy
    }

    /// Sets the output mode.
    #[must_use]
    pub const fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the configured output mode.
    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        self.mode
    }

    /// Validates the configuration and constructs a [`Decomposer`].
    ///
    /// # Errors
    /// Returns [`crate::DecomposeError::Policy`] when the size policy cannot
    /// admit any component, so misconfiguration surfaces here rather than as
    /// a silently empty result.
    pub fn build(self) -> Result<Decomposer> {
        self.policy.validate()?;
        Ok(Decomposer {
            min_weight: self.min_weight,
            policy: self.policy,
            mode: self.mode,
        })
    }
}

/// Entry point for running the decomposition pipeline.
///
/// # Examples
/// ```
/// use idiograph_core::{DecomposerBuilder, Edge, IdiomGraph, Node, OutputMode, SizePolicy};
///
/// let graph = IdiomGraph {
///     nodes: vec![Node::new("A"), Node::new("B"), Node::new("C"), Node::new("D")],
///     edges: vec![Edge::new("A", "B", 4), Edge::new("B", "C", 4), Edge::new("C", "D", 1)],
/// };
/// let decomposer = DecomposerBuilder::new()
///     .with_policy(SizePolicy::Exact { size: 3 })
///     .with_output_mode(OutputMode::Merged)
///     .build()?;
/// let result = decomposer.run(&graph)?;
/// assert_eq!(result.selected_components(), 1);
/// assert_eq!(result.views()[0].nodes.len(), 3);
/// assert_eq!(result.views()[0].edges.len(), 2);
/// # Ok::<(), idiograph_core::DecomposeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Decomposer {
    min_weight: u64,
    policy: SizePolicy,
    mode: OutputMode,
}

impl Decomposer {
    /// Returns the minimum edge weight applied during filtering.
    #[must_use]
    pub const fn min_weight(&self) -> u64 {
        self.min_weight
    }

    /// Returns the size policy used to select components.
    #[must_use]
    pub const fn policy(&self) -> SizePolicy {
        self.policy
    }

    /// Returns the output mode views are assembled in.
    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        self.mode
    }

    /// Decomposes `graph` into subgraph views.
    ///
    /// The graph is only borrowed for the duration of the call and is never
    /// mutated; every view in the result is an independent copy.
    ///
    /// # Errors
    /// Returns [`crate::DecomposeError::Graph`] when the node list contains a
    /// duplicate id or an edge references an unknown endpoint. An empty
    /// selection is not an error; see [`Decomposition::is_empty`].
    #[instrument(skip_all, fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
    pub fn run(&self, graph: &IdiomGraph) -> Result<Decomposition> {
        let table = NodeTable::from_nodes(&graph.nodes)?;
        let filtered = filter_edges(&graph.edges, self.min_weight);
        let partition = Partition::build(graph, &table, &filtered)?;
        let selected = self.policy.select(&partition);
        info!(
            surviving_edges = filtered.len(),
            components = partition.len(),
            selected = selected.len(),
            "decomposition complete"
        );
        let views = assemble(graph, &table, &partition, &selected, &filtered, self.mode);
        Ok(Decomposition {
            views,
            selected: selected.len(),
            mode: self.mode,
        })
    }
}

/// Represents the output of a [`Decomposer::run`] invocation.
///
/// In [`OutputMode::Separate`] there is one view per selected component; in
/// [`OutputMode::Merged`] there is always exactly one view, empty when no
/// component qualified. Callers should branch on [`Decomposition::is_empty`]
/// rather than treating an empty selection as a failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decomposition {
    views: Vec<SubgraphView>,
    selected: usize,
    mode: OutputMode,
}

impl Decomposition {
    /// Assembled views, in selection order.
    #[must_use]
    pub fn views(&self) -> &[SubgraphView] {
        &self.views
    }

    /// Consumes the result, yielding the assembled views.
    #[must_use]
    pub fn into_views(self) -> Vec<SubgraphView> {
        self.views
    }

    /// Number of components that satisfied the size policy.
    #[must_use]
    pub const fn selected_components(&self) -> usize {
        self.selected
    }

    /// Output mode the views were assembled in.
    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        self.mode
    }

    /// Returns whether no component satisfied the size policy.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.selected == 0
    }
}
