//! Co-occurrence graph data model at the engine boundary.
//!
//! Mirrors the JSON interchange format produced by the vocabulary pipeline:
//! an object with a `nodes` array and an `edges` array. The engine treats
//! everything except node identity, edge endpoints, and edge weight as opaque
//! metadata that is copied through to subgraph views unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Fallback explanation recorded when a node carries none.
pub const MISSING_EXPLANATION: &str = "无解释";

fn missing_explanation() -> String {
    MISSING_EXPLANATION.to_owned()
}

/// A vocabulary entry in the co-occurrence graph.
///
/// Identity is `id` (the idiom text itself). `explanation`, `similar`, and
/// `opposite` are study-aid metadata; absent fields are filled with the same
/// defaults the data set uses so serialized views stay byte-compatible.
///
/// # Examples
/// ```
/// use idiograph_core::{MISSING_EXPLANATION, Node};
///
/// let node: Node = serde_json::from_str(r#"{"id": "一丝不苟"}"#)?;
/// assert_eq!(node.explanation, MISSING_EXPLANATION);
/// assert!(node.similar.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Node {
    /// Unique identifier.
    pub id: String,
    /// Prose explanation of the entry.
    #[serde(default = "missing_explanation")]
    pub explanation: String,
    /// Entries with a similar meaning.
    #[serde(default)]
    pub similar: Vec<String>,
    /// Entries with an opposite meaning.
    #[serde(default)]
    pub opposite: Vec<String>,
}

impl Node {
    /// Creates a node with default metadata.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            explanation: missing_explanation(),
            similar: Vec::new(),
            opposite: Vec::new(),
        }
    }
}

/// A weighted, undirected co-occurrence relationship between two nodes.
///
/// `(source, target)` and `(target, source)` denote the same relationship;
/// [`Edge::canonical_pair`] orders the endpoints so both spellings compare
/// equal during deduplication.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Edge {
    /// One endpoint id.
    pub source: String,
    /// The other endpoint id.
    pub target: String,
    /// Number of questions in which the endpoints co-occurred.
    #[serde(default)]
    pub weight: u64,
    /// Opaque foreign keys into the external question bank.
    #[serde(default)]
    pub questions: Vec<String>,
}

impl Edge {
    /// Creates an edge with no question references.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: u64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            questions: Vec::new(),
        }
    }

    /// Returns whether both endpoints are the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Returns the endpoints as a consistently ordered pair.
    ///
    /// # Examples
    /// ```
    /// use idiograph_core::Edge;
    ///
    /// let forward = Edge::new("甲", "乙", 5);
    /// let reverse = Edge::new("乙", "甲", 5);
    /// assert_eq!(forward.canonical_pair(), reverse.canonical_pair());
    /// ```
    #[must_use]
    pub fn canonical_pair(&self) -> (&str, &str) {
        if self.source <= self.target {
            (&self.source, &self.target)
        } else {
            (&self.target, &self.source)
        }
    }
}

/// The full co-occurrence graph handed to the engine.
///
/// The engine only ever borrows a graph; decomposition outputs are
/// independent copies, so callers may mutate or discard a graph between
/// calls without invalidating earlier results.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct IdiomGraph {
    /// Every vocabulary entry, including entries with no surviving edges.
    pub nodes: Vec<Node>,
    /// Raw co-occurrence relationships, self-loops and duplicates included.
    pub edges: Vec<Edge>,
}

/// Dense index over node ids, fixed for the duration of one decomposition.
#[derive(Debug)]
pub(crate) struct NodeTable<'g> {
    index: HashMap<&'g str, usize>,
}

impl<'g> NodeTable<'g> {
    /// Builds the id-to-position index, rejecting duplicate ids up front so
    /// the disjoint set's size bookkeeping stays sound.
    pub(crate) fn from_nodes(nodes: &'g [Node]) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), position).is_some() {
                return Err(GraphError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }
        Ok(Self { index })
    }

    pub(crate) fn get(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}
