//! Idiograph core library.
//!
//! Decomposes a weighted co-occurrence graph over a vocabulary into connected
//! subgraphs: edges are filtered by weight, components are discovered with a
//! union-find structure, a size policy selects the components worth keeping,
//! and the assembler copies them into deduplicated, free-standing views.

mod decomposer;
mod error;
mod graph;
mod partition;
mod policy;
mod subgraph;
mod union_find;

pub use crate::{
    decomposer::{DEFAULT_MIN_WEIGHT, Decomposer, DecomposerBuilder, Decomposition},
    error::{
        DecomposeError, DecomposeErrorCode, GraphError, GraphErrorCode, PolicyError,
        PolicyErrorCode, Result,
    },
    graph::{Edge, IdiomGraph, MISSING_EXPLANATION, Node},
    partition::{Partition, filter_edges},
    policy::{OutputMode, SizePolicy},
    subgraph::SubgraphView,
};

#[cfg(test)]
mod tests;
