//! Component size selection policies and output shaping.
//!
//! The three extraction flavours differ only in which component sizes they
//! keep and whether qualifying components are written out one by one or
//! folded together. Both knobs are plain values so one engine serves all
//! three.

use crate::error::PolicyError;
use crate::partition::Partition;

/// Predicate choosing which components qualify for output.
///
/// Each component is evaluated independently on its node count, so policy
/// evaluation order never affects the result set.
///
/// # Examples
/// ```
/// use idiograph_core::SizePolicy;
///
/// let policy = SizePolicy::Range { lower: 5, upper: 11 };
/// assert!(policy.admits(7));
/// assert!(!policy.admits(5));
/// assert!(!policy.admits(11));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SizePolicy {
    /// Keep components with strictly more than `min` nodes.
    Minimum {
        /// Exclusive lower bound on component size.
        min: usize,
    },
    /// Keep components with strictly between `lower` and `upper` nodes.
    Range {
        /// Exclusive lower bound on component size.
        lower: usize,
        /// Exclusive upper bound on component size.
        upper: usize,
    },
    /// Keep components with exactly `size` nodes.
    Exact {
        /// Required component size.
        size: usize,
    },
}

impl SizePolicy {
    /// Checks that the bounds can admit at least one component size, so a
    /// misconfigured policy is distinguishable from a legitimately empty
    /// selection.
    ///
    /// # Errors
    /// Returns [`PolicyError::EmptyRange`] when no integer lies strictly
    /// between a range's bounds and [`PolicyError::ZeroExact`] for
    /// `Exact { size: 0 }`.
    pub const fn validate(self) -> Result<(), PolicyError> {
        match self {
            Self::Minimum { .. } => Ok(()),
            Self::Range { lower, upper } => {
                if upper > lower.saturating_add(1) {
                    Ok(())
                } else {
                    Err(PolicyError::EmptyRange { lower, upper })
                }
            }
            Self::Exact { size } => {
                if size == 0 {
                    Err(PolicyError::ZeroExact)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Returns whether a component of `size` nodes qualifies.
    #[must_use]
    pub const fn admits(self, size: usize) -> bool {
        match self {
            Self::Minimum { min } => size > min,
            Self::Range { lower, upper } => lower < size && size < upper,
            Self::Exact { size: wanted } => size == wanted,
        }
    }

    /// Indices of qualifying components, in partition order.
    #[must_use]
    pub fn select(self, partition: &Partition) -> Vec<usize> {
        partition
            .components()
            .iter()
            .enumerate()
            .filter_map(|(index, members)| self.admits(members.len()).then_some(index))
            .collect()
    }
}

/// Shape of the assembled output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputMode {
    /// One subgraph view per qualifying component.
    #[default]
    Separate,
    /// All qualifying components folded into a single view.
    Merged,
}
