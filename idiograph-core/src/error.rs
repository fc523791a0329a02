//! Error types for the idiograph core library.
//!
//! Defines the error enums exposed by the public API, stable machine-readable
//! error codes for each variant, and a convenient result alias.

use std::fmt;

use thiserror::Error;

macro_rules! impl_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!("Retrieve the stable [`", stringify!($CodeTy), "`] for this error.")]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error raised while validating the input co-occurrence graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The node list contained the same id more than once.
    #[error("node id `{id}` appears more than once in the node list")]
    DuplicateNode {
        /// The id that was recorded twice.
        id: String,
    },
    /// An edge referenced a node id absent from the node list.
    #[error("edge #{index} (`{source}` -- `{target}`) references unknown node `{missing}`")]
    UnknownEndpoint {
        /// Zero-based position of the offending edge in the edge list.
        index: usize,
        /// Source id recorded on the edge.
        source: String,
        /// Target id recorded on the edge.
        target: String,
        /// The endpoint id that does not appear in the node list.
        missing: String,
    },
}

impl_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The node list contained the same id more than once.
        DuplicateNode => DuplicateNode { .. } => "GRAPH_DUPLICATE_NODE",
        /// An edge referenced a node id absent from the node list.
        UnknownEndpoint => UnknownEndpoint { .. } => "GRAPH_UNKNOWN_ENDPOINT",
    }
}

/// An error raised when a size policy cannot admit any component.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PolicyError {
    /// A strict range left no integer between its bounds.
    #[error("range ({lower}, {upper}) admits no component size; upper must exceed lower + 1")]
    EmptyRange {
        /// Exclusive lower bound supplied by the caller.
        lower: usize,
        /// Exclusive upper bound supplied by the caller.
        upper: usize,
    },
    /// An exact size of zero can never match a component.
    #[error("exact size must be at least 1; components always contain a node")]
    ZeroExact,
}

impl_error_codes! {
    /// Stable codes describing [`PolicyError`] variants.
    enum PolicyErrorCode for PolicyError {
        /// A strict range left no integer between its bounds.
        EmptyRange => EmptyRange { .. } => "POLICY_EMPTY_RANGE",
        /// An exact size of zero can never match a component.
        ZeroExact => ZeroExact => "POLICY_ZERO_EXACT",
    }
}

/// Error type produced when configuring or running a [`crate::Decomposer`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecomposeError {
    /// The configured size policy was rejected at build time.
    #[error("invalid size policy: {source}")]
    Policy {
        /// Underlying policy validation failure.
        #[source]
        source: PolicyError,
    },
    /// The input graph failed validation before decomposition started.
    #[error("malformed input graph: {source}")]
    Graph {
        /// Underlying graph validation failure.
        #[source]
        source: GraphError,
    },
}

impl_error_codes! {
    /// Stable codes describing [`DecomposeError`] variants.
    enum DecomposeErrorCode for DecomposeError {
        /// The configured size policy was rejected at build time.
        InvalidPolicy => Policy { .. } => "DECOMPOSE_INVALID_POLICY",
        /// The input graph failed validation before decomposition started.
        MalformedGraph => Graph { .. } => "DECOMPOSE_MALFORMED_GRAPH",
    }
}

impl From<PolicyError> for DecomposeError {
    fn from(source: PolicyError) -> Self {
        Self::Policy { source }
    }
}

impl From<GraphError> for DecomposeError {
    fn from(source: GraphError) -> Self {
        Self::Graph { source }
    }
}

impl DecomposeError {
    /// Retrieve the inner [`GraphErrorCode`] when the error originated in graph validation.
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph { source } => Some(source.code()),
            Self::Policy { .. } => None,
        }
    }

    /// Retrieve the inner [`PolicyErrorCode`] when the error originated in policy validation.
    pub const fn policy_code(&self) -> Option<PolicyErrorCode> {
        match self {
            Self::Policy { source } => Some(source.code()),
            Self::Graph { .. } => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DecomposeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_strings() {
        let err = GraphError::DuplicateNode { id: "一丝不苟".to_owned() };
        assert_eq!(err.code().as_str(), "GRAPH_DUPLICATE_NODE");

        let err = PolicyError::EmptyRange { lower: 5, upper: 6 };
        assert_eq!(err.code().as_str(), "POLICY_EMPTY_RANGE");
        assert_eq!(err.code().to_string(), "POLICY_EMPTY_RANGE");
    }

    #[test]
    fn decompose_error_exposes_inner_codes() {
        let err = DecomposeError::from(PolicyError::ZeroExact);
        assert_eq!(err.code(), DecomposeErrorCode::InvalidPolicy);
        assert_eq!(err.policy_code(), Some(PolicyErrorCode::ZeroExact));
        assert_eq!(err.graph_code(), None);

        let err = DecomposeError::from(GraphError::UnknownEndpoint {
            index: 7,
            source: "甲".to_owned(),
            target: "乙".to_owned(),
            missing: "乙".to_owned(),
        });
        assert_eq!(err.code(), DecomposeErrorCode::MalformedGraph);
        assert_eq!(err.graph_code(), Some(GraphErrorCode::UnknownEndpoint));
        assert!(err.to_string().contains("edge #7"));
    }
}
