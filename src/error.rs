//! Error types for the search kernel and the bundled problem instances.
//!
//! Absence of a solution is never an error: solvers report it as `None` or as
//! an empty iterator. The errors here are programmer errors (reading the last
//! decision of an empty sequence) and malformed problem instances.

use std::fmt::{self, Display};

/// Errors raised by decision sequence accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// `last_decision()` was called on a sequence with no decisions.
    EmptySequence,
}

impl Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "decision sequence is empty"),
        }
    }
}

impl std::error::Error for SearchError {}

/// Errors raised while building a problem instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// A coin system contains a coin of value zero.
    ZeroCoin {
        /// Position of the offending coin.
        index: usize,
    },
    /// Weights and values of a knapsack instance differ in length.
    LengthMismatch {
        /// Number of weights supplied.
        weights: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// A knapsack item has zero weight.
    ZeroWeight {
        /// Position of the offending item.
        index: usize,
    },
    /// A total the search accumulates does not fit in a `u64`.
    Overflow {
        /// Which total overflows.
        total: &'static str,
    },
    /// An edge references a vertex outside `0..vertices`.
    UnknownVertex {
        /// The vertex referenced by the edge.
        vertex: usize,
        /// Number of vertices in the graph.
        vertices: usize,
    },
    /// An edge weight is negative or not a number.
    InvalidWeight {
        /// Source vertex of the edge.
        from: usize,
        /// Target vertex of the edge.
        to: usize,
    },
    /// A token of a textual instance could not be parsed.
    Parse(ParseTokenError),
}

/// Details about a token that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The token as it appeared in the input.
    pub token: String,
    /// What the token was expected to be.
    pub expected: &'static str,
}

impl Display for ParseTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse '{}' as {}", self.token, self.expected)
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCoin { index } => write!(f, "coin {index} has value zero"),
            Self::LengthMismatch { weights, values } => {
                write!(f, "knapsack has {weights} weights but {values} values")
            }
            Self::ZeroWeight { index } => write!(f, "item {index} has weight zero"),
            Self::Overflow { total } => write!(f, "{total} does not fit in 64 bits"),
            Self::UnknownVertex { vertex, vertices } => write!(
                f,
                "edge references vertex {vertex} but the graph has {vertices} vertices"
            ),
            Self::InvalidWeight { from, to } => {
                write!(f, "edge ({from}, {to}) has a negative or NaN weight")
            }
            Self::Parse(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl std::error::Error for InstanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseTokenError> for InstanceError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_error_display() {
        let e = InstanceError::LengthMismatch {
            weights: 3,
            values: 2,
        };
        assert_eq!(e.to_string(), "knapsack has 3 weights but 2 values");

        let e = InstanceError::from(ParseTokenError {
            token: "x".to_string(),
            expected: "an integer",
        });
        assert_eq!(e.to_string(), "parse error: could not parse 'x' as an integer");
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn test_overflow_display() {
        let e = InstanceError::Overflow {
            total: "total knapsack weight",
        };
        assert_eq!(e.to_string(), "total knapsack weight does not fit in 64 bits");
    }

    #[test]
    fn test_search_error_display() {
        assert_eq!(
            SearchError::EmptySequence.to_string(),
            "decision sequence is empty"
        );
    }
}
