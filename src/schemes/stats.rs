//! Counters collected by every solver.

use std::fmt::{self, Display};

/// Statistics about one search run.
///
/// Backtracking solvers fill in `expanded`, `generated`, `solutions` and
/// `revisited`; branch-and-bound additionally counts pruned children and the
/// peak frontier size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Nodes whose successors were requested.
    pub expanded: usize,
    /// Children produced by `successors`.
    pub generated: usize,
    /// Solution nodes reported to the caller.
    pub solutions: usize,
    /// Children skipped because their state had already been visited.
    pub revisited: usize,
    /// Children discarded because their optimistic bound could not beat the
    /// best pessimistic bound.
    pub pruned_by_bound: usize,
    /// Children discarded because an equivalent state was already reached
    /// with an equal or better bound.
    pub pruned_by_dominance: usize,
    /// Largest number of nodes waiting in the frontier at once.
    pub max_frontier: usize,
}

impl SearchStats {
    /// Total number of children that were generated but never explored.
    #[must_use]
    pub const fn pruned(&self) -> usize {
        self.revisited + self.pruned_by_bound + self.pruned_by_dominance
    }
}

impl Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded={} generated={} solutions={} revisited={} bound-pruned={} dominance-pruned={} max-frontier={}",
            self.expanded,
            self.generated,
            self.solutions,
            self.revisited,
            self.pruned_by_bound,
            self.pruned_by_dominance,
            self.max_frontier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pruned_sums_all_discards() {
        let stats = SearchStats {
            revisited: 1,
            pruned_by_bound: 2,
            pruned_by_dominance: 3,
            ..SearchStats::default()
        };
        assert_eq!(stats.pruned(), 6);
    }
}
