//! Decision sequences with cached optimistic and pessimistic bounds.
//!
//! For a minimisation problem the bounds of a node must satisfy
//! `opt <= best score reachable from the node <= pes`, and both must equal the
//! node's score when the node is a solution. Maximisation flips the
//! inequalities. The branch-and-bound engine relies on this without checking
//! it: an inadmissible bound silently produces a wrong answer.

use crate::schemes::decision::{DecisionSequence, ScoredProblem};
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::ops::Deref;

/// A [`ScoredProblem`] with bound functions for branch-and-bound.
///
/// The bound functions must be pure functions of the node: each is evaluated
/// exactly once per node and the result cached. On a solution both bounds
/// equal its `score`.
pub trait BoundedProblem: ScoredProblem {
    /// A bound no solution below `ds` can improve on.
    fn calculate_opt_bound(&self, ds: &DecisionSequence<'_, Self>) -> Self::Score;

    /// A score some solution below `ds` is guaranteed to reach (or the worst
    /// score, `Score::INFINITY`/`Score::NEG_INFINITY`, if unknown).
    fn calculate_pes_bound(&self, ds: &DecisionSequence<'_, Self>) -> Self::Score;
}

/// A [`DecisionSequence`] together with its bounds.
///
/// Nodes compare by optimistic bound only, so they can be ordered directly in
/// a priority queue.
pub struct BabDecisionSequence<'p, P: BoundedProblem> {
    sequence: DecisionSequence<'p, P>,
    opt: P::Score,
    pes: P::Score,
}

impl<'p, P: BoundedProblem> BabDecisionSequence<'p, P> {
    /// Wraps `sequence`, computing both bounds.
    pub fn new(sequence: DecisionSequence<'p, P>) -> Self {
        let problem = sequence.problem();
        let pes = problem.calculate_pes_bound(&sequence);
        let opt = problem.calculate_opt_bound(&sequence);
        Self { sequence, opt, pes }
    }

    /// The bounded root node of a search.
    pub fn initial(problem: &'p P, extra: P::Extra) -> Self {
        Self::new(DecisionSequence::new(problem, extra))
    }

    /// The cached optimistic bound.
    #[must_use]
    pub const fn opt(&self) -> P::Score {
        self.opt
    }

    /// The cached pessimistic bound.
    #[must_use]
    pub const fn pes(&self) -> P::Score {
        self.pes
    }

    /// The underlying node.
    #[must_use]
    pub const fn sequence(&self) -> &DecisionSequence<'p, P> {
        &self.sequence
    }

    /// Drops the bounds and returns the underlying node.
    #[must_use]
    pub fn into_sequence(self) -> DecisionSequence<'p, P> {
        self.sequence
    }

    /// Extends the node, computing the bounds of the child.
    #[must_use]
    pub fn add_decision(&self, decision: P::Decision, extra: P::Extra) -> Self {
        Self::new(self.sequence.add_decision(decision, extra))
    }

    /// The bounded children of this node.
    pub fn successors(&self) -> impl Iterator<Item = Self> + use<'p, P> {
        self.sequence.successors().map(Self::new)
    }
}

impl<'p, P: BoundedProblem> Deref for BabDecisionSequence<'p, P> {
    type Target = DecisionSequence<'p, P>;

    fn deref(&self) -> &Self::Target {
        &self.sequence
    }
}

impl<P: BoundedProblem> Clone for BabDecisionSequence<'_, P> {
    fn clone(&self) -> Self {
        Self {
            sequence: self.sequence.clone(),
            opt: self.opt,
            pes: self.pes,
        }
    }
}

impl<P: BoundedProblem> PartialEq for BabDecisionSequence<'_, P> {
    fn eq(&self, other: &Self) -> bool {
        self.opt == other.opt
    }
}

impl<P: BoundedProblem> Eq for BabDecisionSequence<'_, P> {}

impl<P: BoundedProblem> PartialOrd for BabDecisionSequence<'_, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: BoundedProblem> Ord for BabDecisionSequence<'_, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.opt.cmp(&other.opt)
    }
}

impl<P> Debug for BabDecisionSequence<'_, P>
where
    P: BoundedProblem,
    P::Decision: Debug,
    P::Extra: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BabDecisionSequence")
            .field("decisions", self.sequence.path())
            .field("extra", self.sequence.extra())
            .field("opt", &self.opt)
            .field("pes", &self.pes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::decision::DecisionProblem;
    use std::cell::Cell;

    /// Pick `n` digits from 0..=9 maximising their sum; counts bound calls.
    struct Digits {
        n: usize,
        opt_calls: Cell<usize>,
        pes_calls: Cell<usize>,
    }

    impl Digits {
        fn new(n: usize) -> Self {
            Self {
                n,
                opt_calls: Cell::new(0),
                pes_calls: Cell::new(0),
            }
        }
    }

    impl DecisionProblem for Digits {
        type Decision = u32;
        type Extra = u32;
        type State = (usize, u32);

        fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool {
            ds.len() == self.n
        }

        fn successors<'p>(
            &'p self,
            ds: DecisionSequence<'p, Self>,
        ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p {
            let digits = if ds.len() < self.n { 0..10 } else { 0..0 };
            digits.map(move |d| ds.add_decision(d, ds.extra() + d))
        }

        fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State {
            (ds.len(), *ds.extra())
        }
    }

    impl ScoredProblem for Digits {
        type Score = u32;

        fn score(&self, ds: &DecisionSequence<'_, Self>) -> u32 {
            *ds.extra()
        }
    }

    impl BoundedProblem for Digits {
        fn calculate_opt_bound(&self, ds: &DecisionSequence<'_, Self>) -> u32 {
            self.opt_calls.set(self.opt_calls.get() + 1);
            let remaining = u32::try_from(self.n - ds.len()).unwrap_or(u32::MAX);
            ds.extra() + 9 * remaining
        }

        fn calculate_pes_bound(&self, ds: &DecisionSequence<'_, Self>) -> u32 {
            self.pes_calls.set(self.pes_calls.get() + 1);
            *ds.extra()
        }
    }

    #[test]
    fn test_bounds_are_computed_once() {
        let problem = Digits::new(2);
        let root = BabDecisionSequence::initial(&problem, 0);
        assert_eq!(problem.opt_calls.get(), 1);
        assert_eq!(problem.pes_calls.get(), 1);

        for _ in 0..5 {
            assert_eq!(root.opt(), 18);
            assert_eq!(root.pes(), 0);
        }
        assert_eq!(problem.opt_calls.get(), 1);
        assert_eq!(problem.pes_calls.get(), 1);

        let children: Vec<_> = root.successors().collect();
        assert_eq!(children.len(), 10);
        assert_eq!(problem.opt_calls.get(), 11);
        assert_eq!(problem.pes_calls.get(), 11);
        assert_eq!(children[3].opt(), 12);
        assert_eq!(children[3].pes(), 3);
    }

    #[test]
    fn test_ordering_follows_opt_only() {
        let problem = Digits::new(3);
        let root = BabDecisionSequence::initial(&problem, 0);
        let low = root.add_decision(1, 1);
        let high = root.add_decision(7, 7);
        let high_other_path = root.add_decision(2, 2).add_decision(5, 7);

        assert!(low < high);
        assert_eq!(low.cmp(&high), low.opt().cmp(&high.opt()));
        // Different decisions, different pes, same opt.
        assert_eq!(high_other_path.opt(), 16);
        assert_eq!(high.opt(), 25);
        assert!(high_other_path < high);
        let same_opt = root.add_decision(0, 7).add_decision(0, 7);
        assert_eq!(same_opt, high_other_path);
        assert_ne!(same_opt.decisions(), high_other_path.decisions());
    }

    #[test]
    fn test_deref_exposes_sequence() {
        let problem = Digits::new(1);
        let node = BabDecisionSequence::initial(&problem, 0).add_decision(4, 4);
        assert_eq!(node.decisions(), vec![4]);
        assert_eq!(node.last_decision(), Ok(&4));
        assert!(node.is_solution());
        assert_eq!(node.opt(), node.pes());
        assert_eq!(node.into_sequence().len(), 1);
    }
}
