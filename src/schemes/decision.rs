//! Decision sequences: the nodes of an implicit search tree.
//!
//! A problem is described by implementing [`DecisionProblem`]: it says which
//! partial solutions are complete, how a partial solution branches, and which
//! partial solutions are equivalent for the rest of the search. The search
//! tree itself is made of [`DecisionSequence`] nodes, each carrying the
//! decisions taken so far, a problem-specific `Extra` payload with incremental
//! state (running sums, remaining capacity, ...) and a reference to the
//! problem definition.
//!
//! Nodes are immutable. `add_decision` builds a new node that shares the
//! decision path of its parent, so branching costs one allocation regardless of
//! depth.

use crate::error::SearchError;
use crate::schemes::path::DecisionPath;
use crate::schemes::score::Score;
use std::fmt::{self, Debug};
use std::hash::Hash;

/// The branching rules of a search problem.
///
/// The engine assumes, but cannot check, that:
/// - `successors` eventually stops producing children along every path;
/// - two nodes with equal `state` behave identically for the rest of the
///   search. Problems without a smaller equivalence key use the full decision
///   path, i.e. `type State = DecisionPath<Self::Decision>` and
///   [`path_state`].
pub trait DecisionProblem: Sized {
    /// One atomic choice.
    type Decision: Clone;
    /// Incremental problem state carried by every node.
    type Extra: Clone;
    /// Equivalence key used for visited control and dominance pruning.
    type State: Eq + Hash;

    /// Returns `true` if `ds` is a complete solution.
    fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool;

    /// The children of `ds`, in the order they should be explored.
    ///
    /// May be empty for dead ends. Children are built with
    /// [`DecisionSequence::add_decision`].
    fn successors<'p>(
        &'p self,
        ds: DecisionSequence<'p, Self>,
    ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p;

    /// The equivalence class of `ds`.
    fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State;
}

/// A [`DecisionProblem`] whose partial solutions carry an objective value.
///
/// `score` is the objective function applied to the decisions taken so far.
/// On a solution it is the value of that solution.
pub trait ScoredProblem: DecisionProblem {
    /// Objective value type.
    type Score: Score;

    /// The objective value of `ds`.
    fn score(&self, ds: &DecisionSequence<'_, Self>) -> Self::Score;
}

/// The full decision path of `ds`, the finest possible state key.
///
/// Use it as `state` for problems whose partial solutions are never
/// interchangeable.
#[must_use]
pub fn path_state<P: DecisionProblem>(ds: &DecisionSequence<'_, P>) -> DecisionPath<P::Decision> {
    ds.path().clone()
}

/// A partial solution: the decisions taken so far plus the problem payload.
pub struct DecisionSequence<'p, P: DecisionProblem> {
    problem: &'p P,
    path: DecisionPath<P::Decision>,
    extra: P::Extra,
}

impl<'p, P: DecisionProblem> DecisionSequence<'p, P> {
    /// Creates the root node of a search (no decisions taken).
    pub const fn new(problem: &'p P, extra: P::Extra) -> Self {
        Self {
            problem,
            path: DecisionPath::empty(),
            extra,
        }
    }

    /// Creates a node from an existing decision path.
    pub const fn from_path(
        problem: &'p P,
        path: DecisionPath<P::Decision>,
        extra: P::Extra,
    ) -> Self {
        Self {
            problem,
            path,
            extra,
        }
    }

    /// Returns a new node extending this one with `decision`.
    ///
    /// `self` is not modified; sibling nodes built from the same parent are
    /// independent of each other.
    #[must_use]
    pub fn add_decision(&self, decision: P::Decision, extra: P::Extra) -> Self {
        Self {
            problem: self.problem,
            path: self.path.push(decision),
            extra,
        }
    }

    /// The decisions in the order they were taken.
    #[must_use]
    pub fn decisions(&self) -> Vec<P::Decision> {
        self.path.to_vec()
    }

    /// The most recent decision.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptySequence`] if no decision has been taken yet.
    pub fn last_decision(&self) -> Result<&P::Decision, SearchError> {
        self.path.last().ok_or(SearchError::EmptySequence)
    }

    /// Number of decisions taken.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` for a node with no decisions.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// The problem payload of this node.
    #[must_use]
    pub const fn extra(&self) -> &P::Extra {
        &self.extra
    }

    /// The decision path, newest decision at the head.
    #[must_use]
    pub const fn path(&self) -> &DecisionPath<P::Decision> {
        &self.path
    }

    /// The problem this node belongs to.
    #[must_use]
    pub const fn problem(&self) -> &'p P {
        self.problem
    }

    /// See [`DecisionProblem::is_solution`].
    #[must_use]
    pub fn is_solution(&self) -> bool {
        self.problem.is_solution(self)
    }

    /// See [`DecisionProblem::successors`].
    pub fn successors(&self) -> impl Iterator<Item = Self> + use<'p, P> {
        self.problem.successors(self.clone())
    }

    /// See [`DecisionProblem::state`].
    #[must_use]
    pub fn state(&self) -> P::State {
        self.problem.state(self)
    }
}

impl<P: ScoredProblem> DecisionSequence<'_, P> {
    /// See [`ScoredProblem::score`].
    #[must_use]
    pub fn score(&self) -> P::Score {
        self.problem.score(self)
    }
}

impl<P: DecisionProblem> Clone for DecisionSequence<'_, P> {
    fn clone(&self) -> Self {
        Self {
            problem: self.problem,
            path: self.path.clone(),
            extra: self.extra.clone(),
        }
    }
}

impl<P> Debug for DecisionSequence<'_, P>
where
    P: DecisionProblem,
    P::Decision: Debug,
    P::Extra: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionSequence")
            .field("decisions", &self.path)
            .field("extra", &self.extra)
            .finish()
    }
}
