//! Best-first branch-and-bound.
//!
//! The frontier is a priority queue of [`BabDecisionSequence`] nodes ordered
//! by optimistic bound. Because a solution's optimistic bound equals its
//! score, the first solution taken off the queue is optimal among everything
//! that was ever pushed, and the search stops there.
//!
//! Two pruning rules keep the frontier small:
//! - **bound pruning**: a child whose optimistic bound is strictly worse than
//!   the best pessimistic bound seen so far is never pushed;
//! - **dominance pruning**: a child whose `state()` was already reached with an
//!   equal or better optimistic bound is never pushed.
//!
//! Both rules are only sound for admissible bounds and a `state()` key that
//! identifies nodes with interchangeable futures. Neither is checked.

use crate::schemes::bounded::{BabDecisionSequence, BoundedProblem};
use crate::schemes::score::{Maximize, Minimize, Objective};
use crate::schemes::stats::SearchStats;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::collections::hash_map::Entry;
use std::marker::PhantomData;
use tracing::{debug, debug_span, trace};

/// A frontier node together with its insertion number.
///
/// The heap pops the best optimistic bound first and, among equal bounds, the
/// node that was pushed first.
struct Queued<'p, P: BoundedProblem, O> {
    node: BabDecisionSequence<'p, P>,
    seq: u64,
    _objective: PhantomData<O>,
}

impl<'p, P: BoundedProblem, O: Objective> Queued<'p, P, O> {
    const fn new(node: BabDecisionSequence<'p, P>, seq: u64) -> Self {
        Self {
            node,
            seq,
            _objective: PhantomData,
        }
    }
}

impl<P: BoundedProblem, O: Objective> PartialEq for Queued<'_, P, O> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P: BoundedProblem, O: Objective> Eq for Queued<'_, P, O> {}

impl<P: BoundedProblem, O: Objective> PartialOrd for Queued<'_, P, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: BoundedProblem, O: Objective> Ord for Queued<'_, P, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        O::priority(self.node.opt(), other.node.opt()).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Best-first branch-and-bound solver.
///
/// `O` selects the direction of optimisation. The solver can be run more than
/// once; each run starts from the initial node with fresh statistics.
pub struct BranchAndBound<'p, P: BoundedProblem, O: Objective = Minimize> {
    initial: BabDecisionSequence<'p, P>,
    stats: SearchStats,
    _objective: PhantomData<O>,
}

impl<'p, P: BoundedProblem, O: Objective> BranchAndBound<'p, P, O> {
    /// A solver that searches below `initial`.
    #[must_use]
    pub fn new(initial: BabDecisionSequence<'p, P>) -> Self {
        Self {
            initial,
            stats: SearchStats::default(),
            _objective: PhantomData,
        }
    }

    /// Statistics of the most recent [`solve`](Self::solve) call.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Runs the search.
    ///
    /// Returns the optimal score and the solution node reaching it, or `None`
    /// if no node below the initial one is a solution.
    pub fn solve(&mut self) -> Option<(P::Score, BabDecisionSequence<'p, P>)> {
        let span = debug_span!("branch_and_bound", objective = ?O::default());
        let _guard = span.enter();

        let mut stats = SearchStats::default();
        let mut best_seen: FxHashMap<P::State, P::Score> = FxHashMap::default();
        let mut frontier: BinaryHeap<Queued<'p, P, O>> = BinaryHeap::new();
        let mut pushed: u64 = 0;

        let initial = self.initial.clone();
        let mut bps = initial.pes();
        best_seen.insert(initial.state(), initial.opt());
        frontier.push(Queued::new(initial, pushed));
        stats.max_frontier = 1;

        while let Some(Queued { node, .. }) = frontier.pop() {
            if node.is_solution() {
                stats.solutions += 1;
                debug!(
                    score = ?node.opt(),
                    depth = node.len(),
                    %stats,
                    "branch-and-bound found optimum"
                );
                self.stats = stats;
                return Some((node.opt(), node));
            }

            stats.expanded += 1;
            for child in node.successors() {
                stats.generated += 1;

                if O::better(bps, child.opt()) {
                    stats.pruned_by_bound += 1;
                    trace!(opt = ?child.opt(), bps = ?bps, "bound-pruned");
                    continue;
                }
                bps = O::best(bps, child.pes());

                match best_seen.entry(child.state()) {
                    Entry::Occupied(mut seen) => {
                        if !O::better(child.opt(), *seen.get()) {
                            stats.pruned_by_dominance += 1;
                            trace!(opt = ?child.opt(), seen = ?seen.get(), "dominance-pruned");
                            continue;
                        }
                        seen.insert(child.opt());
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(child.opt());
                    }
                }

                pushed += 1;
                frontier.push(Queued::new(child, pushed));
            }
            stats.max_frontier = stats.max_frontier.max(frontier.len());
        }

        debug!(%stats, "branch-and-bound exhausted the frontier");
        self.stats = stats;
        None
    }
}

/// Branch-and-bound towards the objective `O`.
///
/// Convenience wrapper around [`BranchAndBound`] for callers that do not need
/// the statistics.
pub fn bab_solve<O: Objective, P: BoundedProblem>(
    initial: BabDecisionSequence<'_, P>,
) -> Option<(P::Score, BabDecisionSequence<'_, P>)> {
    BranchAndBound::<P, O>::new(initial).solve()
}

/// Branch-and-bound minimising the score.
pub fn bab_min_solve<P: BoundedProblem>(
    initial: BabDecisionSequence<'_, P>,
) -> Option<(P::Score, BabDecisionSequence<'_, P>)> {
    bab_solve::<Minimize, P>(initial)
}

/// Branch-and-bound maximising the score.
pub fn bab_max_solve<P: BoundedProblem>(
    initial: BabDecisionSequence<'_, P>,
) -> Option<(P::Score, BabDecisionSequence<'_, P>)> {
    bab_solve::<Maximize, P>(initial)
}
