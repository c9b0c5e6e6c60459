//! Lazy depth-first enumeration of solutions.
//!
//! [`bt_solutions`] walks the whole implicit tree and yields every node for
//! which `is_solution()` holds, in depth-first, successors order.
//! [`bt_vc_solutions`] does the same walk but enters each `state()` at most
//! once, turning the tree into a DAG when the problem's state key collapses
//! equivalent partial solutions.
//!
//! [`bt_min_solve`] and [`bt_max_solve`] optimise a [`ScoredProblem`]. They
//! remember the best score each state was entered with, skip children that do
//! not improve on it, and only yield solutions that beat every solution
//! yielded before. The last item is therefore an optimal solution.
//!
//! All of them return a pull-based iterator. Nothing is explored past the
//! solution most recently returned, so a caller that only wants the first
//! solution can stop after one `next()`.
//!
//! The recursion of a classic backtracking scheme is replaced by an explicit
//! stack holding one successor iterator per level of the current path; memory
//! use is proportional to the depth of the tree, not its size.

use crate::schemes::decision::{DecisionProblem, DecisionSequence, ScoredProblem};
use crate::schemes::score::{Maximize, Minimize, Objective};
use crate::schemes::stats::SearchStats;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use tracing::{debug, trace};

type Successors<'p, P> = Box<dyn Iterator<Item = DecisionSequence<'p, P>> + 'p>;

/// Depth-first walk shared by every backtracking iterator.
struct Walk<'p, P: DecisionProblem> {
    /// Node reached but not yet entered.
    pending: Option<DecisionSequence<'p, P>>,
    /// Successor cursors, one per level of the current path.
    stack: Vec<Successors<'p, P>>,
    stats: SearchStats,
    finished: bool,
}

impl<'p, P: DecisionProblem> Walk<'p, P> {
    fn new(initial: DecisionSequence<'p, P>) -> Self {
        Self {
            pending: Some(initial),
            stack: Vec::new(),
            stats: SearchStats::default(),
            finished: false,
        }
    }

    /// Enters the next node in depth-first order.
    ///
    /// The initial node is always entered. Any other node is entered only if
    /// `admit` accepts it; rejected children count as revisits and their
    /// subtrees are skipped.
    fn enter_next<F>(&mut self, mut admit: F) -> Option<DecisionSequence<'p, P>>
    where
        F: FnMut(&DecisionSequence<'p, P>) -> bool,
    {
        loop {
            if let Some(node) = self.pending.take() {
                self.stats.expanded += 1;
                self.stack.push(Box::new(node.successors()));
                return Some(node);
            }

            let Some(children) = self.stack.last_mut() else {
                if !self.finished {
                    self.finished = true;
                    debug!(stats = %self.stats, "backtracking search exhausted");
                }
                return None;
            };

            match children.next() {
                Some(child) => {
                    self.stats.generated += 1;
                    if admit(&child) {
                        self.pending = Some(child);
                    } else {
                        self.stats.revisited += 1;
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Iterator over the solution nodes of a backtracking search.
///
/// Created by [`bt_solutions`] and [`bt_vc_solutions`].
pub struct BtSolutions<'p, P: DecisionProblem> {
    walk: Walk<'p, P>,
    /// States already entered; `None` for plain backtracking.
    visited: Option<FxHashSet<P::State>>,
}

/// Enumerates all solutions reachable from `initial`.
///
/// Solutions are produced lazily in depth-first order, children visited in
/// the order `successors()` yields them. The yielded values are the solution
/// nodes themselves; call `decisions()` on them to materialise the answer.
pub fn bt_solutions<P: DecisionProblem>(initial: DecisionSequence<'_, P>) -> BtSolutions<'_, P> {
    BtSolutions::new(initial, None)
}

/// Like [`bt_solutions`], but never enters the same `state()` twice.
///
/// The initial state is marked visited before the search starts, and every
/// child is marked as soon as it is reached, so an equivalent node further
/// down the same branch is skipped as well. The result is only complete if
/// equal states really do have identical futures.
pub fn bt_vc_solutions<P: DecisionProblem>(initial: DecisionSequence<'_, P>) -> BtSolutions<'_, P> {
    let mut visited = FxHashSet::default();
    visited.insert(initial.state());
    BtSolutions::new(initial, Some(visited))
}

impl<'p, P: DecisionProblem> BtSolutions<'p, P> {
    fn new(initial: DecisionSequence<'p, P>, visited: Option<FxHashSet<P::State>>) -> Self {
        Self {
            walk: Walk::new(initial),
            visited,
        }
    }

    /// Statistics accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.walk.stats
    }

    /// Current depth of the explicit stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.walk.stack.len()
    }
}

impl<'p, P: DecisionProblem> Iterator for BtSolutions<'p, P> {
    type Item = DecisionSequence<'p, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let visited = &mut self.visited;
        loop {
            let node = self.walk.enter_next(|child| {
                visited
                    .as_mut()
                    .is_none_or(|visited| visited.insert(child.state()))
            })?;
            if node.is_solution() {
                self.walk.stats.solutions += 1;
                trace!(depth = node.len(), "backtracking reached a solution");
                return Some(node);
            }
        }
    }
}

impl<P: DecisionProblem> FusedIterator for BtSolutions<'_, P> {}

/// Iterator over ever better solutions of a scored backtracking search.
///
/// Created by [`bt_opt_solve`], [`bt_min_solve`] and [`bt_max_solve`]. Each
/// item is a solution together with its score, strictly better than the
/// score of every item before it.
pub struct BtOptSolutions<'p, P: ScoredProblem, O: Objective = Minimize> {
    walk: Walk<'p, P>,
    /// Best score each state has been entered with.
    best_seen: FxHashMap<P::State, P::Score>,
    /// Score of the last solution yielded.
    incumbent: Option<P::Score>,
    _objective: PhantomData<O>,
}

/// Backtracking towards the objective `O`, yielding improving solutions.
///
/// A child is entered only if its state is new or its score is strictly
/// better than the best score that state was entered with. This is sound when
/// the score of a partial solution, plus whatever its future adds, depends on
/// the state only through that score.
pub fn bt_opt_solve<O: Objective, P: ScoredProblem>(
    initial: DecisionSequence<'_, P>,
) -> BtOptSolutions<'_, P, O> {
    let mut best_seen = FxHashMap::default();
    best_seen.insert(initial.state(), initial.score());
    BtOptSolutions {
        walk: Walk::new(initial),
        best_seen,
        incumbent: None,
        _objective: PhantomData,
    }
}

/// Improving solutions of a minimisation problem. The last one is optimal.
pub fn bt_min_solve<P: ScoredProblem>(
    initial: DecisionSequence<'_, P>,
) -> BtOptSolutions<'_, P, Minimize> {
    bt_opt_solve::<Minimize, P>(initial)
}

/// Improving solutions of a maximisation problem. The last one is optimal.
pub fn bt_max_solve<P: ScoredProblem>(
    initial: DecisionSequence<'_, P>,
) -> BtOptSolutions<'_, P, Maximize> {
    bt_opt_solve::<Maximize, P>(initial)
}

impl<P: ScoredProblem, O: Objective> BtOptSolutions<'_, P, O> {
    /// Statistics accumulated so far. Children skipped because their state
    /// was already entered with an equal or better score count as revisits.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.walk.stats
    }

    /// Score of the best solution yielded so far.
    #[must_use]
    pub const fn best_score(&self) -> Option<P::Score> {
        self.incumbent
    }
}

impl<'p, P: ScoredProblem, O: Objective> Iterator for BtOptSolutions<'p, P, O> {
    type Item = (P::Score, DecisionSequence<'p, P>);

    fn next(&mut self) -> Option<Self::Item> {
        let best_seen = &mut self.best_seen;
        loop {
            let node = self.walk.enter_next(|child| {
                let score = child.score();
                match best_seen.entry(child.state()) {
                    Entry::Occupied(mut seen) => {
                        let improves = O::better(score, *seen.get());
                        if improves {
                            seen.insert(score);
                        }
                        improves
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(score);
                        true
                    }
                }
            })?;
            if !node.is_solution() {
                continue;
            }
            self.walk.stats.solutions += 1;
            let score = node.score();
            if self.incumbent.is_none_or(|best| O::better(score, best)) {
                self.incumbent = Some(score);
                trace!(
                    score = ?score,
                    depth = node.len(),
                    "backtracking improved the best solution"
                );
                return Some((score, node));
            }
        }
    }
}

impl<P: ScoredProblem, O: Objective> FusedIterator for BtOptSolutions<'_, P, O> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::decision::path_state;
    use crate::schemes::path::DecisionPath;
    use crate::schemes::selection::{max_solution, min_solution};
    use std::cell::Cell;

    /// Subsets of `elements` summing to `target`, 0 before 1 at each level.
    struct SubsetSum {
        elements: Vec<u32>,
        target: u32,
        expanded: Cell<usize>,
    }

    impl SubsetSum {
        fn new(elements: &[u32], target: u32) -> Self {
            Self {
                elements: elements.to_vec(),
                target,
                expanded: Cell::new(0),
            }
        }
    }

    impl DecisionProblem for SubsetSum {
        type Decision = u8;
        type Extra = u32;
        type State = (usize, u32);

        fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool {
            ds.len() == self.elements.len() && *ds.extra() == self.target
        }

        fn successors<'p>(
            &'p self,
            ds: DecisionSequence<'p, Self>,
        ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p {
            self.expanded.set(self.expanded.get() + 1);
            let n = ds.len();
            let mut children = Vec::new();
            if n < self.elements.len() {
                children.push(ds.add_decision(0, *ds.extra()));
                let sum = ds.extra() + self.elements[n];
                if sum <= self.target {
                    children.push(ds.add_decision(1, sum));
                }
            }
            children.into_iter()
        }

        fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State {
            (ds.len(), *ds.extra())
        }
    }

    /// Number of elements picked.
    impl ScoredProblem for SubsetSum {
        type Score = usize;

        fn score(&self, ds: &DecisionSequence<'_, Self>) -> usize {
            ds.path().iter().filter(|&&d| d == 1).count()
        }
    }

    /// Every path of length `depth` over `{0, 1}`, keyed by path.
    struct AllPaths(usize);

    impl DecisionProblem for AllPaths {
        type Decision = u8;
        type Extra = ();
        type State = DecisionPath<u8>;

        fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool {
            ds.len() == self.0
        }

        fn successors<'p>(
            &'p self,
            ds: DecisionSequence<'p, Self>,
        ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p {
            let width = if ds.len() < self.0 { 2 } else { 0 };
            (0..width).map(move |d| ds.add_decision(d, ()))
        }

        fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State {
            path_state(ds)
        }
    }

    #[test]
    fn test_bt_solutions_depth_first_order() {
        let problem = AllPaths(2);
        let solutions: Vec<Vec<u8>> = bt_solutions(DecisionSequence::new(&problem, ()))
            .map(|s| s.decisions())
            .collect();
        assert_eq!(
            solutions,
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
        );
    }

    #[test]
    fn test_initial_node_can_be_a_solution() {
        let problem = AllPaths(0);
        let mut solutions = bt_solutions(DecisionSequence::new(&problem, ()));
        let first = solutions.next().expect("root is a solution");
        assert!(first.is_empty());
        assert!(solutions.next().is_none());
        assert!(solutions.next().is_none());
    }

    #[test]
    fn test_bt_solutions_subset_sum() {
        let problem = SubsetSum::new(&[1, 2, 3], 3);
        let solutions: Vec<Vec<u8>> = bt_solutions(DecisionSequence::new(&problem, 0))
            .map(|s| s.decisions())
            .collect();
        assert_eq!(solutions, vec![vec![0, 0, 1], vec![1, 1, 0]]);
    }

    #[test]
    fn test_unreachable_target_yields_nothing() {
        let problem = SubsetSum::new(&[1, 2, 3], 7);
        let mut solutions = bt_solutions(DecisionSequence::new(&problem, 0));
        assert!(solutions.next().is_none());
        assert_eq!(solutions.stats().solutions, 0);
        assert!(solutions.stats().expanded > 0);
    }

    #[test]
    fn test_search_is_lazy() {
        let problem = AllPaths(20);
        let mut solutions = bt_solutions(DecisionSequence::new(&problem, ()));
        let first = solutions.next().expect("at least one solution");
        assert_eq!(first.decisions(), vec![0; 20]);
        // Only the leftmost path has been expanded.
        assert_eq!(solutions.stats().expanded, 21);
        assert_eq!(solutions.depth(), 21);
    }

    #[test]
    fn test_vc_skips_equivalent_states() {
        // Elements 1 and 1 reach the same (len, sum) twice.
        let problem = SubsetSum::new(&[1, 1, 2], 2);
        let plain: Vec<Vec<u8>> = bt_solutions(DecisionSequence::new(&problem, 0))
            .map(|s| s.decisions())
            .collect();
        assert_eq!(plain, vec![vec![0, 0, 1], vec![1, 1, 0]]);

        problem.expanded.set(0);
        let mut vc = bt_vc_solutions(DecisionSequence::new(&problem, 0));
        let deduped: Vec<Vec<u8>> = vc.by_ref().map(|s| s.decisions()).collect();
        // [1, 1, 0] ends in state (3, 2), already claimed by [0, 0, 1].
        assert_eq!(deduped, vec![vec![0, 0, 1]]);
        assert!(vc.stats().revisited > 0);

        let vc_expanded = problem.expanded.get();
        problem.expanded.set(0);
        let _ = bt_solutions(DecisionSequence::new(&problem, 0)).count();
        assert!(vc_expanded < problem.expanded.get());
    }

    #[test]
    fn test_vc_collapses_duplicate_solutions() {
        // [0, 1] and [1, 0] both end in state (2, 1); only the first survives.
        let problem = SubsetSum::new(&[1, 1], 1);
        let deduped: Vec<Vec<u8>> = bt_vc_solutions(DecisionSequence::new(&problem, 0))
            .map(|s| s.decisions())
            .collect();
        assert_eq!(deduped, vec![vec![0, 1]]);
    }

    #[test]
    fn test_vc_with_path_state_matches_plain() {
        let problem = AllPaths(3);
        let plain = bt_solutions(DecisionSequence::new(&problem, ())).count();
        let vc = bt_vc_solutions(DecisionSequence::new(&problem, ())).count();
        assert_eq!(plain, 8);
        assert_eq!(vc, 8);
    }

    #[test]
    fn test_bt_min_solve_yields_improving_solutions() {
        let problem = SubsetSum::new(&[2, 1, 1], 2);
        let improving: Vec<(usize, Vec<u8>)> = bt_min_solve(DecisionSequence::new(&problem, 0))
            .map(|(score, s)| (score, s.decisions()))
            .collect();
        assert_eq!(improving, vec![(2, vec![0, 1, 1]), (1, vec![1, 0, 0])]);

        let best = min_solution(bt_solutions(DecisionSequence::new(&problem, 0)), |s| {
            s.score()
        })
        .map(|(score, s)| (score, s.decisions()));
        assert_eq!(improving.last().cloned(), best);
    }

    #[test]
    fn test_bt_max_solve_skips_dominated_states() {
        let problem = SubsetSum::new(&[1, 2, 3, 1], 3);
        let mut solver = bt_max_solve(DecisionSequence::new(&problem, 0));
        let improving: Vec<(usize, Vec<u8>)> =
            solver.by_ref().map(|(score, s)| (score, s.decisions())).collect();
        assert_eq!(improving, vec![(1, vec![0, 0, 1, 0]), (2, vec![0, 1, 0, 1])]);
        assert_eq!(solver.best_score(), Some(2));
        // [1, 1, 0, 0] only ties the best score of its final state.
        assert!(solver.stats().revisited > 0);

        let best = max_solution(bt_solutions(DecisionSequence::new(&problem, 0)), |s| {
            s.score()
        })
        .map(|(score, s)| (score, s.decisions()));
        assert_eq!(improving.last().cloned(), best);
    }

    #[test]
    fn test_bt_opt_solve_without_solutions() {
        let problem = SubsetSum::new(&[1, 2, 3], 7);
        let mut solver = bt_opt_solve::<Minimize, _>(DecisionSequence::new(&problem, 0));
        assert!(solver.next().is_none());
        assert!(solver.next().is_none());
        assert_eq!(solver.best_score(), None);
        assert_eq!(solver.stats().solutions, 0);
    }
}
