//! Subset sum: pick elements adding up to a target, using as few as possible
//! when optimising.
//!
//! Decision `i` is 1 if element `i` is picked. Leaving an element out is tried
//! first.

use crate::schemes::bab::{BranchAndBound, bab_min_solve};
use crate::schemes::backtracking::{
    BtOptSolutions, BtSolutions, bt_min_solve, bt_solutions, bt_vc_solutions,
};
use crate::schemes::bounded::{BabDecisionSequence, BoundedProblem};
use crate::schemes::decision::{DecisionProblem, DecisionSequence, ScoredProblem};
use crate::schemes::score::{Minimize, Score};
use crate::schemes::selection::min_solution;
use crate::schemes::stats::SearchStats;

/// A multiset of elements and the sum to reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetSum {
    elements: Vec<u64>,
    target: u64,
}

/// Running totals of a partial pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Picked {
    /// Sum of the picked elements, never above the target.
    pub sum: u64,
    /// Number of elements picked.
    pub count: u64,
}

impl SubsetSum {
    /// Elements are decided in the given order.
    #[must_use]
    pub const fn new(elements: Vec<u64>, target: u64) -> Self {
        Self { elements, target }
    }

    /// A seeded random instance: elements in `1..=1000`, target a quarter of
    /// their total.
    #[must_use]
    pub fn random(num_elements: usize, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let elements: Vec<u64> = (0..num_elements).map(|_| rng.u64(1..=1000)).collect();
        let target = elements.iter().sum::<u64>() / 4;
        Self { elements, target }
    }

    /// Elements, in decision order.
    #[must_use]
    pub fn elements(&self) -> &[u64] {
        &self.elements
    }

    /// Sum to reach.
    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    /// Nothing picked yet.
    #[must_use]
    pub const fn initial(&self) -> DecisionSequence<'_, Self> {
        DecisionSequence::new(self, Picked { sum: 0, count: 0 })
    }

    /// Sum of the picked elements of a complete selection. Any nonzero
    /// decision picks the element. Saturates at `u64::MAX`.
    #[must_use]
    pub fn sum_of(&self, selection: &[u8]) -> u64 {
        selection
            .iter()
            .zip(&self.elements)
            .filter(|&(&pick, _)| pick != 0)
            .fold(0, |sum, (_, &e)| sum.saturating_add(e))
    }
}

impl DecisionProblem for SubsetSum {
    type Decision = u8;
    type Extra = Picked;
    type State = (usize, u64);

    fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool {
        ds.len() == self.elements.len() && ds.extra().sum == self.target
    }

    fn successors<'p>(
        &'p self,
        ds: DecisionSequence<'p, Self>,
    ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p {
        let n = ds.len();
        let picked = *ds.extra();
        let mut children = Vec::with_capacity(2);
        if let Some(&element) = self.elements.get(n) {
            children.push(ds.add_decision(0, picked));
            if let Some(sum) = picked
                .sum
                .checked_add(element)
                .filter(|&s| s <= self.target)
            {
                children.push(ds.add_decision(
                    1,
                    Picked {
                        sum,
                        count: picked.count + 1,
                    },
                ));
            }
        }
        children.into_iter()
    }

    fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State {
        (ds.len(), ds.extra().sum)
    }
}

impl ScoredProblem for SubsetSum {
    type Score = u64;

    fn score(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        ds.extra().count
    }
}

impl BoundedProblem for SubsetSum {
    fn calculate_opt_bound(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        let Picked { sum, count } = *ds.extra();
        if sum == self.target { count } else { count + 1 }
    }

    fn calculate_pes_bound(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        let Picked { sum, count } = *ds.extra();
        if sum == self.target {
            count
        } else {
            u64::INFINITY
        }
    }
}

/// Every selection adding up to the target.
#[must_use]
pub fn subset_sum_solutions(problem: &SubsetSum) -> BtSolutions<'_, SubsetSum> {
    bt_solutions(problem.initial())
}

/// Selections adding up to the target, one per `(elements decided, sum)`
/// state.
#[must_use]
pub fn subset_sum_vc_solutions(problem: &SubsetSum) -> BtSolutions<'_, SubsetSum> {
    bt_vc_solutions(problem.initial())
}

/// Selections using ever fewer elements. The last one uses the fewest.
#[must_use]
pub fn subset_sum_opt_solutions(problem: &SubsetSum) -> BtOptSolutions<'_, SubsetSum, Minimize> {
    bt_min_solve(problem.initial())
}

/// Selection with the fewest elements, by exhaustive enumeration.
#[must_use]
pub fn subset_sum_best(problem: &SubsetSum) -> Option<(u64, Vec<u8>)> {
    min_solution(subset_sum_solutions(problem), DecisionSequence::score)
        .map(|(score, node)| (score, node.decisions()))
}

/// Selection with the fewest elements, by branch-and-bound.
#[must_use]
pub fn subset_sum_bab(problem: &SubsetSum) -> Option<(u64, Vec<u8>)> {
    bab_min_solve(BabDecisionSequence::new(problem.initial()))
        .map(|(score, node)| (score, node.decisions()))
}

/// Like [`subset_sum_bab`], also returning the search statistics.
#[must_use]
pub fn subset_sum_bab_with_stats(problem: &SubsetSum) -> (Option<(u64, Vec<u8>)>, SearchStats) {
    let mut solver =
        BranchAndBound::<_, Minimize>::new(BabDecisionSequence::new(problem.initial()));
    let best = solver
        .solve()
        .map(|(score, node)| (score, node.decisions()));
    (best, *solver.stats())
}
