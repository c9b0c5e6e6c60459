//! 0/1 knapsack: choose items maximising total value within a weight limit.
//!
//! Decision `i` is 1 if item `i` goes in the knapsack, 0 otherwise. Taking an
//! item is tried before leaving it out.

use crate::error::InstanceError;
use crate::schemes::bab::{BranchAndBound, bab_max_solve};
use crate::schemes::backtracking::{
    BtOptSolutions, BtSolutions, bt_max_solve, bt_solutions, bt_vc_solutions,
};
use crate::schemes::bounded::{BabDecisionSequence, BoundedProblem};
use crate::schemes::decision::{DecisionProblem, DecisionSequence, ScoredProblem};
use crate::schemes::score::Maximize;
use crate::schemes::selection::max_solution;
use crate::schemes::stats::SearchStats;
use std::cmp::Ordering;

/// A knapsack instance.
///
/// The total weight and the total value of all items fit in a `u64`, so no
/// partial load can overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knapsack {
    weights: Vec<u64>,
    values: Vec<u64>,
    capacity: u64,
    /// Item indices by decreasing value per unit of weight.
    by_ratio: Vec<usize>,
}

/// Contents of a partially filled knapsack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Load {
    /// Weight of the items taken.
    pub weight: u64,
    /// Value of the items taken.
    pub value: u64,
}

impl Knapsack {
    /// Item `i` weighs `weights[i]` and is worth `values[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::LengthMismatch`] if `weights` and `values`
    /// differ in length, [`InstanceError::ZeroWeight`] for an item that
    /// weighs nothing, and [`InstanceError::Overflow`] if the total weight or
    /// the total value does not fit in a `u64`.
    pub fn new(weights: Vec<u64>, values: Vec<u64>, capacity: u64) -> Result<Self, InstanceError> {
        if weights.len() != values.len() {
            return Err(InstanceError::LengthMismatch {
                weights: weights.len(),
                values: values.len(),
            });
        }
        if let Some(index) = weights.iter().position(|&w| w == 0) {
            return Err(InstanceError::ZeroWeight { index });
        }
        checked_total(&weights, "total knapsack weight")?;
        checked_total(&values, "total knapsack value")?;
        Ok(Self::build(weights, values, capacity))
    }

    fn build(weights: Vec<u64>, values: Vec<u64>, capacity: u64) -> Self {
        let mut by_ratio: Vec<usize> = (0..weights.len()).collect();
        by_ratio.sort_by(|&a, &b| ratio_order(&weights, &values, a, b));
        Self {
            weights,
            values,
            capacity,
            by_ratio,
        }
    }

    /// The six-item instance whose optimum is 354.
    #[must_use]
    pub fn sample() -> Self {
        Self::build(
            vec![42, 55, 93, 89, 98, 77],
            vec![168, 110, 186, 89, 98, 77],
            136,
        )
    }

    /// A seeded random instance.
    ///
    /// Weights are drawn from `10..=100`, each value is its weight times a
    /// factor in `1..=4`, and the capacity is 30% of the total weight. Items
    /// are listed by decreasing value per unit of weight, so that the
    /// pessimistic greedy fill takes the most profitable items first.
    #[must_use]
    pub fn random(num_objects: usize, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let weights: Vec<u64> = (0..num_objects).map(|_| rng.u64(10..=100)).collect();
        let values: Vec<u64> = weights.iter().map(|&w| w * rng.u64(1..=4)).collect();
        let capacity = weights.iter().sum::<u64>() * 3 / 10;

        let unsorted = Self::build(weights, values, capacity);
        let weights = unsorted.by_ratio.iter().map(|&i| unsorted.weights[i]).collect();
        let values = unsorted.by_ratio.iter().map(|&i| unsorted.values[i]).collect();
        Self::build(weights, values, capacity)
    }

    /// Item weights, in decision order.
    #[must_use]
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Item values, in decision order.
    #[must_use]
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Weight limit.
    #[must_use]
    pub const fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The empty knapsack.
    #[must_use]
    pub const fn initial(&self) -> DecisionSequence<'_, Self> {
        DecisionSequence::new(
            self,
            Load {
                weight: 0,
                value: 0,
            },
        )
    }

    /// Total value of a complete selection. Any nonzero decision takes the
    /// item.
    #[must_use]
    pub fn value_of(&self, selection: &[u8]) -> u64 {
        selection
            .iter()
            .zip(&self.values)
            .filter(|&(&take, _)| take != 0)
            .map(|(_, &v)| v)
            .sum()
    }

    /// Items not yet decided, most profitable first.
    fn pending(&self, decided: usize) -> impl Iterator<Item = usize> + '_ {
        self.by_ratio.iter().copied().filter(move |&i| i >= decided)
    }
}

fn checked_total(items: &[u64], total: &'static str) -> Result<u64, InstanceError> {
    items
        .iter()
        .try_fold(0_u64, |acc, &x| acc.checked_add(x))
        .ok_or(InstanceError::Overflow { total })
}

fn ratio_order(weights: &[u64], values: &[u64], a: usize, b: usize) -> Ordering {
    let lhs = u128::from(values[b]) * u128::from(weights[a]);
    let rhs = u128::from(values[a]) * u128::from(weights[b]);
    lhs.cmp(&rhs)
}

impl DecisionProblem for Knapsack {
    type Decision = u8;
    type Extra = Load;
    type State = (usize, u64);

    fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool {
        ds.len() == self.len()
    }

    fn successors<'p>(
        &'p self,
        ds: DecisionSequence<'p, Self>,
    ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p {
        let n = ds.len();
        let load = *ds.extra();
        let mut children = Vec::with_capacity(2);
        if n < self.len() {
            if let Some(weight) = load
                .weight
                .checked_add(self.weights[n])
                .filter(|&w| w <= self.capacity)
            {
                children.push(ds.add_decision(
                    1,
                    Load {
                        weight,
                        value: load.value + self.values[n],
                    },
                ));
            }
            children.push(ds.add_decision(0, load));
        }
        children.into_iter()
    }

    fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State {
        (ds.len(), ds.extra().weight)
    }
}

impl ScoredProblem for Knapsack {
    type Score = u64;

    /// Value of the items taken so far.
    fn score(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        ds.extra().value
    }
}

impl BoundedProblem for Knapsack {
    /// Fractional relaxation over the pending items, rounded down.
    fn calculate_opt_bound(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        let Load { weight, mut value } = *ds.extra();
        let mut room = self.capacity - weight;
        for i in self.pending(ds.len()) {
            if self.weights[i] <= room {
                room -= self.weights[i];
                value += self.values[i];
            } else {
                // Less than the item's own value, so it fits in a u64.
                let fraction =
                    u128::from(self.values[i]) * u128::from(room) / u128::from(self.weights[i]);
                value += u64::try_from(fraction).unwrap_or(self.values[i]);
                break;
            }
        }
        value
    }

    /// Greedy fill with every pending item that still fits.
    fn calculate_pes_bound(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        let Load { weight, mut value } = *ds.extra();
        let mut room = self.capacity - weight;
        for i in self.pending(ds.len()) {
            if self.weights[i] <= room {
                room -= self.weights[i];
                value += self.values[i];
            }
        }
        value
    }
}

/// Every selection that fits.
#[must_use]
pub fn knapsack_solutions(problem: &Knapsack) -> BtSolutions<'_, Knapsack> {
    bt_solutions(problem.initial())
}

/// Selections that fit, one per `(items decided, weight)` state.
#[must_use]
pub fn knapsack_vc_solutions(problem: &Knapsack) -> BtSolutions<'_, Knapsack> {
    bt_vc_solutions(problem.initial())
}

/// Selections of ever higher value. The last one is the most valuable.
#[must_use]
pub fn knapsack_opt_solutions(problem: &Knapsack) -> BtOptSolutions<'_, Knapsack, Maximize> {
    bt_max_solve(problem.initial())
}

/// Best selection by exhaustive enumeration.
#[must_use]
pub fn knapsack_best(problem: &Knapsack) -> Option<(u64, Vec<u8>)> {
    max_solution(knapsack_solutions(problem), DecisionSequence::score)
        .map(|(score, node)| (score, node.decisions()))
}

/// Best selection by branch-and-bound.
#[must_use]
pub fn knapsack_bab(problem: &Knapsack) -> Option<(u64, Vec<u8>)> {
    bab_max_solve(BabDecisionSequence::new(problem.initial()))
        .map(|(score, node)| (score, node.decisions()))
}

/// Like [`knapsack_bab`], also returning the search statistics.
#[must_use]
pub fn knapsack_bab_with_stats(problem: &Knapsack) -> (Option<(u64, Vec<u8>)>, SearchStats) {
    let mut solver =
        BranchAndBound::<_, Maximize>::new(BabDecisionSequence::new(problem.initial()));
    let best = solver
        .solve()
        .map(|(score, node)| (score, node.decisions()));
    (best, *solver.stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_instances() {
        assert_eq!(
            Knapsack::new(vec![1, 2], vec![1], 3),
            Err(InstanceError::LengthMismatch {
                weights: 2,
                values: 1
            })
        );
        assert_eq!(
            Knapsack::new(vec![1, 0], vec![1, 1], 3),
            Err(InstanceError::ZeroWeight { index: 1 })
        );
    }

    #[test]
    fn test_sample_bab() {
        let problem = Knapsack::sample();
        assert_eq!(knapsack_bab(&problem), Some((354, vec![1, 0, 1, 0, 0, 0])));
    }

    #[test]
    fn test_sample_by_enumeration() {
        let problem = Knapsack::sample();
        assert_eq!(knapsack_best(&problem), Some((354, vec![1, 0, 1, 0, 0, 0])));
    }

    #[test]
    fn test_root_bounds() {
        let problem = Knapsack::sample();
        let root = BabDecisionSequence::new(problem.initial());
        // 42 (168) + 55 (110) fit, then 39 of 93 (186 * 39 / 93 = 78).
        assert_eq!(root.opt(), 356);
        // 42 + 55 = 97, nothing else fits in the remaining 39.
        assert_eq!(root.pes(), 278);
    }

    #[test]
    fn test_vc_solutions_are_a_subset() {
        let problem = Knapsack::random(10, 7);
        let all: Vec<Vec<u8>> = knapsack_solutions(&problem)
            .map(|s| s.decisions())
            .collect();
        let vc: Vec<Vec<u8>> = knapsack_vc_solutions(&problem)
            .map(|s| s.decisions())
            .collect();
        assert!(vc.len() <= all.len());
        assert!(vc.iter().all(|s| all.contains(s)));
    }

    #[test]
    fn test_random_instances_agree() {
        for seed in 0..4 {
            let problem = Knapsack::random(12, seed);
            let brute = knapsack_best(&problem).map(|(v, _)| v);
            let (bab, stats) = knapsack_bab_with_stats(&problem);
            assert_eq!(bab.map(|(v, _)| v), brute);
            assert_eq!(stats.solutions, 1);
        }
    }

    #[test]
    fn test_random_is_reproducible_and_sorted() {
        let a = Knapsack::random(20, 5);
        let b = Knapsack::random(20, 5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        assert!(a.weights().iter().all(|w| (10..=100).contains(w)));
        assert!(a.by_ratio.iter().copied().eq(0..20));
        assert_eq!(a.capacity(), a.weights().iter().sum::<u64>() * 3 / 10);
    }

    #[test]
    fn test_empty_knapsack() {
        let problem = Knapsack::new(vec![], vec![], 10).expect("empty is valid");
        assert!(problem.is_empty());
        assert_eq!(knapsack_bab(&problem), Some((0, vec![])));
    }

    #[test]
    fn test_totals_must_fit_in_u64() {
        assert_eq!(
            Knapsack::new(vec![u64::MAX, 1], vec![1, 1], 5),
            Err(InstanceError::Overflow {
                total: "total knapsack weight"
            })
        );
        assert_eq!(
            Knapsack::new(vec![1, 1], vec![u64::MAX, 1], 5),
            Err(InstanceError::Overflow {
                total: "total knapsack value"
            })
        );
    }

    #[test]
    fn test_large_weights_and_values() {
        let e10 = 10_000_000_000;
        let problem = Knapsack::new(vec![e10, 2 * e10], vec![e10, e10], e10 + e10 / 2)
            .expect("totals fit");
        let root = BabDecisionSequence::new(problem.initial());
        // The first item fits, then half of the second one.
        assert_eq!(root.opt(), e10 + e10 / 4);
        assert_eq!(root.pes(), e10);
        assert_eq!(knapsack_bab(&problem), Some((e10, vec![1, 0])));
        assert_eq!(knapsack_best(&problem), Some((e10, vec![1, 0])));

        let problem = Knapsack::new(vec![u64::MAX / 2, u64::MAX / 2], vec![3, 4], u64::MAX)
            .expect("totals fit");
        assert_eq!(knapsack_bab(&problem), Some((7, vec![1, 1])));
    }

    #[test]
    fn test_opt_solutions_end_with_the_best() {
        let problem = Knapsack::sample();
        let improving: Vec<(u64, Vec<u8>)> = knapsack_opt_solutions(&problem)
            .map(|(score, s)| (score, s.decisions()))
            .collect();
        assert!(improving.windows(2).all(|w| w[1].0 > w[0].0));
        assert_eq!(improving.last().cloned(), Some((354, vec![1, 0, 1, 0, 0, 0])));
    }
}
