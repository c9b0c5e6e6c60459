//! Coin change: pay a quantity with as few coins as possible.
//!
//! Decision `i` is the number of coins of type `i` used. Coin types are
//! decided in the order given.

use crate::error::InstanceError;
use crate::schemes::bab::bab_min_solve;
use crate::schemes::backtracking::{
    BtOptSolutions, BtSolutions, bt_min_solve, bt_solutions, bt_vc_solutions,
};
use crate::schemes::bounded::{BabDecisionSequence, BoundedProblem};
use crate::schemes::decision::{DecisionProblem, DecisionSequence, ScoredProblem};
use crate::schemes::score::{Minimize, Score};
use crate::schemes::selection::min_solution;

/// A coin system and the quantity to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinChange {
    coins: Vec<u64>,
    quantity: u64,
    /// `largest_from[i]` is the largest coin among `coins[i..]`.
    largest_from: Vec<u64>,
}

/// Running totals of a partial payment.
///
/// The value paid so far is `quantity - pending` and every coin is worth at
/// least 1, so `used` never exceeds the quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payment {
    /// Quantity still to be paid.
    pub pending: u64,
    /// Coins used so far.
    pub used: u64,
}

impl CoinChange {
    /// Pays `quantity` with the coin values in `coins`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::ZeroCoin`] if a coin has value zero.
    pub fn new(coins: Vec<u64>, quantity: u64) -> Result<Self, InstanceError> {
        if let Some(index) = coins.iter().position(|&c| c == 0) {
            return Err(InstanceError::ZeroCoin { index });
        }
        let mut largest_from = coins.clone();
        for i in (0..largest_from.len().saturating_sub(1)).rev() {
            largest_from[i] = largest_from[i].max(largest_from[i + 1]);
        }
        Ok(Self {
            coins,
            quantity,
            largest_from,
        })
    }

    /// The coin values, in decision order.
    #[must_use]
    pub fn coins(&self) -> &[u64] {
        &self.coins
    }

    /// The quantity to pay.
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Nothing paid yet.
    #[must_use]
    pub const fn initial(&self) -> DecisionSequence<'_, Self> {
        DecisionSequence::new(
            self,
            Payment {
                pending: self.quantity,
                used: 0,
            },
        )
    }

    /// Total value of a complete assignment of coin counts, saturating at
    /// `u64::MAX`.
    #[must_use]
    pub fn paid(&self, counts: &[u64]) -> u64 {
        counts
            .iter()
            .zip(&self.coins)
            .fold(0, |acc: u64, (&n, &c)| acc.saturating_add(n.saturating_mul(c)))
    }

    /// Greedy completion: as many coins of each remaining type as fit.
    fn greedy_completion(&self, from: usize, payment: Payment) -> Option<u64> {
        let mut pending = payment.pending;
        let mut used = payment.used;
        for &coin in &self.coins[from..] {
            used += pending / coin;
            pending %= coin;
        }
        (pending == 0).then_some(used)
    }
}

impl DecisionProblem for CoinChange {
    type Decision = u64;
    type Extra = Payment;
    type State = (usize, u64);

    fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool {
        ds.len() == self.coins.len() && ds.extra().pending == 0
    }

    fn successors<'p>(
        &'p self,
        ds: DecisionSequence<'p, Self>,
    ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p {
        let n = ds.len();
        let Payment { pending, used } = *ds.extra();
        let (coin, counts) = match self.coins.get(n) {
            Some(&coin) => (coin, 0..=pending / coin),
            // Past the last coin type: no children.
            None => (1, 1..=0),
        };
        counts.map(move |count| {
            ds.add_decision(
                count,
                Payment {
                    pending: pending - count * coin,
                    used: used + count,
                },
            )
        })
    }

    fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State {
        (ds.len(), ds.extra().pending)
    }
}

impl ScoredProblem for CoinChange {
    type Score = u64;

    /// Coins used so far.
    fn score(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        ds.extra().used
    }
}

impl BoundedProblem for CoinChange {
    fn calculate_opt_bound(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        let Payment { pending, used } = *ds.extra();
        match self.largest_from.get(ds.len()) {
            Some(&largest) => used + pending.div_ceil(largest),
            None if pending == 0 => used,
            None => u64::INFINITY,
        }
    }

    fn calculate_pes_bound(&self, ds: &DecisionSequence<'_, Self>) -> u64 {
        self.greedy_completion(ds.len(), *ds.extra())
            .unwrap_or(u64::INFINITY)
    }
}

/// Every way of paying the quantity exactly.
#[must_use]
pub fn coin_change_solutions(problem: &CoinChange) -> BtSolutions<'_, CoinChange> {
    bt_solutions(problem.initial())
}

/// Ways of paying the quantity, one per `(coin type, pending)` state.
#[must_use]
pub fn coin_change_vc_solutions(problem: &CoinChange) -> BtSolutions<'_, CoinChange> {
    bt_vc_solutions(problem.initial())
}

/// Payments with ever fewer coins. The last one uses the fewest.
#[must_use]
pub fn coin_change_opt_solutions(
    problem: &CoinChange,
) -> BtOptSolutions<'_, CoinChange, Minimize> {
    bt_min_solve(problem.initial())
}

/// Fewest coins by exhaustive enumeration.
#[must_use]
pub fn coin_change_best(problem: &CoinChange) -> Option<(u64, Vec<u64>)> {
    min_solution(coin_change_solutions(problem), DecisionSequence::score)
        .map(|(score, node)| (score, node.decisions()))
}

/// Fewest coins by branch-and-bound.
#[must_use]
pub fn coin_change_bab(problem: &CoinChange) -> Option<(u64, Vec<u64>)> {
    bab_min_solve(BabDecisionSequence::new(problem.initial()))
        .map(|(score, node)| (score, node.decisions()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_coin_is_rejected() {
        assert_eq!(
            CoinChange::new(vec![1, 0, 5], 3),
            Err(InstanceError::ZeroCoin { index: 1 })
        );
    }

    #[test]
    fn test_all_solutions() {
        let problem = CoinChange::new(vec![1, 2, 5, 10], 4).expect("valid coins");
        let all: Vec<Vec<u64>> = coin_change_solutions(&problem)
            .map(|s| s.decisions())
            .collect();
        assert_eq!(
            all,
            vec![vec![0, 2, 0, 0], vec![2, 1, 0, 0], vec![4, 0, 0, 0]]
        );
        assert!(all.iter().all(|counts| problem.paid(counts) == 4));
    }

    #[test]
    fn test_best_by_enumeration() {
        let problem = CoinChange::new(vec![1, 2, 5, 10], 4).expect("valid coins");
        assert_eq!(coin_change_best(&problem), Some((2, vec![0, 2, 0, 0])));
    }

    #[test]
    fn test_bab_agrees_with_enumeration() {
        let problem = CoinChange::new(vec![1, 2, 5], 7).expect("valid coins");
        let (score, counts) = coin_change_bab(&problem).expect("7 = 2 + 5");
        assert_eq!(score, 2);
        assert_eq!(counts, vec![0, 1, 1]);
        assert_eq!(coin_change_best(&problem).map(|(s, _)| s), Some(2));

        let problem = CoinChange::new(vec![4, 3, 1], 6).expect("valid coins");
        let (score, counts) = coin_change_bab(&problem).expect("6 = 3 + 3");
        assert_eq!(score, 2);
        assert_eq!(problem.paid(&counts), 6);
    }

    #[test]
    fn test_vc_finds_first_solution() {
        let problem = CoinChange::new(vec![1, 2, 5], 7).expect("valid coins");
        let first = coin_change_vc_solutions(&problem)
            .next()
            .map(|s| s.decisions());
        assert_eq!(first, Some(vec![0, 1, 1]));
    }

    #[test]
    fn test_unpayable_quantity() {
        let problem = CoinChange::new(vec![2, 4], 3).expect("valid coins");
        assert_eq!(coin_change_solutions(&problem).count(), 0);
        assert_eq!(coin_change_best(&problem), None);
        assert_eq!(coin_change_bab(&problem), None);
    }

    #[test]
    fn test_bounds_at_root() {
        let problem = CoinChange::new(vec![1, 2, 5, 10], 4).expect("valid coins");
        let root = BabDecisionSequence::new(problem.initial());
        assert_eq!(root.opt(), 1);
        // Greedy in the given order pays 4 with four 1-coins.
        assert_eq!(root.pes(), 4);
    }

    #[test]
    fn test_opt_solutions_end_with_the_best() {
        let problem = CoinChange::new(vec![1, 2, 5, 10], 17).expect("valid coins");
        let improving: Vec<(u64, Vec<u64>)> = coin_change_opt_solutions(&problem)
            .map(|(score, s)| (score, s.decisions()))
            .collect();
        assert!(improving.windows(2).all(|w| w[1].0 < w[0].0));
        assert_eq!(improving.last().cloned(), coin_change_best(&problem));
        assert_eq!(improving.last().map(|(score, _)| *score), Some(3));
    }

    #[test]
    fn test_quantities_near_the_integer_limit() {
        let problem = CoinChange::new(vec![1], u64::MAX).expect("valid coins");
        let first = problem.initial().successors().next().expect("pay with no coins");
        assert_eq!(first.decisions(), vec![0]);
        assert_eq!(first.extra().pending, u64::MAX);
        assert!(!first.is_solution());

        let big = 1 << 62;
        let problem = CoinChange::new(vec![2 * big, big], 3 * big).expect("valid coins");
        assert_eq!(coin_change_bab(&problem), Some((2, vec![1, 1])));
        assert_eq!(coin_change_best(&problem), Some((2, vec![1, 1])));
        assert_eq!(problem.paid(&[u64::MAX, 1]), u64::MAX);
    }
}
