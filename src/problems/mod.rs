#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Classic combinatorial problems expressed as decision problems.
//!
//! Each module defines the instance type, implements
//! [`DecisionProblem`](crate::schemes::DecisionProblem) (and
//! [`BoundedProblem`](crate::schemes::BoundedProblem) where a bound is known)
//! and offers `*_solutions`, `*_best` and `*_bab` entry points. Problems with
//! a score also offer `*_opt_solutions`, which yields improving solutions.

pub mod coin_change;
pub mod hamiltonian;
pub mod knapsack;
pub mod nqueens;
pub mod subset_sum;

pub use coin_change::CoinChange;
pub use hamiltonian::{Graph, HamiltonianCycle};
pub use knapsack::Knapsack;
pub use nqueens::NQueens;
pub use subset_sum::SubsetSum;
