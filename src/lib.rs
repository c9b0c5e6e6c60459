#![deny(missing_docs)]
//! This crate provides generic search schemes over implicit decision trees:
//! lazy backtracking with optional visited control, brute-force selection of
//! the best solution, and best-first branch-and-bound with bound and dominance
//! pruning.

/// The `error` module defines the errors raised by node accessors and by the
/// constructors of problem instances.
pub mod error;

/// The `problems` module implements n-queens, coin change, knapsack, subset sum
/// and Hamiltonian cycles on top of the search schemes.
pub mod problems;

/// The `schemes` module implements decision paths and sequences together with
/// the backtracking and branch-and-bound solvers.
pub mod schemes;
