#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Generic search schemes over implicit decision trees.
//!
//! A problem implements [`DecisionProblem`], adds [`ScoredProblem`] to be
//! optimised by backtracking and [`BoundedProblem`] for branch-and-bound; the
//! solvers here take care of exploring, pruning and reporting.

pub mod bab;
pub mod backtracking;
pub mod bounded;
pub mod decision;
pub mod path;
pub mod score;
pub mod selection;
pub mod stats;

pub use bab::{BranchAndBound, bab_max_solve, bab_min_solve, bab_solve};
pub use backtracking::{
    BtOptSolutions, BtSolutions, bt_max_solve, bt_min_solve, bt_opt_solve, bt_solutions,
    bt_vc_solutions,
};
pub use bounded::{BabDecisionSequence, BoundedProblem};
pub use decision::{DecisionProblem, DecisionSequence, ScoredProblem, path_state};
pub use path::DecisionPath;
pub use score::{Maximize, Minimize, Objective, Score};
pub use selection::{max_solution, min_solution};
pub use stats::SearchStats;
