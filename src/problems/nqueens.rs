//! The n-queens puzzle.
//!
//! Decision `t` is the row of the queen placed in column `t`. Rows and both
//! diagonal directions already under attack are kept in bitsets carried by
//! the node, so a candidate row is checked in O(1).

use crate::schemes::backtracking::{BtSolutions, bt_solutions, bt_vc_solutions};
use crate::schemes::decision::{DecisionProblem, DecisionSequence, path_state};
use crate::schemes::path::DecisionPath;
use bit_vec::BitVec;

/// Board of `size` x `size` squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NQueens {
    size: usize,
}

/// Squares attacked by the queens placed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attacked {
    rows: BitVec,
    /// Indexed by `row + column`.
    rising: BitVec,
    /// Indexed by `row + size - 1 - column`.
    falling: BitVec,
}

impl NQueens {
    /// A board with `size` columns and rows.
    #[must_use]
    pub const fn new(size: usize) -> Self {
        Self { size }
    }

    /// Side of the board.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The empty board.
    #[must_use]
    pub fn initial(&self) -> DecisionSequence<'_, Self> {
        let diagonals = (2 * self.size).saturating_sub(1);
        DecisionSequence::new(
            self,
            Attacked {
                rows: BitVec::from_elem(self.size, false),
                rising: BitVec::from_elem(diagonals, false),
                falling: BitVec::from_elem(diagonals, false),
            },
        )
    }

    fn is_free(&self, attacked: &Attacked, row: usize, column: usize) -> bool {
        !attacked.rows[row]
            && !attacked.rising[row + column]
            && !attacked.falling[row + self.size - 1 - column]
    }

    fn place(&self, attacked: &Attacked, row: usize, column: usize) -> Attacked {
        let mut next = attacked.clone();
        next.rows.set(row, true);
        next.rising.set(row + column, true);
        next.falling.set(row + self.size - 1 - column, true);
        next
    }
}

impl DecisionProblem for NQueens {
    type Decision = usize;
    type Extra = Attacked;
    type State = DecisionPath<usize>;

    fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool {
        ds.len() == self.size
    }

    fn successors<'p>(
        &'p self,
        ds: DecisionSequence<'p, Self>,
    ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p {
        let column = ds.len();
        let rows = if column < self.size { self.size } else { 0 };
        let attacked = ds.extra().clone();
        (0..rows)
            .filter(move |&row| self.is_free(&attacked, row, column))
            .map(move |row| ds.add_decision(row, self.place(ds.extra(), row, column)))
    }

    fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State {
        path_state(ds)
    }
}

/// Every placement of `problem.size()` non-attacking queens, in lexicographic
/// order of the rows.
#[must_use]
pub fn nqueens_solutions(problem: &NQueens) -> BtSolutions<'_, NQueens> {
    bt_solutions(problem.initial())
}

/// Same as [`nqueens_solutions`], with visited control on the full path.
#[must_use]
pub fn nqueens_vc_solutions(problem: &NQueens) -> BtSolutions<'_, NQueens> {
    bt_vc_solutions(problem.initial())
}
