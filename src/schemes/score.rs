//! Scores and optimisation directions.
//!
//! Branch-and-bound needs a totally ordered score with representable
//! infinities: problems that cannot cheaply compute a pessimistic bound return
//! `Score::INFINITY` (minimisation) or `Score::NEG_INFINITY` (maximisation).
//! Floating point scores go through `OrderedFloat` so that they can live in a
//! binary heap.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt::Debug;

/// A totally ordered score with sentinel values for "unbounded".
pub trait Score: Copy + Ord + Debug {
    /// Worse than any attainable minimisation score.
    const INFINITY: Self;
    /// Worse than any attainable maximisation score.
    const NEG_INFINITY: Self;
}

macro_rules! impl_integer_score {
    ($($t:ty),* $(,)?) => {
        $(
            impl Score for $t {
                const INFINITY: Self = <$t>::MAX;
                const NEG_INFINITY: Self = <$t>::MIN;
            }
        )*
    };
}

impl_integer_score!(i32, i64, u32, u64, usize);

impl Score for OrderedFloat<f64> {
    const INFINITY: Self = OrderedFloat(f64::INFINITY);
    const NEG_INFINITY: Self = OrderedFloat(f64::NEG_INFINITY);
}

/// Direction of optimisation.
///
/// Implemented by the zero-sized markers [`Minimize`] and [`Maximize`]; the
/// branch-and-bound engine is generic over it instead of taking a comparison
/// function and a heap flavour at runtime.
pub trait Objective: Debug + Clone + Copy + Default {
    /// The score no solution can be worse than.
    fn worst<S: Score>() -> S;

    /// Returns `true` if `a` is strictly better than `b`.
    fn better<S: Score>(a: S, b: S) -> bool;

    /// Orders scores so that the better one compares as `Greater`.
    fn priority<S: Score>(a: S, b: S) -> Ordering;

    /// The better of two scores, `a` on ties.
    fn best<S: Score>(a: S, b: S) -> S {
        if Self::better(b, a) { b } else { a }
    }
}

/// Smaller scores are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Minimize;

/// Larger scores are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Maximize;

impl Objective for Minimize {
    fn worst<S: Score>() -> S {
        S::INFINITY
    }

    fn better<S: Score>(a: S, b: S) -> bool {
        a < b
    }

    fn priority<S: Score>(a: S, b: S) -> Ordering {
        b.cmp(&a)
    }
}

impl Objective for Maximize {
    fn worst<S: Score>() -> S {
        S::NEG_INFINITY
    }

    fn better<S: Score>(a: S, b: S) -> bool {
        a > b
    }

    fn priority<S: Score>(a: S, b: S) -> Ordering {
        a.cmp(&b)
    }
}
