//! Brute-force selection of the best solution from an enumeration.
//!
//! These helpers score every candidate of a (typically `bt_solutions`)
//! stream and keep the best one. They do no pruning at all, which makes them
//! a reference to check branch-and-bound results against on small instances.

/// Returns the candidate with the smallest score, with that score.
///
/// `score_fn` is called exactly once per candidate. On ties the earliest
/// candidate wins. Returns `None` if `solutions` is empty.
pub fn min_solution<T, S, I, F>(solutions: I, score_fn: F) -> Option<(S, T)>
where
    I: IntoIterator<Item = T>,
    S: Ord,
    F: FnMut(&T) -> S,
{
    select(solutions, score_fn, |candidate, best| candidate < best)
}

/// Returns the candidate with the largest score, with that score.
///
/// Same contract as [`min_solution`].
pub fn max_solution<T, S, I, F>(solutions: I, score_fn: F) -> Option<(S, T)>
where
    I: IntoIterator<Item = T>,
    S: Ord,
    F: FnMut(&T) -> S,
{
    select(solutions, score_fn, |candidate, best| candidate > best)
}

fn select<T, S, I, F, B>(solutions: I, mut score_fn: F, better: B) -> Option<(S, T)>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> S,
    B: Fn(&S, &S) -> bool,
{
    solutions.into_iter().fold(None, |best, candidate| {
        let score = score_fn(&candidate);
        let keep = best
            .as_ref()
            .is_some_and(|(best_score, _)| !better(&score, best_score));
        if keep { best } else { Some((score, candidate)) }
    })
}
