//! Hamiltonian cycles in a weighted undirected graph.
//!
//! Every cycle is rooted at vertex 0, which is forced as the first decision.
//! The remaining decisions are the vertices in the order they are visited.

use crate::error::{InstanceError, ParseTokenError};
use crate::schemes::bab::{BranchAndBound, bab_min_solve};
use crate::schemes::backtracking::{BtOptSolutions, BtSolutions, bt_min_solve, bt_solutions};
use crate::schemes::bounded::{BabDecisionSequence, BoundedProblem};
use crate::schemes::decision::{DecisionProblem, DecisionSequence, ScoredProblem};
use crate::schemes::score::{Minimize, Score};
use crate::schemes::selection::min_solution;
use crate::schemes::stats::SearchStats;
use bit_vec::BitVec;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

/// Edge weights and path lengths.
pub type Weight = OrderedFloat<f64>;

const UNREACHABLE: Weight = <Weight as Score>::INFINITY;

/// One weighted edge, `(from, to, weight)`.
pub type Edge = (usize, usize, f64);

type Neighbours = SmallVec<[(usize, Weight); 4]>;

/// Weighted undirected graph stored as adjacency lists.
///
/// Neighbours are kept in the order their edges were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Neighbours>,
}

impl Graph {
    /// A graph on `0..vertices` holding `edges`. A loop `(v, v, w)` is stored
    /// once.
    ///
    /// # Errors
    ///
    /// [`InstanceError::UnknownVertex`] if an edge leaves `0..vertices`,
    /// [`InstanceError::InvalidWeight`] for a negative or NaN weight.
    pub fn new(vertices: usize, edges: &[Edge]) -> Result<Self, InstanceError> {
        let mut adjacency = vec![Neighbours::new(); vertices];
        for &(from, to, weight) in edges {
            for vertex in [from, to] {
                if vertex >= vertices {
                    return Err(InstanceError::UnknownVertex { vertex, vertices });
                }
            }
            if weight.is_nan() || weight < 0.0 {
                return Err(InstanceError::InvalidWeight { from, to });
            }
            adjacency[from].push((to, OrderedFloat(weight)));
            if from != to {
                adjacency[to].push((from, OrderedFloat(weight)));
            }
        }
        Ok(Self { adjacency })
    }

    /// Ten vertices and sixteen edges, weighted by `|u - v|`. Its shortest
    /// Hamiltonian cycle has length 34.
    #[must_use]
    pub fn sample() -> Self {
        let pairs: [(u8, u8); 16] = [
            (0, 2),
            (0, 3),
            (0, 9),
            (1, 3),
            (1, 4),
            (1, 8),
            (2, 3),
            (2, 5),
            (3, 4),
            (3, 6),
            (4, 7),
            (5, 6),
            (5, 8),
            (6, 7),
            (6, 8),
            (6, 9),
        ];
        let mut adjacency = vec![Neighbours::new(); 10];
        for (u, v) in pairs {
            let weight = OrderedFloat(f64::from(u.abs_diff(v)));
            adjacency[usize::from(u)].push((usize::from(v), weight));
            adjacency[usize::from(v)].push((usize::from(u), weight));
        }
        Self { adjacency }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Neighbours of `vertex` with the weight of the edge to each.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is not below [`Graph::vertices`].
    pub fn neighbours(&self, vertex: usize) -> impl Iterator<Item = (usize, Weight)> + '_ {
        self.adjacency[vertex].iter().copied()
    }

    /// Weight of the edge `{u, v}`, if there is one.
    #[must_use]
    pub fn weight(&self, u: usize, v: usize) -> Option<Weight> {
        self.adjacency
            .get(u)?
            .iter()
            .find_map(|&(to, w)| (to == v).then_some(w))
    }
}

/// Parses an edge written as `u-v` or `u-v:weight`.
///
/// The weight defaults to 1.
///
/// # Errors
///
/// Returns a [`ParseTokenError`] naming the malformed token.
pub fn parse_edge(token: &str) -> Result<Edge, ParseTokenError> {
    let malformed = || ParseTokenError {
        token: token.to_string(),
        expected: "an edge 'u-v' or 'u-v:weight'",
    };
    let (pair, weight) = match token.split_once(':') {
        Some((pair, weight)) => (pair, weight.trim().parse::<f64>().map_err(|_| malformed())?),
        None => (token, 1.0),
    };
    let (from, to) = pair.split_once('-').ok_or_else(malformed)?;
    let from = from.trim().parse::<usize>().map_err(|_| malformed())?;
    let to = to.trim().parse::<usize>().map_err(|_| malformed())?;
    Ok((from, to, weight))
}

/// Search for Hamiltonian cycles of a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HamiltonianCycle {
    graph: Graph,
    /// Lightest edge incident to each vertex.
    lightest: Vec<Weight>,
}

/// Vertices visited so far and the length of the path through them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    /// Bit `v` is set once vertex `v` is on the path.
    pub visited: BitVec,
    /// Total weight of the path edges.
    pub length: Weight,
}

impl HamiltonianCycle {
    /// Precomputes the lightest edge of every vertex of `graph`.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        let lightest = (0..graph.vertices())
            .map(|v| {
                graph
                    .neighbours(v)
                    .map(|(_, w)| w)
                    .min()
                    .unwrap_or(UNREACHABLE)
            })
            .collect();
        Self { graph, lightest }
    }

    /// The graph searched.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The path holding only vertex 0. An empty graph yields the empty path,
    /// which is never a solution.
    #[must_use]
    pub fn initial(&self) -> DecisionSequence<'_, Self> {
        let mut visited = BitVec::from_elem(self.graph.vertices(), false);
        let root = DecisionSequence::new(
            self,
            Tour {
                visited: visited.clone(),
                length: OrderedFloat(0.0),
            },
        );
        if self.graph.vertices() == 0 {
            return root;
        }
        visited.set(0, true);
        root.add_decision(
            0,
            Tour {
                visited,
                length: OrderedFloat(0.0),
            },
        )
    }

    /// Length of the closed cycle, or `None` if `ds` is not a complete tour
    /// whose last vertex connects back to vertex 0.
    #[must_use]
    pub fn cycle_length(&self, ds: &DecisionSequence<'_, Self>) -> Option<Weight> {
        if ds.len() != self.graph.vertices() {
            return None;
        }
        let &last = ds.last_decision().ok()?;
        self.graph
            .weight(last, 0)
            .map(|closing| ds.extra().length + closing)
    }
}

impl DecisionProblem for HamiltonianCycle {
    type Decision = usize;
    type Extra = Tour;
    type State = (usize, BitVec);

    fn is_solution(&self, ds: &DecisionSequence<'_, Self>) -> bool {
        self.cycle_length(ds).is_some()
    }

    fn successors<'p>(
        &'p self,
        ds: DecisionSequence<'p, Self>,
    ) -> impl Iterator<Item = DecisionSequence<'p, Self>> + 'p {
        let last = match ds.last_decision() {
            Ok(&last) if ds.len() < self.graph.vertices() => Some(last),
            _ => None,
        };
        let visited = ds.extra().visited.clone();
        last.into_iter()
            .flat_map(move |last| self.graph.neighbours(last))
            .filter(move |&(v, _)| !visited[v])
            .map(move |(v, w)| {
                let Tour { mut visited, length } = ds.extra().clone();
                visited.set(v, true);
                ds.add_decision(
                    v,
                    Tour {
                        visited,
                        length: length + w,
                    },
                )
            })
    }

    fn state(&self, ds: &DecisionSequence<'_, Self>) -> Self::State {
        let last = ds.last_decision().map_or(usize::MAX, |&v| v);
        (last, ds.extra().visited.clone())
    }
}

impl ScoredProblem for HamiltonianCycle {
    type Score = Weight;

    /// Length of the open path, or of the closed cycle once every vertex is
    /// visited. A complete path that cannot close scores infinity.
    fn score(&self, ds: &DecisionSequence<'_, Self>) -> Weight {
        if ds.len() < self.graph.vertices() {
            ds.extra().length
        } else {
            self.cycle_length(ds).unwrap_or(UNREACHABLE)
        }
    }
}

impl BoundedProblem for HamiltonianCycle {
    /// Path length plus the lightest edge into every vertex the cycle still
    /// has to enter, vertex 0 included.
    fn calculate_opt_bound(&self, ds: &DecisionSequence<'_, Self>) -> Weight {
        if ds.len() == self.graph.vertices() {
            return self.cycle_length(ds).unwrap_or(UNREACHABLE);
        }
        let Tour { visited, length } = ds.extra();
        let pending = visited
            .iter()
            .zip(&self.lightest)
            .filter(|&(seen, _)| !seen)
            .fold(OrderedFloat(0.0), |acc, (_, &w)| acc + w);
        let closing = self.lightest.first().copied().unwrap_or(UNREACHABLE);
        *length + pending + closing
    }

    fn calculate_pes_bound(&self, ds: &DecisionSequence<'_, Self>) -> Weight {
        self.cycle_length(ds).unwrap_or(UNREACHABLE)
    }
}

/// Every Hamiltonian cycle through vertex 0, both directions included.
#[must_use]
pub fn hamiltonian_cycles(problem: &HamiltonianCycle) -> BtSolutions<'_, HamiltonianCycle> {
    bt_solutions(problem.initial())
}

/// Cycles of ever shorter length. A path is dropped when a path at least as
/// short already ended at the same vertex after visiting the same set.
#[must_use]
pub fn hamiltonian_opt_solutions(
    problem: &HamiltonianCycle,
) -> BtOptSolutions<'_, HamiltonianCycle, Minimize> {
    bt_min_solve(problem.initial())
}

/// Shortest cycle by exhaustive enumeration.
#[must_use]
pub fn hamiltonian_best(problem: &HamiltonianCycle) -> Option<(Weight, Vec<usize>)> {
    min_solution(hamiltonian_cycles(problem), DecisionSequence::score)
        .map(|(length, ds)| (length, ds.decisions()))
}

/// Shortest cycle by branch-and-bound.
#[must_use]
pub fn hamiltonian_bab(problem: &HamiltonianCycle) -> Option<(Weight, Vec<usize>)> {
    bab_min_solve(BabDecisionSequence::new(problem.initial()))
        .map(|(length, node)| (length, node.decisions()))
}

/// Like [`hamiltonian_bab`], also returning the search statistics.
#[must_use]
pub fn hamiltonian_bab_with_stats(
    problem: &HamiltonianCycle,
) -> (Option<(Weight, Vec<usize>)>, SearchStats) {
    let mut solver =
        BranchAndBound::<_, Minimize>::new(BabDecisionSequence::new(problem.initial()));
    let best = solver
        .solve()
        .map(|(length, node)| (length, node.decisions()));
    (best, *solver.stats())
}
