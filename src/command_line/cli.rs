#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use decision_search::error::InstanceError;
use decision_search::problems::coin_change::CoinChange;
use decision_search::problems::hamiltonian::{Edge, Graph, HamiltonianCycle, parse_edge};
use decision_search::problems::knapsack::Knapsack;
use decision_search::problems::nqueens::NQueens;
use decision_search::problems::subset_sum::SubsetSum;
use decision_search::schemes::{
    BabDecisionSequence, BoundedProblem, BranchAndBound, BtSolutions, DecisionProblem,
    DecisionSequence, Maximize, Minimize, Objective, SearchStats, bt_opt_solve, bt_solutions,
    bt_vc_solutions, max_solution, min_solution,
};
use itertools::Itertools;
use std::fmt::{self, Debug, Display};
use std::time::{Duration, Instant};

/// Defines the command-line interface of the decision search driver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "decision-search",
    version,
    about = "Backtracking and branch-and-bound on classic search problems"
)]
pub(crate) struct Cli {
    /// Specifies the problem to solve (e.g. `nqueens`, `knapsack`).
    #[clap(subcommand)]
    pub command: Commands,
}

/// Enumerates the available problems.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Place n non-attacking queens on an n x n board.
    Nqueens {
        /// Side of the board.
        #[arg(short = 'n', long, default_value_t = 8)]
        size: usize,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Pay a quantity with as few coins as possible.
    CoinChange {
        /// Coin values, comma separated (e.g. "1,2,5,10").
        #[arg(long, value_delimiter = ',', required = true)]
        coins: Vec<u64>,

        /// Quantity to pay.
        #[arg(short, long)]
        quantity: u64,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Fill a knapsack with the most valuable items that fit.
    Knapsack {
        /// Item weights, comma separated.
        #[arg(long, value_delimiter = ',', conflicts_with = "random")]
        weights: Vec<u64>,

        /// Item values, comma separated, in the same order as the weights.
        #[arg(long, value_delimiter = ',', conflicts_with = "random")]
        values: Vec<u64>,

        /// Weight limit of the knapsack.
        #[arg(long, required_unless_present = "random")]
        capacity: Option<u64>,

        /// Generated instance options.
        #[command(flatten)]
        random: RandomOptions,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Pick elements adding up to a target, using as few as possible.
    SubsetSum {
        /// Elements, comma separated.
        #[arg(long, value_delimiter = ',', conflicts_with = "random")]
        elements: Vec<u64>,

        /// Target sum.
        #[arg(long, required_unless_present = "random")]
        target: Option<u64>,

        /// Generated instance options.
        #[command(flatten)]
        random: RandomOptions,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Find the shortest Hamiltonian cycle of an undirected graph.
    /// Without edges, a built-in ten-vertex graph is used.
    Hamiltonian {
        /// Number of vertices. Defaults to one more than the largest vertex
        /// mentioned by an edge.
        #[arg(long, requires = "edges")]
        vertices: Option<usize>,

        /// Edges written as `u-v` or `u-v:weight`, comma separated.
        #[arg(long, value_delimiter = ',', value_parser = parse_edge)]
        edges: Vec<Edge>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options for generating a seeded random instance.
#[derive(Args, Debug, Default, Clone, Copy)]
pub(crate) struct RandomOptions {
    /// Generate a random instance with this many items instead of reading one.
    #[arg(long)]
    pub(crate) random: Option<usize>,

    /// Seed of the random instance generator.
    #[arg(long, default_value_t = 5)]
    pub(crate) seed: u64,
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug output: the instance and every solution as it is found.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Disable printing of search statistics after solving.
    #[arg(long = "no-stats", action = ArgAction::SetFalse)]
    pub(crate) stats: bool,

    /// Search scheme. Defaults to `bab` for problems with bounds and `bt`
    /// otherwise.
    #[arg(long, value_enum)]
    pub(crate) solver: Option<SolverType>,

    /// Enumerate every solution instead of looking for the best one.
    #[arg(short, long, default_value_t = false)]
    pub(crate) all: bool,

    /// Stop after this many enumerated solutions.
    #[arg(short, long)]
    pub(crate) limit: Option<usize>,
}

/// Search schemes selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub(crate) enum SolverType {
    /// Plain backtracking.
    Bt,
    /// Backtracking with visited control on the problem state.
    BtVc,
    /// Backtracking that keeps the best score per state and reports only
    /// improving solutions.
    BtOpt,
    /// Best-first branch-and-bound.
    #[default]
    Bab,
}

impl Display for SolverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bt => write!(f, "backtracking"),
            Self::BtVc => write!(f, "backtracking with visited control"),
            Self::BtOpt => write!(f, "optimising backtracking"),
            Self::Bab => write!(f, "branch-and-bound"),
        }
    }
}

/// Whether a problem minimises or maximises its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Goal {
    Min,
    Max,
}

/// Outcome of one solver run, ready to be reported.
struct Report<S, D> {
    solver: SolverType,
    best: Option<(S, Vec<D>)>,
    enumerated: Option<usize>,
    stats: SearchStats,
    elapsed: Duration,
}

/// Runs one subcommand.
///
/// # Errors
///
/// If the instance described by the arguments is invalid, or the chosen
/// solver cannot handle the problem.
pub(crate) fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Nqueens { size, common } => solve_nqueens(size, &common),
        Commands::CoinChange {
            coins,
            quantity,
            common,
        } => {
            let problem = CoinChange::new(coins, quantity).map_err(describe)?;
            if common.debug {
                println!("Coins: {:?}", problem.coins());
                println!("Quantity: {}", problem.quantity());
            }
            solve_bounded(problem.initial(), &common, Goal::Min)
        }
        Commands::Knapsack {
            weights,
            values,
            capacity,
            random,
            common,
        } => {
            let problem = match random.random {
                Some(items) => Knapsack::random(items, random.seed),
                None => Knapsack::new(weights, values, capacity.unwrap_or_default())
                    .map_err(describe)?,
            };
            if common.debug {
                println!("Weights: {:?}", problem.weights());
                println!("Values: {:?}", problem.values());
                println!("Capacity: {}", problem.capacity());
            }
            solve_bounded(problem.initial(), &common, Goal::Max)
        }
        Commands::SubsetSum {
            elements,
            target,
            random,
            common,
        } => {
            let problem = match random.random {
                Some(items) => SubsetSum::random(items, random.seed),
                None => SubsetSum::new(elements, target.unwrap_or_default()),
            };
            if common.debug {
                println!("Elements: {:?}", problem.elements());
                println!("Target: {}", problem.target());
            }
            solve_bounded(problem.initial(), &common, Goal::Min)
        }
        Commands::Hamiltonian {
            vertices,
            edges,
            common,
        } => {
            let graph = if edges.is_empty() {
                Graph::sample()
            } else {
                let vertices = vertices.unwrap_or_else(|| {
                    edges
                        .iter()
                        .map(|&(u, v, _)| u.max(v) + 1)
                        .max()
                        .unwrap_or_default()
                });
                Graph::new(vertices, &edges).map_err(describe)?
            };
            if common.debug {
                println!("Vertices: {}", graph.vertices());
                for v in 0..graph.vertices() {
                    println!(
                        "  {v}: {}",
                        graph
                            .neighbours(v)
                            .map(|(u, w)| format!("{u} ({w})"))
                            .join(", ")
                    );
                }
            }
            let problem = HamiltonianCycle::new(graph);
            solve_bounded(problem.initial(), &common, Goal::Min)
        }
        Commands::Completions { .. } => Err("completions are handled by main".to_string()),
    }
}

fn describe(e: InstanceError) -> String {
    format!("Invalid instance: {e}")
}

/// Enumerates n-queens placements. The problem has no bounds, so only the
/// backtracking schemes apply.
fn solve_nqueens(size: usize, common: &CommonOptions) -> Result<(), String> {
    let solver = common.solver.unwrap_or(SolverType::Bt);
    let problem = NQueens::new(size);
    let initial = problem.initial();
    let iter = match solver {
        SolverType::Bt => bt_solutions(initial),
        SolverType::BtVc => bt_vc_solutions(initial),
        SolverType::Bab | SolverType::BtOpt => {
            return Err("n-queens has no score; use --solver bt or bt-vc".to_string());
        }
    };

    let limit = if common.all {
        common.limit.unwrap_or(usize::MAX)
    } else {
        common.limit.unwrap_or(1)
    };
    let time = Instant::now();
    let (count, stats) = enumerate(iter, limit);
    let elapsed = time.elapsed();

    if count == 0 {
        println!("No solution found");
    }
    if common.stats {
        print_stats(solver, elapsed, &stats, Some(count));
    }
    Ok(())
}

/// Runs a problem with bounds with the solver selected in `common`.
fn solve_bounded<P>(
    initial: DecisionSequence<'_, P>,
    common: &CommonOptions,
    goal: Goal,
) -> Result<(), String>
where
    P: BoundedProblem,
    P::Decision: Debug,
    P::Score: Display,
{
    let solver = common.solver.unwrap_or_default();
    let time = Instant::now();

    let report = if common.all {
        let iter = match solver {
            SolverType::Bt => bt_solutions(initial),
            SolverType::BtVc => bt_vc_solutions(initial),
            SolverType::Bab | SolverType::BtOpt => {
                return Err(format!(
                    "--all enumerates with bt or bt-vc; {solver} only reports the best solution"
                ));
            }
        };
        let (count, stats) = enumerate(iter, common.limit.unwrap_or(usize::MAX));
        Report {
            solver,
            best: None,
            enumerated: Some(count),
            stats,
            elapsed: time.elapsed(),
        }
    } else {
        let (best, stats) = match (solver, goal) {
            (SolverType::Bab, Goal::Min) => branch_and_bound::<Minimize, P>(initial),
            (SolverType::Bab, Goal::Max) => branch_and_bound::<Maximize, P>(initial),
            (SolverType::BtOpt, Goal::Min) => improve::<Minimize, P>(initial, common.debug),
            (SolverType::BtOpt, Goal::Max) => improve::<Maximize, P>(initial, common.debug),
            (SolverType::Bt, _) => select(bt_solutions(initial), goal, common.debug),
            (SolverType::BtVc, _) => select(bt_vc_solutions(initial), goal, common.debug),
        };
        Report {
            solver,
            best,
            enumerated: None,
            stats,
            elapsed: time.elapsed(),
        }
    };

    print_report(&report, common);
    Ok(())
}

/// Prints up to `limit` solutions and returns how many were printed.
fn enumerate<P>(mut iter: BtSolutions<'_, P>, limit: usize) -> (usize, SearchStats)
where
    P: DecisionProblem,
    P::Decision: Debug,
{
    let mut count = 0;
    for solution in iter.by_ref().take(limit) {
        count += 1;
        println!("Solution {count}: {:?}", solution.decisions());
    }
    (count, *iter.stats())
}

/// Scores every enumerated solution and keeps the best one.
fn select<P>(
    mut iter: BtSolutions<'_, P>,
    goal: Goal,
    debug: bool,
) -> (Option<(P::Score, Vec<P::Decision>)>, SearchStats)
where
    P: BoundedProblem,
    P::Decision: Debug,
    P::Score: Display,
{
    let solutions = iter.by_ref().inspect(|s| {
        if debug {
            println!("Candidate {:?} scores {}", s.decisions(), s.score());
        }
    });
    let best = match goal {
        Goal::Min => min_solution(solutions, DecisionSequence::score),
        Goal::Max => max_solution(solutions, DecisionSequence::score),
    };
    (
        best.map(|(score, node)| (score, node.decisions())),
        *iter.stats(),
    )
}

/// Keeps the last of the improving solutions.
fn improve<O: Objective, P>(
    initial: DecisionSequence<'_, P>,
    debug: bool,
) -> (Option<(P::Score, Vec<P::Decision>)>, SearchStats)
where
    P: BoundedProblem,
    P::Decision: Debug,
    P::Score: Display,
{
    let mut iter = bt_opt_solve::<O, P>(initial);
    let best = iter
        .by_ref()
        .inspect(|(score, s)| {
            if debug {
                println!("Improved to {score} with {:?}", s.decisions());
            }
        })
        .last();
    (
        best.map(|(score, node)| (score, node.decisions())),
        *iter.stats(),
    )
}

fn branch_and_bound<O: Objective, P: BoundedProblem>(
    initial: DecisionSequence<'_, P>,
) -> (Option<(P::Score, Vec<P::Decision>)>, SearchStats) {
    let mut solver = BranchAndBound::<P, O>::new(BabDecisionSequence::new(initial));
    let best = solver
        .solve()
        .map(|(score, node)| (score, node.decisions()));
    (best, *solver.stats())
}

fn print_report<S: Display, D: Debug>(report: &Report<S, D>, common: &CommonOptions) {
    match (&report.best, report.enumerated) {
        (Some((score, decisions)), _) => println!("Best solution: {score} {decisions:?}"),
        (None, Some(0)) | (None, None) => println!("No solution found"),
        (None, Some(_)) => {}
    }
    if common.stats {
        print_stats(
            report.solver,
            report.elapsed,
            &report.stats,
            report.enumerated,
        );
    }
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of the search statistics.
pub(crate) fn print_stats(
    solver: SolverType,
    elapsed: Duration,
    s: &SearchStats,
    enumerated: Option<usize>,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n========================[ Search Statistics ]========================");
    stat_line("Solver", solver);
    stat_line_with_rate("Expanded", s.expanded, elapsed_secs);
    stat_line_with_rate("Generated", s.generated, elapsed_secs);
    stat_line("Solutions reached", s.solutions);
    if let Some(count) = enumerated {
        stat_line("Solutions printed", count);
    }
    stat_line("Revisits skipped", s.revisited);
    stat_line("Pruned by bound", s.pruned_by_bound);
    stat_line("Pruned by dominance", s.pruned_by_dominance);
    stat_line("Peak frontier", s.max_frontier);
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}
