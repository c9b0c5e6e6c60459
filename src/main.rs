//! # decision-search
//!
//! `decision-search` is a command-line driver for the search schemes of the
//! `decision_search` library. It solves a handful of classic combinatorial
//! problems with a chosen scheme and reports the best solution (or every
//! solution) together with search statistics.
//!
//! The available schemes are:
//! 1.  **Backtracking (`bt`)**: lazy depth-first enumeration of every solution.
//! 2.  **Backtracking with visited control (`bt-vc`)**: the same walk, entering
//!     each problem state at most once.
//! 3.  **Optimising backtracking (`bt-opt`)**: the same walk, skipping a
//!     state already entered with a score at least as good and reporting
//!     only solutions that improve on the best one so far.
//! 4.  **Branch-and-bound (`bab`)**: best-first search with bound and dominance
//!     pruning, stopping at the first (optimal) solution.
//!
//! When looking for the best solution with `bt` or `bt-vc`, every solution is
//! enumerated and scored.
//!
//! ## Usage
//!
//! ```sh
//! decision-search <SUBCOMMAND> [OPTIONS]
//! ```
//!
//! ### Subcommands
//!
//! 1.  **`nqueens`**: place n non-attacking queens (`bt`/`bt-vc` only).
//!     ```sh
//!     decision-search nqueens -n 8 --all
//!     ```
//! 2.  **`coin-change`**: pay a quantity with as few coins as possible.
//!     ```sh
//!     decision-search coin-change --coins 1,2,5,10 --quantity 4
//!     ```
//! 3.  **`knapsack`**: 0/1 knapsack, explicit or seeded random instance.
//!     ```sh
//!     decision-search knapsack --weights 42,55,93 --values 168,110,186 --capacity 136
//!     decision-search knapsack --random 30 --seed 5
//!     ```
//! 4.  **`subset-sum`**: fewest elements adding up to a target.
//!     ```sh
//!     decision-search subset-sum --elements 640,777,276,224 --target 1000 --solver bt
//!     ```
//! 5.  **`hamiltonian`**: shortest Hamiltonian cycle.
//!     ```sh
//!     decision-search hamiltonian --edges 0-1:2,1-2,2-0:0.5
//!     ```
//!     `--vertices` is only accepted together with `--edges`.
//! 6.  **`completions`**: print a shell completion script.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: print the instance and every scored candidate.
//! -   `--no-stats`: do not print the statistics table.
//! -   `--solver <bt|bt-vc|bt-opt|bab>`: search scheme.
//! -   `-a, --all`: enumerate solutions instead of optimising (`bt`/`bt-vc`
//!     only).
//! -   `-l, --limit <N>`: stop after N enumerated solutions.

use crate::command_line::cli::{Cli, Commands, run};
use clap::{CommandFactory, Parser};

mod command_line;

/// Main entry point of the application.
///
/// Parses command-line arguments, dispatches to the appropriate command
/// handler and exits with status 1 on invalid input.
fn main() {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = run(cli.command) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
