//! Command-line parsing and reporting for the `decision-search` binary.

pub(crate) mod cli;
