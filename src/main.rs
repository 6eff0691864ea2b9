//! tourcraft CLI - interactive TSP tour construction engine
//!
//! Command-line interface for running the tour heuristics over instance files.

use std::process::ExitCode;

use tourcraft::cli::{init_logger, run_cli, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logger(args.verbose()) {
        eprintln!("Warning: logger not initialised: {e}");
    }
    run_cli(args)
}
