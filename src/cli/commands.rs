//! CLI command handlers.
//!
//! Each handler has a pure core returning `TourResult` so the behavior can be
//! tested without capturing stdout.

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::config::EngineConfig;
use crate::error::{TourError, TourResult};
use crate::instance::TourInstance;
use crate::session::TourSession;
use crate::tour::TourSnapshot;

use super::args::{CompletionMethod, RunOptions};
use super::output::{print_help, print_run_report, print_validation, print_version};
use super::{Args, Command};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run(opts) => run_instance(&opts),
        Command::Validate { instance_path } => validate_instance(&instance_path),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Result of `tourcraft run`, printed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub instance: String,
    pub method: String,
    pub seed: u64,
    pub start: usize,
    /// Route length right after completion.
    pub completed_length: f64,
    /// Route length after 2-opt, when requested.
    pub improved_length: Option<f64>,
    /// Virtual time the session spent, in milliseconds.
    pub virtual_time_ms: u64,
    /// Committed steps (appends, close, swaps).
    pub steps: u64,
    pub tour: TourSnapshot,
}

/// Run an instance file and print the report.
#[must_use]
pub fn run_instance(opts: &RunOptions) -> ExitCode {
    match execute_run(opts).and_then(|report| print_run_report(&report)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Load the instance, complete a tour from `opts.start`, and optionally
/// improve it with 2-opt, all in virtual time.
///
/// # Errors
///
/// Returns error if loading fails or the start point is rejected.
pub fn execute_run(opts: &RunOptions) -> TourResult<RunReport> {
    let instance = TourInstance::load(&opts.instance_path)?;
    let mut config = match &opts.config_path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = opts.seed_override {
        config.seed = seed;
    }
    let seed = config.seed;

    log::info!(
        "running {} ({} points) from point {} with {} completion",
        instance.meta.id,
        instance.point_count(),
        opts.start,
        opts.method
    );

    let mut session = TourSession::new(instance.points(), config)?;
    session.select_point(opts.start)?;
    if session.can_run_nearest_neighbor() {
        match opts.method {
            CompletionMethod::Nearest => session.start_nearest_neighbor()?,
            CompletionMethod::Random => session.start_random()?,
        }
        session.run_until_idle()?;
    }
    let completed_length = session.snapshot().route_length;

    let improved_length = if opts.two_opt {
        if session.can_run_two_opt() {
            session.start_two_opt()?;
            session.run_until_idle()?;
        } else {
            log::info!("2-opt skipped: no improving swap");
        }
        Some(session.snapshot().route_length)
    } else {
        None
    };

    Ok(RunReport {
        instance: instance.meta.id,
        method: opts.method.to_string(),
        seed,
        start: opts.start,
        completed_length,
        improved_length,
        virtual_time_ms: session.now().as_millis(),
        steps: session.committed_steps(),
        tour: session.snapshot(),
    })
}

/// Validate an instance file.
#[must_use]
pub fn validate_instance(path: &Path) -> ExitCode {
    let result = TourInstance::load(path);
    print_validation(path, &result);
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Exit code for an error: 2 for rejected commands, 1 for everything else.
#[must_use]
pub fn exit_code_for(error: &TourError) -> u8 {
    if error.is_recoverable() {
        2
    } else {
        1
    }
}
