//! CLI output formatting.

use std::path::Path;

use crate::error::TourResult;
use crate::instance::TourInstance;

use super::commands::RunReport;

/// Print version information.
pub fn print_version() {
    println!("{}", version_text());
}

/// Version string, with the git revision when the build recorded one.
#[must_use]
pub fn version_text() -> String {
    match option_env!("TOURCRAFT_GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            format!("tourcraft {} ({hash})", env!("CARGO_PKG_VERSION"))
        }
        _ => format!("tourcraft {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print help message.
pub fn print_help() {
    println!("{}", help_text());
}

/// The help message.
#[must_use]
pub const fn help_text() -> &'static str {
    r"tourcraft - Interactive TSP tour construction engine

USAGE:
    tourcraft <COMMAND> [OPTIONS]

COMMANDS:
    run <instance.yaml|json>    Build a tour and print it as JSON
        --start <N>             Index of the first point (default: 0)
        --method <M>            nearest | random (default: nearest)
        --two-opt               Improve the closed tour with 2-opt
        --seed <N>              Override the configured seed
        --config <FILE>         Engine configuration YAML
        -v, --verbose           Debug logging (RUST_LOG also works)

    validate <instance>         Check an instance file

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    tourcraft run demos/square.yaml
    tourcraft run demos/square.yaml --method random --seed 7 --two-opt
    tourcraft validate demos/square.yaml
"
}

/// Print a run report as pretty JSON on stdout.
///
/// # Errors
///
/// Returns error if the report cannot be serialized.
pub fn print_run_report(report: &RunReport) -> TourResult<()> {
    println!("{}", render_run_report(report)?);
    Ok(())
}

/// Render a run report as pretty JSON.
///
/// # Errors
///
/// Returns error if the report cannot be serialized.
pub fn render_run_report(report: &RunReport) -> TourResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Print the outcome of `validate`.
pub fn print_validation(path: &Path, result: &TourResult<TourInstance>) {
    println!("{}", render_validation(path, result));
}

/// Render the outcome of `validate`.
#[must_use]
pub fn render_validation(path: &Path, result: &TourResult<TourInstance>) -> String {
    match result {
        Ok(instance) => format!(
            "✓ {}: instance {} with {} points ({})",
            path.display(),
            instance.meta.id,
            instance.point_count(),
            instance.meta.units
        ),
        Err(e) => format!("✗ {}: {e}", path.display()),
    }
}
