//! CLI module for tourcraft.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested. The
//! entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod logging;
mod output;

pub use args::{Args, Command, CompletionMethod, RunOptions};
pub use commands::{execute_run, exit_code_for, run_cli, RunReport};
pub use logging::init_logger;
pub use output::{
    help_text, print_help, print_version, render_run_report, render_validation, version_text,
};
