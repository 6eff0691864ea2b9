//! Logger setup for the binary. The library only emits through `log`.

use std::io::Write;

use env_logger::{Builder, Env, Target};
use log::{Level, LevelFilter};

/// Initialise `env_logger` on stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over warn.
///
/// # Errors
///
/// Returns error if a logger was already installed.
pub fn init_logger(verbose: bool) -> Result<(), log::SetLoggerError> {
    let default = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    Builder::from_env(Env::default().default_filter_or(default.as_str()))
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                level_tag(record.level()),
                record.target(),
                record.args()
            )
        })
        .try_init()
}

const fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
