//! CLI argument parsing.
//!
//! Hand-rolled so it can be driven from tests through [`Args::parse_from`].

use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// How an open tour is completed by `run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionMethod {
    #[default]
    Nearest,
    Random,
}

impl FromStr for CompletionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" | "nn" => Ok(Self::Nearest),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown method '{other}' (expected nearest or random)")),
        }
    }
}

impl std::fmt::Display for CompletionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Nearest => "nearest",
            Self::Random => "random",
        })
    }
}

/// Options of the `run` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Path to the instance file.
    pub instance_path: PathBuf,
    /// Index of the first selected point.
    pub start: usize,
    pub method: CompletionMethod,
    /// Improve the completed tour with 2-opt.
    pub two_opt: bool,
    /// Overrides the configured seed.
    pub seed_override: Option<u64>,
    /// Engine configuration file.
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

impl RunOptions {
    /// Defaults for `instance_path`: start at point 0, nearest neighbor, no 2-opt.
    #[must_use]
    pub fn new(instance_path: impl Into<PathBuf>) -> Self {
        Self {
            instance_path: instance_path.into(),
            start: 0,
            method: CompletionMethod::default(),
            two_opt: false,
            seed_override: None,
            config_path: None,
            verbose: false,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build a tour over an instance and print it.
    Run(RunOptions),
    /// Check an instance file.
    Validate {
        /// Path to the instance file.
        instance_path: PathBuf,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Whether verbose logging was requested.
    #[must_use]
    pub fn verbose(&self) -> bool {
        matches!(&self.command, Command::Run(opts) if opts.verbose)
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "validate" => Self::parse_validate_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Parse the 'run' command arguments.
    ///
    /// Unparseable values keep the default; a flag missing its value is skipped.
    fn parse_run_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'run' command requires an instance path");
            return Command::Help;
        }

        let mut opts = RunOptions::new(&args[2]);

        let mut i = 3;
        while i < args.len() {
            let value = args.get(i + 1);
            match (args[i].as_str(), value) {
                ("--start", Some(v)) => {
                    if let Ok(start) = v.parse() {
                        opts.start = start;
                    }
                    i += 2;
                }
                ("--method", Some(v)) => {
                    match v.parse() {
                        Ok(method) => opts.method = method,
                        Err(e) => eprintln!("Warning: {e}"),
                    }
                    i += 2;
                }
                ("--seed", Some(v)) => {
                    if let Ok(seed) = v.parse() {
                        opts.seed_override = Some(seed);
                    }
                    i += 2;
                }
                ("--config", Some(v)) => {
                    opts.config_path = Some(PathBuf::from(v));
                    i += 2;
                }
                ("--two-opt", _) => {
                    opts.two_opt = true;
                    i += 1;
                }
                ("-v" | "--verbose", _) => {
                    opts.verbose = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Command::Run(opts)
    }

    /// Parse the 'validate' command arguments.
    fn parse_validate_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'validate' command requires an instance path");
            return Command::Help;
        }

        Command::Validate {
            instance_path: PathBuf::from(&args[2]),
        }
    }
}
