//! Flags shared by every infrastage subcommand.
//!
//! Besides verbosity and colour these carry the two files a run may need
//! before any subcommand logic starts: the config file and the inventory
//! fixture.  Both fall back to config values, resolved here so commands
//! never look at flags and config separately.

use std::path::PathBuf;

use clap::Args;

use crate::config::AppConfig;

/// Global arguments for all commands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log verbosity, counted.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More log output (-v info, -vv debug, -vvv trace)",
        long_help = "Raise the log level on stderr:
    (none)  - Warnings and errors
    -v      - Provider selection and defaulted values
    -vv     - Every inventory lookup
    -vvv    - Everything
RUST_LOG, when set, replaces this mapping."
    )]
    pub verbose: u8,

    /// Drop status lines and warnings. Compiled data is still printed.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print data and errors"
    )]
    pub quiet: bool,

    /// Honours `NO_COLOR` (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Config file. Without it the platform config dir is tried.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "INFRASTAGE_CONFIG",
        value_name = "FILE",
        help = "Config file (must exist when given)"
    )]
    pub config: Option<PathBuf>,

    /// Inventory fixture for cloud providers.
    #[arg(
        short = 'i',
        long = "inventory",
        global = true,
        value_name = "FILE",
        help = "Inventory fixture (overrides inventory.path)"
    )]
    pub inventory: Option<PathBuf>,

    /// Resolved against the terminal when `auto`.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Message style; json also forces JSON data and JSON logs"
    )]
    pub output_format: OutputFormat,
}

impl GlobalArgs {
    /// Tracing level for the infrastage crates. `--quiet` wins over `-v`.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// `--inventory`, else `inventory.path` from config.
    pub fn inventory_path(&self, config: &AppConfig) -> Option<PathBuf> {
        self.inventory
            .clone()
            .or_else(|| config.inventory.path.clone())
    }
}

/// Style of status lines, errors and logs on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise.
    #[default]
    Auto,
    /// Symbols and colour.
    Human,
    /// No colour.
    Plain,
    /// JSON logs, and JSON for every data payload.
    Json,
}

#[cfg(test)]
pub(crate) fn test_args(output_format: OutputFormat) -> GlobalArgs {
    GlobalArgs {
        verbose: 0,
        quiet: false,
        no_color: false,
        config: None,
        inventory: None,
        output_format,
    }
}
