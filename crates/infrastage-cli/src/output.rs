//! Output management and formatting.
//!
//! Data (compiled variables, output records, tables) goes to stdout and is
//! never suppressed.  Status lines go to stderr so stdout stays parseable.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::{
    RenderFormat,
    global::{GlobalArgs, OutputFormat},
};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    default_render: RenderFormat,
    quiet: bool,
    no_color: bool,
    out: Term,
    status: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stderr().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            default_render: config.output.format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            out: Term::stdout(),
            status: Term::stderr(),
        }
    }

    // ── Data ──────────────────────────────────────────────────────────────

    /// The rendering for a command's data.
    ///
    /// `--output-format json` forces JSON; otherwise the command's `--format`
    /// wins over `output.format` from config.
    pub fn render_format(&self, requested: Option<RenderFormat>) -> RenderFormat {
        if self.resolved_format == OutputFormat::Json {
            return RenderFormat::Json;
        }
        requested.unwrap_or(self.default_render)
    }

    /// Serialize `value` and write it to stdout.
    pub fn emit<T: Serialize>(&self, value: &T, format: RenderFormat) -> CliResult<()> {
        let text = render(value, format)?;
        self.out.write_line(text.trim_end())?;
        Ok(())
    }

    /// Write one line of data to stdout.
    pub fn line(&self, msg: &str) -> io::Result<()> {
        self.out.write_line(msg)
    }

    // ── Status lines ──────────────────────────────────────────────────────

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.status.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.status.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.status.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.status.write_line(&line)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }
}

/// Serialize `value` as pretty JSON or YAML.
pub fn render<T: Serialize>(value: &T, format: RenderFormat) -> CliResult<String> {
    match format {
        RenderFormat::Json => serde_json::to_string_pretty(value).map_err(|e| CliError::Render {
            message: e.to_string(),
        }),
        RenderFormat::Yaml => serde_yaml::to_string(value).map_err(|e| CliError::Render {
            message: e.to_string(),
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::AppConfig;
    use std::collections::BTreeMap;

    fn make_manager(output_format: OutputFormat, config: &AppConfig) -> OutputManager {
        let args = GlobalArgs {
            quiet: true,
            ..crate::cli::global::test_args(output_format)
        };
        OutputManager::new(&args, config)
    }

    #[test]
    fn render_json_and_yaml() {
        let value = BTreeMap::from([("region", "us-east-1")]);
        assert_eq!(
            render(&value, RenderFormat::Json).unwrap(),
            "{\n  \"region\": \"us-east-1\"\n}"
        );
        assert_eq!(
            render(&value, RenderFormat::Yaml).unwrap(),
            "region: us-east-1\n"
        );
    }

    #[test]
    fn command_format_beats_config() {
        let mut config = AppConfig::default();
        config.output.format = RenderFormat::Yaml;
        let out = make_manager(OutputFormat::Plain, &config);
        assert_eq!(out.render_format(None), RenderFormat::Yaml);
        assert_eq!(out.render_format(Some(RenderFormat::Json)), RenderFormat::Json);
    }

    #[test]
    fn json_output_format_forces_json() {
        let out = make_manager(OutputFormat::Json, &AppConfig::default());
        assert_eq!(out.render_format(Some(RenderFormat::Yaml)), RenderFormat::Json);
    }

    #[test]
    fn plain_output_disables_color() {
        let out = make_manager(OutputFormat::Plain, &AppConfig::default());
        assert!(!out.supports_color());
        let human = make_manager(OutputFormat::Human, &AppConfig::default());
        assert!(human.supports_color());
    }

    #[test]
    fn quiet_suppresses_status() {
        let out = make_manager(OutputFormat::Plain, &AppConfig::default());
        assert!(out.warning("hello").is_ok());
        assert!(out.info("hello").is_ok());
    }
}
