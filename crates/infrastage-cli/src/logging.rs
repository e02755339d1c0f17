//! Tracing subscriber for the `infrastage` binary.
//!
//! `infrastage-core` and `infrastage-adapters` only emit events; this is the
//! one place a subscriber is installed.  Logs always go to stderr so the
//! compiled variables on stdout stay machine-readable.
//!
//! The level comes from [`GlobalArgs::log_level`] and applies to the three
//! infrastage crates only, so dependencies stay quiet.  `RUST_LOG` replaces
//! the whole filter when set.  `--output-format json` switches to JSON lines.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

/// Crates whose events are shown at the requested level.
const LOG_TARGETS: [&str; 3] = ["infrastage", "infrastage_core", "infrastage_adapters"];

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(args.log_level())));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if args.output_format == OutputFormat::Json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer.without_time()).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

fn filter_directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_name_every_crate() {
        assert_eq!(
            filter_directives("debug"),
            "infrastage=debug,infrastage_core=debug,infrastage_adapters=debug"
        );
    }

    #[test]
    fn directives_parse_as_a_filter() {
        assert!(EnvFilter::try_new(filter_directives("trace")).is_ok());
    }
}
