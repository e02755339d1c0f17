//! `infrastage config`: read configuration values.

use crate::{
    cli::{ConfigCommands, RenderFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.line(&value)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.line(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            output.line(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "cluster.project_name" => Ok(config.cluster.project_name.clone().unwrap_or_default()),
        "cluster.namespace" => Ok(config.cluster.namespace.clone().unwrap_or_default()),
        "cluster.storage" => Ok(config
            .cluster
            .storage
            .map(|s| s.to_string())
            .unwrap_or_default()),
        "inventory.path" => Ok(config
            .inventory
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(match config.output.format {
            RenderFormat::Json => "json".into(),
            RenderFormat::Yaml => "yaml".into(),
        }),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
