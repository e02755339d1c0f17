//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `INFRASTAGE_<SECTION>__<KEY>`,
//!    e.g. `INFRASTAGE_CLUSTER__NAMESPACE=prod`
//! 3. Config file: `--config <FILE>`, else the platform config dir
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use infrastage_core::domain::StorageKind;

use crate::cli::RenderFormat;

const ENV_PREFIX: &str = "INFRASTAGE";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fallbacks for the cluster identity.
    pub cluster: ClusterConfig,
    /// Where inventory data comes from.
    pub inventory: InventoryConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Used only when the document does not set the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub project_name: Option<String>,
    pub namespace: Option<String>,
    pub storage: Option<StorageKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Fixture used when `--inventory` is not given.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Default rendering for data written to stdout.
    pub format: RenderFormat,
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path passed via `--config`; it must exist.  Without
    /// it the file at [`Self::config_path`] is read if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to encode built-in defaults")?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.infrastage.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "infrastage", "infrastage")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".infrastage.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_render_json() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.output.format, RenderFormat::Json);
        assert!(!cfg.output.no_color);
        assert!(cfg.inventory.path.is_none());
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let cfg = AppConfig::load_from(Path::new("/nonexistent/infrastage.toml"), false).unwrap();
        assert_eq!(cfg.cluster, ClusterConfig::default());
    }

    #[test]
    fn missing_required_file_is_error() {
        assert!(AppConfig::load_from(Path::new("/nonexistent/infrastage.toml"), true).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[cluster]\nproject_name = \"demo\"\nstorage = \"efs\"\n\n[output]\nformat = \"yaml\""
        )
        .unwrap();

        let cfg = AppConfig::load_from(file.path(), true).unwrap();
        assert_eq!(cfg.cluster.project_name.as_deref(), Some("demo"));
        assert_eq!(cfg.cluster.storage, Some(StorageKind::Efs));
        assert_eq!(cfg.output.format, RenderFormat::Yaml);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
