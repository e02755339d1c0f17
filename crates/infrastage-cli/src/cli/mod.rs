//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use infrastage_core::domain::ProviderKind;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "infrastage",
    bin_name = "infrastage",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Validate a cluster spec and compile provisioner variables",
    long_about = "infrastage checks a provider-agnostic Kubernetes cluster document \
                  against a cloud inventory and compiles the input variables \
                  for the provisioning backend.",
    after_help = "EXAMPLES:\n\
        \x20 infrastage validate cluster.yaml --inventory inventory.yaml\n\
        \x20 infrastage outputs cluster.yaml --credentials creds.json\n\
        \x20 infrastage defaults aws\n\
        \x20 infrastage completions bash > /usr/share/bash-completion/completions/infrastage",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a cluster document and print the compiled variables.
    #[command(
        visible_alias = "v",
        about = "Validate a document and compile its variables",
        after_help = "EXAMPLES:\n\
            \x20 infrastage validate cluster.yaml --inventory inventory.yaml\n\
            \x20 infrastage validate cluster.json -i inventory.json --format yaml\n\
            \x20 infrastage validate cluster.yaml --project-name demo --namespace prod"
    )]
    Validate(ValidateArgs),

    /// Print the output record of a provisioned cluster.
    #[command(
        about = "Compute the output record",
        after_help = "EXAMPLES:\n\
            \x20 infrastage outputs cluster.yaml --credentials creds.yaml\n\
            \x20 infrastage outputs cluster.yaml --credentials creds.json --kubeconfig ~/.kube/demo"
    )]
    Outputs(OutputsArgs),

    /// Print the default node pools of a cloud provider.
    #[command(
        about = "Show default node pools",
        after_help = "EXAMPLES:\n\
            \x20 infrastage defaults aws\n\
            \x20 infrastage defaults gcp --format yaml"
    )]
    Defaults(DefaultsArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 infrastage completions bash > ~/.local/share/bash-completion/completions/infrastage\n\
            \x20 infrastage completions zsh  > ~/.zfunc/_infrastage\n\
            \x20 infrastage completions fish > ~/.config/fish/completions/infrastage.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the infrastage configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 infrastage config get cluster.namespace\n\
            \x20 infrastage config list\n\
            \x20 infrastage config path"
    )]
    Config(ConfigCommands),
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `infrastage validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Cluster document (YAML, or JSON when the file ends in `.json`).
    #[arg(value_name = "DOCUMENT", help = "Cluster document to validate")]
    pub document: PathBuf,

    #[command(flatten)]
    pub context: ContextArgs,

    /// Rendering of the compiled variables.
    #[arg(long = "format", value_enum, help = "Output format for the variables")]
    pub format: Option<RenderFormat>,
}

/// Cluster identity used when the document does not carry it.
#[derive(Debug, Args)]
pub struct ContextArgs {
    #[arg(
        long = "project-name",
        value_name = "NAME",
        help = "Project name if the document has none"
    )]
    pub project_name: Option<String>,

    #[arg(
        long = "namespace",
        value_name = "NAME",
        help = "Namespace if the document has none"
    )]
    pub namespace: Option<String>,
}

// ── outputs ───────────────────────────────────────────────────────────────────

/// Arguments for `infrastage outputs`.
#[derive(Debug, Args)]
pub struct OutputsArgs {
    /// Cluster document (YAML or JSON).
    #[arg(value_name = "DOCUMENT", help = "Cluster document")]
    pub document: PathBuf,

    /// Cluster credentials reported by the provisioner.
    #[arg(
        long = "credentials",
        value_name = "FILE",
        help = "Kubernetes credentials file (YAML or JSON)"
    )]
    pub credentials: PathBuf,

    /// Kubeconfig location to publish.
    #[arg(
        long = "kubeconfig",
        value_name = "PATH",
        help = "Kubeconfig path (defaults to <tmp>/NEBARI_KUBECONFIG)"
    )]
    pub kubeconfig: Option<PathBuf>,

    /// Shared filesystem endpoint, if one was provisioned.
    #[arg(long = "nfs-endpoint", value_name = "HOST", help = "NFS endpoint")]
    pub nfs_endpoint: Option<String>,

    #[arg(long = "format", value_enum, help = "Output format for the record")]
    pub format: Option<RenderFormat>,
}

// ── defaults ──────────────────────────────────────────────────────────────────

/// Arguments for `infrastage defaults`.
#[derive(Debug, Args)]
pub struct DefaultsArgs {
    /// Cloud provider.
    #[arg(value_enum, value_name = "PROVIDER", help = "Cloud provider")]
    pub provider: Cloud,

    #[arg(long = "format", value_enum, help = "Output format for the table")]
    pub format: Option<RenderFormat>,
}

/// Cloud providers with default node pool tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Cloud {
    Aws,
    Gcp,
    Azure,
}

impl From<Cloud> for ProviderKind {
    fn from(cloud: Cloud) -> Self {
        match cloud {
            Cloud::Aws => ProviderKind::Aws,
            Cloud::Gcp => ProviderKind::Gcp,
            Cloud::Azure => ProviderKind::Azure,
        }
    }
}

/// Serialization used for data written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Json,
    Yaml,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `infrastage completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `infrastage config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `cluster.namespace`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
