//! Cluster document loading.
//!
//! Reads a YAML or JSON file into the JSON object map the core pipeline
//! consumes, and pulls the [`ClusterContext`] out of the document's top-level
//! `project_name`, `namespace` and `storage.type` keys.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use infrastage_core::{
    application::ApplicationError,
    domain::{self, ClusterContext, DomainError, StorageKind},
    error::InfraResult,
};

const DEFAULT_NAMESPACE: &str = "dev";

/// On-disk encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Read a cluster document from disk.
#[instrument(fields(path = %path.display()))]
pub fn load_document(path: &Path) -> InfraResult<Map<String, Value>> {
    let text = fs::read_to_string(path).map_err(|e| ApplicationError::FileUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let document = parse_document(&text, DocumentFormat::from_path(path), path)?;
    debug!(keys = document.len(), "Loaded document");
    Ok(document)
}

/// Parse document text. `origin` only labels errors.
///
/// An empty YAML file is an empty document.
pub fn parse_document(
    text: &str,
    format: DocumentFormat,
    origin: &Path,
) -> InfraResult<Map<String, Value>> {
    let malformed = |reason: String| ApplicationError::MalformedDocument {
        path: origin.to_path_buf(),
        reason,
    };

    let value: Value = match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?,
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| malformed(e.to_string()))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(malformed(format!(
            "top level must be a mapping, found {}",
            kind_of(&other)
        ))
        .into()),
    }
}

/// Values used when the document does not set a context field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextDefaults {
    pub project_name: Option<String>,
    pub namespace: Option<String>,
    pub storage: Option<StorageKind>,
}

/// Build the cluster context for a document.
///
/// Document keys win over `defaults`. The namespace falls back to `dev` and
/// storage to NFS; the project name has no fallback.
pub fn cluster_context(
    document: &Map<String, Value>,
    defaults: &ContextDefaults,
) -> InfraResult<ClusterContext> {
    let provider = domain::select(document)?.kind;

    let project_name = string_at(document, "project_name")?
        .or_else(|| defaults.project_name.clone())
        .ok_or_else(|| {
            DomainError::InvalidClusterContext("project_name is not set".into())
        })?;

    let namespace = string_at(document, "namespace")?
        .or_else(|| defaults.namespace.clone())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let storage = match document.get("storage").and_then(|s| s.get("type")) {
        Some(Value::String(s)) => s.parse::<StorageKind>()?,
        Some(Value::Null) | None => defaults.storage.unwrap_or_default(),
        Some(other) => {
            return Err(DomainError::InvalidClusterContext(format!(
                "storage.type must be a string, found {}",
                kind_of(other)
            ))
            .into());
        }
    };

    Ok(ClusterContext::for_provider(
        provider,
        project_name,
        namespace,
        storage,
    )?)
}

fn string_at(document: &Map<String, Value>, key: &str) -> Result<Option<String>, DomainError> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DomainError::InvalidClusterContext(format!(
            "{key} must be a string, found {}",
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
