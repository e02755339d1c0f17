//! Pick the single active provider from a cluster document.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::domain::error::DomainError;
use crate::domain::value_objects::ProviderKind;

/// Top-level key naming the active provider.
pub const PROVIDER_KEY: &str = "provider";

/// Outcome of provider selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub kind: ProviderKind,
    /// The input document, with `provider` set and a synthesized block for
    /// `local` / `existing` when none was given.
    pub document: Map<String, Value>,
    /// Non-fatal findings, such as blocks for providers that are not active.
    pub warnings: Vec<String>,
}

impl Selection {
    /// The active provider's configuration block.
    pub fn block(&self) -> Option<&Value> {
        self.document.get(self.kind.block_key())
    }
}

/// Determine the active provider.
///
/// With `provider` named, the name must be known and its block, if any, is
/// used; `local` and `existing` get an empty block when none is present.
/// Without it, the single block present decides, and an empty document is
/// `local`. The result never depends on key order.
pub fn select(document: &Map<String, Value>) -> Result<Selection, DomainError> {
    let mut document = document.clone();
    let mut warnings = Vec::new();

    let kind = match document.get(PROVIDER_KEY) {
        Some(named) => {
            let kind = match named {
                Value::String(s) => s.parse::<ProviderKind>()?,
                other => {
                    return Err(DomainError::UnknownProvider {
                        provider: other.to_string(),
                        permitted: ProviderKind::permitted(),
                    });
                }
            };

            if !kind.is_cloud() && block_is_absent(&document, kind) {
                document.insert(kind.block_key().to_string(), Value::Object(Map::new()));
            }

            let extra: BTreeSet<&str> = ProviderKind::ALL
                .iter()
                .filter(|other| **other != kind)
                .map(ProviderKind::block_key)
                .filter(|key| document.get(*key).is_some_and(is_non_empty))
                .collect();
            if !extra.is_empty() {
                warnings.push(format!(
                    "Provider is set to {kind}, but configuration defined for other providers: [{}]",
                    extra.into_iter().collect::<Vec<_>>().join(", ")
                ));
            }
            kind
        }
        None => {
            let present: BTreeSet<ProviderKind> = ProviderKind::ALL
                .into_iter()
                .filter(|kind| !block_is_absent(&document, *kind))
                .collect();

            let kind = match present.len() {
                0 => ProviderKind::Local,
                1 => present.into_iter().next().unwrap_or(ProviderKind::Local),
                _ => {
                    let providers: BTreeSet<String> = present
                        .iter()
                        .map(|kind| kind.block_key().to_string())
                        .collect();
                    return Err(DomainError::MultipleProviders {
                        providers: providers.into_iter().collect(),
                    });
                }
            };

            if block_is_absent(&document, kind) {
                document.insert(kind.block_key().to_string(), Value::Object(Map::new()));
            }
            document.insert(PROVIDER_KEY.to_string(), Value::String(kind.as_str().to_string()));
            kind
        }
    };

    Ok(Selection {
        kind,
        document,
        warnings,
    })
}

/// A missing key and an explicit `null` both mean "no block".
fn block_is_absent(document: &Map<String, Value>, kind: ProviderKind) -> bool {
    document
        .get(kind.block_key())
        .is_none_or(Value::is_null)
}

fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test documents are objects"),
        }
    }

    #[test]
    fn empty_document_is_local() {
        let selection = select(&Map::new()).unwrap();
        assert_eq!(selection.kind, ProviderKind::Local);
        assert_eq!(selection.block(), Some(&json!({})));
        assert_eq!(selection.document["provider"], json!("local"));
        assert!(selection.warnings.is_empty());
    }

    #[test]
    fn two_blocks_without_provider_is_an_error() {
        let err = select(&doc(json!({
            "google_cloud_platform": {"region": "us-central1"},
            "amazon_web_services": {"region": "us-east-1"}
        })))
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::MultipleProviders {
                providers: vec![
                    "amazon_web_services".into(),
                    "google_cloud_platform".into()
                ]
            }
        );
    }

    #[test]
    fn single_block_is_adopted() {
        let selection = select(&doc(json!({"azure": {"region": "eastus"}}))).unwrap();
        assert_eq!(selection.kind, ProviderKind::Azure);
        assert_eq!(selection.document["provider"], json!("azure"));
    }

    #[test]
    fn unknown_provider_lists_permitted() {
        let err = select(&doc(json!({"provider": "do"}))).unwrap_err();
        assert!(err.to_string().contains("local, existing, aws, gcp, azure"));
    }

    #[test]
    fn non_string_provider_is_unknown() {
        let err = select(&doc(json!({"provider": 3}))).unwrap_err();
        assert!(matches!(err, DomainError::UnknownProvider { .. }));
    }

    #[test]
    fn named_existing_gets_synthesized_block() {
        let selection = select(&doc(json!({"provider": "existing"}))).unwrap();
        assert_eq!(selection.block(), Some(&json!({})));
    }

    #[test]
    fn named_cloud_without_block_is_left_alone() {
        let selection = select(&doc(json!({"provider": "gcp"}))).unwrap();
        assert_eq!(selection.kind, ProviderKind::Gcp);
        assert!(selection.block().is_none());
    }

    #[test]
    fn extra_blocks_are_warnings() {
        let selection = select(&doc(json!({
            "provider": "aws",
            "amazon_web_services": {"region": "us-east-1"},
            "azure": {"region": "eastus"},
            "local": {"kube_context": "kind"},
            "existing": {}
        })))
        .unwrap();
        assert_eq!(selection.kind, ProviderKind::Aws);
        assert_eq!(selection.warnings.len(), 1);
        assert!(selection.warnings[0].contains("[azure, local]"));
    }

    #[test]
    fn selection_ignores_key_order() {
        let a = doc(json!({"azure": {}, "local": {}}));
        let mut b = Map::new();
        b.insert("local".into(), json!({}));
        b.insert("azure".into(), json!({}));
        assert_eq!(select(&a).unwrap_err(), select(&b).unwrap_err());
    }
}
