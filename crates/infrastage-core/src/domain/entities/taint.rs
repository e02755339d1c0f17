//! Node taints and the compact `key=value:effect` grammar.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;
use crate::domain::value_objects::TaintEffect;

static COMPACT_TAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[^=:\s]+)=(?P<value>[^=:\s]*):(?P<effect>[A-Za-z]+)$")
        .expect("taint grammar regex")
});

/// A Kubernetes node taint.
///
/// Immutable once constructed; fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTaint")]
pub struct Taint {
    key: String,
    value: String,
    effect: TaintEffect,
}

impl Taint {
    pub fn new(key: impl Into<String>, value: impl Into<String>, effect: TaintEffect) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            effect,
        }
    }

    /// `dedicated=nebari:NoSchedule`, carried by every non-general pool by default.
    pub fn dedicated() -> Self {
        Self::new("dedicated", "nebari", TaintEffect::NoSchedule)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn effect(&self) -> TaintEffect {
        self.effect
    }
}

impl fmt::Display for Taint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}:{}", self.key, self.value, self.effect)
    }
}

impl FromStr for Taint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: String| DomainError::MalformedTaint {
            taint: s.to_string(),
            reason,
        };

        let caps = COMPACT_TAINT
            .captures(s.trim())
            .ok_or_else(|| malformed("expected the form key=value:effect".into()))?;

        let effect = caps["effect"].parse::<TaintEffect>().map_err(malformed)?;
        Ok(Self::new(&caps["key"], &caps["value"], effect))
    }
}

// ── Raw input ─────────────────────────────────────────────────────────────────

/// Either accepted spelling of a taint in a document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTaint {
    Compact(String),
    Structured {
        key: String,
        #[serde(default)]
        value: String,
        effect: String,
    },
}

impl TryFrom<RawTaint> for Taint {
    type Error = DomainError;

    fn try_from(raw: RawTaint) -> Result<Self, Self::Error> {
        match raw {
            RawTaint::Compact(s) => s.parse(),
            RawTaint::Structured { key, value, effect } => {
                if key.is_empty() {
                    return Err(DomainError::MalformedTaint {
                        taint: format!("{key}={value}:{effect}"),
                        reason: "taint key must not be empty".into(),
                    });
                }
                let effect = effect
                    .parse::<TaintEffect>()
                    .map_err(|reason| DomainError::MalformedTaint {
                        taint: format!("{key}={value}:{effect}"),
                        reason,
                    })?;
                Ok(Self::new(key, value, effect))
            }
        }
    }
}

/// Turn a raw `taints` value into taint records.
///
/// Accepts a sequence mixing compact strings and `{key, value, effect}`
/// records. Anything else is a [`DomainError::MalformedTaint`].
pub fn normalize(raw: &Value) -> Result<Vec<Taint>, DomainError> {
    let items = raw.as_array().ok_or_else(|| DomainError::MalformedTaint {
        taint: raw.to_string(),
        reason: "taints must be a list".into(),
    })?;

    items
        .iter()
        .map(|item| {
            let parsed = RawTaint::deserialize(item).map_err(|_| DomainError::MalformedTaint {
                taint: item.to_string(),
                reason: "expected a key=value:effect string or a {key, value, effect} record"
                    .into(),
            })?;
            Taint::try_from(parsed)
        })
        .collect()
}
