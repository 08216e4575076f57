//! Structured deep-merge of JSON and YAML documents
//!
//! Rules, applied recursively:
//! - list + list: base elements followed by incoming elements
//! - map + map: key-wise merge, incoming keys appended in their order
//! - anything else: the incoming value replaces the base value

use super::substitute::substitute;
use crate::config::Configuration;
use crate::error::MergeError;
use std::path::Path;
use tokio::fs;

/// A document tree that can be deep-merged
pub trait DeepMerge: Sized {
    fn deep_merge(self, incoming: Self) -> Self;
}

impl DeepMerge for serde_json::Value {
    fn deep_merge(self, incoming: Self) -> Self {
        use serde_json::Value;

        match (self, incoming) {
            (Value::Array(mut base), Value::Array(more)) => {
                base.extend(more);
                Value::Array(base)
            }
            (Value::Object(mut base), Value::Object(more)) => {
                for (key, value) in more {
                    match base.get_mut(&key) {
                        Some(existing) => {
                            let prev = std::mem::replace(existing, Value::Null);
                            *existing = prev.deep_merge(value);
                        }
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
                Value::Object(base)
            }
            (_, incoming) => incoming,
        }
    }
}

impl DeepMerge for serde_yaml::Value {
    fn deep_merge(self, incoming: Self) -> Self {
        use serde_yaml::Value;

        match (self, incoming) {
            (Value::Sequence(mut base), Value::Sequence(more)) => {
                base.extend(more);
                Value::Sequence(base)
            }
            (Value::Mapping(mut base), Value::Mapping(more)) => {
                for (key, value) in more {
                    match base.get_mut(&key) {
                        Some(existing) => {
                            let prev = std::mem::replace(existing, Value::Null);
                            *existing = prev.deep_merge(value);
                        }
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
                Value::Mapping(base)
            }
            (_, incoming) => incoming,
        }
    }
}

/// Formats a merge marker can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeFormat {
    Json,
    Yaml,
}

impl MergeFormat {
    /// Pick the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Merge two documents, `base_text` first. `source` and `target` only label errors.
    pub fn merge_text(
        self,
        base_text: &str,
        incoming_text: &str,
        target: &Path,
        source: &Path,
    ) -> Result<String, MergeError> {
        match self {
            Self::Json => {
                let base: serde_json::Value =
                    serde_json::from_str(base_text).map_err(|e| MergeError::Json {
                        path: target.to_path_buf(),
                        source: e,
                    })?;
                let incoming: serde_json::Value =
                    serde_json::from_str(incoming_text).map_err(|e| MergeError::Json {
                        path: source.to_path_buf(),
                        source: e,
                    })?;
                let merged = base.deep_merge(incoming);
                let mut out =
                    serde_json::to_string_pretty(&merged).map_err(|e| MergeError::Json {
                        path: target.to_path_buf(),
                        source: e,
                    })?;
                out.push('\n');
                Ok(out)
            }
            Self::Yaml => {
                let base: serde_yaml::Value =
                    serde_yaml::from_str(base_text).map_err(|e| MergeError::Yaml {
                        path: target.to_path_buf(),
                        source: e,
                    })?;
                let incoming: serde_yaml::Value =
                    serde_yaml::from_str(incoming_text).map_err(|e| MergeError::Yaml {
                        path: source.to_path_buf(),
                        source: e,
                    })?;
                let merged = base.deep_merge(incoming);
                serde_yaml::to_string(&merged).map_err(|e| MergeError::Yaml {
                    path: target.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}

/// Merge the marker file at `source` into the existing file at `target`.
///
/// Placeholders in the source are substituted before parsing. On any error
/// the target is left untouched.
pub async fn merge_file(
    source: &Path,
    target: &Path,
    config: &Configuration,
) -> Result<(), MergeError> {
    let format = MergeFormat::from_path(target)
        .ok_or_else(|| MergeError::UnsupportedFormat(source.to_path_buf()))?;

    let incoming = fs::read_to_string(source)
        .await
        .map_err(|e| MergeError::Io {
            operation: "read",
            path: source.to_path_buf(),
            source: e,
        })?;
    let incoming = substitute(&incoming, config);

    let base = fs::read_to_string(target)
        .await
        .map_err(|e| MergeError::Io {
            operation: "read",
            path: target.to_path_buf(),
            source: e,
        })?;

    let merged = format.merge_text(&base, &incoming, target, source)?;

    fs::write(target, merged)
        .await
        .map_err(|e| MergeError::Io {
            operation: "write",
            path: target.to_path_buf(),
            source: e,
        })
}
