//! Template manifest types and parsing

use crate::config::ConfigValue;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Manifest file names, in lookup order. Both are reserved at a template root.
pub const MANIFEST_FILES: &[&str] = &["template.json", "template.yaml"];

/// Kind of value a prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Text,
    Number,
    #[serde(alias = "boolean")]
    Bool,
}

/// A configurable value the template asks the user for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSpec {
    /// Configuration key the answer is stored under
    pub name: String,

    #[serde(rename = "type")]
    pub kind: PromptKind,

    /// User-facing question
    pub message: String,

    /// Default used when the prompt is not answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<ConfigValue>,
}

/// Per-template manifest (templates/<id>/template.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Parent template identifiers, applied before this template
    #[serde(default)]
    pub inherits: Vec<String>,

    /// Values to collect before materializing
    #[serde(default)]
    pub prompts: Vec<PromptSpec>,
}

impl TemplateManifest {
    /// Parse a manifest, choosing JSON or YAML by the file name
    pub fn parse(path: &Path, content: &str) -> Result<Self, String> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            _ => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Find the prompt declared for a key
    pub fn prompt(&self, name: &str) -> Option<&PromptSpec> {
        self.prompts.iter().find(|p| p.name == name)
    }
}

/// Whether a file name is a reserved manifest name
pub fn is_manifest_file(name: &str) -> bool {
    MANIFEST_FILES.contains(&name)
}
