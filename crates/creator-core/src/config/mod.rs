//! Configuration mapping used for placeholder substitution
//!
//! A [`Configuration`] is built once per run by a [`ConfigBuilder`] from up to
//! four sources and is immutable afterwards. Precedence, highest first:
//!
//! 1. values given on the command line
//! 2. the project name (key `name`)
//! 3. answers collected interactively
//! 4. `initial` defaults declared by the template's prompts

use crate::templates::manifest::TemplateManifest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key under which the project name is stored
pub const PROJECT_NAME_KEY: &str = "name";

/// Check that a project name only uses ASCII letters, digits, `-` and `_`
pub fn validate_project_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Project name is required".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(
            "Project name can only contain letters, numbers, hyphens, and underscores".to_string(),
        );
    }
    Ok(())
}

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    /// Interpret a raw command-line value: finite numbers become
    /// [`ConfigValue::Number`], everything else stays text.
    pub fn parse_cli(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Ok(n) = trimmed.parse::<f64>() {
                if n.is_finite() {
                    return Self::Number(n);
                }
            }
        }
        Self::Text(raw.to_string())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Text(s) => f.write_str(s),
            // f64's Display already renders 3.0 as "3"
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Finished key/value mapping handed to the materializer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, ConfigValue>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Configuration::new();
        for (k, v) in iter {
            config.insert(k, v);
        }
        config
    }
}

/// Collects configuration sources and merges them by precedence
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    project_name: Option<String>,
    cli: Configuration,
    answers: Configuration,
    defaults: Configuration,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Values passed explicitly on the command line
    pub fn cli_values(mut self, values: Configuration) -> Self {
        self.cli = values;
        self
    }

    /// Answers collected from interactive prompts
    pub fn answers(mut self, values: Configuration) -> Self {
        self.answers = values;
        self
    }

    /// Take the `initial` value of every prompt declared by the manifest
    pub fn defaults_from(mut self, manifest: &TemplateManifest) -> Self {
        for prompt in &manifest.prompts {
            if let Some(initial) = &prompt.initial {
                self.defaults.insert(prompt.name.clone(), initial.clone());
            }
        }
        self
    }

    /// Keys the caller still needs to ask for, in prompt declaration order
    pub fn missing_prompts<'a>(&self, manifest: &'a TemplateManifest) -> Vec<&'a str> {
        manifest
            .prompts
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| {
                !self.cli.contains_key(name)
                    && !self.answers.contains_key(name)
                    && !(self.project_name.is_some() && *name == PROJECT_NAME_KEY)
            })
            .collect()
    }

    pub fn build(self) -> Configuration {
        let mut config = self.defaults;
        for (k, v) in self.answers.values {
            config.values.insert(k, v);
        }
        if let Some(name) = self.project_name {
            config.insert(PROJECT_NAME_KEY, name);
        }
        for (k, v) in self.cli.values {
            config.values.insert(k, v);
        }
        config
    }
}
