//! Product configuration trait for CLI binaries
//!
//! Each binary built on this library implements [`ProductConfig`] to define
//! its identity, where templates live, and the text printed after a project
//! has been created.

use std::path::{Path, PathBuf};

/// Configuration trait for different CLI products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Templates root used when neither flag nor environment override it
    fn default_templates_dir(&self) -> PathBuf;

    /// Environment variable overriding the templates root, e.g. `CREATOR_TEMPLATES_DIR`
    fn templates_dir_env(&self) -> String {
        format!(
            "{}_TEMPLATES_DIR",
            self.name().to_ascii_uppercase().replace('-', "_")
        )
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, template_id: &str) -> Vec<String>;

    /// Resolve the templates root: explicit flag, then environment, then default
    fn templates_dir(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        match std::env::var_os(self.templates_dir_env()) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => self.default_templates_dir(),
        }
    }
}
