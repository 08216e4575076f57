//! Error types for template discovery, resolution and materialization

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the core engine
pub type Result<T> = std::result::Result<T, CreatorError>;

/// Fatal errors: any of these aborts the current run
#[derive(Debug, Error)]
pub enum CreatorError {
    /// A template or ancestor identifier is absent from the registry
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// An inheritance cycle, naming the identifier seen twice on one path
    #[error("Circular dependency detected in template inheritance: {0}")]
    CircularInheritance(String),

    /// A template manifest exists but could not be parsed
    #[error("Failed to parse manifest {}: {reason}", .path.display())]
    ManifestParse { path: PathBuf, reason: String },

    /// The destination root already exists
    #[error("Directory {} already exists", .0.display())]
    DestinationExists(PathBuf),

    /// Any filesystem failure during discovery or materialization
    #[error("Failed to {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CreatorError {
    pub(crate) fn io(operation: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Non-fatal failures of a single merge marker.
///
/// These are collected in the materialization report; the run continues.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Don't know how to merge file type: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
