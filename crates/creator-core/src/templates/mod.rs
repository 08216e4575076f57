//! Template discovery, inheritance and materialization
//!
//! This module provides:
//! - Template manifest types (TemplateManifest, PromptSpec)
//! - Template discovery from a templates root (TemplateRegistry)
//! - Inheritance chain resolution
//! - Placeholder substitution and text/binary classification
//! - JSON/YAML deep-merge for `+` merge markers
//! - Layered copying into a new project directory

pub mod classify;
pub mod copier;
pub mod inheritance;
pub mod manifest;
pub mod merge;
pub mod registry;
pub mod substitute;

use crate::config::Configuration;
use crate::error::{CreatorError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub use copier::{materialize, Marker, MaterializeReport};
pub use inheritance::resolve;
pub use manifest::{PromptKind, PromptSpec, TemplateManifest};
pub use merge::{DeepMerge, MergeFormat};
pub use registry::{Template, TemplateRegistry};
pub use substitute::substitute;

/// Create `destination` and materialize `template_id` into it.
///
/// Nothing is written if the destination already exists or the inheritance
/// chain cannot be resolved. The root is claimed with an exclusive create, so
/// two concurrent calls for the same destination cannot both proceed.
pub async fn create_project(
    registry: &TemplateRegistry,
    template_id: &str,
    destination: &Path,
    config: &Configuration,
) -> Result<MaterializeReport> {
    if fs::symlink_metadata(destination).await.is_ok() {
        return Err(CreatorError::DestinationExists(destination.to_path_buf()));
    }

    let template = registry.get(template_id)?;
    let layers = resolve(registry, template_id)?
        .iter()
        .map(|id| registry.get(id).map(|t| t.path.clone()))
        .collect::<Result<Vec<PathBuf>>>()?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| CreatorError::io("create directory", parent, e))?;
    }
    fs::create_dir(destination).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            CreatorError::DestinationExists(destination.to_path_buf())
        } else {
            CreatorError::io("create directory", destination, e)
        }
    })?;

    info!(
        template = %template_id,
        layers = layers.len() + 1,
        destination = %destination.display(),
        "creating project"
    );
    materialize(&layers, &template.path, destination, config).await
}
