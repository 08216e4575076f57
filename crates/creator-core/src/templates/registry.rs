//! Template discovery from a directory of template folders
//!
//! Every immediate subdirectory of the templates root that holds a manifest is
//! one template, identified by its folder name. Folders without a manifest are
//! ignored. A manifest that fails to parse only poisons its own template: the
//! failure is remembered and reported when that template is looked up.

use super::manifest::{TemplateManifest, MANIFEST_FILES};
use crate::error::{CreatorError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A discovered template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Folder name, unique within the registry
    pub id: String,

    /// Template directory on disk
    pub path: PathBuf,

    pub manifest: TemplateManifest,
}

/// Read-only view of the templates under one root
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    root: PathBuf,
    templates: BTreeMap<String, Template>,
    invalid: BTreeMap<String, (PathBuf, String)>,
}

impl TemplateRegistry {
    /// Scan `root` for templates.
    ///
    /// Fails only if the root itself cannot be listed.
    pub fn discover(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let entries =
            std::fs::read_dir(&root).map_err(|e| CreatorError::io("read directory", &root, e))?;

        let mut registry = Self {
            root: root.clone(),
            ..Self::default()
        };

        for entry in entries {
            let entry = entry.map_err(|e| CreatorError::io("read directory", &root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().into_owned();

            let Some(manifest_path) = find_manifest(&path) else {
                debug!(template = %id, "skipping folder without manifest");
                continue;
            };

            match load_manifest(&manifest_path) {
                Ok(manifest) => {
                    debug!(template = %id, name = %manifest.name, "discovered template");
                    registry.templates.insert(
                        id.clone(),
                        Template {
                            id,
                            path,
                            manifest,
                        },
                    );
                }
                Err(reason) => {
                    warn!(template = %id, %reason, "ignoring template with invalid manifest");
                    registry.invalid.insert(id, (manifest_path, reason));
                }
            }
        }

        Ok(registry)
    }

    /// Directory the templates were discovered in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a template by identifier
    pub fn get(&self, id: &str) -> Result<&Template> {
        if let Some(template) = self.templates.get(id) {
            return Ok(template);
        }
        match self.invalid.get(id) {
            Some((path, reason)) => Err(CreatorError::ManifestParse {
                path: path.clone(),
                reason: reason.clone(),
            }),
            None => Err(CreatorError::TemplateNotFound(id.to_string())),
        }
    }

    /// Valid templates, sorted by identifier
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    /// Identifiers of valid templates, sorted
    pub fn ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Templates whose manifest could not be parsed, with the reason
    pub fn invalid(&self) -> impl Iterator<Item = (&str, &str)> {
        self.invalid
            .iter()
            .map(|(id, (_, reason))| (id.as_str(), reason.as_str()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn find_manifest(dir: &Path) -> Option<PathBuf> {
    MANIFEST_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Any failure here only invalidates this one template
fn load_manifest(path: &Path) -> std::result::Result<TemplateManifest, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    TemplateManifest::parse(path, &content)
}
