//! Layered template materialization
//!
//! Each layer (ancestors first, the selected template last) is applied in two
//! phases before the next layer starts:
//!
//! 1. copy: every entry is copied into the destination, with substitution for
//!    text files. `+name` entries are merged into an existing `name`, or
//!    copied as `name` when there is nothing to merge into. `-name` entries and
//!    the top-level manifest are skipped.
//! 2. delete: every `-name` entry removes `name` from the destination, if
//!    present. Deletions see the result of this layer's copy phase only.
//!
//! Entries are visited in file-name order. All writes are awaited before the
//! next entry is processed. There is no rollback: an error leaves the
//! destination as far as it got.

use super::classify;
use super::manifest::is_manifest_file;
use super::merge::merge_file;
use super::substitute::substitute;
use crate::config::Configuration;
use crate::error::{CreatorError, MergeError, Result};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What a single template entry asks for, based on its name.
///
/// Generic over the name type so raw, possibly non-UTF-8, directory entry
/// names can be classified without decoding them.
#[derive(Debug, PartialEq, Eq)]
pub enum Marker<'a, N: ?Sized + 'a = str> {
    /// `-name`: remove `name` after the layer's copy phase
    Delete(&'a N),
    /// `+name`: merge into `name`, or copy as `name`
    Merge(&'a N),
    /// Anything else, including the literal names `-` and `+`
    Plain(&'a N),
}

impl<N: ?Sized> Clone for Marker<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: ?Sized> Copy for Marker<'_, N> {}

impl<'a> Marker<'a> {
    pub fn parse(name: &'a str) -> Self {
        if name.len() > 1 {
            if let Some(rest) = name.strip_prefix('-') {
                return Marker::Delete(rest);
            }
            if let Some(rest) = name.strip_prefix('+') {
                return Marker::Merge(rest);
            }
        }
        Marker::Plain(name)
    }
}

impl<'a> Marker<'a, OsStr> {
    /// Classify a raw entry name, stripping the prefix on its encoded bytes
    pub fn parse_os(name: &'a OsStr) -> Self {
        let bytes = name.as_encoded_bytes();
        if bytes.len() > 1 && matches!(bytes[0], b'-' | b'+') {
            // SAFETY: the split is directly after an ASCII byte, which keeps
            // both halves valid platform-encoded strings.
            let rest = unsafe { OsStr::from_encoded_bytes_unchecked(&bytes[1..]) };
            return if bytes[0] == b'-' {
                Marker::Delete(rest)
            } else {
                Marker::Merge(rest)
            };
        }
        Marker::Plain(name)
    }
}

impl<'a, N: ?Sized> Marker<'a, N> {
    /// Name the entry maps to in the destination
    pub fn target_name(&self) -> &'a N {
        match *self {
            Marker::Delete(n) | Marker::Merge(n) | Marker::Plain(n) => n,
        }
    }
}

/// Outcome of a materialization run
#[derive(Debug, Default)]
pub struct MaterializeReport {
    /// Files written by plain copies, in order
    pub written: Vec<PathBuf>,

    /// Files updated by a merge marker
    pub merged: Vec<PathBuf>,

    /// Destination paths removed by deletion markers
    pub deleted: Vec<PathBuf>,

    /// Merge markers that could not be applied
    pub issues: Vec<MergeError>,
}

/// Apply `layers` then `target_layer` onto `destination`.
///
/// The destination root is expected to exist. Only one materialization may
/// run against a given destination at a time; [`super::create_project`]
/// guarantees this by claiming the root with an exclusive create.
pub async fn materialize(
    layers: &[PathBuf],
    target_layer: &Path,
    destination: &Path,
    config: &Configuration,
) -> Result<MaterializeReport> {
    let mut report = MaterializeReport::default();

    for layer in layers
        .iter()
        .map(PathBuf::as_path)
        .chain(std::iter::once(target_layer))
    {
        info!(layer = %layer.display(), "applying template layer");
        copy_layer(layer, destination, config, &mut report).await?;
        apply_deletions(layer, destination, &mut report).await?;
    }

    Ok(report)
}

/// Copy phase for one layer
async fn copy_layer(
    layer: &Path,
    destination: &Path,
    config: &Configuration,
    report: &mut MaterializeReport,
) -> Result<()> {
    let walker = WalkDir::new(layer)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !matches!(Marker::parse_os(e.file_name()), Marker::Delete(_)));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(layer, e))?;

        if entry.depth() == 1
            && entry.file_type().is_file()
            && entry.file_name().to_str().is_some_and(is_manifest_file)
        {
            continue;
        }

        let dest_path = destination_path(layer, entry.path(), destination)?;

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .await
                .map_err(|e| CreatorError::io("create directory", &dest_path, e))?;
            continue;
        }

        if let Marker::Merge(_) = Marker::parse_os(entry.file_name()) {
            if dest_path.exists() {
                match merge_file(entry.path(), &dest_path, config).await {
                    Ok(()) => {
                        debug!(path = %dest_path.display(), "merged");
                        report.merged.push(dest_path);
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping merge");
                        report.issues.push(e);
                    }
                }
                continue;
            }
        }

        copy_file(entry.path(), &dest_path, config).await?;
        debug!(path = %dest_path.display(), "copied");
        report.written.push(dest_path);
    }

    Ok(())
}

/// Deletion phase for one layer
async fn apply_deletions(
    layer: &Path,
    destination: &Path,
    report: &mut MaterializeReport,
) -> Result<()> {
    let mut walker = WalkDir::new(layer)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| walk_error(layer, e))?;
        if !matches!(Marker::parse_os(entry.file_name()), Marker::Delete(_)) {
            continue;
        }
        if entry.file_type().is_dir() {
            walker.skip_current_dir();
        }

        let target = destination_path(layer, entry.path(), destination)?;
        let metadata = match fs::symlink_metadata(&target).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(CreatorError::io("inspect", &target, e)),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&target)
                .await
                .map_err(|e| CreatorError::io("remove directory", &target, e))?;
        } else {
            fs::remove_file(&target)
                .await
                .map_err(|e| CreatorError::io("remove file", &target, e))?;
        }
        debug!(path = %target.display(), "deleted");
        report.deleted.push(target);
    }

    Ok(())
}

/// Copy one file, substituting placeholders in text and keeping permissions
async fn copy_file(source: &Path, dest: &Path, config: &Configuration) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| CreatorError::io("create directory", parent, e))?;
    }

    let bytes = fs::read(source)
        .await
        .map_err(|e| CreatorError::io("read", source, e))?;
    let permissions = fs::metadata(source)
        .await
        .map_err(|e| CreatorError::io("read metadata of", source, e))?
        .permissions();

    let content = if classify::is_text(source, &bytes) {
        match String::from_utf8(bytes) {
            Ok(text) => substitute(&text, config).into_bytes(),
            Err(e) => e.into_bytes(),
        }
    } else {
        bytes
    };

    fs::write(dest, content)
        .await
        .map_err(|e| CreatorError::io("write", dest, e))?;
    fs::set_permissions(dest, permissions)
        .await
        .map_err(|e| CreatorError::io("set permissions on", dest, e))
}

/// Map a path inside a layer to the destination, stripping marker prefixes
fn destination_path(layer: &Path, source: &Path, destination: &Path) -> Result<PathBuf> {
    let relative = source.strip_prefix(layer).map_err(|_| {
        CreatorError::io(
            "resolve",
            source,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "entry outside its layer"),
        )
    })?;

    let mut path = destination.to_path_buf();
    for component in relative.components() {
        if let Component::Normal(name) = component {
            path.push(Marker::parse_os(name).target_name());
        }
    }
    Ok(path)
}

fn walk_error(layer: &Path, err: walkdir::Error) -> CreatorError {
    let path = err.path().unwrap_or(layer).to_path_buf();
    CreatorError::io("walk", &path, err.into())
}
