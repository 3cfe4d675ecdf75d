//! Archive staging
//!
//! Unpacks a `.tar.gz` release into a temporary directory next to the
//! destination, then moves its top-level directory into place.

use std::fs;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use crate::error::{FalkorLiteError, Result};

/// Where the server sources are staged by default
pub const DEFAULT_DESTINATION: &str = "redis.submodule";

/// Extract `archive` and move its top-level directory to `destination`
///
/// Any existing `destination` is removed first.
pub fn extract_and_stage(archive: &[u8], destination: &Path) -> Result<PathBuf> {
    if destination.exists() {
        tracing::info!("Removing existing {}", destination.display());
        fs::remove_dir_all(destination)?;
    }

    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    // Must share a filesystem with `destination` for the rename below
    let staging = tempfile::Builder::new()
        .prefix(".falkordblite-extract-")
        .tempdir_in(&parent)?;

    let top_level = unpack(archive, staging.path())?;
    let extracted = staging.path().join(&top_level);
    if !extracted.is_dir() {
        return Err(FalkorLiteError::Archive(format!(
            "top-level entry {} is not a directory",
            top_level.display()
        )));
    }

    tracing::info!("Moving {} -> {}", extracted.display(), destination.display());
    fs::rename(&extracted, destination)?;

    Ok(destination.to_path_buf())
}

/// Unpack every entry under `target`, returning the first entry's top-level name
///
/// PAX extension headers are metadata, not files, and are skipped.
fn unpack(archive: &[u8], target: &Path) -> Result<PathBuf> {
    let mut archive = Archive::new(GzDecoder::new(archive));
    let mut top_level: Option<PathBuf> = None;

    for entry in archive.entries()? {
        let mut entry = entry?;

        // `git archive` output starts with a pax_global_header entry
        if matches!(
            entry.header().entry_type(),
            EntryType::XGlobalHeader | EntryType::XHeader
        ) {
            continue;
        }

        if top_level.is_none() {
            let path = entry.path()?;
            top_level = path.components().find_map(|c| match c {
                Component::Normal(name) => Some(PathBuf::from(name)),
                _ => None,
            });
            if let Some(name) = &top_level {
                tracing::info!("Extracting archive {}", name.display());
            }
        }

        if !entry.unpack_in(target)? {
            tracing::warn!("Skipped archive entry outside the extraction directory");
        }
    }

    top_level.ok_or_else(|| FalkorLiteError::Archive("archive is empty".to_string()))
}
