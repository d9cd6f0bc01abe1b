//! Zip extraction into the project directory
//!
//! Kit and platform archives wrap their contents in a single top-level folder
//! (`wordpress/`, `csalmeida-hozokit-<sha>/`). Extraction unpacks the archive,
//! moves that folder's contents to the target and removes both the folder and
//! the archive. Archives that do not have exactly one top-level folder are
//! rejected before anything is written.

use crate::error::{Result, ScaffoldError, Warning};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::ZipArchive;

/// Result of a successful extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Name of the archive's top-level folder
    pub top_level: String,
    /// Where the contents were copied, `None` if no target was given
    pub copied_to: Option<PathBuf>,
    /// Number of files copied into the target
    pub files_copied: usize,
    pub warning: Option<Warning>,
}

/// Extracts single-folder zip archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extract `zip_path` under `destination_dir` and move its contents to `target`
    ///
    /// Runs on the blocking pool.
    pub async fn extract(
        &self,
        zip_path: &Path,
        destination_dir: &Path,
        target: Option<&Path>,
    ) -> Result<Extraction> {
        let zip_path = zip_path.to_path_buf();
        let destination_dir = destination_dir.to_path_buf();
        let target = target.map(Path::to_path_buf);

        tokio::task::spawn_blocking(move || {
            Self::extract_blocking(&zip_path, &destination_dir, target.as_deref())
        })
        .await?
    }

    /// Synchronous form of [`ArchiveExtractor::extract`]
    pub fn extract_blocking(
        zip_path: &Path,
        destination_dir: &Path,
        target: Option<&Path>,
    ) -> Result<Extraction> {
        let file = File::open(zip_path).map_err(|e| ScaffoldError::fs("open", zip_path, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| ScaffoldError::MalformedArchive {
            archive: zip_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let top_level = top_level_folder(&mut archive, zip_path)?;
        debug!(archive = %zip_path.display(), %top_level, "extracting archive");

        archive.extract(destination_dir).map_err(|e| match e {
            ZipError::Io(source) => ScaffoldError::fs("extract into", destination_dir, source),
            other => ScaffoldError::MalformedArchive {
                archive: zip_path.to_path_buf(),
                reason: format!("extraction failed: {}", other),
            },
        })?;
        drop(archive);

        let extracted = destination_dir.join(&top_level);

        let files_copied = match target {
            Some(target) => copy_contents(&extracted, target)?,
            None => 0,
        };

        std::fs::remove_dir_all(&extracted)
            .map_err(|e| ScaffoldError::fs("remove extracted folder", &extracted, e))?;
        std::fs::remove_file(zip_path).map_err(|e| ScaffoldError::fs("remove", zip_path, e))?;

        let warning = if target.is_none() {
            let warning = Warning::MissingCopyTarget {
                archive: zip_path.to_path_buf(),
            };
            warn!("{}", warning);
            Some(warning)
        } else {
            None
        };

        Ok(Extraction {
            top_level,
            copied_to: target.map(Path::to_path_buf),
            files_copied,
            warning,
        })
    }
}

/// Find the single top-level folder shared by every entry
fn top_level_folder(archive: &mut ZipArchive<File>, zip_path: &Path) -> Result<String> {
    let malformed = |reason: String| ScaffoldError::MalformedArchive {
        archive: zip_path.to_path_buf(),
        reason,
    };

    if archive.is_empty() {
        return Err(malformed("archive is empty".to_string()));
    }

    let mut roots = BTreeSet::new();
    for name in archive.file_names() {
        let trimmed = name.trim_start_matches("./");
        match trimmed.split_once('/') {
            Some((root, _)) if !root.is_empty() => {
                roots.insert(root.to_string());
            }
            _ => {
                return Err(malformed(format!(
                    "entry '{}' is not inside a top-level folder",
                    name
                )))
            }
        }
    }

    if roots.len() != 1 {
        let found: Vec<String> = roots.into_iter().collect();
        return Err(malformed(format!(
            "expected one top-level folder, found {}: {}",
            found.len(),
            found.join(", ")
        )));
    }

    roots
        .into_iter()
        .next()
        .ok_or_else(|| malformed("archive has no top-level folder".to_string()))
}

/// Copy everything below `source` into `target`, overwriting existing files
fn copy_contents(source: &Path, target: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| source.to_path_buf());
            ScaffoldError::fs(
                format!("read (after copying {} files)", copied),
                path,
                std::io::Error::other(e.to_string()),
            )
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| ScaffoldError::fs("resolve", entry.path(), std::io::Error::other(e)))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).map_err(|e| {
                ScaffoldError::fs(format!("create directory (after copying {} files)", copied), &dest, e)
            })?;
        } else {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ScaffoldError::fs(format!("create directory (after copying {} files)", copied), parent, e)
                })?;
            }
            std::fs::copy(entry.path(), &dest).map_err(|e| {
                ScaffoldError::fs(format!("copy file (after copying {} files) to", copied), &dest, e)
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
