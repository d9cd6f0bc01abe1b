//! Error and warning types for scaffolding operations
//!
//! Every stage converts its local failure into a [`ScaffoldError`] carrying
//! enough context (URL, path, status) to print a single descriptive message.
//! Soft outcomes that must be surfaced without aborting are [`Warning`]s.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::progress::ProgressError;

/// Result type alias for scaffolding operations
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Main error type for the scaffolder
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Connection, TLS or body-read failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Download answered with a non-success status
    #[error("download of {url} failed (HTTP {status})")]
    HttpStatus { url: String, status: u16 },

    /// No data received within the inactivity window
    #[error("download of {url} stalled: no data received for {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    /// Release metadata endpoint answered with a non-success status
    #[error("release lookup at {url} failed (HTTP {status})")]
    Api { url: String, status: u16 },

    /// Release metadata body is not well-formed JSON
    #[error("release metadata from {url} is not valid JSON: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A URL field could not be parsed
    #[error("invalid URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// Release metadata lacks a required field
    #[error("release metadata is missing the '{field}' field")]
    MissingField { field: &'static str },

    /// Archive does not contain exactly one top-level folder
    #[error("malformed archive {}: {reason}", archive.display())]
    MalformedArchive { archive: PathBuf, reason: String },

    /// Copy, rename, read, write or delete failure
    #[error("could not {action} {}: {source}", path.display())]
    Filesystem {
        action: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more files could not be rendered; all of them were attempted
    #[error("{} file operation(s) failed:\n{}", failures.len(), failures.join("\n"))]
    Render { failures: Vec<String> },

    /// Template engine failure
    #[error("could not render template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// Package manager install failed
    #[error("could not install dependencies via {program}: {reason}")]
    DependencyInstall { program: String, reason: String },

    /// Component generator could not find the theme folder
    #[error("could not find project directory {}", path.display())]
    ProjectNotFound { path: PathBuf },

    /// Persisted settings could not be read or written
    #[error("settings error: {0}")]
    Settings(String),

    /// Progress bookkeeping misuse
    #[error(transparent)]
    Task(#[from] ProgressError),

    /// A tracked task failed
    #[error("{label}: {reason}")]
    TaskFailed { label: String, reason: String },

    /// Blocking worker panicked or was cancelled
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ScaffoldError {
    /// Build a filesystem error for `action` on `path`
    pub fn fs(action: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            action: action.into(),
            path: path.into(),
            source,
        }
    }
}

/// Soft outcome surfaced to the user without aborting the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Running runtime differs from the version the kit expects
    VersionMismatch {
        expected: String,
        running: Option<String>,
        directory: PathBuf,
    },

    /// The kit carries no version marker, so dependencies were not installed
    MissingVersionMarker { marker: PathBuf },

    /// Archive was cleaned up without copying because no target was given
    MissingCopyTarget { archive: PathBuf },

    /// Theme folder was not found, templates were not rendered
    ThemeFolderMissing { path: PathBuf },

    /// Dependency install ran and failed
    DependencyInstallFailed { reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::VersionMismatch {
                expected,
                running,
                directory,
            } => write!(
                f,
                "Avoided dependency install because current Node version is {}.\n\
                 Please set Node to {}, change directory to {} and run npm install",
                running.as_deref().unwrap_or("not installed"),
                expected,
                directory.display()
            ),
            Warning::MissingVersionMarker { marker } => write!(
                f,
                "Avoided dependency install because {} was not found",
                marker.display()
            ),
            Warning::MissingCopyTarget { archive } => write!(
                f,
                "Could not copy files from {} (no target path). Zip file and extracted files were removed.",
                archive.display()
            ),
            Warning::ThemeFolderMissing { path } => write!(
                f,
                "Theme folder {} not found, base files were not generated",
                path.display()
            ),
            Warning::DependencyInstallFailed { reason } => {
                write!(f, "Dependencies were not installed: {}", reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_lists_every_failure() {
        let err = ScaffoldError::Render {
            failures: vec!["could not create base.scss".into(), "could not create .env".into()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 file operation(s) failed"));
        assert!(msg.contains("base.scss"));
        assert!(msg.contains(".env"));
    }

    #[test]
    fn test_version_mismatch_names_both_versions() {
        let warning = Warning::VersionMismatch {
            expected: "v14.15.1".into(),
            running: Some("v20.1.0".into()),
            directory: PathBuf::from("my-theme/wp-content/themes/my-theme"),
        };
        let msg = warning.to_string();
        assert!(msg.contains("v20.1.0"));
        assert!(msg.contains("v14.15.1"));
    }
}
