//! Theme dependency installation
//!
//! Dependencies are only installed when the running Node.js matches the
//! version the kit pins in its marker file. The package manager runs to
//! completion on the blocking pool with its output suppressed; the caller
//! awaits it, so this is the one stage that can take minutes.

use super::check::{check_node, trimmed};
use crate::error::{ScaffoldError, Warning};
use crate::product::ProductConfig;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tokio::fs;
use tracing::{debug, info, warn};

/// Outcome of a dependency install attempt; never aborts the pipeline
#[derive(Debug)]
pub enum InstallOutcome {
    Installed,
    Skipped(Warning),
    Failed(ScaffoldError),
}

impl InstallOutcome {
    pub fn installed(&self) -> bool {
        matches!(self, InstallOutcome::Installed)
    }

    /// Warning to surface to the user, if any
    pub fn warning(&self) -> Option<Warning> {
        match self {
            InstallOutcome::Installed => None,
            InstallOutcome::Skipped(warning) => Some(warning.clone()),
            InstallOutcome::Failed(e) => Some(Warning::DependencyInstallFailed {
                reason: e.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
enum RuntimeSource {
    Detect,
    Fixed(Option<String>),
}

/// Runs the product's package manager inside a generated theme
#[derive(Debug, Clone)]
pub struct DependencyInstaller {
    program: String,
    args: Vec<String>,
    runtime: RuntimeSource,
}

impl DependencyInstaller {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            runtime: RuntimeSource::Detect,
        }
    }

    /// Installer using the product's install command and the local `node`
    pub fn from_config<C: ProductConfig>(config: &C) -> Self {
        let (program, args) = config.install_command();
        Self::new(program, args)
    }

    /// Use `version` instead of asking `node --version`
    ///
    /// Compared verbatim (after trimming) with the marker content.
    pub fn with_runtime_version(mut self, version: Option<&str>) -> Self {
        self.runtime = RuntimeSource::Fixed(version.and_then(trimmed));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Install dependencies in `project_dir` if the marker matches the runtime
    pub async fn install(&self, project_dir: &Path, marker_path: &Path) -> InstallOutcome {
        let expected = match read_marker(marker_path).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                return InstallOutcome::Skipped(Warning::MissingVersionMarker {
                    marker: marker_path.to_path_buf(),
                })
            }
            Err(e) => return InstallOutcome::Failed(e),
        };

        let running = match self.running_version().await {
            Ok(version) => version,
            Err(e) => return InstallOutcome::Failed(e),
        };

        if running.as_deref() != Some(expected.as_str()) {
            let warning = Warning::VersionMismatch {
                expected,
                running,
                directory: project_dir.to_path_buf(),
            };
            warn!("{}", warning);
            return InstallOutcome::Skipped(warning);
        }

        info!(program = %self.program, directory = %project_dir.display(), "installing dependencies");
        match self.run(project_dir.to_path_buf()).await {
            Ok(()) => InstallOutcome::Installed,
            Err(e) => {
                warn!(error = %e, "dependency install failed");
                InstallOutcome::Failed(e)
            }
        }
    }

    async fn running_version(&self) -> Result<Option<String>, ScaffoldError> {
        match &self.runtime {
            RuntimeSource::Fixed(version) => Ok(version.clone()),
            RuntimeSource::Detect => {
                let info = tokio::task::spawn_blocking(check_node).await?;
                debug!(runtime = info.name, version = ?info.version, "detected runtime");
                Ok(info.version)
            }
        }
    }

    async fn run(&self, project_dir: PathBuf) -> Result<(), ScaffoldError> {
        let program = self.program.clone();
        let args = self.args.clone();

        let status = tokio::task::spawn_blocking(move || {
            Command::new(&program)
                .args(&args)
                .current_dir(&project_dir)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
        })
        .await?;

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(ScaffoldError::DependencyInstall {
                program: self.program.clone(),
                reason: match status.code() {
                    Some(code) => format!("exited with status {}", code),
                    None => "terminated by signal".to_string(),
                },
            }),
            Err(e) => Err(ScaffoldError::DependencyInstall {
                program: self.program.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

async fn read_marker(marker_path: &Path) -> Result<Option<String>, ScaffoldError> {
    if !fs::try_exists(marker_path).await.unwrap_or(false) {
        return Ok(None);
    }
    let content = fs::read_to_string(marker_path)
        .await
        .map_err(|e| ScaffoldError::fs("read", marker_path, e))?;
    let content = content.trim();
    if content.is_empty() {
        Ok(None)
    } else {
        Ok(Some(content.to_string()))
    }
}
