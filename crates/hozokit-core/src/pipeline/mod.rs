//! Install pipeline: platform, kit, templates, dependencies, report
//!
//! The pipeline is a fixed ordered list of [`Stage`]s. The platform stages
//! are filtered out once, before the run starts, when the platform is not
//! requested. Stages run one after another; the first error moves the
//! pipeline to [`PipelineState::Failed`] and nothing after it runs. The
//! pipeline never prints errors itself, the caller reports the returned one.

mod stages;

use crate::download::{http_client, Downloader, ReleaseResolver};
use crate::error::{Result, Warning};
use crate::params::{ProjectLayout, ProjectParameters};
use crate::product::ProductConfig;
use crate::progress::ProgressView;
use crate::render::ThemeRenderer;
use crate::runtime::DependencyInstaller;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One unit of the install pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DownloadPlatform,
    ExtractPlatform,
    DownloadKit,
    ExtractKit,
    Template,
    InstallDeps,
    Report,
}

/// Every stage in execution order
pub const STAGES: &[Stage] = &[
    Stage::DownloadPlatform,
    Stage::ExtractPlatform,
    Stage::DownloadKit,
    Stage::ExtractKit,
    Stage::Template,
    Stage::InstallDeps,
    Stage::Report,
];

impl Stage {
    /// Stages only run when the platform is installed too
    pub fn requires_platform(self) -> bool {
        matches!(self, Stage::DownloadPlatform | Stage::ExtractPlatform)
    }

    /// Stages to run for a project, in order
    pub fn plan(install_platform: bool) -> Vec<Stage> {
        STAGES
            .iter()
            .copied()
            .filter(|stage| install_platform || !stage.requires_platform())
            .collect()
    }

    /// Pipeline state while this stage runs
    pub fn state(self) -> PipelineState {
        match self {
            Stage::DownloadPlatform => PipelineState::DownloadingPlatform,
            Stage::ExtractPlatform => PipelineState::ExtractingPlatform,
            Stage::DownloadKit => PipelineState::DownloadingKit,
            Stage::ExtractKit => PipelineState::ExtractingKit,
            Stage::Template => PipelineState::Templating,
            Stage::InstallDeps => PipelineState::InstallingDeps,
            Stage::Report => PipelineState::Reporting,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::DownloadPlatform => "download platform",
            Stage::ExtractPlatform => "extract platform",
            Stage::DownloadKit => "download kit",
            Stage::ExtractKit => "extract kit",
            Stage::Template => "render templates",
            Stage::InstallDeps => "install dependencies",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    DownloadingPlatform,
    ExtractingPlatform,
    DownloadingKit,
    ExtractingKit,
    Templating,
    InstallingDeps,
    Reporting,
    Done,
    Failed { stage: Stage },
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Name of the kit release that was installed
    pub release_name: Option<String>,
    pub dependencies_installed: bool,
    pub warnings: Vec<Warning>,
    pub next_steps: Vec<String>,
    pub runtime_version: String,
    pub layout: ProjectLayout,
}

/// State threaded through the stages of one run
pub struct PipelineContext<'a, C: ProductConfig> {
    pub config: &'a C,
    pub params: &'a ProjectParameters,
    pub layout: ProjectLayout,
    pub view: &'a dyn ProgressView,
    downloader: &'a Downloader,
    resolver: &'a ReleaseResolver,
    renderer: &'a ThemeRenderer,
    installer: &'a DependencyInstaller,
    pub release_name: Option<String>,
    pub runtime_version: String,
    pub dependencies_installed: bool,
    pub warnings: Vec<Warning>,
    pub next_steps: Vec<String>,
}

impl<C: ProductConfig> PipelineContext<'_, C> {
    fn into_report(self) -> PipelineReport {
        PipelineReport {
            release_name: self.release_name,
            dependencies_installed: self.dependencies_installed,
            warnings: self.warnings,
            next_steps: self.next_steps,
            runtime_version: self.runtime_version,
            layout: self.layout,
        }
    }
}

/// Creates a project from the platform and the latest kit release
pub struct InstallPipeline<'v, C: ProductConfig> {
    config: C,
    base_dir: PathBuf,
    view: &'v dyn ProgressView,
    downloader: Downloader,
    resolver: ReleaseResolver,
    renderer: ThemeRenderer,
    installer: DependencyInstaller,
    state: PipelineState,
    completed: Vec<Stage>,
}

impl<'v, C: ProductConfig> InstallPipeline<'v, C> {
    /// Pipeline creating projects under `base_dir`
    pub fn new(config: C, base_dir: &Path, view: &'v dyn ProgressView) -> Self {
        let client = http_client(&config.user_agent());
        Self {
            downloader: Downloader::with_client(client.clone()),
            resolver: ReleaseResolver::with_client(client),
            renderer: ThemeRenderer::new(config.default_runtime_version()),
            installer: DependencyInstaller::from_config(&config),
            config,
            base_dir: base_dir.to_path_buf(),
            view,
            state: PipelineState::Idle,
            completed: Vec::new(),
        }
    }

    pub fn with_installer(mut self, installer: DependencyInstaller) -> Self {
        self.installer = installer;
        self
    }

    pub fn with_downloader(mut self, downloader: Downloader) -> Self {
        self.downloader = downloader;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Stages that finished successfully during the last run
    pub fn completed_stages(&self) -> &[Stage] {
        &self.completed
    }

    /// Run every planned stage for `params`
    pub async fn run(&mut self, params: &ProjectParameters) -> Result<PipelineReport> {
        self.completed.clear();
        let plan = Stage::plan(params.install_platform());
        debug!(?plan, base_dir = %self.base_dir.display(), "starting install pipeline");

        let mut ctx = PipelineContext {
            config: &self.config,
            params,
            layout: ProjectLayout::for_product(&self.base_dir, params.project_folder_name(), &self.config),
            view: self.view,
            downloader: &self.downloader,
            resolver: &self.resolver,
            renderer: &self.renderer,
            installer: &self.installer,
            release_name: None,
            runtime_version: params
                .runtime_version()
                .unwrap_or(self.config.default_runtime_version())
                .to_string(),
            dependencies_installed: false,
            warnings: Vec::new(),
            next_steps: Vec::new(),
        };

        for stage in plan {
            self.state = stage.state();
            info!(%stage, "running stage");

            if let Err(e) = stages::run(stage, &mut ctx).await {
                self.state = PipelineState::Failed { stage };
                debug!(%stage, error = %e, "stage failed");
                return Err(e);
            }
            self.completed.push(stage);
        }

        self.state = PipelineState::Done;
        Ok(ctx.into_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_without_platform_skips_platform_stages() {
        assert_eq!(
            Stage::plan(false),
            vec![
                Stage::DownloadKit,
                Stage::ExtractKit,
                Stage::Template,
                Stage::InstallDeps,
                Stage::Report
            ]
        );
    }

    #[test]
    fn test_plan_with_platform_runs_everything_in_order() {
        assert_eq!(Stage::plan(true), STAGES.to_vec());
    }

    #[test]
    fn test_stage_states() {
        assert_eq!(Stage::DownloadKit.state(), PipelineState::DownloadingKit);
        assert_eq!(Stage::Report.state(), PipelineState::Reporting);
        assert_eq!(Stage::InstallDeps.to_string(), "install dependencies");
    }
}
