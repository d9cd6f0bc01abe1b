//! Hozokit Core - library behind the `hozokit` theme scaffolder
//!
//! Creates a WordPress theme project from the latest Hozokit release:
//! optionally downloads WordPress, downloads and unpacks the kit, renders the
//! theme's base files from the user's answers and installs its dependencies
//! when the local Node.js matches the version the kit pins.
//!
//! # Architecture
//!
//! - **Building blocks** - [`download`], [`archive`], [`render`], [`runtime`]
//! - **Orchestration** - [`ProductConfig`] and the [`pipeline::InstallPipeline`]
//! - **CLI/TUI Interface** - optional cliclack prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use hozokit_core::{InstallPipeline, ProjectAnswers, ProjectParameters, QuietView};
//!
//! let params = ProjectParameters::new(ProjectAnswers {
//!     project_name: "My Theme".into(),
//!     ..Default::default()
//! });
//! let view = QuietView;
//! let mut pipeline = InstallPipeline::new(MyConfig, &base_dir, &view);
//! let report = pipeline.run(&params).await?;
//! ```

pub mod archive;
pub mod download;
pub mod error;
pub mod logging;
pub mod params;
pub mod pipeline;
pub mod product;
pub mod progress;
pub mod render;
pub mod runtime;
pub mod settings;

#[cfg(feature = "tui")]
pub mod tui;

pub use archive::{ArchiveExtractor, Extraction};
pub use download::{Downloader, ReleaseInfo, ReleaseResolver};
pub use error::{Result, ScaffoldError, Warning};
pub use params::{
    ComponentAnswers, ComponentParameters, ProjectAnswers, ProjectLayout, ProjectParameters,
};
pub use pipeline::{InstallPipeline, PipelineReport, PipelineState, Stage};
pub use product::ProductConfig;
pub use progress::{ProgressReporter, ProgressView, QuietView, Settlement, TaskSet};
pub use render::{ComponentGenerator, ThemeRenderer};
pub use runtime::{check_node, DependencyInstaller, InstallOutcome, RuntimeInfo};
pub use settings::{SettingsStore, YamlSettingsStore};
