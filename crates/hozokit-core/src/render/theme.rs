//! Theme base files rendered from project parameters

use super::{engine, write_rendered, BASE_STYLES_TEMPLATE, ENV_TEMPLATE, README_TEMPLATE};
use crate::error::{Result, ScaffoldError, Warning};
use crate::params::{ProjectLayout, ProjectParameters};
use crate::runtime::normalize_version;
use std::path::{Path, PathBuf};
use tera::Context;
use tokio::fs;
use tracing::{debug, warn};

/// Outcome of rendering the theme files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Runtime version written into the templates
    pub runtime_version: String,
    pub written: Vec<PathBuf>,
    pub warning: Option<Warning>,
}

/// Renames the kit theme folder and renders the customised base files
#[derive(Debug, Clone)]
pub struct ThemeRenderer {
    default_runtime_version: String,
}

impl ThemeRenderer {
    pub fn new(default_runtime_version: impl Into<String>) -> Self {
        Self {
            default_runtime_version: default_runtime_version.into(),
        }
    }

    /// Render theme files into `layout`
    ///
    /// Every file is attempted. If any of them failed, the error lists all
    /// failures; files that were written stay in place.
    pub async fn render(&self, layout: &ProjectLayout, params: &ProjectParameters) -> Result<RenderReport> {
        let mut failures = Vec::new();
        let kit_theme = layout.kit_theme_dir();
        let theme = layout.theme_dir();

        if kit_theme != theme && path_exists(&kit_theme).await {
            if let Err(e) = fs::rename(&kit_theme, &theme).await {
                failures.push(format!(
                    "Could not rename theme folder to match project name ({}): {}",
                    layout.folder_name(),
                    e
                ));
            }
        }

        if !path_exists(&theme).await {
            if !failures.is_empty() {
                return Err(ScaffoldError::Render { failures });
            }
            let warning = Warning::ThemeFolderMissing { path: theme };
            warn!("{}", warning);
            return Ok(RenderReport {
                runtime_version: self.fallback_version(params),
                written: Vec::new(),
                warning: Some(warning),
            });
        }

        let runtime_version = match read_version_marker(&layout.version_marker()).await {
            Ok(Some(version)) => version,
            Ok(None) => self.fallback_version(params),
            Err(e) => {
                failures.push(e.to_string());
                self.fallback_version(params)
            }
        };
        debug!(%runtime_version, "rendering theme files");

        let tera = engine()?;
        let context = theme_context(params, &runtime_version);
        let mut written = Vec::new();

        // Style entry point: drop the kit's default before writing ours
        let base_styles = layout.base_styles();
        let styles_result = async {
            if path_exists(&base_styles).await {
                fs::remove_file(&base_styles)
                    .await
                    .map_err(|e| ScaffoldError::fs("remove", &base_styles, e))?;
            }
            write_rendered(&tera, BASE_STYLES_TEMPLATE, &context, &base_styles).await
        }
        .await;
        record(&mut written, &mut failures, base_styles, styles_result);

        let env_file = layout.env_file();
        let env_result = write_rendered(&tera, ENV_TEMPLATE, &context, &env_file).await;
        record(&mut written, &mut failures, env_file, env_result);

        // Keep the kit's readme under an archival name, then write the project readme
        let readme = layout.readme();
        let readme_result = async {
            archive_readme(layout).await?;
            write_rendered(&tera, README_TEMPLATE, &context, &readme).await
        }
        .await;
        record(&mut written, &mut failures, readme, readme_result);

        if !failures.is_empty() {
            return Err(ScaffoldError::Render { failures });
        }

        Ok(RenderReport {
            runtime_version,
            written,
            warning: None,
        })
    }

    fn fallback_version(&self, params: &ProjectParameters) -> String {
        params
            .runtime_version()
            .unwrap_or(&self.default_runtime_version)
            .to_string()
    }
}

fn record(written: &mut Vec<PathBuf>, failures: &mut Vec<String>, path: PathBuf, result: Result<()>) {
    match result {
        Ok(()) => written.push(path),
        Err(e) => failures.push(format!("Could not create '{}': {}", path.display(), e)),
    }
}

async fn path_exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Read the runtime version marker, without the leading `v`
pub async fn read_version_marker(marker: &Path) -> Result<Option<String>> {
    if !path_exists(marker).await {
        return Ok(None);
    }
    let content = fs::read_to_string(marker)
        .await
        .map_err(|e| ScaffoldError::fs("read", marker, e))?;
    Ok(normalize_version(&content))
}

/// Move the kit readme to its archival name
///
/// The theme's own readme wins over the one at the project root.
async fn archive_readme(layout: &ProjectLayout) -> Result<()> {
    let archived = layout.archived_readme();
    for candidate in [layout.readme(), layout.root_readme()] {
        if path_exists(&candidate).await {
            return fs::rename(&candidate, &archived)
                .await
                .map_err(|e| ScaffoldError::fs("rename theme README", &candidate, e));
        }
    }
    debug!("no kit README to archive");
    Ok(())
}

fn theme_context(params: &ProjectParameters, runtime_version: &str) -> Context {
    let mut context = Context::new();
    context.insert("project_name", params.project_name());
    context.insert("project_folder_name", params.project_folder_name());
    context.insert("webserver_url", &params.webserver_url());
    context.insert("theme_uri", &params.theme_uri());
    context.insert("theme_description", &params.theme_description());
    context.insert("theme_author", &params.theme_author());
    context.insert("theme_author_uri", &params.theme_author_uri());
    context.insert("theme_tags", &params.theme_tags());
    context.insert("runtime_version", runtime_version);
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ProjectAnswers;

    fn params(name: &str) -> ProjectParameters {
        ProjectParameters::new(ProjectAnswers {
            project_name: name.into(),
            install_platform: false,
            webserver_url: Some("http://localhost:3000".into()),
            theme_author: Some("Jane Doe".into()),
            theme_tags: Some("blog, dark".into()),
            ..Default::default()
        })
    }

    fn kit_project(base: &Path) -> ProjectLayout {
        let layout = ProjectLayout::new(base, "my-theme", "hozokit", ".nvmrc");
        let kit = layout.kit_theme_dir();
        std::fs::create_dir_all(kit.join("styles")).unwrap();
        std::fs::write(kit.join("styles/base.scss"), "/* kit default */").unwrap();
        std::fs::write(kit.join(".nvmrc"), "v16.3.0\n").unwrap();
        std::fs::write(layout.root_readme(), "# Hozokit").unwrap();
        layout
    }

    #[tokio::test]
    async fn test_renders_theme_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = kit_project(dir.path());

        let report = ThemeRenderer::new("14.15.1")
            .render(&layout, &params("My Theme"))
            .await
            .unwrap();

        assert!(!layout.kit_theme_dir().exists());
        assert_eq!(report.runtime_version, "16.3.0");
        assert_eq!(report.written.len(), 3);

        let styles = std::fs::read_to_string(layout.base_styles()).unwrap();
        assert!(styles.contains("Theme Name: My Theme"));
        assert!(styles.contains("Author: Jane Doe"));
        assert!(styles.contains("blog, dark"));
        assert!(!styles.contains("kit default"));

        let env = std::fs::read_to_string(layout.env_file()).unwrap();
        assert!(env.contains("PROXY_URL=http://localhost:3000"));

        let readme = std::fs::read_to_string(layout.readme()).unwrap();
        assert!(readme.starts_with("# My Theme"));
        assert!(readme.contains("16.3.0"));
        assert_eq!(
            std::fs::read_to_string(layout.archived_readme()).unwrap(),
            "# Hozokit"
        );
        assert!(!layout.root_readme().exists());
    }

    #[tokio::test]
    async fn test_without_marker_uses_default_version() {
        let dir = tempfile::tempdir().unwrap();
        let layout = kit_project(dir.path());
        std::fs::remove_file(layout.kit_theme_dir().join(".nvmrc")).unwrap();

        let report = ThemeRenderer::new("14.15.1")
            .render(&layout, &params("My Theme"))
            .await
            .unwrap();

        assert_eq!(report.runtime_version, "14.15.1");
    }

    #[tokio::test]
    async fn test_missing_theme_folder_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path(), "my-theme", "hozokit", ".nvmrc");

        let report = ThemeRenderer::new("14.15.1")
            .render(&layout, &params("My Theme"))
            .await
            .unwrap();

        assert!(report.written.is_empty());
        assert!(matches!(report.warning, Some(Warning::ThemeFolderMissing { .. })));
        assert!(!layout.readme().exists());
    }

    #[tokio::test]
    async fn test_failed_file_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let layout = kit_project(dir.path());
        // A file where the styles directory should be makes base.scss unwritable
        std::fs::remove_dir_all(layout.kit_theme_dir().join("styles")).unwrap();
        std::fs::write(layout.kit_theme_dir().join("styles"), "not a directory").unwrap();

        let result = ThemeRenderer::new("14.15.1")
            .render(&layout, &params("My Theme"))
            .await;

        match result {
            Err(ScaffoldError::Render { failures }) => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].contains("base.scss"));
            }
            other => panic!("expected render failure, got {:?}", other),
        }
        assert!(layout.env_file().exists());
        assert!(layout.readme().exists());
    }

    #[tokio::test]
    async fn test_project_named_like_kit_keeps_folder() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path(), "hozokit", "hozokit", ".nvmrc");
        std::fs::create_dir_all(layout.theme_dir()).unwrap();

        ThemeRenderer::new("14.15.1")
            .render(&layout, &params("Hozokit"))
            .await
            .unwrap();

        assert!(layout.readme().exists());
    }
}
