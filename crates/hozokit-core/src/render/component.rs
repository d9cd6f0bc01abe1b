//! Component generator: one markup template and one stylesheet

use super::{engine, write_rendered, COMPONENT_MARKUP_TEMPLATE, COMPONENT_STYLE_TEMPLATE};
use crate::error::{Result, ScaffoldError};
use crate::params::{ComponentParameters, ProjectLayout};
use crate::product::ProductConfig;
use std::path::{Path, PathBuf};
use tera::Context;
use tokio::fs;
use tracing::debug;

/// Files written by the component generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentReport {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Creates `templates/components/<name>/{index.twig,style.scss}` in a theme
#[derive(Debug, Clone)]
pub struct ComponentGenerator<C: ProductConfig> {
    config: C,
}

impl<C: ProductConfig> ComponentGenerator<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    /// Generate the component inside the project found under `base_dir`
    pub async fn generate(&self, base_dir: &Path, params: &ComponentParameters) -> Result<ComponentReport> {
        let layout = ProjectLayout::for_product(base_dir, params.project_folder_name(), &self.config);
        let theme = layout.theme_dir();

        if !fs::try_exists(&theme).await.unwrap_or(false) {
            return Err(ScaffoldError::ProjectNotFound { path: theme });
        }

        let directory = layout.components_dir().join(params.component_folder());
        fs::create_dir_all(&directory)
            .await
            .map_err(|e| ScaffoldError::fs("create directory", &directory, e))?;
        debug!(directory = %directory.display(), "generating component");

        let tera = engine()?;
        let context = component_context(params);
        let mut files = Vec::new();
        let mut failures = Vec::new();

        for (template, file_name) in [
            (COMPONENT_MARKUP_TEMPLATE, "index.twig"),
            (COMPONENT_STYLE_TEMPLATE, "style.scss"),
        ] {
            let path = directory.join(file_name);
            match write_rendered(&tera, template, &context, &path).await {
                Ok(()) => files.push(path),
                Err(e) => failures.push(format!("Could not create '{}': {}", path.display(), e)),
            }
        }

        if !failures.is_empty() {
            return Err(ScaffoldError::Render { failures });
        }

        Ok(ComponentReport { directory, files })
    }
}

fn component_context(params: &ComponentParameters) -> Context {
    let mut context = Context::new();
    context.insert("component_name", params.component_name());
    context.insert("component_description", &params.component_description());
    context.insert("component_class", params.component_class());
    context.insert("class_prefix", &params.class_prefix());
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ComponentAnswers;
    use crate::test_support::TestConfig;

    fn hero() -> ComponentParameters {
        ComponentParameters::new(ComponentAnswers {
            component_name: "Hero Section".into(),
            component_description: Some("Large banner at the top of a page".into()),
            class_prefix: Some("hoz".into()),
            project_folder_name: "my-theme".into(),
        })
    }

    #[tokio::test]
    async fn test_generates_markup_and_styles() {
        let dir = tempfile::tempdir().unwrap();
        let theme = dir.path().join("my-theme/wp-content/themes/my-theme");
        std::fs::create_dir_all(&theme).unwrap();

        let report = ComponentGenerator::new(TestConfig::default())
            .generate(dir.path(), &hero())
            .await
            .unwrap();

        assert_eq!(report.directory, theme.join("templates/components/hero_section"));
        assert_eq!(report.files.len(), 2);

        let markup = std::fs::read_to_string(report.directory.join("index.twig")).unwrap();
        assert!(markup.contains("Hero Section"));
        assert!(markup.contains("Large banner"));
        assert!(markup.contains("class=\"hoz-hero-section\""));

        let styles = std::fs::read_to_string(report.directory.join("style.scss")).unwrap();
        assert!(styles.contains(".hoz-hero-section {"));
    }

    #[tokio::test]
    async fn test_missing_project_is_reported() {
        let dir = tempfile::tempdir().unwrap();

        let result = ComponentGenerator::new(TestConfig::default())
            .generate(dir.path(), &hero())
            .await;

        assert!(matches!(result, Err(ScaffoldError::ProjectNotFound { .. })));
        assert!(!dir.path().join("my-theme").exists());
    }
}
