//! Project and component parameters collected from prompts
//!
//! Parameters are built once from the user's answers. Derived values (folder
//! name, tag list, component class) are computed at construction and never
//! recomputed afterwards.

use crate::product::ProductConfig;
use std::path::{Path, PathBuf};

/// Default project name when neither an answer nor a stored setting exists
pub const DEFAULT_PROJECT_NAME: &str = "Hozokit";

/// Default theme URI
pub const DEFAULT_THEME_URI: &str = "https://github.com/csalmeida/hozokit";

/// Default component name
pub const DEFAULT_COMPONENT_NAME: &str = "New Component";

/// Lowercase a value and replace every space with a dash
///
/// `"Hozokit Generator Project"` becomes `"hozokit-generator-project"`.
pub fn dashify(value: &str) -> String {
    value.to_lowercase().replace(' ', "-")
}

/// Lowercase a value and replace every space with an underscore
pub fn snakify(value: &str) -> String {
    value.to_lowercase().replace(' ', "_")
}

/// Normalise a comma separated tag list, returning `None` when empty
pub fn format_tags(raw: &str) -> Option<String> {
    let tags: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(", "))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Raw answers for the project generator
#[derive(Debug, Clone, Default)]
pub struct ProjectAnswers {
    pub project_name: String,
    pub install_platform: bool,
    pub webserver_url: Option<String>,
    pub theme_uri: Option<String>,
    pub theme_description: Option<String>,
    pub theme_author: Option<String>,
    pub theme_author_uri: Option<String>,
    pub theme_tags: Option<String>,
    pub runtime_version: Option<String>,
}

/// Immutable parameters for one project generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectParameters {
    project_name: String,
    project_folder_name: String,
    install_platform: bool,
    webserver_url: Option<String>,
    theme_uri: Option<String>,
    theme_description: Option<String>,
    theme_author: Option<String>,
    theme_author_uri: Option<String>,
    theme_tags: Option<String>,
    runtime_version: Option<String>,
}

impl ProjectParameters {
    pub fn new(answers: ProjectAnswers) -> Self {
        let project_name = match answers.project_name.trim() {
            "" => DEFAULT_PROJECT_NAME.to_string(),
            name => name.to_string(),
        };
        let project_folder_name = dashify(&project_name);

        Self {
            project_name,
            project_folder_name,
            install_platform: answers.install_platform,
            webserver_url: non_empty(answers.webserver_url),
            theme_uri: non_empty(answers.theme_uri),
            theme_description: non_empty(answers.theme_description),
            theme_author: non_empty(answers.theme_author),
            theme_author_uri: non_empty(answers.theme_author_uri),
            theme_tags: answers.theme_tags.as_deref().and_then(format_tags),
            runtime_version: non_empty(answers.runtime_version),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_folder_name(&self) -> &str {
        &self.project_folder_name
    }

    pub fn install_platform(&self) -> bool {
        self.install_platform
    }

    pub fn webserver_url(&self) -> Option<&str> {
        self.webserver_url.as_deref()
    }

    pub fn theme_uri(&self) -> Option<&str> {
        self.theme_uri.as_deref()
    }

    pub fn theme_description(&self) -> Option<&str> {
        self.theme_description.as_deref()
    }

    pub fn theme_author(&self) -> Option<&str> {
        self.theme_author.as_deref()
    }

    pub fn theme_author_uri(&self) -> Option<&str> {
        self.theme_author_uri.as_deref()
    }

    pub fn theme_tags(&self) -> Option<&str> {
        self.theme_tags.as_deref()
    }

    pub fn runtime_version(&self) -> Option<&str> {
        self.runtime_version.as_deref()
    }

    /// Answers equivalent to these parameters, used to persist defaults
    pub fn to_answers(&self) -> ProjectAnswers {
        ProjectAnswers {
            project_name: self.project_name.clone(),
            install_platform: self.install_platform,
            webserver_url: self.webserver_url.clone(),
            theme_uri: self.theme_uri.clone(),
            theme_description: self.theme_description.clone(),
            theme_author: self.theme_author.clone(),
            theme_author_uri: self.theme_author_uri.clone(),
            theme_tags: self.theme_tags.clone(),
            runtime_version: self.runtime_version.clone(),
        }
    }
}

/// Raw answers for the component generator
#[derive(Debug, Clone, Default)]
pub struct ComponentAnswers {
    pub component_name: String,
    pub component_description: Option<String>,
    pub class_prefix: Option<String>,
    pub project_folder_name: String,
}

/// Immutable parameters for one component generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentParameters {
    component_name: String,
    component_description: Option<String>,
    class_prefix: Option<String>,
    project_folder_name: String,
    component_folder: String,
    component_class: String,
}

impl ComponentParameters {
    pub fn new(answers: ComponentAnswers) -> Self {
        let component_name = match answers.component_name.trim() {
            "" => DEFAULT_COMPONENT_NAME.to_string(),
            name => name.to_string(),
        };
        let class_prefix = non_empty(answers.class_prefix).map(|p| snakify(&p));
        let component_folder = snakify(&component_name);
        let component_class = match &class_prefix {
            Some(prefix) => format!("{}-{}", prefix, dashify(&component_name)),
            None => dashify(&component_name),
        };

        Self {
            component_name,
            component_description: non_empty(answers.component_description),
            class_prefix,
            project_folder_name: dashify(answers.project_folder_name.trim()),
            component_folder,
            component_class,
        }
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn component_description(&self) -> Option<&str> {
        self.component_description.as_deref()
    }

    pub fn class_prefix(&self) -> Option<&str> {
        self.class_prefix.as_deref()
    }

    pub fn project_folder_name(&self) -> &str {
        &self.project_folder_name
    }

    /// Folder the component files are written to (snake case)
    pub fn component_folder(&self) -> &str {
        &self.component_folder
    }

    /// CSS class of the component root element
    pub fn component_class(&self) -> &str {
        &self.component_class
    }
}

/// On-disk layout of a generated project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    folder_name: String,
    kit_theme_folder: String,
    version_marker: String,
}

impl ProjectLayout {
    /// Layout for `folder_name` inside `base_dir`
    pub fn new(base_dir: &Path, folder_name: &str, kit_theme_folder: &str, version_marker: &str) -> Self {
        Self {
            root: base_dir.join(folder_name),
            folder_name: folder_name.to_string(),
            kit_theme_folder: kit_theme_folder.to_string(),
            version_marker: version_marker.to_string(),
        }
    }

    /// Layout using the kit folder and version marker of `config`
    pub fn for_product<C: ProductConfig>(base_dir: &Path, folder_name: &str, config: &C) -> Self {
        Self::new(
            base_dir,
            folder_name,
            config.kit_theme_folder(),
            config.version_marker(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.root.join("wp-content").join("themes")
    }

    /// Theme folder as shipped by the kit, before renaming
    pub fn kit_theme_dir(&self) -> PathBuf {
        self.themes_dir().join(&self.kit_theme_folder)
    }

    /// Theme folder named after the project
    pub fn theme_dir(&self) -> PathBuf {
        self.themes_dir().join(&self.folder_name)
    }

    pub fn version_marker(&self) -> PathBuf {
        self.theme_dir().join(&self.version_marker)
    }

    pub fn base_styles(&self) -> PathBuf {
        self.theme_dir().join("styles").join("base.scss")
    }

    pub fn env_file(&self) -> PathBuf {
        self.theme_dir().join(".env")
    }

    pub fn readme(&self) -> PathBuf {
        self.theme_dir().join("README.md")
    }

    pub fn archived_readme(&self) -> PathBuf {
        self.theme_dir().join("HOZOKIT-README.md")
    }

    /// README shipped at the kit root, archived when the theme has none
    pub fn root_readme(&self) -> PathBuf {
        self.root.join("README.md")
    }

    pub fn components_dir(&self) -> PathBuf {
        self.theme_dir().join("templates").join("components")
    }
}
