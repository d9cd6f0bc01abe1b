//! Persisted answers used as prompt defaults on the next run
//!
//! Settings live in a small key-value store. The CLI injects a
//! [`YamlSettingsStore`] backed by `.hozokit.yaml` in the working directory;
//! tests use [`MemorySettingsStore`].

use crate::error::{Result, ScaffoldError};
use crate::params::{ComponentParameters, ProjectParameters};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File name of the settings store in the working directory
pub const SETTINGS_FILE: &str = ".hozokit.yaml";

pub const PROJECT_SETTINGS_KEY: &str = "project_settings";
pub const COMPONENT_SETTINGS_KEY: &str = "component_settings";

/// Key-value store for remembered answers
pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Load a typed value, `None` if the key was never written
pub fn load<T: DeserializeOwned>(store: &dyn SettingsStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(value) => serde_yaml::from_value(value)
            .map(Some)
            .map_err(|e| ScaffoldError::Settings(format!("invalid '{}' entry: {}", key, e))),
        None => Ok(None),
    }
}

/// Store a typed value under `key`
pub fn save<T: Serialize>(store: &mut dyn SettingsStore, key: &str, value: &T) -> Result<()> {
    let value = serde_yaml::to_value(value)
        .map_err(|e| ScaffoldError::Settings(format!("could not serialize '{}': {}", key, e)))?;
    store.set(key, value)
}

/// Remembered project generator answers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_platform: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webserver_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_author_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
}

impl From<&ProjectParameters> for ProjectSettings {
    fn from(params: &ProjectParameters) -> Self {
        Self {
            project_name: Some(params.project_name().to_string()),
            install_platform: Some(params.install_platform()),
            webserver_url: params.webserver_url().map(str::to_string),
            theme_uri: params.theme_uri().map(str::to_string),
            theme_description: params.theme_description().map(str::to_string),
            theme_author: params.theme_author().map(str::to_string),
            theme_author_uri: params.theme_author_uri().map(str::to_string),
            theme_tags: params.theme_tags().map(str::to_string),
            runtime_version: params.runtime_version().map(str::to_string),
        }
    }
}

/// Remembered component generator answers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_prefix: Option<String>,
}

impl From<&ComponentParameters> for ComponentSettings {
    fn from(params: &ComponentParameters) -> Self {
        Self {
            component_name: Some(params.component_name().to_string()),
            component_description: params.component_description().map(str::to_string),
            class_prefix: params.class_prefix().map(str::to_string),
        }
    }
}

/// Settings store persisted as a YAML mapping on disk
#[derive(Debug, Clone)]
pub struct YamlSettingsStore {
    path: PathBuf,
}

impl YamlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `.hozokit.yaml` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_mapping(&self) -> Result<Mapping> {
        if !self.path.exists() {
            return Ok(Mapping::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ScaffoldError::fs("read", &self.path, e))?;
        if content.trim().is_empty() {
            return Ok(Mapping::new());
        }
        serde_yaml::from_str(&content).map_err(|e| {
            ScaffoldError::Settings(format!("could not parse {}: {}", self.path.display(), e))
        })
    }
}

impl SettingsStore for YamlSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let mapping = self.read_mapping()?;
        Ok(mapping.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut mapping = self.read_mapping()?;
        mapping.insert(Value::String(key.to_string()), value);
        let content = serde_yaml::to_string(&mapping)
            .map_err(|e| ScaffoldError::Settings(format!("could not serialize settings: {}", e)))?;
        std::fs::write(&self.path, content).map_err(|e| ScaffoldError::fs("write", &self.path, e))?;
        tracing::debug!(path = %self.path.display(), key, "saved settings");
        Ok(())
    }
}

/// In-memory settings store
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, Value>,
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ProjectAnswers;

    fn sample_params() -> ProjectParameters {
        ProjectParameters::new(ProjectAnswers {
            project_name: "My Theme".into(),
            install_platform: false,
            theme_author: Some("Jane".into()),
            theme_tags: Some("blog,dark".into()),
            ..Default::default()
        })
    }

    #[test]
    fn test_missing_key_loads_none() {
        let store = MemorySettingsStore::default();
        let settings: Option<ProjectSettings> = load(&store, PROJECT_SETTINGS_KEY).unwrap();
        assert!(settings.is_none());
    }

    #[test]
    fn test_memory_store_keeps_project_settings() {
        let mut store = MemorySettingsStore::default();
        let settings = ProjectSettings::from(&sample_params());
        save(&mut store, PROJECT_SETTINGS_KEY, &settings).unwrap();

        let loaded: ProjectSettings = load(&store, PROJECT_SETTINGS_KEY).unwrap().unwrap();
        assert_eq!(loaded.project_name.as_deref(), Some("My Theme"));
        assert_eq!(loaded.install_platform, Some(false));
        assert_eq!(loaded.theme_tags.as_deref(), Some("blog, dark"));
    }

    #[test]
    fn test_yaml_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = YamlSettingsStore::in_dir(dir.path());
        save(&mut store, PROJECT_SETTINGS_KEY, &ProjectSettings::from(&sample_params())).unwrap();
        save(
            &mut store,
            COMPONENT_SETTINGS_KEY,
            &ComponentSettings {
                component_name: Some("Hero".into()),
                component_description: None,
                class_prefix: Some("hoz".into()),
            },
        )
        .unwrap();

        let reopened = YamlSettingsStore::in_dir(dir.path());
        let project: ProjectSettings = load(&reopened, PROJECT_SETTINGS_KEY).unwrap().unwrap();
        let component: ComponentSettings = load(&reopened, COMPONENT_SETTINGS_KEY).unwrap().unwrap();

        assert_eq!(project.theme_author.as_deref(), Some("Jane"));
        assert_eq!(component.class_prefix.as_deref(), Some("hoz"));
    }

    #[test]
    fn test_yaml_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "- not\n- a mapping\n").unwrap();

        let store = YamlSettingsStore::in_dir(dir.path());
        assert!(matches!(
            store.get(PROJECT_SETTINGS_KEY),
            Err(ScaffoldError::Settings(_))
        ));
    }
}
