//! Charm-style CLI prompts using cliclack

use super::view::SpinnerView;
use crate::params::{
    dashify, ComponentAnswers, ComponentParameters, ProjectAnswers, ProjectLayout,
    ProjectParameters, DEFAULT_COMPONENT_NAME, DEFAULT_PROJECT_NAME, DEFAULT_THEME_URI,
};
use crate::pipeline::{InstallPipeline, PipelineReport};
use crate::product::ProductConfig;
use crate::render::ComponentGenerator;
use crate::settings::{
    self, ComponentSettings, ProjectSettings, SettingsStore, COMPONENT_SETTINGS_KEY,
    PROJECT_SETTINGS_KEY,
};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// CLI arguments for the project generator
#[derive(Debug, Clone, Default)]
pub struct ProjectArgs {
    pub name: Option<String>,
    /// Skip the platform download
    pub no_platform: bool,
    pub webserver_url: Option<String>,
    pub theme_uri: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub author_uri: Option<String>,
    pub tags: Option<String>,
    pub runtime_version: Option<String>,

    /// Directory the project folder is created in
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// CLI arguments for the component generator
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prefix: Option<String>,
    /// Theme folder name, dashed
    pub theme: Option<String>,

    /// Directory holding the project folder
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Ask for project settings, then run the install pipeline
pub async fn run_project<C: ProductConfig>(
    config: &C,
    args: ProjectArgs,
    store: &mut dyn SettingsStore,
) -> Result<()> {
    cliclack::intro(format!("{} Generator", config.display_name()))?;
    cliclack::log::info(format!(
        "All fields are optional. If the installation fails please refer to the setup guide:\n{}",
        config.docs_url()
    ))?;

    let base_dir = resolve_base_dir(args.directory.as_deref())?;
    let stored: ProjectSettings = load_or_default(store, PROJECT_SETTINGS_KEY)?;

    let params = ask_project(config, &args, &stored)?;
    if let Err(e) = settings::save(store, PROJECT_SETTINGS_KEY, &ProjectSettings::from(&params)) {
        cliclack::log::warning(format!("Could not remember settings: {}", e))?;
    }

    let layout = ProjectLayout::for_product(&base_dir, params.project_folder_name(), config);
    confirm_existing(layout.root(), args.yes)?;

    let view = SpinnerView::new();
    let mut pipeline = InstallPipeline::new(config.clone(), &base_dir, &view);

    match pipeline.run(&params).await {
        Ok(report) => print_report(&report),
        Err(e) => {
            let error = anyhow::Error::new(e);
            cliclack::log::error(format!("{} {:#}", "Error:".red().bold(), error))?;
            cliclack::outro_cancel(format!(
                "Setup did not finish. Manual install steps: {}",
                config.docs_url()
            ))?;
            Ok(())
        }
    }
}

/// Ask for component settings and write the component files
pub async fn run_component<C: ProductConfig>(
    config: &C,
    args: ComponentArgs,
    store: &mut dyn SettingsStore,
) -> Result<()> {
    cliclack::intro(format!("The {} component generator", config.display_name()))?;

    let base_dir = resolve_base_dir(args.directory.as_deref())?;
    let stored: ComponentSettings = load_or_default(store, COMPONENT_SETTINGS_KEY)?;
    let project: ProjectSettings = load_or_default(store, PROJECT_SETTINGS_KEY)?;

    let params = ask_component(&args, &stored, &project)?;
    if let Err(e) = settings::save(store, COMPONENT_SETTINGS_KEY, &ComponentSettings::from(&params)) {
        cliclack::log::warning(format!("Could not remember settings: {}", e))?;
    }

    match ComponentGenerator::new(config.clone())
        .generate(&base_dir, &params)
        .await
    {
        Ok(report) => {
            for file in &report.files {
                cliclack::log::success(format!("Created {}", file.display()))?;
            }
            cliclack::outro(format!("Component {} is ready", params.component_name()))?;
        }
        Err(e) => {
            let error = anyhow::Error::new(e);
            cliclack::log::error(format!("{} {:#}", "Error:".red().bold(), error))?;
            cliclack::outro_cancel(
                "Please run the generator in the folder containing your project",
            )?;
        }
    }

    Ok(())
}

/// Print a failed command's error and let the process end normally
pub fn report_failure(result: Result<()>) -> Result<()> {
    if let Err(error) = result {
        tracing::error!(error = %error, "command failed");
        cliclack::log::error(format!("{} {:#}", "Error:".red().bold(), error))?;
    }
    Ok(())
}

/// Open the setup guide in the default browser
pub fn open_docs<C: ProductConfig>(config: &C) -> Result<()> {
    let url = config.docs_url();
    cliclack::log::info(format!("Opening {}", url))?;
    open::that(url).with_context(|| format!("Failed to open {}", url))?;
    Ok(())
}

fn ask_project<C: ProductConfig>(
    config: &C,
    args: &ProjectArgs,
    stored: &ProjectSettings,
) -> Result<ProjectParameters> {
    let yes = args.yes;

    let project_name = ask_text(
        "What is your project name? (e.g My Hozokit Project)",
        args.name.clone(),
        stored.project_name.clone().or_else(|| Some(DEFAULT_PROJECT_NAME.to_string())),
        yes,
    )?
    .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());

    let install_platform = if args.no_platform {
        false
    } else {
        let default = stored.install_platform.unwrap_or(true);
        if yes {
            default
        } else {
            cliclack::confirm(format!(
                "Would you like {} to be installed?",
                config.platform_display_name()
            ))
            .initial_value(default)
            .interact()?
        }
    };

    let webserver_url = ask_text(
        "What's the address of the webserver for this install? e.g http://localhost:3000 (used for hot reloading)",
        args.webserver_url.clone(),
        stored.webserver_url.clone(),
        yes,
    )?;
    let theme_uri = ask_text(
        "Theme URI (a repository, a demo or showcase page)",
        args.theme_uri.clone(),
        stored.theme_uri.clone().or_else(|| Some(DEFAULT_THEME_URI.to_string())),
        yes,
    )?;
    let theme_description = ask_text(
        "Theme description",
        args.description.clone(),
        stored.theme_description.clone(),
        yes,
    )?;
    let theme_author = ask_text(
        "Theme author (name or company)",
        args.author.clone(),
        stored.theme_author.clone(),
        yes,
    )?;
    let theme_author_uri = ask_text(
        "Theme author URI",
        args.author_uri.clone(),
        stored.theme_author_uri.clone(),
        yes,
    )?;
    let theme_tags = ask_text(
        "Any additional tags? (separated by a comma, useful when publishing to wordpress.org)",
        args.tags.clone(),
        stored.theme_tags.clone(),
        yes,
    )?;

    Ok(ProjectParameters::new(ProjectAnswers {
        project_name,
        install_platform,
        webserver_url,
        theme_uri,
        theme_description,
        theme_author,
        theme_author_uri,
        theme_tags,
        runtime_version: args.runtime_version.clone().or_else(|| stored.runtime_version.clone()),
    }))
}

fn ask_component(
    args: &ComponentArgs,
    stored: &ComponentSettings,
    project: &ProjectSettings,
) -> Result<ComponentParameters> {
    let yes = args.yes;

    let component_name = ask_text(
        "Component name (e.g Hero Section)",
        args.name.clone(),
        stored.component_name.clone().or_else(|| Some(DEFAULT_COMPONENT_NAME.to_string())),
        yes,
    )?
    .unwrap_or_else(|| DEFAULT_COMPONENT_NAME.to_string());

    let component_description = ask_text(
        "Description",
        args.description.clone(),
        stored.component_description.clone(),
        yes,
    )?;
    let class_prefix = ask_text(
        "Selector class prefix (e.g hoz), remembered for next time",
        args.prefix.clone(),
        stored.class_prefix.clone(),
        yes,
    )?;
    let project_folder_name = ask_text(
        "What is the name of your theme folder? Located in wp-content/themes (e.g hozokit-wordpress-project)",
        args.theme.clone(),
        project.project_name.as_deref().map(dashify),
        yes,
    )?
    .context("A theme folder name is required")?;

    Ok(ComponentParameters::new(ComponentAnswers {
        component_name,
        component_description,
        class_prefix,
        project_folder_name,
    }))
}

/// Resolve a text answer from a flag, a prompt, or the stored default
///
/// Returns `None` for an empty answer.
fn ask_text(
    prompt: &str,
    flag: Option<String>,
    default: Option<String>,
    yes: bool,
) -> Result<Option<String>> {
    let value = match flag {
        Some(value) => value,
        None if yes => default.unwrap_or_default(),
        None => {
            let default = default.unwrap_or_default();
            let mut input = cliclack::input(prompt).required(false);
            if !default.is_empty() {
                input = input.placeholder(&default).default_input(&default);
            }
            input.interact::<String>()?
        }
    };

    let value = value.trim();
    Ok(if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    })
}

fn load_or_default<T: DeserializeOwned + Default>(store: &dyn SettingsStore, key: &str) -> Result<T> {
    match settings::load(store, key) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(e) => {
            cliclack::log::warning(format!("Ignoring remembered settings: {}", e))?;
            Ok(T::default())
        }
    }
}

fn resolve_base_dir(directory: Option<&Path>) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to read current directory")?;

    let path = match directory {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current_dir.join(dir),
        None => return Ok(current_dir),
    };

    if !path.is_dir() {
        anyhow::bail!("Directory does not exist: {}", path.display());
    }
    cliclack::log::info(format!("Using directory: {}", path.display()))?;
    Ok(path)
}

fn confirm_existing(root: &Path, yes: bool) -> Result<()> {
    if !root.is_dir() {
        return Ok(());
    }

    let count = std::fs::read_dir(root)
        .with_context(|| format!("Failed to read {}", root.display()))?
        .count();
    if count == 0 {
        return Ok(());
    }

    cliclack::log::warning(format!(
        "{} already has {} existing items, files may be overwritten",
        root.display(),
        count
    ))?;

    let confirm = if yes {
        true
    } else {
        cliclack::confirm("Continue anyway?")
            .initial_value(false)
            .interact()?
    };

    if !confirm {
        anyhow::bail!("Setup cancelled.");
    }
    Ok(())
}

fn print_report(report: &PipelineReport) -> Result<()> {
    if let Some(release) = &report.release_name {
        cliclack::log::success(format!("Installed release {}", release))?;
    }
    for warning in &report.warnings {
        cliclack::log::warning(warning.to_string())?;
    }

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in report.next_steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_is_reported_not_returned() {
        let result = report_failure(Err(anyhow::anyhow!("Setup cancelled.")));
        assert!(result.is_ok());
        assert!(report_failure(Ok(())).is_ok());
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let missing = std::env::temp_dir().join("hozokit-no-such-directory");
        let error = resolve_base_dir(Some(missing.as_path())).unwrap_err();
        assert!(error.to_string().contains("Directory does not exist"));
    }
}
