//! Hozokit CLI - WordPress theme scaffolding with the Hozokit starter kit

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use hozokit_core::settings::YamlSettingsStore;
use hozokit_core::tui::{ComponentArgs, ProjectArgs};
use hozokit_core::ProductConfig;
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

const PLATFORM_URL: &str = "https://wordpress.org/latest.zip";
const PLATFORM_URL_ENV: &str = "HOZOKIT_PLATFORM_URL";
const RELEASE_URL: &str = "https://api.github.com/repos/csalmeida/hozokit/releases/latest";
const RELEASE_URL_ENV: &str = "HOZOKIT_RELEASE_URL";

/// Hozokit product configuration
#[derive(Clone)]
pub struct HozokitConfig;

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ProductConfig for HozokitConfig {
    fn name(&self) -> &'static str {
        "hozokit"
    }

    fn display_name(&self) -> &'static str {
        "Hozokit"
    }

    fn platform_display_name(&self) -> &'static str {
        "WordPress"
    }

    fn platform_download_url(&self) -> String {
        env_or(PLATFORM_URL_ENV, PLATFORM_URL)
    }

    fn platform_archive_name(&self) -> &'static str {
        "wordpress.zip"
    }

    fn release_api_url(&self) -> String {
        env_or(RELEASE_URL_ENV, RELEASE_URL)
    }

    fn kit_archive_name(&self) -> &'static str {
        "hozokit-main.zip"
    }

    fn kit_theme_folder(&self) -> &'static str {
        "hozokit"
    }

    fn default_runtime_version(&self) -> &'static str {
        "14.15.1"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/csalmeida/hozokit"
    }

    fn next_steps(
        &self,
        folder_name: &str,
        dependencies_installed: bool,
        runtime_version: &str,
    ) -> Vec<String> {
        let theme_dir = format!("{0}/wp-content/themes/{0}", folder_name);
        let mut steps = vec![
            "Setup a webserver capable of running PHP and create a MySQL database for WordPress.\n      \
             See https://wordpress.org/support/article/how-to-install-wordpress/ to learn more."
                .to_string(),
        ];

        if dependencies_installed {
            steps.push(format!(
                "Change directory to {}\n      To start development run {}",
                theme_dir,
                "npm start".cyan()
            ));
        } else {
            steps.push(format!(
                "Install Hozokit Node dependencies for your theme:\n      \
                 change directory to {}, check you are using Node version {} by running {}, then run {}",
                theme_dir,
                runtime_version,
                "node --version".cyan(),
                "npm install".cyan()
            ));
            steps.push(format!("To start development run {}", "npm start".cyan()));
        }

        steps.push(format!(
            "Create Twig components instantly: run {} from this folder",
            "hozokit component".cyan()
        ));
        steps.push(format!("Setup guide and documentation: {}", self.docs_url()));
        steps
    }

    fn user_agent(&self) -> String {
        format!("Hozokit Generator v{}", CLI_VERSION)
    }
}

#[derive(Parser, Debug)]
#[command(name = "hozokit")]
#[command(about = "CLI for scaffolding Hozokit WordPress themes")]
#[command(version)]
pub struct Args {
    /// Print diagnostic logs to stderr (filter with HOZOKIT_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new theme project
    New(CliProjectArgs),
    /// Create a Twig component in an existing theme
    Component(CliComponentArgs),
    /// Open the setup guide in the browser
    Docs,
}

#[derive(ClapArgs, Debug, Default)]
pub struct CliProjectArgs {
    /// Project name (the folder name is derived from it)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Do not download WordPress
    #[arg(long = "no-platform")]
    pub no_platform: bool,

    /// Webserver address used for hot reloading (e.g. http://localhost:3000)
    #[arg(long = "webserver-url")]
    pub webserver_url: Option<String>,

    /// Theme URI
    #[arg(long = "theme-uri")]
    pub theme_uri: Option<String>,

    /// Theme description
    #[arg(long)]
    pub description: Option<String>,

    /// Theme author
    #[arg(long)]
    pub author: Option<String>,

    /// Theme author URI
    #[arg(long = "author-uri")]
    pub author_uri: Option<String>,

    /// Additional theme tags (comma-separated)
    #[arg(long)]
    pub tags: Option<String>,

    /// Node.js version to assume when the kit does not pin one
    #[arg(long = "runtime-version")]
    pub runtime_version: Option<String>,

    /// Directory to create the project in
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliProjectArgs> for ProjectArgs {
    fn from(args: CliProjectArgs) -> Self {
        ProjectArgs {
            name: args.name,
            no_platform: args.no_platform,
            webserver_url: args.webserver_url,
            theme_uri: args.theme_uri,
            description: args.description,
            author: args.author,
            author_uri: args.author_uri,
            tags: args.tags,
            runtime_version: args.runtime_version,
            directory: args.directory,
            yes: args.yes,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct CliComponentArgs {
    /// Component name (e.g. "Hero Section")
    #[arg(short, long)]
    pub name: Option<String>,

    /// Component description
    #[arg(long)]
    pub description: Option<String>,

    /// CSS class prefix (e.g. hoz)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Theme folder name inside wp-content/themes
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Directory containing the project folder
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliComponentArgs> for ComponentArgs {
    fn from(args: CliComponentArgs) -> Self {
        ComponentArgs {
            name: args.name,
            description: args.description,
            prefix: args.prefix,
            theme: args.theme,
            directory: args.directory,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    hozokit_core::logging::init(args.verbose);

    let config = HozokitConfig;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let mut store = YamlSettingsStore::in_dir(&cwd);

    let result = match args.command {
        Some(Command::New(project_args)) => {
            hozokit_core::tui::run_project(&config, project_args.into(), &mut store).await
        }
        Some(Command::Component(component_args)) => {
            hozokit_core::tui::run_component(&config, component_args.into(), &mut store).await
        }
        Some(Command::Docs) => hozokit_core::tui::open_docs(&config),
        None => {
            // No subcommand provided, default to the project generator (interactive mode)
            let project_args = CliProjectArgs::default();
            hozokit_core::tui::run_project(&config, project_args.into(), &mut store).await
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    hozokit_core::tui::report_failure(result)
}
