//! Product configuration trait for CLI binaries
//!
//! This trait defines everything the scaffolder needs to know about the
//! starter kit it installs: where the platform and kit archives come from,
//! how the kit lays out its theme folder, and what to tell the user afterwards.

/// Configuration trait for a starter-kit product
///
/// The binary implements this trait to define:
/// - Product identity (name, display name)
/// - Platform and release endpoints
/// - Archive and folder names produced by the kit
/// - Dependency install command
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for settings keys, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Display name of the optional platform (e.g. "WordPress")
    fn platform_display_name(&self) -> &'static str;

    /// URL of the platform archive
    fn platform_download_url(&self) -> String;

    /// File name the platform archive is saved under inside the project root
    fn platform_archive_name(&self) -> &'static str {
        "platform.zip"
    }

    /// Release metadata endpoint returning `{ name, zipball_url }`
    fn release_api_url(&self) -> String;

    /// File name the kit archive is saved under inside the project root
    fn kit_archive_name(&self) -> &'static str;

    /// Name of the theme folder as shipped inside the kit
    fn kit_theme_folder(&self) -> &'static str;

    /// File in the theme folder holding the expected runtime version
    fn version_marker(&self) -> &'static str {
        ".nvmrc"
    }

    /// Runtime version assumed when the kit carries no marker
    fn default_runtime_version(&self) -> &'static str;

    /// Package manager invocation used to install theme dependencies
    fn install_command(&self) -> (&'static str, &'static [&'static str]) {
        ("npm", &["install"])
    }

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(
        &self,
        folder_name: &str,
        dependencies_installed: bool,
        runtime_version: &str,
    ) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> String {
        format!("{} Generator", self.display_name())
    }
}
