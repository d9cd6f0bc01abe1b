use hozokit_core::{
    DependencyInstaller, InstallPipeline, PipelineState, ProductConfig, ProgressView,
    ProjectAnswers, ProjectParameters, QuietView, ScaffoldError, Stage, Warning,
};
use std::cell::RefCell;
use std::io::{Cursor, Write};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

#[derive(Clone)]
struct MockedConfig {
    server: String,
}

impl ProductConfig for MockedConfig {
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
        format!("{}/latest.zip", self.server)
    }

    fn platform_archive_name(&self) -> &'static str {
        "wordpress.zip"
    }

    fn release_api_url(&self) -> String {
        format!("{}/repos/csalmeida/hozokit/releases/latest", self.server)
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

    fn next_steps(&self, folder_name: &str, installed: bool, runtime_version: &str) -> Vec<String> {
        if installed {
            vec![format!("cd {}", folder_name), "npm start".to_string()]
        } else {
            vec![
                format!("cd {}", folder_name),
                format!("nvm use {}", runtime_version),
                "npm install".to_string(),
            ]
        }
    }
}

#[derive(Default)]
struct RecordingView {
    started: RefCell<Vec<String>>,
}

impl ProgressView for RecordingView {
    fn started(&self, label: &str) {
        self.started.borrow_mut().push(label.to_string());
    }
    fn succeeded(&self, _label: &str) {}
    fn failed(&self, _label: &str, _reason: &str) {}
    fn warned(&self, _label: &str, _warning: &Warning) {}
}

fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn kit_zip() -> Vec<u8> {
    zip_bytes(&[
        ("csalmeida-hozokit-1a2b3c/README.md", "# Hozokit"),
        ("csalmeida-hozokit-1a2b3c/wp-content/themes/hozokit/.nvmrc", "v14.15.1\n"),
        (
            "csalmeida-hozokit-1a2b3c/wp-content/themes/hozokit/styles/base.scss",
            "/* kit default */",
        ),
        (
            "csalmeida-hozokit-1a2b3c/wp-content/themes/hozokit/package.json",
            "{}",
        ),
    ])
}

fn platform_zip() -> Vec<u8> {
    zip_bytes(&[
        ("wordpress/index.php", "<?php // WordPress"),
        ("wordpress/wp-content/index.php", "<?php"),
    ])
}

async fn mount_release(server: &MockServer) {
    let body = serde_json::json!({
        "name": "v1.2.0",
        "zipball_url": format!("{}/zipball/v1.2.0", server.uri()),
    });
    Mock::given(method("GET"))
        .and(path("/repos/csalmeida/hozokit/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_kit(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/zipball/v1.2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(kit_zip()))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_platform(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/latest.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(platform_zip()))
        .expect(expected)
        .mount(server)
        .await;
}

fn params(install_platform: bool) -> ProjectParameters {
    ProjectParameters::new(ProjectAnswers {
        project_name: "My Theme".into(),
        install_platform,
        webserver_url: Some("http://localhost:3000".into()),
        theme_author: Some("Jane Doe".into()),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_kit_only_project_is_created_without_platform() {
    let server = MockServer::start().await;
    mount_release(&server).await;
    mount_kit(&server, 1).await;
    mount_platform(&server, 0).await;

    let base = tempfile::tempdir().unwrap();
    let config = MockedConfig { server: server.uri() };
    let view = RecordingView::default();
    let mut pipeline = InstallPipeline::new(config, base.path(), &view)
        .with_installer(DependencyInstaller::new("npm", &["install"]).with_runtime_version(Some("v20.1.0")));

    let report = pipeline.run(&params(false)).await.unwrap();

    let theme = base.path().join("my-theme/wp-content/themes/my-theme");
    let readme = std::fs::read_to_string(theme.join("README.md")).unwrap();
    assert!(readme.starts_with("# My Theme"));
    assert_eq!(
        std::fs::read_to_string(theme.join("HOZOKIT-README.md")).unwrap(),
        "# Hozokit"
    );
    assert!(theme.join(".env").exists());
    assert!(!base.path().join("my-theme/wp-content/themes/hozokit").exists());
    assert!(!base.path().join("my-theme/hozokit-main.zip").exists());
    assert!(!base.path().join("my-theme/csalmeida-hozokit-1a2b3c").exists());
    assert!(!base.path().join("my-theme/index.php").exists());

    assert_eq!(report.release_name.as_deref(), Some("v1.2.0"));
    assert_eq!(report.runtime_version, "14.15.1");
    assert!(!report.dependencies_installed);
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::VersionMismatch { .. })));
    assert_eq!(report.next_steps.last().map(String::as_str), Some("npm install"));

    assert_eq!(pipeline.state(), PipelineState::Done);
    assert_eq!(
        pipeline.completed_stages(),
        &[
            Stage::DownloadKit,
            Stage::ExtractKit,
            Stage::Template,
            Stage::InstallDeps,
            Stage::Report
        ]
    );
    assert_eq!(
        *view.started.borrow(),
        vec![
            "Looking up latest Hozokit release",
            "Downloading Hozokit",
            "Extracting Hozokit v1.2.0",
            "Setup Hozokit base files with given parameters",
            "Installing dependencies (this might take a while)",
        ]
    );
}

#[tokio::test]
async fn test_platform_is_installed_before_kit() {
    let server = MockServer::start().await;
    mount_release(&server).await;
    mount_kit(&server, 1).await;
    mount_platform(&server, 1).await;

    let base = tempfile::tempdir().unwrap();
    let config = MockedConfig { server: server.uri() };
    let view = QuietView;
    let mut pipeline = InstallPipeline::new(config, base.path(), &view)
        .with_installer(DependencyInstaller::new("npm", &["install"]).with_runtime_version(None));

    pipeline.run(&params(true)).await.unwrap();

    let root = base.path().join("my-theme");
    assert_eq!(
        std::fs::read_to_string(root.join("index.php")).unwrap(),
        "<?php // WordPress"
    );
    assert!(root.join("wp-content/index.php").exists());
    assert!(root.join("wp-content/themes/my-theme/README.md").exists());
    assert!(!root.join("wordpress.zip").exists());
    assert!(!root.join("wordpress").exists());
    assert_eq!(pipeline.completed_stages().len(), 7);
    assert_eq!(pipeline.completed_stages()[0], Stage::DownloadPlatform);
}

#[tokio::test]
async fn test_release_lookup_failure_stops_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/csalmeida/hozokit/releases/latest"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_kit(&server, 0).await;
    mount_platform(&server, 0).await;

    let base = tempfile::tempdir().unwrap();
    let config = MockedConfig { server: server.uri() };
    let view = QuietView;
    let mut pipeline = InstallPipeline::new(config, base.path(), &view);

    let result = pipeline.run(&params(false)).await;

    assert!(matches!(result, Err(ScaffoldError::Api { status: 500, .. })));
    assert_eq!(
        pipeline.state(),
        PipelineState::Failed {
            stage: Stage::DownloadKit
        }
    );
    assert!(pipeline.completed_stages().is_empty());
    assert!(!base.path().join("my-theme/wp-content").exists());
}

#[tokio::test]
async fn test_platform_download_failure_skips_kit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest.zip"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_kit(&server, 0).await;

    let base = tempfile::tempdir().unwrap();
    let config = MockedConfig { server: server.uri() };
    let view = QuietView;
    let mut pipeline = InstallPipeline::new(config, base.path(), &view);

    let result = pipeline.run(&params(true)).await;

    assert!(matches!(
        result,
        Err(ScaffoldError::HttpStatus { status: 404, .. })
    ));
    assert_eq!(
        pipeline.state(),
        PipelineState::Failed {
            stage: Stage::DownloadPlatform
        }
    );
    assert!(!base.path().join("my-theme/wordpress.zip").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_matching_runtime_installs_dependencies() {
    let server = MockServer::start().await;
    mount_release(&server).await;
    mount_kit(&server, 1).await;

    let base = tempfile::tempdir().unwrap();
    let config = MockedConfig { server: server.uri() };
    let view = QuietView;
    let mut pipeline = InstallPipeline::new(config, base.path(), &view)
        .with_installer(DependencyInstaller::new("true", &[]).with_runtime_version(Some("v14.15.1")));

    let report = pipeline.run(&params(false)).await.unwrap();

    assert!(report.dependencies_installed);
    assert!(report.warnings.is_empty());
    assert_eq!(report.next_steps, vec!["cd my-theme", "npm start"]);
}
