use super::{PipelineContext, Stage};
use crate::archive::ArchiveExtractor;
use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use crate::progress::ProgressReporter;
use tokio::fs;
use tracing::debug;

pub(super) async fn run<C: ProductConfig>(stage: Stage, ctx: &mut PipelineContext<'_, C>) -> Result<()> {
    match stage {
        Stage::DownloadPlatform => download_platform(ctx).await,
        Stage::ExtractPlatform => extract_platform(ctx).await,
        Stage::DownloadKit => download_kit(ctx).await,
        Stage::ExtractKit => extract_kit(ctx).await,
        Stage::Template => template(ctx).await,
        Stage::InstallDeps => install_deps(ctx).await,
        Stage::Report => report(ctx).await,
    }
}

async fn create_root<C: ProductConfig>(ctx: &PipelineContext<'_, C>) -> Result<()> {
    let root = ctx.layout.root();
    fs::create_dir_all(root)
        .await
        .map_err(|e| ScaffoldError::fs("create project directory", root, e))
}

async fn download_platform<C: ProductConfig>(ctx: &mut PipelineContext<'_, C>) -> Result<()> {
    create_root(ctx).await?;

    let label = format!("Downloading {}", ctx.config.platform_display_name());
    let url = ctx.config.platform_download_url();
    let destination = ctx.layout.root().join(ctx.config.platform_archive_name());

    let mut reporter = ProgressReporter::new([label.as_str()], ctx.view);
    let bytes = reporter.track(&label, ctx.downloader.fetch(&url, &destination)).await?;
    debug!(bytes, "platform downloaded");
    reporter.finish()
}

async fn extract_platform<C: ProductConfig>(ctx: &mut PipelineContext<'_, C>) -> Result<()> {
    let label = format!("Extracting {}", ctx.config.platform_display_name());
    let root = ctx.layout.root().to_path_buf();
    let archive = root.join(ctx.config.platform_archive_name());

    let mut reporter = ProgressReporter::new([label.as_str()], ctx.view);
    let extraction = reporter
        .track(&label, ArchiveExtractor.extract(&archive, &root, Some(root.as_path())))
        .await?;
    reporter.finish()?;

    ctx.warnings.extend(extraction.warning);
    Ok(())
}

async fn download_kit<C: ProductConfig>(ctx: &mut PipelineContext<'_, C>) -> Result<()> {
    create_root(ctx).await?;

    let lookup = format!("Looking up latest {} release", ctx.config.display_name());
    let download = format!("Downloading {}", ctx.config.display_name());
    let api_url = ctx.config.release_api_url();
    let destination = ctx.layout.root().join(ctx.config.kit_archive_name());

    let mut reporter = ProgressReporter::new([lookup.as_str(), download.as_str()], ctx.view);
    let release = reporter
        .track(&lookup, ctx.resolver.resolve_latest(&api_url))
        .await?;
    reporter
        .track(
            &download,
            ctx.downloader.fetch(release.zipball_url.as_str(), &destination),
        )
        .await?;
    reporter.finish()?;

    debug!(release = %release.name, "kit downloaded");
    ctx.release_name = Some(release.name);
    Ok(())
}

async fn extract_kit<C: ProductConfig>(ctx: &mut PipelineContext<'_, C>) -> Result<()> {
    let label = match &ctx.release_name {
        Some(release) => format!("Extracting {} {}", ctx.config.display_name(), release),
        None => format!("Extracting {}", ctx.config.display_name()),
    };
    let root = ctx.layout.root().to_path_buf();
    let archive = root.join(ctx.config.kit_archive_name());

    let mut reporter = ProgressReporter::new([label.as_str()], ctx.view);
    let extraction = reporter
        .track(&label, ArchiveExtractor.extract(&archive, &root, Some(root.as_path())))
        .await?;
    reporter.finish()?;

    ctx.warnings.extend(extraction.warning);
    Ok(())
}

async fn template<C: ProductConfig>(ctx: &mut PipelineContext<'_, C>) -> Result<()> {
    let label = format!(
        "Setup {} base files with given parameters",
        ctx.config.display_name()
    );

    let mut reporter = ProgressReporter::new([label.as_str()], ctx.view);
    let rendered = reporter
        .track(&label, ctx.renderer.render(&ctx.layout, ctx.params))
        .await?;
    reporter.finish()?;

    ctx.runtime_version = rendered.runtime_version;
    ctx.warnings.extend(rendered.warning);
    Ok(())
}

/// Blocking stage: the package manager runs to completion before the report
async fn install_deps<C: ProductConfig>(ctx: &mut PipelineContext<'_, C>) -> Result<()> {
    let label = "Installing dependencies (this might take a while)";
    let theme = ctx.layout.theme_dir();
    let marker = ctx.layout.version_marker();
    let installer = ctx.installer;

    let mut reporter = ProgressReporter::new([label], ctx.view);
    let outcome = reporter
        .track_soft(label, async {
            let outcome = installer.install(&theme, &marker).await;
            let warning = outcome.warning();
            (outcome, warning)
        })
        .await?;
    reporter.finish()?;

    ctx.dependencies_installed = outcome.installed();
    ctx.warnings.extend(outcome.warning());
    Ok(())
}

async fn report<C: ProductConfig>(ctx: &mut PipelineContext<'_, C>) -> Result<()> {
    ctx.next_steps = ctx.config.next_steps(
        ctx.layout.folder_name(),
        ctx.dependencies_installed,
        &ctx.runtime_version,
    );
    Ok(())
}
