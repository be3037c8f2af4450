//! `scrape` and `targets` command handlers.
//!
//! Target resolution: `--target` URLs win over the targets file; either way
//! the list is validated before any browser is launched. Per-target failures
//! are reported in the summary and do not fail the command unless every
//! target failed.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use orgscrape_core::{flatten_profiles, load_targets, validate_targets, AppConfig, TargetConfig};
use orgscrape_scraper::{ChromiumConfig, ChromiumProvider, Orchestrator, ScrapeSettings};

use crate::export::{write_export, OutputFormat};

#[derive(Debug)]
pub(crate) struct ScrapeRequest {
    pub targets: Vec<String>,
    pub targets_file: Option<PathBuf>,
    pub posts: Option<usize>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub dry_run: bool,
}

/// Resolve the targets for a run.
///
/// # Errors
///
/// Returns an error if the targets file cannot be loaded or any target fails
/// validation.
pub(crate) fn resolve_targets(
    config: &AppConfig,
    cli_targets: &[String],
    targets_file: Option<&Path>,
) -> anyhow::Result<Vec<TargetConfig>> {
    if !cli_targets.is_empty() {
        let targets: Vec<TargetConfig> = cli_targets
            .iter()
            .map(|url| TargetConfig::from_url(url.trim()))
            .collect();
        validate_targets(&targets)?;
        return Ok(targets);
    }

    let path = targets_file.unwrap_or(config.targets_path.as_path());
    let file = load_targets(path)?;
    Ok(file.targets)
}

/// Scrape every resolved target and write the flattened export.
///
/// # Errors
///
/// Returns an error if targets cannot be resolved, the export cannot be
/// written, or every target failed.
pub(crate) async fn run_scrape(config: &AppConfig, request: ScrapeRequest) -> anyhow::Result<()> {
    let targets = resolve_targets(config, &request.targets, request.targets_file.as_deref())?;
    let post_target = request.posts.unwrap_or(config.post_target);

    if request.dry_run {
        let labels: Vec<String> = targets.iter().map(TargetConfig::label).collect();
        println!(
            "dry-run: would scrape {} companies ({post_target} posts each): [{}]",
            targets.len(),
            labels.join(", ")
        );
        return Ok(());
    }

    let settings = ScrapeSettings::from_app_config(config);
    let provider = Arc::new(ChromiumProvider::new(ChromiumConfig::from_app_config(config)));
    let orchestrator = Orchestrator::new(provider, settings);

    let urls: Vec<String> = targets.iter().map(|t| t.url.clone()).collect();
    let results = orchestrator.run(&urls, post_target).await;
    let rows = flatten_profiles(&results.profiles);
    let generated_at = chrono::Utc::now();

    match &request.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", path.display()))?;
            write_export(
                BufWriter::new(file),
                request.format,
                &rows,
                &results.summary,
                generated_at,
            )?;
            tracing::info!(path = %path.display(), rows = rows.len(), "export written");
        }
        None => write_export(
            std::io::stdout().lock(),
            request.format,
            &rows,
            &results.summary,
            generated_at,
        )?,
    }

    let summary = &results.summary;
    eprintln!(
        "scraped {}/{} companies, {} posts",
        summary.collected,
        summary.attempted,
        results.post_count()
    );
    for failed in &summary.failed {
        eprintln!("  failed: {} ({})", failed.target, failed.reason);
    }

    if summary.attempted > 0 && summary.collected == 0 {
        anyhow::bail!("all {} targets failed", summary.attempted);
    }
    Ok(())
}

/// Print the validated target list.
///
/// # Errors
///
/// Returns an error if the targets file cannot be loaded or is invalid.
pub(crate) fn run_list_targets(config: &AppConfig, targets_file: Option<&Path>) -> anyhow::Result<()> {
    let targets = resolve_targets(config, &[], targets_file)?;
    println!("{} targets:", targets.len());
    for target in &targets {
        println!("  {:<24} {}", target.label(), target.url);
    }
    Ok(())
}
