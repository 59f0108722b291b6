//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::{AppConfig, load_config};
use crate::discovery::{FileRole, SeedBatches, SourceItem, seed_file_path};
use crate::output::{RunSummary, stage_file};
use seedtrust_core::{TrustError, TrustReport, TrustRun};
use std::path::{Path, PathBuf};

// =============================================================================
// PIPELINE
// =============================================================================

/// Read every seed's files from `raw_dir` and build the trust report.
///
/// Missing and unreadable files are logged, counted and skipped. Only
/// engine state errors abort.
pub fn build_report(config: &AppConfig, raw_dir: &Path) -> Result<TrustReport, TrustError> {
    let mut run = TrustRun::new(config.weights);

    for item in SeedBatches::new(raw_dir, &config.seeds) {
        match item {
            SourceItem::Batch {
                seed,
                role,
                path,
                batch,
            } => {
                let records = batch.len();
                let outcome = run.ingest(batch)?;
                tracing::info!(
                    seed = %seed,
                    file = %path.display(),
                    records,
                    admitted = outcome.admitted,
                    duplicates = outcome.duplicates,
                    malformed = outcome.malformed,
                    "Ingested {}",
                    role
                );
                for reason in &outcome.rejections {
                    tracing::debug!(
                        seed = %seed,
                        file = %path.display(),
                        "Skipped record: {}",
                        reason
                    );
                }
            }
            SourceItem::Missing { seed, role, path } => {
                tracing::warn!(seed = %seed, "Missing {} file {:?}", role, path);
                run.note_missing_input()?;
            }
            SourceItem::Unreadable {
                seed,
                role,
                path,
                error,
            } => {
                tracing::warn!(seed = %seed, "Skipping {} file {:?}: {}", role, path, error);
                run.note_unreadable_input()?;
            }
        }
    }

    run.aggregate()?;
    let report = run.export()?;

    if report.edges.is_empty() {
        tracing::warn!("No trust edges found; the artifact will hold only the header");
    }

    Ok(report)
}

// =============================================================================
// GENERATE COMMAND
// =============================================================================

/// Build the trust edge list and write it atomically.
///
/// The artifact and the optional summary are both staged before either is
/// renamed into place, and the artifact is committed last: a failed run
/// never leaves a new artifact behind.
pub fn cmd_generate(
    config_path: &Path,
    json_mode: bool,
    raw_dir: Option<&Path>,
    output: Option<&Path>,
    summary: Option<&Path>,
) -> Result<(), TrustError> {
    let config = load_config(config_path)?;
    let raw_dir = config.resolve_raw_dir(raw_dir)?;
    let output_path = output.map_or_else(|| config.output_path(), Path::to_path_buf);

    tracing::info!(
        "Generating trust for {} seeds from {:?}",
        config.seeds.len(),
        raw_dir
    );
    tracing::debug!(weights = ?config.weights, "Trust weights");

    let report = build_report(&config, &raw_dir)?;
    let run_summary = RunSummary::new(&output_path, config.seeds.len(), &report);

    let staged_artifact = stage_file(&output_path, report.edges.to_csv().as_bytes())?;
    let staged_summary = match summary {
        Some(path) => Some(stage_file(path, run_summary.to_json()?.as_bytes())?),
        None => None,
    };

    if let Some(staged) = staged_summary {
        let summary_path = staged.destination().to_path_buf();
        staged.commit()?;
        tracing::info!("Summary written to {:?}", summary_path);
    }
    staged_artifact.commit()?;

    if json_mode {
        println!("{}", run_summary.to_json()?);
        return Ok(());
    }

    println!("Seed Graph Trust");
    println!("================");
    println!("Seeds:    {}", config.seeds.len());
    println!("Output:   {:?}", output_path);
    println!("Rows:     {}", run_summary.rows);
    println!("Checksum: {}", run_summary.checksum);
    println!("BLAKE3:   {}", run_summary.blake3);
    println!();
    println!("{}", report.stats);

    Ok(())
}

// =============================================================================
// DISCOVER COMMAND
// =============================================================================

/// Show the configured seeds and which of their raw files exist.
pub fn cmd_discover(
    config_path: &Path,
    json_mode: bool,
    raw_dir: Option<&Path>,
) -> Result<(), TrustError> {
    let config = load_config(config_path)?;
    let raw_dir = config.resolve_raw_dir(raw_dir)?;

    let listing: Vec<(String, Vec<(FileRole, PathBuf, bool)>)> = config
        .seeds
        .iter()
        .map(|seed| {
            let files = FileRole::ORDER
                .iter()
                .map(|role| {
                    let path = seed_file_path(&raw_dir, seed, *role);
                    let present = path.is_file();
                    (*role, path, present)
                })
                .collect();
            (seed.to_string(), files)
        })
        .collect();

    if json_mode {
        let seeds: Vec<serde_json::Value> = listing
            .iter()
            .map(|(seed, files)| {
                let files: serde_json::Map<String, serde_json::Value> = files
                    .iter()
                    .map(|(role, path, present)| {
                        (
                            role.as_str().to_string(),
                            serde_json::json!({
                                "path": path.to_string_lossy(),
                                "present": present
                            }),
                        )
                    })
                    .collect();
                serde_json::json!({ "seed": seed, "files": files })
            })
            .collect();
        let output = serde_json::json!({
            "raw_data_dir": raw_dir.to_string_lossy(),
            "output": config.output_path().to_string_lossy(),
            "seeds": seeds
        });
        let rendered = serde_json::to_string_pretty(&output)
            .map_err(|e| TrustError::IoError(format!("listing encoding: {}", e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Seed Inputs");
    println!("===========");
    println!("Raw data: {:?}", raw_dir);
    println!("Output:   {:?}", config.output_path());
    println!();
    for (seed, files) in &listing {
        println!("{}", seed);
        for (role, path, present) in files {
            let mark = if *present { "ok" } else { "missing" };
            println!("  {:<20} {:<8} {:?}", role.as_str(), mark, path);
        }
    }

    Ok(())
}
