//! Batch processing command for multiple faktur files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use faktur_core::models::record::ExtractedRecord;
use faktur_core::FakturExtractor;

use super::process::{format_record, record_row, OutputFormat, RECORD_COLUMNS};
use super::{extension_of, extract_file, load_config, SUPPORTED_EXTENSIONS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Home entity name (overrides the configured one)
    #[arg(long)]
    home_entity: Option<String>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ExtractedRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let home_entity = args
        .home_entity
        .clone()
        .unwrap_or_else(|| config.extraction.home_entity.clone());

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| SUPPORTED_EXTENSIONS.contains(&extension_of(p).as_str()))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(FakturExtractor::new(config));
    let home_entity: Arc<str> = Arc::from(home_entity);
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    // Set by a failing worker when the batch must stop at the first error.
    let stop = Arc::new(AtomicBool::new(false));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let permit = permits.clone().acquire_owned().await?;
        if stop.load(Ordering::SeqCst) {
            warn!("Earlier file failed, not starting {}", path.display());
            break;
        }

        let extractor = extractor.clone();
        let home_entity = home_entity.clone();
        let pb = overall_pb.clone();
        let stop = stop.clone();
        let continue_on_error = args.continue_on_error;

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let result = extract_file(&path, &extractor, &home_entity);
            pb.inc(1);

            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            match result {
                Ok(report) => ProcessResult {
                    path,
                    record: Some(report.record),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => {
                    if !continue_on_error {
                        stop.store(true, Ordering::SeqCst);
                    }
                    ProcessResult {
                        path,
                        record: None,
                        error: Some(format!("{:#}", e)),
                        processing_time_ms,
                    }
                }
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    let mut pending = handles.into_iter();
    while let Some(handle) = pending.next() {
        let result = handle.await?;

        if let Some(ref error_msg) = result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                // Workers that have not started yet are dropped.
                pending.by_ref().for_each(|handle| handle.abort());
                overall_pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!(
                    "Processing failed for {}: {}",
                    result.path.display(),
                    error_msg
                );
            }
        }

        results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(ref output_dir) = args.output_dir {
        for result in &successful {
            if let Some(record) = &result.record {
                write_output(output_dir, &result.path, record, args.format)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_output(
    output_dir: &Path,
    input: &Path,
    record: &ExtractedRecord,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let output_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("faktur");

    let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));
    fs::write(&output_path, format_record(record, format)?)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(RECORD_COLUMNS);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let (status, fields) = match &result.record {
            Some(record) => ("success", record_row(record)),
            None => ("error", vec![String::new(); RECORD_COLUMNS.len()]),
        };

        let mut row = vec![filename, status.to_string()];
        row.extend(fields);
        row.push(result.processing_time_ms.to_string());
        row.push(result.error.clone().unwrap_or_default());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
