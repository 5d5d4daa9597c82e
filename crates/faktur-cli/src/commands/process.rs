//! Process command - extract fields from a single faktur file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use faktur_core::invoice::rules::description::LINE_SEPARATOR;
use faktur_core::invoice::rules::{format_amount, format_rupiah};
use faktur_core::models::record::ExtractedRecord;
use faktur_core::{ExtractionReport, FakturExtractor};

use super::{extract_file, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (.txt or .pdf)
    #[arg(required = true)]
    input: PathBuf,

    /// Home entity name (overrides the configured one)
    #[arg(long)]
    home_entity: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let home_entity = args
        .home_entity
        .clone()
        .unwrap_or_else(|| config.extraction.home_entity.clone());

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Extracting faktur fields...");

    let extractor = FakturExtractor::new(config);
    let report = extract_file(&args.input, &extractor, &home_entity);

    pb.finish_and_clear();
    let report = report?;

    if args.validate {
        let issues = report.record.validate();
        if !issues.is_empty() || !report.warnings.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in issues.iter().chain(&report.warnings) {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_record(&report.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        print_confidence(&report);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_confidence(report: &ExtractionReport) {
    let scores = &report.field_scores;

    println!();
    println!(
        "{} Extraction confidence: {:.1}%",
        style("ℹ").blue(),
        report.confidence * 100.0
    );
    for (field, score) in [
        ("invoice_number", scores.invoice_number),
        ("transaction_date", scores.transaction_date),
        ("counterparty_name", scores.counterparty_name),
        ("counterparty_tax_id", scores.counterparty_tax_id),
        ("taxable_base", scores.taxable_base),
        ("description", scores.description),
    ] {
        println!("    {:<20} {:.2}", field, score);
    }
    if !report.missing_fields.is_empty() {
        println!(
            "{} Missing: {}",
            style("ℹ").blue(),
            report.missing_fields.join(", ")
        );
    }
    println!(
        "{} Processing time: {}ms",
        style("ℹ").blue(),
        report.processing_time_ms
    );
}

/// Render a record in the requested output format.
pub fn format_record(record: &ExtractedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// CSV header shared by single-record output and the batch summary.
pub const RECORD_COLUMNS: [&str; 11] = [
    "invoice_number",
    "transaction_date",
    "reporting_period",
    "direction",
    "ledger",
    "counterparty_name",
    "counterparty_tax_id",
    "taxable_base",
    "tax_amount",
    "description",
    "confidence",
];

/// Values for [`RECORD_COLUMNS`].
pub fn record_row(record: &ExtractedRecord) -> Vec<String> {
    vec![
        record.invoice_number.clone().unwrap_or_default(),
        record.transaction_date.map(iso_date).unwrap_or_default(),
        record.reporting_period.clone().unwrap_or_default(),
        record.direction.as_str().to_string(),
        record.ledger().unwrap_or_default().to_string(),
        record.counterparty_name.clone(),
        record.counterparty_tax_id.clone(),
        format_amount(record.taxable_base),
        format_amount(record.tax_amount),
        record.description.clone(),
        format!("{:.2}", record.confidence),
    ]
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(RECORD_COLUMNS)?;
    wtr.write_record(record_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Faktur: {}\n",
        record.invoice_number.as_deref().unwrap_or("-")
    ));
    match record.transaction_date {
        Some(date) => output.push_str(&format!(
            "Date: {} ({})\n",
            date.format("%d/%m/%Y"),
            record.reporting_period.as_deref().unwrap_or("")
        )),
        None => output.push_str("Date: -\n"),
    }
    output.push_str(&format!(
        "Direction: {} {}\n",
        record.direction.as_str(),
        record.ledger().map(|l| format!("({})", l)).unwrap_or_default()
    ));
    output.push('\n');

    output.push_str("Counterparty:\n");
    output.push_str(&format!("  {}\n", record.counterparty_name));
    output.push_str(&format!("  NPWP: {}\n", record.counterparty_tax_id));
    output.push('\n');

    output.push_str("Amounts:\n");
    output.push_str(&format!("  DPP: {}\n", format_rupiah(record.taxable_base)));
    output.push_str(&format!("  PPN: {}\n", format_rupiah(record.tax_amount)));
    output.push('\n');

    output.push_str("Description:\n");
    for line in record.description.split(LINE_SEPARATOR) {
        output.push_str(&format!("  {}\n", line));
    }

    output
}
