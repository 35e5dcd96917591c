//! Batch processing command for multiple statement files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use ccstmt_core::export::{write_csv_file, write_json_file, write_report};
use ccstmt_core::models::{BatchSummary, ExtractionRecord, ExtractionStatus};
use ccstmt_core::{validate_pdf, OcrBackend, StatementPipeline};

use super::common::{display_name, load_config, ocr_backend};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the statement PDFs
    #[arg(required = true)]
    input: String,

    /// Output directory (default: output.dir from the configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print per-bank summary statistics
    #[arg(long)]
    summary: bool,

    /// Also write a plain text report
    #[arg(long)]
    report: bool,

    /// Use only the embedded text layer, never OCR
    #[arg(long)]
    no_ocr: bool,
}

/// A file that never reached the pipeline.
struct Rejected {
    path: PathBuf,
    reason: String,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&config.output.dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let ocr = ocr_backend(&config, !args.no_ocr);
    let ocr_ref = ocr.as_ref().map(|o| o as &dyn OcrBackend);
    let pipeline = StatementPipeline::with_config(config.clone());

    let mut records: Vec<ExtractionRecord> = Vec::with_capacity(files.len());
    let mut rejected: Vec<Rejected> = Vec::new();

    for path in files {
        let filename = display_name(&path);
        let checked = fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(|data| {
                validate_pdf(&filename, &data, &config.upload)
                    .map(|_| data)
                    .map_err(|e| e.to_string())
            });

        match checked {
            Ok(data) => records.push(pipeline.process_pdf(&filename, &data, ocr_ref)),
            Err(reason) => {
                warn!("Skipping {}: {}", path.display(), reason);
                rejected.push(Rejected { path, reason });
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let json_path = config.output.json_path();
    let csv_path = config.output.csv_path();
    write_json_file(&json_path, &records)?;
    write_csv_file(&csv_path, &records)?;
    debug!("Exports written to {}", config.output.dir.display());

    println!(
        "{} Results written to {} and {}",
        style("✓").green(),
        json_path.display(),
        csv_path.display()
    );

    if args.report {
        let report_path = config.output.dir.join("report.txt");
        fs::write(&report_path, write_report(&records))?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    let summary = BatchSummary::from_records(&records);

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} partial, {} errors",
        style(summary.successful).green(),
        style(summary.partial).yellow(),
        style(summary.errors).red()
    );

    if args.summary {
        print_summary(&summary);
    }

    let failed: Vec<&ExtractionRecord> = records
        .iter()
        .filter(|r| r.status == ExtractionStatus::Error)
        .collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for record in failed {
            println!(
                "  - {}: {}",
                record.filename,
                record.errors.first().map(String::as_str).unwrap_or("unknown error")
            );
        }
    }

    if !rejected.is_empty() {
        println!();
        println!("{}", style("Skipped files:").yellow());
        for r in &rejected {
            println!("  - {}: {}", r.path.display(), r.reason);
        }
    }

    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", style("Summary").bold());
    println!("  Total records: {}", summary.total_records);
    println!("  Success rate:  {}", summary.success_rate);
    for (bank, counts) in &summary.by_bank {
        println!(
            "  {:<8} success={} partial={} error={}",
            bank.as_str(),
            counts.success,
            counts.partial,
            counts.error
        );
    }
}
