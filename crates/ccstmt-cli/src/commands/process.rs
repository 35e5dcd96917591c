//! Process command - extract the fields of a single statement.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ccstmt_core::export::{to_csv, write_report};
use ccstmt_core::models::ExtractionRecord;
use ccstmt_core::{OcrBackend, StatementPipeline};

use super::common::{display_name, extension, load_config, ocr_backend};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file: a PDF statement, or a .txt file of already-extracted text
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Use only the embedded text layer, never OCR
    #[arg(long)]
    no_ocr: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text report
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let filename = display_name(&args.input);
    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    let ocr = ocr_backend(&config, !args.no_ocr);
    let pipeline = StatementPipeline::with_config(config);

    let record = match extension(&args.input).as_str() {
        "pdf" => {
            pb.set_message("Extracting PDF text...");
            let data = fs::read(&args.input)?;
            pipeline.process_pdf(&filename, &data, ocr.as_ref().map(|o| o as &dyn OcrBackend))
        }
        "txt" => {
            pb.set_message("Parsing text...");
            let text = fs::read_to_string(&args.input)?;
            pipeline.parse_text(&text, &filename).record
        }
        other => anyhow::bail!("Unsupported file format: {}", other),
    };

    pb.finish_and_clear();

    if !record.errors.is_empty() {
        eprintln!(
            "{} {} ({})",
            style("!").yellow(),
            style("Extraction issues:").yellow(),
            record.status
        );
        for message in &record.errors {
            eprintln!("  - {}", message);
        }
    }

    let output = format_record(&record, args.format)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render one record in the requested format.
pub fn format_record(record: &ExtractionRecord, format: OutputFormat) -> anyhow::Result<String> {
    let records = std::slice::from_ref(record);
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(record)?,
        OutputFormat::Csv => to_csv(records)?,
        OutputFormat::Text => write_report(records),
    })
}
