//! Detect command - show which bank a statement belongs to.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use ccstmt_core::pdf::TextSource;
use ccstmt_core::{BankDetection, OcrBackend, RuleStatementParser};

use super::common::{extension, load_config, ocr_backend};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Input file: a PDF statement or a .txt file
    #[arg(required = true)]
    input: PathBuf,

    /// Print the detection as JSON
    #[arg(long)]
    json: bool,

    /// Use only the embedded text layer, never OCR
    #[arg(long)]
    no_ocr: bool,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = match extension(&args.input).as_str() {
        "pdf" => {
            let data = fs::read(&args.input)?;
            let ocr = ocr_backend(&config, !args.no_ocr);
            TextSource::new(config.pdf.clone())
                .extract(&data, ocr.as_ref().map(|o| o as &dyn OcrBackend))?
                .text
        }
        "txt" => fs::read_to_string(&args.input)?,
        other => anyhow::bail!("Unsupported file format: {}", other),
    };

    let detection = RuleStatementParser::new().detect(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detection)?);
    } else {
        print_detection(&detection);
    }

    Ok(())
}

fn print_detection(detection: &BankDetection) {
    if detection.is_detected() {
        println!(
            "{} Detected bank: {} (confidence {:.0}%)",
            style("✓").green(),
            style(detection.bank).bold(),
            detection.confidence * 100.0
        );
    } else {
        println!("{} No bank detected", style("✗").red());
    }

    for (bank, score) in &detection.scores {
        println!("  {:<8} {}", bank.as_str(), score);
    }
}
