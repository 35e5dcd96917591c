//! JSON and CSV export of extraction records.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StatementError};
use crate::models::{BatchSummary, ExtractionRecord, FieldName};

/// Column order of every CSV export.
pub const CSV_HEADER: [&str; 8] = [
    "bank",
    "filename",
    "status",
    "cardholder_name",
    "card_number",
    "credit_limit",
    "total_due",
    "payment_due_date",
];

/// Shape of the saved JSON export file.
#[derive(Debug, Serialize, Deserialize)]
struct JsonExport {
    total_records: usize,
    statements: Vec<ExtractionRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Wrapped(JsonExport),
    Plain(Vec<ExtractionRecord>),
}

/// Records as a pretty-printed JSON array.
pub fn to_json(records: &[ExtractionRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse a JSON array of records.
pub fn from_json(json: &str) -> Result<Vec<ExtractionRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Save records as `{"total_records": n, "statements": [...]}`.
pub fn write_json_file(path: &Path, records: &[ExtractionRecord]) -> Result<()> {
    let export = JsonExport {
        total_records: records.len(),
        statements: records.to_vec(),
    };
    fs::write(path, serde_json::to_string_pretty(&export)?)?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Load a JSON export file, either wrapped or a plain array.
pub fn read_json_file(path: &Path) -> Result<Vec<ExtractionRecord>> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str(&content)? {
        JsonInput::Wrapped(export) => Ok(export.statements),
        JsonInput::Plain(records) => Ok(records),
    }
}

fn write_csv<W: Write>(writer: W, records: &[ExtractionRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for record in records {
        let mut row = vec![
            record.bank.as_str(),
            record.filename.as_str(),
            record.status.as_str(),
        ];
        row.extend(FieldName::ALL.iter().map(|f| record.field(*f).unwrap_or("")));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Records as CSV text with the fixed header. Absent values are empty cells.
pub fn to_csv(records: &[ExtractionRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    String::from_utf8(buf).map_err(|e| StatementError::Export(e.to_string()))
}

/// Save records as CSV.
pub fn write_csv_file(path: &Path, records: &[ExtractionRecord]) -> Result<()> {
    write_csv(fs::File::create(path)?, records)?;
    debug!("Wrote {} CSV rows to {}", records.len(), path.display());
    Ok(())
}

/// Parse CSV produced by [`to_csv`]. The `errors` list does not survive CSV.
pub fn from_csv(content: &str) -> Result<Vec<ExtractionRecord>> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());

    let headers = rdr.headers()?.clone();
    if headers.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(StatementError::Export(format!(
            "unexpected CSV header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let cell = |i: usize| row.get(i).unwrap_or("");
        let optional = |i: usize| Some(cell(i)).filter(|v| !v.is_empty()).map(str::to_string);

        records.push(ExtractionRecord {
            bank: cell(0).parse().map_err(StatementError::Export)?,
            filename: cell(1).to_string(),
            status: cell(2).parse().map_err(StatementError::Export)?,
            cardholder_name: optional(3),
            card_number: optional(4),
            credit_limit: optional(5),
            total_due: optional(6),
            payment_due_date: optional(7),
            errors: Vec::new(),
        });
    }
    Ok(records)
}

/// Human-readable report: summary first, then one block per file.
pub fn write_report(records: &[ExtractionRecord]) -> String {
    let summary = BatchSummary::from_records(records);
    let mut out = String::new();

    out.push_str("Credit Card Statement Extraction Report\n");
    out.push_str("=======================================\n\n");
    out.push_str(&format!("Total statements: {}\n", summary.total_records));
    out.push_str(&format!("Successful:       {}\n", summary.successful));
    out.push_str(&format!("Partial:          {}\n", summary.partial));
    out.push_str(&format!("Errors:           {}\n", summary.errors));
    out.push_str(&format!("Success rate:     {}\n", summary.success_rate));

    if !summary.by_bank.is_empty() {
        out.push_str("\nBy bank:\n");
        for (bank, counts) in &summary.by_bank {
            out.push_str(&format!(
                "  {:<8} success={} partial={} error={}\n",
                bank.as_str(),
                counts.success,
                counts.partial,
                counts.error
            ));
        }
    }

    for record in records {
        out.push_str(&format!(
            "\n{} [{} / {}]\n",
            record.filename, record.bank, record.status
        ));
        for field in FieldName::ALL {
            out.push_str(&format!(
                "  {:<17} {}\n",
                format!("{}:", field),
                record.field(field).unwrap_or("-")
            ));
        }
        for message in &record.errors {
            out.push_str(&format!("  ! {}\n", message));
        }
    }

    out
}
