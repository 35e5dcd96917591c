//! Statement extraction data models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Card issuer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Axis,
    Citi,
    Hdfc,
    Icici,
    Silk,
    /// No profile matched the text.
    Unknown,
}

impl Bank {
    /// Supported banks in configuration order. Detection ties resolve to the earlier entry.
    pub const SUPPORTED: [Bank; 5] = [Bank::Axis, Bank::Citi, Bank::Hdfc, Bank::Icici, Bank::Silk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bank::Axis => "axis",
            Bank::Citi => "citi",
            Bank::Hdfc => "hdfc",
            Bank::Icici => "icici",
            Bank::Silk => "silk",
            Bank::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Bank::Unknown
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "axis" => Ok(Bank::Axis),
            "citi" => Ok(Bank::Citi),
            "hdfc" => Ok(Bank::Hdfc),
            "icici" => Ok(Bank::Icici),
            "silk" => Ok(Bank::Silk),
            "unknown" => Ok(Bank::Unknown),
            other => Err(format!("unsupported bank: {}", other)),
        }
    }
}

/// Check whether a bank name is one of the supported issuers.
pub fn validate_bank(name: &str) -> bool {
    name.parse::<Bank>().map(|b| b.is_known()).unwrap_or(false)
}

/// The five fields extracted from every statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    CardholderName,
    CardNumber,
    CreditLimit,
    TotalDue,
    PaymentDueDate,
}

impl FieldName {
    /// All fields in export column order.
    pub const ALL: [FieldName; 5] = [
        FieldName::CardholderName,
        FieldName::CardNumber,
        FieldName::CreditLimit,
        FieldName::TotalDue,
        FieldName::PaymentDueDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::CardholderName => "cardholder_name",
            FieldName::CardNumber => "card_number",
            FieldName::CreditLimit => "credit_limit",
            FieldName::TotalDue => "total_due",
            FieldName::PaymentDueDate => "payment_due_date",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// All five fields were found.
    Success,
    /// Some fields were found.
    Partial,
    /// The bank was not detected or text could not be extracted.
    Error,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Success => "success",
            ExtractionStatus::Partial => "partial",
            ExtractionStatus::Error => "error",
        }
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "success" => Ok(ExtractionStatus::Success),
            "partial" => Ok(ExtractionStatus::Partial),
            "error" => Ok(ExtractionStatus::Error),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Plain text pulled from a statement plus the name of the file it came from.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    text: String,
    filename: String,
}

impl ExtractionRequest {
    pub fn new(text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filename: filename.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Post-processed field values keyed by field name. Absent fields have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldResults {
    values: BTreeMap<FieldName, String>,
}

impl FieldResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn take(&mut self, field: FieldName) -> Option<String> {
        self.values.remove(&field)
    }

    /// Number of fields present.
    pub fn present_count(&self) -> usize {
        self.values.len()
    }

    /// Fields with no value, in export order.
    pub fn missing(&self) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|f| !self.values.contains_key(f))
            .collect()
    }
}

/// Structured result for one statement file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub bank: Bank,
    pub filename: String,
    pub status: ExtractionStatus,
    pub cardholder_name: Option<String>,
    /// Last four digits only.
    pub card_number: Option<String>,
    /// Fixed-point decimal string, e.g. `"250000.00"`.
    pub credit_limit: Option<String>,
    /// Fixed-point decimal string.
    pub total_due: Option<String>,
    /// ISO 8601 date (`YYYY-MM-DD`).
    pub payment_due_date: Option<String>,
    /// Warnings and error messages collected while processing.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ExtractionRecord {
    /// An error record with every field absent.
    pub fn failed(bank: Bank, filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            bank,
            filename: filename.into(),
            status: ExtractionStatus::Error,
            cardholder_name: None,
            card_number: None,
            credit_limit: None,
            total_due: None,
            payment_due_date: None,
            errors: vec![message.into()],
        }
    }

    /// Value of a field by name.
    pub fn field(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::CardholderName => self.cardholder_name.as_deref(),
            FieldName::CardNumber => self.card_number.as_deref(),
            FieldName::CreditLimit => self.credit_limit.as_deref(),
            FieldName::TotalDue => self.total_due.as_deref(),
            FieldName::PaymentDueDate => self.payment_due_date.as_deref(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }
}

/// Per-status counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub success: usize,
    pub partial: usize,
    pub error: usize,
}

impl StatusCounts {
    fn record(&mut self, status: ExtractionStatus) {
        match status {
            ExtractionStatus::Success => self.success += 1,
            ExtractionStatus::Partial => self.partial += 1,
            ExtractionStatus::Error => self.error += 1,
        }
    }
}

/// Aggregate statistics over a batch of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_records: usize,
    pub successful: usize,
    pub partial: usize,
    pub errors: usize,
    /// Share of successful records, formatted as `"66.67%"`.
    pub success_rate: String,
    pub by_bank: BTreeMap<Bank, StatusCounts>,
}

impl BatchSummary {
    pub fn from_records(records: &[ExtractionRecord]) -> Self {
        let mut totals = StatusCounts::default();
        let mut by_bank: BTreeMap<Bank, StatusCounts> = BTreeMap::new();

        for record in records {
            totals.record(record.status);
            by_bank.entry(record.bank).or_default().record(record.status);
        }

        let rate = if records.is_empty() {
            0.0
        } else {
            totals.success as f64 / records.len() as f64 * 100.0
        };

        Self {
            total_records: records.len(),
            successful: totals.success,
            partial: totals.partial,
            errors: totals.error,
            success_rate: format!("{:.2}%", rate),
            by_bank,
        }
    }
}
