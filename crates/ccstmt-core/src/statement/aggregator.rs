//! Builds the per-file record and its status.

use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::{Bank, ExtractionRecord, ExtractionStatus, FieldName, FieldResults};

/// Combine field values and warnings into a record.
///
/// Success needs all five fields. Any missing field makes the record partial, even
/// when nothing matched: error is reserved for unknown banks and unreadable files.
pub fn aggregate(
    bank: Bank,
    filename: &str,
    mut fields: FieldResults,
    warnings: Vec<ExtractionError>,
) -> ExtractionRecord {
    let missing = fields.missing();
    let present = fields.present_count();

    let mut errors: Vec<String> = warnings.iter().map(ToString::to_string).collect();
    errors.extend(
        missing
            .iter()
            .map(|f| ExtractionError::MissingField(f.to_string()).to_string()),
    );

    let status = if missing.is_empty() {
        ExtractionStatus::Success
    } else {
        ExtractionStatus::Partial
    };

    debug!("{}: {} of {} fields -> {}", filename, present, FieldName::ALL.len(), status);
    if present == 0 {
        warn!("{}: detected {} but extracted no fields", filename, bank);
    }

    ExtractionRecord {
        bank,
        filename: filename.to_string(),
        status,
        cardholder_name: fields.take(FieldName::CardholderName),
        card_number: fields.take(FieldName::CardNumber),
        credit_limit: fields.take(FieldName::CreditLimit),
        total_due: fields.take(FieldName::TotalDue),
        payment_due_date: fields.take(FieldName::PaymentDueDate),
        errors,
    }
}

/// Record for text that matched no bank profile.
pub fn bank_not_detected(filename: &str) -> ExtractionRecord {
    ExtractionRecord::failed(
        Bank::Unknown,
        filename,
        ExtractionError::BankNotDetected.to_string(),
    )
}

/// Record for a file whose text could not be obtained.
pub fn extraction_failed(filename: &str, error: impl ToString) -> ExtractionRecord {
    ExtractionRecord::failed(Bank::Unknown, filename, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn all_fields() -> FieldResults {
        let mut fields = FieldResults::new();
        fields.insert(FieldName::CardholderName, "JOHN DOE");
        fields.insert(FieldName::CardNumber, "1234");
        fields.insert(FieldName::CreditLimit, "200000.00");
        fields.insert(FieldName::TotalDue, "15000.00");
        fields.insert(FieldName::PaymentDueDate, "2024-01-15");
        fields
    }

    #[test]
    fn test_success() {
        let record = aggregate(Bank::Hdfc, "a.pdf", all_fields(), vec![]);
        assert_eq!(record.status, ExtractionStatus::Success);
        assert!(record.errors.is_empty());
        assert_eq!(record.total_due.as_deref(), Some("15000.00"));
    }

    #[test]
    fn test_one_missing_is_partial() {
        let mut fields = all_fields();
        fields.take(FieldName::CreditLimit);

        let record = aggregate(Bank::Axis, "a.pdf", fields, vec![]);
        assert_eq!(record.status, ExtractionStatus::Partial);
        assert_eq!(record.errors, vec!["missing field: credit_limit".to_string()]);
        assert_eq!(record.credit_limit, None);
    }

    #[test]
    fn test_warnings_listed_first() {
        let mut fields = all_fields();
        fields.take(FieldName::PaymentDueDate);

        let warnings = vec![ExtractionError::UnrecognizedDate("32/13/2024".to_string())];
        let record = aggregate(Bank::Silk, "a.pdf", fields, warnings);
        assert_eq!(record.status, ExtractionStatus::Partial);
        assert_eq!(
            record.errors,
            vec![
                "date format unrecognized: 32/13/2024".to_string(),
                "missing field: payment_due_date".to_string(),
            ]
        );
    }

    #[test]
    fn test_nothing_extracted_is_partial() {
        let record = aggregate(Bank::Citi, "a.pdf", FieldResults::new(), vec![]);
        assert_eq!(record.status, ExtractionStatus::Partial);
        assert_eq!(record.bank, Bank::Citi);
        assert_eq!(record.errors.len(), 5);
        assert!(record.errors.iter().all(|e| e.starts_with("missing field: ")));
    }

    #[test]
    fn test_bank_not_detected() {
        let record = bank_not_detected("b.pdf");
        assert_eq!(record.status, ExtractionStatus::Error);
        assert_eq!(record.bank, Bank::Unknown);
        assert_eq!(record.errors, vec!["bank not detected".to_string()]);
        for field in FieldName::ALL {
            assert_eq!(record.field(field), None);
        }
    }
}
