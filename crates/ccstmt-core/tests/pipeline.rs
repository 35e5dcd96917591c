use ccstmt_core::export::{from_csv, to_csv};
use ccstmt_core::models::{Bank, ExtractionStatus, FieldName};
use ccstmt_core::pdf::ExtractionMethod;
use ccstmt_core::{StatementPipeline, TextSource};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;

const HDFC_TEXT: &str = "\
HDFC Bank Credit Card Statement
Name : JOHN DOE Statement for HDFC Bank Credit Card
Card No: 4567 XXXX XXXX 1234
Payment Due Date   Total Dues   Minimum Amount Due
15/01/2024   15,000.00   750.00
Credit Limit   Available Credit Limit   Available Cash Limit
200,000.00   150,000.00   50,000.00
";

const SILK_TEXT: &str = "\
Silk Bank Limited
Credit Card Statement
Cardholder's Name   Card Number   Credit Limit
JANE SMITH 4321 5678 9012 3456 150,000
Statement Date   Payment Due Date
Card 4321 05-Jan-2024 25-Jan-2024
Previous Balance + Purchases = Current Balance
PKR 12,500.00
";

const ICICI_TEXT: &str = "\
ICICI Bank Credit Card Statement
MR Rahul Verma
4375XXXXXXXX1005
Credit Limit (Including cash)   Available Credit
`250,000.00   `180,000.00
Total Amount due
`12,345.67
PAYMENT DUE DATE
March 5, 2024
";

const AXIS_PARTIAL_TEXT: &str = "\
Axis Bank Credit Card Statement
Name RAHUL SHARMA
Payment Due Date 20/02/2024
Total Payment Due 5,250.00 Dr
";

const CITI_PARTIAL_TEXT: &str = "\
Citibank N.A. Credit Card Statement
CardNumber : 5241-8300-1234-5678
TotalAmountDue ( ) : 8,450.00
PaymentDueDate : 10/03/24
";

#[test]
fn hdfc_statement_is_complete() {
    let record = StatementPipeline::new().parse_text(HDFC_TEXT, "hdfc.pdf").record;

    assert_eq!(record.bank, Bank::Hdfc);
    assert_eq!(record.status, ExtractionStatus::Success);
    assert_eq!(record.cardholder_name.as_deref(), Some("JOHN DOE"));
    assert_eq!(record.card_number.as_deref(), Some("1234"));
    assert_eq!(record.credit_limit.as_deref(), Some("200000.00"));
    assert_eq!(record.total_due.as_deref(), Some("15000.00"));
    assert_eq!(record.payment_due_date.as_deref(), Some("2024-01-15"));
    assert!(record.errors.is_empty());
}

#[test]
fn silk_statement_is_complete() {
    let record = StatementPipeline::new().parse_text(SILK_TEXT, "silk.pdf").record;

    assert_eq!(record.bank, Bank::Silk);
    assert_eq!(record.status, ExtractionStatus::Success);
    assert_eq!(record.cardholder_name.as_deref(), Some("JANE SMITH"));
    assert_eq!(record.card_number.as_deref(), Some("3456"));
    assert_eq!(record.credit_limit.as_deref(), Some("150000.00"));
    assert_eq!(record.total_due.as_deref(), Some("12500.00"));
    assert_eq!(record.payment_due_date.as_deref(), Some("2024-01-25"));
}

#[test]
fn icici_statement_is_complete() {
    let record = StatementPipeline::new().parse_text(ICICI_TEXT, "icici.pdf").record;

    assert_eq!(record.bank, Bank::Icici);
    assert_eq!(record.status, ExtractionStatus::Success);
    assert_eq!(record.cardholder_name.as_deref(), Some("MR Rahul Verma"));
    assert_eq!(record.card_number.as_deref(), Some("1005"));
    assert_eq!(record.credit_limit.as_deref(), Some("250000.00"));
    assert_eq!(record.total_due.as_deref(), Some("12345.67"));
    assert_eq!(record.payment_due_date.as_deref(), Some("2024-03-05"));
}

#[test]
fn axis_statement_is_partial() {
    let record = StatementPipeline::new()
        .parse_text(AXIS_PARTIAL_TEXT, "axis.pdf")
        .record;

    assert_eq!(record.bank, Bank::Axis);
    assert_eq!(record.status, ExtractionStatus::Partial);
    assert_eq!(record.cardholder_name.as_deref(), Some("RAHUL SHARMA"));
    assert_eq!(record.total_due.as_deref(), Some("5250.00"));
    assert_eq!(record.payment_due_date.as_deref(), Some("2024-02-20"));
    assert_eq!(
        record.errors,
        vec![
            "missing field: card_number".to_string(),
            "missing field: credit_limit".to_string(),
        ]
    );
}

#[test]
fn citi_statement_is_partial() {
    let record = StatementPipeline::new()
        .parse_text(CITI_PARTIAL_TEXT, "citi.pdf")
        .record;

    assert_eq!(record.bank, Bank::Citi);
    assert_eq!(record.status, ExtractionStatus::Partial);
    assert_eq!(record.card_number.as_deref(), Some("5678"));
    assert_eq!(record.total_due.as_deref(), Some("8450.00"));
    assert_eq!(record.payment_due_date.as_deref(), Some("2024-03-10"));
    assert_eq!(record.cardholder_name, None);
    assert_eq!(record.credit_limit, None);
}

#[test]
fn detected_bank_without_fields_is_partial() {
    let record = StatementPipeline::new()
        .parse_text("Welcome to Silk Bank.\nThank you for banking with us.", "silk.pdf")
        .record;

    assert_eq!(record.bank, Bank::Silk);
    assert_eq!(record.status, ExtractionStatus::Partial);
    assert_eq!(record.errors.len(), 5);
    for field in FieldName::ALL {
        assert_eq!(record.field(field), None);
    }
}

#[test]
fn page_markers_do_not_leak_into_fields() {
    let text = format!("--- Page 1 ---\n{}\n--- Page 2 ---\nEnd of statement", HDFC_TEXT);
    let record = StatementPipeline::new().parse_text(&text, "hdfc.pdf").record;
    assert_eq!(record.status, ExtractionStatus::Success);
}

#[test]
fn records_survive_csv() {
    let pipeline = StatementPipeline::new();
    let records = vec![
        pipeline.parse_text(HDFC_TEXT, "hdfc.pdf").record,
        pipeline.parse_text(AXIS_PARTIAL_TEXT, "axis.pdf").record,
    ];

    let parsed = from_csv(&to_csv(&records).unwrap()).unwrap();
    assert_eq!(parsed[0], records[0]);
    assert_eq!(parsed[1].card_number, None);
    assert_eq!(parsed[1].status, ExtractionStatus::Partial);
}

/// One-page PDF with a line of Helvetica text per entry in `lines`.
fn build_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("Td", vec![0.into(), (-18).into()]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn text_layer_is_extracted_from_generated_pdf() {
    let pdf = build_pdf(&[
        "HDFC Bank Credit Card Statement",
        "Total Amount Due: Rs. 15,000.00",
        "Thank you for banking with HDFC Bank Ltd",
    ]);

    let extracted = TextSource::default().extract(&pdf, None).unwrap();
    assert_eq!(extracted.method, ExtractionMethod::Embedded);
    assert_eq!(extracted.page_count, 1);
    assert!(extracted.text.starts_with("--- Page 1 ---"));
    assert!(extracted.text.contains("HDFC"));

    let record = StatementPipeline::new().process_pdf("generated.pdf", &pdf, None);
    assert_eq!(record.bank, Bank::Hdfc);
    assert_eq!(record.filename, "generated.pdf");
}

#[test]
fn unreadable_pdf_becomes_error_record() {
    let record = StatementPipeline::new().process_pdf("broken.pdf", b"%PDF-1.4\n%%EOF", None);
    assert_eq!(record.status, ExtractionStatus::Error);
    assert_eq!(record.bank, Bank::Unknown);
    assert_eq!(record.errors.len(), 1);
}
