#![cfg(feature = "export")]

use chrono::NaiveDate;
use factuur::core::*;
use factuur::export::{ExportOutcome, Exporter, safe_file_stem};
use factuur::render::{InvoiceDocument, PrintBackend};
use factuur::store::{InvoiceFilter, InvoiceStore, MemoryStore, save_invoice};
use rust_decimal_macros::dec;
use tempfile::TempDir;

struct BrokenPrinter;

impl PrintBackend for BrokenPrinter {
    fn render(&self, _doc: &InvoiceDocument) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Unavailable("no print engine".into()))
    }

    fn extension(&self) -> &str {
        "pdf"
    }
}

fn settings() -> Settings {
    Settings::new()
        .with(Settings::COMPANY_NAME, "Shop BV")
        .with(Settings::SUPPORT_EMAIL, "help@shop.nl")
}

fn exporter(dir: &TempDir) -> (Exporter<MemoryStore>, Invoice) {
    let mut store = MemoryStore::with_settings(settings());
    let draft = InvoiceBuilder::new("2024-06-15")
        .number("BOL/NL:AB12\\0001")
        .purpose("BOL")
        .customer(CustomerBuilder::new("Jansen BV").build())
        .add_item(LineItem::new("Shirt", dec!(10.00), dec!(2)))
        .add_item(LineItem::new("Cap", dec!(5.50), dec!(1)))
        .build();
    let invoice = save_invoice(&mut store, &InvoiceNumbering::default(), draft).unwrap();
    let config = EngineConfig::default().with_output_dir(dir.path());
    (Exporter::new(store, config), invoice)
}

#[test]
fn invoice_document_for_unknown_id_is_not_found() {
    let dir = TempDir::new().unwrap();
    let (exporter, _) = exporter(&dir);
    assert!(matches!(
        exporter.invoice_document("missing"),
        Err(FactuurError::NotFound(id)) if id == "missing"
    ));
}

#[test]
fn invoice_document_renders_stored_invoice() {
    let dir = TempDir::new().unwrap();
    let (exporter, invoice) = exporter(&dir);
    let html = exporter.invoice_document(&invoice.id).unwrap();
    assert!(html.contains("€ 25,50"));
    assert!(html.contains("help@shop.nl"));
}

#[test]
fn pdf_export_writes_safe_file_name() {
    let dir = TempDir::new().unwrap();
    let (exporter, invoice) = exporter(&dir);
    let outcome = exporter.export_invoice_file(&invoice.id);

    assert!(outcome.is_success(), "{outcome:?}");
    assert!(!outcome.is_fallback());
    let path = outcome.path().unwrap();
    assert_eq!(
        path,
        dir.path().join(format!("Factuur_{}.pdf", safe_file_stem(&invoice.number)))
    );
    assert_eq!(path.file_name().unwrap(), "Factuur_BOL_NL_AB12_0001.pdf");
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn failing_print_backend_falls_back_to_html() {
    let dir = TempDir::new().unwrap();
    let (exporter, invoice) = exporter(&dir);
    let exporter = exporter.with_backend(Box::new(BrokenPrinter));
    let outcome = exporter.export_invoice_file(&invoice.id);

    assert!(outcome.is_success());
    assert!(outcome.is_fallback());
    assert!(matches!(
        outcome.error(),
        Some(FactuurError::Render(RenderError::Unavailable(_)))
    ));
    let path = outcome.path().unwrap();
    assert_eq!(path.extension().unwrap(), "html");
    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.trim_end().ends_with("</html>"));
    assert!(html.contains("€ 25,50"));
    assert!(!dir.path().join("Factuur_BOL_NL_AB12_0001.pdf").exists());
}

#[test]
fn fallback_removes_stale_print_output() {
    let dir = TempDir::new().unwrap();
    let (exporter, invoice) = exporter(&dir);
    let stale = dir.path().join("Factuur_BOL_NL_AB12_0001.pdf");
    std::fs::write(&stale, b"%PDF-1.5 trunc").unwrap();

    let outcome = exporter
        .with_backend(Box::new(BrokenPrinter))
        .export_invoice_file(&invoice.id);
    assert!(outcome.is_fallback());
    assert!(!stale.exists());
    assert!(dir.path().join("Factuur_BOL_NL_AB12_0001.html").exists());
}

#[test]
fn unwritable_print_path_falls_back_to_html() {
    let dir = TempDir::new().unwrap();
    let (exporter, invoice) = exporter(&dir);
    // a directory where the PDF should go makes the write fail
    std::fs::create_dir(dir.path().join("Factuur_BOL_NL_AB12_0001.pdf")).unwrap();

    let outcome = exporter.export_invoice_file(&invoice.id);
    assert!(outcome.is_fallback(), "{outcome:?}");
    assert!(matches!(outcome.error(), Some(FactuurError::Io(_))));
    assert_eq!(outcome.path().unwrap().extension().unwrap(), "html");
}

#[test]
fn unknown_invoice_export_fails_without_writing() {
    let dir = TempDir::new().unwrap();
    let (exporter, _) = exporter(&dir);
    let outcome = exporter.export_invoice_file("missing");
    assert!(!outcome.is_success());
    assert!(matches!(outcome, ExportOutcome::Failed(FactuurError::NotFound(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_logo_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let (mut exporter, invoice) = exporter(&dir);
    exporter
        .store_mut()
        .save_settings(Settings::new().with(Settings::LOGO_PATH, "/does/not/exist.png"))
        .unwrap();
    let html = exporter.invoice_document(&invoice.id).unwrap();
    assert!(html.contains(r#"<div class="brand-name">Shop BV</div>"#));
}

#[test]
fn uploaded_logo_is_used() {
    let dir = TempDir::new().unwrap();
    let (mut exporter, invoice) = exporter(&dir);
    // 8-byte PNG signature, base64
    let path = exporter
        .upload_logo("data:image/png;base64,iVBORw0KGgo=", "Logo.PNG")
        .unwrap();
    assert_eq!(path, dir.path().join("uploads").join("logo.png"));
    assert_eq!(
        exporter.store().settings().unwrap().logo_path(),
        Some(path.to_str().unwrap())
    );

    let html = exporter.invoice_document(&invoice.id).unwrap();
    assert!(html.contains(r#"<img class="logo" src="data:image/png;base64,iVBORw0KGgo="#));
}

#[test]
fn malformed_logo_upload_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (mut exporter, _) = exporter(&dir);
    let err = exporter
        .upload_logo("data:image/png;base64,!!!not base64!!!", "logo.png")
        .unwrap_err();
    assert!(matches!(err, FactuurError::InvalidUpload(_)));
    assert!(!dir.path().join("uploads").exists());
    assert_eq!(exporter.store().settings().unwrap().logo_path(), None);
}

#[test]
fn report_export() {
    let dir = TempDir::new().unwrap();
    let (exporter, _) = exporter(&dir);
    let generated = NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let report = exporter.report(&InvoiceFilter::all()).unwrap();
    assert_eq!(report.count, 1);
    assert_eq!(report.total_revenue, dec!(25.50));

    let markup = exporter
        .report_document(&InvoiceFilter::all().category("BOL"), "Alles", generated)
        .unwrap();
    let outcome = exporter.export_report_file(&markup, "rapport.html");
    let path = outcome.path().unwrap();
    assert_eq!(path, dir.path().join("rapport.html"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), markup);
}

#[test]
fn csv_listing_through_exporter() {
    let dir = TempDir::new().unwrap();
    let (exporter, invoice) = exporter(&dir);
    let csv = exporter.export_csv(&InvoiceFilter::all()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Factuurnummer,Datum,Klant,Doel,Subtotaal,BTW,Totaal")
    );
    assert_eq!(
        lines.next().unwrap(),
        format!("{},2024-06-15,Jansen BV,BOL,21.07,4.43,25.50", invoice.number)
    );
    assert_eq!(lines.next(), None);
}
