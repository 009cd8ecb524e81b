//! Aggregate a quarter of invoices and write the revenue report and CSV.
//!
//! Run with: `cargo run --example revenue_report -- [output-dir]`

use chrono::Local;
use factuur::core::*;
use factuur::export::Exporter;
use factuur::store::{InvoiceFilter, MemoryStore, save_invoice};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), FactuurError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    let output_dir = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("factuur-demo"));

    let mut store = MemoryStore::with_settings(
        Settings::new().with(Settings::COMPANY_NAME, "Stoffenwinkel De Draad"),
    );
    let numbering = InvoiceNumbering::default();
    let sales = [
        ("2024-04-03", "BOL", dec!(49.95), dec!(2)),
        ("2024-04-19", "Best4Juniors", dec!(24.50), dec!(4)),
        ("2024-05-02", "BOL", dec!(129.00), dec!(1)),
        ("2024-05-28", "", dec!(15.00), dec!(3)),
        ("2024-06-11", "Best4Juniors", dec!(8.75), dec!(10)),
        ("2024-07-01", "BOL", dec!(99.00), dec!(1)),
    ];
    for (date, purpose, price, quantity) in sales {
        let draft = InvoiceBuilder::new(date)
            .purpose(purpose)
            .customer(CustomerBuilder::new("Klant BV").build())
            .add_item(LineItem::new("Stof", price, quantity))
            .build();
        save_invoice(&mut store, &numbering, draft)?;
    }

    let exporter = Exporter::new(store, EngineConfig::default().with_output_dir(output_dir));
    let q2 = InvoiceFilter::all().between("2024-04-01", "2024-06-30");

    let report = exporter.report(&q2)?.rounded();
    println!("Q2 2024: {} invoices, revenue {}", report.count, report.total_revenue);
    for row in report.rows.values() {
        println!("  {:<14} {:>3} {:>10}", row.category, row.count, row.revenue);
    }

    let markup = exporter.report_document(&q2, "Q2 2024", Local::now().naive_local())?;
    let outcome = exporter.export_report_file(&markup, "Omzetrapport_2024-Q2.html");
    if let Some(e) = outcome.error() {
        eprintln!("report export failed: {e}");
    }
    if let Some(path) = outcome.path() {
        println!("report written to {}", path.display());
    }

    print!("{}", exporter.export_csv(&q2)?);
    Ok(())
}
