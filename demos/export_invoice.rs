//! Save an invoice into an in-memory store and export it as PDF.
//!
//! Run with: `cargo run --example export_invoice -- [output-dir]`
//! Set `RUST_LOG=debug` to see logo and layout decisions.

use factuur::core::*;
use factuur::export::{ExportOutcome, Exporter};
use factuur::store::{MemoryStore, save_invoice};
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

    let settings = Settings::new()
        .with(Settings::COMPANY_NAME, "Stoffenwinkel De Draad")
        .with(Settings::ADDRESS, "Langestraat 12")
        .with(Settings::POSTAL_CODE, "3811 AB")
        .with(Settings::CITY, "Amersfoort")
        .with(Settings::PHONE, "033-1234567")
        .with(Settings::EMAIL, "info@dedraad.nl")
        .with(Settings::REGISTRATION_ID, "12345678")
        .with(Settings::TAX_NUMBER, "NL001234567B01")
        .with(Settings::SUPPORT_EMAIL, "support@dedraad.nl");
    let mut store = MemoryStore::with_settings(settings);

    let draft = InvoiceBuilder::new("2024-06-15")
        .due_date("2024-07-15")
        .purpose("BOL")
        .order_reference("BOL-ORD-88231")
        .customer(
            CustomerBuilder::new("Jansen Mode BV")
                .department("Inkoop")
                .contact("P. Jansen")
                .address("Oudegracht 200")
                .postal_code("3511 NR")
                .city("Utrecht")
                .build(),
        )
        .add_item(LineItem::new("Katoen, blauw (per meter)", dec!(7.95), dec!(12)))
        .add_item(LineItem::new("Fourniturenpakket", dec!(14.50), dec!(3)))
        .add_item(LineItem::new("Verzendkosten", dec!(6.95), dec!(1)))
        .notes("Betaling binnen 30 dagen onder vermelding van het factuurnummer.")
        .build();
    let invoice = save_invoice(&mut store, &InvoiceNumbering::default(), draft)?;
    println!(
        "{}: subtotal {} + tax {} = total {}",
        invoice.number, invoice.subtotal, invoice.tax_amount, invoice.total
    );

    let exporter = Exporter::new(store, EngineConfig::default().with_output_dir(output_dir));
    match exporter.export_invoice_file(&invoice.id) {
        ExportOutcome::Written { path } => println!("written to {}", path.display()),
        ExportOutcome::Fallback { path, reason } => {
            println!("PDF failed ({reason}), HTML written to {}", path.display())
        }
        ExportOutcome::Failed(e) => return Err(e),
    }
    Ok(())
}
