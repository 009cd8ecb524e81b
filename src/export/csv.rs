//! Comma-separated invoice listing.

use rust_decimal::Decimal;

use crate::core::Invoice;

const HEADER: [&str; 7] = [
    "Factuurnummer",
    "Datum",
    "Klant",
    "Doel",
    "Subtotaal",
    "BTW",
    "Totaal",
];

/// One row per invoice, in the given order, CRLF line endings.
///
/// The customer column holds the company name, or the contact name for
/// private customers. Fields are quoted only when they contain a comma,
/// a quote or a line break.
pub fn export_csv(invoices: &[Invoice]) -> String {
    let mut out = String::new();
    write_row(&mut out, HEADER.iter().copied());
    for inv in invoices {
        let subtotal = csv_decimal(inv.subtotal);
        let tax = csv_decimal(inv.tax_amount);
        let total = csv_decimal(inv.total);
        write_row(
            &mut out,
            [
                inv.number.as_str(),
                inv.date.as_str(),
                inv.customer.display_name(),
                inv.purpose.as_str(),
                subtotal.as_str(),
                tax.as_str(),
                total.as_str(),
            ],
        );
    }
    out
}

fn write_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        csv_field(out, field);
    }
    out.push_str("\r\n");
}

fn csv_field(out: &mut String, value: &str) {
    if !value.contains([',', '"', '\r', '\n']) {
        out.push_str(value);
        return;
    }
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_decimal(d: Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}
