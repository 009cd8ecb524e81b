//! Screen backend: serializes an [`InvoiceDocument`] to a standalone HTML page.
//!
//! The page is an A4 sheet with the footer absolutely positioned at the
//! bottom, so browser printing yields the same layout as the PDF backend.
//! Markup lives in `templates/invoice.html`; askama escapes every
//! interpolated value.

use askama::Template;

use super::logo::Branding;
use super::model::InvoiceDocument;

#[derive(Template)]
#[template(path = "invoice.html")]
struct ScreenPage<'a> {
    doc: &'a InvoiceDocument,
    col_description: &'a str,
    col_quantity: &'a str,
    col_unit_price: &'a str,
    col_line_total: &'a str,
}

impl<'a> ScreenPage<'a> {
    fn new(doc: &'a InvoiceDocument) -> Self {
        let [description, quantity, unit_price, line_total] = &doc.items.columns;
        Self {
            doc,
            col_description: description,
            col_quantity: quantity,
            col_unit_price: unit_price,
            col_line_total: line_total,
        }
    }
}

/// Render the screen document. Infallible and deterministic.
pub fn render_screen_document(doc: &InvoiceDocument) -> String {
    ScreenPage::new(doc).to_string()
}
