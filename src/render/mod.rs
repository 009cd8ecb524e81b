//! Document rendering.
//!
//! An invoice is first projected into an [`InvoiceDocument`] holding the
//! header, info block, items table, totals, notes and footer with every
//! value already formatted. Two adapters consume that model:
//!
//! | Adapter | Output | Failure |
//! |---------|--------|---------|
//! | [`render_screen_document`] | HTML page | never fails |
//! | `pdf::PdfBackend` (feature `pdf`) | paginated A4 PDF | [`RenderError`] |
//!
//! Visual changes are made once, in the model or the shared formatting.

mod format;
mod html;
mod logo;
mod model;
mod report;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use format::{percent, quantity};
pub use html::render_screen_document;
pub use logo::{Branding, ImageKind, LogoImage, LogoSource, resolve_branding};
pub use model::*;
pub use report::render_report_document;

use crate::core::{EngineConfig, Invoice, RenderError, Settings};

/// A backend producing a paginated, fixed-layout binary document.
pub trait PrintBackend {
    /// Render the document to bytes.
    fn render(&self, doc: &InvoiceDocument) -> Result<Vec<u8>, RenderError>;

    /// Native file extension of the output, without dot.
    fn extension(&self) -> &str;
}

/// Build the document model for an invoice, resolving the optional logo.
pub fn invoice_document(
    invoice: &Invoice,
    settings: &Settings,
    logo: Option<&LogoSource>,
    config: &EngineConfig,
) -> InvoiceDocument {
    let branding = resolve_branding(logo, settings.company_name());
    InvoiceDocument::build(invoice, settings, branding, config)
}

/// Screen rendering of an invoice in one call.
pub fn render_invoice_html(
    invoice: &Invoice,
    settings: &Settings,
    logo: Option<&LogoSource>,
    config: &EngineConfig,
) -> String {
    render_screen_document(&invoice_document(invoice, settings, logo, config))
}

/// Print rendering of an invoice in one call.
pub fn render_invoice_print(
    backend: &dyn PrintBackend,
    invoice: &Invoice,
    settings: &Settings,
    logo: Option<&LogoSource>,
    config: &EngineConfig,
) -> Result<Vec<u8>, RenderError> {
    backend.render(&invoice_document(invoice, settings, logo, config))
}
