//! File export on top of a store and the renderers.
//!
//! [`Exporter`] is the outer surface: it loads invoices and settings from
//! an [`InvoiceStore`], renders them and writes files into the configured
//! output directory. Print output degrades to the screen rendering when
//! the print backend (or writing its output) fails.

mod csv;

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;

use crate::core::{EngineConfig, FactuurError, Invoice, Report, Settings, aggregate};
use crate::render::pdf::PdfBackend;
use crate::render::{
    InvoiceDocument, LogoSource, PrintBackend, invoice_document, render_report_document,
    render_screen_document,
};
use crate::store::{InvoiceFilter, InvoiceStore};

pub use csv::export_csv;

/// Result of writing a document to disk.
#[derive(Debug)]
pub enum ExportOutcome {
    /// The requested format was written.
    Written { path: PathBuf },
    /// The print output failed; the screen rendering was written instead.
    Fallback { path: PathBuf, reason: FactuurError },
    /// Nothing was written.
    Failed(FactuurError),
}

impl ExportOutcome {
    /// True when a file was written, including the fallback.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Path of the written file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Written { path } | Self::Fallback { path, .. } => Some(path.as_path()),
            Self::Failed(_) => None,
        }
    }

    /// The error that caused a fallback or failure.
    pub fn error(&self) -> Option<&FactuurError> {
        match self {
            Self::Written { .. } => None,
            Self::Fallback { reason, .. } => Some(reason),
            Self::Failed(e) => Some(e),
        }
    }
}

/// Replace path separators and drive colons so a display number can be
/// used as a file name.
pub fn safe_file_stem(name: &str) -> String {
    name.replace(['/', '\\', ':'], "_")
}

/// Export operations bound to one store and configuration.
pub struct Exporter<S> {
    store: S,
    config: EngineConfig,
    backend: Box<dyn PrintBackend>,
}

impl<S: InvoiceStore> Exporter<S> {
    /// Exporter printing with [`PdfBackend`].
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            backend: Box::new(PdfBackend::new()),
        }
    }

    /// Replace the print backend.
    pub fn with_backend(mut self, backend: Box<dyn PrintBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn load_invoice(&self, id: &str) -> Result<Invoice, FactuurError> {
        self.store
            .invoice(id)?
            .ok_or_else(|| FactuurError::NotFound(id.to_string()))
    }

    /// Read the configured logo file. Any failure means "no logo".
    fn load_logo(&self) -> Option<LogoSource> {
        let path = match self.store.logo_reference() {
            Ok(Some(path)) => path,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(error = %e, "logo reference unavailable");
                return None;
            }
        };
        match LogoSource::from_file(&path) {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "logo file unreadable");
                None
            }
        }
    }

    fn build_document(&self, invoice: &Invoice, settings: &Settings) -> InvoiceDocument {
        let logo = self.load_logo();
        invoice_document(invoice, settings, logo.as_ref(), &self.config)
    }

    /// Document model of a stored invoice.
    pub fn document(&self, id: &str) -> Result<InvoiceDocument, FactuurError> {
        let invoice = self.load_invoice(id)?;
        let settings = self.store.settings()?;
        Ok(self.build_document(&invoice, &settings))
    }

    /// Screen rendering of a stored invoice.
    pub fn invoice_document(&self, id: &str) -> Result<String, FactuurError> {
        Ok(render_screen_document(&self.document(id)?))
    }

    /// Write the print rendering of an invoice to
    /// `{output_dir}/{file_prefix}_{number}.{ext}`.
    ///
    /// When rendering or writing the print output fails, the screen
    /// rendering is written next to it with an `html` extension.
    pub fn export_invoice_file(&self, id: &str) -> ExportOutcome {
        let loaded = self.load_invoice(id).and_then(|invoice| {
            let settings = self.store.settings()?;
            Ok((invoice, settings))
        });
        let (invoice, settings) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => return ExportOutcome::Failed(e),
        };
        let doc = self.build_document(&invoice, &settings);

        let dir = &self.config.output_dir;
        if let Err(e) = fs::create_dir_all(dir) {
            return ExportOutcome::Failed(e.into());
        }
        let stem = format!(
            "{}_{}",
            self.config.file_prefix,
            safe_file_stem(&invoice.number)
        );

        let print_path = dir.join(format!("{stem}.{}", self.backend.extension()));
        let reason = match self.backend.render(&doc) {
            Ok(bytes) => match fs::write(&print_path, bytes) {
                Ok(()) => {
                    tracing::info!(number = %invoice.number, path = %print_path.display(), "invoice exported");
                    return ExportOutcome::Written { path: print_path };
                }
                Err(e) => FactuurError::Io(e),
            },
            Err(e) => FactuurError::Render(e),
        };

        tracing::warn!(number = %invoice.number, error = %reason, "print export failed, writing HTML instead");
        if let Err(e) = fs::remove_file(&print_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %print_path.display(), error = %e, "could not remove partial print output");
            }
        }
        let html_path = dir.join(format!("{stem}.html"));
        match fs::write(&html_path, render_screen_document(&doc)) {
            Ok(()) => {
                tracing::info!(number = %invoice.number, path = %html_path.display(), "invoice exported as HTML");
                ExportOutcome::Fallback {
                    path: html_path,
                    reason,
                }
            }
            Err(e) => ExportOutcome::Failed(e.into()),
        }
    }

    /// Aggregate the invoices matching `filter`.
    pub fn report(&self, filter: &InvoiceFilter) -> Result<Report, FactuurError> {
        Ok(aggregate(&self.store.query(filter)?))
    }

    /// Rendered revenue report for `filter`.
    pub fn report_document(
        &self,
        filter: &InvoiceFilter,
        period_label: &str,
        generated_at: NaiveDateTime,
    ) -> Result<String, FactuurError> {
        let report = self.report(filter)?;
        Ok(render_report_document(
            &report,
            period_label,
            generated_at,
            &self.config,
        ))
    }

    /// Write report markup to `{output_dir}/{filename}`.
    pub fn export_report_file(&self, markup: &str, filename: &str) -> ExportOutcome {
        let dir = &self.config.output_dir;
        let path = dir.join(safe_file_stem(filename));
        match fs::create_dir_all(dir).and_then(|()| fs::write(&path, markup)) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "report exported");
                ExportOutcome::Written { path }
            }
            Err(e) => ExportOutcome::Failed(e.into()),
        }
    }

    /// CSV listing of the invoices matching `filter`, newest first.
    pub fn export_csv(&self, filter: &InvoiceFilter) -> Result<String, FactuurError> {
        Ok(export_csv(&self.store.query(filter)?))
    }

    /// Store an uploaded logo as `{output_dir}/uploads/logo.{ext}` and point
    /// the logo setting at it.
    ///
    /// `data` is a base64 payload, optionally with a `data:` header. The
    /// extension is taken from `filename`.
    pub fn upload_logo(&mut self, data: &str, filename: &str) -> Result<PathBuf, FactuurError> {
        let payload = data.split_once(',').map_or(data, |(_, payload)| payload);
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| FactuurError::InvalidUpload(format!("logo is not valid base64: {e}")))?;

        let extension = filename
            .rsplit_once('.')
            .map_or(filename, |(_, ext)| ext)
            .to_ascii_lowercase();
        let dir = self.config.output_dir.join("uploads");
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("logo.{}", safe_file_stem(&extension)));
        fs::write(&path, bytes)?;

        let path_value = path.to_string_lossy().into_owned();
        self.store
            .save_settings(Settings::new().with(Settings::LOGO_PATH, path_value))?;
        tracing::info!(path = %path.display(), "logo uploaded");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_stem_replaces_separators() {
        assert_eq!(safe_file_stem("BOL-NL/AB:12\\0001"), "BOL-NL_AB_12_0001");
        assert_eq!(safe_file_stem("BOL-NLAB120001"), "BOL-NLAB120001");
    }

    #[test]
    fn outcome_accessors() {
        let written = ExportOutcome::Written {
            path: PathBuf::from("a.pdf"),
        };
        assert!(written.is_success());
        assert!(!written.is_fallback());
        assert_eq!(written.path(), Some(Path::new("a.pdf")));
        assert!(written.error().is_none());

        let failed = ExportOutcome::Failed(FactuurError::NotFound("x".into()));
        assert!(!failed.is_success());
        assert!(failed.path().is_none());
        assert!(matches!(failed.error(), Some(FactuurError::NotFound(_))));
    }
}
