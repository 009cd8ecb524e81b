use thiserror::Error;

/// Errors that can occur while computing, storing, rendering or exporting invoices.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FactuurError {
    /// Totals could not be computed (overflow, division by zero).
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// No invoice exists under the given identity.
    #[error("invoice not found: {0}")]
    NotFound(String),

    /// The store rejected or failed an operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A render backend failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// File output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An uploaded file could not be decoded.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// Engine configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl FactuurError {
    /// True when a save failed because the display number is already taken.
    ///
    /// The caller is expected to generate a fresh number and retry.
    pub fn is_number_collision(&self) -> bool {
        matches!(self, Self::Store(StoreError::DuplicateNumber { .. }))
    }
}

/// Errors reported by an [`InvoiceStore`](crate::store::InvoiceStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Another invoice already holds this display number.
    #[error("invoice number {number} is already used by invoice {existing_id}")]
    DuplicateNumber { number: String, existing_id: String },

    /// Backend-specific failure (connection, constraint, corruption).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors raised by the paginated print backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Content could not be laid out on the page.
    #[error("layout failed: {0}")]
    Layout(String),

    /// The finished document could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// The backend is not available in this build or environment.
    #[error("print backend unavailable: {0}")]
    Unavailable(String),
}
