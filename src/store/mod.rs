//! Persistence contract the engine relies on, plus an in-memory store.
//!
//! The real store (a single keyed table with simple filters) lives outside
//! this crate; [`InvoiceStore`] captures exactly what the engine needs from
//! it. [`save_invoice`] is the save path: totals are recomputed from the
//! items on every save and a duplicate display number fails the save.

mod memory;

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{
    FactuurError, Invoice, InvoiceDraft, InvoiceNumbering, Settings, StoreError, compute_totals,
};

pub use memory::MemoryStore;

/// Filter applied by [`InvoiceStore::query`].
///
/// Dates are compared as strings, so ISO `YYYY-MM-DD` values order correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceFilter {
    /// Purpose to match exactly; `None`, `""` or `"all"` match everything.
    pub category: Option<String>,
    /// Inclusive lower bound on the invoice date.
    pub date_from: Option<String>,
    /// Inclusive upper bound on the invoice date.
    pub date_to: Option<String>,
}

impl InvoiceFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn between(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_from = Some(from.into());
        self.date_to = Some(to.into());
        self
    }

    /// Whether `invoice` passes this filter.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        if let Some(category) = self.category.as_deref() {
            if !category.is_empty() && category != "all" && invoice.purpose != category {
                return false;
            }
        }
        if let Some(from) = self.date_from.as_deref().filter(|d| !d.is_empty()) {
            if invoice.date.as_str() < from {
                return false;
            }
        }
        if let Some(to) = self.date_to.as_deref().filter(|d| !d.is_empty()) {
            if invoice.date.as_str() > to {
                return false;
            }
        }
        true
    }
}

/// Storage collaborator.
pub trait InvoiceStore {
    /// Number of stored invoices.
    fn invoice_count(&self) -> Result<usize, StoreError>;

    fn invoice(&self, id: &str) -> Result<Option<Invoice>, StoreError>;

    /// Matching invoices, newest created first.
    fn query(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, StoreError>;

    /// Insert or replace by id. Must fail with [`StoreError::DuplicateNumber`]
    /// when another invoice already holds the display number.
    fn save(&mut self, invoice: Invoice) -> Result<String, StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    fn settings(&self) -> Result<Settings, StoreError>;

    /// Persist settings key by key, last write wins.
    fn save_settings(&mut self, settings: Settings) -> Result<(), StoreError>;

    /// Location of the uploaded logo, if any.
    fn logo_reference(&self) -> Result<Option<PathBuf>, StoreError> {
        Ok(self.settings()?.logo_path().map(PathBuf::from))
    }
}

/// Save a draft, deriving every computed field.
///
/// - subtotal, tax and total are recomputed from `items` and `tax_rate`
/// - a new identity is generated when the draft has none
/// - an existing invoice keeps its display number and `created_at`
/// - a new invoice without number gets one from `numbering`
///
/// Arithmetic failures abort before anything is written. A duplicate
/// display number is returned as an error for which
/// [`FactuurError::is_number_collision`] is true.
pub fn save_invoice<S>(
    store: &mut S,
    numbering: &InvoiceNumbering,
    draft: InvoiceDraft,
) -> Result<Invoice, FactuurError>
where
    S: InvoiceStore + ?Sized,
{
    let totals = compute_totals(&draft.items, draft.tax_rate)?;

    let id = draft
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let existing = store.invoice(&id)?;

    let (number, created_at) = match existing {
        Some(prev) if !prev.number.is_empty() => (prev.number, prev.created_at),
        prev => {
            let number = match draft.number.filter(|n| !n.trim().is_empty()) {
                Some(number) => number,
                None => numbering.next_number(&draft.purpose, store.invoice_count()?),
            };
            let created_at = prev.map(|p| p.created_at).unwrap_or_else(Utc::now);
            (number, created_at)
        }
    };

    let invoice = Invoice {
        id,
        number,
        date: draft.date,
        due_date: draft.due_date,
        purpose: draft.purpose,
        order_reference: draft.order_reference.filter(|r| !r.trim().is_empty()),
        customer: draft.customer,
        items: draft.items,
        subtotal: totals.subtotal,
        tax_amount: totals.tax_amount,
        total: totals.total,
        tax_rate: draft.tax_rate,
        notes: draft.notes.filter(|n| !n.trim().is_empty()),
        created_at,
    };

    store.save(invoice.clone())?;
    tracing::info!(
        id = %invoice.id,
        number = %invoice.number,
        total = %invoice.total,
        "invoice saved"
    );
    Ok(invoice)
}
