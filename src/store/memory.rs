use crate::core::{Invoice, Settings, StoreError};

use super::{InvoiceFilter, InvoiceStore};

/// Process-local [`InvoiceStore`].
///
/// Enforces the same constraints as the persistent store: identity is the
/// primary key, the display number is unique, queries return the newest
/// created invoice first.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Insertion order; replaced records keep their slot.
    invoices: Vec<Invoice>,
    settings: Settings,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            invoices: Vec::new(),
            settings,
        }
    }
}

impl InvoiceStore for MemoryStore {
    fn invoice_count(&self) -> Result<usize, StoreError> {
        Ok(self.invoices.len())
    }

    fn invoice(&self, id: &str) -> Result<Option<Invoice>, StoreError> {
        Ok(self.invoices.iter().find(|inv| inv.id == id).cloned())
    }

    fn query(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, StoreError> {
        let mut matches: Vec<Invoice> = self
            .invoices
            .iter()
            .rev()
            .filter(|inv| filter.matches(inv))
            .cloned()
            .collect();
        // stable: equal timestamps stay newest-inserted first
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    fn save(&mut self, invoice: Invoice) -> Result<String, StoreError> {
        if let Some(holder) = self
            .invoices
            .iter()
            .find(|inv| inv.number == invoice.number && inv.id != invoice.id)
        {
            return Err(StoreError::DuplicateNumber {
                number: invoice.number,
                existing_id: holder.id.clone(),
            });
        }

        let id = invoice.id.clone();
        match self.invoices.iter_mut().find(|inv| inv.id == id) {
            Some(slot) => *slot = invoice,
            None => self.invoices.push(invoice),
        }
        Ok(id)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.invoices.retain(|inv| inv.id != id);
        Ok(())
    }

    fn settings(&self) -> Result<Settings, StoreError> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: Settings) -> Result<(), StoreError> {
        self.settings.merge(settings);
        Ok(())
    }
}
