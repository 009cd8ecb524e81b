use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::FactuurError;

/// Engine configuration, passed in explicitly at construction.
///
/// ```
/// use factuur::core::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{ "output_dir": "/tmp/facturen" }"#).unwrap();
/// assert_eq!(config.file_prefix, "Factuur");
/// assert_eq!(config.number_format.currency_symbol, "€");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory exported files are written to.
    pub output_dir: PathBuf,
    /// File name prefix for invoice exports, e.g. "Factuur" → `Factuur_BOL-NL….pdf`.
    pub file_prefix: String,
    /// Currency and locale rules for numeric output.
    pub number_format: NumberFormat,
    /// Fixed document texts.
    pub labels: Labels,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            file_prefix: "Factuur".into(),
            number_format: NumberFormat::default(),
            labels: Labels::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, FactuurError> {
        serde_json::from_str(json).map_err(|e| FactuurError::Config(e.to_string()))
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// Currency symbol and digit grouping for monetary values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub currency_symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            currency_symbol: "€".into(),
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

/// Fixed texts printed on invoices and reports.
///
/// Defaults are Dutch, matching the printed invoice layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub lang: String,
    /// Document name used in window/PDF titles, e.g. "Factuur BOL-NL…".
    pub document_name: String,
    pub invoice_title: String,
    pub number: String,
    pub date: String,
    pub due_date: String,
    pub order_reference: String,
    pub customer: String,
    /// Joins customer company and department, e.g. "Acme t.a.v. Finance".
    pub attention: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub registration_id: String,
    pub tax_number: String,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
    pub subtotal: String,
    /// Tax row label; `{rate}` is replaced by the formatted percentage.
    pub tax: String,
    pub total: String,
    pub support_prompt: String,
    pub report_title: String,
    pub report_period: String,
    pub report_generated: String,
    pub report_count: String,
    pub report_subtotal: String,
    pub report_tax: String,
    pub report_revenue: String,
    pub report_by_category: String,
    pub report_category: String,
    pub report_total: String,
    pub report_empty: String,
    pub report_footer: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            lang: "nl".into(),
            document_name: "Factuur".into(),
            invoice_title: "FACTUUR".into(),
            number: "Factuurnummer:".into(),
            date: "Datum:".into(),
            due_date: "Vervaldatum:".into(),
            order_reference: "Bestelnummer:".into(),
            customer: "Klantgegevens:".into(),
            attention: "t.a.v.".into(),
            phone: "Tel:".into(),
            email: "E-mail:".into(),
            website: "Website:".into(),
            registration_id: "KVK:".into(),
            tax_number: "BTW:".into(),
            description: "Omschrijving".into(),
            quantity: "Aantal".into(),
            unit_price: "Prijs (€)".into(),
            line_total: "Totaal (€)".into(),
            subtotal: "Subtotaal (excl. BTW):".into(),
            tax: "BTW ({rate}):".into(),
            total: "TOTAAL (incl. BTW):".into(),
            support_prompt: "Vragen over deze factuur? Mail ons via".into(),
            report_title: "Omzetrapport".into(),
            report_period: "Periode:".into(),
            report_generated: "Gegenereerd op:".into(),
            report_count: "Facturen".into(),
            report_subtotal: "Subtotaal".into(),
            report_tax: "BTW".into(),
            report_revenue: "Omzet".into(),
            report_by_category: "Per doel".into(),
            report_category: "Doel".into(),
            report_total: "Totaal".into(),
            report_empty: "Geen gegevens".into(),
            report_footer: "Invoice Manager".into(),
        }
    }
}

impl Labels {
    /// English texts.
    pub fn english() -> Self {
        Self {
            lang: "en".into(),
            document_name: "Invoice".into(),
            invoice_title: "INVOICE".into(),
            number: "Invoice number:".into(),
            date: "Date:".into(),
            due_date: "Due date:".into(),
            order_reference: "Order reference:".into(),
            customer: "Customer:".into(),
            attention: "attn.".into(),
            phone: "Tel:".into(),
            email: "E-mail:".into(),
            website: "Website:".into(),
            registration_id: "Reg. no.:".into(),
            tax_number: "VAT:".into(),
            description: "Description".into(),
            quantity: "Quantity".into(),
            unit_price: "Unit price".into(),
            line_total: "Line total".into(),
            subtotal: "Subtotal (excl. tax):".into(),
            tax: "Tax ({rate}):".into(),
            total: "TOTAL (incl. tax):".into(),
            support_prompt: "Questions about this invoice? Email us at".into(),
            report_title: "Revenue report".into(),
            report_period: "Period:".into(),
            report_generated: "Generated:".into(),
            report_count: "Invoices".into(),
            report_subtotal: "Subtotal".into(),
            report_tax: "Tax".into(),
            report_revenue: "Revenue".into(),
            report_by_category: "By category".into(),
            report_category: "Category".into(),
            report_total: "Total".into(),
            report_empty: "No data".into(),
            report_footer: "Invoice Manager".into(),
        }
    }

    /// Tax row label with the rate filled in.
    pub fn tax_label(&self, rate: &str) -> String {
        self.tax.replace("{rate}", rate)
    }
}
