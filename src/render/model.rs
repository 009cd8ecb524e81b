//! Backend-neutral invoice document.
//!
//! All text, including every formatted number, is produced here once. The
//! screen and print adapters only place these strings, so both outputs
//! always show the same values.

use serde::{Deserialize, Serialize};

use crate::core::{EngineConfig, Invoice, Settings, round_half_up};

use super::format::{percent, quantity};
use super::logo::Branding;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    /// `lang` attribute for markup output.
    pub lang: String,
    /// Window / PDF metadata title, e.g. "Factuur BOL-NLAB120001".
    pub document_title: String,
    pub header: HeaderBlock,
    pub info: InfoBlock,
    pub items: ItemsTable,
    pub totals: TotalsBlock,
    pub notes: Option<String>,
    pub footer: Footer,
}

/// Logo or company name on the left, document title on the right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub branding: Branding,
    /// Shown in place of a logo that a backend cannot embed.
    pub company_name: String,
    pub title: String,
}

/// Company contact lines on the left; metadata and customer on the right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoBlock {
    pub company_lines: Vec<String>,
    pub meta: Vec<MetaRow>,
    pub customer_label: String,
    pub customer_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsTable {
    /// Description, quantity, unit price, line total.
    pub columns: [String; 4],
    pub rows: Vec<ItemRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsBlock {
    /// Subtotal, tax, grand total, in that order.
    pub rows: Vec<TotalsRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsRow {
    pub label: String,
    pub value: String,
    /// Drawn inverted (dark background, light text).
    pub emphasized: bool,
}

/// Support line pinned to the bottom of every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    pub text: String,
}

impl InvoiceDocument {
    /// Project an invoice, its business settings and resolved branding into
    /// the shared document model.
    pub fn build(
        invoice: &Invoice,
        settings: &Settings,
        branding: Branding,
        config: &EngineConfig,
    ) -> Self {
        let labels = &config.labels;
        let fmt = &config.number_format;

        let mut meta = vec![
            MetaRow::new(&labels.number, &invoice.number),
            MetaRow::new(&labels.date, &invoice.date),
            MetaRow::new(&labels.due_date, &invoice.due_date),
        ];
        if let Some(reference) = invoice
            .order_reference
            .as_deref()
            .filter(|r| !r.trim().is_empty())
        {
            meta.push(MetaRow::new(&labels.order_reference, reference));
        }

        let rows = invoice
            .items
            .iter()
            .map(|item| ItemRow {
                description: item.name.clone(),
                quantity: quantity(item.quantity),
                unit_price: fmt.money(item.unit_price),
                line_total: fmt.money(round_half_up(item.line_total(), 2)),
            })
            .collect();

        let totals = TotalsBlock {
            rows: vec![
                TotalsRow::plain(&labels.subtotal, fmt.money(invoice.subtotal)),
                TotalsRow::plain(
                    labels.tax_label(&percent(invoice.tax_rate)),
                    fmt.money(invoice.tax_amount),
                ),
                TotalsRow {
                    label: labels.total.clone(),
                    value: fmt.money(invoice.total),
                    emphasized: true,
                },
            ],
        };

        Self {
            lang: labels.lang.clone(),
            document_title: format!("{} {}", labels.document_name, invoice.number),
            header: HeaderBlock {
                branding,
                company_name: settings.company_name().to_string(),
                title: labels.invoice_title.clone(),
            },
            info: InfoBlock {
                company_lines: company_lines(settings, config),
                meta,
                customer_label: labels.customer.clone(),
                customer_lines: customer_lines(invoice, config),
            },
            items: ItemsTable {
                columns: [
                    labels.description.clone(),
                    labels.quantity.clone(),
                    labels.unit_price.clone(),
                    labels.line_total.clone(),
                ],
                rows,
            },
            totals,
            notes: invoice
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
            footer: Footer {
                text: format!("{} {}", labels.support_prompt, settings.support_contact()),
            },
        }
    }
}

impl MetaRow {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

impl TotalsRow {
    fn plain(label: impl Into<String>, value: String) -> Self {
        Self {
            label: label.into(),
            value,
            emphasized: false,
        }
    }
}

fn company_lines(settings: &Settings, config: &EngineConfig) -> Vec<String> {
    let labels = &config.labels;
    let mut lines = Vec::new();
    push_nonempty(&mut lines, settings.get(Settings::ADDRESS));
    push_nonempty(
        &mut lines,
        &join_postal(settings.get(Settings::POSTAL_CODE), settings.get(Settings::CITY)),
    );
    let labelled = [
        (&labels.phone, Settings::PHONE),
        (&labels.email, Settings::EMAIL),
        (&labels.website, Settings::WEBSITE),
        (&labels.registration_id, Settings::REGISTRATION_ID),
        (&labels.tax_number, Settings::TAX_NUMBER),
    ];
    for (label, key) in labelled {
        let value = settings.get(key).trim();
        if !value.is_empty() {
            lines.push(format!("{label} {value}"));
        }
    }
    lines
}

fn customer_lines(invoice: &Invoice, config: &EngineConfig) -> Vec<String> {
    let customer = &invoice.customer;
    let company = customer.company.trim();
    let department = customer.department.trim();

    let mut lines = Vec::new();
    if !company.is_empty() {
        if department.is_empty() {
            lines.push(company.to_string());
        } else {
            lines.push(format!("{company} {} {department}", config.labels.attention));
        }
    }
    push_nonempty(&mut lines, &customer.name);
    push_nonempty(&mut lines, &customer.address);
    push_nonempty(
        &mut lines,
        &join_postal(&customer.postal_code, &customer.city),
    );
    push_nonempty(&mut lines, &customer.country);
    lines
}

fn join_postal(postal_code: &str, city: &str) -> String {
    format!("{} {}", postal_code.trim(), city.trim())
        .trim()
        .to_string()
}

fn push_nonempty(lines: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        lines.push(value.to_string());
    }
}
