//! Revenue report as a standalone HTML page.

use askama::Template;
use chrono::NaiveDateTime;

use crate::core::{EngineConfig, Labels, Report};

#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage<'a> {
    labels: &'a Labels,
    period: &'a str,
    stamp: String,
    count: u64,
    subtotal: String,
    tax: String,
    revenue: String,
    rows: Vec<CategoryRow>,
}

struct CategoryRow {
    category: String,
    count: u64,
    subtotal: String,
    tax: String,
    revenue: String,
}

/// Render a revenue report.
///
/// `generated_at` is printed as the generation timestamp; passing it in
/// keeps the output a pure function of its inputs. A report without
/// category rows shows a placeholder row instead of an empty table.
pub fn render_report_document(
    report: &Report,
    period_label: &str,
    generated_at: NaiveDateTime,
    config: &EngineConfig,
) -> String {
    let fmt = &config.number_format;
    let report = report.rounded();

    let rows = report
        .rows
        .values()
        .map(|row| CategoryRow {
            category: row.category.clone(),
            count: row.count,
            subtotal: fmt.money(row.subtotal),
            tax: fmt.money(row.tax_amount),
            revenue: fmt.money(row.revenue),
        })
        .collect();

    ReportPage {
        labels: &config.labels,
        period: period_label,
        stamp: generated_at.format("%d-%m-%Y %H:%M").to_string(),
        count: report.count,
        subtotal: fmt.money(report.subtotal),
        tax: fmt.money(report.total_tax),
        revenue: fmt.money(report.total_revenue),
        rows,
    }
    .to_string()
}
