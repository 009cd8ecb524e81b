use rust_decimal::Decimal;

use super::tax::round_half_up;
use super::types::{Invoice, Report, ReportRow};

/// Fold a collection of invoices into overall and per-category sums.
///
/// The collection is taken as given; filtering by category or date range is
/// the store's job. Sums are exact; rounding happens at presentation time
/// (see [`Report::rounded`]).
pub fn aggregate(invoices: &[Invoice]) -> Report {
    invoices.iter().fold(Report::default(), |mut report, inv| {
        report.count += 1;
        report.subtotal += inv.subtotal;
        report.total_tax += inv.tax_amount;
        report.total_revenue += inv.total;

        let category = inv.category();
        let row = report
            .rows
            .entry(category.to_string())
            .or_insert_with(|| ReportRow {
                category: category.to_string(),
                count: 0,
                subtotal: Decimal::ZERO,
                tax_amount: Decimal::ZERO,
                revenue: Decimal::ZERO,
            });
        row.count += 1;
        row.subtotal += inv.subtotal;
        row.tax_amount += inv.tax_amount;
        row.revenue += inv.total;
        report
    })
}

impl Report {
    /// Copy with every monetary sum rounded to two decimals.
    pub fn rounded(&self) -> Report {
        Report {
            count: self.count,
            subtotal: round_half_up(self.subtotal, 2),
            total_tax: round_half_up(self.total_tax, 2),
            total_revenue: round_half_up(self.total_revenue, 2),
            rows: self
                .rows
                .iter()
                .map(|(k, row)| {
                    let row = ReportRow {
                        category: row.category.clone(),
                        count: row.count,
                        subtotal: round_half_up(row.subtotal, 2),
                        tax_amount: round_half_up(row.tax_amount, 2),
                        revenue: round_half_up(row.revenue, 2),
                    };
                    (k.clone(), row)
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
