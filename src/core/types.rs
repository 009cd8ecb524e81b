use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category used when an invoice carries no purpose.
pub const OTHER_CATEGORY: &str = "Other";

/// Default tax rate in percent (Dutch standard BTW).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 0);

/// A single invoice line. The unit price already includes tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product or service description.
    pub name: String,
    /// Price per unit, tax inclusive.
    pub unit_price: Decimal,
    /// Quantity, may be fractional.
    pub quantity: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, unit_price: Decimal, quantity: Decimal) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Unrounded `unit_price * quantity`.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * self.quantity
    }
}

/// Customer block printed on the invoice. Empty strings mean "not given".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub company: String,
    pub department: String,
    /// Contact person.
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    /// Chamber of commerce / tax registration id.
    pub registration_id: String,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            company: String::new(),
            department: String::new(),
            name: String::new(),
            address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            country: "Netherlands".into(),
            phone: String::new(),
            email: String::new(),
            registration_id: String::new(),
        }
    }
}

impl Customer {
    /// Name shown in listings: the company, else the contact person.
    pub fn display_name(&self) -> &str {
        if self.company.trim().is_empty() {
            &self.name
        } else {
            &self.company
        }
    }
}

/// Raw invoice input as supplied by the caller.
///
/// Monetary totals are deliberately absent: they are always derived from
/// `items` and `tax_rate` when the draft is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// Identity of an existing invoice when re-saving; `None` creates one.
    pub id: Option<String>,
    /// Display number; `None` (or empty) lets the numbering authority assign one.
    pub number: Option<String>,
    pub date: String,
    pub due_date: String,
    /// Business purpose, used for categorization and number prefixing.
    pub purpose: String,
    pub order_reference: Option<String>,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    pub notes: Option<String>,
}

/// A persisted invoice record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Opaque identity, immutable once created.
    pub id: String,
    /// Display number, assigned once.
    pub number: String,
    pub date: String,
    pub due_date: String,
    pub purpose: String,
    pub order_reference: Option<String>,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    /// Total excluding tax.
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    /// Total including tax.
    pub total: Decimal,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    pub notes: Option<String>,
    /// Set at first save, never changed afterwards.
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Category for reporting: the purpose, or [`OTHER_CATEGORY`] when empty.
    pub fn category(&self) -> &str {
        let purpose = self.purpose.trim();
        if purpose.is_empty() {
            OTHER_CATEGORY
        } else {
            purpose
        }
    }

    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            total: self.total,
        }
    }
}

/// Derived monetary fields of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Total excluding tax.
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    /// Total including tax.
    pub total: Decimal,
}

/// Flat business settings: company identity, contact data, logo reference.
///
/// Keys are written one by one; the last write of a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    pub const COMPANY_NAME: &'static str = "company_name";
    pub const ADDRESS: &'static str = "address";
    pub const POSTAL_CODE: &'static str = "postal";
    pub const CITY: &'static str = "city";
    pub const PHONE: &'static str = "phone";
    pub const EMAIL: &'static str = "email";
    pub const WEBSITE: &'static str = "website";
    pub const REGISTRATION_ID: &'static str = "kvk";
    pub const TAX_NUMBER: &'static str = "btw_number";
    pub const SUPPORT_EMAIL: &'static str = "support_email";
    pub const LOGO_PATH: &'static str = "logo_path";

    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, or `""` when unset.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`Settings::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Apply every entry of `other` over `self`, key by key.
    pub fn merge(&mut self, other: Settings) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn company_name(&self) -> &str {
        self.get(Self::COMPANY_NAME)
    }

    /// Address line printed to customers for support questions.
    pub fn support_contact(&self) -> &str {
        match self.get(Self::SUPPORT_EMAIL) {
            "" => self.get(Self::EMAIL),
            support => support,
        }
    }

    pub fn logo_path(&self) -> Option<&str> {
        match self.get(Self::LOGO_PATH).trim() {
            "" => None,
            path => Some(path),
        }
    }
}

/// Per-category revenue aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub category: String,
    pub count: u64,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub revenue: Decimal,
}

/// Summary of a filtered invoice collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub count: u64,
    pub subtotal: Decimal,
    pub total_tax: Decimal,
    pub total_revenue: Decimal,
    /// Rows keyed by category, in category order.
    pub rows: BTreeMap<String, ReportRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_tax_rate_is_21() {
        assert_eq!(DEFAULT_TAX_RATE, dec!(21));
    }

    #[test]
    fn support_contact_falls_back_to_email() {
        let settings = Settings::new().with(Settings::EMAIL, "info@shop.nl");
        assert_eq!(settings.support_contact(), "info@shop.nl");

        let settings = settings.with(Settings::SUPPORT_EMAIL, "help@shop.nl");
        assert_eq!(settings.support_contact(), "help@shop.nl");
    }

    #[test]
    fn merge_is_last_write_wins() {
        let mut settings = Settings::new()
            .with(Settings::COMPANY_NAME, "Old BV")
            .with(Settings::CITY, "Utrecht");
        settings.merge(Settings::new().with(Settings::COMPANY_NAME, "New BV"));
        assert_eq!(settings.company_name(), "New BV");
        assert_eq!(settings.get(Settings::CITY), "Utrecht");
    }

    #[test]
    fn customer_display_name_prefers_company() {
        let mut customer = Customer {
            name: "Jan Jansen".into(),
            ..Customer::default()
        };
        assert_eq!(customer.display_name(), "Jan Jansen");
        customer.company = "Jansen BV".into();
        assert_eq!(customer.display_name(), "Jansen BV");
    }
}
