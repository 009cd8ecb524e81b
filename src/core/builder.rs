use rust_decimal::Decimal;

use super::types::*;

/// Builder for invoice drafts.
///
/// ```
/// use factuur::core::*;
/// use rust_decimal_macros::dec;
///
/// let draft = InvoiceBuilder::new("2024-06-15")
///     .due_date("2024-07-15")
///     .purpose("BOL")
///     .customer(CustomerBuilder::new("Jansen BV").city("Utrecht").build())
///     .add_item(LineItem::new("Training", dec!(121.00), dec!(2)))
///     .build();
///
/// assert_eq!(draft.tax_rate, dec!(21));
/// assert!(draft.number.is_none());
/// ```
pub struct InvoiceBuilder {
    id: Option<String>,
    number: Option<String>,
    date: String,
    due_date: String,
    purpose: String,
    order_reference: Option<String>,
    customer: Customer,
    items: Vec<LineItem>,
    tax_rate: Decimal,
    notes: Option<String>,
}

impl InvoiceBuilder {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            id: None,
            number: None,
            date: date.into(),
            due_date: String::new(),
            purpose: String::new(),
            order_reference: None,
            customer: Customer::default(),
            items: Vec::new(),
            tax_rate: DEFAULT_TAX_RATE,
            notes: None,
        }
    }

    /// Re-save an existing invoice under its identity.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn due_date(mut self, date: impl Into<String>) -> Self {
        self.due_date = date.into();
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn order_reference(mut self, reference: impl Into<String>) -> Self {
        self.order_reference = Some(reference.into());
        self
    }

    pub fn customer(mut self, customer: Customer) -> Self {
        self.customer = customer;
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn build(self) -> InvoiceDraft {
        InvoiceDraft {
            id: self.id,
            number: self.number,
            date: self.date,
            due_date: self.due_date,
            purpose: self.purpose,
            order_reference: self.order_reference,
            customer: self.customer,
            items: self.items,
            tax_rate: self.tax_rate,
            notes: self.notes,
        }
    }
}

/// Builder for [`Customer`].
pub struct CustomerBuilder {
    customer: Customer,
}

impl CustomerBuilder {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            customer: Customer {
                company: company.into(),
                ..Customer::default()
            },
        }
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.customer.department = department.into();
        self
    }

    pub fn contact(mut self, name: impl Into<String>) -> Self {
        self.customer.name = name.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.customer.address = address.into();
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.customer.postal_code = postal_code.into();
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.customer.city = city.into();
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.customer.country = country.into();
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.customer.phone = phone.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.customer.email = email.into();
        self
    }

    pub fn registration_id(mut self, id: impl Into<String>) -> Self {
        self.customer.registration_id = id.into();
        self
    }

    pub fn build(self) -> Customer {
        self.customer
    }
}
