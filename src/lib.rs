//! # factuur
//!
//! Invoice calculation and document rendering engine: tax-inclusive totals,
//! display numbering, revenue reports, and invoice documents rendered as a
//! standalone HTML page or a paginated A4 PDF.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Prices are entered including tax; subtotal and tax are extracted from
//! the rounded total so that `subtotal + tax == total` always holds.
//!
//! ## Quick Start
//!
//! ```rust
//! use factuur::core::*;
//! use factuur::store::{MemoryStore, save_invoice};
//! use rust_decimal_macros::dec;
//!
//! let mut store = MemoryStore::new();
//! let draft = InvoiceBuilder::new("2024-06-15")
//!     .purpose("BOL")
//!     .customer(CustomerBuilder::new("Jansen BV").city("Utrecht").build())
//!     .add_item(LineItem::new("Shirt", dec!(10.00), dec!(2)))
//!     .add_item(LineItem::new("Cap", dec!(5.50), dec!(1)))
//!     .build();
//!
//! let invoice = save_invoice(&mut store, &InvoiceNumbering::default(), draft).unwrap();
//! assert_eq!(invoice.total, dec!(25.50));
//! assert_eq!(invoice.subtotal, dec!(21.07));
//! assert_eq!(invoice.tax_amount, dec!(4.43));
//! assert!(invoice.number.starts_with("BOL-NL"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Types, tax arithmetic, numbering, reports, store contract |
//! | `html` (default) | Document model, HTML invoice and report rendering |
//! | `pdf` (default) | Paginated PDF backend |
//! | `export` (default) | File export with HTML fallback, CSV listing |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod store;

#[cfg(feature = "html")]
pub mod render;

#[cfg(feature = "export")]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
