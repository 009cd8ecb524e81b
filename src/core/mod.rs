//! Core invoice types, numbering, tax arithmetic and revenue aggregation.
//!
//! Prices are tax-inclusive; subtotal and tax are extracted from the total,
//! never added to it.

mod builder;
mod config;
mod error;
mod numbering;
mod report;
mod tax;
mod types;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use numbering::*;
pub use report::*;
pub use tax::compute_totals;
pub use types::*;

pub(crate) use tax::round_half_up;
