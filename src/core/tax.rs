use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::FactuurError;
use super::types::{LineItem, Totals};

/// Derive subtotal, tax and total from tax-inclusive line items.
///
/// The total is the rounded sum of `unit_price * quantity`. The subtotal is
/// extracted from the rounded total by dividing through `1 + rate/100`, and
/// the tax is whatever remains, so `subtotal + tax_amount == total` holds
/// exactly at two decimals.
///
/// ```
/// use factuur::core::*;
/// use rust_decimal_macros::dec;
///
/// let items = vec![
///     LineItem::new("Shirt", dec!(10.00), dec!(2)),
///     LineItem::new("Cap", dec!(5.50), dec!(1)),
/// ];
/// let totals = compute_totals(&items, dec!(21)).unwrap();
/// assert_eq!(totals.total, dec!(25.50));
/// assert_eq!(totals.subtotal, dec!(21.07));
/// assert_eq!(totals.tax_amount, dec!(4.43));
/// ```
pub fn compute_totals(items: &[LineItem], tax_rate: Decimal) -> Result<Totals, FactuurError> {
    let mut sum = Decimal::ZERO;
    for item in items {
        let line = item.unit_price.checked_mul(item.quantity).ok_or_else(|| {
            FactuurError::Arithmetic(format!("line amount overflows for item '{}'", item.name))
        })?;
        sum = sum
            .checked_add(line)
            .ok_or_else(|| FactuurError::Arithmetic("invoice total overflows".into()))?;
    }
    let total = round_half_up(sum, 2);

    let divisor = Decimal::ONE + tax_rate / dec!(100);
    let net = total.checked_div(divisor).ok_or_else(|| {
        FactuurError::Arithmetic(format!("tax rate {tax_rate}% yields a zero divisor"))
    })?;
    let subtotal = round_half_up(net, 2);
    let tax_amount = total - subtotal;

    Ok(Totals {
        subtotal,
        tax_amount,
        total,
    })
}

/// Round half away from zero.
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
