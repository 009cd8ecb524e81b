//! Locale formatting shared by every backend.

use rust_decimal::Decimal;

use crate::core::{NumberFormat, round_half_up};

impl NumberFormat {
    /// Monetary value with currency symbol: `€ 1.234,56`.
    pub fn money(&self, value: Decimal) -> String {
        format!("{} {}", self.currency_symbol, self.amount(value))
    }

    /// Two-decimal amount with digit grouping, no symbol: `1.234,56`.
    pub fn amount(&self, value: Decimal) -> String {
        let rounded = round_half_up(value, 2);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let plain = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut out = String::with_capacity(plain.len() + plain.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(self.thousands_separator);
            }
            out.push(ch);
        }
        out.push(self.decimal_separator);
        out.push_str(frac_part);
        out
    }
}

/// Whole-number percentage: `21%`.
pub fn percent(rate: Decimal) -> String {
    format!("{}%", round_half_up(rate, 0).normalize())
}

/// Quantity without a decimal point when whole, else its fractional form.
pub fn quantity(value: Decimal) -> String {
    if value.fract().is_zero() {
        value.trunc().normalize().to_string()
    } else {
        value.normalize().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_groups_thousands() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.money(dec!(1234.56)), "€ 1.234,56");
        assert_eq!(fmt.money(dec!(1234567.8)), "€ 1.234.567,80");
        assert_eq!(fmt.money(dec!(999.999)), "€ 1.000,00");
        assert_eq!(fmt.money(dec!(0)), "€ 0,00");
        assert_eq!(fmt.money(dec!(5.5)), "€ 5,50");
    }

    #[test]
    fn money_negative() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.money(dec!(-1234.5)), "€ -1.234,50");
        assert_eq!(fmt.money(dec!(-0.001)), "€ 0,00");
    }

    #[test]
    fn custom_locale() {
        let fmt = NumberFormat {
            currency_symbol: "$".into(),
            thousands_separator: ',',
            decimal_separator: '.',
        };
        assert_eq!(fmt.money(dec!(9600)), "$ 9,600.00");
    }

    #[test]
    fn percent_is_integer() {
        assert_eq!(percent(dec!(21)), "21%");
        assert_eq!(percent(dec!(21.00)), "21%");
        assert_eq!(percent(dec!(9)), "9%");
        assert_eq!(percent(dec!(0)), "0%");
    }

    #[test]
    fn quantity_whole_and_fractional() {
        assert_eq!(quantity(dec!(2)), "2");
        assert_eq!(quantity(dec!(2.000)), "2");
        assert_eq!(quantity(dec!(1.5)), "1.5");
        assert_eq!(quantity(dec!(0.25)), "0.25");
        assert_eq!(quantity(dec!(10)), "10");
    }
}
