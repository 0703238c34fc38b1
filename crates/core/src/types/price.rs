//! Price formatting using decimal arithmetic.
//!
//! Amounts travel through the storefront as [`Decimal`] so that line totals
//! and cart subtotals never pick up binary floating point error. Rounding to
//! the cent uses ties-away-from-zero, which is how shoppers expect a price
//! such as `10.555` to be displayed (`$10.56`).

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Currency symbol prefixed to every displayed price.
const CURRENCY_SYMBOL: &str = "$";

/// Errors that can occur when parsing a price amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("amount cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// Round an amount to whole cents, ties away from zero.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Format an amount as a US dollar price with thousands separators.
///
/// ```
/// use bazaar_core::format_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_price(Decimal::new(123_456_789, 2)), "$1,234,567.89");
/// assert_eq!(format_price(Decimal::new(-50, 0)), "-$50.00");
/// ```
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = round_to_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = rounded.abs().to_string();
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!("{sign}{CURRENCY_SYMBOL}{}.{cents}", group_thousands(whole))
}

/// Multiply a quantity by a unit price and format the result to two decimals.
///
/// No currency symbol and no separators: this is the bare figure used in
/// order-summary lines such as `2 x $10.555 = $21.11`.
#[must_use]
pub fn format_price_calculation(quantity: Decimal, price: Decimal) -> String {
    let total = round_to_cents(quantity * price);
    if total.is_zero() {
        // Avoid rendering "-0.00" for a zero quantity of a negative price
        return "0.00".to_string();
    }
    total.to_string()
}

/// Parse a decimal amount from user or wire text.
///
/// # Errors
///
/// Returns [`PriceError::Empty`] for blank input and [`PriceError::Invalid`]
/// when the text is not a decimal number.
pub fn parse_amount(input: &str) -> Result<Decimal, PriceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }
    Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(trimmed.to_string()))
}

/// Insert a comma between every group of three digits, right to left.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_price_whole_amounts() {
        assert_eq!(format_price(dec("10")), "$10.00");
        assert_eq!(format_price(dec("99.99")), "$99.99");
        assert_eq!(format_price(dec("1000")), "$1,000.00");
    }

    #[test]
    fn test_format_price_zero() {
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(dec("-50")), "-$50.00");
    }

    #[test]
    fn test_format_price_rounds_to_nearest_cent() {
        assert_eq!(format_price(dec("10.5")), "$10.50");
        assert_eq!(format_price(dec("10.55")), "$10.55");
        assert_eq!(format_price(dec("10.555")), "$10.56");
    }

    #[test]
    fn test_format_price_large_numbers() {
        assert_eq!(format_price(dec("1234567.89")), "$1,234,567.89");
        assert_eq!(format_price(dec("100000")), "$100,000.00");
    }

    #[test]
    fn test_format_price_tiny_negative_rounds_to_zero() {
        assert_eq!(format_price(dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_format_price_calculation_totals() {
        assert_eq!(format_price_calculation(dec("2"), dec("10")), "20.00");
        assert_eq!(format_price_calculation(dec("3"), dec("5.5")), "16.50");
        assert_eq!(format_price_calculation(dec("1"), dec("1")), "1.00");
    }

    #[test]
    fn test_format_price_calculation_zero_inputs() {
        assert_eq!(format_price_calculation(Decimal::ZERO, dec("10")), "0.00");
        assert_eq!(format_price_calculation(dec("5"), Decimal::ZERO), "0.00");
        assert_eq!(format_price_calculation(Decimal::ZERO, dec("-10")), "0.00");
    }

    #[test]
    fn test_format_price_calculation_rounds() {
        assert_eq!(format_price_calculation(dec("2"), dec("10.555")), "21.11");
    }

    #[test]
    fn test_format_price_calculation_negative() {
        assert_eq!(format_price_calculation(dec("-2"), dec("10")), "-20.00");
        assert_eq!(format_price_calculation(dec("2"), dec("-10")), "-20.00");
    }

    #[test]
    fn test_format_price_calculation_from_text_inputs() {
        let qty = parse_amount("3").unwrap();
        let price = parse_amount(" 5.5 ").unwrap();
        assert_eq!(format_price_calculation(qty, price), "16.50");
    }

    #[test]
    fn test_parse_amount_errors() {
        assert_eq!(parse_amount("  "), Err(PriceError::Empty));
        assert!(matches!(parse_amount("ten"), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
