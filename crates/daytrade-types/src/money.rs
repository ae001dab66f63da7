use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy, dec};

/// Largest magnitude a stored amount column (`NUMERIC(20, 2)`) holds.
pub const MAX_AMOUNT: Decimal = dec!(999999999999999999.99);

/// Whether `value` can be written to an amount column.
pub fn fits_amount_column(value: Decimal) -> bool {
    value.abs() <= MAX_AMOUNT
}

/// Round to cents, half away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a user-entered amount in either Brazilian or US notation.
///
/// Examples: `"R$ 1.234,56"`, `"$1.234,56"`, `"234,56"`, `"1234.56"`, `"-12,5"`.
/// When both `.` and `,` appear, `.` groups thousands and `,` is the decimal
/// separator. A lone `,` is a decimal separator, and so is a lone `.`.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, 'R' | '$') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains('.') && cleaned.contains(',') {
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else if cleaned.contains(',') {
        cleaned.replacen(',', ".", 1)
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

/// Render an amount as `-$1.234,56`: pt-BR digit grouping, two decimals and
/// the sign in front of the currency symbol.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_cents(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped},{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_column_range() {
        assert!(fits_amount_column(MAX_AMOUNT));
        assert!(fits_amount_column(-MAX_AMOUNT));
        assert!(!fits_amount_column(MAX_AMOUNT + dec!(0.01)));
        assert!(!fits_amount_column(dec!(79228162514264337593543950)));
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("R$ 1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("$1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("234,56"), Some(dec!(234.56)));
        assert_eq!(parse_amount("1234.56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("-12,5"), Some(dec!(-12.5)));
        assert_eq!(parse_amount(" 1 000 "), Some(dec!(1000)));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("R$"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1,2,3"), None);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$0,00");
        assert_eq!(format_currency(dec!(1234.5)), "$1.234,50");
        assert_eq!(format_currency(dec!(-1)), "-$1,00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1.234.567,89");
        assert_eq!(format_currency(dec!(999.999)), "$1.000,00");
        assert_eq!(format_currency(dec!(-0.001)), "$0,00");
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
        assert_eq!(round_cents(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_cents(dec!(10.004)), dec!(10.00));
    }
}
