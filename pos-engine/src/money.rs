//! Money display and aggregation helpers using rust_decimal
//!
//! Pricing itself stays in `f64`; these helpers round only at the edges
//! (receipts, reports).

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite input becomes zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round an amount for display
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Fixed decimals, no grouping: `format_amount(20.0, 2) == "20.00"`
pub fn format_amount(amount: f64, decimals: u32) -> String {
    let rounded =
        to_decimal(amount).round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimals as usize, rounded)
}

/// Fixed decimals with `,` thousands separators
pub fn format_grouped(amount: f64, decimals: u32) -> String {
    let plain = format_amount(amount, decimals);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Sum amounts exactly, rounding once at the end
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = f64>,
{
    amounts.into_iter().map(to_decimal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_rounding() {
        assert_eq!(round_money(20.004), 20.0);
        assert_eq!(round_money(20.005), 20.01);
        assert_eq!(round_money(-2.345), -2.35);
        assert_eq!(round_money(f64::NAN), 0.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(20.0, 2), "20.00");
        assert_eq!(format_amount(5.454545, 2), "5.45");
        assert_eq!(format_amount(1234.5, 0), "1235");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(-1000.0, 0), "-1,000");
        assert_eq!(format_grouped(0.0, 2), "0.00");
    }

    #[test]
    fn test_sum_avoids_float_drift() {
        let total = sum([0.1, 0.2, 0.3]);
        assert_eq!(to_f64(total), 0.6);
    }
}
