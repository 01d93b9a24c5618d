//! Display formatting for metric values

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// How a metric value is rendered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    /// Up to 2 fractional digits, thousands grouped.
    #[default]
    Plain,
    /// Exactly 1 fractional digit, thousands grouped. Token amounts.
    Stake,
    /// Exactly 3 fractional digits, no grouping. Small normalized weights.
    Ratio,
}

/// Renders `value` for display. Ties round away from zero.
pub fn format_value(value: f64, mode: FormatMode) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    match mode {
        FormatMode::Plain => group_thousands(&round_trimmed(value, 2)),
        FormatMode::Stake => group_thousands(&round_fixed(value, 1)),
        FormatMode::Ratio => round_fixed(value, 3),
    }
}

/// Rounds to exactly `dp` fractional digits.
fn round_fixed(value: f64, dp: u32) -> String {
    match to_decimal(value) {
        Some(decimal) => {
            let mut rounded =
                decimal.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(dp);
            rounded.to_string()
        }
        None if dp == 0 => format!("{value}"),
        None => format!("{value}.{}", "0".repeat(dp as usize)),
    }
}

/// Rounds to at most `dp` fractional digits, dropping trailing zeros.
fn round_trimmed(value: f64, dp: u32) -> String {
    match to_decimal(value) {
        Some(decimal) => decimal
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string(),
        None => format!("{value}"),
    }
}

/// Exact decimal value of `value`, or `None` once it is too large to carry a fraction.
///
/// Past 2^53 every f64 is an integer; those are printed with their shortest digits instead.
fn to_decimal(value: f64) -> Option<Decimal> {
    if value.abs() >= EXACT_INTEGER_LIMIT {
        return None;
    }
    Decimal::from_f64_retain(value)
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
