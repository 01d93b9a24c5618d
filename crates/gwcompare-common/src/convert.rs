//! Unit and ratio conversion

use crate::errors::{Error, Result};

/// Raw stake units per whole token.
pub const STAKE_UNITS_PER_TOKEN: f64 = 1_000_000_000.0;

/// Converts a raw integer stake amount into tokens.
///
/// Negative amounts convert fine; whether they are acceptable is up to the caller.
pub fn stake_units_to_decimal(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidNumericInput(raw.to_string()));
    }

    match trimmed.parse::<f64>() {
        Ok(units) if units.is_finite() => Ok(units / STAKE_UNITS_PER_TOKEN),
        _ => Err(Error::InvalidNumericInput(raw.to_string())),
    }
}

/// Parses a plain numeric field (ratio, weight, percentage) sent as text or JSON number.
pub fn parse_number(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidNumericInput(raw.to_string())),
    }
}

/// Parses a count such as an epoch streak. Integral floats (`7.0`) are accepted.
pub fn parse_count(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if let Ok(count) = trimmed.parse::<u64>() {
        return Ok(count);
    }

    match parse_number(trimmed) {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
            Ok(value as u64)
        }
        _ => Err(Error::InvalidNumericInput(raw.to_string())),
    }
}

/// Scales a 0–1 ratio to a percentage; an absent ratio is 0.
pub fn ratio_to_percent(ratio: Option<f64>) -> f64 {
    match ratio {
        Some(ratio) => ratio * 100.0,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_units_to_decimal() {
        assert_eq!(stake_units_to_decimal("2000000000").unwrap(), 2.0);
        assert_eq!(stake_units_to_decimal("1500000000").unwrap(), 1.5);
        assert_eq!(stake_units_to_decimal("0").unwrap(), 0.0);
        assert_eq!(stake_units_to_decimal(" 1000000000 ").unwrap(), 1.0);
        assert_eq!(stake_units_to_decimal("1e9").unwrap(), 1.0);
    }

    #[test]
    fn test_negative_stake_is_not_an_error() {
        assert_eq!(stake_units_to_decimal("-3000000000").unwrap(), -3.0);
    }

    #[test]
    fn test_unparseable_stake_is_rejected() {
        for raw in ["", "   ", "abc", "12abc", "true", "NaN", "inf", "-infinity", "1e400"] {
            assert!(
                matches!(stake_units_to_decimal(raw), Err(Error::InvalidNumericInput(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0.5").unwrap(), 0.5);
        assert_eq!(parse_number(" 10 ").unwrap(), 10.0);
        assert_eq!(parse_number("-2").unwrap(), -2.0);
        assert_eq!(parse_number("1e-3").unwrap(), 0.001);
        for raw in ["", "abc", "false", "[1]", "NaN", "inf"] {
            assert!(
                matches!(parse_number(raw), Err(Error::InvalidNumericInput(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_count_accepts_integral_floats() {
        assert_eq!(parse_count("7").unwrap(), 7);
        assert_eq!(parse_count("7.0").unwrap(), 7);
        assert_eq!(parse_count(" 12 ").unwrap(), 12);
        assert_eq!(parse_count("1e2").unwrap(), 100);
        assert_eq!(parse_count("18446744073709551615").unwrap(), u64::MAX);
        for raw in ["", "7.5", "-1", "abc", "true", "1e400"] {
            assert!(
                matches!(parse_count(raw), Err(Error::InvalidNumericInput(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_ratio_to_percent() {
        assert_eq!(ratio_to_percent(None), 0.0);
        assert_eq!(ratio_to_percent(Some(0.5)), 50.0);
        assert_eq!(ratio_to_percent(Some(0.0)), 0.0);
        assert_eq!(ratio_to_percent(Some(1.0)), 100.0);
        assert_eq!(ratio_to_percent(Some(0.02)), 2.0);
    }
}
