//! Duration literals such as `30s`, `5m`, `1h` or `7d`

use crate::error::{Error, Result};
use chrono::Duration;

/// Units accepted in a duration literal
pub const DURATION_UNITS: [&str; 4] = ["s", "m", "h", "d"];

/// Returns true if `unit` is one of [`DURATION_UNITS`]
pub fn is_valid_unit(unit: &str) -> bool {
    DURATION_UNITS.contains(&unit)
}

/// Parse a duration literal: a positive integer followed by a single unit.
pub fn parse_duration(literal: &str) -> Result<Duration> {
    let invalid = || Error::InvalidDuration(format!("invalid duration: \"{}\"", literal));

    let (split, _) = literal.char_indices().last().ok_or_else(invalid)?;
    let (amount, unit) = literal.split_at(split);

    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let amount: i64 = amount.parse().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }

    let duration = match unit {
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    };
    duration.ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_unit() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::seconds(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::minutes(5));
        assert_eq!(parse_duration("1h").unwrap(), Duration::hours(1));
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "m", "5", "5w", "-5m", "5.5m", "0m", " 5m", "5 m", "5mm"] {
            assert!(parse_duration(bad).is_err(), "expected error for {:?}", bad);
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(parse_duration("99999999999999999999d").is_err());
        assert!(parse_duration("9999999999999999d").is_err());
    }

    #[test]
    fn test_is_valid_unit() {
        assert!(is_valid_unit("s"));
        assert!(is_valid_unit("d"));
        assert!(!is_valid_unit("w"));
        assert!(!is_valid_unit(""));
    }
}
