//! Duration parsing for setting values.
//!
//! Two formats are accepted:
//! - a day count such as `30days` or `1 day`
//! - signed unit sequences such as `1h30m`, `-1.5s` or `250ms`

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::HOURS_PER_DAY;
use crate::error::DurationError;

/// Returned by lenient lookups when a value does not parse.
///
/// A valid `-1ns` input maps to the same value.
pub fn invalid_duration() -> Duration {
    Duration::nanoseconds(-1)
}

/// Check whether a duration is the invalid marker
pub fn is_invalid(duration: Duration) -> bool {
    duration == invalid_duration()
}

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new("[0-9]+").expect("valid digit pattern"));

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Magnitude limit: `i64::MAX + 1`, so `i64::MIN` stays representable.
const LIMIT: u64 = 1 << 63;

/// Parse a setting value into a duration.
pub fn parse(value: &str) -> Result<Duration, DurationError> {
    if value.contains("day") {
        parse_days(&value.to_lowercase())
    } else {
        parse_units(value)
    }
}

/// Parse the first run of digits as a count of days.
fn parse_days(value: &str) -> Result<Duration, DurationError> {
    let digits = DIGITS
        .find(value)
        .ok_or(DurationError::MissingDayCount)?
        .as_str();
    let days: i64 = digits.parse().map_err(|_| DurationError::Overflow)?;

    // Same range as the unit grammar: whole nanoseconds in an i64
    days.checked_mul(HOURS_PER_DAY)
        .and_then(|hours| hours.checked_mul(HOUR as i64))
        .map(Duration::nanoseconds)
        .ok_or(DurationError::Overflow)
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        // ASCII, micro sign (U+00B5) and greek mu (U+03BC)
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parse `[-+]?([0-9]*(\.[0-9]*)?unit)+` into nanoseconds.
fn parse_units(value: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    if rest == "0" {
        return Ok(Duration::zero());
    }
    if rest.is_empty() {
        return Err(if value.is_empty() {
            DurationError::Empty
        } else {
            DurationError::InvalidSyntax
        });
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        match rest.as_bytes()[0] {
            b'.' | b'0'..=b'9' => {}
            _ => return Err(DurationError::InvalidSyntax),
        }

        let (whole, after_whole) = leading_int(rest)?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        let mut fraction = 0u64;
        let mut scale = 1f64;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (f, s, after_fraction) = leading_fraction(after_dot);
            has_fraction = after_fraction.len() != after_dot.len();
            fraction = f;
            scale = s;
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err(DurationError::InvalidSyntax);
        }

        let unit_len = rest
            .bytes()
            .position(|c| c == b'.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit);
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        rest = after_unit;
        let unit = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit(unit.to_string()))?;

        if whole > LIMIT / unit {
            return Err(DurationError::Overflow);
        }
        let mut amount = whole * unit;
        if fraction > 0 {
            amount += (fraction as f64 * (unit as f64 / scale)) as u64;
            if amount > LIMIT {
                return Err(DurationError::Overflow);
            }
        }
        total = total.checked_add(amount).ok_or(DurationError::Overflow)?;
        if total > LIMIT {
            return Err(DurationError::Overflow);
        }
    }

    let nanos = if negative {
        if total == LIMIT {
            i64::MIN
        } else {
            -(total as i64)
        }
    } else {
        i64::try_from(total).map_err(|_| DurationError::Overflow)?
    };

    Ok(Duration::nanoseconds(nanos))
}

/// Consume leading ASCII digits.
fn leading_int(s: &str) -> Result<(u64, &str), DurationError> {
    let end = s.bytes().position(|c| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    for c in s[..end].bytes() {
        if x > LIMIT / 10 {
            return Err(DurationError::Overflow);
        }
        x = x * 10 + u64::from(c - b'0');
        if x > LIMIT {
            return Err(DurationError::Overflow);
        }
    }
    Ok((x, &s[end..]))
}

/// Consume leading fraction digits, dropping precision that would overflow.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.bytes().position(|c| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    let mut scale = 1f64;
    let mut overflow = false;
    for c in s[..end].bytes() {
        if overflow {
            continue;
        }
        if x > (LIMIT - 1) / 10 {
            overflow = true;
            continue;
        }
        let y = x * 10 + u64::from(c - b'0');
        if y > LIMIT {
            overflow = true;
            continue;
        }
        x = y;
        scale *= 10.0;
    }
    (x, scale, &s[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_units() {
        assert_eq!(parse("2h"), Ok(Duration::hours(2)));
        assert_eq!(parse("90s"), Ok(Duration::seconds(90)));
        assert_eq!(parse("250ms"), Ok(Duration::milliseconds(250)));
        assert_eq!(parse("7us"), Ok(Duration::microseconds(7)));
        assert_eq!(parse("7µs"), Ok(Duration::microseconds(7)));
        assert_eq!(parse("7μs"), Ok(Duration::microseconds(7)));
        assert_eq!(parse("3ns"), Ok(Duration::nanoseconds(3)));
    }

    #[test]
    fn test_composite_and_signed() {
        assert_eq!(parse("1h30m"), Ok(Duration::minutes(90)));
        assert_eq!(parse("-1.5h"), Ok(Duration::minutes(-90)));
        assert_eq!(parse("+5m"), Ok(Duration::minutes(5)));
        assert_eq!(parse(".5s"), Ok(Duration::milliseconds(500)));
        assert_eq!(parse("1.s"), Ok(Duration::seconds(1)));
        assert_eq!(parse("0"), Ok(Duration::zero()));
        assert_eq!(parse("-0"), Ok(Duration::zero()));
    }

    #[test]
    fn test_rejected_units() {
        assert_eq!(parse(""), Err(DurationError::Empty));
        assert_eq!(parse("-"), Err(DurationError::InvalidSyntax));
        assert_eq!(parse("10"), Err(DurationError::MissingUnit));
        assert_eq!(parse("."), Err(DurationError::InvalidSyntax));
        assert_eq!(parse("h"), Err(DurationError::InvalidSyntax));
        assert_eq!(
            parse("45MIN"),
            Err(DurationError::UnknownUnit("MIN".to_string()))
        );
        assert_eq!(
            parse("3months"),
            Err(DurationError::UnknownUnit("months".to_string()))
        );
    }

    #[test]
    fn test_range_limits() {
        assert_eq!(
            parse("9223372036854775807ns"),
            Ok(Duration::nanoseconds(i64::MAX))
        );
        assert_eq!(
            parse("-9223372036854775808ns"),
            Ok(Duration::nanoseconds(i64::MIN))
        );
        assert_eq!(parse("9223372036854775808ns"), Err(DurationError::Overflow));
        assert_eq!(parse("3000000h"), Err(DurationError::Overflow));
    }

    #[test]
    fn test_days() {
        assert_eq!(parse("30days"), Ok(Duration::hours(720)));
        assert_eq!(parse("1 day"), Ok(Duration::hours(24)));
        assert_eq!(parse("in 2 days or 3"), Ok(Duration::hours(48)));
        assert_eq!(parse("days"), Err(DurationError::MissingDayCount));
        assert_eq!(
            parse("99999999999999999999days"),
            Err(DurationError::Overflow)
        );
    }

    #[test]
    fn test_day_range_matches_unit_range() {
        assert_eq!(parse("106751days"), Ok(Duration::hours(106_751 * 24)));
        assert_eq!(parse("106752days"), Err(DurationError::Overflow));
        assert_eq!(parse("200000days"), Err(DurationError::Overflow));
        assert_eq!(parse("4800000h"), Err(DurationError::Overflow));
    }

    #[test]
    fn test_day_match_is_case_sensitive() {
        // Falls through to the unit grammar, which rejects it
        assert_eq!(
            parse("30DAYS"),
            Err(DurationError::UnknownUnit("DAYS".to_string()))
        );
    }

    #[test]
    fn test_invalid_marker() {
        assert!(is_invalid(invalid_duration()));
        assert!(!is_invalid(Duration::zero()));
        assert_eq!(parse("-1ns").map(is_invalid), Ok(true));
    }
}
