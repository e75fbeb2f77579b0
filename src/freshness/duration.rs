//! Duration strings such as `"24h"`, `"1h30m"` or `"1.5s"`.
//!
//! Grammar: an optional sign followed by one or more `<decimal><unit>`
//! pairs. Units are `ns`, `us` (`µs`, `μs`), `ms`, `s`, `m` and `h`.
//! The bare string `"0"` is accepted without a unit.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_MIN: u64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MIN;

/// Largest magnitude a window may have (`i64::MAX` nanoseconds, ~292 years).
/// Negative windows may reach one nanosecond further.
const MAX_NANOS: u64 = 1 << 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("duration {0:?} out of range")]
    Overflow(String),
}

/// A parsed, possibly negative, time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    negative: bool,
    magnitude: Duration,
}

impl Window {
    pub fn is_negative(&self) -> bool {
        self.negative && !self.magnitude.is_zero()
    }

    pub fn magnitude(&self) -> Duration {
        self.magnitude
    }

    /// The instant `now - self`. A negative window moves the cutoff into
    /// the future. Saturates at the Unix epoch if the platform cannot
    /// represent the result.
    pub fn cutoff_from(&self, now: SystemTime) -> SystemTime {
        let cutoff = if self.negative {
            now.checked_add(self.magnitude)
        } else {
            now.checked_sub(self.magnitude)
        };
        cutoff.unwrap_or(UNIX_EPOCH)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{:?}", self.magnitude)
        } else {
            write!(f, "{:?}", self.magnitude)
        }
    }
}

/// Parse a duration string into a [`Window`].
pub fn parse_window(input: &str) -> Result<Window, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());

    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(Window {
            negative: false,
            magnitude: Duration::ZERO,
        });
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        // Integer part.
        let (whole, after_whole) = leading_int(rest).ok_or_else(invalid)?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        // Fractional part.
        let mut fraction: u64 = 0;
        let mut scale: f64 = 1.0;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (f, s, after_fraction) = leading_fraction(after_dot);
            has_fraction = after_fraction.len() != after_dot.len();
            fraction = f;
            scale = s;
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err(invalid());
        }

        // Unit.
        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        rest = after_unit;
        let unit_nanos = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let overflow = || DurationError::Overflow(input.to_string());
        if whole > MAX_NANOS / unit_nanos {
            return Err(overflow());
        }
        let mut value = whole * unit_nanos;
        if fraction > 0 {
            value += (fraction as f64 * (unit_nanos as f64 / scale)) as u64;
            if value > MAX_NANOS {
                return Err(overflow());
            }
        }
        total = total.checked_add(value).filter(|t| *t <= MAX_NANOS).ok_or_else(overflow)?;
    }

    if !negative && total > MAX_NANOS - 1 {
        return Err(DurationError::Overflow(input.to_string()));
    }

    Ok(Window {
        negative,
        magnitude: Duration::from_nanos(total),
    })
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(NANOS_PER_MIN),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// Consume leading ASCII digits. `None` on overflow past `MAX_NANOS`.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    for b in s[..end].bytes() {
        value = value.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
        if value > MAX_NANOS {
            return None;
        }
    }
    Some((value, &s[end..]))
}

/// Consume leading fraction digits. Digits beyond u64 precision are
/// dropped rather than treated as an error.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    let mut scale: f64 = 1.0;
    let mut saturated = false;
    for b in s[..end].bytes() {
        if saturated {
            continue;
        }
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
        {
            Some(v) if v <= MAX_NANOS => {
                value = v;
                scale *= 10.0;
            }
            _ => saturated = true,
        }
    }
    (value, scale, &s[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nanos(s: &str) -> u128 {
        parse_window(s).unwrap().magnitude().as_nanos()
    }

    #[test]
    fn test_simple_units() {
        assert_eq!(nanos("24h"), 24 * 3600 * 1_000_000_000);
        assert_eq!(nanos("5m"), 300 * 1_000_000_000);
        assert_eq!(nanos("10s"), 10_000_000_000);
        assert_eq!(nanos("3ms"), 3_000_000);
        assert_eq!(nanos("7us"), 7_000);
        assert_eq!(nanos("7µs"), 7_000);
        assert_eq!(nanos("7μs"), 7_000);
        assert_eq!(nanos("9ns"), 9);
    }

    #[test]
    fn test_compound_and_fractional() {
        assert_eq!(nanos("1h30m"), 90 * 60 * 1_000_000_000);
        assert_eq!(nanos("1.5h"), 90 * 60 * 1_000_000_000);
        assert_eq!(nanos(".5s"), 500_000_000);
        assert_eq!(nanos("1.s"), 1_000_000_000);
        assert_eq!(nanos("2h45m10.5s"), (2 * 3600 + 45 * 60 + 10) * 1_000_000_000 + 500_000_000);
    }

    #[test]
    fn test_zero_and_sign() {
        assert_eq!(nanos("0"), 0);
        assert_eq!(nanos("+0"), 0);
        assert_eq!(nanos("-0"), 0);
        assert_eq!(nanos("0s"), 0);

        let w = parse_window("-1h").unwrap();
        assert!(w.is_negative());
        assert_eq!(w.magnitude(), Duration::from_secs(3600));
        assert!(!parse_window("+1h").unwrap().is_negative());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(parse_window(""), Err(DurationError::Invalid(_))));
        assert!(matches!(parse_window("abc"), Err(DurationError::Invalid(_))));
        assert!(matches!(parse_window("."), Err(DurationError::Invalid(_))));
        assert!(matches!(parse_window("-"), Err(DurationError::Invalid(_))));
        assert!(matches!(parse_window("1"), Err(DurationError::MissingUnit(_))));
        assert!(matches!(parse_window("1h30"), Err(DurationError::MissingUnit(_))));
        assert!(matches!(
            parse_window("3d"),
            Err(DurationError::UnknownUnit { ref unit, .. }) if unit == "d"
        ));
        assert!(matches!(parse_window("1 h"), Err(DurationError::UnknownUnit { .. })));
    }

    #[test]
    fn test_overflow() {
        assert!(parse_window("9223372036854775807ns").is_ok());
        assert!(matches!(
            parse_window("9223372036854775808ns"),
            Err(DurationError::Overflow(_))
        ));
        assert!(parse_window("-9223372036854775808ns").is_ok());
        assert!(parse_window("3000000h").is_err());
        assert!(parse_window("99999999999999999999h").is_err());
    }

    #[test]
    fn test_cutoff() {
        let now = UNIX_EPOCH + Duration::from_secs(10_000);
        let w = parse_window("1h").unwrap();
        assert_eq!(w.cutoff_from(now), UNIX_EPOCH + Duration::from_secs(6_400));

        let w = parse_window("-1h").unwrap();
        assert_eq!(w.cutoff_from(now), UNIX_EPOCH + Duration::from_secs(13_600));

        assert_eq!(parse_window("0").unwrap().cutoff_from(now), now);
    }

    #[test]
    fn test_display() {
        assert_eq!(parse_window("90s").unwrap().to_string(), "90s");
        assert_eq!(parse_window("-1.5s").unwrap().to_string(), "-1.5s");
    }
}
