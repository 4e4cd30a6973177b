//! Field values shared by the list loaders.

use once_cell::sync::Lazy;
use regex::Regex;

static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3}):(\d{1,2})(?::(\d{1,2}(?:\.\d+)?))?$").expect("invalid clock regex")
});

/// Parse `HH:mm[:ss]` into seconds since midnight.
///
/// Hours may run past 24 for services that cross midnight.
pub fn parse_clock_time(input: &str) -> Option<f64> {
    let caps = CLOCK_RE.captures(input.trim())?;
    let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Parse a decimal number, ignoring surrounding whitespace.
pub fn parse_number(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse an integer, ignoring surrounding whitespace.
pub fn parse_integer(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_times() {
        assert_eq!(parse_clock_time("10:30:15"), Some(37815.0));
        assert_eq!(parse_clock_time(" 7:05 "), Some(25500.0));
        assert_eq!(parse_clock_time("25:00:00"), Some(90000.0));
        assert_eq!(parse_clock_time("08:00:30.5"), Some(28830.5));
        assert_eq!(parse_clock_time("10:61:00"), None);
        assert_eq!(parse_clock_time("10:00:60"), None);
        assert_eq!(parse_clock_time("noon"), None);
        assert_eq!(parse_clock_time(""), None);
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number(" 20.5 "), Some(20.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_integer(" 1"), Some(1));
        assert_eq!(parse_integer("1.0"), None);
    }
}
