//! Normalization of the human-formatted numbers a backup run prints.
//!
//! Every parser here is total: input that cannot be understood yields zero
//! instead of an error, so one odd value never costs the rest of a report.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// `<number>[ ][K|M|G|T][i][B]`, case-insensitive.
static BYTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9.]+)\s*(?:([KMGT])(i)?)?(B)?$").expect("byte size pattern is valid")
});

/// Duration literal suffix to nanoseconds multiplier.
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("μs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3600e9),
];

const NANOS_PER_SEC: f64 = 1e9;

/// Parse a count such as `"1,024"`. Returns 0 if `s` is not an integer.
pub fn parse_int(s: &str) -> i64 {
    let clean = s.replace(',', "");
    match clean.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            log_fallback("count", s);
            0
        }
    }
}

/// Parse a size such as `"2.5 MiB"` into bytes, truncated toward zero.
///
/// Units are powers of 1024 whether or not they carry the `i`; the trailing
/// `B` is optional. Returns 0 for anything else.
pub fn parse_bytes(s: &str) -> i64 {
    match parse_bytes_exact(s.trim()) {
        Some(bytes) => bytes,
        None => {
            log_fallback("byte size", s);
            0
        }
    }
}

fn parse_bytes_exact(s: &str) -> Option<i64> {
    let caps = BYTES_RE.captures(s)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;

    let shift = match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
        None => 0,
        Some(unit) => match unit.as_str() {
            "K" => 10,
            "M" => 20,
            "G" => 30,
            "T" => 40,
            _ => return None,
        },
    };

    Some((value * (1u64 << shift) as f64) as i64)
}

/// Parse an elapsed time into seconds.
///
/// `"M:SS"` is read as minutes and seconds and takes precedence over
/// everything else; only exactly two components are accepted. Otherwise the
/// input is a duration literal such as `"90s"`, `"1h30m"` or `"250ms"`;
/// literals longer than `i64::MAX` nanoseconds (about 2562047h) are
/// rejected. Returns 0 on any failure.
pub fn parse_duration(s: &str) -> f64 {
    let seconds = if s.contains(':') {
        parse_clock(s)
    } else {
        parse_literal(s)
    };

    match seconds {
        Some(v) if v.is_finite() => v,
        _ => {
            log_fallback("duration", s);
            0.0
        }
    }
}

fn parse_clock(s: &str) -> Option<f64> {
    let (minutes, seconds) = s.split_once(':')?;
    if seconds.contains(':') {
        return None;
    }
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

fn parse_literal(s: &str) -> Option<f64> {
    let (negative, mut rest) = match s.chars().next() {
        Some('-') => (true, &s[1..]),
        Some('+') => (false, &s[1..]),
        _ => (false, s),
    };

    if rest == "0" {
        return Some(0.0);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total = 0.0;
    while !rest.is_empty() {
        let split = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(split);
        let value: f64 = number.parse().ok()?;

        let split = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(split);
        let (_, multiplier) = UNITS.iter().find(|(suffix, _)| *suffix == unit)?;

        total += value * multiplier;
        if total > i64::MAX as f64 {
            return None;
        }
        rest = tail;
    }

    let seconds = total / NANOS_PER_SEC;
    Some(if negative { -seconds } else { seconds })
}

fn log_fallback(what: &str, raw: &str) {
    if !raw.is_empty() {
        debug!("unparseable {} {:?}, using 0", what, raw);
    }
}
