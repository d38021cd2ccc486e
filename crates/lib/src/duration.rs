//! Duration text grammar.
//!
//! A duration is written as a sequence of decimal numbers, each with an
//! optional fraction and a unit suffix, such as `300ms`, `1.5h` or `2h45m`.
//! Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. The bare
//! text `0` is accepted as zero.

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Formats a duration the way [`parse_duration`] reads it back.
///
/// Durations under one second use the largest sub-second unit that keeps
/// the integer part non-zero. Longer ones are split into hours, minutes and
/// (possibly fractional) seconds, omitting leading zero components.
///
/// ```
/// # use std::time::Duration;
/// # use envtree::duration::format_duration;
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
/// assert_eq!(format_duration(Duration::from_secs(3723)), "1h2m3s");
/// assert_eq!(format_duration(Duration::from_micros(250)), "250µs");
/// assert_eq!(format_duration(Duration::ZERO), "0s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", with_fraction(nanos, 1_000));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", with_fraction(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = u128::from(total_secs % 60) * NANOS_PER_SEC + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&with_fraction(seconds, NANOS_PER_SEC));
    out.push('s');
    out
}

/// Parses duration text. Returns `None` for malformed or negative input.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let mut rest = text.trim();
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }
    if rest == "0" {
        return Some(Duration::ZERO);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let (number, tail) = rest.split_at(number_len);

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        let scale = unit_nanos(unit)?;
        total = total.checked_add(scaled(number, scale)?)?;
        rest = tail;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).ok()?;
    let nanos = u32::try_from(total % NANOS_PER_SEC).ok()?;
    Some(Duration::new(secs, nanos))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Converts `12.25` with a unit of `scale` nanoseconds into nanoseconds.
fn scaled(number: &str, scale: u128) -> Option<u128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut value = whole.checked_mul(scale)?;

    let mut divisor: u128 = 1;
    for digit in fraction.chars() {
        let digit = u128::from(digit.to_digit(10)?);
        // Digits beyond nanosecond precision contribute nothing
        if divisor >= scale {
            continue;
        }
        divisor *= 10;
        value += digit * scale / divisor;
    }
    Some(value)
}

/// Renders `value / unit` with the shortest exact decimal fraction.
fn with_fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let rest = value % unit;
    if rest == 0 {
        return whole.to_string();
    }

    let width = unit.ilog10() as usize;
    let fraction = format!("{rest:0width$}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}
