//! Pure value formatting for the presented property bag.
//!
//! Every function here takes the raw server string and returns display
//! text; malformed input degrades to [`NONE`] instead of failing.

use chrono::DateTime;

/// Placeholder for missing or unreadable values.
pub const NONE: &str = "None";

const KB_PER_MB: f64 = 1024.0;
const KB_PER_GB: f64 = 1024.0 * 1024.0;

/// `None`/empty → `"None"`, anything else unchanged.
pub fn or_none(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => NONE.to_owned(),
    }
}

/// Epoch milliseconds → `"MMM dd, yyyy, h:mm a"` (UTC), e.g. `"Mar 07, 2024, 2:05 PM"`.
pub fn epoch_millis(value: &str) -> String {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map_or_else(
            || NONE.to_owned(),
            |dt| dt.format("%b %d, %Y, %-I:%M %p").to_string(),
        )
}

/// `"label:kilobytes"` → `"label: N MB"` below one GiB of KB, else `"label: N.NN GB"`.
///
/// Either side may carry the number (`"C:1024"` and `"1024:C"` both read as
/// drive `C`). Input without exactly one colon is returned unchanged; a pair
/// without a finite, non-negative numeric side is [`NONE`].
pub fn memory(value: &str) -> String {
    if value == NONE {
        return value.to_owned();
    }
    let Some((left, right)) = value.split_once(':') else {
        return value.to_owned();
    };
    if right.contains(':') {
        return value.to_owned();
    }
    let (left, right) = (left.trim(), right.trim());

    let size = |text: &str| text.parse::<f64>().ok().filter(|kb| kb.is_finite() && *kb >= 0.0);
    let (label, kilobytes) = match (size(right), size(left)) {
        (Some(kb), _) => (left, kb),
        (None, Some(kb)) => (right, kb),
        _ => return NONE.to_owned(),
    };

    if kilobytes < KB_PER_GB {
        format!("{label}: {:.0} MB", (kilobytes / KB_PER_MB).round())
    } else {
        format!("{label}: {} GB", two_decimals(kilobytes / KB_PER_GB))
    }
}

/// Up to two decimals, trailing zeros dropped (`2` → `"2"`, `1.5` → `"1.5"`).
fn two_decimals(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

// ── 12-hour clock fields ─────────────────────────────────────────────

/// Split a `"hh:mmAM"` / `"hh:mm PM"` string into 24-hour `(hour, minute)`.
pub fn parse_clock_12h(value: &str) -> Option<(u32, u32)> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let upper = compact.to_ascii_uppercase();
    let (clock, pm) = if let Some(rest) = upper.strip_suffix("PM") {
        (rest, true)
    } else if let Some(rest) = upper.strip_suffix("AM") {
        (rest, false)
    } else {
        return None;
    };

    let (h, m) = clock.split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let hour24 = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some((hour24, minute))
}

/// Format a 24-hour `(hour, minute)` back into the server's `"hh:mmAM"` form.
pub fn format_clock_12h(hour: u32, minute: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{h12:02}:{minute:02}{suffix}")
}

// ── Numeric input ────────────────────────────────────────────────────

/// Clamp host input into `[min, max]`.
///
/// Unparseable input falls back to `max`, or to `min` when it contains a
/// `-` (a mistyped negative number).
pub fn clamp_input(input: &str, min: i64, max: i64) -> i64 {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => n.clamp(min, max),
        Err(_) => match trimmed.parse::<f64>() {
            #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
            Ok(f) if f.is_finite() => (f.round() as i64).clamp(min, max),
            _ if trimmed.contains('-') => min,
            _ => max,
        },
    }
}
