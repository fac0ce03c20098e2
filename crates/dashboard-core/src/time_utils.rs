use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use crate::error::{DashboardError, Result};

/// Naive date-time layouts accepted in the CSV extracts, tried in order.
const DATETIME_FMTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Parse a purchase/delivery timestamp from a CSV cell.
///
/// Accepts the extract's native `YYYY-MM-DD HH:MM:SS` layout (optionally with
/// a `T` separator or fractional seconds), RFC 3339 strings carrying an offset
/// (converted to UTC and stripped of the zone), and a bare `YYYY-MM-DD`, which
/// becomes midnight.
///
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FMTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    let normalised = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    warn!("could not parse timestamp \"{}\"", s);
    None
}

/// Parse a `YYYY-MM-DD` calendar date, as typed on the command line.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DashboardError::InvalidDate(s.to_string()))
}

/// Shift `date` by `months` calendar months, clamping the day to the last
/// valid day of the target month (e.g. Jan 31 + 1 month → Feb 28/29).
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    use chrono::Months;
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
            .unwrap_or(date)
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
            .unwrap_or(date)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
