//! Tracking date parsing and transit estimates.
//!
//! The carrier sends dates as `DD-MMM-YYYY` (e.g. `14-JUN-2025`) with an
//! optional `HH:MM:SS` time. Formatting never fails: a date that cannot be
//! parsed is shown as the carrier sent it, and a transit estimate that
//! cannot be computed is shown as [`CALCULATING`].

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Placeholder shown when an estimated delivery date cannot be computed.
pub const CALCULATING: &str = "Calculating...";

/// Transit time for destinations missing from [`TRANSIT_DAYS`].
pub const DEFAULT_TRANSIT_DAYS: u32 = 7;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Typical door-to-door transit time in days, keyed by uppercase destination.
pub const TRANSIT_DAYS: &[(&str, u32)] = &[
    ("AUSTRALIA", 6),
    ("CANADA", 6),
    ("CHINA", 5),
    ("FRANCE", 5),
    ("GERMANY", 5),
    ("HONG KONG", 4),
    ("INDIA", 3),
    ("ITALY", 5),
    ("JAPAN", 5),
    ("MALAYSIA", 4),
    ("NETHERLANDS", 5),
    ("NEW ZEALAND", 7),
    ("QATAR", 3),
    ("SAUDI ARABIA", 4),
    ("SINGAPORE", 4),
    ("SOUTH KOREA", 5),
    ("SPAIN", 5),
    ("UAE", 3),
    ("UK", 4),
    ("UNITED ARAB EMIRATES", 3),
    ("UNITED KINGDOM", 4),
    ("UNITED STATES", 5),
    ("USA", 5),
];

/// Expected delivery derived from a booking date and destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitEstimate {
    /// Destination as looked up (uppercase, trimmed).
    pub destination: String,
    /// Days added to the booking date.
    pub transit_days: u32,
    /// Booking date plus transit days.
    pub estimated_date: NaiveDate,
}

impl TransitEstimate {
    /// Long display form, e.g. `"Wednesday, January 8, 2025"`.
    pub fn display(&self) -> String {
        format_long_date(self.estimated_date)
    }
}

/// Parses `DD-MMM-YYYY` plus an optional `HH:MM:SS`.
///
/// Unknown month abbreviations resolve to January. A day past the end of the
/// month rolls into the following month, as a calendar constructor would.
/// Missing or non-numeric time components count as zero. Times too large to
/// represent yield `None`.
pub fn parse_tracking_date(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let mut parts = date.trim().split('-');
    let day: i64 = parts.next()?.trim().parse().ok()?;
    let month = month_number(parts.next()?);
    let year: i32 = parts.next()?.trim().parse().ok()?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first.checked_add_signed(Duration::try_days(day - 1)?)?;
    let midnight = date.and_hms_opt(0, 0, 0)?;

    match time {
        Some(t) if !t.trim().is_empty() => {
            midnight.checked_add_signed(Duration::try_seconds(time_offset_seconds(t)?)?)
        }
        _ => Some(midnight),
    }
}

/// Formats a carrier date for display.
///
/// Returns `"Jun 14, 2025"`, or `"Jun 14, 2025, 3:45 PM"` when a time is
/// given. Unparseable input comes back unchanged.
///
/// # Examples
///
/// ```
/// use skylink_core::format_tracking_date;
///
/// assert_eq!(format_tracking_date("14-JUN-2025", None), "Jun 14, 2025");
/// assert_eq!(format_tracking_date("garbage", None), "garbage");
/// ```
pub fn format_tracking_date(date: &str, time: Option<&str>) -> String {
    let has_time = time.is_some_and(|t| !t.trim().is_empty());
    match parse_tracking_date(date, time) {
        Some(parsed) if has_time => parsed.format("%b %-d, %Y, %-I:%M %p").to_string(),
        Some(parsed) => parsed.format("%b %-d, %Y").to_string(),
        None => {
            log::debug!("Unparseable tracking date '{date}', showing as-is");
            date.to_string()
        }
    }
}

/// Transit days for a destination, falling back to [`DEFAULT_TRANSIT_DAYS`].
pub fn transit_days(destination: &str) -> u32 {
    let key = destination.trim().to_uppercase();
    TRANSIT_DAYS
        .iter()
        .find(|(country, _)| *country == key)
        .map(|(_, days)| *days)
        .unwrap_or(DEFAULT_TRANSIT_DAYS)
}

/// Computes the transit estimate for a booking, if the booking date parses.
pub fn estimate_transit(destination: &str, booking_date: &str) -> Option<TransitEstimate> {
    let booked = parse_tracking_date(booking_date, None)?.date();
    let days = transit_days(destination);
    let estimated_date = booked.checked_add_signed(Duration::try_days(i64::from(days))?)?;
    Some(TransitEstimate {
        destination: destination.trim().to_uppercase(),
        transit_days: days,
        estimated_date,
    })
}

/// Estimated delivery date for display, or [`CALCULATING`] on failure.
///
/// # Examples
///
/// ```
/// use skylink_core::estimated_delivery;
///
/// assert_eq!(
///     estimated_delivery("UNKNOWN COUNTRY", "01-JAN-2025"),
///     "Wednesday, January 8, 2025"
/// );
/// assert_eq!(estimated_delivery("UK", "not a date"), "Calculating...");
/// ```
pub fn estimated_delivery(destination: &str, booking_date: &str) -> String {
    estimate_transit(destination, booking_date)
        .map(|estimate| estimate.display())
        .unwrap_or_else(|| CALCULATING.to_string())
}

fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

// Month index is 1-based for chrono; unknown abbreviations map to January.
fn month_number(abbrev: &str) -> u32 {
    let key = abbrev.trim().to_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == key)
        .map(|i| i as u32 + 1)
        .unwrap_or(1)
}

// `None` when the components overflow.
fn time_offset_seconds(time: &str) -> Option<i64> {
    let mut fields = time
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<i64>().unwrap_or(0));
    let hours = fields.next().unwrap_or(0);
    let minutes = fields.next().unwrap_or(0);
    let seconds = fields.next().unwrap_or(0);
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}
