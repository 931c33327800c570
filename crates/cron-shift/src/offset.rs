//! UTC-offset difference between two IANA timezones at a given instant.
//!
//! [`offset_between`] takes the "now" anchor explicitly so that callers (and
//! tests) can pin the instant. [`offset_now`] is the convenience wrapper that
//! reads the system clock once.

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ShiftError};

/// Parse an IANA timezone string into `Tz`.
///
/// ```
/// use cron_shift::offset::parse_timezone;
///
/// assert!(parse_timezone("Europe/London").is_ok());
/// assert!(parse_timezone("Mars/Olympus_Mons").is_err());
/// ```
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ShiftError::InvalidTimezone(format!("'{}'", s)))
}

/// UTC offset of `tz` at `instant`, in minutes (e.g. -240 for EDT).
pub fn utc_offset_minutes(tz: &Tz, instant: DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&instant.naive_utc())
        .fix()
        .local_minus_utc()
        / 60
}

/// Signed difference `target - original` between the two zones' UTC offsets
/// at `now`, in minutes.
///
/// The result may be negative, zero, or not a multiple of 60 for zones with
/// fractional-hour offsets such as `Asia/Kolkata`.
///
/// # Errors
///
/// Returns [`ShiftError::InvalidTimezone`] if either name is not a valid IANA
/// timezone.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cron_shift::offset::offset_between;
///
/// // January: New York is UTC-5, London is UTC+0.
/// let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
/// assert_eq!(offset_between("America/New_York", "Europe/London", now).unwrap(), 300);
/// ```
pub fn offset_between(original: &str, target: &str, now: DateTime<Utc>) -> Result<i32> {
    let original_tz = parse_timezone(original)?;
    let target_tz = parse_timezone(target)?;

    let original_offset = utc_offset_minutes(&original_tz, now);
    let target_offset = utc_offset_minutes(&target_tz, now);

    Ok(target_offset - original_offset)
}

/// [`offset_between`] anchored at the current system time.
pub fn offset_now(original: &str, target: &str) -> Result<i32> {
    offset_between(original, target, Utc::now())
}
