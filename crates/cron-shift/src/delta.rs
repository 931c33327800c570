//! Resolve a minute offset into hour, minute and day shifts for a time of day.

use serde::Serialize;

const MINUTES_PER_HOUR: i32 = 60;
const MINUTES_PER_DAY: i32 = 24 * MINUTES_PER_HOUR;

/// How far a time of day moves under a timezone offset.
///
/// `hours` and `minutes` are deltas relative to the original hour and minute,
/// not absolute values. `days` is the number of midnights crossed, negative
/// when the shift lands on an earlier calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeDelta {
    pub hours: i32,
    pub minutes: i32,
    pub days: i32,
}

/// Compute the [`TimeDelta`] that moves `hour:minute` by `offset` minutes.
///
/// Uses floored division, so `hour + hours` always lands in 0–23 and
/// `minute + minutes` in 0–59 while `days` carries the remainder:
///
/// ```
/// use cron_shift::delta::{days_hours_minutes, TimeDelta};
///
/// // 22:30 shifted forward 3h lands at 01:30 the next day.
/// assert_eq!(
///     days_hours_minutes(22, 30, 180),
///     TimeDelta { hours: -21, minutes: 0, days: 1 }
/// );
/// ```
pub fn days_hours_minutes(hour: u32, minute: u32, offset: i32) -> TimeDelta {
    let hour = hour as i32;
    let minute = minute as i32;
    let total = hour * MINUTES_PER_HOUR + minute + offset;

    TimeDelta {
        hours: total.div_euclid(MINUTES_PER_HOUR).rem_euclid(24) - hour,
        minutes: total.rem_euclid(MINUTES_PER_HOUR) - minute,
        days: total.div_euclid(MINUTES_PER_DAY),
    }
}
