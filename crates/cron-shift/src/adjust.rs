//! Wraparound shifts for individual cron fields.
//!
//! Every adjuster maps each value of a field by a signed delta and returns a
//! new list of the same length. The delta is expected to be within one
//! domain width. The day-of-month, day-of-week and month adjusters leave a
//! field that already lists (nearly) its whole domain untouched, since such a
//! field fires on every value anyway.

use crate::fields::DayOfMonth;

/// A day-of-month field with more entries than this is treated as `*`.
pub const DAY_OF_MONTH_SATURATION: usize = 30;
/// A day-of-week field with more entries than this is treated as `*`.
pub const DAY_OF_WEEK_SATURATION: usize = 6;
/// A month field with more entries than this is treated as `*`.
pub const MONTH_SATURATION: usize = 11;

/// Shift hours, wrapping within 0–23.
///
/// ```
/// use cron_shift::adjust::add_hours;
///
/// assert_eq!(add_hours(&[22], 3), vec![1]);
/// assert_eq!(add_hours(&[1], -3), vec![22]);
/// ```
pub fn add_hours(hours: &[u32], delta: i32) -> Vec<u32> {
    hours.iter().map(|&h| wrap(h, delta, 24)).collect()
}

/// Shift minutes, wrapping within 0–59.
pub fn add_minutes(minutes: &[u32], delta: i32) -> Vec<u32> {
    minutes.iter().map(|&m| wrap(m, delta, 60)).collect()
}

fn wrap(value: u32, delta: i32, modulus: i32) -> u32 {
    (value as i32 + delta).rem_euclid(modulus) as u32
}

/// Shift days of the month.
///
/// Past day 31 the result is day 1; before day 1 it is [`DayOfMonth::Last`].
/// A `Last` entry shifted by a non-zero delta becomes day 1. There is no
/// per-month calendar here: day 30 shifted by +1 is day 31 even when the
/// month has 30 days.
///
/// ```
/// use cron_shift::adjust::add_day_of_month;
/// use cron_shift::fields::DayOfMonth::{Day, Last};
///
/// assert_eq!(add_day_of_month(&[Day(30)], 2), vec![Day(1)]);
/// assert_eq!(add_day_of_month(&[Day(1)], -2), vec![Last]);
/// ```
pub fn add_day_of_month(days: &[DayOfMonth], delta: i32) -> Vec<DayOfMonth> {
    if days.len() > DAY_OF_MONTH_SATURATION || delta == 0 {
        return days.to_vec();
    }
    days.iter()
        .map(|&day| match day {
            DayOfMonth::Last => DayOfMonth::Day(1),
            DayOfMonth::Day(n) => {
                let shifted = n as i32 + delta;
                if shifted > 31 {
                    DayOfMonth::Day(1)
                } else if shifted < 1 {
                    DayOfMonth::Last
                } else {
                    DayOfMonth::Day(shifted as u32)
                }
            }
        })
        .collect()
}

/// Shift days of the week (0 = Sunday). Past Saturday is Sunday and before
/// Sunday is Saturday.
pub fn add_day_of_week(days: &[u32], delta: i32) -> Vec<u32> {
    if days.len() > DAY_OF_WEEK_SATURATION {
        return days.to_vec();
    }
    days.iter()
        .map(|&d| clamp_wrap(d, delta, 0, 6))
        .collect()
}

/// Shift months. Past December is January and before January is December.
///
/// ```
/// use cron_shift::adjust::add_month;
///
/// assert_eq!(add_month(&[12], 1), vec![1]);
/// assert_eq!(add_month(&[1], -1), vec![12]);
/// ```
pub fn add_month(months: &[u32], delta: i32) -> Vec<u32> {
    if months.len() > MONTH_SATURATION {
        return months.to_vec();
    }
    months
        .iter()
        .map(|&m| clamp_wrap(m, delta, 1, 12))
        .collect()
}

/// Overflow lands on `min`, underflow on `max`.
fn clamp_wrap(value: u32, delta: i32, min: u32, max: u32) -> u32 {
    let shifted = value as i32 + delta;
    if shifted > max as i32 {
        min
    } else if shifted < min as i32 {
        max
    } else {
        shifted as u32
    }
}
