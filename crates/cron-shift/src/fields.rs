//! Cron expression ⇄ structured field set.
//!
//! [`CronFields::parse`] expands every field of a 5- or 6-field cron
//! expression into its sorted list of concrete values, and
//! [`CronFields::to_expression`] folds such a field set back into the
//! shortest equivalent text. Seconds are a first-class field in both
//! directions: the output always has six fields, seconds first.
//!
//! # Grammar
//!
//! Each field accepts `*`, a value, a range `a-b`, a step (`*/n`, `a/n`,
//! `a-b/n`) or a comma-separated list of those. Months accept `JAN`–`DEC`,
//! weekdays `SUN`–`SAT` (and `7` for Sunday), day-of-month accepts `L` for
//! the last day of the month, and `?` is accepted as `*` in the two day
//! fields.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Result, ShiftError};

/// Longest possible length of each month; February counts its leap day.
const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MONTH_NAMES: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const WEEKDAY_NAMES: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Static description of one numeric cron field.
#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
    /// Names accepted in place of numbers, mapped to `min + index`.
    aliases: &'static [&'static str],
    /// Whether `?` is accepted as a synonym for `*`.
    question: bool,
}

const SECOND: FieldSpec = FieldSpec {
    name: "second",
    min: 0,
    max: 59,
    aliases: &[],
    question: false,
};

const MINUTE: FieldSpec = FieldSpec {
    name: "minute",
    min: 0,
    max: 59,
    aliases: &[],
    question: false,
};

const HOUR: FieldSpec = FieldSpec {
    name: "hour",
    min: 0,
    max: 23,
    aliases: &[],
    question: false,
};

const DAY_OF_MONTH: FieldSpec = FieldSpec {
    name: "day of month",
    min: 1,
    max: 31,
    aliases: &[],
    question: true,
};

const MONTH: FieldSpec = FieldSpec {
    name: "month",
    min: 1,
    max: 12,
    aliases: MONTH_NAMES,
    question: false,
};

// 7 is accepted on input and folded onto Sunday (0).
const DAY_OF_WEEK: FieldSpec = FieldSpec {
    name: "day of week",
    min: 0,
    max: 7,
    aliases: WEEKDAY_NAMES,
    question: true,
};

/// One entry of the day-of-month field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfMonth {
    /// An explicit day, 1–31.
    Day(u32),
    /// `L`: the last calendar day of whichever month is running.
    Last,
}

impl fmt::Display for DayOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayOfMonth::Day(n) => write!(f, "{n}"),
            DayOfMonth::Last => f.write_str("L"),
        }
    }
}

impl Serialize for DayOfMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DayOfMonth::Day(n) => serializer.serialize_u32(*n),
            DayOfMonth::Last => serializer.serialize_str("L"),
        }
    }
}

/// A parsed cron expression: one sorted value list per field.
///
/// Between parsing and serialization the lists may be out of order or hold
/// duplicates; [`CronFields::to_expression`] normalizes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronFields {
    pub second: Vec<u32>,
    pub minute: Vec<u32>,
    pub hour: Vec<u32>,
    pub day_of_month: Vec<DayOfMonth>,
    pub day_of_week: Vec<u32>,
    pub month: Vec<u32>,
}

impl CronFields {
    /// Parse a 5-field (`min hour dom month dow`) or 6-field (leading
    /// seconds) cron expression. A 5-field expression fires at second 0.
    ///
    /// # Errors
    ///
    /// Returns [`ShiftError::InvalidExpression`] for the wrong number of
    /// fields, [`ShiftError::InvalidField`] for a malformed or out-of-range
    /// field, and [`ShiftError::DayMonthConflict`] when no listed
    /// day-of-month exists in any of the listed months (e.g. `0 0 31 2 *`).
    ///
    /// # Examples
    ///
    /// ```
    /// use cron_shift::fields::{CronFields, DayOfMonth};
    ///
    /// let fields = CronFields::parse("*/20 9-11 L * MON-FRI").unwrap();
    /// assert_eq!(fields.second, vec![0]);
    /// assert_eq!(fields.minute, vec![0, 20, 40]);
    /// assert_eq!(fields.hour, vec![9, 10, 11]);
    /// assert_eq!(fields.day_of_month, vec![DayOfMonth::Last]);
    /// assert_eq!(fields.day_of_week, vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn parse(expression: &str) -> Result<Self> {
        let parts: Vec<&str> = expression.split_whitespace().collect();

        let (second, rest) = match parts.len() {
            5 => (vec![0], &parts[..]),
            6 => (parse_field(&SECOND, parts[0])?, &parts[1..]),
            n => {
                return Err(ShiftError::InvalidExpression(format!(
                    "'{expression}': expected 5 or 6 fields, got {n}"
                )));
            }
        };

        let fields = CronFields {
            second,
            minute: parse_field(&MINUTE, rest[0])?,
            hour: parse_field(&HOUR, rest[1])?,
            day_of_month: parse_day_of_month(rest[2])?,
            month: parse_field(&MONTH, rest[3])?,
            day_of_week: parse_day_of_week(rest[4])?,
        };

        check_day_month(&fields.day_of_month, &fields.month)?;
        Ok(fields)
    }

    /// The job's nominal fire time: the first hour and first minute listed.
    pub fn base_time(&self) -> (u32, u32) {
        (
            self.hour.first().copied().unwrap_or(0),
            self.minute.first().copied().unwrap_or(0),
        )
    }

    /// Serialize back to a six-field cron expression, seconds first.
    ///
    /// # Errors
    ///
    /// Returns [`ShiftError::InvalidField`] if a field is empty or holds a
    /// value outside its domain, and [`ShiftError::DayMonthConflict`] if the
    /// day-of-month selection cannot occur in any allowed month. Callers
    /// match on the latter to recover.
    ///
    /// # Examples
    ///
    /// ```
    /// use cron_shift::fields::CronFields;
    ///
    /// let fields = CronFields::parse("0 12 * * 1,3,5").unwrap();
    /// assert_eq!(fields.to_expression().unwrap(), "0 0 12 * * 1,3,5");
    /// ```
    pub fn to_expression(&self) -> Result<String> {
        let second = format_field(&SECOND, &self.second)?;
        let minute = format_field(&MINUTE, &self.minute)?;
        let hour = format_field(&HOUR, &self.hour)?;
        let day_of_month = format_day_of_month(&self.day_of_month)?;
        let month = format_field(&MONTH, &self.month)?;
        let day_of_week = format_field(&DAY_OF_WEEK_OUT, &self.day_of_week)?;

        check_day_month(&self.day_of_month, &self.month)?;

        Ok(format!(
            "{second} {minute} {hour} {day_of_month} {month} {day_of_week}"
        ))
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────────

fn invalid(spec: &FieldSpec, reason: String) -> ShiftError {
    ShiftError::InvalidField {
        field: spec.name,
        reason,
    }
}

/// Parse a whole field (comma list) into sorted, de-duplicated values.
fn parse_field(spec: &FieldSpec, text: &str) -> Result<Vec<u32>> {
    let mut values = Vec::new();
    for part in text.split(',') {
        values.extend(parse_part(spec, part)?);
    }
    values.sort_unstable();
    values.dedup();
    Ok(values)
}

fn parse_day_of_month(text: &str) -> Result<Vec<DayOfMonth>> {
    let mut days = Vec::new();
    for part in text.split(',') {
        if part.eq_ignore_ascii_case("L") {
            days.push(DayOfMonth::Last);
        } else {
            days.extend(parse_part(&DAY_OF_MONTH, part)?.into_iter().map(DayOfMonth::Day));
        }
    }
    days.sort_unstable();
    days.dedup();
    Ok(days)
}

fn parse_day_of_week(text: &str) -> Result<Vec<u32>> {
    let mut days: Vec<u32> = parse_field(&DAY_OF_WEEK, text)?
        .into_iter()
        .map(|d| d % 7)
        .collect();
    days.sort_unstable();
    days.dedup();
    Ok(days)
}

/// Expand one comma-separated element: `*`, `n`, `a-b`, optionally `/step`.
fn parse_part(spec: &FieldSpec, part: &str) -> Result<Vec<u32>> {
    if part.is_empty() {
        return Err(invalid(spec, "empty list element".to_string()));
    }

    let (range, step) = match part.split_once('/') {
        Some((range, step)) => {
            let step: u32 = step
                .parse()
                .map_err(|_| invalid(spec, format!("invalid step '{step}'")))?;
            if step == 0 {
                return Err(invalid(spec, "step must be greater than zero".to_string()));
            }
            (range, Some(step))
        }
        None => (part, None),
    };

    let (lo, hi) = if range == "*" || (spec.question && range == "?") {
        (spec.min, spec.max)
    } else if let Some((a, b)) = range.split_once('-') {
        let lo = parse_value(spec, a)?;
        let hi = parse_value(spec, b)?;
        if lo > hi {
            return Err(invalid(spec, format!("reversed range '{range}'")));
        }
        (lo, hi)
    } else {
        let value = parse_value(spec, range)?;
        // `a/n` runs from `a` to the end of the domain.
        match step {
            Some(_) => (value, spec.max),
            None => (value, value),
        }
    };

    let step = step.unwrap_or(1) as usize;
    Ok((lo..=hi).step_by(step).collect())
}

fn parse_value(spec: &FieldSpec, token: &str) -> Result<u32> {
    let value = match token.parse::<u32>() {
        Ok(n) => n,
        Err(_) => spec
            .aliases
            .iter()
            .position(|alias| alias.eq_ignore_ascii_case(token))
            .map(|i| spec.min + i as u32)
            .ok_or_else(|| invalid(spec, format!("unrecognized value '{token}'")))?,
    };

    if value < spec.min || value > spec.max {
        return Err(invalid(
            spec,
            format!("value {value} out of range {}-{}", spec.min, spec.max),
        ));
    }
    Ok(value)
}

/// Reject day-of-month selections that can never fire in the allowed months.
fn check_day_month(days: &[DayOfMonth], months: &[u32]) -> Result<()> {
    if days.contains(&DayOfMonth::Last) {
        return Ok(());
    }

    let longest = months
        .iter()
        .filter_map(|&m| DAYS_IN_MONTH.get((m as usize).wrapping_sub(1)))
        .copied()
        .max()
        .unwrap_or(31);

    let possible = days
        .iter()
        .any(|d| matches!(d, DayOfMonth::Day(n) if *n <= longest));

    if possible {
        Ok(())
    } else {
        let days: Vec<String> = days.iter().map(ToString::to_string).collect();
        let months: Vec<String> = months.iter().map(ToString::to_string).collect();
        Err(ShiftError::DayMonthConflict(format!(
            "day {} does not occur in month {}",
            days.join(","),
            months.join(",")
        )))
    }
}

// ── Serialization ───────────────────────────────────────────────────────────

// Weekdays are emitted in 0-6; Sunday is never written as 7.
const DAY_OF_WEEK_OUT: FieldSpec = FieldSpec {
    max: 6,
    ..DAY_OF_WEEK
};

fn format_field(spec: &FieldSpec, values: &[u32]) -> Result<String> {
    if values.is_empty() {
        return Err(invalid(spec, "no values".to_string()));
    }
    if let Some(bad) = values.iter().find(|&&v| v < spec.min || v > spec.max) {
        return Err(invalid(
            spec,
            format!("value {bad} out of range {}-{}", spec.min, spec.max),
        ));
    }

    let mut values = values.to_vec();
    values.sort_unstable();
    values.dedup();
    Ok(compact(&values, spec.min, spec.max))
}

fn format_day_of_month(days: &[DayOfMonth]) -> Result<String> {
    if days.is_empty() {
        return Err(invalid(&DAY_OF_MONTH, "no values".to_string()));
    }

    let mut numeric = Vec::new();
    let mut last = false;
    for day in days {
        match *day {
            DayOfMonth::Day(n) if (DAY_OF_MONTH.min..=DAY_OF_MONTH.max).contains(&n) => {
                numeric.push(n)
            }
            DayOfMonth::Day(n) => {
                return Err(invalid(
                    &DAY_OF_MONTH,
                    format!("value {n} out of range 1-31"),
                ));
            }
            DayOfMonth::Last => last = true,
        }
    }
    numeric.sort_unstable();
    numeric.dedup();

    let full = numeric.len() as u32 == DAY_OF_MONTH.max;
    Ok(match (numeric.is_empty(), last) {
        (true, _) => "L".to_string(),
        (false, true) if !full => format!("{},L", compact(&numeric, 1, 31)),
        _ => compact(&numeric, 1, 31),
    })
}

/// Shortest text for a sorted, de-duplicated, in-range value list.
fn compact(values: &[u32], min: u32, max: u32) -> String {
    if values.len() as u32 == max - min + 1 {
        return "*".to_string();
    }

    if let Some(step) = uniform_step(values, min, max) {
        return format!("*/{step}");
    }

    let mut parts = Vec::new();
    let mut i = 0;
    while i < values.len() {
        let start = values[i];
        let mut j = i;
        while j + 1 < values.len() && values[j + 1] == values[j] + 1 {
            j += 1;
        }
        if j - i >= 2 {
            parts.push(format!("{}-{}", start, values[j]));
        } else {
            parts.extend(values[i..=j].iter().map(ToString::to_string));
        }
        i = j + 1;
    }
    parts.join(",")
}

/// `Some(n)` when `values` is exactly what `*/n` expands to.
fn uniform_step(values: &[u32], min: u32, max: u32) -> Option<u32> {
    if values.len() < 2 || values[0] != min {
        return None;
    }
    let step = values[1] - values[0];
    if step < 2 || step > (max - min + 1) / 2 {
        return None;
    }
    let uniform = values.windows(2).all(|w| w[1] - w[0] == step);
    let covers = values[values.len() - 1] + step > max;
    (uniform && covers).then_some(step)
}
