//! Rewrite a cron expression so it fires at the same instants in another
//! timezone.
//!
//! The pipeline is `parse → shift → serialize`:
//!
//! 1. The expression is parsed into a [`CronFields`]. Its first hour and
//!    minute are the job's nominal fire time.
//! 2. The UTC-offset difference between the two zones at `now` is resolved
//!    into a [`TimeDelta`] for that fire time.
//! 3. [`shift_fields`] applies the delta to every field and returns a new
//!    field set.
//! 4. The new set is serialized. If its day-of-month can no longer occur in
//!    its months, the day is pinned to 1 and the month rolled once more in
//!    the direction of the shift, then serialized again.
//!
//! Conversion never fails from the caller's point of view: any error along
//! the way yields the input expression unchanged.
//!
//! The offset is taken at a single instant, so a schedule converted in
//! January reflects January's DST state in both zones.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adjust::{add_day_of_month, add_day_of_week, add_hours, add_minutes, add_month};
use crate::delta::{days_hours_minutes, TimeDelta};
use crate::error::{Result, ShiftError};
use crate::fields::{CronFields, DayOfMonth};
use crate::offset::offset_between;

/// How a [`Conversion`] produced its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every field was shifted and serialized directly.
    Shifted,
    /// The shifted day-of-month was impossible for its months; it was pinned
    /// to day 1 and the month rolled.
    Recovered,
    /// Conversion failed and the input is returned as-is.
    Unchanged,
}

/// The result of converting a cron expression, with the intermediate values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// The expression as given.
    pub original: String,
    /// The converted expression, or `original` when `outcome` is `Unchanged`.
    pub converted: String,
    /// Target minus original UTC offset, when both zones resolved.
    pub offset_minutes: Option<i32>,
    /// The shift applied to the nominal fire time, when the expression parsed.
    pub delta: Option<TimeDelta>,
    pub outcome: Outcome,
}

/// Convert `expression` from `original_tz` to `target_tz` using the offsets
/// in effect right now.
///
/// Returns a six-field expression (seconds first), or `expression` unchanged
/// if it cannot be converted.
///
/// ```
/// use cron_shift::convert;
///
/// let shifted = convert("0 12 * * *", "UTC", "UTC");
/// assert_eq!(shifted, "0 0 12 * * *");
///
/// // Unknown zones leave the expression alone.
/// assert_eq!(convert("0 12 * * *", "Nowhere", "UTC"), "0 12 * * *");
/// ```
pub fn convert(expression: &str, original_tz: &str, target_tz: &str) -> String {
    convert_at(expression, original_tz, target_tz, Utc::now())
}

/// [`convert`] with an explicit "now" anchor for the offset lookup.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cron_shift::convert_at;
///
/// // Noon in New York is 17:00 in London during January.
/// let january = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
/// assert_eq!(
///     convert_at("0 12 * * *", "America/New_York", "Europe/London", january),
///     "0 0 17 * * *"
/// );
/// ```
pub fn convert_at(
    expression: &str,
    original_tz: &str,
    target_tz: &str,
    now: DateTime<Utc>,
) -> String {
    convert_detailed(expression, original_tz, target_tz, now).converted
}

/// [`convert_at`], reporting the offset, the delta and how the result was
/// reached.
pub fn convert_detailed(
    expression: &str,
    original_tz: &str,
    target_tz: &str,
    now: DateTime<Utc>,
) -> Conversion {
    convert_with(
        expression,
        original_tz,
        target_tz,
        now,
        CronFields::to_expression,
    )
}

fn convert_with<F>(
    expression: &str,
    original_tz: &str,
    target_tz: &str,
    now: DateTime<Utc>,
    serialize: F,
) -> Conversion
where
    F: Fn(&CronFields) -> Result<String>,
{
    let unchanged = |offset_minutes, delta| Conversion {
        original: expression.to_string(),
        converted: expression.to_string(),
        offset_minutes,
        delta,
        outcome: Outcome::Unchanged,
    };

    let offset = match offset_between(original_tz, target_tz, now) {
        Ok(offset) => offset,
        Err(err) => {
            tracing::warn!(error = %err, expression, "timezone lookup failed, expression left unchanged");
            return unchanged(None, None);
        }
    };

    let fields = match CronFields::parse(expression) {
        Ok(fields) => fields,
        Err(err) => {
            tracing::warn!(error = %err, expression, "unparseable cron expression left unchanged");
            return unchanged(Some(offset), None);
        }
    };

    let (hour, minute) = fields.base_time();
    let delta = days_hours_minutes(hour, minute, offset);
    tracing::debug!(
        original_tz,
        target_tz,
        offset,
        hours = delta.hours,
        minutes = delta.minutes,
        days = delta.days,
        "resolved cron shift"
    );

    let shifted = shift_fields(&fields, &delta);
    match serialize_with_recovery(shifted, delta.days, serialize) {
        Ok((converted, outcome)) => Conversion {
            original: expression.to_string(),
            converted,
            offset_minutes: Some(offset),
            delta: Some(delta),
            outcome,
        },
        Err(err) => {
            tracing::warn!(error = %err, expression, "shifted fields failed to serialize, expression left unchanged");
            unchanged(Some(offset), Some(delta))
        }
    }
}

/// Apply `delta` to every field of `fields`.
///
/// Minutes and hours wrap within the day and the day fields move by
/// `delta.days`. When day 1 moves backward or day 31 moves forward, the
/// month field moves with it. Seconds are never shifted.
///
/// ```
/// use cron_shift::delta::TimeDelta;
/// use cron_shift::fields::CronFields;
/// use cron_shift::shift_fields;
///
/// let fields = CronFields::parse("0 22 31 12 *").unwrap();
/// let shifted = shift_fields(&fields, &TimeDelta { hours: -20, minutes: 0, days: 1 });
/// assert_eq!(shifted.to_expression().unwrap(), "0 0 2 1 1 *");
/// ```
pub fn shift_fields(fields: &CronFields, delta: &TimeDelta) -> CronFields {
    let month_rolls = (fields.day_of_month.contains(&DayOfMonth::Day(1)) && delta.days == -1)
        || (fields.day_of_month.contains(&DayOfMonth::Day(31)) && delta.days == 1);

    let month = if month_rolls {
        add_month(&fields.month, delta.days)
    } else {
        fields.month.clone()
    };

    CronFields {
        second: fields.second.clone(),
        minute: add_minutes(&fields.minute, delta.minutes),
        hour: add_hours(&fields.hour, delta.hours),
        day_of_month: add_day_of_month(&fields.day_of_month, delta.days),
        day_of_week: add_day_of_week(&fields.day_of_week, delta.days),
        month,
    }
}

/// Serialize `fields`, retrying once with day 1 of the next (or previous)
/// month if the day-of-month became impossible.
fn serialize_with_recovery<F>(fields: CronFields, days: i32, serialize: F) -> Result<(String, Outcome)>
where
    F: Fn(&CronFields) -> Result<String>,
{
    match serialize(&fields) {
        Ok(expression) => Ok((expression, Outcome::Shifted)),
        Err(ShiftError::DayMonthConflict(reason)) => {
            tracing::debug!(%reason, "pinning shifted day of month to 1");
            let pinned = CronFields {
                day_of_month: vec![DayOfMonth::Day(1)],
                month: add_month(&fields.month, days.signum()),
                ..fields
            };
            serialize(&pinned).map(|expression| (expression, Outcome::Recovered))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Mid-January: no DST in the northern hemisphere.
    fn january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    fn july() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap()
    }

    // ── convert tests ───────────────────────────────────────────────────

    #[test]
    fn test_convert_new_york_to_london() {
        let result = convert_at("0 12 * * *", "America/New_York", "Europe/London", january());
        assert_eq!(result, "0 0 17 * * *");
        assert_ne!(result, "0 12 * * *");
    }

    #[test]
    fn test_convert_uses_dst_at_anchor() {
        // EDT is UTC-4 while London is on BST (UTC+1): still 5 hours apart.
        let result = convert_at("0 12 * * *", "America/New_York", "Europe/London", july());
        assert_eq!(result, "0 0 17 * * *");
        // New York to Los Angeles is 3 hours either way.
        let result = convert_at("0 9 * * *", "America/New_York", "America/Los_Angeles", july());
        assert_eq!(result, "0 0 6 * * *");
    }

    #[test]
    fn test_convert_into_next_day_with_wildcards() {
        // 12:00 EST is 02:00 JST the following day.
        let result = convert_at("0 12 * * *", "America/New_York", "Asia/Tokyo", january());
        assert_eq!(result, "0 0 2 * * *");
    }

    #[test]
    fn test_convert_weekdays_roll_forward() {
        // 22:30 EST on weekdays is 12:30 JST Tuesday through Saturday.
        let result = convert_at("30 22 * * 1-5", "America/New_York", "Asia/Tokyo", january());
        assert_eq!(result, "0 30 12 * * 2-6");
    }

    #[test]
    fn test_convert_weekday_rolls_backward() {
        // Monday 09:00 JST is Sunday 19:00 EST.
        let result = convert_at("0 9 * * MON", "Asia/Tokyo", "America/New_York", january());
        assert_eq!(result, "0 0 19 * * 0");
    }

    #[test]
    fn test_convert_fractional_hour_offset() {
        // 10:45 UTC is 16:15 IST.
        let result = convert_at("45 10 * * *", "UTC", "Asia/Kolkata", january());
        assert_eq!(result, "0 15 16 * * *");
    }

    #[test]
    fn test_convert_multiple_hours() {
        let result = convert_at("0 8,20 * * *", "UTC", "Europe/Berlin", january());
        assert_eq!(result, "0 0 9,21 * * *");
    }

    #[test]
    fn test_convert_preserves_seconds() {
        let result = convert_at("15 0 12 * * *", "America/New_York", "Europe/London", january());
        assert_eq!(result, "15 0 17 * * *");

        let result = convert_at("*/10 0 12 * * *", "America/New_York", "Europe/London", january());
        assert_eq!(result, "*/10 0 17 * * *");
    }

    #[test]
    fn test_convert_same_timezone_is_equivalent() {
        for expression in ["0 12 * * *", "30 6 L * *", "*/15 9-17 * * 1-5", "0 0 1 1 *"] {
            let result = convert_at(expression, "Europe/Paris", "Europe/Paris", january());
            assert_eq!(
                CronFields::parse(&result).unwrap(),
                CronFields::parse(expression).unwrap(),
                "{expression} became {result}"
            );
        }
    }

    #[test]
    fn test_convert_last_day_of_year_rolls_month() {
        // 22:00 on Dec 31 in New York is 03:00 on Jan 1 in London.
        let result = convert_at("0 22 31 12 *", "America/New_York", "Europe/London", january());
        assert_eq!(result, "0 0 3 1 1 *");
    }

    #[test]
    fn test_convert_first_of_month_rolls_back() {
        // 02:00 on Mar 1 in London is 21:00 on the last day of February in New York.
        let result = convert_at("0 2 1 3 *", "Europe/London", "America/New_York", january());
        assert_eq!(result, "0 0 21 L 2 *");
    }

    #[test]
    fn test_convert_recovers_impossible_day() {
        // 23:00 on Apr 30 in New York is 04:00 on May 1 in London; day 31 of
        // April does not exist, so the day is pinned and the month rolled.
        let conversion = convert_detailed(
            "0 23 30 4 *",
            "America/New_York",
            "Europe/London",
            january(),
        );
        assert_eq!(conversion.converted, "0 0 4 1 5 *");
        assert_eq!(conversion.outcome, Outcome::Recovered);
    }

    #[test]
    fn test_convert_invalid_timezone_returns_input() {
        let conversion = convert_detailed("0 12 * * *", "Invalid/Zone", "UTC", january());
        assert_eq!(conversion.converted, "0 12 * * *");
        assert_eq!(conversion.outcome, Outcome::Unchanged);
        assert_eq!(conversion.offset_minutes, None);
    }

    #[test]
    fn test_convert_invalid_expression_returns_input() {
        for expression in ["not a cron", "61 * * * *", "0 0 31 2 *", ""] {
            let result = convert_at(expression, "UTC", "Asia/Tokyo", january());
            assert_eq!(result, expression);
        }
    }

    #[test]
    fn test_convert_detailed_reports_delta() {
        let conversion = convert_detailed("0 12 * * *", "America/New_York", "Asia/Tokyo", january());
        assert_eq!(conversion.offset_minutes, Some(840));
        assert_eq!(
            conversion.delta,
            Some(TimeDelta { hours: -10, minutes: 0, days: 1 })
        );
        assert_eq!(conversion.outcome, Outcome::Shifted);
    }

    #[test]
    fn test_convert_falls_back_when_recovery_also_fails() {
        let always_conflicts =
            |_: &CronFields| -> Result<String> { Err(ShiftError::DayMonthConflict("forced".into())) };
        let conversion = convert_with(
            "0 23 30 4 *",
            "America/New_York",
            "Europe/London",
            january(),
            always_conflicts,
        );
        assert_eq!(conversion.converted, "0 23 30 4 *");
        assert_eq!(conversion.outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_convert_falls_back_on_other_serialize_errors() {
        let broken = |_: &CronFields| -> Result<String> {
            Err(ShiftError::InvalidField {
                field: "hour",
                reason: "forced".into(),
            })
        };
        let conversion = convert_with("0 12 * * *", "UTC", "Asia/Tokyo", january(), broken);
        assert_eq!(conversion.converted, "0 12 * * *");
        assert_eq!(conversion.outcome, Outcome::Unchanged);
    }

    // ── shift_fields tests ──────────────────────────────────────────────

    #[test]
    fn test_shift_fields_does_not_mutate_input() {
        let fields = CronFields::parse("0 23 15 6 3").unwrap();
        let before = fields.clone();
        let shifted = shift_fields(&fields, &TimeDelta { hours: -22, minutes: 0, days: 1 });
        assert_eq!(fields, before);
        assert_eq!(shifted.hour, vec![1]);
        assert_eq!(shifted.day_of_month, vec![DayOfMonth::Day(16)]);
        assert_eq!(shifted.day_of_week, vec![4]);
        assert_eq!(shifted.month, vec![6]);
    }

    #[test]
    fn test_shift_fields_month_roll_needs_edge_day() {
        // Day 30 moving forward does not roll the month on its own.
        let fields = CronFields::parse("0 23 30 6 *").unwrap();
        let shifted = shift_fields(&fields, &TimeDelta { hours: -22, minutes: 0, days: 1 });
        assert_eq!(shifted.month, vec![6]);
        assert_eq!(shifted.day_of_month, vec![DayOfMonth::Day(31)]);
    }

    #[test]
    fn test_shift_fields_month_roll_fires_for_any_listed_edge_day() {
        // A wildcard day field lists day 31, so a forward day shift rolls an
        // explicit month even though the days themselves pass through.
        let fields = CronFields::parse("0 23 * 6 *").unwrap();
        let shifted = shift_fields(&fields, &TimeDelta { hours: -22, minutes: 0, days: 1 });
        assert_eq!(shifted.month, vec![7]);
        assert_eq!(shifted.day_of_month.len(), 31);
    }

    #[test]
    fn test_shift_fields_keeps_seconds() {
        let fields = CronFields::parse("42 0 0 * * *").unwrap();
        let shifted = shift_fields(&fields, &TimeDelta { hours: 5, minutes: 30, days: 0 });
        assert_eq!(shifted.second, vec![42]);
        assert_eq!(shifted.minute, vec![30]);
        assert_eq!(shifted.hour, vec![5]);
    }

    // ── recovery tests ──────────────────────────────────────────────────

    #[test]
    fn test_recovery_rolls_month_by_sign_of_days() {
        let mut fields = CronFields::parse("0 0 1 3 *").unwrap();
        fields.day_of_month = vec![DayOfMonth::Day(31)];
        fields.month = vec![2];

        let (expression, outcome) =
            serialize_with_recovery(fields.clone(), 1, CronFields::to_expression).unwrap();
        assert_eq!(expression, "0 0 0 1 3 *");
        assert_eq!(outcome, Outcome::Recovered);

        let (expression, _) =
            serialize_with_recovery(fields, -1, CronFields::to_expression).unwrap();
        assert_eq!(expression, "0 0 0 1 1 *");
    }

    #[test]
    fn test_recovery_not_attempted_for_other_errors() {
        let mut fields = CronFields::parse("0 0 * * *").unwrap();
        fields.hour = vec![];
        let err = serialize_with_recovery(fields, 1, CronFields::to_expression).unwrap_err();
        assert!(matches!(err, ShiftError::InvalidField { field: "hour", .. }));
    }
}
