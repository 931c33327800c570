//! # cron-shift
//!
//! Move cron schedules between timezones.
//!
//! Given a cron expression written for one IANA timezone, cron-shift
//! produces the expression that fires at the same instants when evaluated in
//! another timezone. The UTC-offset difference is taken at a single instant
//! (normally "now"), and the minute, hour, day-of-month, day-of-week and month
//! fields are rewritten with wraparound and day carry.
//!
//! ## Modules
//!
//! - [`offset`] — UTC-offset difference between two zones at an instant
//! - [`delta`] — Split a minute offset into hour/minute deltas and a day carry
//! - [`fields`] — Cron expression ⇄ per-field value lists
//! - [`adjust`] — Wraparound shifts for each cron field
//! - [`convert`](mod@convert) — The conversion pipeline
//! - [`error`] — Error types

pub mod adjust;
pub mod convert;
pub mod delta;
pub mod error;
pub mod fields;
pub mod offset;

pub use adjust::{add_day_of_month, add_day_of_week, add_hours, add_minutes, add_month};
pub use convert::{convert, convert_at, convert_detailed, shift_fields, Conversion, Outcome};
pub use delta::{days_hours_minutes, TimeDelta};
pub use error::ShiftError;
pub use fields::{CronFields, DayOfMonth};
pub use offset::{offset_between, offset_now};
