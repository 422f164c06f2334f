//! The `chronology_rs` crate is a chronology based date and time field
//! calculation engine.
//!
//! An instant is a signed count of milliseconds from 1970-01-01T00:00:00 in a
//! chronology's local timeline. A [`Chronology`] bundles one
//! [`DateTimeField`] and one [`DurationField`] per calendar slot, and those
//! fields do the actual work: reading a component out of an instant, setting
//! it, adding to it with calendar aware carry and clamping, and rounding to
//! field boundaries.
//!
//! ```rust
//! use chronology_rs::{Chronology, DateTimeField, DurationField, GregorianChronology};
//!
//! let chrono = GregorianChronology::instance_utc().unwrap();
//!
//! let jan_31 = chrono.date_time_millis(2001, 1, 31, 0).unwrap();
//! let feb_28 = chrono.months().add(jan_31, 1).unwrap();
//!
//! assert_eq!(chrono.month_of_year().get(feb_28).unwrap(), 2);
//! assert_eq!(chrono.day_of_month().get(feb_28).unwrap(), 28);
//! ```
//!
//! Fields come in two flavours. Precise fields (seconds, hours, days) have a
//! fixed unit length in milliseconds and are computed in closed form.
//! Imprecise fields (months, years, weekyears) vary in length with their
//! position on the timeline and are computed through the calendar math of
//! [`chronology::BasicCalendar`].
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::too_many_arguments,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // Millisecond and field arithmetic narrows between i64 and i32 after
    // explicit range checks.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

pub mod bucket;
pub mod chronology;
pub mod duration;
pub mod error;
pub mod field;
pub mod fields;
pub mod options;
pub mod partial;
pub mod provider;
pub mod symbols;
pub mod utils;

#[doc(hidden)]
pub(crate) mod rounding;

#[doc(inline)]
pub use error::ChronoError;

/// The `chronology_rs` result type
pub type ChronoResult<T> = Result<T, ChronoError>;

pub use crate::{
    bucket::DateTimeParserBucket,
    chronology::{
        AssembledChronology, Chronology, ChronologyRef, GregorianChronology, IsoChronology,
        JulianChronology, ZonedChronology,
    },
    duration::{DurationField, DurationFieldRef},
    field::{DateTimeField, DateTimeFieldRef},
    fields::{DateTimeFieldType, DurationFieldType},
    partial::{Partial, Period, ReadablePartial, ReadablePeriod},
    provider::{DateTimeZone, FixedOffsetZone, ZoneRef},
    symbols::LocaleSymbols,
};

/// A library specific trait for unwrapping assertions.
pub(crate) trait ChronoUnwrap {
    type Output;

    /// `chronology_rs` based assertion for unwrapping. This will panic in
    /// debug builds, but returns an error during runtime.
    fn chrono_unwrap(self) -> ChronoResult<Self::Output>;
}

impl<T> ChronoUnwrap for Option<T> {
    type Output = T;

    fn chrono_unwrap(self) -> ChronoResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(ChronoError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! chrono_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::ChronoError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::ChronoError::assert());
        }
    };
}

// Relevant numeric constants
/// Milliseconds per second constant.
pub const MILLIS_PER_SECOND: i64 = 1000;
/// Milliseconds per minute constant.
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
/// Milliseconds per hour constant.
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
/// Milliseconds per day constant: 8.64e+7
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
/// Milliseconds per week constant.
pub const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;

/// Era value for dates before the common era.
pub const BCE: i32 = 0;
/// Era value for dates in the common era.
pub const CE: i32 = 1;

/// Half-day value for the morning.
pub const AM: i32 = 0;
/// Half-day value for the afternoon.
pub const PM: i32 = 1;

/// Day-of-week value for Monday, the first day of the week.
pub const MONDAY: i32 = 1;
pub const TUESDAY: i32 = 2;
pub const WEDNESDAY: i32 = 3;
/// Day-of-week value for Thursday, the weekday of 1970-01-01.
pub const THURSDAY: i32 = 4;
pub const FRIDAY: i32 = 5;
pub const SATURDAY: i32 = 6;
/// Day-of-week value for Sunday, the last day of the week.
pub const SUNDAY: i32 = 7;
