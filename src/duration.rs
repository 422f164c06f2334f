//! This module implements `DurationField`, the unit of time measurement.
//!
//! A duration field is either precise, with a fixed length in milliseconds,
//! or imprecise, where the length of one unit depends on where on the
//! timeline it is applied (months, years). Imprecise fields report an
//! average unit length and route arithmetic through the owning date-time
//! field, see [`crate::field::LinkedDurationField`].

use core::{cmp::Ordering, fmt};
use std::sync::Arc;

use crate::{
    fields::DurationFieldType,
    utils::{safe_multiply, safe_negate, safe_to_int},
    ChronoError, ChronoResult,
};

mod precise;
mod scaled;
mod unsupported;


pub use precise::{MillisDurationField, PreciseDurationField};
pub use scaled::ScaledDurationField;
pub use unsupported::UnsupportedDurationField;

/// A shared handle to a duration field.
pub type DurationFieldRef = Arc<dyn DurationField>;

/// A unit of time measurement.
///
/// Values are always whole units; conversions from milliseconds truncate
/// toward zero and differences count the whole units between two instants.
pub trait DurationField: Send + Sync + fmt::Debug {
    /// Returns the type that identifies this unit.
    fn field_type(&self) -> DurationFieldType;

    /// Returns the name of this unit, e.g. "days".
    fn name(&self) -> &'static str {
        self.field_type().name()
    }

    /// Returns `false` only for the unsupported sentinel.
    fn is_supported(&self) -> bool {
        true
    }

    /// Returns whether every unit has the same length in milliseconds.
    fn is_precise(&self) -> bool;

    /// Returns the exact unit length when precise, otherwise an average.
    fn unit_millis(&self) -> i64;

    /// Converts a millisecond duration to a count of whole units.
    fn value(&self, duration: i64) -> ChronoResult<i32> {
        safe_to_int(self.value_as_long(duration)?)
    }

    /// Converts a millisecond duration to a count of whole units.
    fn value_as_long(&self, duration: i64) -> ChronoResult<i64> {
        let unit = self.unit_millis();
        if unit == 0 {
            return Err(ChronoError::unsupported()
                .with_message(format!("{} field has no unit length", self.name())));
        }
        Ok(duration / unit)
    }

    /// Converts a millisecond duration measured from `instant` to a count of
    /// whole units.
    fn value_at(&self, duration: i64, instant: i64) -> ChronoResult<i32> {
        safe_to_int(self.value_as_long_at(duration, instant)?)
    }

    /// Converts a millisecond duration measured from `instant` to a count of
    /// whole units.
    fn value_as_long_at(&self, duration: i64, instant: i64) -> ChronoResult<i64>;

    /// Converts a count of units to milliseconds, using the average unit
    /// length for imprecise fields.
    fn millis(&self, value: i64) -> ChronoResult<i64> {
        safe_multiply(value, self.unit_millis())
    }

    /// Converts a count of units measured from `instant` to milliseconds.
    fn millis_at(&self, value: i64, instant: i64) -> ChronoResult<i64>;

    /// Adds a count of units to an instant.
    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64>;

    /// Subtracts a count of units from an instant.
    fn subtract(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        if value == i64::MIN {
            return Err(ChronoError::invalid_argument()
                .with_message("The value must be greater than i64::MIN"));
        }
        self.add(instant, safe_negate(value)?)
    }

    /// Returns the whole units between two instants, negative when the
    /// minuend is before the subtrahend.
    fn difference(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i32> {
        safe_to_int(self.difference_as_long(minuend, subtrahend)?)
    }

    /// Returns the whole units between two instants, negative when the
    /// minuend is before the subtrahend.
    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64>;

    /// Orders two units by their (possibly average) length.
    fn compare_unit(&self, other: &dyn DurationField) -> Ordering {
        self.unit_millis().cmp(&other.unit_millis())
    }
}

/// Orders two optional units from widest to narrowest, treating an absent or
/// unsupported unit as infinitely wide.
#[must_use]
pub fn compare_reverse(a: Option<&dyn DurationField>, b: Option<&dyn DurationField>) -> Ordering {
    let a = a.filter(|f| f.is_supported());
    let b = b.filter(|f| f.is_supported());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.compare_unit(b).reverse(),
    }
}
