//! Support for fields whose own unit varies in length, e.g. months.

use core::fmt;
use std::sync::Arc;

use crate::{
    duration::DurationField,
    fields::DurationFieldType,
    utils::{safe_add, safe_subtract},
    ChronoResult,
};

/// The exact, position aware arithmetic of an imprecise unit.
///
/// An imprecise date-time field and its [`LinkedDurationField`] share one
/// implementation of this trait, so the duration can route its arithmetic
/// back into the calendar without holding the field itself.
pub trait ImpreciseUnit: Send + Sync + fmt::Debug {
    /// Returns the type of the unit.
    fn unit_type(&self) -> DurationFieldType;

    /// Returns the average length of one unit.
    fn average_unit_millis(&self) -> i64;

    /// Adds `value` units to `instant`.
    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64>;

    /// Returns the whole units between two instants.
    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        estimate_difference(self, minuend, subtrahend)
    }
}

/// Computes a difference by guessing from the average unit length and then
/// walking one unit at a time until `add(subtrahend, n)` brackets the
/// minuend.
pub fn estimate_difference<U: ImpreciseUnit + ?Sized>(
    unit: &U,
    minuend: i64,
    subtrahend: i64,
) -> ChronoResult<i64> {
    if minuend < subtrahend {
        return Ok(-estimate_difference(unit, subtrahend, minuend)?);
    }

    let mut difference = safe_subtract(minuend, subtrahend)? / unit.average_unit_millis();
    if unit.add(subtrahend, difference)? < minuend {
        loop {
            difference += 1;
            if unit.add(subtrahend, difference)? > minuend {
                break;
            }
        }
        difference -= 1;
    } else if unit.add(subtrahend, difference)? > minuend {
        loop {
            difference -= 1;
            if unit.add(subtrahend, difference)? <= minuend {
                break;
            }
        }
    }
    Ok(difference)
}

/// The duration of an imprecise field, reporting the average unit length and
/// delegating arithmetic to the field's exact calendar logic.
#[derive(Debug, Clone)]
pub struct LinkedDurationField {
    unit: Arc<dyn ImpreciseUnit>,
}

impl LinkedDurationField {
    #[must_use]
    pub fn new(unit: Arc<dyn ImpreciseUnit>) -> Self {
        Self { unit }
    }
}

impl DurationField for LinkedDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.unit.unit_type()
    }

    fn is_precise(&self) -> bool {
        false
    }

    fn unit_millis(&self) -> i64 {
        self.unit.average_unit_millis()
    }

    fn value_as_long_at(&self, duration: i64, instant: i64) -> ChronoResult<i64> {
        self.unit
            .difference_as_long(safe_add(instant, duration)?, instant)
    }

    fn millis_at(&self, value: i64, instant: i64) -> ChronoResult<i64> {
        safe_subtract(self.unit.add(instant, value)?, instant)
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.unit.add(instant, value)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.unit.difference_as_long(minuend, subtrahend)
    }
}
