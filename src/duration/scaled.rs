//! A duration field that counts multiples of another field's unit.

use crate::{
    fields::DurationFieldType,
    utils::{safe_multiply, safe_to_int},
    ChronoError, ChronoResult,
};

use super::{DurationField, DurationFieldRef};

/// Scales the unit of a wrapped duration field, e.g. centuries as hundreds
/// of years.
#[derive(Debug, Clone)]
pub struct ScaledDurationField {
    wrapped: DurationFieldRef,
    kind: DurationFieldType,
    scalar: i32,
}

impl ScaledDurationField {
    /// Creates a new scaled field. The wrapped field must be supported and
    /// the scalar may be neither zero nor one.
    pub fn try_new(
        wrapped: DurationFieldRef,
        kind: DurationFieldType,
        scalar: i32,
    ) -> ChronoResult<Self> {
        if !wrapped.is_supported() {
            return Err(ChronoError::invalid_argument()
                .with_message("The field must be supported"));
        }
        if scalar == 0 || scalar == 1 {
            return Err(ChronoError::invalid_argument()
                .with_message("The scalar must not be 0 or 1"));
        }
        Ok(Self {
            wrapped,
            kind,
            scalar,
        })
    }

    /// Returns the multiple applied to the wrapped unit.
    #[must_use]
    pub fn scalar(&self) -> i32 {
        self.scalar
    }

    /// Returns the wrapped duration field.
    #[must_use]
    pub fn wrapped(&self) -> &DurationFieldRef {
        &self.wrapped
    }

    #[inline]
    fn scaled(&self, value: i64) -> ChronoResult<i64> {
        safe_multiply(value, i64::from(self.scalar))
    }
}

impl DurationField for ScaledDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.kind
    }

    fn is_precise(&self) -> bool {
        self.wrapped.is_precise()
    }

    fn unit_millis(&self) -> i64 {
        self.wrapped.unit_millis() * i64::from(self.scalar)
    }

    fn value(&self, duration: i64) -> ChronoResult<i32> {
        Ok(self.wrapped.value(duration)? / self.scalar)
    }

    fn value_as_long(&self, duration: i64) -> ChronoResult<i64> {
        Ok(self.wrapped.value_as_long(duration)? / i64::from(self.scalar))
    }

    fn value_as_long_at(&self, duration: i64, instant: i64) -> ChronoResult<i64> {
        Ok(self.wrapped.value_as_long_at(duration, instant)? / i64::from(self.scalar))
    }

    fn millis(&self, value: i64) -> ChronoResult<i64> {
        self.wrapped.millis(self.scaled(value)?)
    }

    fn millis_at(&self, value: i64, instant: i64) -> ChronoResult<i64> {
        self.wrapped.millis_at(self.scaled(value)?, instant)
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.wrapped.add(instant, self.scaled(value)?)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i32> {
        safe_to_int(self.difference_as_long(minuend, subtrahend)?)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        Ok(self.wrapped.difference_as_long(minuend, subtrahend)? / i64::from(self.scalar))
    }
}
