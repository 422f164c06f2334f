//! Duration fields with a fixed unit length.

use crate::{
    fields::DurationFieldType,
    utils::{safe_add, safe_multiply, safe_subtract},
    ChronoError, ChronoResult,
};

use super::DurationField;

/// A duration field whose every unit is exactly `unit_millis` long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreciseDurationField {
    kind: DurationFieldType,
    unit_millis: i64,
}

impl PreciseDurationField {
    /// Creates a new precise duration field. The unit must be at least one
    /// millisecond.
    pub fn try_new(kind: DurationFieldType, unit_millis: i64) -> ChronoResult<Self> {
        if unit_millis < 1 {
            return Err(ChronoError::invalid_argument()
                .with_message("The unit milliseconds must be at least 1"));
        }
        Ok(Self { kind, unit_millis })
    }

    pub(crate) const fn new_unchecked(kind: DurationFieldType, unit_millis: i64) -> Self {
        Self { kind, unit_millis }
    }
}

impl DurationField for PreciseDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.kind
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        self.unit_millis
    }

    fn value_as_long(&self, duration: i64) -> ChronoResult<i64> {
        Ok(duration / self.unit_millis)
    }

    fn value_as_long_at(&self, duration: i64, _instant: i64) -> ChronoResult<i64> {
        Ok(duration / self.unit_millis)
    }

    fn millis_at(&self, value: i64, _instant: i64) -> ChronoResult<i64> {
        safe_multiply(value, self.unit_millis)
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        safe_add(instant, safe_multiply(value, self.unit_millis)?)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        Ok(safe_subtract(minuend, subtrahend)? / self.unit_millis)
    }
}

/// The millisecond duration field, where values and durations coincide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MillisDurationField;

impl DurationField for MillisDurationField {
    fn field_type(&self) -> DurationFieldType {
        DurationFieldType::Millis
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        1
    }

    fn value_as_long(&self, duration: i64) -> ChronoResult<i64> {
        Ok(duration)
    }

    fn value_as_long_at(&self, duration: i64, _instant: i64) -> ChronoResult<i64> {
        Ok(duration)
    }

    fn millis(&self, value: i64) -> ChronoResult<i64> {
        Ok(value)
    }

    fn millis_at(&self, value: i64, _instant: i64) -> ChronoResult<i64> {
        Ok(value)
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        safe_add(instant, value)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        safe_subtract(minuend, subtrahend)
    }
}
