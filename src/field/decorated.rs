//! Fields that reshape the values of a wrapped field.
//!
//! Chronology assembly composes these to derive century, year-of-century
//! and clock-hour fields from the basic calendar fields.

use std::sync::Arc;

use crate::{
    duration::{DurationField, DurationFieldRef, ScaledDurationField},
    fields::DateTimeFieldType,
    partial::ReadablePartial,
    symbols::LocaleSymbols,
    utils::{safe_multiply, safe_to_int, verify_value_bounds, wrapped_value},
    ChronoError, ChronoResult,
};

use super::{DateTimeField, DateTimeFieldRef};

/// Floor division of a field value.
#[inline]
fn floor_div(value: i32, divisor: i32) -> i32 {
    value.div_euclid(divisor)
}

/// Floor modulus of a field value.
#[inline]
fn floor_mod(value: i32, divisor: i32) -> i32 {
    value.rem_euclid(divisor)
}

// ==== OffsetDateTimeField ====

/// Shifts every value of the wrapped field by a constant.
#[derive(Debug, Clone)]
pub struct OffsetDateTimeField {
    wrapped: DateTimeFieldRef,
    kind: DateTimeFieldType,
    offset: i32,
    min: i32,
    max: i32,
}

impl OffsetDateTimeField {
    /// Creates an offset field keeping the wrapped field's type.
    pub fn try_new(wrapped: DateTimeFieldRef, offset: i32) -> ChronoResult<Self> {
        let kind = wrapped.field_type();
        Self::with_bounds(wrapped, kind, offset, i32::MIN, i32::MAX)
    }

    /// Creates an offset field of a new type.
    pub fn with_type(
        wrapped: DateTimeFieldRef,
        kind: DateTimeFieldType,
        offset: i32,
    ) -> ChronoResult<Self> {
        Self::with_bounds(wrapped, kind, offset, i32::MIN, i32::MAX)
    }

    /// Creates an offset field whose bounds are narrowed to `[min, max]`
    /// where those are tighter than the shifted wrapped bounds.
    pub fn with_bounds(
        wrapped: DateTimeFieldRef,
        kind: DateTimeFieldType,
        offset: i32,
        min: i32,
        max: i32,
    ) -> ChronoResult<Self> {
        if offset == 0 {
            return Err(ChronoError::invalid_argument().with_message("The offset cannot be zero"));
        }
        let shifted_min = safe_to_int(i64::from(wrapped.minimum_value()?) + i64::from(offset))?;
        let shifted_max = safe_to_int(i64::from(wrapped.maximum_value()?) + i64::from(offset))?;
        Ok(Self {
            wrapped,
            kind,
            offset,
            min: min.max(shifted_min),
            max: max.min(shifted_max),
        })
    }

    #[must_use]
    pub fn offset(&self) -> i32 {
        self.offset
    }
}

impl DateTimeField for OffsetDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.kind
    }

    fn is_lenient(&self) -> bool {
        self.wrapped.is_lenient()
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.wrapped.get(instant)? + self.offset)
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        let instant = self.wrapped.add(instant, value)?;
        verify_value_bounds(self.kind, self.get(instant)?.into(), self.min.into(), self.max.into())?;
        Ok(instant)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        let wrapped = wrapped_value(self.get(instant)?, value, self.min, self.max)?;
        self.set(instant, wrapped)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        verify_value_bounds(self.kind, value.into(), self.min.into(), self.max.into())?;
        self.wrapped.set(instant, value - self.offset)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.wrapped.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        self.wrapped.range_duration_field()
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        self.wrapped.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> ChronoResult<i32> {
        self.wrapped.leap_amount(instant)
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        self.wrapped.leap_duration_field()
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(self.min)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(self.max)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_ceiling(instant)
    }

    fn round_half_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_floor(instant)
    }

    fn round_half_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_ceiling(instant)
    }

    fn round_half_even(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_even(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.remainder(instant)
    }
}

// ==== DividedDateTimeField ====

/// Divides the values of the wrapped field, e.g. century-of-era as
/// year-of-era divided by 100.
#[derive(Debug, Clone)]
pub struct DividedDateTimeField {
    wrapped: DateTimeFieldRef,
    kind: DateTimeFieldType,
    divisor: i32,
    unit: DurationFieldRef,
    range: Option<DurationFieldRef>,
    min: i32,
    max: i32,
}

impl DividedDateTimeField {
    /// Creates a divided field. The divisor must be at least 2.
    pub fn try_new(
        wrapped: DateTimeFieldRef,
        range: Option<DurationFieldRef>,
        kind: DateTimeFieldType,
        divisor: i32,
    ) -> ChronoResult<Self> {
        if divisor < 2 {
            return Err(ChronoError::invalid_argument()
                .with_message("The divisor must be at least 2"));
        }
        let unit: DurationFieldRef = Arc::new(ScaledDurationField::try_new(
            wrapped.duration_field(),
            kind.duration_type(),
            divisor,
        )?);
        let min = floor_div(wrapped.minimum_value()?, divisor);
        let max = floor_div(wrapped.maximum_value()?, divisor);
        Ok(Self {
            wrapped,
            kind,
            divisor,
            unit,
            range,
            min,
            max,
        })
    }

    #[must_use]
    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    /// Returns the field being divided.
    #[must_use]
    pub fn wrapped(&self) -> &DateTimeFieldRef {
        &self.wrapped
    }
}

impl DateTimeField for DividedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.kind
    }

    fn is_lenient(&self) -> bool {
        self.wrapped.is_lenient()
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(floor_div(self.wrapped.get(instant)?, self.divisor))
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.wrapped
            .add(instant, safe_multiply(value, i64::from(self.divisor))?)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.set(instant, wrapped_value(self.get(instant)?, value, self.min, self.max)?)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i32> {
        self.unit.difference(minuend, subtrahend)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.unit.difference_as_long(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        verify_value_bounds(self.kind, value.into(), self.min.into(), self.max.into())?;
        let remainder = floor_mod(self.wrapped.get(instant)?, self.divisor);
        let target = safe_to_int(i64::from(value) * i64::from(self.divisor) + i64::from(remainder))?;
        self.wrapped.set(instant, target)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.unit.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        match &self.range {
            Some(range) => Some(range.clone()),
            None => self.wrapped.range_duration_field(),
        }
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(self.min)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(self.max)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        let aligned = self
            .wrapped
            .set(instant, safe_to_int(i64::from(self.get(instant)?) * i64::from(self.divisor))?)?;
        self.wrapped.round_floor(aligned)
    }
}

// ==== RemainderDateTimeField ====

/// The values of the wrapped field modulo a divisor, the counterpart of a
/// [`DividedDateTimeField`].
#[derive(Debug, Clone)]
pub struct RemainderDateTimeField {
    wrapped: DateTimeFieldRef,
    kind: DateTimeFieldType,
    divisor: i32,
    unit: DurationFieldRef,
    range: DurationFieldRef,
}

impl RemainderDateTimeField {
    /// Creates the remainder matching a divided field. The range of the
    /// remainder is the unit of the divided field.
    #[must_use]
    pub fn from_divided(divided: &DividedDateTimeField, kind: DateTimeFieldType) -> Self {
        Self {
            wrapped: divided.wrapped.clone(),
            kind,
            divisor: divided.divisor,
            unit: divided.wrapped.duration_field(),
            range: divided.unit.clone(),
        }
    }

    /// Creates a remainder of `wrapped` over an explicit range unit. The
    /// divisor must be at least 2.
    pub fn try_new(
        wrapped: DateTimeFieldRef,
        range: DurationFieldRef,
        kind: DateTimeFieldType,
        divisor: i32,
    ) -> ChronoResult<Self> {
        if divisor < 2 {
            return Err(ChronoError::invalid_argument()
                .with_message("The divisor must be at least 2"));
        }
        Ok(Self {
            unit: wrapped.duration_field(),
            wrapped,
            kind,
            divisor,
            range,
        })
    }

    #[must_use]
    pub fn divisor(&self) -> i32 {
        self.divisor
    }
}

impl DateTimeField for RemainderDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.kind
    }

    fn is_lenient(&self) -> bool {
        self.wrapped.is_lenient()
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(floor_mod(self.wrapped.get(instant)?, self.divisor))
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.set(instant, wrapped_value(self.get(instant)?, value, 0, self.divisor - 1)?)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        verify_value_bounds(self.kind, value.into(), 0, (self.divisor - 1).into())?;
        let divided = floor_div(self.wrapped.get(instant)?, self.divisor);
        let target = safe_to_int(i64::from(divided) * i64::from(self.divisor) + i64::from(value))?;
        self.wrapped.set(instant, target)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.unit.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.range.clone())
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(0)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(self.divisor - 1)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_ceiling(instant)
    }

    fn round_half_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_floor(instant)
    }

    fn round_half_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_ceiling(instant)
    }

    fn round_half_even(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_even(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.remainder(instant)
    }
}

// ==== ZeroIsMaxDateTimeField ====

/// Presents the wrapped field's zero as one past its maximum, e.g.
/// clock-hour-of-day 1..=24 over hour-of-day 0..=23.
#[derive(Debug, Clone)]
pub struct ZeroIsMaxDateTimeField {
    wrapped: DateTimeFieldRef,
    kind: DateTimeFieldType,
}

impl ZeroIsMaxDateTimeField {
    /// Creates the field. The wrapped minimum must be zero.
    pub fn try_new(wrapped: DateTimeFieldRef, kind: DateTimeFieldType) -> ChronoResult<Self> {
        if wrapped.minimum_value()? != 0 {
            return Err(ChronoError::invalid_argument()
                .with_message("Wrapped field's minimum value must be zero"));
        }
        Ok(Self { wrapped, kind })
    }
}

impl DateTimeField for ZeroIsMaxDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.kind
    }

    fn is_lenient(&self) -> bool {
        self.wrapped.is_lenient()
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        match self.wrapped.get(instant)? {
            0 => self.maximum_value_at(instant),
            value => Ok(value),
        }
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.wrapped.add(instant, value)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.wrapped.add_wrap_field(instant, value)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i32> {
        self.wrapped.difference(minuend, subtrahend)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.wrapped.difference_as_long(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        let max = self.maximum_value_at(instant)?;
        verify_value_bounds(self.kind, value.into(), 1, max.into())?;
        self.wrapped.set(instant, if value == max { 0 } else { value })
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.wrapped.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        self.wrapped.range_duration_field()
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        self.wrapped.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> ChronoResult<i32> {
        self.wrapped.leap_amount(instant)
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        self.wrapped.leap_duration_field()
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(1)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(self.wrapped.maximum_value()? + 1)
    }

    fn maximum_value_at(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.wrapped.maximum_value_at(instant)? + 1)
    }

    fn maximum_value_for_partial(&self, partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        Ok(self.wrapped.maximum_value_for_partial(partial)? + 1)
    }

    fn maximum_value_for_values(
        &self,
        partial: &dyn ReadablePartial,
        values: &[i32],
    ) -> ChronoResult<i32> {
        Ok(self.wrapped.maximum_value_for_values(partial, values)? + 1)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_ceiling(instant)
    }

    fn round_half_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_floor(instant)
    }

    fn round_half_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_ceiling(instant)
    }

    fn round_half_even(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_half_even(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.remainder(instant)
    }
}

// ==== SkipDateTimeField ====

/// Removes one value from the wrapped field's sequence, e.g. the Julian
/// calendar has no year zero: the value before 1 is -1.
#[derive(Debug, Clone)]
pub struct SkipDateTimeField {
    wrapped: DateTimeFieldRef,
    skip: i32,
    min: i32,
}

impl SkipDateTimeField {
    pub fn try_new(wrapped: DateTimeFieldRef, skip: i32) -> ChronoResult<Self> {
        let wrapped_min = wrapped.minimum_value()?;
        let min = match wrapped_min.cmp(&skip) {
            core::cmp::Ordering::Less => wrapped_min - 1,
            core::cmp::Ordering::Equal => skip + 1,
            core::cmp::Ordering::Greater => wrapped_min,
        };
        Ok(Self { wrapped, skip, min })
    }
}

impl DateTimeField for SkipDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.wrapped.field_type()
    }

    fn is_lenient(&self) -> bool {
        self.wrapped.is_lenient()
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        let value = self.wrapped.get(instant)?;
        Ok(if value <= self.skip { value - 1 } else { value })
    }

    fn value_as_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        self.wrapped.value_as_text(value, symbols)
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.wrapped.add(instant, value)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.wrapped.difference_as_long(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        verify_value_bounds(
            self.field_type(),
            value.into(),
            self.min.into(),
            self.maximum_value()?.into(),
        )?;
        let value = match value.cmp(&self.skip) {
            core::cmp::Ordering::Equal => {
                return Err(ChronoError::illegal_field_value(
                    self.field_type(),
                    value.into(),
                    None,
                    None,
                ))
            }
            core::cmp::Ordering::Less => value + 1,
            core::cmp::Ordering::Greater => value,
        };
        self.wrapped.set(instant, value)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.wrapped.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        self.wrapped.range_duration_field()
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        self.wrapped.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> ChronoResult<i32> {
        self.wrapped.leap_amount(instant)
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        self.wrapped.leap_duration_field()
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(self.min)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        self.wrapped.maximum_value()
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        self.wrapped.remainder(instant)
    }
}

