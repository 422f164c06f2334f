//! This module implements `DateTimeField`, a named calendar component.
//!
//! A date-time field is bound to exactly one unit (its
//! [`DurationField`](crate::duration::DurationField)) and
//! at most one range unit, the next larger unit it is a remainder of. The
//! trait carries default implementations of the shared algorithms (partial
//! add with carry, wrapping, derived rounding), which live as free functions
//! in the private `base` module so that variants overriding one operation
//! can still reach the default of another.
//!
//! Partial forms operate on a field index into a [`ReadablePartial`] and a
//! parallel value slice. On error the contents of the slice are unspecified;
//! callers that need atomicity work on a copy.

use core::fmt;
use std::sync::Arc;

use crate::{
    duration::DurationFieldRef,
    fields::DateTimeFieldType,
    partial::ReadablePartial,
    symbols::LocaleSymbols,
    ChronoError, ChronoResult,
};

pub(crate) mod base;
mod decorated;
mod imprecise;
mod precise;
mod unsupported;

#[cfg(test)]
mod tests;

pub use decorated::{
    DividedDateTimeField, OffsetDateTimeField, RemainderDateTimeField, SkipDateTimeField,
    ZeroIsMaxDateTimeField,
};
pub use imprecise::{estimate_difference, ImpreciseUnit, LinkedDurationField};
pub use precise::{PreciseDateTimeField, PreciseDurationBase};
pub use unsupported::{UnsupportedDateTimeField, UnsupportedFieldCache};

/// A shared handle to a date-time field.
pub type DateTimeFieldRef = Arc<dyn DateTimeField>;

/// A calendar component computed from millisecond instants.
pub trait DateTimeField: Send + Sync + fmt::Debug {
    /// Returns the type that identifies this field.
    fn field_type(&self) -> DateTimeFieldType;

    /// Returns the name of this field, e.g. "dayOfMonth".
    fn name(&self) -> &'static str {
        self.field_type().name()
    }

    /// Returns `false` only for the unsupported sentinel.
    fn is_supported(&self) -> bool {
        true
    }

    /// Returns whether `set` normalizes out of range values instead of
    /// rejecting them.
    fn is_lenient(&self) -> bool {
        false
    }

    /// Returns the value of this field at `instant`.
    fn get(&self, instant: i64) -> ChronoResult<i32>;

    // ==== Text ====

    /// Returns the localized text of this field at `instant`.
    fn as_text(&self, instant: i64, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        self.value_as_text(self.get(instant)?, symbols)
    }

    /// Returns the localized short text of this field at `instant`.
    fn as_short_text(&self, instant: i64, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        self.value_as_short_text(self.get(instant)?, symbols)
    }

    /// Returns the localized text of this field's value in a partial.
    fn partial_as_text(
        &self,
        partial: &dyn ReadablePartial,
        symbols: &dyn LocaleSymbols,
    ) -> ChronoResult<String> {
        let index = base::index_in(partial, self.field_type())?;
        self.value_as_text(partial.value(index), symbols)
    }

    /// Returns the localized text of a value of this field.
    fn value_as_text(&self, value: i32, _symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(value.to_string())
    }

    /// Returns the localized short text of a value of this field.
    fn value_as_short_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        self.value_as_text(value, symbols)
    }

    /// Converts text to a value of this field.
    fn convert_text(&self, text: &str, _symbols: &dyn LocaleSymbols) -> ChronoResult<i32> {
        text.trim()
            .parse::<i32>()
            .map_err(|_| ChronoError::illegal_field_text(self.field_type(), text))
    }

    /// Returns the widest text this field can render.
    fn maximum_text_length(&self, _symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Ok(base::digit_count(self.maximum_value()?))
    }

    /// Returns the widest short text this field can render.
    fn maximum_short_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        self.maximum_text_length(symbols)
    }

    // ==== Arithmetic ====

    /// Adds a number of units to an instant, carrying into larger fields.
    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.duration_field().add(instant, value)
    }

    /// Adds to the value at `index` of a partial, carrying into the next
    /// larger field when this one overflows and clamping the smaller fields.
    /// Fails when the largest field overflows.
    fn add_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        base::add_partial(self, partial, index, values, value, false)
    }

    /// Adds to the value at `index` of a partial, carrying like
    /// [`DateTimeField::add_partial`] but wrapping the largest field.
    fn add_wrap_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        base::add_partial(self, partial, index, values, value, true)
    }

    /// Adds to this field only, wrapping within its range and leaving the
    /// larger fields untouched.
    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        base::add_wrap_field(self, instant, value)
    }

    /// Adds to the value at `index` of a partial, wrapping within this
    /// field's range.
    fn add_wrap_field_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        base::add_wrap_field_partial(self, partial, index, values, value)
    }

    /// Returns the whole units of this field between two instants.
    fn difference(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i32> {
        self.duration_field().difference(minuend, subtrahend)
    }

    /// Returns the whole units of this field between two instants.
    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.duration_field().difference_as_long(minuend, subtrahend)
    }

    // ==== Setters ====

    /// Sets this field at `instant`, failing with an illegal field value when
    /// `value` is outside the bounds at that position.
    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64>;

    /// Sets the value at `index` of a partial and clamps the smaller fields
    /// into their new bounds.
    fn set_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        base::set_partial(self, partial, index, values, value)
    }

    /// Sets this field, accepting values just beyond its usual bounds where
    /// the field supports it. Used when committing parsed values.
    fn set_extended(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.set(instant, value)
    }

    /// Sets this field from text.
    fn set_text(&self, instant: i64, text: &str, symbols: &dyn LocaleSymbols) -> ChronoResult<i64> {
        let value = self.convert_text(text, symbols)?;
        self.set(instant, value)
    }

    /// Sets the value at `index` of a partial from text.
    fn set_text_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        text: &str,
        symbols: &dyn LocaleSymbols,
    ) -> ChronoResult<()> {
        let value = self.convert_text(text, symbols)?;
        self.set_partial(partial, index, values, value)
    }

    // ==== Units ====

    /// Returns the unit of this field.
    fn duration_field(&self) -> DurationFieldRef;

    /// Returns the unit this field is a remainder of, `None` if unbounded.
    fn range_duration_field(&self) -> Option<DurationFieldRef>;

    /// Returns whether the value at `instant` carries an extra unit.
    fn is_leap(&self, _instant: i64) -> ChronoResult<bool> {
        Ok(false)
    }

    /// Returns the number of extra units at `instant`.
    fn leap_amount(&self, _instant: i64) -> ChronoResult<i32> {
        Ok(0)
    }

    /// Returns the unit a leap is measured in.
    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    // ==== Bounds ====

    /// Returns the smallest legal value of this field.
    fn minimum_value(&self) -> ChronoResult<i32>;

    /// Returns the smallest legal value at `instant`.
    fn minimum_value_at(&self, _instant: i64) -> ChronoResult<i32> {
        self.minimum_value()
    }

    /// Returns the smallest legal value given the other fields of a partial.
    fn minimum_value_for_partial(&self, _partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        self.minimum_value()
    }

    /// Returns the smallest legal value given tentative partial values.
    fn minimum_value_for_values(
        &self,
        partial: &dyn ReadablePartial,
        _values: &[i32],
    ) -> ChronoResult<i32> {
        self.minimum_value_for_partial(partial)
    }

    /// Returns the largest legal value of this field.
    fn maximum_value(&self) -> ChronoResult<i32>;

    /// Returns the largest legal value at `instant`.
    fn maximum_value_at(&self, _instant: i64) -> ChronoResult<i32> {
        self.maximum_value()
    }

    /// Returns the largest legal value given the other fields of a partial.
    fn maximum_value_for_partial(&self, _partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        self.maximum_value()
    }

    /// Returns the largest legal value given tentative partial values.
    fn maximum_value_for_values(
        &self,
        partial: &dyn ReadablePartial,
        _values: &[i32],
    ) -> ChronoResult<i32> {
        self.maximum_value_for_partial(partial)
    }

    // ==== Rounding ====

    /// Rounds down to the start of the current unit.
    fn round_floor(&self, instant: i64) -> ChronoResult<i64>;

    /// Rounds up to the start of the next unit unless already on a boundary.
    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        base::round_ceiling(self, instant)
    }

    /// Rounds to the nearest boundary, preferring the floor on a tie.
    fn round_half_floor(&self, instant: i64) -> ChronoResult<i64> {
        base::round_half_floor(self, instant)
    }

    /// Rounds to the nearest boundary, preferring the ceiling on a tie.
    fn round_half_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        base::round_half_ceiling(self, instant)
    }

    /// Rounds to the nearest boundary, preferring the one whose field value
    /// is even on a tie.
    fn round_half_even(&self, instant: i64) -> ChronoResult<i64> {
        base::round_half_even(self, instant)
    }

    /// Returns the milliseconds since the floor of `instant`.
    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        base::remainder(self, instant)
    }
}

impl dyn DateTimeField {
    /// Rounds `instant` with the given rounding mode.
    pub fn round(&self, instant: i64, mode: crate::options::FieldRoundingMode) -> ChronoResult<i64> {
        crate::rounding::round_with(self, instant, mode)
    }
}
