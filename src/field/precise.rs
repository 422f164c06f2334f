//! Fields whose own unit has a fixed length.

use crate::{
    duration::DurationFieldRef,
    fields::DateTimeFieldType,
    symbols::{self, LocaleSymbols, SymbolField, TextStyle},
    utils::{safe_add, safe_multiply, safe_subtract, verify_value_bounds, wrapped_value},
    ChronoError, ChronoResult,
};

use super::DateTimeField;

/// The closed form arithmetic of a field over a precise unit.
///
/// Concrete fields hold one of these and supply `get` and their bounds; the
/// base turns a value change into a whole number of units and rounds by
/// plain modular arithmetic.
#[derive(Debug, Clone)]
pub struct PreciseDurationBase {
    kind: DateTimeFieldType,
    unit: DurationFieldRef,
    unit_millis: i64,
}

impl PreciseDurationBase {
    /// Creates the base for a field of `kind` measured in `unit`, which must
    /// be precise and at least one millisecond long.
    pub fn try_new(kind: DateTimeFieldType, unit: DurationFieldRef) -> ChronoResult<Self> {
        if !unit.is_precise() {
            return Err(ChronoError::invalid_argument()
                .with_message("Unit duration field must be precise"));
        }
        let unit_millis = unit.unit_millis();
        if unit_millis < 1 {
            return Err(ChronoError::invalid_argument()
                .with_message("The unit milliseconds must be at least 1"));
        }
        Ok(Self {
            kind,
            unit,
            unit_millis,
        })
    }

    #[inline]
    #[must_use]
    pub fn field_type(&self) -> DateTimeFieldType {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn unit(&self) -> &DurationFieldRef {
        &self.unit
    }

    #[inline]
    #[must_use]
    pub fn unit_millis(&self) -> i64 {
        self.unit_millis
    }

    /// Moves `instant` from the `current` value to `value` after checking
    /// `value` against `[min, max]`.
    pub fn set(&self, instant: i64, current: i32, value: i32, min: i32, max: i32) -> ChronoResult<i64> {
        verify_value_bounds(self.kind, value.into(), min.into(), max.into())?;
        self.shift(instant, current, value)
    }

    /// Moves `instant` from the `current` value to `value` without checks.
    pub(crate) fn shift(&self, instant: i64, current: i32, value: i32) -> ChronoResult<i64> {
        let units = i64::from(value) - i64::from(current);
        safe_add(instant, safe_multiply(units, self.unit_millis)?)
    }

    pub fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        let unit = self.unit_millis;
        if instant >= 0 {
            Ok(instant - instant % unit)
        } else {
            let instant = instant + 1;
            safe_subtract(instant - instant % unit, unit)
        }
    }

    pub fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        let unit = self.unit_millis;
        if instant > 0 {
            let instant = instant - 1;
            safe_add(instant - instant % unit, unit)
        } else {
            Ok(instant - instant % unit)
        }
    }

    #[must_use]
    pub fn remainder(&self, instant: i64) -> i64 {
        let unit = self.unit_millis;
        if instant >= 0 {
            instant % unit
        } else {
            (instant + 1) % unit + unit - 1
        }
    }
}

/// A field whose unit and range are both precise, e.g. second-of-minute.
///
/// Values run from zero to `range_millis / unit_millis - 1`.
#[derive(Debug, Clone)]
pub struct PreciseDateTimeField {
    base: PreciseDurationBase,
    range_field: DurationFieldRef,
    range: i32,
    names: Option<SymbolField>,
}

impl PreciseDateTimeField {
    pub fn try_new(
        kind: DateTimeFieldType,
        unit: DurationFieldRef,
        range_field: DurationFieldRef,
    ) -> ChronoResult<Self> {
        let base = PreciseDurationBase::try_new(kind, unit)?;
        if !range_field.is_precise() {
            return Err(ChronoError::invalid_argument()
                .with_message("Range duration field must be precise"));
        }
        let range = range_field.unit_millis() / base.unit_millis();
        if range < 2 {
            return Err(ChronoError::invalid_argument()
                .with_message("The effective range must be at least 2"));
        }
        let range = i32::try_from(range).map_err(|_| {
            ChronoError::invalid_argument().with_message("The effective range must fit an int")
        })?;
        Ok(Self {
            base,
            range_field,
            range,
            names: None,
        })
    }

    /// Renders and parses values through the locale names of `names`.
    #[must_use]
    pub fn with_names(mut self, names: SymbolField) -> Self {
        self.names = Some(names);
        self
    }

    /// Returns the number of values this field can take.
    #[must_use]
    pub fn range(&self) -> i32 {
        self.range
    }

    fn value_at(&self, instant: i64) -> i32 {
        let unit = self.base.unit_millis();
        let range = i64::from(self.range);
        if instant >= 0 {
            ((instant / unit) % range) as i32
        } else {
            self.range - 1 + (((instant + 1) / unit) % range) as i32
        }
    }
}

impl DateTimeField for PreciseDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.base.field_type()
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.value_at(instant))
    }

    fn value_as_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(match self.names {
            Some(names) => symbols::value_to_text(symbols, names, TextStyle::Full, value),
            None => value.to_string(),
        })
    }

    fn value_as_short_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(match self.names {
            Some(names) => symbols::value_to_text(symbols, names, TextStyle::Short, value),
            None => value.to_string(),
        })
    }

    fn convert_text(&self, text: &str, symbols: &dyn LocaleSymbols) -> ChronoResult<i32> {
        match self.names {
            Some(names) => symbols::text_to_value(symbols, names, text),
            None => text
                .trim()
                .parse::<i32>()
                .map_err(|_| ChronoError::illegal_field_text(self.field_type(), text)),
        }
    }

    fn maximum_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Ok(match self.names {
            Some(names) => symbols.max_text_length(names, TextStyle::Full),
            None => super::base::digit_count(self.range - 1),
        })
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        let current = self.value_at(instant);
        let wrapped = wrapped_value(current, value, 0, self.range - 1)?;
        self.base.shift(instant, current, wrapped)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.base
            .set(instant, self.value_at(instant), value, 0, self.range - 1)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.base.unit().clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.range_field.clone())
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(0)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(self.range - 1)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.base.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.base.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        Ok(self.base.remainder(instant))
    }
}
