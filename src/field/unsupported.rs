//! The unsupported date-time field sentinel and the cache that shares the
//! unsupported sentinels.

use std::sync::{Arc, LazyLock, RwLock};

use rustc_hash::FxHashMap;

use crate::{
    duration::{DurationFieldRef, UnsupportedDurationField},
    fields::{DateTimeFieldType, DurationFieldType},
    partial::ReadablePartial,
    symbols::LocaleSymbols,
    ChronoError, ChronoResult,
};

use super::{DateTimeField, DateTimeFieldRef};

static GLOBAL_CACHE: LazyLock<UnsupportedFieldCache> = LazyLock::new(UnsupportedFieldCache::new);

/// Shares one unsupported sentinel per field type.
///
/// A date-time sentinel is keyed by its type alone; when requested with a
/// different duration than the cached one, the cached entry is replaced.
#[derive(Debug, Default)]
pub struct UnsupportedFieldCache {
    durations: RwLock<FxHashMap<DurationFieldType, DurationFieldRef>>,
    date_times: RwLock<FxHashMap<DateTimeFieldType, Arc<UnsupportedDateTimeField>>>,
}

impl UnsupportedFieldCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide cache.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_CACHE
    }

    /// Returns the unsupported duration field of `kind`.
    pub fn duration(&self, kind: DurationFieldType) -> DurationFieldRef {
        if let Some(field) = self
            .durations
            .read()
            .ok()
            .and_then(|map| map.get(&kind).cloned())
        {
            return field;
        }
        #[cfg(feature = "log")]
        log::trace!("creating unsupported duration field for {kind}");
        let created: DurationFieldRef = Arc::new(UnsupportedDurationField::new(kind));
        match self.durations.write() {
            Ok(mut map) => map.entry(kind).or_insert(created).clone(),
            // A poisoned cache still hands out a usable sentinel.
            Err(_) => created,
        }
    }

    /// Returns the unsupported date-time field of `kind` measured in `unit`.
    pub fn date_time(&self, kind: DateTimeFieldType, unit: DurationFieldRef) -> DateTimeFieldRef {
        if let Some(field) = self
            .date_times
            .read()
            .ok()
            .and_then(|map| map.get(&kind).cloned())
        {
            if Arc::ptr_eq(&field.unit, &unit) {
                return field;
            }
        }
        #[cfg(feature = "log")]
        log::trace!("creating unsupported date-time field for {kind}");
        let created = Arc::new(UnsupportedDateTimeField { kind, unit });
        if let Ok(mut map) = self.date_times.write() {
            map.insert(kind, created.clone());
        }
        created
    }
}

/// A placeholder for a date-time field the chronology does not support.
///
/// Identity queries answer normally. `add` and `difference` are forwarded to
/// the duration field, which may itself be supported; everything else fails
/// with `ErrorKind::Unsupported`.
#[derive(Debug, Clone)]
pub struct UnsupportedDateTimeField {
    kind: DateTimeFieldType,
    unit: DurationFieldRef,
}

impl UnsupportedDateTimeField {
    /// Returns the shared instance for `kind` from the process-wide cache.
    #[must_use]
    pub fn instance(kind: DateTimeFieldType, unit: DurationFieldRef) -> DateTimeFieldRef {
        UnsupportedFieldCache::global().date_time(kind, unit)
    }

    fn error(&self) -> ChronoError {
        ChronoError::unsupported().with_message(format!("{} field is unsupported", self.kind))
    }
}

impl DateTimeField for UnsupportedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.kind
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn get(&self, _instant: i64) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn as_text(&self, _instant: i64, _symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Err(self.error())
    }

    fn as_short_text(&self, _instant: i64, _symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Err(self.error())
    }

    fn partial_as_text(
        &self,
        _partial: &dyn ReadablePartial,
        _symbols: &dyn LocaleSymbols,
    ) -> ChronoResult<String> {
        Err(self.error())
    }

    fn value_as_text(&self, _value: i32, _symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Err(self.error())
    }

    fn value_as_short_text(&self, _value: i32, _symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Err(self.error())
    }

    fn convert_text(&self, _text: &str, _symbols: &dyn LocaleSymbols) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn maximum_text_length(&self, _symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Err(self.error())
    }

    fn maximum_short_text_length(&self, _symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Err(self.error())
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.unit.add(instant, value)
    }

    fn add_partial(
        &self,
        _partial: &dyn ReadablePartial,
        _index: usize,
        _values: &mut [i32],
        _value: i32,
    ) -> ChronoResult<()> {
        Err(self.error())
    }

    fn add_wrap_partial(
        &self,
        _partial: &dyn ReadablePartial,
        _index: usize,
        _values: &mut [i32],
        _value: i32,
    ) -> ChronoResult<()> {
        Err(self.error())
    }

    fn add_wrap_field(&self, _instant: i64, _value: i32) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn add_wrap_field_partial(
        &self,
        _partial: &dyn ReadablePartial,
        _index: usize,
        _values: &mut [i32],
        _value: i32,
    ) -> ChronoResult<()> {
        Err(self.error())
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i32> {
        self.unit.difference(minuend, subtrahend)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.unit.difference_as_long(minuend, subtrahend)
    }

    fn set(&self, _instant: i64, _value: i32) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn set_partial(
        &self,
        _partial: &dyn ReadablePartial,
        _index: usize,
        _values: &mut [i32],
        _value: i32,
    ) -> ChronoResult<()> {
        Err(self.error())
    }

    fn set_text(&self, _instant: i64, _text: &str, _symbols: &dyn LocaleSymbols) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn set_text_partial(
        &self,
        _partial: &dyn ReadablePartial,
        _index: usize,
        _values: &mut [i32],
        _text: &str,
        _symbols: &dyn LocaleSymbols,
    ) -> ChronoResult<()> {
        Err(self.error())
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.unit.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn is_leap(&self, _instant: i64) -> ChronoResult<bool> {
        Err(self.error())
    }

    fn leap_amount(&self, _instant: i64) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn minimum_value_at(&self, _instant: i64) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn minimum_value_for_partial(&self, _partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn minimum_value_for_values(
        &self,
        _partial: &dyn ReadablePartial,
        _values: &[i32],
    ) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn maximum_value_at(&self, _instant: i64) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn maximum_value_for_partial(&self, _partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn maximum_value_for_values(
        &self,
        _partial: &dyn ReadablePartial,
        _values: &[i32],
    ) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn round_floor(&self, _instant: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn round_ceiling(&self, _instant: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn round_half_floor(&self, _instant: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn round_half_ceiling(&self, _instant: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn round_half_even(&self, _instant: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn remainder(&self, _instant: i64) -> ChronoResult<i64> {
        Err(self.error())
    }
}
