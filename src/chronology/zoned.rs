//! A chronology that moves the fields of a UTC chronology into a time zone.
//!
//! Every field reads and writes local time. Fields with a unit under twelve
//! hours shift by the offset at the original instant and shift back by the
//! same amount; coarser fields resolve the new local time against the zone,
//! preferring the offset the instant started with.

use core::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{
    duration::{DurationField, DurationFieldRef},
    field::{DateTimeField, DateTimeFieldRef, UnsupportedFieldCache},
    fields::{DateTimeFieldType, DurationFieldType},
    partial::ReadablePartial,
    provider::{illegal_instant, DateTimeZone, ZoneRef},
    symbols::LocaleSymbols,
    ChronoError, ChronoResult, MILLIS_PER_HOUR,
};

use super::{AssembledChronology, Chronology, ChronologyRef};

const NAME: &str = "ZonedChronology";

/// Units shorter than this keep the offset of the original instant.
const TIME_ARITHMETIC_LIMIT: i64 = 12 * MILLIS_PER_HOUR;

fn uses_time_arithmetic(field: &dyn DurationField) -> bool {
    field.is_supported() && field.unit_millis() < TIME_ARITHMETIC_LIMIT
}

fn offset_to_add(zone: &dyn DateTimeZone, instant: i64) -> ChronoResult<i64> {
    let offset = i64::from(zone.offset(instant));
    if instant.checked_add(offset).is_none() {
        return Err(ChronoError::overflow().with_message("Adding time zone offset caused overflow"));
    }
    Ok(offset)
}

fn offset_from_local_to_subtract(zone: &dyn DateTimeZone, local: i64) -> ChronoResult<i64> {
    let offset = i64::from(zone.offset_from_local(local));
    if local.checked_sub(offset).is_none() {
        return Err(ChronoError::overflow()
            .with_message("Subtracting time zone offset caused overflow"));
    }
    Ok(offset)
}

/// Field identity for the conversion memo.
fn address<T: ?Sized>(field: &Arc<T>) -> usize {
    Arc::as_ptr(field).cast::<()>() as usize
}

/// A UTC chronology viewed in a zone.
pub struct ZonedChronology {
    assembled: AssembledChronology,
}

impl ZonedChronology {
    /// Wraps `base` in `zone`. A zoned base is first moved to UTC.
    pub fn try_new(base: ChronologyRef, zone: ZoneRef) -> ChronoResult<Self> {
        let base = base.with_utc();
        let assembled = AssembledChronology::assemble(
            NAME.into(),
            Some(base),
            zone.clone(),
            UnsupportedFieldCache::global(),
            |fields| {
                let mut converter = Converter::new(zone);
                for kind in DurationFieldType::ALL {
                    if let Some(field) = fields.duration(kind).cloned() {
                        fields.set_duration(kind, converter.duration(field));
                    }
                }
                for kind in DateTimeFieldType::ALL {
                    if let Some(field) = fields.date_time(kind).cloned() {
                        fields.set_date_time(kind, converter.date_time(field));
                    }
                }
                Ok(())
            },
        )?;
        Ok(Self { assembled })
    }

    fn base(&self) -> ChronoResult<&ChronologyRef> {
        self.assembled
            .base()
            .ok_or_else(|| ChronoError::assert().with_message("zoned chronology has no base"))
    }

    /// Converts a local instant computed by the base to UTC, failing when the
    /// local time does not exist in the zone.
    fn local_to_utc(&self, local: i64) -> ChronoResult<i64> {
        let zone = self.assembled.zone();
        let offset = zone.offset_from_local(local);
        let utc = local.checked_sub(offset.into()).ok_or_else(|| {
            ChronoError::overflow().with_message("Subtracting time zone offset caused overflow")
        })?;
        if zone.offset(utc) != offset {
            return Err(illegal_instant(local, zone.id()));
        }
        Ok(utc)
    }
}

impl fmt::Debug for ZonedChronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZonedChronology")
            .field("zone", &self.assembled.zone().id())
            .field("base", &self.assembled.base().map(|b| b.name().to_owned()))
            .finish()
    }
}

impl fmt::Display for ZonedChronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.assembled.base().map_or("", |b| b.name());
        write!(f, "{NAME}[{base}, {}]", self.assembled.zone().id())
    }
}

impl Chronology for ZonedChronology {
    fn name(&self) -> &str {
        NAME
    }

    fn zone(&self) -> ZoneRef {
        self.assembled.zone()
    }

    fn with_utc(self: Arc<Self>) -> ChronologyRef {
        match self.assembled.base() {
            Some(base) => base.clone(),
            None => self,
        }
    }

    fn with_zone(self: Arc<Self>, zone: ZoneRef) -> ChronoResult<ChronologyRef> {
        if zone.id() == self.assembled.zone().id() {
            return Ok(self);
        }
        let base = self.base()?.clone();
        if zone.is_utc() {
            return Ok(base);
        }
        Ok(Arc::new(Self::try_new(base, zone)?))
    }

    fn duration_field(&self, kind: DurationFieldType) -> DurationFieldRef {
        self.assembled.duration_field(kind)
    }

    fn date_time_field(&self, kind: DateTimeFieldType) -> DateTimeFieldRef {
        self.assembled.date_time_field(kind)
    }

    fn date_time_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> ChronoResult<i64> {
        let local = self
            .base()?
            .date_time_millis(year, month, day, millis_of_day)?;
        self.local_to_utc(local)
    }

    fn date_time_millis_full(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> ChronoResult<i64> {
        let local = self
            .base()?
            .date_time_millis_full(year, month, day, hour, minute, second, millis)?;
        self.local_to_utc(local)
    }

    fn date_time_millis_from(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> ChronoResult<i64> {
        let local = self.assembled.zone().convert_utc_to_local(instant)?;
        let local = self
            .base()?
            .date_time_millis_from(local, hour, minute, second, millis)?;
        self.local_to_utc(local)
    }
}

// ==== Field conversion ====

/// Converts fields once each, so that a duration field shared by several
/// date-time fields stays shared after conversion.
struct Converter {
    zone: ZoneRef,
    durations: FxHashMap<usize, DurationFieldRef>,
    date_times: FxHashMap<usize, DateTimeFieldRef>,
}

impl Converter {
    fn new(zone: ZoneRef) -> Self {
        Self {
            zone,
            durations: FxHashMap::default(),
            date_times: FxHashMap::default(),
        }
    }

    fn duration(&mut self, field: DurationFieldRef) -> DurationFieldRef {
        if !field.is_supported() {
            return field;
        }
        let key = address(&field);
        if let Some(converted) = self.durations.get(&key) {
            return converted.clone();
        }
        let converted: DurationFieldRef = Arc::new(ZonedDurationField {
            time_field: uses_time_arithmetic(field.as_ref()),
            field,
            zone: self.zone.clone(),
        });
        self.durations.insert(key, converted.clone());
        converted
    }

    fn date_time(&mut self, field: DateTimeFieldRef) -> DateTimeFieldRef {
        if !field.is_supported() {
            return field;
        }
        let key = address(&field);
        if let Some(converted) = self.date_times.get(&key) {
            return converted.clone();
        }
        let duration = self.duration(field.duration_field());
        let range = field.range_duration_field().map(|range| self.duration(range));
        let leap = field.leap_duration_field().map(|leap| self.duration(leap));
        let converted: DateTimeFieldRef = Arc::new(ZonedDateTimeField {
            time_field: uses_time_arithmetic(duration.as_ref()),
            field,
            zone: self.zone.clone(),
            duration,
            range,
            leap,
        });
        self.date_times.insert(key, converted.clone());
        converted
    }
}

// ==== ZonedDurationField ====

#[derive(Debug)]
struct ZonedDurationField {
    field: DurationFieldRef,
    zone: ZoneRef,
    time_field: bool,
}

impl ZonedDurationField {
    fn local(&self, instant: i64) -> ChronoResult<i64> {
        Ok(instant + offset_to_add(self.zone.as_ref(), instant)?)
    }
}

impl DurationField for ZonedDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.field.field_type()
    }

    fn is_precise(&self) -> bool {
        if self.time_field {
            self.field.is_precise()
        } else {
            self.field.is_precise() && self.zone.is_fixed()
        }
    }

    fn unit_millis(&self) -> i64 {
        self.field.unit_millis()
    }

    fn value_as_long_at(&self, duration: i64, instant: i64) -> ChronoResult<i64> {
        self.field.value_as_long_at(duration, self.local(instant)?)
    }

    fn millis_at(&self, value: i64, instant: i64) -> ChronoResult<i64> {
        self.field.millis_at(value, self.local(instant)?)
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        let offset = offset_to_add(self.zone.as_ref(), instant)?;
        let local = self.field.add(instant + offset, value)?;
        let offset = if self.time_field {
            offset
        } else {
            offset_from_local_to_subtract(self.zone.as_ref(), local)?
        };
        Ok(local - offset)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        let offset = offset_to_add(self.zone.as_ref(), subtrahend)?;
        let minuend_offset = if self.time_field {
            offset
        } else {
            offset_to_add(self.zone.as_ref(), minuend)?
        };
        self.field
            .difference_as_long(minuend.saturating_add(minuend_offset), subtrahend + offset)
    }
}

// ==== ZonedDateTimeField ====

#[derive(Debug)]
struct ZonedDateTimeField {
    field: DateTimeFieldRef,
    zone: ZoneRef,
    duration: DurationFieldRef,
    range: Option<DurationFieldRef>,
    leap: Option<DurationFieldRef>,
    time_field: bool,
}

impl ZonedDateTimeField {
    fn to_local(&self, instant: i64) -> ChronoResult<i64> {
        self.zone.convert_utc_to_local(instant)
    }

    /// Applies `op` in local time and maps the result back to UTC.
    fn in_local(
        &self,
        instant: i64,
        op: impl FnOnce(i64) -> ChronoResult<i64>,
    ) -> ChronoResult<i64> {
        if self.time_field {
            let offset = offset_to_add(self.zone.as_ref(), instant)?;
            return Ok(op(instant + offset)? - offset);
        }
        let local = op(self.to_local(instant)?)?;
        self.zone.convert_local_to_utc_near(local, false, instant)
    }
}

impl DateTimeField for ZonedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field.field_type()
    }

    fn is_lenient(&self) -> bool {
        self.field.is_lenient()
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        self.field.get(self.to_local(instant)?)
    }

    fn as_text(&self, instant: i64, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        self.field.as_text(self.to_local(instant)?, symbols)
    }

    fn as_short_text(&self, instant: i64, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        self.field.as_short_text(self.to_local(instant)?, symbols)
    }

    fn value_as_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        self.field.value_as_text(value, symbols)
    }

    fn value_as_short_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        self.field.value_as_short_text(value, symbols)
    }

    fn convert_text(&self, text: &str, symbols: &dyn LocaleSymbols) -> ChronoResult<i32> {
        self.field.convert_text(text, symbols)
    }

    fn maximum_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        self.field.maximum_text_length(symbols)
    }

    fn maximum_short_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        self.field.maximum_short_text_length(symbols)
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.in_local(instant, |local| self.field.add(local, value))
    }

    fn add_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        self.field.add_partial(partial, index, values, value)
    }

    fn add_wrap_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        self.field.add_wrap_partial(partial, index, values, value)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.in_local(instant, |local| self.field.add_wrap_field(local, value))
    }

    fn add_wrap_field_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        self.field.add_wrap_field_partial(partial, index, values, value)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        let offset = offset_to_add(self.zone.as_ref(), subtrahend)?;
        let minuend_offset = if self.time_field {
            offset
        } else {
            offset_to_add(self.zone.as_ref(), minuend)?
        };
        self.field
            .difference_as_long(minuend.saturating_add(minuend_offset), subtrahend + offset)
    }

    /// Sets the value in local time. A result that does not read back as
    /// `value` fell into an offset transition gap.
    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        let local = self.field.set(self.to_local(instant)?, value)?;
        let result = self.zone.convert_local_to_utc_near(local, false, instant)?;
        if self.get(result)? != value {
            let gap = illegal_instant(local, self.zone.id());
            return Err(
                ChronoError::illegal_field_value(self.field.field_type(), value.into(), None, None)
                    .with_message(gap.message().to_owned()),
            );
        }
        Ok(result)
    }

    fn set_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        self.field.set_partial(partial, index, values, value)
    }

    fn set_text(&self, instant: i64, text: &str, symbols: &dyn LocaleSymbols) -> ChronoResult<i64> {
        let local = self.field.set_text(self.to_local(instant)?, text, symbols)?;
        self.zone.convert_local_to_utc_near(local, false, instant)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.duration.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        self.range.clone()
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        self.field.is_leap(self.to_local(instant)?)
    }

    fn leap_amount(&self, instant: i64) -> ChronoResult<i32> {
        self.field.leap_amount(self.to_local(instant)?)
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        self.leap.clone()
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        self.field.minimum_value()
    }

    fn minimum_value_at(&self, instant: i64) -> ChronoResult<i32> {
        self.field.minimum_value_at(self.to_local(instant)?)
    }

    fn minimum_value_for_partial(&self, partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        self.field.minimum_value_for_partial(partial)
    }

    fn minimum_value_for_values(
        &self,
        partial: &dyn ReadablePartial,
        values: &[i32],
    ) -> ChronoResult<i32> {
        self.field.minimum_value_for_values(partial, values)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        self.field.maximum_value()
    }

    fn maximum_value_at(&self, instant: i64) -> ChronoResult<i32> {
        self.field.maximum_value_at(self.to_local(instant)?)
    }

    fn maximum_value_for_partial(&self, partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        self.field.maximum_value_for_partial(partial)
    }

    fn maximum_value_for_values(
        &self,
        partial: &dyn ReadablePartial,
        values: &[i32],
    ) -> ChronoResult<i32> {
        self.field.maximum_value_for_values(partial, values)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.in_local(instant, |local| self.field.round_floor(local))
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.in_local(instant, |local| self.field.round_ceiling(local))
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        self.field.remainder(self.to_local(instant)?)
    }
}
