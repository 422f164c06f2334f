//! This module implements `Chronology`, a calendar system assembled from
//! fields.
//!
//! A chronology holds one [`DurationField`] per [`DurationFieldType`] and one
//! [`DateTimeField`] per [`DateTimeFieldType`]. Slots a calendar does not
//! support hold the unsupported sentinels, so lookups never fail.
//!
//! The composite operations of the trait (building an instant from calendar
//! components, reading and writing partials and periods) have generic
//! implementations that work field by field. Concrete chronologies override
//! them where they have a faster closed form.
//!
//! [`DurationField`]: crate::duration::DurationField
//! [`DateTimeField`]: crate::field::DateTimeField

use core::fmt;
use std::sync::Arc;

use crate::{
    duration::DurationFieldRef,
    field::DateTimeFieldRef,
    fields::{DateTimeFieldType, DurationFieldType},
    partial::{ReadablePartial, ReadablePeriod},
    provider::ZoneRef,
    utils::{safe_add, safe_multiply},
    ChronoError, ChronoResult, MILLIS_PER_DAY,
};

mod assembled;
mod basic;
mod cache;
mod gregorian;
mod iso;
mod julian;
mod zoned;

#[cfg(test)]
mod tests;

pub use assembled::{AssembledChronology, AssemblyHook, BaseFlags, Fields};
pub use basic::{BasicCalendar, CalendarRules};
pub use cache::{ChronologyCache, YearInfoCache};
pub use gregorian::GregorianChronology;
pub use iso::IsoChronology;
pub use julian::JulianChronology;
pub use zoned::ZonedChronology;

/// A shared handle to a chronology.
pub type ChronologyRef = Arc<dyn Chronology>;

/// A calendar system.
///
/// Instants are milliseconds in the chronology's own timeline: UTC for a
/// chronology whose zone is UTC, otherwise UTC milliseconds that the zoned
/// fields convert to local time before computing.
pub trait Chronology: Send + Sync + fmt::Debug {
    /// Returns the name of this calendar system, e.g. "GregorianChronology".
    fn name(&self) -> &str;

    /// Returns the zone of this chronology.
    fn zone(&self) -> ZoneRef;

    /// Returns this calendar system in UTC.
    fn with_utc(self: Arc<Self>) -> ChronologyRef;

    /// Returns this calendar system in `zone`.
    fn with_zone(self: Arc<Self>, zone: ZoneRef) -> ChronoResult<ChronologyRef>;

    /// Returns the duration field of `kind`.
    fn duration_field(&self, kind: DurationFieldType) -> DurationFieldRef;

    /// Returns the date-time field of `kind`.
    fn date_time_field(&self, kind: DateTimeFieldType) -> DateTimeFieldRef;

    // ==== Composites ====

    /// Returns the instant of a date and a millisecond of the day.
    fn date_time_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> ChronoResult<i64> {
        generic_date_time_millis(self, year, month, day, millis_of_day)
    }

    /// Returns the instant of a date and a time of day.
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
        generic_date_time_millis_full(self, year, month, day, hour, minute, second, millis)
    }

    /// Returns `instant` with its time of day replaced.
    fn date_time_millis_from(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> ChronoResult<i64> {
        generic_date_time_millis_from(self, instant, hour, minute, second, millis)
    }

    /// Checks `values` against the fields of `partial`, first on their own
    /// and then given each other.
    fn validate(&self, partial: &dyn ReadablePartial, values: &[i32]) -> ChronoResult<()> {
        generic_validate(self, partial, values)
    }

    /// Reads the fields of `partial` out of `instant`.
    fn partial_values(&self, partial: &dyn ReadablePartial, instant: i64) -> ChronoResult<Vec<i32>> {
        (0..partial.size())
            .map(|i| self.date_time_field(partial.field_type(i)).get(instant))
            .collect()
    }

    /// Writes the values of `partial` into `instant`, largest field first.
    fn set_partial(&self, partial: &dyn ReadablePartial, instant: i64) -> ChronoResult<i64> {
        (0..partial.size()).try_fold(instant, |instant, i| {
            self.date_time_field(partial.field_type(i))
                .set(instant, partial.value(i))
        })
    }

    /// Splits the span from `start` to `end` into the units of `period`,
    /// largest first.
    fn period_values(
        &self,
        period: &dyn ReadablePeriod,
        start: i64,
        end: i64,
    ) -> ChronoResult<Vec<i32>> {
        let mut values = vec![0; period.size()];
        if start == end {
            return Ok(values);
        }
        let mut start = start;
        for (i, value) in values.iter_mut().enumerate() {
            let unit = self.duration_field(period.field_type(i));
            let amount = unit.difference(end, start)?;
            if amount != 0 {
                start = unit.add(start, amount.into())?;
            }
            *value = amount;
        }
        Ok(values)
    }

    /// Splits a millisecond duration into the precise units of `period`.
    /// Imprecise units are left at zero.
    fn period_values_for_duration(
        &self,
        period: &dyn ReadablePeriod,
        duration: i64,
    ) -> ChronoResult<Vec<i32>> {
        let mut values = vec![0; period.size()];
        if duration == 0 {
            return Ok(values);
        }
        let mut current = 0;
        for (i, value) in values.iter_mut().enumerate() {
            let unit = self.duration_field(period.field_type(i));
            if unit.is_precise() {
                let amount = unit.difference(duration, current)?;
                current = unit.add(current, amount.into())?;
                *value = amount;
            }
        }
        Ok(values)
    }

    /// Adds `period` to `instant` `scalar` times.
    fn add_period(&self, period: &dyn ReadablePeriod, instant: i64, scalar: i32) -> ChronoResult<i64> {
        if scalar == 0 {
            return Ok(instant);
        }
        (0..period.size()).try_fold(instant, |instant, i| {
            let value = period.value(i);
            if value == 0 {
                return Ok(instant);
            }
            let amount = safe_multiply(i64::from(value), i64::from(scalar))?;
            self.duration_field(period.field_type(i)).add(instant, amount)
        })
    }

    /// Adds a millisecond duration to `instant` `scalar` times.
    fn add_duration(&self, instant: i64, duration: i64, scalar: i32) -> ChronoResult<i64> {
        if duration == 0 || scalar == 0 {
            return Ok(instant);
        }
        safe_add(instant, safe_multiply(duration, i64::from(scalar))?)
    }

    // ==== Duration fields ====

    fn millis(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Millis)
    }

    fn seconds(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Seconds)
    }

    fn minutes(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Minutes)
    }

    fn hours(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Hours)
    }

    fn halfdays(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Halfdays)
    }

    fn days(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Days)
    }

    fn weeks(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Weeks)
    }

    fn weekyears(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Weekyears)
    }

    fn months(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Months)
    }

    fn years(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Years)
    }

    fn centuries(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Centuries)
    }

    fn eras(&self) -> DurationFieldRef {
        self.duration_field(DurationFieldType::Eras)
    }

    // ==== Date-time fields ====

    fn millis_of_second(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::MillisOfSecond)
    }

    fn millis_of_day(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::MillisOfDay)
    }

    fn second_of_minute(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::SecondOfMinute)
    }

    fn second_of_day(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::SecondOfDay)
    }

    fn minute_of_hour(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::MinuteOfHour)
    }

    fn minute_of_day(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::MinuteOfDay)
    }

    fn hour_of_day(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::HourOfDay)
    }

    fn clockhour_of_day(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::ClockhourOfDay)
    }

    fn hour_of_halfday(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::HourOfHalfday)
    }

    fn clockhour_of_halfday(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::ClockhourOfHalfday)
    }

    fn halfday_of_day(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::HalfdayOfDay)
    }

    fn day_of_week(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::DayOfWeek)
    }

    fn day_of_month(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::DayOfMonth)
    }

    fn day_of_year(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::DayOfYear)
    }

    fn week_of_weekyear(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::WeekOfWeekyear)
    }

    fn weekyear(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::Weekyear)
    }

    fn weekyear_of_century(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::WeekyearOfCentury)
    }

    fn month_of_year(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::MonthOfYear)
    }

    fn year(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::Year)
    }

    fn year_of_era(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::YearOfEra)
    }

    fn year_of_century(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::YearOfCentury)
    }

    fn century_of_era(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::CenturyOfEra)
    }

    fn era(&self) -> DateTimeFieldRef {
        self.date_time_field(DateTimeFieldType::Era)
    }
}

// ==== Generic composite algorithms ====

/// Builds an instant by setting year, month, day and millis-of-day in turn
/// on the epoch.
pub fn generic_date_time_millis<C: Chronology + ?Sized>(
    chronology: &C,
    year: i32,
    month: i32,
    day: i32,
    millis_of_day: i32,
) -> ChronoResult<i64> {
    let instant = chronology.year().set(0, year)?;
    let instant = chronology.month_of_year().set(instant, month)?;
    let instant = chronology.day_of_month().set(instant, day)?;
    chronology.millis_of_day().set(instant, millis_of_day)
}

/// Builds an instant by setting each calendar and clock field in turn on
/// the epoch.
#[allow(clippy::too_many_arguments)]
pub fn generic_date_time_millis_full<C: Chronology + ?Sized>(
    chronology: &C,
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
    millis: i32,
) -> ChronoResult<i64> {
    let instant = chronology.year().set(0, year)?;
    let instant = chronology.month_of_year().set(instant, month)?;
    let instant = chronology.day_of_month().set(instant, day)?;
    generic_date_time_millis_from(chronology, instant, hour, minute, second, millis)
}

/// Replaces the clock fields of `instant` one at a time.
pub fn generic_date_time_millis_from<C: Chronology + ?Sized>(
    chronology: &C,
    instant: i64,
    hour: i32,
    minute: i32,
    second: i32,
    millis: i32,
) -> ChronoResult<i64> {
    let instant = chronology.hour_of_day().set(instant, hour)?;
    let instant = chronology.minute_of_hour().set(instant, minute)?;
    let instant = chronology.second_of_minute().set(instant, second)?;
    chronology.millis_of_second().set(instant, millis)
}

/// Checks partial values against context free bounds, then against the
/// bounds implied by the other values.
pub fn generic_validate<C: Chronology + ?Sized>(
    chronology: &C,
    partial: &dyn ReadablePartial,
    values: &[i32],
) -> ChronoResult<()> {
    if values.len() != partial.size() {
        return Err(ChronoError::invalid_argument()
            .with_message("Values array must be the same length as the partial"));
    }
    let fields: Vec<DateTimeFieldRef> = (0..partial.size())
        .map(|i| chronology.date_time_field(partial.field_type(i)))
        .collect();

    for (field, &value) in fields.iter().zip(values) {
        check_bounds(field, value, field.minimum_value()?, field.maximum_value()?)?;
    }
    for (field, &value) in fields.iter().zip(values) {
        check_bounds(
            field,
            value,
            field.minimum_value_for_values(partial, values)?,
            field.maximum_value_for_values(partial, values)?,
        )?;
    }
    Ok(())
}

fn check_bounds(field: &DateTimeFieldRef, value: i32, min: i32, max: i32) -> ChronoResult<()> {
    if value < min {
        return Err(ChronoError::illegal_field_value(
            field.field_type(),
            value.into(),
            Some(min.into()),
            None,
        ));
    }
    if value > max {
        return Err(ChronoError::illegal_field_value(
            field.field_type(),
            value.into(),
            None,
            Some(max.into()),
        ));
    }
    Ok(())
}

/// Returns the millis of day of a clock time after checking each component.
pub(crate) fn millis_of_day(hour: i32, minute: i32, second: i32, millis: i32) -> ChronoResult<i32> {
    use crate::utils::verify_value_bounds;
    verify_value_bounds(DateTimeFieldType::HourOfDay, hour.into(), 0, 23)?;
    verify_value_bounds(DateTimeFieldType::MinuteOfHour, minute.into(), 0, 59)?;
    verify_value_bounds(DateTimeFieldType::SecondOfMinute, second.into(), 0, 59)?;
    verify_value_bounds(DateTimeFieldType::MillisOfSecond, millis.into(), 0, 999)?;
    let total = i64::from(hour) * crate::MILLIS_PER_HOUR
        + i64::from(minute) * crate::MILLIS_PER_MINUTE
        + i64::from(second) * crate::MILLIS_PER_SECOND
        + i64::from(millis);
    debug_assert!(total < MILLIS_PER_DAY);
    Ok(total as i32)
}
