//! The proleptic Gregorian calendar.

use core::fmt;
use std::sync::Arc;

use crate::{
    duration::DurationFieldRef,
    field::{DateTimeFieldRef, UnsupportedFieldCache},
    fields::{DateTimeFieldType, DurationFieldType},
    options::{ChronologyOptions, MinDaysInFirstWeek},
    provider::{self, ZoneRef},
    ChronoResult,
};

use super::{
    basic::fields, AssembledChronology, BaseFlags, BasicCalendar, CalendarRules, Chronology,
    ChronologyCache, ChronologyRef, ZonedChronology,
};

const NAME: &str = "GregorianChronology";

/// The Gregorian calendar extended backwards before 1582, with a year zero.
///
/// Leap years are those divisible by 4, except centuries not divisible by
/// 400. Instances are shared per zone and week rule.
///
/// ```
/// use chronology_rs::{Chronology, DateTimeField, GregorianChronology};
///
/// let chronology = GregorianChronology::instance_utc().unwrap();
/// let instant = chronology.date_time_millis(2000, 2, 29, 0).unwrap();
/// assert_eq!(chronology.year().get(instant).unwrap(), 2000);
/// assert!(chronology.year().is_leap(instant).unwrap());
/// ```
pub struct GregorianChronology {
    assembled: AssembledChronology,
    calendar: Arc<BasicCalendar>,
    options: ChronologyOptions,
}

impl GregorianChronology {
    /// Returns the shared instance in UTC with the ISO week rule.
    pub fn instance_utc() -> ChronoResult<Arc<Self>> {
        Self::instance(provider::utc())
    }

    /// Returns the shared instance in `zone` with the ISO week rule.
    pub fn instance(zone: ZoneRef) -> ChronoResult<Arc<Self>> {
        Self::instance_with(zone, ChronologyOptions::default())
    }

    /// Returns the shared instance in `zone` with the given week rule.
    pub fn instance_with(zone: ZoneRef, options: ChronologyOptions) -> ChronoResult<Arc<Self>> {
        Self::instance_in(ChronologyCache::global(), zone, options)
    }

    /// Returns the instance held by `cache`, building it on first use.
    pub fn instance_in(
        cache: &ChronologyCache,
        zone: ZoneRef,
        options: ChronologyOptions,
    ) -> ChronoResult<Arc<Self>> {
        let min_days = options.min_days_in_first_week;
        cache.gregorian(zone.id(), min_days, || {
            if zone.is_utc() {
                return Self::build_utc(options).map(Arc::new);
            }
            let utc = Self::instance_in(cache, provider::utc(), options)?;
            let calendar = utc.calendar.clone();
            let base: ChronologyRef = Arc::new(ZonedChronology::try_new(utc, zone.clone())?);
            let assembled = AssembledChronology::assemble(
                NAME.into(),
                Some(base),
                zone.clone(),
                UnsupportedFieldCache::global(),
                |_| Ok(()),
            )?;
            Ok(Arc::new(Self {
                assembled,
                calendar,
                options,
            }))
        })
    }

    fn build_utc(options: ChronologyOptions) -> ChronoResult<Self> {
        let calendar = Arc::new(BasicCalendar::new(
            CalendarRules::Gregorian,
            options.min_days_in_first_week,
        ));
        let assembled = AssembledChronology::assemble(
            NAME.into(),
            None,
            provider::utc(),
            UnsupportedFieldCache::global(),
            |slots| fields::install(&calendar, slots),
        )?;
        Ok(Self {
            assembled,
            calendar,
            options,
        })
    }

    /// Returns the calendar math behind the fields.
    #[must_use]
    pub fn calendar(&self) -> &BasicCalendar {
        &self.calendar
    }

    #[must_use]
    pub fn min_days_in_first_week(&self) -> MinDaysInFirstWeek {
        self.options.min_days_in_first_week
    }

    #[must_use]
    pub fn is_leap_year(&self, year: i32) -> bool {
        self.calendar.is_leap_year(year)
    }
}

impl fmt::Debug for GregorianChronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GregorianChronology")
            .field("zone", &self.assembled.zone().id())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for GregorianChronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NAME}[{}", self.assembled.zone().id())?;
        if self.options.min_days_in_first_week != MinDaysInFirstWeek::ISO {
            write!(f, ",mdfw={}", self.options.min_days_in_first_week)?;
        }
        f.write_str("]")
    }
}

impl Chronology for GregorianChronology {
    fn name(&self) -> &str {
        NAME
    }

    fn zone(&self) -> ZoneRef {
        self.assembled.zone()
    }

    fn with_utc(self: Arc<Self>) -> ChronologyRef {
        match self.assembled.base() {
            Some(zoned) => zoned.clone().with_utc(),
            None => self,
        }
    }

    fn with_zone(self: Arc<Self>, zone: ZoneRef) -> ChronoResult<ChronologyRef> {
        if zone.id() == self.assembled.zone().id() {
            return Ok(self);
        }
        Ok(Self::instance_with(zone, self.options)?)
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
        match self
            .assembled
            .fast_path(BaseFlags::DATE | BaseFlags::MILLIS_OF_DAY)
        {
            Some(zoned) => zoned.date_time_millis(year, month, day, millis_of_day),
            None => self
                .calendar
                .date_time_millis(year, month, day, millis_of_day),
        }
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
        match self.assembled.fast_path(BaseFlags::DATE | BaseFlags::TIME) {
            Some(zoned) => {
                zoned.date_time_millis_full(year, month, day, hour, minute, second, millis)
            }
            None => self
                .calendar
                .date_time_millis_full(year, month, day, hour, minute, second, millis),
        }
    }

    fn date_time_millis_from(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> ChronoResult<i64> {
        self.assembled
            .date_time_millis_from(instant, hour, minute, second, millis)
    }
}
