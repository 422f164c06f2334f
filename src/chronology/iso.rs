//! The ISO 8601 calendar: Gregorian with zero based centuries.

use core::fmt;
use std::sync::Arc;

use crate::{
    duration::{DurationFieldRef, UnsupportedDurationField},
    field::{
        DateTimeField, DateTimeFieldRef, DividedDateTimeField, RemainderDateTimeField,
        UnsupportedFieldCache,
    },
    fields::{DateTimeFieldType, DurationFieldType},
    options::ChronologyOptions,
    provider::{self, ZoneRef},
    ChronoError, ChronoResult,
};

use super::{
    basic::fields::IsoYearOfEraField, AssembledChronology, Chronology, ChronologyCache,
    ChronologyRef, Fields, GregorianChronology, ZonedChronology,
};

const NAME: &str = "ISOChronology";

/// The Gregorian calendar with the ISO week rule, where the century of
/// 2000 is 20 and its year of century is 0.
#[derive(Debug)]
pub struct IsoChronology {
    assembled: AssembledChronology,
}

fn required(slots: &Fields, kind: DateTimeFieldType) -> ChronoResult<DateTimeFieldRef> {
    slots
        .date_time(kind)
        .cloned()
        .ok_or_else(|| ChronoError::assert().with_message(format!("{kind} missing from the base")))
}

/// Replaces the one based century fields of the Gregorian base.
fn zero_based_centuries(slots: &mut Fields) -> ChronoResult<()> {
    let year = required(slots, DateTimeFieldType::Year)?;
    let weekyear = required(slots, DateTimeFieldType::Weekyear)?;
    let eras = UnsupportedDurationField::instance(DurationFieldType::Eras);

    let year_of_era: DateTimeFieldRef = Arc::new(IsoYearOfEraField::new(year, eras));
    let century_of_era =
        DividedDateTimeField::try_new(year_of_era, None, DateTimeFieldType::CenturyOfEra, 100)?;
    let centuries = century_of_era.duration_field();
    let year_of_century =
        RemainderDateTimeField::from_divided(&century_of_era, DateTimeFieldType::YearOfCentury);
    let weekyear_of_century = RemainderDateTimeField::try_new(
        weekyear,
        centuries.clone(),
        DateTimeFieldType::WeekyearOfCentury,
        100,
    )?;

    slots.set_date_time(DateTimeFieldType::CenturyOfEra, Arc::new(century_of_era));
    slots.set_date_time(DateTimeFieldType::YearOfCentury, Arc::new(year_of_century));
    slots.set_date_time(
        DateTimeFieldType::WeekyearOfCentury,
        Arc::new(weekyear_of_century),
    );
    slots.set_duration(DurationFieldType::Centuries, centuries);
    Ok(())
}

fn keep_inherited(_: &mut Fields) -> ChronoResult<()> {
    Ok(())
}

impl IsoChronology {
    /// Returns the shared instance in UTC.
    pub fn instance_utc() -> ChronoResult<Arc<Self>> {
        Self::instance(provider::utc())
    }

    /// Returns the shared instance in `zone`.
    pub fn instance(zone: ZoneRef) -> ChronoResult<Arc<Self>> {
        Self::instance_in(ChronologyCache::global(), zone)
    }

    /// Returns the instance held by `cache`, building it on first use.
    pub fn instance_in(cache: &ChronologyCache, zone: ZoneRef) -> ChronoResult<Arc<Self>> {
        cache.iso(zone.id(), || {
            let base: ChronologyRef;
            let hook: fn(&mut Fields) -> ChronoResult<()>;
            if zone.is_utc() {
                base = GregorianChronology::instance_in(
                    cache,
                    provider::utc(),
                    ChronologyOptions::default(),
                )?;
                hook = zero_based_centuries;
            } else {
                let utc = Self::instance_in(cache, provider::utc())?;
                base = Arc::new(ZonedChronology::try_new(utc, zone.clone())?);
                hook = keep_inherited;
            }
            let assembled = AssembledChronology::assemble(
                NAME.into(),
                Some(base),
                zone.clone(),
                UnsupportedFieldCache::global(),
                hook,
            )?;
            Ok(Arc::new(Self { assembled }))
        })
    }
}

impl fmt::Display for IsoChronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NAME}[{}]", self.assembled.zone().id())
    }
}

impl Chronology for IsoChronology {
    fn name(&self) -> &str {
        NAME
    }

    fn zone(&self) -> ZoneRef {
        self.assembled.zone()
    }

    fn with_utc(self: Arc<Self>) -> ChronologyRef {
        if self.assembled.zone().is_utc() {
            return self;
        }
        match self.assembled.base() {
            Some(zoned) => zoned.clone().with_utc(),
            None => self,
        }
    }

    fn with_zone(self: Arc<Self>, zone: ZoneRef) -> ChronoResult<ChronologyRef> {
        if zone.id() == self.assembled.zone().id() {
            return Ok(self);
        }
        Ok(Self::instance(zone)?)
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
        self.assembled
            .date_time_millis(year, month, day, millis_of_day)
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
        self.assembled
            .date_time_millis_full(year, month, day, hour, minute, second, millis)
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
