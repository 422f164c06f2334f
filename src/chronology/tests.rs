use std::sync::Arc;

use crate::{
    duration::DurationField,
    error::{ChronoError, ErrorKind},
    field::{DateTimeField, OffsetDateTimeField},
    fields::{DateTimeFieldType, DurationFieldType},
    options::{ChronologyOptions, MinDaysInFirstWeek},
    partial::{Partial, Period, ReadablePartial},
    provider::{self, DateTimeZone, FixedOffsetZone, ZoneRef},
    ChronoResult,
    BCE, CE, MILLIS_PER_DAY, MILLIS_PER_HOUR, SATURDAY,
};

use super::{
    AssembledChronology, BaseFlags, Chronology, ChronologyCache, ChronologyRef, Fields,
    GregorianChronology, IsoChronology, JulianChronology,
};

const Y2000: i64 = 946_684_800_000;

fn gregorian() -> ChronologyRef {
    GregorianChronology::instance_utc().unwrap()
}

fn date(chronology: &dyn Chronology, year: i32, month: i32, day: i32) -> i64 {
    chronology.date_time_millis(year, month, day, 0).unwrap()
}

fn plus_two() -> ZoneRef {
    Arc::new(FixedOffsetZone::from_hours_minutes(2, 0).unwrap())
}

#[test]
fn gregorian_fields_read_an_instant() {
    let chronology = gregorian();
    let instant = chronology
        .date_time_millis_full(2000, 2, 29, 13, 45, 30, 250)
        .unwrap();
    assert_eq!(chronology.year().get(instant).unwrap(), 2000);
    assert_eq!(chronology.month_of_year().get(instant).unwrap(), 2);
    assert_eq!(chronology.day_of_month().get(instant).unwrap(), 29);
    assert_eq!(chronology.day_of_year().get(instant).unwrap(), 60);
    assert_eq!(chronology.hour_of_day().get(instant).unwrap(), 13);
    assert_eq!(chronology.hour_of_halfday().get(instant).unwrap(), 1);
    assert_eq!(chronology.clockhour_of_halfday().get(instant).unwrap(), 1);
    assert_eq!(chronology.halfday_of_day().get(instant).unwrap(), 1);
    assert_eq!(chronology.minute_of_hour().get(instant).unwrap(), 45);
    assert_eq!(chronology.second_of_minute().get(instant).unwrap(), 30);
    assert_eq!(chronology.millis_of_second().get(instant).unwrap(), 250);
    assert_eq!(chronology.era().get(instant).unwrap(), CE);
    assert_eq!(chronology.year_of_era().get(instant).unwrap(), 2000);
    assert_eq!(chronology.century_of_era().get(instant).unwrap(), 20);
    assert_eq!(chronology.year_of_century().get(instant).unwrap(), 100);
    assert_eq!(chronology.weekyear().get(instant).unwrap(), 2000);
    assert_eq!(chronology.week_of_weekyear().get(instant).unwrap(), 9);

    let midnight = date(chronology.as_ref(), 2000, 1, 1);
    assert_eq!(midnight, Y2000);
    assert_eq!(chronology.clockhour_of_day().get(midnight).unwrap(), 24);
    assert_eq!(chronology.day_of_week().get(midnight).unwrap(), SATURDAY);
}

#[test]
fn set_then_get_round_trips() {
    let chronology = gregorian();
    let instant = chronology
        .date_time_millis_full(1987, 7, 15, 8, 30, 0, 0)
        .unwrap();
    let cases = [
        (DateTimeFieldType::Year, 2012),
        (DateTimeFieldType::MonthOfYear, 2),
        (DateTimeFieldType::DayOfMonth, 28),
        (DateTimeFieldType::DayOfYear, 365),
        (DateTimeFieldType::DayOfWeek, 1),
        (DateTimeFieldType::WeekOfWeekyear, 52),
        (DateTimeFieldType::Weekyear, 2004),
        (DateTimeFieldType::HourOfDay, 23),
        (DateTimeFieldType::ClockhourOfDay, 24),
        (DateTimeFieldType::MinuteOfDay, 1439),
        (DateTimeFieldType::YearOfEra, 44),
        (DateTimeFieldType::CenturyOfEra, 21),
        (DateTimeFieldType::YearOfCentury, 7),
        (DateTimeFieldType::Era, BCE),
    ];
    for (kind, value) in cases {
        let field = chronology.date_time_field(kind);
        let set = field.set(instant, value).unwrap();
        assert_eq!(field.get(set).unwrap(), value, "{kind}");
    }
}

#[test]
fn month_addition_clamps_sequentially() {
    let chronology = gregorian();
    let months = chronology.months();
    let jan_31 = date(chronology.as_ref(), 2001, 1, 31);
    let feb_28 = months.add(jan_31, 1).unwrap();
    assert_eq!(feb_28, date(chronology.as_ref(), 2001, 2, 28));
    assert_eq!(
        months.add(feb_28, 1).unwrap(),
        date(chronology.as_ref(), 2001, 3, 28)
    );
    assert_eq!(
        months.add(jan_31, 2).unwrap(),
        date(chronology.as_ref(), 2001, 3, 31)
    );
    assert_eq!(
        months.add(jan_31, -2).unwrap(),
        date(chronology.as_ref(), 2000, 11, 30)
    );
    assert_eq!(
        months.add(jan_31, 13).unwrap(),
        date(chronology.as_ref(), 2002, 2, 28)
    );

    // The last day of a month is a whole month after a later day.
    assert_eq!(months.difference(feb_28, jan_31).unwrap(), 1);
    assert_eq!(months.difference(jan_31, feb_28).unwrap(), -1);
    assert_eq!(months.difference(feb_28 - 1, jan_31).unwrap(), 0);
}

#[test]
fn add_and_difference_invert() {
    let chronology = gregorian();
    let start = chronology
        .date_time_millis_full(1999, 5, 17, 6, 0, 0, 0)
        .unwrap();
    for kind in [
        DurationFieldType::Years,
        DurationFieldType::Months,
        DurationFieldType::Weekyears,
        DurationFieldType::Weeks,
        DurationFieldType::Days,
        DurationFieldType::Hours,
        DurationFieldType::Centuries,
    ] {
        let unit = chronology.duration_field(kind);
        for amount in [-7, -1, 1, 3, 12] {
            let end = unit.add(start, amount).unwrap();
            assert_eq!(unit.difference_as_long(end, start).unwrap(), amount, "{kind}");
        }
    }
}

#[test]
fn leap_day_years() {
    let chronology = gregorian();
    let leap_day = date(chronology.as_ref(), 2004, 2, 29);
    let years = chronology.years();
    assert_eq!(
        years.add(leap_day, 1).unwrap(),
        date(chronology.as_ref(), 2005, 2, 28)
    );
    assert_eq!(years.add(leap_day, 4).unwrap(), date(chronology.as_ref(), 2008, 2, 29));
    assert!(chronology.day_of_month().is_leap(leap_day).unwrap());
    assert!(chronology.month_of_year().is_leap(leap_day).unwrap());
    assert_eq!(chronology.year().leap_amount(leap_day).unwrap(), 1);
    assert_eq!(
        chronology
            .year()
            .leap_duration_field()
            .unwrap()
            .field_type(),
        DurationFieldType::Days
    );
}

#[test]
fn era_flips_keep_year_of_era() {
    let chronology = gregorian();
    let instant = date(chronology.as_ref(), 2000, 6, 1);
    let era = chronology.era();
    let bce = era.set(instant, BCE).unwrap();
    assert_eq!(chronology.year().get(bce).unwrap(), -1999);
    assert_eq!(chronology.year_of_era().get(bce).unwrap(), 2000);
    assert_eq!(era.set(bce, CE).unwrap(), instant);

    let year_zero = date(chronology.as_ref(), 0, 1, 1);
    assert_eq!(era.get(year_zero).unwrap(), BCE);
    assert_eq!(chronology.year_of_era().get(year_zero).unwrap(), 1);

    let common_era = date(chronology.as_ref(), 1, 1, 1);
    assert_eq!(era.round_floor(instant).unwrap(), common_era);
    assert_eq!(era.round_ceiling(year_zero).unwrap(), common_era);
    assert_eq!(era.round_ceiling(instant).unwrap(), i64::MAX);
}

#[test]
fn weekyear_set_keeps_week_and_day() {
    let chronology = gregorian();
    // Saturday of week 52 of weekyear 1999.
    let weekyear = chronology.weekyear();
    let moved = weekyear.set(Y2000, 2000).unwrap();
    assert_eq!(moved, date(chronology.as_ref(), 2000, 12, 30));
    assert_eq!(chronology.week_of_weekyear().get(moved).unwrap(), 52);
    assert_eq!(chronology.day_of_week().get(moved).unwrap(), SATURDAY);

    // Week 53 does not exist in 2005.
    let week_53 = date(chronology.as_ref(), 2004, 12, 31);
    assert_eq!(chronology.week_of_weekyear().get(week_53).unwrap(), 53);
    let moved = weekyear.set(week_53, 2005).unwrap();
    assert_eq!(chronology.week_of_weekyear().get(moved).unwrap(), 52);
    assert_eq!(weekyear.get(moved).unwrap(), 2005);

    assert_eq!(
        weekyear.round_floor(Y2000).unwrap(),
        date(chronology.as_ref(), 1999, 1, 4)
    );
    assert_eq!(
        chronology.week_of_weekyear().round_floor(Y2000).unwrap(),
        date(chronology.as_ref(), 1999, 12, 27)
    );
}

#[test]
fn iso_centuries_are_zero_based() {
    let iso = IsoChronology::instance_utc().unwrap();
    let instant = date(iso.as_ref(), 2000, 6, 1);
    assert_eq!(iso.century_of_era().get(instant).unwrap(), 20);
    assert_eq!(iso.year_of_century().get(instant).unwrap(), 0);
    assert_eq!(iso.weekyear_of_century().get(instant).unwrap(), 0);
    let instant = date(iso.as_ref(), 1999, 6, 1);
    assert_eq!(iso.century_of_era().get(instant).unwrap(), 19);
    assert_eq!(iso.year_of_century().get(instant).unwrap(), 99);
    assert_eq!(iso.name(), "ISOChronology");

    // Everything else is the Gregorian base's own field.
    let gregorian = gregorian();
    assert!(Arc::ptr_eq(&iso.month_of_year(), &gregorian.month_of_year()));
    assert!(Arc::ptr_eq(&iso.hour_of_day(), &gregorian.hour_of_day()));
    assert!(!Arc::ptr_eq(&iso.century_of_era(), &gregorian.century_of_era()));
}

#[test]
fn julian_has_no_year_zero() {
    let julian = JulianChronology::instance_utc().unwrap();
    assert_eq!(date(julian.as_ref(), 1970, 1, 1), 13 * MILLIS_PER_DAY);

    let one_bc = date(julian.as_ref(), -1, 12, 31);
    let year = julian.year();
    assert_eq!(year.get(one_bc).unwrap(), -1);
    assert_eq!(year.get(one_bc + MILLIS_PER_DAY).unwrap(), 1);
    assert_eq!(julian.year_of_era().get(one_bc).unwrap(), 1);
    assert_eq!(julian.era().get(one_bc).unwrap(), BCE);
    assert_eq!(
        year.set(one_bc, 0).unwrap_err().kind(),
        ErrorKind::IllegalFieldValue
    );
    assert_eq!(year.get(year.set(one_bc, -5).unwrap()).unwrap(), -5);
    assert!(julian.date_time_millis(0, 1, 1, 0).is_err());

    let leap_day = date(julian.as_ref(), 1900, 2, 29);
    assert!(julian.day_of_month().is_leap(leap_day).unwrap());
}

#[test]
fn assembly_inherits_unchanged_fields() {
    let base = gregorian();
    let custom = AssembledChronology::try_new(
        "ShiftedYears",
        base.clone(),
        Arc::new(|fields: &mut Fields| -> ChronoResult<()> {
            let year = fields
                .date_time(DateTimeFieldType::Year)
                .cloned()
                .expect("year");
            fields.set_date_time(
                DateTimeFieldType::Year,
                Arc::new(OffsetDateTimeField::try_new(year, 543)?),
            );
            Ok(())
        }),
    )
    .unwrap();

    assert_eq!(custom.flags(), BaseFlags::TIME | BaseFlags::MILLIS_OF_DAY);
    assert!(Arc::ptr_eq(&custom.month_of_year(), &base.month_of_year()));
    assert!(Arc::ptr_eq(&custom.days(), &base.days()));
    assert!(!Arc::ptr_eq(&custom.year(), &base.year()));
    assert_eq!(custom.to_string(), "ShiftedYears[UTC]");

    // The date composite cannot use the base, the clock composite can.
    assert_eq!(date(&custom, 2543, 1, 1), Y2000);
    assert_eq!(custom.year().get(Y2000).unwrap(), 2543);
    assert_eq!(
        custom
            .date_time_millis_from(Y2000, 1, 0, 0, 0)
            .unwrap(),
        Y2000 + MILLIS_PER_HOUR
    );

    // Moving zones replays the hook over the moved base.
    let zoned = Arc::new(custom).with_zone(plus_two()).unwrap();
    assert_eq!(zoned.year().get(Y2000).unwrap(), 2543);
    assert_eq!(zoned.hour_of_day().get(Y2000).unwrap(), 2);
    let utc = zoned.with_utc();
    assert!(utc.zone().is_utc());
    assert_eq!(utc.year().get(Y2000).unwrap(), 2543);
}

#[test]
fn failed_utc_reassembly_falls_back_to_the_base() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Builds in UTC and in the first zone, then refuses.
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let custom = AssembledChronology::try_new(
        "Flaky",
        gregorian(),
        Arc::new(move |_: &mut Fields| -> ChronoResult<()> {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(())
            } else {
                Err(ChronoError::unsupported().with_message("no more assemblies"))
            }
        }),
    )
    .unwrap();
    let zoned = Arc::new(custom).with_zone(plus_two()).unwrap();
    assert_eq!(zoned.name(), "Flaky");

    let utc = zoned.with_utc();
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert!(utc.zone().is_utc());
    assert_eq!(utc.name(), gregorian().name());
    assert_eq!(utc.year().get(Y2000).unwrap(), 2000);
}

#[test]
fn assembly_without_overrides_shares_every_field() {
    let base = gregorian();
    let same = AssembledChronology::try_new(
        "Unchanged",
        base.clone(),
        Arc::new(|_: &mut Fields| -> ChronoResult<()> { Ok(()) }),
    )
    .unwrap();

    assert_eq!(same.flags(), BaseFlags::all());
    for kind in DurationFieldType::ALL {
        assert!(
            Arc::ptr_eq(&same.duration_field(kind), &base.duration_field(kind)),
            "{kind}"
        );
    }
    for kind in DateTimeFieldType::ALL {
        assert!(
            Arc::ptr_eq(&same.date_time_field(kind), &base.date_time_field(kind)),
            "{kind}"
        );
    }
    assert_eq!(date(&same, 2000, 1, 1), Y2000);
}

#[test]
fn unsupported_slots_fail() {
    let chronology = gregorian();
    let eras = chronology.eras();
    assert!(!eras.is_supported());
    assert_eq!(eras.add(0, 1).unwrap_err().kind(), ErrorKind::Unsupported);
    assert!(chronology.era().duration_field().field_type() == DurationFieldType::Eras);
}

#[test]
fn partials_validate_against_each_other() {
    use DateTimeFieldType as F;
    let chronology = gregorian();
    assert!(Partial::try_new(chronology.clone(), vec![F::MonthOfYear, F::DayOfMonth], vec![2, 29]).is_ok());
    let err = Partial::try_new(chronology.clone(), vec![F::MonthOfYear, F::DayOfMonth], vec![2, 30])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalFieldValue);
    assert!(Partial::try_new(
        chronology.clone(),
        vec![F::Year, F::MonthOfYear, F::DayOfMonth],
        vec![2001, 2, 29]
    )
    .is_err());
    assert!(Partial::try_new(chronology.clone(), vec![F::DayOfMonth, F::MonthOfYear], vec![1, 1]).is_err());

    let partial = Partial::try_new(
        chronology.clone(),
        vec![F::Year, F::MonthOfYear, F::DayOfMonth],
        vec![2000, 2, 29],
    )
    .unwrap();
    assert!(chronology.validate(&partial, &[2000, 2, 29]).is_ok());
    assert!(chronology.validate(&partial, &[2000, 2]).is_err());
    assert_eq!(
        chronology.partial_values(&partial, Y2000).unwrap(),
        vec![2000, 1, 1]
    );
    assert_eq!(
        chronology.set_partial(&partial, Y2000 + MILLIS_PER_HOUR).unwrap(),
        date(chronology.as_ref(), 2000, 2, 29) + MILLIS_PER_HOUR
    );
}

#[test]
fn month_partials_add_like_instants() {
    use DateTimeFieldType as F;
    let chronology = gregorian();

    let month_day =
        Partial::try_new(chronology.clone(), vec![F::MonthOfYear, F::DayOfMonth], vec![12, 31])
            .unwrap();
    let added = month_day.with_field_added(F::MonthOfYear, 2).unwrap();
    assert_eq!(added.values(), vec![2, 29]);

    let full = Partial::try_new(
        chronology.clone(),
        vec![F::Year, F::MonthOfYear, F::DayOfMonth],
        vec![2001, 1, 31],
    )
    .unwrap();
    assert_eq!(
        full.with_field_added(F::MonthOfYear, 1).unwrap().values(),
        vec![2001, 2, 28]
    );
    assert_eq!(
        full.with_field_added(F::MonthOfYear, -2).unwrap().values(),
        vec![2000, 11, 30]
    );
    assert_eq!(
        full.with_field_wrapped(F::MonthOfYear, 12).unwrap().values(),
        vec![2001, 1, 31]
    );
}

#[test]
fn periods_split_and_add() {
    let chronology = gregorian();
    let end = chronology
        .date_time_millis_full(2001, 3, 4, 4, 0, 0, 0)
        .unwrap();
    let period = Period::standard();
    assert_eq!(
        chronology.period_values(&period, Y2000, end).unwrap(),
        vec![1, 2, 0, 3, 4, 0, 0, 0]
    );
    assert_eq!(
        chronology.period_values(&period, end, Y2000).unwrap(),
        vec![-1, -2, 0, -3, -4, 0, 0, 0]
    );
    assert_eq!(
        chronology
            .period_values_for_duration(&period, 2 * MILLIS_PER_DAY + 3 * MILLIS_PER_HOUR)
            .unwrap(),
        vec![0, 0, 0, 2, 3, 0, 0, 0]
    );

    let year_and_month = Period::from_entries(vec![
        (DurationFieldType::Years, 1),
        (DurationFieldType::Months, 1),
    ]);
    let jan_31 = date(chronology.as_ref(), 2000, 1, 31);
    assert_eq!(
        chronology.add_period(&year_and_month, jan_31, 1).unwrap(),
        date(chronology.as_ref(), 2001, 2, 28)
    );
    assert_eq!(
        chronology.add_period(&year_and_month, jan_31, 2).unwrap(),
        date(chronology.as_ref(), 2002, 3, 31)
    );
    assert_eq!(chronology.add_period(&year_and_month, jan_31, 0).unwrap(), jan_31);
    assert_eq!(
        chronology.add_duration(Y2000, MILLIS_PER_DAY, -2).unwrap(),
        Y2000 - 2 * MILLIS_PER_DAY
    );
}

#[test]
fn arithmetic_overflow_is_reported() {
    let chronology = gregorian();
    assert_eq!(
        chronology.millis().add(i64::MAX, 1).unwrap_err().kind(),
        ErrorKind::Overflow
    );
    assert_eq!(
        chronology.days().add(i64::MAX - 10, 1).unwrap_err().kind(),
        ErrorKind::Overflow
    );
    assert_eq!(
        chronology.add_duration(i64::MAX, 1, 1).unwrap_err().kind(),
        ErrorKind::Overflow
    );
    assert!(chronology.years().add(0, i64::from(i32::MAX)).is_err());
    assert!(chronology.months().add(0, i64::MAX).is_err());
    assert!(chronology
        .add_period(&Period::years(i32::MAX), 0, i32::MAX)
        .is_err());

    // The year holding the last instant has no representable end.
    let year = chronology.year();
    assert_eq!(
        year.round_ceiling(i64::MAX).unwrap_err().kind(),
        ErrorKind::Overflow
    );
    assert!(year.round_floor(i64::MAX).is_ok());
    assert_eq!(
        year.round_ceiling(Y2000 + 1).unwrap(),
        date(chronology.as_ref(), 2001, 1, 1)
    );
    assert_eq!(chronology.day_of_week().get(i64::MIN).unwrap(), 7);
    assert_eq!(chronology.day_of_week().get(i64::MAX).unwrap(), 7);
}

#[test]
fn zoned_fields_read_local_time() {
    let chronology = GregorianChronology::instance(plus_two()).unwrap();
    assert_eq!(chronology.zone().id(), "+02:00");
    assert_eq!(chronology.hour_of_day().get(Y2000).unwrap(), 2);
    assert_eq!(
        date(chronology.as_ref(), 2000, 1, 1),
        Y2000 - 2 * MILLIS_PER_HOUR
    );
    assert_eq!(
        chronology.day_of_month().round_floor(Y2000).unwrap(),
        Y2000 - 2 * MILLIS_PER_HOUR
    );
    assert!(chronology.days().is_precise());
    assert_eq!(chronology.to_string(), "GregorianChronology[+02:00]");

    let utc = chronology.clone().with_utc();
    let expected: ChronologyRef = GregorianChronology::instance_utc().unwrap();
    assert!(Arc::ptr_eq(&utc, &expected));

    let again = GregorianChronology::instance(plus_two()).unwrap();
    assert!(Arc::ptr_eq(&chronology, &again));
}

#[test]
fn caches_are_keyed_by_zone_and_week_rule() {
    let cache = ChronologyCache::new();
    let iso = ChronologyOptions::default();
    let sunday_rule = ChronologyOptions::new(MinDaysInFirstWeek::try_new(1).unwrap());

    let a = GregorianChronology::instance_in(&cache, provider::utc(), iso).unwrap();
    let b = GregorianChronology::instance_in(&cache, provider::utc(), iso).unwrap();
    let c = GregorianChronology::instance_in(&cache, provider::utc(), sunday_rule).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(c.to_string(), "GregorianChronology[UTC,mdfw=1]");
    assert_eq!(c.week_of_weekyear().get(Y2000).unwrap(), 1);

    // A fresh cache builds fresh instances.
    let global = GregorianChronology::instance_utc().unwrap();
    assert!(!Arc::ptr_eq(&a, &global));
}
