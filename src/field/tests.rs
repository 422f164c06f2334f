use std::sync::Arc;

use super::{
    estimate_difference, DateTimeField, DateTimeFieldRef, DividedDateTimeField, ImpreciseUnit,
    LinkedDurationField, OffsetDateTimeField, PreciseDateTimeField, RemainderDateTimeField,
    SkipDateTimeField, UnsupportedFieldCache, ZeroIsMaxDateTimeField,
};
use crate::{
    chronology::{Chronology, ChronologyRef, GregorianChronology},
    duration::{DurationField, DurationFieldRef, PreciseDurationField},
    error::ErrorKind,
    fields::{DateTimeFieldType, DurationFieldType},
    options::FieldRoundingMode,
    partial::{Partial, ReadablePartial},
    symbols::{LocaleSymbols, NumericSymbols, SymbolField, TextStyle},
    ChronoResult, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE,
};

const Y2000: i64 = 946_684_800_000;

fn unit(kind: DurationFieldType, millis: i64) -> DurationFieldRef {
    Arc::new(PreciseDurationField::try_new(kind, millis).unwrap())
}

fn hour_of_day() -> DateTimeFieldRef {
    Arc::new(
        PreciseDateTimeField::try_new(
            DateTimeFieldType::HourOfDay,
            unit(DurationFieldType::Hours, MILLIS_PER_HOUR),
            unit(DurationFieldType::Days, MILLIS_PER_DAY),
        )
        .unwrap(),
    )
}

fn gregorian() -> ChronologyRef {
    GregorianChronology::instance_utc().unwrap()
}

#[derive(Debug)]
struct Meridiem;

impl LocaleSymbols for Meridiem {
    fn text(&self, field: SymbolField, style: TextStyle, value: i32) -> Option<&str> {
        match (field, style, value) {
            (SymbolField::HalfdayOfDay, TextStyle::Full, 0) => Some("ante meridiem"),
            (SymbolField::HalfdayOfDay, TextStyle::Full, 1) => Some("post meridiem"),
            (SymbolField::HalfdayOfDay, TextStyle::Short, 0) => Some("AM"),
            (SymbolField::HalfdayOfDay, TextStyle::Short, 1) => Some("PM"),
            _ => None,
        }
    }
}

#[test]
fn precise_field_values() {
    let hours = hour_of_day();
    assert_eq!(hours.name(), "hourOfDay");
    assert_eq!(hours.get(0).unwrap(), 0);
    assert_eq!(hours.get(5 * MILLIS_PER_HOUR + 1).unwrap(), 5);
    assert_eq!(hours.get(-1).unwrap(), 23);
    assert_eq!(hours.get(-MILLIS_PER_DAY).unwrap(), 0);
    assert_eq!((hours.minimum_value().unwrap(), hours.maximum_value().unwrap()), (0, 23));

    let instant = 10 * MILLIS_PER_HOUR + 17;
    assert_eq!(hours.set(instant, 3).unwrap(), 3 * MILLIS_PER_HOUR + 17);
    let err = hours.set(instant, 24).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalFieldValue);
    assert_eq!(err.field(), Some(DateTimeFieldType::HourOfDay.into()));

    // Wrapping stays inside the day, adding carries out of it.
    let late = 23 * MILLIS_PER_HOUR;
    assert_eq!(hours.add_wrap_field(late, 2).unwrap(), MILLIS_PER_HOUR);
    assert_eq!(hours.add(late, 2).unwrap(), MILLIS_PER_DAY + MILLIS_PER_HOUR);
    assert_eq!(hours.difference(late, 0).unwrap(), 23);
}

#[test]
fn precise_field_rounding() {
    let hours = hour_of_day();
    let half_past = 3 * MILLIS_PER_HOUR + 30 * MILLIS_PER_MINUTE;
    assert_eq!(hours.round_floor(half_past).unwrap(), 3 * MILLIS_PER_HOUR);
    assert_eq!(hours.round_ceiling(half_past).unwrap(), 4 * MILLIS_PER_HOUR);
    assert_eq!(hours.round_half_floor(half_past).unwrap(), 3 * MILLIS_PER_HOUR);
    assert_eq!(hours.round_half_ceiling(half_past).unwrap(), 4 * MILLIS_PER_HOUR);
    assert_eq!(hours.round_half_even(half_past).unwrap(), 4 * MILLIS_PER_HOUR);
    assert_eq!(hours.remainder(half_past).unwrap(), 30 * MILLIS_PER_MINUTE);
    assert_eq!(hours.round_floor(-1).unwrap(), -MILLIS_PER_HOUR);
    assert_eq!(hours.round_ceiling(-1).unwrap(), 0);
    assert_eq!(hours.round_ceiling(MILLIS_PER_HOUR).unwrap(), MILLIS_PER_HOUR);
    assert_eq!(hours.remainder(-1).unwrap(), MILLIS_PER_HOUR - 1);
}

#[test]
fn rounding_modes_on_calendar_fields() {
    let chronology = gregorian();
    let day = chronology.day_of_month();
    let noon = Y2000 + 12 * MILLIS_PER_HOUR;
    let next = Y2000 + MILLIS_PER_DAY;
    assert_eq!(day.round(noon, FieldRoundingMode::Floor).unwrap(), Y2000);
    assert_eq!(day.round(noon, FieldRoundingMode::Ceiling).unwrap(), next);
    assert_eq!(day.round(noon, FieldRoundingMode::HalfFloor).unwrap(), Y2000);
    assert_eq!(day.round(noon, FieldRoundingMode::HalfCeiling).unwrap(), next);
    // Day 2 is even.
    assert_eq!(day.round(noon, FieldRoundingMode::HalfEven).unwrap(), next);
    // Day 3 is not.
    assert_eq!(
        day.round(next + 12 * MILLIS_PER_HOUR, FieldRoundingMode::HalfEven).unwrap(),
        next
    );
    assert_eq!(
        day.round(next + 12 * MILLIS_PER_HOUR + 1, FieldRoundingMode::HalfFloor).unwrap(),
        next + MILLIS_PER_DAY
    );

    let month = chronology.month_of_year();
    let mid_february = chronology.date_time_millis(2000, 2, 20, 0).unwrap();
    assert_eq!(
        month.round(mid_february, FieldRoundingMode::HalfFloor).unwrap(),
        chronology.date_time_millis(2000, 3, 1, 0).unwrap()
    );
    assert_eq!(
        month.remainder(mid_february).unwrap(),
        19 * MILLIS_PER_DAY
    );
}

#[test]
fn constructors_check_their_units() {
    let months = gregorian().months();
    let imprecise = PreciseDateTimeField::try_new(
        DateTimeFieldType::DayOfMonth,
        unit(DurationFieldType::Days, MILLIS_PER_DAY),
        months,
    );
    assert_eq!(imprecise.unwrap_err().kind(), ErrorKind::InvalidArgument);

    let too_narrow = PreciseDateTimeField::try_new(
        DateTimeFieldType::HourOfDay,
        unit(DurationFieldType::Hours, MILLIS_PER_HOUR),
        unit(DurationFieldType::Hours, MILLIS_PER_HOUR),
    );
    assert!(too_narrow.is_err());

    assert!(OffsetDateTimeField::try_new(hour_of_day(), 0).is_err());
    assert!(
        DividedDateTimeField::try_new(hour_of_day(), None, DateTimeFieldType::HalfdayOfDay, 1)
            .is_err()
    );
    assert!(ZeroIsMaxDateTimeField::try_new(
        gregorian().day_of_month(),
        DateTimeFieldType::ClockhourOfDay
    )
    .is_err());
}

#[test]
fn offset_shifts_values_and_bounds() {
    let shifted = OffsetDateTimeField::try_new(hour_of_day(), 1).unwrap();
    assert_eq!(shifted.offset(), 1);
    assert_eq!(shifted.get(0).unwrap(), 1);
    assert_eq!((shifted.minimum_value().unwrap(), shifted.maximum_value().unwrap()), (1, 24));
    assert_eq!(shifted.set(0, 24).unwrap(), 23 * MILLIS_PER_HOUR);
    assert!(shifted.set(0, 0).is_err());
    assert_eq!(shifted.add_wrap_field(23 * MILLIS_PER_HOUR, 1).unwrap(), 0);

    let bounded = OffsetDateTimeField::with_bounds(
        hour_of_day(),
        DateTimeFieldType::ClockhourOfHalfday,
        1,
        1,
        12,
    )
    .unwrap();
    assert_eq!(bounded.field_type(), DateTimeFieldType::ClockhourOfHalfday);
    assert_eq!(bounded.maximum_value().unwrap(), 12);
    assert_eq!(bounded.set(0, 12).unwrap(), 11 * MILLIS_PER_HOUR);
    assert_eq!(
        bounded.add(11 * MILLIS_PER_HOUR, 1).unwrap_err().kind(),
        ErrorKind::IllegalFieldValue
    );
}

#[test]
fn divided_and_remainder_split_a_field() {
    let chronology = gregorian();
    let year = chronology.year();
    let centuries = DividedDateTimeField::try_new(
        year.clone(),
        None,
        DateTimeFieldType::CenturyOfEra,
        100,
    )
    .unwrap();
    let years_of_century =
        RemainderDateTimeField::from_divided(&centuries, DateTimeFieldType::YearOfCentury);

    let instant = chronology.date_time_millis(1987, 7, 15, 0).unwrap();
    assert_eq!(centuries.get(instant).unwrap(), 19);
    assert_eq!(years_of_century.get(instant).unwrap(), 87);
    assert_eq!(year.get(centuries.set(instant, 20).unwrap()).unwrap(), 2087);
    assert_eq!(year.get(years_of_century.set(instant, 5).unwrap()).unwrap(), 1905);
    assert_eq!(year.get(years_of_century.add_wrap_field(instant, 20).unwrap()).unwrap(), 1907);
    assert!(years_of_century.set(instant, 100).is_err());

    // Negative years divide toward negative infinity.
    let ancient = chronology.date_time_millis(-1, 1, 1, 0).unwrap();
    assert_eq!(centuries.get(ancient).unwrap(), -1);
    assert_eq!(years_of_century.get(ancient).unwrap(), 99);

    let unit = centuries.duration_field();
    assert_eq!(unit.field_type(), DurationFieldType::Centuries);
    assert_eq!(centuries.add(instant, 2).unwrap(), year.add(instant, 200).unwrap());
    let later = year.add(instant, 250).unwrap();
    assert_eq!(centuries.difference(later, instant).unwrap(), 2);
    assert_eq!(
        years_of_century.range_duration_field().unwrap().field_type(),
        DurationFieldType::Centuries
    );
    assert_eq!(
        centuries.round_floor(instant).unwrap(),
        chronology.date_time_millis(1900, 1, 1, 0).unwrap()
    );
    assert_eq!(
        centuries.remainder(instant).unwrap(),
        instant - chronology.date_time_millis(1900, 1, 1, 0).unwrap()
    );
}

#[test]
fn century_remainder_counts_from_the_century_start() {
    let chronology = gregorian();
    let century = chronology.century_of_era();
    let instant = chronology.date_time_millis(2001, 6, 1, 0).unwrap();
    let floor = century.round_floor(instant).unwrap();
    assert_eq!(floor, chronology.date_time_millis(2001, 1, 1, 0).unwrap());
    assert_eq!(century.remainder(instant).unwrap(), 151 * MILLIS_PER_DAY);
    assert_eq!(century.remainder(floor).unwrap(), 0);

    let later = chronology.years().add(instant, 250).unwrap();
    assert_eq!(century.difference(later, instant).unwrap(), 2);
    assert_eq!(century.difference(instant, later).unwrap(), -2);
    assert_eq!(
        century.difference(later, instant).unwrap(),
        century.duration_field().difference(later, instant).unwrap()
    );
}

#[test]
fn zero_is_max_presents_midnight_as_24() {
    let clockhours =
        ZeroIsMaxDateTimeField::try_new(hour_of_day(), DateTimeFieldType::ClockhourOfDay).unwrap();
    assert_eq!(clockhours.get(0).unwrap(), 24);
    assert_eq!(clockhours.get(MILLIS_PER_HOUR).unwrap(), 1);
    assert_eq!((clockhours.minimum_value().unwrap(), clockhours.maximum_value().unwrap()), (1, 24));
    assert_eq!(clockhours.set(5 * MILLIS_PER_HOUR, 24).unwrap(), 0);
    assert_eq!(clockhours.set(0, 7).unwrap(), 7 * MILLIS_PER_HOUR);
    assert!(clockhours.set(0, 0).is_err());
    assert_eq!(clockhours.add_wrap_field(23 * MILLIS_PER_HOUR, 1).unwrap(), 0);
}

#[test]
fn skip_removes_a_value() {
    let chronology = gregorian();
    let year = chronology.year();
    let skipped = SkipDateTimeField::try_new(year.clone(), 0).unwrap();

    let year_zero = chronology.date_time_millis(0, 6, 1, 0).unwrap();
    assert_eq!(skipped.get(year_zero).unwrap(), -1);
    assert_eq!(skipped.get(year.add(year_zero, 1).unwrap()).unwrap(), 1);
    assert_eq!(skipped.minimum_value().unwrap(), year.minimum_value().unwrap() - 1);

    let err = skipped.set(year_zero, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalFieldValue);
    assert_eq!(year.get(skipped.set(year_zero, -3).unwrap()).unwrap(), -2);
    assert_eq!(year.get(skipped.set(year_zero, 3).unwrap()).unwrap(), 3);
}

#[test]
fn text_falls_back_to_numbers() {
    let hours = hour_of_day();
    assert_eq!(hours.as_text(7 * MILLIS_PER_HOUR, &NumericSymbols).unwrap(), "7");
    assert_eq!(hours.convert_text(" 12 ", &NumericSymbols).unwrap(), 12);
    assert_eq!(
        hours.convert_text("noon", &NumericSymbols).unwrap_err().kind(),
        ErrorKind::IllegalFieldValue
    );
    assert_eq!(hours.maximum_text_length(&NumericSymbols).unwrap(), 2);
    assert_eq!(
        hours.set_text(0, "9", &NumericSymbols).unwrap(),
        9 * MILLIS_PER_HOUR
    );

    let halfday = gregorian().halfday_of_day();
    let evening = 20 * MILLIS_PER_HOUR;
    assert_eq!(halfday.as_text(evening, &Meridiem).unwrap(), "post meridiem");
    assert_eq!(halfday.as_short_text(evening, &Meridiem).unwrap(), "PM");
    assert_eq!(halfday.as_text(evening, &NumericSymbols).unwrap(), "1");
    assert_eq!(halfday.convert_text("am", &Meridiem).unwrap(), 0);
    assert_eq!(halfday.set_text(evening, "AM", &Meridiem).unwrap(), 8 * MILLIS_PER_HOUR);
    assert_eq!(halfday.maximum_text_length(&Meridiem).unwrap(), 13);
}

#[test]
fn partial_time_arithmetic() {
    use DateTimeFieldType as F;
    let chronology = gregorian();
    let time =
        Partial::try_new(chronology.clone(), vec![F::HourOfDay, F::MinuteOfHour], vec![23, 30])
            .unwrap();

    assert_eq!(time.with_field_wrapped(F::HourOfDay, 2).unwrap().values(), vec![1, 30]);
    assert_eq!(time.with_field_wrapped(F::MinuteOfHour, 45).unwrap().values(), vec![23, 15]);
    assert_eq!(time.with_field_added(F::MinuteOfHour, 20).unwrap().values(), vec![23, 50]);
    assert_eq!(
        time.with_field_add_wrapped(F::MinuteOfHour, 45).unwrap().values(),
        vec![0, 15]
    );
    assert_eq!(
        time.with_field_add_wrapped(F::MinuteOfHour, -31).unwrap().values(),
        vec![22, 59]
    );
    // The hour has nowhere to carry to.
    assert!(time.with_field_added(F::MinuteOfHour, 45).is_err());
    assert!(time.with_field_added(F::HourOfDay, 1).is_err());

    let mut values = time.values();
    let minutes = time.field(1);
    minutes.set_partial(&time, 1, &mut values, 5).unwrap();
    assert_eq!(values, vec![23, 5]);
    assert!(minutes.set_partial(&time, 1, &mut values, 60).is_err());
    assert!(minutes.add_partial(&time, 2, &mut values, 1).is_err());
    assert_eq!(
        minutes.partial_as_text(&time, &NumericSymbols).unwrap(),
        "30"
    );
}

#[test]
fn partial_set_clamps_smaller_fields() {
    use DateTimeFieldType as F;
    let chronology = gregorian();
    let date = Partial::try_new(
        chronology,
        vec![F::Year, F::MonthOfYear, F::DayOfMonth],
        vec![2000, 3, 31],
    )
    .unwrap();
    assert_eq!(date.with_field(F::MonthOfYear, 2).unwrap().values(), vec![2000, 2, 29]);
    assert_eq!(date.with_field(F::MonthOfYear, 4).unwrap().values(), vec![2000, 4, 30]);
    let leap_day = date.with_field(F::MonthOfYear, 2).unwrap();
    assert_eq!(leap_day.with_field(F::Year, 2001).unwrap().values(), vec![2001, 2, 28]);
}

#[test]
fn unsupported_sentinels_are_shared() {
    let cache = UnsupportedFieldCache::new();
    let eras = cache.duration(DurationFieldType::Eras);
    assert!(Arc::ptr_eq(&eras, &cache.duration(DurationFieldType::Eras)));
    assert!(!eras.is_supported());

    let era = cache.date_time(DateTimeFieldType::Era, eras.clone());
    assert!(Arc::ptr_eq(&era, &cache.date_time(DateTimeFieldType::Era, eras.clone())));
    assert!(!era.is_supported());
    assert_eq!(era.name(), "era");
    assert_eq!(era.get(0).unwrap_err().kind(), ErrorKind::Unsupported);
    assert_eq!(era.round_floor(0).unwrap_err().kind(), ErrorKind::Unsupported);
    assert!(era.range_duration_field().is_none());

    // A sentinel over a supported unit still adds in that unit.
    let days = unit(DurationFieldType::Days, MILLIS_PER_DAY);
    let day = cache.date_time(DateTimeFieldType::DayOfYear, days.clone());
    assert!(!Arc::ptr_eq(&day, &era));
    assert_eq!(day.add(0, 2).unwrap(), 2 * MILLIS_PER_DAY);
    assert_eq!(day.difference(3 * MILLIS_PER_DAY, 0).unwrap(), 3);
    assert!(day.set(0, 1).is_err());

    // Asking with another unit replaces the cached entry.
    let other = cache.date_time(DateTimeFieldType::DayOfYear, unit(DurationFieldType::Days, MILLIS_PER_DAY));
    assert!(!Arc::ptr_eq(&day, &other));
    assert!(Arc::ptr_eq(
        &other,
        &cache.date_time(DateTimeFieldType::DayOfYear, other.duration_field())
    ));
}

/// Units alternating between 10 and 50 days, the first starting at the
/// epoch. The average length is 30 days.
#[derive(Debug)]
struct Lopsided;

impl Lopsided {
    fn start(index: i64) -> i64 {
        (index.div_euclid(2) * 60 + index.rem_euclid(2) * 10) * MILLIS_PER_DAY
    }

    fn index(instant: i64) -> i64 {
        let index = instant.div_euclid(60 * MILLIS_PER_DAY) * 2;
        if Self::start(index + 1) <= instant {
            index + 1
        } else {
            index
        }
    }
}

impl ImpreciseUnit for Lopsided {
    fn unit_type(&self) -> DurationFieldType {
        DurationFieldType::Months
    }

    fn average_unit_millis(&self) -> i64 {
        30 * MILLIS_PER_DAY
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        let index = Self::index(instant);
        let offset = instant - Self::start(index);
        Ok(Self::start(index + value) + offset)
    }
}

#[test]
fn estimated_difference_brackets_the_minuend() {
    let day = MILLIS_PER_DAY;
    let unit = Lopsided;

    // Starting on a long unit the average overshoots and the guess walks down.
    assert_eq!(estimate_difference(&unit, 60 * day - 1, 10 * day).unwrap(), 0);
    assert_eq!(estimate_difference(&unit, 60 * day, 10 * day).unwrap(), 1);
    // Starting on a short unit the guess walks up.
    assert_eq!(estimate_difference(&unit, 59 * day, 0).unwrap(), 1);
    assert_eq!(estimate_difference(&unit, 69 * day, 0).unwrap(), 2);
    assert_eq!(estimate_difference(&unit, 0, 69 * day).unwrap(), -2);

    let subtrahends = [-130 * day, -7 * day, 0, 10 * day + 5, 75 * day];
    let spans = [0, day, 9 * day, 11 * day, 55 * day, 61 * day, 400 * day, -3 * day, -200 * day];
    for subtrahend in subtrahends {
        for span in spans {
            let minuend = subtrahend + span;
            let difference = estimate_difference(&unit, minuend, subtrahend).unwrap();
            if minuend >= subtrahend {
                assert!(unit.add(subtrahend, difference).unwrap() <= minuend);
                assert!(unit.add(subtrahend, difference + 1).unwrap() > minuend);
            } else {
                assert!(difference <= 0);
                assert_eq!(
                    difference,
                    -estimate_difference(&unit, subtrahend, minuend).unwrap()
                );
            }
        }
    }

    // A linked duration over the unit uses the same default.
    let months = LinkedDurationField::new(Arc::new(Lopsided));
    assert!(!months.is_precise());
    assert_eq!(months.difference(60 * day, 10 * day).unwrap(), 1);
    assert_eq!(months.difference(10 * day, 60 * day - 1).unwrap(), 0);
    assert_eq!(months.add(0, 3).unwrap(), 70 * day);
}
