//! Field text through a caller supplied symbol table.

use std::sync::Arc;

use chronology_rs::{
    error::ErrorKind,
    options::BucketOptions,
    symbols::{LocaleSymbols, SymbolField, TextStyle},
    Chronology, ChronologyRef, DateTimeField, DateTimeFieldType, DateTimeParserBucket,
    GregorianChronology, JulianChronology, Partial, BCE, CE, MILLIS_PER_HOUR,
};

#[derive(Debug)]
struct English;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

impl LocaleSymbols for English {
    fn text(&self, field: SymbolField, style: TextStyle, value: i32) -> Option<&str> {
        let full = match field {
            SymbolField::Era => ["BC", "AD"].get(usize::try_from(value).ok()?).copied(),
            SymbolField::HalfdayOfDay => ["AM", "PM"].get(usize::try_from(value).ok()?).copied(),
            SymbolField::MonthOfYear => MONTHS.get(usize::try_from(value - 1).ok()?).copied(),
            SymbolField::DayOfWeek => WEEKDAYS.get(usize::try_from(value - 1).ok()?).copied(),
        }?;
        match (field, style) {
            (SymbolField::MonthOfYear | SymbolField::DayOfWeek, TextStyle::Short) => full.get(..3),
            _ => Some(full),
        }
    }
}

fn gregorian() -> ChronologyRef {
    GregorianChronology::instance_utc().unwrap()
}

#[test]
fn named_fields_render_through_the_table() {
    let chronology = gregorian();
    let instant = chronology
        .date_time_millis_full(2000, 9, 14, 15, 4, 0, 0)
        .unwrap();

    let month = chronology.month_of_year();
    assert_eq!(month.as_text(instant, &English).unwrap(), "September");
    assert_eq!(month.as_short_text(instant, &English).unwrap(), "Sep");
    assert_eq!(month.maximum_text_length(&English).unwrap(), 9);
    assert_eq!(month.maximum_short_text_length(&English).unwrap(), 3);

    let weekday = chronology.day_of_week();
    assert_eq!(weekday.as_text(instant, &English).unwrap(), "Thursday");
    assert_eq!(weekday.as_short_text(instant, &English).unwrap(), "Thu");

    assert_eq!(chronology.halfday_of_day().as_text(instant, &English).unwrap(), "PM");
    assert_eq!(chronology.era().as_text(instant, &English).unwrap(), "AD");
    assert_eq!(chronology.era().value_as_text(BCE, &English).unwrap(), "BC");

    // Unnamed fields are decimal.
    assert_eq!(chronology.year().as_text(instant, &English).unwrap(), "2000");
    assert_eq!(chronology.hour_of_day().as_text(instant, &English).unwrap(), "15");
    assert_eq!(
        chronology.clockhour_of_halfday().as_text(instant, &English).unwrap(),
        "3"
    );
}

#[test]
fn text_sets_fields() {
    let chronology = gregorian();
    let instant = chronology.date_time_millis(2000, 1, 31, 0).unwrap();

    let april = chronology
        .month_of_year()
        .set_text(instant, "april", &English)
        .unwrap();
    // April has no 31st.
    assert_eq!(april, chronology.date_time_millis(2000, 4, 30, 0).unwrap());
    let march = chronology
        .month_of_year()
        .set_text(instant, "Mar", &English)
        .unwrap();
    assert_eq!(chronology.month_of_year().get(march).unwrap(), 3);
    let numeric = chronology
        .month_of_year()
        .set_text(instant, "11", &English)
        .unwrap();
    assert_eq!(chronology.month_of_year().get(numeric).unwrap(), 11);

    let sunday = chronology
        .day_of_week()
        .set_text(instant, "sunday", &English)
        .unwrap();
    assert_eq!(chronology.day_of_month().get(sunday).unwrap(), 6);

    let bc = chronology.era().set_text(instant, "BC", &English).unwrap();
    assert_eq!(chronology.era().get(bc).unwrap(), BCE);
    assert_eq!(chronology.year_of_era().get(bc).unwrap(), 2000);
    assert_eq!(chronology.era().convert_text("ad", &English).unwrap(), CE);

    let evening = chronology
        .halfday_of_day()
        .set_text(instant + 9 * MILLIS_PER_HOUR, "PM", &English)
        .unwrap();
    assert_eq!(chronology.hour_of_day().get(evening).unwrap(), 21);

    let err = chronology
        .month_of_year()
        .set_text(instant, "Brumaire", &English)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalFieldValue);
    assert_eq!(
        err.to_string(),
        "IllegalFieldValue: Value \"Brumaire\" for monthOfYear is not supported"
    );
}

#[test]
fn partial_text() {
    let chronology = gregorian();
    let partial = Partial::try_new(
        chronology.clone(),
        vec![DateTimeFieldType::MonthOfYear, DateTimeFieldType::DayOfMonth],
        vec![2, 29],
    )
    .unwrap();
    let month = chronology.month_of_year();
    assert_eq!(month.partial_as_text(&partial, &English).unwrap(), "February");

    let mut values = vec![2, 29];
    month
        .set_text_partial(&partial, 0, &mut values, "june", &English)
        .unwrap();
    assert_eq!(values, vec![6, 29]);
    month
        .set_text_partial(&partial, 0, &mut values, "Sep", &English)
        .unwrap();
    assert_eq!(values, vec![9, 29]);
    assert!(month
        .set_text_partial(&partial, 0, &mut values, "Smarch", &English)
        .is_err());
}

#[test]
fn bucket_parses_names() {
    let chronology = gregorian();
    let mut bucket = DateTimeParserBucket::new(
        0,
        chronology.clone(),
        Arc::new(English),
        BucketOptions::default(),
    );
    bucket.save_field_text(DateTimeFieldType::DayOfWeek, "Tue");
    bucket.save_field(DateTimeFieldType::DayOfMonth, 14);
    bucket.save_field_text(DateTimeFieldType::MonthOfYear, "march");
    bucket.save_field(DateTimeFieldType::Year, 2000);
    bucket.save_field_text(DateTimeFieldType::HalfdayOfDay, "PM");
    bucket.save_field(DateTimeFieldType::HourOfHalfday, 2);

    let instant = bucket
        .compute_millis_with(true, Some("Tue, 14 March 2000 2 PM"))
        .unwrap();
    assert_eq!(
        instant,
        chronology.date_time_millis(2000, 3, 14, 14 * MILLIS_PER_HOUR as i32).unwrap()
    );
}

#[test]
fn julian_years_render_without_zero() {
    let julian = JulianChronology::instance_utc().unwrap();
    let instant = julian.date_time_millis(-44, 3, 15, 0).unwrap();
    assert_eq!(julian.year().as_text(instant, &English).unwrap(), "-44");
    assert_eq!(julian.year_of_era().as_text(instant, &English).unwrap(), "44");
    assert_eq!(julian.era().as_text(instant, &English).unwrap(), "BC");
    assert_eq!(julian.month_of_year().as_text(instant, &English).unwrap(), "March");
}
