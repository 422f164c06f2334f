use crate::{
    error::ErrorKind, options::MinDaysInFirstWeek, MILLIS_PER_DAY, MILLIS_PER_HOUR,
};

use super::{BasicCalendar, CalendarRules};

const Y2000: i64 = 946_684_800_000;

fn gregorian() -> BasicCalendar {
    BasicCalendar::new(CalendarRules::Gregorian, MinDaysInFirstWeek::ISO)
}

fn julian() -> BasicCalendar {
    BasicCalendar::new(CalendarRules::Julian, MinDaysInFirstWeek::ISO)
}

#[test]
fn leap_years() {
    let rules = CalendarRules::Gregorian;
    assert!(rules.is_leap_year(2000));
    assert!(!rules.is_leap_year(1900));
    assert!(rules.is_leap_year(2004));
    assert!(!rules.is_leap_year(2001));
    assert!(rules.is_leap_year(0));
    assert!(rules.is_leap_year(-4));

    let rules = CalendarRules::Julian;
    assert!(rules.is_leap_year(1900));
    assert!(!rules.is_leap_year(2001));
}

#[test]
fn year_boundaries() {
    let calendar = gregorian();
    assert_eq!(calendar.year_millis(1970), 0);
    assert_eq!(calendar.year_millis(2000), Y2000);
    assert_eq!(calendar.year(Y2000), 2000);
    assert_eq!(calendar.year(Y2000 - 1), 1999);
    assert_eq!(calendar.year(-1), 1969);
    assert_eq!(calendar.year(calendar.year_millis(-5000)), -5000);
    assert_eq!(calendar.year(calendar.year_millis(-5000) - 1), -5001);

    // Julian 1970-01-01 is Gregorian 1970-01-14.
    let calendar = julian();
    assert_eq!(calendar.year_millis(1970), 13 * MILLIS_PER_DAY);
    assert_eq!(calendar.year(0), 1969);
    assert_eq!(calendar.year(13 * MILLIS_PER_DAY), 1970);
}

#[test]
fn months_and_days() {
    let calendar = gregorian();
    let march_1 = calendar.year_month_day_millis(2000, 3, 1);
    assert_eq!(calendar.month_of_year(march_1), 3);
    assert_eq!(calendar.month_of_year(march_1 - 1), 2);
    assert_eq!(calendar.day_of_month(march_1 - 1), 29);
    assert_eq!(calendar.day_of_year(march_1), 61);

    assert_eq!(calendar.days_in_year_month(2000, 2), 29);
    assert_eq!(calendar.days_in_year_month(1900, 2), 28);
    assert_eq!(julian().days_in_year_month(1900, 2), 29);
    assert_eq!(calendar.days_in_month_max(2), 29);
    assert_eq!(calendar.days_in_year(2001), 365);

    assert!(calendar.is_leap_day(march_1 - 1));
    assert!(!calendar.is_leap_day(march_1));
}

#[test]
fn time_of_day_before_epoch() {
    let calendar = gregorian();
    assert_eq!(calendar.millis_of_day(-1), (MILLIS_PER_DAY - 1) as i32);
    assert_eq!(calendar.millis_of_day(-MILLIS_PER_DAY), 0);
    assert_eq!(calendar.millis_of_day(MILLIS_PER_HOUR), MILLIS_PER_HOUR as i32);
}

#[test]
fn days_of_week() {
    let calendar = gregorian();
    assert_eq!(calendar.day_of_week(0), 4);
    assert_eq!(calendar.day_of_week(7 * MILLIS_PER_DAY), 4);
    assert_eq!(calendar.day_of_week(-1), 3);
    assert_eq!(calendar.day_of_week(-4 * MILLIS_PER_DAY), 7);
    assert_eq!(calendar.day_of_week(-10 * MILLIS_PER_DAY), 1);
    // 2000-01-01 was a Saturday.
    assert_eq!(calendar.day_of_week(Y2000), 6);

    // The ends of the timeline, where day counts cannot be shifted.
    assert_eq!(calendar.day_of_week(i64::MIN), 7);
    assert_eq!(calendar.day_of_week(i64::MIN + MILLIS_PER_DAY), 1);
    assert_eq!(calendar.day_of_week(i64::MAX), 7);
}

#[test]
fn week_years() {
    let calendar = gregorian();

    let jan_1_1981 = calendar.year_month_day_millis(1981, 1, 1);
    assert_eq!(calendar.week_of_weekyear(jan_1_1981), 1);
    assert_eq!(calendar.weekyear(jan_1_1981), 1981);

    let dec_31_1979 = calendar.year_month_day_millis(1979, 12, 31);
    assert_eq!(calendar.week_of_weekyear(dec_31_1979), 1);
    assert_eq!(calendar.weekyear(dec_31_1979), 1980);

    // 2000-01-01 belongs to the last week of 1999.
    assert_eq!(calendar.week_of_weekyear(Y2000), 52);
    assert_eq!(calendar.weekyear(Y2000), 1999);

    assert_eq!(calendar.weeks_in_year(2004), 53);
    assert_eq!(calendar.weeks_in_year(2015), 53);
    assert_eq!(calendar.weeks_in_year(2021), 52);
}

#[test]
fn first_week_rule() {
    // With one day required, the week holding January 1st is week one.
    let calendar = BasicCalendar::new(
        CalendarRules::Gregorian,
        MinDaysInFirstWeek::try_new(1).unwrap(),
    );
    assert_eq!(calendar.week_of_weekyear(Y2000), 1);
    assert_eq!(calendar.weekyear(Y2000), 2000);
    assert_eq!(
        calendar.first_week_of_year_millis(2000),
        calendar.year_month_day_millis(1999, 12, 27)
    );
}

#[test]
fn set_year_moves_leap_day() {
    let calendar = gregorian();
    let leap_day = calendar.year_month_day_millis(2004, 2, 29) + MILLIS_PER_HOUR;
    let moved = calendar.set_year(leap_day, 2005).unwrap();
    assert_eq!(moved, calendar.year_month_day_millis(2005, 2, 28) + MILLIS_PER_HOUR);

    let march_1 = calendar.year_month_day_millis(2004, 3, 1);
    assert_eq!(
        calendar.set_year(march_1, 2005).unwrap(),
        calendar.year_month_day_millis(2005, 3, 1)
    );
    let march_1 = calendar.year_month_day_millis(2005, 3, 1);
    assert_eq!(
        calendar.set_year(march_1, 2008).unwrap(),
        calendar.year_month_day_millis(2008, 3, 1)
    );
}

#[test]
fn year_differences() {
    let calendar = gregorian();
    let leap_day = calendar.year_month_day_millis(2004, 2, 29);
    let next_feb_28 = calendar.year_month_day_millis(2005, 2, 28);
    assert_eq!(calendar.year_difference(next_feb_28, leap_day), 1);
    assert_eq!(calendar.year_difference(next_feb_28 - 1, leap_day), 0);
    assert_eq!(calendar.year_difference(Y2000, 0), 30);
}

#[test]
fn midnight_validation() {
    let calendar = gregorian();
    assert_eq!(calendar.date_midnight_millis(2000, 1, 1).unwrap(), Y2000);
    assert_eq!(
        calendar.date_time_millis_full(1970, 1, 1, 1, 0, 0, 0).unwrap(),
        MILLIS_PER_HOUR
    );

    let err = calendar.date_midnight_millis(2001, 2, 29).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalFieldValue);
    assert!(err.to_string().contains("year: 2001 month: 2"));
    assert!(calendar.date_midnight_millis(2001, 13, 1).is_err());
    assert!(calendar.date_time_millis(2001, 1, 1, MILLIS_PER_DAY as i32).is_err());

    // Julian has no year zero; year -1 is stored as 0.
    let calendar = julian();
    assert_eq!(
        calendar.date_midnight_millis(0, 1, 1).unwrap_err().kind(),
        ErrorKind::IllegalFieldValue
    );
    assert_eq!(
        calendar.date_midnight_millis(-1, 1, 1).unwrap(),
        calendar.year_millis(0)
    );
}
