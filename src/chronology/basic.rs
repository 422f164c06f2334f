//! The closed form calendar math shared by the Gregorian and Julian
//! chronologies.
//!
//! All positions are UTC milliseconds. Year boundaries come from a leap
//! year count, month boundaries from cumulative day tables, and the year of
//! an instant from an estimate over the average year length corrected by at
//! most one step.

use crate::{
    fields::DateTimeFieldType,
    options::MinDaysInFirstWeek,
    utils::{safe_add, verify_value_bounds},
    ChronoError, ChronoResult, MILLIS_PER_DAY, MILLIS_PER_WEEK,
};

use super::cache::YearInfoCache;

pub(crate) mod fields;

#[cfg(test)]
mod tests;

const MIN_DAYS_PER_MONTH: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const MAX_DAYS_PER_MONTH: [i32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const fn month_starts(days: [i32; 12]) -> [i64; 12] {
    let mut starts = [0; 12];
    let mut i = 1;
    while i < 12 {
        starts[i] = starts[i - 1] + days[i - 1] as i64 * MILLIS_PER_DAY;
        i += 1;
    }
    starts
}

const MIN_TOTAL_MILLIS_BY_MONTH: [i64; 12] = month_starts(MIN_DAYS_PER_MONTH);
const MAX_TOTAL_MILLIS_BY_MONTH: [i64; 12] = month_starts(MAX_DAYS_PER_MONTH);

/// Millis from the start of a leap year to its 29th of February.
const FEB_29: i64 = (31 + 29 - 1) * MILLIS_PER_DAY;

/// Millis in a day, scaled down by 1024 for the month lookup.
const DAY_SCALED: i32 = (MILLIS_PER_DAY >> 10) as i32;

/// Days from 0000-01-01 to 1970-01-01 in the proleptic Gregorian calendar.
const DAYS_0000_TO_1970: i64 = 719_527;

const GREGORIAN_MILLIS_PER_YEAR: i64 = 31_556_952_000;
const JULIAN_MILLIS_PER_YEAR: i64 = 31_557_600_000;

/// The leap year rule and year range of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarRules {
    /// Leap years every four years except centuries not divisible by 400.
    Gregorian,
    /// Leap years every four years; there is no year zero.
    Julian,
}

impl CalendarRules {
    #[must_use]
    pub const fn min_year(self) -> i32 {
        match self {
            Self::Gregorian => -292_275_054,
            Self::Julian => -292_269_054,
        }
    }

    #[must_use]
    pub const fn max_year(self) -> i32 {
        match self {
            Self::Gregorian => 292_278_993,
            Self::Julian => 292_272_992,
        }
    }

    #[must_use]
    pub const fn is_leap_year(self, year: i32) -> bool {
        match self {
            Self::Gregorian => (year & 3) == 0 && (year % 100 != 0 || year % 400 == 0),
            Self::Julian => (year & 3) == 0,
        }
    }

    #[must_use]
    pub const fn average_millis_per_year(self) -> i64 {
        match self {
            Self::Gregorian => GREGORIAN_MILLIS_PER_YEAR,
            Self::Julian => JULIAN_MILLIS_PER_YEAR,
        }
    }

    #[must_use]
    pub const fn average_millis_per_month(self) -> i64 {
        self.average_millis_per_year() / 12
    }

    const fn approx_millis_at_epoch_half(self) -> i64 {
        match self {
            Self::Gregorian => 1970 * GREGORIAN_MILLIS_PER_YEAR / 2,
            Self::Julian => (1969 * JULIAN_MILLIS_PER_YEAR + 352 * MILLIS_PER_DAY) / 2,
        }
    }

    /// Computes the first millisecond of `year` from a count of leap years.
    ///
    /// Years far outside the supported range wrap rather than fail; callers
    /// bound the year before the result is used.
    #[must_use]
    pub fn first_day_of_year_millis(self, year: i32) -> i64 {
        match self {
            Self::Gregorian => {
                let centuries = year / 100;
                let leap_years = if year < 0 {
                    // Shift by three so that the arithmetic shift floors.
                    ((year + 3) >> 2) - centuries + ((centuries + 3) >> 2) - 1
                } else {
                    let leaps = (year >> 2) - centuries + (centuries >> 2);
                    if self.is_leap_year(year) {
                        leaps - 1
                    } else {
                        leaps
                    }
                };
                (i64::from(year) * 365 + i64::from(leap_years) - DAYS_0000_TO_1970)
                    .wrapping_mul(MILLIS_PER_DAY)
            }
            Self::Julian => {
                let relative = year - 1968;
                let leap_years = if relative <= 0 {
                    (relative + 3) >> 2
                } else if self.is_leap_year(year) {
                    relative >> 2
                } else {
                    (relative >> 2) + 1
                };
                (i64::from(relative) * 365 + i64::from(leap_years))
                    .wrapping_mul(MILLIS_PER_DAY)
                    .wrapping_sub((366 + 352) * MILLIS_PER_DAY)
            }
        }
    }
}

/// Year, month and week math for one calendar and week rule.
#[derive(Debug)]
pub struct BasicCalendar {
    rules: CalendarRules,
    min_days_in_first_week: i32,
    years: YearInfoCache,
}

impl BasicCalendar {
    #[must_use]
    pub fn new(rules: CalendarRules, min_days_in_first_week: MinDaysInFirstWeek) -> Self {
        Self {
            rules,
            min_days_in_first_week: min_days_in_first_week.get(),
            years: YearInfoCache::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn rules(&self) -> CalendarRules {
        self.rules
    }

    #[inline]
    #[must_use]
    pub fn min_days_in_first_week(&self) -> i32 {
        self.min_days_in_first_week
    }

    #[inline]
    #[must_use]
    pub fn min_year(&self) -> i32 {
        self.rules.min_year()
    }

    #[inline]
    #[must_use]
    pub fn max_year(&self) -> i32 {
        self.rules.max_year()
    }

    #[inline]
    #[must_use]
    pub fn is_leap_year(&self, year: i32) -> bool {
        self.rules.is_leap_year(year)
    }

    // ==== Year ====

    /// Returns the first millisecond of `year`.
    #[must_use]
    pub fn year_millis(&self, year: i32) -> i64 {
        let rules = self.rules;
        self.years
            .first_day_millis(year, |year| rules.first_day_of_year_millis(year))
    }

    /// Returns the first millisecond of a month.
    #[must_use]
    pub fn year_month_millis(&self, year: i32, month: i32) -> i64 {
        self.year_millis(year)
            .wrapping_add(self.total_millis_by_year_month(year, month))
    }

    /// Returns the first millisecond of a date.
    #[must_use]
    pub fn year_month_day_millis(&self, year: i32, month: i32, day: i32) -> i64 {
        self.year_month_millis(year, month)
            .wrapping_add(i64::from(day - 1) * MILLIS_PER_DAY)
    }

    /// Returns the year containing `instant`.
    #[must_use]
    pub fn year(&self, instant: i64) -> i32 {
        // Halved throughout to keep the estimate from overflowing.
        let unit = self.rules.average_millis_per_year() / 2;
        let mut halved = (instant >> 1).wrapping_add(self.rules.approx_millis_at_epoch_half());
        if halved < 0 {
            halved = halved.wrapping_sub(unit).wrapping_add(1);
        }
        let mut year = (halved / unit) as i32;

        let mut year_start = self.year_millis(year);
        let diff = instant.wrapping_sub(year_start);
        if diff < 0 {
            year -= 1;
        } else if diff >= MILLIS_PER_DAY * 365 {
            let days = if self.is_leap_year(year) { 366 } else { 365 };
            year_start = year_start.wrapping_add(days * MILLIS_PER_DAY);
            if year_start <= instant {
                year += 1;
            }
        }
        year
    }

    /// Moves `instant` to `year`, keeping the day of year and time of day.
    /// The 29th of February moves to the 28th in a common year, and days
    /// after it keep their month and day.
    pub fn set_year(&self, instant: i64, year: i32) -> ChronoResult<i64> {
        let this_year = self.year(instant);
        let mut day_of_year = self.day_of_year_in(instant, this_year);
        let millis_of_day = self.millis_of_day(instant);

        if day_of_year > 31 + 28 {
            match (self.is_leap_year(this_year), self.is_leap_year(year)) {
                (true, false) => day_of_year -= 1,
                (false, true) => day_of_year += 1,
                _ => {}
            }
        }

        let date = self.year_month_day_millis(year, 1, day_of_year);
        safe_add(date, i64::from(millis_of_day))
    }

    /// Returns the whole years from `subtrahend` to `minuend`, comparing
    /// positions within the year as if both were in leap years or both in
    /// common years.
    #[must_use]
    pub fn year_difference(&self, minuend: i64, subtrahend: i64) -> i64 {
        let minuend_year = self.year(minuend);
        let subtrahend_year = self.year(subtrahend);

        let mut minuend_rem = minuend - self.year_millis(minuend_year);
        let mut subtrahend_rem = subtrahend - self.year_millis(subtrahend_year);

        if subtrahend_rem >= FEB_29 {
            if self.is_leap_year(subtrahend_year) {
                if !self.is_leap_year(minuend_year) {
                    subtrahend_rem -= MILLIS_PER_DAY;
                }
            } else if minuend_rem >= FEB_29 && self.is_leap_year(minuend_year) {
                minuend_rem -= MILLIS_PER_DAY;
            }
        }

        let mut difference = i64::from(minuend_year) - i64::from(subtrahend_year);
        if minuend_rem < subtrahend_rem {
            difference -= 1;
        }
        difference
    }

    #[must_use]
    pub fn days_in_year(&self, year: i32) -> i32 {
        if self.is_leap_year(year) {
            366
        } else {
            365
        }
    }

    // ==== Month ====

    /// Returns the month containing `instant`.
    #[must_use]
    pub fn month_of_year(&self, instant: i64) -> i32 {
        self.month_of_year_in(instant, self.year(instant))
    }

    /// Returns the month containing `instant`, which must lie in `year`.
    #[must_use]
    pub fn month_of_year_in(&self, instant: i64, year: i32) -> i32 {
        let scaled = ((instant - self.year_millis(year)) >> 10) as i32;
        let day = |days: i32| days * DAY_SCALED;
        if self.is_leap_year(year) {
            if scaled < day(182) {
                if scaled < day(91) {
                    if scaled < day(31) {
                        1
                    } else if scaled < day(60) {
                        2
                    } else {
                        3
                    }
                } else if scaled < day(121) {
                    4
                } else if scaled < day(152) {
                    5
                } else {
                    6
                }
            } else if scaled < day(274) {
                if scaled < day(213) {
                    7
                } else if scaled < day(244) {
                    8
                } else {
                    9
                }
            } else if scaled < day(305) {
                10
            } else if scaled < day(335) {
                11
            } else {
                12
            }
        } else if scaled < day(181) {
            if scaled < day(90) {
                if scaled < day(31) {
                    1
                } else if scaled < day(59) {
                    2
                } else {
                    3
                }
            } else if scaled < day(120) {
                4
            } else if scaled < day(151) {
                5
            } else {
                6
            }
        } else if scaled < day(273) {
            if scaled < day(212) {
                7
            } else if scaled < day(243) {
                8
            } else {
                9
            }
        } else if scaled < day(304) {
            10
        } else if scaled < day(334) {
            11
        } else {
            12
        }
    }

    /// Returns the millis from the start of `year` to the start of `month`.
    #[must_use]
    pub fn total_millis_by_year_month(&self, year: i32, month: i32) -> i64 {
        let index = (month - 1).clamp(0, 11) as usize;
        if self.is_leap_year(year) {
            MAX_TOTAL_MILLIS_BY_MONTH[index]
        } else {
            MIN_TOTAL_MILLIS_BY_MONTH[index]
        }
    }

    #[must_use]
    pub fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        let index = (month - 1).clamp(0, 11) as usize;
        if self.is_leap_year(year) {
            MAX_DAYS_PER_MONTH[index]
        } else {
            MIN_DAYS_PER_MONTH[index]
        }
    }

    /// Returns the most days `month` can have in any year.
    #[must_use]
    pub fn days_in_month_max(&self, month: i32) -> i32 {
        MAX_DAYS_PER_MONTH[(month - 1).clamp(0, 11) as usize]
    }

    /// Returns the days in the month containing `instant`.
    #[must_use]
    pub fn days_in_month_max_at(&self, instant: i64) -> i32 {
        let year = self.year(instant);
        let month = self.month_of_year_in(instant, year);
        self.days_in_year_month(year, month)
    }

    /// Returns the upper bound used when setting the day of month to
    /// `value`. Days up to 28 exist in every month and skip the lookup.
    #[must_use]
    pub fn days_in_month_max_for_set(&self, instant: i64, value: i32) -> i32 {
        if value > 28 || value < 1 {
            self.days_in_month_max_at(instant)
        } else {
            28
        }
    }

    // ==== Day ====

    #[must_use]
    pub fn day_of_month(&self, instant: i64) -> i32 {
        let year = self.year(instant);
        let month = self.month_of_year_in(instant, year);
        self.day_of_month_in(instant, year, month)
    }

    #[must_use]
    pub fn day_of_month_in(&self, instant: i64, year: i32, month: i32) -> i32 {
        let month_start = self.year_month_millis(year, month);
        ((instant - month_start) / MILLIS_PER_DAY) as i32 + 1
    }

    #[must_use]
    pub fn day_of_year(&self, instant: i64) -> i32 {
        self.day_of_year_in(instant, self.year(instant))
    }

    #[must_use]
    pub fn day_of_year_in(&self, instant: i64, year: i32) -> i32 {
        ((instant - self.year_millis(year)) / MILLIS_PER_DAY) as i32 + 1
    }

    /// Returns the ISO day of week, Monday 1 through Sunday 7. The epoch
    /// fell on a Thursday.
    #[must_use]
    pub fn day_of_week(&self, instant: i64) -> i32 {
        // 1970-01-01 was a Thursday.
        let days = instant.div_euclid(MILLIS_PER_DAY);
        1 + (days + 3).rem_euclid(7) as i32
    }

    #[must_use]
    pub fn millis_of_day(&self, instant: i64) -> i32 {
        if instant >= 0 {
            (instant % MILLIS_PER_DAY) as i32
        } else {
            (MILLIS_PER_DAY - 1) as i32 + ((instant + 1) % MILLIS_PER_DAY) as i32
        }
    }

    /// Returns whether `instant` falls on the 29th of February.
    #[must_use]
    pub fn is_leap_day(&self, instant: i64) -> bool {
        let year = self.year(instant);
        let month = self.month_of_year_in(instant, year);
        month == 2 && self.is_leap_year(year) && self.day_of_month_in(instant, year, month) == 29
    }

    // ==== Week ====

    /// Returns the first millisecond of week one of `year`.
    #[must_use]
    pub fn first_week_of_year_millis(&self, year: i32) -> i64 {
        let jan_1 = self.year_millis(year);
        let day_of_week = self.day_of_week(jan_1);
        // Saturates at the ends of the timeline, where week one is cut off.
        if day_of_week > 8 - self.min_days_in_first_week {
            // Week one starts on the following Monday.
            jan_1.saturating_add(i64::from(8 - day_of_week) * MILLIS_PER_DAY)
        } else {
            jan_1.saturating_sub(i64::from(day_of_week - 1) * MILLIS_PER_DAY)
        }
    }

    #[must_use]
    pub fn weeks_in_year(&self, year: i32) -> i32 {
        let first = self.first_week_of_year_millis(year);
        let next = self.first_week_of_year_millis(year + 1);
        (next.saturating_sub(first) / MILLIS_PER_WEEK) as i32
    }

    #[must_use]
    pub fn week_of_weekyear(&self, instant: i64) -> i32 {
        self.week_of_weekyear_in(instant, self.year(instant))
    }

    /// Returns the week of `instant`, which lies in calendar year `year`.
    #[must_use]
    pub fn week_of_weekyear_in(&self, instant: i64, year: i32) -> i32 {
        let first = self.first_week_of_year_millis(year);
        if instant < first {
            return self.weeks_in_year(year - 1);
        }
        let next = self.first_week_of_year_millis(year + 1);
        if instant >= next {
            return 1;
        }
        ((instant - first) / MILLIS_PER_WEEK) as i32 + 1
    }

    #[must_use]
    pub fn weekyear(&self, instant: i64) -> i32 {
        let year = self.year(instant);
        let week = self.week_of_weekyear_in(instant, year);
        if week == 1 {
            self.year(instant.saturating_add(MILLIS_PER_WEEK))
        } else if week > 51 {
            self.year(instant.saturating_sub(2 * MILLIS_PER_WEEK))
        } else {
            year
        }
    }

    // ==== Composites ====

    /// Maps a year as written to the year used by the math. The Julian
    /// calendar has no year zero, so 1 BC is stored as year 0.
    fn adjust_year_for_set(&self, year: i32) -> ChronoResult<i32> {
        match self.rules {
            CalendarRules::Julian if year == 0 => Err(ChronoError::illegal_field_value(
                DateTimeFieldType::Year,
                0,
                None,
                None,
            )),
            CalendarRules::Julian if year < 0 => Ok(year + 1),
            _ => Ok(year),
        }
    }

    /// Returns midnight at the start of a date after checking each component.
    pub fn date_midnight_millis(&self, year: i32, month: i32, day: i32) -> ChronoResult<i64> {
        let year = self.adjust_year_for_set(year)?;
        verify_value_bounds(
            DateTimeFieldType::Year,
            year.into(),
            i64::from(self.min_year()) - 1,
            i64::from(self.max_year()) + 1,
        )?;
        verify_value_bounds(DateTimeFieldType::MonthOfYear, month.into(), 1, 12)?;
        let days_in_month = self.days_in_year_month(year, month);
        if !(1..=days_in_month).contains(&day) {
            return Err(ChronoError::illegal_field_value(
                DateTimeFieldType::DayOfMonth,
                day.into(),
                Some(1),
                Some(days_in_month.into()),
            )
            .with_message(format!("year: {year} month: {month}")));
        }
        Ok(self.year_month_day_millis(year, month, day))
    }

    /// Returns the instant of a date and millisecond of the day.
    pub fn date_time_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> ChronoResult<i64> {
        verify_value_bounds(
            DateTimeFieldType::MillisOfDay,
            millis_of_day.into(),
            0,
            MILLIS_PER_DAY - 1,
        )?;
        safe_add(
            self.date_midnight_millis(year, month, day)?,
            i64::from(millis_of_day),
        )
    }

    /// Returns the instant of a date and time of day.
    pub fn date_time_millis_full(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> ChronoResult<i64> {
        let millis_of_day = super::millis_of_day(hour, minute, second, millis)?;
        safe_add(
            self.date_midnight_millis(year, month, day)?,
            i64::from(millis_of_day),
        )
    }
}
