//! The date-time fields of the Gregorian and Julian calendars.
//!
//! Year, month and weekyear have imprecise units; each keeps its exact
//! arithmetic in an [`ImpreciseUnit`] shared with the linked duration field.
//! The day and week fields are precise and lean on
//! [`PreciseDurationBase`].

use std::sync::{Arc, LazyLock};

use crate::{
    chronology::Fields,
    duration::{DurationFieldRef, MillisDurationField, PreciseDurationField, UnsupportedDurationField},
    field::{
        base, DateTimeField, DateTimeFieldRef, DividedDateTimeField, ImpreciseUnit,
        LinkedDurationField, OffsetDateTimeField, PreciseDateTimeField, PreciseDurationBase,
        RemainderDateTimeField, ZeroIsMaxDateTimeField,
    },
    fields::{DateTimeFieldType, DurationFieldType},
    partial::{is_contiguous, ReadablePartial},
    symbols::{self, LocaleSymbols, SymbolField, TextStyle},
    utils::{safe_add, safe_subtract, safe_to_int, verify_value_bounds, wrapped_value},
    ChronoError, ChronoResult, BCE, CE, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE,
    MILLIS_PER_SECOND, MILLIS_PER_WEEK,
};

use super::BasicCalendar;

/// Returns the value of `kind` in a partial, read from `values` when given.
fn partial_value(
    partial: &dyn ReadablePartial,
    values: Option<&[i32]>,
    kind: DateTimeFieldType,
) -> Option<i32> {
    let index = partial.index_of(kind)?;
    match values {
        Some(values) => values.get(index).copied(),
        None => Some(partial.value(index)),
    }
}

// ==== Time of day ====

/// The clock fields and precise units, identical in every calendar.
#[derive(Debug)]
pub(crate) struct TimeFields {
    durations: Vec<(DurationFieldType, DurationFieldRef)>,
    date_times: Vec<(DateTimeFieldType, DateTimeFieldRef)>,
}

static TIME_FIELDS: LazyLock<ChronoResult<TimeFields>> = LazyLock::new(TimeFields::build);

/// Returns the shared clock fields.
pub(crate) fn time_fields() -> ChronoResult<&'static TimeFields> {
    TIME_FIELDS.as_ref().map_err(Clone::clone)
}

impl TimeFields {
    fn build() -> ChronoResult<Self> {
        use DateTimeFieldType as F;
        use DurationFieldType as D;

        let precise = |kind, unit_millis| -> DurationFieldRef {
            Arc::new(PreciseDurationField::new_unchecked(kind, unit_millis))
        };
        let millis: DurationFieldRef = Arc::new(MillisDurationField);
        let seconds = precise(D::Seconds, MILLIS_PER_SECOND);
        let minutes = precise(D::Minutes, MILLIS_PER_MINUTE);
        let hours = precise(D::Hours, MILLIS_PER_HOUR);
        let halfdays = precise(D::Halfdays, 12 * MILLIS_PER_HOUR);
        let days = precise(D::Days, MILLIS_PER_DAY);
        let weeks = precise(D::Weeks, MILLIS_PER_WEEK);

        let field = |kind, unit: &DurationFieldRef, range: &DurationFieldRef| {
            PreciseDateTimeField::try_new(kind, unit.clone(), range.clone())
        };
        let hour_of_day: DateTimeFieldRef = Arc::new(field(F::HourOfDay, &hours, &days)?);
        let hour_of_halfday: DateTimeFieldRef =
            Arc::new(field(F::HourOfHalfday, &hours, &halfdays)?);
        let halfday_of_day = field(F::HalfdayOfDay, &halfdays, &days)?
            .with_names(SymbolField::HalfdayOfDay);

        let date_times: Vec<(DateTimeFieldType, DateTimeFieldRef)> = vec![
            (F::MillisOfSecond, Arc::new(field(F::MillisOfSecond, &millis, &seconds)?)),
            (F::MillisOfDay, Arc::new(field(F::MillisOfDay, &millis, &days)?)),
            (F::SecondOfMinute, Arc::new(field(F::SecondOfMinute, &seconds, &minutes)?)),
            (F::SecondOfDay, Arc::new(field(F::SecondOfDay, &seconds, &days)?)),
            (F::MinuteOfHour, Arc::new(field(F::MinuteOfHour, &minutes, &hours)?)),
            (F::MinuteOfDay, Arc::new(field(F::MinuteOfDay, &minutes, &days)?)),
            (
                F::ClockhourOfDay,
                Arc::new(ZeroIsMaxDateTimeField::try_new(hour_of_day.clone(), F::ClockhourOfDay)?),
            ),
            (
                F::ClockhourOfHalfday,
                Arc::new(ZeroIsMaxDateTimeField::try_new(
                    hour_of_halfday.clone(),
                    F::ClockhourOfHalfday,
                )?),
            ),
            (F::HourOfDay, hour_of_day),
            (F::HourOfHalfday, hour_of_halfday),
            (F::HalfdayOfDay, Arc::new(halfday_of_day)),
        ];

        Ok(Self {
            durations: vec![
                (D::Millis, millis),
                (D::Seconds, seconds),
                (D::Minutes, minutes),
                (D::Hours, hours),
                (D::Halfdays, halfdays),
                (D::Days, days),
                (D::Weeks, weeks),
            ],
            date_times,
        })
    }

    pub(crate) fn duration(&self, kind: DurationFieldType) -> ChronoResult<DurationFieldRef> {
        self.durations
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, field)| field.clone())
            .ok_or_else(|| {
                ChronoError::assert().with_message(format!("{kind} is not a clock unit"))
            })
    }

    fn install(&self, fields: &mut Fields) {
        for (kind, field) in &self.durations {
            fields.set_duration(*kind, field.clone());
        }
        for (kind, field) in &self.date_times {
            fields.set_date_time(*kind, field.clone());
        }
    }
}

// ==== Assembly ====

/// Installs every field of a Gregorian style calendar into `fields`.
pub(crate) fn install(calendar: &Arc<BasicCalendar>, fields: &mut Fields) -> ChronoResult<()> {
    use DateTimeFieldType as F;
    use DurationFieldType as D;

    let time = time_fields()?;
    time.install(fields);
    let days = time.duration(D::Days)?;
    let weeks = time.duration(D::Weeks)?;
    let eras = UnsupportedDurationField::instance(D::Eras);

    let year = YearField::new(calendar.clone(), days.clone());
    let years = year.duration_field();
    let year: DateTimeFieldRef = Arc::new(year);
    let year_of_era: DateTimeFieldRef = Arc::new(YearOfEraField::new(
        year.clone(),
        calendar.clone(),
        eras.clone(),
    ));

    // One based century and year of century: 1901-2000 is century 20.
    let shifted = Arc::new(OffsetDateTimeField::try_new(year_of_era.clone(), 99)?);
    let century_of_era = DividedDateTimeField::try_new(shifted, None, F::CenturyOfEra, 100)?;
    let centuries = century_of_era.duration_field();
    let year_of_century = OffsetDateTimeField::with_type(
        Arc::new(RemainderDateTimeField::from_divided(&century_of_era, F::YearOfCentury)),
        F::YearOfCentury,
        1,
    )?;

    let month_of_year = MonthField::new(calendar.clone(), years.clone(), days.clone());
    let months = month_of_year.duration_field();
    let weekyear = WeekyearField::new(calendar.clone(), weeks.clone());
    let weekyears = weekyear.duration_field();
    let weekyear: DateTimeFieldRef = Arc::new(weekyear);
    let weekyear_of_century = OffsetDateTimeField::with_type(
        Arc::new(RemainderDateTimeField::try_new(
            weekyear.clone(),
            centuries.clone(),
            F::WeekyearOfCentury,
            100,
        )?),
        F::WeekyearOfCentury,
        1,
    )?;

    fields.set_date_time(F::Year, year);
    fields.set_date_time(F::YearOfEra, year_of_era);
    fields.set_date_time(F::CenturyOfEra, Arc::new(century_of_era));
    fields.set_date_time(F::YearOfCentury, Arc::new(year_of_century));
    fields.set_date_time(F::Era, Arc::new(EraField::new(calendar.clone(), eras)));
    fields.set_date_time(
        F::DayOfWeek,
        Arc::new(DayOfWeekField::try_new(calendar.clone(), days.clone(), weeks.clone())?),
    );
    fields.set_date_time(
        F::DayOfMonth,
        Arc::new(DayOfMonthField::try_new(calendar.clone(), days.clone(), months.clone())?),
    );
    fields.set_date_time(
        F::DayOfYear,
        Arc::new(DayOfYearField::try_new(calendar.clone(), days, years.clone())?),
    );
    fields.set_date_time(F::MonthOfYear, Arc::new(month_of_year));
    fields.set_date_time(F::Weekyear, weekyear);
    fields.set_date_time(
        F::WeekOfWeekyear,
        Arc::new(WeekOfWeekyearField::try_new(calendar.clone(), weeks, weekyears.clone())?),
    );
    fields.set_date_time(F::WeekyearOfCentury, Arc::new(weekyear_of_century));

    fields.set_duration(D::Years, years);
    fields.set_duration(D::Months, months);
    fields.set_duration(D::Weekyears, weekyears);
    fields.set_duration(D::Centuries, centuries);
    Ok(())
}

// ==== Year ====

#[derive(Debug)]
struct YearUnit {
    calendar: Arc<BasicCalendar>,
}

impl YearUnit {
    fn set(&self, instant: i64, year: i32) -> ChronoResult<i64> {
        verify_value_bounds(
            DateTimeFieldType::Year,
            year.into(),
            self.calendar.min_year().into(),
            self.calendar.max_year().into(),
        )?;
        self.calendar.set_year(instant, year)
    }
}

impl ImpreciseUnit for YearUnit {
    fn unit_type(&self) -> DurationFieldType {
        DurationFieldType::Years
    }

    fn average_unit_millis(&self) -> i64 {
        self.calendar.rules().average_millis_per_year()
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        if value == 0 {
            return Ok(instant);
        }
        let year = safe_add(i64::from(self.calendar.year(instant)), value)?;
        self.set(instant, safe_to_int(year)?)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        Ok(if minuend < subtrahend {
            -self.calendar.year_difference(subtrahend, minuend)
        } else {
            self.calendar.year_difference(minuend, subtrahend)
        })
    }
}

/// The proleptic year, with no gap at zero.
#[derive(Debug, Clone)]
pub(crate) struct YearField {
    unit: Arc<YearUnit>,
    duration: DurationFieldRef,
    days: DurationFieldRef,
}

impl YearField {
    fn new(calendar: Arc<BasicCalendar>, days: DurationFieldRef) -> Self {
        let unit = Arc::new(YearUnit { calendar });
        let duration: DurationFieldRef = Arc::new(LinkedDurationField::new(unit.clone()));
        Self {
            unit,
            duration,
            days,
        }
    }

    fn calendar(&self) -> &BasicCalendar {
        &self.unit.calendar
    }
}

impl DateTimeField for YearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Year
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar().year(instant))
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.unit.add(instant, value)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        if value == 0 {
            return Ok(instant);
        }
        let calendar = self.calendar();
        let year = wrapped_value(
            calendar.year(instant),
            value,
            calendar.min_year(),
            calendar.max_year(),
        )?;
        self.unit.set(instant, year)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.unit.difference_as_long(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.unit.set(instant, value)
    }

    fn set_extended(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        let calendar = self.calendar();
        verify_value_bounds(
            DateTimeFieldType::Year,
            value.into(),
            i64::from(calendar.min_year()) - 1,
            i64::from(calendar.max_year()) + 1,
        )?;
        calendar.set_year(instant, value)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.duration.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        let calendar = self.calendar();
        Ok(calendar.is_leap_year(calendar.year(instant)))
    }

    fn leap_amount(&self, instant: i64) -> ChronoResult<i32> {
        Ok(i32::from(self.is_leap(instant)?))
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.days.clone())
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(self.calendar().min_year())
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(self.calendar().max_year())
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        let calendar = self.calendar();
        let floor = calendar.year_millis(calendar.year(instant));
        // The first year of the timeline starts before its first instant.
        if floor > instant {
            return Err(ChronoError::overflow()
                .with_message(format!("Start of the year of {instant} is out of range")));
        }
        Ok(floor)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        let floor = self.round_floor(instant)?;
        if floor == instant {
            return Ok(instant);
        }
        let calendar = self.calendar();
        let days = if calendar.is_leap_year(calendar.year(instant)) {
            366
        } else {
            365
        };
        safe_add(floor, days * MILLIS_PER_DAY)
    }
}

// ==== Month of year ====

#[derive(Debug)]
struct MonthUnit {
    calendar: Arc<BasicCalendar>,
}

impl ImpreciseUnit for MonthUnit {
    fn unit_type(&self) -> DurationFieldType {
        DurationFieldType::Months
    }

    fn average_unit_millis(&self) -> i64 {
        self.calendar.rules().average_millis_per_month()
    }

    /// Moves by whole months, clamping the day to the end of the target
    /// month and keeping the time of day.
    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        if value == 0 {
            return Ok(instant);
        }
        let calendar = &self.calendar;
        let time_of_day = i64::from(calendar.millis_of_day(instant));
        let this_year = calendar.year(instant);
        let this_month = calendar.month_of_year_in(instant, this_year);

        let total = safe_add(i64::from(this_month - 1), value)?;
        let year = i64::from(this_year) + total.div_euclid(12);
        if year < calendar.min_year().into() || year > calendar.max_year().into() {
            return Err(ChronoError::invalid_argument()
                .with_message(format!("Magnitude of add amount is too large: {value}")));
        }
        let year = year as i32;
        let month = total.rem_euclid(12) as i32 + 1;

        let day = calendar
            .day_of_month_in(instant, this_year, this_month)
            .min(calendar.days_in_year_month(year, month));
        safe_add(calendar.year_month_day_millis(year, month, day), time_of_day)
    }

    /// Counts whole months. The last day of a month is a whole month after
    /// any later day of the previous month, so Feb 28 is a month after
    /// Jan 31.
    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        if minuend < subtrahend {
            return Ok(-self.difference_as_long(subtrahend, minuend)?);
        }
        let calendar = &self.calendar;
        let minuend_year = calendar.year(minuend);
        let minuend_month = calendar.month_of_year_in(minuend, minuend_year);
        let subtrahend_year = calendar.year(subtrahend);
        let subtrahend_month = calendar.month_of_year_in(subtrahend, subtrahend_year);

        let mut difference = (i64::from(minuend_year) - i64::from(subtrahend_year)) * 12
            + i64::from(minuend_month)
            - i64::from(subtrahend_month);

        let mut subtrahend = subtrahend;
        let minuend_day = calendar.day_of_month_in(minuend, minuend_year, minuend_month);
        if minuend_day == calendar.days_in_year_month(minuend_year, minuend_month) {
            let subtrahend_day =
                calendar.day_of_month_in(subtrahend, subtrahend_year, subtrahend_month);
            if subtrahend_day > minuend_day {
                subtrahend -= i64::from(subtrahend_day - minuend_day) * MILLIS_PER_DAY;
            }
        }

        let minuend_rem = minuend - calendar.year_month_millis(minuend_year, minuend_month);
        let subtrahend_rem =
            subtrahend - calendar.year_month_millis(subtrahend_year, subtrahend_month);
        if minuend_rem < subtrahend_rem {
            difference -= 1;
        }
        Ok(difference)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MonthField {
    unit: Arc<MonthUnit>,
    duration: DurationFieldRef,
    years: DurationFieldRef,
    days: DurationFieldRef,
}

impl MonthField {
    fn new(calendar: Arc<BasicCalendar>, years: DurationFieldRef, days: DurationFieldRef) -> Self {
        let unit = Arc::new(MonthUnit { calendar });
        let duration: DurationFieldRef = Arc::new(LinkedDurationField::new(unit.clone()));
        Self {
            unit,
            duration,
            years,
            days,
        }
    }

    fn calendar(&self) -> &BasicCalendar {
        &self.unit.calendar
    }
}

impl DateTimeField for MonthField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::MonthOfYear
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar().month_of_year(instant))
    }

    fn value_as_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(symbols::value_to_text(
            symbols,
            SymbolField::MonthOfYear,
            TextStyle::Full,
            value,
        ))
    }

    fn value_as_short_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(symbols::value_to_text(
            symbols,
            SymbolField::MonthOfYear,
            TextStyle::Short,
            value,
        ))
    }

    fn convert_text(&self, text: &str, symbols: &dyn LocaleSymbols) -> ChronoResult<i32> {
        symbols::text_to_value(symbols, SymbolField::MonthOfYear, text)
    }

    fn maximum_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Ok(symbols.max_text_length(SymbolField::MonthOfYear, TextStyle::Full))
    }

    fn maximum_short_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Ok(symbols.max_text_length(SymbolField::MonthOfYear, TextStyle::Short))
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.unit.add(instant, value)
    }

    /// A partial led by the month wraps the month alone. A contiguous
    /// partial goes through an instant so that the day clamps like it does
    /// on the timeline.
    fn add_partial(
        &self,
        partial: &dyn ReadablePartial,
        index: usize,
        values: &mut [i32],
        value: i32,
    ) -> ChronoResult<()> {
        if value == 0 {
            return Ok(());
        }
        base::check_index(partial, index, values)?;

        if index == 0 && partial.field_type(0) == DateTimeFieldType::MonthOfYear {
            let month = (values[0] - 1 + value % 12 + 12) % 12 + 1;
            return self.set_partial(partial, 0, values, month);
        }

        if is_contiguous(partial) {
            let mut instant = 0;
            for (i, &v) in values.iter().enumerate() {
                instant = partial.field(i).set(instant, v)?;
            }
            let instant = self.add(instant, value.into())?;
            for (i, v) in values.iter_mut().enumerate() {
                *v = partial.field(i).get(instant)?;
            }
            return Ok(());
        }

        base::add_partial(self, partial, index, values, value, false)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.set(instant, wrapped_value(self.get(instant)?, value, 1, 12)?)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.unit.difference_as_long(minuend, subtrahend)
    }

    /// Sets the month, clamping the day to the end of the new month.
    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        verify_value_bounds(DateTimeFieldType::MonthOfYear, value.into(), 1, 12)?;
        let calendar = self.calendar();
        let year = calendar.year(instant);
        let day = calendar
            .day_of_month(instant)
            .min(calendar.days_in_year_month(year, value));
        safe_add(
            calendar.year_month_day_millis(year, value, day),
            i64::from(calendar.millis_of_day(instant)),
        )
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.duration.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.years.clone())
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        let calendar = self.calendar();
        let year = calendar.year(instant);
        Ok(calendar.is_leap_year(year) && calendar.month_of_year_in(instant, year) == 2)
    }

    fn leap_amount(&self, instant: i64) -> ChronoResult<i32> {
        Ok(i32::from(self.is_leap(instant)?))
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.days.clone())
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(1)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(12)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        let calendar = self.calendar();
        let year = calendar.year(instant);
        let month = calendar.month_of_year_in(instant, year);
        Ok(calendar.year_month_millis(year, month))
    }
}

// ==== Weekyear ====

/// Millis into a weekyear at which week 53 starts.
const WEEK_53: i64 = 52 * MILLIS_PER_WEEK;

#[derive(Debug)]
struct WeekyearUnit {
    calendar: Arc<BasicCalendar>,
}

impl WeekyearUnit {
    /// Moves to `year`, keeping the week number where the target weekyear
    /// has it and the day of week.
    fn set(&self, instant: i64, year: i32) -> ChronoResult<i64> {
        let calendar = &self.calendar;
        verify_value_bounds(
            DateTimeFieldType::Weekyear,
            year.into(),
            calendar.min_year().into(),
            calendar.max_year().into(),
        )?;
        let this_weekyear = calendar.weekyear(instant);
        if this_weekyear == year {
            return Ok(instant);
        }
        let day_of_week = calendar.day_of_week(instant);
        let max_week = calendar
            .weeks_in_year(year)
            .min(calendar.weeks_in_year(this_weekyear));
        let week = calendar.week_of_weekyear(instant).min(max_week);

        let mut work = calendar.set_year(instant, year)?;
        match calendar.weekyear(work).cmp(&year) {
            core::cmp::Ordering::Less => work = safe_add(work, MILLIS_PER_WEEK)?,
            core::cmp::Ordering::Greater => work = safe_subtract(work, MILLIS_PER_WEEK)?,
            core::cmp::Ordering::Equal => {}
        }
        let current_week = calendar.week_of_weekyear(work);
        work = safe_add(work, i64::from(week - current_week) * MILLIS_PER_WEEK)?;
        let current_day = calendar.day_of_week(work);
        safe_add(work, i64::from(day_of_week - current_day) * MILLIS_PER_DAY)
    }

    /// Returns the Monday starting week one of the weekyear of `instant`.
    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        let week_start = monday_floor(instant)?;
        let week = self.calendar.week_of_weekyear(week_start);
        if week > 1 {
            return safe_subtract(week_start, i64::from(week - 1) * MILLIS_PER_WEEK);
        }
        Ok(week_start)
    }
}

impl ImpreciseUnit for WeekyearUnit {
    fn unit_type(&self) -> DurationFieldType {
        DurationFieldType::Weekyears
    }

    fn average_unit_millis(&self) -> i64 {
        self.calendar.rules().average_millis_per_year()
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        if value == 0 {
            return Ok(instant);
        }
        let year = safe_add(i64::from(self.calendar.weekyear(instant)), value)?;
        self.set(instant, safe_to_int(year)?)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        if minuend < subtrahend {
            return Ok(-self.difference_as_long(subtrahend, minuend)?);
        }
        let calendar = &self.calendar;
        let minuend_weekyear = calendar.weekyear(minuend);
        let subtrahend_weekyear = calendar.weekyear(subtrahend);
        let minuend_rem = safe_subtract(minuend, self.round_floor(minuend)?)?;
        let mut subtrahend_rem = safe_subtract(subtrahend, self.round_floor(subtrahend)?)?;

        // Week 53 of a long weekyear has no counterpart in a short one.
        if subtrahend_rem >= WEEK_53 && calendar.weeks_in_year(minuend_weekyear) <= 52 {
            subtrahend_rem -= MILLIS_PER_WEEK;
        }

        let mut difference = i64::from(minuend_weekyear) - i64::from(subtrahend_weekyear);
        if minuend_rem < subtrahend_rem {
            difference -= 1;
        }
        Ok(difference)
    }
}

/// Rounds down to the Monday at or before `instant`. The epoch was a
/// Thursday, so weeks are aligned three days after it.
fn monday_floor(instant: i64) -> ChronoResult<i64> {
    let shifted = safe_add(instant, 3 * MILLIS_PER_DAY)?;
    let floor = shifted - shifted.rem_euclid(MILLIS_PER_WEEK);
    safe_subtract(floor, 3 * MILLIS_PER_DAY)
}

fn monday_ceiling(instant: i64) -> ChronoResult<i64> {
    let floor = monday_floor(instant)?;
    if floor == instant {
        return Ok(instant);
    }
    safe_add(floor, MILLIS_PER_WEEK)
}

#[derive(Debug, Clone)]
pub(crate) struct WeekyearField {
    unit: Arc<WeekyearUnit>,
    duration: DurationFieldRef,
    weeks: DurationFieldRef,
}

impl WeekyearField {
    fn new(calendar: Arc<BasicCalendar>, weeks: DurationFieldRef) -> Self {
        let unit = Arc::new(WeekyearUnit { calendar });
        let duration: DurationFieldRef = Arc::new(LinkedDurationField::new(unit.clone()));
        Self {
            unit,
            duration,
            weeks,
        }
    }
}

impl DateTimeField for WeekyearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Weekyear
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.unit.calendar.weekyear(instant))
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.unit.add(instant, value)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.unit.add(instant, value.into())
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.unit.difference_as_long(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.unit.set(instant, value)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.duration.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        Ok(self.leap_amount(instant)? > 0)
    }

    fn leap_amount(&self, instant: i64) -> ChronoResult<i32> {
        let calendar = &self.unit.calendar;
        Ok(calendar.weeks_in_year(calendar.weekyear(instant)) - 52)
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.weeks.clone())
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(self.unit.calendar.min_year())
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(self.unit.calendar.max_year())
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.unit.round_floor(instant)
    }
}

// ==== Precise calendar fields ====

/// Day of the month, 1 to 28-31.
#[derive(Debug, Clone)]
pub(crate) struct DayOfMonthField {
    calendar: Arc<BasicCalendar>,
    base: PreciseDurationBase,
    months: DurationFieldRef,
}

impl DayOfMonthField {
    fn try_new(
        calendar: Arc<BasicCalendar>,
        days: DurationFieldRef,
        months: DurationFieldRef,
    ) -> ChronoResult<Self> {
        Ok(Self {
            calendar,
            base: PreciseDurationBase::try_new(DateTimeFieldType::DayOfMonth, days)?,
            months,
        })
    }

    fn maximum_in(&self, partial: &dyn ReadablePartial, values: Option<&[i32]>) -> i32 {
        let Some(month) = partial_value(partial, values, DateTimeFieldType::MonthOfYear) else {
            return 31;
        };
        match partial_value(partial, values, DateTimeFieldType::Year) {
            Some(year) => self.calendar.days_in_year_month(year, month),
            None => self.calendar.days_in_month_max(month),
        }
    }
}

impl DateTimeField for DayOfMonthField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::DayOfMonth
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar.day_of_month(instant))
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        let max = self.calendar.days_in_month_max_for_set(instant, value);
        self.base
            .set(instant, self.calendar.day_of_month(instant), value, 1, max)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.base.unit().clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.months.clone())
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        Ok(self.calendar.is_leap_day(instant))
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(1)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(31)
    }

    fn maximum_value_at(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar.days_in_month_max_at(instant))
    }

    fn maximum_value_for_partial(&self, partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        Ok(self.maximum_in(partial, None))
    }

    fn maximum_value_for_values(
        &self,
        partial: &dyn ReadablePartial,
        values: &[i32],
    ) -> ChronoResult<i32> {
        Ok(self.maximum_in(partial, Some(values)))
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.base.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.base.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        Ok(self.base.remainder(instant))
    }
}

/// Day of the year, 1 to 365 or 366.
#[derive(Debug, Clone)]
pub(crate) struct DayOfYearField {
    calendar: Arc<BasicCalendar>,
    base: PreciseDurationBase,
    years: DurationFieldRef,
}

impl DayOfYearField {
    fn try_new(
        calendar: Arc<BasicCalendar>,
        days: DurationFieldRef,
        years: DurationFieldRef,
    ) -> ChronoResult<Self> {
        Ok(Self {
            calendar,
            base: PreciseDurationBase::try_new(DateTimeFieldType::DayOfYear, days)?,
            years,
        })
    }

    fn maximum_in(&self, partial: &dyn ReadablePartial, values: Option<&[i32]>) -> i32 {
        partial_value(partial, values, DateTimeFieldType::Year)
            .map_or(366, |year| self.calendar.days_in_year(year))
    }
}

impl DateTimeField for DayOfYearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::DayOfYear
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar.day_of_year(instant))
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        let max = if (1..=365).contains(&value) {
            365
        } else {
            self.maximum_value_at(instant)?
        };
        self.base
            .set(instant, self.calendar.day_of_year(instant), value, 1, max)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.base.unit().clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.years.clone())
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        Ok(self.calendar.is_leap_day(instant))
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(1)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(366)
    }

    fn maximum_value_at(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar.days_in_year(self.calendar.year(instant)))
    }

    fn maximum_value_for_partial(&self, partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        Ok(self.maximum_in(partial, None))
    }

    fn maximum_value_for_values(
        &self,
        partial: &dyn ReadablePartial,
        values: &[i32],
    ) -> ChronoResult<i32> {
        Ok(self.maximum_in(partial, Some(values)))
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.base.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.base.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        Ok(self.base.remainder(instant))
    }
}

/// ISO day of week, Monday 1 to Sunday 7.
#[derive(Debug, Clone)]
pub(crate) struct DayOfWeekField {
    calendar: Arc<BasicCalendar>,
    base: PreciseDurationBase,
    weeks: DurationFieldRef,
}

impl DayOfWeekField {
    fn try_new(
        calendar: Arc<BasicCalendar>,
        days: DurationFieldRef,
        weeks: DurationFieldRef,
    ) -> ChronoResult<Self> {
        Ok(Self {
            calendar,
            base: PreciseDurationBase::try_new(DateTimeFieldType::DayOfWeek, days)?,
            weeks,
        })
    }
}

impl DateTimeField for DayOfWeekField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::DayOfWeek
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar.day_of_week(instant))
    }

    fn value_as_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(symbols::value_to_text(
            symbols,
            SymbolField::DayOfWeek,
            TextStyle::Full,
            value,
        ))
    }

    fn value_as_short_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(symbols::value_to_text(
            symbols,
            SymbolField::DayOfWeek,
            TextStyle::Short,
            value,
        ))
    }

    fn convert_text(&self, text: &str, symbols: &dyn LocaleSymbols) -> ChronoResult<i32> {
        symbols::text_to_value(symbols, SymbolField::DayOfWeek, text)
    }

    fn maximum_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Ok(symbols.max_text_length(SymbolField::DayOfWeek, TextStyle::Full))
    }

    fn maximum_short_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Ok(symbols.max_text_length(SymbolField::DayOfWeek, TextStyle::Short))
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.base
            .set(instant, self.calendar.day_of_week(instant), value, 1, 7)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.base.unit().clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.weeks.clone())
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(1)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(7)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.base.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.base.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        Ok(self.base.remainder(instant))
    }
}

/// Week of the weekyear, 1 to 52 or 53. Weeks start on Monday.
#[derive(Debug, Clone)]
pub(crate) struct WeekOfWeekyearField {
    calendar: Arc<BasicCalendar>,
    base: PreciseDurationBase,
    weekyears: DurationFieldRef,
}

impl WeekOfWeekyearField {
    fn try_new(
        calendar: Arc<BasicCalendar>,
        weeks: DurationFieldRef,
        weekyears: DurationFieldRef,
    ) -> ChronoResult<Self> {
        Ok(Self {
            calendar,
            base: PreciseDurationBase::try_new(DateTimeFieldType::WeekOfWeekyear, weeks)?,
            weekyears,
        })
    }

    fn maximum_in(&self, partial: &dyn ReadablePartial, values: Option<&[i32]>) -> i32 {
        partial_value(partial, values, DateTimeFieldType::Weekyear)
            .map_or(53, |weekyear| self.calendar.weeks_in_year(weekyear))
    }
}

impl DateTimeField for WeekOfWeekyearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::WeekOfWeekyear
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar.week_of_weekyear(instant))
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        let max = if (1..=52).contains(&value) {
            52
        } else {
            self.maximum_value_at(instant)?
        };
        self.base
            .set(instant, self.calendar.week_of_weekyear(instant), value, 1, max)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.base.unit().clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.weekyears.clone())
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(1)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(53)
    }

    fn maximum_value_at(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.calendar.weeks_in_year(self.calendar.weekyear(instant)))
    }

    fn maximum_value_for_partial(&self, partial: &dyn ReadablePartial) -> ChronoResult<i32> {
        Ok(self.maximum_in(partial, None))
    }

    fn maximum_value_for_values(
        &self,
        partial: &dyn ReadablePartial,
        values: &[i32],
    ) -> ChronoResult<i32> {
        Ok(self.maximum_in(partial, Some(values)))
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        monday_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        monday_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        safe_subtract(instant, monday_floor(instant)?)
    }
}

// ==== Era ====

/// BCE (0) or CE (1).
#[derive(Debug, Clone)]
pub(crate) struct EraField {
    calendar: Arc<BasicCalendar>,
    eras: DurationFieldRef,
}

impl EraField {
    fn new(calendar: Arc<BasicCalendar>, eras: DurationFieldRef) -> Self {
        Self { calendar, eras }
    }

    /// Returns the first millisecond of year 1.
    fn common_era_start(&self) -> i64 {
        self.calendar.year_millis(1)
    }
}

impl DateTimeField for EraField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Era
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(if self.calendar.year(instant) <= 0 { BCE } else { CE })
    }

    fn value_as_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(symbols::value_to_text(symbols, SymbolField::Era, TextStyle::Full, value))
    }

    fn value_as_short_text(&self, value: i32, symbols: &dyn LocaleSymbols) -> ChronoResult<String> {
        Ok(symbols::value_to_text(symbols, SymbolField::Era, TextStyle::Short, value))
    }

    fn convert_text(&self, text: &str, symbols: &dyn LocaleSymbols) -> ChronoResult<i32> {
        symbols::text_to_value(symbols, SymbolField::Era, text)
    }

    fn maximum_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Ok(symbols.max_text_length(SymbolField::Era, TextStyle::Full))
    }

    fn maximum_short_text_length(&self, symbols: &dyn LocaleSymbols) -> ChronoResult<usize> {
        Ok(symbols.max_text_length(SymbolField::Era, TextStyle::Short))
    }

    /// Flips the era, keeping the year of era: 2000 CE becomes 2000 BCE.
    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        verify_value_bounds(DateTimeFieldType::Era, value.into(), BCE.into(), CE.into())?;
        if self.get(instant)? == value {
            return Ok(instant);
        }
        let year = self.calendar.year(instant);
        self.calendar.set_year(instant, 1 - year)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.eras.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(BCE)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        Ok(CE)
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        Ok(if self.get(instant)? == CE {
            self.common_era_start()
        } else {
            i64::MIN
        })
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        Ok(if self.get(instant)? == BCE {
            self.common_era_start()
        } else {
            i64::MAX
        })
    }

    fn round_half_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.round_floor(instant)
    }

    fn round_half_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.round_floor(instant)
    }

    fn round_half_even(&self, instant: i64) -> ChronoResult<i64> {
        self.round_floor(instant)
    }
}

// ==== Year of era ====

/// Year counted within its era: year 0 is 1 BCE.
#[derive(Debug, Clone)]
pub(crate) struct YearOfEraField {
    year: DateTimeFieldRef,
    calendar: Arc<BasicCalendar>,
    eras: DurationFieldRef,
}

impl YearOfEraField {
    fn new(year: DateTimeFieldRef, calendar: Arc<BasicCalendar>, eras: DurationFieldRef) -> Self {
        Self {
            year,
            calendar,
            eras,
        }
    }
}

impl DateTimeField for YearOfEraField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::YearOfEra
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        let year = self.year.get(instant)?;
        Ok(if year <= 0 { 1 - year } else { year })
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.year.add(instant, value)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.year.add_wrap_field(instant, value)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.year.difference_as_long(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        verify_value_bounds(
            DateTimeFieldType::YearOfEra,
            value.into(),
            1,
            self.maximum_value()?.into(),
        )?;
        let year = if self.calendar.year(instant) <= 0 {
            1 - value
        } else {
            value
        };
        self.year.set(instant, year)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.year.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.eras.clone())
    }

    fn is_leap(&self, instant: i64) -> ChronoResult<bool> {
        self.year.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> ChronoResult<i32> {
        self.year.leap_amount(instant)
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        self.year.leap_duration_field()
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(1)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        self.year.maximum_value()
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.year.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.year.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        self.year.remainder(instant)
    }
}

/// Year of era for the ISO calendar: the magnitude of the proleptic year,
/// so year 0 is year of era 0.
#[derive(Debug, Clone)]
pub(crate) struct IsoYearOfEraField {
    year: DateTimeFieldRef,
    eras: DurationFieldRef,
}

impl IsoYearOfEraField {
    pub(crate) fn new(year: DateTimeFieldRef, eras: DurationFieldRef) -> Self {
        Self { year, eras }
    }
}

impl DateTimeField for IsoYearOfEraField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::YearOfEra
    }

    fn get(&self, instant: i64) -> ChronoResult<i32> {
        Ok(self.year.get(instant)?.abs())
    }

    fn add(&self, instant: i64, value: i64) -> ChronoResult<i64> {
        self.year.add(instant, value)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        self.year.add_wrap_field(instant, value)
    }

    fn difference_as_long(&self, minuend: i64, subtrahend: i64) -> ChronoResult<i64> {
        self.year.difference_as_long(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> ChronoResult<i64> {
        verify_value_bounds(
            DateTimeFieldType::YearOfEra,
            value.into(),
            0,
            self.maximum_value()?.into(),
        )?;
        let year = if self.year.get(instant)? < 0 {
            -value
        } else {
            value
        };
        self.year.set(instant, year)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.year.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.eras.clone())
    }

    fn minimum_value(&self) -> ChronoResult<i32> {
        Ok(0)
    }

    fn maximum_value(&self) -> ChronoResult<i32> {
        self.year.maximum_value()
    }

    fn round_floor(&self, instant: i64) -> ChronoResult<i64> {
        self.year.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> ChronoResult<i64> {
        self.year.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> ChronoResult<i64> {
        self.year.remainder(instant)
    }
}
