//! This module implements the field type identity tokens.
//!
//! A field type names a unit ("months") or a calendar component
//! ("dayOfMonth") without computing anything. It is the key used to look up
//! the concrete field of a given chronology.

use core::{fmt, str::FromStr};

use crate::{
    chronology::Chronology, duration::DurationFieldRef, field::DateTimeFieldRef, ChronoError,
};

/// Identifies a unit of time measurement.
///
/// Variants are declared from the largest unit to the smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DurationFieldType {
    Eras = 0,
    Centuries,
    Weekyears,
    Years,
    Months,
    Weeks,
    Days,
    Halfdays,
    Hours,
    Minutes,
    Seconds,
    Millis,
}

impl DurationFieldType {
    /// The number of duration field slots in a chronology.
    pub const COUNT: usize = 12;

    /// Every duration field type, largest first.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Eras,
        Self::Centuries,
        Self::Weekyears,
        Self::Years,
        Self::Months,
        Self::Weeks,
        Self::Days,
        Self::Halfdays,
        Self::Hours,
        Self::Minutes,
        Self::Seconds,
        Self::Millis,
    ];

    /// Returns the slot index of this type.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the name of this type, e.g. "months".
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eras => "eras",
            Self::Centuries => "centuries",
            Self::Weekyears => "weekyears",
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Halfdays => "halfdays",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Millis => "millis",
        }
    }

    /// Looks up the duration field of this type in the given chronology.
    #[must_use]
    pub fn field(self, chronology: &dyn Chronology) -> DurationFieldRef {
        chronology.duration_field(self)
    }

    /// Returns whether the given chronology supports this unit.
    #[must_use]
    pub fn is_supported(self, chronology: &dyn Chronology) -> bool {
        chronology.duration_field(self).is_supported()
    }
}

impl fmt::Display for DurationFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for DurationFieldType {
    type Err = ChronoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                ChronoError::invalid_argument()
                    .with_message(format!("{s} is not a valid duration field type"))
            })
    }
}

/// Identifies a calendar component of a date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateTimeFieldType {
    Era = 0,
    YearOfEra,
    CenturyOfEra,
    YearOfCentury,
    Year,
    DayOfYear,
    MonthOfYear,
    DayOfMonth,
    WeekyearOfCentury,
    Weekyear,
    WeekOfWeekyear,
    DayOfWeek,
    HalfdayOfDay,
    HourOfHalfday,
    ClockhourOfHalfday,
    ClockhourOfDay,
    HourOfDay,
    MinuteOfDay,
    MinuteOfHour,
    SecondOfDay,
    SecondOfMinute,
    MillisOfDay,
    MillisOfSecond,
}

impl DateTimeFieldType {
    /// The number of date-time field slots in a chronology.
    pub const COUNT: usize = 23;

    /// Every date-time field type.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Era,
        Self::YearOfEra,
        Self::CenturyOfEra,
        Self::YearOfCentury,
        Self::Year,
        Self::DayOfYear,
        Self::MonthOfYear,
        Self::DayOfMonth,
        Self::WeekyearOfCentury,
        Self::Weekyear,
        Self::WeekOfWeekyear,
        Self::DayOfWeek,
        Self::HalfdayOfDay,
        Self::HourOfHalfday,
        Self::ClockhourOfHalfday,
        Self::ClockhourOfDay,
        Self::HourOfDay,
        Self::MinuteOfDay,
        Self::MinuteOfHour,
        Self::SecondOfDay,
        Self::SecondOfMinute,
        Self::MillisOfDay,
        Self::MillisOfSecond,
    ];

    /// Returns the slot index of this type.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the name of this type, e.g. "dayOfMonth".
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Era => "era",
            Self::YearOfEra => "yearOfEra",
            Self::CenturyOfEra => "centuryOfEra",
            Self::YearOfCentury => "yearOfCentury",
            Self::Year => "year",
            Self::DayOfYear => "dayOfYear",
            Self::MonthOfYear => "monthOfYear",
            Self::DayOfMonth => "dayOfMonth",
            Self::WeekyearOfCentury => "weekyearOfCentury",
            Self::Weekyear => "weekyear",
            Self::WeekOfWeekyear => "weekOfWeekyear",
            Self::DayOfWeek => "dayOfWeek",
            Self::HalfdayOfDay => "halfdayOfDay",
            Self::HourOfHalfday => "hourOfHalfday",
            Self::ClockhourOfHalfday => "clockhourOfHalfday",
            Self::ClockhourOfDay => "clockhourOfDay",
            Self::HourOfDay => "hourOfDay",
            Self::MinuteOfDay => "minuteOfDay",
            Self::MinuteOfHour => "minuteOfHour",
            Self::SecondOfDay => "secondOfDay",
            Self::SecondOfMinute => "secondOfMinute",
            Self::MillisOfDay => "millisOfDay",
            Self::MillisOfSecond => "millisOfSecond",
        }
    }

    /// Returns the unit of this field.
    #[must_use]
    pub const fn duration_type(self) -> DurationFieldType {
        use DurationFieldType as D;
        match self {
            Self::Era => D::Eras,
            Self::YearOfEra | Self::YearOfCentury | Self::Year => D::Years,
            Self::CenturyOfEra => D::Centuries,
            Self::DayOfYear | Self::DayOfMonth | Self::DayOfWeek => D::Days,
            Self::MonthOfYear => D::Months,
            Self::WeekyearOfCentury | Self::Weekyear => D::Weekyears,
            Self::WeekOfWeekyear => D::Weeks,
            Self::HalfdayOfDay => D::Halfdays,
            Self::HourOfHalfday
            | Self::ClockhourOfHalfday
            | Self::ClockhourOfDay
            | Self::HourOfDay => D::Hours,
            Self::MinuteOfDay | Self::MinuteOfHour => D::Minutes,
            Self::SecondOfDay | Self::SecondOfMinute => D::Seconds,
            Self::MillisOfDay | Self::MillisOfSecond => D::Millis,
        }
    }

    /// Returns the unit this field is a remainder of, `None` for the
    /// unbounded fields.
    #[must_use]
    pub const fn range_duration_type(self) -> Option<DurationFieldType> {
        use DurationFieldType as D;
        match self {
            Self::Era | Self::Year => None,
            Self::YearOfEra | Self::CenturyOfEra => Some(D::Eras),
            Self::YearOfCentury | Self::WeekyearOfCentury => Some(D::Centuries),
            Self::DayOfYear | Self::MonthOfYear => Some(D::Years),
            Self::DayOfMonth => Some(D::Months),
            Self::Weekyear => None,
            Self::WeekOfWeekyear => Some(D::Weekyears),
            Self::DayOfWeek => Some(D::Weeks),
            Self::HalfdayOfDay
            | Self::ClockhourOfDay
            | Self::HourOfDay
            | Self::MinuteOfDay
            | Self::SecondOfDay
            | Self::MillisOfDay => Some(D::Days),
            Self::HourOfHalfday | Self::ClockhourOfHalfday => Some(D::Halfdays),
            Self::MinuteOfHour => Some(D::Hours),
            Self::SecondOfMinute => Some(D::Minutes),
            Self::MillisOfSecond => Some(D::Seconds),
        }
    }

    /// Looks up the date-time field of this type in the given chronology.
    #[must_use]
    pub fn field(self, chronology: &dyn Chronology) -> DateTimeFieldRef {
        chronology.date_time_field(self)
    }

    /// Returns whether the given chronology supports this field.
    #[must_use]
    pub fn is_supported(self, chronology: &dyn Chronology) -> bool {
        chronology.date_time_field(self).is_supported()
    }
}

impl fmt::Display for DateTimeFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for DateTimeFieldType {
    type Err = ChronoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                ChronoError::invalid_argument()
                    .with_message(format!("{s} is not a valid date-time field type"))
            })
    }
}
