//! The `LocaleSymbols` trait, the boundary to localized field text.
//!
//! The library carries no locale tables. Callers supply an implementation
//! mapping era, month, weekday and half-day values to text and back; fields
//! that have no symbols render and parse plain decimal integers.

use core::{fmt, ops::RangeInclusive};

use crate::{fields::DateTimeFieldType, ChronoError, ChronoResult};

/// The fields whose values have localized names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolField {
    Era,
    MonthOfYear,
    DayOfWeek,
    HalfdayOfDay,
}

impl SymbolField {
    /// Returns the values that have names.
    #[must_use]
    pub const fn values(self) -> RangeInclusive<i32> {
        match self {
            Self::Era | Self::HalfdayOfDay => 0..=1,
            Self::MonthOfYear => 1..=12,
            Self::DayOfWeek => 1..=7,
        }
    }

    /// Returns the date-time field these names belong to.
    #[must_use]
    pub const fn field_type(self) -> DateTimeFieldType {
        match self {
            Self::Era => DateTimeFieldType::Era,
            Self::MonthOfYear => DateTimeFieldType::MonthOfYear,
            Self::DayOfWeek => DateTimeFieldType::DayOfWeek,
            Self::HalfdayOfDay => DateTimeFieldType::HalfdayOfDay,
        }
    }
}

/// The width of a rendered name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextStyle {
    #[default]
    Full,
    Short,
}

/// A source of localized field names.
pub trait LocaleSymbols: Send + Sync + fmt::Debug {
    /// Returns the name of `value`, or `None` if the table has no entry.
    fn text(&self, field: SymbolField, style: TextStyle, value: i32) -> Option<&str>;

    /// Returns the value named by `text`, matching full and short names
    /// without regard to case.
    fn value(&self, field: SymbolField, text: &str) -> Option<i32> {
        let needle = text.to_lowercase();
        field.values().find(|&value| {
            [TextStyle::Full, TextStyle::Short].into_iter().any(|style| {
                self.text(field, style, value)
                    .is_some_and(|name| name.to_lowercase() == needle)
            })
        })
    }

    /// Returns the length of the longest name in `style`.
    fn max_text_length(&self, field: SymbolField, style: TextStyle) -> usize {
        field
            .values()
            .map(|value| {
                self.text(field, style, value)
                    .map_or_else(|| value.to_string().len(), |name| name.chars().count())
            })
            .max()
            .unwrap_or_default()
    }
}

/// Symbols with no names at all; every field renders as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericSymbols;

impl LocaleSymbols for NumericSymbols {
    fn text(&self, _field: SymbolField, _style: TextStyle, _value: i32) -> Option<&str> {
        None
    }
}

/// Renders `value` through `symbols`, falling back to the decimal form.
pub(crate) fn value_to_text(
    symbols: &dyn LocaleSymbols,
    field: SymbolField,
    style: TextStyle,
    value: i32,
) -> String {
    symbols
        .text(field, style, value)
        .map_or_else(|| value.to_string(), str::to_owned)
}

/// Parses `text` through `symbols`, accepting the decimal form as well.
pub(crate) fn text_to_value(
    symbols: &dyn LocaleSymbols,
    field: SymbolField,
    text: &str,
) -> ChronoResult<i32> {
    symbols
        .value(field, text)
        .or_else(|| text.trim().parse::<i32>().ok())
        .ok_or_else(|| ChronoError::illegal_field_text(field.field_type(), text))
}
