//! Configuration records for chronologies, rounding and the parser bucket.

use core::{fmt, str::FromStr};

use crate::{ChronoError, ChronoResult};

// ==== MinDaysInFirstWeek ====

/// The number of days of a new year that its first week must contain.
///
/// With the default of 4 the first week is the one containing the first
/// Thursday, the ISO 8601 rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MinDaysInFirstWeek(u8);

impl MinDaysInFirstWeek {
    /// The ISO 8601 rule.
    pub const ISO: Self = Self(4);

    /// Creates the option, failing unless `days` is in `1..=7`.
    pub fn try_new(days: i32) -> ChronoResult<Self> {
        if !(1..=7).contains(&days) {
            return Err(ChronoError::invalid_argument()
                .with_message(format!("Invalid min days in first week: {days}")));
        }
        Ok(Self(days as u8))
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0 as i32
    }
}

impl Default for MinDaysInFirstWeek {
    fn default() -> Self {
        Self::ISO
    }
}

impl TryFrom<i32> for MinDaysInFirstWeek {
    type Error = ChronoError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl fmt::Display for MinDaysInFirstWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ==== ChronologyOptions ====

/// The parameters of a Gregorian or Julian chronology.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChronologyOptions {
    pub min_days_in_first_week: MinDaysInFirstWeek,
}

impl ChronologyOptions {
    #[must_use]
    pub const fn new(min_days_in_first_week: MinDaysInFirstWeek) -> Self {
        Self {
            min_days_in_first_week,
        }
    }
}

// ==== BucketOptions ====

/// The parameters of a parser bucket.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketOptions {
    /// The pivot year for two digit year parsing, if any.
    pub pivot_year: Option<i32>,
    /// The year injected when a parse names a day but no year.
    pub default_year: i32,
}

impl BucketOptions {
    #[must_use]
    pub const fn new(pivot_year: Option<i32>, default_year: i32) -> Self {
        Self {
            pivot_year,
            default_year,
        }
    }
}

impl Default for BucketOptions {
    fn default() -> Self {
        Self {
            pivot_year: None,
            default_year: 2000,
        }
    }
}

// ==== FieldRoundingMode ====

/// Selects one of the rounding operations of a date-time field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldRoundingMode {
    /// Round toward the start of the unit.
    #[default]
    Floor,
    /// Round toward the start of the next unit.
    Ceiling,
    /// Round to nearest, ties toward the floor.
    HalfFloor,
    /// Round to nearest, ties toward the ceiling.
    HalfCeiling,
    /// Round to nearest, ties toward an even field value.
    HalfEven,
}

impl FieldRoundingMode {
    /// Every rounding mode.
    pub const ALL: [Self; 5] = [
        Self::Floor,
        Self::Ceiling,
        Self::HalfFloor,
        Self::HalfCeiling,
        Self::HalfEven,
    ];

    /// Returns whether this mode rounds to the nearest boundary.
    #[inline]
    #[must_use]
    pub const fn is_half(self) -> bool {
        matches!(self, Self::HalfFloor | Self::HalfCeiling | Self::HalfEven)
    }
}

impl FromStr for FieldRoundingMode {
    type Err = ChronoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floor" => Ok(Self::Floor),
            "ceiling" => Ok(Self::Ceiling),
            "halfFloor" => Ok(Self::HalfFloor),
            "halfCeiling" => Ok(Self::HalfCeiling),
            "halfEven" => Ok(Self::HalfEven),
            _ => Err(ChronoError::invalid_argument()
                .with_message("FieldRoundingMode not an accepted value.")),
        }
    }
}

impl fmt::Display for FieldRoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
            Self::HalfFloor => "halfFloor",
            Self::HalfCeiling => "halfCeiling",
            Self::HalfEven => "halfEven",
        }
        .fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldRoundingMode, MinDaysInFirstWeek};
    use core::str::FromStr;

    #[test]
    fn min_days_bounds() {
        assert_eq!(MinDaysInFirstWeek::default().get(), 4);
        assert_eq!(MinDaysInFirstWeek::try_new(1).unwrap().get(), 1);
        assert_eq!(MinDaysInFirstWeek::try_new(7).unwrap().get(), 7);
        assert!(MinDaysInFirstWeek::try_new(0).is_err());
        assert!(MinDaysInFirstWeek::try_from(8).is_err());
    }

    #[test]
    fn rounding_mode_names() {
        for mode in FieldRoundingMode::ALL {
            assert_eq!(FieldRoundingMode::from_str(&mode.to_string()).unwrap(), mode);
        }
        assert!(FieldRoundingMode::from_str("halfExpand").is_err());
        assert!(FieldRoundingMode::HalfEven.is_half());
        assert!(!FieldRoundingMode::Ceiling.is_half());
    }
}
