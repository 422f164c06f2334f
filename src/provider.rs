//! The `DateTimeZone` trait, the boundary to time zone offset data.
//!
//! The library computes no zone rules itself. A zone reports its offset at
//! a UTC instant and the instants at which that offset changes; everything
//! the chronologies need on top of that (local to UTC resolution, gap
//! detection) is provided here in terms of those queries.

use core::fmt;
use std::sync::{Arc, LazyLock};

use tinystr::{tinystr, TinyAsciiStr};

use crate::{
    utils::safe_add, ChronoError, ChronoResult, MILLIS_PER_DAY, MILLIS_PER_HOUR,
    MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
};

/// A shared handle to a time zone.
pub type ZoneRef = Arc<dyn DateTimeZone>;

/// The direction of a transition query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Next,
    Previous,
}

/// A time zone as consumed by the zoned chronology.
///
/// All instants are UTC milliseconds unless a method name says otherwise,
/// and all offsets are milliseconds to add to UTC to get local time.
pub trait DateTimeZone: Send + Sync + fmt::Debug {
    /// Returns the identifier of this zone, e.g. "Europe/London".
    fn id(&self) -> &str;

    /// Returns the offset in effect at `instant`.
    fn offset(&self, instant: i64) -> i32;

    /// Returns the offset excluding daylight saving at `instant`.
    fn standard_offset(&self, instant: i64) -> i32;

    /// Returns whether the offset never changes.
    fn is_fixed(&self) -> bool;

    /// Returns the first transition strictly after `instant`: the first
    /// millisecond with the new offset.
    fn next_transition(&self, instant: i64) -> Option<i64>;

    /// Returns the last millisecond before the latest transition that is
    /// strictly before `instant`, the final instant of the earlier offset.
    fn previous_transition(&self, instant: i64) -> Option<i64>;

    /// Returns the nearest transition in `direction`.
    fn transition(&self, instant: i64, direction: TransitionDirection) -> Option<i64> {
        match direction {
            TransitionDirection::Next => self.next_transition(instant),
            TransitionDirection::Previous => self.previous_transition(instant),
        }
    }

    /// Returns whether standard time is in effect at `instant`.
    fn is_standard_offset(&self, instant: i64) -> bool {
        self.offset(instant) == self.standard_offset(instant)
    }

    /// Returns whether this zone is UTC.
    fn is_utc(&self) -> bool {
        self.is_fixed() && self.offset(0) == 0 && self.id() == "UTC"
    }

    /// Returns the offset to subtract from a local instant to get UTC.
    ///
    /// In an overlap the earlier offset, the one in effect before the
    /// transition, is returned. In a gap the offset from before the gap is
    /// returned, which yields an instant that does not read back as the
    /// requested local time.
    fn offset_from_local(&self, local: i64) -> i32 {
        let offset_local = self.offset(local);
        let adjusted = local.saturating_sub(offset_local.into());
        let offset_adjusted = self.offset(adjusted);
        if offset_local != offset_adjusted {
            // Moving toward a more positive offset means a gap.
            if offset_local < offset_adjusted {
                let next_local = next_or_max(self, adjusted);
                let next_adjusted =
                    next_or_max(self, local.saturating_sub(offset_adjusted.into()));
                if next_local != next_adjusted {
                    return offset_local;
                }
            }
        } else if offset_local >= 0 {
            if let Some(previous) = self.previous_transition(adjusted) {
                if previous < adjusted {
                    let offset_previous = self.offset(previous);
                    let diff = i64::from(offset_previous) - i64::from(offset_local);
                    if adjusted - previous <= diff {
                        return offset_previous;
                    }
                }
            }
        }
        offset_adjusted
    }

    /// Converts a UTC instant to local time.
    fn convert_utc_to_local(&self, instant: i64) -> ChronoResult<i64> {
        safe_add(instant, i64::from(self.offset(instant))).map_err(|_| {
            ChronoError::overflow().with_message("Adding time zone offset caused overflow")
        })
    }

    /// Converts a local instant to UTC. With `strict`, a local time inside
    /// a gap is an illegal instant; otherwise it resolves with the offset
    /// from before the gap.
    fn convert_local_to_utc(&self, local: i64, strict: bool) -> ChronoResult<i64> {
        let offset_local = self.offset(local);
        let mut offset = self.offset(local.saturating_sub(offset_local.into()));
        if offset_local != offset && (strict || offset_local < 0) {
            let next_local = next_or_max(self, local.saturating_sub(offset_local.into()));
            let next_adjusted = next_or_max(self, local.saturating_sub(offset.into()));
            if next_local != next_adjusted {
                if strict {
                    return Err(illegal_instant(local, self.id()));
                }
                offset = offset_local;
            }
        }
        local.checked_sub(offset.into()).ok_or_else(|| {
            ChronoError::overflow().with_message("Subtracting time zone offset caused overflow")
        })
    }

    /// Converts a local instant to UTC, preferring the offset in effect at
    /// `original` so that a change to a field far from a transition keeps
    /// the offset it started with.
    fn convert_local_to_utc_near(&self, local: i64, strict: bool, original: i64) -> ChronoResult<i64> {
        let offset_original = self.offset(original);
        if let Some(instant) = local.checked_sub(offset_original.into()) {
            if self.offset(instant) == offset_original {
                return Ok(instant);
            }
        }
        self.convert_local_to_utc(local, strict)
    }

    /// Returns whether `local` falls inside a gap of this zone.
    fn is_local_date_time_gap(&self, local: i64) -> bool {
        if self.is_fixed() {
            return false;
        }
        self.convert_local_to_utc(local, true).is_err()
    }
}

fn next_or_max<Z: DateTimeZone + ?Sized>(zone: &Z, instant: i64) -> i64 {
    zone.next_transition(instant).unwrap_or(i64::MAX)
}

/// The error raised for a local time inside a gap.
pub(crate) fn illegal_instant(local: i64, id: &str) -> ChronoError {
    #[cfg(feature = "log")]
    log::debug!("local instant {local} falls in an offset transition gap of {id}");
    ChronoError::illegal_instant().with_message(format!(
        "Illegal instant due to time zone offset transition (daylight savings time 'gap'): local millis {local} ({id})"
    ))
}

// ==== FixedOffsetZone ====

static UTC: LazyLock<ZoneRef> = LazyLock::new(|| Arc::new(FixedOffsetZone::UTC));

/// Returns the shared UTC zone.
#[must_use]
pub fn utc() -> ZoneRef {
    UTC.clone()
}

/// A zone whose offset never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedOffsetZone {
    id: TinyAsciiStr<16>,
    offset: i32,
}

impl FixedOffsetZone {
    /// The UTC zone.
    pub const UTC: Self = Self {
        id: tinystr!(16, "UTC"),
        offset: 0,
    };

    /// The largest offset magnitude, one millisecond under a day.
    pub const MAX_OFFSET: i32 = (MILLIS_PER_DAY - 1) as i32;

    /// Creates a zone for `offset` milliseconds, identified by the offset
    /// itself, e.g. "+05:30". A zero offset is UTC.
    pub fn try_new(offset: i32) -> ChronoResult<Self> {
        if offset == 0 {
            return Ok(Self::UTC);
        }
        Self::check_offset(offset)?;
        let id = format_offset(offset);
        Self::with_id(&id, offset)
    }

    /// Creates a zone for `offset` milliseconds with a custom identifier.
    pub fn with_id(id: &str, offset: i32) -> ChronoResult<Self> {
        Self::check_offset(offset)?;
        let id = TinyAsciiStr::try_from_str(id).map_err(|_| {
            ChronoError::invalid_argument()
                .with_message(format!("Invalid fixed offset zone id: {id}"))
        })?;
        Ok(Self { id, offset })
    }

    /// Creates a zone from whole hours and minutes.
    pub fn from_hours_minutes(hours: i32, minutes: i32) -> ChronoResult<Self> {
        if !(-23..=23).contains(&hours) {
            return Err(ChronoError::invalid_argument()
                .with_message(format!("Hours out of range: {hours}")));
        }
        if !(-59..=59).contains(&minutes) || (hours > 0 && minutes < 0) {
            return Err(ChronoError::invalid_argument()
                .with_message(format!("Minutes out of range: {minutes}")));
        }
        let minutes = if hours < 0 {
            i64::from(hours) * 60 - i64::from(minutes.abs())
        } else {
            i64::from(hours) * 60 + i64::from(minutes)
        };
        Self::try_new((minutes * MILLIS_PER_MINUTE) as i32)
    }

    #[inline]
    #[must_use]
    pub fn offset_millis(&self) -> i32 {
        self.offset
    }

    fn check_offset(offset: i32) -> ChronoResult<()> {
        if !(-Self::MAX_OFFSET..=Self::MAX_OFFSET).contains(&offset) {
            return Err(ChronoError::invalid_argument()
                .with_message(format!("Millis out of range: {offset}")));
        }
        Ok(())
    }
}

impl DateTimeZone for FixedOffsetZone {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn offset(&self, _instant: i64) -> i32 {
        self.offset
    }

    fn standard_offset(&self, _instant: i64) -> i32 {
        self.offset
    }

    fn is_fixed(&self) -> bool {
        true
    }

    fn next_transition(&self, _instant: i64) -> Option<i64> {
        None
    }

    fn previous_transition(&self, _instant: i64) -> Option<i64> {
        None
    }

    fn offset_from_local(&self, _local: i64) -> i32 {
        self.offset
    }
}

impl fmt::Display for FixedOffsetZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id.as_str())
    }
}

/// Renders an offset as `+hh:mm`, adding seconds and millis only when
/// they are non-zero.
fn format_offset(offset: i32) -> String {
    let sign = if offset < 0 { '-' } else { '+' };
    let mut rest = i64::from(offset).abs();
    let hours = rest / MILLIS_PER_HOUR;
    rest -= hours * MILLIS_PER_HOUR;
    let minutes = rest / MILLIS_PER_MINUTE;
    rest -= minutes * MILLIS_PER_MINUTE;
    let seconds = rest / MILLIS_PER_SECOND;
    let millis = rest - seconds * MILLIS_PER_SECOND;

    let mut out = format!("{sign}{hours:02}:{minutes:02}");
    if seconds != 0 || millis != 0 {
        out.push_str(&format!(":{seconds:02}"));
        if millis != 0 {
            out.push_str(&format!(".{millis:03}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_offset, utc, DateTimeZone, FixedOffsetZone};
    use crate::{error::ErrorKind, MILLIS_PER_HOUR, MILLIS_PER_MINUTE};

    #[test]
    fn fixed_offset_ids() {
        assert_eq!(format_offset(0), "+00:00");
        assert_eq!(format_offset(-(5 * MILLIS_PER_HOUR as i32)), "-05:00");
        assert_eq!(format_offset(5 * MILLIS_PER_HOUR as i32 + 30 * MILLIS_PER_MINUTE as i32), "+05:30");
        assert_eq!(format_offset(1_001), "+00:00:01.001");

        let zone = FixedOffsetZone::from_hours_minutes(-3, 30).unwrap();
        assert_eq!(zone.id(), "-03:30");
        assert_eq!(zone.offset(0), -(3 * MILLIS_PER_HOUR as i32 + 30 * MILLIS_PER_MINUTE as i32));
        assert_eq!(FixedOffsetZone::try_new(0).unwrap(), FixedOffsetZone::UTC);
        assert!(FixedOffsetZone::from_hours_minutes(24, 0).is_err());
        assert!(FixedOffsetZone::from_hours_minutes(2, -5).is_err());
    }

    #[test]
    fn utc_is_shared() {
        let zone = utc();
        assert!(zone.is_utc());
        assert!(std::sync::Arc::ptr_eq(&zone, &utc()));
        assert!(!FixedOffsetZone::try_new(1).unwrap().is_utc());
    }

    #[test]
    fn fixed_conversions() {
        let zone = FixedOffsetZone::from_hours_minutes(2, 0).unwrap();
        let two_hours = 2 * MILLIS_PER_HOUR;
        assert_eq!(zone.convert_utc_to_local(0).unwrap(), two_hours);
        assert_eq!(zone.convert_local_to_utc(two_hours, true).unwrap(), 0);
        assert_eq!(zone.convert_local_to_utc_near(two_hours, true, 1).unwrap(), 0);
        assert!(!zone.is_local_date_time_gap(0));
        assert_eq!(
            zone.convert_utc_to_local(i64::MAX).unwrap_err().kind(),
            ErrorKind::Overflow
        );
    }
}
