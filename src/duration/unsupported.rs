//! The unsupported duration field sentinel.

use core::cmp::Ordering;

use crate::{field::UnsupportedFieldCache, fields::DurationFieldType, ChronoError, ChronoResult};

use super::{DurationField, DurationFieldRef};

/// A placeholder for a unit the chronology does not support.
///
/// Identity queries succeed, every calculation fails with
/// `ErrorKind::Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedDurationField {
    kind: DurationFieldType,
}

impl UnsupportedDurationField {
    pub(crate) const fn new(kind: DurationFieldType) -> Self {
        Self { kind }
    }

    /// Returns the shared instance for `kind` from the process-wide cache.
    #[must_use]
    pub fn instance(kind: DurationFieldType) -> DurationFieldRef {
        UnsupportedFieldCache::global().duration(kind)
    }

    fn error(&self) -> ChronoError {
        ChronoError::unsupported().with_message(format!("{} field is unsupported", self.kind))
    }
}

impl DurationField for UnsupportedDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.kind
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        0
    }

    fn value(&self, _duration: i64) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn value_as_long(&self, _duration: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn value_at(&self, _duration: i64, _instant: i64) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn value_as_long_at(&self, _duration: i64, _instant: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn millis(&self, _value: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn millis_at(&self, _value: i64, _instant: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn add(&self, _instant: i64, _value: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn subtract(&self, _instant: i64, _value: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    fn difference(&self, _minuend: i64, _subtrahend: i64) -> ChronoResult<i32> {
        Err(self.error())
    }

    fn difference_as_long(&self, _minuend: i64, _subtrahend: i64) -> ChronoResult<i64> {
        Err(self.error())
    }

    // Always equal.
    fn compare_unit(&self, _other: &dyn DurationField) -> Ordering {
        Ordering::Equal
    }
}
