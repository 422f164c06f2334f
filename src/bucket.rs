//! The parser accumulation bucket.
//!
//! A parser saves the field values it recognizes into a
//! [`DateTimeParserBucket`] in the order it meets them in the text. Nothing
//! is applied until [`DateTimeParserBucket::compute_millis`], which orders
//! the saved fields from the widest range to the narrowest, so that setting
//! the day of the month after the month sees the right month length, and
//! then resolves the local result against the bucket's offset or zone.

use core::{cmp::Ordering, fmt};
use std::sync::{
    atomic::{AtomicU64, Ordering as AtomicOrdering},
    Arc,
};

use crate::{
    chronology::{Chronology, ChronologyRef},
    duration::compare_reverse,
    error::ErrorKind,
    field::{DateTimeField, DateTimeFieldRef},
    fields::{DateTimeFieldType, DurationFieldType},
    options::BucketOptions,
    provider::{DateTimeZone, ZoneRef},
    symbols::LocaleSymbols,
    utils::safe_subtract,
    ChronoError, ChronoResult,
};

static NEXT_BUCKET_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
enum SavedValue {
    Number(i32),
    Text(String),
}

/// One field assignment waiting to be applied.
#[derive(Debug, Clone)]
struct SavedField {
    field: DateTimeFieldRef,
    value: SavedValue,
}

impl SavedField {
    fn set(&self, instant: i64, symbols: &dyn LocaleSymbols, round: bool) -> ChronoResult<i64> {
        let instant = match &self.value {
            SavedValue::Number(value) => self.field.set_extended(instant, *value)?,
            SavedValue::Text(text) => self.field.set_text(instant, text, symbols)?,
        };
        if round {
            self.field.round_floor(instant)
        } else {
            Ok(instant)
        }
    }

    /// Widest range first, then the longest unit. A field without a range
    /// sorts before every field that has one.
    fn specificity(&self, other: &Self) -> Ordering {
        let range = compare_reverse(
            self.field.range_duration_field().as_deref(),
            other.field.range_duration_field().as_deref(),
        );
        if range != Ordering::Equal {
            return range;
        }
        compare_reverse(
            Some(self.field.duration_field().as_ref()),
            Some(other.field.duration_field().as_ref()),
        )
    }
}

/// A checkpoint of a bucket's zone, offset and saved fields.
///
/// A state only restores into the bucket that produced it.
#[derive(Debug, Clone)]
pub struct SavedState {
    bucket: u64,
    zone: Option<ZoneRef>,
    offset: Option<i32>,
    fields: Arc<[SavedField]>,
}

/// Collects parsed field values and commits them to an instant.
///
/// ```
/// use std::sync::Arc;
/// use chronology_rs::{
///     options::BucketOptions, symbols::NumericSymbols, DateTimeFieldType,
///     DateTimeParserBucket, GregorianChronology,
/// };
///
/// let chronology = GregorianChronology::instance_utc().unwrap();
/// let mut bucket = DateTimeParserBucket::new(
///     0,
///     chronology,
///     Arc::new(NumericSymbols),
///     BucketOptions::default(),
/// );
/// bucket.save_field(DateTimeFieldType::DayOfMonth, 29);
/// bucket.save_field(DateTimeFieldType::MonthOfYear, 2);
///
/// // No year was parsed, so the default year 2000 applies.
/// assert_eq!(bucket.compute_millis().unwrap(), 951_782_400_000);
/// ```
pub struct DateTimeParserBucket {
    id: u64,
    chronology: ChronologyRef,
    millis: i64,
    symbols: Arc<dyn LocaleSymbols>,
    default_zone: Option<ZoneRef>,
    zone: Option<ZoneRef>,
    offset: Option<i32>,
    default_pivot_year: Option<i32>,
    pivot_year: Option<i32>,
    default_year: i32,
    saved_fields: Vec<SavedField>,
    cached_state: Option<SavedState>,
}

impl DateTimeParserBucket {
    /// Creates a bucket that fills in unparsed fields from `instant_local`.
    ///
    /// The fields are applied in the UTC form of `chronology`; its zone
    /// becomes the bucket's zone.
    #[must_use]
    pub fn new(
        instant_local: i64,
        chronology: ChronologyRef,
        symbols: Arc<dyn LocaleSymbols>,
        options: BucketOptions,
    ) -> Self {
        let zone = chronology.zone();
        Self {
            id: NEXT_BUCKET_ID.fetch_add(1, AtomicOrdering::Relaxed),
            chronology: chronology.with_utc(),
            millis: instant_local,
            symbols,
            default_zone: Some(zone.clone()),
            zone: Some(zone),
            offset: None,
            default_pivot_year: options.pivot_year,
            pivot_year: options.pivot_year,
            default_year: options.default_year,
            saved_fields: Vec::new(),
            cached_state: None,
        }
    }

    /// Clears the saved fields and restores the zone, offset and pivot year
    /// given at construction.
    pub fn reset(&mut self) {
        self.zone.clone_from(&self.default_zone);
        self.offset = None;
        self.pivot_year = self.default_pivot_year;
        self.saved_fields.clear();
        self.cached_state = None;
    }

    /// Returns the UTC chronology fields are applied in.
    #[must_use]
    pub fn chronology(&self) -> &ChronologyRef {
        &self.chronology
    }

    #[must_use]
    pub fn symbols(&self) -> &dyn LocaleSymbols {
        self.symbols.as_ref()
    }

    #[must_use]
    pub fn zone(&self) -> Option<&ZoneRef> {
        self.zone.as_ref()
    }

    /// Sets the zone the local result is resolved in. The offset, if any,
    /// still takes precedence.
    pub fn set_zone(&mut self, zone: Option<ZoneRef>) {
        self.cached_state = None;
        self.zone = zone;
    }

    /// Returns the parsed offset in milliseconds, if any.
    #[must_use]
    pub fn offset(&self) -> Option<i32> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Option<i32>) {
        self.cached_state = None;
        self.offset = offset;
    }

    #[must_use]
    pub fn pivot_year(&self) -> Option<i32> {
        self.pivot_year
    }

    pub fn set_pivot_year(&mut self, pivot_year: Option<i32>) {
        self.pivot_year = pivot_year;
    }

    #[must_use]
    pub fn default_year(&self) -> i32 {
        self.default_year
    }

    // ==== Saving ====

    /// Saves a numeric value for the field of `kind`.
    pub fn save_field(&mut self, kind: DateTimeFieldType, value: i32) {
        let field = self.chronology.date_time_field(kind);
        self.save_field_ref(field, value);
    }

    /// Saves a numeric value for a field of the bucket's chronology.
    pub fn save_field_ref(&mut self, field: DateTimeFieldRef, value: i32) {
        self.push(SavedField {
            field,
            value: SavedValue::Number(value),
        });
    }

    /// Saves text for the field of `kind`, converted through the bucket's
    /// symbols when the fields are applied.
    pub fn save_field_text(&mut self, kind: DateTimeFieldType, text: &str) {
        let field = self.chronology.date_time_field(kind);
        self.push(SavedField {
            field,
            value: SavedValue::Text(text.to_owned()),
        });
    }

    fn push(&mut self, saved: SavedField) {
        self.cached_state = None;
        self.saved_fields.push(saved);
    }

    // ==== Checkpoints ====

    /// Returns a checkpoint of the current state.
    pub fn save_state(&mut self) -> SavedState {
        if let Some(state) = &self.cached_state {
            return state.clone();
        }
        let state = SavedState {
            bucket: self.id,
            zone: self.zone.clone(),
            offset: self.offset,
            fields: self.saved_fields.as_slice().into(),
        };
        self.cached_state = Some(state.clone());
        state
    }

    /// Rolls back to `state`. Returns `false`, changing nothing, when the
    /// state was taken from another bucket.
    pub fn restore_state(&mut self, state: &SavedState) -> bool {
        if state.bucket != self.id {
            return false;
        }
        self.zone.clone_from(&state.zone);
        self.offset = state.offset;
        self.saved_fields = state.fields.to_vec();
        self.cached_state = Some(state.clone());
        true
    }

    // ==== Commit ====

    /// Applies the saved fields and resolves the result to UTC.
    pub fn compute_millis(&mut self) -> ChronoResult<i64> {
        self.compute_millis_with(false, None)
    }

    /// Applies the saved fields and resolves the result to UTC.
    ///
    /// With `reset_fields`, each field is rounded down after it is set so
    /// that smaller unparsed fields start from zero, and the strict fields
    /// are applied a second time afterwards. `text` is quoted in error
    /// messages.
    pub fn compute_millis_with(
        &mut self,
        reset_fields: bool,
        text: Option<&str>,
    ) -> ChronoResult<i64> {
        let result = self.compute(reset_fields, text);
        #[cfg(feature = "log")]
        if let Err(err) = &result {
            log::debug!("parser bucket commit failed: {err}");
        }
        result
    }

    fn compute(&mut self, reset_fields: bool, text: Option<&str>) -> ChronoResult<i64> {
        let mut fields = self.saved_fields.clone();
        fields.sort_by(SavedField::specificity);

        if let Some(first) = fields.first() {
            // A day without a year: parse it in the default year so that
            // February 29th is accepted.
            let months = self.chronology.duration_field(DurationFieldType::Months);
            let days = self.chronology.duration_field(DurationFieldType::Days);
            let unit = first.field.duration_field();
            if compare_reverse(Some(unit.as_ref()), Some(months.as_ref())) != Ordering::Less
                && compare_reverse(Some(unit.as_ref()), Some(days.as_ref())) != Ordering::Greater
            {
                self.save_field(DateTimeFieldType::Year, self.default_year);
                return self.compute(reset_fields, text);
            }
        }

        let local = self
            .apply(&fields, reset_fields)
            .map_err(|err| match (err.kind(), text) {
                (ErrorKind::IllegalFieldValue, Some(text)) => {
                    err.prepend_message(&format!("Cannot parse \"{text}\""))
                }
                _ => err,
            })?;

        if let Some(offset) = self.offset {
            return safe_subtract(local, i64::from(offset));
        }
        let Some(zone) = &self.zone else {
            return Ok(local);
        };
        let offset = zone.offset_from_local(local);
        let instant = safe_subtract(local, i64::from(offset))?;
        if offset != zone.offset(instant) {
            let mut message = format!(
                "Illegal instant due to time zone offset transition ({})",
                zone.id()
            );
            if let Some(text) = text {
                message = format!("Cannot parse \"{text}\": {message}");
            }
            return Err(ChronoError::illegal_instant().with_message(message));
        }
        Ok(instant)
    }

    fn apply(&self, fields: &[SavedField], reset_fields: bool) -> ChronoResult<i64> {
        let symbols = self.symbols.as_ref();
        let mut instant = self.millis;
        for saved in fields {
            instant = saved.set(instant, symbols, reset_fields)?;
        }
        if reset_fields {
            let last = fields.len().saturating_sub(1);
            for (i, saved) in fields.iter().enumerate() {
                if !saved.field.is_lenient() {
                    instant = saved.set(instant, symbols, i == last)?;
                }
            }
        }
        Ok(instant)
    }
}

impl fmt::Debug for DateTimeParserBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeParserBucket")
            .field("chronology", &self.chronology.name())
            .field("millis", &self.millis)
            .field("zone", &self.zone.as_ref().map(|z| z.id().to_owned()))
            .field("offset", &self.offset)
            .field("pivot_year", &self.pivot_year)
            .field("saved_fields", &self.saved_fields.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::DateTimeParserBucket;
    use crate::{
        chronology::{Chronology, ChronologyRef, GregorianChronology},
        error::ErrorKind,
        field::DateTimeField,
        fields::DateTimeFieldType as F,
        options::BucketOptions,
        provider::{DateTimeZone, FixedOffsetZone},
        symbols::{LocaleSymbols, NumericSymbols, SymbolField, TextStyle},
        MILLIS_PER_HOUR,
    };

    const Y2000: i64 = 946_684_800_000;

    #[derive(Debug)]
    struct ShortMonths;

    impl LocaleSymbols for ShortMonths {
        fn text(&self, field: SymbolField, _style: TextStyle, value: i32) -> Option<&str> {
            const MONTHS: [&str; 12] = [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ];
            match field {
                SymbolField::MonthOfYear => MONTHS.get(usize::try_from(value - 1).ok()?).copied(),
                _ => None,
            }
        }
    }

    fn gregorian() -> ChronologyRef {
        GregorianChronology::instance_utc().unwrap()
    }

    fn bucket(chronology: ChronologyRef) -> DateTimeParserBucket {
        DateTimeParserBucket::new(0, chronology, Arc::new(ShortMonths), BucketOptions::default())
    }

    #[test]
    fn fields_apply_widest_first() {
        let chronology = gregorian();
        let mut parsed = bucket(chronology.clone());
        parsed.save_field(F::DayOfMonth, 29);
        parsed.save_field(F::HourOfDay, 6);
        parsed.save_field(F::MonthOfYear, 2);
        parsed.save_field(F::Year, 2004);
        let expected = chronology
            .date_time_millis_full(2004, 2, 29, 6, 0, 0, 0)
            .unwrap();
        assert_eq!(parsed.compute_millis().unwrap(), expected);
    }

    #[test]
    fn day_without_year_uses_default_year() {
        let mut parsed = bucket(gregorian());
        parsed.save_field_text(F::MonthOfYear, "feb");
        parsed.save_field(F::DayOfMonth, 29);
        let leap_day = Y2000 + 59 * crate::MILLIS_PER_DAY;
        assert_eq!(parsed.compute_millis().unwrap(), leap_day);

        // A bare time of day keeps the year of the base instant.
        let mut parsed = bucket(gregorian());
        parsed.save_field(F::HourOfDay, 5);
        assert_eq!(parsed.compute_millis().unwrap(), 5 * MILLIS_PER_HOUR);

        let mut parsed = DateTimeParserBucket::new(
            0,
            gregorian(),
            Arc::new(NumericSymbols),
            BucketOptions::new(Some(1950), 1999),
        );
        assert_eq!(parsed.pivot_year(), Some(1950));
        parsed.save_field(F::DayOfMonth, 15);
        let instant = parsed.compute_millis().unwrap();
        assert_eq!(gregorian().year().get(instant).unwrap(), 1999);
        assert_eq!(gregorian().day_of_month().get(instant).unwrap(), 15);
    }

    #[test]
    fn reset_fields_round_down() {
        let mut parsed = DateTimeParserBucket::new(
            Y2000 + 7 * MILLIS_PER_HOUR + 1234,
            gregorian(),
            Arc::new(NumericSymbols),
            BucketOptions::default(),
        );
        parsed.save_field(F::Year, 2001);
        assert_eq!(
            parsed.compute_millis_with(true, Some("2001")).unwrap(),
            gregorian().date_time_millis(2001, 1, 1, 0).unwrap()
        );
        parsed.reset();
        parsed.save_field(F::Year, 2001);
        assert_eq!(
            parsed.compute_millis().unwrap(),
            gregorian()
                .date_time_millis(2001, 1, 1, (7 * MILLIS_PER_HOUR + 1234) as i32)
                .unwrap()
        );
    }

    #[test]
    fn errors_quote_the_text() {
        let mut parsed = bucket(gregorian());
        parsed.save_field(F::Year, 2001);
        parsed.save_field(F::MonthOfYear, 2);
        parsed.save_field(F::DayOfMonth, 29);
        let err = parsed.compute_millis_with(false, Some("2001-02-29")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalFieldValue);
        assert!(err.message().starts_with("Cannot parse \"2001-02-29\""));
        assert_eq!(err.field(), Some(F::DayOfMonth.into()));

        let mut parsed = bucket(gregorian());
        parsed.save_field_text(F::MonthOfYear, "Foo");
        let err = parsed.compute_millis().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalFieldValue);
    }

    #[test]
    fn offset_and_zone_resolution() {
        let plus_two = Arc::new(FixedOffsetZone::from_hours_minutes(2, 0).unwrap());
        let zoned = GregorianChronology::instance(plus_two).unwrap();
        let mut parsed = bucket(zoned);
        assert_eq!(parsed.zone().map(|z| z.id().to_owned()).as_deref(), Some("+02:00"));
        parsed.save_field(F::Year, 2000);
        assert_eq!(parsed.compute_millis().unwrap(), Y2000 - 2 * MILLIS_PER_HOUR);

        // A parsed offset wins over the zone.
        parsed.set_offset(Some(-(MILLIS_PER_HOUR as i32)));
        assert_eq!(parsed.compute_millis().unwrap(), Y2000 + MILLIS_PER_HOUR);

        parsed.set_offset(None);
        parsed.set_zone(None);
        assert_eq!(parsed.compute_millis().unwrap(), Y2000);

        parsed.reset();
        assert_eq!(parsed.offset(), None);
        assert!(parsed.zone().is_some());
    }

    #[test]
    fn states_roll_back() {
        let mut parsed = bucket(gregorian());
        parsed.save_field(F::Year, 2000);
        let checkpoint = parsed.save_state();
        assert!(Arc::ptr_eq(&checkpoint.fields, &parsed.save_state().fields));

        parsed.save_field(F::MonthOfYear, 6);
        parsed.set_offset(Some(1000));
        assert!(parsed.restore_state(&checkpoint));
        assert_eq!(parsed.offset(), None);
        assert_eq!(parsed.compute_millis().unwrap(), Y2000);

        // The checkpoint survives later branches.
        parsed.save_field(F::MonthOfYear, 3);
        assert!(parsed.restore_state(&checkpoint));
        assert_eq!(parsed.compute_millis().unwrap(), Y2000);

        let mut other = bucket(gregorian());
        assert!(!other.restore_state(&checkpoint));
    }
}
