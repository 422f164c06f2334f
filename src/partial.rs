//! The partial instant and period value carriers.
//!
//! Fields read and write partials only through the index protocol of
//! [`ReadablePartial`]: a size, and per index a field type and a value.
//! [`Partial`] is the simple carrier used by the library and its tests.

use core::fmt;

use crate::{
    chronology::{Chronology, ChronologyRef},
    duration::compare_reverse,
    field::DateTimeFieldRef,
    fields::{DateTimeFieldType, DurationFieldType},
    ChronoError, ChronoResult,
};

/// An ordered, possibly incomplete set of field values.
///
/// Field types are ordered from the largest unit to the smallest.
pub trait ReadablePartial: fmt::Debug {
    /// Returns the number of fields.
    fn size(&self) -> usize;

    /// Returns the field type at `index`.
    fn field_type(&self, index: usize) -> DateTimeFieldType;

    /// Returns the value at `index`.
    fn value(&self, index: usize) -> i32;

    /// Returns the chronology the values are expressed in.
    fn chronology(&self) -> &dyn Chronology;

    /// Returns the field at `index` in this partial's chronology.
    fn field(&self, index: usize) -> DateTimeFieldRef {
        self.chronology().date_time_field(self.field_type(index))
    }

    /// Returns the index of `kind`, if present.
    fn index_of(&self, kind: DateTimeFieldType) -> Option<usize> {
        (0..self.size()).find(|&i| self.field_type(i) == kind)
    }

    /// Returns whether `kind` is present.
    fn contains(&self, kind: DateTimeFieldType) -> bool {
        self.index_of(kind).is_some()
    }

    /// Returns all values in field order.
    fn values(&self) -> Vec<i32> {
        (0..self.size()).map(|i| self.value(i)).collect()
    }
}

/// An ordered set of duration amounts, e.g. "1 year, 2 months".
pub trait ReadablePeriod: fmt::Debug {
    /// Returns the number of units.
    fn size(&self) -> usize;

    /// Returns the unit at `index`.
    fn field_type(&self, index: usize) -> DurationFieldType;

    /// Returns the amount at `index`.
    fn value(&self, index: usize) -> i32;

    /// Returns the index of `kind`, if present.
    fn index_of(&self, kind: DurationFieldType) -> Option<usize> {
        (0..self.size()).find(|&i| self.field_type(i) == kind)
    }

    /// Returns the amount of `kind`, zero when absent.
    fn get(&self, kind: DurationFieldType) -> i32 {
        self.index_of(kind).map_or(0, |i| self.value(i))
    }
}

/// Returns whether each field of `partial` is measured in the range unit of
/// the field before it, e.g. year, monthOfYear, dayOfMonth.
#[must_use]
pub fn is_contiguous(partial: &dyn ReadablePartial) -> bool {
    (1..partial.size()).all(|i| {
        partial.field_type(i).range_duration_type()
            == Some(partial.field_type(i - 1).duration_type())
    })
}

// ==== Partial ====

/// A validated partial instant in a zone-less chronology.
#[derive(Debug, Clone)]
pub struct Partial {
    chronology: ChronologyRef,
    types: Vec<DateTimeFieldType>,
    values: Vec<i32>,
}

impl Partial {
    /// Creates a partial with no fields.
    #[must_use]
    pub fn empty(chronology: ChronologyRef) -> Self {
        Self {
            chronology: chronology.with_utc(),
            types: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates a partial from parallel type and value lists.
    ///
    /// Types must be ordered largest first with no duplicates, and the
    /// values must be legal both on their own and together.
    pub fn try_new(
        chronology: ChronologyRef,
        types: Vec<DateTimeFieldType>,
        values: Vec<i32>,
    ) -> ChronoResult<Self> {
        if types.len() != values.len() {
            return Err(ChronoError::invalid_argument()
                .with_message("Values array must be the same length as the types array"));
        }
        let chronology = chronology.with_utc();
        check_order(chronology.as_ref(), &types)?;
        let partial = Self {
            chronology,
            types,
            values,
        };
        partial.chronology.validate(&partial, &partial.values)?;
        Ok(partial)
    }

    /// Creates a single field partial.
    pub fn single(
        chronology: ChronologyRef,
        kind: DateTimeFieldType,
        value: i32,
    ) -> ChronoResult<Self> {
        Self::try_new(chronology, vec![kind], vec![value])
    }

    /// Returns the field types in order.
    #[must_use]
    pub fn types(&self) -> &[DateTimeFieldType] {
        &self.types
    }

    /// Returns the shared chronology handle.
    #[must_use]
    pub fn chronology_ref(&self) -> &ChronologyRef {
        &self.chronology
    }

    /// Returns the value of `kind`.
    pub fn get(&self, kind: DateTimeFieldType) -> ChronoResult<i32> {
        let index = self.index_or_err(kind)?;
        Ok(self.values[index])
    }

    fn index_or_err(&self, kind: DateTimeFieldType) -> ChronoResult<usize> {
        self.index_of(kind).ok_or_else(|| {
            ChronoError::invalid_argument()
                .with_message(format!("Field '{kind}' is not supported"))
        })
    }

    fn with_values(&self, values: Vec<i32>) -> ChronoResult<Self> {
        let partial = Self {
            chronology: self.chronology.clone(),
            types: self.types.clone(),
            values,
        };
        self.chronology.validate(&partial, &partial.values)?;
        Ok(partial)
    }

    /// Returns a copy with `kind` set to `value`, inserting the field in
    /// order if it is not present.
    pub fn with(&self, kind: DateTimeFieldType, value: i32) -> ChronoResult<Self> {
        if self.contains(kind) {
            return self.with_field(kind, value);
        }
        let unit = kind.duration_type().field(self.chronology.as_ref());
        let insert_at = self
            .types
            .iter()
            .position(|t| {
                let other = t.duration_type().field(self.chronology.as_ref());
                match unit.compare_unit(other.as_ref()) {
                    core::cmp::Ordering::Greater => true,
                    core::cmp::Ordering::Less => false,
                    core::cmp::Ordering::Equal => {
                        let this_range = kind
                            .range_duration_type()
                            .map(|r| r.field(self.chronology.as_ref()));
                        let other_range = t
                            .range_duration_type()
                            .map(|r| r.field(self.chronology.as_ref()));
                        compare_reverse(this_range.as_deref(), other_range.as_deref())
                            == core::cmp::Ordering::Less
                    }
                }
            })
            .unwrap_or(self.types.len());

        let mut types = self.types.clone();
        let mut values = self.values.clone();
        types.insert(insert_at, kind);
        values.insert(insert_at, value);
        Self::try_new(self.chronology.clone(), types, values)
    }

    /// Returns a copy without `kind`.
    pub fn without(&self, kind: DateTimeFieldType) -> ChronoResult<Self> {
        let Some(index) = self.index_of(kind) else {
            return Ok(self.clone());
        };
        let mut types = self.types.clone();
        let mut values = self.values.clone();
        types.remove(index);
        values.remove(index);
        Self::try_new(self.chronology.clone(), types, values)
    }

    /// Returns a copy with the present field `kind` set to `value`, clamping
    /// the smaller fields.
    pub fn with_field(&self, kind: DateTimeFieldType, value: i32) -> ChronoResult<Self> {
        let index = self.index_or_err(kind)?;
        if self.values[index] == value {
            return Ok(self.clone());
        }
        let mut values = self.values.clone();
        self.field(index).set_partial(self, index, &mut values, value)?;
        self.with_values(values)
    }

    /// Returns a copy with `amount` added to `kind`, carrying into larger
    /// fields and failing when the largest field overflows.
    pub fn with_field_added(&self, kind: DateTimeFieldType, amount: i32) -> ChronoResult<Self> {
        let index = self.index_or_err(kind)?;
        if amount == 0 {
            return Ok(self.clone());
        }
        let mut values = self.values.clone();
        self.field(index).add_partial(self, index, &mut values, amount)?;
        self.with_values(values)
    }

    /// Returns a copy with `amount` added to `kind`, carrying into larger
    /// fields and wrapping the largest.
    pub fn with_field_add_wrapped(
        &self,
        kind: DateTimeFieldType,
        amount: i32,
    ) -> ChronoResult<Self> {
        let index = self.index_or_err(kind)?;
        if amount == 0 {
            return Ok(self.clone());
        }
        let mut values = self.values.clone();
        self.field(index)
            .add_wrap_partial(self, index, &mut values, amount)?;
        self.with_values(values)
    }

    /// Returns a copy with `amount` added to `kind`, wrapping within that
    /// field alone.
    pub fn with_field_wrapped(&self, kind: DateTimeFieldType, amount: i32) -> ChronoResult<Self> {
        let index = self.index_or_err(kind)?;
        let mut values = self.values.clone();
        self.field(index)
            .add_wrap_field_partial(self, index, &mut values, amount)?;
        self.with_values(values)
    }

    /// Returns a copy with every unit of `period` that names a field of this
    /// partial added `scalar` times. Units with no matching field are
    /// ignored.
    pub fn with_period_added(&self, period: &dyn ReadablePeriod, scalar: i32) -> ChronoResult<Self> {
        if scalar == 0 {
            return Ok(self.clone());
        }
        let mut values = self.values.clone();
        for i in 0..period.size() {
            let unit = period.field_type(i);
            let Some(index) = self
                .types
                .iter()
                .position(|t| t.duration_type() == unit)
            else {
                continue;
            };
            let amount = crate::utils::safe_multiply(period.value(i), scalar)?;
            self.field(index).add_partial(self, index, &mut values, amount)?;
        }
        self.with_values(values)
    }

    /// Resolves this partial against `base`, replacing the fields it names.
    pub fn resolve(&self, base: i64) -> ChronoResult<i64> {
        self.chronology.set_partial(self, base)
    }

    /// Returns whether every field of this partial matches `instant`.
    pub fn is_match(&self, instant: i64) -> ChronoResult<bool> {
        for (i, &value) in self.values.iter().enumerate() {
            if self.field(i).get(instant)? != value {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl ReadablePartial for Partial {
    fn size(&self) -> usize {
        self.types.len()
    }

    fn field_type(&self, index: usize) -> DateTimeFieldType {
        self.types[index]
    }

    fn value(&self, index: usize) -> i32 {
        self.values[index]
    }

    fn chronology(&self) -> &dyn Chronology {
        self.chronology.as_ref()
    }

    fn values(&self) -> Vec<i32> {
        self.values.clone()
    }
}

impl fmt::Display for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (kind, value)) in self.types.iter().zip(&self.values).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}={value}")?;
        }
        f.write_str("]")
    }
}

/// Checks that `types` runs from the largest unit to the smallest, using the
/// range unit to order fields of equal unit.
fn check_order(chronology: &dyn Chronology, types: &[DateTimeFieldType]) -> ChronoResult<()> {
    use core::cmp::Ordering;

    let order_error = |a: DateTimeFieldType, b: DateTimeFieldType| {
        ChronoError::invalid_argument().with_message(format!(
            "Types array must be in order largest-smallest: {a} < {b}"
        ))
    };
    let duplicate_error = |a: DateTimeFieldType, b: DateTimeFieldType| {
        ChronoError::invalid_argument()
            .with_message(format!("Types array must not contain duplicate: {a} and {b}"))
    };

    for pair in types.windows(2) {
        let (last, next) = (pair[0], pair[1]);
        let last_unit = last.duration_type().field(chronology);
        let next_unit = next.duration_type().field(chronology);
        match last_unit.compare_unit(next_unit.as_ref()) {
            Ordering::Less => return Err(order_error(last, next)),
            Ordering::Greater => continue,
            Ordering::Equal => {}
        }
        match (last.range_duration_type(), next.range_duration_type()) {
            (None, None) => return Err(duplicate_error(last, next)),
            (None, Some(_)) => {}
            (Some(_), None) => return Err(order_error(last, next)),
            (Some(last_range), Some(next_range)) => {
                let last_range = last_range.field(chronology);
                let next_range = next_range.field(chronology);
                match last_range.compare_unit(next_range.as_ref()) {
                    Ordering::Less => return Err(order_error(last, next)),
                    Ordering::Equal => return Err(duplicate_error(last, next)),
                    Ordering::Greater => {}
                }
            }
        }
    }
    Ok(())
}

// ==== Period ====

/// A simple list of duration amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Period {
    entries: Vec<(DurationFieldType, i32)>,
}

impl Period {
    /// Creates a period over `types` with every amount zero.
    #[must_use]
    pub fn zeroed(types: &[DurationFieldType]) -> Self {
        Self {
            entries: types.iter().map(|&t| (t, 0)).collect(),
        }
    }

    /// Creates a period from unit and amount pairs.
    #[must_use]
    pub fn from_entries(entries: Vec<(DurationFieldType, i32)>) -> Self {
        Self { entries }
    }

    /// A period of whole years.
    #[must_use]
    pub fn years(amount: i32) -> Self {
        Self::from_entries(vec![(DurationFieldType::Years, amount)])
    }

    /// A period of whole months.
    #[must_use]
    pub fn months(amount: i32) -> Self {
        Self::from_entries(vec![(DurationFieldType::Months, amount)])
    }

    /// A period of whole days.
    #[must_use]
    pub fn days(amount: i32) -> Self {
        Self::from_entries(vec![(DurationFieldType::Days, amount)])
    }

    /// Every unit down from years to millis, all zero.
    #[must_use]
    pub fn standard() -> Self {
        use DurationFieldType as D;
        Self::zeroed(&[
            D::Years,
            D::Months,
            D::Weeks,
            D::Days,
            D::Hours,
            D::Minutes,
            D::Seconds,
            D::Millis,
        ])
    }

    /// Returns the unit types in order.
    pub fn types(&self) -> impl Iterator<Item = DurationFieldType> + '_ {
        self.entries.iter().map(|(t, _)| *t)
    }

    /// Replaces every amount with `values`, which must match in length.
    pub fn set_values(&mut self, values: &[i32]) -> ChronoResult<()> {
        if values.len() != self.entries.len() {
            return Err(ChronoError::invalid_argument()
                .with_message("Values array must be the same length as the period"));
        }
        for (entry, &value) in self.entries.iter_mut().zip(values) {
            entry.1 = value;
        }
        Ok(())
    }

    /// Returns a copy with the amounts taken from `values`.
    pub fn with_values(&self, values: &[i32]) -> ChronoResult<Self> {
        let mut period = self.clone();
        period.set_values(values)?;
        Ok(period)
    }
}

impl ReadablePeriod for Period {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn field_type(&self, index: usize) -> DurationFieldType {
        self.entries[index].0
    }

    fn value(&self, index: usize) -> i32 {
        self.entries[index].1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("P")?;
        for (i, (kind, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value} {kind}")?;
        }
        Ok(())
    }
}
