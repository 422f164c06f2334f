//! Default algorithms shared by every date-time field.
//!
//! These are the bodies of the trait's provided methods, kept callable so a
//! variant that overrides one operation can still reach the default of
//! another.

use crate::{
    fields::DateTimeFieldType,
    partial::ReadablePartial,
    utils::{safe_subtract, verify_value_bounds, wrapped_value},
    ChronoError, ChronoResult, ChronoUnwrap,
};

use super::{DateTimeField, DateTimeFieldRef};

/// Returns the index of `kind` in `partial`.
pub(crate) fn index_in(partial: &dyn ReadablePartial, kind: DateTimeFieldType) -> ChronoResult<usize> {
    partial.index_of(kind).ok_or_else(|| {
        ChronoError::invalid_argument()
            .with_message(format!("Field '{kind}' is not supported by the partial"))
    })
}

/// Verifies that `values` matches `partial` and `index` addresses one of
/// its fields.
pub(crate) fn check_index(
    partial: &dyn ReadablePartial,
    index: usize,
    values: &[i32],
) -> ChronoResult<()> {
    if values.len() != partial.size() || index >= values.len() {
        return Err(ChronoError::invalid_argument()
            .with_message("Field index out of range for the partial"));
    }
    Ok(())
}

/// Returns the number of digits needed to render values up to `max`.
pub(crate) fn digit_count(max: i32) -> usize {
    match max {
        0..=9 => 1,
        10..=99 => 2,
        100..=999 => 3,
        _ => max.to_string().len(),
    }
}

/// Looks up the next larger field of a partial on first use, checking that
/// it is the unit `field` is a remainder of.
fn larger_field<'a, F: DateTimeField + ?Sized>(
    field: &F,
    partial: &dyn ReadablePartial,
    index: usize,
    slot: &'a mut Option<DateTimeFieldRef>,
) -> ChronoResult<&'a DateTimeFieldRef> {
    if slot.is_none() {
        if index == 0 {
            return Err(ChronoError::invalid_argument().with_message("Maximum value exceeded for add"));
        }
        let next = partial.field(index - 1);
        let range = field.range_duration_field().map(|f| f.field_type());
        if range != Some(next.duration_field().field_type()) {
            return Err(ChronoError::invalid_argument().with_message("Fields invalid for add"));
        }
        *slot = Some(next);
    }
    slot.as_ref().chrono_unwrap()
}

/// Adds to a partial one unit at a time at the boundaries, carrying into the
/// next larger field. With `wrap`, the largest field wraps around instead of
/// failing.
pub(crate) fn add_partial<F: DateTimeField + ?Sized>(
    field: &F,
    partial: &dyn ReadablePartial,
    index: usize,
    values: &mut [i32],
    value: i32,
    wrap: bool,
) -> ChronoResult<()> {
    if value == 0 {
        return Ok(());
    }
    check_index(partial, index, values)?;

    let mut next: Option<DateTimeFieldRef> = None;
    let mut remaining = i64::from(value);

    while remaining > 0 {
        let max = i64::from(field.maximum_value_for_values(partial, values)?);
        let current = i64::from(values[index]);
        if current + remaining <= max {
            values[index] = (current + remaining) as i32;
            break;
        }
        remaining -= (max + 1 - current).max(1);
        if wrap && index == 0 {
            values[index] = field.minimum_value_for_values(partial, values)?;
            continue;
        }
        let larger = larger_field(field, partial, index, &mut next)?;
        if wrap {
            larger.add_wrap_partial(partial, index - 1, values, 1)?;
        } else {
            larger.add_partial(partial, index - 1, values, 1)?;
        }
        values[index] = field.minimum_value_for_values(partial, values)?;
    }

    while remaining < 0 {
        let min = i64::from(field.minimum_value_for_values(partial, values)?);
        let current = i64::from(values[index]);
        if current + remaining >= min {
            values[index] = (current + remaining) as i32;
            break;
        }
        remaining -= (min - 1 - current).min(-1);
        if wrap && index == 0 {
            values[index] = field.maximum_value_for_values(partial, values)?;
            continue;
        }
        let larger = larger_field(field, partial, index, &mut next)?;
        if wrap {
            larger.add_wrap_partial(partial, index - 1, values, -1)?;
        } else {
            larger.add_partial(partial, index - 1, values, -1)?;
        }
        values[index] = field.maximum_value_for_values(partial, values)?;
    }

    field.set_partial(partial, index, values, values[index])
}

/// Sets one value of a partial, then pulls every smaller field back into its
/// bounds given the new values.
pub(crate) fn set_partial<F: DateTimeField + ?Sized>(
    field: &F,
    partial: &dyn ReadablePartial,
    index: usize,
    values: &mut [i32],
    value: i32,
) -> ChronoResult<()> {
    check_index(partial, index, values)?;
    verify_value_bounds(
        field.field_type(),
        value.into(),
        field.minimum_value_for_values(partial, values)?.into(),
        field.maximum_value_for_values(partial, values)?.into(),
    )?;
    values[index] = value;
    for i in index + 1..values.len() {
        let smaller = partial.field(i);
        let max = smaller.maximum_value_for_values(partial, values)?;
        if values[i] > max {
            values[i] = max;
        }
        let min = smaller.minimum_value_for_values(partial, values)?;
        if values[i] < min {
            values[i] = min;
        }
    }
    Ok(())
}

pub(crate) fn add_wrap_field<F: DateTimeField + ?Sized>(
    field: &F,
    instant: i64,
    value: i32,
) -> ChronoResult<i64> {
    let current = field.get(instant)?;
    let wrapped = wrapped_value(
        current,
        value,
        field.minimum_value_at(instant)?,
        field.maximum_value_at(instant)?,
    )?;
    field.set(instant, wrapped)
}

pub(crate) fn add_wrap_field_partial<F: DateTimeField + ?Sized>(
    field: &F,
    partial: &dyn ReadablePartial,
    index: usize,
    values: &mut [i32],
    value: i32,
) -> ChronoResult<()> {
    check_index(partial, index, values)?;
    let wrapped = wrapped_value(
        values[index],
        value,
        field.minimum_value_for_partial(partial)?,
        field.maximum_value_for_partial(partial)?,
    )?;
    field.set_partial(partial, index, values, wrapped)
}

pub(crate) fn round_ceiling<F: DateTimeField + ?Sized>(field: &F, instant: i64) -> ChronoResult<i64> {
    let floor = field.round_floor(instant)?;
    if floor == instant {
        return Ok(instant);
    }
    field.add(floor, 1)
}

/// Returns the floor, the ceiling and the distance of `instant` from each.
fn bracket<F: DateTimeField + ?Sized>(field: &F, instant: i64) -> ChronoResult<(i64, i64, i64, i64)> {
    let floor = field.round_floor(instant)?;
    let ceiling = field.round_ceiling(instant)?;
    let from_floor = safe_subtract(instant, floor)?;
    let to_ceiling = safe_subtract(ceiling, instant)?;
    Ok((floor, ceiling, from_floor, to_ceiling))
}

pub(crate) fn round_half_floor<F: DateTimeField + ?Sized>(field: &F, instant: i64) -> ChronoResult<i64> {
    let (floor, ceiling, from_floor, to_ceiling) = bracket(field, instant)?;
    Ok(if from_floor <= to_ceiling { floor } else { ceiling })
}

pub(crate) fn round_half_ceiling<F: DateTimeField + ?Sized>(
    field: &F,
    instant: i64,
) -> ChronoResult<i64> {
    let (floor, ceiling, from_floor, to_ceiling) = bracket(field, instant)?;
    Ok(if to_ceiling <= from_floor { ceiling } else { floor })
}

pub(crate) fn round_half_even<F: DateTimeField + ?Sized>(field: &F, instant: i64) -> ChronoResult<i64> {
    let (floor, ceiling, from_floor, to_ceiling) = bracket(field, instant)?;
    match from_floor.cmp(&to_ceiling) {
        core::cmp::Ordering::Less => Ok(floor),
        core::cmp::Ordering::Greater => Ok(ceiling),
        core::cmp::Ordering::Equal if field.get(ceiling)? & 1 == 0 => Ok(ceiling),
        core::cmp::Ordering::Equal => Ok(floor),
    }
}

pub(crate) fn remainder<F: DateTimeField + ?Sized>(field: &F, instant: i64) -> ChronoResult<i64> {
    safe_subtract(instant, field.round_floor(instant)?)
}
