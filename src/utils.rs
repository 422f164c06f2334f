//! Overflow checked arithmetic and bounds helpers shared by every field.
//!
//! Each operation either returns the mathematically correct result or an
//! `Overflow` error; nothing here wraps silently.

use core::fmt::Display;

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedNeg, CheckedSub, ToPrimitive};

use crate::{error::FieldIdentity, ChronoError, ChronoResult};

#[inline]
fn overflow<T: Display>(a: T, op: &str, b: T) -> ChronoError {
    ChronoError::overflow().with_message(format!("The calculation caused an overflow: {a} {op} {b}"))
}

/// Negates the input, failing when the value is the minimum of its type.
#[inline]
pub fn safe_negate<T: CheckedNeg + Display + Copy>(value: T) -> ChronoResult<T> {
    value.checked_neg().ok_or_else(|| {
        ChronoError::overflow().with_message(format!("{value} cannot be negated"))
    })
}

/// Adds two values, failing on overflow.
#[inline]
pub fn safe_add<T: CheckedAdd + Display + Copy>(a: T, b: T) -> ChronoResult<T> {
    a.checked_add(&b).ok_or_else(|| overflow(a, "+", b))
}

/// Subtracts one value from another, failing on overflow.
#[inline]
pub fn safe_subtract<T: CheckedSub + Display + Copy>(a: T, b: T) -> ChronoResult<T> {
    a.checked_sub(&b).ok_or_else(|| overflow(a, "-", b))
}

/// Multiplies two values, failing on overflow.
#[inline]
pub fn safe_multiply<T: CheckedMul + Display + Copy>(a: T, b: T) -> ChronoResult<T> {
    a.checked_mul(&b).ok_or_else(|| overflow(a, "*", b))
}

/// Divides one value by another, failing on division by zero and on the one
/// overflowing case `MIN / -1`.
#[inline]
pub fn safe_divide<T: CheckedDiv + Display + Copy>(dividend: T, divisor: T) -> ChronoResult<T> {
    dividend
        .checked_div(&divisor)
        .ok_or_else(|| overflow(dividend, "/", divisor))
}

/// Casts an `i64` to an `i32`, failing if the value does not fit.
#[inline]
pub fn safe_to_int(value: i64) -> ChronoResult<i32> {
    value.to_i32().ok_or_else(|| {
        ChronoError::overflow().with_message(format!("Value cannot fit in an int: {value}"))
    })
}

/// Multiplies two `i64` values and narrows the product to an `i32`.
#[inline]
pub fn safe_multiply_to_int(a: i64, b: i64) -> ChronoResult<i32> {
    safe_to_int(safe_multiply(a, b)?)
}

/// Verifies that `value` lies within `[lower, upper]`, reporting the field
/// and both bounds when it does not.
#[inline]
pub fn verify_value_bounds(
    field: impl Into<FieldIdentity>,
    value: i64,
    lower: i64,
    upper: i64,
) -> ChronoResult<()> {
    if value < lower || value > upper {
        return Err(ChronoError::illegal_field_value(
            field,
            value,
            Some(lower),
            Some(upper),
        ));
    }
    Ok(())
}

/// Adds `wrap_value` to `current_value` and wraps the sum into the inclusive
/// range `[min, max]`.
#[inline]
pub fn wrapped_value(current_value: i32, wrap_value: i32, min: i32, max: i32) -> ChronoResult<i32> {
    wrap_into(i64::from(current_value) + i64::from(wrap_value), min, max)
}

/// Wraps `value` into the inclusive range `[min, max]`, as if the range
/// repeated endlessly in both directions.
pub fn wrap_into(value: i64, min: i32, max: i32) -> ChronoResult<i32> {
    if min >= max {
        return Err(ChronoError::invalid_argument().with_message("MIN > MAX"));
    }
    let wrap_range = i64::from(max) - i64::from(min) + 1;
    let wrapped = (value - i64::from(min)).rem_euclid(wrap_range) + i64::from(min);
    safe_to_int(wrapped)
}
