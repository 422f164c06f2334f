//! Dispatch of a rounding mode to the rounding operations of a field.

use crate::{field::DateTimeField, options::FieldRoundingMode, ChronoResult};

/// Rounds a single instant against the unit boundaries of one field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldRounder<'a> {
    field: &'a dyn DateTimeField,
    instant: i64,
}

impl<'a> FieldRounder<'a> {
    #[inline]
    pub(crate) fn new(field: &'a dyn DateTimeField, instant: i64) -> Self {
        Self { field, instant }
    }

    /// Returns the unit boundaries at or below and at or above the instant.
    pub(crate) fn bounds(&self) -> ChronoResult<(i64, i64)> {
        Ok((
            self.field.round_floor(self.instant)?,
            self.field.round_ceiling(self.instant)?,
        ))
    }

    #[inline]
    pub(crate) fn round(&self, mode: FieldRoundingMode) -> ChronoResult<i64> {
        match mode {
            FieldRoundingMode::Floor => self.field.round_floor(self.instant),
            FieldRoundingMode::Ceiling => self.field.round_ceiling(self.instant),
            FieldRoundingMode::HalfFloor => self.field.round_half_floor(self.instant),
            FieldRoundingMode::HalfCeiling => self.field.round_half_ceiling(self.instant),
            FieldRoundingMode::HalfEven => self.field.round_half_even(self.instant),
        }
    }
}

/// Rounds `instant` to a boundary of `field` with `mode`.
pub(crate) fn round_with(
    field: &dyn DateTimeField,
    instant: i64,
    mode: FieldRoundingMode,
) -> ChronoResult<i64> {
    FieldRounder::new(field, instant).round(mode)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::FieldRounder;
    use crate::{
        duration::PreciseDurationField,
        field::{DateTimeField, PreciseDateTimeField},
        fields::{DateTimeFieldType, DurationFieldType},
        options::FieldRoundingMode,
        MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
    };

    fn second_of_minute() -> PreciseDateTimeField {
        PreciseDateTimeField::try_new(
            DateTimeFieldType::SecondOfMinute,
            Arc::new(
                PreciseDurationField::try_new(DurationFieldType::Seconds, MILLIS_PER_SECOND)
                    .unwrap(),
            ),
            Arc::new(
                PreciseDurationField::try_new(DurationFieldType::Minutes, MILLIS_PER_MINUTE)
                    .unwrap(),
            ),
        )
        .unwrap()
    }

    #[test]
    fn modes_on_a_tie() {
        let field = second_of_minute();
        // 3.5 seconds: floor is second 3, ceiling second 4.
        let instant = 3 * MILLIS_PER_SECOND + 500;
        let rounder = FieldRounder::new(&field, instant);
        assert_eq!(rounder.bounds().unwrap(), (3000, 4000));
        assert_eq!(rounder.round(FieldRoundingMode::Floor).unwrap(), 3000);
        assert_eq!(rounder.round(FieldRoundingMode::Ceiling).unwrap(), 4000);
        assert_eq!(rounder.round(FieldRoundingMode::HalfFloor).unwrap(), 3000);
        assert_eq!(rounder.round(FieldRoundingMode::HalfCeiling).unwrap(), 4000);
        assert_eq!(rounder.round(FieldRoundingMode::HalfEven).unwrap(), 4000);

        // 2.5 seconds ties toward the even second 2.
        let rounder = FieldRounder::new(&field, 2500);
        assert_eq!(rounder.round(FieldRoundingMode::HalfEven).unwrap(), 2000);
    }

    #[test]
    fn negative_instants_round_down() {
        let field = second_of_minute();
        let rounder = FieldRounder::new(&field, -1);
        assert_eq!(rounder.bounds().unwrap(), (-1000, 0));
        assert_eq!(rounder.round(FieldRoundingMode::HalfFloor).unwrap(), 0);
        let on_boundary = FieldRounder::new(&field, -MILLIS_PER_HOUR);
        assert_eq!(on_boundary.bounds().unwrap(), (-MILLIS_PER_HOUR, -MILLIS_PER_HOUR));
        assert_eq!(field.remainder(-1).unwrap(), 999);
    }
}
