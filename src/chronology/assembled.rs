//! Chronology assembly: fields copied from a base, overridden by a hook and
//! committed into fixed slots.

use core::fmt;
use std::{borrow::Cow, sync::Arc};

use bitflags::bitflags;

use crate::{
    duration::DurationFieldRef,
    field::{DateTimeFieldRef, UnsupportedFieldCache},
    fields::{DateTimeFieldType, DurationFieldType},
    provider::ZoneRef,
    ChronoResult,
};

use super::{
    generic_date_time_millis, generic_date_time_millis_from, generic_date_time_millis_full,
    Chronology, ChronologyRef,
};

bitflags! {
    /// The composite operations an assembled chronology may hand to its base
    /// because the fields they touch were all inherited.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BaseFlags: u8 {
        /// hourOfDay, minuteOfHour, secondOfMinute and millisOfSecond.
        const TIME = 0b0000_0001;
        /// millisOfDay.
        const MILLIS_OF_DAY = 0b0000_0010;
        /// year, monthOfYear and dayOfMonth.
        const DATE = 0b0000_0100;
    }
}

const TIME_GROUP: [DateTimeFieldType; 4] = [
    DateTimeFieldType::HourOfDay,
    DateTimeFieldType::MinuteOfHour,
    DateTimeFieldType::SecondOfMinute,
    DateTimeFieldType::MillisOfSecond,
];

const DATE_GROUP: [DateTimeFieldType; 3] = [
    DateTimeFieldType::Year,
    DateTimeFieldType::MonthOfYear,
    DateTimeFieldType::DayOfMonth,
];

/// The mutable field container handed to an assembly hook.
///
/// Starts out holding every supported field of the base chronology. A slot
/// written by the hook stops counting as inherited, even when the hook
/// writes back the base's own field.
#[derive(Debug, Default, Clone)]
pub struct Fields {
    durations: [Option<DurationFieldRef>; DurationFieldType::COUNT],
    date_times: [Option<DateTimeFieldRef>; DateTimeFieldType::COUNT],
    inherited_durations: [bool; DurationFieldType::COUNT],
    inherited_date_times: [bool; DateTimeFieldType::COUNT],
}

impl Fields {
    fn from_base(base: Option<&dyn Chronology>) -> Self {
        let mut fields = Self::default();
        let Some(base) = base else {
            return fields;
        };
        for kind in DurationFieldType::ALL {
            let field = base.duration_field(kind);
            if field.is_supported() {
                fields.durations[kind.index()] = Some(field);
                fields.inherited_durations[kind.index()] = true;
            }
        }
        for kind in DateTimeFieldType::ALL {
            let field = base.date_time_field(kind);
            if field.is_supported() {
                fields.date_times[kind.index()] = Some(field);
                fields.inherited_date_times[kind.index()] = true;
            }
        }
        fields
    }

    #[must_use]
    pub fn duration(&self, kind: DurationFieldType) -> Option<&DurationFieldRef> {
        self.durations[kind.index()].as_ref()
    }

    #[must_use]
    pub fn date_time(&self, kind: DateTimeFieldType) -> Option<&DateTimeFieldRef> {
        self.date_times[kind.index()].as_ref()
    }

    pub fn set_duration(&mut self, kind: DurationFieldType, field: DurationFieldRef) {
        self.durations[kind.index()] = Some(field);
        self.inherited_durations[kind.index()] = false;
    }

    pub fn set_date_time(&mut self, kind: DateTimeFieldType, field: DateTimeFieldRef) {
        self.date_times[kind.index()] = Some(field);
        self.inherited_date_times[kind.index()] = false;
    }

    /// Empties a slot so that it commits as unsupported.
    pub fn clear_date_time(&mut self, kind: DateTimeFieldType) {
        self.date_times[kind.index()] = None;
        self.inherited_date_times[kind.index()] = false;
    }

    /// Returns whether the slot still holds the base's field.
    #[must_use]
    pub fn is_inherited(&self, kind: DateTimeFieldType) -> bool {
        self.inherited_date_times[kind.index()]
    }

    #[must_use]
    pub fn is_duration_inherited(&self, kind: DurationFieldType) -> bool {
        self.inherited_durations[kind.index()]
    }

    fn flags(&self) -> BaseFlags {
        let mut flags = BaseFlags::empty();
        if TIME_GROUP.iter().all(|&kind| self.is_inherited(kind)) {
            flags |= BaseFlags::TIME;
        }
        if self.is_inherited(DateTimeFieldType::MillisOfDay) {
            flags |= BaseFlags::MILLIS_OF_DAY;
        }
        if DATE_GROUP.iter().all(|&kind| self.is_inherited(kind)) {
            flags |= BaseFlags::DATE;
        }
        flags
    }
}

/// A user supplied hook that overrides fields during assembly.
///
/// The hook runs again whenever the chronology is moved to another zone, so
/// it must produce the same fields for the same input.
pub type AssemblyHook = Arc<dyn Fn(&mut Fields) -> ChronoResult<()> + Send + Sync>;

/// A chronology whose fields are fixed at construction.
///
/// Every built-in calendar is an assembled chronology underneath; this type
/// is also the entry point for custom calendars layered over a base.
pub struct AssembledChronology {
    name: Cow<'static, str>,
    base: Option<ChronologyRef>,
    zone: ZoneRef,
    durations: [DurationFieldRef; DurationFieldType::COUNT],
    date_times: [DateTimeFieldRef; DateTimeFieldType::COUNT],
    flags: BaseFlags,
    hook: Option<AssemblyHook>,
}

impl AssembledChronology {
    /// Assembles a chronology over `base`, letting `hook` replace or add
    /// fields. The zone is the zone of the base.
    pub fn try_new(
        name: impl Into<Cow<'static, str>>,
        base: ChronologyRef,
        hook: AssemblyHook,
    ) -> ChronoResult<Self> {
        let zone = base.zone();
        let run = hook.clone();
        let mut assembled = Self::assemble(
            name.into(),
            Some(base),
            zone,
            UnsupportedFieldCache::global(),
            move |fields| run(fields),
        )?;
        assembled.hook = Some(hook);
        Ok(assembled)
    }

    /// Copies the fields of `base`, applies `build` and commits every empty
    /// slot as unsupported.
    pub(crate) fn assemble(
        name: Cow<'static, str>,
        base: Option<ChronologyRef>,
        zone: ZoneRef,
        cache: &UnsupportedFieldCache,
        build: impl FnOnce(&mut Fields) -> ChronoResult<()>,
    ) -> ChronoResult<Self> {
        let mut fields = Fields::from_base(base.as_deref());
        build(&mut fields)?;
        for kind in DateTimeFieldType::ALL {
            if let Some(field) = fields.date_time(kind) {
                crate::chrono_assert!(
                    field.field_type() == kind,
                    "{name}: {} installed in the {kind} slot",
                    field.field_type()
                );
            }
        }

        let flags = if base.is_some() {
            fields.flags()
        } else {
            BaseFlags::empty()
        };

        let durations: [DurationFieldRef; DurationFieldType::COUNT] = core::array::from_fn(|i| {
            fields.durations[i]
                .take()
                .unwrap_or_else(|| cache.duration(DurationFieldType::ALL[i]))
        });
        let date_times: [DateTimeFieldRef; DateTimeFieldType::COUNT] = core::array::from_fn(|i| {
            let kind = DateTimeFieldType::ALL[i];
            fields.date_times[i].take().unwrap_or_else(|| {
                cache.date_time(kind, durations[kind.duration_type().index()].clone())
            })
        });

        #[cfg(feature = "log")]
        log::debug!(
            "assembled {name} in {}: base {}, flags {flags:?}",
            zone.id(),
            base.as_ref().map_or("none", |b| b.name()),
        );

        Ok(Self {
            name,
            base,
            zone,
            durations,
            date_times,
            flags,
            hook: None,
        })
    }

    /// Returns the chronology this one was assembled over, if any.
    #[must_use]
    pub fn base(&self) -> Option<&ChronologyRef> {
        self.base.as_ref()
    }

    /// Returns which composite operations are handed to the base.
    #[must_use]
    pub fn flags(&self) -> BaseFlags {
        self.flags
    }

    /// Returns the base when every field behind `required` was inherited.
    pub(crate) fn fast_path(&self, required: BaseFlags) -> Option<&ChronologyRef> {
        self.base
            .as_ref()
            .filter(|_| self.flags.contains(required))
    }

    fn rebased(&self, base: ChronologyRef) -> ChronoResult<Self> {
        let zone = base.zone();
        let hook = self.hook.clone();
        let mut assembled = Self::assemble(
            self.name.clone(),
            Some(base),
            zone,
            UnsupportedFieldCache::global(),
            |fields| match &hook {
                Some(hook) => hook(fields),
                None => Ok(()),
            },
        )?;
        assembled.hook = self.hook.clone();
        Ok(assembled)
    }
}

impl fmt::Debug for AssembledChronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssembledChronology")
            .field("name", &self.name)
            .field("zone", &self.zone.id())
            .field("base", &self.base.as_ref().map(|b| b.name().to_owned()))
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AssembledChronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.zone.id())
    }
}

impl Chronology for AssembledChronology {
    fn name(&self) -> &str {
        &self.name
    }

    fn zone(&self) -> ZoneRef {
        self.zone.clone()
    }

    fn with_utc(self: Arc<Self>) -> ChronologyRef {
        if self.zone.is_utc() {
            return self;
        }
        let Some(base) = self.base.clone() else {
            return self;
        };
        let utc = base.with_utc();
        match self.rebased(utc.clone()) {
            Ok(assembled) => Arc::new(assembled),
            Err(_err) => {
                #[cfg(feature = "log")]
                log::error!("reassembling {} in UTC failed: {_err}", self.name);
                utc
            }
        }
    }

    fn with_zone(self: Arc<Self>, zone: ZoneRef) -> ChronoResult<ChronologyRef> {
        if zone.id() == self.zone.id() {
            return Ok(self);
        }
        let Some(base) = self.base.clone() else {
            return Ok(self);
        };
        Ok(Arc::new(self.rebased(base.with_zone(zone)?)?))
    }

    fn duration_field(&self, kind: DurationFieldType) -> DurationFieldRef {
        self.durations[kind.index()].clone()
    }

    fn date_time_field(&self, kind: DateTimeFieldType) -> DateTimeFieldRef {
        self.date_times[kind.index()].clone()
    }

    fn date_time_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> ChronoResult<i64> {
        match self.fast_path(BaseFlags::DATE | BaseFlags::MILLIS_OF_DAY) {
            Some(base) => base.date_time_millis(year, month, day, millis_of_day),
            None => generic_date_time_millis(self, year, month, day, millis_of_day),
        }
    }

    fn date_time_millis_full(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> ChronoResult<i64> {
        match self.fast_path(BaseFlags::DATE | BaseFlags::TIME) {
            Some(base) => {
                base.date_time_millis_full(year, month, day, hour, minute, second, millis)
            }
            None => generic_date_time_millis_full(
                self, year, month, day, hour, minute, second, millis,
            ),
        }
    }

    fn date_time_millis_from(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> ChronoResult<i64> {
        match self.fast_path(BaseFlags::TIME) {
            Some(base) => base.date_time_millis_from(instant, hour, minute, second, millis),
            None => generic_date_time_millis_from(self, instant, hour, minute, second, millis),
        }
    }
}
