//! Process-wide caches of chronology instances and derived year data.

use std::{
    hash::Hash,
    sync::{Arc, LazyLock, RwLock},
};

use rustc_hash::FxHashMap;

use crate::{options::MinDaysInFirstWeek, ChronoResult};

use super::{GregorianChronology, IsoChronology, JulianChronology};

// ==== YearInfoCache ====

const YEAR_CACHE_SIZE: usize = 1 << 10;
const YEAR_CACHE_MASK: i32 = (YEAR_CACHE_SIZE as i32) - 1;

#[derive(Debug, Clone, Copy)]
struct YearInfo {
    year: i32,
    first_day_millis: i64,
}

/// A direct mapped cache of the first millisecond of recently used years.
///
/// Slots are keyed by the low ten bits of the year and overwritten on
/// collision. A contended slot is skipped rather than waited on; the value
/// is cheap to recompute.
#[derive(Debug)]
pub struct YearInfoCache {
    slots: Box<[RwLock<Option<YearInfo>>]>,
}

impl Default for YearInfoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl YearInfoCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: (0..YEAR_CACHE_SIZE).map(|_| RwLock::new(None)).collect(),
        }
    }

    /// Returns the first millisecond of `year`, computing it on a miss.
    pub fn first_day_millis(&self, year: i32, compute: impl FnOnce(i32) -> i64) -> i64 {
        let slot = &self.slots[(year & YEAR_CACHE_MASK) as usize];
        if let Ok(guard) = slot.try_read() {
            if let Some(info) = *guard {
                if info.year == year {
                    return info.first_day_millis;
                }
            }
        }
        let first_day_millis = compute(year);
        if let Ok(mut guard) = slot.try_write() {
            *guard = Some(YearInfo {
                year,
                first_day_millis,
            });
        }
        first_day_millis
    }
}

// ==== ChronologyCache ====

type Keyed<K, V> = RwLock<FxHashMap<K, Arc<V>>>;

static GLOBAL: LazyLock<ChronologyCache> = LazyLock::new(ChronologyCache::new);

/// Chronology instances by zone id and week rule.
///
/// Lookups of the same key return the same instance for the life of the
/// cache. Two threads missing on the same key may both build an instance;
/// the first one inserted wins.
#[derive(Debug, Default)]
pub struct ChronologyCache {
    gregorian: Keyed<(String, MinDaysInFirstWeek), GregorianChronology>,
    julian: Keyed<(String, MinDaysInFirstWeek), JulianChronology>,
    iso: Keyed<String, IsoChronology>,
}

impl ChronologyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide cache.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    pub(crate) fn gregorian(
        &self,
        zone_id: &str,
        min_days: MinDaysInFirstWeek,
        build: impl FnOnce() -> ChronoResult<Arc<GregorianChronology>>,
    ) -> ChronoResult<Arc<GregorianChronology>> {
        get_or_build(&self.gregorian, (zone_id.to_owned(), min_days), build)
    }

    pub(crate) fn julian(
        &self,
        zone_id: &str,
        min_days: MinDaysInFirstWeek,
        build: impl FnOnce() -> ChronoResult<Arc<JulianChronology>>,
    ) -> ChronoResult<Arc<JulianChronology>> {
        get_or_build(&self.julian, (zone_id.to_owned(), min_days), build)
    }

    pub(crate) fn iso(
        &self,
        zone_id: &str,
        build: impl FnOnce() -> ChronoResult<Arc<IsoChronology>>,
    ) -> ChronoResult<Arc<IsoChronology>> {
        get_or_build(&self.iso, zone_id.to_owned(), build)
    }
}

fn get_or_build<K, V>(
    map: &Keyed<K, V>,
    key: K,
    build: impl FnOnce() -> ChronoResult<Arc<V>>,
) -> ChronoResult<Arc<V>>
where
    K: Eq + Hash + core::fmt::Debug,
{
    if let Ok(read) = map.read() {
        if let Some(found) = read.get(&key) {
            return Ok(found.clone());
        }
    }
    #[cfg(feature = "log")]
    log::trace!("chronology cache miss for {key:?}");
    let built = build()?;
    match map.write() {
        Ok(mut write) => Ok(write.entry(key).or_insert(built).clone()),
        Err(_) => Ok(built),
    }
}
