//! Per-era validator cache.
//!
//! Finished eras are immutable on chain, so their entries never expire. The
//! active era keeps accumulating reward points; its entry is only served for
//! `ttl` after insertion. Capacity is bounded with LRU eviction.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::types::EraIndex;
use crate::validator::Validator;

/// Default number of eras kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Default lifetime of the active era's entry.
pub const DEFAULT_ACTIVE_ERA_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    validators: Vec<Validator>,
    inserted_at: Instant,
}

#[derive(Debug)]
pub struct EraCache {
    entries: LruCache<EraIndex, CacheEntry>,
    ttl: Duration,
}

impl Default for EraCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_ACTIVE_ERA_TTL)
    }
}

impl EraCache {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Fresh, non-empty validator list for `era`.
    ///
    /// `active_era` is the chain's current era, if known. Without it every
    /// entry is treated as possibly live and subject to the TTL.
    pub fn get(
        &mut self,
        era: EraIndex,
        active_era: Option<EraIndex>,
        now: Instant,
    ) -> Option<Vec<Validator>> {
        let ttl = self.ttl;
        let entry = self.entries.get(&era)?;
        if entry.validators.is_empty() {
            return None;
        }
        let is_final = active_era.is_some_and(|active| era < active);
        if !is_final && now.saturating_duration_since(entry.inserted_at) >= ttl {
            return None;
        }
        Some(entry.validators.clone())
    }

    pub fn insert(&mut self, era: EraIndex, validators: Vec<Validator>, now: Instant) {
        self.entries.put(
            era,
            CacheEntry {
                validators,
                inserted_at: now,
            },
        );
    }

    /// Drop the entry for `era`. Returns whether one existed.
    pub fn invalidate(&mut self, era: EraIndex) -> bool {
        self.entries.pop(&era).is_some()
    }

    pub fn contains(&self, era: EraIndex) -> bool {
        self.entries.contains(&era)
    }

    /// Cached eras, ascending.
    pub fn eras(&self) -> Vec<EraIndex> {
        let mut eras: Vec<EraIndex> = self.entries.iter().map(|(era, _)| *era).collect();
        eras.sort_unstable();
        eras
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
