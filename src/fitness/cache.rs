//! Fitness cache
//!
//! Memoizes cross-validation results per feature subset for one search run.
//! Concurrent evaluations share it; racing inserts of the same key keep the
//! last write.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Which part of the chromosome forms the cache key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyMode {
    /// Key on the feature mask only. Identical feature subsets under
    /// different hyperparameters share one entry.
    #[default]
    FeaturesOnly,
    /// Key on the whole chromosome, hyperparameter bits included
    FullChromosome,
}

/// Cached cross-validation summary
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedScore {
    /// Mean fold score
    pub mean: f64,
    /// Population standard deviation of the fold scores
    pub dispersion: f64,
}

/// Cache counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that fell through to scoring
    pub misses: usize,
    /// Distinct keys stored
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups that hit
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Concurrent score cache keyed by bit pattern
#[derive(Debug, Default)]
pub struct FitnessCache {
    entries: DashMap<Vec<bool>, CachedScore>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl FitnessCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, counting the hit or miss
    pub fn get(&self, key: &[bool]) -> Option<CachedScore> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(*entry.value())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a score, replacing any previous one
    pub fn insert(&self, key: Vec<bool>, score: CachedScore) {
        self.entries.insert(key, score);
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and reset the counters
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
