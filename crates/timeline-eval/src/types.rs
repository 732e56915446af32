//! Evaluation output types: resolved intervals and the sampled bucket grid.

use gc_common::{BlockId, EffectId, GlyphBlock};
use serde::{Deserialize, Serialize};

/// A stretch of one zone during which a single block determines the output.
///
/// Intervals produced for a zone never overlap and are ordered by time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveInterval {
    pub start_millis: f64,
    /// Exclusive end.
    pub end_millis: f64,
    pub block_id: BlockId,
    pub effect_id: EffectId,
    pub effect_data: Vec<i32>,
}

impl ActiveInterval {
    /// The part `[start, end)` of `block`.
    pub fn from_block(block: &GlyphBlock, start_millis: f64, end_millis: f64) -> Self {
        Self {
            start_millis,
            end_millis,
            block_id: block.id,
            effect_id: block.effect_id,
            effect_data: block.effect_data.clone(),
        }
    }

    /// Returns `true` if this interval is active at the given time.
    pub fn is_active_at(&self, time_millis: f64) -> bool {
        time_millis >= self.start_millis && time_millis < self.end_millis
    }

    pub fn duration_millis(&self) -> f64 {
        self.end_millis - self.start_millis
    }

    /// The effect this interval emits.
    pub fn sample(&self) -> BucketSample {
        BucketSample {
            effect_id: self.effect_id,
            effect_data: self.effect_data.clone(),
        }
    }
}

/// Effect emitted by one zone in one bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSample {
    pub effect_id: EffectId,
    pub effect_data: Vec<i32>,
}

/// Zone-by-bucket matrix of samples. `None` means the zone is idle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleGrid {
    /// Bucket width in milliseconds.
    pub bucket_millis: f64,
    /// Number of buckets per zone.
    pub bucket_count: usize,
    /// One row per zone, each `bucket_count` long.
    pub zones: Vec<Vec<Option<BucketSample>>>,
}

impl SampleGrid {
    /// An all-idle grid.
    pub fn idle(bucket_millis: f64, zone_count: usize, bucket_count: usize) -> Self {
        Self {
            bucket_millis,
            bucket_count,
            zones: vec![vec![None; bucket_count]; zone_count],
        }
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Sample of `zone` in bucket `bucket`, `None` when idle or out of range.
    pub fn get(&self, zone: usize, bucket: usize) -> Option<&BucketSample> {
        self.zones.get(zone)?.get(bucket)?.as_ref()
    }

    pub fn is_active(&self, zone: usize, bucket: usize) -> bool {
        self.get(zone, bucket).is_some()
    }

    /// Number of non-idle buckets in `zone`.
    pub fn active_buckets(&self, zone: usize) -> usize {
        self.zones
            .get(zone)
            .map_or(0, |row| row.iter().filter(|s| s.is_some()).count())
    }

    /// Returns `true` if every zone is idle in every bucket.
    pub fn is_silent(&self) -> bool {
        self.zones.iter().flatten().all(Option::is_none)
    }

    /// Time at which bucket `index` is sampled.
    pub fn bucket_time(&self, index: usize) -> f64 {
        index as f64 * self.bucket_millis
    }
}
