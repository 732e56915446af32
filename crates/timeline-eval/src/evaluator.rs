//! Timeline sampling: what each zone emits at a given time.
//!
//! The sampling process:
//! 1. Resolve every zone's overlaps into non-overlapping intervals.
//! 2. For each bucket `i`, look up the interval active at `i * bucket_millis`.
//! 3. Collect the results into a zone-by-bucket `SampleGrid`.

use gc_common::{TimelineDocument, ZoneId, MAX_ZONE_ROWS};

use crate::error::TimelineEvalError;
use crate::resolve::resolve_zone;
use crate::types::{ActiveInterval, BucketSample, SampleGrid};

/// Interval active at `time_millis`, if any.
///
/// `intervals` must be time-ordered and non-overlapping, as produced by
/// [`resolve_zone`].
pub fn sample_at(intervals: &[ActiveInterval], time_millis: f64) -> Option<&ActiveInterval> {
    let index = intervals.partition_point(|i| i.end_millis <= time_millis);
    intervals.get(index).filter(|i| i.is_active_at(time_millis))
}

/// What every zone row emits at `time_millis`, up to [`MAX_ZONE_ROWS`] rows.
pub fn evaluate(doc: &TimelineDocument, time_millis: f64) -> Vec<Option<BucketSample>> {
    (0..doc.zone_rows().min(MAX_ZONE_ROWS))
        .map(|zone| {
            let intervals = resolve_zone(doc.lane(zone));
            sample_at(&intervals, time_millis).map(ActiveInterval::sample)
        })
        .collect()
}

/// Largest number of buckets a single sampling pass may produce.
pub const MAX_BUCKETS: usize = 1 << 20;

/// Number of buckets needed to cover `duration_millis`.
///
/// Fails with [`TimelineEvalError::TooManyBuckets`] when the count would
/// exceed [`MAX_BUCKETS`].
pub fn bucket_count(duration_millis: f64, bucket_millis: f64) -> Result<usize, TimelineEvalError> {
    if !bucket_millis.is_finite() || bucket_millis <= 0.0 {
        return Err(TimelineEvalError::InvalidBucket {
            millis: bucket_millis,
        });
    }
    if !duration_millis.is_finite() || duration_millis <= 0.0 {
        return Err(TimelineEvalError::InvalidDuration {
            millis: duration_millis,
        });
    }
    let requested = (duration_millis / bucket_millis).ceil();
    if !requested.is_finite() || requested > MAX_BUCKETS as f64 {
        return Err(TimelineEvalError::TooManyBuckets {
            requested,
            max: MAX_BUCKETS,
        });
    }
    Ok(requested as usize)
}

/// Sample every zone row of `doc` once per bucket.
///
/// Bucket `i` is sampled at `i * bucket_millis`; a zone is idle in a bucket
/// when no block is active at that instant.
pub fn sample_document(
    doc: &TimelineDocument,
    bucket_millis: f64,
) -> Result<SampleGrid, TimelineEvalError> {
    let buckets = bucket_count(doc.audio_duration_millis, bucket_millis)?;
    let rows = doc.zone_rows();
    if rows > MAX_ZONE_ROWS {
        return Err(TimelineEvalError::TooManyZones {
            rows,
            max: MAX_ZONE_ROWS,
        });
    }
    let mut grid = SampleGrid::idle(bucket_millis, rows, buckets);

    for (zone, row) in grid.zones.iter_mut().enumerate() {
        let intervals = resolve_zone(doc.lane(zone as ZoneId));
        if intervals.is_empty() {
            continue;
        }
        for (bucket, slot) in row.iter_mut().enumerate() {
            let time = bucket as f64 * bucket_millis;
            *slot = sample_at(&intervals, time).map(ActiveInterval::sample);
        }
    }

    tracing::debug!(zones = rows, buckets, bucket_millis, "Timeline sampled");
    Ok(grid)
}
