//! Overlap resolution within a zone.
//!
//! Blocks in one zone may overlap. At any instant the active block with the
//! greatest `(start, id)` wins: a block starting later covers the blocks it
//! overlaps until it ends, after which the earlier block shows again if it
//! is still running.
//!
//! The sweep visits every block boundary once and keeps the running blocks in
//! a max-heap keyed by `(start, id)`. Expired blocks are discarded lazily when
//! they reach the top, so resolution is O(n log n).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gc_common::GlyphBlock;

use crate::types::ActiveInterval;

/// Heap entry ordered by the block's `(start, id)` priority.
struct Running<'a> {
    block: &'a GlyphBlock,
}

impl PartialEq for Running<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Running<'_> {}

impl PartialOrd for Running<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Running<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.block.timeline_cmp(other.block)
    }
}

/// Resolve one zone's blocks into non-overlapping, time-ordered intervals.
///
/// Blocks with a non-finite start, or a non-positive or non-finite duration,
/// emit nothing. Adjacent pieces of the same block are merged.
pub fn resolve_zone(blocks: &[GlyphBlock]) -> Vec<ActiveInterval> {
    let mut ordered: Vec<&GlyphBlock> = blocks
        .iter()
        .filter(|b| {
            b.start_time_millis.is_finite()
                && b.duration_millis.is_finite()
                && b.duration_millis > 0.0
        })
        .collect();
    ordered.sort_by(|a, b| a.timeline_cmp(b));

    let mut boundaries: Vec<f64> = ordered
        .iter()
        .flat_map(|b| [b.start_time_millis, b.end_millis()])
        .collect();
    boundaries.sort_by(f64::total_cmp);
    boundaries.dedup();

    let mut intervals: Vec<ActiveInterval> = Vec::new();
    let mut heap: BinaryHeap<Running<'_>> = BinaryHeap::new();
    let mut next = 0;

    for window in boundaries.windows(2) {
        let (from, to) = (window[0], window[1]);

        while next < ordered.len() && ordered[next].start_time_millis <= from {
            heap.push(Running {
                block: ordered[next],
            });
            next += 1;
        }
        while heap.peek().is_some_and(|top| top.block.end_millis() <= from) {
            heap.pop();
        }

        let Some(top) = heap.peek() else {
            continue;
        };
        let winner = top.block;
        match intervals.last_mut() {
            Some(last) if last.block_id == winner.id && last.end_millis == from => {
                last.end_millis = to;
            }
            _ => intervals.push(ActiveInterval::from_block(winner, from, to)),
        }
    }

    intervals
}
