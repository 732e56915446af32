//! Timeline snapshot for undo/redo.
//!
//! `TimelineSnapshot` captures the zone lanes (blocks plus their selection
//! flags). Lanes are reference counted, so taking a snapshot clones the lane
//! map only; a lane is copied the first time the store mutates it afterwards.
//! Device, tempo, audio duration, modes and the clipboard are not part of a
//! snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use gc_common::{GlyphBlock, ZoneId};
use serde::{Deserialize, Serialize};

/// Blocks per zone, each lane ordered by `(start, id)`.
pub type Lanes = BTreeMap<ZoneId, Arc<Vec<GlyphBlock>>>;

/// A captured copy of every zone lane.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TimelineSnapshot {
    pub lanes: Lanes,
}

impl TimelineSnapshot {
    pub fn new(lanes: Lanes) -> Self {
        Self { lanes }
    }

    /// Total number of blocks in the snapshot.
    pub fn total_blocks(&self) -> usize {
        self.lanes.values().map(|lane| lane.len()).sum()
    }

    /// Returns `true` if both snapshots hold the same allocation for `zone`.
    pub fn shares_lane_with(&self, other: &Self, zone: ZoneId) -> bool {
        match (self.lanes.get(&zone), other.lanes.get(&zone)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Estimate the memory footprint of this snapshot in bytes.
    ///
    /// Lanes shared with other snapshots are counted in full, so summing this
    /// over a history overestimates its real cost.
    pub fn estimated_size(&self) -> usize {
        let mut size = std::mem::size_of::<Self>();
        for lane in self.lanes.values() {
            size += std::mem::size_of::<(ZoneId, Arc<Vec<GlyphBlock>>)>();
            for block in lane.iter() {
                size += std::mem::size_of::<GlyphBlock>();
                size += block.effect_data.len() * std::mem::size_of::<i32>();
            }
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_common::{BlockId, EffectId};

    fn block(id: u64, zone: ZoneId) -> GlyphBlock {
        GlyphBlock {
            id: BlockId(id),
            zone_id: zone,
            start_time_millis: 0.0,
            duration_millis: 500.0,
            effect_id: EffectId::STATIC,
            effect_data: vec![4095],
            is_selected: false,
        }
    }

    fn lanes() -> Lanes {
        let mut lanes = Lanes::new();
        lanes.insert(0, Arc::new(vec![block(1, 0), block(2, 0)]));
        lanes.insert(1, Arc::new(vec![block(3, 1)]));
        lanes
    }

    #[test]
    fn clone_shares_lanes() {
        let a = TimelineSnapshot::new(lanes());
        let b = a.clone();
        assert!(a.shares_lane_with(&b, 0));
        assert!(a.shares_lane_with(&b, 1));
        assert!(!a.shares_lane_with(&b, 7));
        assert_eq!(a, b);
    }

    #[test]
    fn make_mut_detaches_only_the_touched_lane() {
        let a = TimelineSnapshot::new(lanes());
        let mut b = a.clone();
        if let Some(lane) = b.lanes.get_mut(&1) {
            Arc::make_mut(lane)[0].is_selected = true;
        }
        assert!(a.shares_lane_with(&b, 0));
        assert!(!a.shares_lane_with(&b, 1));
        assert!(!a.lanes[&1][0].is_selected);
        assert_ne!(a, b);
    }

    #[test]
    fn counts_and_size() {
        let snap = TimelineSnapshot::new(lanes());
        assert_eq!(snap.total_blocks(), 3);
        assert!(snap.estimated_size() > 3 * std::mem::size_of::<GlyphBlock>());
        assert_eq!(TimelineSnapshot::default().total_blocks(), 0);
    }

    #[test]
    fn serialize_roundtrip() {
        let snap = TimelineSnapshot::new(lanes());
        let json = serde_json::to_string(&snap).unwrap();
        let back: TimelineSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
