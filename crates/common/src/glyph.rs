//! The glyph block: one timed lighting instruction inside a zone.

use serde::{Deserialize, Serialize};

use crate::effect::EffectId;
use crate::types::{BlockId, ZoneId};

/// A timed lighting instruction.
///
/// Field names serialize in camelCase so documents written by the web editor
/// (which spells the time fields `...Milis`) load unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphBlock {
    /// Unique block identifier, stable for the block's lifetime.
    pub id: BlockId,
    /// Zone index on the active device.
    #[serde(alias = "glyphId")]
    pub zone_id: ZoneId,
    /// Offset from the start of the audio, in milliseconds.
    #[serde(alias = "startTimeMilis")]
    pub start_time_millis: f64,
    /// Length of the block in milliseconds. Always positive.
    #[serde(alias = "durationMilis")]
    pub duration_millis: f64,
    /// Lighting effect. Unknown ids are kept as-is.
    pub effect_id: EffectId,
    /// Effect parameters; element 0 is the starting brightness.
    #[serde(default)]
    pub effect_data: Vec<i32>,
    /// Whether the block is part of the current selection.
    #[serde(default)]
    pub is_selected: bool,
}

impl GlyphBlock {
    /// Exclusive end of the block on the timeline.
    pub fn end_millis(&self) -> f64 {
        self.start_time_millis + self.duration_millis
    }

    /// Returns `true` if `position_millis` falls inside `[start, start + duration)`.
    pub fn contains(&self, position_millis: f64) -> bool {
        position_millis >= self.start_time_millis && position_millis < self.end_millis()
    }

    /// Lane order: by start time, then by id (insertion order) on ties.
    pub fn timeline_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start_time_millis
            .total_cmp(&other.start_time_millis)
            .then(self.id.cmp(&other.id))
    }

    /// Starting brightness (first effect parameter), if present.
    pub fn starting_brightness(&self) -> Option<i32> {
        self.effect_data.first().copied()
    }
}
