//! `TimelineDocument`: the self-contained, export-facing view of a composition.
//!
//! The application state hands out owned documents; the encoder only ever
//! reads one, so an export never races with further edits.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::glyph::GlyphBlock;
use crate::types::ZoneId;

/// Default tempo used for the beat grid.
pub const DEFAULT_BPM: f64 = 120.0;

/// Fastest tempo the editor accepts.
pub const MAX_BPM: f64 = 1000.0;

/// Largest zone row count a document may address.
pub const MAX_ZONE_ROWS: usize = 256;

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

/// A complete composition: blocks per zone plus the facts the encoder needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDocument {
    /// Blocks per zone, each lane ordered by `(start, id)`.
    pub items: BTreeMap<ZoneId, Vec<GlyphBlock>>,
    /// Identifier of the device profile the composition targets.
    pub device_id: String,
    /// Number of zones the device declares.
    pub zone_count: usize,
    /// Song tempo in beats per minute.
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    /// Audio length in milliseconds, as reported by the audio collaborator.
    #[serde(alias = "durationInMilis")]
    pub audio_duration_millis: f64,
}

impl TimelineDocument {
    /// Create an empty document with one lane per declared zone.
    pub fn new(device_id: impl Into<String>, zone_count: usize, audio_duration_millis: f64) -> Self {
        Self {
            items: (0..zone_count).map(|z| (z, Vec::new())).collect(),
            device_id: device_id.into(),
            zone_count,
            bpm: DEFAULT_BPM,
            audio_duration_millis,
        }
    }

    /// Number of zone rows: the declared zone count, widened to cover any
    /// populated zone beyond it.
    pub fn zone_rows(&self) -> usize {
        let highest_populated = self
            .items
            .iter()
            .filter(|(_, lane)| !lane.is_empty())
            .map(|(zone, _)| zone.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.zone_count.max(highest_populated)
    }

    /// Blocks of one zone (empty if the zone has no lane).
    pub fn lane(&self, zone: ZoneId) -> &[GlyphBlock] {
        self.items.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of blocks across all zones.
    pub fn total_blocks(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    /// Returns `true` if no zone holds any block.
    pub fn is_empty(&self) -> bool {
        self.items.values().all(Vec::is_empty)
    }

    /// Iterate over every block in zone order.
    pub fn blocks(&self) -> impl Iterator<Item = &GlyphBlock> {
        self.items.values().flat_map(|lane| lane.iter())
    }

    /// Parse a document from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, ImportError> {
        let doc: Self = serde_json::from_str(json)?;
        let rows = doc.zone_rows();
        if rows > MAX_ZONE_ROWS {
            return Err(ImportError::Format {
                reason: format!("document addresses {rows} zone rows, the limit is {MAX_ZONE_ROWS}"),
            });
        }
        tracing::debug!(
            device = %doc.device_id,
            blocks = doc.total_blocks(),
            "Parsed timeline document"
        );
        Ok(doc)
    }

    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read document");
            ImportError::Io(e)
        })?;
        Self::from_json_str(&json)
    }

    /// Serialize the document to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ImportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectId;
    use crate::types::BlockId;

    fn block(id: u64, zone: ZoneId, start: f64) -> GlyphBlock {
        GlyphBlock {
            id: BlockId(id),
            zone_id: zone,
            start_time_millis: start,
            duration_millis: 500.0,
            effect_id: EffectId::STATIC,
            effect_data: vec![4095],
            is_selected: false,
        }
    }

    #[test]
    fn new_document_has_empty_lanes() {
        let doc = TimelineDocument::new("NP1", 5, 10_000.0);
        assert_eq!(doc.items.len(), 5);
        assert!(doc.is_empty());
        assert_eq!(doc.total_blocks(), 0);
        assert_eq!(doc.zone_rows(), 5);
        assert!((doc.bpm - DEFAULT_BPM).abs() < f64::EPSILON);
    }

    #[test]
    fn zone_rows_covers_populated_zones_beyond_device() {
        let mut doc = TimelineDocument::new("NP1", 5, 10_000.0);
        doc.items.insert(9, vec![block(1, 9, 0.0)]);
        assert_eq!(doc.zone_rows(), 10);

        // Empty lanes past the device do not widen the grid.
        doc.items.insert(20, Vec::new());
        assert_eq!(doc.zone_rows(), 10);
    }

    #[test]
    fn zone_rows_saturates_on_extreme_zone_ids() {
        let mut doc = TimelineDocument::new("NP1", 5, 1000.0);
        doc.items.insert(usize::MAX, vec![block(1, usize::MAX, 0.0)]);
        assert_eq!(doc.zone_rows(), usize::MAX);
    }

    #[test]
    fn oversized_zone_ids_are_rejected_on_load() {
        let mut doc = TimelineDocument::new("NP1", 5, 1000.0);
        doc.items.insert(MAX_ZONE_ROWS, vec![block(1, MAX_ZONE_ROWS, 0.0)]);
        let json = doc.to_json_string().unwrap();
        let err = TimelineDocument::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }));

        doc.items.remove(&MAX_ZONE_ROWS);
        doc.items
            .insert(MAX_ZONE_ROWS - 1, vec![block(2, MAX_ZONE_ROWS - 1, 0.0)]);
        let json = doc.to_json_string().unwrap();
        assert_eq!(TimelineDocument::from_json_str(&json).unwrap().zone_rows(), MAX_ZONE_ROWS);
    }

    #[test]
    fn lane_of_missing_zone_is_empty() {
        let doc = TimelineDocument::new("NP1", 5, 1000.0);
        assert!(doc.lane(42).is_empty());
    }

    #[test]
    fn json_roundtrip() {
        let mut doc = TimelineDocument::new("NP2a", 26, 4000.0);
        doc.items.get_mut(&3).unwrap().push(block(1, 3, 100.0));
        let json = doc.to_json_string().unwrap();
        assert!(json.contains("\"audioDurationMillis\""));
        let back = TimelineDocument::from_json_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn malformed_json_is_an_import_error() {
        let err = TimelineDocument::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }));
    }
}
