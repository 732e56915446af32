//! Partial block updates applied to the current selection.

use gc_common::{EffectId, GlyphBlock};
use serde::{Deserialize, Serialize};

/// New value for a timing field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TimeEdit {
    /// Replace the value.
    Set(f64),
    /// Add a delta (drag and trim gestures).
    Offset(f64),
}

impl TimeEdit {
    pub fn apply(self, current: f64) -> f64 {
        match self {
            Self::Set(value) => value,
            Self::Offset(delta) => current + delta,
        }
    }
}

/// Fields to change on every selected block. `None` leaves a field alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPatch {
    pub start_time_millis: Option<TimeEdit>,
    pub duration_millis: Option<TimeEdit>,
    pub effect_id: Option<EffectId>,
    pub effect_data: Option<Vec<i32>>,
}

impl BlockPatch {
    /// Move blocks by `delta` milliseconds.
    pub fn shift(delta: f64) -> Self {
        Self {
            start_time_millis: Some(TimeEdit::Offset(delta)),
            ..Self::default()
        }
    }

    /// Grow or shrink blocks by `delta` milliseconds.
    pub fn resize(delta: f64) -> Self {
        Self {
            duration_millis: Some(TimeEdit::Offset(delta)),
            ..Self::default()
        }
    }

    /// Switch blocks to another effect with new parameters.
    pub fn effect(effect_id: EffectId, effect_data: Vec<i32>) -> Self {
        Self {
            effect_id: Some(effect_id),
            effect_data: Some(effect_data),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_time_millis.is_none()
            && self.duration_millis.is_none()
            && self.effect_id.is_none()
            && self.effect_data.is_none()
    }

    /// Apply to one block. Durations never drop below `min_duration_millis`.
    pub fn apply_to(&self, block: &mut GlyphBlock, min_duration_millis: f64) {
        if let Some(edit) = self.start_time_millis {
            block.start_time_millis = edit.apply(block.start_time_millis);
        }
        if let Some(edit) = self.duration_millis {
            block.duration_millis = edit.apply(block.duration_millis).max(min_duration_millis);
        }
        if let Some(effect_id) = self.effect_id {
            block.effect_id = effect_id;
        }
        if let Some(data) = &self.effect_data {
            block.effect_data.clone_from(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_common::BlockId;

    fn block() -> GlyphBlock {
        GlyphBlock {
            id: BlockId(1),
            zone_id: 0,
            start_time_millis: 1000.0,
            duration_millis: 500.0,
            effect_id: EffectId::STATIC,
            effect_data: vec![4095],
            is_selected: true,
        }
    }

    #[test]
    fn set_and_offset() {
        assert_eq!(TimeEdit::Set(10.0).apply(99.0), 10.0);
        assert_eq!(TimeEdit::Offset(-40.0).apply(100.0), 60.0);
    }

    #[test]
    fn start_is_not_clamped() {
        let mut b = block();
        BlockPatch::shift(-1500.0).apply_to(&mut b, 20.0);
        assert_eq!(b.start_time_millis, -500.0);
    }

    #[test]
    fn duration_is_floored() {
        let mut b = block();
        BlockPatch::resize(-10_000.0).apply_to(&mut b, 20.0);
        assert_eq!(b.duration_millis, 20.0);
    }

    #[test]
    fn effect_patch() {
        let mut b = block();
        let patch = BlockPatch::effect(EffectId::STROBE, vec![1024, 3]);
        assert!(!patch.is_empty());
        patch.apply_to(&mut b, 20.0);
        assert_eq!(b.effect_id, EffectId::STROBE);
        assert_eq!(b.effect_data, vec![1024, 3]);
        assert_eq!(b.start_time_millis, 1000.0);
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(BlockPatch::default().is_empty());
    }
}
