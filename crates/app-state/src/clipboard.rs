//! Copy/paste buffer of block templates.

use gc_common::{BlockId, EffectId, GlyphBlock, ZoneId};
use serde::{Deserialize, Serialize};

/// A block minus its identity: everything paste needs to recreate it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub zone_id: ZoneId,
    pub start_time_millis: f64,
    pub duration_millis: f64,
    pub effect_id: EffectId,
    pub effect_data: Vec<i32>,
}

impl BlockTemplate {
    pub fn from_block(block: &GlyphBlock) -> Self {
        Self {
            zone_id: block.zone_id,
            start_time_millis: block.start_time_millis,
            duration_millis: block.duration_millis,
            effect_id: block.effect_id,
            effect_data: block.effect_data.clone(),
        }
    }

    /// Instantiate the template under a fresh id.
    pub fn instantiate(&self, id: BlockId, is_selected: bool) -> GlyphBlock {
        GlyphBlock {
            id,
            zone_id: self.zone_id,
            start_time_millis: self.start_time_millis,
            duration_millis: self.duration_millis,
            effect_id: self.effect_id,
            effect_data: self.effect_data.clone(),
            is_selected,
        }
    }
}

/// Session clipboard. Not part of undo history.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    templates: Vec<BlockTemplate>,
}

impl Clipboard {
    /// Replace the contents.
    pub fn set(&mut self, templates: Vec<BlockTemplate>) {
        self.templates = templates;
    }

    pub fn templates(&self) -> &[BlockTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Highest zone any template targets.
    pub fn max_zone(&self) -> Option<ZoneId> {
        self.templates.iter().map(|t| t.zone_id).max()
    }

    pub fn clear(&mut self) {
        self.templates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_drops_identity_and_selection() {
        let block = GlyphBlock {
            id: BlockId(9),
            zone_id: 3,
            start_time_millis: 250.0,
            duration_millis: 400.0,
            effect_id: EffectId::PULSE,
            effect_data: vec![2000, 7],
            is_selected: true,
        };
        let template = BlockTemplate::from_block(&block);
        let copy = template.instantiate(BlockId(42), false);

        assert_eq!(copy.id, BlockId(42));
        assert!(!copy.is_selected);
        assert_eq!(copy.zone_id, 3);
        assert_eq!(copy.effect_data, vec![2000, 7]);
        assert_eq!(copy.start_time_millis, 250.0);
    }

    #[test]
    fn clipboard_contents() {
        let mut clipboard = Clipboard::default();
        assert!(clipboard.is_empty());
        assert_eq!(clipboard.max_zone(), None);

        let template = |zone| BlockTemplate {
            zone_id: zone,
            start_time_millis: 0.0,
            duration_millis: 100.0,
            effect_id: EffectId::STATIC,
            effect_data: vec![4095],
        };
        clipboard.set(vec![template(4), template(1)]);
        assert_eq!(clipboard.len(), 2);
        assert_eq!(clipboard.max_zone(), Some(4));

        clipboard.clear();
        assert!(clipboard.is_empty());
    }
}
