//! The glyph timeline store.
//!
//! `AppState` owns the zone lanes together with everything an editing session
//! needs around them: the active device profile, selection modes, clipboard,
//! tempo and the undo history. Every mutating method validates its input
//! first, then records the pre-mutation lanes, then mutates, all inside a
//! single `&mut self` call. A rejected call leaves both state and history as
//! they were.

use std::collections::BTreeMap;
use std::sync::Arc;

use gc_common::document::{DEFAULT_BPM, MAX_BPM};
use gc_common::{
    BlockId, ComposerConfig, ComposerResult, DeviceError, GlyphBlock, StoreError,
    TimelineDocument, ZoneId,
};
use gc_device::{DeviceProfile, DeviceRegistry, ZoneSpan, DEFAULT_DEVICE_ID};
use tracing::{debug, info, warn};

/// Upper bound on the number of beats `beat_grid` returns.
pub const MAX_BEAT_GRID: usize = 1 << 20;

use crate::clipboard::{BlockTemplate, Clipboard};
use crate::history::HistoryManager;
use crate::patch::BlockPatch;
use crate::selection::{Gesture, GridLayout, SelectionRect, SelectionState};
use crate::snapshot::{Lanes, TimelineSnapshot};

/// Central state of one editing session.
///
/// Owned by the session controller and passed by reference; there is no
/// global instance.
#[derive(Debug)]
pub struct AppState {
    config: ComposerConfig,
    device: DeviceProfile,
    /// Lanes are created on first insert; a missing lane is an empty zone.
    lanes: Lanes,
    next_id: BlockId,
    bpm: f64,
    audio_duration_millis: f64,
    selection: SelectionState,
    layout: GridLayout,
    clipboard: Clipboard,
    history: HistoryManager,
}

impl AppState {
    /// Create an empty session for `device`.
    pub fn new(config: ComposerConfig, device: DeviceProfile) -> Self {
        Self {
            history: HistoryManager::new(config.history_depth),
            config,
            device,
            lanes: Lanes::new(),
            next_id: BlockId::FIRST,
            bpm: DEFAULT_BPM,
            audio_duration_millis: 0.0,
            selection: SelectionState::new(),
            layout: GridLayout::default(),
            clipboard: Clipboard::default(),
        }
    }

    /// Create an empty session for a built-in device.
    pub fn for_device(config: ComposerConfig, device_id: &str) -> Result<Self, DeviceError> {
        let device = DeviceRegistry::builtin().get(device_id)?.clone();
        Ok(Self::new(config, device))
    }

    /// Default configuration on the default device.
    pub fn with_defaults() -> Result<Self, DeviceError> {
        Self::for_device(ComposerConfig::default(), DEFAULT_DEVICE_ID)
    }

    // --- Queries ---

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    /// Blocks of one zone, ordered by `(start, id)`.
    pub fn lane(&self, zone: ZoneId) -> &[GlyphBlock] {
        self.lanes
            .get(&zone)
            .map(|lane| lane.as_slice())
            .unwrap_or(&[])
    }

    /// Find a block by id.
    pub fn block(&self, id: BlockId) -> Option<&GlyphBlock> {
        self.blocks().find(|b| b.id == id)
    }

    /// Every block, in zone order.
    pub fn blocks(&self) -> impl Iterator<Item = &GlyphBlock> {
        self.lanes.values().flat_map(|lane| lane.iter())
    }

    pub fn total_blocks(&self) -> usize {
        self.lanes.values().map(|lane| lane.len()).sum()
    }

    pub fn selected_ids(&self) -> Vec<BlockId> {
        self.blocks().filter(|b| b.is_selected).map(|b| b.id).collect()
    }

    pub fn selected_count(&self) -> usize {
        self.blocks().filter(|b| b.is_selected).count()
    }

    /// Number of zone rows shown: the device's zones, widened to cover any
    /// populated zone beyond them.
    pub fn zone_rows(&self) -> usize {
        let highest_populated = self
            .lanes
            .iter()
            .filter(|(_, lane)| !lane.is_empty())
            .map(|(zone, _)| zone.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.device.zone_count.max(highest_populated)
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn audio_duration_millis(&self) -> f64 {
        self.audio_duration_millis
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Selection modes and gestures. Changing them is not an undoable action.
    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Capture the current lanes.
    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot::new(self.lanes.clone())
    }

    /// Owned, self-contained copy of the composition for export.
    pub fn document(&self) -> TimelineDocument {
        let zone_count = self.device.zone_count;
        let mut items: BTreeMap<ZoneId, Vec<GlyphBlock>> =
            (0..zone_count).map(|zone| (zone, Vec::new())).collect();
        for (zone, lane) in &self.lanes {
            if *zone < zone_count || !lane.is_empty() {
                items.insert(*zone, lane.as_ref().clone());
            }
        }

        TimelineDocument {
            items,
            device_id: self.device.id.clone(),
            zone_count,
            bpm: self.bpm,
            audio_duration_millis: self.audio_duration_millis,
        }
    }

    // --- Block creation ---

    /// Add one block with the default duration and effect.
    pub fn add_item(&mut self, zone_id: ZoneId, start_time_millis: f64) -> Result<BlockId, StoreError> {
        self.check_zone(zone_id)?;
        self.record("Add block");

        let id = self.insert_new(zone_id, start_time_millis);
        debug!(zone = zone_id, id = %id, start = start_time_millis, "Block added");
        Ok(id)
    }

    /// Add one block to every zone in `from_zone..=to_zone`, all at the same start.
    pub fn fill_entire_zone(
        &mut self,
        from_zone: ZoneId,
        to_zone: ZoneId,
        start_time_millis: f64,
    ) -> Result<Vec<BlockId>, StoreError> {
        if from_zone > to_zone {
            return Err(self.invalid_zone(from_zone));
        }
        self.check_zone(to_zone)?;
        self.record("Fill zones");

        let ids: Vec<BlockId> = (from_zone..=to_zone)
            .map(|zone| self.insert_new(zone, start_time_millis))
            .collect();
        debug!(from = from_zone, to = to_zone, count = ids.len(), "Zones filled");
        Ok(ids)
    }

    /// Run the device macro group at `index` (display order) at `start_time_millis`.
    pub fn apply_macro(&mut self, index: usize, start_time_millis: f64) -> ComposerResult<Vec<BlockId>> {
        let span = self
            .device
            .macro_group(index)
            .map(|group| group.span.clone())
            .ok_or_else(|| DeviceError::UnknownMacro {
                device: self.device.id.clone(),
                index,
            })?;

        let ids = match span {
            ZoneSpan::Single { zone } => vec![self.add_item(zone, start_time_millis)?],
            ZoneSpan::Range { from, to } => self.fill_entire_zone(from, to, start_time_millis)?,
            ZoneSpan::List { zones } => {
                for zone in &zones {
                    self.check_zone(*zone)?;
                }
                self.record("Apply macro");
                zones
                    .into_iter()
                    .map(|zone| self.insert_new(zone, start_time_millis))
                    .collect()
            }
        };
        Ok(ids)
    }

    // --- Removal ---

    /// Delete a block. Returns `false` (and records nothing) if it does not exist.
    pub fn remove_item(&mut self, id: BlockId, zone_id: ZoneId) -> bool {
        let Some(position) = self
            .lanes
            .get(&zone_id)
            .and_then(|lane| lane.iter().position(|b| b.id == id))
        else {
            debug!(zone = zone_id, id = %id, "Remove ignored: block not found");
            return false;
        };

        self.record("Remove block");
        self.lane_mut(zone_id).remove(position);
        debug!(zone = zone_id, id = %id, "Block removed");
        true
    }

    /// Delete every selected block. Returns how many were removed.
    pub fn remove_selected_items(&mut self) -> usize {
        let count = self.selected_count();
        if count == 0 {
            return 0;
        }
        self.record("Delete selected");
        self.drop_selected();
        debug!(count, "Selected blocks removed");
        count
    }

    // --- Updates ---

    /// Apply `patch` to every selected block, then re-sort the touched lanes.
    /// Returns how many blocks changed.
    pub fn update_selected_items(&mut self, patch: &BlockPatch) -> usize {
        if patch.is_empty() {
            return 0;
        }
        let count = self.selected_count();
        if count == 0 {
            return 0;
        }
        self.record("Update blocks");

        let min_duration = self.config.min_block_duration_millis;
        for lane in self.lanes.values_mut() {
            if !lane.iter().any(|b| b.is_selected) {
                continue;
            }
            let lane = Arc::make_mut(lane);
            for block in lane.iter_mut().filter(|b| b.is_selected) {
                patch.apply_to(block, min_duration);
            }
            lane.sort_by(GlyphBlock::timeline_cmp);
        }
        debug!(count, "Selected blocks updated");
        count
    }

    // --- Selection ---

    /// Set (`explicit`) or flip a block's selection flag.
    ///
    /// Outside multi-select mode every other block is deselected. Ignored
    /// while an area drag holds the pointer. Returns `false` if the block
    /// does not exist or the toggle was ignored.
    pub fn toggle_selection(&mut self, id: BlockId, explicit: Option<bool>) -> bool {
        if !self.selection.allows(Gesture::Click) {
            debug!(id = %id, "Toggle ignored: area drag in progress");
            return false;
        }
        let Some(current) = self.block(id).map(|b| b.is_selected) else {
            return false;
        };
        let target = explicit.unwrap_or(!current);

        if self.selection.is_multi_select() {
            self.set_selection(|b| (b.id == id).then_some(target));
        } else {
            self.set_selection(|b| Some(b.id == id && target));
        }
        true
    }

    /// Select or deselect everything. Returns how many flags changed.
    pub fn select_all(&mut self, select: bool) -> usize {
        self.set_selection(|_| Some(select))
    }

    /// Select every block playing at `position_millis`, leaving the rest alone.
    pub fn select_in_position(&mut self, position_millis: f64) -> usize {
        self.set_selection(|b| b.contains(position_millis).then_some(true))
    }

    /// Select every block whose rendered box intersects `rect`.
    ///
    /// Only acts in drag-select mode and while no click gesture holds the pointer.
    pub fn select_in_area(&mut self, rect: SelectionRect) -> usize {
        if !self.selection.is_drag_select() || !self.selection.allows(Gesture::AreaDrag) {
            return 0;
        }
        let layout = self.layout;
        self.set_selection(|b| layout.block_rect(b).intersects(&rect).then_some(true))
    }

    // --- Clipboard ---

    /// Copy the selected blocks. Returns how many were copied.
    pub fn copy_items(&mut self) -> usize {
        let templates: Vec<BlockTemplate> = self
            .blocks()
            .filter(|b| b.is_selected)
            .map(BlockTemplate::from_block)
            .collect();
        let count = templates.len();
        if count > 0 {
            self.clipboard.set(templates);
            debug!(count, "Blocks copied");
        }
        count
    }

    /// Copy the selected blocks, then delete them.
    pub fn cut_items(&mut self) -> usize {
        let count = self.copy_items();
        if count > 0 {
            self.record("Cut");
            self.drop_selected();
        }
        count
    }

    /// Insert fresh copies of the clipboard at their original times.
    ///
    /// Existing blocks are deselected and the pasted ones selected.
    pub fn paste_items(&mut self) -> Result<Vec<BlockId>, StoreError> {
        let Some(max_zone) = self.clipboard.max_zone() else {
            return Ok(Vec::new());
        };
        self.check_zone(max_zone)?;
        self.record("Paste");

        self.set_selection(|_| Some(false));
        let templates = self.clipboard.templates().to_vec();
        let ids: Vec<BlockId> = templates
            .iter()
            .map(|template| {
                let id = self.allocate_id();
                self.insert_block(template.instantiate(id, true));
                id
            })
            .collect();
        debug!(count = ids.len(), "Blocks pasted");
        Ok(ids)
    }

    // --- Device, tempo, audio ---

    /// Switch to another built-in device.
    ///
    /// Blocks are kept as they are, even in zones the new device lacks.
    /// History is not cleared; callers follow up with
    /// [`reset_document`](Self::reset_document) or
    /// [`clear_history`](Self::clear_history).
    pub fn change_phone_model(&mut self, device_id: &str) -> Result<(), DeviceError> {
        let profile = DeviceRegistry::builtin().get(device_id)?.clone();

        let outside: Vec<ZoneId> = self
            .lanes
            .iter()
            .filter(|(zone, lane)| !lane.is_empty() && !profile.is_valid_zone(**zone))
            .map(|(zone, _)| *zone)
            .collect();
        if !outside.is_empty() {
            warn!(device = %profile.id, zones = ?outside, "Populated zones lie outside the new device");
        }
        if let Some(caution) = &profile.caution {
            warn!(device = %profile.id, "{caution}");
        }

        info!(
            from = %self.device.id,
            to = %profile.id,
            zones = profile.zone_count,
            "Phone model changed"
        );
        self.device = profile;
        Ok(())
    }

    /// Remove every block and forget all history.
    pub fn reset_document(&mut self) {
        self.lanes.clear();
        self.history.clear();
        self.selection.end_gesture();
        info!(device = %self.device.id, "Document reset");
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Record the audio length reported by the player. Negative or
    /// non-finite values are ignored.
    pub fn update_audio_duration(&mut self, millis: f64) -> bool {
        if !millis.is_finite() || millis < 0.0 {
            warn!(millis, "Ignoring invalid audio duration");
            return false;
        }
        self.audio_duration_millis = millis;
        debug!(millis, "Audio duration updated");
        true
    }

    /// Set the song tempo. Values outside `(0, MAX_BPM]` are ignored.
    pub fn set_bpm(&mut self, bpm: f64) -> bool {
        if !bpm.is_finite() || bpm <= 0.0 || bpm > MAX_BPM {
            warn!(bpm, "Ignoring invalid tempo");
            return false;
        }
        self.bpm = bpm;
        true
    }

    /// Length of one beat at the current tempo.
    pub fn beat_duration_millis(&self) -> f64 {
        60_000.0 / self.bpm
    }

    /// Start times of every beat inside the audio, at most [`MAX_BEAT_GRID`].
    pub fn beat_grid(&self) -> Vec<f64> {
        let beat = self.beat_duration_millis();
        let count = (self.audio_duration_millis / beat)
            .ceil()
            .clamp(0.0, MAX_BEAT_GRID as f64) as usize;
        (0..count)
            .map(|i| i as f64 * beat)
            .filter(|t| *t < self.audio_duration_millis)
            .collect()
    }

    /// Nearest beat to `time_millis` (never before zero).
    pub fn snap_to_beat(&self, time_millis: f64) -> f64 {
        let beat = self.beat_duration_millis();
        ((time_millis / beat).round() * beat).max(0.0)
    }

    // --- History ---

    /// Undo the last action. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.lanes = previous.lanes;
                debug!(blocks = self.total_blocks(), "Undo applied");
                true
            }
            None => false,
        }
    }

    /// Redo the last undone action. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.lanes = next.lanes;
                debug!(blocks = self.total_blocks(), "Redo applied");
                true
            }
            None => false,
        }
    }

    /// Group the following mutations (a drag or trim) into one undo step.
    pub fn begin_batch(&mut self, label: &str) {
        let before = self.snapshot();
        self.history.start_batch(label, before);
    }

    /// Close the batch opened by [`begin_batch`](Self::begin_batch).
    pub fn end_batch(&mut self) -> bool {
        let current = self.snapshot();
        self.history.end_batch(&current)
    }

    // --- Internals ---

    fn invalid_zone(&self, zone: ZoneId) -> StoreError {
        StoreError::InvalidZone {
            zone,
            zone_count: self.device.zone_count,
        }
    }

    fn check_zone(&self, zone: ZoneId) -> Result<(), StoreError> {
        if self.device.is_valid_zone(zone) {
            Ok(())
        } else {
            Err(self.invalid_zone(zone))
        }
    }

    fn record(&mut self, label: &str) {
        let snapshot = self.snapshot();
        self.history.push(label, snapshot);
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    fn lane_mut(&mut self, zone: ZoneId) -> &mut Vec<GlyphBlock> {
        Arc::make_mut(self.lanes.entry(zone).or_default())
    }

    fn insert_block(&mut self, block: GlyphBlock) {
        let lane = self.lane_mut(block.zone_id);
        let index = lane.partition_point(|b| b.timeline_cmp(&block).is_lt());
        lane.insert(index, block);
    }

    fn insert_new(&mut self, zone_id: ZoneId, start_time_millis: f64) -> BlockId {
        let id = self.allocate_id();
        let block = GlyphBlock {
            id,
            zone_id,
            start_time_millis,
            duration_millis: self.config.default_block_duration_millis,
            effect_id: self.config.default_effect,
            effect_data: vec![self.config.default_brightness],
            is_selected: false,
        };
        self.insert_block(block);
        id
    }

    fn drop_selected(&mut self) {
        for lane in self.lanes.values_mut() {
            if lane.iter().any(|b| b.is_selected) {
                Arc::make_mut(lane).retain(|b| !b.is_selected);
            }
        }
    }

    /// Set each block's flag to `target(block)` where it returns `Some`.
    /// Lanes without a change are not copied. Returns how many flags changed.
    fn set_selection(&mut self, target: impl Fn(&GlyphBlock) -> Option<bool>) -> usize {
        let differs = |b: &GlyphBlock| target(b).is_some_and(|s| s != b.is_selected);
        let mut changed = 0;
        for lane in self.lanes.values_mut() {
            if !lane.iter().any(differs) {
                continue;
            }
            for block in Arc::make_mut(lane).iter_mut() {
                if differs(&*block) {
                    block.is_selected = !block.is_selected;
                    changed += 1;
                }
            }
        }
        changed
    }
}
