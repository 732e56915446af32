//! Snapshot-based undo/redo history manager.
//!
//! - `past` and `future` stacks of `TimelineSnapshot`
//! - Batch grouping to collapse a drag or trim gesture into one undo step
//! - Bounded depth; the oldest entries are evicted first
//!
//! # Usage
//!
//! ```ignore
//! let mut history = HistoryManager::new(100);
//!
//! // Before a user action, record the current lanes
//! history.push("Add block", state.snapshot());
//!
//! // Undo: hand over where we are now, get back where we were
//! if let Some(prev) = history.undo(state.snapshot()) {
//!     state.restore(prev);
//! }
//! ```

use std::collections::VecDeque;
use std::time::Instant;

use crate::snapshot::TimelineSnapshot;

/// A single entry in the undo/redo history.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// Human-readable label describing the action (e.g. "Add block").
    pub label: String,
    /// The lanes at this point in history.
    pub snapshot: TimelineSnapshot,
    /// When this entry was created.
    pub timestamp: Instant,
}

impl HistoryEntry {
    fn new(label: String, snapshot: TimelineSnapshot) -> Self {
        Self {
            label,
            snapshot,
            timestamp: Instant::now(),
        }
    }
}

/// Linear undo/redo history.
///
/// Pushing a new entry clears the redo stack. While a batch is open,
/// individual pushes are suppressed and `end_batch` records a single entry.
#[derive(Debug)]
pub struct HistoryManager {
    past: VecDeque<HistoryEntry>,
    future: Vec<HistoryEntry>,
    max_entries: usize,
    batch_label: Option<String>,
    /// Lanes captured when the batch opened (the "before" state).
    batch_start_snapshot: Option<TimelineSnapshot>,
}

impl HistoryManager {
    /// Create a history keeping at most `max_entries` undo steps.
    pub fn new(max_entries: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(max_entries.min(256)),
            future: Vec::new(),
            max_entries,
            batch_label: None,
            batch_start_snapshot: None,
        }
    }

    /// Record the state *before* an action.
    ///
    /// Clears the redo stack. Suppressed while a batch is open.
    pub fn push(&mut self, label: &str, snapshot: TimelineSnapshot) {
        if self.batch_label.is_some() {
            tracing::debug!(label, "Push suppressed: batch in progress");
            return;
        }

        self.future.clear();
        self.push_past(HistoryEntry::new(label.to_string(), snapshot));

        tracing::debug!(label, undo_depth = self.past.len(), "History entry pushed");
    }

    /// Step back one entry.
    ///
    /// `current` is parked on the redo stack; the returned snapshot is the
    /// state to restore. `None` (and `current` is dropped) if there is nothing
    /// to undo.
    pub fn undo(&mut self, current: TimelineSnapshot) -> Option<TimelineSnapshot> {
        self.drop_stuck_batch("undo");

        let entry = self.past.pop_back()?;
        tracing::debug!(
            label = %entry.label,
            undo_remaining = self.past.len(),
            "Undo"
        );

        self.future.push(HistoryEntry::new(entry.label, current));
        Some(entry.snapshot)
    }

    /// Step forward one entry; mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, current: TimelineSnapshot) -> Option<TimelineSnapshot> {
        self.drop_stuck_batch("redo");

        let entry = self.future.pop()?;
        tracing::debug!(
            label = %entry.label,
            redo_remaining = self.future.len(),
            "Redo"
        );

        self.push_past(HistoryEntry::new(entry.label, current));
        Some(entry.snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Open a batch. Pushes are suppressed until [`end_batch`](Self::end_batch).
    pub fn start_batch(&mut self, label: &str, before_snapshot: TimelineSnapshot) {
        if self.batch_label.is_some() {
            tracing::warn!(label, "start_batch called while already batching, ignoring");
            return;
        }

        self.batch_label = Some(label.to_string());
        self.batch_start_snapshot = Some(before_snapshot);

        tracing::debug!(label, "Batch started");
    }

    /// Close the current batch, recording the state captured when it opened.
    ///
    /// Nothing is recorded if `current` equals that state (a gesture that
    /// changed nothing). Returns `true` if an entry was pushed.
    pub fn end_batch(&mut self, current: &TimelineSnapshot) -> bool {
        let (Some(label), Some(start_snapshot)) =
            (self.batch_label.take(), self.batch_start_snapshot.take())
        else {
            return false;
        };

        if &start_snapshot == current {
            tracing::debug!(label, "Batch ended without changes");
            return false;
        }

        self.future.clear();
        self.push_past(HistoryEntry::new(label, start_snapshot));

        tracing::debug!(undo_depth = self.past.len(), "Batch ended, entry pushed");
        true
    }

    pub fn is_batching(&self) -> bool {
        self.batch_label.is_some()
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        self.past.back().map(|e| e.label.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.future.last().map(|e| e.label.as_str())
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    /// Clear both stacks and any open batch.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.batch_label = None;
        self.batch_start_snapshot = None;
        tracing::debug!("History cleared");
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Change the depth bound, evicting the oldest entries if needed.
    pub fn set_max_entries(&mut self, max: usize) {
        self.max_entries = max;
        self.evict();
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        self.past.push_back(entry);
        self.evict();
    }

    fn evict(&mut self) {
        while self.past.len() > self.max_entries {
            self.past.pop_front();
        }
    }

    /// A batch left open (lost pointer-up) is discarded before undo/redo.
    fn drop_stuck_batch(&mut self, action: &str) {
        if self.batch_label.take().is_some() {
            tracing::warn!(action, "Ending stuck batch");
            self.batch_start_snapshot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Lanes;
    use gc_common::{BlockId, EffectId, GlyphBlock};
    use std::sync::Arc;

    /// A snapshot holding one block whose start time identifies it.
    fn make_snapshot(tag: u32) -> TimelineSnapshot {
        let mut lanes = Lanes::new();
        lanes.insert(
            0,
            Arc::new(vec![GlyphBlock {
                id: BlockId(1),
                zone_id: 0,
                start_time_millis: f64::from(tag),
                duration_millis: 500.0,
                effect_id: EffectId::STATIC,
                effect_data: vec![4095],
                is_selected: false,
            }]),
        );
        TimelineSnapshot::new(lanes)
    }

    fn tag(snapshot: &TimelineSnapshot) -> u32 {
        snapshot.lanes[&0][0].start_time_millis as u32
    }

    #[test]
    fn new_history_is_empty() {
        let h = HistoryManager::new(50);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.undo_count(), 0);
        assert_eq!(h.redo_count(), 0);
        assert!(h.undo_label().is_none());
        assert!(h.redo_label().is_none());
    }

    #[test]
    fn push_and_undo() {
        let mut h = HistoryManager::new(50);
        h.push("Action A", make_snapshot(1));
        h.push("Action B", make_snapshot(2));
        assert_eq!(h.undo_label(), Some("Action B"));

        let prev = h.undo(make_snapshot(3)).unwrap();
        assert_eq!(tag(&prev), 2);
        assert_eq!(h.undo_count(), 1);
        assert_eq!(h.redo_count(), 1);

        let prev = h.undo(prev).unwrap();
        assert_eq!(tag(&prev), 1);
        assert!(!h.can_undo());
        assert_eq!(h.redo_count(), 2);
    }

    #[test]
    fn undo_and_redo_empty_return_none() {
        let mut h = HistoryManager::new(50);
        assert!(h.undo(make_snapshot(0)).is_none());
        assert!(h.redo(make_snapshot(0)).is_none());
        assert_eq!(h.redo_count(), 0);
    }

    #[test]
    fn redo_returns_the_state_handed_to_undo() {
        let mut h = HistoryManager::new(50);
        h.push("A", make_snapshot(1));

        let restored = h.undo(make_snapshot(2)).unwrap();
        assert_eq!(tag(&restored), 1);
        assert_eq!(h.redo_label(), Some("A"));

        let back = h.redo(restored).unwrap();
        assert_eq!(tag(&back), 2);
        assert_eq!(h.undo_count(), 1);
        assert!(!h.can_redo());
    }

    #[test]
    fn push_clears_redo_stack() {
        let mut h = HistoryManager::new(50);
        h.push("A", make_snapshot(1));
        h.push("B", make_snapshot(2));
        h.undo(make_snapshot(3));
        assert!(h.can_redo());

        h.push("C", make_snapshot(2));
        assert!(!h.can_redo());
        assert_eq!(h.undo_count(), 2);
    }

    #[test]
    fn oldest_entries_evicted() {
        let mut h = HistoryManager::new(3);
        for i in 0..4 {
            h.push(&format!("Action {i}"), make_snapshot(i));
        }
        assert_eq!(h.undo_count(), 3);

        let mut current = make_snapshot(99);
        let mut tags = Vec::new();
        while let Some(prev) = h.undo(current.clone()) {
            tags.push(tag(&prev));
            current = prev;
        }
        assert_eq!(tags, vec![3, 2, 1]);
    }

    #[test]
    fn redo_respects_depth() {
        let mut h = HistoryManager::new(2);
        h.push("A", make_snapshot(1));
        h.push("B", make_snapshot(2));
        let s = h.undo(make_snapshot(3)).unwrap();
        h.redo(s);
        assert_eq!(h.undo_count(), 2);
    }

    #[test]
    fn set_max_entries_trims() {
        let mut h = HistoryManager::new(10);
        for i in 0..8 {
            h.push(&format!("Action {i}"), make_snapshot(i));
        }
        h.set_max_entries(3);
        assert_eq!(h.undo_count(), 3);
        assert_eq!(h.max_entries(), 3);
        assert_eq!(h.undo_label(), Some("Action 7"));
    }

    #[test]
    fn batch_suppresses_pushes() {
        let mut h = HistoryManager::new(50);
        h.push("Before batch", make_snapshot(0));

        h.start_batch("Drag", make_snapshot(1));
        assert!(h.is_batching());
        h.push("Intermediate 1", make_snapshot(2));
        h.push("Intermediate 2", make_snapshot(3));
        assert_eq!(h.undo_count(), 1);

        assert!(h.end_batch(&make_snapshot(4)));
        assert!(!h.is_batching());
        assert_eq!(h.undo_count(), 2);
        assert_eq!(h.undo_label(), Some("Drag"));

        let prev = h.undo(make_snapshot(4)).unwrap();
        assert_eq!(tag(&prev), 1);
    }

    #[test]
    fn batch_without_changes_records_nothing() {
        let mut h = HistoryManager::new(50);
        h.start_batch("Drag", make_snapshot(1));
        assert!(!h.end_batch(&make_snapshot(1)));
        assert_eq!(h.undo_count(), 0);
    }

    #[test]
    fn end_batch_clears_redo() {
        let mut h = HistoryManager::new(50);
        h.push("A", make_snapshot(1));
        h.undo(make_snapshot(2));
        assert!(h.can_redo());

        h.start_batch("Batch", make_snapshot(1));
        h.end_batch(&make_snapshot(5));
        assert!(!h.can_redo());
    }

    #[test]
    fn end_batch_without_start_is_noop() {
        let mut h = HistoryManager::new(50);
        assert!(!h.end_batch(&make_snapshot(0)));
        assert_eq!(h.undo_count(), 0);
    }

    #[test]
    fn double_start_batch_ignored() {
        let mut h = HistoryManager::new(50);
        h.start_batch("First", make_snapshot(1));
        h.start_batch("Second", make_snapshot(2));
        h.end_batch(&make_snapshot(3));

        assert_eq!(h.undo_count(), 1);
        assert_eq!(h.undo_label(), Some("First"));
    }

    #[test]
    fn undo_and_redo_end_stuck_batch() {
        let mut h = HistoryManager::new(50);
        h.push("A", make_snapshot(1));
        h.start_batch("Stuck", make_snapshot(2));
        let prev = h.undo(make_snapshot(3)).unwrap();
        assert!(!h.is_batching());

        h.start_batch("Stuck again", make_snapshot(1));
        assert!(h.redo(prev).is_some());
        assert!(!h.is_batching());
    }

    #[test]
    fn clear_resets_everything() {
        let mut h = HistoryManager::new(50);
        h.push("A", make_snapshot(1));
        h.push("B", make_snapshot(2));
        h.undo(make_snapshot(3));
        h.start_batch("Batch", make_snapshot(4));

        h.clear();

        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(!h.is_batching());
    }

    #[test]
    fn entries_carry_timestamps_in_order() {
        let mut h = HistoryManager::new(50);
        h.push("A", make_snapshot(1));
        h.push("B", make_snapshot(2));
        let stamps: Vec<Instant> = h.past.iter().map(|e| e.timestamp).collect();
        assert!(stamps[0] <= stamps[1]);
    }
}
