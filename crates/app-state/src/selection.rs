//! Selection modes, pointer gestures and the grid geometry used by area selection.
//!
//! The per-block `is_selected` flags live on the blocks themselves; this module
//! holds the interaction state around them.

use gc_common::GlyphBlock;
use serde::{Deserialize, Serialize};

/// Pointer gesture that may change the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gesture {
    /// Clicking individual blocks.
    Click,
    /// Dragging a selection rectangle.
    AreaDrag,
}

/// Selection modes plus the gesture currently in flight.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SelectionState {
    /// Whether toggles accumulate instead of replacing the selection.
    multi_select: bool,
    /// Whether dragging on the grid draws a selection rectangle.
    drag_select: bool,
    #[serde(skip)]
    active_gesture: Option<Gesture>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn set_multi_select(&mut self, enabled: bool) {
        self.multi_select = enabled;
    }

    pub fn is_drag_select(&self) -> bool {
        self.drag_select
    }

    pub fn set_drag_select(&mut self, enabled: bool) {
        self.drag_select = enabled;
    }

    /// Claim the pointer for `gesture`.
    ///
    /// Returns `false` if a different gesture already holds it. Claiming the
    /// gesture that is already active succeeds.
    pub fn begin_gesture(&mut self, gesture: Gesture) -> bool {
        match self.active_gesture {
            Some(active) if active != gesture => {
                tracing::debug!(?active, requested = ?gesture, "Gesture rejected");
                false
            }
            _ => {
                self.active_gesture = Some(gesture);
                true
            }
        }
    }

    /// Release the pointer.
    pub fn end_gesture(&mut self) {
        self.active_gesture = None;
    }

    pub fn active_gesture(&self) -> Option<Gesture> {
        self.active_gesture
    }

    /// Whether input from `gesture` may change the selection right now.
    pub fn allows(&self, gesture: Gesture) -> bool {
        self.active_gesture.map_or(true, |active| active == gesture)
    }
}

/// Screen geometry of the zone grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Horizontal pixels per second of audio.
    pub pixels_per_second: f64,
    /// Height of one zone row.
    pub row_height: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            pixels_per_second: 100.0,
            row_height: 40.0,
            row_gap: 0.0,
        }
    }
}

impl GridLayout {
    /// The rendered box of a block.
    pub fn block_rect(&self, block: &GlyphBlock) -> SelectionRect {
        let px_per_ms = self.pixels_per_second / 1000.0;
        SelectionRect {
            x: block.start_time_millis * px_per_ms,
            y: block.zone_id as f64 * (self.row_height + self.row_gap),
            width: block.duration_millis * px_per_ms,
            height: self.row_height,
        }
    }
}

/// Axis-aligned rectangle in grid pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Rectangle spanned by two drag corners, in any order.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (a.0 - b.0).abs(),
            height: (a.1 - b.1).abs(),
        }
    }

    /// Returns `true` if the rectangles overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}
