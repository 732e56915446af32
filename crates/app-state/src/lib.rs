//! `gc-app-state` -- Editing state for the glyph composer.
//!
//! This crate provides:
//!
//! - **`AppState`**: The glyph timeline store: zone lanes, device profile, tempo, clipboard.
//! - **`HistoryManager`**: Snapshot-based undo/redo with batch grouping and bounded depth.
//! - **`TimelineSnapshot`**: Copy-on-write capture of the zone lanes.
//! - **`SelectionState`**: Multi-select and drag-select modes, pointer gesture arbitration.
//! - **`BlockPatch`**: Partial updates applied to the current selection.
//!
//! # Architecture
//!
//! ```text
//! AppState (one editing session)
//! ├── lanes: BTreeMap<ZoneId, Arc<Vec<GlyphBlock>>>  (blocks per zone)
//! ├── device: DeviceProfile                          (zone count, macros)
//! ├── selection: SelectionState                      (modes, active gesture)
//! ├── clipboard: Clipboard                           (copied block templates)
//! └── history: HistoryManager
//!     ├── past: VecDeque<HistoryEntry>               (bounded, oldest evicted)
//!     ├── future: Vec<HistoryEntry>                  (undone snapshots)
//!     └── batch support                              (one entry per gesture)
//! ```

pub mod clipboard;
pub mod history;
pub mod patch;
pub mod selection;
pub mod snapshot;
pub mod state;

// Re-export primary types at crate root for convenience.
pub use clipboard::{BlockTemplate, Clipboard};
pub use history::{HistoryEntry, HistoryManager};
pub use patch::{BlockPatch, TimeEdit};
pub use selection::{Gesture, GridLayout, SelectionRect, SelectionState};
pub use snapshot::{Lanes, TimelineSnapshot};
pub use state::{AppState, MAX_BEAT_GRID};
