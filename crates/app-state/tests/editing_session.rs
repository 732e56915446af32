//! End-to-end editing sessions against the timeline store.
//!
//! These tests drive `AppState` through realistic sequences of user actions
//! and check the properties the editor relies on: undo/redo symmetry, failed
//! actions leaving no trace, and device changes keeping existing work.

use gc_app_state::{AppState, BlockPatch, Gesture, SelectionRect};
use gc_common::{ComposerConfig, StoreError, TimelineDocument};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session(device_id: &str) -> AppState {
    let mut state = AppState::for_device(ComposerConfig::default(), device_id).unwrap();
    state.update_audio_duration(30_000.0);
    state
}

/// A short composition: a fill, two singles, one selected and dragged.
fn build_composition(state: &mut AppState) {
    state.fill_entire_zone(0, 4, 0.0).unwrap();
    let a = state.add_item(1, 1000.0).unwrap();
    state.add_item(3, 2500.0).unwrap();
    state.toggle_selection(a, Some(true));
    state.update_selected_items(&BlockPatch::shift(250.0));
}

// ---------------------------------------------------------------------------
// Undo / redo
// ---------------------------------------------------------------------------

#[test]
fn undo_then_redo_restores_every_field() {
    let mut state = session("NP1");
    build_composition(&mut state);
    let edited = state.document();

    let steps = state.history().undo_count();
    for _ in 0..steps {
        assert!(state.undo());
    }
    assert_eq!(state.total_blocks(), 0);

    for _ in 0..steps {
        assert!(state.redo());
    }
    assert_eq!(state.document(), edited);
}

#[test]
fn single_undo_redo_pair_is_identity() {
    let mut state = session("NP2");
    build_composition(&mut state);
    state.select_all(true);
    state.cut_items();
    state.paste_items().unwrap();
    let before: TimelineDocument = state.document();

    assert!(state.undo());
    assert_ne!(state.document(), before);
    assert!(state.redo());
    assert_eq!(state.document(), before);
}

#[test]
fn new_action_after_undo_discards_redo() {
    let mut state = session("NP1");
    state.add_item(0, 0.0).unwrap();
    state.add_item(1, 0.0).unwrap();
    state.undo();
    assert!(state.history().can_redo());

    state.add_item(2, 0.0).unwrap();
    assert!(!state.history().can_redo());
    assert!(!state.redo());
}

#[test]
fn history_depth_is_bounded() {
    let config = ComposerConfig {
        history_depth: 5,
        ..ComposerConfig::default()
    };
    let mut state = AppState::for_device(config, "NP1").unwrap();
    for i in 0..20 {
        state.add_item(i % 5, f64::from(i as u32) * 100.0).unwrap();
    }
    assert_eq!(state.history().undo_count(), 5);

    let mut undone = 0;
    while state.undo() {
        undone += 1;
    }
    assert_eq!(undone, 5);
    assert_eq!(state.total_blocks(), 15);
}

// ---------------------------------------------------------------------------
// Store properties
// ---------------------------------------------------------------------------

#[test]
fn fill_three_to_seven() {
    let mut state = session("NP2");
    let ids = state.fill_entire_zone(3, 7, 4200.0).unwrap();
    assert_eq!(ids.len(), 5);

    let doc = state.document();
    let zones: Vec<usize> = doc.blocks().map(|b| b.zone_id).collect();
    assert_eq!(zones, vec![3, 4, 5, 6, 7]);
    assert!(doc.blocks().all(|b| b.start_time_millis == 4200.0));
}

#[test]
fn removing_a_missing_block_changes_nothing() {
    let mut state = session("NP1");
    build_composition(&mut state);
    let before = state.document();
    let depth = state.history().undo_count();

    assert!(!state.remove_item(gc_common::BlockId(12345), 0));
    assert_eq!(state.document(), before);
    assert_eq!(state.history().undo_count(), depth);
}

#[test]
fn smaller_device_keeps_blocks_but_rejects_new_ones() {
    let mut state = session("NP2");
    state.fill_entire_zone(0, 32, 0.0).unwrap();
    state.change_phone_model("NP1").unwrap();
    state.clear_history();

    assert_eq!(state.total_blocks(), 33);
    assert_eq!(state.zone_rows(), 33);
    assert_eq!(
        state.add_item(10, 0.0),
        Err(StoreError::InvalidZone {
            zone: 10,
            zone_count: 5
        })
    );
    assert!(state.add_item(4, 0.0).is_ok());

    let doc = state.document();
    assert_eq!(doc.zone_count, 5);
    assert_eq!(doc.zone_rows(), 33);
}

#[test]
fn area_drag_selects_then_click_is_blocked() {
    let mut state = session("NP1");
    state.fill_entire_zone(0, 4, 0.0).unwrap();
    state.selection_mut().set_drag_select(true);

    assert!(state.selection_mut().begin_gesture(Gesture::AreaDrag));
    // Rows 0 and 1 at the default 40 px row height.
    let rect = SelectionRect::from_corners((0.0, 0.0), (30.0, 70.0));
    assert_eq!(state.select_in_area(rect), 2);

    let first = state.lane(4)[0].id;
    assert!(!state.toggle_selection(first, None));
    state.selection_mut().end_gesture();

    assert_eq!(state.selected_count(), 2);
    assert_eq!(state.history().undo_count(), 1);
}
