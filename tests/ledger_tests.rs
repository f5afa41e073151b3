//! Integration tests for the pending closure ledger
//!
//! Exercised through `TabModel`, the way a host drives it: tabs are closed
//! in groups, per-tab "ready" signals commit or cancel them, and observers
//! watch batches being finalized.
//!
//! ### Key behaviors:
//! - The rewound view always contains the live list as a sub-order
//! - Events finalize as one batch once every member is handled
//! - Cancelled tabs return to the position they had in the rewound view
//! - Undo only touches the most recent event

mod common;

use common::{batches, model_with_titles, recorded_model};
use tabclose::closure::{LedgerEvent, UndoAction};
use tabclose::removal::TabClosureParams;
use tabclose::tab::TabId;

fn is_sub_order(live: &[TabId], view: &[TabId]) -> bool {
    let mut view = view.iter();
    live.iter().all(|id| view.any(|v| v == id))
}

// ============================================================================
// Rewound View
// ============================================================================

#[test]
fn test_view_contains_live_order_throughout() {
    let mut model = model_with_titles(&["a", "b", "c", "d", "e"]);

    model.close_tabs(TabClosureParams::close_tabs(vec![2, 4]));
    assert!(is_sub_order(&model.live_ids(), model.rewound_view().ids()));
    assert!(model.rewound_view().len() > model.live_ids().len());

    model.cancel_closure(4);
    assert!(is_sub_order(&model.live_ids(), model.rewound_view().ids()));

    model.commit_closure(2);
    assert!(is_sub_order(&model.live_ids(), model.rewound_view().ids()));
    assert_eq!(model.rewound_view().len(), model.live_ids().len());
}

#[test]
fn test_reinsertion_follows_rewound_neighbors() {
    // live = [A, C, F], view = [A, B, C, D, E, F]
    let mut model = model_with_titles(&["A", "B", "C", "D", "E", "F"]);
    model.close_tabs(TabClosureParams::close_tabs(vec![2]));
    model.close_tabs(TabClosureParams::close_tabs(vec![4, 5]));
    assert_eq!(model.live_ids(), vec![1, 3, 6]);

    model.cancel_closure(4);
    assert_eq!(model.live_ids(), vec![1, 3, 4, 6]);
    model.cancel_closure(5);
    assert_eq!(model.live_ids(), vec![1, 3, 4, 5, 6]);
    model.cancel_closure(2);
    assert_eq!(model.live_ids(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_view_index_maps_selection() {
    let mut model = model_with_titles(&["a", "b", "c"]);
    model.switch_to(3);
    model.close_tabs(TabClosureParams::close_tabs(vec![1]));
    assert_eq!(model.rewound_view().index(model.strip()), Some(2));
}

// ============================================================================
// Commit / Cancel
// ============================================================================

#[test]
fn test_repeated_signals_are_no_ops() {
    let (mut model, log) = recorded_model(3);
    model.close_tabs(TabClosureParams::close_tabs(vec![1, 2]));

    assert!(model.commit_closure(1));
    assert!(!model.commit_closure(1));
    assert!(!model.cancel_closure(1));
    assert!(!model.commit_closure(3));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_event_finalizes_once_all_members_are_handled() {
    let (mut model, log) = recorded_model(4);
    model.close_tabs(TabClosureParams::close_tabs(vec![1, 2, 3]));

    model.commit_closure(3);
    model.commit_closure(1);
    assert!(batches(&log).is_empty());

    model.commit_closure(2);
    assert_eq!(batches(&log), vec![vec![1, 2, 3]]);
    assert_eq!(model.strip().destroyed_ids(), &[1, 2, 3]);
}

#[test]
fn test_notification_order_for_a_batch() {
    let (mut model, log) = recorded_model(2);
    model.close_tabs(TabClosureParams::close_tabs(vec![1, 2]));
    model.commit_closure(1);
    model.commit_closure(2);

    let kinds: Vec<&str> = log
        .borrow()
        .iter()
        .map(|e| match e {
            LedgerEvent::BatchFinishing { view, .. } => {
                assert!(view.is_empty());
                "batch"
            }
            LedgerEvent::ItemFinalized { .. } => "item",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["batch", "item", "item"]);
}

#[test]
fn test_cancel_completing_event_delivers_undo_action() {
    let (mut model, log) = recorded_model(3);
    model.close_tabs(
        TabClosureParams::close_tabs(vec![1, 2]).with_undo_action(Some(UndoAction(42))),
    );

    model.cancel_closure(1);
    model.cancel_closure(2);

    assert_eq!(
        log.borrow().last(),
        Some(&LedgerEvent::EventCancelled {
            undo_action: Some(UndoAction(42))
        })
    );
    assert!(batches(&log).is_empty());
    assert_eq!(model.live_ids(), vec![1, 2, 3]);
}

// ============================================================================
// Bulk operations
// ============================================================================

#[test]
fn test_commit_all_is_fifo_with_one_batch_per_event() {
    let (mut model, log) = recorded_model(5);
    model.close_tabs(TabClosureParams::close_tabs(vec![4]));
    model.close_tabs(TabClosureParams::close_tabs(vec![1, 2]));
    model.close_tabs(TabClosureParams::close_tabs(vec![5]));
    model.commit_closure(1);

    model.commit_all_closures();

    assert_eq!(batches(&log), vec![vec![4], vec![1, 2], vec![5]]);
    assert_eq!(model.ledger().event_count(), 0);
    assert_eq!(model.rewound_view().ids(), &[3]);
}

#[test]
fn test_undo_reverts_only_the_latest_event() {
    let (mut model, log) = recorded_model(4);
    model.close_tabs(TabClosureParams::close_tabs(vec![1]));
    model.close_tabs(TabClosureParams::close_tabs(vec![3, 4]));

    assert!(model.undo_most_recent());
    assert_eq!(model.live_ids(), vec![2, 3, 4]);
    assert_eq!(model.ledger().pending_ids(), vec![1]);
    assert!(
        !log.borrow()
            .iter()
            .any(|e| matches!(e, LedgerEvent::EventCancelled { .. }))
    );
}

#[test]
fn test_undo_leaves_committed_events_alone() {
    let (mut model, log) = recorded_model(3);
    model.close_tabs(TabClosureParams::close_tabs(vec![1]));
    assert!(model.commit_closure(1));
    model.close_tabs(TabClosureParams::close_tabs(vec![2]));

    assert!(model.undo_most_recent());
    assert_eq!(model.strip().destroyed_ids(), &[1]);
    assert_eq!(model.live_ids(), vec![2, 3]);

    let recorded = log.borrow().len();
    assert!(!model.undo_most_recent());
    assert_eq!(log.borrow().len(), recorded);
    assert_eq!(model.strip().destroyed_ids(), &[1]);
}

#[test]
fn test_undo_after_reclosing_a_cancelled_tab() {
    let mut model = model_with_titles(&["a", "b", "c"]);
    model.close_tabs(TabClosureParams::close_tabs(vec![1, 2]));
    assert!(model.cancel_closure(1));
    model.close_tabs(TabClosureParams::close_tabs(vec![1]));
    assert!(model.commit_closure(1));
    assert_eq!(model.strip().destroyed_ids(), &[1]);

    assert!(model.undo_most_recent());
    assert_eq!(model.live_ids(), vec![2, 3]);
    assert_eq!(model.strip().destroyed_ids(), &[1]);
    assert_eq!(model.rewound_view().ids(), &[2, 3]);
    assert_eq!(model.ledger().event_count(), 0);
}

#[test]
fn test_undo_with_nothing_pending_returns_false() {
    let mut model = model_with_titles(&["a"]);
    assert!(!model.undo_most_recent());
    assert_eq!(model.live_ids(), vec![1]);
}

#[test]
fn test_structural_changes_commit_pending_closures() {
    let (mut model, log) = recorded_model(3);
    model.close_tabs(TabClosureParams::close_tabs(vec![1]));
    model.create_tab(Some("new"), None);
    assert_eq!(batches(&log), vec![vec![1]]);

    model.close_tabs(TabClosureParams::close_tabs(vec![2]));
    model.move_tab(3, 0);
    assert_eq!(batches(&log), vec![vec![1], vec![2]]);
    assert_eq!(model.rewound_view().ids(), &[3, 4]);
}
