//! A single close operation tracked by the ledger.

use crate::tab::TabId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque handle for the host's undo affordance (e.g. a snackbar entry),
/// handed back through `event_cancelled` when the whole event is undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UndoAction(pub u64);

/// Tabs closed together by one close operation.
///
/// Every member starts unhandled and leaves the unhandled set exactly once,
/// either by commit or by cancel. A cancelled member is handed back to the
/// live list and stops being a member, so it can join a later event.
#[derive(Debug, Clone)]
pub struct ClosureEvent {
    tabs: Vec<TabId>,
    unhandled: HashSet<TabId>,
    undo_action: Option<UndoAction>,
}

impl ClosureEvent {
    pub fn new(tabs: Vec<TabId>, undo_action: Option<UndoAction>) -> Self {
        let unhandled = tabs.iter().copied().collect();
        Self {
            tabs,
            unhandled,
            undo_action,
        }
    }

    /// Members not cancelled so far, in display order at closure time
    pub fn tabs(&self) -> &[TabId] {
        &self.tabs
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.contains(&id)
    }

    pub fn is_unhandled(&self, id: TabId) -> bool {
        self.unhandled.contains(&id)
    }

    pub fn is_fully_handled(&self) -> bool {
        self.unhandled.is_empty()
    }

    pub fn undo_action(&self) -> Option<UndoAction> {
        self.undo_action
    }

    /// Mark a member handled as committed. Returns false if it was already handled.
    pub(crate) fn handle_commit(&mut self, id: TabId) -> bool {
        self.unhandled.remove(&id)
    }

    /// Mark a member handled as cancelled. Returns false if it was already handled.
    pub(crate) fn handle_cancel(&mut self, id: TabId) -> bool {
        if !self.unhandled.remove(&id) {
            return false;
        }
        self.tabs.retain(|&t| t != id);
        true
    }

    /// Members that will be finalized when this event commits, in order.
    pub fn committable(&self) -> Vec<TabId> {
        self.tabs.clone()
    }
}
