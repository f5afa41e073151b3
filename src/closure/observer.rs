//! Ledger notifications.

use super::{RewoundView, UndoAction};
use crate::tab::TabId;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Listener for pending-closure lifecycle events.
///
/// All methods default to no-ops so observers only implement what they need.
/// Finalization callbacks receive the view after the finalized tabs have been
/// removed from it.
pub trait PendingClosureObserver {
    /// A cancelled tab is back in the live list at `index`.
    fn item_reinserted(&mut self, _id: TabId, _index: usize) {}

    /// A batch of tabs is about to be finalized.
    fn batch_finishing(&mut self, _ids: &[TabId], _view: &RewoundView) {}

    /// One tab of a committing batch has been destroyed.
    fn item_finalized(&mut self, _id: TabId, _view: &RewoundView) {}

    /// Every pending closure was cancelled at once.
    fn all_undone(&mut self) {}

    /// A whole event ended with at least one cancel.
    fn event_cancelled(&mut self, _undo_action: Option<UndoAction>) {}
}

/// One recorded ledger notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum LedgerEvent {
    ItemReinserted { id: TabId, index: usize },
    BatchFinishing { ids: Vec<TabId>, view: Vec<TabId> },
    ItemFinalized { id: TabId, view: Vec<TabId> },
    AllUndone,
    EventCancelled { undo_action: Option<UndoAction> },
}

/// Observer that appends every notification to a shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    log: Rc<RefCell<Vec<LedgerEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded events; stays valid after the observer
    /// has been boxed into the ledger.
    pub fn log(&self) -> Rc<RefCell<Vec<LedgerEvent>>> {
        Rc::clone(&self.log)
    }

    fn push(&self, event: LedgerEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl PendingClosureObserver for RecordingObserver {
    fn item_reinserted(&mut self, id: TabId, index: usize) {
        self.push(LedgerEvent::ItemReinserted { id, index });
    }

    fn batch_finishing(&mut self, ids: &[TabId], view: &RewoundView) {
        self.push(LedgerEvent::BatchFinishing {
            ids: ids.to_vec(),
            view: view.ids().to_vec(),
        });
    }

    fn item_finalized(&mut self, id: TabId, view: &RewoundView) {
        self.push(LedgerEvent::ItemFinalized {
            id,
            view: view.ids().to_vec(),
        });
    }

    fn all_undone(&mut self) {
        self.push(LedgerEvent::AllUndone);
    }

    fn event_cancelled(&mut self, undo_action: Option<UndoAction>) {
        self.push(LedgerEvent::EventCancelled { undo_action });
    }
}
