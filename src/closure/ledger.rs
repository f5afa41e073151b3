//! Pending closure ledger
//!
//! Tracks every close operation that has not been finalized yet. Each close
//! becomes a [`ClosureEvent`]; members are committed or cancelled one by one
//! as the host's per-tab "ready" signals arrive, and the event is finalized
//! as a single batch once every member has been handled.
//!
//! The ledger never owns tabs. It flags, reinserts and finalizes them through
//! the [`TabList`] passed into each call, and keeps a [`RewoundView`] of the
//! list as it would look if every pending closure were undone.

use super::{ClosureEvent, PendingClosureObserver, RewoundView, UndoAction};
use crate::observer::{ObserverHandle, ObserverList};
use crate::tab::{TabId, TabList};
use crate::thread_check::ThreadChecker;
use std::collections::VecDeque;

/// FIFO queue of pending close operations for one tab list
pub struct PendingClosureLedger {
    /// Oldest event first; members across events are disjoint
    events: VecDeque<ClosureEvent>,
    rewound: RewoundView,
    observers: ObserverList<dyn PendingClosureObserver>,
    /// Set while `commit_all_pending` drains the queue
    bulk_committing: bool,
    thread: ThreadChecker,
}

impl PendingClosureLedger {
    /// Create a ledger whose rewound view mirrors `list`.
    pub fn new<L: TabList + ?Sized>(list: &L) -> Self {
        Self {
            events: VecDeque::new(),
            rewound: RewoundView::from_list(list),
            observers: ObserverList::new(),
            bulk_committing: false,
            thread: ThreadChecker::new(),
        }
    }

    #[track_caller]
    fn assert_mutable(&self, operation: &str) {
        self.thread.assert_current(operation);
        assert!(
            !self.bulk_committing,
            "{operation} called while committing all pending closures"
        );
    }

    /// Register a new close operation covering `tabs`.
    ///
    /// The tabs must already be out of the live list and still present in the
    /// rewound view. Panics if any of them belongs to another pending event.
    pub fn add_closure_event<L: TabList + ?Sized>(
        &mut self,
        list: &L,
        tabs: Vec<TabId>,
        undo_action: Option<UndoAction>,
    ) {
        self.assert_mutable("add_closure_event");
        if let Some(dup) = tabs
            .iter()
            .find(|&&id| self.events.iter().any(|e| e.contains(id)))
        {
            panic!("tab {dup} is already pending closure");
        }
        if tabs.is_empty() {
            log::debug!("Ignoring empty closure event");
            return;
        }
        debug_assert!(
            tabs.iter().all(|&id| list.index_of(id).is_none()),
            "closing tabs must be detached from the live list"
        );

        log::info!(
            "Added closure event for tabs {:?} (pending events: {})",
            tabs,
            self.events.len() + 1
        );
        self.events.push_back(ClosureEvent::new(tabs, undo_action));
    }

    /// Handle `id` as committed.
    ///
    /// Returns false when `id` is not waiting on a decision. Once every member
    /// of its event is handled, the members that were not cancelled are
    /// finalized together.
    pub fn commit<L: TabList + ?Sized>(&mut self, list: &mut L, id: TabId) -> bool {
        self.assert_mutable("commit");
        let Some(pos) = self.events.iter().position(|e| e.is_unhandled(id)) else {
            return false;
        };
        self.events[pos].handle_commit(id);
        log::debug!("Tab {} handled as commit", id);

        if self.events[pos].is_fully_handled()
            && let Some(event) = self.events.remove(pos)
        {
            log::info!("Closure event {:?} fully handled, committing", event.tabs());
            self.commit_batch(list, &event.committable());
        }
        true
    }

    /// Handle `id` as cancelled and put it back into the live list.
    ///
    /// Returns false when `id` is not waiting on a decision. If this was the
    /// last unhandled member, the rest of the event is finalized and observers
    /// receive the event's undo action.
    pub fn cancel<L: TabList + ?Sized>(&mut self, list: &mut L, id: TabId) -> bool {
        self.assert_mutable("cancel");
        let Some(pos) = self.events.iter().position(|e| e.is_unhandled(id)) else {
            return false;
        };
        self.events[pos].handle_cancel(id);
        log::debug!("Tab {} handled as cancel", id);
        self.reinsert(list, id);

        if self.events[pos].is_fully_handled()
            && let Some(event) = self.events.remove(pos)
        {
            log::info!("Closure event {:?} cancelled", event.tabs());
            let committable = event.committable();
            if !committable.is_empty() {
                self.commit_batch(list, &committable);
            }
            let undo_action = event.undo_action();
            self.observers.for_each(|o| o.event_cancelled(undo_action));
        }
        true
    }

    /// Finalize every pending event in FIFO order, one batch per event.
    pub fn commit_all_pending<L: TabList + ?Sized>(&mut self, list: &mut L) {
        self.assert_mutable("commit_all_pending");
        if self.events.is_empty() {
            return;
        }
        log::info!("Committing all {} pending closure events", self.events.len());

        self.bulk_committing = true;
        while let Some(event) = self.events.pop_front() {
            let committable = event.committable();
            if !committable.is_empty() {
                self.commit_batch(list, &committable);
            }
        }
        self.bulk_committing = false;

        assert!(self.events.is_empty(), "closure events left after commit all");
        assert_eq!(
            self.rewound.len(),
            list.len(),
            "pending tabs left in rewound view after commit all"
        );
    }

    /// Undo the newest close operation, reinserting all of its members.
    ///
    /// Returns false without touching anything when nothing is pending.
    pub fn undo_most_recent_event<L: TabList + ?Sized>(&mut self, list: &mut L) -> bool {
        self.assert_mutable("undo_most_recent_event");
        let Some(event) = self.events.pop_back() else {
            return false;
        };
        log::info!("Undoing closure event {:?}", event.tabs());
        for &id in event.tabs() {
            self.reinsert(list, id);
        }
        true
    }

    /// Drop every pending event and rebuild the view from the live list.
    pub fn reset<L: TabList + ?Sized>(&mut self, list: &L) {
        self.assert_mutable("reset");
        if !self.events.is_empty() {
            log::warn!("Resetting ledger with {} pending events", self.events.len());
        }
        self.events.clear();
        self.rewound.reset(list);
    }

    /// Tell observers that every pending closure has just been cancelled.
    pub fn notify_all_undone(&mut self) {
        self.thread.assert_current("notify_all_undone");
        self.observers.for_each(|o| o.all_undone());
    }

    /// Whether `id` has been closed but not finalized.
    pub fn is_closure_pending<L: TabList + ?Sized>(&self, list: &L, id: TabId) -> bool {
        self.rewound.find_pending(list, id).is_some()
    }

    pub fn rewound_view(&self) -> &RewoundView {
        &self.rewound
    }

    /// Tabs waiting to be finalized, oldest event first.
    pub fn pending_ids(&self) -> Vec<TabId> {
        self.events.iter().flat_map(|e| e.committable()).collect()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn add_observer(&mut self, observer: Box<dyn PendingClosureObserver>) -> ObserverHandle {
        self.observers.add(observer)
    }

    pub fn remove_observer(
        &mut self,
        handle: ObserverHandle,
    ) -> Option<Box<dyn PendingClosureObserver>> {
        self.observers.remove(handle)
    }

    fn reinsert<L: TabList + ?Sized>(&mut self, list: &mut L, id: TabId) {
        if list.index_of(id).is_some() {
            return;
        }
        let Some(stop) = self.rewound.index_of(id) else {
            debug_assert!(false, "reinserted tab {id} is not in the rewound view");
            log::warn!("Tab {} missing from rewound view, not reinserting", id);
            return;
        };

        let index = self.rewound.live_insertion_index(list, stop);
        list.set_closing(id, false);
        list.insert_at(id, index);
        log::debug!("Reinserted tab {} at live index {}", id, index);
        self.observers.for_each(|o| o.item_reinserted(id, index));
    }

    fn commit_batch<L: TabList + ?Sized>(&mut self, list: &mut L, ids: &[TabId]) {
        for &id in ids {
            assert!(
                self.rewound.remove(id),
                "committed tab {id} missing from rewound view"
            );
        }

        let view = &self.rewound;
        self.observers.for_each(|o| o.batch_finishing(ids, view));

        for &id in ids {
            list.finalize_closure(id);
            self.observers.for_each(|o| o.item_finalized(id, view));
        }
        log::info!("Finalized closure of tabs {:?}", ids);
    }
}

impl std::fmt::Debug for PendingClosureLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingClosureLedger")
            .field("events", &self.events)
            .field("rewound", &self.rewound)
            .field("observers", &self.observers)
            .field("bulk_committing", &self.bulk_committing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::{LedgerEvent, RecordingObserver};
    use crate::tab::TabStrip;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<LedgerEvent>>>;

    fn setup(count: usize) -> (TabStrip, PendingClosureLedger, Log) {
        let mut strip = TabStrip::new(false);
        for _ in 0..count {
            strip.new_tab();
        }
        let mut ledger = PendingClosureLedger::new(&strip);
        let recorder = RecordingObserver::new();
        let log = recorder.log();
        ledger.add_observer(Box::new(recorder));
        (strip, ledger, log)
    }

    fn close(
        strip: &mut TabStrip,
        ledger: &mut PendingClosureLedger,
        ids: &[TabId],
        undo_action: Option<UndoAction>,
    ) {
        for &id in ids {
            assert!(strip.begin_closing(id));
        }
        ledger.add_closure_event(strip, ids.to_vec(), undo_action);
    }

    #[test]
    fn view_keeps_pending_tabs() {
        let (mut strip, mut ledger, _) = setup(4);
        close(&mut strip, &mut ledger, &[2, 3], None);

        assert_eq!(strip.live_ids(), vec![1, 4]);
        assert_eq!(ledger.rewound_view().ids(), &[1, 2, 3, 4]);
        assert!(ledger.rewound_view().len() >= strip.len());
        assert!(ledger.is_closure_pending(&strip, 2));
        assert!(!ledger.is_closure_pending(&strip, 1));
        assert_eq!(ledger.pending_ids(), vec![2, 3]);
    }

    #[test]
    fn cancel_reinserts_between_live_neighbors() {
        // live = [A, C, F], view = [A, B, C, D, E, F]
        let (mut strip, mut ledger, log) = setup(6);
        close(&mut strip, &mut ledger, &[2], None);
        close(&mut strip, &mut ledger, &[4], None);
        close(&mut strip, &mut ledger, &[5], None);
        assert_eq!(strip.live_ids(), vec![1, 3, 6]);

        assert!(ledger.cancel(&mut strip, 4));
        assert_eq!(strip.live_ids(), vec![1, 3, 4, 6]);
        assert!(ledger.cancel(&mut strip, 5));
        assert_eq!(strip.live_ids(), vec![1, 3, 4, 5, 6]);

        let log = log.borrow();
        assert_eq!(log[0], LedgerEvent::ItemReinserted { id: 4, index: 2 });
        assert_eq!(log[1], LedgerEvent::EventCancelled { undo_action: None });
        assert_eq!(log[2], LedgerEvent::ItemReinserted { id: 5, index: 3 });
    }

    #[test]
    fn commit_and_cancel_ignore_unknown_and_handled_tabs() {
        let (mut strip, mut ledger, log) = setup(3);
        close(&mut strip, &mut ledger, &[1, 2], None);

        assert!(!ledger.commit(&mut strip, 3));
        assert!(!ledger.cancel(&mut strip, 3));
        assert!(ledger.commit(&mut strip, 1));
        assert!(!ledger.commit(&mut strip, 1));
        assert!(!ledger.cancel(&mut strip, 1));
        assert!(log.borrow().is_empty());
        assert_eq!(ledger.event_count(), 1);
    }

    #[test]
    fn event_commits_as_one_batch_once_fully_handled() {
        let (mut strip, mut ledger, log) = setup(4);
        close(&mut strip, &mut ledger, &[1, 2, 3], None);

        ledger.commit(&mut strip, 2);
        ledger.commit(&mut strip, 1);
        assert!(log.borrow().is_empty());
        assert!(strip.destroyed_ids().is_empty());

        ledger.commit(&mut strip, 3);
        assert_eq!(ledger.event_count(), 0);
        assert_eq!(strip.destroyed_ids(), &[1, 2, 3]);
        assert_eq!(
            *log.borrow(),
            vec![
                LedgerEvent::BatchFinishing {
                    ids: vec![1, 2, 3],
                    view: vec![4],
                },
                LedgerEvent::ItemFinalized { id: 1, view: vec![4] },
                LedgerEvent::ItemFinalized { id: 2, view: vec![4] },
                LedgerEvent::ItemFinalized { id: 3, view: vec![4] },
            ]
        );
    }

    #[test]
    fn partially_cancelled_event_commits_remaining_members() {
        let (mut strip, mut ledger, log) = setup(3);
        close(&mut strip, &mut ledger, &[1, 2, 3], None);

        ledger.commit(&mut strip, 1);
        ledger.cancel(&mut strip, 2);
        ledger.commit(&mut strip, 3);

        assert_eq!(strip.live_ids(), vec![2]);
        assert_eq!(strip.destroyed_ids(), &[1, 3]);
        let log = log.borrow();
        assert_eq!(log[0], LedgerEvent::ItemReinserted { id: 2, index: 0 });
        assert_eq!(
            log[1],
            LedgerEvent::BatchFinishing {
                ids: vec![1, 3],
                view: vec![2],
            }
        );
        assert!(
            !log.iter()
                .any(|e| matches!(e, LedgerEvent::EventCancelled { .. }))
        );
    }

    #[test]
    fn cancel_of_last_member_reports_undo_action() {
        let (mut strip, mut ledger, log) = setup(3);
        close(&mut strip, &mut ledger, &[1, 2], Some(UndoAction(7)));

        ledger.commit(&mut strip, 1);
        ledger.cancel(&mut strip, 2);

        assert_eq!(
            *log.borrow(),
            vec![
                LedgerEvent::ItemReinserted { id: 2, index: 0 },
                LedgerEvent::BatchFinishing {
                    ids: vec![1],
                    view: vec![2, 3],
                },
                LedgerEvent::ItemFinalized {
                    id: 1,
                    view: vec![2, 3],
                },
                LedgerEvent::EventCancelled {
                    undo_action: Some(UndoAction(7)),
                },
            ]
        );
    }

    #[test]
    fn commit_all_drains_events_in_fifo_order() {
        let (mut strip, mut ledger, log) = setup(4);
        close(&mut strip, &mut ledger, &[3], None);
        close(&mut strip, &mut ledger, &[1, 2], None);

        ledger.commit_all_pending(&mut strip);

        assert_eq!(ledger.event_count(), 0);
        assert_eq!(ledger.rewound_view().ids(), &[4]);
        let batches: Vec<Vec<TabId>> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                LedgerEvent::BatchFinishing { ids, .. } => Some(ids.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(batches, vec![vec![3], vec![1, 2]]);
    }

    #[test]
    fn undo_restores_only_newest_event() {
        let (mut strip, mut ledger, log) = setup(3);
        close(&mut strip, &mut ledger, &[1], None);
        close(&mut strip, &mut ledger, &[2, 3], Some(UndoAction(1)));

        assert!(ledger.undo_most_recent_event(&mut strip));
        assert_eq!(strip.live_ids(), vec![2, 3]);
        assert_eq!(ledger.event_count(), 1);
        assert!(ledger.is_closure_pending(&strip, 1));
        assert!(
            !log.borrow()
                .iter()
                .any(|e| matches!(e, LedgerEvent::EventCancelled { .. }))
        );

        assert!(ledger.undo_most_recent_event(&mut strip));
        assert!(!ledger.undo_most_recent_event(&mut strip));
        assert_eq!(strip.live_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn cancelled_member_can_be_closed_again() {
        let (mut strip, mut ledger, _) = setup(3);
        close(&mut strip, &mut ledger, &[1, 2], None);
        ledger.cancel(&mut strip, 1);

        close(&mut strip, &mut ledger, &[1], None);
        assert_eq!(ledger.event_count(), 2);
        assert!(ledger.commit(&mut strip, 1));
        assert_eq!(strip.destroyed_ids(), &[1]);
    }

    #[test]
    fn undo_skips_member_finalized_by_a_later_event() {
        let (mut strip, mut ledger, _) = setup(3);
        close(&mut strip, &mut ledger, &[1, 2], None);
        ledger.cancel(&mut strip, 1);
        close(&mut strip, &mut ledger, &[1], None);
        ledger.commit(&mut strip, 1);

        assert!(ledger.undo_most_recent_event(&mut strip));
        assert_eq!(strip.destroyed_ids(), &[1]);
        assert_eq!(strip.live_ids(), vec![2, 3]);
        assert_eq!(ledger.rewound_view().ids(), &[2, 3]);
        assert_eq!(ledger.event_count(), 0);
    }

    #[test]
    fn reset_discards_pending_state() {
        let (mut strip, mut ledger, _) = setup(3);
        close(&mut strip, &mut ledger, &[2], None);
        ledger.reset(&strip);
        assert_eq!(ledger.event_count(), 0);
        assert_eq!(ledger.rewound_view().ids(), &[1, 3]);
        assert!(!ledger.commit(&mut strip, 2));
    }

    #[test]
    fn observers_run_in_registration_order() {
        let (mut strip, mut ledger, first) = setup(2);
        let second = RecordingObserver::new();
        let second_log = second.log();
        let handle = ledger.add_observer(Box::new(second));

        ledger.notify_all_undone();
        assert_eq!(*first.borrow(), vec![LedgerEvent::AllUndone]);
        assert_eq!(*second_log.borrow(), vec![LedgerEvent::AllUndone]);

        assert!(ledger.remove_observer(handle).is_some());
        close(&mut strip, &mut ledger, &[1], None);
        ledger.cancel(&mut strip, 1);
        assert_eq!(second_log.borrow().len(), 1);
        assert_eq!(first.borrow().len(), 3);
    }

    #[test]
    #[should_panic(expected = "already pending closure")]
    fn adding_pending_tab_twice_panics() {
        let (mut strip, mut ledger, _) = setup(2);
        close(&mut strip, &mut ledger, &[1], None);
        ledger.add_closure_event(&strip, vec![1], None);
    }

    #[test]
    #[should_panic(expected = "while committing all pending closures")]
    fn mutation_during_bulk_commit_panics() {
        let (mut strip, mut ledger, _) = setup(2);
        close(&mut strip, &mut ledger, &[1], None);
        ledger.bulk_committing = true;
        ledger.cancel(&mut strip, 1);
    }

    #[test]
    #[should_panic(expected = "missing from rewound view")]
    fn committing_tab_outside_view_panics() {
        let (mut strip, mut ledger, _) = setup(1);
        let stray = strip.new_tab();
        strip.begin_closing(stray);
        ledger.add_closure_event(&strip, vec![stray], None);
        ledger.commit(&mut strip, stray);
    }
}
