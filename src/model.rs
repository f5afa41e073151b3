//! Tab model for a single window
//!
//! `TabModel` owns the live [`TabStrip`], the [`PendingClosureLedger`] that
//! tracks its pending closures, and the registry of tab groups. It is the
//! [`TabHost`] removal flows operate on.
//!
//! Any structural change other than a close (creating, moving, detaching,
//! ungrouping tabs) first commits every pending closure and then resets the
//! ledger, so the rewound view never has to reconcile foreign mutations.

use crate::closure::{PendingClosureLedger, PendingClosureObserver, RewoundView};
use crate::config::Config;
use crate::observer::ObserverHandle;
use crate::removal::{
    ClosureTarget, DestroyedGroups, GroupDestructionNotifier, TabClosureParams, TabHost,
};
use crate::tab::{GroupId, GroupKind, Tab, TabGroup, TabId, TabList, TabStrip};
use std::collections::HashSet;

/// Title given to placeholder tabs
const PLACEHOLDER_TITLE: &str = "New Tab";

/// Tabs, groups and pending closures of one window
pub struct TabModel {
    strip: TabStrip,
    ledger: PendingClosureLedger,
    /// Groups in creation order
    groups: Vec<TabGroup>,
    /// Whether closures may stay pending (undoable) in this model
    pending_enabled: bool,
}

impl TabModel {
    /// Create an empty model with default settings
    pub fn new(off_the_record: bool) -> Self {
        Self::with_config(off_the_record, &Config::default())
    }

    /// Create an empty model honouring the undo settings in `config`
    pub fn with_config(off_the_record: bool, config: &Config) -> Self {
        let strip = TabStrip::new(off_the_record);
        let ledger = PendingClosureLedger::new(&strip);
        let pending_enabled = config.undo.enabled
            && (!off_the_record || config.undo.off_the_record_pending_closures);
        log::info!(
            "Created tab model (off_the_record={}, pending closures {})",
            off_the_record,
            if pending_enabled { "enabled" } else { "disabled" }
        );
        Self {
            strip,
            ledger,
            groups: Vec::new(),
            pending_enabled,
        }
    }

    /// Whether closures in this model can be undone
    pub fn supports_pending_closures(&self) -> bool {
        self.pending_enabled
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Register a new group and return its id
    pub fn add_group(&mut self, title: &str, kind: GroupKind) -> GroupId {
        let group = TabGroup::new(title, kind);
        let id = group.id;
        log::info!("Added group '{}' ({})", title, id);
        self.groups.push(group);
        id
    }

    /// Append a new tab and make it active
    pub fn create_tab(&mut self, title: Option<&str>, group: Option<GroupId>) -> TabId {
        self.commit_all_closures();
        let id = self.strip.new_tab();
        if let Some(tab) = self.strip.get_tab_mut(id) {
            if let Some(title) = title {
                tab.set_title(title);
            }
            tab.group = group;
        }
        self.ledger.reset(&self.strip);
        id
    }

    /// Move a live tab to `index`
    pub fn move_tab(&mut self, id: TabId, index: usize) -> bool {
        self.commit_all_closures();
        let moved = self.strip.move_tab_to_index(id, index);
        self.ledger.reset(&self.strip);
        moved
    }

    pub fn switch_to(&mut self, id: TabId) {
        self.strip.switch_to(id);
    }

    /// Add a placeholder tab right after the last live member of `group`
    pub fn add_placeholder_tab(&mut self, group: &GroupId) -> Option<TabId> {
        self.group(group)?;
        self.commit_all_closures();

        let index = self
            .strip
            .tabs()
            .iter()
            .rposition(|t| t.group.as_ref() == Some(group))
            .map_or(self.strip.len(), |idx| idx + 1);
        let id = self.strip.allocate_id();
        let mut tab = Tab::with_title(id, PLACEHOLDER_TITLE);
        tab.group = Some(*group);
        tab.is_placeholder = true;
        self.strip.insert_tab_at(tab, index);
        self.ledger.reset(&self.strip);

        log::info!("Added placeholder tab {} to group {}", id, group);
        Some(id)
    }

    /// Take `tabs` out of their groups, moving each next to the members that stay
    pub fn ungroup_tabs(&mut self, tabs: &[TabId], trailing: bool) {
        self.commit_all_closures();

        // Trailing tabs are placed after the last remaining member one by
        // one, so walk them backwards to keep their relative order.
        let ordered: Vec<TabId> = if trailing {
            tabs.iter().rev().copied().collect()
        } else {
            tabs.to_vec()
        };
        for id in ordered {
            let Some(group) = self.strip.get_tab_mut(id).and_then(|t| t.group.take()) else {
                continue;
            };
            let remaining: Vec<usize> = self
                .strip
                .tabs()
                .iter()
                .enumerate()
                .filter(|(_, t)| t.group == Some(group))
                .map(|(idx, _)| idx)
                .collect();
            let (Some(&first), Some(&last), Some(current)) =
                (remaining.first(), remaining.last(), self.strip.index_of(id))
            else {
                continue;
            };
            let target = match (trailing, current < first, current < last) {
                (true, _, true) => last,
                (true, _, false) => last + 1,
                (false, true, _) => first - 1,
                (false, false, _) => first,
            };
            self.strip.move_tab_to_index(id, target);
            log::debug!("Ungrouped tab {} from group {}", id, group);
        }

        self.ledger.reset(&self.strip);
    }

    /// Move a tab out of this model without closing it
    pub fn detach_tab(&mut self, id: TabId) -> bool {
        self.commit_all_closures();
        let detached = self.strip.detach_tab(id).is_some();
        self.ledger.reset(&self.strip);
        if detached {
            log::info!("Detached tab {}", id);
        }
        detached
    }

    // ========================================================================
    // Closing
    // ========================================================================

    /// Close tabs, returning the ids that started closing.
    ///
    /// Tabs that are not live are ignored. When the closure cannot be undone
    /// (undo disallowed, unsupported, or closing on exit), every pending
    /// closure is committed first and the new tabs are finalized as one batch.
    pub fn close_tabs(&mut self, params: TabClosureParams) -> Vec<TabId> {
        let requested = match params.target {
            ClosureTarget::Tabs(tabs) => tabs,
            ClosureTarget::All => self.strip.live_ids(),
        };
        let mut seen = HashSet::new();
        let tabs: Vec<TabId> = requested
            .into_iter()
            .filter(|&id| self.strip.is_live(id) && seen.insert(id))
            .collect();
        if tabs.is_empty() {
            return tabs;
        }

        let can_undo = params.allow_undo && self.pending_enabled && !params.upon_exit;
        if !can_undo {
            self.commit_all_closures();
        }
        for &id in &tabs {
            self.strip.begin_closing(id);
        }

        if can_undo {
            log::info!("Closing tabs {:?} (undoable)", tabs);
            self.ledger
                .add_closure_event(&self.strip, tabs.clone(), params.undo_action);
        } else {
            log::info!("Closing tabs {:?} (immediate)", tabs);
            self.ledger.add_closure_event(&self.strip, tabs.clone(), None);
            for &id in &tabs {
                self.ledger.commit(&mut self.strip, id);
            }
        }
        tabs
    }

    /// The host finished tearing down `id`; finalize it when its event completes
    pub fn commit_closure(&mut self, id: TabId) -> bool {
        self.ledger.commit(&mut self.strip, id)
    }

    /// Undo the closure of `id`
    pub fn cancel_closure(&mut self, id: TabId) -> bool {
        self.ledger.cancel(&mut self.strip, id)
    }

    pub fn commit_all_closures(&mut self) {
        self.ledger.commit_all_pending(&mut self.strip);
    }

    /// Undo every pending closure
    pub fn cancel_all_closures(&mut self) {
        let pending = self.ledger.pending_ids();
        if pending.is_empty() {
            return;
        }
        for id in pending {
            self.ledger.cancel(&mut self.strip, id);
        }
        self.ledger.notify_all_undone();
    }

    /// Undo the most recent close operation
    pub fn undo_most_recent(&mut self) -> bool {
        self.ledger.undo_most_recent_event(&mut self.strip)
    }

    // ========================================================================
    // Observation
    // ========================================================================

    pub fn add_observer(&mut self, observer: Box<dyn PendingClosureObserver>) -> ObserverHandle {
        self.ledger.add_observer(observer)
    }

    pub fn remove_observer(
        &mut self,
        handle: ObserverHandle,
    ) -> Option<Box<dyn PendingClosureObserver>> {
        self.ledger.remove_observer(handle)
    }

    pub fn ledger(&self) -> &PendingClosureLedger {
        &self.ledger
    }

    pub fn strip(&self) -> &TabStrip {
        &self.strip
    }

    pub fn rewound_view(&self) -> &RewoundView {
        self.ledger.rewound_view()
    }

    pub fn is_closure_pending(&self, id: TabId) -> bool {
        self.ledger.is_closure_pending(&self.strip, id)
    }

    pub fn live_ids(&self) -> Vec<TabId> {
        self.strip.live_ids()
    }

    pub fn groups(&self) -> &[TabGroup] {
        &self.groups
    }

    pub fn group(&self, id: &GroupId) -> Option<&TabGroup> {
        self.groups.iter().find(|g| g.id == *id)
    }

    /// Group of a live or pending tab
    pub fn group_of(&self, id: TabId) -> Option<GroupId> {
        self.strip.get_tab(id).and_then(|t| t.group)
    }

    /// Live, non-closing members of `group`, in display order
    pub fn tabs_in_group(&self, group: &GroupId) -> Vec<TabId> {
        self.strip
            .tabs()
            .iter()
            .filter(|t| t.group.as_ref() == Some(group) && !t.is_closing())
            .map(|t| t.id)
            .collect()
    }
}

impl GroupDestructionNotifier for TabModel {
    fn groups_destroyed_by(&self, tabs: &[TabId]) -> DestroyedGroups {
        let leaving: HashSet<TabId> = tabs.iter().copied().collect();
        let mut destroyed = DestroyedGroups::default();
        for group in &self.groups {
            let members = self.tabs_in_group(&group.id);
            if members.is_empty() || !members.iter().all(|id| leaving.contains(id)) {
                continue;
            }
            if group.kind.is_collaboration() {
                destroyed.collaborations.push(group.id);
            } else {
                destroyed.sync_only.push(group.id);
            }
        }
        destroyed
    }
}

impl TabHost for TabModel {
    fn is_off_the_record(&self) -> bool {
        self.strip.is_off_the_record()
    }

    fn live_tab_ids(&self) -> Vec<TabId> {
        self.strip.live_ids()
    }

    fn is_tab_closing(&self, id: TabId) -> bool {
        self.strip.get_tab(id).is_some_and(|t| t.is_closing())
    }

    fn is_placeholder(&self, id: TabId) -> bool {
        self.strip.get_tab(id).is_some_and(|t| t.is_placeholder)
    }

    fn tabs_in_group(&self, group: &GroupId) -> Vec<TabId> {
        TabModel::tabs_in_group(self, group)
    }

    fn group_of(&self, id: TabId) -> Option<GroupId> {
        TabModel::group_of(self, id)
    }

    fn group(&self, id: &GroupId) -> Option<&TabGroup> {
        TabModel::group(self, id)
    }

    fn close_tabs(&mut self, params: TabClosureParams) -> Vec<TabId> {
        TabModel::close_tabs(self, params)
    }

    fn ungroup_tabs(&mut self, tabs: &[TabId], trailing: bool) {
        TabModel::ungroup_tabs(self, tabs, trailing);
    }

    fn detach_tab(&mut self, id: TabId) -> bool {
        TabModel::detach_tab(self, id)
    }

    fn commit_all_pending_closures(&mut self) {
        self.commit_all_closures();
    }

    fn add_placeholder_tab(&mut self, group: &GroupId) -> Option<TabId> {
        TabModel::add_placeholder_tab(self, group)
    }
}
