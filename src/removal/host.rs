//! Mutation surface the removal flow works through.

use crate::closure::UndoAction;
use crate::tab::{GroupId, TabGroup, TabId};
use serde::{Deserialize, Serialize};

/// Groups that an operation would leave without any live tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestroyedGroups {
    /// Groups backed by a shared collaboration
    pub collaborations: Vec<GroupId>,
    /// Groups that only sync across the user's own devices
    pub sync_only: Vec<GroupId>,
}

impl DestroyedGroups {
    pub fn is_empty(&self) -> bool {
        self.collaborations.is_empty() && self.sync_only.is_empty()
    }
}

/// Answers which groups would be destroyed if `tabs` left them.
pub trait GroupDestructionNotifier {
    fn groups_destroyed_by(&self, tabs: &[TabId]) -> DestroyedGroups;
}

/// Which tabs a close operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureTarget {
    Tabs(Vec<TabId>),
    All,
}

/// Parameters of a close operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabClosureParams {
    pub target: ClosureTarget,
    /// Keep the closure pending so it can be undone
    pub allow_undo: bool,
    /// The window is shutting down; closures are never kept pending
    pub upon_exit: bool,
    pub undo_action: Option<UndoAction>,
}

impl TabClosureParams {
    pub fn close_tabs(tabs: Vec<TabId>) -> Self {
        Self {
            target: ClosureTarget::Tabs(tabs),
            allow_undo: true,
            upon_exit: false,
            undo_action: None,
        }
    }

    pub fn close_all() -> Self {
        Self {
            target: ClosureTarget::All,
            ..Self::close_tabs(Vec::new())
        }
    }

    pub fn with_allow_undo(mut self, allow_undo: bool) -> Self {
        self.allow_undo = allow_undo;
        self
    }

    pub fn with_upon_exit(mut self, upon_exit: bool) -> Self {
        self.upon_exit = upon_exit;
        self
    }

    pub fn with_undo_action(mut self, undo_action: Option<UndoAction>) -> Self {
        self.undo_action = undo_action;
        self
    }
}

/// Tab collection as seen by flow handlers.
///
/// Handlers never touch the live list or the ledger directly; every mutation
/// goes through this trait.
pub trait TabHost: GroupDestructionNotifier {
    fn is_off_the_record(&self) -> bool;

    /// Live tabs in display order
    fn live_tab_ids(&self) -> Vec<TabId>;

    fn is_tab_closing(&self, id: TabId) -> bool;

    fn is_placeholder(&self, id: TabId) -> bool;

    /// Live tabs belonging to `group`, in display order
    fn tabs_in_group(&self, group: &GroupId) -> Vec<TabId>;

    fn group_of(&self, id: TabId) -> Option<GroupId>;

    fn group(&self, id: &GroupId) -> Option<&TabGroup>;

    /// Close tabs, returning the ids that actually started closing.
    fn close_tabs(&mut self, params: TabClosureParams) -> Vec<TabId>;

    /// Take `tabs` out of their group. `trailing` places them after the
    /// remaining members instead of before.
    fn ungroup_tabs(&mut self, tabs: &[TabId], trailing: bool);

    /// Move a tab out of this collection without closing it.
    fn detach_tab(&mut self, id: TabId) -> bool;

    fn commit_all_pending_closures(&mut self);

    /// Add an empty tab to `group` so the group survives its other tabs leaving.
    fn add_placeholder_tab(&mut self, group: &GroupId) -> Option<TabId>;
}

/// Creates placeholder tabs that keep collaboration groups alive.
pub trait PlaceholderFactory {
    fn create_placeholders(&mut self, host: &mut dyn TabHost, groups: &[GroupId]) -> Vec<TabId>;
}

/// Adds one placeholder tab per group through the host.
#[derive(Debug, Default)]
pub struct GroupPlaceholderFactory;

impl PlaceholderFactory for GroupPlaceholderFactory {
    fn create_placeholders(&mut self, host: &mut dyn TabHost, groups: &[GroupId]) -> Vec<TabId> {
        groups
            .iter()
            .filter_map(|group| {
                let id = host.add_placeholder_tab(group);
                if id.is_none() {
                    log::warn!("Could not add placeholder tab to group {}", group);
                }
                id
            })
            .collect()
    }
}
