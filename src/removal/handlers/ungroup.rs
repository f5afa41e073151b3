//! Take tabs out of a group.

use super::{ActionContext, FlowHandler, FlowKind};
use crate::removal::host::{DestroyedGroups, TabHost};
use crate::tab::{GroupId, TabId};

#[derive(Debug, Clone)]
pub struct UngroupHandler {
    group: GroupId,
    tabs: Vec<TabId>,
    trailing: bool,
    placeholders: Vec<TabId>,
}

impl UngroupHandler {
    /// Ungroup `tabs` from `group`; `trailing` places them after the members
    /// that stay.
    pub fn new(group: GroupId, tabs: Vec<TabId>, trailing: bool) -> Self {
        Self {
            group,
            tabs,
            trailing,
            placeholders: Vec::new(),
        }
    }

    /// Ungroup every tab of `group`.
    pub fn whole_group(host: &dyn TabHost, group: GroupId) -> Self {
        Self::new(group, host.tabs_in_group(&group), false)
    }

    pub fn placeholders(&self) -> &[TabId] {
        &self.placeholders
    }

    /// Requested tabs that are still members of the group.
    fn targets(&self, host: &dyn TabHost) -> Vec<TabId> {
        self.tabs
            .iter()
            .copied()
            .filter(|&id| host.group_of(id) == Some(self.group))
            .collect()
    }
}

impl FlowHandler for UngroupHandler {
    fn kind(&self) -> FlowKind {
        FlowKind::Ungroup
    }

    fn groups_destroyed(&self, host: &dyn TabHost) -> DestroyedGroups {
        host.groups_destroyed_by(&self.targets(host))
    }

    fn placeholders_created(&mut self, placeholders: Vec<TabId>) {
        self.placeholders = placeholders;
    }

    fn perform_action(&mut self, host: &mut dyn TabHost, _ctx: &ActionContext) {
        // Membership may have changed while a dialog was up.
        let targets = self.targets(host);
        if targets.is_empty() {
            log::debug!("Ungroup flow has no tabs left in group {}", self.group);
            return;
        }
        log::info!("Ungrouping tabs {:?} from group {}", targets, self.group);
        host.ungroup_tabs(&targets, self.trailing);
    }
}
