//! Move a tab out of the collection without closing it.

use super::{ActionContext, FlowHandler, FlowKind};
use crate::removal::host::{DestroyedGroups, TabHost};
use crate::tab::TabId;

/// Detaches a single tab, e.g. when it is dragged to another window.
#[derive(Debug, Clone)]
pub struct RemoveTabHandler {
    tab: TabId,
    placeholders: Vec<TabId>,
}

impl RemoveTabHandler {
    pub fn new(tab: TabId) -> Self {
        Self {
            tab,
            placeholders: Vec::new(),
        }
    }

    pub fn placeholders(&self) -> &[TabId] {
        &self.placeholders
    }
}

impl FlowHandler for RemoveTabHandler {
    fn kind(&self) -> FlowKind {
        FlowKind::Remove
    }

    fn supports_dialogs(&self) -> bool {
        false
    }

    fn groups_destroyed(&self, host: &dyn TabHost) -> DestroyedGroups {
        host.groups_destroyed_by(&[self.tab])
    }

    fn placeholders_created(&mut self, placeholders: Vec<TabId>) {
        self.placeholders = placeholders;
    }

    fn perform_action(&mut self, host: &mut dyn TabHost, _ctx: &ActionContext) {
        if !host.detach_tab(self.tab) {
            log::debug!("Tab {} was not live, nothing to remove", self.tab);
        }
    }
}
