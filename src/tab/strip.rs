//! In-memory tab list backing `TabModel`

use super::{Tab, TabId, TabList};
use std::collections::HashMap;

/// Ordered list of tabs within a single window.
///
/// Tabs pending closure are detached from the ordered list but kept in
/// `closing` until they are either reinserted or finalized.
pub struct TabStrip {
    /// Live tabs, in display order
    tabs: Vec<Tab>,
    /// Detached tabs waiting for their closure to commit or be cancelled
    closing: HashMap<TabId, Tab>,
    /// Ids of finalized tabs, in finalization order
    destroyed: Vec<TabId>,
    /// Currently active tab ID
    active_tab_id: Option<TabId>,
    /// Counter for generating unique tab IDs
    next_tab_id: TabId,
    off_the_record: bool,
}

impl TabStrip {
    /// Create a new empty tab strip
    pub fn new(off_the_record: bool) -> Self {
        Self {
            tabs: Vec::new(),
            closing: HashMap::new(),
            destroyed: Vec::new(),
            active_tab_id: None,
            next_tab_id: 1,
            off_the_record,
        }
    }

    /// Allocate the next unique tab id
    pub fn allocate_id(&mut self) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id += 1;
        id
    }

    /// Append a new tab with a default title and return its ID
    pub fn new_tab(&mut self) -> TabId {
        let id = self.allocate_id();
        // Tab number is based on current count, not unique ID
        let tab_number = self.tabs.len() + 1;
        self.tabs.push(Tab::new(id, tab_number));

        // Always switch to the new tab
        self.active_tab_id = Some(id);

        log::info!("Created new tab {} (total: {})", id, self.tabs.len());
        id
    }

    /// Insert a tab at a specific index.
    ///
    /// The index is clamped to `0..=self.tabs.len()`. The tab only becomes
    /// active when nothing else is.
    pub fn insert_tab_at(&mut self, tab: Tab, index: usize) {
        let clamped = index.min(self.tabs.len());
        let id = tab.id;
        self.next_tab_id = self.next_tab_id.max(id + 1);
        self.tabs.insert(clamped, tab);
        if self.active_tab_id.is_none() {
            self.active_tab_id = Some(id);
        }
        self.renumber_default_tabs();
        log::info!(
            "Inserted tab {} at index {} (total: {})",
            id,
            clamped,
            self.tabs.len()
        );
    }

    /// Remove a live tab by ID without dropping it.
    ///
    /// If the removed tab was active, the tab now at the same index (or the
    /// previous one at the end) becomes active.
    pub fn detach_tab(&mut self, id: TabId) -> Option<Tab> {
        let idx = self.tabs.iter().position(|t| t.id == id)?;

        log::debug!("Detaching tab {} (index {})", id, idx);

        let tab = self.tabs.remove(idx);

        if self.active_tab_id == Some(id) {
            self.active_tab_id = if self.tabs.is_empty() {
                None
            } else {
                // Prefer the tab at the same index (or previous if at end)
                let new_idx = idx.min(self.tabs.len().saturating_sub(1));
                Some(self.tabs[new_idx].id)
            };
        }

        self.renumber_default_tabs();
        Some(tab)
    }

    /// Flag a live tab as closing and move it out of the live list.
    ///
    /// Returns false if the tab is not live.
    pub fn begin_closing(&mut self, id: TabId) -> bool {
        match self.detach_tab(id) {
            Some(mut tab) => {
                tab.set_closing(true);
                self.closing.insert(id, tab);
                true
            }
            None => false,
        }
    }

    /// Move a tab to a specific index.
    /// Returns true if the tab was actually moved, false if not found or already at target
    pub fn move_tab_to_index(&mut self, id: TabId, target_index: usize) -> bool {
        let current_idx = match self.tabs.iter().position(|t| t.id == id) {
            Some(idx) => idx,
            None => return false,
        };

        let clamped_target = target_index.min(self.tabs.len().saturating_sub(1));
        if clamped_target == current_idx {
            return false;
        }

        let tab = self.tabs.remove(current_idx);
        self.tabs.insert(clamped_target, tab);
        log::debug!(
            "Moved tab {} from index {} to {}",
            id,
            current_idx,
            clamped_target
        );
        self.renumber_default_tabs();
        true
    }

    /// Switch to a live tab by ID
    pub fn switch_to(&mut self, id: TabId) {
        if self.tabs.iter().any(|t| t.id == id) {
            self.active_tab_id = Some(id);
            log::debug!("Switched to tab {}", id);
        }
    }

    /// Renumber tabs that have default titles based on their current position
    fn renumber_default_tabs(&mut self) {
        for (idx, tab) in self.tabs.iter_mut().enumerate() {
            tab.set_default_title(idx + 1);
        }
    }

    /// Get all live tabs
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Get a live or pending tab by ID
    pub fn get_tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs
            .iter()
            .find(|t| t.id == id)
            .or_else(|| self.closing.get(&id))
    }

    /// Get a mutable live or pending tab by ID
    pub fn get_tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        match self.tabs.iter_mut().find(|t| t.id == id) {
            Some(tab) => Some(tab),
            None => self.closing.get_mut(&id),
        }
    }

    /// Whether the tab is live (not pending, not destroyed)
    pub fn is_live(&self, id: TabId) -> bool {
        self.tabs.iter().any(|t| t.id == id)
    }

    /// Get the active tab ID
    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    /// Get the index of the active tab
    pub fn active_tab_index(&self) -> Option<usize> {
        self.active_tab_id
            .and_then(|id| self.tabs.iter().position(|t| t.id == id))
    }

    /// Ids of live tabs, in display order
    pub fn live_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }

    /// Ids of finalized tabs, in finalization order
    pub fn destroyed_ids(&self) -> &[TabId] {
        &self.destroyed
    }

    /// Number of detached tabs waiting on a closure decision
    pub fn closing_count(&self) -> usize {
        self.closing.len()
    }
}

impl TabList for TabStrip {
    fn len(&self) -> usize {
        self.tabs.len()
    }

    fn tab_at(&self, index: usize) -> Option<TabId> {
        self.tabs.get(index).map(|t| t.id)
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn selected_index(&self) -> Option<usize> {
        self.active_tab_index()
    }

    fn is_off_the_record(&self) -> bool {
        self.off_the_record
    }

    fn insert_at(&mut self, id: TabId, index: usize) {
        match self.closing.remove(&id) {
            Some(tab) => self.insert_tab_at(tab, index),
            None => log::warn!("Cannot reinsert tab {}: not pending closure", id),
        }
    }

    fn set_closing(&mut self, id: TabId, closing: bool) {
        if let Some(tab) = self.get_tab_mut(id) {
            tab.set_closing(closing);
        }
    }

    fn finalize_closure(&mut self, id: TabId) {
        match self.closing.remove(&id) {
            Some(mut tab) => {
                tab.mark_destroyed();
                self.destroyed.push(id);
                log::debug!("Finalized closure of tab {}", id);
            }
            None => log::warn!("Cannot finalize tab {}: not pending closure", id),
        }
    }
}
