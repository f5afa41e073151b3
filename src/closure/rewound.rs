//! Rewound view of a tab list.
//!
//! The rewound view is the list the user would see if every pending closure
//! were undone right now: live tabs plus tabs waiting on a closure decision,
//! in a stable order. Live order is always a sub-order of the view.

use crate::tab::{TabId, TabList};

/// Projection of the live list plus all tabs pending closure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewoundView {
    ids: Vec<TabId>,
}

impl RewoundView {
    /// Build a view that mirrors `list` exactly.
    pub fn from_list<L: TabList + ?Sized>(list: &L) -> Self {
        let mut view = Self::default();
        view.reset(list);
        view
    }

    /// Position in rewound order of the live list's selected tab.
    ///
    /// When nothing is live but tabs are pending, the first pending tab stands
    /// in for the selection.
    pub fn index<L: TabList + ?Sized>(&self, list: &L) -> Option<usize> {
        if let Some(selected) = list.selected_index().and_then(|i| list.tab_at(i)) {
            return self.index_of(selected);
        }
        if list.is_empty() && !self.ids.is_empty() {
            return Some(0);
        }
        None
    }

    pub fn get(&self, index: usize) -> Option<TabId> {
        self.ids.get(index).copied()
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.ids.iter().position(|&t| t == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[TabId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = TabId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns `id` only when it is in the view and not in the live list.
    pub fn find_pending<L: TabList + ?Sized>(&self, list: &L, id: TabId) -> Option<TabId> {
        if self.index_of(id).is_some() && list.index_of(id).is_none() {
            Some(id)
        } else {
            None
        }
    }

    /// Whether any tab in the view is missing from the live list.
    pub fn has_pending<L: TabList + ?Sized>(&self, list: &L) -> bool {
        self.ids.len() > list.len()
    }

    /// Rebuild from the live list, discarding all pending entries.
    pub fn reset<L: TabList + ?Sized>(&mut self, list: &L) {
        self.ids.clear();
        self.ids.extend((0..list.len()).filter_map(|i| list.tab_at(i)));
    }

    /// Drop one entry. Returns whether anything was removed.
    pub fn remove(&mut self, id: TabId) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.ids.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Live insertion index for a pending tab sitting at rewound position
    /// `stop`: one past the last live tab that precedes it in the view.
    pub(crate) fn live_insertion_index<L: TabList + ?Sized>(&self, list: &L, stop: usize) -> usize {
        let mut next = 0;
        for &id in &self.ids[..stop.min(self.ids.len())] {
            if list.tab_at(next) == Some(id) {
                next += 1;
            }
        }
        next
    }
}
