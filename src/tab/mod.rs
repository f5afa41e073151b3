//! Tab data and the live tab list
//!
//! This module provides the tab infrastructure the closure ledger works on:
//! - `Tab`: a single entry in the list, with its closing/destroyed flags
//! - `TabGroup`: a named group of tabs, either sync-only or collaboration-backed
//! - `TabList`: the live-collection contract consumed by the ledger
//! - `TabStrip`: the in-memory `TabList` used by `TabModel`

mod group;
mod strip;

pub use group::{CollaborationRole, GroupId, GroupKind, TabGroup};
pub use strip::TabStrip;

/// Unique identifier for each tab
pub type TabId = u64;

/// A single tab in a window
#[derive(Debug, Clone)]
pub struct Tab {
    /// Unique identifier for this tab
    pub id: TabId,
    /// Tab title
    pub title: String,
    /// Whether the tab has its default "Tab N" title (not set by the user)
    pub has_default_title: bool,
    /// Group this tab belongs to, if any
    pub group: Option<GroupId>,
    /// Created by the removal flow to keep a group alive
    pub is_placeholder: bool,
    closing: bool,
    destroyed: bool,
}

impl Tab {
    /// Create a tab with a default "Tab N" title
    pub fn new(id: TabId, tab_number: usize) -> Self {
        Self {
            id,
            title: format!("Tab {}", tab_number),
            has_default_title: true,
            group: None,
            is_placeholder: false,
            closing: false,
            destroyed: false,
        }
    }

    /// Create a tab with an explicit title
    pub fn with_title(id: TabId, title: &str) -> Self {
        let mut tab = Self::new(id, 0);
        tab.set_title(title);
        tab
    }

    /// Whether a close has started for this tab (pending or committed)
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Whether the tab's closure has been committed
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn set_closing(&mut self, closing: bool) {
        self.closing = closing;
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }

    /// Update the default title to reflect the tab's position
    pub fn set_default_title(&mut self, tab_number: usize) {
        if self.has_default_title {
            self.title = format!("Tab {}", tab_number);
        }
    }

    /// Explicitly set the tab title
    ///
    /// This overrides any default title and marks the tab as having a custom title.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.has_default_title = false;
    }
}

/// Live-collection contract consumed by the pending closure ledger.
///
/// The list holds the tabs currently visible to the user, in order. Tabs that
/// are pending closure are not in the list but must stay owned by the
/// implementation so `insert_at` can bring them back and `finalize_closure`
/// can destroy them.
pub trait TabList {
    /// Number of live tabs
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of the live tab at `index`
    fn tab_at(&self, index: usize) -> Option<TabId>;

    /// Position of a live tab
    fn index_of(&self, id: TabId) -> Option<usize>;

    /// Position of the selected live tab
    fn selected_index(&self) -> Option<usize>;

    /// Whether this list holds off-the-record (incognito) tabs
    fn is_off_the_record(&self) -> bool;

    /// Whether the list is shown with incognito branding
    fn is_incognito_branded(&self) -> bool {
        self.is_off_the_record()
    }

    /// Put a pending tab back into the live list at `index`.
    fn insert_at(&mut self, id: TabId, index: usize);

    /// Update a tab's closing flag, whether it is live or pending.
    fn set_closing(&mut self, id: TabId, closing: bool);

    /// Destroy a pending tab whose closure has been committed.
    fn finalize_closure(&mut self, id: TabId);
}
