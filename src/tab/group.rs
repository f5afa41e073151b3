//! Tab group identity and kind.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token identifying a tab group, stable for the group's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Generate a fresh random group token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The local user's relationship to a shared tab group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaborationRole {
    /// Created the collaboration; destroying the group deletes it for everyone
    Owner,
    /// Joined someone else's collaboration; destroying the group leaves it
    Member,
}

/// Whether a group only syncs across the user's devices or is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GroupKind {
    /// Synced across the user's own devices
    Sync,
    /// Backed by a collaboration shared with other people
    Collaboration {
        collaboration_id: String,
        role: CollaborationRole,
    },
}

impl GroupKind {
    pub fn is_collaboration(&self) -> bool {
        matches!(self, GroupKind::Collaboration { .. })
    }
}

/// A named group of tabs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabGroup {
    pub id: GroupId,
    pub title: String,
    pub kind: GroupKind,
}

impl TabGroup {
    pub fn new(title: &str, kind: GroupKind) -> Self {
        Self {
            id: GroupId::new(),
            title: title.to_string(),
            kind,
        }
    }
}
