//! Operation-specific strategies driven by the removal flow coordinator.

mod close;
mod remove;
mod ungroup;

pub use close::CloseTabsHandler;
pub use remove::RemoveTabHandler;
pub use ungroup::UngroupHandler;

use super::dialogs::ConfirmationResult;
use super::host::{DestroyedGroups, TabHost};
use crate::tab::TabId;
use serde::{Deserialize, Serialize};

/// The operation a flow performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Close,
    Ungroup,
    Remove,
}

/// How the flow reached the action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionContext {
    /// Answer of the dialog that gated the action, if one was shown
    pub dialog_result: Option<ConfirmationResult>,
}

impl ActionContext {
    pub fn after_dialog(result: ConfirmationResult) -> Self {
        Self {
            dialog_result: Some(result),
        }
    }

    /// The user explicitly confirmed a destructive dialog.
    pub fn user_confirmed(&self) -> bool {
        self.dialog_result == Some(ConfirmationResult::ConfirmedDelete)
    }
}

/// One removal operation, owned by a single flow.
pub trait FlowHandler {
    fn kind(&self) -> FlowKind;

    /// Whether this operation may be gated on a confirmation dialog.
    fn supports_dialogs(&self) -> bool {
        true
    }

    /// Groups the operation would destroy if performed right now.
    fn groups_destroyed(&self, host: &dyn TabHost) -> DestroyedGroups;

    /// Placeholder tabs created to keep collaboration groups alive.
    fn placeholders_created(&mut self, placeholders: Vec<TabId>);

    fn perform_action(&mut self, host: &mut dyn TabHost, ctx: &ActionContext);
}

/// Any of the built-in handlers.
#[derive(Debug, Clone)]
pub enum RemovalHandler {
    Close(CloseTabsHandler),
    Ungroup(UngroupHandler),
    Remove(RemoveTabHandler),
}

impl RemovalHandler {
    fn inner(&self) -> &dyn FlowHandler {
        match self {
            RemovalHandler::Close(h) => h,
            RemovalHandler::Ungroup(h) => h,
            RemovalHandler::Remove(h) => h,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FlowHandler {
        match self {
            RemovalHandler::Close(h) => h,
            RemovalHandler::Ungroup(h) => h,
            RemovalHandler::Remove(h) => h,
        }
    }
}

impl FlowHandler for RemovalHandler {
    fn kind(&self) -> FlowKind {
        self.inner().kind()
    }

    fn supports_dialogs(&self) -> bool {
        self.inner().supports_dialogs()
    }

    fn groups_destroyed(&self, host: &dyn TabHost) -> DestroyedGroups {
        self.inner().groups_destroyed(host)
    }

    fn placeholders_created(&mut self, placeholders: Vec<TabId>) {
        self.inner_mut().placeholders_created(placeholders);
    }

    fn perform_action(&mut self, host: &mut dyn TabHost, ctx: &ActionContext) {
        self.inner_mut().perform_action(host, ctx);
    }
}

impl From<CloseTabsHandler> for RemovalHandler {
    fn from(handler: CloseTabsHandler) -> Self {
        RemovalHandler::Close(handler)
    }
}

impl From<UngroupHandler> for RemovalHandler {
    fn from(handler: UngroupHandler) -> Self {
        RemovalHandler::Ungroup(handler)
    }
}

impl From<RemoveTabHandler> for RemovalHandler {
    fn from(handler: RemoveTabHandler) -> Self {
        RemovalHandler::Remove(handler)
    }
}
