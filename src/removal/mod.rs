//! Removal flows
//!
//! Closing, ungrouping or removing tabs can destroy a tab group. Before that
//! happens the [`RemovalFlowCoordinator`] decides whether the operation can
//! proceed, needs placeholder tabs to keep a shared group alive, or must wait
//! for the user to confirm through a dialog.

pub mod collaboration;
pub mod coordinator;
pub mod dialogs;
pub mod handlers;
pub mod host;
pub mod recording;

pub use collaboration::CollaborationService;
pub use coordinator::{FlowId, FlowState, RemovalFlow, RemovalFlowCoordinator};
pub use dialogs::{
    BlockingToken, ConfirmationResult, DialogKind, DialogOutcome, DialogRequest, DialogSurface,
    ErrorNotice,
};
pub use handlers::{
    ActionContext, CloseTabsHandler, FlowHandler, FlowKind, RemovalHandler, RemoveTabHandler,
    UngroupHandler,
};
pub use host::{
    ClosureTarget, DestroyedGroups, GroupDestructionNotifier, GroupPlaceholderFactory,
    PlaceholderFactory, TabClosureParams, TabHost,
};
