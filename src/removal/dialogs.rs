//! Confirmation dialogs shown before destroying groups.

use super::coordinator::FlowId;
use super::handlers::FlowKind;
use crate::tab::GroupId;
use serde::{Deserialize, Serialize};

/// Which confirmation the flow is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    /// Closing or ungrouping would delete sync-only groups
    DeleteGroup,
    /// Closing or ungrouping would delete, or leave, a shared group
    KeepCollaboration,
}

/// A dialog the coordinator asks the surface to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogRequest {
    pub flow_id: FlowId,
    pub kind: DialogKind,
    pub groups: Vec<GroupId>,
    /// Title of the single affected group, when there is exactly one
    pub group_title: Option<String>,
    pub operation: FlowKind,
}

/// How the user answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationResult {
    /// The dialog was suppressed ("don't ask again") and continued on its own
    Immediate,
    /// The user explicitly confirmed the destructive action
    ConfirmedDelete,
    /// The user chose to keep the group; the operation is dropped
    Declined,
}

impl ConfirmationResult {
    pub fn proceeds(self) -> bool {
        !matches!(self, ConfirmationResult::Declined)
    }
}

/// Token for a dialog that stays up (busy) until the flow finishes its
/// backend work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockingToken(pub u64);

/// Answer delivered to `RemovalFlowCoordinator::resume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogOutcome {
    pub result: ConfirmationResult,
    pub blocking: Option<BlockingToken>,
}

impl DialogOutcome {
    pub fn new(result: ConfirmationResult) -> Self {
        Self {
            result,
            blocking: None,
        }
    }

    pub fn blocking(result: ConfirmationResult, token: BlockingToken) -> Self {
        Self {
            result,
            blocking: Some(token),
        }
    }
}

/// Error shown to the user after a flow finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "notice")]
pub enum ErrorNotice {
    /// Generic "something went wrong" message
    Generic { group_title: Option<String> },
}

/// Where dialogs and error notices are displayed.
///
/// `show` never answers synchronously; the caller feeds the answer back
/// through `RemovalFlowCoordinator::resume`.
pub trait DialogSurface {
    fn show(&mut self, request: &DialogRequest);

    /// Dismiss a blocking dialog once the flow is done with it.
    fn finish_blocking(&mut self, token: BlockingToken);

    fn show_error(&mut self, notice: ErrorNotice);
}
