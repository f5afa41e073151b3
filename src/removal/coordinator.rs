//! Removal flow coordinator
//!
//! Runs one removal operation (close, ungroup, remove) at a time through a
//! small state machine:
//!
//! ```text
//! AwaitingGroupCheck -> AwaitingDialog(kind) -> Proceeding -> Done
//!                                            \-> Aborted
//! ```
//!
//! The handler reports which groups the operation would destroy. A single
//! collaboration group can be gated on a "keep collaboration" dialog; several
//! collaboration groups always get placeholder tabs instead. Sync-only groups
//! can be gated on a "delete group" dialog. A flow suspended on a dialog is
//! handed back to the caller and finished by [`RemovalFlowCoordinator::resume`].

use super::collaboration::CollaborationService;
use super::dialogs::{DialogKind, DialogOutcome, DialogRequest, DialogSurface, ErrorNotice};
use super::handlers::{ActionContext, FlowHandler};
use super::host::{DestroyedGroups, PlaceholderFactory, TabHost};
use crate::error::CollaborationError;
use crate::tab::{CollaborationRole, GroupId, GroupKind};
use serde::Serialize;

/// Identifies one `run_flow` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FlowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "dialog")]
pub enum FlowState {
    AwaitingGroupCheck,
    AwaitingDialog(DialogKind),
    Proceeding,
    Done,
    Aborted,
}

/// Collaboration to leave or delete once a keep-collaboration dialog proceeds.
#[derive(Debug, Clone)]
struct PendingCollaboration {
    collaboration_id: String,
    role: CollaborationRole,
    group_title: String,
}

/// A removal operation in progress.
///
/// Owns its handler, so a handler can never serve two flows.
#[derive(Debug)]
pub struct RemovalFlow<H: FlowHandler> {
    id: FlowId,
    handler: H,
    state: FlowState,
    collaboration: Option<PendingCollaboration>,
}

impl<H: FlowHandler> RemovalFlow<H> {
    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn is_awaiting_dialog(&self) -> bool {
        matches!(self.state, FlowState::AwaitingDialog(_))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, FlowState::Done | FlowState::Aborted)
    }
}

/// Decides whether a removal needs placeholders or confirmation, then runs it.
pub struct RemovalFlowCoordinator {
    dialogs: Box<dyn DialogSurface>,
    placeholders: Box<dyn PlaceholderFactory>,
    collaboration: Option<Box<dyn CollaborationService>>,
    next_flow_id: u64,
}

impl RemovalFlowCoordinator {
    pub fn new(
        dialogs: Box<dyn DialogSurface>,
        placeholders: Box<dyn PlaceholderFactory>,
        collaboration: Option<Box<dyn CollaborationService>>,
    ) -> Self {
        Self {
            dialogs,
            placeholders,
            collaboration,
            next_flow_id: 1,
        }
    }

    /// Start a flow for `handler`.
    ///
    /// Returns the flow either finished or suspended on a dialog. Dialogs are
    /// never shown for off-the-record hosts or handlers that do not support
    /// them.
    pub fn run_flow<H: FlowHandler>(
        &mut self,
        host: &mut dyn TabHost,
        handler: H,
        allow_dialog: bool,
    ) -> RemovalFlow<H> {
        let id = FlowId(self.next_flow_id);
        self.next_flow_id += 1;
        let mut flow = RemovalFlow {
            id,
            handler,
            state: FlowState::AwaitingGroupCheck,
            collaboration: None,
        };

        let mut allow_dialog = allow_dialog && !host.is_off_the_record();
        if allow_dialog && !flow.handler.supports_dialogs() {
            debug_assert!(
                false,
                "{:?} flow does not support dialogs",
                flow.handler.kind()
            );
            allow_dialog = false;
        }

        let destroyed = flow.handler.groups_destroyed(host);
        log::info!(
            "Flow {:?} ({:?}): {} collaboration and {} sync-only groups destroyed",
            id,
            flow.handler.kind(),
            destroyed.collaborations.len(),
            destroyed.sync_only.len()
        );

        if !destroyed.collaborations.is_empty() {
            if destroyed.collaborations.len() == 1
                && allow_dialog
                && let Some(pending) = Self::collaboration_of(host, &destroyed.collaborations[0])
            {
                let group_title = Some(pending.group_title.clone());
                flow.collaboration = Some(pending);
                self.show_dialog(
                    &mut flow,
                    DialogKind::KeepCollaboration,
                    destroyed.collaborations,
                    group_title,
                );
                return flow;
            }

            let created = self
                .placeholders
                .create_placeholders(host, &destroyed.collaborations);
            log::info!("Flow {:?} created placeholder tabs {:?}", id, created);
            flow.handler.placeholders_created(created);
            return Self::proceed(host, flow, &ActionContext::default());
        }

        if !destroyed.sync_only.is_empty() && allow_dialog {
            let group_title = Self::single_title(host, &destroyed);
            self.show_dialog(&mut flow, DialogKind::DeleteGroup, destroyed.sync_only, group_title);
            return flow;
        }

        Self::proceed(host, flow, &ActionContext::default())
    }

    /// Deliver the user's answer to a suspended flow.
    ///
    /// A flow that is not waiting on a dialog is returned untouched.
    pub fn resume<H: FlowHandler>(
        &mut self,
        host: &mut dyn TabHost,
        mut flow: RemovalFlow<H>,
        outcome: DialogOutcome,
    ) -> RemovalFlow<H> {
        let FlowState::AwaitingDialog(kind) = flow.state else {
            debug_assert!(false, "flow {:?} is not awaiting a dialog", flow.id);
            log::warn!("Ignoring dialog answer for flow {:?} in state {:?}", flow.id, flow.state);
            return flow;
        };
        let collaboration = flow.collaboration.take();
        log::info!("Flow {:?} {:?} dialog answered {:?}", flow.id, kind, outcome.result);

        if !outcome.result.proceeds() {
            flow.state = FlowState::Aborted;
            if let Some(token) = outcome.blocking {
                self.dialogs.finish_blocking(token);
            }
            return flow;
        }

        let flow = Self::proceed(host, flow, &ActionContext::after_dialog(outcome.result));

        if kind == DialogKind::KeepCollaboration {
            host.commit_all_pending_closures();
            match collaboration {
                Some(pending) => self.settle_collaboration(&pending),
                None => {
                    debug_assert!(false, "keep-collaboration flow without a collaboration");
                    self.dialogs
                        .show_error(ErrorNotice::Generic { group_title: None });
                }
            }
        }
        if let Some(token) = outcome.blocking {
            self.dialogs.finish_blocking(token);
        }
        flow
    }

    fn proceed<H: FlowHandler>(
        host: &mut dyn TabHost,
        mut flow: RemovalFlow<H>,
        ctx: &ActionContext,
    ) -> RemovalFlow<H> {
        flow.state = FlowState::Proceeding;
        flow.handler.perform_action(host, ctx);
        flow.state = FlowState::Done;
        log::debug!("Flow {:?} done", flow.id);
        flow
    }

    fn show_dialog<H: FlowHandler>(
        &mut self,
        flow: &mut RemovalFlow<H>,
        kind: DialogKind,
        groups: Vec<GroupId>,
        group_title: Option<String>,
    ) {
        flow.state = FlowState::AwaitingDialog(kind);
        let request = DialogRequest {
            flow_id: flow.id,
            kind,
            groups,
            group_title,
            operation: flow.handler.kind(),
        };
        log::info!("Flow {:?} waiting on {:?} dialog", flow.id, kind);
        self.dialogs.show(&request);
    }

    fn settle_collaboration(&mut self, pending: &PendingCollaboration) {
        let result = match self.collaboration.as_mut() {
            None => Err(CollaborationError::Unavailable),
            Some(service) => match pending.role {
                CollaborationRole::Member => service.leave_group(&pending.collaboration_id),
                CollaborationRole::Owner => service.delete_group(&pending.collaboration_id),
            },
        };
        if let Err(e) = result {
            log::error!(
                "Failed to settle collaboration {}: {}",
                pending.collaboration_id,
                e
            );
            self.dialogs.show_error(ErrorNotice::Generic {
                group_title: Some(pending.group_title.clone()),
            });
        }
    }

    fn collaboration_of(host: &dyn TabHost, group: &GroupId) -> Option<PendingCollaboration> {
        let group = host.group(group)?;
        match &group.kind {
            GroupKind::Collaboration {
                collaboration_id,
                role,
            } => Some(PendingCollaboration {
                collaboration_id: collaboration_id.clone(),
                role: *role,
                group_title: group.title.clone(),
            }),
            GroupKind::Sync => None,
        }
    }

    fn single_title(host: &dyn TabHost, destroyed: &DestroyedGroups) -> Option<String> {
        match destroyed.sync_only.as_slice() {
            [only] => host.group(only).map(|g| g.title.clone()),
            _ => None,
        }
    }
}

impl std::fmt::Debug for RemovalFlowCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemovalFlowCoordinator")
            .field("has_collaboration", &self.collaboration.is_some())
            .field("next_flow_id", &self.next_flow_id)
            .finish()
    }
}
