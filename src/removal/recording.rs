//! In-memory dialog surface and collaboration backend.
//!
//! Both record what they were asked to do into a shared log, so the caller
//! can inspect it after handing ownership to the coordinator. Used by the
//! scenario runner and tests.

use super::collaboration::CollaborationService;
use super::dialogs::{BlockingToken, DialogRequest, DialogSurface, ErrorNotice};
use crate::error::CollaborationError;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything a [`RecordingDialogSurface`] was asked to display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DialogLog {
    pub shown: Vec<DialogRequest>,
    pub errors: Vec<ErrorNotice>,
    pub finished: Vec<BlockingToken>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingDialogSurface {
    log: Rc<RefCell<DialogLog>>,
}

impl RecordingDialogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<DialogLog>> {
        Rc::clone(&self.log)
    }
}

impl DialogSurface for RecordingDialogSurface {
    fn show(&mut self, request: &DialogRequest) {
        log::debug!("Showing {:?} dialog for flow {:?}", request.kind, request.flow_id);
        self.log.borrow_mut().shown.push(request.clone());
    }

    fn finish_blocking(&mut self, token: BlockingToken) {
        self.log.borrow_mut().finished.push(token);
    }

    fn show_error(&mut self, notice: ErrorNotice) {
        self.log.borrow_mut().errors.push(notice);
    }
}

/// A request made to the collaboration backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "call", content = "collaboration_id")]
pub enum CollaborationCall {
    Leave(String),
    Delete(String),
}

/// Collaboration backend that records calls and can be told to fail them.
#[derive(Debug, Clone, Default)]
pub struct RecordingCollaborationService {
    calls: Rc<RefCell<Vec<CollaborationCall>>>,
    failure: Option<String>,
}

impl RecordingCollaborationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every request with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Rc<RefCell<Vec<CollaborationCall>>> {
        Rc::clone(&self.calls)
    }

    fn record(&self, call: CollaborationCall, collaboration_id: &str) -> Result<(), CollaborationError> {
        self.calls.borrow_mut().push(call);
        match &self.failure {
            Some(reason) => Err(CollaborationError::Rejected {
                collaboration_id: collaboration_id.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl CollaborationService for RecordingCollaborationService {
    fn leave_group(&mut self, collaboration_id: &str) -> Result<(), CollaborationError> {
        self.record(CollaborationCall::Leave(collaboration_id.to_string()), collaboration_id)
    }

    fn delete_group(&mut self, collaboration_id: &str) -> Result<(), CollaborationError> {
        self.record(CollaborationCall::Delete(collaboration_id.to_string()), collaboration_id)
    }
}
