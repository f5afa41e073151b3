//! Shared integration test helpers for tabclose.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{model_with_titles, recorded_model};
//! ```
//!
//! The `#![allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers is used per file.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use tabclose::closure::{LedgerEvent, RecordingObserver};
use tabclose::model::TabModel;
use tabclose::removal::recording::{
    CollaborationCall, DialogLog, RecordingCollaborationService, RecordingDialogSurface,
};
use tabclose::removal::{CollaborationService, GroupPlaceholderFactory, RemovalFlowCoordinator};
use tabclose::tab::TabId;
use tempfile::TempDir;

pub type EventLog = Rc<RefCell<Vec<LedgerEvent>>>;

/// Model with one ungrouped tab per title; ids are 1..=n in order.
pub fn model_with_titles(titles: &[&str]) -> TabModel {
    let mut model = TabModel::new(false);
    for title in titles {
        model.create_tab(Some(title), None);
    }
    model
}

/// Model with `count` tabs and a recording observer attached.
pub fn recorded_model(count: usize) -> (TabModel, EventLog) {
    let mut model = TabModel::new(false);
    for _ in 0..count {
        model.create_tab(None, None);
    }
    let recorder = RecordingObserver::new();
    let log = recorder.log();
    model.add_observer(Box::new(recorder));
    (model, log)
}

/// Batches reported through `batch_finishing`, in order.
pub fn batches(log: &EventLog) -> Vec<Vec<TabId>> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            LedgerEvent::BatchFinishing { ids, .. } => Some(ids.clone()),
            _ => None,
        })
        .collect()
}

/// Coordinator wired to recording fakes, plus handles to what they record.
pub struct CoordinatorHarness {
    pub coordinator: RemovalFlowCoordinator,
    pub dialogs: Rc<RefCell<DialogLog>>,
    pub calls: Rc<RefCell<Vec<CollaborationCall>>>,
}

pub fn coordinator(service: Option<RecordingCollaborationService>) -> CoordinatorHarness {
    let surface = RecordingDialogSurface::new();
    let dialogs = surface.log();
    let calls = service.as_ref().map(|s| s.calls()).unwrap_or_default();
    let collaboration = service.map(|s| Box::new(s) as Box<dyn CollaborationService>);
    CoordinatorHarness {
        coordinator: RemovalFlowCoordinator::new(
            Box::new(surface),
            Box::new(GroupPlaceholderFactory),
            collaboration,
        ),
        dialogs,
        calls,
    }
}

/// Write `contents` to `name` inside a fresh temp dir.
///
/// The `TempDir` must be kept alive until the file is no longer needed.
pub fn write_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write temp file");
    (temp_dir, path)
}
