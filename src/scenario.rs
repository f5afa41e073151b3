//! Scenario replay
//!
//! A scenario file describes a window (tabs and groups) and a sequence of
//! steps to apply to it: closes, ungroups, removals, per-tab commit/cancel
//! signals and dialog answers. [`ScenarioRunner`] replays the steps against a
//! [`TabModel`] driven by a [`RemovalFlowCoordinator`] with recording dialog
//! and collaboration fakes, and produces a [`ScenarioReport`].
//!
//! Tabs are addressed by title, groups by name:
//!
//! ```yaml
//! groups:
//!   - name: trip
//!     title: Trip
//!     collaboration: { id: c-1, role: member }
//! tabs:
//!   - title: flights
//!     group: trip
//!   - title: mail
//! steps:
//!   - step: close
//!     tabs: [flights]
//!   - step: answer
//!     result: confirmed_delete
//! ```

use crate::closure::{LedgerEvent, RecordingObserver, UndoAction};
use crate::config::Config;
use crate::error::ScenarioError;
use crate::model::TabModel;
use crate::removal::recording::{
    CollaborationCall, DialogLog, RecordingCollaborationService, RecordingDialogSurface,
};
use crate::removal::{
    BlockingToken, CloseTabsHandler, CollaborationService, ConfirmationResult, DialogKind,
    DialogOutcome, FlowHandler, FlowState, GroupPlaceholderFactory, RemovalFlow,
    RemovalFlowCoordinator, RemovalHandler, RemoveTabHandler, TabClosureParams, UngroupHandler,
};
use crate::tab::{CollaborationRole, GroupId, GroupKind, TabId, TabList};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

fn default_true() -> bool {
    true
}

/// Collaboration backing a scenario group
#[derive(Debug, Clone, Deserialize)]
pub struct CollaborationSpec {
    pub id: String,
    pub role: CollaborationRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSpec {
    /// Name steps use to refer to the group
    pub name: String,
    /// Display title; defaults to the name
    #[serde(default)]
    pub title: Option<String>,
    /// Sync-only when absent
    #[serde(default)]
    pub collaboration: Option<CollaborationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TabSpec {
    pub title: String,
    #[serde(default)]
    pub group: Option<String>,
}

/// One replayed action
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", tag = "step")]
pub enum Step {
    Close {
        tabs: Vec<String>,
        #[serde(default = "default_true")]
        allow_undo: bool,
        #[serde(default)]
        upon_exit: bool,
        #[serde(default)]
        undo_action: Option<u64>,
        #[serde(default)]
        allow_dialog: Option<bool>,
    },
    CloseAll {
        #[serde(default = "default_true")]
        allow_undo: bool,
        #[serde(default)]
        upon_exit: bool,
        #[serde(default)]
        undo_action: Option<u64>,
        #[serde(default)]
        allow_dialog: Option<bool>,
    },
    Ungroup {
        group: String,
        /// Every member of the group when absent
        #[serde(default)]
        tabs: Option<Vec<String>>,
        #[serde(default)]
        trailing: bool,
        #[serde(default)]
        allow_dialog: Option<bool>,
    },
    Remove {
        tab: String,
    },
    Commit {
        tab: String,
    },
    Cancel {
        tab: String,
    },
    CommitAll,
    Undo,
    CancelAll,
    Answer {
        result: ConfirmationResult,
        #[serde(default)]
        blocking: Option<u64>,
    },
    AddTab {
        title: String,
        #[serde(default)]
        group: Option<String>,
    },
    MoveTab {
        tab: String,
        index: usize,
    },
}

/// A window and the steps to replay against it
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub off_the_record: bool,
    /// Attach a collaboration backend to the coordinator
    #[serde(default = "default_true")]
    pub collaboration_backend: bool,
    /// Make every collaboration request fail with this reason
    #[serde(default)]
    pub collaboration_failure: Option<String>,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
    #[serde(default)]
    pub tabs: Vec<TabSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_yaml(contents: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }
}

/// A live tab as shown in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSummary {
    pub id: TabId,
    pub title: String,
    pub group: Option<String>,
    pub placeholder: bool,
}

/// Final state after replaying a scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub live: Vec<TabSummary>,
    pub rewound: Vec<TabId>,
    pub pending: Vec<TabId>,
    pub selected: Option<TabId>,
    pub destroyed: Vec<TabId>,
    pub events: Vec<LedgerEvent>,
    pub dialogs: DialogLog,
    pub collaboration_calls: Vec<CollaborationCall>,
    /// State of the most recent removal flow
    pub flow: Option<FlowState>,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |ids: &[TabId]| {
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let live = self
            .live
            .iter()
            .map(|t| match &t.group {
                Some(group) => format!("[{}] {} ({})", t.id, t.title, group),
                None => format!("[{}] {}", t.id, t.title),
            })
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(f, "live:      {}", live)?;
        writeln!(f, "rewound:   {}", join(&self.rewound))?;
        writeln!(f, "pending:   {}", join(&self.pending))?;
        match self.selected {
            Some(id) => writeln!(f, "selected:  {}", id)?,
            None => writeln!(f, "selected:  -")?,
        }
        writeln!(f, "destroyed: {}", join(&self.destroyed))?;
        if let Some(flow) = self.flow {
            writeln!(f, "flow:      {:?}", flow)?;
        }
        writeln!(f, "events:")?;
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        if !self.dialogs.shown.is_empty() {
            writeln!(f, "dialogs:")?;
            for dialog in &self.dialogs.shown {
                writeln!(
                    f,
                    "  {:?} for {:?} ({})",
                    dialog.kind,
                    dialog.operation,
                    dialog.group_title.as_deref().unwrap_or("several groups")
                )?;
            }
        }
        for error in &self.dialogs.errors {
            writeln!(f, "error:     {:?}", error)?;
        }
        for call in &self.collaboration_calls {
            writeln!(f, "backend:   {:?}", call)?;
        }
        Ok(())
    }
}

/// Replays scenario steps against a tab model
pub struct ScenarioRunner {
    model: TabModel,
    coordinator: RemovalFlowCoordinator,
    config: Config,
    tabs: HashMap<String, TabId>,
    groups: HashMap<String, GroupId>,
    events: Rc<RefCell<Vec<LedgerEvent>>>,
    dialogs: Rc<RefCell<DialogLog>>,
    calls: Rc<RefCell<Vec<CollaborationCall>>>,
    /// Flow suspended on a dialog
    flow: Option<RemovalFlow<RemovalHandler>>,
    last_flow_state: Option<FlowState>,
}

impl ScenarioRunner {
    /// Build the initial window described by `scenario`.
    pub fn new(scenario: &Scenario, config: &Config) -> Result<Self, ScenarioError> {
        let mut model = TabModel::with_config(scenario.off_the_record, config);
        let recorder = RecordingObserver::new();
        let events = recorder.log();
        model.add_observer(Box::new(recorder));

        let surface = RecordingDialogSurface::new();
        let dialogs = surface.log();
        let service = match &scenario.collaboration_failure {
            Some(reason) => RecordingCollaborationService::failing(reason),
            None => RecordingCollaborationService::new(),
        };
        let calls = service.calls();
        let collaboration = scenario
            .collaboration_backend
            .then(|| Box::new(service) as Box<dyn CollaborationService>);
        let coordinator = RemovalFlowCoordinator::new(
            Box::new(surface),
            Box::new(GroupPlaceholderFactory),
            collaboration,
        );

        let mut groups = HashMap::new();
        for spec in &scenario.groups {
            let kind = match &spec.collaboration {
                Some(c) => GroupKind::Collaboration {
                    collaboration_id: c.id.clone(),
                    role: c.role,
                },
                None => GroupKind::Sync,
            };
            let title = spec.title.as_deref().unwrap_or(&spec.name);
            groups.insert(spec.name.clone(), model.add_group(title, kind));
        }

        let mut runner = Self {
            model,
            coordinator,
            config: config.clone(),
            tabs: HashMap::new(),
            groups,
            events,
            dialogs,
            calls,
            flow: None,
            last_flow_state: None,
        };
        for spec in &scenario.tabs {
            runner.add_tab(&spec.title, spec.group.as_deref())?;
        }
        Ok(runner)
    }

    /// Replay every step of `scenario` and report the final state.
    pub fn run(scenario: &Scenario, config: &Config) -> Result<ScenarioReport, ScenarioError> {
        let mut runner = Self::new(scenario, config)?;
        for (index, step) in scenario.steps.iter().enumerate() {
            runner.apply(index, step)?;
        }
        Ok(runner.report())
    }

    pub fn model(&self) -> &TabModel {
        &self.model
    }

    /// Id of the tab titled `title`
    pub fn tab_id(&self, title: &str) -> Option<TabId> {
        self.tabs.get(title).copied()
    }

    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.groups.get(name).copied()
    }

    /// Apply one step; `index` is only used for error messages.
    pub fn apply(&mut self, index: usize, step: &Step) -> Result<(), ScenarioError> {
        log::debug!("Scenario step {}: {:?}", index, step);
        match step {
            Step::Close {
                tabs,
                allow_undo,
                upon_exit,
                undo_action,
                allow_dialog,
            } => {
                let ids = tabs
                    .iter()
                    .map(|title| self.resolve_tab(index, title))
                    .collect::<Result<Vec<_>, _>>()?;
                let params = TabClosureParams::close_tabs(ids)
                    .with_allow_undo(*allow_undo)
                    .with_upon_exit(*upon_exit)
                    .with_undo_action(undo_action.map(UndoAction));
                self.start_flow(index, CloseTabsHandler::new(params).into(), *allow_dialog)?;
            }
            Step::CloseAll {
                allow_undo,
                upon_exit,
                undo_action,
                allow_dialog,
            } => {
                let params = TabClosureParams::close_all()
                    .with_allow_undo(*allow_undo)
                    .with_upon_exit(*upon_exit)
                    .with_undo_action(undo_action.map(UndoAction));
                self.start_flow(index, CloseTabsHandler::new(params).into(), *allow_dialog)?;
            }
            Step::Ungroup {
                group,
                tabs,
                trailing,
                allow_dialog,
            } => {
                let group_id = self.resolve_group(group)?;
                let handler = match tabs {
                    Some(titles) => {
                        let ids = titles
                            .iter()
                            .map(|title| self.resolve_tab(index, title))
                            .collect::<Result<Vec<_>, _>>()?;
                        UngroupHandler::new(group_id, ids, *trailing)
                    }
                    None => {
                        let ids = self.model.tabs_in_group(&group_id);
                        UngroupHandler::new(group_id, ids, *trailing)
                    }
                };
                self.start_flow(index, handler.into(), *allow_dialog)?;
            }
            Step::Remove { tab } => {
                let id = self.resolve_tab(index, tab)?;
                self.start_flow(index, RemoveTabHandler::new(id).into(), Some(false))?;
            }
            Step::Commit { tab } => {
                let id = self.resolve_tab(index, tab)?;
                self.model.commit_closure(id);
            }
            Step::Cancel { tab } => {
                let id = self.resolve_tab(index, tab)?;
                self.model.cancel_closure(id);
            }
            Step::CommitAll => self.model.commit_all_closures(),
            Step::Undo => {
                self.model.undo_most_recent();
            }
            Step::CancelAll => self.model.cancel_all_closures(),
            Step::Answer { result, blocking } => {
                let flow = self
                    .flow
                    .take()
                    .ok_or(ScenarioError::NoPendingDialog { step: index })?;
                let outcome = DialogOutcome {
                    result: *result,
                    blocking: blocking.map(BlockingToken),
                };
                let flow = self.coordinator.resume(&mut self.model, flow, outcome);
                self.last_flow_state = Some(flow.state());
            }
            Step::AddTab { title, group } => {
                self.add_tab(title, group.as_deref())?;
            }
            Step::MoveTab { tab, index: to } => {
                let id = self.resolve_tab(index, tab)?;
                self.model.move_tab(id, *to);
            }
        }
        Ok(())
    }

    fn start_flow(
        &mut self,
        index: usize,
        handler: RemovalHandler,
        allow_dialog: Option<bool>,
    ) -> Result<(), ScenarioError> {
        if self.flow.is_some() {
            return Err(ScenarioError::DialogPending { step: index });
        }
        let allow_dialog = allow_dialog.unwrap_or(self.config.dialogs.enabled)
            && handler.supports_dialogs();
        let mut flow = self
            .coordinator
            .run_flow(&mut self.model, handler, allow_dialog);

        if flow.state() == FlowState::AwaitingDialog(DialogKind::DeleteGroup)
            && self.config.dialogs.skip_delete_group_confirmation
        {
            log::info!("Delete-group confirmation skipped by config");
            flow = self.coordinator.resume(
                &mut self.model,
                flow,
                DialogOutcome::new(ConfirmationResult::Immediate),
            );
        }

        self.last_flow_state = Some(flow.state());
        if flow.is_awaiting_dialog() {
            self.flow = Some(flow);
        }
        Ok(())
    }

    fn add_tab(&mut self, title: &str, group: Option<&str>) -> Result<TabId, ScenarioError> {
        if self.tabs.contains_key(title) {
            return Err(ScenarioError::DuplicateTab(title.to_string()));
        }
        let group = group.map(|name| self.resolve_group(name)).transpose()?;
        let id = self.model.create_tab(Some(title), group);
        self.tabs.insert(title.to_string(), id);
        Ok(id)
    }

    fn resolve_tab(&self, step: usize, title: &str) -> Result<TabId, ScenarioError> {
        self.tab_id(title).ok_or_else(|| ScenarioError::UnknownTab {
            step,
            title: title.to_string(),
        })
    }

    fn resolve_group(&self, name: &str) -> Result<GroupId, ScenarioError> {
        self.group_id(name)
            .ok_or_else(|| ScenarioError::UnknownGroup(name.to_string()))
    }

    /// Snapshot the current state
    pub fn report(&self) -> ScenarioReport {
        let strip = self.model.strip();
        let live = strip
            .tabs()
            .iter()
            .map(|t| TabSummary {
                id: t.id,
                title: t.title.clone(),
                group: t
                    .group
                    .and_then(|g| self.model.group(&g))
                    .map(|g| g.title.clone()),
                placeholder: t.is_placeholder,
            })
            .collect();

        ScenarioReport {
            live,
            rewound: self.model.rewound_view().ids().to_vec(),
            pending: self.model.ledger().pending_ids(),
            selected: strip.selected_index().and_then(|i| strip.tab_at(i)),
            destroyed: strip.destroyed_ids().to_vec(),
            events: self.events.borrow().clone(),
            dialogs: self.dialogs.borrow().clone(),
            collaboration_calls: self.calls.borrow().clone(),
            flow: self.last_flow_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: &str = r#"
groups:
  - name: trip
    title: Trip
    collaboration: { id: c-1, role: owner }
  - name: recipes
tabs:
  - title: flights
    group: trip
  - title: soup
    group: recipes
  - title: mail
"#;

    fn runner(extra_steps: &str) -> (Scenario, ScenarioRunner) {
        let scenario = Scenario::from_yaml(&format!("{WINDOW}steps:\n{extra_steps}")).unwrap();
        let runner = ScenarioRunner::new(&scenario, &Config::default()).unwrap();
        (scenario, runner)
    }

    #[test]
    fn parses_steps_by_tag() {
        let (scenario, _) = runner(
            "  - step: close\n    tabs: [mail]\n  - step: commit_all\n  - step: answer\n    result: declined\n",
        );
        assert_eq!(scenario.steps.len(), 3);
        assert!(matches!(
            scenario.steps[0],
            Step::Close {
                allow_undo: true,
                upon_exit: false,
                ..
            }
        ));
        assert!(matches!(scenario.steps[1], Step::CommitAll));
    }

    #[test]
    fn close_then_cancel_restores_tab() {
        let scenario = Scenario::from_yaml(&format!(
            "{WINDOW}steps:\n  - step: close\n    tabs: [mail]\n  - step: cancel\n    tab: mail\n"
        ))
        .unwrap();
        let report = ScenarioRunner::run(&scenario, &Config::default()).unwrap();
        assert_eq!(report.live.len(), 3);
        assert!(report.pending.is_empty());
        assert_eq!(report.flow, Some(FlowState::Done));
    }

    #[test]
    fn answer_without_dialog_is_an_error() {
        let (scenario, mut runner) = runner("  - step: answer\n    result: immediate\n");
        let err = runner.apply(0, &scenario.steps[0]).unwrap_err();
        assert!(matches!(err, ScenarioError::NoPendingDialog { step: 0 }));
    }

    #[test]
    fn removal_while_dialog_open_is_an_error() {
        let (scenario, mut runner) = runner(
            "  - step: close\n    tabs: [soup]\n  - step: close\n    tabs: [mail]\n",
        );
        runner.apply(0, &scenario.steps[0]).unwrap();
        let err = runner.apply(1, &scenario.steps[1]).unwrap_err();
        assert!(matches!(err, ScenarioError::DialogPending { step: 1 }));
    }

    #[test]
    fn skip_confirmation_answers_delete_dialog() {
        let scenario = Scenario::from_yaml(&format!(
            "{WINDOW}steps:\n  - step: close\n    tabs: [soup]\n"
        ))
        .unwrap();
        let mut config = Config::default();
        config.dialogs.skip_delete_group_confirmation = true;

        let report = ScenarioRunner::run(&scenario, &config).unwrap();
        assert_eq!(report.flow, Some(FlowState::Done));
        assert_eq!(report.dialogs.shown.len(), 1);
        assert_eq!(report.pending.len(), 1);
    }

    #[test]
    fn unknown_references_are_reported() {
        let (scenario, mut runner) = runner("  - step: commit\n    tab: nope\n");
        assert!(matches!(
            runner.apply(0, &scenario.steps[0]),
            Err(ScenarioError::UnknownTab { step: 0, .. })
        ));

        let bad = Scenario::from_yaml("tabs:\n  - title: a\n    group: missing\n").unwrap();
        assert!(matches!(
            ScenarioRunner::new(&bad, &Config::default()),
            Err(ScenarioError::UnknownGroup(_))
        ));
    }

    #[test]
    fn duplicate_titles_are_rejected() {
        let bad = Scenario::from_yaml("tabs:\n  - title: a\n  - title: a\n").unwrap();
        assert!(matches!(
            ScenarioRunner::new(&bad, &Config::default()),
            Err(ScenarioError::DuplicateTab(_))
        ));
    }

    #[test]
    fn report_renders_as_text() {
        let (_, runner) = runner("  []\n");
        let text = runner.report().to_string();
        assert!(text.contains("[1] flights (Trip)"));
        assert!(text.contains("selected:  3"));
    }
}
