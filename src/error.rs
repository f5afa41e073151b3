//! Typed error types for tabclose.
//!
//! Invariant violations inside the ledger panic; these enums cover the
//! recoverable failures that callers may want to distinguish.

use thiserror::Error;

/// Failure reported by the collaboration backend when leaving or deleting a
/// shared group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaborationError {
    /// No collaboration backend is attached to the coordinator.
    #[error("collaboration service is unavailable")]
    Unavailable,

    /// The backend refused the request.
    #[error("collaboration '{collaboration_id}' rejected the request: {reason}")]
    Rejected {
        /// Collaboration the request was made for.
        collaboration_id: String,
        /// Backend-supplied reason.
        reason: String,
    },
}

/// Errors raised while loading or replaying a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------
    /// The scenario file could not be read.
    #[error("Failed to read scenario '{path}': {source}")]
    Io {
        /// Path to the scenario file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The scenario file is not valid YAML for the scenario schema.
    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    // -----------------------------------------------------------------------
    // References
    // -----------------------------------------------------------------------
    /// A tab or group declares a group name that was never defined.
    #[error("Unknown group '{0}'")]
    UnknownGroup(String),

    /// A step names a tab title that does not exist.
    #[error("Step {step}: unknown tab '{title}'")]
    UnknownTab {
        /// Zero-based step index.
        step: usize,
        /// Tab title as written in the scenario.
        title: String,
    },

    /// Two initial tabs share a title, so steps could not address them.
    #[error("Duplicate tab title '{0}'")]
    DuplicateTab(String),

    // -----------------------------------------------------------------------
    // Flow sequencing
    // -----------------------------------------------------------------------
    /// An `answer` step was given while no dialog was open.
    #[error("Step {step}: no dialog is waiting for an answer")]
    NoPendingDialog {
        /// Zero-based step index.
        step: usize,
    },

    /// A removal step was given while an earlier flow still waits on a dialog.
    #[error("Step {step}: a dialog is still open")]
    DialogPending {
        /// Zero-based step index.
        step: usize,
    },
}
