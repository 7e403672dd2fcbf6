// src/error.rs

use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Everything a ledger operation can report to the front end.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No repository could be found at or above the working directory
    #[error("No workspace open. Run inside a git repository or pass --repo.")]
    WorkspaceMissing,

    /// The repository has no commits yet
    #[error("Could not resolve the last commit")]
    NoCommit,

    /// The version-control backend failed
    #[error("Version control failure: {0}")]
    VcsInvocationFailure(String),

    /// A staged capture found nothing staged
    #[error("There are no staged changes to capture.")]
    NoChangesToCapture,

    /// A persisted file exists but is not valid JSON
    #[error("Malformed persisted state in {path}: {reason}")]
    MalformedPersistedState { path: String, reason: String },

    /// The operation targets an artifact that is not in the current view
    #[error("No artifact selected: {0}")]
    NoArtifactsSelected(String),

    /// The operation needs a non-empty artifact view
    #[error("There are no artifacts to export.")]
    NoArtifactsToExport,

    /// No history entry carries the requested id
    #[error("History entry not found: {0}")]
    HistoryEntryNotFound(String),

    /// An imported report lacks its artifacts or commit hash
    #[error("Invalid report file: {0}")]
    InvalidReport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<git2::Error> for LedgerError {
    fn from(e: git2::Error) -> Self {
        LedgerError::VcsInvocationFailure(e.message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_message_names_path() {
        let err = LedgerError::NoArtifactsSelected("a.ts".to_string());
        assert_eq!(err.to_string(), "No artifact selected: a.ts");
    }

    #[test]
    fn git_errors_become_vcs_failures() {
        let err: LedgerError = git2::Error::from_str("boom").into();
        assert!(matches!(err, LedgerError::VcsInvocationFailure(ref m) if m == "boom"));
    }
}
