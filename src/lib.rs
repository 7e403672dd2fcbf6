// src/lib.rs

//! Captures the files touched by a git commit (or the staged changes) as
//! classified artifacts, with task/author metadata, persisted filters and a
//! bounded report history.

pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod filters;
pub mod history;
pub mod ledger;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod storage;
pub mod store;
pub mod vcs;

pub use config::Config;
pub use error::{LedgerError, Result};
pub use filters::{FilterSnapshot, FilterState};
pub use history::HistoryStore;
pub use ledger::{CaptureStage, CommitSummary, Handoff, Ledger};
pub use model::{Artifact, ChangeEntry, ChangeType, CommitInfo, Complexity, FileType, HistoryEntry, Identity, Report};
pub use store::{ArtifactStore, ViewChanged};
pub use vcs::{GitRepository, VersionControl};
