// src/ledger.rs

//! Operations the front end drives: capture, filter, copy, history, export.

use crate::config::Config;
use crate::error::{LedgerError, Result};
use crate::events::Listeners;
use crate::filters::{FilterSnapshot, FilterState};
use crate::history::HistoryStore;
use crate::metadata::{extract_author_id, extract_task_id};
use crate::model::*;
use crate::parser::parse_entries;
use crate::storage::JsonFile;
use crate::store::{ArtifactStore, ViewChanged};
use crate::vcs::VersionControl;
use std::path::Path;
use tracing::{info, warn};

/// Progress of a capture, in the order the stages occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStage {
    Resolving,
    Analyzing,
    Found(usize),
}

/// A recent commit annotated with the identifiers found in it
#[derive(Debug, Clone)]
pub struct CommitSummary {
    pub commit: CommitInfo,
    pub task_id: Option<String>,
    pub author_id: Option<String>,
}

/// Outcome of handing an artifact link off to the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// No endpoint configured; the link is for the user to paste
    Copy { link: String },
    /// An endpoint is configured but sending is not implemented
    Pending { endpoint: String, link: String },
}

pub struct Ledger<V: VersionControl> {
    vcs: V,
    config: Config,
    store: ArtifactStore,
    history: HistoryStore,
    filters: FilterState,
    progress: Listeners<CaptureStage>,
}

impl<V: VersionControl> Ledger<V> {
    /// Builds a ledger whose filters and history live under `storage_dir`.
    pub fn new(vcs: V, config: Config, storage_dir: &Path) -> Self {
        let history = HistoryStore::load(storage_dir, config.history_limit);
        let filters = FilterState::load(storage_dir);
        Self {
            vcs,
            config,
            store: ArtifactStore::new(),
            history,
            filters,
            progress: Listeners::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterSnapshot {
        self.filters.current()
    }

    pub fn on_progress(&mut self, callback: impl Fn(&CaptureStage) + 'static) {
        self.progress.subscribe(callback);
    }

    /// Called with the new view after every capture, reopen, import or edit.
    pub fn on_view_changed(&mut self, callback: impl Fn(&ViewChanged) + 'static) {
        self.store.subscribe(callback);
    }

    /// Called after a filter change has been saved.
    ///
    /// The artifact view is not re-narrowed here; `apply_saved_filters` and
    /// `filtered_history` read the saved values when the consumer refreshes.
    pub fn on_filters_changed(&mut self, callback: impl Fn(&FilterSnapshot) + 'static) {
        self.filters.subscribe(callback);
    }

    /// Captures the checked-out commit.
    pub fn capture_head(&mut self) -> Result<Report> {
        self.progress.emit(&CaptureStage::Resolving);
        let commit = self.vcs.head()?.ok_or(LedgerError::NoCommit)?;
        self.record(commit)
    }

    /// Captures `reference`, replacing the view and appending to history.
    ///
    /// Nothing is mutated unless every version-control call succeeds.
    pub fn capture(&mut self, reference: &str) -> Result<Report> {
        self.progress.emit(&CaptureStage::Resolving);
        if self.vcs.head()?.is_none() {
            return Err(LedgerError::NoCommit);
        }
        let commit = self.vcs.commit(reference)?;
        self.record(commit)
    }

    /// Captures the staged changes before they are committed.
    ///
    /// Without `reference` the report carries the `hash_temp` placeholder.
    pub fn capture_staged(&mut self, reference: Option<&str>) -> Result<Report> {
        self.progress.emit(&CaptureStage::Resolving);
        let entries = self.vcs.staged_changes()?;
        if entries.is_empty() {
            return Err(LedgerError::NoChangesToCapture);
        }
        let author = self.vcs.identity()?.to_string();

        self.progress.emit(&CaptureStage::Analyzing);
        let artifacts = parse_entries(&entries, Some(&author), None);
        let reference = reference
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| r.chars().take(self.config.short_id_len).collect::<String>())
            .unwrap_or_else(|| PLACEHOLDER_REFERENCE.to_string());
        self.commit_report(Report::new(reference, artifacts))
    }

    /// Loads a commit into the view without recording it in history.
    pub fn load_commit(&mut self, reference: &str) -> Result<&[Artifact]> {
        let commit = self.vcs.commit(reference)?;
        let report = self.build_report(&commit)?;
        self.store.replace(report.artifacts, report.commit_hash);
        Ok(self.store.artifacts())
    }

    fn record(&mut self, commit: CommitInfo) -> Result<Report> {
        self.progress.emit(&CaptureStage::Analyzing);
        let report = self.build_report(&commit)?;
        self.commit_report(report)
    }

    fn build_report(&self, commit: &CommitInfo) -> Result<Report> {
        let entries = self.vcs.changes(&commit.id)?;
        let author = commit.author.to_string();
        let artifacts = parse_entries(&entries, Some(&author), Some(&commit.message));
        Ok(Report::new(commit.short_id(self.config.short_id_len), artifacts))
    }

    fn commit_report(&mut self, report: Report) -> Result<Report> {
        self.history.append(report.clone())?;
        self.store.replace(report.artifacts.clone(), report.commit_hash.clone());
        info!(reference = %report.commit_hash, artifacts = report.artifacts.len(), "captured report");
        self.progress.emit(&CaptureStage::Found(report.artifacts.len()));
        Ok(report)
    }

    /// Narrows the current view; see [`ArtifactStore::filter`].
    pub fn filter(&mut self, task: Option<&str>, author: Option<&str>) {
        self.store.filter(task, author);
    }

    /// Narrows the current view by the persisted filters.
    pub fn apply_saved_filters(&mut self) {
        let snapshot = self.filters.current().clone();
        let (task, author) = snapshot.criteria();
        self.store.filter(task, author);
    }

    pub fn set_author_filter(&mut self, author: &str) -> Result<()> {
        self.filters.set_author_filter(author)
    }

    pub fn set_task_filter(&mut self, task: &str) -> Result<()> {
        self.filters.set_task_filter(task)
    }

    pub fn clear_filters(&mut self) -> Result<()> {
        self.filters.clear()
    }

    /// Links for the whole view. An empty view is an error, not an empty copy.
    pub fn copy_all_links(&self) -> Result<Vec<String>> {
        let links = self.store.format_all_links();
        if links.is_empty() {
            return Err(LedgerError::NoArtifactsToExport);
        }
        Ok(links)
    }

    pub fn copy_link(&self, path: &str) -> Result<String> {
        self.store.format_link(path)
    }

    pub fn set_complexity(&mut self, path: &str, complexity: Complexity) -> Result<()> {
        self.store.set_complexity(path, complexity)
    }

    pub fn remove_artifact(&mut self, path: &str) -> Result<()> {
        self.store.remove(path)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// History narrowed by the persisted filters
    pub fn filtered_history(&self) -> Vec<&HistoryEntry> {
        self.history.filtered(self.filters.current())
    }

    /// Reopens a past report as the current view.
    pub fn open_history_entry(&mut self, id: &str) -> Result<&[Artifact]> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| LedgerError::HistoryEntryNotFound(id.to_string()))?;
        let (artifacts, reference) = (entry.report.artifacts.clone(), entry.report.commit_hash.clone());
        self.store.replace(artifacts, reference);
        Ok(self.store.artifacts())
    }

    /// Recent commits narrowed by the persisted filters.
    ///
    /// The author filter only admits commits whose author carries an
    /// organizational id.
    pub fn recent_commits(&self) -> Result<Vec<CommitSummary>> {
        let filter = self.filters.current();
        let (task_filter, author_filter) = filter.criteria();

        let summaries = self
            .vcs
            .recent_commits(self.config.recent_commits)?
            .into_iter()
            .map(|commit| {
                let task_id = extract_task_id(&commit.message);
                let author_id = extract_author_id(&commit.author.to_string());
                CommitSummary { commit, task_id, author_id }
            })
            .filter(|s| match task_filter {
                Some(task) => s.task_id.as_deref().is_some_and(|id| id.contains(task)),
                None => true,
            })
            .filter(|s| match author_filter {
                Some(author) => {
                    s.author_id.is_some()
                        && s.commit.author.to_string().to_lowercase().contains(&author.to_lowercase())
                }
                None => true,
            })
            .collect();
        Ok(summaries)
    }

    /// Writes the current view as `{timestamp, commitHash, artifacts}`.
    pub fn export_report(&self, path: &Path) -> Result<Report> {
        if self.store.is_empty() {
            return Err(LedgerError::NoArtifactsToExport);
        }
        let report = Report::new(self.store.reference(), self.store.artifacts().to_vec());
        JsonFile::at(path).write(&report)?;
        info!(path = %path.display(), "report exported");
        Ok(report)
    }

    /// Replaces the view with a previously exported report.
    pub fn import_report(&mut self, path: &Path) -> Result<&[Artifact]> {
        let value: serde_json::Value = JsonFile::at(path)
            .read()
            .map_err(|e| match e {
                LedgerError::MalformedPersistedState { reason, .. } => LedgerError::InvalidReport(reason),
                other => other,
            })?
            .ok_or_else(|| LedgerError::InvalidReport(format!("{} does not exist", path.display())))?;

        if value.get("artifacts").is_none() || value.get("commitHash").is_none() {
            return Err(LedgerError::InvalidReport(
                "expected both \"artifacts\" and \"commitHash\"".to_string(),
            ));
        }
        let report: Report =
            serde_json::from_value(value).map_err(|e| LedgerError::InvalidReport(e.to_string()))?;
        self.store.replace(report.artifacts, report.commit_hash);
        Ok(self.store.artifacts())
    }

    /// Hand-off point for an external tracker. Only produces the link.
    pub fn hand_off(&self, path: &str) -> Result<Handoff> {
        let link = self.store.format_link(path)?;
        match &self.config.handoff_endpoint {
            Some(endpoint) => {
                warn!(%endpoint, %link, "sending to a tracker is not implemented; link not sent");
                Ok(Handoff::Pending { endpoint: endpoint.clone(), link })
            }
            None => Ok(Handoff::Copy { link }),
        }
    }
}
