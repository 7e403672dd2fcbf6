// src/store.rs

use crate::error::{LedgerError, Result};
use crate::events::Listeners;
use crate::model::{Artifact, Complexity};
use tracing::info;

/// Emitted after every change to the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewChanged {
    pub reference: String,
    pub artifact_count: usize,
}

/// True when `artifact` satisfies both criteria.
///
/// Task matching is a case-sensitive substring test on the task id, author
/// matching a case-insensitive one; artifacts without the field never match.
/// `None` or blank criteria accept everything.
pub fn matches_filter(artifact: &Artifact, task: Option<&str>, author: Option<&str>) -> bool {
    let task_ok = match task.map(str::trim).filter(|t| !t.is_empty()) {
        Some(task) => artifact.task_id.as_deref().is_some_and(|id| id.contains(task)),
        None => true,
    };
    let author_ok = match author.map(str::trim).filter(|a| !a.is_empty()) {
        Some(author) => {
            let needle = author.to_lowercase();
            artifact.author.as_deref().is_some_and(|a| a.to_lowercase().contains(&needle))
        }
        None => true,
    };
    task_ok && author_ok
}

/// The current artifact view and the reference it was captured against.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    artifacts: Vec<Artifact>,
    reference: String,
    listeners: Listeners<ViewChanged>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new view. An empty `artifacts` clears it.
    pub fn replace(&mut self, artifacts: Vec<Artifact>, reference: impl Into<String>) {
        self.artifacts = artifacts;
        self.reference = reference.into();
        self.notify();
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Narrows the current view in place.
    ///
    /// Filtering is compounding: excluded artifacts are gone from the view
    /// until the next capture or history reopen replaces it, so loosening a
    /// criterion does not bring them back.
    pub fn filter(&mut self, task: Option<&str>, author: Option<&str>) {
        let before = self.artifacts.len();
        self.artifacts.retain(|artifact| matches_filter(artifact, task, author));
        info!(before = before, after = self.artifacts.len(), "filtered artifact view");
        self.notify();
    }

    /// Links for every artifact in view order; empty when the view is empty.
    pub fn format_all_links(&self) -> Vec<String> {
        self.artifacts.iter().map(|a| a.link(&self.reference)).collect()
    }

    pub fn format_link(&self, path: &str) -> Result<String> {
        self.find(path).map(|a| a.link(&self.reference))
    }

    /// Manual complexity override for one artifact
    pub fn set_complexity(&mut self, path: &str, complexity: Complexity) -> Result<()> {
        let artifact = self
            .artifacts
            .iter_mut()
            .find(|a| a.path == path)
            .ok_or_else(|| LedgerError::NoArtifactsSelected(path.to_string()))?;
        artifact.complexity = complexity;
        self.notify();
        Ok(())
    }

    /// Drops every artifact with `path` from the view
    pub fn remove(&mut self, path: &str) -> Result<()> {
        let before = self.artifacts.len();
        self.artifacts.retain(|a| a.path != path);
        if self.artifacts.len() == before {
            return Err(LedgerError::NoArtifactsSelected(path.to_string()));
        }
        self.notify();
        Ok(())
    }

    pub fn subscribe(&mut self, callback: impl Fn(&ViewChanged) + 'static) {
        self.listeners.subscribe(callback);
    }

    fn find(&self, path: &str) -> Result<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| a.path == path)
            .ok_or_else(|| LedgerError::NoArtifactsSelected(path.to_string()))
    }

    fn notify(&self) {
        self.listeners.emit(&ViewChanged {
            reference: self.reference.clone(),
            artifact_count: self.artifacts.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_listing;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_with(listing: &str, author: &str, message: &str, reference: &str) -> ArtifactStore {
        let mut store = ArtifactStore::new();
        store.replace(parse_listing(listing, Some(author), Some(message)), reference);
        store
    }

    #[test]
    fn links_prefix_new_artifacts_only() {
        let store = store_with("A\tx.ts", "a <a@b>", "", "abc123");
        assert_eq!(store.format_all_links(), vec!["+ x.ts#abc123"]);

        let store = store_with("M\tx.ts", "a <a@b>", "", "abc123");
        assert_eq!(store.format_all_links(), vec!["x.ts#abc123"]);
    }

    #[test]
    fn empty_view_has_no_links() {
        let store = store_with("", "a <a@b>", "", "abc123");
        assert!(store.format_all_links().is_empty());
    }

    #[test]
    fn filter_by_task_is_case_sensitive_substring() {
        let mut store = store_with("A\ta.ts\nM\tb.ts", "Ana <ana@x.com>", "TASK-1234", "r");
        store.filter(Some("23"), None);
        assert_eq!(store.artifacts().len(), 2);
        store.filter(Some("99"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn filter_by_author_ignores_case() {
        let mut store = store_with("A\ta.ts", "Ana Souza <ana@x.com>", "", "r");
        store.filter(None, Some("  SOUZA "));
        assert_eq!(store.artifacts().len(), 1);
        store.filter(None, Some("bruno"));
        assert!(store.is_empty());
    }

    #[test]
    fn missing_task_id_never_matches_task_filter() {
        let mut store = store_with("A\ta.ts", "Ana <ana@x.com>", "no id", "r");
        store.filter(Some("1"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn blank_criteria_are_noops() {
        let mut store = store_with("A\ta.ts\nD\tb.md", "Ana <ana@x.com>", "", "r");
        store.filter(None, None);
        store.filter(Some(" "), Some(""));
        assert_eq!(store.artifacts().len(), 2);
    }

    #[test]
    fn filtering_compounds() {
        let mut store = ArtifactStore::new();
        let mut artifacts = parse_listing("A\ta.ts", Some("Ana <ana@x.com>"), Some("TASK-1"));
        artifacts.extend(parse_listing("A\tb.ts", Some("Bruno <b@x.com>"), Some("TASK-2")));
        store.replace(artifacts, "r");

        store.filter(None, Some("ana"));
        assert_eq!(store.artifacts().len(), 1);
        store.filter(None, Some("bruno"));
        assert!(store.is_empty(), "excluded artifacts do not come back");
    }

    #[test]
    fn complexity_override_and_removal() {
        let mut store = store_with("A\ta.ts\nM\tb.css", "a <a@b>", "", "r");
        store.set_complexity("b.css", Complexity::High).unwrap();
        assert_eq!(store.artifacts()[1].complexity, Complexity::High);

        store.remove("a.ts").unwrap();
        assert_eq!(store.artifacts().len(), 1);
        assert!(matches!(store.remove("a.ts"), Err(LedgerError::NoArtifactsSelected(_))));
        assert!(store.set_complexity("zzz", Complexity::Low).is_err());
    }

    #[test]
    fn single_link_lookup() {
        let store = store_with("A\tnew.ts\nM\told.ts", "a <a@b>", "", "ff00");
        assert_eq!(store.format_link("new.ts").unwrap(), "+ new.ts#ff00");
        assert_eq!(store.format_link("old.ts").unwrap(), "old.ts#ff00");
        assert!(store.format_link("missing.ts").is_err());
    }

    #[test]
    fn mutations_notify_listeners() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut store = ArtifactStore::new();
        store.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        store.replace(parse_listing("A\ta.ts\nA\tb.ts", None, None), "r1");
        store.remove("a.ts").unwrap();
        store.replace(Vec::new(), "");

        let counts: Vec<_> = events.borrow().iter().map(|e| e.artifact_count).collect();
        assert_eq!(counts, vec![2, 1, 0]);
        assert_eq!(events.borrow()[0].reference, "r1");
    }
}
