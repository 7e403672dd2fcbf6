// src/history.rs

use crate::error::Result;
use crate::filters::FilterSnapshot;
use crate::model::{HistoryEntry, Report};
use crate::storage::JsonFile;
use crate::store::matches_filter;
use chrono::{DateTime, Duration, Local, SecondsFormat, Utc};
use std::path::Path;
use tracing::info;

pub const HISTORY_FILE: &str = "report-history.json";

/// Size-bounded log of past reports, most recent first.
#[derive(Debug)]
pub struct HistoryStore {
    file: JsonFile,
    limit: usize,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Loads the persisted log from `dir`.
    ///
    /// A missing, unreadable or malformed file starts an empty history. Entries
    /// past `limit` are dropped from the view; the file shrinks on the next append.
    pub fn load(dir: &Path, limit: usize) -> Self {
        let file = JsonFile::new(dir, HISTORY_FILE);
        let mut entries: Vec<HistoryEntry> = file.load_or_default();
        entries.truncate(limit);
        info!(count = entries.len(), limit = limit, "history loaded");
        Self { file, limit, entries }
    }

    /// Records `report` as the newest entry, evicts past the limit, and persists.
    ///
    /// Returns the new entry, or `None` when the limit is zero.
    pub fn append(&mut self, report: Report) -> Result<Option<&HistoryEntry>> {
        let created = self.next_timestamp();
        let local = created.with_timezone(&Local);
        let entry = HistoryEntry {
            id: created.to_rfc3339_opts(SecondsFormat::Nanos, true),
            name: format!("Report {} {}", local.format("%x"), local.format("%X")),
            artifact_count: report.artifacts.len(),
            report,
        };

        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(entry);
        entries.extend(self.entries.iter().cloned());
        entries.truncate(self.limit);

        // In-memory history only changes once the write has succeeded.
        self.file.write(&entries)?;
        self.entries = entries;
        info!(entries = self.entries.len(), "history saved");
        Ok(self.entries.first())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries holding at least one artifact that passes `filter`; all
    /// entries when the filter is empty.
    pub fn filtered(&self, filter: &FilterSnapshot) -> Vec<&HistoryEntry> {
        if filter.is_empty() {
            return self.entries.iter().collect();
        }
        let (task, author) = filter.criteria();
        self.entries
            .iter()
            .filter(|e| e.report.artifacts.iter().any(|a| matches_filter(a, task, author)))
            .collect()
    }

    /// Creation instant for a new entry, strictly after the newest existing id.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let newest = self
            .entries
            .first()
            .and_then(|e| DateTime::parse_from_rfc3339(&e.id).ok())
            .map(|t| t.with_timezone(&Utc));
        match newest {
            Some(last) if last >= now => last + Duration::nanoseconds(1),
            _ => now,
        }
    }
}
