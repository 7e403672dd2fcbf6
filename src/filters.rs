// src/filters.rs

use crate::error::Result;
use crate::events::Listeners;
use crate::storage::JsonFile;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const FILTERS_FILE: &str = "filters.json";

/// Active author/task filters; an empty string means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    #[serde(rename = "taskId", default)]
    pub task: String,
    #[serde(default)]
    pub author: String,
}

impl FilterSnapshot {
    pub fn is_empty(&self) -> bool {
        self.task.trim().is_empty() && self.author.trim().is_empty()
    }

    /// Criteria as optional values, blank ones dropped
    pub fn criteria(&self) -> (Option<&str>, Option<&str>) {
        (non_blank(&self.task), non_blank(&self.author))
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Persisted filter values shared by the artifact view, history and commit list.
#[derive(Debug)]
pub struct FilterState {
    file: JsonFile,
    current: FilterSnapshot,
    listeners: Listeners<FilterSnapshot>,
}

impl FilterState {
    /// Loads saved filters from `dir`; absent or corrupt files yield empty filters.
    pub fn load(dir: &Path) -> Self {
        let file = JsonFile::new(dir, FILTERS_FILE);
        let current = file.load_or_default();
        Self { file, current, listeners: Listeners::new() }
    }

    pub fn current(&self) -> &FilterSnapshot {
        &self.current
    }

    pub fn set_author_filter(&mut self, author: impl Into<String>) -> Result<()> {
        let next = FilterSnapshot { author: author.into(), ..self.current.clone() };
        self.save(next)
    }

    pub fn set_task_filter(&mut self, task: impl Into<String>) -> Result<()> {
        let next = FilterSnapshot { task: task.into(), ..self.current.clone() };
        self.save(next)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.save(FilterSnapshot::default())
    }

    /// Registers a consumer to refresh whenever a filter changes
    pub fn subscribe(&mut self, callback: impl Fn(&FilterSnapshot) + 'static) {
        self.listeners.subscribe(callback);
    }

    /// Writes `next`, then makes it current. A failed write changes nothing.
    fn save(&mut self, next: FilterSnapshot) -> Result<()> {
        self.file.write(&next)?;
        self.current = next;
        info!(task = %self.current.task, author = %self.current.author, "filters saved");
        self.listeners.emit(&self.current);
        Ok(())
    }
}
