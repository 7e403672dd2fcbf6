// src/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference recorded for a staged capture taken before the commit exists
pub const PLACEHOLDER_REFERENCE: &str = "hash_temp";

/// Kind of change a file underwent in one extraction
///
/// Reports and history files written by the Portuguese-labelled extension
/// (`"Novo"`, `"Atualização"`, ...) deserialize through the aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    #[serde(alias = "Novo")]
    New,
    #[serde(alias = "Atualização")]
    Updated,
    #[serde(alias = "Remoção")]
    Deleted,
    #[serde(alias = "Renomeado")]
    Renamed,
    #[serde(alias = "Outro")]
    Other,
}

impl ChangeType {
    /// Maps a single status code from a name-status listing.
    ///
    /// Rename codes may carry a similarity score (`R100`), which is ignored.
    pub fn from_status(code: &str) -> Self {
        match code {
            "A" => ChangeType::New,
            "M" => ChangeType::Updated,
            "D" => ChangeType::Deleted,
            "R" => ChangeType::Renamed,
            s if is_scored(s, 'R') => ChangeType::Renamed,
            _ => ChangeType::Other,
        }
    }
}

fn is_scored(code: &str, letter: char) -> bool {
    code.strip_prefix(letter)
        .is_some_and(|score| !score.is_empty() && score.chars().all(|c| c.is_ascii_digit()))
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeType::New => "New",
            ChangeType::Updated => "Updated",
            ChangeType::Deleted => "Deleted",
            ChangeType::Renamed => "Renamed",
            ChangeType::Other => "Other",
        };
        f.pad(label)
    }
}

/// Review effort tier attached to an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    #[serde(alias = "Baixa")]
    Low,
    #[serde(alias = "Média")]
    Medium,
    #[serde(alias = "Alta")]
    High,
    #[serde(alias = "N/A")]
    NotApplicable,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
            Complexity::NotApplicable => "N/A",
        };
        f.pad(label)
    }
}

/// File-type label derived from a path extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    TypeScript,
    JavaScript,
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "CSS")]
    Css,
    #[serde(rename = "SCSS")]
    Scss,
    Java,
    #[serde(rename = "PHP")]
    Php,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "XML")]
    Xml,
    Markdown,
    #[serde(alias = "Outro")]
    Other,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileType::TypeScript => "TypeScript",
            FileType::JavaScript => "JavaScript",
            FileType::Html => "HTML",
            FileType::Css => "CSS",
            FileType::Scss => "SCSS",
            FileType::Java => "Java",
            FileType::Php => "PHP",
            FileType::Json => "JSON",
            FileType::Xml => "XML",
            FileType::Markdown => "Markdown",
            FileType::Other => "Other",
        };
        f.pad(label)
    }
}

/// One changed file within one extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub change_type: ChangeType,
    pub complexity: Complexity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Source path of a rename, when the listing carried it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
}

impl Artifact {
    /// `"+ path#reference"` for new files, `"path#reference"` otherwise
    pub fn link(&self, reference: &str) -> String {
        let prefix = if self.change_type == ChangeType::New { "+ " } else { "" };
        format!("{}{}#{}", prefix, self.path, reference)
    }
}

/// A canonical `(status, path)` pair produced at the version-control boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub status: String,
    pub path: String,
    pub previous_path: Option<String>,
}

impl ChangeEntry {
    pub fn new(status: impl Into<String>, path: impl Into<String>) -> Self {
        Self { status: status.into(), path: path.into(), previous_path: None }
    }
}

/// An artifact sequence plus the reference it was captured against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub commit_hash: String,
    pub artifacts: Vec<Artifact>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Report {
    pub fn new(commit_hash: impl Into<String>, artifacts: Vec<Artifact>) -> Self {
        Self { commit_hash: commit_hash.into(), artifacts, timestamp: Utc::now() }
    }
}

/// A persisted report in the history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    pub artifact_count: usize,
    #[serde(flatten)]
    pub report: Report,
}

/// Author identity as recorded by the version-control system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A commit as seen through the version-control adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: String,
    pub author: Identity,
    pub message: String,
    /// Seconds since the epoch
    pub time: i64,
}

impl CommitInfo {
    pub fn short_id(&self, len: usize) -> String {
        self.id.chars().take(len).collect()
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}
