// src/metadata.rs

//! Task and author identifiers embedded in free text.

use regex::Regex;
use std::sync::LazyLock;

/// Task-id patterns in precedence order: `task-12`, `t#12`, `#12`
static TASK_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\btask[-#](\d+)\b").unwrap(),
        Regex::new(r"(?i)\bt[-#](\d+)\b").unwrap(),
        Regex::new(r"#(\d+)\b").unwrap(),
    ]
});

/// Organizational author id: `c` plus seven digits
static AUTHOR_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bc\d{7}\b").unwrap());

/// Returns the digits of the first task reference found in `message`.
///
/// Patterns are tried in precedence order, so `"see #7 and TASK-9"` yields
/// `"9"` even though `#7` appears first.
pub fn extract_task_id(message: &str) -> Option<String> {
    TASK_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(message))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_author_id(author: &str) -> Option<String> {
    AUTHOR_ID.find(author).map(|m| m.as_str().to_string())
}
