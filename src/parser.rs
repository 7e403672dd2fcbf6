// src/parser.rs

use crate::classifier::{classify_complexity, classify_type};
use crate::metadata::extract_task_id;
use crate::model::*;
use tracing::debug;

/// Parses a name-status listing (`<status>\t<path>` per line) into artifacts.
///
/// Paths are rebuilt by joining every token after the status code with a
/// single space. A rename line with exactly three tab-separated fields
/// (`R100\told\tnew`) is read as source and destination instead.
pub fn parse_listing(listing: &str, author: Option<&str>, message: Option<&str>) -> Vec<Artifact> {
    let entries: Vec<ChangeEntry> = listing.lines().filter_map(parse_line).collect();
    parse_entries(&entries, author, message)
}

/// Builds artifacts from canonical change entries, preserving their order.
///
/// The task id is extracted once from `message` and shared by every artifact.
pub fn parse_entries(entries: &[ChangeEntry], author: Option<&str>, message: Option<&str>) -> Vec<Artifact> {
    let task_id = message.and_then(extract_task_id);

    entries
        .iter()
        .map(|entry| {
            let change_type = ChangeType::from_status(&entry.status);
            debug!(status = %entry.status, path = %entry.path, %change_type, "parsed change entry");
            Artifact {
                path: entry.path.clone(),
                file_type: classify_type(&entry.path),
                change_type,
                complexity: classify_complexity(&entry.path),
                author: author.map(String::from),
                task_id: task_id.clone(),
                previous_path: entry.previous_path.clone(),
            }
        })
        .collect()
}

fn parse_line(line: &str) -> Option<ChangeEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() == 3 && ChangeType::from_status(fields[0].trim()) == ChangeType::Renamed {
        let (old, new) = (fields[1].trim(), fields[2].trim());
        if !old.is_empty() && !new.is_empty() {
            return Some(ChangeEntry {
                status: fields[0].trim().to_string(),
                path: new.to_string(),
                previous_path: Some(old.to_string()),
            });
        }
    }

    let mut tokens = line.split_whitespace();
    let status = tokens.next()?;
    let path = tokens.collect::<Vec<_>>().join(" ");
    if path.is_empty() {
        debug!(line = %line, "skipping malformed listing line");
        return None;
    }
    Some(ChangeEntry::new(status, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_listing() {
        let artifacts = parse_listing("A\tsrc/a.ts\nM\tREADME.md\nD\told.png", None, None);
        assert_eq!(artifacts.len(), 3);

        assert_eq!(artifacts[0].path, "src/a.ts");
        assert_eq!(artifacts[0].file_type, FileType::TypeScript);
        assert_eq!(artifacts[0].change_type, ChangeType::New);
        assert_eq!(artifacts[0].complexity, Complexity::Medium);

        assert_eq!(artifacts[1].path, "README.md");
        assert_eq!(artifacts[1].file_type, FileType::Markdown);
        assert_eq!(artifacts[1].change_type, ChangeType::Updated);
        assert_eq!(artifacts[1].complexity, Complexity::NotApplicable);

        assert_eq!(artifacts[2].path, "old.png");
        assert_eq!(artifacts[2].file_type, FileType::Other);
        assert_eq!(artifacts[2].change_type, ChangeType::Deleted);
        assert_eq!(artifacts[2].complexity, Complexity::NotApplicable);
    }

    #[test]
    fn rejoins_paths_with_spaces() {
        let artifacts = parse_listing("M\tdocs/release   notes.md", None, None);
        assert_eq!(artifacts[0].path, "docs/release notes.md");
    }

    #[test]
    fn skips_blank_and_malformed_lines() {
        let artifacts = parse_listing("\nA\ta.js\n\n   \nM\nD\tb.css\n", None, None);
        let paths: Vec<_> = artifacts.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(paths, vec!["a.js", "b.css"]);
    }

    #[test]
    fn empty_listing_yields_nothing() {
        assert!(parse_listing("", Some("A <a@b.c>"), Some("TASK-1")).is_empty());
    }

    #[test]
    fn unknown_status_is_other() {
        let artifacts = parse_listing("T\tlink.ts\nC100\tcopy.ts", None, None);
        assert!(artifacts.iter().all(|a| a.change_type == ChangeType::Other));
    }

    #[test]
    fn rename_with_both_paths() {
        let artifacts = parse_listing("R087\tsrc/old.ts\tsrc/new.ts", None, None);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].change_type, ChangeType::Renamed);
        assert_eq!(artifacts[0].path, "src/new.ts");
        assert_eq!(artifacts[0].previous_path.as_deref(), Some("src/old.ts"));
    }

    #[test]
    fn rename_without_tabs_keeps_remainder() {
        let artifacts = parse_listing("R moved.ts", None, None);
        assert_eq!(artifacts[0].change_type, ChangeType::Renamed);
        assert_eq!(artifacts[0].path, "moved.ts");
        assert_eq!(artifacts[0].previous_path, None);
    }

    #[test]
    fn author_and_task_shared_across_artifacts() {
        let artifacts = parse_listing(
            "A\ta.ts\nM\tb.ts",
            Some("c1234567 <c1234567@bank.com>"),
            Some("feat: TASK-77 login form"),
        );
        for artifact in &artifacts {
            assert_eq!(artifact.author.as_deref(), Some("c1234567 <c1234567@bank.com>"));
            assert_eq!(artifact.task_id.as_deref(), Some("77"));
        }
    }

    #[test]
    fn missing_message_means_no_task() {
        let artifacts = parse_listing("A\ta.ts", Some("x <y@z>"), None);
        assert_eq!(artifacts[0].task_id, None);
    }
}
