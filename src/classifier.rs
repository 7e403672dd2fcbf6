// src/classifier.rs

use crate::model::{Complexity, FileType};

/// Lowercased extension of the final path component, including the dot.
///
/// Dotfiles without a further dot (`.gitignore`) have no extension.
fn extension(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(name[idx..].to_lowercase()),
    }
}

pub fn classify_type(path: &str) -> FileType {
    match extension(path).as_deref() {
        Some(".ts") => FileType::TypeScript,
        Some(".js") => FileType::JavaScript,
        Some(".html") => FileType::Html,
        Some(".css") => FileType::Css,
        Some(".scss") => FileType::Scss,
        Some(".java") => FileType::Java,
        Some(".php") => FileType::Php,
        Some(".json") => FileType::Json,
        Some(".xml") => FileType::Xml,
        Some(".md") => FileType::Markdown,
        _ => FileType::Other,
    }
}

pub fn classify_complexity(path: &str) -> Complexity {
    match extension(path).as_deref() {
        Some(".ts" | ".js" | ".java") => Complexity::Medium,
        Some(".html" | ".css" | ".scss") => Complexity::Low,
        _ => Complexity::NotApplicable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(classify_type("src/a.ts"), FileType::TypeScript);
        assert_eq!(classify_type("web/index.html"), FileType::Html);
        assert_eq!(classify_type("styles/main.scss"), FileType::Scss);
        assert_eq!(classify_type("README.md"), FileType::Markdown);
        assert_eq!(classify_type("pom.xml"), FileType::Xml);
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(classify_type("Main.JAVA"), FileType::Java);
        assert_eq!(classify_complexity("Main.JAVA"), Complexity::Medium);
        assert_eq!(classify_type("INDEX.Html"), FileType::Html);
    }

    #[test]
    fn unknown_or_missing_extension_is_other() {
        assert_eq!(classify_type("old.png"), FileType::Other);
        assert_eq!(classify_type("Makefile"), FileType::Other);
        assert_eq!(classify_type(".gitignore"), FileType::Other);
        assert_eq!(classify_type("dir.ts/file"), FileType::Other);
        assert_eq!(classify_complexity("old.png"), Complexity::NotApplicable);
    }

    #[test]
    fn complexity_tiers() {
        assert_eq!(classify_complexity("a.js"), Complexity::Medium);
        assert_eq!(classify_complexity("a.css"), Complexity::Low);
        assert_eq!(classify_complexity("a.json"), Complexity::NotApplicable);
        assert_eq!(classify_complexity("a.php"), Complexity::NotApplicable);
    }

    #[test]
    fn classification_is_stable() {
        for path in ["x.ts", "y.md", "z", "my file.scss"] {
            assert_eq!(classify_type(path), classify_type(path));
            assert_eq!(classify_complexity(path), classify_complexity(path));
        }
    }
}
