//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use commit_ledger::{ChangeEntry, CommitInfo, Config, Identity, Ledger, LedgerError, Result, VersionControl};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// In-memory version-control backend
#[derive(Default)]
pub struct FakeVcs {
    pub commits: Vec<(CommitInfo, Vec<ChangeEntry>)>,
    pub staged: Vec<ChangeEntry>,
    pub failing: bool,
    pub delay: Option<Duration>,
}

impl FakeVcs {
    pub fn with_commit(mut self, id: &str, author: &str, message: &str, listing: &[(&str, &str)]) -> Self {
        let (name, email) = author.split_once(" <").unwrap();
        let commit = CommitInfo {
            id: id.to_string(),
            author: Identity { name: name.to_string(), email: email.trim_end_matches('>').to_string() },
            message: message.to_string(),
            time: 1_700_000_000 + self.commits.len() as i64,
        };
        let entries = listing.iter().map(|(s, p)| ChangeEntry::new(*s, *p)).collect();
        self.commits.insert(0, (commit, entries));
        self
    }

    pub fn with_staged(mut self, listing: &[(&str, &str)]) -> Self {
        self.staged = listing.iter().map(|(s, p)| ChangeEntry::new(*s, *p)).collect();
        self
    }

    fn check(&self) -> Result<()> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if self.failing {
            return Err(LedgerError::VcsInvocationFailure("git exited with status 128".to_string()));
        }
        Ok(())
    }

    fn lookup(&self, reference: &str) -> Result<&(CommitInfo, Vec<ChangeEntry>)> {
        if reference == "HEAD" {
            return self.commits.first().ok_or(LedgerError::NoCommit);
        }
        self.commits
            .iter()
            .find(|(c, _)| c.id.starts_with(reference))
            .ok_or_else(|| LedgerError::VcsInvocationFailure(format!("unknown revision {reference}")))
    }
}

impl VersionControl for FakeVcs {
    fn head(&self) -> Result<Option<CommitInfo>> {
        self.check()?;
        Ok(self.commits.first().map(|(c, _)| c.clone()))
    }

    fn commit(&self, reference: &str) -> Result<CommitInfo> {
        self.check()?;
        Ok(self.lookup(reference)?.0.clone())
    }

    fn changes(&self, commit_id: &str) -> Result<Vec<ChangeEntry>> {
        self.check()?;
        Ok(self.lookup(commit_id)?.1.clone())
    }

    fn staged_changes(&self) -> Result<Vec<ChangeEntry>> {
        self.check()?;
        Ok(self.staged.clone())
    }

    fn identity(&self) -> Result<Identity> {
        Ok(Identity { name: "Dev".to_string(), email: "c7654321@bank.com".to_string() })
    }

    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitInfo>> {
        self.check()?;
        Ok(self.commits.iter().take(limit).map(|(c, _)| c.clone()).collect())
    }

    fn workdir(&self) -> Option<&Path> {
        None
    }
}

pub const HEAD_ID: &str = "abc1234567def890abc1234567def890abc12345";
pub const OLDER_ID: &str = "0011223344556677889900112233445566778899";

/// Two commits: an older docs change and a HEAD feature commit
pub fn sample_vcs() -> FakeVcs {
    FakeVcs::default()
        .with_commit(OLDER_ID, "Jane Doe <jane@x.com>", "docs: #7 readme", &[("M", "README.md")])
        .with_commit(
            HEAD_ID,
            "c1234567 <c1234567@bank.com>",
            "feat: TASK-42 login form\n\nsee #7",
            &[("A", "src/login.ts"), ("M", "web/login.html"), ("D", "old.png")],
        )
}

pub fn ledger(vcs: FakeVcs, dir: &Path) -> Ledger<FakeVcs> {
    Ledger::new(vcs, Config::default(), dir)
}
