// src/vcs.rs

use crate::error::{LedgerError, Result};
use crate::model::{ChangeEntry, CommitInfo, Identity};
use git2::{Commit, Delta, Diff, DiffFindOptions, DiffOptions, ErrorCode, Repository, Sort};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The version-control collaborator the ledger captures from.
///
/// Implementations hand back canonical [`ChangeEntry`] values; nothing past
/// this boundary inspects backend-specific shapes.
pub trait VersionControl {
    /// The checked-out commit, or `None` on a branch with no commits yet
    fn head(&self) -> Result<Option<CommitInfo>>;

    /// Resolves any revision expression (`HEAD~2`, a short id, a tag)
    fn commit(&self, reference: &str) -> Result<CommitInfo>;

    /// Files changed by `commit_id` relative to its first parent
    fn changes(&self, commit_id: &str) -> Result<Vec<ChangeEntry>>;

    /// Files staged in the index relative to HEAD
    fn staged_changes(&self) -> Result<Vec<ChangeEntry>>;

    /// The configured `user.name` / `user.email`
    fn identity(&self) -> Result<Identity>;

    /// Newest-first commits reachable from HEAD
    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitInfo>>;

    /// Working directory of the repository, if it has one
    fn workdir(&self) -> Option<&Path>;
}

/// [`VersionControl`] backed by a local git repository.
pub struct GitRepository {
    repo: Repository,
    workdir: Option<PathBuf>,
}

impl GitRepository {
    /// Opens the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => LedgerError::WorkspaceMissing,
            _ => e.into(),
        })?;
        let workdir = repo.workdir().map(Path::to_path_buf);
        debug!(path = %path.display(), "opened repository");
        Ok(Self { repo, workdir })
    }

    fn find_commit(&self, reference: &str) -> Result<Commit<'_>> {
        Ok(self.repo.revparse_single(reference)?.peel_to_commit()?)
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl VersionControl for GitRepository {
    fn head(&self) -> Result<Option<CommitInfo>> {
        Ok(self.head_commit()?.map(|c| commit_info(&c)))
    }

    fn commit(&self, reference: &str) -> Result<CommitInfo> {
        Ok(commit_info(&self.find_commit(reference)?))
    }

    fn changes(&self, commit_id: &str) -> Result<Vec<ChangeEntry>> {
        let commit = self.find_commit(commit_id)?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };
        let current_tree = commit.tree()?;

        let mut diff = self.repo.diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&current_tree),
            Some(&mut diff_options()),
        )?;
        change_entries(&mut diff)
    }

    fn staged_changes(&self) -> Result<Vec<ChangeEntry>> {
        let head_tree = match self.head_commit()? {
            Some(commit) => Some(commit.tree()?),
            None => None,
        };
        let index = self.repo.index()?;
        let mut diff =
            self.repo.diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut diff_options()))?;
        change_entries(&mut diff)
    }

    fn identity(&self) -> Result<Identity> {
        let signature = self.repo.signature()?;
        Ok(Identity {
            name: signature.name().unwrap_or("Unknown").to_string(),
            email: signature.email().unwrap_or("").to_string(),
        })
    }

    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitInfo>> {
        if self.head_commit()?.is_none() {
            return Ok(Vec::new());
        }
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let mut commits = Vec::new();
        for oid in revwalk.take(limit) {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(commit_info(&commit));
        }
        Ok(commits)
    }

    fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }
}

fn diff_options() -> DiffOptions {
    let mut diff_opts = DiffOptions::new();
    diff_opts.include_untracked(false);
    diff_opts.ignore_filemode(true);
    diff_opts
}

fn commit_info(commit: &Commit<'_>) -> CommitInfo {
    let author = commit.author();
    CommitInfo {
        id: commit.id().to_string(),
        author: Identity {
            name: author.name().unwrap_or("Unknown").to_string(),
            email: author.email().unwrap_or("").to_string(),
        },
        message: commit.message().unwrap_or("").to_string(),
        time: commit.time().seconds(),
    }
}

/// Single-letter status code for a delta, as `git diff --name-status` prints it
fn status_code(status: Delta) -> &'static str {
    match status {
        Delta::Added => "A",
        Delta::Modified => "M",
        Delta::Deleted => "D",
        Delta::Renamed => "R",
        Delta::Copied => "C",
        Delta::Typechange => "T",
        Delta::Conflicted => "U",
        _ => "X",
    }
}

fn change_entries(diff: &mut Diff<'_>) -> Result<Vec<ChangeEntry>> {
    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))?;

    let entries = diff
        .deltas()
        .filter_map(|delta| {
            let old_path = delta.old_file().path().map(|p| p.to_string_lossy().into_owned());
            let new_path = delta.new_file().path().map(|p| p.to_string_lossy().into_owned());
            let status = delta.status();

            let (path, previous_path) = match status {
                Delta::Deleted => (old_path, None),
                Delta::Renamed | Delta::Copied => (new_path, old_path),
                _ => (new_path.or(old_path), None),
            };
            path.map(|path| ChangeEntry {
                status: status_code(status).to_string(),
                path,
                previous_path,
            })
        })
        .collect();
    Ok(entries)
}
