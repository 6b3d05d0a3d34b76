//! Co-change analysis: which files tend to be committed together with a given file.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    process::Command,
};

use crate::error::MetafieldError;

const RECORD_SEP: char = '\u{1e}';
const FIELD_SEP: char = '\u{1f}';

/// Commit <-> file incidence table.
#[derive(Debug, Clone, Default)]
pub struct CommitFriends {
    commits: BTreeMap<String, BTreeSet<String>>,
    files: BTreeMap<String, BTreeSet<String>>,
}

impl CommitFriends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pair(&mut self, commit: &str, path: &str) {
        self.commits
            .entry(commit.to_string())
            .or_default()
            .insert(path.to_string());
        self.files
            .entry(path.to_string())
            .or_default()
            .insert(commit.to_string());
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Files sharing at least one commit with the first tracked path containing `file_part`,
    /// most shared commits first. Empty when no tracked path matches.
    pub fn file_friends(&self, file_part: &str) -> Vec<(String, usize)> {
        let Some((mine, my_commits)) = self.files.iter().find(|(f, _)| f.contains(file_part))
        else {
            return Vec::new();
        };
        let mut friends: Vec<(String, usize)> = self
            .files
            .iter()
            .filter(|(other, _)| *other != mine)
            .map(|(other, commits)| (other.clone(), my_commits.intersection(commits).count()))
            .filter(|(_, shared)| *shared > 0)
            .collect();
        friends.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        friends
    }

    /// Parse `git log` output produced with [`GIT_LOG_FORMAT`] and `--name-only`.
    ///
    /// Only commits with exactly one parent count: merges and the root commit are skipped.
    pub fn from_git_log(log: &str) -> Self {
        let mut friends = CommitFriends::new();
        for record in log.split(RECORD_SEP).filter(|r| !r.trim().is_empty()) {
            let mut lines = record.lines();
            let Some((commit, parents)) = lines.next().and_then(|h| h.split_once(FIELD_SEP))
            else {
                continue;
            };
            if parents.split_whitespace().count() != 1 {
                continue;
            }
            for path in lines.map(str::trim).filter(|l| !l.is_empty()) {
                friends.add_pair(commit.trim(), path);
            }
        }
        friends
    }
}

/// `%x1e` starts each record, `%x1f` separates the hash from the parent list.
pub const GIT_LOG_FORMAT: &str = "--format=%x1e%H%x1f%P";

/// Read the history of `repo_dir` and rank the co-change friends of `file_part`.
pub fn find_friends(
    file_part: &str,
    repo_dir: &Path,
) -> Result<Vec<(String, usize)>, MetafieldError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_dir)
        .args(["log", GIT_LOG_FORMAT, "--name-only"])
        .output()
        .map_err(|e| MetafieldError::Command(format!("could not run git: {e}")))?;
    if !output.status.success() {
        return Err(MetafieldError::Command(format!(
            "git log failed in {:?}: {}",
            repo_dir,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    let friends = CommitFriends::from_git_log(&String::from_utf8_lossy(&output.stdout));
    tracing::debug!(
        "Read {} single-parent commits from {:?}",
        friends.commit_count(),
        repo_dir
    );
    Ok(friends.file_friends(file_part))
}

/// Top level of the git work tree containing `dir`.
pub fn repo_toplevel(dir: &Path) -> Result<PathBuf, MetafieldError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| MetafieldError::Command(format!("could not run git: {e}")))?;
    if !output.status.success() {
        return Err(MetafieldError::Command(format!(
            "git rev-parse failed in {:?}: {}",
            dir,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if toplevel.is_empty() {
        return Err(MetafieldError::Command(format!(
            "{dir:?} is not inside a git work tree"
        )));
    }
    Ok(PathBuf::from(toplevel))
}
