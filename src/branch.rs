//! Repository state discovery: which branch is checked out, and whether the
//! repository is in a state where branch-based issue tracking is meaningful.

use anyhow::{Context, Result};
use git2::{Repository, RepositoryState};
use std::fmt;
use std::path::Path;

/// Branch name reported when HEAD is detached, matching
/// `git rev-parse --abbrev-ref HEAD`.
pub const DETACHED_HEAD: &str = "HEAD";

/// Snapshot of the repository state at invocation time. Built fresh per run,
/// never stored.
#[derive(Debug, Clone)]
pub struct BranchContext {
    pub branch_name: String,
    pub in_merge: bool,
    pub in_rebase: bool,
}

/// Why a repository state rules out a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    DetachedHead,
    MergeInProgress,
    RebaseInProgress,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::DetachedHead => write!(f, "detached HEAD"),
            Ineligibility::MergeInProgress => write!(f, "merge in progress"),
            Ineligibility::RebaseInProgress => write!(f, "rebase in progress"),
        }
    }
}

impl BranchContext {
    /// Read the current branch and in-progress operation state from the
    /// repository containing `project_dir`.
    pub fn discover(project_dir: &Path) -> Result<Self> {
        let repo = Repository::discover(project_dir).context("Failed to open git repository")?;

        // The HEAD symref names the current branch even when it is unborn;
        // a direct-OID HEAD means detached.
        let head = repo
            .find_reference("HEAD")
            .context("Failed to read HEAD reference")?;
        let branch_name = match head.symbolic_target() {
            Some(target) => target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string(),
            None => DETACHED_HEAD.to_string(),
        };

        let state = repo.state();
        let in_merge = state == RepositoryState::Merge;
        let in_rebase = matches!(
            state,
            RepositoryState::Rebase
                | RepositoryState::RebaseInteractive
                | RepositoryState::RebaseMerge
        );

        Ok(Self {
            branch_name,
            in_merge,
            in_rebase,
        })
    }

    /// `None` when a notification for this state would be meaningful, else the
    /// reason it is not.
    pub fn ineligibility(&self) -> Option<Ineligibility> {
        if self.branch_name == DETACHED_HEAD {
            Some(Ineligibility::DetachedHead)
        } else if self.in_merge {
            Some(Ineligibility::MergeInProgress)
        } else if self.in_rebase {
            Some(Ineligibility::RebaseInProgress)
        } else {
            None
        }
    }
}
