//! Read-only queries against a provisioned sandbox
//!
//! Helpers for tests asserting on the sandbox: signature verification goes
//! through the `git` CLI (it needs `gpg`), structural checks use `git2`.

use std::path::Path;
use std::process::Command;

use git2::{BranchType, Repository};

use crate::{Error, Result, SandboxHandle};

/// Marker `git log --show-signature` prints for a verified signature.
pub const GOOD_SIGNATURE: &str = "Good signature from";

/// Where to run `git log --show-signature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// The clone's own work tree and `.git`
    Clone,
    /// The detached work tree, with `GIT_DIR` pointed at upstream
    WorkTree,
}

/// Output of `git log --show-signature` for `target`.
pub fn signature_log(handle: &SandboxHandle, target: LogTarget, git: &Path) -> Result<String> {
    let mut command = Command::new(git);
    command
        .args(["log", "--show-signature"])
        .env_clear()
        .envs(handle.env());

    match target {
        LogTarget::Clone => {
            command.current_dir(&handle.clone_work_tree);
        }
        LogTarget::WorkTree => {
            command
                .current_dir(&handle.work_tree)
                .env("GIT_DIR", &handle.upstream_path);
        }
    }

    let output = command.output().map_err(|e| Error::io(git, e))?;
    if !output.status.success() {
        return Err(Error::GitCommandFailed {
            args: "log --show-signature".into(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    // gpg reports on stderr when git cannot capture its status fd
    let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
    log.push_str(&String::from_utf8_lossy(&output.stderr));
    tracing::debug!(?target, %log, "signature log");
    Ok(log)
}

pub fn has_good_signature(log: &str) -> bool {
    log.contains(GOOD_SIGNATURE)
}

/// References present in the fork; empty unless something pushed to it.
pub fn fork_refs(handle: &SandboxHandle) -> Result<Vec<String>> {
    let repo = Repository::open_bare(&handle.fork_path)?;
    let mut names = Vec::new();
    for reference in repo.references()? {
        if let Some(name) = reference?.name() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Remote names and URLs configured on the clone, sorted by name.
pub fn clone_remotes(handle: &SandboxHandle) -> Result<Vec<(String, String)>> {
    let repo = Repository::open(&handle.clone_work_tree)?;
    let mut remotes = Vec::new();
    for name in repo.remotes()?.iter().flatten() {
        let remote = repo.find_remote(name)?;
        remotes.push((name.to_string(), remote.url().unwrap_or_default().to_string()));
    }
    remotes.sort();
    Ok(remotes)
}

/// Summary of the commit at the tip of upstream's initial branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCommit {
    pub id: String,
    pub message: String,
    /// Whether the commit object carries a `gpgsig` header
    pub signed: bool,
    /// Number of commits reachable from the tip
    pub history_len: usize,
}

pub fn upstream_head(handle: &SandboxHandle) -> Result<UpstreamCommit> {
    let repo = Repository::open_bare(&handle.upstream_path)?;
    let branch = repo.find_branch(&handle.initial_branch_name, BranchType::Local)?;
    let commit = branch.get().peel_to_commit()?;

    let mut walk = repo.revwalk()?;
    walk.push(commit.id())?;
    let history_len = walk.count();

    Ok(UpstreamCommit {
        id: commit.id().to_string(),
        message: commit.message().unwrap_or_default().trim_end().to_string(),
        signed: repo.extract_signature(&commit.id(), None).is_ok(),
        history_len,
    })
}
