//! Paths and identifiers of a provisioned sandbox

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use sandbox_fs::{GITCONFIG_FILENAME, SandboxPath};
use serde::Serialize;

use crate::{SandboxParameters, SigningIdentity, provision::isolation_env};

/// Everything a test needs to know about a sandbox.
///
/// Built once after the initialization script succeeded and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SandboxHandle {
    pub home_dir: PathBuf,
    pub upstream_path: PathBuf,
    pub fork_path: PathBuf,
    pub clone_git_dir: PathBuf,
    pub clone_work_tree: PathBuf,
    pub work_tree: PathBuf,
    /// Metadata directory Git keeps for the work tree inside upstream
    pub work_tree_git_dir: PathBuf,
    pub git_config_path: PathBuf,
    pub identity: SigningIdentity,
    pub initial_branch_name: String,
    pub work_tree_branch_name: String,
    pub remote_name_fork: String,
    pub remote_name_upstream: String,
    pub test_filename: String,
    pub commit_message: String,
}

impl SandboxHandle {
    /// Derive the handle from the fixed layout under `home_dir`.
    pub fn from_layout(
        home_dir: &Path,
        identity: &SigningIdentity,
        params: &SandboxParameters,
    ) -> Self {
        let clone = home_dir.join(SandboxPath::Clone);
        let upstream = home_dir.join(SandboxPath::Upstream);
        let work_tree = home_dir.join(SandboxPath::WorkTree);
        let work_tree_git_dir = upstream
            .join(SandboxPath::WorktreesDir)
            .join(SandboxPath::WorkTree);

        Self {
            home_dir: home_dir.to_path_buf(),
            fork_path: home_dir.join(SandboxPath::Fork),
            clone_git_dir: clone.join(SandboxPath::GitDir),
            clone_work_tree: clone,
            upstream_path: upstream,
            work_tree,
            work_tree_git_dir,
            git_config_path: home_dir.join(GITCONFIG_FILENAME),
            identity: identity.clone(),
            initial_branch_name: params.initial_branch_name.clone(),
            work_tree_branch_name: params.work_tree_branch_name.clone(),
            remote_name_fork: params.remote_name_fork.clone(),
            remote_name_upstream: params.remote_name_upstream.clone(),
            test_filename: params.test_filename.clone(),
            commit_message: params.commit_message.clone(),
        }
    }

    /// Every path of the sandbox with a short label.
    pub fn paths(&self) -> [(&'static str, &Path); 8] {
        [
            ("home", &self.home_dir),
            ("upstream", &self.upstream_path),
            ("fork", &self.fork_path),
            ("clone git dir", &self.clone_git_dir),
            ("clone work tree", &self.clone_work_tree),
            ("work tree", &self.work_tree),
            ("work tree git dir", &self.work_tree_git_dir),
            ("gitconfig", &self.git_config_path),
        ]
    }

    /// Paths that do not exist on disk.
    pub fn missing_paths(&self) -> Vec<&Path> {
        self.paths()
            .into_iter()
            .filter(|(_, path)| !path.exists())
            .map(|(_, path)| path)
            .collect()
    }

    /// Environment that keeps `git` inside this sandbox.
    pub fn env(&self) -> Vec<(&'static str, OsString)> {
        isolation_env(&self.home_dir, &self.identity.gnupg_home)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Dump every field at debug level.
    pub(crate) fn log(&self) {
        tracing::debug!("  clone             : {}", self.clone_work_tree.display());
        tracing::debug!("  commit message    : {}", self.commit_message);
        tracing::debug!("  fork (bare)       : {}", self.fork_path.display());
        tracing::debug!("  home              : {}", self.home_dir.display());
        tracing::debug!("  initial branch    : {}", self.initial_branch_name);
        tracing::debug!("  gitconfig         : {}", self.git_config_path.display());
        tracing::debug!("  remote (fork)     : {}", self.remote_name_fork);
        tracing::debug!("  remote (upstream) : {}", self.remote_name_upstream);
        tracing::debug!("  test filename     : {}", self.test_filename);
        tracing::debug!("  upstream (bare)   : {}", self.upstream_path.display());
        tracing::debug!("  work tree         : {}", self.work_tree.display());
        tracing::debug!("  work tree branch  : {}", self.work_tree_branch_name);
    }
}
