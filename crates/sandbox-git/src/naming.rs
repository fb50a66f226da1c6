//! Uniqueness-bearing names for sandbox branches, remotes and files
//!
//! Every generated value is a role prefix followed by a stamp built from the
//! wall clock and a process-wide sequence number, so sandboxes provisioned
//! side by side never share an identifier.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Initial branch of every sandbox.
///
/// Pinned to the legacy default so `git` releases older than 2.28, which
/// cannot choose the initial branch name, behave the same.
pub const INITIAL_BRANCH_NAME: &str = "master";

pub const BRANCH_PREFIX: &str = "branch-";
pub const TEST_FILE_PREFIX: &str = "test-";
pub const TEST_FILE_SUFFIX: &str = ".txt";
pub const COMMIT_MESSAGE_PREFIX: &str = "Initial commit: ";

/// Which bare repository a remote points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteRole {
    Fork,
    Upstream,
}

impl RemoteRole {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Fork => "fork-",
            Self::Upstream => "upstream-",
        }
    }
}

/// `<unix seconds>.<microseconds>-<sequence>`
fn stamp() -> String {
    let now = Utc::now();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}.{:06}-{}",
        now.timestamp(),
        now.timestamp_subsec_micros(),
        sequence
    )
}

/// Name of the branch the work tree is checked out on.
pub fn branch_name() -> String {
    format!("{BRANCH_PREFIX}{}", stamp())
}

/// Name of the clone's remote for the given role.
pub fn remote_name(role: RemoteRole) -> String {
    format!("{}{}", role.prefix(), stamp())
}

/// Name of the file committed into the repository.
pub fn test_filename() -> String {
    format!("{TEST_FILE_PREFIX}{}{TEST_FILE_SUFFIX}", stamp())
}

/// Message of the initial commit.
pub fn commit_message() -> String {
    format!("{COMMIT_MESSAGE_PREFIX}{}.", stamp())
}

/// Always [`INITIAL_BRANCH_NAME`].
pub fn initial_branch_name() -> String {
    INITIAL_BRANCH_NAME.to_string()
}

/// The generated and pinned parameters of one sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SandboxParameters {
    pub commit_message: String,
    pub initial_branch_name: String,
    pub remote_name_fork: String,
    pub remote_name_upstream: String,
    pub test_filename: String,
    pub work_tree_branch_name: String,
}

impl SandboxParameters {
    /// Fresh values for every parameter.
    pub fn generate() -> Self {
        Self {
            commit_message: commit_message(),
            initial_branch_name: initial_branch_name(),
            remote_name_fork: remote_name(RemoteRole::Fork),
            remote_name_upstream: remote_name(RemoteRole::Upstream),
            test_filename: test_filename(),
            work_tree_branch_name: branch_name(),
        }
    }
}

impl Default for SandboxParameters {
    fn default() -> Self {
        Self::generate()
    }
}
