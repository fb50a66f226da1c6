//! Fixed names that make up a sandbox on disk.

use std::path::Path;

/// Name Git looks up relative to `HOME` for the per-user configuration.
pub const GITCONFIG_FILENAME: &str = ".gitconfig";

/// Directory, relative to the project root, searched for resource overrides.
pub const OVERRIDE_DIR: &str = "tests";

/// Well-known entries inside a sandbox root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxPath {
    /// The working clone of upstream
    Clone,
    /// Bare repository that is never pushed to
    Fork,
    /// Bare repository holding the signed commit
    Upstream,
    /// Detached work tree derived from upstream
    WorkTree,
    /// The `.git` directory inside the clone
    GitDir,
    /// The `worktrees` metadata directory inside a bare repository
    WorktreesDir,
}

impl SandboxPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Fork => "fork",
            Self::Upstream => "upstream",
            Self::WorkTree => "work-tree",
            Self::GitDir => ".git",
            Self::WorktreesDir => "worktrees",
        }
    }
}

impl AsRef<Path> for SandboxPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SandboxPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SandboxPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
