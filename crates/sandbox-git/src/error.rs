//! Error types for sandbox-git

use std::path::PathBuf;

/// Result type for sandbox-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while provisioning or inspecting a sandbox
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] sandbox_fs::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed user id '{uid}', expected 'Name <email>'")]
    MalformedUid { uid: String },

    #[error("Signing identity has no {what}")]
    MissingIdentity { what: &'static str },

    #[error("Unresolved template placeholder '{name}'")]
    UnresolvedPlaceholder { name: String },

    #[error("Malformed template placeholder at line {line}, column {column}")]
    MalformedTemplate { line: usize, column: usize },

    #[error("Initialization script {script} failed (exit code {code:?}):\n{stderr}")]
    InitScriptFailed {
        script: PathBuf,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("`git {args}` failed (exit code {code:?}): {stderr}")]
    GitCommandFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
