//! Error types for sandbox-test-utils

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, FixtureError>;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`gpg {args}` failed (exit code {code:?}): {stderr}")]
    Gpg {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("gpg listed no {what} for the generated key")]
    IncompleteKey { what: &'static str },

    #[error(transparent)]
    Fs(#[from] sandbox_fs::Error),

    #[error(transparent)]
    Sandbox(#[from] sandbox_git::Error),
}

impl FixtureError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
