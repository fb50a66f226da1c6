//! Test-harness glue for git sandboxes.
//!
//! The core crates take already-resolved inputs; this crate resolves them
//! for a test: it generates a throwaway GnuPG identity, locates the support
//! files and exposes everything as `rstest` fixtures.
//!
//! # Modules
//!
//! - [`gnupg`]: throwaway signing identities
//! - [`fixtures`]: `rstest` fixtures for parameters and resources
//! - [`repo`]: [`GitRepo`], a fully provisioned sandbox with its identity

pub mod error;
pub mod fixtures;
pub mod gnupg;
pub mod logging;
pub mod repo;

pub use error::{FixtureError, Result};
pub use gnupg::{GnuPgKeypair, git_available, gpg_available};
pub use logging::init_test_logging;
pub use repo::GitRepo;
