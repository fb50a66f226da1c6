//! Filesystem layer for Git sandboxes
//!
//! Locates the support files a sandbox needs (configuration template,
//! initialization script), loads fixture configuration and provides safe
//! I/O primitives.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod resources;

pub use config::FixtureConfig;
pub use constants::{GITCONFIG_FILENAME, OVERRIDE_DIR, SandboxPath};
pub use error::{Error, Result};
pub use resources::{LocatedResource, Resource, ResourceLocator, project_root};
