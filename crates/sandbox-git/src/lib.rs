//! Disposable Git sandboxes for test suites
//!
//! Stands up a bare upstream, a bare fork, a clone and a detached work tree
//! inside an isolated home directory, with one signed commit shared between
//! them, and removes everything again when the [`Sandbox`] guard goes away.

pub mod error;
pub mod handle;
pub mod identity;
pub mod inspect;
pub mod naming;
pub mod provision;
pub mod template;

pub use error::{Error, Result};
pub use handle::SandboxHandle;
pub use identity::{SigningIdentity, UserId};
pub use inspect::{LogTarget, UpstreamCommit};
pub use naming::{RemoteRole, SandboxParameters};
pub use provision::{ProvisionRequest, Sandbox, SandboxRoot, provision, teardown_path};
pub use template::Template;
