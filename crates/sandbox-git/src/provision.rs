//! Sandbox provisioning and teardown
//!
//! [`provision`] renders the per-user Git configuration into the sandbox
//! root, runs the initialization script against it and hands back a
//! [`Sandbox`]. The sandbox owns its root directory: dropping it, on any
//! exit path, removes the whole tree. A provisioning attempt that fails
//! drops the root before returning the error, so nothing leaks either way.

use std::ffi::OsString;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::process::Command;

use sandbox_fs::FixtureConfig;
use tempfile::TempDir;

use crate::{Error, Result, SandboxHandle, SandboxParameters, SigningIdentity, template};

/// Already-resolved inputs of one provisioning run.
#[derive(Debug, Clone, Copy)]
pub struct ProvisionRequest<'a> {
    /// Git configuration template with identity placeholders
    pub gitconfig_template: &'a Path,
    /// Script that builds the repository topology
    pub init_script: &'a Path,
    pub identity: &'a SigningIdentity,
    pub params: &'a SandboxParameters,
    pub config: &'a FixtureConfig,
}

/// Directory a sandbox lives in, removed when dropped.
#[derive(Debug)]
pub struct SandboxRoot {
    path: PathBuf,
    temp: Option<TempDir>,
}

impl SandboxRoot {
    /// A fresh, uniquely named directory under the system temp dir.
    pub fn temp(config: &FixtureConfig) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&config.sandbox_prefix)
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;
        Ok(Self {
            path: dir.path().to_path_buf(),
            temp: Some(dir),
        })
    }

    /// Take ownership of `path`, creating it if needed.
    ///
    /// The directory is deleted with the sandbox like a temporary one.
    pub fn at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
        Ok(Self { path, temp: None })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SandboxRoot {
    fn drop(&mut self) {
        match self.temp.take() {
            Some(dir) => {
                if let Err(e) = dir.close() {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to remove sandbox root");
                }
            }
            None => teardown_path(&self.path),
        }
    }
}

/// Recursively remove `path`, logging instead of failing.
pub fn teardown_path(path: &Path) {
    match std::fs::remove_dir_all(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed sandbox root"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove sandbox root")
        }
    }
}

/// A provisioned sandbox.
///
/// Derefs to its [`SandboxHandle`]; the root directory goes away with it.
#[derive(Debug)]
pub struct Sandbox {
    handle: SandboxHandle,
    root: SandboxRoot,
}

impl Sandbox {
    pub fn handle(&self) -> &SandboxHandle {
        &self.handle
    }

    /// Directory removed on teardown.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Remove the sandbox now instead of at end of scope.
    pub fn teardown(self) {
        tracing::debug!(home = %self.handle.home_dir.display(), "tearing down sandbox");
    }
}

impl Deref for Sandbox {
    type Target = SandboxHandle;

    fn deref(&self) -> &SandboxHandle {
        &self.handle
    }
}

/// Variables that confine `git` and `gpg` to a sandbox.
///
/// Subprocesses start from an empty environment; only `PATH` is inherited so
/// the binaries can be found.
pub(crate) fn isolation_env(home: &Path, gnupg_home: &Path) -> Vec<(&'static str, OsString)> {
    let mut env = vec![
        ("HOME", home.as_os_str().to_owned()),
        ("GNUPGHOME", gnupg_home.as_os_str().to_owned()),
        ("GIT_CONFIG_NOSYSTEM", OsString::from("1")),
    ];
    if let Some(path) = std::env::var_os("PATH") {
        env.push(("PATH", path));
    }
    env
}

/// Inputs of the initialization script.
fn script_env(handle: &SandboxHandle) -> Vec<(&'static str, OsString)> {
    vec![
        ("GIT_COMMIT_MESSAGE", handle.commit_message.clone().into()),
        ("GIT_INITIAL_BRANCH_NAME", handle.initial_branch_name.clone().into()),
        ("GIT_PATH_CLONE", handle.clone_work_tree.clone().into()),
        ("GIT_PATH_FORK", handle.fork_path.clone().into()),
        ("GIT_PATH_UPSTREAM", handle.upstream_path.clone().into()),
        ("GIT_PATH_WORK_TREE", handle.work_tree.clone().into()),
        ("GIT_REMOTE_NAME_FORK", handle.remote_name_fork.clone().into()),
        ("GIT_REMOTE_NAME_UPSTREAM", handle.remote_name_upstream.clone().into()),
        ("GIT_TEST_FILENAME", handle.test_filename.clone().into()),
        ("GIT_WORK_TREE_BRANCH_NAME", handle.work_tree_branch_name.clone().into()),
        ("GNUPG_PASSPHRASE", handle.identity.passphrase.clone().into()),
    ]
}

/// Provision a sandbox inside `root`.
///
/// The steps run strictly in order:
/// 1. render `<root>/.gitconfig` from the template and identity
/// 2. run the initialization script with `root` as `HOME` and working directory
/// 3. describe the result as a [`SandboxHandle`]
///
/// # Errors
///
/// Template and I/O failures, or [`Error::InitScriptFailed`] carrying the
/// script's output. `root` is removed before the error is returned.
pub fn provision(request: &ProvisionRequest<'_>, root: SandboxRoot) -> Result<Sandbox> {
    // git reports canonical paths; keep the handle comparable with them
    let home = dunce::canonicalize(root.path()).map_err(|e| Error::io(root.path(), e))?;

    let span = tracing::debug_span!("provision", home = %home.display());
    let _enter = span.enter();
    tracing::debug!("Initializing git sandbox ...");

    let gitconfig = template::write_gitconfig(&home, request.gitconfig_template, request.identity)?;
    tracing::debug!(path = %gitconfig.display(), "rendered gitconfig");

    let handle = SandboxHandle::from_layout(&home, request.identity, request.params);
    run_init_script(request, &handle)?;

    handle.log();
    Ok(Sandbox { handle, root })
}

fn run_init_script(request: &ProvisionRequest<'_>, handle: &SandboxHandle) -> Result<()> {
    let shell = &request.config.shell;
    let output = Command::new(shell)
        .arg(request.init_script)
        .current_dir(&handle.home_dir)
        .env_clear()
        .envs(isolation_env(&handle.home_dir, &handle.identity.gnupg_home))
        .envs(script_env(handle))
        .output()
        .map_err(|e| Error::io(shell, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    tracing::trace!(%stdout, %stderr, "initialization script output");

    if !output.status.success() {
        return Err(Error::InitScriptFailed {
            script: request.init_script.to_path_buf(),
            code: output.status.code(),
            stdout,
            stderr,
        });
    }
    Ok(())
}
