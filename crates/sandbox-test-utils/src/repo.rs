//! [`GitRepo`]: a provisioned sandbox together with everything it borrows.

use std::ops::Deref;
use std::path::Path;

use sandbox_fs::{FixtureConfig, LocatedResource, Resource, ResourceLocator, project_root};
use sandbox_git::{
    LogTarget, ProvisionRequest, Sandbox, SandboxHandle, SandboxParameters, SandboxRoot, inspect,
    provision,
};

use crate::{GnuPgKeypair, Result};

/// A sandbox with a bare upstream, a fork and a separate work tree.
///
/// Owns the signing identity and the located support files, so the sandbox
/// is removed first and the GnuPG home after it when this value drops.
///
/// # Example
///
/// ```rust,no_run
/// use sandbox_test_utils::GitRepo;
///
/// let repo = GitRepo::provision().unwrap();
/// assert!(repo.clone_git_dir.exists());
/// assert!(repo.work_tree_git_dir.exists());
/// ```
#[derive(Debug)]
pub struct GitRepo {
    sandbox: Sandbox,
    keypair: GnuPgKeypair,
    gitconfig: LocatedResource,
    init_script: LocatedResource,
    config: FixtureConfig,
}

impl GitRepo {
    /// Provision with the configuration discovered for the current project.
    pub fn provision() -> Result<Self> {
        let root = project_root();
        let config = FixtureConfig::discover(&root)?;
        Self::provision_with(config, &root)
    }

    /// Provision with explicit configuration and project root.
    pub fn provision_with(config: FixtureConfig, project_root: &Path) -> Result<Self> {
        let locator = ResourceLocator::from_config(&config, project_root);
        let gitconfig = locator.locate(Resource::GitConfig)?;
        let init_script = locator.locate(Resource::GitInitScript)?;
        let keypair = GnuPgKeypair::generate()?;
        let params = SandboxParameters::generate();

        let request = ProvisionRequest {
            gitconfig_template: gitconfig.path(),
            init_script: init_script.path(),
            identity: keypair.identity(),
            params: &params,
            config: &config,
        };
        let sandbox = provision(&request, SandboxRoot::temp(&config)?)?;

        Ok(Self {
            sandbox,
            keypair,
            gitconfig,
            init_script,
            config,
        })
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn keypair(&self) -> &GnuPgKeypair {
        &self.keypair
    }

    /// Template the sandbox's `.gitconfig` was rendered from.
    pub fn gitconfig_template(&self) -> &Path {
        self.gitconfig.path()
    }

    pub fn init_script(&self) -> &Path {
        self.init_script.path()
    }

    /// `git log --show-signature` output for `target`.
    pub fn signature_log(&self, target: LogTarget) -> Result<String> {
        Ok(inspect::signature_log(&self.sandbox, target, &self.config.git)?)
    }
}

impl Deref for GitRepo {
    type Target = SandboxHandle;

    fn deref(&self) -> &SandboxHandle {
        &self.sandbox
    }
}
