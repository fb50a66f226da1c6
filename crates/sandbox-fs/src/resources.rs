//! Support file lookup
//!
//! A consumer may drop its own `gitconfig` or `git-init.sh` into the
//! override directory (`<project>/tests` by default). Presence alone wins;
//! otherwise the copy bundled with this crate is written to a scoped
//! temporary directory that lives exactly as long as the returned
//! [`LocatedResource`].

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{Error, FixtureConfig, OVERRIDE_DIR, Result, io};

/// Support files bundled with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Templated per-user Git configuration
    GitConfig,
    /// Shell script that builds the repository topology
    GitInitScript,
}

impl Resource {
    pub const ALL: [Resource; 2] = [Resource::GitConfig, Resource::GitInitScript];

    /// Logical name, also the file name used for overrides.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GitConfig => "gitconfig",
            Self::GitInitScript => "git-init.sh",
        }
    }

    /// Look up a bundled resource by its logical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// The default contents compiled into the crate.
    pub fn bundled(&self) -> &'static str {
        match self {
            Self::GitConfig => include_str!("../resources/gitconfig"),
            Self::GitInitScript => include_str!("../resources/git-init.sh"),
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved support file.
///
/// Overrides are borrowed from the consumer and never deleted. Materialized
/// defaults own their temporary directory, which is removed on drop.
#[derive(Debug)]
pub enum LocatedResource {
    Override(PathBuf),
    Materialized { path: PathBuf, dir: TempDir },
}

impl LocatedResource {
    pub fn path(&self) -> &Path {
        match self {
            Self::Override(path) => path,
            Self::Materialized { path, .. } => path,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override(_))
    }
}

impl AsRef<Path> for LocatedResource {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

/// Resolves support files against an override directory.
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    override_dir: PathBuf,
}

impl ResourceLocator {
    pub fn new(override_dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: override_dir.into(),
        }
    }

    /// Locator using the conventional `<root>/tests` override directory.
    pub fn for_project(root: &Path) -> Self {
        Self::new(root.join(OVERRIDE_DIR))
    }

    /// Locator honouring `resource_dir` from the fixture configuration.
    ///
    /// Relative directories are resolved against `root`.
    pub fn from_config(config: &FixtureConfig, root: &Path) -> Self {
        match &config.resource_dir {
            Some(dir) if dir.is_absolute() => Self::new(dir),
            Some(dir) => Self::new(root.join(dir)),
            None => Self::for_project(root),
        }
    }

    pub fn override_dir(&self) -> &Path {
        &self.override_dir
    }

    /// Return the user-defined file for `name`, if one exists.
    pub fn find_override(&self, name: &str) -> Option<PathBuf> {
        let candidate = self.override_dir.join(name);
        candidate.exists().then_some(candidate)
    }

    /// Resolve a bundled resource, preferring a user override.
    pub fn locate(&self, resource: Resource) -> Result<LocatedResource> {
        if let Some(path) = self.find_override(resource.name()) {
            tracing::debug!(resource = %resource, path = %path.display(), "using override");
            return Ok(LocatedResource::Override(path));
        }
        materialize(resource)
    }

    /// Resolve a resource by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceMissing`] when there is no override and no
    /// bundled default of that name.
    pub fn locate_named(&self, name: &str) -> Result<LocatedResource> {
        if let Some(path) = self.find_override(name) {
            tracing::debug!(resource = %name, path = %path.display(), "using override");
            return Ok(LocatedResource::Override(path));
        }
        let resource = Resource::from_name(name).ok_or_else(|| Error::ResourceMissing {
            name: name.to_string(),
        })?;
        materialize(resource)
    }
}

/// Write the bundled copy of `resource` into a fresh temporary directory.
fn materialize(resource: Resource) -> Result<LocatedResource> {
    let dir = tempfile::Builder::new()
        .prefix("sandbox-resource-")
        .tempdir()
        .map_err(|e| Error::io(std::env::temp_dir(), e))?;
    let path = dir.path().join(resource.name());
    io::write_text(&path, resource.bundled())?;

    tracing::debug!(resource = %resource, path = %path.display(), "materialized bundled resource");
    Ok(LocatedResource::Materialized { path, dir })
}

/// Root of the project whose tests are running.
///
/// Cargo exports `CARGO_MANIFEST_DIR` to test binaries; outside cargo the
/// current directory is used.
pub fn project_root() -> PathBuf {
    let root = std::env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    dunce::canonicalize(&root).unwrap_or(root)
}
