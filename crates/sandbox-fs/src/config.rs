//! Fixture configuration loading

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, OVERRIDE_DIR, Result, io};

/// File looked up in the override directory by [`FixtureConfig::discover`].
pub const CONFIG_FILENAME: &str = "git-sandbox.toml";

/// Knobs for how sandboxes are provisioned.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Interpreter used to run the initialization script.
    pub shell: PathBuf,
    /// Git executable used by inspection helpers.
    pub git: PathBuf,
    /// Directory searched for resource overrides; `tests` when unset.
    pub resource_dir: Option<PathBuf>,
    /// Name prefix of sandbox temporary directories.
    pub sandbox_prefix: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from("/bin/sh"),
            git: PathBuf::from("git"),
            resource_dir: None,
            sandbox_prefix: "git-sandbox-".to_string(),
        }
    }
}

impl FixtureConfig {
    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_text(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    /// Load `<root>/tests/git-sandbox.toml` if present, defaults otherwise.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(OVERRIDE_DIR).join(CONFIG_FILENAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading fixture configuration");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
