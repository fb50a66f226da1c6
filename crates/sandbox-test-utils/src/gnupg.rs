//! Throwaway GnuPG signing identities.
//!
//! Each keypair lives in its own GnuPG home under the system temp dir and is
//! protected by a random passphrase. Generation shells out to `gpg` in batch
//! mode, so `gpg` (2.1 or newer) must be on `PATH`.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use sandbox_git::SigningIdentity;
use tempfile::TempDir;

use crate::{FixtureError, Result};

pub const DEFAULT_NAME: &str = "Sandbox Tester";
pub const DEFAULT_EMAIL: &str = "sandbox-tester@example.com";

/// A generated keypair: certify-only primary key plus a signing subkey.
#[derive(Debug)]
pub struct GnuPgKeypair {
    home: TempDir,
    identity: SigningIdentity,
}

impl GnuPgKeypair {
    /// Generate a keypair for [`DEFAULT_NAME`] <[`DEFAULT_EMAIL`]>.
    pub fn generate() -> Result<Self> {
        Self::generate_with(DEFAULT_NAME, DEFAULT_EMAIL)
    }

    pub fn generate_with(name: &str, email: &str) -> Result<Self> {
        let home = tempfile::Builder::new()
            .prefix("gnupg-")
            .tempdir()
            .map_err(|e| FixtureError::io(std::env::temp_dir(), e))?;
        let passphrase = uuid::Uuid::new_v4().simple().to_string();

        let agent_conf = home.path().join("gpg-agent.conf");
        fs::write(&agent_conf, "allow-loopback-pinentry\n")
            .map_err(|e| FixtureError::io(&agent_conf, e))?;

        let params_path = home.path().join("key-params");
        fs::write(&params_path, key_params(name, email, &passphrase))
            .map_err(|e| FixtureError::io(&params_path, e))?;

        let params_arg = params_path.to_string_lossy().into_owned();
        gpg(
            home.path(),
            &[
                "--batch",
                "--pinentry-mode",
                "loopback",
                "--generate-key",
                params_arg.as_str(),
            ],
        )?;
        // The parameter file holds the passphrase in clear text
        let _ = fs::remove_file(&params_path);

        let listing = gpg(
            home.path(),
            &[
                "--batch",
                "--with-colons",
                "--with-subkey-fingerprint",
                "--list-secret-keys",
            ],
        )?;
        let (fingerprints, uids) = parse_colons(&String::from_utf8_lossy(&listing.stdout));
        if fingerprints.is_empty() {
            return Err(FixtureError::IncompleteKey { what: "fingerprint" });
        }
        if uids.is_empty() {
            return Err(FixtureError::IncompleteKey { what: "user id" });
        }

        let identity = SigningIdentity::new(home.path(), passphrase, fingerprints, uids);
        tracing::debug!(
            gnupg_home = %home.path().display(),
            fingerprints = ?identity.fingerprints,
            "generated gnupg keypair"
        );

        Ok(Self { home, identity })
    }

    pub fn identity(&self) -> &SigningIdentity {
        &self.identity
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }
}

impl Drop for GnuPgKeypair {
    fn drop(&mut self) {
        // Stop the agent before its socket directory disappears
        let _ = Command::new("gpgconf")
            .args(["--kill", "gpg-agent"])
            .env("GNUPGHOME", self.home.path())
            .output();
    }
}

fn key_params(name: &str, email: &str, passphrase: &str) -> String {
    format!(
        "Key-Type: EDDSA\n\
         Key-Curve: ed25519\n\
         Key-Usage: cert\n\
         Subkey-Type: EDDSA\n\
         Subkey-Curve: ed25519\n\
         Subkey-Usage: sign\n\
         Name-Real: {name}\n\
         Name-Email: {email}\n\
         Expire-Date: 0\n\
         Passphrase: {passphrase}\n\
         %commit\n"
    )
}

fn gpg(home: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new("gpg")
        .args(args)
        .env("GNUPGHOME", home)
        .output()
        .map_err(|e| FixtureError::io("gpg", e))?;

    if !output.status.success() {
        return Err(FixtureError::Gpg {
            args: args.join(" "),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(output)
}

/// Fingerprints and user ids from `gpg --with-colons` output, in listing order.
fn parse_colons(listing: &str) -> (Vec<String>, Vec<String>) {
    let mut fingerprints = Vec::new();
    let mut uids = Vec::new();

    for line in listing.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        let Some(value) = fields.get(9).filter(|v| !v.is_empty()) else {
            continue;
        };
        match fields[0] {
            "fpr" => fingerprints.push(value.to_string()),
            "uid" => uids.push(value.replace("\\x3a", ":")),
            _ => {}
        }
    }

    (fingerprints, uids)
}

fn tool_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Whether `gpg` can be run from `PATH`.
pub fn gpg_available() -> bool {
    tool_available("gpg")
}

/// Whether `git` can be run from `PATH`.
pub fn git_available() -> bool {
    tool_available("git")
}
