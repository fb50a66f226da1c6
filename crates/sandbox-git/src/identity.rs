//! Signing identity consumed by a sandbox
//!
//! The keypair itself is produced elsewhere (see `sandbox-test-utils`); a
//! sandbox only reads it.

use std::path::PathBuf;

use serde::Serialize;

use crate::{Error, Result};

/// A GnuPG keypair plus the user metadata attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningIdentity {
    /// GnuPG home holding the keyring
    pub gnupg_home: PathBuf,
    /// Passphrase protecting the secret keys
    #[serde(skip_serializing)]
    pub passphrase: String,
    /// Key fingerprints, primary key first, then subkeys
    pub fingerprints: Vec<String>,
    /// User ids in `Name <email>` form
    pub uids: Vec<String>,
}

impl SigningIdentity {
    pub fn new(
        gnupg_home: impl Into<PathBuf>,
        passphrase: impl Into<String>,
        fingerprints: Vec<String>,
        uids: Vec<String>,
    ) -> Self {
        Self {
            gnupg_home: gnupg_home.into(),
            passphrase: passphrase.into(),
            fingerprints,
            uids,
        }
    }

    /// Fingerprint Git should sign with.
    ///
    /// The signing subkey when there is one, the primary key otherwise.
    pub fn signing_key(&self) -> Result<&str> {
        self.fingerprints
            .get(1)
            .or_else(|| self.fingerprints.first())
            .map(String::as_str)
            .ok_or(Error::MissingIdentity { what: "fingerprint" })
    }

    /// The first user id, split into name and email.
    pub fn primary_user(&self) -> Result<UserId> {
        let uid = self
            .uids
            .first()
            .ok_or(Error::MissingIdentity { what: "user id" })?;
        UserId::parse(uid)
    }
}

/// Name and email extracted from a `Name <email>` user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId {
    pub name: String,
    pub email: String,
}

impl UserId {
    /// Split `Name <email>` into its parts.
    ///
    /// The name is trimmed; the closing `>` is stripped from the email.
    pub fn parse(uid: &str) -> Result<Self> {
        let (name, email) = uid.split_once('<').ok_or_else(|| Error::MalformedUid {
            uid: uid.to_string(),
        })?;
        let email = email.trim_end();
        let email = email.strip_suffix('>').unwrap_or(email);

        Ok(Self {
            name: name.trim().to_string(),
            email: email.to_string(),
        })
    }
}
