//! Placeholder substitution for the per-user Git configuration
//!
//! Templates use `$NAME` or `${NAME}` placeholders and `$$` for a literal
//! dollar sign. Substitution is strict: a placeholder without a value or a
//! stray `$` is an error, never passed through.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sandbox_fs::{GITCONFIG_FILENAME, io};

use crate::{Error, Result, SigningIdentity};

pub const USER_EMAIL: &str = "GIT_USER_EMAIL";
pub const USER_NAME: &str = "GIT_USER_NAME";
pub const USER_SIGNINGKEY: &str = "GIT_USER_SIGNINGKEY";

/// Must not survive rendering of a Git configuration.
pub const SENTINEL: &str = "$GIT";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$(?:(?P<escaped>\$)|(?P<named>[_a-zA-Z][_a-zA-Z0-9]*)|\{(?P<braced>[_a-zA-Z][_a-zA-Z0-9]*)\}|(?P<invalid>))",
    )
    .unwrap()
});

/// A text template with `$`-placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.text) {
            if let Some(name) = caps.name("named").or_else(|| caps.name("braced"))
                && !names.contains(&name.as_str())
            {
                names.push(name.as_str());
            }
        }
        names
    }

    /// Replace every placeholder with its value from `vars`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnresolvedPlaceholder`] if a placeholder has no value
    /// - [`Error::MalformedTemplate`] if a `$` starts no valid placeholder
    pub fn substitute<K, V>(&self, vars: &BTreeMap<K, V>) -> Result<String>
    where
        K: Borrow<str> + Ord,
        V: AsRef<str>,
    {
        let mut rendered = String::with_capacity(self.text.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(&self.text) {
            let Some(whole) = caps.get(0) else { continue };
            rendered.push_str(&self.text[last..whole.start()]);
            last = whole.end();

            if caps.name("escaped").is_some() {
                rendered.push('$');
            } else if let Some(name) = caps.name("named").or_else(|| caps.name("braced")) {
                let value = vars
                    .get(name.as_str())
                    .ok_or_else(|| Error::UnresolvedPlaceholder {
                        name: name.as_str().to_string(),
                    })?;
                rendered.push_str(value.as_ref());
            } else {
                let (line, column) = position(&self.text, whole.start());
                return Err(Error::MalformedTemplate { line, column });
            }
        }

        rendered.push_str(&self.text[last..]);
        Ok(rendered)
    }
}

/// 1-based line and column of a byte offset.
fn position(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}

/// Values for the identity placeholders of a Git configuration template.
pub fn gitconfig_variables(identity: &SigningIdentity) -> Result<BTreeMap<&'static str, String>> {
    let user = identity.primary_user()?;
    Ok(BTreeMap::from([
        (USER_EMAIL, user.email),
        (USER_NAME, user.name),
        (USER_SIGNINGKEY, identity.signing_key()?.to_string()),
    ]))
}

/// Fail if any `$GIT` placeholder syntax is left in rendered text.
pub fn ensure_resolved(rendered: &str) -> Result<()> {
    let found = rendered
        .find(SENTINEL)
        .map(|idx| idx + 1)
        .or_else(|| rendered.find("${GIT").map(|idx| idx + 2));

    match found {
        Some(start) => {
            let name: String = rendered[start..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            Err(Error::UnresolvedPlaceholder { name })
        }
        None => Ok(()),
    }
}

/// Render a Git configuration template for `identity`.
pub fn render_gitconfig(template_text: &str, identity: &SigningIdentity) -> Result<String> {
    let rendered = Template::new(template_text).substitute(&gitconfig_variables(identity)?)?;
    ensure_resolved(&rendered)?;
    Ok(rendered)
}

/// Render the template at `template_path` into `<home>/.gitconfig`.
///
/// Git finds this file strictly by name relative to `HOME`.
pub fn write_gitconfig(
    home: &Path,
    template_path: &Path,
    identity: &SigningIdentity,
) -> Result<PathBuf> {
    let template_text = io::read_text(template_path)?;
    let rendered = render_gitconfig(&template_text, identity)?;

    let path = home.join(GITCONFIG_FILENAME);
    io::write_text(&path, &rendered)?;
    Ok(path)
}
