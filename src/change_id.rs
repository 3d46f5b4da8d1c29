//! Change identifier trailers
//!
//! A change identifier (`<namespace>/<4 hex digits>`) is stored in the commit
//! message as a trailer line `<prefix> <id>`. It is the only state git-publish
//! persists between runs: the branch name and the review request are both
//! derived from it.
//!
//! The whole message is scanned and the first non-empty trailer wins.
//! Later lines with the same prefix are ignored on read and removed on strip.

use crate::config::Config;
use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads, writes and generates change identifier trailers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeIdCodec {
    prefix: String,
    namespace: String,
}

impl ChangeIdCodec {
    /// Create a codec for the given trailer prefix and identifier namespace
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
        }
    }

    /// Create a codec from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.change_id_prefix, &config.branch_namespace)
    }

    /// Trailer prefix, e.g. `Change-Id:`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Extract the identifier from a message, if any
    ///
    /// Trailer lines with nothing after the prefix are skipped.
    pub fn extract(&self, message: &str) -> Option<String> {
        message.lines().find_map(|line| {
            let id = line.strip_prefix(self.prefix.as_str())?.trim();
            (!id.is_empty()).then(|| id.to_string())
        })
    }

    /// Remove every trailer line and trailing whitespace
    pub fn strip(&self, message: &str) -> String {
        message
            .split('\n')
            .filter(|line| !line.starts_with(self.prefix.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end()
            .to_string()
    }

    /// Append a trailer as the last line, preceded by one blank line
    pub fn append(&self, message: &str, change_id: &str) -> String {
        format!("{}\n\n{} {change_id}\n", message.trim_end(), self.prefix)
    }

    /// Generate a fresh identifier
    ///
    /// Only 16 bits are random, so two identifiers in the same namespace can
    /// collide. Nothing here detects that.
    pub fn generate(&self) -> String {
        format!("{}/{:04x}", self.namespace, rand::random::<u16>())
    }

    /// Return the message's identifier, appending a new one if it has none
    ///
    /// Empty trailer lines are dropped before appending. The returned flag is
    /// `true` when the message was changed.
    pub fn ensure(&self, message: &str) -> (String, String, bool) {
        if let Some(id) = self.extract(message) {
            return (message.to_string(), id, false);
        }
        let id = self.generate();
        let cleaned = message
            .split('\n')
            .filter(|line| {
                line.strip_prefix(self.prefix.as_str())
                    .is_none_or(|rest| !rest.trim().is_empty())
            })
            .collect::<Vec<_>>()
            .join("\n");
        (self.append(&cleaned, &id), id, true)
    }
}

/// Make sure a commit message file carries an identifier trailer
///
/// Used by the `commit-msg` hook. Returns the identifier that was appended,
/// or `None` if the file already had one.
pub fn ensure_message_file(path: &Path, codec: &ChangeIdCodec) -> Result<Option<String>> {
    let message = fs::read_to_string(path)?;
    let (updated, change_id, changed) = codec.ensure(&message);
    if !changed {
        debug!("{} already carries {change_id}", path.display());
        return Ok(None);
    }
    fs::write(path, updated)?;
    debug!("Appended {change_id} to {}", path.display());
    Ok(Some(change_id))
}
