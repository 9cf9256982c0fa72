// ABOUTME: Content-derived revision identifiers (git object hashes).
// ABOUTME: Accepts SHA-1 and SHA-256 hex digests, normalised to lowercase.

use serde::{Deserialize, Deserializer};
use std::fmt;
use thiserror::Error;

const SHA1_HEX_LEN: usize = 40;
const SHA256_HEX_LEN: usize = 64;
const SHORT_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevisionIdError {
    #[error("revision id cannot be empty")]
    Empty,

    #[error("revision id must be 40 or 64 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("invalid character in revision id: '{0}'")]
    InvalidChar(char),
}

/// Immutable identifier of a full state snapshot.
///
/// Two equal ids always name identical content, so equality is the only
/// comparison the reconciler needs before consulting history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn parse(value: &str) -> Result<Self, RevisionIdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RevisionIdError::Empty);
        }

        if let Some(c) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(RevisionIdError::InvalidChar(c));
        }

        if value.len() != SHA1_HEX_LEN && value.len() != SHA256_HEX_LEN {
            return Err(RevisionIdError::InvalidLength(value.len()));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for operator-facing messages.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_LEN]
    }

    /// Branch the revision is pushed to on each host.
    ///
    /// Derived purely from the id, so pushing the same revision twice targets
    /// the same ref and the second push has nothing to do.
    pub fn deploy_branch(&self) -> String {
        format!("deploy-{}", self.0)
    }

    /// Refspec pushing this revision to its deploy branch.
    pub fn deploy_refspec(&self) -> String {
        format!("{}:refs/heads/{}", self.0, self.deploy_branch())
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RevisionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}
