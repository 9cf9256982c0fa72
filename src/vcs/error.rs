// ABOUTME: Errors raised by the revision history adapter.
// ABOUTME: Distinguishes a missing git binary from a git command that failed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`git {command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("git returned an invalid revision for '{reference}': {reason}")]
    InvalidRevision { reference: String, reason: String },
}

impl VcsError {
    pub(crate) fn command_failed(args: &[&str], stderr: &[u8]) -> Self {
        let stderr = String::from_utf8_lossy(stderr).trim().to_string();
        VcsError::CommandFailed {
            command: args.join(" "),
            stderr: if stderr.is_empty() {
                "unknown error".to_string()
            } else {
                stderr
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, VcsError>;
