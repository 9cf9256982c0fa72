// ABOUTME: Transport error types with SNAFU pattern.
// ABOUTME: Each variant names the host and the step that failed.

use snafu::Snafu;

use crate::ssh;
use crate::types::Host;
use crate::vcs::VcsError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    #[snafu(display("Failed to push to {host}: {source}"))]
    Push { host: Host, source: VcsError },

    #[snafu(display("Failed to connect to {host}: {source}"))]
    Connect { host: Host, source: ssh::Error },

    #[snafu(display("Failed to run apply command on {host}: {source}"))]
    Apply { host: Host, source: ssh::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Push,
    Connect,
    Apply,
}

impl TransportError {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::Push { .. } => TransportErrorKind::Push,
            TransportError::Connect { .. } => TransportErrorKind::Connect,
            TransportError::Apply { .. } => TransportErrorKind::Apply,
        }
    }

    pub fn host(&self) -> &Host {
        match self {
            TransportError::Push { host, .. }
            | TransportError::Connect { host, .. }
            | TransportError::Apply { host, .. } => host,
        }
    }
}
