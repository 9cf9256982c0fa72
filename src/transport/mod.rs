// ABOUTME: Moves a revision onto a host and triggers the host to apply it.
// ABOUTME: Push goes to a branch named after the revision, so repeats are no-ops.

mod error;
mod ssh;

pub use error::{ApplySnafu, ConnectSnafu, PushSnafu, TransportError, TransportErrorKind};
pub use ssh::SshTransport;

use crate::ssh::CommandOutput;
use crate::types::{Host, RevisionId};
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Make `revision` visible in the host's repository under `deploy-<revision>`.
    async fn push(&self, host: &Host, revision: &RevisionId) -> Result<(), TransportError>;

    /// Run the host's apply command for `revision`, waiting for it to finish.
    async fn apply(
        &self,
        host: &Host,
        revision: &RevisionId,
    ) -> Result<CommandOutput, TransportError>;
}
