// ABOUTME: Error types for a deploy run.
// ABOUTME: Separates precondition failures from per-host transport failures.

use crate::reconcile::ReconcileError;
use crate::transport::TransportError;
use crate::types::Host;
use crate::validation::LoadError;
use crate::vcs::VcsError;

/// Errors that end a deploy run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The deployments list could not be read.
    #[error("Failed to get deployments from state ({0}).")]
    Deployments(String),

    /// The state repository has uncommitted changes.
    #[error("Cannot deploy state with local changes. Commit or remove them and re-run.")]
    UncommittedChanges { changes: String },

    /// Local changes could not be inspected.
    #[error("failed to check for local changes: {0}")]
    WorkingTree(#[source] VcsError),

    /// The state does not load.
    #[error("State cannot be loaded: {0}")]
    StateLoad(#[from] LoadError),

    /// The operator declined to deploy a state with validation errors.
    #[error("Deployment aborted: state has validation errors.")]
    ValidationRejected,

    /// The target revision could not be resolved.
    #[error("failed to resolve target revision: {0}")]
    Target(#[source] VcsError),

    /// Host state could not be reconciled.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Push or remote connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The remote apply command exited non-zero.
    #[error("Failed to deploy to '{host}' (exit status: {exit_code}).")]
    ApplyFailed { host: Host, exit_code: u32 },

    /// An operator prompt could not be answered.
    #[error("failed to read operator response: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Raised before any host is contacted.
    Precondition,
    /// Raised while deciding a host's fate.
    Reconcile,
    /// Push or SSH failure.
    Transport,
    /// Remote apply exited non-zero.
    Apply,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Deployments(_)
            | DeployError::UncommittedChanges { .. }
            | DeployError::WorkingTree(_)
            | DeployError::StateLoad(_)
            | DeployError::ValidationRejected
            | DeployError::Target(_) => DeployErrorKind::Precondition,
            DeployError::Reconcile(_) | DeployError::Prompt(_) => DeployErrorKind::Reconcile,
            DeployError::Transport(_) => DeployErrorKind::Transport,
            DeployError::ApplyFailed { .. } => DeployErrorKind::Apply,
        }
    }

    /// Process exit status: the remote exit code for apply failures, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::ApplyFailed { exit_code, .. } => {
                i32::try_from(*exit_code).unwrap_or(1)
            }
            _ => 1,
        }
    }
}
