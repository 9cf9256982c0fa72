// ABOUTME: Revision history adapter used by the reconciler and transport.
// ABOUTME: Exposes ancestry queries, fetch, push and rev-parse behind a trait.

mod error;
mod git;

pub use error::{Result, VcsError};
pub use git::GitRepository;

use crate::types::RevisionId;
use async_trait::async_trait;

/// Read-mostly view of the state repository's history.
///
/// Implementations only ever grow history (fetch) or create side branches on
/// remotes (push); the working tree is never touched.
#[async_trait]
pub trait RevisionGraph: Send + Sync {
    /// Whether `candidate` is reachable walking back from `target`.
    ///
    /// A candidate that is not present locally is not an ancestor.
    async fn has_ancestor(&self, target: &RevisionId, candidate: &RevisionId) -> Result<bool>;

    /// Whether `target` is reachable walking back from `candidate`.
    async fn has_descendant(&self, target: &RevisionId, candidate: &RevisionId)
    -> Result<bool>;

    /// Whether the revision exists anywhere in local history.
    async fn has_commit(&self, revision: &RevisionId) -> Result<bool>;

    /// Pull history from a named remote or URL.
    async fn fetch(&self, remote: &str, quiet: bool) -> Result<()>;

    /// Push a refspec to a remote URL.
    async fn push(&self, url: &str, refspec: &str) -> Result<()>;

    /// Resolve a symbolic reference to a concrete revision.
    async fn rev_parse(&self, reference: &str) -> Result<RevisionId>;
}

/// Local modifications in the state repository checkout.
#[async_trait]
pub trait WorkingTree: Send + Sync {
    async fn has_changes(&self) -> Result<bool>;

    /// Short human-readable listing of the local changes.
    async fn describe_changes(&self) -> Result<String>;
}
