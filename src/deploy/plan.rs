// ABOUTME: The immutable plan for one deploy run.
// ABOUTME: Target revision plus hosts in deployment order.

use super::DeployError;
use crate::types::{Host, RevisionId};
use crate::vcs::RevisionGraph;

/// Reference resolved to the revision being deployed.
pub const TARGET_REFERENCE: &str = "HEAD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    target: RevisionId,
    hosts: Vec<Host>,
}

impl DeployPlan {
    pub fn new(target: RevisionId, hosts: Vec<Host>) -> Self {
        Self { target, hosts }
    }

    /// Build a plan targeting the repository's current `HEAD`.
    pub async fn resolve<G: RevisionGraph + ?Sized>(
        graph: &G,
        hosts: Vec<Host>,
    ) -> Result<Self, DeployError> {
        let target = graph
            .rev_parse(TARGET_REFERENCE)
            .await
            .map_err(DeployError::Target)?;
        Ok(Self::new(target, hosts))
    }

    pub fn target(&self) -> &RevisionId {
        &self.target
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }
}
