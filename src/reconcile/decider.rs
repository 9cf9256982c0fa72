// ABOUTME: Per-host decision: probe, classify, and ask the operator only when ambiguous.
// ABOUTME: Unknown revisions get exactly one fetch retry before the operator is asked.

use super::relation::{AncestryRelation, classify};
use super::Decision;
use crate::config::Settings;
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;
use crate::probe::StateProbe;
use crate::prompt::Operator;
use crate::types::{Host, RevisionId};
use crate::vcs::{RevisionGraph, VcsError};
use thiserror::Error;

/// Remote every unknown revision is first looked for in.
const ORIGIN: &str = "origin";

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to query revision history: {0}")]
    History(#[from] VcsError),

    #[error("failed to read operator response: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Outcome of reconciling one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    /// Revision the host reported, if the probe succeeded.
    pub observed: Option<RevisionId>,
    /// Relation of the observed revision to the target.
    pub relation: Option<AncestryRelation>,
}

/// Decides, host by host, whether the target revision may be deployed.
pub struct Decider<'a, G: ?Sized, P: ?Sized> {
    graph: &'a G,
    probe: &'a P,
    settings: &'a Settings,
    output: &'a Output,
}

impl<'a, G, P> Decider<'a, G, P>
where
    G: RevisionGraph + ?Sized,
    P: StateProbe + ?Sized,
{
    pub fn new(graph: &'a G, probe: &'a P, settings: &'a Settings, output: &'a Output) -> Self {
        Self {
            graph,
            probe,
            settings,
            output,
        }
    }

    /// Resolve `host` to a decision. The host is probed once and the operator
    /// is asked at most once.
    pub async fn decide(
        &self,
        host: &Host,
        target: &RevisionId,
        operator: &mut dyn Operator,
        diag: &mut Diagnostics,
    ) -> Result<Verdict, ReconcileError> {
        self.output.detail(&format!(
            "Checking host state for {} (timeout {} seconds).",
            host,
            self.settings.probe_timeout.as_secs_f64()
        ));

        let Some(observed) = self.probe.probe(host).await else {
            diag.warn(Warning::probe_failed(format!(
                "Failed to get state for {host}"
            )));
            let question = format!(
                "Failed to get state for {host}, cannot advise about history. Deploy anyway?"
            );
            let decision = Decision::from_confirmation(operator.confirm(&question, Some(true))?);
            return Ok(Verdict {
                decision,
                observed: None,
                relation: None,
            });
        };

        let relation = self.resolve_relation(host, target, &observed, diag).await?;
        tracing::debug!("{} state {} is {} to target", host, observed, relation);

        let decision = match relation {
            AncestryRelation::Equal => {
                self.output.progress(&format!(
                    "Host {} already has requested revision ({})",
                    host,
                    target.short()
                ));
                Decision::Skip
            }
            AncestryRelation::Ancestor => Decision::Update,
            AncestryRelation::Descendant | AncestryRelation::Sibling | AncestryRelation::Unknown => {
                let question = format!(
                    "Host {} has {} state '{}'. Deploy anyway?",
                    host, relation, observed
                );
                Decision::from_confirmation(operator.confirm(&question, Some(true))?)
            }
        };

        Ok(Verdict {
            decision,
            observed: Some(observed),
            relation: Some(relation),
        })
    }

    /// Classify, fetching once from origin and the host itself if the
    /// revision is not known locally.
    async fn resolve_relation(
        &self,
        host: &Host,
        target: &RevisionId,
        observed: &RevisionId,
        diag: &mut Diagnostics,
    ) -> Result<AncestryRelation, ReconcileError> {
        let relation = classify(self.graph, target, observed).await?;
        if relation != AncestryRelation::Unknown {
            return Ok(relation);
        }

        self.output.detail(&format!(
            "Host {} has unknown state '{}', fetching.",
            host, observed
        ));
        let host_remote = self.settings.repo_url(host);
        for remote in [ORIGIN, host_remote.as_str()] {
            if let Err(e) = self.graph.fetch(remote, true).await {
                diag.warn(Warning::fetch_failed(format!(
                    "Failed to fetch from {remote}: {e}"
                )));
            }
        }

        Ok(classify(self.graph, target, observed).await?)
    }
}
