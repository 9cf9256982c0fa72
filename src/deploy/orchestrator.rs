// ABOUTME: Runs a deploy plan host by host with fail-fast semantics.
// ABOUTME: Hosts after a failing one are never contacted.

use super::report::{HostOutcome, RunReport};
use super::{DeployError, DeployPlan};
use crate::config::Settings;
use crate::diagnostics::Diagnostics;
use crate::output::Output;
use crate::probe::StateProbe;
use crate::prompt::Operator;
use crate::reconcile::{Decider, Decision};
use crate::transport::Transport;
use crate::types::{Host, RevisionId};
use crate::vcs::RevisionGraph;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Deploy to every host without probing its current state.
    pub skip_host_check: bool,
}

pub struct Orchestrator<'a, G: ?Sized, P: ?Sized, T: ?Sized> {
    decider: Decider<'a, G, P>,
    transport: &'a T,
    output: &'a Output,
    options: RunOptions,
}

impl<'a, G, P, T> Orchestrator<'a, G, P, T>
where
    G: RevisionGraph + ?Sized,
    P: StateProbe + ?Sized,
    T: Transport + ?Sized,
{
    pub fn new(
        graph: &'a G,
        probe: &'a P,
        transport: &'a T,
        settings: &'a Settings,
        output: &'a Output,
        options: RunOptions,
    ) -> Self {
        Self {
            decider: Decider::new(graph, probe, settings, output),
            transport,
            output,
            options,
        }
    }

    /// Deploy the plan's target to each host in order, stopping at the first
    /// fatal error or non-zero apply.
    pub async fn run(&self, plan: &DeployPlan, operator: &mut dyn Operator) -> RunReport {
        let mut report = RunReport::new(plan.target().clone());

        for host in plan.hosts() {
            let outcome = match self
                .deploy_host(host, plan.target(), operator, &mut report.diagnostics)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("deploy to {} failed: {}", host, e);
                    report.fail(e);
                    break;
                }
            };

            let failure = outcome.failure_code();
            report.record(outcome);

            if let Some(exit_code) = failure {
                tracing::error!("apply on {} exited with {}", host, exit_code);
                report.fail(DeployError::ApplyFailed {
                    host: host.clone(),
                    exit_code,
                });
                break;
            }
        }

        report
    }

    async fn deploy_host(
        &self,
        host: &Host,
        target: &RevisionId,
        operator: &mut dyn Operator,
        diag: &mut Diagnostics,
    ) -> Result<HostOutcome, DeployError> {
        let relation = if self.options.skip_host_check {
            None
        } else {
            let verdict = self.decider.decide(host, target, operator, diag).await?;
            tracing::info!("{}: {}", host, verdict.decision);
            if verdict.decision == Decision::Skip {
                self.output.heading(&format!("Skipping {host}."));
                return Ok(HostOutcome::skipped(host.clone(), verdict.relation));
            }
            verdict.relation
        };

        self.output.heading(&format!("Deploying to {host}:"));
        self.transport.push(host, target).await?;
        let result = self.transport.apply(host, target).await?;

        if self.output.is_verbose() || !result.success() {
            self.output.remote(&result.stdout);
        }
        self.output.remote(&result.stderr);

        Ok(HostOutcome::applied(host.clone(), relation, result))
    }
}
