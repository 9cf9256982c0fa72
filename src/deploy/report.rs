// ABOUTME: Per-host outcomes and the overall result of a deploy run.
// ABOUTME: Outcomes are appended in deployment order and never revisited.

use super::DeployError;
use crate::diagnostics::Diagnostics;
use crate::reconcile::{AncestryRelation, Decision};
use crate::ssh::CommandOutput;
use crate::types::{Host, RevisionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOutcome {
    pub host: Host,
    pub decision: Decision,
    /// Relation found by the host check; None when the check was skipped or
    /// the host could not be probed.
    pub relation: Option<AncestryRelation>,
    /// Exit status of the apply command; None if the host was skipped.
    pub exit_code: Option<u32>,
    pub stdout: String,
    pub stderr: String,
}

impl HostOutcome {
    pub fn skipped(host: Host, relation: Option<AncestryRelation>) -> Self {
        Self {
            host,
            decision: Decision::Skip,
            relation,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn applied(host: Host, relation: Option<AncestryRelation>, output: CommandOutput) -> Self {
        Self {
            host,
            decision: Decision::Update,
            relation,
            exit_code: Some(output.exit_code),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    /// Non-zero apply exit status, if any.
    pub fn failure_code(&self) -> Option<u32> {
        self.exit_code.filter(|code| *code != 0)
    }
}

/// Everything that happened during a run.
#[derive(Debug)]
pub struct RunReport {
    target: RevisionId,
    outcomes: Vec<HostOutcome>,
    failure: Option<DeployError>,
    pub diagnostics: Diagnostics,
}

impl RunReport {
    pub fn new(target: RevisionId) -> Self {
        Self {
            target,
            outcomes: Vec::new(),
            failure: None,
            diagnostics: Diagnostics::default(),
        }
    }

    pub(crate) fn record(&mut self, outcome: HostOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn fail(&mut self, error: DeployError) {
        self.failure = Some(error);
    }

    pub fn target(&self) -> &RevisionId {
        &self.target
    }

    pub fn outcomes(&self) -> &[HostOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, host: &str) -> Option<&HostOutcome> {
        self.outcomes.iter().find(|o| o.host.as_str() == host)
    }

    pub fn failure(&self) -> Option<&DeployError> {
        self.failure.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// 0 on success, otherwise the exit status of the terminating error.
    pub fn exit_code(&self) -> i32 {
        self.failure.as_ref().map_or(0, DeployError::exit_code)
    }

    pub fn into_result(self) -> Result<Vec<HostOutcome>, DeployError> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(self.outcomes),
        }
    }
}
