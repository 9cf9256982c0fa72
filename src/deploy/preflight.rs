// ABOUTME: Checks run before any host is contacted.
// ABOUTME: Refuses uncommitted state and asks before deploying an invalid one.

use super::DeployError;
use crate::output::Output;
use crate::prompt::Operator;
use crate::validation::StateValidator;
use crate::vcs::WorkingTree;
use std::path::Path;

/// Refuse to deploy a state with uncommitted local changes.
pub async fn require_no_changes<W: WorkingTree + ?Sized>(tree: &W) -> Result<(), DeployError> {
    if tree.has_changes().await.map_err(DeployError::WorkingTree)? {
        let changes = tree
            .describe_changes()
            .await
            .map_err(DeployError::WorkingTree)?;
        return Err(DeployError::UncommittedChanges { changes });
    }
    Ok(())
}

/// Require the state to load; on validation issues, let the operator decide.
pub fn require_valid<V: StateValidator + ?Sized>(
    validator: &V,
    repo_root: &Path,
    operator: &mut dyn Operator,
    output: &Output,
) -> Result<(), DeployError> {
    let report = validator.validate(repo_root)?;
    if report.is_clean() {
        return Ok(());
    }

    for issue in report.issues() {
        output.failure(&format!("{}: {}", issue.location, issue.message));
    }
    tracing::warn!("state has {} validation error(s)", report.error_count());

    if operator.confirm(
        "Warning: State has validation errors (see above). Continue?",
        Some(false),
    )? {
        Ok(())
    } else {
        Err(DeployError::ValidationRejected)
    }
}
