// ABOUTME: Deploy run orchestration: preflight, plan, and per-host execution.
// ABOUTME: Decides termination from explicit errors instead of exiting in helpers.

mod error;
mod orchestrator;
mod plan;
mod preflight;
mod report;

pub use error::{DeployError, DeployErrorKind};
pub use orchestrator::{Orchestrator, RunOptions};
pub use plan::{DeployPlan, TARGET_REFERENCE};
pub use preflight::{require_no_changes, require_valid};
pub use report::{HostOutcome, RunReport};
