// ABOUTME: Command handlers for the compstate-deploy CLI.
// ABOUTME: Wires settings, git, probe and transport into a deploy run.

mod deploy;

pub use deploy::deploy;

use compstate_deploy::deploy::DeployError;
use compstate_deploy::error::Error;
use compstate_deploy::output::Output;

/// Print a fatal error the way the operator expects to see it.
pub fn report_error(output: &Output, error: &Error) {
    if let Error::Deploy(e) = error {
        tracing::debug!("deploy stopped by {:?} error", e.kind());
    }
    match error {
        Error::Deploy(e @ DeployError::UncommittedChanges { changes }) => {
            output.failure(&e.to_string());
            output.remote(changes);
        }
        Error::Deploy(e) => output.failure(&e.to_string()),
        other => output.failure(&format!("Error: {other}")),
    }
}
