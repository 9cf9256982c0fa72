// ABOUTME: Deploy command implementation.
// ABOUTME: Runs preflight checks, resolves the plan, and deploys host by host.

use crate::cli::Cli;
use compstate_deploy::config::{Deployments, Settings};
use compstate_deploy::deploy::{
    DeployError, DeployPlan, Orchestrator, RunOptions, require_no_changes, require_valid,
};
use compstate_deploy::error::Result;
use compstate_deploy::output::Output;
use compstate_deploy::probe::HttpStateProbe;
use compstate_deploy::prompt::TerminalOperator;
use compstate_deploy::transport::SshTransport;
use compstate_deploy::validation::YamlStateValidator;
use compstate_deploy::vcs::GitRepository;

/// Deploy the state repository's HEAD to every host in its deployments list.
pub async fn deploy(cli: &Cli, output: &Output) -> Result<()> {
    let settings = Settings::load_or_default(cli.config.as_deref())?;
    let repo = GitRepository::new(&cli.compstate);

    let hosts = Deployments::load(&cli.compstate)
        .map_err(|e| DeployError::Deployments(e.to_string()))?
        .into_hosts();

    let mut operator = TerminalOperator::new();

    require_no_changes(&repo).await?;
    require_valid(&YamlStateValidator, &cli.compstate, &mut operator, output)?;

    let plan = DeployPlan::resolve(&repo, hosts).await?;
    output.detail(&format!(
        "Deploying {} to {} host(s)",
        plan.target(),
        plan.hosts().len()
    ));

    let probe = HttpStateProbe::from_settings(&settings);
    let transport = SshTransport::new(&repo, &settings);
    let options = RunOptions {
        skip_host_check: cli.skip_host_check,
    };
    let orchestrator = Orchestrator::new(&repo, &probe, &transport, &settings, output, options);

    let report = orchestrator.run(&plan, &mut operator).await;

    // Emit collected warnings
    for warning in report.diagnostics.warnings() {
        output.warning(&warning.message);
    }

    report.into_result()?;
    output.success("Done");
    Ok(())
}
