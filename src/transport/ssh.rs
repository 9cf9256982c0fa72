// ABOUTME: Transport over git push plus an SSH-executed apply command.
// ABOUTME: Each apply opens its own session and closes it once the command exits.

use super::error::{ApplySnafu, ConnectSnafu, PushSnafu, TransportError};
use super::Transport;
use crate::config::Settings;
use crate::ssh::{CommandOutput, Session};
use crate::types::{Host, RevisionId};
use crate::vcs::RevisionGraph;
use async_trait::async_trait;
use snafu::ResultExt;

pub struct SshTransport<'a, G: ?Sized> {
    graph: &'a G,
    settings: &'a Settings,
}

impl<'a, G: RevisionGraph + ?Sized> SshTransport<'a, G> {
    pub fn new(graph: &'a G, settings: &'a Settings) -> Self {
        Self { graph, settings }
    }
}

#[async_trait]
impl<G: RevisionGraph + ?Sized> Transport for SshTransport<'_, G> {
    async fn push(&self, host: &Host, revision: &RevisionId) -> Result<(), TransportError> {
        let url = self.settings.repo_url(host);
        let refspec = revision.deploy_refspec();
        tracing::info!("Pushing {} to {}", refspec, url);

        self.graph
            .push(&url, &refspec)
            .await
            .context(PushSnafu { host: host.clone() })
    }

    async fn apply(
        &self,
        host: &Host,
        revision: &RevisionId,
    ) -> Result<CommandOutput, TransportError> {
        let config = self
            .settings
            .ssh
            .session_config(host, &self.settings.deploy_user);
        let session = Session::connect(config)
            .await
            .context(ConnectSnafu { host: host.clone() })?;

        let command = self.settings.apply_command_line(revision);
        tracing::info!("Running `{}` on {}", command, host);
        let output = session
            .exec(&command)
            .await
            .context(ApplySnafu { host: host.clone() });

        if let Err(e) = session.disconnect().await {
            tracing::warn!("SSH disconnect failed for {}: {}", host, e);
        }

        output
    }
}
