// ABOUTME: Minimal russh client: authenticate, run one command, disconnect.
// ABOUTME: Host keys are checked against known_hosts, optionally trusting first use.

use super::error::{Error, Result};
use russh::client::{self, Handle};
use russh::keys::agent::client::AgentClient;
use russh::keys::known_hosts::{
    check_known_hosts, check_known_hosts_path, learn_known_hosts, learn_known_hosts_path,
};
use russh::keys::{PrivateKeyWithHashAlg, load_secret_key, ssh_key};
use russh::{ChannelMsg, Disconnect};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixStream;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Tried in order under `~/.ssh` when no key is configured and no agent runs.
const DEFAULT_KEY_FILES: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

/// Extended data stream carrying stderr.
const STDERR_STREAM: u32 = 1;

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Private key; the agent and then the default keys are used when unset.
    pub key_path: Option<PathBuf>,
    /// Accept and record host keys that known_hosts does not list yet.
    pub trust_on_first_use: bool,
    /// Defaults to `~/.ssh/known_hosts`.
    pub known_hosts_path: Option<PathBuf>,
}

/// Exit status and captured streams of a remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: u32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Verifies host keys. A changed key is always rejected.
pub(crate) struct SshHandler {
    host: String,
    port: u16,
    trust_on_first_use: bool,
    known_hosts_path: Option<PathBuf>,
}

impl SshHandler {
    fn new(config: &SessionConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            trust_on_first_use: config.trust_on_first_use,
            known_hosts_path: config.known_hosts_path.clone(),
        }
    }

    fn learn(&self, key: &ssh_key::PublicKey) {
        let learned = match &self.known_hosts_path {
            Some(path) => learn_known_hosts_path(&self.host, self.port, key, path),
            None => learn_known_hosts(&self.host, self.port, key),
        };
        if let Err(e) = learned {
            tracing::warn!("Failed to save host key to known_hosts: {}", e);
        }
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        let known = match &self.known_hosts_path {
            Some(path) => check_known_hosts_path(&self.host, self.port, server_public_key, path),
            None => check_known_hosts(&self.host, self.port, server_public_key),
        };

        match known {
            Ok(true) => Ok(true),
            Err(russh::keys::Error::KeyChanged { .. }) => {
                tracing::error!(
                    "Host key for {}:{} does not match known_hosts",
                    self.host,
                    self.port
                );
                Ok(false)
            }
            // Not listed, or known_hosts unreadable
            Ok(false) | Err(_) if self.trust_on_first_use => {
                tracing::warn!(
                    "Trust-On-First-Use: accepting unknown host key for {}:{}",
                    self.host,
                    self.port
                );
                self.learn(server_public_key);
                Ok(true)
            }
            Ok(false) | Err(_) => Ok(false),
        }
    }
}

enum Credentials {
    Agent(AgentClient<UnixStream>),
    Key(Arc<ssh_key::PrivateKey>),
}

impl Credentials {
    /// Configured key, then the agent, then the first default key that loads.
    async fn resolve(config: &SessionConfig) -> Result<Self> {
        if let Some(path) = &config.key_path {
            return load_key(path).map(Self::Key);
        }

        if let Ok(agent) = AgentClient::connect_env().await {
            return Ok(Self::Agent(agent));
        }

        let ssh_dir = std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".ssh"))
            .ok_or_else(|| {
                Error::AgentUnavailable("no SSH agent running and HOME is not set".to_string())
            })?;

        DEFAULT_KEY_FILES
            .iter()
            .find_map(|name| load_key(&ssh_dir.join(name)).ok())
            .map(Self::Key)
            .ok_or_else(|| {
                Error::AgentUnavailable("no SSH agent running and no default key found".to_string())
            })
    }

    async fn authenticate(self, handle: &mut Handle<SshHandler>, user: &str) -> Result<bool> {
        match self {
            Self::Key(key) => {
                let hash_alg = handle.best_supported_rsa_hash().await?.flatten();
                let result = handle
                    .authenticate_publickey(user, PrivateKeyWithHashAlg::new(key, hash_alg))
                    .await?;
                Ok(result.success())
            }
            Self::Agent(mut agent) => {
                let identities = agent.request_identities().await.map_err(|e| {
                    Error::AgentUnavailable(format!("failed to list agent keys: {e}"))
                })?;

                for identity in identities {
                    let result = handle
                        .authenticate_publickey_with(user, identity, None, &mut agent)
                        .await;
                    if matches!(result, Ok(ref auth) if auth.success()) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

fn load_key(path: &Path) -> Result<Arc<ssh_key::PrivateKey>> {
    load_secret_key(path, None)
        .map(Arc::new)
        .map_err(|e| Error::KeyLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// An authenticated connection to one host.
pub struct Session {
    host: String,
    handle: Handle<SshHandler>,
}

impl Session {
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        let credentials = Credentials::resolve(&config).await?;

        // Apply commands may be silent for a long time, so keepalives hold
        // the connection open instead of an inactivity timeout.
        let russh_config = Arc::new(client::Config {
            inactivity_timeout: None,
            keepalive_interval: Some(KEEPALIVE_INTERVAL),
            ..Default::default()
        });

        let mut handle = client::connect(
            russh_config,
            (config.host.as_str(), config.port),
            SshHandler::new(&config),
        )
        .await
        .map_err(|e| Error::Connection(format!("{}:{}: {}", config.host, config.port, e)))?;

        if !credentials.authenticate(&mut handle, &config.user).await? {
            return Err(Error::AuthenticationFailed);
        }

        tracing::debug!("SSH session established to {}@{}", config.user, config.host);
        Ok(Self {
            host: config.host,
            handle,
        })
    }

    /// Run `command` to completion and collect its output.
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to open channel: {e}")))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to start command: {e}")))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = None;
        let mut eof = false;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => stdout.extend_from_slice(&data),
                ChannelMsg::ExtendedData {
                    data,
                    ext: STDERR_STREAM,
                } => stderr.extend_from_slice(&data),
                ChannelMsg::ExitStatus { exit_status } => exit_code = Some(exit_status),
                ChannelMsg::Eof => eof = true,
                ChannelMsg::Close => break,
                _ => {}
            }
            if eof && exit_code.is_some() {
                break;
            }
        }

        // No exit status means the connection dropped mid-command
        let exit_code = exit_code.ok_or(Error::ChannelClosed)?;
        tracing::debug!("`{}` on {} exited with {}", command, self.host, exit_code);

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }

    pub async fn disconnect(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}
