// ABOUTME: Tool settings and the deployments list.
// ABOUTME: Settings default to the standard compstate host layout when no file is given.

mod deployments;
mod ssh;

pub use deployments::{DEPLOYMENTS_FILENAME, Deployments};
pub use ssh::SshSettings;

use crate::error::{Error, Result};
use crate::types::Host;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Account used for both the git push and the remote apply command.
    #[serde(default = "default_deploy_user")]
    pub deploy_user: String,

    /// Path of the state repository on each host, relative to the deploy user's home.
    #[serde(default = "default_repo_path")]
    pub repo_path: String,

    /// Remote command invoked with the revision as its only argument.
    #[serde(default = "default_apply_command")]
    pub apply_command: String,

    /// HTTP path serving the host's current state revision.
    #[serde(default = "default_state_path")]
    pub state_path: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub probe_timeout: Duration,

    #[serde(default)]
    pub ssh: SshSettings,
}

fn default_deploy_user() -> String {
    "srcomp".to_string()
}

fn default_repo_path() -> String {
    "~/compstate.git".to_string()
}

fn default_apply_command() -> String {
    "./update".to_string()
}

fn default_state_path() -> String {
    "comp-api/state".to_string()
}

fn default_http_port() -> u16 {
    80
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(3)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            deploy_user: default_deploy_user(),
            repo_path: default_repo_path(),
            apply_command: default_apply_command(),
            state_path: default_state_path(),
            http_port: default_http_port(),
            probe_timeout: default_probe_timeout(),
            ssh: SshSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.deploy_user.trim().is_empty() {
            return Err(Error::InvalidConfig("deploy_user cannot be empty".to_string()));
        }
        if self.apply_command.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "apply_command cannot be empty".to_string(),
            ));
        }
        if self.probe_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "probe_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// URL of a host's state repository, as used for push and fetch.
    pub fn repo_url(&self, host: &Host) -> String {
        format!(
            "ssh://{}@{}/{}",
            self.deploy_user,
            host,
            self.repo_path.trim_start_matches('/')
        )
    }

    /// Command line run over SSH to apply a revision.
    pub fn apply_command_line(&self, revision: &crate::types::RevisionId) -> String {
        format!("{} '{}'", self.apply_command, revision)
    }
}
