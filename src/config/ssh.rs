// ABOUTME: SSH connection settings shared by every host in a run.
// ABOUTME: Converts into a per-host session config for the SSH client.

use crate::ssh::SessionConfig;
use crate::types::Host;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SshSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    #[serde(default)]
    pub known_hosts_path: Option<PathBuf>,
    #[serde(default = "default_trust_first_connection")]
    pub trust_first_connection: bool,
}

fn default_port() -> u16 {
    22
}

fn default_trust_first_connection() -> bool {
    true
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            key_path: None,
            known_hosts_path: None,
            trust_first_connection: default_trust_first_connection(),
        }
    }
}

impl SshSettings {
    /// Build the session config for one host.
    pub fn session_config(&self, host: &Host, user: &str) -> SessionConfig {
        SessionConfig {
            host: host.to_string(),
            port: self.port,
            user: user.to_string(),
            key_path: self.key_path.clone(),
            trust_on_first_use: self.trust_first_connection,
            known_hosts_path: self.known_hosts_path.clone(),
        }
    }
}
