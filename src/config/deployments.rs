// ABOUTME: Loads the ordered host list from the state repository.
// ABOUTME: Order in deployments.yaml is the order hosts are deployed to.

use crate::error::{Error, Result};
use crate::types::Host;
use serde::Deserialize;
use std::path::Path;

pub const DEPLOYMENTS_FILENAME: &str = "deployments.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Deployments {
    #[serde(default)]
    pub deployments: Vec<Host>,
}

impl Deployments {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    /// Read `deployments.yaml` from the root of a state repository.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join(DEPLOYMENTS_FILENAME);
        if !path.is_file() {
            return Err(Error::DeploymentsNotFound(path));
        }
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    pub fn hosts(&self) -> &[Host] {
        &self.deployments
    }

    pub fn into_hosts(self) -> Vec<Host> {
        self.deployments
    }
}
