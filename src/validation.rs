// ABOUTME: Pre-flight gate on the state repository before anything is deployed.
// ABOUTME: Load failures are fatal; validation issues are surfaced for the operator.

use crate::config::{DEPLOYMENTS_FILENAME, Deployments};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// A structural problem in a state that otherwise loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn push(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            location: location.into(),
            message: message.into(),
        });
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn error_count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Loads a state repository and checks it.
pub trait StateValidator {
    fn validate(&self, repo_root: &Path) -> Result<ValidationReport, LoadError>;
}

/// Checks that every YAML document in the repository parses and that the
/// deployments list is usable.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlStateValidator;

impl YamlStateValidator {
    fn yaml_files(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), LoadError> {
        let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Read {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Read {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            // Symlinked directories are not followed
            let file_type = entry.file_type().map_err(|source| LoadError::Read {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                if !hidden {
                    Self::yaml_files(&path, found)?;
                }
            } else if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml")
            ) {
                found.push(path);
            }
        }
        Ok(())
    }

    fn check_deployments(repo_root: &Path, report: &mut ValidationReport) -> Result<(), LoadError> {
        let deployments = Deployments::load(repo_root).map_err(|e| LoadError::Parse {
            path: repo_root.join(DEPLOYMENTS_FILENAME),
            reason: e.to_string(),
        })?;

        let mut seen = HashSet::new();
        for host in deployments.hosts() {
            if !seen.insert(host.as_str()) {
                report.push(
                    DEPLOYMENTS_FILENAME,
                    format!("host '{host}' is listed more than once"),
                );
            }
        }
        Ok(())
    }
}

impl StateValidator for YamlStateValidator {
    fn validate(&self, repo_root: &Path) -> Result<ValidationReport, LoadError> {
        let mut files = Vec::new();
        Self::yaml_files(repo_root, &mut files)?;
        files.sort();

        for path in &files {
            let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
                path: path.clone(),
                source,
            })?;
            serde_yaml::from_str::<serde_yaml::Value>(&content).map_err(|e| LoadError::Parse {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        }
        tracing::debug!("loaded {} YAML files from {}", files.len(), repo_root.display());

        let mut report = ValidationReport::default();
        Self::check_deployments(repo_root, &mut report)?;
        Ok(report)
    }
}
