// ABOUTME: RevisionGraph implementation backed by the git command line.
// ABOUTME: Each query spawns one git process scoped to the repository path.

use super::error::{Result, VcsError};
use super::{RevisionGraph, WorkingTree};
use crate::types::RevisionId;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::process::Command;

/// A local git checkout of the state repository.
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
}

impl GitRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(output)
    }

    /// Run git and require a zero exit status, returning trimmed stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(VcsError::command_failed(args, &output.stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// `git merge-base --is-ancestor`: exit 0 is yes, exit 1 is no.
    async fn is_ancestor(&self, ancestor: &RevisionId, descendant: &RevisionId) -> Result<bool> {
        if !self.has_commit(ancestor).await? || !self.has_commit(descendant).await? {
            return Ok(false);
        }

        let args = [
            "merge-base",
            "--is-ancestor",
            ancestor.as_str(),
            descendant.as_str(),
        ];
        let output = self.output(&args).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(VcsError::command_failed(&args, &output.stderr)),
        }
    }
}

#[async_trait]
impl RevisionGraph for GitRepository {
    async fn has_ancestor(&self, target: &RevisionId, candidate: &RevisionId) -> Result<bool> {
        self.is_ancestor(candidate, target).await
    }

    async fn has_descendant(
        &self,
        target: &RevisionId,
        candidate: &RevisionId,
    ) -> Result<bool> {
        self.is_ancestor(target, candidate).await
    }

    async fn has_commit(&self, revision: &RevisionId) -> Result<bool> {
        let object = format!("{}^{{commit}}", revision);
        let output = self.output(&["cat-file", "-e", object.as_str()]).await?;
        Ok(output.status.success())
    }

    async fn fetch(&self, remote: &str, quiet: bool) -> Result<()> {
        let mut args = vec!["fetch"];
        if quiet {
            args.push("--quiet");
        }
        args.push(remote);
        self.run(&args).await.map(|_| ())
    }

    async fn push(&self, url: &str, refspec: &str) -> Result<()> {
        let args = ["push", url, refspec];
        let output = self.output(&args).await?;
        if !output.status.success() {
            return Err(VcsError::command_failed(&args, &output.stderr));
        }
        // git reports push progress on stderr even when it succeeds
        let progress = String::from_utf8_lossy(&output.stderr);
        if !progress.trim().is_empty() {
            tracing::debug!("git push: {}", progress.trim());
        }
        Ok(())
    }

    async fn rev_parse(&self, reference: &str) -> Result<RevisionId> {
        let spec = format!("{}^{{commit}}", reference);
        let sha = self.run(&["rev-parse", "--verify", "--quiet", spec.as_str()]).await?;
        RevisionId::parse(&sha).map_err(|e| VcsError::InvalidRevision {
            reference: reference.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl WorkingTree for GitRepository {
    async fn has_changes(&self) -> Result<bool> {
        let status = self.run(&["status", "--porcelain"]).await?;
        Ok(!status.is_empty())
    }

    async fn describe_changes(&self) -> Result<String> {
        self.run(&["status", "--short"]).await
    }
}
