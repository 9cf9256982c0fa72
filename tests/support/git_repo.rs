// ABOUTME: Scratch git repositories for tests that need real history.
// ABOUTME: Uses the git CLI with a fixed identity and no signing.

use compstate_deploy::types::RevisionId;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const GIT_ENV_OVERRIDES: [&str; 4] = ["GIT_DIR", "GIT_WORK_TREE", "GIT_INDEX_FILE", "GIT_COMMON_DIR"];

/// Run git in `dir`, panicking with stderr on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let mut cmd = Command::new("git");
    for key in GIT_ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    let output = cmd
        .args([
            "-c",
            "user.name=test-user",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "init.defaultBranch=main",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A temporary working repository.
pub struct ScratchRepo {
    dir: TempDir,
}

impl ScratchRepo {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "--quiet"]);
        Self { dir }
    }

    /// Clone `source` into a new temporary directory.
    pub fn clone_from(source: &Path) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = source.to_string_lossy().to_string();
        git(dir.path(), &["clone", "--quiet", source.as_str(), "."]);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a file, commit everything, and return the new HEAD.
    pub fn commit_file(&self, name: &str, content: &str) -> RevisionId {
        self.write(name, content);
        git(self.path(), &["add", "--all"]);
        git(self.path(), &["commit", "--quiet", "-m", name]);
        self.head()
    }

    pub fn head(&self) -> RevisionId {
        RevisionId::parse(&git(self.path(), &["rev-parse", "HEAD"])).unwrap()
    }

    pub fn checkout_new_branch(&self, branch: &str, start: &RevisionId) {
        git(
            self.path(),
            &["checkout", "--quiet", "-b", branch, start.as_str()],
        );
    }
}

/// A temporary bare repository, standing in for a host's state repository.
pub struct BareRepo {
    dir: TempDir,
}

impl BareRepo {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "--quiet", "--bare"]);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn url(&self) -> String {
        self.path().to_string_lossy().to_string()
    }

    pub fn resolve(&self, reference: &str) -> String {
        git(self.path(), &["rev-parse", reference])
    }
}
