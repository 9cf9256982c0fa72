// ABOUTME: In-memory stand-ins for the history store, probe, transport and operator.
// ABOUTME: Each fake records its calls so tests can assert what was contacted.

use async_trait::async_trait;
use compstate_deploy::prompt::Operator;
use compstate_deploy::probe::StateProbe;
use compstate_deploy::ssh::CommandOutput;
use compstate_deploy::transport::{PushSnafu, Transport, TransportError};
use compstate_deploy::types::{Host, RevisionId};
use compstate_deploy::vcs::{self, RevisionGraph, VcsError};
use snafu::IntoError;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Deterministic 40-digit revision id for test commit `n`.
pub fn rev(n: u32) -> RevisionId {
    RevisionId::parse(&format!("{n:040x}")).unwrap()
}

pub fn host(name: &str) -> Host {
    Host::new(name).unwrap()
}

pub fn hosts(names: &[&str]) -> Vec<Host> {
    names.iter().map(|n| host(n)).collect()
}

type Commits = HashMap<RevisionId, Vec<RevisionId>>;

/// Commit graph with per-remote history that becomes known on fetch.
#[derive(Default)]
pub struct FakeGraph {
    known: Mutex<Commits>,
    remotes: HashMap<String, Commits>,
    failing_remotes: HashSet<String>,
    fetches: Mutex<Vec<String>>,
    pushes: Mutex<Vec<(String, String)>>,
    head: Option<RevisionId>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a locally known commit.
    pub fn commit(self, id: RevisionId, parents: &[RevisionId]) -> Self {
        self.known.lock().unwrap().insert(id, parents.to_vec());
        self
    }

    /// Add a commit that only becomes known after fetching `remote`.
    pub fn remote_commit(mut self, remote: &str, id: RevisionId, parents: &[RevisionId]) -> Self {
        self.remotes
            .entry(remote.to_string())
            .or_default()
            .insert(id, parents.to_vec());
        self
    }

    pub fn failing_fetch(mut self, remote: &str) -> Self {
        self.failing_remotes.insert(remote.to_string());
        self
    }

    pub fn head(mut self, id: RevisionId) -> Self {
        self.head = Some(id);
        self
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.lock().unwrap().clone()
    }

    fn reachable(&self, from: &RevisionId, to: &RevisionId) -> bool {
        let known = self.known.lock().unwrap();
        if !known.contains_key(from) || !known.contains_key(to) {
            return false;
        }
        let mut queue = VecDeque::from([from.clone()]);
        let mut seen = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if &current == to {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(parents) = known.get(&current) {
                queue.extend(parents.iter().cloned());
            }
        }
        false
    }
}

#[async_trait]
impl RevisionGraph for FakeGraph {
    async fn has_ancestor(&self, target: &RevisionId, candidate: &RevisionId) -> vcs::Result<bool> {
        Ok(self.reachable(target, candidate))
    }

    async fn has_descendant(
        &self,
        target: &RevisionId,
        candidate: &RevisionId,
    ) -> vcs::Result<bool> {
        Ok(self.reachable(candidate, target))
    }

    async fn has_commit(&self, revision: &RevisionId) -> vcs::Result<bool> {
        Ok(self.known.lock().unwrap().contains_key(revision))
    }

    async fn fetch(&self, remote: &str, _quiet: bool) -> vcs::Result<()> {
        self.fetches.lock().unwrap().push(remote.to_string());
        if self.failing_remotes.contains(remote) {
            return Err(VcsError::CommandFailed {
                command: format!("fetch {remote}"),
                stderr: "could not read from remote repository".to_string(),
            });
        }
        if let Some(commits) = self.remotes.get(remote) {
            self.known
                .lock()
                .unwrap()
                .extend(commits.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(())
    }

    async fn push(&self, url: &str, refspec: &str) -> vcs::Result<()> {
        self.pushes
            .lock()
            .unwrap()
            .push((url.to_string(), refspec.to_string()));
        Ok(())
    }

    async fn rev_parse(&self, reference: &str) -> vcs::Result<RevisionId> {
        self.head.clone().ok_or_else(|| VcsError::CommandFailed {
            command: format!("rev-parse {reference}"),
            stderr: "unknown revision".to_string(),
        })
    }
}

/// Probe answering from a fixed table; unlisted hosts are unreachable.
#[derive(Default)]
pub struct FakeProbe {
    states: HashMap<String, RevisionId>,
    probed: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, host: &str, revision: RevisionId) -> Self {
        self.states.insert(host.to_string(), revision);
        self
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateProbe for FakeProbe {
    async fn probe(&self, host: &Host) -> Option<RevisionId> {
        self.probed.lock().unwrap().push(host.to_string());
        self.states.get(host.as_str()).cloned()
    }
}

/// Transport whose apply exit status is scripted per host.
#[derive(Default)]
pub struct FakeTransport {
    exit_codes: HashMap<String, u32>,
    stderr: HashMap<String, String>,
    failing_pushes: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exit_code(mut self, host: &str, code: u32) -> Self {
        self.exit_codes.insert(host.to_string(), code);
        self
    }

    pub fn stderr(mut self, host: &str, text: &str) -> Self {
        self.stderr.insert(host.to_string(), text.to_string());
        self
    }

    pub fn failing_push(mut self, host: &str) -> Self {
        self.failing_pushes.insert(host.to_string());
        self
    }

    /// Calls in order, as "push <host>" / "apply <host>".
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Hosts that were contacted at all.
    pub fn contacted(&self) -> Vec<String> {
        let mut hosts: Vec<String> = Vec::new();
        for call in self.calls() {
            let host = call.split_once(' ').map(|(_, h)| h.to_string()).unwrap();
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn push(&self, host: &Host, _revision: &RevisionId) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(format!("push {host}"));
        if self.failing_pushes.contains(host.as_str()) {
            let source = VcsError::CommandFailed {
                command: "push".to_string(),
                stderr: "permission denied".to_string(),
            };
            return Err(PushSnafu { host: host.clone() }.into_error(source));
        }
        Ok(())
    }

    async fn apply(
        &self,
        host: &Host,
        revision: &RevisionId,
    ) -> Result<CommandOutput, TransportError> {
        self.calls.lock().unwrap().push(format!("apply {host}"));
        let exit_code = self.exit_codes.get(host.as_str()).copied().unwrap_or(0);
        Ok(CommandOutput {
            exit_code,
            stdout: format!("applied {}\n", revision.short()),
            stderr: self.stderr.get(host.as_str()).cloned().unwrap_or_default(),
        })
    }
}

/// Operator answering from a script; an exhausted script means end of input,
/// which takes each question's default.
#[derive(Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedOperator {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
        }
    }

    /// Operator that accepts every default.
    pub fn defaults() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Operator for ScriptedOperator {
    fn read_response(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}

/// Writer whose contents stay readable after it is handed to `Output`.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
