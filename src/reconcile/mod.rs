// ABOUTME: Reconciliation of a host's running revision against the deploy target.
// ABOUTME: Classifies ancestry and resolves each host to skip or update.

mod decider;
mod relation;

pub use decider::{Decider, ReconcileError, Verdict};
pub use relation::{AncestryRelation, classify};

use std::fmt;

/// Final verdict for one host, always resolved before any transfer happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Update,
}

impl Decision {
    /// Decision for a yes/no answer to "deploy anyway?".
    pub fn from_confirmation(deploy: bool) -> Self {
        if deploy {
            Decision::Update
        } else {
            Decision::Skip
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Skip => write!(f, "skip"),
            Decision::Update => write!(f, "update"),
        }
    }
}
