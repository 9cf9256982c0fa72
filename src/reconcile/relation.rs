// ABOUTME: Ancestry relation between a host's revision and the deploy target.
// ABOUTME: Exactly one relation holds for each ordered pair of revisions.

use crate::types::RevisionId;
use crate::vcs::{self, RevisionGraph};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncestryRelation {
    /// Host already runs the target.
    Equal,
    /// Host's revision is in the target's history (fast-forward).
    Ancestor,
    /// Target is in the host's history: the host is ahead.
    Descendant,
    /// Both known, but the histories diverged.
    Sibling,
    /// Host's revision is not in any known history.
    Unknown,
}

impl fmt::Display for AncestryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AncestryRelation::Equal => "equal",
            AncestryRelation::Ancestor => "ancestor",
            AncestryRelation::Descendant => "more recent",
            AncestryRelation::Sibling => "sibling",
            AncestryRelation::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Classify `candidate` against `target` using only local history.
///
/// A candidate missing from local history is Unknown, never an error.
pub async fn classify<G: RevisionGraph + ?Sized>(
    graph: &G,
    target: &RevisionId,
    candidate: &RevisionId,
) -> vcs::Result<AncestryRelation> {
    if candidate == target {
        return Ok(AncestryRelation::Equal);
    }

    if graph.has_ancestor(target, candidate).await? {
        return Ok(AncestryRelation::Ancestor);
    }

    if !graph.has_commit(candidate).await? {
        return Ok(AncestryRelation::Unknown);
    }

    if graph.has_descendant(target, candidate).await? {
        return Ok(AncestryRelation::Descendant);
    }

    Ok(AncestryRelation::Sibling)
}
