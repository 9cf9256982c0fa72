// ABOUTME: Validated domain types shared across the deploy pipeline.
// ABOUTME: Revision identifiers and host names are checked once at the boundary.

mod host;
mod revision;

pub use host::{Host, HostError};
pub use revision::{RevisionId, RevisionIdError};
