// ABOUTME: Live query of the revision a host is currently serving.
// ABOUTME: Every failure mode collapses to "unknown"; the probe never errors.

mod http;

pub use http::HttpStateProbe;

use crate::types::{Host, RevisionId};
use async_trait::async_trait;

#[async_trait]
pub trait StateProbe: Send + Sync {
    /// The revision the host reports as applied, or None if it cannot be determined.
    async fn probe(&self, host: &Host) -> Option<RevisionId>;
}
