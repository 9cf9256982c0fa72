// ABOUTME: Library root for compstate-deploy - exposes the deploy pipeline for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod probe;
pub mod prompt;
pub mod reconcile;
pub mod ssh;
pub mod transport;
pub mod types;
pub mod validation;
pub mod vcs;
