// ABOUTME: Diagnostics accumulator for non-fatal problems during a deploy run.
// ABOUTME: Collects warnings that shouldn't stop the run but should be shown at the end.

/// Collects non-fatal warnings during a deploy run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn probe_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ProbeFailed,
            message: message.into(),
        }
    }

    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::FetchFailed,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Host state could not be read; the operator decided without it.
    ProbeFailed,
    /// Fetching unknown history failed; the revision stayed unknown.
    FetchFailed,
}
