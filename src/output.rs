// ABOUTME: Output formatting for operator feedback during a deploy run.
// ABOUTME: Styling uses console; the writer is injectable so tests can capture a run.

use console::{StyledObject, style};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Handles operator-facing output for a run.
pub struct Output {
    verbose: bool,
    /// None lets console decide from the terminal and environment.
    colors: Option<bool>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Output {
    /// Output to stdout, styled when stdout is a terminal.
    pub fn stdout(verbose: bool) -> Self {
        Self {
            verbose,
            colors: None,
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Unstyled output to any writer.
    pub fn with_writer(writer: impl Write + Send + 'static, verbose: bool) -> Self {
        Self {
            verbose,
            colors: Some(false),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn paint<'a>(&self, text: &'a str) -> StyledObject<&'a str> {
        match self.colors {
            Some(colors) => style(text).force_styling(colors),
            None => style(text),
        }
    }

    fn line(&self, text: impl std::fmt::Display) {
        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "{text}").and_then(|()| writer.flush()) {
            tracing::debug!("failed to write output: {}", e);
        }
    }

    /// Section heading, e.g. the host being deployed to.
    pub fn heading(&self, message: &str) {
        self.line(self.paint(message).bold());
    }

    pub fn progress(&self, message: &str) {
        self.line(message);
    }

    /// Only shown with --verbose.
    pub fn detail(&self, message: &str) {
        if self.verbose {
            self.line(message);
        }
    }

    pub fn failure(&self, message: &str) {
        self.line(self.paint(message).red().bright().bold());
    }

    pub fn warning(&self, message: &str) {
        let message = format!("Warning: {message}");
        self.line(self.paint(&message).bold());
    }

    pub fn success(&self, message: &str) {
        self.line(self.paint(message).blue().bright().bold());
    }

    /// Captured remote output, each line prefixed with `> `.
    pub fn remote(&self, text: &str) {
        if let Some(block) = quote_block(text) {
            self.line(block);
        }
    }
}

/// Prefix every line with `> `. None if there is nothing to show.
pub fn quote_block(text: &str) -> Option<String> {
    let text = text.trim_end();
    if text.trim().is_empty() {
        return None;
    }
    Some(
        text.lines()
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
