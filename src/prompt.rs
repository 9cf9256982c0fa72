// ABOUTME: Operator interaction: yes/no confirmations with stated defaults.
// ABOUTME: Injected into the deploy pipeline so tests can script the answers.

use console::{Term, style};
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use std::io::{self, BufRead, IsTerminal};

/// Source of operator answers.
///
/// Implementors only supply raw line input; the query and confirm logic is
/// shared so every prompt behaves the same way.
pub trait Operator {
    /// Show `prompt` and read one line. `None` means input is exhausted.
    fn read_response(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Ask until one of `options` is given.
    ///
    /// Any other answer (including an empty one) selects `default` when there
    /// is one; without a default the question is repeated.
    fn query(&mut self, question: &str, options: &[&str], default: Option<&str>) -> io::Result<String> {
        query_lines(self, question, options, default)
    }

    /// Yes/no question.
    fn confirm(&mut self, question: &str, default: Option<bool>) -> io::Result<bool> {
        confirm_lines(self, question, default)
    }
}

fn query_lines<O: Operator + ?Sized>(
    operator: &mut O,
    question: &str,
    options: &[&str],
    default: Option<&str>,
) -> io::Result<String> {
    let prompt = format_query(question, options, default);
    loop {
        let Some(response) = operator.read_response(&prompt)? else {
            return match default {
                Some(default) => Ok(default.to_lowercase()),
                None => Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("no answer to '{}'", question.trim_end()),
                )),
            };
        };

        let response = response.trim().to_lowercase();
        if options.iter().any(|o| o.to_lowercase() == response) {
            return Ok(response);
        }

        if let Some(default) = default {
            return Ok(default.to_lowercase());
        }
    }
}

fn confirm_lines<O: Operator + ?Sized>(
    operator: &mut O,
    question: &str,
    default: Option<bool>,
) -> io::Result<bool> {
    let default = default.map(|yes| if yes { "y" } else { "n" });
    Ok(query_lines(operator, question, &["y", "n"], default)? == "y")
}

/// `"Question? [Y/n]: "`, with the default option upper-cased.
pub fn format_query(question: &str, options: &[&str], default: Option<&str>) -> String {
    let opts: Vec<String> = options
        .iter()
        .map(|o| {
            if Some(*o) == default {
                o.to_uppercase()
            } else {
                o.to_lowercase()
            }
        })
        .collect();
    format!("{} [{}]: ", question.trim_end(), opts.join("/"))
}

/// Asks on the terminal with dialoguer; reads plain lines when stdin is piped.
pub struct TerminalOperator {
    term: Term,
    theme: ColorfulTheme,
    interactive: bool,
}

impl TerminalOperator {
    pub fn new() -> Self {
        let term = Term::stdout();
        let interactive = term.is_term() && io::stdin().is_terminal();
        Self {
            term,
            theme: ColorfulTheme::default(),
            interactive,
        }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for TerminalOperator {
    fn read_response(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.term
            .write_str(&style(prompt).red().bright().bold().to_string())?;

        if self.interactive {
            return self.term.read_line().map(Some);
        }

        // Term only reads from a tty
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            self.term.write_line("")?;
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn confirm(&mut self, question: &str, default: Option<bool>) -> io::Result<bool> {
        if !self.interactive {
            return confirm_lines(self, question, default);
        }

        let mut prompt = Confirm::with_theme(&self.theme).with_prompt(question.trim_end());
        if let Some(default) = default {
            prompt = prompt.default(default);
        }
        prompt.interact_on(&self.term).map_err(io::Error::other)
    }
}
