//! Interactive confirmation
//!
//! The installer asks before replacing an existing kernel directory. Answers
//! come through the `Confirm` trait so callers decide where they are read from.

use std::io::{self, BufRead, Write};

use crate::errors::{Result, RkError};

/// Answers accepted as "yes", compared case-insensitively
pub const AFFIRMATIVE: [&str; 3] = ["y", "yes", "yep"];

/// Source of yes/no answers
pub trait Confirm {
    /// Show `question` and return true on an affirmative answer
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> Result<bool>,
{
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self(question)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

/// Prompt on stdout, read the answer line from stdin
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = ask(question)?;
        Ok(is_affirmative(&answer))
    }
}

/// Print `question` without a newline and read one line of input
///
/// End of input counts as an empty answer.
pub fn ask(question: &str) -> Result<String> {
    let stdin = io::stdin();
    ask_with(question, &mut stdin.lock(), &mut io::stdout())
}

pub fn ask_with<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "{}", question).map_err(|e| RkError::Prompt(e.to_string()))?;
    output.flush().map_err(|e| RkError::Prompt(e.to_string()))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| RkError::Prompt(e.to_string()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
