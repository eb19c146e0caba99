//! Line-oriented console I/O for a single session.
//!
//! A [`Console`] owns the reader and writer the workflows talk through, so
//! tests can drive a whole session from an in-memory script.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

use crossterm::style::{Color, Stylize};
use tracing::warn;

use crate::QuizError;

/// What to do when a numeric prompt receives something that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPolicy {
    /// Tell the user and ask the same question again.
    #[default]
    Reprompt,
    /// Fail the whole session with [`QuizError::InvalidNumber`].
    Abort,
}

pub struct Console<R, W> {
    input: R,
    output: W,
    policy: InputPolicy,
    color: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            policy: InputPolicy::default(),
            color: false,
        }
    }

    pub fn with_policy(mut self, policy: InputPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }

    /// Writes one line.
    pub fn say(&mut self, line: impl Display) -> Result<(), QuizError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Writes one line, coloured when colour output is enabled.
    pub fn say_styled(&mut self, line: &str, color: Color) -> Result<(), QuizError> {
        if self.color {
            writeln!(self.output, "{}", line.with(color).bold())?;
        } else {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    /// Reads one line without its line ending. `None` once input is exhausted.
    pub fn read_line_or_eof(&mut self) -> Result<Option<String>, QuizError> {
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    pub fn read_line(&mut self) -> Result<String, QuizError> {
        self.read_line_or_eof()?.ok_or(QuizError::InputClosed)
    }

    /// Prints `label` without a newline and reads the reply.
    pub fn prompt(&mut self, label: &str) -> Result<String, QuizError> {
        write!(self.output, "{}", label)?;
        self.read_line()
    }

    pub fn prompt_or_eof(&mut self, label: &str) -> Result<Option<String>, QuizError> {
        write!(self.output, "{}", label)?;
        self.read_line_or_eof()
    }

    /// Prompts until the reply parses as an integer inside `range` (if given).
    ///
    /// Under [`InputPolicy::Abort`] a reply that is not an integer fails
    /// immediately. Out-of-range integers are always asked again.
    pub fn prompt_number(
        &mut self,
        label: &str,
        range: Option<RangeInclusive<i64>>,
    ) -> Result<i64, QuizError> {
        loop {
            let reply = self.prompt(label)?;
            match reply.trim().parse::<i64>() {
                Ok(number) if range.as_ref().is_none_or(|r| r.contains(&number)) => {
                    return Ok(number);
                }
                Ok(number) => {
                    warn!(number, "number out of range");
                }
                Err(_) if self.policy == InputPolicy::Abort => {
                    return Err(QuizError::InvalidNumber { input: reply });
                }
                Err(_) => {
                    warn!(input = %reply, "rejected non-numeric input");
                }
            }

            match &range {
                Some(r) => self.say(format!(
                    "Please enter a number between {} and {}.",
                    r.start(),
                    r.end()
                ))?,
                None => self.say("Please enter a number.")?,
            }
        }
    }
}

/// `true` when `reply` is exactly the single-letter choice `key`, ignoring case.
pub fn is_choice(reply: &str, key: &str) -> bool {
    reply.eq_ignore_ascii_case(key)
}
