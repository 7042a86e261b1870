//! Command-bar line parser
//!
//! A line starting with `:` is a command: the verb is lower-cased, the rest
//! is split on whitespace into arguments. Anything else is a navigation
//! token (`..`, a directory name or a file name).

use crate::error::{EditorError, EditorResult};

/// Separator between source and destination operands
pub const ARROW: &str = " -> ";

/// Marker that introduces a command
pub const COMMAND_MARKER: char = ':';

/// A parsed verb with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub verb: String,
    pub args: Vec<String>,
    /// The trimmed input line, for messages
    pub raw: String,
}

impl CommandLine {
    /// Arguments joined back with single spaces
    pub fn operand(&self) -> String {
        self.args.join(" ")
    }

    pub fn has_operand(&self) -> bool {
        !self.args.is_empty()
    }

    /// Operand, or `MissingArgument` when there is none
    pub fn require_operand(&self) -> EditorResult<String> {
        if self.args.is_empty() {
            return Err(EditorError::missing_argument(&self.verb));
        }
        Ok(self.operand())
    }

    /// `source -> destination` operands; both sides must be non-empty
    pub fn arrow_operands(&self, usage: &str) -> EditorResult<(String, String)> {
        let operand = self.require_operand()?;
        match split_arrow(&operand) {
            Some((src, dst)) if !src.is_empty() && !dst.is_empty() => {
                Ok((src.to_string(), dst.to_string()))
            }
            _ => Err(EditorError::invalid_syntax(&self.verb, usage)),
        }
    }
}

/// One line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// Blank line
    Empty,
    Command(CommandLine),
    /// Bare path token
    Navigate(String),
}

/// Split on exactly one `" -> "`, trimming both sides. A trailing `" ->"`
/// (the line was trimmed) leaves an empty right side.
pub fn split_arrow(operand: &str) -> Option<(&str, &str)> {
    let (left, right) = match operand.split_once(ARROW) {
        Some(parts) => parts,
        None => (operand.strip_suffix(ARROW.trim_end())?, ""),
    };
    if right.contains(ARROW) {
        return None;
    }
    Some((left.trim(), right.trim()))
}

pub fn parse(line: &str) -> EditorResult<ParsedInput> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ParsedInput::Empty);
    }
    let Some(rest) = line.strip_prefix(COMMAND_MARKER) else {
        return Ok(ParsedInput::Navigate(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(EditorError::UnknownCommand(line.to_string()));
    };
    Ok(ParsedInput::Command(CommandLine {
        verb: verb.to_lowercase(),
        args: words.map(str::to_string).collect(),
        raw: line.to_string(),
    }))
}
