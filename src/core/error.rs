//! # Errors
//!
//! Two families, split by when they can happen:
//!
//! - [`BuildError`]: the caller handed a widget an unusable configuration.
//!   Raised at construction, before anything touches the terminal.
//! - [`PromptError`]: something ended a running widget early, either the user
//!   interrupting or the input/output device failing.
//!
//! Input validation failures (bad number, pattern mismatch) are not errors at
//! all; the widget re-prompts in place.

use std::fmt::Write as _;
use std::io;

use thiserror::Error;

/// A widget could not be built from the configuration it was given.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("choices can not be empty")]
    EmptyChoices,

    #[error("{field} must be >= 0, got {value}")]
    NegativeSpacing { field: &'static str, value: i64 },

    #[error("default index {index} is out of range [0, {len})")]
    DefaultOutOfRange { index: usize, len: usize },

    #[error("{}", missing_dependencies_message(.0))]
    MissingDependencies(Vec<(String, String)>),

    #[error("choice {0:?} is declared more than once")]
    DuplicateChoice(String),

    #[error("prompt can not be empty")]
    EmptyPrompt,

    #[error("invalid default: {0}")]
    InvalidDefault(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("prompt components can not be empty")]
    EmptyComponents,
}

fn missing_dependencies_message(pairs: &[(String, String)]) -> String {
    let mut msg = format!("{} missing dependencies:", pairs.len());
    for (choice, dep) in pairs {
        let _ = write!(msg, " {choice:?} requires undeclared {dep:?};");
    }
    msg.pop();
    msg
}

/// A running widget stopped without producing a value.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The user pressed the interrupt key. Unwinds the whole run.
    #[error("interrupted")]
    Interrupted,

    /// The keyboard reached end-of-input or the output sink failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PromptError {
    pub fn is_interrupt(&self) -> bool {
        matches!(self, PromptError::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependencies_lists_every_pair() {
        let err = BuildError::MissingDependencies(vec![
            ("A".to_string(), "X".to_string()),
            ("B".to_string(), "Y".to_string()),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 missing dependencies"));
        assert!(msg.contains("\"A\" requires undeclared \"X\""));
        assert!(msg.contains("\"B\" requires undeclared \"Y\""));
        assert!(!msg.ends_with(';'));
    }

    #[test]
    fn test_io_error_converts() {
        let err: PromptError = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(!err.is_interrupt());
        assert!(err.to_string().contains("eof"));
    }

    #[test]
    fn test_negative_spacing_message() {
        let err = BuildError::NegativeSpacing { field: "indent", value: -2 };
        assert_eq!(err.to_string(), "indent must be >= 0, got -2");
    }
}
