//! Error type shared by the turtle and its interpreters.

use crate::frame::StackKind;
use thiserror::Error;

/// Failures that terminate an interpretation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurtleError {
    /// A pop symbol (`]` or `)`) was read while the matching stack was empty.
    #[error("cannot pop the {stack} stack: it is empty")]
    StackUnderflow { stack: StackKind },

    /// A `{` name run reached the end of input without its closing `}`.
    ///
    /// Only reported when [`TurtleConfig::strict_names`](crate::TurtleConfig::strict_names)
    /// is set; otherwise the name is dropped with a warning.
    #[error("unterminated object name `{{{name}`")]
    MalformedName { name: String },
}

pub type Result<T, E = TurtleError> = std::result::Result<T, E>;
