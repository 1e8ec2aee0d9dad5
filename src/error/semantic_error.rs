use thiserror::Error;

use crate::interpreter::semantic::symbols::DataType;

/// Errors found by static analysis before a program runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// A variable is read before any assignment declared it.
    #[error("undeclared variable '{name}'")]
    UndeclaredVariable {
        /// The variable name.
        name: String,
        /// Offset just past the variable token.
        pos:  usize,
    },
    /// A compound assignment targets a variable that does not exist yet.
    #[error("'{op}' requires '{name}' to be declared first")]
    CompoundToUndeclared {
        /// The variable name.
        name: String,
        /// The compound operator text, such as `+=`.
        op:   String,
        /// Offset just past the operator.
        pos:  usize,
    },
    /// The condition of an `if`, `while` or `for` is not boolean.
    #[error("{construct} condition must be boolean, found {found}")]
    NonBooleanCondition {
        /// The construct keyword.
        construct: &'static str,
        /// The statically inferred type of the condition.
        found:     DataType,
        /// Offset just past the construct keyword.
        pos:       usize,
    },
    /// `break` or `continue` outside of any loop body.
    #[error("'{command}' outside of a loop")]
    OutsideLoop {
        /// The command keyword.
        command: &'static str,
        /// Offset just past the command.
        pos:     usize,
    },
}

impl SemanticError {
    /// Returns the source offset this error points at.
    #[must_use]
    pub const fn pos(&self) -> usize {
        match self {
            Self::UndeclaredVariable { pos, .. }
            | Self::CompoundToUndeclared { pos, .. }
            | Self::NonBooleanCondition { pos, .. }
            | Self::OutsideLoop { pos, .. } => *pos,
        }
    }
}
