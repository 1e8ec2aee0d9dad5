use thiserror::Error;

use crate::{error::DiagnosticKind, io::ServiceError};

/// Represents all errors that can occur while a program is executing.
///
/// Every variant carries `pos`, the source offset of the token whose
/// evaluation failed.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Tried to read a variable that is not visible at the current depth.
    #[error("unknown variable '{name}'")]
    UnknownVariable {
        /// The variable name.
        name: String,
        /// Offset just past the variable token.
        pos:  usize,
    },
    /// Division, floor division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero {
        /// Offset just past the operator.
        pos: usize,
    },
    /// A math function or operator was applied outside of its domain.
    #[error("{operation} is undefined for {operand}")]
    Domain {
        /// The operation that failed, such as `logarithm`.
        operation: &'static str,
        /// The offending operand, rendered.
        operand:   String,
        /// Offset just past the operator or function name.
        pos:       usize,
    },
    /// A string was repeated a negative number of times.
    #[error("cannot repeat a string {count} times")]
    NegativeRepetition {
        /// The repetition count.
        count: i64,
        /// Offset just past the operator.
        pos:   usize,
    },
    /// A string operator would build a string past the length limit.
    #[error("string would be longer than {limit} bytes")]
    StringTooLong {
        /// The limit in bytes.
        limit: usize,
        /// Offset just past the operator.
        pos:   usize,
    },
    /// An operator or command received operands of the wrong type.
    #[error("{details}")]
    TypeMismatch {
        /// Description of the mismatch.
        details: String,
        /// Offset just past the operator or command.
        pos:     usize,
    },
    /// A loop or branch condition evaluated to something other than a
    /// boolean.
    #[error("{construct} condition must be boolean, found {found}")]
    NonBooleanCondition {
        /// The construct keyword.
        construct: &'static str,
        /// The type name of the value found.
        found:     &'static str,
        /// Offset just past the construct keyword.
        pos:       usize,
    },
    /// A line typed for `input` cannot be converted to the variable's type.
    #[error("cannot read '{input}' as {expected}")]
    InvalidInput {
        /// The line that was read.
        input:    String,
        /// The type name the variable holds.
        expected: &'static str,
        /// Offset just past the `input` keyword.
        pos:      usize,
    },
    /// Integer arithmetic left the 64-bit range.
    #[error("integer overflow")]
    Overflow {
        /// Offset just past the operator.
        pos: usize,
    },
    /// A number is too large to convert between integer and float exactly.
    #[error("number {value} cannot be converted exactly")]
    LiteralTooLarge {
        /// The value, rendered.
        value: String,
        /// Offset just past the operator or function.
        pos:   usize,
    },
    /// A device, file, console or system service failed.
    #[error("{source}")]
    Service {
        /// The failing service call.
        source: ServiceError,
        /// Offset just past the command.
        pos:    usize,
    },
    /// `do` statements ran inside each other past the depth limit.
    #[error("do nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The deepest chain allowed.
        limit: usize,
        /// Offset just past the `do` keyword.
        pos:   usize,
    },
    /// A program executed through `do` reported a diagnostic.
    #[error("do: [{kind}] {message}")]
    Nested {
        /// Kind of the nested diagnostic.
        kind:    DiagnosticKind,
        /// Message of the nested diagnostic.
        message: String,
        /// Offset just past the `do` keyword.
        pos:     usize,
    },
}

impl RuntimeError {
    /// Returns the source offset this error points at.
    #[must_use]
    pub const fn pos(&self) -> usize {
        match self {
            Self::UnknownVariable { pos, .. }
            | Self::DivisionByZero { pos }
            | Self::Domain { pos, .. }
            | Self::NegativeRepetition { pos, .. }
            | Self::StringTooLong { pos, .. }
            | Self::TypeMismatch { pos, .. }
            | Self::NonBooleanCondition { pos, .. }
            | Self::InvalidInput { pos, .. }
            | Self::Overflow { pos }
            | Self::LiteralTooLarge { pos, .. }
            | Self::Service { pos, .. }
            | Self::NestingTooDeep { pos, .. }
            | Self::Nested { pos, .. } => *pos,
        }
    }

    /// Shorthand for a [`RuntimeError::TypeMismatch`].
    pub(crate) fn mismatch(details: impl Into<String>, pos: usize) -> Self {
        Self::TypeMismatch { details: details.into(),
                             pos }
    }
}
