use thiserror::Error;

/// Represents all errors that can occur during lexing or parsing.
///
/// Every variant carries `pos`, the source offset just past the offending
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// No lexer rule matched the character at this position.
    #[error("unexpected character '{character}'")]
    UnexpectedCharacter {
        /// The character that was skipped.
        character: char,
        /// Offset just past the character.
        pos:       usize,
    },
    /// An opening or closing delimiter has no partner.
    #[error("unmatched '{delimiter}'")]
    UnmatchedDelimiter {
        /// The delimiter text, one of `(`, `)`, `{` or `}`.
        delimiter: String,
        /// Offset just past the delimiter.
        pos:       usize,
    },
    /// A specific token was required but something else was found.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// Human readable description of what was required.
        expected: String,
        /// Description of the token actually found.
        found:    String,
        /// Offset just past the token found.
        pos:      usize,
    },
    /// An expression was required but the token cannot start one.
    #[error("expected an expression, found {found}")]
    ExpectedExpression {
        /// Description of the token actually found.
        found: String,
        /// Offset just past the token found.
        pos:   usize,
    },
    /// A statement ended but more tokens follow on the same line.
    #[error("expected end of line, found {found}")]
    ExpectedStatementEnd {
        /// Description of the trailing token.
        found: String,
        /// Offset just past the trailing token.
        pos:   usize,
    },
    /// A token that cannot begin a statement.
    #[error("unexpected {found} at start of statement")]
    UnexpectedStatement {
        /// Description of the token.
        found: String,
        /// Offset just past the token.
        pos:   usize,
    },
    /// Parentheses, prefix operators or blocks nest past the parser's limit.
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep {
        /// The deepest nesting allowed.
        limit: usize,
        /// Offset just past the token that went too deep.
        pos:   usize,
    },
    /// An integer literal does not fit in 64 bits.
    #[error("integer literal '{literal}' is too large")]
    LiteralTooLarge {
        /// The literal text.
        literal: String,
        /// Offset just past the literal.
        pos:     usize,
    },
}

impl SyntaxError {
    /// Returns the source offset this error points at.
    #[must_use]
    pub const fn pos(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { pos, .. }
            | Self::UnmatchedDelimiter { pos, .. }
            | Self::UnexpectedToken { pos, .. }
            | Self::ExpectedExpression { pos, .. }
            | Self::ExpectedStatementEnd { pos, .. }
            | Self::UnexpectedStatement { pos, .. }
            | Self::NestingTooDeep { pos, .. }
            | Self::LiteralTooLarge { pos, .. } => *pos,
        }
    }
}
