/// Parsing of binary expressions.
///
/// KMSL has two left-associative precedence tiers: the expression tier
/// (additive, logical and comparison operators) and the term tier
/// (multiplicative, power, root, logarithm and bitwise operators).
pub mod binary;
/// Parsing of braced blocks and the compound statements that own them:
/// `if`/`else`, `while` and `for`.
pub mod block;
/// The `Parser` itself: token cursor, `match`/`require` helpers, the
/// delimiter balance pre-check and error recovery.
pub mod core;
/// Statement dispatch, assignments, device actions and commands.
pub mod statement;
/// Parsing of factors: literals, variables, parenthesised expressions and
/// prefix operators or functions.
pub mod unary;
/// Shared helper routines for parsing comma lists and assignment targets.
pub mod utils;

use crate::{
    ast::Block,
    error::ErrorHandler,
    interpreter::{lexer::Lexer, parser::core::Parser},
};

/// Lexes and parses `source` with a fresh diagnostic sink.
///
/// Returns the root block together with the sink; callers check
/// [`ErrorHandler::has_errors`] before using the tree.
#[must_use]
pub fn parse_source(source: &str) -> (Block, ErrorHandler) {
    let mut errors = ErrorHandler::new(source);
    let tokens = Lexer::new().scan(source, &mut errors);
    let root = Parser::new(tokens, &mut errors).parse();
    (root, errors)
}
