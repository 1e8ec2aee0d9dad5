/// Diagnostics and the diagnostic sink.
///
/// Every phase converts its own error enum into a [`Diagnostic`], which the
/// [`ErrorHandler`] collects in report order and renders against the source
/// text with a caret under the offending token.
pub mod diagnostic;
/// Syntax errors.
///
/// Raised by the lexer for characters no rule matches and by the parser for
/// unbalanced delimiters, unexpected tokens and malformed statements.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while a program is executing:
/// division by zero, invalid operand types, unknown variables, failing device
/// or file services and failing nested programs.
pub mod runtime_error;
/// Semantic errors.
///
/// Raised by the semantic analyzer for undeclared variables, non-boolean loop
/// and branch conditions and loop-control commands used outside a loop.
pub mod semantic_error;

pub use diagnostic::{Diagnostic, DiagnosticKind, ErrorHandler};
pub use parse_error::SyntaxError;
pub use runtime_error::RuntimeError;
pub use semantic_error::SemanticError;
