/// Binary operator evaluation.
///
/// Routes assignments, compound assignments and two-operand commands, and
/// implements the operator table over [`Value`](crate::interpreter::value::Value)s:
/// arithmetic, bitwise, comparison, logic and string operators.
pub mod binary;

/// Builtin pseudo-variables.
///
/// Cursor position, clock fields, `random` and the math constants, computed
/// on every read.
pub mod builtin;

/// One-operand commands.
///
/// `print`, `input`, `wait`, `os`, `do` and the one-path file commands.
pub mod command;

/// Compound statements.
///
/// `if`, `while` and `for`, including the run-control flags they observe and
/// the pruning of bindings when they complete.
pub mod control;

/// Core evaluation logic and interpreter state.
///
/// Contains the interpreter, its run-control flags, block execution and the
/// per-statement error boundary.
pub mod core;

/// Device statements.
///
/// Key actions, pointer actions and `type`.
pub mod device;

/// Nested programs run by `do`.
pub mod nested;

/// Unary operators and functions.
///
/// Prefix operators, the math and conversion functions, `state`,
/// `readfile`, `exists` and in-place increment and decrement.
pub mod unary;

pub use core::{EvalResult, Interpreter, RunControl};
