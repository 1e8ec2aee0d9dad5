/// Bitwise operators and shifts on integers.
pub mod bitwise;

/// Relational and equality operators.
pub mod comparison;

/// Operator dispatch, assignments and two-operand commands.
pub mod core;

/// `&&` and `||`.
pub mod logic;

/// Power, root and logarithm.
pub mod power;

/// Numeric `+ - * / // %`.
pub mod scalar;

/// String concatenation and repetition.
pub mod string;
