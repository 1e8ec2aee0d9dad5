use std::{fmt, time::Duration};

use crate::{
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::num::{f64_to_i64_checked, i64_to_f64_checked},
};

/// Represents a runtime value in the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A double precision floating-point number.
    Float(f64),
    /// A boolean. Produced by comparison and logical operators and required
    /// by every loop and branch condition.
    Bool(bool),
    /// A string.
    Str(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl Value {
    /// The type name used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
        }
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Converts an int or float to `f64`.
    ///
    /// Integers too large to be represented exactly are rejected.
    ///
    /// # Example
    /// ```
    /// use kmsl::interpreter::value::Value;
    ///
    /// assert_eq!(Value::Int(3).as_float(0).unwrap(), 3.0);
    /// assert!(Value::from("3").as_float(0).is_err());
    /// ```
    pub fn as_float(&self, pos: usize) -> EvalResult<f64> {
        match self {
            Self::Float(f) => Ok(*f),
            Self::Int(n) => i64_to_f64_checked(*n,
                                               RuntimeError::LiteralTooLarge { value: n.to_string(),
                                                                               pos }),
            _ => Err(RuntimeError::mismatch(format!("expected a number, found {}",
                                                    self.type_name()),
                                            pos)),
        }
    }

    /// Converts an int or float to a whole number, rounding floats.
    ///
    /// Used for screen coordinates and scroll amounts.
    pub fn as_whole(&self, pos: usize) -> EvalResult<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Float(f) => f64_to_i64_checked(f.round(), pos),
            _ => Err(RuntimeError::mismatch(format!("expected a number, found {}",
                                                    self.type_name()),
                                            pos)),
        }
    }

    /// Booleans as they are, integers as non-zero. Operand rule of `&&` and
    /// `||`.
    pub fn truthy(&self, pos: usize) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(n) => Ok(*n != 0),
            _ => Err(RuntimeError::mismatch(format!("expected a bool, found {}",
                                                    self.type_name()),
                                            pos)),
        }
    }

    /// Returns the string, or an error for any other type.
    pub fn as_str(&self, pos: usize) -> EvalResult<&str> {
        match self {
            Self::Str(s) => Ok(s),
            _ => Err(RuntimeError::mismatch(format!("expected a string, found {}",
                                                    self.type_name()),
                                            pos)),
        }
    }

    /// Interprets a number as a duration in seconds.
    ///
    /// # Errors
    /// Negative, infinite or non-numeric values.
    pub fn as_seconds(&self, pos: usize) -> EvalResult<Duration> {
        let seconds = self.as_float(pos)?;
        Duration::try_from_secs_f64(seconds).map_err(|_| RuntimeError::Domain {
                                                operation: "duration",
                                                operand: seconds.to_string(),
                                                pos,
                                            })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}
