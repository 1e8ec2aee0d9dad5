use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        grammar::TokenKind,
        lexer::Token,
        value::Value,
    },
};

impl Interpreter<'_> {
    /// Evaluates `a ** b`, `a %% b` (the `b`-th root of `a`) and `a ^^ b`
    /// (the logarithm of `a` to base `b`).
    ///
    /// All three promote to float. A root of degree zero or less, and a
    /// logarithm of a non-positive number or to a non-positive base or base
    /// one, are domain errors.
    ///
    /// # Example
    /// ```
    /// use kmsl::interpreter::{
    ///     evaluator::Interpreter, grammar::TokenKind, lexer::Token, value::Value,
    /// };
    ///
    /// let root = Token::new(TokenKind::Root, "%%", 3);
    /// let log = Token::new(TokenKind::Log, "^^", 3);
    ///
    /// assert_eq!(Interpreter::eval_power(&root, &Value::Int(16), &Value::Int(4)).unwrap(),
    ///            Value::Float(2.0));
    /// assert_eq!(Interpreter::eval_power(&log, &Value::Int(8), &Value::Int(2)).unwrap(),
    ///            Value::Float(3.0));
    /// assert!(Interpreter::eval_power(&log, &Value::Int(0), &Value::Int(2)).is_err());
    /// ```
    pub fn eval_power(op: &Token, left: &Value, right: &Value) -> EvalResult<Value> {
        if !left.is_numeric() || !right.is_numeric() {
            return Err(Self::unsupported(op, left, right));
        }
        let a = left.as_float(op.pos)?;
        let b = right.as_float(op.pos)?;

        let result = match op.kind {
            TokenKind::Power => a.powf(b),
            TokenKind::Root => {
                if b <= 0.0 {
                    return Err(RuntimeError::Domain { operation: "root",
                                                      operand:   format!("degree {b}"),
                                                      pos:       op.pos, });
                }
                a.powf(b.recip())
            },
            TokenKind::Log => {
                if a <= 0.0 {
                    return Err(RuntimeError::Domain { operation: "logarithm",
                                                      operand:   a.to_string(),
                                                      pos:       op.pos, });
                }
                if b <= 0.0 || b == 1.0 {
                    return Err(RuntimeError::Domain { operation: "logarithm",
                                                      operand:   format!("base {b}"),
                                                      pos:       op.pos, });
                }
                a.ln() / b.ln()
            },
            _ => return Err(Self::unsupported(op, left, right)),
        };
        Ok(Value::Float(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(kind: TokenKind, left: Value, right: Value) -> EvalResult<Value> {
        Interpreter::eval_power(&Token::new(kind, "op", 4), &left, &right)
    }

    #[test]
    fn roots_need_a_positive_degree() {
        assert_eq!(apply(TokenKind::Root, Value::Int(9), Value::Int(2)).unwrap(),
                   Value::Float(3.0));
        assert!(matches!(apply(TokenKind::Root, Value::Int(16), Value::Int(0)),
                         Err(RuntimeError::Domain { operation: "root", pos: 4, .. })));
        assert!(matches!(apply(TokenKind::Root, Value::Int(16), Value::Float(-0.5)),
                         Err(RuntimeError::Domain { .. })));
    }

    #[test]
    fn logarithms_reject_bad_operands_and_bases() {
        for (a, b) in [(0, 2), (-4, 2), (8, 1), (8, 0)] {
            assert!(matches!(apply(TokenKind::Log, Value::Int(a), Value::Int(b)),
                             Err(RuntimeError::Domain { operation: "logarithm", .. })),
                    "{a} ^^ {b}");
        }
    }

    #[test]
    fn powers_promote_to_float() {
        assert_eq!(apply(TokenKind::Power, Value::Int(2), Value::Int(10)).unwrap(),
                   Value::Float(1024.0));
        assert!(matches!(apply(TokenKind::Power, Value::from("2"), Value::Int(1)),
                         Err(RuntimeError::TypeMismatch { .. })));
    }
}
