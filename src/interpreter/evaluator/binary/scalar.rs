use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        grammar::TokenKind,
        lexer::Token,
        value::Value,
    },
    util::num::f64_to_i64_checked,
};

impl Interpreter<'_> {
    /// Evaluates `+ - * / // %` on numbers.
    ///
    /// Two integers stay integers, except for `/` which always yields a
    /// float. Integer arithmetic is checked and overflow is an error. Any
    /// float operand makes the result a float, apart from `//` which floors
    /// to an int. `%` is only defined on integers.
    ///
    /// # Example
    /// ```
    /// use kmsl::interpreter::{
    ///     evaluator::Interpreter, grammar::TokenKind, lexer::Token, value::Value,
    /// };
    ///
    /// let floor = Token::new(TokenKind::FloorDivide, "//", 4);
    ///
    /// assert_eq!(Interpreter::eval_scalar_op(&floor, &Value::Int(-7), &Value::Int(2)).unwrap(),
    ///            Value::Int(-4));
    /// assert!(Interpreter::eval_scalar_op(&floor, &Value::Int(1), &Value::Int(0)).is_err());
    /// ```
    pub fn eval_scalar_op(op: &Token, left: &Value, right: &Value) -> EvalResult<Value> {
        use TokenKind::{Divide, FloorDivide, Minus, Modulo, Multiply, Plus};

        match (left, right) {
            (Value::Int(a), Value::Int(b)) => {
                let (a, b) = (*a, *b);
                let checked = match op.kind {
                    Plus => a.checked_add(b),
                    Minus => a.checked_sub(b),
                    Multiply => a.checked_mul(b),
                    Divide => return Self::divide(op, left, right),
                    FloorDivide => {
                        if b == 0 {
                            return Err(RuntimeError::DivisionByZero { pos: op.pos });
                        }
                        floor_div(a, b)
                    },
                    Modulo => {
                        if b == 0 {
                            return Err(RuntimeError::DivisionByZero { pos: op.pos });
                        }
                        a.checked_rem(b)
                    },
                    _ => return Err(Self::unsupported(op, left, right)),
                };
                checked.map(Value::Int).ok_or(RuntimeError::Overflow { pos: op.pos })
            },
            (l, r) if l.is_numeric() && r.is_numeric() => {
                let a = l.as_float(op.pos)?;
                let b = r.as_float(op.pos)?;
                match op.kind {
                    Plus => Ok(Value::Float(a + b)),
                    Minus => Ok(Value::Float(a - b)),
                    Multiply => Ok(Value::Float(a * b)),
                    Divide => Self::divide(op, left, right),
                    FloorDivide => {
                        if b == 0.0 {
                            return Err(RuntimeError::DivisionByZero { pos: op.pos });
                        }
                        f64_to_i64_checked((a / b).floor(), op.pos).map(Value::Int)
                    },
                    _ => Err(Self::unsupported(op, left, right)),
                }
            },
            _ => Err(Self::unsupported(op, left, right)),
        }
    }

    fn divide(op: &Token, left: &Value, right: &Value) -> EvalResult<Value> {
        let a = left.as_float(op.pos)?;
        let b = right.as_float(op.pos)?;
        if b == 0.0 {
            return Err(RuntimeError::DivisionByZero { pos: op.pos });
        }
        Ok(Value::Float(a / b))
    }
}

/// Integer division rounding toward negative infinity.
const fn floor_div(a: i64, b: i64) -> Option<i64> {
    let Some(quotient) = a.checked_div(b) else {
        return None;
    };
    if a % b != 0 && (a < 0) != (b < 0) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}
