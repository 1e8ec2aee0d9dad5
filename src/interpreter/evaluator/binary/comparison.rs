use std::cmp::Ordering;

use crate::interpreter::{
    evaluator::core::{EvalResult, Interpreter},
    grammar::TokenKind,
    lexer::Token,
    value::Value,
};

impl Interpreter<'_> {
    /// Evaluates `== != < > <= >=`.
    ///
    /// Numbers compare by value across int and float, booleans with `false`
    /// before `true`, and strings lexicographically by bytes. Comparing
    /// values of different kinds is a type mismatch.
    ///
    /// # Example
    /// ```
    /// use kmsl::interpreter::{
    ///     evaluator::Interpreter, grammar::TokenKind, lexer::Token, value::Value,
    /// };
    ///
    /// let less = Token::new(TokenKind::Less, "<", 1);
    ///
    /// assert_eq!(Interpreter::eval_comparison(&less, &Value::Int(1), &Value::Float(1.5)).unwrap(),
    ///            Value::Bool(true));
    /// assert_eq!(Interpreter::eval_comparison(&less, &Value::from("b"), &Value::from("a")).unwrap(),
    ///            Value::Bool(false));
    /// ```
    pub fn eval_comparison(op: &Token, left: &Value, right: &Value) -> EvalResult<Value> {
        let ordering = match (left, right) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (l, r) if l.is_numeric() && r.is_numeric() => {
                l.as_float(op.pos)?.partial_cmp(&r.as_float(op.pos)?)
            },
            _ => return Err(Self::unsupported(op, left, right)),
        };

        // NaN is unordered: only `!=` holds.
        let Some(ordering) = ordering else {
            return Ok(Value::Bool(op.kind == TokenKind::NotEqual));
        };
        let holds = match op.kind {
            TokenKind::Equal => ordering == Ordering::Equal,
            TokenKind::NotEqual => ordering != Ordering::Equal,
            TokenKind::Less => ordering == Ordering::Less,
            TokenKind::Greater => ordering == Ordering::Greater,
            TokenKind::LessEqual => ordering != Ordering::Greater,
            TokenKind::GreaterEqual => ordering != Ordering::Less,
            _ => return Err(Self::unsupported(op, left, right)),
        };
        Ok(Value::Bool(holds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(kind: TokenKind, left: Value, right: Value) -> EvalResult<Value> {
        Interpreter::eval_comparison(&Token::new(kind, "op", 1), &left, &right)
    }

    #[test]
    fn mixed_numbers_compare_by_value() {
        assert_eq!(compare(TokenKind::Equal, Value::Int(2), Value::Float(2.0)).unwrap(),
                   Value::Bool(true));
        assert_eq!(compare(TokenKind::GreaterEqual, Value::Float(1.9), Value::Int(2)).unwrap(),
                   Value::Bool(false));
    }

    #[test]
    fn nan_is_only_unequal() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(compare(TokenKind::Equal, nan.clone(), nan.clone()).unwrap(), Value::Bool(false));
        assert_eq!(compare(TokenKind::NotEqual, nan.clone(), nan).unwrap(), Value::Bool(true));
    }

    #[test]
    fn kinds_do_not_mix() {
        assert!(compare(TokenKind::Equal, Value::from("1"), Value::Int(1)).is_err());
        assert!(compare(TokenKind::Less, Value::Bool(true), Value::Int(1)).is_err());
        assert_eq!(compare(TokenKind::Less, Value::Bool(false), Value::Bool(true)).unwrap(),
                   Value::Bool(true));
    }
}
