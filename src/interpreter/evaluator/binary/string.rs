use crate::{
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        grammar::TokenKind,
        lexer::Token,
        value::Value,
    },
    util::num::{repetition_count_checked, string_len_checked},
};

impl Interpreter<'_> {
    /// Evaluates arithmetic operators with a string operand.
    ///
    /// Two strings concatenate with `+`; a string and an int in either
    /// order repeat the string with `*`. Results longer than
    /// [`MAX_STRING_LEN`](crate::util::num::MAX_STRING_LEN) bytes are
    /// refused. Everything else is a type mismatch.
    ///
    /// # Example
    /// ```
    /// use kmsl::interpreter::{
    ///     evaluator::Interpreter, grammar::TokenKind, lexer::Token, value::Value,
    /// };
    ///
    /// let times = Token::new(TokenKind::Multiply, "*", 8);
    ///
    /// assert_eq!(Interpreter::eval_string_op(&times, &Value::Int(3), &Value::from("hi")).unwrap(),
    ///            Value::from("hihihi"));
    /// assert!(Interpreter::eval_string_op(&times, &Value::from("hi"), &Value::Int(-1)).is_err());
    /// ```
    pub fn eval_string_op(op: &Token, left: &Value, right: &Value) -> EvalResult<Value> {
        match (op.kind, left, right) {
            (TokenKind::Plus, Value::Str(a), Value::Str(b)) => {
                string_len_checked(a.len().checked_add(b.len()), op.pos)?;
                Ok(Value::Str(format!("{a}{b}")))
            },
            (TokenKind::Multiply, Value::Str(s), Value::Int(n))
            | (TokenKind::Multiply, Value::Int(n), Value::Str(s)) => {
                let count = repetition_count_checked(*n, s.len(), op.pos)?;
                Ok(Value::Str(s.repeat(count)))
            },
            _ => Err(Self::unsupported(op, left, right)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RuntimeError, util::num::MAX_STRING_LEN};

    fn apply(kind: TokenKind, left: Value, right: Value) -> EvalResult<Value> {
        Interpreter::eval_string_op(&Token::new(kind, "op", 2), &left, &right)
    }

    #[test]
    fn repetition_is_limited_by_the_resulting_length() {
        assert_eq!(apply(TokenKind::Multiply, Value::from("ab"), Value::Int(0)).unwrap(),
                   Value::from(""));
        assert!(matches!(apply(TokenKind::Multiply, Value::from("ab"), Value::Int(i64::MAX)),
                         Err(RuntimeError::StringTooLong { pos: 2, .. })));
        assert!(matches!(apply(TokenKind::Multiply, Value::Int(100_000_000_000), Value::from("a")),
                         Err(RuntimeError::StringTooLong { .. })));
        assert!(apply(TokenKind::Multiply, Value::from(""), Value::Int(i64::MAX)).is_ok());
    }

    #[test]
    fn concatenation_is_limited_by_the_resulting_length() {
        assert_eq!(apply(TokenKind::Plus, Value::from("ab"), Value::from("cd")).unwrap(),
                   Value::from("abcd"));
        assert_eq!(string_len_checked(Some(MAX_STRING_LEN), 0).unwrap(), MAX_STRING_LEN);
        assert!(string_len_checked(Some(MAX_STRING_LEN + 1), 0).is_err());
        assert!(string_len_checked(None, 0).is_err());
    }
}
