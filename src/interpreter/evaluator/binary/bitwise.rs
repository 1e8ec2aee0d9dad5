use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        grammar::TokenKind,
        lexer::Token,
        value::Value,
    },
    util::num::shift_amount_checked,
};

impl Interpreter<'_> {
    /// Evaluates `& | ^ << >>` on two integers.
    ///
    /// Shift amounts must lie in `0..64`, and a left shift that drops set
    /// bits is an overflow.
    pub fn eval_bitwise(op: &Token, left: &Value, right: &Value) -> EvalResult<Value> {
        let (Value::Int(a), Value::Int(b)) = (left, right) else {
            return Err(Self::unsupported(op, left, right));
        };
        let (a, b) = (*a, *b);

        let result = match op.kind {
            TokenKind::BitAnd => a & b,
            TokenKind::BitOr => a | b,
            TokenKind::BitXor => a ^ b,
            TokenKind::ShiftLeft => {
                let amount = shift_amount_checked(b, op.pos)?;
                let shifted = a << amount;
                if shifted >> amount != a {
                    return Err(RuntimeError::Overflow { pos: op.pos });
                }
                shifted
            },
            TokenKind::ShiftRight => a >> shift_amount_checked(b, op.pos)?,
            _ => return Err(Self::unsupported(op, left, right)),
        };
        Ok(Value::Int(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(kind: TokenKind, a: i64, b: i64) -> EvalResult<Value> {
        Interpreter::eval_bitwise(&Token::new(kind, "op", 2), &Value::Int(a), &Value::Int(b))
    }

    #[test]
    fn integer_bit_operations() {
        assert_eq!(apply(TokenKind::BitAnd, 0b1100, 0b1010).unwrap(), Value::Int(0b1000));
        assert_eq!(apply(TokenKind::BitXor, 0b1100, 0b1010).unwrap(), Value::Int(0b0110));
        assert_eq!(apply(TokenKind::ShiftLeft, 3, 4).unwrap(), Value::Int(48));
        assert_eq!(apply(TokenKind::ShiftRight, -16, 2).unwrap(), Value::Int(-4));
    }

    #[test]
    fn shifts_are_range_checked() {
        assert!(matches!(apply(TokenKind::ShiftLeft, 1, 64), Err(RuntimeError::Domain { .. })));
        assert!(matches!(apply(TokenKind::ShiftRight, 1, -1), Err(RuntimeError::Domain { .. })));
        assert!(matches!(apply(TokenKind::ShiftLeft, i64::MAX, 1),
                         Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn floats_have_no_bits() {
        let op = Token::new(TokenKind::BitOr, "|", 2);
        assert!(Interpreter::eval_bitwise(&op, &Value::Float(1.0), &Value::Int(1)).is_err());
    }
}
