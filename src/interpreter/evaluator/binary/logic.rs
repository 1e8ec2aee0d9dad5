use crate::interpreter::{
    evaluator::core::{EvalResult, Interpreter},
    grammar::TokenKind,
    lexer::Token,
    value::Value,
};

impl Interpreter<'_> {
    /// Evaluates `&&` and `||`.
    ///
    /// Operands are booleans or integers, where any non-zero integer counts
    /// as true. Both operands have already been evaluated.
    pub fn eval_logic(op: &Token, left: &Value, right: &Value) -> EvalResult<Value> {
        let (Ok(a), Ok(b)) = (left.truthy(op.pos), right.truthy(op.pos)) else {
            return Err(Self::unsupported(op, left, right));
        };
        match op.kind {
            TokenKind::And => Ok(Value::Bool(a && b)),
            TokenKind::Or => Ok(Value::Bool(a || b)),
            _ => Err(Self::unsupported(op, left, right)),
        }
    }
}
