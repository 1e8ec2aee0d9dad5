use crate::{
    ast::Node,
    error::{ErrorHandler, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        grammar::TokenKind,
        lexer::{Lexer, Token},
        value::Value,
    },
};

impl Interpreter<'_> {
    /// Evaluates a `BinaryOp` node.
    ///
    /// Plain assignments bind the target, compound assignments are desugared
    /// and evaluated as a plain one, and two-operand commands run for their
    /// effect. Operators evaluate both operands and apply the operator
    /// table; an error inside the table is reported and the expression
    /// yields a fallback instead, so the statement keeps running.
    pub(in crate::interpreter::evaluator) fn eval_binary_node(&mut self,
                                                              op: &Token,
                                                              left: &Node,
                                                              right: &Node)
                                                              -> EvalResult<Option<Value>> {
        if op.kind == TokenKind::Assign {
            self.eval_assignment(op, left, right)?;
            return Ok(None);
        }
        if op.kind.is_compound_assignment() {
            let assignment = desugar_compound(op, left, right)?;
            return self.eval(&assignment);
        }
        if op.kind.is_binary_command() {
            self.eval_binary_command(op, left, right)?;
            return Ok(None);
        }

        let left = self.value(left)?;
        let right = self.value(right)?;
        let result = Self::eval_binary(op, &left, &right);
        Ok(Some(self.recover(result, || fallback(op.kind, &left, &right))))
    }

    /// Applies a binary operator to two values.
    ///
    /// Routes to the arithmetic, power, bitwise, comparison, logical and
    /// string handlers by operator and operand types.
    ///
    /// # Example
    /// ```
    /// use kmsl::interpreter::{
    ///     evaluator::Interpreter, grammar::TokenKind, lexer::Token, value::Value,
    /// };
    ///
    /// let divide = Token::new(TokenKind::Divide, "/", 5);
    /// let result = Interpreter::eval_binary(&divide, &Value::Int(3), &Value::Int(2));
    ///
    /// assert_eq!(result.unwrap(), Value::Float(1.5));
    /// ```
    pub fn eval_binary(op: &Token, left: &Value, right: &Value) -> EvalResult<Value> {
        use TokenKind::{
            And, BitAnd, BitOr, BitXor, Divide, Equal, FloorDivide, Greater, GreaterEqual, Less,
            LessEqual, Log, Minus, Modulo, Multiply, NotEqual, Or, Plus, Power, Root, ShiftLeft,
            ShiftRight,
        };

        match op.kind {
            Plus | Minus | Multiply | Divide | FloorDivide | Modulo => match (left, right) {
                (Value::Str(_), _) | (_, Value::Str(_)) => Self::eval_string_op(op, left, right),
                _ => Self::eval_scalar_op(op, left, right),
            },
            Power | Root | Log => Self::eval_power(op, left, right),
            BitAnd | BitOr | BitXor | ShiftLeft | ShiftRight => {
                Self::eval_bitwise(op, left, right)
            },
            And | Or => Self::eval_logic(op, left, right),
            Equal | NotEqual | Less | Greater | LessEqual | GreaterEqual => {
                Self::eval_comparison(op, left, right)
            },
            _ => Err(RuntimeError::mismatch(format!("'{}' is not a binary operator", op.text),
                                            op.pos)),
        }
    }

    /// Binds the value of `right` to the variable `left`.
    ///
    /// The binding visible at the current depth is updated; otherwise a new
    /// one is created at this depth.
    fn eval_assignment(&mut self, op: &Token, left: &Node, right: &Node) -> EvalResult<()> {
        let Node::Variable(target) = left else {
            return Err(RuntimeError::mismatch("can only assign to a variable", op.pos));
        };
        if target.kind != TokenKind::Variable {
            return Err(RuntimeError::mismatch(format!("cannot assign to builtin '{}'",
                                                      target.text),
                                              target.pos));
        }

        let value = self.value(right)?;
        self.variables.assign(&target.text, value, self.depth);
        Ok(())
    }

    /// Builds an error for a pair of operands an operator does not accept.
    pub(in crate::interpreter::evaluator) fn unsupported(op: &Token,
                                                         left: &Value,
                                                         right: &Value)
                                                         -> RuntimeError {
        RuntimeError::mismatch(format!("cannot apply '{}' to {} and {}",
                                       op.text,
                                       left.type_name(),
                                       right.type_name()),
                               op.pos)
    }
}

/// Rewrites `x op= y` as `x = x op y`.
///
/// The base operator is recovered by lexing the compound operator's text
/// without its trailing `=`, so compound and plain operators share one
/// implementation.
pub(in crate::interpreter::evaluator) fn desugar_compound(op: &Token,
                                                          left: &Node,
                                                          right: &Node)
                                                          -> EvalResult<Node> {
    let text = op.text.strip_suffix('=').unwrap_or(&op.text);
    let mut scratch = ErrorHandler::new(text);
    let base = Lexer::new().scan(text, &mut scratch)
                           .into_iter()
                           .next()
                           .filter(|token| token.kind.is_binary_operator() && !scratch.has_errors())
                           .ok_or_else(|| {
                               RuntimeError::mismatch(format!("'{}' has no base operator", op.text),
                                                      op.pos)
                           })?;

    let value = Node::BinaryOp { op:    Token::new(base.kind, base.text, op.pos),
                                 left:  Box::new(left.clone()),
                                 right: Box::new(right.clone()), };
    Ok(Node::BinaryOp { op:    Token::new(TokenKind::Assign, "=", op.pos),
                        left:  Box::new(left.clone()),
                        right: Box::new(value), })
}

/// The value a failed operator evaluates to.
fn fallback(op: TokenKind, left: &Value, right: &Value) -> Value {
    match (left, right) {
        _ if op.is_comparison() => Value::Bool(false),
        (Value::Str(s), _) | (_, Value::Str(s)) if op == TokenKind::Multiply => Value::Str(s.clone()),
        _ => Value::Int(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parser::parse_source;

    #[test]
    fn compound_assignments_desugar_to_plain_operators() {
        let (root, errors) = parse_source("x **= 2");
        assert!(!errors.has_errors());
        let Node::BinaryOp { op, left, right } = &root.statements[0] else {
            panic!("expected an assignment");
        };

        let desugared = desugar_compound(op, left, right).unwrap();
        assert_eq!(desugared.to_source(), "x = (x ** 2)");
        assert_eq!(desugared.pos(), op.pos);
    }

    #[test]
    fn fallbacks_match_the_operator_family() {
        assert_eq!(fallback(TokenKind::Less, &Value::Int(1), &Value::from("a")),
                   Value::Bool(false));
        assert_eq!(fallback(TokenKind::Multiply, &Value::from("ab"), &Value::Int(-1)),
                   Value::from("ab"));
        assert_eq!(fallback(TokenKind::Divide, &Value::Int(1), &Value::Int(0)), Value::Int(0));
    }
}
