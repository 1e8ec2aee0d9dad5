use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, service},
        grammar::TokenKind,
        lexer::Token,
        value::Value,
    },
    util::num::f64_to_i64_checked,
};

impl Interpreter<'_> {
    /// Evaluates a `UnaryOp` node.
    ///
    /// Increments and one-operand commands run for their effect. `state`,
    /// `readfile` and `exists` query the host. Every other prefix operator or
    /// function goes through [`Interpreter::eval_unary`]; an error there is
    /// reported and the expression yields a fallback.
    pub(in crate::interpreter::evaluator) fn eval_unary_node(&mut self,
                                                             op: &Token,
                                                             operand: &Node)
                                                             -> EvalResult<Option<Value>> {
        match op.kind {
            TokenKind::Increment | TokenKind::Decrement => {
                self.eval_step(op, operand)?;
                return Ok(None);
            },
            kind if kind.is_unary_command() => {
                self.eval_unary_command(op, operand)?;
                return Ok(None);
            },
            _ => {},
        }

        let value = self.value(operand)?;
        let result = match op.kind {
            TokenKind::State => {
                let button = value.as_str(op.pos)?;
                Value::Bool(service(self.services.device.is_pressed(button), op.pos)?)
            },
            TokenKind::ReadFile => {
                let path = value.as_str(op.pos)?;
                Value::Str(service(self.services.files.read(path), op.pos)?)
            },
            TokenKind::Exists => Value::Bool(self.services.files.exists(value.as_str(op.pos)?)),
            _ => {
                let result = Self::eval_unary(op, &value);
                self.recover(result, || {
                        if op.kind == TokenKind::Not { Value::Bool(false) } else { Value::Int(0) }
                    })
            },
        };
        Ok(Some(result))
    }

    /// Applies a prefix operator or a pure function to a value.
    ///
    /// # Example
    /// ```
    /// use kmsl::interpreter::{
    ///     evaluator::Interpreter, grammar::TokenKind, lexer::Token, value::Value,
    /// };
    ///
    /// let round = Token::new(TokenKind::Round, "round", 5);
    /// let len = Token::new(TokenKind::Len, "len", 3);
    ///
    /// assert_eq!(Interpreter::eval_unary(&round, &Value::Float(2.5)).unwrap(), Value::Int(3));
    /// assert_eq!(Interpreter::eval_unary(&len, &Value::from("héllo")).unwrap(), Value::Int(5));
    /// ```
    pub fn eval_unary(op: &Token, value: &Value) -> EvalResult<Value> {
        use TokenKind::{
            Abs, Acos, Asin, Atan, BitNot, Ceil, Cos, Floor, Len, Ln, Minus, Not, Plus, Round, Sin,
            Sqrt, Tan, ToFloat, ToInt, ToStr,
        };

        let pos = op.pos;
        match (op.kind, value) {
            (Plus, v) if v.is_numeric() => Ok(v.clone()),
            (Minus, Value::Int(n)) => n.checked_neg()
                                       .map(Value::Int)
                                       .ok_or(RuntimeError::Overflow { pos }),
            (Minus, Value::Float(x)) => Ok(Value::Float(-x)),
            (Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
            (Abs, Value::Int(n)) => n.checked_abs()
                                     .map(Value::Int)
                                     .ok_or(RuntimeError::Overflow { pos }),
            (Abs, Value::Float(x)) => Ok(Value::Float(x.abs())),
            (Round | Ceil | Floor, Value::Int(n)) => Ok(Value::Int(*n)),
            (Round, Value::Float(x)) => f64_to_i64_checked(x.round(), pos).map(Value::Int),
            (Ceil, Value::Float(x)) => f64_to_i64_checked(x.ceil(), pos).map(Value::Int),
            (Floor, Value::Float(x)) => f64_to_i64_checked(x.floor(), pos).map(Value::Int),
            (Sin | Cos | Tan | Asin | Acos | Atan | Sqrt | Ln, v) if v.is_numeric() => {
                math(op, v.as_float(pos)?).map(Value::Float)
            },
            (ToInt, v) => to_int(v, pos).map(Value::Int),
            (ToFloat, v) => to_float(v, pos).map(Value::Float),
            (ToStr, v) => Ok(Value::Str(v.to_string())),
            (Len, Value::Str(s)) => {
                i64::try_from(s.chars().count()).map(Value::Int)
                                                .map_err(|_| RuntimeError::Overflow { pos })
            },
            (_, v) => Err(RuntimeError::mismatch(format!("cannot apply '{}' to {}",
                                                         op.text,
                                                         v.type_name()),
                                                 pos)),
        }
    }

    /// `x++` and `x--` on an int or float variable, in place.
    fn eval_step(&mut self, op: &Token, operand: &Node) -> EvalResult<()> {
        let Node::Variable(target) = operand else {
            return Err(RuntimeError::mismatch(format!("'{}' needs a variable", op.text), op.pos));
        };
        let handle = self.handle(target)?;
        let Some(variable) = self.variables.get_mut(handle) else {
            return Err(RuntimeError::UnknownVariable { name: target.text.clone(),
                                                       pos:  target.pos, });
        };

        let delta: i32 = if op.kind == TokenKind::Increment { 1 } else { -1 };
        variable.value = match &variable.value {
            Value::Int(n) => Value::Int(n.checked_add(i64::from(delta))
                                         .ok_or(RuntimeError::Overflow { pos: op.pos })?),
            Value::Float(x) => Value::Float(x + f64::from(delta)),
            other => {
                return Err(RuntimeError::mismatch(format!("cannot apply '{}' to {}",
                                                          op.text,
                                                          other.type_name()),
                                                  op.pos));
            },
        };
        Ok(())
    }
}

/// The trigonometric functions, `sqrt` and `ln`.
fn math(op: &Token, x: f64) -> EvalResult<f64> {
    let domain = |operation| RuntimeError::Domain { operation,
                                                    operand: x.to_string(),
                                                    pos: op.pos };
    match op.kind {
        TokenKind::Sin => Ok(x.sin()),
        TokenKind::Cos => Ok(x.cos()),
        TokenKind::Tan => Ok(x.tan()),
        TokenKind::Asin if (-1.0..=1.0).contains(&x) => Ok(x.asin()),
        TokenKind::Acos if (-1.0..=1.0).contains(&x) => Ok(x.acos()),
        TokenKind::Asin | TokenKind::Acos => Err(domain("inverse sine or cosine")),
        TokenKind::Atan => Ok(x.atan()),
        TokenKind::Sqrt if x >= 0.0 => Ok(x.sqrt()),
        TokenKind::Sqrt => Err(domain("square root")),
        TokenKind::Ln if x > 0.0 => Ok(x.ln()),
        TokenKind::Ln => Err(domain("logarithm")),
        _ => Err(RuntimeError::mismatch(format!("'{}' is not a math function", op.text), op.pos)),
    }
}

/// `int`: truncates floats, maps booleans to 0 and 1 and parses strings.
fn to_int(value: &Value, pos: usize) -> EvalResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Float(x) => f64_to_i64_checked(x.trunc(), pos),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Str(s) => s.trim().parse().map_err(|_| {
            RuntimeError::mismatch(format!("cannot convert \"{s}\" to an int"), pos)
        }),
    }
}

/// `float`: widens ints exactly, maps booleans to 0 and 1 and parses
/// strings.
fn to_float(value: &Value, pos: usize) -> EvalResult<f64> {
    match value {
        Value::Int(_) | Value::Float(_) => value.as_float(pos),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        Value::Str(s) => s.trim().parse().map_err(|_| {
            RuntimeError::mismatch(format!("cannot convert \"{s}\" to a float"), pos)
        }),
    }
}
