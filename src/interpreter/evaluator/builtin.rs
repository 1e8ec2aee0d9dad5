use std::f64::consts::{E, PI};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, service},
        grammar::TokenKind,
        lexer::Token,
        value::Value,
    },
};

impl Interpreter<'_> {
    /// Reads a pseudo-variable.
    ///
    /// `pi` and `euler` are floats; the cursor, clock, `millis` and `random`
    /// are ints queried from the host on every read.
    pub(super) fn eval_builtin(&mut self, token: &Token) -> EvalResult<Value> {
        let value = match token.kind {
            TokenKind::Pi => Value::Float(PI),
            TokenKind::Euler => Value::Float(E),
            TokenKind::GetX => Value::Int(service(self.services.device.cursor(), token.pos)?.0),
            TokenKind::GetY => Value::Int(service(self.services.device.cursor(), token.pos)?.1),
            TokenKind::Millis => Value::Int(self.services.system.millis()),
            TokenKind::Random => Value::Int(self.services.system.random()),
            TokenKind::Year => Value::Int(self.services.system.local_time().year),
            TokenKind::Month => Value::Int(self.services.system.local_time().month),
            TokenKind::Day => Value::Int(self.services.system.local_time().day),
            TokenKind::Hour => Value::Int(self.services.system.local_time().hour),
            TokenKind::Minute => Value::Int(self.services.system.local_time().minute),
            TokenKind::Second => Value::Int(self.services.system.local_time().second),
            _ => {
                return Err(RuntimeError::UnknownVariable { name: token.text.clone(),
                                                           pos:  token.pos, });
            },
        };
        Ok(value)
    }
}
