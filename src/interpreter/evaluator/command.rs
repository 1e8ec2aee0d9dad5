use log::debug;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter, service},
        grammar::TokenKind,
        lexer::Token,
        value::Value,
    },
    io::ServiceError,
};

impl Interpreter<'_> {
    /// Runs `print`, `input`, `wait`, `os`, `do`, `createfile`,
    /// `removefile` or `createdir`.
    pub(super) fn eval_unary_command(&mut self, op: &Token, operand: &Node) -> EvalResult<()> {
        let pos = op.pos;
        match op.kind {
            TokenKind::Print => {
                let value = self.value(operand)?;
                service(self.services.console.write_line(&value.to_string()), pos)
            },
            TokenKind::Input => self.eval_input(op, operand),
            TokenKind::Wait => {
                let duration = self.value(operand)?.as_seconds(pos)?;
                self.services.system.sleep(duration);
                Ok(())
            },
            TokenKind::Os => {
                let command = self.string_operand(operand, pos)?;
                let code = service(self.services.system.run_command(&command), pos)?;
                debug!("os '{command}' exited with {code}");
                Ok(())
            },
            TokenKind::Do => {
                let code = self.string_operand(operand, pos)?;
                self.run_nested(op, &code);
                Ok(())
            },
            TokenKind::CreateFile => {
                let path = self.string_operand(operand, pos)?;
                service(self.services.files.create(&path), pos)
            },
            TokenKind::RemoveFile => {
                let path = self.string_operand(operand, pos)?;
                service(self.services.files.remove(&path), pos)
            },
            TokenKind::CreateDir => {
                let path = self.string_operand(operand, pos)?;
                service(self.services.files.create_dir(&path), pos)
            },
            _ => Err(RuntimeError::mismatch(format!("'{}' is not a command", op.text), pos)),
        }
    }

    /// Runs `type`, `writefile`, `appendfile`, `copy` or `rename`.
    pub(super) fn eval_binary_command(&mut self,
                                      op: &Token,
                                      left: &Node,
                                      right: &Node)
                                      -> EvalResult<()> {
        let pos = op.pos;
        if op.kind == TokenKind::Type {
            return self.eval_type(op, left, right);
        }

        let first = self.string_operand(left, pos)?;
        let second = self.string_operand(right, pos)?;
        let files = &mut self.services.files;
        let result = match op.kind {
            TokenKind::WriteFile => files.write(&first, &second),
            TokenKind::AppendFile => files.append(&first, &second),
            TokenKind::Copy => files.copy(&first, &second),
            TokenKind::Rename => files.rename(&first, &second),
            _ => {
                return Err(RuntimeError::mismatch(format!("'{}' is not a command", op.text), pos));
            },
        };
        service(result, pos)
    }

    /// Reads one console line into an existing variable.
    ///
    /// The line is converted to the type the variable currently holds.
    fn eval_input(&mut self, op: &Token, operand: &Node) -> EvalResult<()> {
        let Node::Variable(target) = operand else {
            return Err(RuntimeError::mismatch("input needs a variable", op.pos));
        };
        let handle = self.handle(target)?;
        let line = service(self.services.console.read_line(), op.pos)?
            .ok_or(RuntimeError::Service { source: ServiceError::InputClosed,
                                           pos:    op.pos, })?;

        let Some(variable) = self.variables.get_mut(handle) else {
            return Err(RuntimeError::UnknownVariable { name: target.text.clone(),
                                                       pos:  target.pos, });
        };
        variable.value = parse_input(&line, &variable.value, op.pos)?;
        Ok(())
    }

    /// Evaluates an operand that must be a string.
    pub(super) fn string_operand(&mut self, operand: &Node, pos: usize) -> EvalResult<String> {
        match self.value(operand)? {
            Value::Str(s) => Ok(s),
            other => Err(RuntimeError::mismatch(format!("expected a string, found {}",
                                                        other.type_name()),
                                                pos)),
        }
    }
}

/// Reads `line` as a value of the same type as `current`.
fn parse_input(line: &str, current: &Value, pos: usize) -> EvalResult<Value> {
    let trimmed = line.trim();
    let parsed = match current {
        Value::Int(_) => trimmed.parse().ok().map(Value::Int),
        Value::Float(_) => trimmed.parse().ok().map(Value::Float),
        Value::Bool(_) => match trimmed.to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Str(_) => Some(Value::Str(line.to_string())),
    };
    parsed.ok_or_else(|| RuntimeError::InvalidInput { input: line.to_string(),
                                                      expected: current.type_name(),
                                                      pos })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_keeps_the_variable_type() {
        assert_eq!(parse_input(" 12 ", &Value::Int(0), 1).unwrap(), Value::Int(12));
        assert_eq!(parse_input("2.5", &Value::Float(0.0), 1).unwrap(), Value::Float(2.5));
        assert_eq!(parse_input("TRUE", &Value::Bool(false), 1).unwrap(), Value::Bool(true));
        assert_eq!(parse_input(" as is ", &Value::from(""), 1).unwrap(), Value::from(" as is "));
    }

    #[test]
    fn unreadable_input_names_the_expected_type() {
        let error = parse_input("abc", &Value::Int(0), 7).unwrap_err();
        assert_eq!(error.to_string(), "cannot read 'abc' as int");
        assert_eq!(error.pos(), 7);
    }
}
