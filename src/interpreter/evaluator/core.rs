use log::debug;

use crate::{
    ast::{Block, CommandKind, Node},
    error::{ErrorHandler, RuntimeError},
    interpreter::{
        grammar::TokenKind,
        lexer::Token,
        value::{VarHandle, Value, Variables},
    },
    io::{ServiceResult, Services},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The run-control flags set by `break`, `continue` and `exit`.
///
/// `break` is cleared by the innermost loop, `continue` by the innermost
/// loop after the current pass of its body, and `exit` is never cleared: it
/// stops every enclosing block until execution returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunControl {
    pub break_requested:    bool,
    pub continue_requested: bool,
    pub exit_requested:     bool,
}

impl RunControl {
    /// Whether the current block must stop running statements.
    #[must_use]
    pub const fn interrupted(&self) -> bool {
        self.break_requested || self.continue_requested || self.exit_requested
    }
}

/// A tree-walking interpreter over borrowed program state.
///
/// The interpreter owns nothing that outlives a run: variables, services
/// and the diagnostic sink belong to the caller, so an interactive session
/// can hand the same store to every submission.
///
/// ## Depth
///
/// Every block raises the depth by one while it runs and removes the
/// bindings it created when it closes. A binding is visible while the
/// current depth is at least its own. The root block of a program runs at
/// depth one.
pub struct Interpreter<'a> {
    pub(super) variables:     &'a mut Variables,
    pub(super) services:      &'a mut Services,
    pub(super) errors:        &'a mut ErrorHandler,
    pub(super) depth:         usize,
    pub(super) control:       RunControl,
    pub(super) interactive:   bool,
    pub(super) strict_lexing: bool,
    pub(super) nesting:       usize,
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter in batch mode with strict lexing for nested
    /// programs.
    pub fn new(variables: &'a mut Variables,
               services: &'a mut Services,
               errors: &'a mut ErrorHandler)
               -> Self {
        Self { variables,
               services,
               errors,
               depth: 0,
               control: RunControl::default(),
               interactive: false,
               strict_lexing: true,
               nesting: 0 }
    }

    /// Echoes the value of top-level expression statements when set.
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Sets whether programs run by `do` report unmatched characters.
    #[must_use]
    pub const fn strict_lexing(mut self, strict: bool) -> Self {
        self.strict_lexing = strict;
        self
    }

    /// The run-control flags as they stand.
    #[must_use]
    pub const fn control(&self) -> RunControl {
        self.control
    }

    /// Executes a program's root block.
    ///
    /// Runtime errors are reported to the diagnostic sink statement by
    /// statement; execution always continues with the next statement unless
    /// `exit` ran. Bindings created directly in the root block survive the
    /// call.
    ///
    /// # Example
    /// ```
    /// use kmsl::{
    ///     interpreter::{evaluator::Interpreter, parser::parse_source, value::{Value, Variables}},
    ///     io::{Recorder, Services},
    /// };
    ///
    /// let recorder = Recorder::new();
    /// let mut services = Services::recording(&recorder);
    /// let mut variables = Variables::default();
    ///
    /// let (root, mut errors) = parse_source("a = 3 / 2\nprint a");
    /// Interpreter::new(&mut variables, &mut services, &mut errors).execute(&root);
    ///
    /// assert!(!errors.has_errors());
    /// assert_eq!(recorder.output(), ["1.5"]);
    /// assert_eq!(variables.lookup("a", 1).and_then(|h| variables.get(h)).map(|v| &v.value),
    ///            Some(&Value::Float(1.5)));
    /// ```
    pub fn execute(&mut self, root: &Block) {
        self.exec_block(root);
        if self.control.exit_requested {
            debug!("exit requested");
        }
    }

    /// Runs a block one level deeper.
    ///
    /// Stops before the next statement once any run-control flag is set,
    /// leaving the flag for the enclosing loop or program to observe.
    pub(super) fn exec_block(&mut self, block: &Block) {
        self.depth += 1;
        for statement in &block.statements {
            if self.control.interrupted() {
                break;
            }
            self.exec_statement(statement);
        }
        self.variables.prune_deeper_than(self.depth);
        self.depth -= 1;
    }

    /// Runs one statement and reports its error, if any.
    fn exec_statement(&mut self, statement: &Node) {
        match self.eval(statement) {
            Ok(Some(value)) if self.echoes(statement) => {
                if let Err(error) = service(self.services.console.write_line(&value.to_string()),
                                            statement.pos())
                {
                    self.errors.report(error);
                }
            },
            Ok(_) => {},
            Err(error) => self.errors.report(error),
        }
    }

    fn echoes(&self, statement: &Node) -> bool {
        self.interactive && self.depth == 1 && statement.is_expression()
    }

    /// Evaluates a node.
    ///
    /// Expressions produce `Some(value)`; statements run for their effect
    /// and produce `None`.
    pub fn eval(&mut self, node: &Node) -> EvalResult<Option<Value>> {
        match node {
            Node::Block(block) => {
                self.exec_block(block);
                self.settle();
                Ok(None)
            },
            Node::Literal(token) => Self::eval_literal(token).map(Some),
            Node::Variable(token) => self.eval_variable(token).map(Some),
            Node::UnaryOp { op, operand } => self.eval_unary_node(op, operand),
            Node::BinaryOp { op, left, right } => self.eval_binary_node(op, left, right),
            Node::If { token,
                       condition,
                       then_block,
                       else_block, } => {
                self.eval_if(token, condition, then_block, else_block.as_ref())?;
                Ok(None)
            },
            Node::While { token,
                          condition,
                          body, } => {
                self.eval_while(token, condition, body)?;
                Ok(None)
            },
            Node::For { token,
                        initializer,
                        condition,
                        increment,
                        body, } => {
                self.eval_for(token, initializer, condition, increment, body)?;
                Ok(None)
            },
            Node::KeyAction { token,
                              kind,
                              buttons,
                              duration, } => {
                self.eval_key_action(token, *kind, buttons, duration.as_deref())?;
                Ok(None)
            },
            Node::MouseAction { token,
                                kind,
                                x,
                                y,
                                time, } => {
                self.eval_mouse_action(token, *kind, x, y.as_deref(), time.as_deref())?;
                Ok(None)
            },
            Node::Command { kind, .. } => {
                match kind {
                    CommandKind::Break => self.control.break_requested = true,
                    CommandKind::Continue => self.control.continue_requested = true,
                    CommandKind::Exit => self.control.exit_requested = true,
                }
                Ok(None)
            },
        }
    }

    /// Evaluates an expression that must produce a value.
    pub(super) fn value(&mut self, node: &Node) -> EvalResult<Value> {
        self.eval(node)?
            .ok_or_else(|| RuntimeError::mismatch("expected a value, found a statement", node.pos()))
    }

    /// Removes bindings left behind by a compound statement that just
    /// completed at the current depth.
    pub(super) fn settle(&mut self) {
        self.variables.prune_deeper_than(self.depth);
    }

    /// Converts a literal token to a value.
    pub(super) fn eval_literal(token: &Token) -> EvalResult<Value> {
        match token.kind {
            TokenKind::Int => {
                token.text
                     .parse()
                     .map(Value::Int)
                     .map_err(|_| RuntimeError::LiteralTooLarge { value: token.text.clone(),
                                                                  pos:   token.pos, })
            },
            TokenKind::Float => token.text.parse().map(Value::Float).map_err(|_| {
                RuntimeError::mismatch(format!("invalid float literal '{}'", token.text),
                                       token.pos)
            }),
            TokenKind::Bool => Ok(Value::Bool(token.text == "true")),
            _ => Ok(Value::Str(token.text.clone())),
        }
    }

    /// Reads a variable or a builtin pseudo-variable.
    fn eval_variable(&mut self, token: &Token) -> EvalResult<Value> {
        if token.kind.is_builtin_variable() {
            return self.eval_builtin(token);
        }
        let handle = self.handle(token)?;
        self.variables
            .get(handle)
            .map(|variable| variable.value.clone())
            .ok_or_else(|| RuntimeError::UnknownVariable { name: token.text.clone(),
                                                           pos:  token.pos, })
    }

    /// Finds the binding a variable token refers to at the current depth.
    pub(super) fn handle(&self, token: &Token) -> EvalResult<VarHandle> {
        self.variables
            .lookup(&token.text, self.depth)
            .ok_or_else(|| RuntimeError::UnknownVariable { name: token.text.clone(),
                                                           pos:  token.pos, })
    }

    /// Reports a failed operator and substitutes its fallback value.
    pub(super) fn recover(&mut self,
                          result: EvalResult<Value>,
                          fallback: impl FnOnce() -> Value)
                          -> Value {
        result.unwrap_or_else(|error| {
                  self.errors.report(error);
                  fallback()
              })
    }
}

/// Attaches a source position to a failed service call.
pub(super) fn service<T>(result: ServiceResult<T>, pos: usize) -> EvalResult<T> {
    result.map_err(|source| RuntimeError::Service { source, pos })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::{
        error::DiagnosticKind,
        interpreter::parser::parse_source,
        io::Recorder,
    };

    fn run(source: &str) -> (Recorder, Variables, ErrorHandler) {
        let recorder = Recorder::new();
        let mut services = Services::recording(&recorder);
        let mut variables = Variables::default();
        let (root, mut errors) = parse_source(source);
        assert!(!errors.has_errors(), "{}", errors.render());

        Interpreter::new(&mut variables, &mut services, &mut errors).execute(&root);
        (recorder, variables, errors)
    }

    #[test]
    fn block_bindings_are_pruned_when_the_block_closes() {
        let (_, variables, errors) = run(indoc! {"
            outer = 1
            if true {
                inner = 2
                outer = 3
            }
        "});

        assert!(!errors.has_errors());
        let names: Vec<_> = variables.iter().map(|v| (v.name.as_str(), v.depth)).collect();
        assert_eq!(names, [("outer", 1)]);
        assert_eq!(variables.iter().next().map(|v| &v.value), Some(&Value::Int(3)));
    }

    #[test]
    fn runtime_errors_abort_only_their_statement() {
        let (recorder, _, errors) = run(indoc! {"
            print missing
            print \"after\"
        "});

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.diagnostics()[0].kind, DiagnosticKind::Runtime);
        assert_eq!(recorder.output(), ["after"]);
    }

    #[test]
    fn exit_stops_every_enclosing_block() {
        let (recorder, _, _) = run(indoc! {"
            while true {
                if true { exit }
                print \"unreachable\"
            }
            print \"also unreachable\"
        "});

        assert!(recorder.output().is_empty());
    }

    #[test]
    fn statements_produce_no_value() {
        let recorder = Recorder::new();
        let mut services = Services::recording(&recorder);
        let mut variables = Variables::default();
        let mut errors = ErrorHandler::default();
        let (root, _) = parse_source("x = 1");

        let mut interpreter = Interpreter::new(&mut variables, &mut services, &mut errors);
        assert!(interpreter.value(&root.statements[0]).is_err());
    }
}
