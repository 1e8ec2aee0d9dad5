use crate::{
    ast::{Block, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        lexer::Token,
        value::Value,
    },
};

impl Interpreter<'_> {
    /// Runs one branch of an `if`.
    pub(super) fn eval_if(&mut self,
                          token: &Token,
                          condition: &Node,
                          then_block: &Block,
                          else_block: Option<&Block>)
                          -> EvalResult<()> {
        if self.condition("if", token, condition)? {
            self.exec_block(then_block);
        } else if let Some(block) = else_block {
            self.exec_block(block);
        }
        self.settle();
        Ok(())
    }

    pub(super) fn eval_while(&mut self,
                             token: &Token,
                             condition: &Node,
                             body: &Block)
                             -> EvalResult<()> {
        let result = self.run_loop("while", token, condition, body, None, self.depth);
        self.settle();
        result
    }

    /// Runs a `for` loop.
    ///
    /// The initializer, condition and increment run one level deeper than
    /// the loop, and so does the body, which therefore shares the loop
    /// variable's level. Everything created at that level is removed when
    /// the loop completes.
    pub(super) fn eval_for(&mut self,
                           token: &Token,
                           initializer: &Node,
                           condition: &Node,
                           increment: &Node,
                           body: &Block)
                           -> EvalResult<()> {
        let outer = self.depth;
        self.depth += 1;
        let result = self.eval(initializer).and_then(|_| {
                                               self.run_loop("for",
                                                             token,
                                                             condition,
                                                             body,
                                                             Some(increment),
                                                             outer)
                                           });
        self.depth = outer;
        self.settle();
        result
    }

    /// Runs `body` while `condition` holds.
    ///
    /// The body block is entered from `body_from`. After every pass the
    /// `continue` flag is cleared; a `break` is cleared and ends the loop,
    /// and an `exit` ends it without being cleared. `step` runs after each
    /// pass that did not end the loop.
    fn run_loop(&mut self,
                construct: &'static str,
                token: &Token,
                condition: &Node,
                body: &Block,
                step: Option<&Node>,
                body_from: usize)
                -> EvalResult<()> {
        while self.condition(construct, token, condition)? {
            let depth = std::mem::replace(&mut self.depth, body_from);
            self.exec_block(body);
            self.depth = depth;

            self.control.continue_requested = false;
            if self.control.break_requested {
                self.control.break_requested = false;
                break;
            }
            if self.control.exit_requested {
                break;
            }
            if let Some(step) = step {
                self.eval(step)?;
            }
        }
        Ok(())
    }

    /// Evaluates a condition, which must be a boolean.
    fn condition(&mut self,
                 construct: &'static str,
                 token: &Token,
                 condition: &Node)
                 -> EvalResult<bool> {
        match self.value(condition)? {
            Value::Bool(holds) => Ok(holds),
            other => Err(RuntimeError::NonBooleanCondition { construct,
                                                             found: other.type_name(),
                                                             pos: token.pos }),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::{
        error::ErrorHandler,
        interpreter::{evaluator::Interpreter, parser::parse_source, value::Variables},
        io::{Recorder, Services},
    };

    fn printed(source: &str) -> (Vec<String>, ErrorHandler) {
        let recorder = Recorder::new();
        let mut services = Services::recording(&recorder);
        let mut variables = Variables::default();
        let (root, mut errors) = parse_source(source);
        assert!(!errors.has_errors(), "{}", errors.render());

        Interpreter::new(&mut variables, &mut services, &mut errors).execute(&root);
        (recorder.output(), errors)
    }

    #[test]
    fn for_loops_break_and_continue() {
        let (output, errors) = printed(indoc! {"
            for (i = 0, i < 6, i++) {
                if (i == 1) { continue }
                if (i == 4) { break }
                print i
            }
        "});

        assert!(!errors.has_errors());
        assert_eq!(output, ["0", "2", "3"]);
    }

    #[test]
    fn nested_loops_clear_only_their_own_break() {
        let (output, _) = printed(indoc! {"
            for (i = 0, i < 2, i++) {
                j = 0
                while true {
                    if j == 2 { break }
                    print i * 10 + j
                    j++
                }
            }
        "});

        assert_eq!(output, ["0", "1", "10", "11"]);
    }

    #[test]
    fn loop_variables_do_not_outlive_the_loop() {
        let (output, errors) = printed(indoc! {"
            for (k = 0, k < 1, k++) { }
            print k
        "});

        assert!(output.is_empty());
        assert_eq!(errors.diagnostics()[0].message, "unknown variable 'k'");
    }

    #[test]
    fn non_boolean_conditions_fail_at_run_time() {
        let (output, errors) = printed("n = 1\nwhile n { n = 0 }\nprint n");

        assert_eq!(errors.diagnostics()[0].message, "while condition must be boolean, found int");
        assert_eq!(output, ["1"]);
    }

    #[test]
    fn else_if_chains_pick_one_branch() {
        let (output, _) = printed(indoc! {"
            x = 5
            if x < 3 {
                print \"small\"
            } else if x < 10 {
                print \"medium\"
            } else {
                print \"large\"
            }
        "});

        assert_eq!(output, ["medium"]);
    }
}
