use std::mem;

use log::debug;

use crate::{
    error::{ErrorHandler, RuntimeError},
    interpreter::{
        evaluator::core::Interpreter,
        lexer::{Lexer, Token},
        parser::core::Parser,
        semantic::SemanticAnalyzer,
    },
    util::source::normalize,
};

/// Deepest chain of `do` statements running inside each other.
pub const MAX_DO_DEPTH: usize = 16;

impl Interpreter<'_> {
    /// Runs `code` through the whole pipeline as a program nested in the
    /// current one.
    ///
    /// The nested program shares this interpreter's variables and flags. Its
    /// root block runs at the current depth, so its bindings land beside
    /// those of the block that ran `do`. Its diagnostics are re-reported as
    /// runtime errors at the `do` token, tagged with their original kind.
    /// Escaped `\n` sequences in `code` are line breaks. A `do` nested more
    /// than [`MAX_DO_DEPTH`] levels deep is reported and not run.
    pub(super) fn run_nested(&mut self, op: &Token, code: &str) {
        if self.nesting >= MAX_DO_DEPTH {
            self.errors.report(RuntimeError::NestingTooDeep { limit: MAX_DO_DEPTH,
                                                              pos:   op.pos, });
            return;
        }
        let code = normalize(code);
        debug!("do: {code:?}");
        let mut nested = ErrorHandler::new(code.as_str());
        let tokens = Lexer::with_strict(self.strict_lexing).scan(&code, &mut nested);
        let root = Parser::new(tokens, &mut nested).parse();

        if !nested.has_errors() {
            let mut symbols = self.variables.symbols(self.depth);
            SemanticAnalyzer::incremental(&mut symbols,
                                          self.depth.saturating_sub(1),
                                          &mut nested).analyze(&root);
        }

        if !nested.has_errors() {
            mem::swap(self.errors, &mut nested);
            let interactive = mem::replace(&mut self.interactive, false);
            let depth = self.depth;
            self.depth = depth.saturating_sub(1);
            self.nesting += 1;
            self.exec_block(&root);
            self.nesting -= 1;
            self.depth = depth;
            self.interactive = interactive;
            mem::swap(self.errors, &mut nested);
        }

        for diagnostic in nested.take() {
            self.errors.report(RuntimeError::Nested { kind:    diagnostic.kind,
                                                      message: diagnostic.message,
                                                      pos:     op.pos, });
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::MAX_DO_DEPTH;
    use crate::{
        error::{DiagnosticKind, ErrorHandler},
        interpreter::{
            evaluator::Interpreter,
            parser::parse_source,
            value::{Value, Variables},
        },
        io::{Recorder, Services},
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
    fn nested_programs_share_the_callers_variables() {
        let (recorder, variables, errors) = run(indoc! {r#"
            n = 2
            do "n = n * 21\nm = 1"
            print n + m
        "#});

        assert!(!errors.has_errors(), "{}", errors.render());
        assert_eq!(recorder.output(), ["43"]);
        assert!(variables.iter().all(|v| v.depth == 1));
        assert_eq!(variables.iter().find(|v| v.name == "n").map(|v| &v.value),
                   Some(&Value::Int(42)));
    }

    #[test]
    fn nested_bindings_land_in_the_calling_block() {
        let (recorder, _, errors) = run(indoc! {r#"
            if true {
                do "inner = 5"
                print inner
            }
            print inner
        "#});

        assert_eq!(recorder.output(), ["5"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.diagnostics()[0].message, "unknown variable 'inner'");
    }

    #[test]
    fn nested_diagnostics_point_at_the_do_statement() {
        let source = "x = 1\ndo \"print y\"\ndo \"x = (1\"";
        let (_, _, errors) = run(source);

        let reported: Vec<_> = errors.diagnostics()
                                     .iter()
                                     .map(|d| (d.kind, d.message.as_str(), errors.line_of(d.pos)))
                                     .collect();
        assert_eq!(reported,
                   [(DiagnosticKind::Runtime,
                     "do: [SEMANTIC_ERROR] undeclared variable 'y'",
                     2),
                    (DiagnosticKind::Runtime, "do: [SYNTAX_ERROR] unmatched '('", 3)]);
    }

    #[test]
    fn self_running_programs_stop_at_the_depth_limit() {
        let (recorder, variables, errors) = run(indoc! {r#"
            runs = 0
            s = "runs++\ndo s"
            do s
            print runs
        "#});

        assert_eq!(errors.len(), 1);
        let diagnostic = &errors.diagnostics()[0];
        assert_eq!(diagnostic.kind, DiagnosticKind::Runtime);
        assert!(diagnostic.message
                          .ends_with(&format!("do nested deeper than {MAX_DO_DEPTH} levels")),
                "{}",
                diagnostic.message);
        assert_eq!(errors.line_of(diagnostic.pos), 3);

        assert_eq!(recorder.output(), [MAX_DO_DEPTH.to_string()]);
        assert!(variables.iter().all(|v| v.depth == 1));
    }
}
