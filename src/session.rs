use log::{Level, debug, log_enabled};

use crate::{
    error::{Diagnostic, ErrorHandler},
    interpreter::{
        evaluator::Interpreter,
        lexer::{Lexer, Token},
        parser::core::Parser,
        semantic::{SemanticAnalyzer, Symbol},
        value::{Value, Variables},
    },
    io::{Console, Services},
};

/// Depth of the bindings a program's root block creates.
const ROOT_DEPTH: usize = 1;

/// How a [`Session`] treats successive runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Keep variables and symbols between runs and echo the value of
    /// top-level expression statements.
    pub interactive:   bool,
    /// Report characters that no token rule matches.
    pub strict_lexing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { interactive:   false,
               strict_lexing: true, }
    }
}

/// What happened during one [`Session::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Every diagnostic, in report order.
    pub diagnostics:    Vec<Diagnostic>,
    /// The diagnostics rendered for the user, empty when there are none.
    pub rendered:       String,
    /// Whether the program got past analysis and was executed.
    pub executed:       bool,
    /// Whether the program ran `exit`.
    pub exit_requested: bool,
}

impl RunReport {
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    fn new(mut errors: ErrorHandler, executed: bool, exit_requested: bool) -> Self {
        let rendered = errors.render();
        Self { diagnostics: errors.take(),
               rendered,
               executed,
               exit_requested }
    }
}

/// Runs source texts through the whole pipeline against one store.
///
/// Each run lexes, parses, analyzes and executes one program. Syntax errors
/// stop a run before analysis, and semantic errors stop it before
/// execution. An interactive session keeps its variables and the matching
/// symbol list between runs, so later submissions see earlier ones; a batch
/// session starts every run from scratch.
///
/// # Example
/// ```
/// use kmsl::{
///     interpreter::value::Value,
///     io::{Recorder, Services},
///     session::Session,
/// };
///
/// let recorder = Recorder::new();
/// let mut session = Session::interactive(Services::recording(&recorder));
///
/// assert!(!session.run("x = 4").has_errors());
/// assert!(!session.run("x *= 2.5\nx").has_errors());
///
/// assert_eq!(session.get("x"), Some(&Value::Float(10.0)));
/// assert_eq!(recorder.output(), ["10"]);
/// ```
pub struct Session {
    symbols:   Vec<Symbol>,
    variables: Variables,
    services:  Services,
    config:    Config,
}

impl Session {
    #[must_use]
    pub fn new(services: Services, config: Config) -> Self {
        Self { symbols: Vec::new(),
               variables: Variables::default(),
               services,
               config }
    }

    /// A batch session with strict lexing.
    #[must_use]
    pub fn batch(services: Services) -> Self {
        Self::new(services, Config::default())
    }

    /// An interactive session with strict lexing.
    #[must_use]
    pub fn interactive(services: Services) -> Self {
        Self::new(services, Config { interactive: true,
                                     ..Config::default() })
    }

    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// The value of a root-level variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables
            .lookup(name, ROOT_DEPTH)
            .and_then(|handle| self.variables.get(handle))
            .map(|variable| &variable.value)
    }

    /// The symbols later interactive submissions are analyzed against.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The console the session's programs print to.
    pub fn console(&mut self) -> &mut dyn Console {
        self.services.console.as_mut()
    }

    /// Runs one program.
    pub fn run(&mut self, source: &str) -> RunReport {
        let mut errors = ErrorHandler::new(source);
        if !self.config.interactive {
            self.variables.clear();
            self.symbols.clear();
        }

        let tokens = Lexer::with_strict(self.config.strict_lexing).scan(source, &mut errors);
        if log_enabled!(Level::Debug) {
            let rendered: Vec<_> = tokens.iter().map(Token::describe).collect();
            debug!("tokens: {}", rendered.join(" "));
        }
        let root = Parser::new(tokens, &mut errors).parse();
        if errors.has_errors() {
            return RunReport::new(errors, false, false);
        }

        let snapshot = self.symbols.clone();
        if self.config.interactive {
            SemanticAnalyzer::incremental(&mut self.symbols, ROOT_DEPTH - 1, &mut errors)
                .analyze(&root);
        } else {
            SemanticAnalyzer::new(&mut errors).analyze(&root);
        }
        if errors.has_errors() {
            self.symbols = snapshot;
            return RunReport::new(errors, false, false);
        }

        let control = {
            let mut interpreter =
                Interpreter::new(&mut self.variables, &mut self.services, &mut errors)
                    .interactive(self.config.interactive)
                    .strict_lexing(self.config.strict_lexing);
            interpreter.execute(&root);
            interpreter.control()
        };
        if self.config.interactive {
            self.symbols = self.variables.symbols(ROOT_DEPTH);
        }
        RunReport::new(errors, true, control.exit_requested)
    }
}

/// Runs `source` once in a fresh batch session.
///
/// # Example
/// ```
/// use kmsl::{
///     error::DiagnosticKind,
///     io::{Recorder, Services},
///     session::run,
/// };
///
/// let recorder = Recorder::new();
/// let report = run("print \"hi\" * -1\nprint 2", Services::recording(&recorder));
///
/// assert_eq!(report.diagnostics.len(), 1);
/// assert_eq!(report.diagnostics[0].kind, DiagnosticKind::Runtime);
/// assert_eq!(recorder.output(), ["hi", "2"]);
/// ```
pub fn run(source: &str, services: Services) -> RunReport {
    Session::batch(services).run(source)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::{error::DiagnosticKind, interpreter::semantic::DataType, io::Recorder};

    fn kinds(report: &RunReport) -> Vec<DiagnosticKind> {
        report.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn syntax_errors_stop_before_anything_runs() {
        let recorder = Recorder::new();
        let report = run("print 1\nif true {\nprint 2", Services::recording(&recorder));

        assert_eq!(kinds(&report), [DiagnosticKind::Syntax]);
        assert!(!report.executed);
        assert!(recorder.output().is_empty());
    }

    #[test]
    fn semantic_errors_stop_before_anything_runs() {
        let recorder = Recorder::new();
        let report = run("print 1\nprint nope", Services::recording(&recorder));

        assert_eq!(kinds(&report), [DiagnosticKind::Semantic]);
        assert!(recorder.output().is_empty());
        assert!(report.rendered.starts_with("1 error(s) found\n"));
    }

    #[test]
    fn batch_runs_start_from_scratch() {
        let recorder = Recorder::new();
        let mut session = Session::batch(Services::recording(&recorder));
        session.run("a = 1");

        assert_eq!(kinds(&session.run("print a")), [DiagnosticKind::Semantic]);
        assert_eq!(session.get("a"), None);
    }

    #[test]
    fn interactive_submissions_build_on_each_other() {
        let recorder = Recorder::new();
        let mut session = Session::interactive(Services::recording(&recorder));

        session.run("name = \"kmsl\"");
        session.run(indoc! {"
            for (i = 0, i < 2, i++) {
                name += \"!\"
            }
        "});
        let report = session.run("name\nlen name");

        assert!(!report.has_errors(), "{}", report.rendered);
        assert_eq!(recorder.output(), ["kmsl!!", "6"]);
        assert_eq!(session.symbols().len(), 1);
    }

    #[test]
    fn rejected_submissions_leave_the_symbols_alone() {
        let recorder = Recorder::new();
        let mut session = Session::interactive(Services::recording(&recorder));
        session.run("a = 1");

        let report = session.run("b = 2\nprint c");
        assert_eq!(kinds(&report), [DiagnosticKind::Semantic]);
        assert_eq!(session.symbols(), [Symbol::new("a", DataType::Int, 1)]);

        assert_eq!(kinds(&session.run("print b")), [DiagnosticKind::Semantic]);
    }

    #[test]
    fn failed_operators_still_bind_their_fallback() {
        let recorder = Recorder::new();
        let mut session = Session::interactive(Services::recording(&recorder));

        let report = session.run("x = 1 / 0");
        assert_eq!(kinds(&report), [DiagnosticKind::Runtime]);
        assert!(report.executed);

        assert!(!session.run("x + 1").has_errors());
        assert_eq!(recorder.output(), ["1"]);
    }

    #[test]
    fn nested_bindings_become_visible_to_later_submissions() {
        let recorder = Recorder::new();
        let mut session = Session::interactive(Services::recording(&recorder));

        assert!(!session.run("do \"z = 3\"").has_errors());
        assert!(session.symbols().iter().any(|s| s.name == "z"));

        let report = session.run("z");
        assert!(!report.has_errors(), "{}", report.rendered);
        assert_eq!(recorder.output(), ["3"]);
    }

    #[test]
    fn exit_is_reported() {
        let recorder = Recorder::new();
        let report = run("exit\nprint 1", Services::recording(&recorder));

        assert!(report.exit_requested);
        assert!(recorder.output().is_empty());
    }
}
