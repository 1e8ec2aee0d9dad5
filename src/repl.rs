use log::debug;

use crate::{
    io::ServiceResult,
    session::{RunReport, Session},
    util::source::normalize,
};

/// Prompt shown before a new submission.
pub const PROMPT: &str = "> ";
/// Prompt shown while a multi-line construction is being entered.
pub const CONTINUATION_PROMPT: &str = ". ";

/// Keywords that open a construction spanning several lines.
const OPENERS: [&str; 3] = ["if", "while", "for"];

/// What feeding one line to the [`Repl`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The line was buffered as part of an open construction.
    Pending,
    /// The line was blank and nothing ran.
    Skipped,
    /// A submission ran.
    Ran(RunReport),
    /// The user asked to leave.
    Exit,
}

/// The interactive front end over a [`Session`].
///
/// Every line is one submission, except that a line starting with `if`,
/// `while` or `for` opens a construction which collects lines until an
/// empty one. `exit` on its own line, an `exit` statement or the end of
/// input leaves the loop.
///
/// # Example
/// ```
/// use kmsl::{
///     io::{Recorder, Services},
///     repl::Repl,
///     session::Session,
/// };
///
/// let recorder = Recorder::with_input(&["n = 3", "while n > 0 {", "print n", "n--", "}", "", "exit"]);
/// let mut repl = Repl::new(Session::interactive(Services::recording(&recorder)));
/// repl.run().unwrap();
///
/// assert_eq!(recorder.output(), ["3", "2", "1"]);
/// assert_eq!(recorder.prompts(), "> > . . . . > ");
/// ```
pub struct Repl {
    session: Session,
    pending: Option<String>,
}

impl Repl {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session,
               pending: None }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a construction is waiting for its closing empty line.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Feeds one input line.
    pub fn feed(&mut self, line: &str) -> Step {
        let line = normalize(line);

        if let Some(buffer) = self.pending.as_mut() {
            if !line.trim().is_empty() {
                buffer.push_str(&line);
                buffer.push('\n');
                return Step::Pending;
            }
            let source = std::mem::take(buffer);
            self.pending = None;
            return self.submit(&source);
        }

        match line.trim() {
            "" => Step::Skipped,
            "exit" => Step::Exit,
            trimmed if opens_construction(trimmed) => {
                self.pending = Some(format!("{line}\n"));
                Step::Pending
            },
            _ => self.submit(&line),
        }
    }

    /// Reads, runs and reports submissions until the user leaves.
    ///
    /// Diagnostics are written to the session's console. A construction
    /// still open at the end of input is run before returning.
    pub fn run(&mut self) -> ServiceResult<()> {
        loop {
            let prompt = if self.is_pending() { CONTINUATION_PROMPT } else { PROMPT };
            let console = self.session.console();
            console.write(prompt)?;

            let step = match console.read_line()? {
                Some(line) => self.feed(&line),
                None => match self.pending.take() {
                    Some(source) => {
                        let step = self.submit(&source);
                        self.report(&step)?;
                        return Ok(());
                    },
                    None => return Ok(()),
                },
            };

            self.report(&step)?;
            match step {
                Step::Exit => return Ok(()),
                Step::Ran(report) if report.exit_requested => return Ok(()),
                _ => {},
            }
        }
    }

    fn submit(&mut self, source: &str) -> Step {
        debug!("submission: {source:?}");
        Step::Ran(self.session.run(source))
    }

    fn report(&mut self, step: &Step) -> ServiceResult<()> {
        if let Step::Ran(report) = step
           && !report.rendered.is_empty()
        {
            self.session.console().write(&report.rendered)?;
        }
        Ok(())
    }
}

/// Whether `line` starts with one of the construction keywords.
fn opens_construction(line: &str) -> bool {
    let word_char = |c: char| c.is_alphanumeric() || c == '_';
    OPENERS.iter()
           .any(|keyword| line.strip_prefix(keyword).is_some_and(|rest| !rest.starts_with(word_char)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Recorder, Services};

    fn repl(recorder: &Recorder) -> Repl {
        Repl::new(Session::interactive(Services::recording(recorder)))
    }

    #[test]
    fn constructions_collect_lines_until_a_blank_one() {
        let recorder = Recorder::new();
        let mut repl = repl(&recorder);

        assert_eq!(repl.feed("for (i = 0, i < 2, i++) {"), Step::Pending);
        assert_eq!(repl.feed("print i"), Step::Pending);
        assert_eq!(repl.feed("}"), Step::Pending);
        assert!(matches!(repl.feed("  "), Step::Ran(_)));
        assert!(!repl.is_pending());

        assert_eq!(recorder.output(), ["0", "1"]);
    }

    #[test]
    fn keywords_only_open_constructions_as_whole_words() {
        assert!(opens_construction("if x {"));
        assert!(opens_construction("while(true) {"));
        assert!(!opens_construction("format = 1"));
        assert!(!opens_construction("iffy = 2"));
    }

    #[test]
    fn escaped_line_breaks_split_a_submission() {
        let recorder = Recorder::new();
        let mut repl = repl(&recorder);

        assert!(matches!(repl.feed(r"x = 2\nx * 21"), Step::Ran(_)));
        assert_eq!(recorder.output(), ["42"]);
    }

    #[test]
    fn diagnostics_go_to_the_console() {
        let recorder = Recorder::with_input(&["print missing", "1 + 1"]);
        repl(&recorder).run().unwrap();

        assert!(recorder.prompts().contains("[SEMANTIC_ERROR][1] undeclared variable 'missing'"));
        assert_eq!(recorder.output(), ["2"]);
    }

    #[test]
    fn an_exit_statement_ends_the_session() {
        let recorder = Recorder::with_input(&["print 1", "exit", "print 2"]);
        repl(&recorder).run().unwrap();

        assert_eq!(recorder.output(), ["1"]);

        let recorder = Recorder::with_input(&["if true {", "exit", "}", "", "print 2"]);
        repl(&recorder).run().unwrap();

        assert!(recorder.output().is_empty());
    }

    #[test]
    fn an_open_construction_runs_at_end_of_input() {
        let recorder = Recorder::with_input(&["if true {", "print \"done\"", "}"]);
        repl(&recorder).run().unwrap();

        assert_eq!(recorder.output(), ["done"]);
    }
}
