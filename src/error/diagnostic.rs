use std::fmt::{self, Write};

use crate::error::{RuntimeError, SemanticError, SyntaxError};

/// The phase a diagnostic was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Lexing and parsing.
    Syntax,
    /// Static analysis.
    Semantic,
    /// Execution.
    Runtime,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Syntax => "SYNTAX_ERROR",
            Self::Semantic => "SEMANTIC_ERROR",
            Self::Runtime => "RUNTIME_ERROR",
        };
        f.write_str(name)
    }
}

/// A single recorded error: its phase, message and source offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The phase that raised the error.
    pub kind:    DiagnosticKind,
    /// The rendered error message.
    pub message: String,
    /// Offset just past the offending token.
    pub pos:     usize,
}

impl Diagnostic {
    /// Creates a diagnostic from its parts.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, pos: usize) -> Self {
        Self { kind,
               message: message.into(),
               pos }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl From<SyntaxError> for Diagnostic {
    fn from(error: SyntaxError) -> Self {
        Self::new(DiagnosticKind::Syntax, error.to_string(), error.pos())
    }
}

impl From<SemanticError> for Diagnostic {
    fn from(error: SemanticError) -> Self {
        Self::new(DiagnosticKind::Semantic, error.to_string(), error.pos())
    }
}

impl From<RuntimeError> for Diagnostic {
    fn from(error: RuntimeError) -> Self {
        Self::new(DiagnosticKind::Runtime, error.to_string(), error.pos())
    }
}

/// Collects diagnostics for one source text and renders them.
///
/// The handler is created per program run. Phases report into it in order;
/// the driver checks [`ErrorHandler::has_errors`] between phases and finally
/// flushes the rendered report to the user.
///
/// # Example
/// ```
/// use kmsl::error::{Diagnostic, DiagnosticKind, ErrorHandler};
///
/// let mut errors = ErrorHandler::new("x = 1\ny = z\n");
/// errors.report(Diagnostic::new(DiagnosticKind::Semantic, "undeclared variable 'z'", 11));
///
/// assert_eq!(errors.line_of(11), 2);
/// assert!(errors.render().contains("[SEMANTIC_ERROR][2] undeclared variable 'z'"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
    source:      String,
    diagnostics: Vec<Diagnostic>,
}

impl ErrorHandler {
    /// Creates an empty handler for `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self { source:      source.into(),
               diagnostics: Vec::new(), }
    }

    /// Records a diagnostic.
    pub fn report(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.diagnostics.push(diagnostic.into());
    }

    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The diagnostics recorded so far, in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Removes and returns every recorded diagnostic.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Returns the 1-based line of the character just before `pos`.
    #[must_use]
    pub fn line_of(&self, pos: usize) -> usize {
        let (start, _) = self.line_bounds(pos);
        self.source.as_bytes()[..start].iter().filter(|&&b| b == b'\n').count() + 1
    }

    /// Renders every diagnostic as a report.
    ///
    /// Each entry shows `[KIND][line] message`, the offending source line and
    /// a caret under the last character of the offending token. Returns an
    /// empty string when nothing was reported.
    #[must_use]
    pub fn render(&self) -> String {
        if self.diagnostics.is_empty() {
            return String::new();
        }

        let mut out = format!("{} error(s) found\n", self.diagnostics.len());
        for diagnostic in &self.diagnostics {
            let (start, end) = self.line_bounds(diagnostic.pos);
            let text = self.source[start..end].trim_end_matches('\r');
            let column = self.source[start..self.anchor(diagnostic.pos).max(start)].chars()
                                                                                   .count();
            let width = text.chars().count();

            let _ = writeln!(out,
                             "\n[{}][{}] {}",
                             diagnostic.kind,
                             self.line_of(diagnostic.pos),
                             diagnostic.message);
            let _ = writeln!(out, "{text}");
            let _ = writeln!(out,
                             "{}^{}",
                             "~".repeat(column),
                             "~".repeat(width.saturating_sub(column + 1)));
        }
        out
    }

    /// Byte index of the last character of the token ending at `pos`.
    fn anchor(&self, pos: usize) -> usize {
        let mut anchor = pos.saturating_sub(1).min(self.source.len());
        while !self.source.is_char_boundary(anchor) {
            anchor -= 1;
        }
        anchor
    }

    /// Byte range of the line holding the anchor of `pos`, without its line
    /// end.
    fn line_bounds(&self, pos: usize) -> (usize, usize) {
        let anchor = self.anchor(pos);
        let start = self.source[..anchor].rfind('\n').map_or(0, |i| i + 1);
        let end = self.source[anchor..].find('\n').map_or(self.source.len(), |i| anchor + i);
        (start, end)
    }
}
