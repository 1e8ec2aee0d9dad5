use log::debug;

use crate::{
    error::{ErrorHandler, SyntaxError},
    interpreter::grammar::{COMPILED_RULES, TokenKind},
};

/// A lexical token.
///
/// `pos` is the offset just past the matched text; diagnostics point at the
/// character before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The rule that matched.
    pub kind: TokenKind,
    /// The matched text. Strings have their quotes stripped and booleans are
    /// canonical `true`/`false`.
    pub text: String,
    /// Byte offset just past the match.
    pub pos:  usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: usize) -> Self {
        Self { kind,
               text: text.into(),
               pos }
    }

    /// Describes the token for diagnostics, such as `'+'` or `line end`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::LineEnd | TokenKind::Invalid => self.kind.to_string(),
            TokenKind::String => format!("\"{}\"", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Converts source text into tokens using the ordered rule table.
///
/// # Example
/// ```
/// use kmsl::{
///     error::ErrorHandler,
///     interpreter::{grammar::TokenKind, lexer::Lexer},
/// };
///
/// let mut errors = ErrorHandler::new("x += 2");
/// let tokens = Lexer::new().scan("x += 2", &mut errors);
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
///
/// assert_eq!(kinds,
///            [TokenKind::Variable, TokenKind::PlusAssign, TokenKind::Int, TokenKind::LineEnd]);
/// assert!(!errors.has_errors());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Lexer {
    strict: bool,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    /// A lexer that reports unmatched characters as syntax errors.
    #[must_use]
    pub const fn new() -> Self {
        Self { strict: true }
    }

    /// A lexer that skips unmatched characters silently.
    #[must_use]
    pub const fn lenient() -> Self {
        Self { strict: false }
    }

    #[must_use]
    pub const fn with_strict(strict: bool) -> Self {
        Self { strict }
    }

    /// Scans `source` into tokens.
    ///
    /// At each position the first matching rule wins. Whitespace is dropped,
    /// comments become a line end, and a trailing line-end sentinel is always
    /// appended so the parser never runs off the end of a statement.
    pub fn scan(self, source: &str, errors: &mut ErrorHandler) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut cursor = 0;

        while cursor < source.len() {
            let rest = &source[cursor..];
            let matched = COMPILED_RULES.iter().find_map(|(regex, kind)| {
                                                   regex.find(rest)
                                                        .filter(|m| !m.is_empty())
                                                        .map(|m| (*kind, m.as_str()))
                                               });

            let Some((kind, text)) = matched else {
                let character = rest.chars().next().unwrap_or_default();
                cursor += character.len_utf8().max(1);
                if self.strict {
                    errors.report(SyntaxError::UnexpectedCharacter { character,
                                                                     pos: cursor });
                }
                continue;
            };

            cursor += text.len();
            match kind {
                TokenKind::Space => {},
                TokenKind::Comment => tokens.push(Token::new(TokenKind::LineEnd, "", cursor)),
                TokenKind::String => {
                    let inner = text[1..text.len() - 1].replace('\r', "");
                    tokens.push(Token::new(kind, inner, cursor));
                },
                TokenKind::Bool => {
                    let canonical = if text.eq_ignore_ascii_case("true") { "true" } else { "false" };
                    tokens.push(Token::new(kind, canonical, cursor));
                },
                _ => tokens.push(Token::new(kind, text, cursor)),
            }
        }

        tokens.push(Token::new(TokenKind::LineEnd, "", source.len()));
        debug!("lexer: {} tokens", tokens.len());
        tokens
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn scan(source: &str) -> (Vec<Token>, ErrorHandler) {
        let mut errors = ErrorHandler::new(source);
        let tokens = Lexer::new().scan(source, &mut errors);
        (tokens, errors)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn longest_operators_win_by_order() {
        use TokenKind::*;

        assert_eq!(kinds("a ^^= b"), [Variable, LogAssign, Variable, LineEnd]);
        assert_eq!(kinds("a // b"), [Variable, FloorDivide, Variable, LineEnd]);
        assert_eq!(kinds("i++"), [Variable, Increment, LineEnd]);
        assert_eq!(kinds("a<=b"), [Variable, LessEqual, Variable, LineEnd]);
        assert_eq!(kinds("a << 2"), [Variable, ShiftLeft, Int, LineEnd]);
    }

    #[test]
    fn keywords_need_a_word_boundary() {
        use TokenKind::*;

        assert_eq!(kinds("if iffy"), [If, Variable, LineEnd]);
        assert_eq!(kinds("double = 2"), [Variable, Assign, Int, LineEnd]);
        assert_eq!(kinds("printer"), [Variable, LineEnd]);
    }

    #[test]
    fn offsets_point_past_each_token() {
        let (tokens, _) = scan("ab = 12");

        assert_eq!(tokens[0].pos, 2);
        assert_eq!(tokens[1].pos, 4);
        assert_eq!(tokens[2].pos, 7);
    }

    #[test]
    fn literals_are_normalised() {
        let (tokens, _) = scan("s = \"hi there\"\nb = TRUE\nf = 1.25");

        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[2].text, "hi there");
        assert_eq!(tokens[6].text, "true");
        assert_eq!(tokens[10].kind, TokenKind::Float);
    }

    #[test]
    fn comments_become_line_ends() {
        let source = indoc! {"
            x = 1 # set x
            print x
        "};
        let kinds: Vec<_> = scan(source).0.into_iter().map(|t| t.kind).collect();

        assert_eq!(kinds,
                   [TokenKind::Variable,
                    TokenKind::Assign,
                    TokenKind::Int,
                    TokenKind::LineEnd,
                    TokenKind::LineEnd,
                    TokenKind::Print,
                    TokenKind::Variable,
                    TokenKind::LineEnd,
                    TokenKind::LineEnd]);
    }

    #[test]
    fn unmatched_characters_are_reported_and_skipped() {
        let (tokens, errors) = scan("x = 1 @ 2");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.diagnostics()[0].pos, 7);
        assert_eq!(tokens.len(), 5);

        let mut quiet = ErrorHandler::new("x = 1 @");
        Lexer::lenient().scan("x = 1 @", &mut quiet);
        assert!(!quiet.has_errors());
    }
}
