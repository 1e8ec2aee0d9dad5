use log::debug;

use crate::{
    ast::{Block, Node},
    error::{ErrorHandler, SyntaxError},
    interpreter::{grammar::TokenKind, lexer::Token},
};

/// Deepest nesting of parentheses, prefix operators and blocks the parser
/// accepts.
pub const MAX_NESTING: usize = 64;

/// A recursive-descent parser over a token vector.
///
/// The parser never stops at the first error: a missing required token is
/// reported and replaced by a placeholder so the rest of the program still
/// gets checked.
pub struct Parser<'e> {
    pub(in crate::interpreter::parser) tokens: Vec<Token>,
    pub(in crate::interpreter::parser) pos:    usize,
    nesting:                                   usize,
    errors:                                    &'e mut ErrorHandler,
}

impl<'e> Parser<'e> {
    /// Creates a parser over `tokens`, reporting into `errors`.
    pub fn new(mut tokens: Vec<Token>, errors: &'e mut ErrorHandler) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::LineEnd) {
            let end = tokens.last().map_or(0, |t| t.pos);
            tokens.push(Token::new(TokenKind::LineEnd, "", end));
        }
        Self { tokens,
               pos: 0,
               nesting: 0,
               errors }
    }

    /// Parses the whole program into its root block.
    ///
    /// Delimiter balance is checked first. When it fails, only the balance
    /// diagnostics are reported and an empty block is returned.
    pub fn parse(&mut self) -> Block {
        if !self.check_balance() {
            return Block::default();
        }

        let root = self.parse_sequence(false);
        debug!("parser: {root}");
        root
    }

    /// Reports every parenthesis or brace without a partner.
    ///
    /// Returns `true` when all delimiters are balanced.
    fn check_balance(&mut self) -> bool {
        let mut open: Vec<&Token> = Vec::new();
        let mut unmatched = Vec::new();

        for token in &self.tokens {
            match token.kind {
                TokenKind::LeftParen | TokenKind::LeftBrace => open.push(token),
                TokenKind::RightParen | TokenKind::RightBrace => {
                    let partner = if token.kind == TokenKind::RightParen {
                        TokenKind::LeftParen
                    } else {
                        TokenKind::LeftBrace
                    };
                    if open.last().is_some_and(|t| t.kind == partner) {
                        open.pop();
                    } else {
                        unmatched.push(token);
                    }
                },
                _ => {},
            }
        }
        unmatched.extend(open);
        unmatched.sort_by_key(|t| t.pos);

        let errors: Vec<_> =
            unmatched.into_iter()
                     .map(|t| SyntaxError::UnmatchedDelimiter { delimiter: t.text.clone(),
                                                                pos:       t.pos, })
                     .collect();
        let balanced = errors.is_empty();
        for error in errors {
            self.errors.report(error);
        }
        balanced
    }

    pub(in crate::interpreter::parser) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The current token, or the trailing sentinel once past the end.
    pub(in crate::interpreter::parser) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(in crate::interpreter::parser) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(in crate::interpreter::parser) fn check(&self, kind: TokenKind) -> bool {
        !self.at_end() && self.peek_kind() == kind
    }

    pub(in crate::interpreter::parser) fn previous_kind(&self) -> Option<TokenKind> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)).map(|t| t.kind)
    }

    /// Consumes and returns the current token.
    pub(in crate::interpreter::parser) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it has one of `kinds`.
    pub(in crate::interpreter::parser) fn match_kinds(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if !self.at_end() && kinds.contains(&self.peek_kind()) {
            return Some(self.advance());
        }
        None
    }

    /// Consumes a token of `kind`, or reports what was found instead.
    ///
    /// On a mismatch nothing is consumed and an `Invalid` placeholder token
    /// positioned at the current token is returned.
    pub(in crate::interpreter::parser) fn require(&mut self, kind: TokenKind, expected: &str) -> Token {
        if let Some(token) = self.match_kinds(&[kind]) {
            return token;
        }
        let found = self.peek().clone();
        self.report(SyntaxError::UnexpectedToken { expected: expected.to_string(),
                                                   found:    found.describe(),
                                                   pos:      found.pos, });
        Token::new(TokenKind::Invalid, "", found.pos)
    }

    pub(in crate::interpreter::parser) fn report(&mut self, error: SyntaxError) {
        self.errors.report(error);
    }

    pub(in crate::interpreter::parser) fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub(in crate::interpreter::parser) fn skip_line_ends(&mut self) {
        while self.check(TokenKind::LineEnd) {
            self.pos += 1;
        }
    }

    /// Skips the rest of a broken statement, stopping before the next line
    /// end or closing brace.
    pub(in crate::interpreter::parser) fn synchronize(&mut self) {
        while !self.at_end()
              && !matches!(self.peek_kind(), TokenKind::LineEnd | TokenKind::RightBrace)
        {
            self.pos += 1;
        }
    }

    /// Enters one nesting level below `token`.
    ///
    /// Past [`MAX_NESTING`] levels this reports the error and returns
    /// `false`; the caller must then skip the construct instead of
    /// descending.
    pub(in crate::interpreter::parser) fn descend(&mut self, token: &Token) -> bool {
        if self.nesting >= MAX_NESTING {
            self.report(SyntaxError::NestingTooDeep { limit: MAX_NESTING,
                                                      pos:   token.pos, });
            return false;
        }
        self.nesting += 1;
        true
    }

    pub(in crate::interpreter::parser) fn ascend(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Skips past the delimiter that closes the group the cursor is in.
    ///
    /// Delimiters are known to be balanced by the time this runs.
    pub(in crate::interpreter::parser) fn skip_group(&mut self) {
        let mut open = 1_usize;
        while !self.at_end() && open > 0 {
            match self.advance().kind {
                TokenKind::LeftParen | TokenKind::LeftBrace => open += 1,
                TokenKind::RightParen | TokenKind::RightBrace => open -= 1,
                _ => {},
            }
        }
    }

    /// Skips one factor: its prefix operators and then a parenthesised
    /// group or a single token.
    pub(in crate::interpreter::parser) fn skip_factor(&mut self) {
        while self.peek_kind().is_unary_prefix() {
            self.advance();
        }
        if self.match_kinds(&[TokenKind::LeftParen]).is_some() {
            self.skip_group();
        } else if !matches!(self.peek_kind(),
                            TokenKind::LineEnd | TokenKind::RightParen | TokenKind::RightBrace)
        {
            self.advance();
        }
    }

    /// The node returned in place of a construct that failed to parse.
    pub(in crate::interpreter::parser) fn placeholder() -> Node {
        Node::Block(Block::default())
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::MAX_NESTING;
    use crate::interpreter::parser::parse_source;

    fn debug(source: &str) -> String {
        let (root, errors) = parse_source(source);
        assert!(!errors.has_errors(), "unexpected errors:\n{}", errors.render());
        root.to_string()
    }

    fn error_messages(source: &str) -> Vec<String> {
        let (_, errors) = parse_source(source);
        errors.diagnostics().iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn two_tier_precedence_is_left_associative() {
        assert_eq!(debug("1 + 2 * 3 - 4"),
                   "Block(BinaryOp(-, BinaryOp(+, Literal(1), BinaryOp(*, Literal(2), \
                    Literal(3))), Literal(4)))");
        assert_eq!(debug("a < b && c"),
                   "Block(BinaryOp(&&, BinaryOp(<, Variable(a), Variable(b)), Variable(c)))");
    }

    #[test]
    fn variable_statements() {
        assert_eq!(debug("x = 3 / 2"), "Block(BinaryOp(=, Variable(x), BinaryOp(/, Literal(3), Literal(2))))");
        assert_eq!(debug("x += 1"), "Block(BinaryOp(+=, Variable(x), Literal(1)))");
        assert_eq!(debug("i++"), "Block(UnaryOp(++, Variable(i)))");
        assert_eq!(debug("x * 2"), "Block(BinaryOp(*, Variable(x), Literal(2)))");
        assert_eq!(debug("x"), "Block(Variable(x))");
    }

    #[test]
    fn device_statements() {
        assert_eq!(debug("press \"a\", \"b\", 0.5"),
                   "Block(KeyAction(Press, [Literal(\"a\"), Literal(\"b\")], Literal(0.5)))");
        assert_eq!(debug("hold \"SHIFT\""), "Block(KeyAction(Hold, [Literal(\"SHIFT\")]))");
        assert_eq!(debug("move 10, 20, 1"),
                   "Block(MouseAction(Move, Literal(10), Literal(20), time Literal(1)))");
        assert_eq!(debug("scroll -3"), "Block(MouseAction(Scroll, UnaryOp(-, Literal(3))))");
        assert_eq!(debug("type \"hi\""), "Block(BinaryOp(type, Literal(\"hi\"), Literal(0)))");
    }

    #[test]
    fn blocks_and_branches() {
        let source = indoc! {"
            if (x > 1)
            {
                print x
            }

            else if x == 0 {
                print 0
            } else {
                exit
            }
        "};

        assert_eq!(debug(source),
                   "Block(If(BinaryOp(>, Variable(x), Literal(1)), Block(UnaryOp(print, \
                    Variable(x))), Block(If(BinaryOp(==, Variable(x), Literal(0)), \
                    Block(UnaryOp(print, Literal(0))), Block(Command(Exit))))))");
    }

    #[test]
    fn for_loops_on_one_line() {
        assert_eq!(debug("for (i = 0, i < 3, i++) { if (i == 1) { break } print i }"),
                   "Block(For(BinaryOp(=, Variable(i), Literal(0)), BinaryOp(<, Variable(i), \
                    Literal(3)), UnaryOp(++, Variable(i)), Block(If(BinaryOp(==, Variable(i), \
                    Literal(1)), Block(Command(Break))); UnaryOp(print, Variable(i)))))");
    }

    #[test]
    fn unbalanced_delimiters_stop_parsing() {
        assert_eq!(error_messages("if x {\nprint x\n"), ["unmatched '{'"]);
        assert_eq!(error_messages("print (1 + 2))"), ["unmatched ')'"]);
    }

    #[test]
    fn deep_nesting_is_a_single_syntax_error() {
        let parens = format!("x = {}1{}\nprint 2", "(".repeat(5_000), ")".repeat(5_000));
        assert_eq!(error_messages(&parens), ["nesting deeper than 64 levels"]);

        let prefixes = format!("print {}true", "!".repeat(5_000));
        assert_eq!(error_messages(&prefixes), ["nesting deeper than 64 levels"]);

        let blocks = format!("{}print 1{}", "{\n".repeat(1_000), "\n}".repeat(1_000));
        assert_eq!(error_messages(&blocks), ["nesting deeper than 64 levels"]);

        let (_, errors) = parse_source(&format!("x = {}1{}",
                                                "(".repeat(MAX_NESTING),
                                                ")".repeat(MAX_NESTING)));
        assert!(!errors.has_errors(), "{}", errors.render());
    }

    #[test]
    fn errors_recover_at_the_next_line() {
        let messages = error_messages("x = \nprint 1 2\nwhile x {\n}");

        assert_eq!(messages,
                   ["expected an expression, found line end",
                    "expected end of line, found '2'"]);
    }

    #[test]
    fn re_serialised_source_parses_to_the_same_tree() {
        let source = indoc! {r#"
            total = 0
            for (i = 1, i <= 10, i += 1) {
                if i % 2 == 0 { continue }
                total = total + i * -2
            }
            press "CTRL", "c", 0.1
            dmove 5, -5
            writefile "out.txt", str total
            while total < 100 && !false { total **= 2 }
        "#};
        let (first, errors) = parse_source(source);
        assert!(!errors.has_errors());

        let (second, errors) = parse_source(&first.to_source());
        assert!(!errors.has_errors(), "{}", errors.render());
        assert_eq!(first.to_string(), second.to_string());
    }
}
