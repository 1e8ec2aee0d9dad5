use crate::{
    ast::{Block, Node},
    error::SyntaxError,
    interpreter::{grammar::TokenKind, parser::core::Parser},
};

impl Parser<'_> {
    /// Parses statements until a closing brace (when `braced`) or the end of
    /// input.
    ///
    /// A statement must be followed by a line end, a closing brace, or come
    /// right after a statement that ended with `}`, so
    /// `{ if c { break } print i }` is valid on one line.
    pub(in crate::interpreter::parser) fn parse_sequence(&mut self, braced: bool) -> Block {
        let mut statements = Vec::new();

        loop {
            self.skip_line_ends();
            if self.at_end() || (braced && self.check(TokenKind::RightBrace)) {
                break;
            }
            if self.check(TokenKind::RightBrace) {
                let token = self.advance();
                self.report(SyntaxError::UnexpectedStatement { found: token.describe(),
                                                               pos:   token.pos, });
                continue;
            }

            let errors_before = self.error_count();
            statements.push(self.parse_statement());
            self.finish_statement(errors_before);
        }

        Block { statements }
    }

    fn finish_statement(&mut self, errors_before: usize) {
        if self.match_kinds(&[TokenKind::LineEnd]).is_some()
           || self.at_end()
           || self.check(TokenKind::RightBrace)
           || self.previous_kind() == Some(TokenKind::RightBrace)
        {
            return;
        }

        if self.error_count() == errors_before {
            let found = self.peek().clone();
            self.report(SyntaxError::ExpectedStatementEnd { found: found.describe(),
                                                            pos:   found.pos, });
        }
        self.synchronize();
    }

    /// Parses `{ statements }`.
    pub(in crate::interpreter::parser) fn parse_block(&mut self) -> Block {
        self.elide_line_ends();
        let open = self.require(TokenKind::LeftBrace, "'{'");
        if open.kind == TokenKind::Invalid {
            return Block::default();
        }
        if !self.descend(&open) {
            self.skip_group();
            return Block::default();
        }
        let block = self.parse_sequence(true);
        self.require(TokenKind::RightBrace, "'}'");
        self.ascend();
        block
    }

    /// Removes line ends between the cursor and the next opening brace, so a
    /// condition and its brace may sit on different lines.
    ///
    /// Nothing is removed when a closing brace comes first.
    fn elide_line_ends(&mut self) {
        let Some(offset) =
            self.tokens[self.pos.min(self.tokens.len())..].iter()
                                                          .position(|t| {
                                                              matches!(t.kind,
                                                                       TokenKind::LeftBrace
                                                                       | TokenKind::RightBrace)
                                                          })
        else {
            return;
        };
        let end = self.pos + offset;
        if self.tokens[end].kind == TokenKind::RightBrace {
            return;
        }

        let kept: Vec<_> = self.tokens
                               .drain(self.pos..end)
                               .filter(|t| t.kind != TokenKind::LineEnd)
                               .collect();
        self.tokens.splice(self.pos..self.pos, kept);
    }

    /// `if condition { ... } [else if ... | else { ... }]`
    ///
    /// `else` may follow the closing brace after any number of blank lines.
    pub(in crate::interpreter::parser) fn parse_if(&mut self) -> Node {
        let token = self.advance();
        self.elide_line_ends();
        let condition = self.parse_expression();
        let then_block = self.parse_block();

        let mut lookahead = self.pos;
        while self.tokens.get(lookahead).is_some_and(|t| t.kind == TokenKind::LineEnd) {
            lookahead += 1;
        }
        let else_block = if self.tokens.get(lookahead).is_some_and(|t| t.kind == TokenKind::Else) {
            self.pos = lookahead + 1;
            if self.check(TokenKind::If) {
                Some(Block { statements: vec![self.parse_if()] })
            } else {
                Some(self.parse_block())
            }
        } else {
            None
        };

        Node::If { token,
                   condition: Box::new(condition),
                   then_block,
                   else_block }
    }

    /// `while condition { ... }`
    pub(in crate::interpreter::parser) fn parse_while(&mut self) -> Node {
        let token = self.advance();
        self.elide_line_ends();
        let condition = self.parse_expression();
        let body = self.parse_block();

        Node::While { token,
                      condition: Box::new(condition),
                      body }
    }

    /// `for [(] initializer, condition, increment [)] { ... }`
    pub(in crate::interpreter::parser) fn parse_for(&mut self) -> Node {
        let token = self.advance();
        self.elide_line_ends();
        let parenthesised = self.match_kinds(&[TokenKind::LeftParen]).is_some();

        let initializer = self.parse_statement();
        self.require(TokenKind::Comma, "','");
        let condition = self.parse_expression();
        self.require(TokenKind::Comma, "','");
        let increment = self.parse_statement();
        if parenthesised {
            self.require(TokenKind::RightParen, "')'");
        }
        let body = self.parse_block();

        Node::For { token,
                    initializer: Box::new(initializer),
                    condition: Box::new(condition),
                    increment: Box::new(increment),
                    body }
    }
}
