use crate::{
    ast::{CommandKind, KeyKind, MouseKind, Node},
    error::SyntaxError,
    interpreter::{grammar::TokenKind, lexer::Token, parser::core::Parser},
};

impl Parser<'_> {
    /// Parses one statement, dispatching on its first token.
    ///
    /// Statements are assignments and increments, one-operand commands such
    /// as `print`, two-operand commands such as `type` or `copy`, device
    /// actions, compound statements, loop-control commands and bare
    /// expressions.
    pub(in crate::interpreter::parser) fn parse_statement(&mut self) -> Node {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Variable => self.parse_variable_statement(),
            TokenKind::Increment | TokenKind::Decrement => {
                let op = self.advance();
                let operand = self.parse_target();
                Node::UnaryOp { op,
                                operand: Box::new(operand) }
            },
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::LeftBrace => Node::Block(self.parse_block()),
            TokenKind::Break | TokenKind::Continue | TokenKind::Exit => {
                let kind = match token.kind {
                    TokenKind::Break => CommandKind::Break,
                    TokenKind::Continue => CommandKind::Continue,
                    _ => CommandKind::Exit,
                };
                Node::Command { token: self.advance(),
                                kind }
            },
            TokenKind::Press | TokenKind::Hold | TokenKind::Release => self.parse_key_action(),
            TokenKind::Move | TokenKind::DMove | TokenKind::Scroll => self.parse_mouse_action(),
            kind if kind.is_unary_command() => self.parse_unary_command(),
            kind if kind.is_binary_command() => self.parse_binary_command(),
            kind if starts_expression(kind) => self.parse_expression(),
            _ => {
                self.advance();
                self.report(SyntaxError::UnexpectedStatement { found: token.describe(),
                                                               pos:   token.pos, });
                Self::placeholder()
            },
        }
    }

    /// Parses a statement that begins with a variable.
    ///
    /// `x++`, `x = e` and `x += e` are recognised directly. When a binary
    /// operator follows instead, the cursor backs up to the variable and the
    /// whole statement is reparsed as an expression.
    fn parse_variable_statement(&mut self) -> Node {
        let start = self.pos;
        let name = self.advance();
        let next = self.peek_kind();

        if matches!(next, TokenKind::Increment | TokenKind::Decrement) {
            let op = self.advance();
            return Node::UnaryOp { op,
                                   operand: Box::new(Node::Variable(name)) };
        }
        if next.is_assignment() {
            let op = self.advance();
            let value = self.parse_expression();
            return Node::BinaryOp { op,
                                    left: Box::new(Node::Variable(name)),
                                    right: Box::new(value) };
        }
        if next.is_binary_operator() {
            self.pos = start;
            return self.parse_expression();
        }
        Node::Variable(name)
    }

    /// `print e`, `wait e`, `os e`, `do e`, `input var` and the one-path file
    /// commands.
    fn parse_unary_command(&mut self) -> Node {
        let op = self.advance();
        let operand = if op.kind == TokenKind::Input {
            self.parse_target()
        } else {
            self.parse_expression()
        };
        Node::UnaryOp { op,
                        operand: Box::new(operand) }
    }

    /// `type text[, delay]`, `writefile`, `appendfile`, `copy` and `rename`.
    ///
    /// An omitted `type` delay becomes a literal `0`.
    fn parse_binary_command(&mut self) -> Node {
        let op = self.advance();
        let left = self.parse_expression();

        let right = if op.kind == TokenKind::Type && !self.check(TokenKind::Comma) {
            Node::Literal(Token::new(TokenKind::Int, "0", op.pos))
        } else {
            if self.require(TokenKind::Comma, "','").kind == TokenKind::Invalid {
                return Self::placeholder();
            }
            self.parse_expression()
        };

        Node::BinaryOp { op,
                         left: Box::new(left),
                         right: Box::new(right) }
    }

    /// `press|hold|release b1, b2, ...[, duration]`.
    ///
    /// A trailing numeric literal after at least one button is the duration.
    fn parse_key_action(&mut self) -> Node {
        let token = self.advance();
        let kind = match token.kind {
            TokenKind::Press => KeyKind::Press,
            TokenKind::Hold => KeyKind::Hold,
            _ => KeyKind::Release,
        };

        let mut buttons = self.parse_comma_list();
        let trailing_number = buttons.len() > 1
                              && matches!(buttons.last(),
                                          Some(Node::Literal(Token { kind: TokenKind::Int
                                                                           | TokenKind::Float,
                                                                     .. })));
        let duration = if trailing_number { buttons.pop().map(Box::new) } else { None };

        Node::KeyAction { token,
                          kind,
                          buttons,
                          duration }
    }

    /// `move x, y[, t]`, `dmove dx, dy[, t]` and `scroll amount[, t]`.
    fn parse_mouse_action(&mut self) -> Node {
        let token = self.advance();
        let kind = match token.kind {
            TokenKind::Move => MouseKind::Move,
            TokenKind::DMove => MouseKind::DMove,
            _ => MouseKind::Scroll,
        };

        let x = self.parse_expression();
        let y = if kind == MouseKind::Scroll {
            None
        } else {
            if self.require(TokenKind::Comma, "','").kind == TokenKind::Invalid {
                return Self::placeholder();
            }
            Some(Box::new(self.parse_expression()))
        };
        let time = self.match_kinds(&[TokenKind::Comma])
                       .map(|_| Box::new(self.parse_expression()));

        Node::MouseAction { token,
                            kind,
                            x: Box::new(x),
                            y,
                            time }
    }
}

/// Whether a token of `kind` can begin an expression statement.
const fn starts_expression(kind: TokenKind) -> bool {
    kind.is_literal()
    || kind.is_builtin_variable()
    || kind.is_unary_prefix()
    || matches!(kind, TokenKind::LeftParen)
}
