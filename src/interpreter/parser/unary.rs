use crate::{
    ast::Node,
    error::SyntaxError,
    interpreter::{grammar::TokenKind, parser::core::Parser},
};

impl Parser<'_> {
    /// Parses a factor.
    ///
    /// Grammar:
    /// ```text
    /// factor := prefix factor
    ///         | "(" expression ")"
    ///         | literal
    ///         | variable
    /// prefix := "+" | "-" | "!" | "~" | function
    /// ```
    /// Functions such as `sin`, `state` or `readfile` take a single factor,
    /// so `sin x + 1` is `(sin x) + 1`. Parentheses and prefixes nest at most
    /// [`MAX_NESTING`](crate::interpreter::parser::core::MAX_NESTING) levels.
    pub(in crate::interpreter::parser) fn parse_factor(&mut self) -> Node {
        let token = self.peek().clone();
        match token.kind {
            kind if kind == TokenKind::LeftParen || kind.is_unary_prefix() => {
                if !self.descend(&token) {
                    self.skip_factor();
                    return Self::placeholder();
                }
                let node = if kind == TokenKind::LeftParen {
                    self.advance();
                    let inner = self.parse_expression();
                    self.require(TokenKind::RightParen, "')'");
                    inner
                } else {
                    let op = self.advance();
                    let operand = self.parse_factor();
                    Node::UnaryOp { op,
                                    operand: Box::new(operand) }
                };
                self.ascend();
                node
            },
            TokenKind::Int => {
                self.advance();
                if token.text.parse::<i64>().is_err() {
                    self.report(SyntaxError::LiteralTooLarge { literal: token.text.clone(),
                                                               pos:     token.pos, });
                }
                Node::Literal(token)
            },
            TokenKind::Float | TokenKind::String | TokenKind::Bool => {
                self.advance();
                Node::Literal(token)
            },
            kind if kind == TokenKind::Variable || kind.is_builtin_variable() => {
                self.advance();
                Node::Variable(token)
            },
            _ => {
                self.report(SyntaxError::ExpectedExpression { found: token.describe(),
                                                              pos:   token.pos, });
                Self::placeholder()
            },
        }
    }
}
