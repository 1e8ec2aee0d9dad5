use crate::{
    ast::Node,
    interpreter::{grammar::TokenKind, parser::core::Parser},
};

impl Parser<'_> {
    /// Parses `expression ("," expression)*`.
    ///
    /// Used by the key actions, whose argument count is open-ended.
    pub(in crate::interpreter::parser) fn parse_comma_list(&mut self) -> Vec<Node> {
        let mut items = vec![self.parse_expression()];
        while self.match_kinds(&[TokenKind::Comma]).is_some() {
            items.push(self.parse_expression());
        }
        items
    }

    /// Parses the variable an `input`, `++` or `--` writes to.
    pub(in crate::interpreter::parser) fn parse_target(&mut self) -> Node {
        let token = self.require(TokenKind::Variable, "a variable");
        if token.kind == TokenKind::Invalid {
            return Self::placeholder();
        }
        Node::Variable(token)
    }
}
