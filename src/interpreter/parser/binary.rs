use crate::{
    ast::Node,
    interpreter::parser::core::Parser,
};

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// Grammar: `expression := term (( + | - | && | || | < | > | <= | >= | ==
    /// | != ) term)*`
    ///
    /// Comparison and logical operators share the additive tier, so
    /// `a < b + c` groups as `(a < b) + c`; use parentheses to mix them.
    pub(in crate::interpreter::parser) fn parse_expression(&mut self) -> Node {
        let mut left = self.parse_term();
        while self.peek_kind().is_expression_operator() {
            let op = self.advance();
            let right = self.parse_term();
            left = Node::BinaryOp { op,
                                    left: Box::new(left),
                                    right: Box::new(right) };
        }
        left
    }

    /// Parses the multiplicative tier.
    ///
    /// Grammar: `term := factor (( * | / | % | ** | // | ^^ | %% | & | | | ^
    /// | << | >> ) factor)*`
    fn parse_term(&mut self) -> Node {
        let mut left = self.parse_factor();
        while self.peek_kind().is_term_operator() {
            let op = self.advance();
            let right = self.parse_factor();
            left = Node::BinaryOp { op,
                                    left: Box::new(left),
                                    right: Box::new(right) };
        }
        left
    }
}
