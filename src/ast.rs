use std::fmt::{self, Write};

use crate::interpreter::{grammar::TokenKind, lexer::Token};

/// A sequence of statements executed in its own scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub statements: Vec<Node>,
}

/// The key actions a `KeyAction` node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Press and release after an optional duration.
    Press,
    /// Press without releasing.
    Hold,
    /// Release previously held buttons.
    Release,
}

/// The pointer actions a `MouseAction` node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    /// Move to an absolute position.
    Move,
    /// Move relative to the current position.
    DMove,
    /// Turn the wheel.
    Scroll,
}

/// Single-token statements that change run control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Break,
    Continue,
    Exit,
}

/// An abstract syntax tree node.
///
/// Expressions keep the token they were built from; statement nodes keep the
/// token that introduced them so diagnostics can point at it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A nested block. Also used as the placeholder after a syntax error.
    Block(Block),
    /// An integer, float, string or boolean literal.
    Literal(Token),
    /// A variable or a builtin pseudo-variable such as `pi`.
    Variable(Token),
    /// Prefix operators, named functions, one-operand commands and
    /// increment/decrement.
    UnaryOp {
        /// The operator, function or command token.
        op:      Token,
        /// The single operand.
        operand: Box<Self>,
    },
    /// Binary operators, assignments and two-operand commands.
    BinaryOp {
        /// The operator or command token.
        op:    Token,
        /// Left operand; the target variable for assignments.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    If {
        /// The `if` keyword.
        token:      Token,
        /// Branch condition.
        condition:  Box<Self>,
        /// Statements run when the condition holds.
        then_block: Block,
        /// Statements run otherwise; an `else if` chain nests here.
        else_block: Option<Block>,
    },
    While {
        /// The `while` keyword.
        token:     Token,
        /// Loop condition.
        condition: Box<Self>,
        /// Loop body.
        body:      Block,
    },
    For {
        /// The `for` keyword.
        token:       Token,
        /// Runs once, one level deeper than the loop itself.
        initializer: Box<Self>,
        /// Checked before every pass.
        condition:   Box<Self>,
        /// Runs after every pass that was not broken out of.
        increment:   Box<Self>,
        /// Loop body.
        body:        Block,
    },
    KeyAction {
        /// The `press`, `hold` or `release` keyword.
        token:    Token,
        kind:     KeyKind,
        /// Button name expressions in order.
        buttons:  Vec<Self>,
        /// Press duration in seconds, when written as a trailing literal.
        duration: Option<Box<Self>>,
    },
    MouseAction {
        /// The `move`, `dmove` or `scroll` keyword.
        token: Token,
        kind:  MouseKind,
        /// Horizontal coordinate, or the scroll amount.
        x:     Box<Self>,
        /// Vertical coordinate; absent for `scroll`.
        y:     Option<Box<Self>>,
        /// Duration of the movement in seconds.
        time:  Option<Box<Self>>,
    },
    Command {
        /// The command keyword.
        token: Token,
        kind:  CommandKind,
    },
}

impl Node {
    /// The token a diagnostic about this node should point at.
    #[must_use]
    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::Block(block) => block.statements.first().and_then(Self::token),
            Self::Literal(token) | Self::Variable(token) => Some(token),
            Self::UnaryOp { op, .. } | Self::BinaryOp { op, .. } => Some(op),
            Self::If { token, .. }
            | Self::While { token, .. }
            | Self::For { token, .. }
            | Self::KeyAction { token, .. }
            | Self::MouseAction { token, .. }
            | Self::Command { token, .. } => Some(token),
        }
    }

    /// Source offset of [`Node::token`], or zero for an empty block.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.token().map_or(0, |token| token.pos)
    }

    /// Whether this statement yields a value the REPL should echo.
    #[must_use]
    pub fn is_expression(&self) -> bool {
        match self {
            Self::Literal(_) | Self::Variable(_) => true,
            Self::UnaryOp { op, .. } => op.kind.is_unary_prefix(),
            Self::BinaryOp { op, .. } => op.kind.is_binary_operator(),
            _ => false,
        }
    }

    /// Re-serialises the tree as KMSL source.
    ///
    /// Every binary expression is parenthesised, so parsing the output yields
    /// a tree of the same shape.
    ///
    /// # Example
    /// ```
    /// use kmsl::interpreter::parser::parse_source;
    ///
    /// let (root, errors) = parse_source("x = 1 + 2 * 3");
    /// assert!(!errors.has_errors());
    /// assert_eq!(root.to_source(), "x = (1 + (2 * 3))");
    /// ```
    #[must_use]
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Block(block) => write_statements(&mut out, block, 0),
            node => write_statement(&mut out, node, 0),
        }
        out
    }
}

impl Block {
    /// Runs [`Node::to_source`] on a block without its braces.
    #[must_use]
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        write_statements(&mut out, self, 0);
        out
    }
}

fn write_statements(out: &mut String, block: &Block, indent: usize) {
    for (i, statement) in block.statements.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&"    ".repeat(indent));
        write_statement(out, statement, indent);
    }
}

fn write_braced(out: &mut String, block: &Block, indent: usize) {
    out.push_str("{\n");
    write_statements(out, block, indent + 1);
    if !block.statements.is_empty() {
        out.push('\n');
    }
    out.push_str(&"    ".repeat(indent));
    out.push('}');
}

fn write_statement(out: &mut String, node: &Node, indent: usize) {
    match node {
        Node::Block(block) => write_braced(out, block, indent),
        Node::UnaryOp { op, operand }
            if matches!(op.kind, TokenKind::Increment | TokenKind::Decrement) =>
        {
            write_expression(out, operand);
            out.push_str(&op.text);
        },
        Node::UnaryOp { op, operand } if op.kind.is_unary_command() => {
            let _ = write!(out, "{} ", op.text);
            write_expression(out, operand);
        },
        Node::BinaryOp { op, left, right } if op.kind.is_assignment() => {
            write_expression(out, left);
            let _ = write!(out, " {} ", op.text);
            write_expression(out, right);
        },
        Node::BinaryOp { op, left, right } if op.kind.is_binary_command() => {
            let _ = write!(out, "{} ", op.text);
            write_expression(out, left);
            out.push_str(", ");
            write_expression(out, right);
        },
        Node::If { condition,
                   then_block,
                   else_block,
                   .. } => {
            out.push_str("if ");
            write_expression(out, condition);
            out.push(' ');
            write_braced(out, then_block, indent);
            if let Some(block) = else_block {
                out.push_str(" else ");
                write_braced(out, block, indent);
            }
        },
        Node::While { condition, body, .. } => {
            out.push_str("while ");
            write_expression(out, condition);
            out.push(' ');
            write_braced(out, body, indent);
        },
        Node::For { initializer,
                    condition,
                    increment,
                    body,
                    .. } => {
            out.push_str("for (");
            write_statement(out, initializer, indent);
            out.push_str(", ");
            write_expression(out, condition);
            out.push_str(", ");
            write_statement(out, increment, indent);
            out.push_str(") ");
            write_braced(out, body, indent);
        },
        Node::KeyAction { token,
                          buttons,
                          duration,
                          .. } => {
            let _ = write!(out, "{} ", token.text);
            write_list(out, buttons.iter().chain(duration.as_deref()));
        },
        Node::MouseAction { token, x, y, time, .. } => {
            let _ = write!(out, "{} ", token.text);
            write_list(out,
                       std::iter::once(x.as_ref()).chain(y.as_deref()).chain(time.as_deref()));
        },
        Node::Command { token, .. } => out.push_str(&token.text),
        expression => write_expression(out, expression),
    }
}

fn write_list<'a>(out: &mut String, nodes: impl Iterator<Item = &'a Node>) {
    for (i, node) in nodes.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expression(out, node);
    }
}

fn write_expression(out: &mut String, node: &Node) {
    match node {
        Node::Literal(token) if token.kind == TokenKind::String => {
            let _ = write!(out, "\"{}\"", token.text);
        },
        Node::Literal(token) | Node::Variable(token) => out.push_str(&token.text),
        Node::UnaryOp { op, operand } => {
            let _ = write!(out, "{} (", op.text);
            write_expression(out, operand);
            out.push(')');
        },
        Node::BinaryOp { op, left, right } => {
            out.push('(');
            write_expression(out, left);
            let _ = write!(out, " {} ", op.text);
            write_expression(out, right);
            out.push(')');
        },
        statement => write_statement(out, statement, 0),
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block(")?;
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{statement}")?;
        }
        f.write_str(")")
    }
}

/// Debug rendering: node kinds and token texts, without offsets.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(block) => write!(f, "{block}"),
            Self::Literal(token) if token.kind == TokenKind::String => {
                write!(f, "Literal(\"{}\")", token.text)
            },
            Self::Literal(token) => write!(f, "Literal({})", token.text),
            Self::Variable(token) => write!(f, "Variable({})", token.text),
            Self::UnaryOp { op, operand } => write!(f, "UnaryOp({}, {operand})", op.text),
            Self::BinaryOp { op, left, right } => {
                write!(f, "BinaryOp({}, {left}, {right})", op.text)
            },
            Self::If { condition,
                       then_block,
                       else_block,
                       .. } => match else_block {
                Some(else_block) => write!(f, "If({condition}, {then_block}, {else_block})"),
                None => write!(f, "If({condition}, {then_block})"),
            },
            Self::While { condition, body, .. } => write!(f, "While({condition}, {body})"),
            Self::For { initializer,
                        condition,
                        increment,
                        body,
                        .. } => write!(f, "For({initializer}, {condition}, {increment}, {body})"),
            Self::KeyAction { kind,
                              buttons,
                              duration,
                              .. } => {
                write!(f, "KeyAction({kind:?}, [")?;
                for (i, button) in buttons.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{button}")?;
                }
                f.write_str("]")?;
                if let Some(duration) = duration {
                    write!(f, ", {duration}")?;
                }
                f.write_str(")")
            },
            Self::MouseAction { kind, x, y, time, .. } => {
                write!(f, "MouseAction({kind:?}, {x}")?;
                if let Some(y) = y {
                    write!(f, ", {y}")?;
                }
                if let Some(time) = time {
                    write!(f, ", time {time}")?;
                }
                f.write_str(")")
            },
            Self::Command { kind, .. } => write!(f, "Command({kind:?})"),
        }
    }
}
