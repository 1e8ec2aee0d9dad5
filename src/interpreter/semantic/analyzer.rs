use log::debug;

use crate::{
    ast::{Block, CommandKind, Node},
    error::{ErrorHandler, SemanticError},
    interpreter::{
        grammar::TokenKind,
        lexer::Token,
        semantic::symbols::{DataType, Symbol, SymbolTable},
    },
};

/// Walks an AST before execution, resolving names and inferring types.
///
/// In batch mode the analyzer owns all of its state. In incremental mode it
/// also resolves against, and writes every declaration into, a symbol list
/// owned by an interactive session, so later submissions see earlier ones.
pub struct SemanticAnalyzer<'a> {
    table:   SymbolTable,
    shared:  Option<&'a mut Vec<Symbol>>,
    in_loop: bool,
    errors:  &'a mut ErrorHandler,
}

impl<'a> SemanticAnalyzer<'a> {
    /// A batch-mode analyzer reporting into `errors`.
    pub fn new(errors: &'a mut ErrorHandler) -> Self {
        Self { table: SymbolTable::new(),
               shared: None,
               in_loop: false,
               errors }
    }

    /// An incremental analyzer over a session's symbol list.
    ///
    /// `base_depth` is the depth the root block's enclosing level has in the
    /// session, so symbol depths agree with the variables the interpreter
    /// creates.
    pub fn incremental(shared: &'a mut Vec<Symbol>,
                       base_depth: usize,
                       errors: &'a mut ErrorHandler)
                       -> Self {
        Self { table: SymbolTable::with_base_depth(base_depth),
               shared: Some(shared),
               in_loop: false,
               errors }
    }

    /// Analyzes a program's root block.
    ///
    /// Symbols declared directly in the root block survive in the shared
    /// list; deeper ones are pruned as their blocks close.
    pub fn analyze(&mut self, root: &Block) {
        let errors_before = self.errors.len();

        self.table.enter_scope();
        for statement in &root.statements {
            self.visit(statement);
        }
        let depth = self.table.depth();
        if let Some(shared) = self.shared.as_deref_mut() {
            shared.retain(|symbol| symbol.depth <= depth);
        }
        self.table.exit_scope();

        if self.errors.len() == errors_before {
            debug!("semantic analysis passed");
        }
    }

    /// Visits a node and returns its static type.
    fn visit(&mut self, node: &Node) -> DataType {
        match node {
            Node::Block(block) => {
                self.visit_block(block);
                DataType::Undefined
            },
            Node::Literal(token) => DataType::of_literal(token.kind),
            Node::Variable(token) => self.visit_variable(token),
            Node::UnaryOp { op, operand } => self.visit_unary(op, operand),
            Node::BinaryOp { op, left, right } => self.visit_binary(op, left, right),
            Node::If { token,
                       condition,
                       then_block,
                       else_block, } => {
                self.check_condition("if", token, condition);
                self.visit_block(then_block);
                if let Some(block) = else_block {
                    self.visit_block(block);
                }
                DataType::Undefined
            },
            Node::While { token,
                          condition,
                          body, } => {
                self.check_condition("while", token, condition);
                let outer = std::mem::replace(&mut self.in_loop, true);
                self.visit_block(body);
                self.in_loop = outer;
                DataType::Undefined
            },
            Node::For { token,
                        initializer,
                        condition,
                        increment,
                        body, } => {
                // The loop variable and the body share one level.
                self.table.enter_scope();
                self.visit(initializer);
                self.check_condition("for", token, condition);
                let outer = std::mem::replace(&mut self.in_loop, true);
                for statement in &body.statements {
                    self.visit(statement);
                }
                self.in_loop = outer;
                self.visit(increment);
                self.leave_scope();
                DataType::Undefined
            },
            Node::KeyAction { buttons, duration, .. } => {
                for button in buttons {
                    self.visit(button);
                }
                if let Some(duration) = duration {
                    self.visit(duration);
                }
                DataType::Undefined
            },
            Node::MouseAction { x, y, time, .. } => {
                self.visit(x);
                for operand in [y, time].into_iter().flatten() {
                    self.visit(operand);
                }
                DataType::Undefined
            },
            Node::Command { token, kind } => {
                let command = match kind {
                    CommandKind::Break => "break",
                    CommandKind::Continue => "continue",
                    CommandKind::Exit => return DataType::Undefined,
                };
                if !self.in_loop {
                    self.errors.report(SemanticError::OutsideLoop { command,
                                                                    pos: token.pos });
                }
                DataType::Undefined
            },
        }
    }

    fn visit_block(&mut self, block: &Block) {
        self.table.enter_scope();
        for statement in &block.statements {
            self.visit(statement);
        }
        self.leave_scope();
    }

    /// Closes the innermost scope, pruning shared symbols declared in it.
    fn leave_scope(&mut self) {
        let depth = self.table.depth();
        if let Some(shared) = self.shared.as_deref_mut() {
            shared.retain(|symbol| symbol.depth < depth);
        }
        self.table.exit_scope();
    }

    fn check_condition(&mut self, construct: &'static str, token: &Token, condition: &Node) {
        let found = self.visit(condition);
        if !matches!(found, DataType::Bool | DataType::Undefined) {
            self.errors.report(SemanticError::NonBooleanCondition { construct,
                                                                    found,
                                                                    pos: token.pos });
        }
    }

    fn visit_variable(&mut self, token: &Token) -> DataType {
        match token.kind {
            TokenKind::Pi | TokenKind::Euler => DataType::Float,
            kind if kind.is_builtin_variable() => DataType::Int,
            _ => {
                if let Some(data_type) = self.resolve(&token.text) {
                    return data_type;
                }
                self.errors.report(SemanticError::UndeclaredVariable { name: token.text.clone(),
                                                                       pos:  token.pos, });
                DataType::Undefined
            },
        }
    }

    fn visit_unary(&mut self, op: &Token, operand: &Node) -> DataType {
        let operand_type = self.visit(operand);
        match op.kind {
            TokenKind::Increment
            | TokenKind::Decrement
            | TokenKind::Plus
            | TokenKind::Minus => match operand_type {
                DataType::Int | DataType::Float => operand_type,
                _ => DataType::Undefined,
            },
            TokenKind::Abs => operand_type,
            TokenKind::Not | TokenKind::State | TokenKind::Exists => DataType::Bool,
            TokenKind::BitNot
            | TokenKind::Round
            | TokenKind::Ceil
            | TokenKind::Floor
            | TokenKind::ToInt
            | TokenKind::Len => DataType::Int,
            TokenKind::Sin
            | TokenKind::Cos
            | TokenKind::Tan
            | TokenKind::Asin
            | TokenKind::Acos
            | TokenKind::Atan
            | TokenKind::Sqrt
            | TokenKind::Ln
            | TokenKind::ToFloat => DataType::Float,
            TokenKind::ToStr | TokenKind::ReadFile => DataType::String,
            _ => DataType::Undefined,
        }
    }

    fn visit_binary(&mut self, op: &Token, left: &Node, right: &Node) -> DataType {
        let target = match left {
            Node::Variable(token) if token.kind == TokenKind::Variable => Some(token),
            _ => None,
        };

        if op.kind == TokenKind::Assign
           && let Some(target) = target
        {
            let value_type = self.visit(right);
            self.assign(&target.text, value_type);
            return DataType::Undefined;
        }

        if let Some(base) = op.kind.compound_base()
           && let Some(target) = target
        {
            let current = self.resolve(&target.text);
            let value_type = self.visit(right);
            match current {
                Some(current) => self.assign(&target.text, infer(base, current, value_type)),
                None => {
                    self.errors.report(SemanticError::CompoundToUndeclared { name: target.text
                                                                                  .clone(),
                                                                            op:   op.text.clone(),
                                                                            pos:  op.pos, })
                },
            }
            return DataType::Undefined;
        }

        let left_type = self.visit(left);
        let right_type = self.visit(right);
        if op.kind.is_binary_command() {
            return DataType::Undefined;
        }
        infer(op.kind, left_type, right_type)
    }

    /// Looks `name` up in the local scopes, then in the shared list.
    fn resolve(&self, name: &str) -> Option<DataType> {
        if let Some(symbol) = self.table.resolve(name) {
            return Some(symbol.data_type);
        }
        let depth = self.table.depth();
        self.shared
            .as_deref()?
            .iter()
            .filter(|symbol| symbol.name == name && symbol.depth <= depth)
            .max_by_key(|symbol| symbol.depth)
            .map(|symbol| symbol.data_type)
    }

    /// Declares `name` or updates its type, mirroring into the shared list.
    fn assign(&mut self, name: &str, data_type: DataType) {
        let depth = self.table.depth();
        let symbol = match self.table.update(name, data_type) {
            Some(symbol) => symbol,
            None => match self.shared_visible_depth(name, depth) {
                Some(shared_depth) => Symbol::new(name, data_type, shared_depth),
                None => self.table.declare(name, data_type),
            },
        };

        if let Some(shared) = self.shared.as_deref_mut() {
            match shared.iter_mut()
                        .find(|s| s.name == symbol.name && s.depth == symbol.depth)
            {
                Some(existing) => existing.data_type = symbol.data_type,
                None => shared.push(symbol),
            }
        }
    }

    fn shared_visible_depth(&self, name: &str, depth: usize) -> Option<usize> {
        self.shared
            .as_deref()?
            .iter()
            .filter(|symbol| symbol.name == name && symbol.depth <= depth)
            .map(|symbol| symbol.depth)
            .max()
    }
}

/// Infers the static result type of a binary operator.
///
/// Comparison and logical operators are boolean. Division, power, root and
/// logarithm are float, floor division is int, and the rest are float when
/// either operand is. Strings only combine through `+` and `* int`.
#[must_use]
pub fn infer(op: TokenKind, left: DataType, right: DataType) -> DataType {
    use DataType::{Bool, Float, Int, String, Undefined};

    if op.is_comparison() {
        return Bool;
    }
    match (op, left, right) {
        (_, Undefined, _) | (_, _, Undefined) => Undefined,
        (TokenKind::Plus, String, String)
        | (TokenKind::Multiply, String, Int)
        | (TokenKind::Multiply, Int, String) => String,
        (_, String | Bool, _) | (_, _, String | Bool) => Undefined,
        (TokenKind::Divide | TokenKind::Power | TokenKind::Root | TokenKind::Log, ..) => Float,
        (TokenKind::FloorDivide, ..) => Int,
        (_, Float, _) | (_, _, Float) => Float,
        _ => Int,
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::{error::DiagnosticKind, interpreter::parser::parse_source};

    fn analyze(source: &str) -> Vec<String> {
        let (root, mut errors) = parse_source(source);
        assert!(!errors.has_errors(), "{}", errors.render());
        SemanticAnalyzer::new(&mut errors).analyze(&root);
        errors.diagnostics()
              .iter()
              .inspect(|d| assert_eq!(d.kind, DiagnosticKind::Semantic))
              .map(|d| d.message.clone())
              .collect()
    }

    #[test]
    fn accepts_well_formed_programs() {
        let source = indoc! {"
            n = 5
            result = 1
            while n > 0 {
                result *= n
                n -= 1
            }
            for (i = 0, i < 3, i++) { if (i == 1) { break } print i }
            print result
        "};

        assert!(analyze(source).is_empty());
    }

    #[test]
    fn reports_undeclared_reads_and_compound_targets() {
        assert_eq!(analyze("print y"), ["undeclared variable 'y'"]);
        assert_eq!(analyze("z += 1"), ["'+=' requires 'z' to be declared first"]);
        assert!(analyze("print pi + random").is_empty());
    }

    #[test]
    fn block_locals_are_not_visible_afterwards() {
        let source = indoc! {"
            if true { inner = 1 }
            print inner
            for (i = 0, i < 2, i++) { }
            print i
        "};

        assert_eq!(analyze(source), ["undeclared variable 'inner'", "undeclared variable 'i'"]);
    }

    #[test]
    fn conditions_must_be_boolean() {
        assert_eq!(analyze("x = 1\nwhile x { x -= 1 }"),
                   ["while condition must be boolean, found int"]);
        assert_eq!(analyze("if \"s\" { }"), ["if condition must be boolean, found string"]);
    }

    #[test]
    fn loop_control_needs_a_loop() {
        assert_eq!(analyze("break"), ["'break' outside of a loop"]);
        assert_eq!(analyze("if true { continue }"), ["'continue' outside of a loop"]);
        assert!(analyze("while true { if true { break } }").is_empty());
    }

    #[test]
    fn static_types_follow_the_operator_table() {
        assert_eq!(infer(TokenKind::Divide, DataType::Int, DataType::Int), DataType::Float);
        assert_eq!(infer(TokenKind::FloorDivide, DataType::Float, DataType::Int), DataType::Int);
        assert_eq!(infer(TokenKind::Plus, DataType::Int, DataType::Float), DataType::Float);
        assert_eq!(infer(TokenKind::Multiply, DataType::String, DataType::Int), DataType::String);
        assert_eq!(infer(TokenKind::Less, DataType::Int, DataType::Int), DataType::Bool);
    }

    #[test]
    fn incremental_mode_keeps_root_symbols_only() {
        let mut symbols = Vec::new();

        let (first, mut errors) = parse_source("a = 1\nif true { b = 2 }");
        SemanticAnalyzer::incremental(&mut symbols, 0, &mut errors).analyze(&first);
        assert!(!errors.has_errors());
        assert_eq!(symbols, [Symbol::new("a", DataType::Int, 1)]);

        let (second, mut errors) = parse_source("a = a * 1.5\nprint b");
        SemanticAnalyzer::incremental(&mut symbols, 0, &mut errors).analyze(&second);
        assert_eq!(errors.len(), 1);
        assert_eq!(symbols, [Symbol::new("a", DataType::Float, 1)]);
    }
}
