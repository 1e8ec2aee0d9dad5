/// The semantic analyzer: a pre-execution pass over the AST.
///
/// # Responsibilities
/// - Resolves every variable read against the scope stack.
/// - Infers static types for expressions and symbols.
/// - Rejects non-boolean conditions and loop control outside loops.
/// - In incremental mode, mirrors declarations into a symbol list owned by an
///   interactive session.
pub mod analyzer;
/// Scoped symbol table and static data types.
pub mod symbols;

pub use analyzer::SemanticAnalyzer;
pub use symbols::{DataType, Symbol, SymbolTable};
