/// The evaluator executes a checked AST against the host services.
///
/// The evaluator walks the tree statement by statement, keeps variables in
/// the depth-scoped store, drives the device, file, console and clock
/// services and reports runtime errors without stopping the program.
///
/// # Responsibilities
/// - Evaluates expressions over the dynamically typed value model.
/// - Runs blocks, branches and loops, honouring `break`, `continue` and
///   `exit`.
/// - Desugars compound assignments and runs nested `do` programs.
/// - Reports runtime errors per statement, substituting fallback values for
///   failed operators.
pub mod evaluator;
/// The ordered token rule table.
///
/// Every token kind together with the anchored pattern that produces it. The
/// first rule that matches at a position wins, so the order of the table is
/// the lexical precedence of the language.
pub mod grammar;
/// The lexer turns source text into tokens.
///
/// # Responsibilities
/// - Applies the rule table at each position, keeping the first match.
/// - Drops whitespace, turns comments into line ends and strips string
///   quotes.
/// - Reports unmatched characters when strict, and always appends a line-end
///   sentinel.
pub mod lexer;
/// The parser builds the abstract syntax tree from tokens.
///
/// # Responsibilities
/// - Checks that parentheses and braces balance before parsing anything.
/// - Parses statements, blocks and the two expression precedence tiers by
///   recursive descent.
/// - Reports syntax errors with the offending token and resynchronises at the
///   next line.
pub mod parser;
/// Static checks run between parsing and execution.
pub mod semantic;
/// The runtime data model.
///
/// This module declares the values the evaluator computes with and the store
/// that holds variable bindings between statements and, in an interactive
/// session, between submissions.
///
/// # Responsibilities
/// - Defines the `Value` enum and its checked accessors.
/// - Stores bindings with their block depth and prunes them as blocks close.
pub mod value;
