//! # kmsl
//!
//! kmsl is an interpreter for the Keyboard and Mouse Scripting Language, a
//! small dynamically typed language for automating key presses, pointer
//! movement, typing and file chores. Programs are lexed, parsed, checked and
//! then executed against pluggable host services.
//!
//! # Example
//! ```
//! use kmsl::{
//!     io::{Event, Recorder, Services},
//!     run,
//! };
//!
//! let recorder = Recorder::new();
//! let report = run("for (i = 0, i < 2, i++) {\n    press \"A\"\n}",
//!                  Services::recording(&recorder));
//!
//! assert!(!report.has_errors());
//! assert_eq!(recorder.events().len(), 2);
//! assert!(matches!(&recorder.events()[0], Event::Press { buttons, .. } if buttons == &["A"]));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed programs.
///
/// This module declares the `Node` enum and the `Block` that holds a
/// statement list. The parser builds the tree, the semantic analyzer checks
/// it and the evaluator walks it.
///
/// # Responsibilities
/// - Defines one node per expression, statement and command form.
/// - Keeps the operator or keyword token on each node for error positions.
/// - Re-serialises trees as source text for logging and tests.
pub mod ast;
/// Provides the error types of every phase and the diagnostic sink.
///
/// Syntax, semantic and runtime errors are separate enums. None of them
/// stops the pipeline by itself: each is converted into a diagnostic and
/// collected by the `ErrorHandler`, which renders them against the source.
///
/// # Responsibilities
/// - Defines error enums for the lexer and parser, the analyzer and the
///   evaluator.
/// - Records diagnostics in report order with their source offsets.
/// - Renders diagnostics with line numbers and a caret under the offending
///   token.
pub mod error;
/// Implements the language pipeline.
///
/// # Responsibilities
/// - Tokenizes source text with the ordered rule table.
/// - Parses tokens into an AST and checks it statically.
/// - Executes the AST over the runtime value model.
pub mod interpreter;
/// Host services a running program talks to.
///
/// Every effect a program can have goes through one of the traits declared
/// here, so the same interpreter runs against the real host or against an
/// in-memory recorder.
///
/// # Responsibilities
/// - Declares the device, file system, system and console traits.
/// - Provides host-backed implementations and the `Recorder`.
/// - Maps button names to key codes.
pub mod io;
/// The interactive read-eval-print loop.
pub mod repl;
/// Runs whole programs and keeps interactive state between them.
///
/// # Responsibilities
/// - Drives lexing, parsing, analysis and execution in order, stopping after
///   a phase that reported errors.
/// - Carries variables and symbols across interactive submissions.
/// - Summarises a run as a `RunReport`.
pub mod session;
/// General utilities for safe numeric conversion and source preparation.
///
/// # Responsibilities
/// - Safely convert between `i64`, `u32`, `usize` and `f64` without silent
///   data loss.
/// - Expand escaped line breaks before lexing.
pub mod util;

pub use session::{Config, RunReport, Session, run};
