//! C declaration parser
//!
//! Transforms the projected token stream into a [`ast::TranslationUnit`]:
//! - [`ast`]: C AST node definitions
//! - [`parse`]: the [`parse::Parser`] struct, reader, and type-name tables
//! - [`declarations`], [`statements`], [`expressions`]: `impl Parser` blocks
//!   for each grammar layer
//!
//! # Supported C Subset
//!
//! - Typedefs (including function-pointer typedefs), struct declarations,
//!   function definitions, extern declarations, global variables
//! - Statements: `return`, `if`/`else`, `while`, `for`, `break`, `continue`,
//!   compound blocks, local declarations, expression statements
//! - Expressions: arithmetic, comparison, logical, assignment, calls,
//!   pre/post increment and decrement
//! - `extern "…"` wrappers and `__attribute__((dllimport|dllexport))`
//!
//! Not supported: arrays, unions, enums, casts, `sizeof`, member access,
//! ternary, compound assignment.

pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod parse;
pub mod statements;
