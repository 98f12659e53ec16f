//! # Introduction
//!
//! `ccode` is a front-end toolchain for a C subset. It parses C source text
//! and either interprets the program or emits a C# binding file exposing the
//! declarations as callable host functions.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → PP Parser → Projection (macro expansion) → Parser → AST
//!                                                                      ├─ Interpreter
//!                                                                      └─ C# emitter
//! ```
//!
//! 1. [`lexer`] — tokenizes the buffer, preserving whitespace and comments
//!    as leading trivia so the token stream reconstructs the source exactly.
//! 2. [`preproc`] — groups directives into a tree without evaluating them,
//!    then projects the tree back to a flat stream, expanding object-like
//!    macros.
//! 3. [`parser`] — recursive descent over the projected stream, using live
//!    typedef/struct-tag tables to tell declarations from expressions.
//! 4. [`interpreter`] — tree-walking execution with explicit control-flow
//!    outcomes.
//! 5. [`emit`] — renders the AST as C# P/Invoke bindings.
//!
//! ## Supported C subset
//!
//! Types: builtin scalars, `unsigned` composites, struct tags, pointers
//! (declaration-level), typedefs including function pointers.
//! Control flow: `if/else`, `while`, `for`, `break`, `continue`, `return`.
//! Preprocessor: `#define`/`#undef` (object macros expanded), `#include`
//! and conditionals captured structurally.

pub mod emit;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod preproc;
pub mod source;

use std::fmt;

use lexer::{LexError, Lexer, Token};
use parser::ast::TranslationUnit;
use parser::parse::{ParseError, Parser};
use preproc::ast::PpTranslationUnit;
use preproc::macros::MacroEnv;
use preproc::parser::{PpError, PpParser};
use source::SourceBuffer;

/// Any fatal error from the lex → pp → parse pipeline.
#[derive(Debug)]
pub enum FrontendError {
    Lex(LexError),
    Pp(PpError),
    Parse(ParseError),
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Lex(e) => e.fmt(f),
            FrontendError::Pp(e) => e.fmt(f),
            FrontendError::Parse(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for FrontendError {}

impl From<LexError> for FrontendError {
    fn from(err: LexError) -> Self {
        FrontendError::Lex(err)
    }
}

impl From<PpError> for FrontendError {
    fn from(err: PpError) -> Self {
        FrontendError::Pp(err)
    }
}

impl From<ParseError> for FrontendError {
    fn from(err: ParseError) -> Self {
        FrontendError::Parse(err)
    }
}

/// Tokenize a buffer. The returned stream ends with an EOF token.
pub fn lex(src: &SourceBuffer) -> Result<Vec<Token>, LexError> {
    Lexer::new(src).tokenize()
}

/// Group a token stream into the preprocessor tree.
pub fn pp_parse(src: &SourceBuffer, tokens: &[Token]) -> Result<PpTranslationUnit, PpError> {
    PpParser::new(src, tokens).parse()
}

/// Flatten a PP tree into a linear token stream, folding macro definitions
/// into `env` and expanding object-like macros.
pub fn project(src: &SourceBuffer, tu: &PpTranslationUnit, env: &mut MacroEnv) -> Vec<Token> {
    preproc::project::project(src, tu, env)
}

/// Parse a projected token stream into the C declaration AST.
pub fn parse(src: &SourceBuffer, tokens: Vec<Token>) -> Result<TranslationUnit, ParseError> {
    Parser::new(src, tokens).parse_translation_unit()
}

/// Run the full front-end pipeline over one buffer.
pub fn parse_source(src: &SourceBuffer) -> Result<TranslationUnit, FrontendError> {
    let tokens = lex(src)?;
    let pp_tu = pp_parse(src, &tokens)?;
    let mut env = MacroEnv::new();
    let projected = project(src, &pp_tu, &mut env);
    Ok(parse(src, projected)?)
}
