//! Main parser coordinator
//!
//! Provides the [`Parser`] struct and its parsing infrastructure: the
//! buffered token reader with `la`/`mark`/`reset`, the mutable type-name
//! tables used to disambiguate declarations from expressions, and the error
//! type shared by the declaration, statement, and expression modules.
//!
//! # Parser Architecture
//!
//! Recursive descent with Pratt precedence for binary operators, split
//! across `impl Parser` blocks:
//! - This module: parser state, helpers, entry point
//! - `declarations`: external declarations, typedefs, structs, functions
//! - `statements`: statements and compound bodies
//! - `expressions`: Pratt expression parsing
//!
//! # Disambiguation
//!
//! C cannot be parsed context-free: `my_int * y;` is a declaration only if
//! `my_int` names a type. The parser keeps two live sets, `typedef_names`
//! and `struct_tags`, seeded with the builtin type names and grown as
//! typedefs and struct tags are parsed. Both sets only ever grow during a
//! parse. Backtracking is bounded: a single `mark`/`reset` pair around each
//! designated decision point (type-vs-expression head, function-vs-variable).

use crate::lexer::{Token, TokenKind};
use crate::parser::ast::TranslationUnit;
use crate::source::{SourceBuffer, SourceLocation};
use rustc_hash::FxHashSet;
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Builtin type names seeded into `typedef_names` before parsing begins.
const BUILTIN_TYPE_NAMES: &[&str] = &[
    "int",
    "char",
    "float",
    "double",
    "long",
    "void",
    "unsigned int",
    "unsigned char",
    "unsigned long",
];

/// Fixed-width aliases recognized without a typedef, so that headers using
/// the Khronos platform names parse even when khrplatform.h is not inlined.
const FIXED_WIDTH_TYPE_NAMES: &[&str] = &[
    "int8_t",
    "int16_t",
    "int32_t",
    "int64_t",
    "uint8_t",
    "uint16_t",
    "uint32_t",
    "uint64_t",
    "size_t",
    "intptr_t",
    "uintptr_t",
    "khronos_int8_t",
    "khronos_uint8_t",
    "khronos_int16_t",
    "khronos_uint16_t",
    "khronos_int32_t",
    "khronos_uint32_t",
    "khronos_int64_t",
    "khronos_uint64_t",
    "khronos_intptr_t",
    "khronos_uintptr_t",
    "khronos_ssize_t",
    "khronos_usize_t",
    "khronos_float_t",
];

/// Recursive descent parser over a projected token stream.
pub struct Parser<'a> {
    src: &'a SourceBuffer,
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
    pub(crate) typedef_names: FxHashSet<String>,
    pub(crate) struct_tags: FxHashSet<String>,
}

impl<'a> Parser<'a> {
    /// Build a parser over `tokens`, which may or may not end with an EOF
    /// token (projection strips it; a raw lexed stream keeps it).
    pub fn new(src: &'a SourceBuffer, tokens: Vec<Token>) -> Self {
        let eof = Token {
            kind: TokenKind::Eof,
            start: src.len(),
            len: 0,
            leading: Vec::new(),
            pp: Default::default(),
        };

        let mut typedef_names = FxHashSet::default();
        for name in BUILTIN_TYPE_NAMES.iter().chain(FIXED_WIDTH_TYPE_NAMES) {
            typedef_names.insert((*name).to_string());
        }

        Self {
            src,
            tokens,
            pos: 0,
            eof,
            typedef_names,
            struct_tags: FxHashSet::default(),
        }
    }

    /// Parse the entire stream as a translation unit.
    pub fn parse_translation_unit(&mut self) -> Result<TranslationUnit, ParseError> {
        let mut tu = TranslationUnit::new();
        while !self.is_at_end() {
            self.parse_external_declaration(&mut tu.decls)?;
        }
        log::debug!(
            "parsed {} declarations, {} typedef names, {} struct tags",
            tu.decls.len(),
            self.typedef_names.len(),
            self.struct_tags.len()
        );
        Ok(tu)
    }

    /// Whether `name` currently acts as a type name.
    pub(crate) fn is_type_name(&self, name: &str) -> bool {
        self.typedef_names.contains(name) || self.struct_tags.contains(name)
    }

    // ===== Reader =====

    /// Look ahead `k` tokens without consuming; past the end it yields EOF.
    pub(crate) fn la(&self, k: usize) -> &Token {
        self.tokens.get(self.pos + k).unwrap_or(&self.eof)
    }

    pub(crate) fn current(&self) -> &Token {
        self.la(0)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the current token if it has `kind`.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume and return the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// Record the reader position for a bounded backtrack.
    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    /// Rewind to a position previously obtained from [`Parser::mark`].
    pub(crate) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.src.location(self.current().start)
    }

    pub(crate) fn lexeme(&self, tok: &Token) -> &'a str {
        self.src.slice(tok.start, tok.len)
    }

    /// Current token's lexeme.
    pub(crate) fn current_lexeme(&self) -> &'a str {
        self.src.slice(self.current().start, self.current().len)
    }

    /// Consume a token of `kind` or fail with `message`.
    pub(crate) fn eat(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(&format!("{}, found {}", message, self.describe_current())))
        }
    }

    /// Consume an identifier and return its name.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Result<String, ParseError> {
        if self.check(TokenKind::Identifier) {
            let tok = self.advance();
            Ok(self.lexeme(&tok).to_string())
        } else {
            Err(self.error(&format!(
                "Expected {}, found {}",
                what,
                self.describe_current()
            )))
        }
    }

    /// Strip the outer quotes of a string token's lexeme. Escapes are left
    /// as written.
    pub(crate) fn cooked_string(&self, tok: &Token) -> String {
        let raw = self.lexeme(tok);
        raw[1..raw.len() - 1].to_string()
    }

    pub(crate) fn error(&self, message: &str) -> ParseError {
        ParseError {
            message: message.to_string(),
            location: self.current_location(),
        }
    }

    /// Human-readable form of the current token for error messages.
    pub(crate) fn describe_current(&self) -> String {
        let tok = self.current();
        match tok.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Identifier => format!("identifier '{}'", self.lexeme(tok)),
            _ => tok.kind.to_string(),
        }
    }
}

/// Test helper: lex and parse a source string in one step.
#[cfg(test)]
pub(crate) fn parse_source(text: &str) -> Result<TranslationUnit, ParseError> {
    let src = SourceBuffer::new("test.c", text);
    let tokens = crate::lexer::Lexer::new(&src)
        .tokenize()
        .expect("lexing failed");
    Parser::new(&src, tokens).parse_translation_unit()
}
