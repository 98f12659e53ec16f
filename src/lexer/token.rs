//! Token and trivia data model
//!
//! Tokens are zero-copy: each one names a `(start, length)` slice of the
//! [`SourceBuffer`](crate::source::SourceBuffer) plus the run of whitespace
//! and comments that precedes it (its leading trivia). Concatenating every
//! token's leading trivia and lexeme in order reproduces the source
//! byte-for-byte.

use crate::source::SourceBuffer;
use std::fmt;

/// Whitespace and comment material between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaKind {
    /// A run of spaces, tabs, vertical tabs, or form feeds.
    Space,
    /// One `\n` or `\r\n` (recorded as a single newline of length 2).
    Newline,
    /// `// …` up to but not including the terminating newline.
    LineComment,
    /// `/* … */` including the delimiters.
    BlockComment,
}

/// One piece of trivia, referring into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub start: usize,
    pub len: usize,
}

/// All token variants produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Identifier,
    IntLiteral,
    FloatLiteral,
    String,
    /// `#` appearing as the first non-trivia character on a line.
    DirectiveHash,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Amp,
    Eq,
    Lt,
    Gt,
    Pipe,
    Dot,
    PlusPlus,
    MinusMinus,
    EqEq,
    NotEq,
    Le,
    Ge,
    AndAnd,
    OrOr,

    // Keywords
    KwReturn,
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwBreak,
    KwContinue,
    KwExtern,
    KwTypedef,
    KwStruct,
    KwConst,
    KwVolatile,
    KwRestrict,
    KwUnsigned,
    KwAttribute,
    KwNull,
}

impl TokenKind {
    /// Keywords are spelled like identifiers and carry a PP classification.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::KwReturn
                | TokenKind::KwIf
                | TokenKind::KwElse
                | TokenKind::KwWhile
                | TokenKind::KwFor
                | TokenKind::KwBreak
                | TokenKind::KwContinue
                | TokenKind::KwExtern
                | TokenKind::KwTypedef
                | TokenKind::KwStruct
                | TokenKind::KwConst
                | TokenKind::KwVolatile
                | TokenKind::KwRestrict
                | TokenKind::KwUnsigned
                | TokenKind::KwAttribute
                | TokenKind::KwNull
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Eof => "end of file",
            TokenKind::Identifier => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::String => "string literal",
            TokenKind::DirectiveHash => "'#'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Bang => "'!'",
            TokenKind::Amp => "'&'",
            TokenKind::Eq => "'='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Pipe => "'|'",
            TokenKind::Dot => "'.'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Le => "'<='",
            TokenKind::Ge => "'>='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::KwReturn => "'return'",
            TokenKind::KwIf => "'if'",
            TokenKind::KwElse => "'else'",
            TokenKind::KwWhile => "'while'",
            TokenKind::KwFor => "'for'",
            TokenKind::KwBreak => "'break'",
            TokenKind::KwContinue => "'continue'",
            TokenKind::KwExtern => "'extern'",
            TokenKind::KwTypedef => "'typedef'",
            TokenKind::KwStruct => "'struct'",
            TokenKind::KwConst => "'const'",
            TokenKind::KwVolatile => "'volatile'",
            TokenKind::KwRestrict => "'restrict'",
            TokenKind::KwUnsigned => "'unsigned'",
            TokenKind::KwAttribute => "'__attribute__'",
            TokenKind::KwNull => "'NULL'",
        };
        f.write_str(text)
    }
}

/// Preprocessor keyword classification carried on identifier-like tokens.
///
/// Attached at lex time so the PP parser never rescans lexemes. A token such
/// as `else` is simultaneously `TokenKind::KwElse` and `PpKind::Else`; later
/// layers pick the view they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PpKind {
    #[default]
    Other,
    If,
    Else,
    Define,
    Undef,
    Include,
    Ifdef,
    Ifndef,
    Elif,
    Endif,
}

/// A single token: kind, source slice, leading trivia, and PP classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub len: usize,
    pub leading: Vec<Trivia>,
    pub pp: PpKind,
}

impl Token {
    /// Borrow this token's text from its originating buffer.
    pub fn lexeme<'a>(&self, src: &'a SourceBuffer) -> &'a str {
        src.slice(self.start, self.len)
    }

    /// A token begins a line when its leading trivia contains a newline, or
    /// when it is the EOF token.
    pub fn starts_line(&self) -> bool {
        self.kind == TokenKind::Eof
            || self.leading.iter().any(|t| t.kind == TriviaKind::Newline)
    }

    /// Two tokens are adjacent when the first ends exactly where the second
    /// begins (no trivia between them).
    pub fn is_adjacent_to(&self, next: &Token) -> bool {
        self.start + self.len == next.start
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Identifier-shaped tokens: plain identifiers and keywords. These are
    /// the tokens the preprocessor accepts wherever it wants a name.
    pub fn is_identifier_like(&self) -> bool {
        self.kind == TokenKind::Identifier || self.kind.is_keyword()
    }
}

/// C keyword table. Identifiers not listed here lex as [`TokenKind::Identifier`];
/// in particular the builtin type names (`int`, `char`, …) are ordinary
/// identifiers resolved later against the parser's type-name tables.
pub fn keyword_kind(lexeme: &str) -> Option<TokenKind> {
    let kind = match lexeme {
        "return" => TokenKind::KwReturn,
        "if" => TokenKind::KwIf,
        "else" => TokenKind::KwElse,
        "while" => TokenKind::KwWhile,
        "for" => TokenKind::KwFor,
        "break" => TokenKind::KwBreak,
        "continue" => TokenKind::KwContinue,
        "extern" => TokenKind::KwExtern,
        "typedef" => TokenKind::KwTypedef,
        "struct" => TokenKind::KwStruct,
        "const" => TokenKind::KwConst,
        "volatile" => TokenKind::KwVolatile,
        "restrict" => TokenKind::KwRestrict,
        "unsigned" => TokenKind::KwUnsigned,
        "__attribute__" => TokenKind::KwAttribute,
        "NULL" => TokenKind::KwNull,
        _ => return None,
    };
    Some(kind)
}

/// Preprocessor keyword table, consulted for every identifier-like lexeme.
pub fn pp_keyword(lexeme: &str) -> PpKind {
    match lexeme {
        "if" => PpKind::If,
        "else" => PpKind::Else,
        "define" => PpKind::Define,
        "undef" => PpKind::Undef,
        "include" => PpKind::Include,
        "ifdef" => PpKind::Ifdef,
        "ifndef" => PpKind::Ifndef,
        "elif" => PpKind::Elif,
        "endif" => PpKind::Endif,
        _ => PpKind::Other,
    }
}
