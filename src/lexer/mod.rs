//! Lexer for C source text
//!
//! Converts the raw bytes of a [`SourceBuffer`] into a flat [`Token`] stream
//! with preserved trivia. The lexer is byte-oriented with one byte of
//! lookahead for punctuation and a few bytes while scanning numbers.
//!
//! Unlike a conventional C lexer, preprocessor directives are not handled
//! here: the lexer only marks a `#` at beginning-of-line as
//! [`TokenKind::DirectiveHash`] and classifies identifiers against the PP
//! keyword table, leaving directive structure to the PP parser.

pub mod token;

pub use token::{PpKind, Token, TokenKind, Trivia, TriviaKind};

use crate::source::{SourceBuffer, SourceLocation};
use std::fmt;

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Byte-oriented scanner over a single source buffer.
///
/// Repeated [`Lexer::next_token`] calls advance monotonically; an EOF token
/// is returned at end of input and on every subsequent call.
pub struct Lexer<'a> {
    src: &'a SourceBuffer,
    pos: usize,
    at_bol: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a SourceBuffer) -> Self {
        Self {
            src,
            pos: 0,
            at_bol: true,
        }
    }

    /// Tokenize the entire buffer, ending with the EOF token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    /// Produce the next token, consuming its leading trivia first.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let leading = self.collect_trivia()?;

        let start = self.pos;
        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    start,
                    len: 0,
                    leading,
                    pp: PpKind::Other,
                });
            }
        };

        let was_bol = self.at_bol;
        self.at_bol = false;

        let kind = match ch {
            b'"' => self.string_literal()?,
            b'0'..=b'9' => self.number(),
            b'.' => {
                if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.number()
                } else {
                    self.advance();
                    TokenKind::Dot
                }
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),
            b'#' if was_bol => {
                self.advance();
                TokenKind::DirectiveHash
            }
            _ => self.punctuation(ch)?,
        };

        let len = self.pos - start;
        let pp = if kind == TokenKind::Identifier || kind.is_keyword() {
            token::pp_keyword(self.src.slice(start, len))
        } else {
            PpKind::Other
        };

        Ok(Token {
            kind,
            start,
            len,
            leading,
            pp,
        })
    }

    /// Consume whitespace, newlines, and comments preceding the next token.
    fn collect_trivia(&mut self) -> Result<Vec<Trivia>, LexError> {
        let mut trivia = Vec::new();
        loop {
            let start = self.pos;
            match self.peek() {
                Some(b'\n') => {
                    self.advance();
                    trivia.push(Trivia {
                        kind: TriviaKind::Newline,
                        start,
                        len: 1,
                    });
                    self.at_bol = true;
                }
                Some(b'\r') if self.peek_at(1) == Some(b'\n') => {
                    self.advance();
                    self.advance();
                    trivia.push(Trivia {
                        kind: TriviaKind::Newline,
                        start,
                        len: 2,
                    });
                    self.at_bol = true;
                }
                Some(b' ') | Some(b'\t') | Some(b'\x0b') | Some(b'\x0c') => {
                    while matches!(
                        self.peek(),
                        Some(b' ') | Some(b'\t') | Some(b'\x0b') | Some(b'\x0c')
                    ) {
                        self.advance();
                    }
                    trivia.push(Trivia {
                        kind: TriviaKind::Space,
                        start,
                        len: self.pos - start,
                    });
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    // The terminating newline is recorded as the next trivia
                    while self.peek().is_some_and(|c| c != b'\n') {
                        self.advance();
                    }
                    trivia.push(Trivia {
                        kind: TriviaKind::LineComment,
                        start,
                        len: self.pos - start,
                    });
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                            None => {
                                return Err(self.error_at(start, "Unterminated block comment"));
                            }
                        }
                    }
                    trivia.push(Trivia {
                        kind: TriviaKind::BlockComment,
                        start,
                        len: self.pos - start,
                    });
                }
                _ => break,
            }
        }
        Ok(trivia)
    }

    /// Scan `[A-Za-z_][A-Za-z0-9_]*` and classify against the keyword table.
    fn identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.advance();
        }
        let lexeme = self.src.slice(start, self.pos - start);
        token::keyword_kind(lexeme).unwrap_or(TokenKind::Identifier)
    }

    /// Scan `digits (. digits)? ([eE][+-]? digits)? [fF]?`.
    ///
    /// The token is a float when any of fraction, exponent, `f`/`F` suffix,
    /// or a leading dot is present. An exponent without digits is rolled
    /// back entirely and left for the next token.
    fn number(&mut self) -> TokenKind {
        let mut is_float = false;

        if self.peek() == Some(b'.') {
            // leading dot, guaranteed by the caller to be followed by a digit
            is_float = true;
            self.advance();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if !is_float
            && self.peek() == Some(b'.')
            && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let mark = self.pos;
            self.advance();
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.advance();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                self.pos = mark;
            }
        }

        if matches!(self.peek(), Some(b'f') | Some(b'F')) {
            is_float = true;
            self.advance();
        }

        if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        }
    }

    /// Scan `" … "`. Escapes are not decoded; the lexeme keeps the raw slice
    /// including both quotes. A backslash always consumes the following byte
    /// so an escaped quote does not terminate the literal.
    fn string_literal(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.advance();
        loop {
            match self.peek() {
                Some(b'"') => {
                    self.advance();
                    return Ok(TokenKind::String);
                }
                Some(b'\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
                None => return Err(self.error_at(start, "Unterminated string literal")),
            }
        }
    }

    /// Scan punctuation with one byte of lookahead for the two-character
    /// operators.
    fn punctuation(&mut self, ch: u8) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.advance();

        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'+' => {
                if self.peek() == Some(b'+') {
                    self.advance();
                    TokenKind::PlusPlus
                } else {
                    TokenKind::Plus
                }
            }
            b'-' => {
                if self.peek() == Some(b'-') {
                    self.advance();
                    TokenKind::MinusMinus
                } else {
                    TokenKind::Minus
                }
            }
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            b'&' => {
                if self.peek() == Some(b'&') {
                    self.advance();
                    TokenKind::AndAnd
                } else {
                    TokenKind::Amp
                }
            }
            b'|' => {
                if self.peek() == Some(b'|') {
                    self.advance();
                    TokenKind::OrOr
                } else {
                    TokenKind::Pipe
                }
            }
            _ => {
                return Err(self.error_at(
                    start,
                    &format!("Unexpected character: '{}'", ch as char),
                ));
            }
        };
        Ok(kind)
    }

    fn peek(&self) -> Option<u8> {
        self.src.text().as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.text().as_bytes().get(self.pos + n).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn error_at(&self, offset: usize, message: &str) -> LexError {
        LexError {
            message: message.to_string(),
            location: self.src.location(offset),
        }
    }
}
