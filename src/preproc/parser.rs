//! Preprocessor parser
//!
//! Recognizes `#`-directives in a lexed token stream and groups them,
//! including nested conditional sections, into a [`PpTranslationUnit`].
//! Conditions are captured but never evaluated and inclusion is never
//! performed; both stay with the consumers of the tree.
//!
//! Directive extent is determined purely from trivia: a token belongs to the
//! current directive line until the next token whose leading trivia contains
//! a newline.

use crate::lexer::{PpKind, Token, TokenKind};
use crate::preproc::ast::*;
use crate::source::{SourceBuffer, SourceLocation};
use std::fmt;

/// Preprocessor parser error type
#[derive(Debug)]
pub struct PpError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for PpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Preprocessor error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for PpError {}

/// Parser over a lexed token stream, producing the preprocessor tree.
pub struct PpParser<'a> {
    src: &'a SourceBuffer,
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
}

impl<'a> PpParser<'a> {
    pub fn new(src: &'a SourceBuffer, tokens: &'a [Token]) -> Self {
        let eof = Token {
            kind: TokenKind::Eof,
            start: src.len(),
            len: 0,
            leading: Vec::new(),
            pp: PpKind::Other,
        };
        Self {
            src,
            tokens,
            pos: 0,
            eof,
        }
    }

    /// Parse the whole stream into a translation unit.
    ///
    /// `#elif`/`#else`/`#endif` at top level are unmatched and fatal.
    pub fn parse(&mut self) -> Result<PpTranslationUnit, PpError> {
        let parts = self.parse_group(&[])?;
        // parse_group with no stop set only returns at EOF
        debug_assert!(self.current().kind == TokenKind::Eof);
        Ok(PpTranslationUnit { parts })
    }

    /// Parse group parts until EOF or until a directive in `stops` is seen.
    /// The stopping directive (and its `#`) is left unconsumed.
    fn parse_group(&mut self, stops: &[PpKind]) -> Result<Vec<PpGroupPart>, PpError> {
        let mut parts = Vec::new();
        loop {
            let tok = self.current();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::DirectiveHash => {
                    let dir = self.peek(1);
                    if stops.contains(&dir.pp) {
                        break;
                    }
                    self.advance(); // consume '#'
                    parts.push(self.parse_directive()?);
                }
                _ => parts.push(self.parse_text_run()),
            }
        }
        Ok(parts)
    }

    /// A text run extends from any non-directive token to the next `#` at
    /// line start (or EOF).
    fn parse_text_run(&mut self) -> PpGroupPart {
        let mut tokens = Vec::new();
        while !matches!(
            self.current().kind,
            TokenKind::Eof | TokenKind::DirectiveHash
        ) {
            tokens.push(self.current().clone());
            self.advance();
        }
        PpGroupPart::Text(tokens)
    }

    /// Dispatch on the directive keyword following a consumed `#`.
    fn parse_directive(&mut self) -> Result<PpGroupPart, PpError> {
        let tok = self.current().clone();

        // `#` alone on its line: the next token already starts a new line
        if tok.starts_line() {
            return Ok(PpGroupPart::Simple {
                keyword: String::new(),
                tokens: Vec::new(),
            });
        }

        match tok.pp {
            PpKind::Include => {
                self.advance();
                Ok(PpGroupPart::Include {
                    tokens: self.collect_rest_of_line(),
                })
            }
            PpKind::Define => {
                self.advance();
                self.parse_define()
            }
            PpKind::Undef => {
                self.advance();
                let name = self.expect_name("macro name after '#undef'")?;
                // anything else on the line is garbage
                self.collect_rest_of_line();
                Ok(PpGroupPart::Undef { name })
            }
            PpKind::If | PpKind::Ifdef | PpKind::Ifndef => {
                let kind = match tok.pp {
                    PpKind::If => PpCondKind::If,
                    PpKind::Ifdef => PpCondKind::Ifdef,
                    _ => PpCondKind::Ifndef,
                };
                self.advance();
                self.parse_if_section(kind)
            }
            PpKind::Elif | PpKind::Else | PpKind::Endif => Err(self.error_at(
                &tok,
                &format!("Unmatched '#{}'", tok.lexeme(self.src)),
            )),
            PpKind::Other => {
                let keyword = tok.lexeme(self.src).to_string();
                self.advance();
                Ok(PpGroupPart::Simple {
                    keyword,
                    tokens: self.collect_rest_of_line(),
                })
            }
        }
    }

    /// Parse the remainder of a `#define` line: name, optional parameter
    /// list, replacement tokens.
    ///
    /// The parameter list form is chosen by adjacency: `NAME(` is
    /// function-like, `NAME (` is object-like with a replacement that begins
    /// with `(`.
    fn parse_define(&mut self) -> Result<PpGroupPart, PpError> {
        let name_tok = self.current().clone();
        let name = self.expect_name("macro name after '#define'")?;

        let mut is_function_like = false;
        let mut params = Vec::new();
        let mut is_variadic = false;

        let next = self.current();
        if next.kind == TokenKind::LParen
            && name_tok.is_adjacent_to(next)
            && !next.starts_line()
        {
            is_function_like = true;
            self.advance(); // consume '('
            self.parse_macro_params(&mut params, &mut is_variadic)?;
        }

        let replacement = self.collect_rest_of_line();
        Ok(PpGroupPart::Define(PpDefine {
            name,
            is_function_like,
            params,
            is_variadic,
            replacement,
        }))
    }

    /// Parse `ident, ident, …` with an optional terminating ellipsis, up to
    /// the closing `)`.
    fn parse_macro_params(
        &mut self,
        params: &mut Vec<String>,
        is_variadic: &mut bool,
    ) -> Result<(), PpError> {
        if self.eat_same_line(TokenKind::RParen) {
            return Ok(());
        }

        loop {
            if self.at_ellipsis() {
                self.consume_ellipsis();
                *is_variadic = true;
                break;
            }

            let tok = self.current().clone();
            if !tok.is_identifier_like() || tok.starts_line() {
                return Err(self.error_at(&tok, "Malformed macro parameter list"));
            }
            params.push(tok.lexeme(self.src).to_string());
            self.advance();

            // GNU-style `name...` directly after a parameter
            if self.at_ellipsis() {
                self.consume_ellipsis();
                *is_variadic = true;
                break;
            }

            if self.eat_same_line(TokenKind::Comma) {
                continue;
            }
            break;
        }

        let tok = self.current().clone();
        if tok.kind != TokenKind::RParen || tok.starts_line() {
            return Err(self.error_at(&tok, "Malformed macro parameter list"));
        }
        self.advance();
        Ok(())
    }

    /// Parse the groups of one if-section. The introducing directive keyword
    /// has been consumed; its condition is still pending.
    fn parse_if_section(&mut self, kind: PpCondKind) -> Result<PpGroupPart, PpError> {
        const STOPS: &[PpKind] = &[PpKind::Elif, PpKind::Else, PpKind::Endif];

        let condition = self.collect_rest_of_line();
        let parts = self.parse_group(STOPS)?;
        let if_group = PpCondGroup {
            kind,
            condition,
            parts,
        };

        let mut elif_groups = Vec::new();
        let mut else_group = None;

        loop {
            let tok = self.current().clone();
            if tok.kind == TokenKind::Eof {
                return Err(self.error_at(&tok, "Missing '#endif' before end of file"));
            }
            debug_assert!(tok.kind == TokenKind::DirectiveHash);
            let dir = self.peek(1).clone();
            match dir.pp {
                PpKind::Elif => {
                    if else_group.is_some() {
                        return Err(self.error_at(&dir, "'#elif' after '#else'"));
                    }
                    self.advance(); // '#'
                    self.advance(); // 'elif'
                    let condition = self.collect_rest_of_line();
                    let parts = self.parse_group(STOPS)?;
                    elif_groups.push(PpCondGroup {
                        kind: PpCondKind::Elif,
                        condition,
                        parts,
                    });
                }
                PpKind::Else => {
                    if else_group.is_some() {
                        return Err(self.error_at(&dir, "Duplicate '#else'"));
                    }
                    self.advance(); // '#'
                    self.advance(); // 'else'
                    self.collect_rest_of_line();
                    let parts = self.parse_group(STOPS)?;
                    else_group = Some(PpCondGroup {
                        kind: PpCondKind::Else,
                        condition: Vec::new(),
                        parts,
                    });
                }
                PpKind::Endif => {
                    self.advance(); // '#'
                    self.advance(); // 'endif'
                    self.collect_rest_of_line();
                    break;
                }
                _ => unreachable!("parse_group only stops on elif/else/endif"),
            }
        }

        Ok(PpGroupPart::IfSection(PpIfSection {
            if_group,
            elif_groups,
            else_group,
        }))
    }

    /// Accumulate tokens until the next token begins a new line. The
    /// newline-carrying token is not consumed.
    fn collect_rest_of_line(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while !self.current().starts_line() {
            tokens.push(self.current().clone());
            self.advance();
        }
        tokens
    }

    /// Three pairwise-adjacent `.` tokens form an ellipsis.
    fn at_ellipsis(&self) -> bool {
        let (a, b, c) = (self.current(), self.peek(1), self.peek(2));
        a.kind == TokenKind::Dot
            && !a.starts_line()
            && b.kind == TokenKind::Dot
            && c.kind == TokenKind::Dot
            && a.is_adjacent_to(b)
            && b.is_adjacent_to(c)
    }

    fn consume_ellipsis(&mut self) {
        self.advance();
        self.advance();
        self.advance();
    }

    /// Consume an identifier-like token on the current line and return its
    /// lexeme.
    fn expect_name(&mut self, what: &str) -> Result<String, PpError> {
        let tok = self.current().clone();
        if !tok.is_identifier_like() || tok.starts_line() {
            return Err(self.error_at(&tok, &format!("Expected {}", what)));
        }
        self.advance();
        Ok(tok.lexeme(self.src).to_string())
    }

    /// Consume a token of `kind` if it is next and does not start a new line.
    fn eat_same_line(&mut self, kind: TokenKind) -> bool {
        let tok = self.current();
        if tok.kind == kind && !tok.starts_line() {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error_at(&self, tok: &Token, message: &str) -> PpError {
        PpError {
            message: message.to_string(),
            location: self.src.location(tok.start),
        }
    }
}
