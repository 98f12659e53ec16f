//! Statement parsing implementation
//!
//! Statements of the C subset:
//!
//! - Jump statements: `return`, `break`, `continue`
//! - Control flow: `if`/`else`, `while`, `for`
//! - Compound statements `{ … }` with interleaved local declarations
//! - Expression statements
//!
//! At the head of a compound item or `for` initializer, the parser first
//! attempts [`Parser::parse_type_ref`]; if that rewinds, the tokens are an
//! expression statement instead.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::lexer::TokenKind;
use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};
use crate::source::SourceLocation;

impl<'a> Parser<'a> {
    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();

        if self.match_token(TokenKind::KwReturn) {
            let expr = if self.check(TokenKind::Semicolon) {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.eat(TokenKind::Semicolon, "Expected ';' after 'return'")?;
            return Ok(Stmt::Return { expr, location });
        }

        if self.match_token(TokenKind::KwIf) {
            return self.parse_if_statement(location);
        }

        if self.match_token(TokenKind::KwWhile) {
            self.eat(TokenKind::LParen, "Expected '(' after 'while'")?;
            let condition = self.parse_expression()?;
            self.eat(TokenKind::RParen, "Expected ')' after while condition")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(Stmt::While {
                condition,
                body,
                location,
            });
        }

        if self.match_token(TokenKind::KwFor) {
            return self.parse_for_statement(location);
        }

        if self.match_token(TokenKind::KwBreak) {
            self.eat(TokenKind::Semicolon, "Expected ';' after 'break'")?;
            return Ok(Stmt::Break { location });
        }

        if self.match_token(TokenKind::KwContinue) {
            self.eat(TokenKind::Semicolon, "Expected ';' after 'continue'")?;
            return Ok(Stmt::Continue { location });
        }

        if self.check(TokenKind::LBrace) {
            let items = self.parse_compound_items()?;
            return Ok(Stmt::Compound { items, location });
        }

        let expr = self.parse_expression()?;
        self.eat(TokenKind::Semicolon, "Expected ';' after expression")?;
        Ok(Stmt::Expr { expr, location })
    }

    fn parse_if_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.eat(TokenKind::LParen, "Expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.eat(TokenKind::RParen, "Expected ')' after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(TokenKind::KwElse) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    /// Parse `for ( init? ; cond? ; post? ) body`. The initializer may be a
    /// declaration (which consumes its own semicolon) or an expression.
    fn parse_for_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.eat(TokenKind::LParen, "Expected '(' after 'for'")?;

        let init = if self.match_token(TokenKind::Semicolon) {
            None
        } else if let Some(decl) = self.parse_local_var_decl()? {
            Some(ForInit::Decl(decl))
        } else {
            let expr = self.parse_expression()?;
            self.eat(TokenKind::Semicolon, "Expected ';' after for initializer")?;
            Some(ForInit::Expr(expr))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.eat(TokenKind::Semicolon, "Expected ';' after for condition")?;

        let post = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.eat(TokenKind::RParen, "Expected ')' after for clauses")?;

        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::For {
            init,
            condition,
            post,
            body,
            location,
        })
    }

    /// Parse `{ … }` as a list of interleaved declarations and statements.
    pub(crate) fn parse_compound_items(&mut self) -> Result<Vec<BlockItem>, ParseError> {
        self.eat(TokenKind::LBrace, "Expected '{'")?;
        let mut items = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if let Some(decl) = self.parse_local_var_decl()? {
                items.push(BlockItem::Decl(decl));
            } else {
                items.push(BlockItem::Stmt(self.parse_statement()?));
            }
        }
        self.eat(TokenKind::RBrace, "Expected '}' after block")?;
        Ok(items)
    }

    /// Try to parse `type name [= assignment] ;`. Rewinds and returns
    /// `None` when the head is not a type followed by a name, so the caller
    /// can parse an expression statement.
    fn parse_local_var_decl(&mut self) -> Result<Option<VarDecl>, ParseError> {
        let mark = self.mark();
        let location = self.current_location();

        let ty = match self.parse_type_ref() {
            Some(ty) => ty,
            None => return Ok(None),
        };
        if !self.check(TokenKind::Identifier) {
            self.reset(mark);
            return Ok(None);
        }
        let name = self.expect_identifier("variable name")?;

        let init = if self.match_token(TokenKind::Eq) {
            Some(self.parse_assignment_expr()?)
        } else {
            None
        };
        self.eat(TokenKind::Semicolon, "Expected ';' after variable declaration")?;

        Ok(Some(VarDecl {
            ty,
            name,
            init,
            location,
        }))
    }
}
