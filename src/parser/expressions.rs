//! Expression parsing implementation
//!
//! Pratt parsing over binary operators with recursive descent for prefix,
//! postfix, and primary forms.
//!
//! # Precedence
//!
//! | binding power | operators            |
//! |---------------|----------------------|
//! | 1             | `\|\|`               |
//! | 2             | `&&`                 |
//! | 3             | `==` `!=`            |
//! | 4             | `<` `>` `<=` `>=`    |
//! | 5             | `+` `-`              |
//! | 6             | `*` `/`              |
//!
//! All infix operators are left-associative; assignment is right-associative
//! and binds lower than every infix operator. Unary operands bind tighter
//! than any infix operator.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::lexer::TokenKind;
use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};

/// Infix operator table: token kind → (operator, left binding power).
fn binary_op(kind: TokenKind) -> Option<(BinOp, u8)> {
    let entry = match kind {
        TokenKind::OrOr => (BinOp::Or, 1),
        TokenKind::AndAnd => (BinOp::And, 2),
        TokenKind::EqEq => (BinOp::Eq, 3),
        TokenKind::NotEq => (BinOp::Ne, 3),
        TokenKind::Lt => (BinOp::Lt, 4),
        TokenKind::Gt => (BinOp::Gt, 4),
        TokenKind::Le => (BinOp::Le, 4),
        TokenKind::Ge => (BinOp::Ge, 4),
        TokenKind::Plus => (BinOp::Add, 5),
        TokenKind::Minus => (BinOp::Sub, 5),
        TokenKind::Star => (BinOp::Mul, 6),
        TokenKind::Slash => (BinOp::Div, 6),
        _ => return None,
    };
    Some(entry)
}

impl<'a> Parser<'a> {
    /// Parse expression (top-level entry point).
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment_expr()
    }

    /// Parse assignment (right-associative, lowest precedence).
    pub(crate) fn parse_assignment_expr(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_binary_expr(1)?;

        if self.check(TokenKind::Eq) {
            let location = self.current_location();
            self.advance();
            let rhs = Box::new(self.parse_assignment_expr()?);
            return Ok(Expr::Assign {
                lhs: Box::new(expr),
                rhs,
                location,
            });
        }

        Ok(expr)
    }

    /// Parse infix chains at or above `min_bp`. Left association falls out
    /// of recursing with `bp + 1` on the right.
    fn parse_binary_expr(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary_expr()?;

        while let Some((op, bp)) = binary_op(self.current().kind) {
            if bp < min_bp {
                break;
            }
            let location = self.current_location();
            self.advance();
            let right = Box::new(self.parse_binary_expr(bp + 1)?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location,
            };
        }

        Ok(left)
    }

    /// Parse prefix operators: `++ -- + - ! & *`.
    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();

        let op = match self.current().kind {
            TokenKind::PlusPlus => Some(UnOp::PreInc),
            TokenKind::MinusMinus => Some(UnOp::PreDec),
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Bang => Some(UnOp::Not),
            TokenKind::Amp => Some(UnOp::AddrOf),
            TokenKind::Star => Some(UnOp::Deref),
            TokenKind::Plus => {
                // unary plus is a no-op; parse and return the operand
                self.advance();
                return self.parse_unary_expr();
            }
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = Box::new(self.parse_unary_expr()?);
            return Ok(Expr::Unary {
                op,
                operand,
                location,
            });
        }

        self.parse_postfix_expr()
    }

    /// Parse postfix forms: calls, `++`, `--`.
    fn parse_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary_expr()?;

        loop {
            let location = self.current_location();
            match self.current().kind {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_argument_list()?;
                    self.eat(TokenKind::RParen, "Expected ')' after arguments")?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        location,
                    };
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    expr = Expr::Unary {
                        op: UnOp::PostInc,
                        operand: Box::new(expr),
                        location,
                    };
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    expr = Expr::Unary {
                        op: UnOp::PostDec,
                        operand: Box::new(expr),
                        location,
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_assignment_expr()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    /// Parse literals, identifiers, `NULL`, and parenthesized expressions.
    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();

        match self.current().kind {
            TokenKind::IntLiteral => {
                let tok = self.advance();
                let text = self.lexeme(&tok);
                let value = text.parse::<i64>().map_err(|_| ParseError {
                    message: format!("Invalid integer literal: {}", text),
                    location,
                })?;
                Ok(Expr::IntLiteral(value, location))
            }
            TokenKind::FloatLiteral => {
                let tok = self.advance();
                let text = self.lexeme(&tok);
                let trimmed = text.trim_end_matches(['f', 'F']);
                let value = trimmed.parse::<f64>().map_err(|_| ParseError {
                    message: format!("Invalid float literal: {}", text),
                    location,
                })?;
                Ok(Expr::FloatLiteral(value, location))
            }
            TokenKind::String => {
                let tok = self.advance();
                Ok(Expr::StringLiteral(self.cooked_string(&tok), location))
            }
            TokenKind::KwNull => {
                self.advance();
                Ok(Expr::Null { location })
            }
            TokenKind::Identifier => {
                let name = self.expect_identifier("identifier")?;
                Ok(Expr::Ident(name, location))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.eat(TokenKind::RParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            _ => Err(self.error(&format!(
                "Expected primary expression, found {}",
                self.describe_current()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    /// Parse `text` as the initializer of a single global.
    fn parse_expr(text: &str) -> Expr {
        let tu = parse_source(&format!("int probe = {};", text)).unwrap();
        match &tu.decls[0] {
            Decl::Var(v) => v.init.clone().unwrap(),
            other => panic!("expected variable, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_mul_over_add() {
        match parse_expr("1 + 2 * 3") {
            Expr::Binary {
                op: BinOp::Add,
                right,
                ..
            } => assert!(matches!(*right, Expr::Binary { op: BinOp::Mul, .. })),
            other => panic!("expected addition at root, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associativity() {
        // (10 - 4) - 3
        match parse_expr("10 - 4 - 3") {
            Expr::Binary {
                op: BinOp::Sub,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinOp::Sub, .. }));
                assert!(matches!(*right, Expr::IntLiteral(3, _)));
            }
            other => panic!("expected subtraction at root, got {:?}", other),
        }
    }

    #[test]
    fn test_comparison_over_logical() {
        // (a < b) && (c > d)
        match parse_expr("a < b && c > d") {
            Expr::Binary {
                op: BinOp::And,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinOp::Lt, .. }));
                assert!(matches!(*right, Expr::Binary { op: BinOp::Gt, .. }));
            }
            other => panic!("expected && at root, got {:?}", other),
        }
    }

    #[test]
    fn test_or_binds_loosest() {
        match parse_expr("a && b || c && d") {
            Expr::Binary { op: BinOp::Or, .. } => {}
            other => panic!("expected || at root, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override() {
        match parse_expr("(1 + 2) * 3") {
            Expr::Binary {
                op: BinOp::Mul,
                left,
                ..
            } => assert!(matches!(*left, Expr::Binary { op: BinOp::Add, .. })),
            other => panic!("expected multiplication at root, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_binds_tighter_than_infix() {
        // (-a) * b
        match parse_expr("-a * b") {
            Expr::Binary {
                op: BinOp::Mul,
                left,
                ..
            } => assert!(matches!(*left, Expr::Unary { op: UnOp::Neg, .. })),
            other => panic!("expected multiplication at root, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_plus_folds_away() {
        assert!(matches!(parse_expr("+5"), Expr::IntLiteral(5, _)));
    }

    #[test]
    fn test_not_and_addressof() {
        match parse_expr("!ok && &slot") {
            Expr::Binary {
                op: BinOp::And,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Unary { op: UnOp::Not, .. }));
                assert!(matches!(
                    *right,
                    Expr::Unary {
                        op: UnOp::AddrOf,
                        ..
                    }
                ));
            }
            other => panic!("expected && at root, got {:?}", other),
        }
    }

    #[test]
    fn test_call_with_args() {
        match parse_expr("add(3, 4)") {
            Expr::Call { callee, args, .. } => {
                assert!(matches!(*callee, Expr::Ident(ref n, _) if n == "add"));
                assert_eq!(args.len(), 2);
                assert!(matches!(args[0], Expr::IntLiteral(3, _)));
                assert!(matches!(args[1], Expr::IntLiteral(4, _)));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_calls() {
        match parse_expr("f(1)(2)") {
            Expr::Call { callee, args, .. } => {
                assert!(matches!(*callee, Expr::Call { .. }));
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_pre_and_post_increment() {
        assert!(matches!(
            parse_expr("++i"),
            Expr::Unary {
                op: UnOp::PreInc,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("i++"),
            Expr::Unary {
                op: UnOp::PostInc,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("--i"),
            Expr::Unary {
                op: UnOp::PreDec,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("i--"),
            Expr::Unary {
                op: UnOp::PostDec,
                ..
            }
        ));
    }

    #[test]
    fn test_assignment_right_associative() {
        // a = (b = 1)
        match parse_expr("a = b = 1") {
            Expr::Assign { lhs, rhs, .. } => {
                assert!(matches!(*lhs, Expr::Ident(ref n, _) if n == "a"));
                assert!(matches!(*rhs, Expr::Assign { .. }));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_literals() {
        assert!(matches!(parse_expr("42"), Expr::IntLiteral(42, _)));
        assert!(matches!(parse_expr("NULL"), Expr::Null { .. }));
        match parse_expr("3.5f") {
            Expr::FloatLiteral(v, _) => assert_eq!(v, 3.5),
            other => panic!("expected float, got {:?}", other),
        }
        match parse_expr("\"Hello GLFW\"") {
            Expr::StringLiteral(s, _) => assert_eq!(s, "Hello GLFW"),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_int_literal_is_64_bit() {
        assert!(matches!(
            parse_expr("4294967296"),
            Expr::IntLiteral(4294967296, _)
        ));
    }

    #[test]
    fn test_missing_primary_is_fatal() {
        let err = parse_source("int x = ;").unwrap_err();
        assert!(err.message.contains("Expected primary expression"));
    }
}
