//! Declaration parsing implementation
//!
//! External declarations of the C subset:
//!
//! - Typedefs, including function-pointer typedefs: `typedef int (*cb)(int a);`
//! - Struct declarations, forward and full: `struct Tag;`, `struct Tag { … };`
//! - Function definitions and extern declarations
//! - Global variable declarations
//! - `extern "…"` wrappers (language or library string) and
//!   `__attribute__((dllimport|dllexport))`
//!
//! Type references are the primary backtracking point: [`Parser::parse_type_ref`]
//! either commits to a type or rewinds the reader and returns `None`, letting
//! the caller reinterpret the tokens as an expression.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::lexer::TokenKind;
use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// Parse one external declaration, appending the result (or, for an
    /// `extern "…" { … }` block, all contained declarations) to `decls`.
    pub(crate) fn parse_external_declaration(
        &mut self,
        decls: &mut Vec<Decl>,
    ) -> Result<(), ParseError> {
        // extern "C" / extern "glfw3.dll", single declaration or block
        if self.check(TokenKind::KwExtern) && self.la(1).kind == TokenKind::String {
            self.advance(); // extern
            let lib_tok = self.advance();
            let library = self.cooked_string(&lib_tok);

            if self.match_token(TokenKind::LBrace) {
                while !self.check(TokenKind::RBrace) && !self.is_at_end() {
                    self.parse_plain_declaration(decls, true, Some(&library))?;
                }
                self.eat(TokenKind::RBrace, "Expected '}' after extern block")?;
                return Ok(());
            }
            return self.parse_plain_declaration(decls, true, Some(&library));
        }

        self.parse_plain_declaration(decls, false, None)
    }

    /// One declaration after any extern-string wrapper has been handled.
    fn parse_plain_declaration(
        &mut self,
        decls: &mut Vec<Decl>,
        wrapped_extern: bool,
        library: Option<&str>,
    ) -> Result<(), ParseError> {
        let attribute = self.parse_attribute()?;
        let is_extern = self.match_token(TokenKind::KwExtern) || wrapped_extern;

        if self.check(TokenKind::KwTypedef) {
            decls.push(Decl::Typedef(self.parse_typedef_decl()?));
            return Ok(());
        }

        // `struct Tag ;` and `struct Tag { … }` are struct declarations;
        // any other `struct …` is a type at the head of a function or
        // variable declaration.
        if self.check(TokenKind::KwStruct)
            && self.la(1).kind == TokenKind::Identifier
            && matches!(self.la(2).kind, TokenKind::Semicolon | TokenKind::LBrace)
        {
            decls.push(Decl::Struct(self.parse_struct_decl(attribute, is_extern)?));
            return Ok(());
        }

        match self.parse_func_def(attribute, is_extern, library)? {
            Some(func) => decls.push(Decl::Function(func)),
            None => decls.push(Decl::Var(self.parse_global_var_decl()?)),
        }
        Ok(())
    }

    /// Parse `__attribute__((dllimport|dllexport))` if present.
    pub(crate) fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        if !self.match_token(TokenKind::KwAttribute) {
            return Ok(Attribute::None);
        }
        self.eat(TokenKind::LParen, "Expected '(' after '__attribute__'")?;
        self.eat(TokenKind::LParen, "Expected '((' after '__attribute__'")?;
        let name = self.expect_identifier("attribute name")?;
        let attribute = match name.as_str() {
            "dllimport" => Attribute::Import,
            "dllexport" => Attribute::Export,
            other => {
                return Err(self.error(&format!("Unknown attribute '{}'", other)));
            }
        };
        self.eat(TokenKind::RParen, "Expected ')' after attribute name")?;
        self.eat(TokenKind::RParen, "Expected '))' after attribute")?;
        Ok(attribute)
    }

    /// Attempt to parse a leading type reference.
    ///
    /// `[struct] [unsigned] name *…` where `name` must be a known typedef
    /// name or struct tag unless `struct` introduced it. On failure the
    /// reader is reset and `None` is returned; this is the parser's primary
    /// backtracking point.
    pub(crate) fn parse_type_ref(&mut self) -> Option<TypeRef> {
        let mark = self.mark();

        let is_struct = self.match_token(TokenKind::KwStruct);
        let is_unsigned = self.match_token(TokenKind::KwUnsigned);

        if !self.check(TokenKind::Identifier) {
            self.reset(mark);
            return None;
        }
        let base = self.current_lexeme();
        let name = if is_unsigned {
            format!("unsigned {}", base)
        } else {
            base.to_string()
        };

        if !is_struct && !self.is_type_name(&name) {
            self.reset(mark);
            return None;
        }
        self.advance();

        let mut pointer_depth = 0;
        while self.match_token(TokenKind::Star) {
            pointer_depth += 1;
        }

        Some(TypeRef {
            is_struct,
            name,
            pointer_depth,
        })
    }

    /// Parse `typedef type name ;` or `typedef type ( *name ) ( params ) ;`
    /// and register the new name as a type.
    pub(crate) fn parse_typedef_decl(&mut self) -> Result<TypedefDecl, ParseError> {
        let location = self.current_location();
        self.eat(TokenKind::KwTypedef, "Expected 'typedef'")?;

        let ty = self
            .parse_type_ref()
            .ok_or_else(|| self.error("Expected type specifier after 'typedef'"))?;

        if self.match_token(TokenKind::LParen) {
            // function-pointer typedef
            self.eat(TokenKind::Star, "Expected '*' in function-pointer typedef")?;
            let mut pointer_depth = 1;
            while self.match_token(TokenKind::Star) {
                pointer_depth += 1;
            }
            let name = self.expect_identifier("function-pointer typedef name")?;
            self.eat(TokenKind::RParen, "Expected ')' after typedef name")?;
            self.eat(TokenKind::LParen, "Expected '(' before typedef parameters")?;
            let params = self.parse_parameter_list()?;
            self.eat(TokenKind::RParen, "Expected ')' after typedef parameters")?;
            self.eat(TokenKind::Semicolon, "Expected ';' after typedef")?;

            self.typedef_names.insert(name.clone());
            return Ok(TypedefDecl {
                ty: DeclaredType::FuncPtr(FuncPtrTypeRef {
                    return_type: ty,
                    params,
                    pointer_depth,
                }),
                name,
                location,
            });
        }

        let name = self.expect_identifier("typedef name")?;
        self.eat(TokenKind::Semicolon, "Expected ';' after typedef")?;

        self.typedef_names.insert(name.clone());
        Ok(TypedefDecl {
            ty: DeclaredType::Plain(ty),
            name,
            location,
        })
    }

    /// Parse `struct Tag ;` or `struct Tag { fields } [name2] ;` and register
    /// the tag.
    pub(crate) fn parse_struct_decl(
        &mut self,
        attribute: Attribute,
        is_extern: bool,
    ) -> Result<StructDecl, ParseError> {
        let location = self.current_location();
        self.eat(TokenKind::KwStruct, "Expected 'struct'")?;
        let name = self.expect_identifier("struct tag")?;

        // registered before the body so fields may use the bare tag name
        self.struct_tags.insert(name.clone());

        if self.match_token(TokenKind::Semicolon) {
            return Ok(StructDecl {
                attribute,
                is_extern,
                name,
                name2: None,
                fields: None,
                location,
            });
        }

        self.eat(TokenKind::LBrace, "Expected ';' or '{' after struct tag")?;
        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let ty = self
                .parse_type_ref()
                .ok_or_else(|| self.error("Expected type specifier in struct field"))?;
            let field_name = self.expect_identifier("struct field name")?;
            self.eat(TokenKind::Semicolon, "Expected ';' after struct field")?;
            fields.push(Field {
                ty,
                name: field_name,
            });
        }
        self.eat(TokenKind::RBrace, "Expected '}' after struct fields")?;

        let name2 = if self.check(TokenKind::Identifier) {
            Some(self.expect_identifier("declarator")?)
        } else {
            None
        };
        self.eat(TokenKind::Semicolon, "Expected ';' after struct declaration")?;

        Ok(StructDecl {
            attribute,
            is_extern,
            name,
            name2,
            fields: Some(fields),
            location,
        })
    }

    /// Try to parse a function definition or extern function declaration.
    ///
    /// Returns `Ok(None)` after rewinding when the tokens do not form
    /// `type name (` — the caller then reparses them as a global variable.
    pub(crate) fn parse_func_def(
        &mut self,
        attribute: Attribute,
        is_extern: bool,
        library: Option<&str>,
    ) -> Result<Option<FunctionDecl>, ParseError> {
        let mark = self.mark();
        let location = self.current_location();

        let return_type = match self.parse_type_ref() {
            Some(ty) => ty,
            None => {
                return Err(self.error(&format!(
                    "Expected type specifier, found {}",
                    self.describe_current()
                )));
            }
        };

        if !self.check(TokenKind::Identifier) || self.la(1).kind != TokenKind::LParen {
            self.reset(mark);
            return Ok(None);
        }
        let name = self.expect_identifier("function name")?;

        self.eat(TokenKind::LParen, "Expected '(' after function name")?;
        let params = self.parse_parameter_list()?;
        self.eat(TokenKind::RParen, "Expected ')' after parameters")?;

        let body = if self.match_token(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_compound_items()?)
        };

        Ok(Some(FunctionDecl {
            attribute,
            is_extern,
            library: library.map(String::from),
            return_type,
            name,
            params,
            body,
            location,
        }))
    }

    /// Parse `( type name, … )` contents. `(void)` and `()` both mean no
    /// parameters.
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(TokenKind::RParen) {
            return Ok(params);
        }

        // (void) means no parameters in C
        if self.check(TokenKind::Identifier)
            && self.current_lexeme() == "void"
            && self.la(1).kind == TokenKind::RParen
        {
            self.advance();
            return Ok(params);
        }

        loop {
            let ty = self
                .parse_type_ref()
                .ok_or_else(|| self.error("Expected parameter type"))?;
            let name = self.expect_identifier("parameter name")?;
            params.push(Param { ty, name });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse a global variable declaration: `type name [= assignment] ;`.
    pub(crate) fn parse_global_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let location = self.current_location();
        let ty = self
            .parse_type_ref()
            .ok_or_else(|| self.error("Expected type specifier"))?;
        let name = self.expect_identifier("variable name")?;

        let init = if self.match_token(TokenKind::Eq) {
            Some(self.parse_assignment_expr()?)
        } else {
            None
        };

        self.eat(TokenKind::Semicolon, "Expected ';' after variable declaration")?;
        Ok(VarDecl {
            ty,
            name,
            init,
            location,
        })
    }
}
