// AST definitions for the C subset accepted by the declaration parser

use crate::source::SourceLocation;
use std::fmt;

/// A named type reference with an optional `struct` prefix and pointer depth.
///
/// `name` is the fused type name: for `unsigned int` the qualifier is folded
/// in, so `name == "unsigned int"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub is_struct: bool,
    pub name: String,
    pub pointer_depth: usize,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef {
            is_struct: false,
            name: name.into(),
            pointer_depth: 0,
        }
    }

    pub fn structure(name: impl Into<String>) -> Self {
        TypeRef {
            is_struct: true,
            name: name.into(),
            pointer_depth: 0,
        }
    }

    pub fn with_pointer(mut self) -> Self {
        self.pointer_depth += 1;
        self
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_struct {
            write!(f, "struct ")?;
        }
        write!(f, "{}", self.name)?;
        for _ in 0..self.pointer_depth {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// A function-pointer type: `ret (*name)(params)`, with `pointer_depth`
/// counting the stars before the name.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncPtrTypeRef {
    pub return_type: TypeRef,
    pub params: Vec<Param>,
    pub pointer_depth: usize,
}

/// The type named by a typedef: plain or function pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    Plain(TypeRef),
    FuncPtr(FuncPtrTypeRef),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Not,     // !x
    AddrOf,  // &x
    Deref,   // *x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    /// Cooked form: outer quotes stripped, escapes preserved as written.
    StringLiteral(String, SourceLocation),
    Null {
        location: SourceLocation,
    },
    Ident(String, SourceLocation),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(_, loc)
            | Expr::FloatLiteral(_, loc)
            | Expr::StringLiteral(_, loc)
            | Expr::Ident(_, loc) => *loc,
            Expr::Null { location }
            | Expr::Unary { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Assign { location, .. }
            | Expr::Call { location, .. } => *location,
        }
    }
}

/// One item of a compound statement: declarations and statements interleave.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Decl(VarDecl),
    Stmt(Stmt),
}

/// The first clause of a `for` head.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Decl(VarDecl),
    Expr(Expr),
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr {
        expr: Expr,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    Compound {
        items: Vec<BlockItem>,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    For {
        init: Option<ForInit>,
        condition: Option<Expr>,
        post: Option<Expr>,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
}

/// Declaration attribute derived from `__attribute__((dllimport|dllexport))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attribute {
    #[default]
    None,
    Import,
    Export,
}

/// Variable declaration, global or local.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeRef,
    pub name: String,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
}

/// Struct field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: TypeRef,
    pub name: String,
}

/// Function definition or extern declaration.
///
/// `library` records the string of an enclosing `extern "…"` wrapper, e.g.
/// the DLL name the native binder should resolve the symbol from.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub attribute: Attribute,
    pub is_extern: bool,
    pub library: Option<String>,
    pub return_type: TypeRef,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Option<Vec<BlockItem>>,
    pub location: SourceLocation,
}

/// Typedef declaration. The new name is registered with the parser's
/// type-name table as a side effect of parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub ty: DeclaredType,
    pub name: String,
    pub location: SourceLocation,
}

/// Struct declaration: forward (`fields == None`) or full definition.
/// `name2` captures the optional declarator between `}` and `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub attribute: Attribute,
    pub is_extern: bool,
    pub name: String,
    pub name2: Option<String>,
    pub fields: Option<Vec<Field>>,
    pub location: SourceLocation,
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Function(FunctionDecl),
    Typedef(TypedefDecl),
    Struct(StructDecl),
}

impl Decl {
    /// The declared name, for indexing and diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Decl::Var(d) => &d.name,
            Decl::Function(d) => &d.name,
            Decl::Typedef(d) => &d.name,
            Decl::Struct(d) => &d.name,
        }
    }
}

/// Top-level program structure: an ordered list of declarations.
#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    pub decls: Vec<Decl>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        TranslationUnit::default()
    }
}
