//! Statement execution implementation
//!
//! Each method returns a [`ControlFlow`] outcome; loop constructs absorb
//! `Break`/`Continue` and everything else propagates the outcome upward
//! until the enclosing function call handles `Return`.
//!
//! All statement execution methods are implemented as `pub(crate)` methods
//! on the [`Interpreter`] struct.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::Value;
use crate::parser::ast::{BlockItem, Expr, ForInit, Stmt, VarDecl};
use crate::source::SourceLocation;

impl Interpreter {
    /// Execute the interleaved declarations and statements of a block.
    pub(crate) fn execute_block_items(
        &mut self,
        items: &[BlockItem],
    ) -> Result<ControlFlow, RuntimeError> {
        for item in items {
            match item {
                BlockItem::Decl(decl) => self.execute_var_decl(decl)?,
                BlockItem::Stmt(stmt) => {
                    let flow = self.execute_statement(stmt)?;
                    if flow != ControlFlow::Normal {
                        return Ok(flow);
                    }
                }
            }
        }
        Ok(ControlFlow::Normal)
    }

    pub(crate) fn execute_var_decl(&mut self, decl: &VarDecl) -> Result<(), RuntimeError> {
        let value = match &decl.init {
            Some(expr) => self.eval_expr(expr)?,
            None => Value::Uninitialized,
        };
        self.declare(&decl.name, value);
        Ok(())
    }

    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::Expr { expr, .. } => {
                self.eval_expr(expr)?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Return { expr, .. } => {
                let value = match expr {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                Ok(ControlFlow::Return(value))
            }

            Stmt::Compound { items, .. } => {
                self.enter_scope();
                let flow = self.execute_block_items(items);
                self.exit_scope();
                flow
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                location,
            } => {
                let cond = self.eval_expr(condition)?;
                if self.truthy(&cond, *location)? {
                    self.execute_statement(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_statement(else_branch)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }

            Stmt::While {
                condition,
                body,
                location,
            } => {
                loop {
                    let cond = self.eval_expr(condition)?;
                    if !self.truthy(&cond, *location)? {
                        break;
                    }
                    match self.execute_statement(body)? {
                        ControlFlow::Normal | ControlFlow::Continue => {}
                        ControlFlow::Break => break,
                        ret @ ControlFlow::Return(_) => return Ok(ret),
                    }
                }
                Ok(ControlFlow::Normal)
            }

            Stmt::For {
                init,
                condition,
                post,
                body,
                location,
            } => {
                // the initializer's declaration scope spans the whole loop
                self.enter_scope();
                let flow = self.execute_for(init, condition, post, body, *location);
                self.exit_scope();
                flow
            }

            Stmt::Break { .. } => Ok(ControlFlow::Break),
            Stmt::Continue { .. } => Ok(ControlFlow::Continue),
        }
    }

    fn execute_for(
        &mut self,
        init: &Option<ForInit>,
        condition: &Option<Expr>,
        post: &Option<Expr>,
        body: &Stmt,
        location: SourceLocation,
    ) -> Result<ControlFlow, RuntimeError> {
        match init {
            Some(ForInit::Decl(decl)) => self.execute_var_decl(decl)?,
            Some(ForInit::Expr(expr)) => {
                self.eval_expr(expr)?;
            }
            None => {}
        }

        loop {
            if let Some(condition) = condition {
                let cond = self.eval_expr(condition)?;
                if !self.truthy(&cond, location)? {
                    return Ok(ControlFlow::Normal);
                }
            }
            match self.execute_statement(body)? {
                ControlFlow::Normal | ControlFlow::Continue => {}
                ControlFlow::Break => return Ok(ControlFlow::Normal),
                ret @ ControlFlow::Return(_) => return Ok(ret),
            }
            if let Some(post) = post {
                self.eval_expr(post)?;
            }
        }
    }
}
