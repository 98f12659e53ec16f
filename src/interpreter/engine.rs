//! Execution engine for the C interpreter
//!
//! A tree-walking evaluator over the parsed [`TranslationUnit`]. Statement
//! outcomes are an explicit [`ControlFlow`] value threaded back through the
//! execution methods; `break`, `continue`, and `return` never unwind.

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::Value;
use crate::parser::ast::{Decl, FunctionDecl, TranslationUnit, VarDecl};
use crate::source::SourceLocation;
use rustc_hash::FxHashMap;

/// Outcome of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return(Option<Value>),
}

/// The main interpreter that executes a parsed program
pub struct Interpreter {
    /// Function definitions and extern declarations (name → decl)
    pub(crate) functions: FxHashMap<String, FunctionDecl>,

    /// Global variable declarations, in document order
    global_decls: Vec<VarDecl>,

    /// Global variable values
    pub(crate) globals: FxHashMap<String, Value>,

    /// Local scopes of the current function frame, innermost last
    pub(crate) locals: Vec<FxHashMap<String, Value>>,

    /// Everything printf produced so far
    output: String,
}

impl Interpreter {
    /// Index a translation unit for execution.
    pub fn new(tu: &TranslationUnit) -> Self {
        let mut functions = FxHashMap::default();
        let mut global_decls = Vec::new();

        for decl in &tu.decls {
            match decl {
                Decl::Function(f) => {
                    functions.insert(f.name.clone(), f.clone());
                }
                Decl::Var(v) => global_decls.push(v.clone()),
                // struct layouts and typedefs carry no runtime behavior here
                Decl::Struct(_) | Decl::Typedef(_) => {}
            }
        }

        Interpreter {
            functions,
            global_decls,
            globals: FxHashMap::default(),
            locals: Vec::new(),
            output: String::new(),
        }
    }

    /// Evaluate global initializers, then call `main`. Returns the exit
    /// value: `main`'s return value, or 0 when it returns without one.
    pub fn run(&mut self) -> Result<i64, RuntimeError> {
        let global_decls = std::mem::take(&mut self.global_decls);
        for decl in &global_decls {
            let value = match &decl.init {
                Some(expr) => self.eval_expr(expr)?,
                None => Value::Uninitialized,
            };
            self.globals.insert(decl.name.clone(), value);
        }
        self.global_decls = global_decls;

        let main = match self.functions.get("main") {
            Some(f) => f.clone(),
            None => return Err(RuntimeError::NoMainFunction),
        };

        // main's parameters (argc and friends) default to zero
        let args = vec![Value::Int(0); main.params.len()];
        let result = self.invoke(&main, args, main.location)?;
        Ok(result.as_int().unwrap_or(0))
    }

    /// Everything printf has written.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub(crate) fn push_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Call a function by name with evaluated arguments.
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let func = match self.functions.get(name) {
            Some(f) => f.clone(),
            None => {
                return Err(RuntimeError::UndefinedFunction {
                    name: name.to_string(),
                    location,
                });
            }
        };

        if args.len() != func.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch {
                function: name.to_string(),
                expected: func.params.len(),
                got: args.len(),
                location,
            });
        }

        self.invoke(&func, args, location)
    }

    /// Run a function body in a fresh frame. The caller's local scopes are
    /// saved and restored around the call; globals stay visible.
    fn invoke(
        &mut self,
        func: &FunctionDecl,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let body = match &func.body {
            Some(body) => body,
            None => {
                return Err(RuntimeError::ExternFunctionCall {
                    name: func.name.clone(),
                    location,
                });
            }
        };

        let saved = std::mem::take(&mut self.locals);
        self.enter_scope();
        for (param, arg) in func.params.iter().zip(args) {
            self.declare(&param.name, arg);
        }

        let flow = self.execute_block_items(body);
        self.locals = saved;

        match flow? {
            ControlFlow::Return(Some(value)) => Ok(value),
            ControlFlow::Return(None) | ControlFlow::Normal => Ok(Value::Void),
            // break/continue cannot escape a function body: the parser only
            // accepts them inside loop bodies, which handle them
            ControlFlow::Break | ControlFlow::Continue => Ok(Value::Void),
        }
    }

    // ===== Scopes =====

    pub(crate) fn enter_scope(&mut self) {
        self.locals.push(FxHashMap::default());
    }

    pub(crate) fn exit_scope(&mut self) {
        self.locals.pop();
    }

    /// Introduce a name in the innermost scope.
    pub(crate) fn declare(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.locals.last_mut() {
            scope.insert(name.to_string(), value);
        } else {
            self.globals.insert(name.to_string(), value);
        }
    }

    /// Find a name in the local scopes (innermost first), then globals.
    pub(crate) fn lookup(&self, name: &str) -> Option<&Value> {
        for scope in self.locals.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value);
            }
        }
        self.globals.get(name)
    }

    /// Overwrite an existing binding. Returns false when the name is
    /// undeclared.
    pub(crate) fn assign(&mut self, name: &str, value: Value) -> bool {
        for scope in self.locals.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        if let Some(slot) = self.globals.get_mut(name) {
            *slot = value;
            return true;
        }
        false
    }

    /// C truthiness over the modeled values.
    pub(crate) fn truthy(
        &self,
        value: &Value,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        match value {
            Value::Int(n) => Ok(*n != 0),
            Value::Float(x) => Ok(*x != 0.0),
            Value::Str(_) => Ok(true),
            Value::Null => Ok(false),
            Value::Void | Value::Uninitialized => Err(RuntimeError::TypeError {
                expected: "scalar condition".to_string(),
                got: value.type_name().to_string(),
                location,
            }),
        }
    }
}

/// Test helper: parse and run a program, returning exit value and output.
#[cfg(test)]
pub(crate) fn run_program(text: &str) -> Result<(i64, String), RuntimeError> {
    let tu = crate::parser::parse::parse_source(text).expect("parse failed");
    let mut interp = Interpreter::new(&tu);
    let exit = interp.run()?;
    Ok((exit, interp.output().to_string()))
}
