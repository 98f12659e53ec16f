//! Macro definitions and the macro environment
//!
//! The environment is a name → macro mapping folded out of the PP tree in
//! document order: later `#define`s overwrite, `#undef` removes. Replacement
//! token lists keep referring into the source buffer; only the names are
//! copied out.

use crate::lexer::Token;
use crate::preproc::ast::PpDefine;
use rustc_hash::FxHashMap;

/// A recorded macro definition.
#[derive(Debug, Clone)]
pub enum Macro {
    Object {
        name: String,
        replacement: Vec<Token>,
    },
    Function {
        name: String,
        params: Vec<String>,
        is_variadic: bool,
        replacement: Vec<Token>,
    },
}

impl Macro {
    pub fn name(&self) -> &str {
        match self {
            Macro::Object { name, .. } | Macro::Function { name, .. } => name,
        }
    }

    pub fn from_define(def: &PpDefine) -> Self {
        if def.is_function_like {
            Macro::Function {
                name: def.name.clone(),
                params: def.params.clone(),
                is_variadic: def.is_variadic,
                replacement: def.replacement.clone(),
            }
        } else {
            Macro::Object {
                name: def.name.clone(),
                replacement: def.replacement.clone(),
            }
        }
    }
}

/// Name → macro mapping with document-order application semantics.
#[derive(Debug, Default)]
pub struct MacroEnv {
    macros: FxHashMap<String, Macro>,
}

impl MacroEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a macro, overwriting any earlier definition of the name.
    pub fn define(&mut self, mac: Macro) {
        self.macros.insert(mac.name().to_string(), mac);
    }

    /// Remove a definition. Undefining an unknown name is a no-op.
    pub fn undef(&mut self, name: &str) {
        self.macros.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    /// Look up `name` only if it is an object-like macro.
    pub fn get_object(&self, name: &str) -> Option<&Macro> {
        match self.macros.get(name) {
            Some(mac @ Macro::Object { .. }) => Some(mac),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
