//! Runtime error types for the interpreter
//!
//! All runtime errors are fatal: they halt execution and carry the source
//! location of the offending node where one exists.

use crate::source::SourceLocation;
use std::fmt;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone)]
pub enum RuntimeError {
    /// Attempted to read an uninitialized variable
    UninitializedRead {
        name: String,
        location: SourceLocation,
    },

    /// Undefined variable reference
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Undefined function call
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// Called an extern declaration that has no body
    ExternFunctionCall {
        name: String,
        location: SourceLocation,
    },

    /// Function argument count mismatch
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Operand type mismatch
    TypeError {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    /// Division or remainder by zero
    DivisionByZero { location: SourceLocation },

    /// Integer overflow in an arithmetic operation
    ArithmeticOverflow {
        operation: String,
        location: SourceLocation,
    },

    /// Invalid printf format string or argument mismatch
    InvalidPrintfFormat {
        message: String,
        location: SourceLocation,
    },

    /// Assignment or increment target is not a variable
    InvalidAssignmentTarget { location: SourceLocation },

    /// Operation outside the modeled subset (pointer arithmetic, …)
    UnsupportedOperation {
        message: String,
        location: SourceLocation,
    },

    /// Main function not found
    NoMainFunction,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UninitializedRead { name, location } => {
                write!(f, "Read of uninitialized variable '{}' at {}", name, location)
            }
            RuntimeError::UndefinedVariable { name, location } => {
                write!(f, "Undefined variable '{}' at {}", name, location)
            }
            RuntimeError::UndefinedFunction { name, location } => {
                write!(f, "Undefined function '{}' at {}", name, location)
            }
            RuntimeError::ExternFunctionCall { name, location } => {
                write!(
                    f,
                    "Extern function '{}' has no body and no native binding at {}",
                    name, location
                )
            }
            RuntimeError::ArgumentCountMismatch {
                function,
                expected,
                got,
                location,
            } => {
                write!(
                    f,
                    "Function '{}' expects {} arguments, got {} at {}",
                    function, expected, got, location
                )
            }
            RuntimeError::TypeError {
                expected,
                got,
                location,
            } => {
                write!(f, "Type error: expected {}, got {} at {}", expected, got, location)
            }
            RuntimeError::DivisionByZero { location } => {
                write!(f, "Division by zero at {}", location)
            }
            RuntimeError::ArithmeticOverflow {
                operation,
                location,
            } => {
                write!(f, "Integer overflow in {} at {}", operation, location)
            }
            RuntimeError::InvalidPrintfFormat { message, location } => {
                write!(f, "Invalid printf call: {} at {}", message, location)
            }
            RuntimeError::InvalidAssignmentTarget { location } => {
                write!(f, "Assignment target is not a variable at {}", location)
            }
            RuntimeError::UnsupportedOperation { message, location } => {
                write!(f, "Unsupported operation: {} at {}", message, location)
            }
            RuntimeError::NoMainFunction => {
                write!(f, "No 'main' function defined")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
