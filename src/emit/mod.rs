//! Host-language binding emitters
//!
//! Consumers of the declaration AST that produce text. Currently one
//! backend: [`csharp`] for C# P/Invoke bindings.

pub mod csharp;
