//! C# P/Invoke binding emitter
//!
//! Renders a parsed translation unit as a C# source file: one static class
//! of `[DllImport]` extern methods, with struct definitions, delegates for
//! function-pointer typedefs, and comments for everything that has no C#
//! counterpart. Pure text generation; nothing here inspects bodies.
//!
//! Type mapping is positional: `char*` becomes `string` in parameter
//! position and `IntPtr` elsewhere; all other pointers become `IntPtr`.

use crate::parser::ast::*;
use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Emitter configuration: output class name and the library used for extern
/// declarations that carry no `extern "…"` string of their own.
pub struct CSharpEmitter {
    class_name: String,
    default_library: String,
}

impl Default for CSharpEmitter {
    fn default() -> Self {
        Self {
            class_name: "NativeBindings".to_string(),
            default_library: "native".to_string(),
        }
    }
}

impl CSharpEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }

    pub fn with_default_library(mut self, library: impl Into<String>) -> Self {
        self.default_library = library.into();
        self
    }

    /// Render the whole translation unit to a C# source string.
    pub fn emit(&self, tu: &TranslationUnit) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.emit_to(&mut out, tu)?;
        Ok(out)
    }

    fn emit_to(&self, w: &mut dyn Write, tu: &TranslationUnit) -> fmt::Result {
        writeln!(w, "using System;")?;
        writeln!(w, "using System.Runtime.InteropServices;")?;
        writeln!(w)?;
        writeln!(w, "public static class {}", self.class_name)?;
        writeln!(w, "{{")?;

        let mut first = true;
        for decl in &tu.decls {
            if !first {
                writeln!(w)?;
            }
            first = false;
            match decl {
                Decl::Struct(s) => self.emit_struct(w, s)?,
                Decl::Typedef(t) => self.emit_typedef(w, t)?,
                Decl::Function(f) => self.emit_function(w, f)?,
                Decl::Var(v) => {
                    writeln!(w, "{}// global variable {} {} (not bound)", INDENT, v.ty, v.name)?;
                }
            }
        }

        writeln!(w, "}}")?;
        Ok(())
    }

    fn emit_struct(&self, w: &mut dyn Write, s: &StructDecl) -> fmt::Result {
        match &s.fields {
            None => {
                // opaque handle: only ever passed by pointer
                writeln!(w, "{}// struct {} is opaque; use IntPtr handles", INDENT, s.name)
            }
            Some(fields) => {
                writeln!(w, "{}[StructLayout(LayoutKind.Sequential)]", INDENT)?;
                writeln!(w, "{}public struct {}", INDENT, s.name)?;
                writeln!(w, "{}{{", INDENT)?;
                for field in fields {
                    writeln!(
                        w,
                        "{}{}public {} {};",
                        INDENT,
                        INDENT,
                        field_type(&field.ty),
                        field.name
                    )?;
                }
                writeln!(w, "{}}}", INDENT)
            }
        }
    }

    fn emit_typedef(&self, w: &mut dyn Write, t: &TypedefDecl) -> fmt::Result {
        match &t.ty {
            DeclaredType::FuncPtr(fp) => {
                writeln!(
                    w,
                    "{}public delegate {} {}({});",
                    INDENT,
                    return_type(&fp.return_type),
                    t.name,
                    parameter_list(&fp.params)
                )
            }
            DeclaredType::Plain(ty) => {
                writeln!(w, "{}// typedef: {} = {}", INDENT, t.name, ty)
            }
        }
    }

    fn emit_function(&self, w: &mut dyn Write, f: &FunctionDecl) -> fmt::Result {
        if f.body.is_some() {
            writeln!(w, "{}// function {} is defined in C and not bound", INDENT, f.name)?;
            return Ok(());
        }

        let library = f
            .library
            .as_deref()
            .unwrap_or(&self.default_library);
        writeln!(
            w,
            "{}[DllImport(\"{}\", CallingConvention = CallingConvention.Cdecl)]",
            INDENT, library
        )?;
        writeln!(
            w,
            "{}public static extern {} {}({});",
            INDENT,
            return_type(&f.return_type),
            f.name,
            parameter_list(&f.params)
        )
    }
}

fn parameter_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", param_type(&p.ty), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parameter-position mapping: `char*` marshals as `string`.
fn param_type(ty: &TypeRef) -> String {
    if ty.name == "char" && ty.pointer_depth == 1 && !ty.is_struct {
        return "string".to_string();
    }
    value_type(ty)
}

fn return_type(ty: &TypeRef) -> String {
    value_type(ty)
}

fn field_type(ty: &TypeRef) -> String {
    value_type(ty)
}

fn value_type(ty: &TypeRef) -> String {
    if ty.pointer_depth > 0 {
        return "IntPtr".to_string();
    }
    if ty.is_struct {
        return ty.name.clone();
    }
    match ty.name.as_str() {
        "int" | "int32_t" | "khronos_int32_t" => "int",
        "char" | "int8_t" | "khronos_int8_t" => "sbyte",
        "float" | "khronos_float_t" => "float",
        "double" => "double",
        "long" | "int64_t" | "khronos_int64_t" => "long",
        "void" => "void",
        "unsigned int" | "uint32_t" | "khronos_uint32_t" => "uint",
        "unsigned char" | "uint8_t" | "khronos_uint8_t" => "byte",
        "unsigned long" | "uint64_t" | "khronos_uint64_t" => "ulong",
        "int16_t" | "khronos_int16_t" => "short",
        "uint16_t" | "khronos_uint16_t" => "ushort",
        "size_t" | "khronos_usize_t" => "UIntPtr",
        "intptr_t" | "khronos_intptr_t" | "khronos_ssize_t" => "IntPtr",
        "uintptr_t" | "khronos_uintptr_t" => "UIntPtr",
        // a typedef or tag name whose C# definition is emitted alongside
        other => other,
    }
    .to_string()
}
