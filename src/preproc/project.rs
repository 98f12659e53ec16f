//! Projection of the PP tree into a flat token stream
//!
//! Walks a [`PpTranslationUnit`] in document order, folding `#define` and
//! `#undef` into the environment and expanding object-like macros over the
//! text runs. The output is a single linear token list ready for the
//! declaration parser.
//!
//! Conditional sections are not evaluated in this revision: the projector
//! always descends into the `#if` branch and ignores `#elif`/`#else`
//! alternatives. Function-like macro occurrences pass through verbatim.

use crate::lexer::{Token, TokenKind};
use crate::preproc::ast::{PpGroupPart, PpTranslationUnit};
use crate::preproc::macros::{Macro, MacroEnv};
use crate::source::SourceBuffer;
use rustc_hash::FxHashSet;

/// Flatten `tu` into a linear token stream, applying `env` mutations and
/// object-macro expansion along the way.
///
/// The returned stream does not include an EOF token; the declaration
/// parser's reader supplies one.
pub fn project(src: &SourceBuffer, tu: &PpTranslationUnit, env: &mut MacroEnv) -> Vec<Token> {
    let mut out = Vec::new();
    project_parts(src, &tu.parts, env, &mut out);
    log::debug!(
        "projected {} tokens, {} macros live",
        out.len(),
        env.len()
    );
    out
}

fn project_parts(
    src: &SourceBuffer,
    parts: &[PpGroupPart],
    env: &mut MacroEnv,
    out: &mut Vec<Token>,
) {
    for part in parts {
        match part {
            PpGroupPart::Define(def) => env.define(Macro::from_define(def)),
            PpGroupPart::Undef { name } => env.undef(name),
            PpGroupPart::Text(tokens) => {
                for tok in tokens {
                    let mut expanding = FxHashSet::default();
                    expand_token(src, tok, env, &mut expanding, out);
                }
            }
            PpGroupPart::IfSection(sec) => {
                // condition evaluation is out of scope: take the #if branch
                project_parts(src, &sec.if_group.parts, env, out);
            }
            PpGroupPart::Include { .. } | PpGroupPart::Simple { .. } => {}
        }
    }
}

/// Emit one token, recursively expanding it when it names an object-like
/// macro. `expanding` holds the names currently being replaced; hitting one
/// of them again drops the token, which bounds the recursion.
fn expand_token(
    src: &SourceBuffer,
    tok: &Token,
    env: &MacroEnv,
    expanding: &mut FxHashSet<String>,
    out: &mut Vec<Token>,
) {
    if tok.kind != TokenKind::Identifier {
        out.push(tok.clone());
        return;
    }

    let name = tok.lexeme(src);
    match env.get_object(name) {
        Some(Macro::Object { replacement, .. }) => {
            if expanding.contains(name) {
                // self-reference inside an expansion: dropped
                return;
            }
            let owned = name.to_string();
            expanding.insert(owned.clone());
            for rep in replacement {
                expand_token(src, rep, env, expanding, out);
            }
            expanding.remove(&owned);
        }
        _ => out.push(tok.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::preproc::parser::PpParser;

    fn project_text(text: &str) -> (SourceBuffer, Vec<Token>, MacroEnv) {
        let src = SourceBuffer::new("test.c", text);
        let tokens = Lexer::new(&src).tokenize().unwrap();
        let tu = PpParser::new(&src, &tokens).parse().unwrap();
        let mut env = MacroEnv::new();
        let out = project(&src, &tu, &mut env);
        (src, out, env)
    }

    fn lexemes(src: &SourceBuffer, tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(|t| t.lexeme(src).to_string()).collect()
    }

    #[test]
    fn test_no_macros_is_identity_over_text() {
        let (src, out, env) = project_text("int x = 1;\nint y;\n");
        assert!(env.is_empty());
        assert_eq!(
            lexemes(&src, &out),
            vec!["int", "x", "=", "1", ";", "int", "y", ";"]
        );
    }

    #[test]
    fn test_object_macro_expansion() {
        let (src, out, _) = project_text("#define MAX 100\nint x = MAX;\n");
        assert_eq!(lexemes(&src, &out), vec!["int", "x", "=", "100", ";"]);
    }

    #[test]
    fn test_chained_expansion() {
        let (src, out, _) = project_text("#define A B\n#define B 2\nint x = A;\n");
        assert_eq!(lexemes(&src, &out), vec!["int", "x", "=", "2", ";"]);
    }

    #[test]
    fn test_self_reference_is_dropped() {
        let (src, out, _) = project_text("#define A 1 + A\nint x = A;\n");
        // inner A drops; outer expansion yields `1 +`
        assert_eq!(lexemes(&src, &out), vec!["int", "x", "=", "1", "+", ";"]);
    }

    #[test]
    fn test_mutual_recursion_bounded() {
        let (src, out, _) = project_text("#define A B\n#define B A\nint x = A;\n");
        // A -> B -> A(guarded, dropped): nothing remains of the expansion
        assert_eq!(lexemes(&src, &out), vec!["int", "x", "=", ";"]);
    }

    #[test]
    fn test_function_macro_not_expanded() {
        let (src, out, _) = project_text("#define B(x) x\nint f = B;\n");
        assert_eq!(lexemes(&src, &out), vec!["int", "f", "=", "B", ";"]);
    }

    #[test]
    fn test_undef_stops_expansion() {
        let (src, out, _) = project_text("#define A 1\nint x = A;\n#undef A\nint y = A;\n");
        assert_eq!(
            lexemes(&src, &out),
            vec!["int", "x", "=", "1", ";", "int", "y", "=", "A", ";"]
        );
    }

    #[test]
    fn test_redefine_uses_latest() {
        let (src, out, _) = project_text("#define A 1\nint x = A;\n#define A 2\nint y = A;\n");
        assert_eq!(
            lexemes(&src, &out),
            vec!["int", "x", "=", "1", ";", "int", "y", "=", "2", ";"]
        );
    }

    #[test]
    fn test_if_branch_only() {
        let text = "#ifdef A\nint x;\n#elif B\nint y;\n#else\nint z;\n#endif\n";
        let (src, out, _) = project_text(text);
        assert_eq!(lexemes(&src, &out), vec!["int", "x", ";"]);
    }

    #[test]
    fn test_defines_inside_if_branch_apply() {
        let text = "#ifdef A\n#define N 3\n#endif\nint x = N;\n";
        let (src, out, env) = project_text(text);
        assert_eq!(env.len(), 1);
        assert_eq!(lexemes(&src, &out), vec!["int", "x", "=", "3", ";"]);
    }

    #[test]
    fn test_include_and_pragma_emit_nothing() {
        let (src, out, _) = project_text("#include <a.h>\n#pragma once\nint x;\n");
        assert_eq!(lexemes(&src, &out), vec!["int", "x", ";"]);
    }

    #[test]
    fn test_keyword_is_not_expanded() {
        // `if` lexes as a keyword, not an identifier, so a macro named `if`
        // never applies to it
        let (src, out, _) = project_text("#define if 1\nint x = 2; if (x) x = 3;\n");
        let lx = lexemes(&src, &out);
        assert!(lx.contains(&"if".to_string()));
    }
}
