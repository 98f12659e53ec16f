// End-to-end tests across the full lex → pp → project → parse pipeline

use ccode::lexer::TokenKind;
use ccode::parser::ast::*;
use ccode::preproc::ast::{PpCondKind, PpGroupPart};
use ccode::preproc::macros::MacroEnv;
use ccode::source::SourceBuffer;

fn buffer(text: &str) -> SourceBuffer {
    SourceBuffer::new("test.c", text)
}

#[test]
fn test_arithmetic_only_program() {
    let src = buffer("int add(int a,int b){return a+b;} int main(int argc){return add(3,4);}");
    let tu = ccode::parse_source(&src).expect("pipeline failed");

    assert_eq!(tu.decls.len(), 2);
    let main = match &tu.decls[1] {
        Decl::Function(f) => f,
        other => panic!("expected function, got {:?}", other),
    };
    assert_eq!(main.name, "main");

    let body = main.body.as_ref().unwrap();
    match &body[0] {
        BlockItem::Stmt(Stmt::Return {
            expr: Some(Expr::Call { callee, args, .. }),
            ..
        }) => {
            assert!(matches!(&**callee, Expr::Ident(name, _) if name == "add"));
            assert!(matches!(args[0], Expr::IntLiteral(3, _)));
            assert!(matches!(args[1], Expr::IntLiteral(4, _)));
        }
        other => panic!("expected return of a call, got {:?}", other),
    }
}

#[test]
fn test_for_with_break_continue() {
    let src = buffer(
        "int main(int argc){for(int i=0;i<10;i++){ if(i==3) continue; if(i==7) break; } return 0;}",
    );
    let tu = ccode::parse_source(&src).unwrap();

    let main = match &tu.decls[0] {
        Decl::Function(f) => f,
        other => panic!("expected function, got {:?}", other),
    };
    match &main.body.as_ref().unwrap()[0] {
        BlockItem::Stmt(Stmt::For {
            init: Some(ForInit::Decl(init)),
            condition: Some(cond),
            post: Some(post),
            body,
            ..
        }) => {
            assert_eq!(init.name, "i");
            assert!(matches!(init.init, Some(Expr::IntLiteral(0, _))));
            assert!(matches!(cond, Expr::Binary { op: BinOp::Lt, .. }));
            assert!(matches!(
                post,
                Expr::Unary {
                    op: UnOp::PostInc,
                    ..
                }
            ));
            match &**body {
                Stmt::Compound { items, .. } => {
                    assert!(matches!(
                        &items[0],
                        BlockItem::Stmt(Stmt::If { then_branch, .. })
                            if matches!(**then_branch, Stmt::Continue { .. })
                    ));
                    assert!(matches!(
                        &items[1],
                        BlockItem::Stmt(Stmt::If { then_branch, .. })
                            if matches!(**then_branch, Stmt::Break { .. })
                    ));
                }
                other => panic!("expected compound body, got {:?}", other),
            }
        }
        other => panic!("expected for statement, got {:?}", other),
    }
}

#[test]
fn test_typedef_disambiguation() {
    let src = buffer(
        "typedef int my_int; my_int x = 5; int main(int argc){ my_int y = x + 1; return y; }",
    );
    let tu = ccode::parse_source(&src).unwrap();

    assert!(matches!(&tu.decls[0], Decl::Typedef(t) if t.name == "my_int"));
    assert!(matches!(&tu.decls[1], Decl::Var(v) if v.ty == TypeRef::named("my_int")));
    match &tu.decls[2] {
        Decl::Function(f) => {
            let body = f.body.as_ref().unwrap();
            assert!(
                matches!(&body[0], BlockItem::Decl(v) if v.name == "y"),
                "local my_int y must parse as a declaration"
            );
        }
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn test_function_like_vs_object_like_macro() {
    let src = buffer("#define A 1\n#define B(x) x\nint f(int a){ return A; }\n");
    let tokens = ccode::lex(&src).unwrap();
    let pp_tu = ccode::pp_parse(&src, &tokens).unwrap();

    match &pp_tu.parts[0] {
        PpGroupPart::Define(d) => assert!(!d.is_function_like),
        other => panic!("expected define, got {:?}", other),
    }
    match &pp_tu.parts[1] {
        PpGroupPart::Define(d) => assert!(d.is_function_like),
        other => panic!("expected define, got {:?}", other),
    }

    let mut env = MacroEnv::new();
    let projected = ccode::project(&src, &pp_tu, &mut env);
    let lexemes: Vec<&str> = projected.iter().map(|t| src.slice(t.start, t.len)).collect();
    // A expanded to 1; B never appears in f
    assert_eq!(
        lexemes,
        vec!["int", "f", "(", "int", "a", ")", "{", "return", "1", ";", "}"]
    );

    let tu = ccode::parse(&src, projected).unwrap();
    match &tu.decls[0] {
        Decl::Function(f) => {
            assert!(matches!(
                &f.body.as_ref().unwrap()[0],
                BlockItem::Stmt(Stmt::Return {
                    expr: Some(Expr::IntLiteral(1, _)),
                    ..
                })
            ));
        }
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn test_opaque_struct_and_pointer_typedef() {
    let src = buffer("struct GLFWwindow; typedef struct GLFWwindow* GLFWwindowPtr;");
    let tu = ccode::parse_source(&src).unwrap();

    match &tu.decls[0] {
        Decl::Struct(s) => {
            assert_eq!(s.name, "GLFWwindow");
            assert!(s.fields.is_none());
        }
        other => panic!("expected struct, got {:?}", other),
    }
    match &tu.decls[1] {
        Decl::Typedef(t) => {
            assert_eq!(t.name, "GLFWwindowPtr");
            match &t.ty {
                DeclaredType::Plain(ty) => {
                    assert!(ty.is_struct);
                    assert_eq!(ty.name, "GLFWwindow");
                    assert_eq!(ty.pointer_depth, 1);
                }
                other => panic!("expected plain type, got {:?}", other),
            }
        }
        other => panic!("expected typedef, got {:?}", other),
    }
}

#[test]
fn test_nested_if_section() {
    let text = "#ifdef A\nint x;\n#elif defined B\nint y;\n#else\nint z;\n#endif\n";
    let src = buffer(text);
    let tokens = ccode::lex(&src).unwrap();
    let pp_tu = ccode::pp_parse(&src, &tokens).unwrap();

    assert_eq!(pp_tu.parts.len(), 1);
    match &pp_tu.parts[0] {
        PpGroupPart::IfSection(sec) => {
            assert_eq!(sec.if_group.kind, PpCondKind::Ifdef);
            let cond: Vec<&str> = sec
                .if_group
                .condition
                .iter()
                .map(|t| src.slice(t.start, t.len))
                .collect();
            assert_eq!(cond, vec!["A"]);

            assert_eq!(sec.elif_groups.len(), 1);
            let elif_cond: Vec<&str> = sec.elif_groups[0]
                .condition
                .iter()
                .map(|t| src.slice(t.start, t.len))
                .collect();
            assert_eq!(elif_cond, vec!["defined", "B"]);

            assert!(sec.else_group.is_some());

            for group in [
                &sec.if_group,
                &sec.elif_groups[0],
                sec.else_group.as_ref().unwrap(),
            ] {
                assert_eq!(group.parts.len(), 1);
                assert!(matches!(&group.parts[0], PpGroupPart::Text(t) if t.len() == 3));
            }
        }
        other => panic!("expected if-section, got {:?}", other),
    }
}

// ===== Invariants =====

#[test]
fn test_lexeme_reconstructability() {
    let text = "#define A 1 // trailing\nint main(int argc)\t{\r\n  return A; /* done */ }\n";
    let src = buffer(text);
    let tokens = ccode::lex(&src).unwrap();

    let mut rebuilt = String::new();
    for tok in &tokens {
        for trivia in &tok.leading {
            rebuilt.push_str(src.slice(trivia.start, trivia.len));
        }
        rebuilt.push_str(src.slice(tok.start, tok.len));
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn test_pp_preserves_nondirective_tokens() {
    let text = "int a;\n#define X 1\nint b;\n#ifdef Y\nint c;\n#endif\nint d;\n";
    let src = buffer(text);
    let tokens = ccode::lex(&src).unwrap();
    let pp_tu = ccode::pp_parse(&src, &tokens).unwrap();

    fn collect_text<'a>(
        parts: &'a [PpGroupPart],
        out: &mut Vec<&'a ccode::lexer::Token>,
    ) {
        for part in parts {
            match part {
                PpGroupPart::Text(tokens) => out.extend(tokens.iter()),
                PpGroupPart::IfSection(sec) => {
                    collect_text(&sec.if_group.parts, out);
                    for elif in &sec.elif_groups {
                        collect_text(&elif.parts, out);
                    }
                    if let Some(else_group) = &sec.else_group {
                        collect_text(&else_group.parts, out);
                    }
                }
                _ => {}
            }
        }
    }

    let mut preserved = Vec::new();
    collect_text(&pp_tu.parts, &mut preserved);
    let lexemes: Vec<&str> = preserved.iter().map(|t| src.slice(t.start, t.len)).collect();
    assert_eq!(
        lexemes,
        vec!["int", "a", ";", "int", "b", ";", "int", "c", ";", "int", "d", ";"]
    );
    // document order: starts strictly increase
    for pair in preserved.windows(2) {
        assert!(pair[0].start < pair[1].start);
    }
}

#[test]
fn test_projection_idempotent_without_macros() {
    let text = "int main(int argc) { return 1 + 2; }\n";
    let src = buffer(text);
    let tokens = ccode::lex(&src).unwrap();
    let pp_tu = ccode::pp_parse(&src, &tokens).unwrap();
    let mut env = MacroEnv::new();
    let projected = ccode::project(&src, &pp_tu, &mut env);

    assert!(env.is_empty());
    // identical to the lexed stream minus the EOF token
    let without_eof: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .cloned()
        .collect();
    assert_eq!(projected, without_eof);
}

#[test]
fn test_empty_input_through_all_stages() {
    let src = buffer("");
    let tokens = ccode::lex(&src).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);

    let pp_tu = ccode::pp_parse(&src, &tokens).unwrap();
    assert!(pp_tu.parts.is_empty());

    let mut env = MacroEnv::new();
    let projected = ccode::project(&src, &pp_tu, &mut env);
    assert!(projected.is_empty());

    let tu = ccode::parse(&src, projected).unwrap();
    assert!(tu.decls.is_empty());
}

// ===== Realistic input =====

#[test]
fn test_glfw_sample_program() {
    let text = r#"
struct GLFWwindow;
struct GLFWmonitor;

extern "glfw3.dll" int glfwInit();
extern "glfw3.dll" GLFWwindow* glfwCreateWindow(int width, int height, char* title, GLFWmonitor* monitor, GLFWwindow* share);
extern "glfw3.dll" int glfwWindowShouldClose(GLFWwindow* window);
extern "glfw3.dll" void glfwSwapBuffers(GLFWwindow* window);
extern "glfw3.dll" void glfwPollEvents();

int main(int argc)
{
    if (!glfwInit())
        return -1;
    GLFWwindow* window = glfwCreateWindow(800, 600, "Hello GLFW", NULL, NULL);
    while (!glfwWindowShouldClose(window)) {
        glfwSwapBuffers(window);
        glfwPollEvents();
    }
    return 1;
}
"#;
    let src = buffer(text);
    let tu = ccode::parse_source(&src).unwrap();
    assert_eq!(tu.decls.len(), 8);

    match &tu.decls[3] {
        Decl::Function(f) => {
            assert_eq!(f.name, "glfwCreateWindow");
            assert!(f.is_extern);
            assert_eq!(f.library.as_deref(), Some("glfw3.dll"));
            assert_eq!(f.params.len(), 5);
            assert_eq!(f.return_type, TypeRef::named("GLFWwindow").with_pointer());
            assert_eq!(f.params[2].ty, TypeRef::named("char").with_pointer());
        }
        other => panic!("expected function, got {:?}", other),
    }

    let main = match &tu.decls[7] {
        Decl::Function(f) => f,
        other => panic!("expected function, got {:?}", other),
    };
    let body = main.body.as_ref().unwrap();
    assert_eq!(body.len(), 4);
    assert!(matches!(
        &body[1],
        BlockItem::Decl(v) if v.name == "window" && v.ty == TypeRef::named("GLFWwindow").with_pointer()
    ));
    assert!(matches!(&body[2], BlockItem::Stmt(Stmt::While { .. })));
}

#[test]
fn test_glfw_bindings_emission() {
    let text = r#"
struct GLFWwindow;
extern "glfw3.dll" int glfwInit();
extern "glfw3.dll" GLFWwindow* glfwCreateWindow(int width, int height, char* title, GLFWwindow* share);
"#;
    let src = buffer(text);
    let tu = ccode::parse_source(&src).unwrap();
    let out = ccode::emit::csharp::CSharpEmitter::new()
        .emit(&tu)
        .unwrap();

    assert!(out.contains("public static class NativeBindings"));
    assert!(out.contains("[DllImport(\"glfw3.dll\", CallingConvention = CallingConvention.Cdecl)]"));
    assert!(out.contains("public static extern int glfwInit();"));
    assert!(out.contains(
        "public static extern IntPtr glfwCreateWindow(int width, int height, string title, IntPtr share);"
    ));
}

#[test]
fn test_macros_flow_into_parse() {
    let text = "#define WIDTH 800\n#define HEIGHT 600\nint area(void) { return WIDTH * HEIGHT; }\n";
    let src = buffer(text);
    let tu = ccode::parse_source(&src).unwrap();
    match &tu.decls[0] {
        Decl::Function(f) => match &f.body.as_ref().unwrap()[0] {
            BlockItem::Stmt(Stmt::Return {
                expr: Some(Expr::Binary { left, right, .. }),
                ..
            }) => {
                assert!(matches!(**left, Expr::IntLiteral(800, _)));
                assert!(matches!(**right, Expr::IntLiteral(600, _)));
            }
            other => panic!("expected return of a product, got {:?}", other),
        },
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn test_error_reports_line_and_column() {
    let src = buffer("int main(void) {\n  return @;\n}\n");
    let err = ccode::parse_source(&src).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 2"), "got: {}", message);
}
