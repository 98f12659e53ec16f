//! Built-in function implementations
//!
//! `printf` is the only function handled by the interpreter itself; all
//! other calls resolve against the parsed program. Output accumulates in
//! the interpreter's buffer so the driver (and tests) decide where it goes.
//!
//! Supported format specifiers: `%d`, `%f`, `%s`, `%%`.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::Value;
use crate::source::SourceLocation;

impl Interpreter {
    pub(crate) fn builtin_printf(
        &mut self,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let format = match args.first() {
            Some(Value::Str(s)) => s.clone(),
            Some(other) => {
                return Err(RuntimeError::InvalidPrintfFormat {
                    message: format!("format must be a string, got {}", other.type_name()),
                    location,
                });
            }
            None => {
                return Err(RuntimeError::InvalidPrintfFormat {
                    message: "printf requires at least one argument".to_string(),
                    location,
                });
            }
        };

        let rendered = format_printf(&format, &args[1..], location)?;
        let written = rendered.len() as i64;
        self.push_output(&rendered);
        Ok(Value::Int(written))
    }
}

fn format_printf(
    format: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<String, RuntimeError> {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars();
    let mut next_arg = 0;

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('d') => match take_arg(args, &mut next_arg, 'd', location)? {
                Value::Int(n) => out.push_str(&n.to_string()),
                other => {
                    return Err(RuntimeError::InvalidPrintfFormat {
                        message: format!("%d expects int, got {}", other.type_name()),
                        location,
                    });
                }
            },
            Some('f') => match take_arg(args, &mut next_arg, 'f', location)? {
                Value::Float(x) => out.push_str(&format!("{:.6}", x)),
                Value::Int(n) => out.push_str(&format!("{:.6}", *n as f64)),
                other => {
                    return Err(RuntimeError::InvalidPrintfFormat {
                        message: format!("%f expects float, got {}", other.type_name()),
                        location,
                    });
                }
            },
            Some('s') => match take_arg(args, &mut next_arg, 's', location)? {
                Value::Str(s) => out.push_str(s),
                other => {
                    return Err(RuntimeError::InvalidPrintfFormat {
                        message: format!("%s expects string, got {}", other.type_name()),
                        location,
                    });
                }
            },
            Some(other) => {
                return Err(RuntimeError::InvalidPrintfFormat {
                    message: format!("unknown format specifier '%{}'", other),
                    location,
                });
            }
            None => {
                return Err(RuntimeError::InvalidPrintfFormat {
                    message: "format string ends with '%'".to_string(),
                    location,
                });
            }
        }
    }

    Ok(out)
}

fn take_arg<'a>(
    args: &'a [Value],
    next_arg: &mut usize,
    spec: char,
    location: SourceLocation,
) -> Result<&'a Value, RuntimeError> {
    let value = args
        .get(*next_arg)
        .ok_or_else(|| RuntimeError::InvalidPrintfFormat {
            message: format!("not enough arguments for '%{}'", spec),
            location,
        })?;
    *next_arg += 1;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::run_program;
    use crate::interpreter::errors::RuntimeError;

    #[test]
    fn test_printf_plain() {
        let source = r#"int main(int argc) { printf("hello\n"); return 0; }"#;
        let (_, output) = run_program(source).unwrap();
        assert_eq!(output, "hello\n");
    }

    #[test]
    fn test_printf_formats() {
        let source = r#"
            int main(int argc) {
                printf("%d and %s and %f and %%\n", 7, "text", 0.5f);
                return 0;
            }
        "#;
        let (_, output) = run_program(source).unwrap();
        assert_eq!(output, "7 and text and 0.500000 and %\n");
    }

    #[test]
    fn test_printf_returns_length() {
        let source = r#"int main(int argc) { return printf("abcd"); }"#;
        let (exit, output) = run_program(source).unwrap();
        assert_eq!(exit, 4);
        assert_eq!(output, "abcd");
    }

    #[test]
    fn test_printf_missing_argument() {
        let source = r#"int main(int argc) { printf("%d"); return 0; }"#;
        let err = run_program(source).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidPrintfFormat { .. }));
    }

    #[test]
    fn test_printf_in_loop() {
        let source = r#"
            int main(int argc) {
                for (int i = 0; i < 3; i++) printf("%d;", i);
                return 0;
            }
        "#;
        let (_, output) = run_program(source).unwrap();
        assert_eq!(output, "0;1;2;");
    }
}
