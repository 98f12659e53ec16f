//! Expression evaluation implementation
//!
//! Arithmetic follows C's usual promotions within the modeled subset: two
//! ints stay int (with overflow detected), any float operand promotes the
//! operation to float. Logical operators short-circuit and yield 0/1.
//!
//! All evaluation methods are implemented as `pub(crate)` methods on the
//! [`Interpreter`] struct.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::Value;
use crate::parser::ast::{BinOp, Expr, UnOp};
use crate::source::SourceLocation;

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(Value::Int(*n)),
            Expr::FloatLiteral(x, _) => Ok(Value::Float(*x)),
            Expr::StringLiteral(s, _) => Ok(Value::Str(decode_escapes(s))),
            Expr::Null { .. } => Ok(Value::Null),

            Expr::Ident(name, location) => {
                let value = self.lookup(name).cloned().ok_or_else(|| {
                    RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location: *location,
                    }
                })?;
                if !value.is_initialized() {
                    return Err(RuntimeError::UninitializedRead {
                        name: name.clone(),
                        location: *location,
                    });
                }
                Ok(value)
            }

            Expr::Unary {
                op,
                operand,
                location,
            } => self.eval_unary(*op, operand, *location),

            Expr::Binary {
                op,
                left,
                right,
                location,
            } => self.eval_binary(*op, left, right, *location),

            Expr::Assign { lhs, rhs, location } => {
                let name = match &**lhs {
                    Expr::Ident(name, _) => name.clone(),
                    _ => {
                        return Err(RuntimeError::InvalidAssignmentTarget {
                            location: *location,
                        });
                    }
                };
                let value = self.eval_expr(rhs)?;
                if !self.assign(&name, value.clone()) {
                    return Err(RuntimeError::UndefinedVariable {
                        name,
                        location: *location,
                    });
                }
                Ok(value)
            }

            Expr::Call {
                callee,
                args,
                location,
            } => {
                let name = match &**callee {
                    Expr::Ident(name, _) => name.clone(),
                    _ => {
                        return Err(RuntimeError::UnsupportedOperation {
                            message: "called expression is not a function name".to_string(),
                            location: *location,
                        });
                    }
                };

                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }

                if name == "printf" {
                    return self.builtin_printf(&values, *location);
                }
                self.call_function(&name, values, *location)
            }
        }
    }

    fn eval_unary(
        &mut self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            UnOp::Neg => match self.eval_expr(operand)? {
                Value::Int(n) => {
                    n.checked_neg()
                        .map(Value::Int)
                        .ok_or(RuntimeError::ArithmeticOverflow {
                            operation: "negation".to_string(),
                            location,
                        })
                }
                Value::Float(x) => Ok(Value::Float(-x)),
                other => Err(RuntimeError::TypeError {
                    expected: "numeric operand".to_string(),
                    got: other.type_name().to_string(),
                    location,
                }),
            },

            UnOp::Not => {
                let value = self.eval_expr(operand)?;
                let truth = self.truthy(&value, location)?;
                Ok(Value::Int(if truth { 0 } else { 1 }))
            }

            UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => {
                let name = match operand {
                    Expr::Ident(name, _) => name.clone(),
                    _ => return Err(RuntimeError::InvalidAssignmentTarget { location }),
                };
                let old = match self.eval_expr(operand)? {
                    Value::Int(n) => n,
                    other => {
                        return Err(RuntimeError::TypeError {
                            expected: "int".to_string(),
                            got: other.type_name().to_string(),
                            location,
                        });
                    }
                };
                let delta = match op {
                    UnOp::PreInc | UnOp::PostInc => 1,
                    _ => -1,
                };
                let new = old
                    .checked_add(delta)
                    .ok_or(RuntimeError::ArithmeticOverflow {
                        operation: "increment".to_string(),
                        location,
                    })?;
                self.assign(&name, Value::Int(new));
                match op {
                    UnOp::PreInc | UnOp::PreDec => Ok(Value::Int(new)),
                    _ => Ok(Value::Int(old)),
                }
            }

            UnOp::AddrOf | UnOp::Deref => Err(RuntimeError::UnsupportedOperation {
                message: "pointer operations are not modeled".to_string(),
                location,
            }),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        // logical operators short-circuit
        if matches!(op, BinOp::And | BinOp::Or) {
            let lhs = self.eval_expr(left)?;
            let lhs_truth = self.truthy(&lhs, location)?;
            let result = match op {
                BinOp::And => {
                    if !lhs_truth {
                        false
                    } else {
                        let rhs = self.eval_expr(right)?;
                        self.truthy(&rhs, location)?
                    }
                }
                _ => {
                    if lhs_truth {
                        true
                    } else {
                        let rhs = self.eval_expr(right)?;
                        self.truthy(&rhs, location)?
                    }
                }
            };
            return Ok(Value::Int(result as i64));
        }

        let lhs = self.eval_expr(left)?;
        let rhs = self.eval_expr(right)?;

        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                self.arith(op, lhs, rhs, location)
            }
            BinOp::Eq | BinOp::Ne => {
                let equal = values_equal(&lhs, &rhs).ok_or_else(|| RuntimeError::TypeError {
                    expected: format!("comparable operands, not {} and {}",
                        lhs.type_name(), rhs.type_name()),
                    got: "mismatched types".to_string(),
                    location,
                })?;
                let result = if op == BinOp::Eq { equal } else { !equal };
                Ok(Value::Int(result as i64))
            }
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let ordering = match (&lhs, &rhs) {
                    (Value::Int(a), Value::Int(b)) => (*a as f64).partial_cmp(&(*b as f64)),
                    (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
                    (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
                    (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
                    _ => None,
                };
                let ordering = ordering.ok_or_else(|| RuntimeError::TypeError {
                    expected: "numeric operands".to_string(),
                    got: format!("{} and {}", lhs.type_name(), rhs.type_name()),
                    location,
                })?;
                let result = match op {
                    BinOp::Lt => ordering.is_lt(),
                    BinOp::Le => ordering.is_le(),
                    BinOp::Gt => ordering.is_gt(),
                    _ => ordering.is_ge(),
                };
                Ok(Value::Int(result as i64))
            }
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn arith(
        &self,
        op: BinOp,
        lhs: Value,
        rhs: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                let result = match op {
                    BinOp::Add => a.checked_add(b),
                    BinOp::Sub => a.checked_sub(b),
                    BinOp::Mul => a.checked_mul(b),
                    BinOp::Div => {
                        if b == 0 {
                            return Err(RuntimeError::DivisionByZero { location });
                        }
                        a.checked_div(b)
                    }
                    _ => unreachable!(),
                };
                result
                    .map(Value::Int)
                    .ok_or(RuntimeError::ArithmeticOverflow {
                        operation: format!("{:?}", op).to_lowercase(),
                        location,
                    })
            }
            (lhs, rhs) => {
                let a = as_float(&lhs).ok_or_else(|| RuntimeError::TypeError {
                    expected: "numeric operand".to_string(),
                    got: lhs.type_name().to_string(),
                    location,
                })?;
                let b = as_float(&rhs).ok_or_else(|| RuntimeError::TypeError {
                    expected: "numeric operand".to_string(),
                    got: rhs.type_name().to_string(),
                    location,
                })?;
                let result = match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => {
                        if b == 0.0 {
                            return Err(RuntimeError::DivisionByZero { location });
                        }
                        a / b
                    }
                    _ => unreachable!(),
                };
                Ok(Value::Float(result))
            }
        }
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

/// Equality over the modeled values. `NULL` compares equal to itself and to
/// integer zero. `None` means the operands are not comparable.
fn values_equal(a: &Value, b: &Value) -> Option<bool> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a == b),
        (Value::Float(a), Value::Float(b)) => Some(a == b),
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
            Some(*a as f64 == *b)
        }
        (Value::Str(a), Value::Str(b)) => Some(a == b),
        (Value::Null, Value::Null) => Some(true),
        (Value::Null, Value::Int(n)) | (Value::Int(n), Value::Null) => Some(*n == 0),
        _ => None,
    }
}

/// Decode the common C escapes of a raw string literal body. Unknown escape
/// pairs pass through as written.
fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
