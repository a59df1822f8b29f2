//! Operator semantics shared by the constant folder and the VM, so that folding an
//! expression and executing it always agree.

use crate::ast::{BinaryOp, UnaryOp};

use super::{Value, ValueType};

/// Why an operator could not be applied to its operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// The operator has no rule for this combination of operand types.
    Unsupported,
    /// The operator is defined for the family of types but not for `subject`.
    NoImplementation { preposition: &'static str, subject: &'static str },
    DivisionByZero,
    Overflow,
    NegativeShift,
}

impl Fault {
    pub fn describe_binary(&self, op: BinaryOp, left: ValueType, right: ValueType) -> String {
        match self {
            Fault::Unsupported => format!("Can't use {} {} {}", left, op.name(), right),
            _ => self.describe(op.name()),
        }
    }

    pub fn describe_unary(&self, op: UnaryOp, operand: ValueType) -> String {
        match self {
            Fault::Unsupported => format!("Can't use {} {}", op.name(), operand),
            _ => self.describe(op.name()),
        }
    }

    fn describe(&self, op_name: &str) -> String {
        match self {
            Fault::Unsupported => format!("Can't use {}", op_name),
            Fault::NoImplementation { preposition, subject } => {
                format!("There is no implementation of {} operator {} {}", op_name, preposition, subject)
            }
            Fault::DivisionByZero => "division by zero".to_string(),
            Fault::Overflow => format!("Integer overflow in {} operation", op_name),
            Fault::NegativeShift => "negative shift count".to_string(),
        }
    }
}

/// Applies a two operand operator. Integral Float results are narrowed to Integer.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Fault> {
    let result = match op {
        BinaryOp::Plus | BinaryOp::Minus => additive(op, left, right),
        BinaryOp::Star | BinaryOp::Slash | BinaryOp::SlashSlash | BinaryOp::Percent | BinaryOp::StarStar => {
            multiplicative(op, left, right)
        }
        BinaryOp::LeftShift | BinaryOp::RightShift => shift(op, left, right),
        BinaryOp::Greater | BinaryOp::GreaterEqual | BinaryOp::Less | BinaryOp::LessEqual => {
            relational(op, left, right)
        }
        BinaryOp::Equal => Ok(Value::Bool(equals(left, right))),
        BinaryOp::NotEqual => Ok(Value::Bool(!equals(left, right))),
        BinaryOp::Is => Ok(Value::Bool(identical(left, right))),
        BinaryOp::IsNot => Ok(Value::Bool(!identical(left, right))),
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => bitwise(op, left, right),
        BinaryOp::AndAnd | BinaryOp::OrOr | BinaryOp::And | BinaryOp::Xor => logical(op, left, right),
        BinaryOp::Coalesce => Err(Fault::Unsupported),
    }?;

    Ok(result.narrow())
}

pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, Fault> {
    match (op, operand) {
        (UnaryOp::Plus, Value::Integer(_) | Value::Float(_)) => Ok(operand.clone().narrow()),
        (UnaryOp::Minus, Value::Integer(i)) => i.checked_neg().map(Value::Integer).ok_or(Fault::Overflow),
        (UnaryOp::Minus, Value::Float(n)) => Ok(Value::Float(-n).narrow()),
        _ => Err(Fault::Unsupported),
    }
}

/// Numeric comparison across Integer and Float, value comparison within a type.
/// Values of different kinds are never equal.
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            left.as_number() == right.as_number()
        }
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

fn identical(left: &Value, right: &Value) -> bool {
    left.value_type() == right.value_type() && equals(left, right)
}

fn additive(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            let result = if op == BinaryOp::Plus { a.checked_add(*b) } else { a.checked_sub(*b) };
            result.map(Value::Integer).ok_or(Fault::Overflow)
        }
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            let (a, b) = numbers(left, right)?;
            Ok(Value::Float(if op == BinaryOp::Plus { a + b } else { a - b }))
        }
        (Value::String(a), _) if op == BinaryOp::Plus => Ok(Value::String(format!("{}{}", a, right))),
        (Value::String(_), _) => Err(Fault::NoImplementation {
            preposition: "for",
            subject: "String",
        }),
        _ => Err(Fault::Unsupported),
    }
}

fn multiplicative(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            let (a, b) = (*a, *b);
            match op {
                BinaryOp::Star => a.checked_mul(b).map(Value::Integer).ok_or(Fault::Overflow),
                BinaryOp::Slash if b == 0 => Err(Fault::DivisionByZero),
                BinaryOp::Slash => Ok(Value::Float(a as f64 / b as f64)),
                BinaryOp::SlashSlash => floor_div(a, b).map(Value::Integer),
                BinaryOp::Percent => floor_mod(a, b).map(Value::Integer),
                BinaryOp::StarStar if b < 0 => {
                    if a == 0 {
                        return Err(Fault::DivisionByZero);
                    }
                    Ok(Value::Float((a as f64).powf(b as f64)))
                }
                // Bases whose powers never grow, so any exponent fits.
                _ if a == 1 || (a == 0 && b > 0) => Ok(Value::Integer(a)),
                _ if a == -1 => Ok(Value::Integer(if b % 2 == 0 { 1 } else { -1 })),
                _ => u32::try_from(b)
                    .ok()
                    .and_then(|b| a.checked_pow(b))
                    .map(Value::Integer)
                    .ok_or(Fault::Overflow),
            }
        }
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            let (a, b) = numbers(left, right)?;
            match op {
                BinaryOp::Star => Ok(Value::Float(a * b)),
                BinaryOp::StarStar if a == 0.0 && b < 0.0 => Err(Fault::DivisionByZero),
                BinaryOp::StarStar => Ok(Value::Float(a.powf(b))),
                _ if b == 0.0 => Err(Fault::DivisionByZero),
                BinaryOp::Slash => Ok(Value::Float(a / b)),
                BinaryOp::Percent => {
                    let rem = a % b;
                    Ok(Value::Float(if rem != 0.0 && (rem < 0.0) != (b < 0.0) { rem + b } else { rem }))
                }
                _ => {
                    let quotient = (a / b).floor();
                    if quotient.is_finite() && quotient >= i64::MIN as f64 && quotient < i64::MAX as f64 {
                        Ok(Value::Integer(quotient as i64))
                    } else {
                        Err(Fault::Overflow)
                    }
                }
            }
        }
        _ => Err(Fault::Unsupported),
    }
}

fn floor_div(a: i64, b: i64) -> Result<i64, Fault> {
    if b == 0 {
        return Err(Fault::DivisionByZero);
    }

    let quotient = a.checked_div(b).ok_or(Fault::Overflow)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

fn floor_mod(a: i64, b: i64) -> Result<i64, Fault> {
    if b == 0 {
        return Err(Fault::DivisionByZero);
    }

    // i64::MIN % -1 overflows in Rust but is 0 mathematically.
    let rem = a.checked_rem(b).unwrap_or(0);
    if rem != 0 && (rem < 0) != (b < 0) {
        Ok(rem + b)
    } else {
        Ok(rem)
    }
}

fn shift(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Integer(_), Value::Integer(b)) if *b < 0 => Err(Fault::NegativeShift),
        (Value::Integer(a), Value::Integer(b)) => {
            let (a, b) = (*a, *b);
            let result = match op {
                BinaryOp::LeftShift if a == 0 => Some(0),
                BinaryOp::LeftShift if b >= 64 => None,
                BinaryOp::LeftShift => Some(a << b).filter(|shifted| *shifted >> b == a),
                _ if b >= 64 => Some(if a < 0 { -1 } else { 0 }),
                _ => Some(a >> b),
            };
            result.map(Value::Integer).ok_or(Fault::Overflow)
        }
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => Err(Fault::NoImplementation {
            preposition: "with",
            subject: "Float",
        }),
        _ => Err(Fault::Unsupported),
    }
}

fn relational(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Fault> {
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
        _ => {
            let (a, b) = numbers(left, right)?;
            a.partial_cmp(&b)
        }
    };

    let result = match ordering {
        // NaN compares false against everything.
        None => false,
        Some(ordering) => match op {
            BinaryOp::Greater => ordering.is_gt(),
            BinaryOp::GreaterEqual => ordering.is_ge(),
            BinaryOp::Less => ordering.is_lt(),
            _ => ordering.is_le(),
        },
    };

    Ok(Value::Bool(result))
}

fn bitwise(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(match op {
            BinaryOp::BitAnd => a & b,
            BinaryOp::BitOr => a | b,
            _ => a ^ b,
        })),
        _ => Err(Fault::Unsupported),
    }
}

fn logical(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match op {
            BinaryOp::OrOr => *a || *b,
            BinaryOp::Xor => a ^ b,
            _ => *a && *b,
        })),
        _ => Err(Fault::Unsupported),
    }
}

fn numbers(left: &Value, right: &Value) -> Result<(f64, f64), Fault> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(Fault::Unsupported),
    }
}
