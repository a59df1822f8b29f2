use log::debug;

use crate::{
    core::{errors::Diagnostic, Position},
    vm::{arith, Value},
};

use super::{BinaryOp, Expr, Stmt, UnaryOp};

type Rebuild = fn(BinaryOp, Box<Expr>, Box<Expr>) -> Expr;

impl Expr {
    /// Folds every subtree whose operands are all literal, bottom up.
    ///
    /// Operator and type mismatches found along the way become [`Expr::Error`] nodes
    /// positioned over the offending operands. A folded tree is a fixed point, so
    /// optimizing it again returns it unchanged.
    pub fn optimize(self) -> Expr {
        match self {
            Expr::Value(position, value) => Expr::Value(position, value.narrow()),
            Expr::Unary(op, position, operand) => fold_unary(op, position, operand.optimize()),
            Expr::Additive(op, left, right) => fold_binary(Expr::Additive, op, left.optimize(), right.optimize()),
            Expr::Multiplicative(op, left, right) => {
                fold_binary(Expr::Multiplicative, op, left.optimize(), right.optimize())
            }
            Expr::Shift(op, left, right) => fold_binary(Expr::Shift, op, left.optimize(), right.optimize()),
            Expr::Conditional(op, left, right) => {
                fold_binary(Expr::Conditional, op, left.optimize(), right.optimize())
            }
            Expr::Equality(op, left, right) => fold_equality(op, left.optimize(), right.optimize()),
            Expr::Bitwise(op, left, right) => fold_binary(Expr::Bitwise, op, left.optimize(), right.optimize()),
            Expr::Logical(op, left, right) => fold_binary(Expr::Logical, op, left.optimize(), right.optimize()),
            Expr::NullCoalesce(left, right) => fold_null_coalesce(left.optimize(), right.optimize()),
            Expr::Ternary(cond, if_true, if_false) => {
                fold_ternary(cond.optimize(), if_true.optimize(), if_false.map(|expr| expr.optimize()))
            }
            Expr::Error(diagnostic) => Expr::Error(diagnostic),
        }
    }
}

impl Stmt {
    pub fn optimize(self) -> Stmt {
        match self {
            Stmt::Block(stmts) => Stmt::Block(stmts.into_iter().map(Stmt::optimize).collect()),
            Stmt::Expression(expr) => {
                let folded = expr.optimize();
                debug!("folded statement at {}", folded.position());
                Stmt::Expression(folded)
            }
        }
    }
}

fn fold_binary(rebuild: Rebuild, op: BinaryOp, left: Expr, right: Expr) -> Expr {
    match (&left, &right) {
        (Expr::Value(lpos, lvalue), Expr::Value(rpos, rvalue)) => {
            let position = Position::span(*lpos, *rpos);

            match arith::binary(op, lvalue, rvalue) {
                Ok(value) => Expr::Value(position, value),
                Err(fault) => Expr::Error(Diagnostic::parse_exception(
                    fault.describe_binary(op, lvalue.value_type(), rvalue.value_type()),
                    position,
                )),
            }
        }
        _ => rebuild(op, Box::new(left), Box::new(right)),
    }
}

fn fold_equality(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let (keyword, suggestion) = match op {
        BinaryOp::Is => ("is", "=="),
        BinaryOp::IsNot => ("is not", "!="),
        _ => return fold_binary(Expr::Equality, op, left, right),
    };

    match (&left, &right) {
        (Expr::Value(lpos, lvalue), Expr::Value(rpos, _)) => Expr::Error(Diagnostic::syntax_warning(
            format!(
                "\"{}\" with '{}' literal. Did you mean \"{}\"?",
                keyword,
                lvalue.value_type(),
                suggestion
            ),
            Position::span(*lpos, *rpos),
        )),
        _ => Expr::Equality(op, Box::new(left), Box::new(right)),
    }
}

fn fold_unary(op: UnaryOp, op_position: Position, operand: Expr) -> Expr {
    match &operand {
        Expr::Value(position, value) => {
            let position = Position::new(op_position.start(), position.end(), position.line(), position.col());

            match arith::unary(op, value) {
                Ok(value) => Expr::Value(position, value),
                Err(fault) => {
                    Expr::Error(Diagnostic::parse_exception(fault.describe_unary(op, value.value_type()), position))
                }
            }
        }
        _ => Expr::Unary(op, op_position, Box::new(operand)),
    }
}

fn fold_null_coalesce(left: Expr, right: Expr) -> Expr {
    match left {
        Expr::Value(_, Value::Null) => right,
        Expr::Value(..) => left,
        _ => Expr::NullCoalesce(Box::new(left), Box::new(right)),
    }
}

fn fold_ternary(cond: Expr, if_true: Expr, if_false: Option<Expr>) -> Expr {
    match &cond {
        Expr::Value(_, Value::Bool(true)) => if_true,
        Expr::Value(_, Value::Bool(false)) => {
            if_false.unwrap_or_else(|| Expr::Value(if_true.position(), Value::Null))
        }
        Expr::Value(position, value) => Expr::Error(Diagnostic::parse_exception(
            format!("condition value should be True or False but got {}", value.value_type()),
            *position,
        )),
        _ => Expr::Ternary(Box::new(cond), Box::new(if_true), if_false.map(Box::new)),
    }
}
