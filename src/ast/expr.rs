use crate::{
    core::{errors::Diagnostic, Position},
    vm::Value,
};

use super::{BinaryOp, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Value(Position, Value),
    Unary(UnaryOp, Position, Box<Expr>),
    Additive(BinaryOp, Box<Expr>, Box<Expr>),
    Multiplicative(BinaryOp, Box<Expr>, Box<Expr>),
    Shift(BinaryOp, Box<Expr>, Box<Expr>),
    Conditional(BinaryOp, Box<Expr>, Box<Expr>),
    Equality(BinaryOp, Box<Expr>, Box<Expr>),
    Bitwise(BinaryOp, Box<Expr>, Box<Expr>),
    Logical(BinaryOp, Box<Expr>, Box<Expr>),
    NullCoalesce(Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Option<Box<Expr>>),
    /// A problem found while folding, carried in the tree until the parser reports it.
    Error(Diagnostic),
}

impl Expr {
    /// The source span the node covers.
    pub fn position(&self) -> Position {
        match self {
            Expr::Value(position, _) => *position,
            Expr::Unary(_, op, operand) => {
                let operand = operand.position();
                Position::new(op.start(), operand.end(), operand.line(), operand.col())
            }
            Expr::Additive(_, left, right)
            | Expr::Multiplicative(_, left, right)
            | Expr::Shift(_, left, right)
            | Expr::Conditional(_, left, right)
            | Expr::Equality(_, left, right)
            | Expr::Bitwise(_, left, right)
            | Expr::Logical(_, left, right)
            | Expr::NullCoalesce(left, right) => Position::span(left.position(), right.position()),
            Expr::Ternary(cond, if_true, if_false) => {
                let last = if_false.as_deref().unwrap_or(&**if_true);
                Position::span(cond.position(), last.position())
            }
            Expr::Error(diagnostic) => diagnostic.position(),
        }
    }

    /// The first error node in the tree, searching depth first and left to right.
    pub fn check_error(&self) -> Option<&Diagnostic> {
        match self {
            Expr::Error(diagnostic) => Some(diagnostic),
            Expr::Value(..) => None,
            Expr::Unary(_, _, operand) => operand.check_error(),
            Expr::Additive(_, left, right)
            | Expr::Multiplicative(_, left, right)
            | Expr::Shift(_, left, right)
            | Expr::Conditional(_, left, right)
            | Expr::Equality(_, left, right)
            | Expr::Bitwise(_, left, right)
            | Expr::Logical(_, left, right)
            | Expr::NullCoalesce(left, right) => left.check_error().or_else(|| right.check_error()),
            Expr::Ternary(cond, if_true, if_false) => cond
                .check_error()
                .or_else(|| if_true.check_error())
                .or_else(|| if_false.as_deref().and_then(Expr::check_error)),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_expr(&mut self, expr: &Expr) -> T {
        match expr {
            Expr::Value(position, value) => {
                self.visit_value(position, value)
            },
            Expr::Unary(op, position, operand) => {
                self.visit_unary(*op, position, operand)
            },
            Expr::Additive(op, left, right)
            | Expr::Multiplicative(op, left, right)
            | Expr::Shift(op, left, right)
            | Expr::Conditional(op, left, right)
            | Expr::Equality(op, left, right)
            | Expr::Bitwise(op, left, right)
            | Expr::Logical(op, left, right) => {
                self.visit_binary(*op, left, right)
            },
            Expr::NullCoalesce(left, right) => {
                self.visit_null_coalesce(left, right)
            },
            Expr::Ternary(cond, if_true, if_false) => {
                self.visit_ternary(cond, if_true, if_false.as_deref())
            },
            Expr::Error(diagnostic) => {
                self.visit_error(diagnostic)
            },
        }
    }

    fn visit_value(&mut self, position: &Position, value: &Value) -> T;

    fn visit_unary(&mut self, op: UnaryOp, position: &Position, operand: &Expr) -> T;

    fn visit_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> T;

    fn visit_null_coalesce(&mut self, left: &Expr, right: &Expr) -> T;

    fn visit_ternary(&mut self, cond: &Expr, if_true: &Expr, if_false: Option<&Expr>) -> T;

    fn visit_error(&mut self, diagnostic: &Diagnostic) -> T;
}
