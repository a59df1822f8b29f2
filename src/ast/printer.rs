use crate::{
    core::{errors::Diagnostic, Position},
    vm::Value,
};

use super::{BinaryOp, Expr, ExprVisitor, Stmt, StmtVisitor, UnaryOp};

#[derive(Default)]
pub struct AstPrinter {}

impl AstPrinter {
    pub fn print_expr(expr: &Expr) -> String {
        AstPrinter::default().visit_expr(expr)
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        AstPrinter::default().visit_stmt(stmt)
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_value(&mut self, _position: &Position, value: &Value) -> String {
        format!("({} {})", value.value_type(), value)
    }

    fn visit_unary(&mut self, op: UnaryOp, _position: &Position, operand: &Expr) -> String {
        format!("({} {})", op, self.visit_expr(operand))
    }

    fn visit_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> String {
        format!("({} {} {})", self.visit_expr(left), op, self.visit_expr(right))
    }

    fn visit_null_coalesce(&mut self, left: &Expr, right: &Expr) -> String {
        self.visit_binary(BinaryOp::Coalesce, left, right)
    }

    fn visit_ternary(&mut self, cond: &Expr, if_true: &Expr, if_false: Option<&Expr>) -> String {
        match if_false {
            Some(if_false) => format!(
                "({} ? {} : {})",
                self.visit_expr(cond),
                self.visit_expr(if_true),
                self.visit_expr(if_false)
            ),
            None => format!("({} ? {})", self.visit_expr(cond), self.visit_expr(if_true)),
        }
    }

    fn visit_error(&mut self, diagnostic: &Diagnostic) -> String {
        diagnostic.to_string()
    }
}

impl StmtVisitor<String> for AstPrinter {
    fn visit_block(&mut self, stmts: &[Stmt]) -> String {
        let mut result = String::new();
        result.push_str("[\n");
        for stmt in stmts {
            result.push_str(&self.visit_stmt(stmt));
            result.push('\n');
        }
        result.push(']');
        result
    }

    fn visit_expr_stmt(&mut self, expr: &Expr) -> String {
        format!("({})", self.visit_expr(expr))
    }
}
