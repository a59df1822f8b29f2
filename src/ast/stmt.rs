use crate::core::errors::Diagnostic;

use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Vec<Stmt>),
    Expression(Expr),
}

impl Stmt {
    pub fn check_error(&self) -> Option<&Diagnostic> {
        match self {
            Stmt::Block(stmts) => stmts.iter().find_map(Stmt::check_error),
            Stmt::Expression(expr) => expr.check_error(),
        }
    }
}

impl Default for Stmt {
    fn default() -> Self {
        Stmt::Block(Vec::new())
    }
}

pub trait StmtVisitor<T>: ExprVisitor<T> {
    fn visit_stmt(&mut self, stmt: &Stmt) -> T {
        match stmt {
            Stmt::Block(stmts) => self.visit_block(stmts),
            Stmt::Expression(expr) => self.visit_expr_stmt(expr),
        }
    }

    fn visit_block(&mut self, stmts: &[Stmt]) -> T;

    fn visit_expr_stmt(&mut self, expr: &Expr) -> T;
}
