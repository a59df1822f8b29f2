mod expr;
mod ops;
mod optimizer;
mod parser;
pub mod printer;
mod stmt;

pub use expr::{Expr, ExprVisitor};
pub use ops::{BinaryOp, UnaryOp};
pub use parser::Parser;
pub use stmt::{Stmt, StmtVisitor};
