use fnv::FnvHashMap;
use log::error;

use crate::{
    ast::{BinaryOp, Expr, ExprVisitor, Stmt, StmtVisitor, UnaryOp},
    core::{
        errors::{self, Diagnostic, PplError},
        Position,
    },
    vm::{Chunk, OpCode, Value},
};

#[derive(Default)]
pub struct Compiler {
    pub chunk: Chunk,

    constants: FnvHashMap<String, usize>,
    next_label: usize,
}

impl Compiler {
    fn constant(&mut self, value: Value, position: Position) {
        let key = format!("{:?}", value);
        let idx = match self.constants.get(&key) {
            Some(idx) => *idx,
            None => {
                let idx = self.chunk.add_constant(value);
                self.constants.insert(key, idx);
                idx
            }
        };

        self.chunk.write(OpCode::Constant(idx), position);
    }

    fn label(&mut self) -> usize {
        self.next_label += 1;
        self.next_label - 1
    }

    fn opcode(op: BinaryOp) -> Result<OpCode, PplError> {
        Ok(match op {
            BinaryOp::Plus => OpCode::Add,
            BinaryOp::Minus => OpCode::Subtract,
            BinaryOp::Star => OpCode::Multiply,
            BinaryOp::Slash => OpCode::TrueDivide,
            BinaryOp::SlashSlash => OpCode::FloorDivide,
            BinaryOp::Percent => OpCode::Remainder,
            BinaryOp::StarStar => OpCode::Power,
            BinaryOp::LeftShift => OpCode::LeftShift,
            BinaryOp::RightShift => OpCode::RightShift,

            BinaryOp::Greater => OpCode::Greater,
            BinaryOp::GreaterEqual => OpCode::GreaterEqual,
            BinaryOp::Less => OpCode::Less,
            BinaryOp::LessEqual => OpCode::LessEqual,

            BinaryOp::Equal => OpCode::Equal,
            BinaryOp::NotEqual => OpCode::NotEqual,
            BinaryOp::Is => OpCode::Is,
            BinaryOp::IsNot => OpCode::IsNot,

            BinaryOp::BitAnd | BinaryOp::AndAnd | BinaryOp::And => OpCode::BitAnd,
            BinaryOp::BitOr | BinaryOp::OrOr => OpCode::BitOr,
            BinaryOp::BitXor | BinaryOp::Xor => OpCode::BitXor,

            BinaryOp::Coalesce => {
                return Err(errors::system(
                    "The null coalesce operator was lowered as a plain binary operation.",
                    "Report this issue with the expression which caused it.",
                ))
            }
        })
    }
}

impl ExprVisitor<Result<(), PplError>> for Compiler {
    fn visit_value(&mut self, position: &Position, value: &Value) -> Result<(), PplError> {
        self.constant(value.clone(), *position);
        Ok(())
    }

    fn visit_unary(&mut self, op: UnaryOp, position: &Position, operand: &Expr) -> Result<(), PplError> {
        self.visit_expr(operand)?;

        if op == UnaryOp::Minus {
            self.chunk.write(OpCode::Negate, *position);
        }

        Ok(())
    }

    fn visit_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<(), PplError> {
        self.visit_expr(left)?;
        self.visit_expr(right)?;

        self.chunk.write(Self::opcode(op)?, Position::span(left.position(), right.position()));
        Ok(())
    }

    fn visit_null_coalesce(&mut self, left: &Expr, right: &Expr) -> Result<(), PplError> {
        let keep = self.label();
        let end = self.label();
        let position = left.position();

        self.visit_expr(left)?;
        self.chunk.write(OpCode::Dup, position);
        self.constant(Value::Null, position);
        self.chunk.write(OpCode::Equal, position);
        self.chunk.write(OpCode::PopJumpIfFalse(keep), position);

        self.chunk.write(OpCode::Pop, position);
        self.visit_expr(right)?;
        self.chunk.write(OpCode::Jump(end), right.position());

        self.chunk.write(OpCode::Label(keep), right.position());
        self.chunk.write(OpCode::Label(end), right.position());
        Ok(())
    }

    fn visit_ternary(&mut self, cond: &Expr, if_true: &Expr, if_false: Option<&Expr>) -> Result<(), PplError> {
        let on_true = self.label();
        let end = self.label();
        let position = cond.position();

        self.visit_expr(cond)?;
        self.constant(Value::Bool(true), position);
        self.chunk.write(OpCode::Equal, position);
        self.chunk.write(OpCode::PopJumpIfTrue(on_true), position);

        match if_false {
            Some(if_false) => self.visit_expr(if_false)?,
            None => self.constant(Value::Null, if_true.position()),
        }
        self.chunk.write(OpCode::Jump(end), position);

        self.chunk.write(OpCode::Label(on_true), if_true.position());
        self.visit_expr(if_true)?;
        self.chunk.write(OpCode::Label(end), if_true.position());
        Ok(())
    }

    fn visit_error(&mut self, diagnostic: &Diagnostic) -> Result<(), PplError> {
        error!("error node reached the code generator: {}", diagnostic);

        Err(errors::system(
            format!("Cannot lower a tree which still contains an error ({}).", diagnostic),
            "Check the tree with `check_error` before lowering it.",
        ))
    }
}

impl StmtVisitor<Result<(), PplError>> for Compiler {
    fn visit_block(&mut self, stmts: &[Stmt]) -> Result<(), PplError> {
        for stmt in stmts {
            self.visit_stmt(stmt)?;
        }

        Ok(())
    }

    fn visit_expr_stmt(&mut self, expr: &Expr) -> Result<(), PplError> {
        self.visit_expr(expr)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ast::Parser, lexer::Scanner};

    use super::*;

    fn lower(source: &str) -> Chunk {
        let (tokens, _) = Scanner::new(source).tokenize();
        let expr = Parser::parse_expression(tokens).expect("expression should parse");

        let mut compiler = Compiler::default();
        compiler.visit_expr(&expr).expect("lowering should succeed");
        compiler.chunk
    }

    #[test]
    fn test_binary() {
        let chunk = lower("1 + 2 * 1");

        assert_eq!(
            chunk.code(),
            &[
                OpCode::Constant(0),
                OpCode::Constant(1),
                OpCode::Constant(0),
                OpCode::Multiply,
                OpCode::Add,
            ]
        );
        assert_eq!(chunk.constants(), &[Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_unary() {
        assert_eq!(lower("+1").code(), &[OpCode::Constant(0)]);
        assert_eq!(lower("-1").code(), &[OpCode::Constant(0), OpCode::Negate]);
    }

    #[test]
    fn test_constants_are_typed() {
        let chunk = lower("1 + 1.0");
        assert_eq!(chunk.constants(), &[Value::Integer(1), Value::Float(1.0)]);
    }

    #[test]
    fn test_logical() {
        assert_eq!(lower("True or False").code()[2], OpCode::BitAnd);
        assert_eq!(lower("True || False").code()[2], OpCode::BitOr);
        assert_eq!(lower("True xor False").code()[2], OpCode::BitXor);
    }

    #[test]
    fn test_null_coalesce() {
        let chunk = lower("null ?? 1");

        assert_eq!(
            chunk.code(),
            &[
                OpCode::Constant(0),
                OpCode::Dup,
                OpCode::Constant(0),
                OpCode::Equal,
                OpCode::PopJumpIfFalse(0),
                OpCode::Pop,
                OpCode::Constant(1),
                OpCode::Jump(1),
                OpCode::Label(0),
                OpCode::Label(1),
            ]
        );
    }

    #[test]
    fn test_ternary() {
        let chunk = lower("True ? 1");

        assert_eq!(
            chunk.code(),
            &[
                OpCode::Constant(0),
                OpCode::Constant(0),
                OpCode::Equal,
                OpCode::PopJumpIfTrue(0),
                OpCode::Constant(1),
                OpCode::Jump(1),
                OpCode::Label(0),
                OpCode::Constant(2),
                OpCode::Label(1),
            ]
        );
        assert_eq!(chunk.constants(), &[Value::Bool(true), Value::Null, Value::Integer(1)]);
    }

    #[test]
    fn test_error_node() {
        let mut compiler = Compiler::default();
        let expr = Expr::Error(Diagnostic::parse_exception("division by zero", Position::new(0, 5, 1, 1)));

        assert!(matches!(compiler.visit_expr(&expr), Err(PplError::System { .. })));
    }
}
