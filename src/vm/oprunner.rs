use crate::{ast::BinaryOp, core::errors::PplError};

use super::OpCode;

pub trait OpRunner<S, R> {
    fn visit_op(&mut self, state: S, op: OpCode) -> Result<R, PplError> {
        match op {
            OpCode::Constant(idx) => self.visit_constant(state, idx),

            OpCode::Add => self.visit_binary(state, BinaryOp::Plus),
            OpCode::Subtract => self.visit_binary(state, BinaryOp::Minus),
            OpCode::Multiply => self.visit_binary(state, BinaryOp::Star),
            OpCode::TrueDivide => self.visit_binary(state, BinaryOp::Slash),
            OpCode::FloorDivide => self.visit_binary(state, BinaryOp::SlashSlash),
            OpCode::Remainder => self.visit_binary(state, BinaryOp::Percent),
            OpCode::Power => self.visit_binary(state, BinaryOp::StarStar),
            OpCode::LeftShift => self.visit_binary(state, BinaryOp::LeftShift),
            OpCode::RightShift => self.visit_binary(state, BinaryOp::RightShift),

            OpCode::BitAnd => self.visit_bitwise(state, BinaryOp::BitAnd, BinaryOp::AndAnd),
            OpCode::BitOr => self.visit_bitwise(state, BinaryOp::BitOr, BinaryOp::OrOr),
            OpCode::BitXor => self.visit_bitwise(state, BinaryOp::BitXor, BinaryOp::Xor),

            OpCode::Equal => self.visit_binary(state, BinaryOp::Equal),
            OpCode::NotEqual => self.visit_binary(state, BinaryOp::NotEqual),
            OpCode::Greater => self.visit_binary(state, BinaryOp::Greater),
            OpCode::GreaterEqual => self.visit_binary(state, BinaryOp::GreaterEqual),
            OpCode::Less => self.visit_binary(state, BinaryOp::Less),
            OpCode::LessEqual => self.visit_binary(state, BinaryOp::LessEqual),
            OpCode::Is => self.visit_binary(state, BinaryOp::Is),
            OpCode::IsNot => self.visit_binary(state, BinaryOp::IsNot),

            OpCode::Negate => self.visit_negate(state),

            OpCode::Dup => self.visit_dup(state),
            OpCode::Pop => self.visit_pop(state),

            OpCode::Label(id) => self.visit_label(state, id),
            OpCode::Jump(id) => self.visit_jump(state, id),
            OpCode::PopJumpIfTrue(id) => self.visit_pop_jump_if(state, id, true),
            OpCode::PopJumpIfFalse(id) => self.visit_pop_jump_if(state, id, false),
        }
    }

    fn visit_constant(&mut self, state: S, idx: usize) -> Result<R, PplError>;

    fn visit_binary(&mut self, state: S, op: BinaryOp) -> Result<R, PplError>;

    /// Bitwise opcodes also carry the logical operators, `logical` applies to Bool operands.
    fn visit_bitwise(&mut self, state: S, op: BinaryOp, logical: BinaryOp) -> Result<R, PplError>;

    fn visit_negate(&mut self, state: S) -> Result<R, PplError>;

    fn visit_dup(&mut self, state: S) -> Result<R, PplError>;
    fn visit_pop(&mut self, state: S) -> Result<R, PplError>;

    fn visit_label(&mut self, state: S, id: usize) -> Result<R, PplError>;
    fn visit_jump(&mut self, state: S, id: usize) -> Result<R, PplError>;
    fn visit_pop_jump_if(&mut self, state: S, id: usize, when: bool) -> Result<R, PplError>;
}
