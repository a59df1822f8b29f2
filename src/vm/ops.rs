use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Constant(usize),

    Add,
    Subtract,
    Multiply,
    TrueDivide,
    FloorDivide,
    Remainder,
    Power,
    LeftShift,
    RightShift,

    BitAnd,
    BitOr,
    BitXor,

    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Is,
    IsNot,

    Negate,

    Dup,
    Pop,

    Label(usize),
    Jump(usize),
    PopJumpIfTrue(usize),
    PopJumpIfFalse(usize),
}

impl Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OpCode::Constant(..) => write!(f, "OP_CONSTANT"),

            OpCode::Add => write!(f, "OP_ADD"),
            OpCode::Subtract => write!(f, "OP_SUBTRACT"),
            OpCode::Multiply => write!(f, "OP_MULTIPLY"),
            OpCode::TrueDivide => write!(f, "OP_TRUE_DIVIDE"),
            OpCode::FloorDivide => write!(f, "OP_FLOOR_DIVIDE"),
            OpCode::Remainder => write!(f, "OP_REMAINDER"),
            OpCode::Power => write!(f, "OP_POWER"),
            OpCode::LeftShift => write!(f, "OP_LEFT_SHIFT"),
            OpCode::RightShift => write!(f, "OP_RIGHT_SHIFT"),

            OpCode::BitAnd => write!(f, "OP_BIT_AND"),
            OpCode::BitOr => write!(f, "OP_BIT_OR"),
            OpCode::BitXor => write!(f, "OP_BIT_XOR"),

            OpCode::Equal => write!(f, "OP_EQUAL"),
            OpCode::NotEqual => write!(f, "OP_NOT_EQUAL"),
            OpCode::Greater => write!(f, "OP_GREATER"),
            OpCode::GreaterEqual => write!(f, "OP_GREATER_EQUAL"),
            OpCode::Less => write!(f, "OP_LESS"),
            OpCode::LessEqual => write!(f, "OP_LESS_EQUAL"),
            OpCode::Is => write!(f, "OP_IS"),
            OpCode::IsNot => write!(f, "OP_IS_NOT"),

            OpCode::Negate => write!(f, "OP_NEGATE"),

            OpCode::Dup => write!(f, "OP_DUP"),
            OpCode::Pop => write!(f, "OP_POP"),

            OpCode::Label(..) => write!(f, "OP_LABEL"),
            OpCode::Jump(..) => write!(f, "OP_JUMP"),
            OpCode::PopJumpIfTrue(..) => write!(f, "OP_POP_JUMP_IF_TRUE"),
            OpCode::PopJumpIfFalse(..) => write!(f, "OP_POP_JUMP_IF_FALSE"),
        }
    }
}
