pub mod arith;
mod chunk;
mod machine;
mod ops;
mod oprunner;
mod stack;
mod value;

pub use chunk::Chunk;
pub use machine::VM;
pub use ops::OpCode;
pub use oprunner::OpRunner;
pub use stack::Stack;
pub use value::{Value, ValueType};
