use fnv::FnvHashMap;
use log::{debug, trace};

use crate::{
    ast::{BinaryOp, UnaryOp},
    core::{
        errors::{self, PplError},
        Options,
    },
};

use super::{arith, chunk::Chunk, ops::OpCode, oprunner::OpRunner, value::Value, Stack};

/// A small stack machine which executes lowered chunks.
///
/// Every expression statement leaves exactly one value behind, so the stack left
/// at the end of a run holds the value of each statement in order.
#[derive(Debug, Default)]
pub struct VM {
    debug: bool,
    stack: Stack<Value>,
}

/// What the VM does after an instruction.
pub enum Flow {
    Next,
    Jump(usize),
}

impl VM {
    pub fn with_debug(self) -> Self {
        Self { debug: true, ..self }
    }

    pub fn with_options(self, options: &Options) -> Self {
        Self {
            debug: options.trace,
            ..self
        }
    }

    pub fn run(&mut self, chunk: &Chunk) -> Result<Vec<Value>, PplError> {
        self.stack.clear();

        let labels = Self::resolve_labels(chunk)?;
        let mut ip = 0;

        while let Some(&instruction) = chunk.code().get(ip) {
            if self.debug {
                trace!("{:04} {:<24} {:?}", ip, instruction.to_string(), self.stack);
            }

            ip = match self.visit_op(chunk, instruction)? {
                Flow::Next => ip + 1,
                Flow::Jump(id) => *labels.get(&id).ok_or_else(|| Self::unknown_label(id))?,
            };
        }

        let values = self.stack.drain();
        debug!("executed {} instructions, {} values left", chunk.len(), values.len());
        Ok(values)
    }

    fn resolve_labels(chunk: &Chunk) -> Result<FnvHashMap<usize, usize>, PplError> {
        let mut labels = FnvHashMap::default();

        for (ip, op) in chunk.code().iter().enumerate() {
            if let OpCode::Label(id) = op {
                if labels.insert(*id, ip).is_some() {
                    return Err(errors::runtime(
                        format!("Label L{} is defined more than once.", id),
                        "Make sure that every label in the chunk has a unique id.",
                    ));
                }
            }
        }

        for op in chunk.code() {
            if let OpCode::Jump(id) | OpCode::PopJumpIfTrue(id) | OpCode::PopJumpIfFalse(id) = op {
                if !labels.contains_key(id) {
                    return Err(Self::unknown_label(*id));
                }
            }
        }

        Ok(labels)
    }

    fn unknown_label(id: usize) -> PplError {
        errors::runtime(
            format!("Jump to the unknown label L{}.", id),
            "Make sure that every jump targets a label present in the chunk.",
        )
    }

    fn pop(&mut self) -> Result<Value, PplError> {
        self.stack.pop().ok_or_else(|| {
            errors::runtime(
                "Stack underflow.",
                "Make sure that every instruction has enough operands on the stack.",
            )
        })
    }

    fn pop_pair(&mut self) -> Result<(Value, Value), PplError> {
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }

    fn apply(&mut self, op: BinaryOp, left: Value, right: Value) -> Result<Flow, PplError> {
        let result = arith::binary(op, &left, &right).map_err(|fault| {
            errors::runtime(
                fault.describe_binary(op, left.value_type(), right.value_type()),
                format!("Check the types of the operands passed to '{}'.", op),
            )
        })?;

        self.stack.push(result);
        Ok(Flow::Next)
    }
}

impl<'c> OpRunner<&'c Chunk, Flow> for VM {
    fn visit_constant(&mut self, chunk: &'c Chunk, idx: usize) -> Result<Flow, PplError> {
        let value = chunk.constant(idx).ok_or_else(|| {
            errors::runtime(
                "Invalid constant index in byte code.",
                "Make sure that you are passing valid constant indices to the virtual machine.",
            )
        })?;

        self.stack.push(value.clone().narrow());
        Ok(Flow::Next)
    }

    fn visit_binary(&mut self, _chunk: &'c Chunk, op: BinaryOp) -> Result<Flow, PplError> {
        let (left, right) = self.pop_pair()?;
        self.apply(op, left, right)
    }

    fn visit_bitwise(&mut self, _chunk: &'c Chunk, op: BinaryOp, logical: BinaryOp) -> Result<Flow, PplError> {
        let (left, right) = self.pop_pair()?;

        match (&left, &right) {
            (Value::Bool(_), Value::Bool(_)) => self.apply(logical, left, right),
            _ => self.apply(op, left, right),
        }
    }

    fn visit_negate(&mut self, _chunk: &'c Chunk) -> Result<Flow, PplError> {
        let operand = self.pop()?;
        let result = arith::unary(UnaryOp::Minus, &operand).map_err(|fault| {
            errors::runtime(
                fault.describe_unary(UnaryOp::Minus, operand.value_type()),
                "Make sure that you only negate numbers.",
            )
        })?;

        self.stack.push(result);
        Ok(Flow::Next)
    }

    fn visit_dup(&mut self, _chunk: &'c Chunk) -> Result<Flow, PplError> {
        let top = self.stack.peek().cloned().ok_or_else(|| {
            errors::runtime(
                "Stack underflow.",
                "Make sure that there is a value on the stack before duplicating it.",
            )
        })?;

        self.stack.push(top);
        Ok(Flow::Next)
    }

    fn visit_pop(&mut self, _chunk: &'c Chunk) -> Result<Flow, PplError> {
        self.pop()?;
        Ok(Flow::Next)
    }

    fn visit_label(&mut self, _chunk: &'c Chunk, _id: usize) -> Result<Flow, PplError> {
        Ok(Flow::Next)
    }

    fn visit_jump(&mut self, _chunk: &'c Chunk, id: usize) -> Result<Flow, PplError> {
        Ok(Flow::Jump(id))
    }

    fn visit_pop_jump_if(&mut self, _chunk: &'c Chunk, id: usize, when: bool) -> Result<Flow, PplError> {
        if self.pop()?.is_truthy() == when {
            Ok(Flow::Jump(id))
        } else {
            Ok(Flow::Next)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::Position;

    use super::*;

    fn chunk(ops: &[OpCode], constants: &[Value]) -> Chunk {
        let mut chunk = Chunk::default();
        for constant in constants {
            chunk.add_constant(constant.clone());
        }
        for op in ops {
            chunk.write(*op, Position::new(0, 1, 1, 1));
        }
        chunk
    }

    #[test]
    fn test_arithmetic() {
        let chunk = chunk(
            &[OpCode::Constant(0), OpCode::Constant(1), OpCode::Add, OpCode::Constant(1), OpCode::Multiply],
            &[Value::Integer(3), Value::Integer(4)],
        );

        assert_eq!(VM::default().run(&chunk), Ok(vec![Value::Integer(28)]));
    }

    #[test]
    fn test_logical_on_bitwise_opcodes() {
        let chunk = chunk(
            &[OpCode::Constant(0), OpCode::Constant(1), OpCode::BitXor, OpCode::Constant(2), OpCode::Constant(3), OpCode::BitAnd],
            &[Value::Bool(true), Value::Bool(false), Value::Integer(6), Value::Integer(3)],
        );

        assert_eq!(VM::default().run(&chunk), Ok(vec![Value::Bool(true), Value::Integer(2)]));
    }

    #[test]
    fn test_jumps() {
        // null ?? 5
        let chunk = chunk(
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
            ],
            &[Value::Null, Value::Integer(5)],
        );

        assert_eq!(VM::default().with_debug().run(&chunk), Ok(vec![Value::Integer(5)]));
    }

    #[test]
    fn test_runtime_errors() {
        let underflow = chunk(&[OpCode::Add], &[]);
        assert!(matches!(VM::default().run(&underflow), Err(PplError::Runtime { .. })));

        let unknown = chunk(&[OpCode::Jump(7)], &[]);
        assert!(matches!(VM::default().run(&unknown), Err(PplError::Runtime { .. })));

        let mismatch = chunk(&[OpCode::Constant(0), OpCode::Negate], &[Value::String("a".to_string())]);
        match VM::default().run(&mismatch) {
            Err(PplError::Runtime { message, .. }) => assert_eq!(message, "Can't use minus String"),
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_run_leaves_no_values_behind() {
        let mut vm = VM::default();

        let failing = chunk(
            &[OpCode::Constant(0), OpCode::Constant(0), OpCode::Constant(1), OpCode::Add],
            &[Value::Integer(1), Value::Null],
        );
        assert!(vm.run(&failing).is_err());

        let passing = chunk(&[OpCode::Constant(0)], &[Value::Integer(7)]);
        assert_eq!(vm.run(&passing), Ok(vec![Value::Integer(7)]));
    }
}
