use std::fmt::Display;

use crate::core::Position;

use super::{ops::OpCode, value::Value};

/// A lowered program: the instruction stream, its constant pool and the source
/// line of every instruction, run length encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    code: Vec<OpCode>,
    constants: Vec<Value>,
    lines: Vec<(isize, usize)>,
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn code(&self) -> &[OpCode] {
        &self.code
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    pub fn constant(&self, idx: usize) -> Option<&Value> {
        self.constants.get(idx)
    }

    pub fn write(&mut self, op: OpCode, position: Position) {
        self.code.push(op);

        match self.lines.last_mut() {
            // Instructions without a source position share the line of the previous one.
            Some(last) if position.is_eof() || last.0 == position.line() => last.1 += 1,
            _ => self.lines.push((position.line(), 1)),
        }
    }

    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub fn line(&self, offset: usize) -> isize {
        let mut remaining = offset;
        for (line, count) in self.lines.iter() {
            if remaining < *count {
                return *line;
            }
            remaining -= count;
        }

        -1
    }

    pub fn disassemble(&self, ip: usize, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Some(instruction) = self.code.get(ip) else {
            return writeln!(f, "END");
        };

        write!(f, "{:04} ", ip)?;

        let line = self.line(ip);
        if ip > 0 && line == self.line(ip - 1) {
            write!(f, "   | ")?;
        } else {
            write!(f, "{:4} ", line)?;
        }

        match instruction {
            OpCode::Constant(idx) => match self.constants.get(*idx) {
                Some(value) => writeln!(f, "{} {}", instruction, value),
                None => writeln!(f, "{} <invalid {}>", instruction, idx),
            },

            OpCode::Label(id)
            | OpCode::Jump(id)
            | OpCode::PopJumpIfTrue(id)
            | OpCode::PopJumpIfFalse(id) => writeln!(f, "{} L{}", instruction, id),

            op => writeln!(f, "{}", op),
        }
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, _) in self.code.iter().enumerate() {
            self.disassemble(i, f)?;
        }

        Ok(())
    }
}
