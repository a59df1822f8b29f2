use log::debug;

use crate::{
    ast::{Stmt, StmtVisitor},
    core::errors::PplError,
    vm::Chunk,
};

mod comp;

pub fn compile(stmt: &Stmt) -> Result<Chunk, PplError> {
    let mut compiler = comp::Compiler::default();
    compiler.visit_stmt(stmt)?;

    debug!("lowered to {} instructions and {} constants", compiler.chunk.len(), compiler.chunk.constants().len());
    Ok(compiler.chunk)
}

impl Stmt {
    /// Lowers the statement to a flat instruction sequence.
    pub fn lower(&self) -> Result<Chunk, PplError> {
        compile(self)
    }
}
