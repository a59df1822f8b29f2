mod core;
pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod vm;

use log::debug;

pub use crate::core::errors::{self, Diagnostic, DiagnosticKind, PplError};
pub use crate::core::{Options, Position};

use crate::{ast::Parser, lexer::Scanner, vm::{Chunk, Value, VM}};

/// Scans, parses, folds and lowers `source` with the options read from the environment.
pub fn compile(source: &str) -> Result<Chunk, PplError> {
    compile_with(source, &Options::from_env())
}

/// Like [`compile`], treating the first lexical or parse diagnostic as fatal.
pub fn compile_with(source: &str, options: &Options) -> Result<Chunk, PplError> {
    let (tokens, mut errors) = Scanner::new(source).tokenize();
    if !errors.is_empty() {
        return Err(errors.remove(0).into());
    }

    let (stmt, mut errors) = Parser::parse(tokens);
    if !errors.is_empty() {
        return Err(errors.remove(0).into());
    }

    let chunk = stmt.lower()?;

    if options.debug {
        debug!("compiled chunk:\n{}", chunk);
    }

    Ok(chunk)
}

/// Compiles `source` and runs it on the reference VM, returning one value per statement.
pub fn evaluate(source: &str) -> Result<Vec<Value>, PplError> {
    let options = Options::from_env();
    let chunk = compile_with(source, &options)?;

    VM::default().with_options(&options).run(&chunk)
}
