/// Module for managing source code and the generation of byte code.  This covers the tokenizer and
/// the constant folder.
pub mod lang;

/// Module for the runtime and the data structures used by the machine.  As well as the machine
/// itself and its built-in operations.
pub mod runtime;

/// The interactive read loop.
pub mod repl;

pub use lang::compilation::{ compile, compile_file, compile_unfolded };
pub use runtime::{ error::{ ErrorKind, ScriptError },
                   interpreter::{ execute, execute_with_io, Halt } };
