use crate::{
    lang::{code::ByteCode, source_buffer::SourceLocation},
    runtime::{data_structures::value::Value, error},
};
use std::io::{BufRead, Write};

pub mod stack_machine;

use stack_machine::StackMachine;

/// The operand stack of values managed by the machine.
pub type ValueStack = Vec<Value>;

/// Why a run of the machine stopped without an error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Halt {
    /// The instruction pointer reached the end of the program.
    Completed,

    /// The program executed `exit`.  What that means for the host process is up to the caller,
    /// the machine itself never terminates the process.
    Exited,
}

/// Trait for managing the machine's operand stack.  Called by the operation handlers.
pub trait MachineStack {
    /// The full operand stack, bottom first.  Used by the `stack` debug dump.
    fn stack(&self) -> &ValueStack;

    /// The deepest the stack has been during this run.
    fn stack_max_depth(&self) -> usize;

    /// Push a value onto the stack.  This is the primary way operations return results.
    fn push(&mut self, value: Value);

    /// Pop a value from the stack.  If the stack is empty a stack underflow error is returned.
    fn pop(&mut self) -> error::Result<Value>;

    /// Pop the top value, which must be an integer.
    fn pop_as_int(&mut self) -> error::Result<i64>;

    /// Look at the top value without removing it.  Fails with a stack underflow if the stack is
    /// empty.
    fn top(&self) -> error::Result<&Value>;
}

/// Trait for the machine's text channels.
pub trait MachineIo {
    /// Write text to the output sink, flushing it before returning.
    fn write_text(&mut self, text: &str) -> error::Result<()>;

    /// Read one line from the input source, without its line ending.  `None` once the input is
    /// exhausted.
    fn read_line(&mut self) -> error::Result<Option<String>>;
}

/// Core machine trait.  Operation handlers only ever see the machine through this trait.
pub trait Machine: MachineStack + MachineIo {
    /// Location of the instruction currently executing, if it came from source text.
    fn current_location(&self) -> &Option<SourceLocation>;

    /// Ask the machine to halt once the current instruction completes.
    fn request_exit(&mut self);
}

/// Definition of an operation handler.  A handler pops at most as many values as its signature
/// declares and only pushes its results once nothing else can fail.
pub type OperationHandler = fn(&mut dyn Machine) -> error::Result<()>;

/// Run a program to completion against the process's standard input and output.
pub fn execute(code: ByteCode) -> error::Result<Halt> {
    StackMachine::new(code).run()
}

/// Run a program to completion against the given text channels.
pub fn execute_with_io<'io>(
    code: ByteCode,
    input: impl BufRead + 'io,
    output: impl Write + 'io,
) -> error::Result<Halt> {
    StackMachine::with_io(code, input, output).run()
}
