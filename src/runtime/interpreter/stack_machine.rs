use std::io::{ stdin, stdout, BufRead, Write };
use tracing::{ debug, trace };
use crate::{ lang::{ code::{ ByteCode,
                             Opcode },
                     source_buffer::SourceLocation },
             runtime::{ built_ins::BUILTIN_OPERATIONS,
                        data_structures::{ dictionary::{ Dictionary,
                                                         OperationInfo },
                                           value::Value },
                        error::{ self,
                                 script_error,
                                 script_error_str,
                                 ErrorKind },
                        interpreter::{ Halt,
                                       Machine,
                                       MachineIo,
                                       MachineStack,
                                       ValueStack } } };



/// The machine that executes compiled programs.
///
/// A machine is single-use: it is built around one program, run until it completes, exits, or
/// fails, and then discarded.  It owns its operand stack and instruction pointer outright, so
/// nothing is shared between machines.
pub struct StackMachine<'io>
{
    /// The program being run.  Never modified.
    code: ByteCode,

    /// Index of the next instruction to execute.  Only ever advances by one.
    instruction_pointer: usize,

    /// The operand stack.
    stack: ValueStack,

    /// The deepest the operand stack has been.
    max_depth: usize,

    /// Location of the instruction currently executing, if it has one.
    current_location: Option<SourceLocation>,

    /// The operation table symbols are dispatched through.
    dictionary: &'io Dictionary,

    /// Set by `exit`, checked after every instruction.
    exit_requested: bool,

    /// Where `read` takes its lines from.
    input: Box<dyn BufRead + 'io>,

    /// Where `print`, `println`, and `stack` write to.
    output: Box<dyn Write + 'io>
}


impl StackMachine<'static>
{
    /// A machine using the built-in operations and the process's standard input and output.
    pub fn new(code: ByteCode) -> StackMachine<'static>
    {
        StackMachine::with_io(code, stdin().lock(), stdout())
    }
}


impl<'io> StackMachine<'io>
{
    /// A machine using the built-in operations and the given text channels.
    pub fn with_io(code: ByteCode,
                   input: impl BufRead + 'io,
                   output: impl Write + 'io) -> StackMachine<'io>
    {
        StackMachine::with_dictionary(code, &*BUILTIN_OPERATIONS, input, output)
    }

    /// A machine with its own operation table.
    pub fn with_dictionary(code: ByteCode,
                           dictionary: &'io Dictionary,
                           input: impl BufRead + 'io,
                           output: impl Write + 'io) -> StackMachine<'io>
    {
        StackMachine
            {
                code,
                instruction_pointer: 0,
                stack: ValueStack::new(),
                max_depth: 0,
                current_location: None,
                dictionary,
                exit_requested: false,
                input: Box::new(input),
                output: Box::new(output)
            }
    }

    pub fn instruction_pointer(&self) -> usize
    {
        self.instruction_pointer
    }

    /// Run the program until the instruction pointer reaches its end, `exit` is executed, or an
    /// instruction fails.  The first error halts the run and is returned as-is.
    pub fn run(&mut self) -> error::Result<Halt>
    {
        debug!(instructions = self.code.len(), "Machine starting.");

        while self.instruction_pointer < self.code.len()
        {
            let instruction = self.code[self.instruction_pointer].clone();

            self.instruction_pointer += 1;
            self.current_location = instruction.location;

            trace!(pointer = self.instruction_pointer - 1,
                   depth = self.stack.len(),
                   "Dispatching {}.",
                   instruction.op);

            if let Err(error) = self.dispatch(&instruction.op)
            {
                debug!(%error, "Machine halted on error.");
                return Err(error);
            }

            if self.exit_requested
            {
                debug!(depth = self.stack.len(), "Machine exited.");
                return Ok(Halt::Exited);
            }
        }

        debug!(depth = self.stack.len(), max_depth = self.max_depth, "Machine completed.");
        Ok(Halt::Completed)
    }

    /// Literals are pushed directly, symbols go through the dictionary.
    fn dispatch(&mut self, op: &Opcode) -> error::Result<()>
    {
        match op
        {
            Opcode::Symbol(name) =>
                {
                    let dictionary = self.dictionary;

                    match dictionary.find(name)
                    {
                        Some(info) => self.execute_operation(info),
                        None => script_error(self,
                                             ErrorKind::UnknownOpcode,
                                             format!("Unknown opcode '{}'.", name))
                    }
                },

            literal =>
                {
                    if let Some(value) = literal.literal_value()
                    {
                        self.push(value);
                    }

                    Ok(())
                }
        }
    }

    /// Execute one operation so that it either fully applies or leaves the stack untouched.  The
    /// operand count is checked up front, and if the handler fails after popping its operands they
    /// are put back.
    fn execute_operation(&mut self, info: &OperationInfo) -> error::Result<()>
    {
        let depth = self.stack.len();

        if depth < info.inputs()
        {
            return script_error(self,
                                ErrorKind::StackUnderflow,
                                format!("'{}' needs {} operand(s), the stack holds {}.",
                                        info.name(),
                                        info.inputs(),
                                        depth));
        }

        let base = depth - info.inputs();
        let operands = self.stack[base..].to_vec();
        let handler = info.handler();

        let result = handler(self);

        if result.is_err()
        {
            self.stack.truncate(base);
            self.stack.extend(operands);
        }

        result
    }
}


impl MachineStack for StackMachine<'_>
{
    fn stack(&self) -> &ValueStack
    {
        &self.stack
    }

    fn stack_max_depth(&self) -> usize
    {
        self.max_depth
    }

    fn push(&mut self, value: Value)
    {
        self.stack.push(value);

        if self.stack.len() > self.max_depth
        {
            self.max_depth = self.stack.len();
        }
    }

    fn pop(&mut self) -> error::Result<Value>
    {
        match self.stack.pop()
        {
            Some(value) => Ok(value),
            None => script_error_str(self, ErrorKind::StackUnderflow, "Stack underflow.")
        }
    }

    fn pop_as_int(&mut self) -> error::Result<i64>
    {
        match self.pop()?
        {
            Value::Int(value) => Ok(value),
            other => script_error(self,
                                  ErrorKind::TypeOperation,
                                  format!("Expected an int, found {} {}.",
                                          other.kind_name(),
                                          other.debug_text()))
        }
    }

    fn top(&self) -> error::Result<&Value>
    {
        match self.stack.last()
        {
            Some(value) => Ok(value),
            None => script_error_str(self, ErrorKind::StackUnderflow, "Stack underflow.")
        }
    }
}


impl MachineIo for StackMachine<'_>
{
    fn write_text(&mut self, text: &str) -> error::Result<()>
    {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;

        Ok(())
    }

    fn read_line(&mut self) -> error::Result<Option<String>>
    {
        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0
        {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches([ '\n', '\r' ]).to_string()))
    }
}


impl Machine for StackMachine<'_>
{
    fn current_location(&self) -> &Option<SourceLocation>
    {
        &self.current_location
    }

    fn request_exit(&mut self)
    {
        self.exit_requested = true;
    }
}
