use std::{ error::Error,
           process::Termination,
           fmt::{ self, Debug, Display, Formatter }, process::ExitCode };
use crate::lang::source_buffer::SourceLocation;

use super::interpreter::Machine;



pub type Result<T> = std::result::Result<T, ScriptError>;



/// The kinds of failure a program can run into, either while it's being compiled or while it's
/// being executed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind
{
    /// The tokenizer found text it could not classify.
    Syntax,

    /// A symbol that isn't in the operation dictionary.
    UnknownOpcode,

    /// An operation needed more operands than the stack held.
    StackUnderflow,

    /// An operation was given operand kinds it can't combine.
    TypeOperation,

    /// `/` or `%` with a zero right hand operand.
    DivisionByZero,

    /// The result of integer arithmetic does not fit in 64 bits.
    Overflow,

    /// `cast_int` was given text that isn't an integer.
    Cast,

    /// `read` was called after the input was exhausted.
    Read,

    /// The output sink or input source failed.
    Io
}


impl Display for ErrorKind
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        let name = match self
            {
                ErrorKind::Syntax         => "syntax error",
                ErrorKind::UnknownOpcode  => "unknown opcode",
                ErrorKind::StackUnderflow => "stack underflow",
                ErrorKind::TypeOperation  => "type error",
                ErrorKind::DivisionByZero => "division by zero",
                ErrorKind::Overflow       => "integer overflow",
                ErrorKind::Cast           => "cast error",
                ErrorKind::Read           => "read error",
                ErrorKind::Io             => "I/O error"
            };

        write!(f, "{}", name)
    }
}



/// Any error raised while compiling or running a program.
#[derive(Clone, PartialEq, Eq)]
pub struct ScriptError
{
    /// What went wrong, in machine readable form.
    kind: ErrorKind,

    /// The location in the source code the error occurred, if available.
    location: Option<SourceLocation>,

    /// The description of the error.
    error: String
}


impl Error for ScriptError
{
}


/// When returned from main, convert the error result to an operating system exit code.
impl Termination for ScriptError
{
    /// Because this type represents an error, the exit code is always FAILURE.
    fn report(self) -> ExitCode
    {
        eprintln!("Error: {}", self);
        ExitCode::FAILURE
    }
}


impl Display for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{}: {}: {}", location, self.kind, self.error),
            None => write!(f, "{}: {}", self.kind, self.error)
        }
    }
}


impl Debug for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{}", self)
    }
}


impl ScriptError
{
    pub fn new(kind: ErrorKind,
               location: Option<SourceLocation>,
               error: String) -> ScriptError
    {
        ScriptError
            {
                kind,
                location,
                error
            }
    }

    /// Create a new ScriptError and wrap it in a Result::Err.
    pub fn new_as_result<T>(kind: ErrorKind,
                            location: Option<SourceLocation>,
                            error: String) -> Result<T>
    {
        Err(ScriptError::new(kind, location, error))
    }

    pub fn kind(&self) -> ErrorKind
    {
        self.kind
    }

    /// If available, the location in the source code the error occurred.
    pub fn location(&self) -> &Option<SourceLocation>
    {
        &self.location
    }

    /// The description of the error.
    pub fn error(&self) -> &String
    {
        &self.error
    }
}


/// Failures of the output sink or the input source.
impl From<std::io::Error> for ScriptError
{
    fn from(error: std::io::Error) -> ScriptError
    {
        ScriptError::new(ErrorKind::Io, None, format!("{}", error))
    }
}



/// Create a ScriptError wrapped in a Result::Err, stamped with the location of the opcode the
/// machine is currently executing.
pub fn script_error<T>(machine: &dyn Machine, kind: ErrorKind, message: String) -> Result<T>
{
    let location = machine.current_location().clone();

    ScriptError::new_as_result(kind, location, message)
}



pub fn script_error_str<T>(machine: &dyn Machine, kind: ErrorKind, message: &str) -> Result<T>
{
    script_error(machine, kind, message.to_string())
}
