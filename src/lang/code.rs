use crate::{
    lang::source_buffer::SourceLocation,
    runtime::data_structures::value::Value,
};
use std::fmt::{self, Display, Formatter};

/// A single element of a compiled program.  Literals are pushed onto the operand stack as-is,
/// symbols are looked up in the machine's operation dictionary by exact name.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Opcode {
    /// A 64-bit signed integer literal.
    IntegerLiteral(i64),

    /// A string literal, with the surrounding quotes already stripped.
    StringLiteral(String),

    /// The name of an operation to execute.
    Symbol(String),
}

impl Opcode {
    /// Shorthand for building a symbol opcode.
    pub fn symbol(name: &str) -> Opcode {
        Opcode::Symbol(name.to_string())
    }

    /// If the opcode is a literal, the value it pushes.
    pub fn literal_value(&self) -> Option<Value> {
        match self {
            Opcode::IntegerLiteral(value) => Some(Value::Int(*value)),
            Opcode::StringLiteral(text) => Some(Value::String(text.clone())),
            Opcode::Symbol(_) => None,
        }
    }
}

/// Literals print the way they would be written in source, so string literals get their quotes
/// back.
impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Opcode::IntegerLiteral(value) => write!(f, "{}", value),
            Opcode::StringLiteral(text) => write!(f, "{}", Value::stringify(text)),
            Opcode::Symbol(name) => write!(f, "{}", name),
        }
    }
}

impl From<i64> for Opcode {
    fn from(value: i64) -> Opcode {
        Opcode::IntegerLiteral(value)
    }
}

impl From<&str> for Opcode {
    /// Text wrapped in double quotes becomes a string literal, anything else is a symbol.
    fn from(text: &str) -> Opcode {
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            Opcode::StringLiteral(text[1..text.len() - 1].to_string())
        } else {
            Opcode::Symbol(text.to_string())
        }
    }
}

/// One instruction of a program: the opcode and, if it came from source text, where.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Instruction {
    /// Instructions built by hand rather than tokenized have no location.
    pub location: Option<SourceLocation>,

    pub op: Opcode,
}

impl Instruction {
    pub fn new(location: Option<SourceLocation>, op: Opcode) -> Instruction {
        Instruction { location, op }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.op {
            Opcode::IntegerLiteral(_) => write!(f, "PushInteger {}", self.op),
            Opcode::StringLiteral(_) => write!(f, "PushString  {}", self.op),
            Opcode::Symbol(_) => write!(f, "Execute     {}", self.op),
        }
    }
}

/// A compiled program.  Immutable once folding has finished, the machine only ever reads it.
pub type ByteCode = Vec<Instruction>;

/// Build a program from bare opcodes, none of the instructions will carry a location.
pub fn code_from_opcodes<I, T>(opcodes: I) -> ByteCode
where
    I: IntoIterator<Item = T>,
    T: Into<Opcode>,
{
    opcodes
        .into_iter()
        .map(|op| Instruction::new(None, op.into()))
        .collect()
}

/// Strip the locations off of a program, leaving just the opcode stream.
pub fn opcodes_of(code: &ByteCode) -> Vec<Opcode> {
    code.iter().map(|instruction| instruction.op.clone()).collect()
}

/// Pretty print the byte code for debugging purposes.
pub fn pretty_print_code(code: &ByteCode) -> String {
    use std::fmt::Write;

    let mut result = String::with_capacity(code.len() * 20);

    for (index, instruction) in code.iter().enumerate() {
        writeln!(&mut result, "{:4}: {}", index, instruction)
            .expect("Writing to String should never fail.");
    }

    result
}
