/// Module contains the Value enumeration, the only kind of data a program can manipulate.
pub mod value;

/// The dictionary module provides the operation table the machine dispatches symbols through.
pub mod dictionary;
