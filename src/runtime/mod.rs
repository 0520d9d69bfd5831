/// The core data structures used by the machine.
pub mod data_structures;

/// Module for defining the built-in operations available to programs.
pub mod built_ins;

/// Module for defining the error reporting of the compiler and the machine.
pub mod error;

/// Module for defining the machine that executes compiled programs.
pub mod interpreter;
