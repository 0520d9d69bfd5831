/// Module for managing the original source code.
pub mod source_buffer;

/// Module for turning source code into a stream of instructions.
pub mod tokenizing;

/// Module defining the opcodes and instructions the machine executes.
pub mod code;

/// Module for pre-evaluating literal arithmetic before a program runs.
pub mod folding;

/// Module tying the tokenizer and the folder together into a compiler.
pub mod compilation;
