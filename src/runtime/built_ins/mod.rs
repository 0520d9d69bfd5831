/// Arithmetic and comparison operations.
pub mod arithmetic_words;

/// Operations that shuffle or select values on the stack.
pub mod stack_words;

/// Operations that convert between value kinds.
pub mod value_words;

/// Operations that read from the input or write to the output.
pub mod io_words;

/// Operations that control the machine itself.
pub mod machine_words;

use crate::runtime::{
    built_ins::{
        arithmetic_words::register_arithmetic_words, io_words::register_io_words,
        machine_words::register_machine_words, stack_words::register_stack_words,
        value_words::register_value_words,
    },
    data_structures::dictionary::Dictionary,
};
use lazy_static::lazy_static;

lazy_static! {
    /// The dictionary of built-in operations, built once and shared by every machine that doesn't
    /// bring its own.
    pub static ref BUILTIN_OPERATIONS: Dictionary = {
        let mut dictionary = Dictionary::new();

        register_builtin_operations(&mut dictionary);
        dictionary
    };
}

/// Called to register all of the core operations of the language.
pub fn register_builtin_operations(dictionary: &mut Dictionary) {
    register_arithmetic_words(dictionary);
    register_stack_words(dictionary);
    register_value_words(dictionary);
    register_io_words(dictionary);
    register_machine_words(dictionary);
}
