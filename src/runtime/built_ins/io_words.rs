use crate::{
    add_native_operation,
    runtime::{
        data_structures::{dictionary::Dictionary, value::ToValue},
        error::{self, script_error_str, ErrorKind},
        interpreter::Machine,
    },
};

/// Write a value's textual form to the output without a trailing newline.
///
/// Signature: `value -- `
fn word_print(machine: &mut dyn Machine) -> error::Result<()> {
    let value = machine.pop()?;

    machine.write_text(&value.to_string())
}

/// Write a value's textual form to the output followed by a newline.
///
/// Signature: `value -- `
fn word_println(machine: &mut dyn Machine) -> error::Result<()> {
    let value = machine.pop()?;

    machine.write_text(&format!("{}\n", value))
}

/// Read a line of text from the input.  It's an error to read once the input is exhausted.
///
/// Signature: ` -- string`
fn word_read(machine: &mut dyn Machine) -> error::Result<()> {
    match machine.read_line()? {
        Some(line) => {
            machine.push(line.to_value());
            Ok(())
        }
        None => script_error_str(machine, ErrorKind::Read, "Input is exhausted."),
    }
}

/// Print out the current stack, top first, without changing it.
///
/// Signature: ` -- `
fn word_print_stack(machine: &mut dyn Machine) -> error::Result<()> {
    let mut text = format!("Depth: {}\n", machine.stack().len());

    for value in machine.stack().iter().rev() {
        text += &format!("  {} {}\n", value.kind_name(), value.debug_text());
    }

    machine.write_text(&text)
}

/// Register the operations that read from the input or write to the output.
pub fn register_io_words(dictionary: &mut Dictionary) {
    add_native_operation!(
        dictionary,
        "print",
        word_print,
        "Write a value to the output.",
        "value -- "
    );

    add_native_operation!(
        dictionary,
        "println",
        word_println,
        "Write a value to the output followed by a new line.",
        "value -- "
    );

    add_native_operation!(
        dictionary,
        "read",
        word_read,
        "Read a line of text from the input.",
        " -- string"
    );

    add_native_operation!(
        dictionary,
        "stack",
        word_print_stack,
        "Write the stack, top first, to the output without changing it.",
        " -- "
    );
}
