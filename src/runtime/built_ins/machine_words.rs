use crate::{
    add_native_operation,
    runtime::{data_structures::dictionary::Dictionary, error, interpreter::Machine},
};

/// Stop the program.  The machine reports this to its caller as `Halt::Exited`, it never ends
/// the host process itself.
///
/// Signature: ` -- `
fn word_exit(machine: &mut dyn Machine) -> error::Result<()> {
    machine.request_exit();
    Ok(())
}

/// Register the operations that control the machine itself.
pub fn register_machine_words(dictionary: &mut Dictionary) {
    add_native_operation!(
        dictionary,
        "exit",
        word_exit,
        "Halt the program immediately.",
        " -- "
    );
}
