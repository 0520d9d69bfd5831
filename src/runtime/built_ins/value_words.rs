use crate::{
    add_native_operation,
    runtime::{
        data_structures::{dictionary::Dictionary, value::Value},
        error::{self, script_error, ErrorKind},
        interpreter::Machine,
    },
};

/// Convert a value to an integer.  Text is trimmed and then parsed, integers pass through as-is and
/// booleans become 1 or 0.
///
/// Signature: `value -- int`
fn word_cast_int(machine: &mut dyn Machine) -> error::Result<()> {
    let value = machine.pop()?;

    let converted = match &value {
        Value::Int(number) => *number,
        Value::Bool(flag) => i64::from(*flag),
        Value::String(text) => match text.trim().parse::<i64>() {
            Ok(number) => number,
            Err(_) => {
                return script_error(
                    machine,
                    ErrorKind::Cast,
                    format!("Can not convert {} to an int.", value.debug_text()),
                );
            }
        },
    };

    machine.push(Value::Int(converted));
    Ok(())
}

/// Register the operations that convert between value kinds.
pub fn register_value_words(dictionary: &mut Dictionary) {
    add_native_operation!(
        dictionary,
        "cast_int",
        word_cast_int,
        "Convert a value to an integer.",
        "value -- int"
    );
}
