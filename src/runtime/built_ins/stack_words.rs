use crate::{
    add_native_operation,
    runtime::{data_structures::dictionary::Dictionary, error, interpreter::Machine},
};

/// Duplicate the top value on the stack.
///
/// Signature: `value -- value value`
fn word_dup(machine: &mut dyn Machine) -> error::Result<()> {
    let value = machine.top()?.clone();

    machine.push(value);
    Ok(())
}

/// Copy the second value over the top one.
///
/// Signature: `a b -- a b a`
fn word_over(machine: &mut dyn Machine) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push(a.clone());
    machine.push(b);
    machine.push(a);

    Ok(())
}

/// Select one of two already computed values.  Both clauses were evaluated before `if` runs, this
/// is not a branch.
///
/// Signature: `test true_clause false_clause -- selected`
fn word_if(machine: &mut dyn Machine) -> error::Result<()> {
    let false_clause = machine.pop()?;
    let true_clause = machine.pop()?;
    let test = machine.pop()?;

    if test.is_truthy() {
        machine.push(true_clause);
    } else {
        machine.push(false_clause);
    }

    Ok(())
}

/// Register the stack manipulation operations.
pub fn register_stack_words(dictionary: &mut Dictionary) {
    add_native_operation!(
        dictionary,
        "dup",
        word_dup,
        "Duplicate the top value on the stack.",
        "value -- value value"
    );

    add_native_operation!(
        dictionary,
        "over",
        word_over,
        "Copy the second value on the stack to the top.",
        "a b -- a b a"
    );

    add_native_operation!(
        dictionary,
        "if",
        word_if,
        "Keep the true clause if the test is truthy, otherwise the false clause.",
        "test true_clause false_clause -- selected"
    );
}
