use crate::{
    add_native_operation,
    runtime::{
        data_structures::{
            dictionary::Dictionary,
            value::{ToValue, Value},
        },
        error::{self, script_error, ErrorKind},
        interpreter::Machine,
    },
};

/// Report operands whose kinds the operation can't combine.
fn incompatible_operands(
    machine: &mut dyn Machine,
    name: &str,
    a: &Value,
    b: &Value,
) -> error::Result<()> {
    script_error(
        machine,
        ErrorKind::TypeOperation,
        format!(
            "Can not apply '{}' to {} {} and {} {}.",
            name,
            a.kind_name(),
            a.debug_text(),
            b.kind_name(),
            b.debug_text()
        ),
    )
}

fn overflow(machine: &mut dyn Machine, name: &str, a: i64, b: i64) -> error::Result<()> {
    script_error(
        machine,
        ErrorKind::Overflow,
        format!("Result of {} {} {} does not fit in 64 bits.", a, b, name),
    )
}

/// Helper for the integer only operations.  The stack handling and the kind checks happen here, the
/// operation itself returns None when its result overflows.
fn integer_op(
    machine: &mut dyn Machine,
    name: &str,
    iop: fn(i64, i64) -> Option<i64>,
) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => match iop(*x, *y) {
            Some(result) => {
                machine.push(result.to_value());
                Ok(())
            }
            None => overflow(machine, name, *x, *y),
        },

        _ => incompatible_operands(machine, name, &a, &b),
    }
}

/// Helper for `/` and `%`, which refuse a zero right hand operand before doing anything else.
fn division_op(
    machine: &mut dyn Machine,
    name: &str,
    iop: fn(i64, i64) -> Option<i64>,
) -> error::Result<()> {
    let stack = machine.stack();
    let depth = stack.len();
    let zero_divisor =
        depth >= 2 && stack[depth - 2].is_int() && stack[depth - 1] == Value::Int(0);

    if zero_divisor {
        return script_error(
            machine,
            ErrorKind::DivisionByZero,
            format!("Right hand operand of '{}' is zero.", name),
        );
    }

    integer_op(machine, name, iop)
}

/// Integer division rounding toward negative infinity.
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;

    if a % b != 0 && ((a < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Remainder matching `floor_div`, it takes the sign of the divisor.
pub fn floor_mod(a: i64, b: i64) -> Option<i64> {
    if b == -1 {
        return Some(0);
    }

    let remainder = a.checked_rem(b)?;

    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        Some(remainder + b)
    } else {
        Some(remainder)
    }
}

/// Add two integers, or concatenate two strings.
///
/// Signature: `a b -- a+b`
fn word_add(machine: &mut dyn Machine) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    match (a, b) {
        (Value::Int(x), Value::Int(y)) => match x.checked_add(y) {
            Some(sum) => {
                machine.push(sum.to_value());
                Ok(())
            }
            None => overflow(machine, "+", x, y),
        },

        (Value::String(x), Value::String(y)) => {
            machine.push(Value::String(x + &y));
            Ok(())
        }

        (a, b) => incompatible_operands(machine, "+", &a, &b),
    }
}

/// Signature: `a b -- a-b`
fn word_subtract(machine: &mut dyn Machine) -> error::Result<()> {
    integer_op(machine, "-", i64::checked_sub)
}

/// Signature: `a b -- a*b`
fn word_multiply(machine: &mut dyn Machine) -> error::Result<()> {
    integer_op(machine, "*", i64::checked_mul)
}

/// Signature: `a b -- a/b`
fn word_divide(machine: &mut dyn Machine) -> error::Result<()> {
    division_op(machine, "/", floor_div)
}

/// Signature: `a b -- a%b`
fn word_modulo(machine: &mut dyn Machine) -> error::Result<()> {
    division_op(machine, "%", floor_mod)
}

/// Structural equality.  Values of different kinds are never equal.
///
/// Signature: `a b -- bool`
fn word_equal(machine: &mut dyn Machine) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push(Value::Bool(a == b));
    Ok(())
}

/// Register the arithmetic and comparison operations.
pub fn register_arithmetic_words(dictionary: &mut Dictionary) {
    add_native_operation!(
        dictionary,
        "+",
        word_add,
        "Add two integers or concatenate two strings.",
        "a b -- result"
    );

    add_native_operation!(
        dictionary,
        "-",
        word_subtract,
        "Subtract the top integer from the one below it.",
        "a b -- difference"
    );

    add_native_operation!(
        dictionary,
        "*",
        word_multiply,
        "Multiply two integers.",
        "a b -- product"
    );

    add_native_operation!(
        dictionary,
        "/",
        word_divide,
        "Divide a by b, rounding toward negative infinity.",
        "a b -- quotient"
    );

    add_native_operation!(
        dictionary,
        "%",
        word_modulo,
        "Remainder of a divided by b, with the sign of b.",
        "a b -- remainder"
    );

    add_native_operation!(
        dictionary,
        "==",
        word_equal,
        "Are the two values the same kind and equal?",
        "a b -- bool"
    );
}
