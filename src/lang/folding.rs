use crate::{
    lang::code::{ByteCode, Instruction, Opcode},
    runtime::{
        data_structures::value::Value,
        error::{self, ErrorKind, ScriptError},
        interpreter::{MachineStack, stack_machine::StackMachine},
    },
};
use std::io::{empty, sink};
use tracing::debug;

/// The operations a literal, literal, operation triple can be folded through.
pub const FOLDABLE_OPERATIONS: [&str; 5] = ["+", "-", "*", "/", "%"];

/// Is this window exactly `integer integer arithmetic-symbol`?
fn is_foldable_triple(window: &[Instruction]) -> bool {
    match (&window[0].op, &window[1].op, &window[2].op) {
        (Opcode::IntegerLiteral(_), Opcode::IntegerLiteral(_), Opcode::Symbol(name)) => {
            FOLDABLE_OPERATIONS.contains(&name.as_str())
        }
        _ => false,
    }
}

/// Index of the first foldable triple, scanning from the start of the program.
fn find_foldable(code: &ByteCode) -> Option<usize> {
    code.windows(3).position(is_foldable_triple)
}

/// Run the triple as a program of its own on a throw away machine and take the integer it leaves
/// on top of the stack.
fn evaluate_triple(window: &[Instruction]) -> error::Result<i64> {
    let mut machine = StackMachine::with_io(window.to_vec(), empty(), sink());

    machine.run()?;

    match machine.stack().last() {
        Some(Value::Int(value)) => Ok(*value),
        other => ScriptError::new_as_result(
            ErrorKind::TypeOperation,
            window[2].location.clone(),
            format!(
                "Folding '{} {} {}' did not produce an int, found {:?}.",
                window[0].op, window[1].op, window[2].op, other
            ),
        ),
    }
}

/// Pre-evaluate literal arithmetic.
///
/// Repeatedly finds the first `integer integer operation` triple, evaluates it on a disposable
/// machine, and replaces the three instructions with a single literal holding the result.  The scan
/// restarts from the beginning after every fold and stops once a full scan finds nothing, every
/// fold shortens the program by two so this always terminates.  The language has no precedence,
/// so collapsing an adjacent, self contained triple never changes what the rest of the program
/// sees.
///
/// Any error raised while evaluating a triple is returned as-is and no folded program is produced.
pub fn fold(mut code: ByteCode) -> error::Result<ByteCode> {
    let original_length = code.len();
    let mut folds = 0;

    while let Some(index) = find_foldable(&code) {
        let value = evaluate_triple(&code[index..index + 3])?;
        let location = code[index].location.clone();

        debug!(
            index,
            "Folded {} {} {} into {}.",
            code[index].op,
            code[index + 1].op,
            code[index + 2].op,
            value
        );

        code[index] = Instruction::new(location, Opcode::IntegerLiteral(value));
        code.drain(index + 1..index + 3);

        folds += 1;
    }

    if folds > 0 {
        debug!(folds, original_length, length = code.len(), "Constant folding finished.");
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lang::{
            code::{code_from_opcodes, opcodes_of},
            tokenizing::tokenize_from_source,
        },
        runtime::interpreter::ValueStack,
    };

    fn folded(source: &str) -> Vec<Opcode> {
        let code = tokenize_from_source("<test>", source).unwrap();
        opcodes_of(&fold(code).unwrap())
    }

    fn run(code: ByteCode) -> Result<ValueStack, ErrorKind> {
        let mut machine = StackMachine::with_io(code, empty(), sink());

        match machine.run() {
            Ok(_) => Ok(machine.stack().clone()),
            Err(error) => Err(error.kind()),
        }
    }

    #[test]
    fn simple_triple() {
        assert_eq!(folded("2 3 +"), vec![Opcode::IntegerLiteral(5)]);
        assert_eq!(folded("7 2 -"), vec![Opcode::IntegerLiteral(5)]);
    }

    #[test]
    fn chains_fold_to_a_fixpoint() {
        assert_eq!(folded("2 3 + 4 *"), vec![Opcode::IntegerLiteral(20)]);
        assert_eq!(folded("1 2 3 + +"), vec![Opcode::IntegerLiteral(6)]);
        assert_eq!(folded("10 3 / 4 %"), vec![Opcode::IntegerLiteral(3)]);
    }

    #[test]
    fn surrounding_code_is_kept() {
        assert_eq!(
            folded("\"sum: \" print 2 3 + println"),
            vec![
                Opcode::StringLiteral("sum: ".to_string()),
                Opcode::symbol("print"),
                Opcode::IntegerLiteral(5),
                Opcode::symbol("println"),
            ]
        );
    }

    #[test]
    fn only_exact_triples_qualify() {
        let untouched = |source: &str| {
            let code = tokenize_from_source("<test>", source).unwrap();
            assert_eq!(folded(source), opcodes_of(&code), "{} should not fold", source);
        };

        untouched("1 2 3");
        untouched("1 2 ==");
        untouched("1 2 over");
        untouched("\"a\" \"b\" +");
        untouched("1 \"b\" +");
        untouched("read 2 +");
        untouched("+ 1 2");
    }

    #[test]
    fn folded_literal_keeps_first_location() {
        let code = tokenize_from_source("<test>", "dup 40 2 +").unwrap();
        let folded = fold(code).unwrap();

        assert_eq!(folded.len(), 2);
        assert_eq!(folded[1].op, Opcode::IntegerLiteral(42));
        assert_eq!(folded[1].location.as_ref().unwrap().column(), 5);
    }

    #[test]
    fn evaluation_errors_propagate() {
        let code = tokenize_from_source("<test>", "1 print 5 0 /").unwrap();
        let error = fold(code).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::DivisionByZero);
        assert_eq!(error.location().as_ref().unwrap().column(), 13);

        let code = tokenize_from_source("<test>", "9223372036854775807 1 +").unwrap();
        assert_eq!(fold(code).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn each_fold_shortens_by_two() {
        let code = tokenize_from_source("<test>", "1 1 + 1 + 1 + 1 + 1 +").unwrap();

        assert_eq!(code.len(), 11);
        assert_eq!(opcodes_of(&fold(code).unwrap()), vec![Opcode::IntegerLiteral(6)]);
    }

    /// Small deterministic generator so the equivalence check covers more shapes than the hand
    /// written cases.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: u64) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (self.0 >> 33) % bound
        }
    }

    #[test]
    fn folding_is_equivalent_to_unfolded_execution() {
        let mut random = Lcg(0x5eed);

        for _ in 0..500 {
            let length = 1 + random.next(12) as usize;
            let mut opcodes = Vec::with_capacity(length);

            for _ in 0..length {
                if random.next(5) < 3 {
                    opcodes.push(Opcode::IntegerLiteral(random.next(21) as i64 - 10));
                } else {
                    let name = FOLDABLE_OPERATIONS[random.next(5) as usize];
                    opcodes.push(Opcode::symbol(name));
                }
            }

            let code = code_from_opcodes(opcodes.clone());
            let unfolded = run(code.clone());

            match fold(code) {
                Ok(folded) => {
                    assert!(folded.len() <= opcodes.len());
                    assert_eq!(run(folded), unfolded, "program {:?}", opcodes);
                }
                // The failing triple is reached by the unfolded run too, unless something before
                // it already failed.
                Err(_) => assert!(unfolded.is_err(), "program {:?}", opcodes),
            }
        }
    }
}
