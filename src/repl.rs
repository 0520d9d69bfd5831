//! The interactive read loop.
//!
//! Every line is compiled and run as a program of its own on a fresh machine, the stack does not
//! carry over between lines.  Errors are reported and the loop carries on, `exit` or the end of the
//! input ends it.
//!
//! # Commands
//!
//! - `:quit`, `:q` - Leave the loop
//! - `:help`, `:h` - Show help
//! - `:words`, `:w` - List the built-in operations

use std::io::{ self, stderr, stdin, stdout, BufRead, Write };
use tracing::{ debug, warn };

use crate::{ lang::{ code::ByteCode,
                     compilation::compile_unfolded,
                     folding::fold },
             runtime::{ built_ins::BUILTIN_OPERATIONS,
                        error,
                        interpreter::{ Halt,
                                       stack_machine::StackMachine } } };



/// The path used for source locations of code typed into the loop.
pub const REPL_PATH: &str = "<repl>";


/// Settings for the read loop.
#[derive(Debug, Clone)]
pub struct ReplConfig
{
    /// Written before every line is read.
    pub prompt: String,

    /// Fold constant arithmetic before running each line.
    pub fold: bool
}


impl Default for ReplConfig
{
    fn default() -> Self
    {
        ReplConfig
            {
                prompt: "> ".to_string(),
                fold: true
            }
    }
}


/// Fold a program, falling back to the program as written if folding fails.  A failing triple will
/// fail again when the unfolded program reaches it, after the same side effects it would have had
/// without folding.
pub fn fold_or_fallback(code: ByteCode) -> ByteCode
{
    match fold(code.clone())
    {
        Ok(folded) => folded,
        Err(error) =>
            {
                warn!(%error, "Constant folding failed, running the program unfolded.");
                code
            }
    }
}


/// The interactive read loop.  Lines of source and the program's own `read` calls both come from
/// the same input.
pub struct Repl<'io>
{
    config: ReplConfig,
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
    errors: Box<dyn Write + 'io>
}


impl Repl<'static>
{
    /// A loop over the process's standard input, output, and error.
    pub fn new(config: ReplConfig) -> Repl<'static>
    {
        Repl::with_io(config, stdin().lock(), stdout(), stderr())
    }
}


impl<'io> Repl<'io>
{
    pub fn with_io(config: ReplConfig,
                   input: impl BufRead + 'io,
                   output: impl Write + 'io,
                   errors: impl Write + 'io) -> Repl<'io>
    {
        Repl
            {
                config,
                input: Box::new(input),
                output: Box::new(output),
                errors: Box::new(errors)
            }
    }

    /// Run until the input is exhausted, `:quit` is entered, or a program executes `exit`.
    ///
    /// Program errors are reported and the loop continues.  Only failures of the loop's own input
    /// or output end it with an error.
    pub fn run(&mut self) -> error::Result<Halt>
    {
        let mut line = String::new();

        loop
        {
            write!(self.output, "{}", self.config.prompt)?;
            self.output.flush()?;

            line.clear();

            if self.input.read_line(&mut line)? == 0
            {
                debug!("End of input, leaving the loop.");
                return Ok(Halt::Completed);
            }

            let source = line.trim();

            if source.is_empty()
            {
                continue;
            }

            if source.starts_with(':')
            {
                if self.handle_command(source)?
                {
                    return Ok(Halt::Exited);
                }

                continue;
            }

            match self.evaluate(source)
            {
                Ok(Halt::Exited)   => return Ok(Halt::Exited),
                Ok(Halt::Completed) => (),
                Err(error)         => writeln!(self.errors, "Error: {}", error)?
            }
        }
    }

    /// Compile and run one line of source.
    pub fn evaluate(&mut self, source: &str) -> error::Result<Halt>
    {
        let code = compile_unfolded(REPL_PATH, source)?;
        let code = if self.config.fold { fold_or_fallback(code) } else { code };

        let mut machine = StackMachine::with_io(code, &mut *self.input, &mut *self.output);

        machine.run()
    }

    /// Handle a `:` command, returning true if the loop should end.
    fn handle_command(&mut self, command: &str) -> io::Result<bool>
    {
        match command
        {
            ":quit" | ":q" => return Ok(true),

            ":help" | ":h" =>
                {
                    writeln!(self.output, "Enter a program on one line, for example: 2 3 + println")?;
                    writeln!(self.output, "  :words, :w   List the built-in operations.")?;
                    writeln!(self.output, "  :help, :h    Show this help.")?;
                    writeln!(self.output, "  :quit, :q    Leave.")?;
                },

            ":words" | ":w" => write!(self.output, "{}", *BUILTIN_OPERATIONS)?,

            _ => writeln!(self.errors, "Unknown command {}, try :help.", command)?
        }

        Ok(false)
    }
}



#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{ lang::code::{ code_from_opcodes, opcodes_of, Opcode } };

    fn session(config: ReplConfig, input: &str) -> ( Halt, String, String )
    {
        let mut output = Vec::new();
        let mut errors = Vec::new();

        let halt = Repl::with_io(config, input.as_bytes(), &mut output, &mut errors)
            .run()
            .unwrap();

        ( halt, String::from_utf8(output).unwrap(), String::from_utf8(errors).unwrap() )
    }

    fn quiet() -> ReplConfig
    {
        ReplConfig { prompt: String::new(), ..ReplConfig::default() }
    }

    #[test]
    fn prints_a_sum()
    {
        let ( halt, output, errors ) = session(quiet(), "2 3 + println\n");

        assert_eq!(halt, Halt::Completed);
        assert_eq!(output, "5\n");
        assert!(errors.is_empty());
    }

    #[test]
    fn prompt_is_written_before_each_line()
    {
        let ( _, output, _ ) = session(ReplConfig::default(), "1 println\n");

        assert_eq!(output, "> 1\n> ");
    }

    #[test]
    fn errors_are_reported_and_the_loop_continues()
    {
        let ( halt, output, errors ) = session(quiet(), "+\nfoo\n\"ok\" println\n");

        assert_eq!(halt, Halt::Completed);
        assert_eq!(output, "ok\n");
        assert!(errors.contains("stack underflow"));
        assert!(errors.contains("Unknown opcode 'foo'"));
    }

    #[test]
    fn stack_does_not_carry_between_lines()
    {
        let ( _, _, errors ) = session(quiet(), "5\nprintln\n");

        assert!(errors.contains("stack underflow"));
    }

    #[test]
    fn exit_ends_the_loop()
    {
        let ( halt, output, _ ) = session(quiet(), "\"bye\" println exit\n\"never\" println\n");

        assert_eq!(halt, Halt::Exited);
        assert_eq!(output, "bye\n");
    }

    #[test]
    fn programs_read_from_the_same_input()
    {
        let ( _, output, _ ) = session(quiet(), "read cast_int 1 + println\n41\n");

        assert_eq!(output, "42\n");
    }

    #[test]
    fn fold_failures_fall_back_to_unfolded_execution()
    {
        let ( halt, output, errors ) = session(quiet(), "\"before\" println 5 0 /\n");

        assert_eq!(halt, Halt::Completed);
        assert_eq!(output, "before\n");
        assert!(errors.contains("division by zero"));
    }

    #[test]
    fn fold_or_fallback_keeps_the_original_on_failure()
    {
        let code = code_from_opcodes(vec![ Opcode::IntegerLiteral(1),
                                           Opcode::IntegerLiteral(0),
                                           Opcode::from("%") ]);

        assert_eq!(opcodes_of(&fold_or_fallback(code.clone())), opcodes_of(&code));
    }

    #[test]
    fn commands()
    {
        let ( halt, output, errors ) = session(quiet(), ":words\n:bogus\n:q\n1 println\n");

        assert_eq!(halt, Halt::Exited);
        assert!(output.contains("15 operations defined."));
        assert!(output.contains("cast_int"));
        assert!(errors.contains("Unknown command :bogus"));
    }
}
