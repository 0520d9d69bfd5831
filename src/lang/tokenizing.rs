use crate::{
    lang::{
        code::{ByteCode, Instruction, Opcode},
        source_buffer::{SourceBuffer, SourceLocation},
    },
    runtime::error::{self, ErrorKind, ScriptError},
};
use std::fs::read_to_string;

/// Characters that can make up an operator symbol such as `+` or `==`.
const OPERATOR_CHARACTERS: &str = "+-*/%=<>!";

/// Check if the given character is considered whitespace.
fn is_whitespace(next: &char) -> bool {
    *next == ' ' || *next == '\t' || *next == '\r' || *next == '\n'
}

/// Characters that end a bare token even without whitespace.
fn is_delimiter(next: &char) -> bool {
    is_whitespace(next) || *next == '"' || *next == '#'
}

/// Skip whitespace and `#` comments, stopping at the end of the buffer or the first character of
/// the next token.
fn skip_insignificant(buffer: &mut SourceBuffer) {
    while let Some(next) = buffer.peek_next() {
        if is_whitespace(&next) {
            let _ = buffer.next_char();
        } else if next == '#' {
            let _ = buffer.take_while(|c| c != '\n');
        } else {
            break;
        }
    }
}

fn syntax_error<T>(location: &SourceLocation, category: &str, text: &str) -> error::Result<T> {
    ScriptError::new_as_result(
        ErrorKind::Syntax,
        Some(location.clone()),
        format!("{} '{}'.", category, text),
    )
}

/// Process a string literal.  Everything up to the closing quote is taken verbatim, there are no
/// escape sequences.  The literal has to close on the line it was opened on.
fn process_string(location: &SourceLocation, buffer: &mut SourceBuffer) -> error::Result<String> {
    let next = buffer.next_char();
    assert!(next == Some('"'));

    let text = buffer.take_while(|c| c != '"' && c != '\n');

    match buffer.next_char() {
        Some('"') => Ok(text),
        _ => syntax_error(location, "Unterminated string literal", &format!("\"{}", text)),
    }
}

/// Does it look like the start of a numeric literal?  A leading digit, or a minus sign directly
/// followed by one.
fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);

    digits.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Convert the text to an integer.  `_` is accepted as a separator for readability.
fn to_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);

    if !digits.chars().all(|c| c.is_ascii_digit() || c == '_') {
        return None;
    }

    text.replace('_', "").parse().ok()
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        }
        _ => false,
    }
}

fn is_operator(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| OPERATOR_CHARACTERS.contains(c))
}

/// Decide what a bare, whitespace delimited, chunk of text is.
fn classify_bare(location: &SourceLocation, text: String) -> error::Result<Opcode> {
    if looks_numeric(&text) {
        match to_integer(&text) {
            Some(number) => Ok(Opcode::IntegerLiteral(number)),
            None => syntax_error(location, "Malformed numeric literal", &text),
        }
    } else if is_identifier(&text) || is_operator(&text) {
        Ok(Opcode::Symbol(text))
    } else {
        syntax_error(location, "Unsupported punctuation", &text)
    }
}

/// A lazy scan of source text into instructions.  Each call to `next` reads exactly one token.  The
/// sequence ends normally at the end of the text, or after the first syntax error is yielded.
pub struct Tokenizer<'a> {
    buffer: SourceBuffer<'a>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(path: &str, source: &'a str) -> Self {
        Tokenizer {
            buffer: SourceBuffer::new(path, source),
            failed: false,
        }
    }

    fn next_opcode(&mut self, location: &SourceLocation, next: char) -> error::Result<Opcode> {
        if next == '"' {
            let text = process_string(location, &mut self.buffer)?;
            Ok(Opcode::StringLiteral(text))
        } else {
            let text = self.buffer.take_while(|c| !is_delimiter(&c));
            classify_bare(location, text)
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = error::Result<Instruction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        skip_insignificant(&mut self.buffer);

        let next = self.buffer.peek_next()?;
        let location = self.buffer.location().clone();

        match self.next_opcode(&location, next) {
            Ok(op) => Some(Ok(Instruction::new(Some(location), op))),
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

/// Start a lazy scan of the source code.  The path is only used for locations in error reports.
pub fn tokenize<'a>(path: &str, source: &'a str) -> Tokenizer<'a> {
    Tokenizer::new(path, source)
}

/// Tokenize the source code from a string, stopping at the first syntax error.
pub fn tokenize_from_source(path: &str, source: &str) -> error::Result<ByteCode> {
    tokenize(path, source).collect()
}

/// Load the code from a file and then tokenize it.
pub fn tokenize_from_file(path: &str) -> error::Result<ByteCode> {
    match read_to_string(path) {
        Ok(source) => tokenize_from_source(path, &source),
        Err(error) => ScriptError::new_as_result(
            ErrorKind::Io,
            None,
            format!("Could not read file {}: {}", path, error),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::code::opcodes_of;

    fn ops(source: &str) -> Vec<Opcode> {
        opcodes_of(&tokenize_from_source("<test>", source).unwrap())
    }

    fn failure(source: &str) -> ScriptError {
        tokenize_from_source("<test>", source).unwrap_err()
    }

    #[test]
    fn integers_strings_and_symbols() {
        assert_eq!(
            ops("2 3 + \"hello\" println"),
            vec![
                Opcode::IntegerLiteral(2),
                Opcode::IntegerLiteral(3),
                Opcode::symbol("+"),
                Opcode::StringLiteral("hello".to_string()),
                Opcode::symbol("println"),
            ]
        );
    }

    #[test]
    fn string_keeps_inner_whitespace_and_backslashes() {
        assert_eq!(
            ops("\"Enter a number: \" \"a\\nb\""),
            vec![
                Opcode::StringLiteral("Enter a number: ".to_string()),
                Opcode::StringLiteral("a\\nb".to_string()),
            ]
        );
    }

    #[test]
    fn negative_and_separated_integers() {
        assert_eq!(
            ops("-12 1_000 - --"),
            vec![
                Opcode::IntegerLiteral(-12),
                Opcode::IntegerLiteral(1000),
                Opcode::symbol("-"),
                Opcode::symbol("--"),
            ]
        );
    }

    #[test]
    fn symbols_are_case_preserving() {
        assert_eq!(ops("Dup cast_int =="), vec![
            Opcode::symbol("Dup"),
            Opcode::symbol("cast_int"),
            Opcode::symbol("=="),
        ]);
    }

    #[test]
    fn comments_and_blank_input() {
        assert!(ops("").is_empty());
        assert!(ops("   \n\t # nothing here").is_empty());
        assert_eq!(ops("1 # one\n2"), vec![Opcode::IntegerLiteral(1), Opcode::IntegerLiteral(2)]);
    }

    #[test]
    fn string_directly_after_word() {
        assert_eq!(
            ops("print\"x\""),
            vec![Opcode::symbol("print"), Opcode::StringLiteral("x".to_string())]
        );
    }

    #[test]
    fn locations_point_at_token_start() {
        let code = tokenize_from_source("<test>", "1\n  dup").unwrap();
        let location = code[1].location.as_ref().unwrap();

        assert_eq!(location.line(), 2);
        assert_eq!(location.column(), 3);
    }

    #[test]
    fn malformed_numbers_are_syntax_errors() {
        let error = failure("12abc");

        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert!(error.error().contains("12abc"));
        assert!(error.error().contains("Malformed numeric literal"));

        assert_eq!(failure("1.5").kind(), ErrorKind::Syntax);
        assert_eq!(failure("99999999999999999999").kind(), ErrorKind::Syntax);
    }

    #[test]
    fn unsupported_punctuation_is_a_syntax_error() {
        let error = failure("1 2 $");

        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert!(error.error().contains("Unsupported punctuation '$'"));
        assert_eq!(error.location().as_ref().unwrap().column(), 5);

        assert_eq!(failure("'single'").kind(), ErrorKind::Syntax);
    }

    #[test]
    fn unterminated_strings() {
        assert_eq!(failure("\"open").kind(), ErrorKind::Syntax);
        assert_eq!(failure("\"open\n\"").kind(), ErrorKind::Syntax);
    }

    #[test]
    fn tokenizing_is_lazy_and_stops_after_an_error() {
        let mut tokens = tokenize("<test>", "1 $ 2");

        assert!(matches!(tokens.next(), Some(Ok(_))));
        assert!(matches!(tokens.next(), Some(Err(_))));
        assert!(tokens.next().is_none());
    }

    #[test]
    fn fresh_scans_start_over() {
        let source = "4 5 *";

        assert_eq!(tokenize("<test>", source).count(), 3);
        assert_eq!(tokenize("<test>", source).count(), 3);
    }
}
