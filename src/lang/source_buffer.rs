use core::str::Chars;
use std::fmt::{ self,
                Display,
                Formatter };



/// Where in a piece of source text an opcode or an error came from.  Read-only once created, the
/// fields are reached through the accessor methods.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation
{
    /// The file path, or a tag such as "\<repl\>" for text that did not come from a file.
    path: String,

    /// 1 based line number.
    line: usize,

    /// 1 based column number.
    column: usize
}


impl Default for SourceLocation
{
    fn default() -> Self
    {
        Self::new()
    }
}


/// Used when reporting errors to the user.
impl Display for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result
    {
        write!(formatter, "{} ({}, {})", self.path, self.line, self.column)
    }
}


/// Locations print the same way in debug output, this keeps the opcode dumps readable.
impl fmt::Debug for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result
    {
        write!(formatter, "{}", self)
    }
}


impl SourceLocation
{
    /// A location that doesn't point anywhere in particular.
    pub fn new() -> SourceLocation
    {
        SourceLocation { path: "unspecified".to_string(), line: 1, column: 1 }
    }

    /// The start of the given source.
    pub fn new_from_path(path: &str) -> Self
    {
        SourceLocation { path: path.to_owned(), line: 1, column: 1 }
    }

    /// Fully specified location.
    pub fn new_from_info(path: &str, line: usize, column: usize) -> Self
    {
        SourceLocation { path: path.to_owned(), line, column }
    }

    pub fn path(&self) -> &String
    {
        &self.path
    }

    pub fn line(&self) -> usize
    {
        self.line
    }

    pub fn column(&self) -> usize
    {
        self.column
    }
}



/// A forward only cursor over source text.  The tokenizer pulls characters from here one at a time
/// while the buffer keeps the line and column of the cursor up to date.
///
/// Only a reference to the text is held, so the text must outlive the buffer.
pub struct SourceBuffer<'a>
{
    chars: Chars<'a>,

    /// Location of the next character to be consumed.
    location: SourceLocation,

    /// A character that has been peeked at but not yet consumed.
    current: Option<char>
}


impl<'a> SourceBuffer<'a>
{
    pub fn new(path: &str, source: &'a str) -> Self
    {
        SourceBuffer
            {
                chars: source.chars(),
                location: SourceLocation::new_from_path(path),
                current: None
            }
    }

    /// The location of the next character in the buffer.
    pub fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    /// Look at the next character without consuming it.
    pub fn peek_next(&mut self) -> Option<char>
    {
        if self.current.is_none()
        {
            self.current = self.chars.next();
        }

        self.current
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Option<char>
    {
        let next = match self.current.take()
            {
                Some(next) => Some(next),
                None       => self.chars.next()
            };

        if let Some(next_char) = next
        {
            self.increment_location(next_char);
        }

        next
    }

    /// Consume characters for as long as the predicate holds, returning them as a string.
    pub fn take_while<F>(&mut self, predicate: F) -> String
        where
            F: Fn(char) -> bool
    {
        let mut text = String::new();

        while let Some(next) = self.peek_next()
        {
            if !predicate(next)
            {
                break;
            }

            text.push(next);
            let _ = self.next_char();
        }

        text
    }

    /// A new line resets the column and moves to the next line, everything else advances the
    /// column by one.
    fn increment_location(&mut self, next: char)
    {
        if next == '\n'
        {
            self.location.line += 1;
            self.location.column = 1;
        }
        else
        {
            self.location.column += 1;
        }
    }
}
