use std::fmt::{ self,
                Display,
                Formatter };



/// The only runtime datum.  Every operand stack slot holds one of these by value.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Value
{
    /// A 64-bit signed integer.
    Int(i64),

    /// A boolean, produced by comparisons.
    Bool(bool),

    /// An immutable piece of text.
    String(String)
}


/// Convert an arbitrary data type to a Value.
pub trait ToValue
{
    fn to_value(&self) -> Value;
}


/// The textual form written by `print` and `println`.
impl Display for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Value::Int(value)    => write!(f, "{}", value),
            Value::Bool(value)   => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value)
        }
    }
}


/// Define implementations for converting between Values and the raw data types they represent.
macro_rules! value_conversion
{
    ($data_type:ty , $variant:ident) =>
    {
        #[doc = concat!("Allow conversion from ", stringify!($data_type), " to a Value.")]
        impl ToValue for $data_type
        {
            fn to_value(&self) -> Value
            {
                Value::$variant(self.clone())
            }
        }


        #[doc = concat!("Support converting from a ", stringify!($data_type), " to a Value.")]
        impl From<$data_type> for Value
        {
            fn from(original: $data_type) -> Value
            {
                Value::$variant(original)
            }
        }
    };
}


value_conversion!(i64,    Int);
value_conversion!(bool,   Bool);
value_conversion!(String, String);


impl From<&str> for Value
{
    fn from(original: &str) -> Value
    {
        Value::String(original.to_string())
    }
}


impl Value
{
    pub fn is_int(&self) -> bool
    {
        matches!(self, Value::Int(_))
    }

    /// The name of the value's kind, as used in error messages and stack dumps.
    pub fn kind_name(&self) -> &'static str
    {
        match self
        {
            Value::Int(_)    => "int",
            Value::Bool(_)   => "bool",
            Value::String(_) => "string"
        }
    }

    /// Truthiness as seen by `if`.  Zero and the empty string are false.
    pub fn is_truthy(&self) -> bool
    {
        match self
        {
            Value::Int(value)    => *value != 0,
            Value::Bool(value)   => *value,
            Value::String(value) => !value.is_empty()
        }
    }

    /// Enclose the text in double quotes, mainly for stack dumps and opcode listings.
    pub fn stringify(text: &str) -> String
    {
        let mut result = String::with_capacity(text.len() + 2);

        result.push('"');
        result.push_str(text);
        result.push('"');

        result
    }

    /// The form a value takes in a stack dump.  Strings are quoted so that whitespace and empty
    /// strings remain visible.
    pub fn debug_text(&self) -> String
    {
        match self
        {
            Value::String(value) => Value::stringify(value),
            _                    => self.to_string()
        }
    }
}
