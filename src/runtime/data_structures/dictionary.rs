use crate::{lang::source_buffer::SourceLocation, runtime::interpreter::OperationHandler};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

/// The information stored in the dictionary for each operation.
#[derive(Clone)]
pub struct OperationInfo {
    /// Where in the Rust source the operation was registered from.
    location: SourceLocation,

    name: String,

    handler: OperationHandler,

    /// How many operands the operation consumes, counted from its signature.
    inputs: usize,

    /// A simple description of the operation.
    description: String,

    /// The stack signature of the operation, for example `a b -- sum`.
    signature: String,
}

impl OperationInfo {
    /// The input count is taken from the left hand side of the signature, so `a b -- sum` consumes
    /// two values and ` -- line` consumes none.
    pub fn new(
        location: SourceLocation,
        name: String,
        handler: OperationHandler,
        description: String,
        signature: String,
    ) -> OperationInfo {
        let inputs = signature
            .split("--")
            .next()
            .map(|left| left.split_whitespace().count())
            .unwrap_or(0);

        OperationInfo {
            location,
            name,
            handler,
            inputs,
            description,
            signature,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn handler(&self) -> OperationHandler {
        self.handler
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn description(&self) -> &String {
        &self.description
    }

    pub fn signature(&self) -> &String {
        &self.signature
    }
}

/// The operation table the machine dispatches symbols through.  Keys are matched by exact string
/// equality.
pub struct Dictionary {
    operations: HashMap<String, OperationInfo>,
}

/// List the operations sorted by name, with their signatures and descriptions.
impl Display for Dictionary {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let max_name = self.operations.keys().map(|name| name.len()).max().unwrap_or(0);
        let max_signature = self
            .operations
            .values()
            .map(|info| info.signature().len())
            .max()
            .unwrap_or(0);

        writeln!(formatter, "{} operations defined.\n", self.operations.len())?;

        let mut names: Vec<&String> = self.operations.keys().collect();
        names.sort();

        for name in names {
            let info = &self.operations[name];

            writeln!(
                formatter,
                "{:name_width$}  ( {:signature_width$} )  {}",
                name,
                info.signature(),
                info.description(),
                name_width = max_name,
                signature_width = max_signature
            )?;
        }

        Ok(())
    }
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary {
            operations: HashMap::new(),
        }
    }

    /// Insert an operation, replacing any earlier operation of the same name.
    pub fn insert(&mut self, info: OperationInfo) {
        let _ = self.operations.insert(info.name.clone(), info);
    }

    /// Register a native operation.  Normally called through `add_native_operation!` so that the
    /// registration location is recorded.
    #[allow(clippy::too_many_arguments)]
    pub fn add_operation(
        &mut self,
        file: &str,
        line: usize,
        column: usize,
        name: &str,
        handler: OperationHandler,
        description: &str,
        signature: &str,
    ) {
        self.insert(OperationInfo::new(
            SourceLocation::new_from_info(file, line, column),
            name.to_string(),
            handler,
            description.to_string(),
            signature.to_string(),
        ));
    }

    pub fn find(&self, name: &str) -> Option<&OperationInfo> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Simplify registering a native operation with a dictionary.
///
/// Required parameters are the dictionary to register with, the operation's name, the handler
/// function, a simple description, and the operation's stack signature.
#[macro_export]
macro_rules! add_native_operation {
    (
        $dictionary:expr ,
        $name:expr ,
        $function:expr ,
        $description:expr ,
        $signature:expr
    ) => {{
        // Record where in the Rust source the operation was registered from.
        $dictionary.add_operation(
            file!(),
            line!() as usize,
            column!() as usize,
            $name,
            $function,
            $description,
            $signature,
        );
    }};
}
