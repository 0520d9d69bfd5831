use crate::{
    lang::{
        code::{pretty_print_code, ByteCode},
        folding::fold,
        tokenizing::{tokenize_from_file, tokenize_from_source},
    },
    runtime::error,
};
use tracing::trace;

/// Tokenize the source and fold its literal arithmetic.  Fails with the first syntax error, or
/// with whatever error a folded triple raised.
pub fn compile(path: &str, source: &str) -> error::Result<ByteCode> {
    let code = fold(compile_unfolded(path, source)?)?;

    trace!("Compiled {}:\n{}", path, pretty_print_code(&code));
    Ok(code)
}

/// Tokenize the source without folding it.
pub fn compile_unfolded(path: &str, source: &str) -> error::Result<ByteCode> {
    tokenize_from_source(path, source)
}

/// Read, tokenize, and optionally fold a source file.
pub fn compile_file(path: &str, fold_constants: bool) -> error::Result<ByteCode> {
    let code = tokenize_from_file(path)?;

    if fold_constants {
        fold(code)
    } else {
        Ok(code)
    }
}
