//! Source text to [`Model`]: lex, parse, interpret.
//!
//! This is a thin orchestrator over the pipeline stages; each stage is also
//! public for callers that need an intermediate result.

use crate::error::CompileError;
use crate::interpret::interpret;
use crate::lexer;
use crate::options::CompileOptions;
use crate::parser;
use graphchecker_model::Model;

/// Compile `src` with the default options.
pub fn compile(src: &str) -> Result<Model, CompileError> {
    compile_with_options(src, &CompileOptions::default())
}

/// Compile `src`, returning the model or the first error encountered.
pub fn compile_with_options(src: &str, opts: &CompileOptions) -> Result<Model, CompileError> {
    let tokens = lexer::lex_with_options(src, opts)?;
    tracing::debug!(tokens = tokens.len(), "lexed source");

    let nodes = parser::parse(&tokens)?;
    tracing::debug!(nodes = nodes.len(), "parsed source");

    let model = interpret(&nodes, opts)?;
    tracing::debug!(
        messages = model.messages.len(),
        processes = model.processes.len(),
        "compiled model"
    );
    Ok(model)
}
