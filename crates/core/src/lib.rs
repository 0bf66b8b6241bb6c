//! graphchecker-core: compiler front end for the graphchecker DSL.
//!
//! Compiles a Lisp-syntax description of message schemas and communicating
//! processes into a [`Model`]: message schemas plus one labeled transition
//! system per process.
//!
//! # Pipeline
//!
//! - [`lexer`] -- source text to punctuation, string and word tokens
//! - [`parser`] -- tokens to a generic S-expression tree ([`Node`])
//! - [`interpret`](mod@interpret) -- top-level `defmessage`/`defprocess` forms to a
//!   [`Model`], driving a [`ProcessBuilder`] through each process body
//!
//! [`compile()`](fn@compile) runs all of them in order.

pub mod ast;
pub mod builder;
pub mod call;
pub mod compile;
pub mod error;
pub mod expression;
pub mod interpret;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod token_stream;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{Node, NodeKind};
pub use builder::{ProcessBuilder, START_LABEL};
pub use compile::{compile, compile_with_options};
pub use error::{
    ArgumentError, CompileError, DispatchError, GraphError, LexError, ParseError,
    TranslationError,
};
pub use graphchecker_model as model;
pub use graphchecker_model::Model;
pub use interpret::interpret;
pub use options::CompileOptions;
