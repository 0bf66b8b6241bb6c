//! Error taxonomy for the compiler front end.
//!
//! Each pipeline layer has its own error family; [`CompileError`] unifies
//! them and carries the chain of forms that were being translated when the
//! failure happened.

use crate::ast::NodeKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unknown character {ch:?} at offset {offset}")]
    UnknownCharacter { ch: char, offset: usize },
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("token stream is empty")]
    EmptyInput,
    #[error("failed to parse token {text:?} at offset {offset}")]
    UnexpectedToken { text: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error("unhandled node kind: {0}")]
    UnhandledNode(NodeKind),
}

/// Failures while walking the arguments of a call form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("empty list")]
    EmptyList,
    #[error("missing required parameter(s)")]
    MissingParameter,
    #[error("end of arguments")]
    EndOfArguments,
    #[error("wrong arg name, got {found} but expected {expected}")]
    KeywordMismatch { expected: String, found: String },
    #[error("missing value for arg {keyword}")]
    MissingValue { keyword: String },
    #[error("expected {expected}, got {found}")]
    KindMismatch { expected: NodeKind, found: NodeKind },
    #[error("{count} unexpected trailing argument(s)")]
    TrailingArguments { count: usize },
    #[error("duplicate keyword {0}")]
    DuplicateKeyword(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("state {0} already known")]
    DuplicateStateName(String),
    #[error("goto target {0} is never declared")]
    UnresolvedLabel(String),
    #[error("{form} is unreachable")]
    Unreachable { form: String },
    #[error("variable {0} already bound in this scope")]
    DuplicateVariable(String),
    #[error("could not resolve variable {0}")]
    UnresolvedVariable(String),
    #[error("no lexical scope is open")]
    NoOpenScope,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown fn: {0}")]
    UnknownTopLevelForm(String),
    #[error("unknown fn call {0}")]
    UnknownBodyForm(String),
    #[error("{0} is not supported in a process body")]
    UnsupportedBodyForm(String),
    #[error("unrecognized expression at body: {0}")]
    UnrecognizedBodyExpression(NodeKind),
    #[error("expected '{expected}', got: {found}")]
    UnexpectedForm { expected: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("in {form}: {source}")]
    InForm {
        form: String,
        source: Box<CompileError>,
    },
}

impl CompileError {
    pub fn in_form(self, form: impl Into<String>) -> Self {
        CompileError::InForm {
            form: form.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all form wrappers removed.
    pub fn root(&self) -> &CompileError {
        let mut err = self;
        while let CompileError::InForm { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    /// Names of the enclosing forms, outermost first.
    pub fn forms(&self) -> Vec<&str> {
        let mut forms = Vec::new();
        let mut err = self;
        while let CompileError::InForm { form, source } = err {
            forms.push(form.as_str());
            err = source.as_ref();
        }
        forms
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "lex",
            CompileError::Parse(_) => "parse",
            CompileError::Translation(_) => "translation",
            CompileError::Argument(_) => "argument",
            CompileError::Graph(_) => "graph",
            CompileError::Dispatch(_) => "dispatch",
            CompileError::InForm { source, .. } => source.kind(),
        }
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "forms":   self.forms(),
            "kind":    self.kind(),
            "message": self.root().to_string(),
        })
    }
}

/// Attach the name of the enclosing form to a failing result.
pub(crate) trait FormContext<T> {
    fn in_form(self, form: &str) -> Result<T, CompileError>;
}

impl<T, E: Into<CompileError>> FormContext<T> for Result<T, E> {
    fn in_form(self, form: &str) -> Result<T, CompileError> {
        self.map_err(|e| e.into().in_form(form))
    }
}
