//! Argument walking for call forms.
//!
//! A call form is a list whose first element is a symbol naming the
//! operation. Its remaining elements are read left to right, either as
//! `:keyword value` pairs or positionally; a parameter requested by keyword
//! may also be supplied positionally, without the keyword.

use crate::ast::{Node, NodeKind};
use crate::error::{ArgumentError, CompileError};
use crate::expression::to_expression;
use graphchecker_model::Expression;

#[derive(Debug, Clone)]
pub struct CallForm<'a> {
    name: &'a str,
    args: &'a [Node],
    pos: usize,
}

/// Read a list's children as a call form.
pub fn read_call(nodes: &[Node]) -> Result<CallForm<'_>, ArgumentError> {
    let (first, args) = nodes.split_first().ok_or(ArgumentError::EmptyList)?;
    let name = Param(Ok(first)).symbol()?;
    Ok(CallForm { name, args, pos: 0 })
}

impl<'a> CallForm<'a> {
    pub fn fn_name(&self) -> &'a str {
        self.name
    }

    /// The next argument, introduced by `expected` or given positionally.
    pub fn next_named_param(&mut self, expected: &str) -> Param<'a> {
        let Some(arg) = self.args.get(self.pos) else {
            return Param(Err(ArgumentError::MissingParameter));
        };
        match arg {
            Node::Keyword(key) if key != expected => Param(Err(ArgumentError::KeywordMismatch {
                expected: expected.to_owned(),
                found: key.clone(),
            })),
            Node::Keyword(key) => match self.args.get(self.pos + 1) {
                Some(value) => {
                    self.pos += 2;
                    Param(Ok(value))
                }
                None => Param(Err(ArgumentError::MissingValue {
                    keyword: key.clone(),
                })),
            },
            _ => {
                self.pos += 1;
                Param(Ok(arg))
            }
        }
    }

    pub fn next_positional_param(&mut self) -> Param<'a> {
        match self.args.get(self.pos) {
            Some(arg) => {
                self.pos += 1;
                Param(Ok(arg))
            }
            None => Param(Err(ArgumentError::EndOfArguments)),
        }
    }

    pub fn next_optional_param(&mut self) -> Option<&'a Node> {
        self.next_positional_param().node().ok()
    }

    pub fn peek(&self) -> Option<&'a Node> {
        self.args.get(self.pos)
    }

    /// Consume the next argument if it is exactly the keyword `name`.
    pub fn take_keyword(&mut self, name: &str) -> bool {
        match self.peek() {
            Some(Node::Keyword(k)) if k == name => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Consume and return every unread argument.
    pub fn remaining(&mut self) -> &'a [Node] {
        let rest = &self.args[self.pos..];
        self.pos = self.args.len();
        rest
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.args.len()
    }

    /// Fail if any argument is left unread.
    pub fn finish(&self) -> Result<(), ArgumentError> {
        match self.args.len().saturating_sub(self.pos) {
            0 => Ok(()),
            count => Err(ArgumentError::TrailingArguments { count }),
        }
    }
}

/// The outcome of a parameter lookup, narrowed by one of the typed
/// accessors. A failed lookup passes through every accessor unchanged.
#[derive(Debug)]
pub struct Param<'a>(Result<&'a Node, ArgumentError>);

impl<'a> Param<'a> {
    pub fn node(self) -> Result<&'a Node, ArgumentError> {
        self.0
    }

    pub fn string(self) -> Result<&'a str, ArgumentError> {
        match self.0? {
            Node::Str(s) => Ok(s.as_str()),
            other => Err(mismatch(NodeKind::Str, other)),
        }
    }

    pub fn symbol(self) -> Result<&'a str, ArgumentError> {
        match self.0? {
            Node::Symbol(s) => Ok(s.as_str()),
            other => Err(mismatch(NodeKind::Symbol, other)),
        }
    }

    pub fn keyword(self) -> Result<&'a str, ArgumentError> {
        match self.0? {
            Node::Keyword(k) => Ok(k.as_str()),
            other => Err(mismatch(NodeKind::Keyword, other)),
        }
    }

    pub fn list(self) -> Result<&'a [Node], ArgumentError> {
        match self.0? {
            Node::List(children) => Ok(children.as_slice()),
            other => Err(mismatch(NodeKind::List, other)),
        }
    }

    pub fn call(self) -> Result<CallForm<'a>, ArgumentError> {
        read_call(self.list()?)
    }

    pub fn expression(self) -> Result<Expression, CompileError> {
        Ok(to_expression(self.0?)?)
    }
}

fn mismatch(expected: NodeKind, found: &Node) -> ArgumentError {
    ArgumentError::KindMismatch {
        expected,
        found: found.kind(),
    }
}
