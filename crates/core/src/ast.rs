//! Generic S-expression syntax tree.
//!
//! The parser produces these nodes without knowing anything about the
//! forms they spell; the interpreter gives them meaning.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    List(Vec<Node>),
    /// String literal, delimiting quotes included.
    Str(String),
    Int(i64),
    /// Word starting with `:`, marker included.
    Keyword(String),
    Symbol(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    List,
    Str,
    Int,
    Keyword,
    Symbol,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::List(_) => NodeKind::List,
            Node::Str(_) => NodeKind::Str,
            Node::Int(_) => NodeKind::Int,
            Node::Keyword(_) => NodeKind::Keyword,
            Node::Symbol(_) => NodeKind::Symbol,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::List => "list",
            NodeKind::Str => "string",
            NodeKind::Int => "int",
            NodeKind::Keyword => "keyword",
            NodeKind::Symbol => "symbol",
        };
        f.write_str(s)
    }
}
