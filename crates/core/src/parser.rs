//! Recursive-descent parser from tokens to the generic syntax tree.
//! Each reader either consumes a complete node or leaves the cursor where it
//! started, so the next reader in priority order can try the same tokens.

use crate::ast::Node;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::token_stream::TokenStream;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    ts: TokenStream<'a>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            ts: TokenStream::new(tokens),
        }
    }

    fn parse_file(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        while !self.ts.at_end() {
            match self.read_node() {
                Some(n) => nodes.push(n),
                None => return Err(self.unexpected()),
            }
        }
        Ok(nodes)
    }

    fn unexpected(&self) -> ParseError {
        match self.ts.peek() {
            Some(t) => ParseError::UnexpectedToken {
                text: t.text.clone(),
                offset: t.offset,
            },
            None => ParseError::EmptyInput,
        }
    }

    /// Try each node rule in priority order; the first match wins.
    fn read_node(&mut self) -> Option<Node> {
        self.read_list()
            .or_else(|| self.read_int())
            .or_else(|| self.read_str())
            .or_else(|| self.read_keyword())
            .or_else(|| self.read_symbol())
    }

    fn read_list(&mut self) -> Option<Node> {
        let start = self.ts.position();
        if !self.ts.next_is(TokenKind::Punctuation, "(") {
            return None;
        }
        self.ts.next();

        let mut nodes = Vec::new();
        loop {
            if self.ts.at_end() {
                self.ts.seek(start);
                return None;
            }
            if self.ts.next_is(TokenKind::Punctuation, ")") {
                self.ts.next();
                return Some(Node::List(nodes));
            }
            // Leave the cursor on the offending token for error reporting.
            nodes.push(self.read_node()?);
        }
    }

    fn read_int(&mut self) -> Option<Node> {
        let t = self.peek_word()?;
        let n = t.text.parse::<i64>().ok()?;
        self.ts.next();
        Some(Node::Int(n))
    }

    fn read_str(&mut self) -> Option<Node> {
        if !self.ts.next_is_kind(TokenKind::Str) {
            return None;
        }
        let t = self.ts.next()?;
        Some(Node::Str(t.text.clone()))
    }

    fn read_keyword(&mut self) -> Option<Node> {
        let t = self.peek_word()?;
        if !t.text.starts_with(':') {
            return None;
        }
        self.ts.next();
        Some(Node::Keyword(t.text.clone()))
    }

    fn read_symbol(&mut self) -> Option<Node> {
        let t = self.peek_word()?;
        self.ts.next();
        Some(Node::Symbol(t.text.clone()))
    }

    fn peek_word(&self) -> Option<&'a Token> {
        self.ts.peek().filter(|t| t.kind == TokenKind::Word)
    }
}

/// Parse a token sequence into its top-level nodes.
pub fn parse(tokens: &[Token]) -> Result<Vec<Node>, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let nodes = Parser::new(tokens).parse_file()?;
    tracing::trace!(count = nodes.len(), "parsed top-level nodes");
    Ok(nodes)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
