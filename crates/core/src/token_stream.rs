use crate::lexer::{Token, TokenKind};

/// A cursor over a token slice with peek and seek, so a reader can back out
/// of a partially matched rule by restoring a saved position.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        TokenStream { tokens, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a Token> {
        let t = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(t)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    pub fn next_is(&self, kind: TokenKind, text: &str) -> bool {
        matches!(self.peek(), Some(t) if t.kind == kind && t.text == text)
    }

    pub fn next_is_kind(&self, kind: TokenKind) -> bool {
        matches!(self.peek(), Some(t) if t.kind == kind)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}
