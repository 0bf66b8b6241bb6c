use crate::error::LexError;
use crate::options::CompileOptions;
use unicode_general_category::{get_general_category, GeneralCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One of `( ) { }`
    Punctuation,
    /// Quote-delimited literal, quotes included in the text
    Str,
    /// Any other run of printable, non-space, non-punctuation characters
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character in the source.
    pub offset: usize,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, offset: usize, text: &str) -> Self {
        Token {
            kind,
            offset,
            text: text.to_owned(),
        }
    }
}

pub fn is_punctuation(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}')
}

/// Visible characters: anything outside the control, format, private-use,
/// surrogate and unassigned categories.
pub fn is_printable(c: char) -> bool {
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::PrivateUse
            | GeneralCategory::Surrogate
            | GeneralCategory::Unassigned
    )
}

/// Split `src` into tokens using the default (strict) options.
pub fn lex(src: &str) -> Result<Vec<Token>, LexError> {
    lex_with_options(src, &CompileOptions::default())
}

/// Split `src` into punctuation, string and word tokens. Whitespace outside
/// string literals is skipped.
pub fn lex_with_options(src: &str, opts: &CompileOptions) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if is_punctuation(c) {
            chars.next();
            tokens.push(Token::new(
                TokenKind::Punctuation,
                start,
                &src[start..start + c.len_utf8()],
            ));
            continue;
        }

        if c == '"' {
            chars.next();
            let end = loop {
                match chars.next() {
                    Some((i, '"')) => break i + 1,
                    Some(_) => {}
                    None if opts.allow_unterminated_strings => break src.len(),
                    None => return Err(LexError::UnterminatedString { offset: start }),
                }
            };
            tokens.push(Token::new(TokenKind::Str, start, &src[start..end]));
            continue;
        }

        let mut end = src.len();
        while let Some(&(i, wc)) = chars.peek() {
            if wc.is_whitespace() || is_punctuation(wc) {
                end = i;
                break;
            }
            if !is_printable(wc) {
                return Err(LexError::UnknownCharacter { ch: wc, offset: i });
            }
            chars.next();
        }
        tokens.push(Token::new(TokenKind::Word, start, &src[start..end]));
    }

    tracing::trace!(count = tokens.len(), "lexed tokens");
    Ok(tokens)
}
