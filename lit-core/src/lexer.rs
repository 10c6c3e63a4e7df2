//! Inline text lexer
//!
//! Converts a run of raw inline text into typed tokens. Classification is by Unicode general
//! category:
//!
//! - symbol (`S*`): one Symbol token per code point
//! - punctuation (`P*`): one Punctuation token per code point, never merged
//! - letter (`L*`) or decimal digit (`Nd`): appended to the previous Word, or starts one
//!
//! A literal space becomes an implicit space sentinel unless there are no tokens yet, it is the
//! last character of the input, or the previous token already is a space. Newlines, carriage
//! returns and tabs are dropped. Text between [`OPAQUE_OPEN`] and [`OPAQUE_CLOSE`] is kept
//! verbatim in a single Opaque token.

use crate::token::{Token, TokenKind, OPAQUE_CLOSE, OPAQUE_OPEN};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static CATEGORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<symbol>\p{S})|(?P<punctuation>\p{P})|(?P<alnum>[\p{L}\p{Nd}]))$")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Symbol,
    Punctuation,
    Alphanumeric,
}

fn categorize(ch: char) -> Option<Category> {
    let mut buf = [0u8; 4];
    let caps = CATEGORY.captures(ch.encode_utf8(&mut buf))?;
    if caps.name("symbol").is_some() {
        Some(Category::Symbol)
    } else if caps.name("punctuation").is_some() {
        Some(Category::Punctuation)
    } else {
        Some(Category::Alphanumeric)
    }
}

/// A code point the lexer has no class for (control characters, combining marks, exotic spaces).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized code point {ch:?} at byte {offset}")]
pub struct LexError {
    pub ch: char,
    /// Byte offset of `ch` in the lexed text
    pub offset: usize,
}

/// Lex inline text into tokens.
pub fn lex(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut opaque = false;

    for (offset, ch) in text.char_indices() {
        if opaque {
            if ch == OPAQUE_CLOSE {
                opaque = false;
            } else if let Some(last) = tokens.last_mut() {
                last.value.push(ch);
            }
            continue;
        }

        match ch {
            OPAQUE_OPEN => {
                tokens.push(Token::opaque(""));
                opaque = true;
            }
            ' ' => {
                if offset + 1 == text.len() {
                    continue;
                }
                match tokens.last() {
                    Some(last) if !last.is_space() => tokens.push(Token::implicit_space()),
                    _ => {}
                }
            }
            '\n' | '\r' | '\t' => {}
            _ => match categorize(ch) {
                Some(Category::Symbol) => tokens.push(Token::symbol(ch)),
                Some(Category::Punctuation) => tokens.push(Token::punctuation(ch)),
                Some(Category::Alphanumeric) => match tokens.last_mut() {
                    Some(last) if last.kind == TokenKind::Word => last.value.push(ch),
                    _ => tokens.push(Token::word(ch)),
                },
                None => return Err(LexError { ch, offset }),
            },
        }
    }

    Ok(tokens)
}
