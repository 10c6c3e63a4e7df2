//! Inline tokens
//!
//! A token is the unit the lexer produces and the layout engine packs. Tokens are created once
//! during lexing and owned by exactly one Token node of the document tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of the punctuation token the lexer synthesizes for a word-separating space.
pub const SPACE_SENTINEL: &str = "·";

/// Opens an opaque span; everything up to [`OPAQUE_CLOSE`] is kept verbatim.
pub const OPAQUE_OPEN: char = '❲';

/// Closes an opaque span.
pub const OPAQUE_CLOSE: char = '❳';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A maximal run of letters and decimal digits
    Word,
    /// A single punctuation code point (or the space sentinel)
    Punctuation,
    /// A single symbol code point
    Symbol,
    /// The verbatim contents of an opaque span, without its delimiters
    Opaque,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Word => "word",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Symbol => "symbol",
            TokenKind::Opaque => "opaque",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Set only on space sentinels synthesized by the lexer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub implicit: bool,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            kind,
            value: value.into(),
            implicit: false,
        }
    }

    pub fn word(value: impl Into<String>) -> Self {
        Token::new(TokenKind::Word, value)
    }

    pub fn punctuation(value: impl Into<String>) -> Self {
        Token::new(TokenKind::Punctuation, value)
    }

    pub fn symbol(value: impl Into<String>) -> Self {
        Token::new(TokenKind::Symbol, value)
    }

    pub fn opaque(value: impl Into<String>) -> Self {
        Token::new(TokenKind::Opaque, value)
    }

    /// The space sentinel as the lexer synthesizes it.
    pub fn implicit_space() -> Self {
        Token {
            kind: TokenKind::Punctuation,
            value: SPACE_SENTINEL.to_string(),
            implicit: true,
        }
    }

    /// True for the space sentinel, whether synthesized or written literally.
    pub fn is_space(&self) -> bool {
        self.kind == TokenKind::Punctuation && self.value == SPACE_SENTINEL
    }

    /// First code point of the value; punctuation and symbol tokens hold exactly one.
    pub fn first_char(&self) -> Option<char> {
        self.value.chars().next()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.implicit && self.is_space() {
            write!(f, "{}(\" \")", self.kind.as_str())
        } else {
            write!(f, "{}({:?})", self.kind.as_str(), self.value)
        }
    }
}
