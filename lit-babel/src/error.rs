//! Error types for format operations

use lit_core::{LexError, TreeError};
use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Inline text the lexer could not classify
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    /// Structural mutation refused by the tree
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
    /// Unbalanced block nesting in the source
    #[error("Structure error at line {line}: {message}")]
    Structure { line: usize, message: String },
    /// An element whose type attribute names no known node kind
    #[error("Unknown element type '{0}'")]
    UnknownElementType(String),
    /// A structured-data comment whose payload failed to decode
    #[error("Malformed {marker} payload: {message}")]
    StructuredData { marker: String, message: String },
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FormatError {
    fn from(err: std::io::Error) -> Self {
        FormatError::Io(err.to_string())
    }
}
