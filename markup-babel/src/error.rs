//! Error types for format operations

use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// The token stream contains a kind no rule handles
    #[error("Token type '{0}' not supported by Markdown parser")]
    UnsupportedToken(String),
    /// A tree node (or a declared node kind) has no Markdown renderer
    #[error("Node type '{0}' not supported by Markdown renderer")]
    UnknownNodeKind(String),
    /// A mark (or a declared mark kind) has no Markdown renderer
    #[error("Mark type '{0}' not supported by Markdown renderer")]
    UnknownMarkKind(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}
