use thiserror::Error;

/// Errors produced while reading or writing graph syntax.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The input is not well-formed for the grammar being parsed.
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// The input bytes are not valid UTF-8.
    #[error("invalid UTF-8 in input after byte {valid_up_to}")]
    Encoding { valid_up_to: usize },

    /// A relative IRI was found but no base IRI is available to resolve it.
    #[error("cannot resolve relative IRI <{0}> without a base IRI")]
    RelativeIri(String),

    /// The update uses a construct outside the supported subset.
    #[error("unsupported update: {0}")]
    UnsupportedUpdate(String),
}

impl GraphError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
