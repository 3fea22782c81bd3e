use std::time::Duration;

use ldp_graph::GraphError;
use thiserror::Error;

/// Errors shared by every layer of the LDP server.
///
/// The variants form the HTTP-facing taxonomy: callers branch on the variant
/// (most notably [`LdpError::NotFound`] during ACL resolution) and the
/// transport maps each one onto a status code via [`LdpError::status_code`].
#[derive(Debug, Error)]
pub enum LdpError {
    /// The identifier does not resolve to a resource.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// An authenticated agent lacks the required permission.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An anonymous agent lacks the required permission.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request asks for something this server cannot do.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A media type cannot be produced, consumed, or parsed.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// A representation declares no content type.
    #[error("input type required: representation has no content type")]
    MissingContentType,

    /// Every handler in a dispatcher rejected the input.
    #[error("no handler supports the given input: [{}]", .reasons.join("; "))]
    NoApplicableHandler { reasons: Vec<String> },

    /// A resource lock could not be acquired in time.
    #[error("timed out after {waited:?} waiting for the lock on {identifier}")]
    LockTimeout { identifier: String, waited: Duration },

    /// I/O failure in a collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other collaborator failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LdpError {
    /// Whether the error belongs to the unsupported-operation class: the
    /// request itself cannot be processed as given.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperation(_)
                | Self::UnsupportedMediaType(_)
                | Self::MissingContentType
                | Self::NoApplicableHandler { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Unauthorized(_) => 401,
            Self::LockTimeout { .. } => 503,
            e if e.is_unsupported() => 400,
            _ => 500,
        }
    }
}

/// Parse failures surface as unsupported media; update-grammar failures as
/// unsupported operations. The parser message is kept either way.
impl From<GraphError> for LdpError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::UnsupportedUpdate(message) => Self::UnsupportedOperation(message),
            other => Self::UnsupportedMediaType(other.to_string()),
        }
    }
}

/// Result alias for LDP operations.
pub type LdpResult<T> = Result<T, LdpError>;
