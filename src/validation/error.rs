use thiserror::Error;

/// Reasons a descriptor is refused before it reaches storage
///
/// Every variant is recoverable: the caller re-prompts for the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("API name cannot be empty")]
    MissingName,

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Malformed headers: {0}")]
    MalformedHeaders(String),

    #[error("Unsupported HTTP method '{0}'. Valid options: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS")]
    InvalidMethod(String),
}

impl ValidationError {
    /// Name of the descriptor field the user has to fix
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingName => "name",
            ValidationError::InvalidEndpoint { .. } => "endpoint",
            ValidationError::MalformedHeaders(_) => "headers",
            ValidationError::InvalidMethod(_) => "method",
        }
    }
}
