use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Invalid token lifetime: {0}")]
    InvalidLifetime(String),
}
