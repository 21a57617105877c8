use thiserror::Error;

/// Error type for password operations.
///
/// Verification never reports a wrong password as an error; only a stored hash
/// that cannot be interpreted ends up here.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
