use std::fmt;

use thiserror::Error;

use crate::domain::context::ContextError;

/// Failures reported by storage contract implementations.
///
/// Backend-specific detail (constraint names, driver codes) is folded into
/// these variants before it reaches the domain service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("app not found")]
    AppNotFound,

    #[error("database error: {0}")]
    Database(String),
}

/// Domain error kinds surfaced by the auth service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthErrorKind {
    #[error("{field} is required")]
    Validation { field: &'static str },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid app id")]
    InvalidAppId,

    #[error("user already exists")]
    UserExists,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("password hashing failed")]
    Hashing,

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl From<ContextError> for AuthErrorKind {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => AuthErrorKind::Cancelled,
            ContextError::DeadlineExceeded => AuthErrorKind::DeadlineExceeded,
        }
    }
}

/// Error returned by auth service operations.
///
/// Carries the failing operation name for diagnostics; callers match on `kind()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    operation: &'static str,
    kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(operation: &'static str, kind: AuthErrorKind) -> Self {
        Self { operation, kind }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn kind(&self) -> &AuthErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> AuthErrorKind {
        self.kind
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.kind)
    }
}

impl std::error::Error for AuthError {}
