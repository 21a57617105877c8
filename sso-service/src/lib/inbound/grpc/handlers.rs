use tonic::Status;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::AuthErrorKind;

pub mod is_admin;
pub mod login;
pub mod register;

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        let message = err.kind().to_string();

        match err.into_kind() {
            AuthErrorKind::Validation { .. } => Status::invalid_argument(message),
            AuthErrorKind::InvalidCredentials => Status::unauthenticated(message),
            AuthErrorKind::InvalidAppId => Status::not_found(message),
            AuthErrorKind::UserExists => Status::already_exists(message),
            // Backend detail is logged by the domain, not sent to clients
            AuthErrorKind::Storage(_) => Status::unavailable("storage error"),
            AuthErrorKind::Signing(_) => Status::failed_precondition("token signing failed"),
            AuthErrorKind::Hashing => Status::internal(message),
            AuthErrorKind::Cancelled => Status::cancelled(message),
            AuthErrorKind::DeadlineExceeded => Status::deadline_exceeded(message),
        }
    }
}
