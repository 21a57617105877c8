use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::context::RequestContext;

/// Port for auth domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Returns
    /// Identifier assigned to the new user
    ///
    /// # Errors
    /// * `Validation` - Email or password is empty (email reported first)
    /// * `UserExists` - Email is already registered
    /// * `Hashing` - Password could not be hashed
    /// * `Storage` - Persistence failed
    /// * `Cancelled` / `DeadlineExceeded` - Request abandoned by the caller
    async fn register(
        &self,
        ctx: &RequestContext,
        command: RegisterCommand,
    ) -> Result<UserId, AuthError>;

    /// Authenticate a user and issue a session token for an application.
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `Validation` - Email, password or app id missing (in that order)
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `InvalidAppId` - App id does not resolve to an application
    /// * `Signing` - Application secret cannot sign tokens
    /// * `Storage` - Persistence failed
    /// * `Cancelled` / `DeadlineExceeded` - Request abandoned by the caller
    async fn login(&self, ctx: &RequestContext, command: LoginCommand)
        -> Result<String, AuthError>;

    /// Check whether a user is an administrator.
    ///
    /// # Errors
    /// * `InvalidCredentials` - User does not exist
    /// * `Storage` - Persistence failed
    /// * `Cancelled` / `DeadlineExceeded` - Request abandoned by the caller
    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, AuthError>;
}

/// User creation capability.
#[async_trait]
pub trait UserSaver: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Arguments
    /// * `email` - Unique email address
    /// * `pass_hash` - Password hash bytes
    ///
    /// # Returns
    /// Identifier assigned by storage
    ///
    /// # Errors
    /// * `UserExists` - Email is already registered
    /// * `Database` - Database operation failed
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<UserId, StorageError>;
}

/// User lookup capability.
#[async_trait]
pub trait UserProvider: Send + Sync + 'static {
    /// Retrieve user by email.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `Database` - Database operation failed
    async fn get_user(&self, email: &str) -> Result<User, StorageError>;

    /// Retrieve the administrator flag of a user.
    ///
    /// # Errors
    /// * `UserNotFound` - Unknown user id
    /// * `Database` - Database operation failed
    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError>;
}

/// Application lookup capability.
#[async_trait]
pub trait AppProvider: Send + Sync + 'static {
    /// Retrieve application by identifier.
    ///
    /// # Errors
    /// * `AppNotFound` - No application with this id
    /// * `Database` - Database operation failed
    async fn get_app(&self, app_id: AppId) -> Result<App, StorageError>;
}
