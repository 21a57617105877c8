use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::AuthErrorKind;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;
use crate::domain::context::RequestContext;

/// Domain service implementation for registration, login and admin checks.
///
/// Holds no per-request state; all state lives behind the storage contracts.
pub struct AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    user_saver: Arc<US>,
    user_provider: Arc<UP>,
    app_provider: Arc<AP>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

impl<US, UP, AP> AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_saver` - User creation capability
    /// * `user_provider` - User lookup capability
    /// * `app_provider` - Application lookup capability
    /// * `password_hasher` - Hasher configured with the deployment work factor
    /// * `token_issuer` - Issuer configured with the token lifetime
    pub fn new(
        user_saver: Arc<US>,
        user_provider: Arc<UP>,
        app_provider: Arc<AP>,
        password_hasher: PasswordHasher,
        token_issuer: TokenIssuer,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            password_hasher,
            token_issuer,
        }
    }

    async fn hash_password(
        &self,
        operation: &'static str,
        ctx: &RequestContext,
        password: String,
    ) -> Result<Vec<u8>, AuthErrorKind> {
        let hasher = self.password_hasher.clone();
        let task = tokio::task::spawn_blocking(move || hasher.hash(&password));

        ctx.run(task)
            .await?
            .map_err(|e| {
                tracing::error!(
                    operation,
                    request_id = %ctx.request_id(),
                    error = %e,
                    "Password hashing task failed"
                );
                AuthErrorKind::Hashing
            })?
            .map_err(|e| {
                tracing::error!(
                    operation,
                    request_id = %ctx.request_id(),
                    error = %e,
                    "Password hashing failed"
                );
                AuthErrorKind::Hashing
            })
    }

    async fn verify_password(
        &self,
        operation: &'static str,
        ctx: &RequestContext,
        password: String,
        pass_hash: Vec<u8>,
    ) -> Result<bool, AuthErrorKind> {
        let hasher = self.password_hasher.clone();
        let task = tokio::task::spawn_blocking(move || hasher.verify(&password, &pass_hash));

        ctx.run(task)
            .await?
            .map_err(|e| {
                tracing::error!(
                    operation,
                    request_id = %ctx.request_id(),
                    error = %e,
                    "Password verification task failed"
                );
                AuthErrorKind::Hashing
            })?
            .map_err(|e| {
                tracing::error!(
                    operation,
                    request_id = %ctx.request_id(),
                    error = %e,
                    "Password verification failed"
                );
                AuthErrorKind::Hashing
            })
    }
}

fn require_email_and_password(email: &str, password: &str) -> Result<(), AuthErrorKind> {
    if email.is_empty() {
        return Err(AuthErrorKind::Validation { field: "email" });
    }
    if password.is_empty() {
        return Err(AuthErrorKind::Validation { field: "password" });
    }
    Ok(())
}

fn storage_failure(
    operation: &'static str,
    ctx: &RequestContext,
    err: StorageError,
) -> AuthErrorKind {
    tracing::error!(
        operation,
        request_id = %ctx.request_id(),
        error = %err,
        "Storage operation failed"
    );
    AuthErrorKind::Storage(err.to_string())
}

#[async_trait]
impl<US, UP, AP> AuthServicePort for AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    async fn register(
        &self,
        ctx: &RequestContext,
        command: RegisterCommand,
    ) -> Result<UserId, AuthError> {
        const OPERATION: &str = "auth.register";
        let fail = |kind: AuthErrorKind| AuthError::new(OPERATION, kind);

        require_email_and_password(&command.email, &command.password).map_err(fail)?;

        tracing::info!(
            operation = OPERATION,
            request_id = %ctx.request_id(),
            "Registering user"
        );

        let pass_hash = self
            .hash_password(OPERATION, ctx, command.password)
            .await
            .map_err(fail)?;

        let user_id = ctx
            .run(self.user_saver.save_user(&command.email, &pass_hash))
            .await
            .map_err(|e| fail(e.into()))?
            .map_err(|e| match e {
                StorageError::UserExists => {
                    tracing::warn!(
                        operation = OPERATION,
                        request_id = %ctx.request_id(),
                        "User already exists"
                    );
                    fail(AuthErrorKind::UserExists)
                }
                other => fail(storage_failure(OPERATION, ctx, other)),
            })?;

        tracing::info!(
            operation = OPERATION,
            request_id = %ctx.request_id(),
            user_id = %user_id,
            "Registered user"
        );

        Ok(user_id)
    }

    async fn login(
        &self,
        ctx: &RequestContext,
        command: LoginCommand,
    ) -> Result<String, AuthError> {
        const OPERATION: &str = "auth.login";
        let fail = |kind: AuthErrorKind| AuthError::new(OPERATION, kind);

        require_email_and_password(&command.email, &command.password).map_err(fail)?;
        if command.app_id.is_empty() {
            return Err(fail(AuthErrorKind::Validation { field: "appId" }));
        }

        tracing::info!(
            operation = OPERATION,
            request_id = %ctx.request_id(),
            app_id = %command.app_id,
            "Logging user in"
        );

        let user = ctx
            .run(self.user_provider.get_user(&command.email))
            .await
            .map_err(|e| fail(e.into()))?
            .map_err(|e| match e {
                StorageError::UserNotFound => {
                    tracing::warn!(
                        operation = OPERATION,
                        request_id = %ctx.request_id(),
                        "User not found"
                    );
                    fail(AuthErrorKind::InvalidCredentials)
                }
                other => fail(storage_failure(OPERATION, ctx, other)),
            })?;

        // A corrupt stored hash is indistinguishable from a wrong password
        match self
            .verify_password(OPERATION, ctx, command.password, user.pass_hash.clone())
            .await
        {
            Ok(true) => {}
            Ok(false) | Err(AuthErrorKind::Hashing) => {
                tracing::warn!(
                    operation = OPERATION,
                    request_id = %ctx.request_id(),
                    user_id = %user.id,
                    "Invalid credentials"
                );
                return Err(fail(AuthErrorKind::InvalidCredentials));
            }
            Err(other) => return Err(fail(other)),
        }

        let app = ctx
            .run(self.app_provider.get_app(command.app_id))
            .await
            .map_err(|e| fail(e.into()))?
            .map_err(|e| match e {
                StorageError::AppNotFound => {
                    tracing::warn!(
                        operation = OPERATION,
                        request_id = %ctx.request_id(),
                        app_id = %command.app_id,
                        "App not found"
                    );
                    fail(AuthErrorKind::InvalidAppId)
                }
                other => fail(storage_failure(OPERATION, ctx, other)),
            })?;

        let token = self
            .token_issuer
            .issue(user.id.0, &user.email, app.id.0, &app.secret)
            .map_err(|e| {
                tracing::error!(
                    operation = OPERATION,
                    request_id = %ctx.request_id(),
                    app_id = %app.id,
                    error = %e,
                    "Failed to issue token"
                );
                fail(AuthErrorKind::Signing(e.to_string()))
            })?;

        tracing::info!(
            operation = OPERATION,
            request_id = %ctx.request_id(),
            user_id = %user.id,
            app_id = %app.id,
            "User logged in"
        );

        Ok(token)
    }

    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, AuthError> {
        const OPERATION: &str = "auth.is_admin";
        let fail = |kind: AuthErrorKind| AuthError::new(OPERATION, kind);

        tracing::info!(
            operation = OPERATION,
            request_id = %ctx.request_id(),
            user_id = %user_id,
            "Checking if user is admin"
        );

        // Unknown ids are reported as invalid credentials
        let is_admin = ctx
            .run(self.user_provider.is_admin(user_id))
            .await
            .map_err(|e| fail(e.into()))?
            .map_err(|e| match e {
                StorageError::UserNotFound => fail(AuthErrorKind::InvalidCredentials),
                other => fail(storage_failure(OPERATION, ctx, other)),
            })?;

        tracing::info!(
            operation = OPERATION,
            request_id = %ctx.request_id(),
            user_id = %user_id,
            is_admin,
            "Checked if user is admin"
        );

        Ok(is_admin)
    }
}
